//! Type-descriptor registry.
//!
//! Every type an endpoint can reference is described up front: its kind,
//! its display name, its ordered members with their classification flags,
//! and, for enums, its options. The engine never inspects types any other
//! way; a field that names an unregistered type is a registration error.
//!
//! Built-in primitives are pre-registered under short keys (`string`,
//! `i32`, `datetime`, ...) and render with XML-schema style names
//! (`string`, `int`, `dateTime`, ...).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpecError};

/// Built-in primitive keys and the names they render with.
const BUILTIN_PRIMITIVES: &[(&str, &str)] = &[
    ("string", "string"),
    ("bool", "boolean"),
    ("char", "char"),
    ("i8", "byte"),
    ("u8", "unsignedByte"),
    ("i16", "short"),
    ("u16", "unsignedShort"),
    ("i32", "int"),
    ("u32", "unsignedInt"),
    ("i64", "long"),
    ("u64", "unsignedLong"),
    ("f32", "float"),
    ("f64", "double"),
    ("decimal", "decimal"),
    ("date", "date"),
    ("datetime", "dateTime"),
    ("duration", "duration"),
    ("uuid", "uuid"),
    ("uri", "anyURI"),
    ("bytes", "base64Binary"),
];

/// Classification of a registered type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// Built-in scalar; never a catalog entry.
    Primitive,
    /// Enumeration; rendered inline as options.
    Enum,
    /// Structured type with members; a catalog entry when reachable.
    Complex,
}

/// Reference from a member or endpoint to a registered type.
///
/// One level of list wrapping is expressed with `list`; the element type is
/// always the registered one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldType {
    /// Registry key of the element type.
    #[serde(rename = "type")]
    pub type_key: String,

    /// Whether the field is a list of the element type.
    #[serde(default)]
    pub list: bool,

    /// Whether the field may be absent.
    #[serde(default)]
    pub nullable: bool,
}

impl FieldType {
    /// A plain reference to `type_key`.
    pub fn new(type_key: impl Into<String>) -> Self {
        Self {
            type_key: type_key.into(),
            list: false,
            nullable: false,
        }
    }

    /// A list of `type_key`.
    pub fn list_of(type_key: impl Into<String>) -> Self {
        Self {
            list: true,
            ..Self::new(type_key)
        }
    }

    /// The same reference, marked nullable.
    #[must_use]
    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// Free-form description attached to a type at registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeAnnotation {
    /// Display name replacing the declared one.
    pub name: Option<String>,
    /// Comments.
    pub comments: Option<String>,
    /// Another registered type to describe in this one's place.
    pub substitute: Option<String>,
}

/// Description attached to a member at registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberAnnotation {
    /// Display name replacing the declared one.
    pub name: Option<String>,
    /// Comments.
    pub comments: Option<String>,
    /// Default value as written in the source.
    pub default_value: Option<String>,
    /// Whether the member must be supplied.
    pub required: Option<bool>,
    /// Name of a single item when the member is a list.
    pub array_item_name: Option<String>,
    /// Another registered type to report instead of the declared one.
    pub substitute: Option<String>,
}

/// Name and comments attached to an enum option.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionAnnotation {
    /// Display name.
    pub name: Option<String>,
    /// Comments.
    pub comments: Option<String>,
}

/// One member of a complex type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDescriptor {
    /// Declared member name.
    pub name: String,

    /// Declared member type.
    #[serde(flatten)]
    pub field_type: FieldType,

    /// Never documented.
    #[serde(default)]
    pub hidden: bool,

    /// Bound by the host (session, principal, ...) rather than the caller.
    #[serde(default)]
    pub auto_bound: bool,

    /// Bound from the querystring when the owner is an endpoint input.
    #[serde(default)]
    pub querystring: bool,

    /// Bound from the URL when the owner is an endpoint input.
    #[serde(default)]
    pub url_parameter: bool,

    /// Registration-time description.
    #[serde(default)]
    pub annotation: Option<MemberAnnotation>,
}

impl MemberDescriptor {
    /// A visible member named `name` of type `field_type`.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            hidden: false,
            auto_bound: false,
            querystring: false,
            url_parameter: false,
            annotation: None,
        }
    }

    /// Mark hidden.
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Mark auto-bound.
    #[must_use]
    pub const fn auto_bound(mut self) -> Self {
        self.auto_bound = true;
        self
    }

    /// Mark as bound from the querystring.
    #[must_use]
    pub const fn querystring(mut self) -> Self {
        self.querystring = true;
        self
    }

    /// Mark as bound from the URL.
    #[must_use]
    pub const fn url_parameter(mut self) -> Self {
        self.url_parameter = true;
        self
    }

    /// Attach a description.
    #[must_use]
    pub fn annotated(mut self, annotation: MemberAnnotation) -> Self {
        self.annotation = Some(annotation);
        self
    }
}

/// One option of an enum type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumOptionDescriptor {
    /// Declared option name.
    pub name: String,

    /// Underlying literal value.
    pub value: i64,

    /// Never documented.
    #[serde(default)]
    pub hidden: bool,

    /// Registration-time description.
    #[serde(default)]
    pub annotation: Option<OptionAnnotation>,
}

impl EnumOptionDescriptor {
    /// A visible option.
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
            hidden: false,
            annotation: None,
        }
    }
}

/// A registered type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Fully qualified identity, e.g. `orders::Order`.
    pub key: String,

    /// Declared display name, e.g. `Order`.
    pub name: String,

    /// Classification.
    pub kind: TypeKind,

    /// Never documented, including transitively.
    #[serde(default)]
    pub hidden: bool,

    /// Rendered name for primitives.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xml_name: Option<String>,

    /// Ordered members of a complex type.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<MemberDescriptor>,

    /// Options of an enum type.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<EnumOptionDescriptor>,

    /// Registration-time description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<TypeAnnotation>,
}

impl TypeDescriptor {
    /// A complex type with the given members.
    pub fn complex(
        key: impl Into<String>,
        name: impl Into<String>,
        members: Vec<MemberDescriptor>,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            kind: TypeKind::Complex,
            hidden: false,
            xml_name: None,
            members,
            options: Vec::new(),
            annotation: None,
        }
    }

    /// An enum type with the given options.
    pub fn enumeration(
        key: impl Into<String>,
        name: impl Into<String>,
        options: Vec<EnumOptionDescriptor>,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            kind: TypeKind::Enum,
            hidden: false,
            xml_name: None,
            members: Vec::new(),
            options,
            annotation: None,
        }
    }

    /// A primitive rendered as `xml_name`.
    pub fn primitive(key: impl Into<String>, xml_name: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            name: key.clone(),
            key,
            kind: TypeKind::Primitive,
            hidden: false,
            xml_name: Some(xml_name.into()),
            members: Vec::new(),
            options: Vec::new(),
            annotation: None,
        }
    }

    /// Mark hidden.
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Attach a description.
    #[must_use]
    pub fn annotated(mut self, annotation: TypeAnnotation) -> Self {
        self.annotation = Some(annotation);
        self
    }

    /// Primitives and enums are rendered inline, never catalogued.
    #[inline]
    #[must_use]
    pub const fn is_simple(&self) -> bool {
        matches!(self.kind, TypeKind::Primitive | TypeKind::Enum)
    }

    /// Name used wherever a type name rather than an id is rendered.
    #[must_use]
    pub fn xml_name(&self) -> &str {
        self.xml_name.as_deref().unwrap_or(&self.name)
    }

    /// Look up a member by declared name.
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&MemberDescriptor> {
        self.members.iter().find(|m| m.name == name)
    }
}

/// Registry of every type the inventory references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<TypeDescriptor>", into = "Vec<TypeDescriptor>")]
pub struct TypeRegistry {
    types: BTreeMap<String, TypeDescriptor>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        let types = BUILTIN_PRIMITIVES
            .iter()
            .map(|(key, xml)| ((*key).to_string(), TypeDescriptor::primitive(*key, *xml)))
            .collect();
        Self { types }
    }
}

impl TypeRegistry {
    /// A registry holding only the built-in primitives.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a type.
    pub fn register(&mut self, descriptor: TypeDescriptor) -> &mut Self {
        self.types.insert(descriptor.key.clone(), descriptor);
        self
    }

    /// Look up a type by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&TypeDescriptor> {
        self.types.get(key)
    }

    /// Look up a type by key, failing on unknown keys.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::UnknownType`] if `key` is not registered.
    pub fn resolve(&self, key: &str) -> Result<&TypeDescriptor> {
        self.get(key)
            .ok_or_else(|| SpecError::UnknownType(key.to_string()))
    }

    /// Number of registered types, primitives included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether nothing at all is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Name a field renders with: the element name, `ArrayOf`-prefixed for
    /// lists.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::UnknownType`] if the element is not registered.
    pub fn xml_name(&self, field: &FieldType) -> Result<String> {
        let element = self.resolve(&field.type_key)?.xml_name();
        if field.list {
            let mut chars = element.chars();
            let capitalized: String = chars
                .next()
                .map(|first| first.to_uppercase().chain(chars).collect())
                .unwrap_or_default();
            Ok(format!("ArrayOf{capitalized}"))
        } else {
            Ok(element.to_string())
        }
    }
}

impl From<Vec<TypeDescriptor>> for TypeRegistry {
    fn from(descriptors: Vec<TypeDescriptor>) -> Self {
        let mut registry = Self::default();
        for descriptor in descriptors {
            registry.register(descriptor);
        }
        registry
    }
}

impl From<TypeRegistry> for Vec<TypeDescriptor> {
    fn from(registry: TypeRegistry) -> Self {
        registry
            .types
            .into_values()
            .filter(|t| t.kind != TypeKind::Primitive)
            .collect()
    }
}
