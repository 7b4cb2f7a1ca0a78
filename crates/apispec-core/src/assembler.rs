//! Convention, default and override resolution for document nodes.
//!
//! Every node goes through the same three stages: the kind's convention is
//! asked for a description, missing fields are filled from the descriptor
//! itself, and the caller's override chain has the last word.

use std::cmp::Ordering;

use crate::config::EnumValue;
use crate::error::Result;
use crate::inventory::EndpointDescriptor;
use crate::metadata::{FieldType, MemberDescriptor, TypeDescriptor, TypeKind, TypeRegistry};
use crate::model::{Data, EnumOption, Header, Member, StatusCode, Type};
use crate::options::SpecificationOptions;
use crate::type_graph::{effective_type, member_type, TypeContext};

/// Builds description-bearing nodes from registry metadata.
#[derive(Debug, Clone, Copy)]
pub struct DescriptionAssembler<'a> {
    registry: &'a TypeRegistry,
    options: &'a SpecificationOptions,
}

impl<'a> DescriptionAssembler<'a> {
    /// Assembler over `registry` with `options`.
    #[must_use]
    pub const fn new(registry: &'a TypeRegistry, options: &'a SpecificationOptions) -> Self {
        Self { registry, options }
    }

    /// The registry descriptors are resolved against.
    #[must_use]
    pub const fn registry(&self) -> &'a TypeRegistry {
        self.registry
    }

    /// The generation options.
    #[must_use]
    pub const fn options(&self) -> &'a SpecificationOptions {
        self.options
    }

    /// Catalog entry for a discovered type.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SpecError::UnknownType`] if a member names an
    /// unregistered type.
    pub fn describe_type(&self, context: &TypeContext<'_>) -> Result<Type> {
        let ty = context.ty;
        let description = self.options.conventions.types.describe(ty).unwrap_or_default();
        let node = Type {
            id: self.options.scoped_type_id(ty, context.handler()),
            name: description.name.unwrap_or_else(|| ty.name.clone()),
            comments: description.comments,
            members: self.members(ty, context.scope)?,
        };
        Ok(self.options.overrides.types.apply(ty, node))
    }

    /// Documented members of `ty` in declaration order.
    ///
    /// When `scope` is set, members bound from that endpoint's URL or
    /// querystring are left out: they are documented as parameters.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SpecError::UnknownType`] if a member names an
    /// unregistered type.
    pub fn members(
        &self,
        ty: &TypeDescriptor,
        scope: Option<&EndpointDescriptor>,
    ) -> Result<Vec<Member>> {
        let mut members = Vec::with_capacity(ty.members.len());
        for member in &ty.members {
            if member.hidden || member.auto_bound {
                continue;
            }
            if scope.is_some_and(|endpoint| is_bound_from_request_line(endpoint, member)) {
                continue;
            }
            let member_ty = member_type(self.registry, &self.options.conventions, member)?;
            if member_ty.hidden {
                continue;
            }
            members.push(self.member(member, member_ty));
        }
        Ok(members)
    }

    fn member(&self, member: &MemberDescriptor, member_ty: &TypeDescriptor) -> Member {
        let description = self.options.conventions.members.describe(member).unwrap_or_default();
        let type_name = if member_ty.is_simple() {
            member_ty.xml_name().to_string()
        } else {
            self.options.type_id(member_ty)
        };
        let node = Member {
            name: description.name.unwrap_or_else(|| member.name.clone()),
            comments: description.comments,
            default_value: description
                .default_value
                .map(|value| self.default_value(member_ty, value)),
            required: description.required.unwrap_or(false),
            type_name,
            is_array: member.field_type.list,
            array_item_name: description.array_item_name,
            options: self.options_of(member_ty),
        };
        self.options.overrides.members.apply(member, node)
    }

    /// Render a default value; enum defaults follow the emission mode.
    #[must_use]
    pub fn default_value(&self, ty: &TypeDescriptor, value: String) -> String {
        if ty.kind != TypeKind::Enum || self.options.settings.enum_value == EnumValue::Name {
            return value;
        }
        ty.options
            .iter()
            .find(|o| o.name == value)
            .map_or(value, |o| o.value.to_string())
    }

    /// Visible options of an enum, sorted by name then value; empty for
    /// anything else.
    #[must_use]
    pub fn options_of(&self, ty: &TypeDescriptor) -> Vec<EnumOption> {
        if ty.kind != TypeKind::Enum {
            return Vec::new();
        }
        let mode = self.options.settings.enum_value;
        let mut options: Vec<EnumOption> = ty
            .options
            .iter()
            .filter(|o| !o.hidden)
            .map(|option| {
                let description = self.options.conventions.options.describe(option).unwrap_or_default();
                let node = EnumOption {
                    name: description.name,
                    comments: description.comments,
                    value: match mode {
                        EnumValue::Name => option.name.clone(),
                        EnumValue::Literal => option.value.to_string(),
                    },
                };
                self.options.overrides.options.apply(option, node)
            })
            .collect();
        options.sort_by(compare_options);
        options
    }

    /// Documented status codes, sorted by code.
    #[must_use]
    pub fn status_codes(&self, endpoint: &EndpointDescriptor) -> Vec<StatusCode> {
        let mut codes: Vec<StatusCode> = self
            .options
            .conventions
            .status_codes
            .describe(endpoint)
            .unwrap_or_default()
            .into_iter()
            .map(|d| {
                let node = StatusCode {
                    code: d.code,
                    name: d.name,
                    comments: d.comments,
                };
                self.options.overrides.status_codes.apply(endpoint, node)
            })
            .collect();
        codes.sort_by_key(|c| c.code);
        codes
    }

    /// Documented headers, sorted by kind then name.
    #[must_use]
    pub fn headers(&self, endpoint: &EndpointDescriptor) -> Vec<Header> {
        let mut headers: Vec<Header> = self
            .options
            .conventions
            .headers
            .describe(endpoint)
            .unwrap_or_default()
            .into_iter()
            .map(|d| {
                let node = Header {
                    kind: d.kind.to_string(),
                    name: d.name,
                    comments: d.comments,
                    optional: d.optional,
                };
                self.options.overrides.headers.apply(endpoint, node)
            })
            .collect();
        headers.sort_by(|a, b| a.kind.cmp(&b.kind).then_with(|| a.name.cmp(&b.name)));
        headers
    }

    /// Payload reference for `field`, scoped to `scope` when it is a
    /// request. Hidden payload types produce no reference.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SpecError::UnknownType`] if the payload type is not
    /// registered.
    pub fn data(
        &self,
        field: &FieldType,
        comments: Option<String>,
        scope: Option<&EndpointDescriptor>,
    ) -> Result<Option<Data>> {
        let ty = effective_type(self.registry, &self.options.conventions, &field.type_key)?;
        if ty.hidden {
            return Ok(None);
        }
        let (name, type_id) = if ty.is_simple() {
            (ty.xml_name().to_string(), ty.xml_name().to_string())
        } else {
            let description = self.options.conventions.types.describe(ty).unwrap_or_default();
            (
                description.name.unwrap_or_else(|| ty.name.clone()),
                self.options.scoped_type_id(ty, scope.map(|e| &e.handler)),
            )
        };
        Ok(Some(Data {
            name,
            comments,
            type_id,
            is_array: field.list,
        }))
    }
}

/// Whether an input member is documented as a URL or querystring parameter
/// of `endpoint` rather than as a body member.
pub(crate) fn is_bound_from_request_line(
    endpoint: &EndpointDescriptor,
    member: &MemberDescriptor,
) -> bool {
    member.querystring || member.url_parameter || endpoint.route.has_parameter(&member.name)
}

fn compare_options(a: &EnumOption, b: &EnumOption) -> Ordering {
    let key = |o: &EnumOption| o.name.clone().unwrap_or_else(|| o.value.clone());
    key(a).cmp(&key(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpecificationConfig;
    use crate::inventory::{HandlerId, HeaderAnnotation, HeaderKind, Route, StatusCodeAnnotation};
    use crate::metadata::{EnumOptionDescriptor, MemberAnnotation, OptionAnnotation, TypeAnnotation};

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        let mut archived = EnumOptionDescriptor::new("Archived", 9);
        archived.hidden = true;
        let mut closed = EnumOptionDescriptor::new("Closed", 2);
        closed.annotation = Some(OptionAnnotation {
            name: Some("Done".into()),
            comments: None,
        });
        registry
            .register(TypeDescriptor::enumeration(
                "Status",
                "Status",
                vec![EnumOptionDescriptor::new("Open", 1), closed, archived],
            ))
            .register(TypeDescriptor::complex(
                "Order",
                "Order",
                vec![
                    MemberDescriptor::new("id", FieldType::new("i64")),
                    MemberDescriptor::new("status", FieldType::new("Status")).annotated(
                        MemberAnnotation {
                            default_value: Some("Open".into()),
                            required: Some(true),
                            ..MemberAnnotation::default()
                        },
                    ),
                    MemberDescriptor::new("page", FieldType::new("i32")).querystring(),
                    MemberDescriptor::new("lines", FieldType::list_of("Line")).annotated(
                        MemberAnnotation {
                            array_item_name: Some("line".into()),
                            ..MemberAnnotation::default()
                        },
                    ),
                    MemberDescriptor::new("audit", FieldType::new("Audit")),
                    MemberDescriptor::new("note", FieldType::new("string")).hidden(),
                    MemberDescriptor::new("user", FieldType::new("string")).auto_bound(),
                ],
            ))
            .register(
                TypeDescriptor::complex("Line", "Line", vec![]).annotated(TypeAnnotation {
                    name: Some("OrderLine".into()),
                    comments: Some("One line.".into()),
                    substitute: None,
                }),
            )
            .register(TypeDescriptor::complex("Audit", "Audit", vec![]).hidden());
        registry
    }

    fn endpoint() -> EndpointDescriptor {
        EndpointDescriptor::new(
            HandlerId::new("shop::OrdersHandler", "put"),
            Route::new("orders/{id}", &["PUT"]),
        )
    }

    fn names(members: &[Member]) -> Vec<&str> {
        members.iter().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn test_members_skip_hidden_and_auto_bound() {
        let registry = registry();
        let options = SpecificationOptions::default();
        let assembler = DescriptionAssembler::new(&registry, &options);
        let order = registry.resolve("Order").unwrap();

        let members = assembler.members(order, None).unwrap();
        assert_eq!(names(&members), vec!["id", "status", "page", "lines"]);

        let status = &members[1];
        assert_eq!(status.type_name, "Status");
        assert!(status.required);
        assert_eq!(status.default_value.as_deref(), Some("Open"));

        let lines = &members[3];
        assert_eq!(lines.type_name, "Line");
        assert!(lines.is_array);
        assert_eq!(lines.array_item_name.as_deref(), Some("line"));
        assert!(!members[0].required);
        assert_eq!(members[0].type_name, "long");
    }

    #[test]
    fn test_scoped_members_skip_request_line_parameters() {
        let registry = registry();
        let options = SpecificationOptions::default();
        let assembler = DescriptionAssembler::new(&registry, &options);
        let order = registry.resolve("Order").unwrap();
        let endpoint = endpoint();

        let members = assembler.members(order, Some(&endpoint)).unwrap();
        assert_eq!(names(&members), vec!["status", "lines"]);
    }

    #[test]
    fn test_options_in_name_mode() {
        let registry = registry();
        let options = SpecificationOptions::default();
        let assembler = DescriptionAssembler::new(&registry, &options);

        let rendered = assembler.options_of(registry.resolve("Status").unwrap());
        let values: Vec<&str> = rendered.iter().map(|o| o.value.as_str()).collect();
        // "Done" (Closed) sorts before "Open", and Archived is hidden
        assert_eq!(values, vec!["Closed", "Open"]);
        assert_eq!(rendered[0].name.as_deref(), Some("Done"));
        assert!(rendered[1].name.is_none());
    }

    #[test]
    fn test_options_and_defaults_in_literal_mode() {
        let registry = registry();
        let options = SpecificationOptions::new(SpecificationConfig::default())
            .with_enum_value(EnumValue::Literal);
        let assembler = DescriptionAssembler::new(&registry, &options);
        let status = registry.resolve("Status").unwrap();

        let values: Vec<String> = assembler
            .options_of(status)
            .into_iter()
            .map(|o| o.value)
            .collect();
        // Unnamed options sort by their rendered value
        assert_eq!(values, vec!["1", "2"]);
        assert_eq!(assembler.default_value(status, "Open".into()), "1");

        let members = assembler
            .members(registry.resolve("Order").unwrap(), None)
            .unwrap();
        assert_eq!(members[1].default_value.as_deref(), Some("1"));
    }

    #[test]
    fn test_type_override_is_applied_last() {
        let registry = registry();
        let mut options = SpecificationOptions::default();
        options.overrides.types.push(|source, mut ty| {
            if source.key == "Line" {
                ty.name = "Renamed".into();
            }
            ty
        });
        let assembler = DescriptionAssembler::new(&registry, &options);
        let line = registry.resolve("Line").unwrap();

        let entry = assembler
            .describe_type(&TypeContext {
                ty: line,
                scope: None,
            })
            .unwrap();
        assert_eq!(entry.id, "Line");
        assert_eq!(entry.name, "Renamed");
        assert_eq!(entry.comments.as_deref(), Some("One line."));
    }

    #[test]
    fn test_scoped_type_id() {
        let registry = registry();
        let options = SpecificationOptions::default();
        let assembler = DescriptionAssembler::new(&registry, &options);
        let endpoint = endpoint();

        let entry = assembler
            .describe_type(&TypeContext {
                ty: registry.resolve("Order").unwrap(),
                scope: Some(&endpoint),
            })
            .unwrap();
        assert_eq!(entry.id, "Order:shop::OrdersHandler.put");
    }

    #[test]
    fn test_status_codes_and_headers_are_sorted() {
        let registry = registry();
        let options = SpecificationOptions::default();
        let assembler = DescriptionAssembler::new(&registry, &options);
        let mut endpoint = endpoint();
        endpoint.status_codes = vec![
            StatusCodeAnnotation {
                code: 404,
                name: Some("Not Found".into()),
                comments: None,
            },
            StatusCodeAnnotation {
                code: 201,
                name: Some("Created".into()),
                comments: None,
            },
        ];
        let header = |kind, name: &str| HeaderAnnotation {
            kind,
            name: name.into(),
            comments: None,
            optional: false,
        };
        endpoint.headers = vec![
            header(HeaderKind::Response, "ETag"),
            header(HeaderKind::Request, "If-Match"),
            header(HeaderKind::Request, "Accept"),
        ];

        let codes: Vec<u16> = assembler.status_codes(&endpoint).iter().map(|c| c.code).collect();
        assert_eq!(codes, vec![201, 404]);

        let headers: Vec<String> = assembler
            .headers(&endpoint)
            .into_iter()
            .map(|h| format!("{}:{}", h.kind, h.name))
            .collect();
        assert_eq!(
            headers,
            vec!["request:Accept", "request:If-Match", "response:ETag"]
        );
    }

    #[test]
    fn test_data_references() {
        let registry = registry();
        let options = SpecificationOptions::default();
        let assembler = DescriptionAssembler::new(&registry, &options);
        let endpoint = endpoint();

        let request = assembler
            .data(&FieldType::new("Order"), Some("The order.".into()), Some(&endpoint))
            .unwrap()
            .unwrap();
        assert_eq!(request.type_id, "Order:shop::OrdersHandler.put");
        assert_eq!(request.name, "Order");

        let lines = assembler
            .data(&FieldType::list_of("Line"), None, None)
            .unwrap()
            .unwrap();
        assert_eq!(lines.type_id, "Line");
        assert_eq!(lines.name, "OrderLine");
        assert!(lines.is_array);

        let text = assembler
            .data(&FieldType::new("string"), None, None)
            .unwrap()
            .unwrap();
        assert_eq!(text.type_id, "string");

        assert!(assembler
            .data(&FieldType::new("Audit"), None, None)
            .unwrap()
            .is_none());
    }
}
