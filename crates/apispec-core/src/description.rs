//! Description conventions.
//!
//! A convention looks up the description of one entity kind from its
//! source metadata. Every lookup may come back empty, or with some fields
//! missing; the assemblers fill the gaps with structural defaults.

use std::fmt;

use crate::inventory::{
    namespace_contains, EndpointDescriptor, HeaderKind, ModuleDeclaration, ResourceDeclaration,
};
use crate::metadata::{EnumOptionDescriptor, MemberDescriptor, TypeDescriptor};

/// Lookup of a description for a source of type `S`.
pub trait DescriptionConvention<S: ?Sized> {
    /// Description produced for a source.
    type Description;

    /// Describe `source`, or `None` when nothing is known about it.
    fn describe(&self, source: &S) -> Option<Self::Description>;
}

/// A boxed convention for sources of type `S` producing `D`.
pub type BoxedConvention<S, D> = Box<dyn DescriptionConvention<S, Description = D> + Send + Sync>;

/// The convention used for each entity kind.
///
/// Module and resource conventions default to the declarations carried by
/// the inventory being generated ([`ModuleConvention`] and
/// [`ResourceConvention`]); setting one replaces the declaration lookup
/// entirely.
pub struct Conventions {
    /// Module lookup; `None` uses the inventory's module declarations.
    pub modules: Option<BoxedConvention<EndpointDescriptor, ModuleDescription>>,
    /// Resource lookup; `None` uses annotations and the inventory's resource
    /// declarations.
    pub resources: Option<BoxedConvention<EndpointDescriptor, ResourceDescription>>,
    /// Endpoint descriptions.
    pub endpoints: BoxedConvention<EndpointDescriptor, EndpointDescription>,
    /// Type descriptions and substitutions.
    pub types: BoxedConvention<TypeDescriptor, TypeDescription>,
    /// Member descriptions and substitutions.
    pub members: BoxedConvention<MemberDescriptor, MemberDescription>,
    /// Enum option descriptions.
    pub options: BoxedConvention<EnumOptionDescriptor, OptionDescription>,
    /// Documented status codes.
    pub status_codes: BoxedConvention<EndpointDescriptor, Vec<StatusCodeDescription>>,
    /// Documented headers.
    pub headers: BoxedConvention<EndpointDescriptor, Vec<HeaderDescription>>,
}

impl Default for Conventions {
    fn default() -> Self {
        Self {
            modules: None,
            resources: None,
            endpoints: Box::new(EndpointConvention),
            types: Box::new(TypeConvention),
            members: Box::new(MemberConvention),
            options: Box::new(OptionConvention),
            status_codes: Box::new(StatusCodeConvention),
            headers: Box::new(HeaderConvention),
        }
    }
}

impl fmt::Debug for Conventions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Conventions")
            .field("custom_modules", &self.modules.is_some())
            .field("custom_resources", &self.resources.is_some())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// DESCRIPTIONS
// =============================================================================

/// A module as found by convention or default factory.
///
/// `key` identifies the grouping: endpoints with equal keys share a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDescription {
    /// Grouping identity.
    pub key: String,
    /// Display name.
    pub name: String,
    /// Comments.
    pub comments: Option<String>,
}

impl ModuleDescription {
    /// A module grouped under `key`.
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            comments: None,
        }
    }
}

/// A resource as found by convention or default factory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDescription {
    /// Grouping identity.
    pub key: String,
    /// Display name.
    pub name: String,
    /// Comments.
    pub comments: Option<String>,
}

impl ResourceDescription {
    /// A resource grouped under `key`.
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            comments: None,
        }
    }
}

/// Endpoint description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointDescription {
    /// Display name.
    pub name: Option<String>,
    /// Comments.
    pub comments: Option<String>,
    /// Comments for the request payload.
    pub request_comments: Option<String>,
    /// Comments for the response payload.
    pub response_comments: Option<String>,
}

/// Type description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeDescription {
    /// Display name.
    pub name: Option<String>,
    /// Comments.
    pub comments: Option<String>,
    /// Key of a registered type to describe instead.
    pub substitute: Option<String>,
}

/// Member description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberDescription {
    /// Display name.
    pub name: Option<String>,
    /// Comments.
    pub comments: Option<String>,
    /// Default value as written.
    pub default_value: Option<String>,
    /// Whether the member must be supplied.
    pub required: Option<bool>,
    /// Name of a single item of a list member.
    pub array_item_name: Option<String>,
    /// Key of a registered type to report instead.
    pub substitute: Option<String>,
}

/// Enum option description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionDescription {
    /// Display name.
    pub name: Option<String>,
    /// Comments.
    pub comments: Option<String>,
}

/// Status code description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCodeDescription {
    /// Numeric status.
    pub code: u16,
    /// Short name.
    pub name: Option<String>,
    /// Comments.
    pub comments: Option<String>,
}

/// Header description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderDescription {
    /// Direction.
    pub kind: HeaderKind,
    /// Header name.
    pub name: String,
    /// Comments.
    pub comments: Option<String>,
    /// Whether the header may be omitted.
    pub optional: bool,
}

// =============================================================================
// CONVENTIONS
// =============================================================================

/// Places an endpoint in the module declared for the nearest enclosing
/// namespace of its handler.
#[derive(Debug, Clone, Copy)]
pub struct ModuleConvention<'a> {
    declarations: &'a [ModuleDeclaration],
}

impl<'a> ModuleConvention<'a> {
    /// Convention over `declarations`.
    #[must_use]
    pub const fn new(declarations: &'a [ModuleDeclaration]) -> Self {
        Self { declarations }
    }
}

impl DescriptionConvention<EndpointDescriptor> for ModuleConvention<'_> {
    type Description = ModuleDescription;

    fn describe(&self, endpoint: &EndpointDescriptor) -> Option<ModuleDescription> {
        let namespace = endpoint.handler.namespace();
        self.declarations
            .iter()
            .filter(|d| namespace_contains(&d.namespace, namespace))
            .max_by_key(|d| d.namespace.len())
            .map(|d| ModuleDescription {
                key: format!("module:{}", d.namespace),
                name: d.name.clone(),
                comments: d.comments.clone(),
            })
    }
}

/// Places an endpoint in its explicitly annotated resource, falling back to
/// the resource declared for the nearest enclosing namespace.
#[derive(Debug, Clone, Copy)]
pub struct ResourceConvention<'a> {
    declarations: &'a [ResourceDeclaration],
}

impl<'a> ResourceConvention<'a> {
    /// Convention over `declarations`.
    #[must_use]
    pub const fn new(declarations: &'a [ResourceDeclaration]) -> Self {
        Self { declarations }
    }
}

impl DescriptionConvention<EndpointDescriptor> for ResourceConvention<'_> {
    type Description = ResourceDescription;

    fn describe(&self, endpoint: &EndpointDescriptor) -> Option<ResourceDescription> {
        if let Some(resource) = &endpoint.resource {
            return Some(ResourceDescription {
                key: format!("resource:{}", resource.name),
                name: resource.name.clone(),
                comments: resource.comments.clone(),
            });
        }
        let namespace = endpoint.handler.namespace();
        self.declarations
            .iter()
            .filter(|d| namespace_contains(&d.namespace, namespace))
            .max_by_key(|d| d.namespace.len())
            .map(|d| ResourceDescription {
                key: format!("namespace:{}", d.namespace),
                name: d.name.clone(),
                comments: d.comments.clone(),
            })
    }
}

/// Reads the endpoint annotation.
#[derive(Debug, Clone, Copy, Default)]
pub struct EndpointConvention;

impl DescriptionConvention<EndpointDescriptor> for EndpointConvention {
    type Description = EndpointDescription;

    fn describe(&self, endpoint: &EndpointDescriptor) -> Option<EndpointDescription> {
        endpoint.annotation.as_ref().map(|a| EndpointDescription {
            name: a.name.clone(),
            comments: a.comments.clone(),
            request_comments: a.request_comments.clone(),
            response_comments: a.response_comments.clone(),
        })
    }
}

/// Reads the type annotation.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeConvention;

impl DescriptionConvention<TypeDescriptor> for TypeConvention {
    type Description = TypeDescription;

    fn describe(&self, ty: &TypeDescriptor) -> Option<TypeDescription> {
        ty.annotation.as_ref().map(|a| TypeDescription {
            name: a.name.clone(),
            comments: a.comments.clone(),
            substitute: a.substitute.clone(),
        })
    }
}

/// Reads the member annotation.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemberConvention;

impl DescriptionConvention<MemberDescriptor> for MemberConvention {
    type Description = MemberDescription;

    fn describe(&self, member: &MemberDescriptor) -> Option<MemberDescription> {
        member.annotation.as_ref().map(|a| MemberDescription {
            name: a.name.clone(),
            comments: a.comments.clone(),
            default_value: a.default_value.clone(),
            required: a.required,
            array_item_name: a.array_item_name.clone(),
            substitute: a.substitute.clone(),
        })
    }
}

/// Reads the option annotation.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionConvention;

impl DescriptionConvention<EnumOptionDescriptor> for OptionConvention {
    type Description = OptionDescription;

    fn describe(&self, option: &EnumOptionDescriptor) -> Option<OptionDescription> {
        option.annotation.as_ref().map(|a| OptionDescription {
            name: a.name.clone(),
            comments: a.comments.clone(),
        })
    }
}

/// Reads the documented status codes of an endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusCodeConvention;

impl DescriptionConvention<EndpointDescriptor> for StatusCodeConvention {
    type Description = Vec<StatusCodeDescription>;

    fn describe(&self, endpoint: &EndpointDescriptor) -> Option<Vec<StatusCodeDescription>> {
        if endpoint.status_codes.is_empty() {
            return None;
        }
        Some(
            endpoint
                .status_codes
                .iter()
                .map(|s| StatusCodeDescription {
                    code: s.code,
                    name: s.name.clone(),
                    comments: s.comments.clone(),
                })
                .collect(),
        )
    }
}

/// Reads the documented headers of an endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderConvention;

impl DescriptionConvention<EndpointDescriptor> for HeaderConvention {
    type Description = Vec<HeaderDescription>;

    fn describe(&self, endpoint: &EndpointDescriptor) -> Option<Vec<HeaderDescription>> {
        if endpoint.headers.is_empty() {
            return None;
        }
        Some(
            endpoint
                .headers
                .iter()
                .map(|h| HeaderDescription {
                    kind: h.kind,
                    name: h.name.clone(),
                    comments: h.comments.clone(),
                    optional: h.optional,
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::{HandlerId, Route};
    use crate::metadata::OptionAnnotation;

    fn endpoint(handler_type: &str) -> EndpointDescriptor {
        EndpointDescriptor::new(HandlerId::new(handler_type, "get"), Route::new("x", &["GET"]))
    }

    fn module(namespace: &str, name: &str) -> ModuleDeclaration {
        ModuleDeclaration {
            namespace: namespace.into(),
            name: name.into(),
            comments: None,
        }
    }

    #[test]
    fn test_module_convention_picks_nearest_namespace() {
        let declarations = vec![module("shop", "Shop"), module("shop::orders", "Orders")];
        let convention = ModuleConvention::new(&declarations);

        let found = convention
            .describe(&endpoint("shop::orders::lines::LinesHandler"))
            .unwrap();
        assert_eq!(found.name, "Orders");
        assert_eq!(found.key, "module:shop::orders");

        let found = convention.describe(&endpoint("shop::CartHandler")).unwrap();
        assert_eq!(found.name, "Shop");

        assert!(convention.describe(&endpoint("admin::UsersHandler")).is_none());
    }

    #[test]
    fn test_resource_annotation_wins_over_namespace() {
        let declarations = vec![ResourceDeclaration {
            namespace: "shop::orders".into(),
            name: "Orders".into(),
            comments: Some("Order operations".into()),
        }];
        let convention = ResourceConvention::new(&declarations);

        let plain = endpoint("shop::orders::OrdersHandler");
        let found = convention.describe(&plain).unwrap();
        assert_eq!(found.key, "namespace:shop::orders");
        assert_eq!(found.comments.as_deref(), Some("Order operations"));

        let annotated = endpoint("shop::orders::OrdersHandler").in_resource("Invoices");
        let found = convention.describe(&annotated).unwrap();
        assert_eq!(found.key, "resource:Invoices");
        assert_eq!(found.name, "Invoices");
    }

    #[test]
    fn test_option_convention_defaults_to_nothing() {
        let plain = EnumOptionDescriptor::new("Option1", 1);
        assert!(OptionConvention.describe(&plain).is_none());

        let mut annotated = EnumOptionDescriptor::new("Option2", 0);
        annotated.annotation = Some(OptionAnnotation {
            name: Some("Option 2".into()),
            comments: Some("This is option 2.".into()),
        });
        let found = OptionConvention.describe(&annotated).unwrap();
        assert_eq!(found.name.as_deref(), Some("Option 2"));
        assert_eq!(found.comments.as_deref(), Some("This is option 2."));
    }

    #[test]
    fn test_status_codes_absent_when_undocumented() {
        assert!(StatusCodeConvention.describe(&endpoint("a::H")).is_none());
        assert!(HeaderConvention.describe(&endpoint("a::H")).is_none());
    }
}
