//! Endpoint inventory supplied by the host framework.
//!
//! An [`Inventory`] is an immutable snapshot: the routed endpoints, the
//! registry of types they reference, and the module/resource declarations
//! that group handlers by namespace. Handler identities use Rust-style paths
//! (`orders::OrdersHandler`), and a handler's namespace is everything before
//! its last `::`.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::metadata::{FieldType, TypeRegistry};

/// `{name}` or `{name*}` segments of a route pattern.
static ROUTE_PARAMETER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\*?\}").expect("route parameter pattern is valid")
});

/// Namespace separator in handler type paths.
pub const NAMESPACE_SEPARATOR: &str = "::";

/// Identity of the code that handles an endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HandlerId {
    /// Fully qualified handler type, e.g. `orders::OrdersHandler`.
    pub handler_type: String,
    /// Handler method name, e.g. `get_order`.
    pub method: String,
}

impl HandlerId {
    /// Identity of `handler_type.method`.
    pub fn new(handler_type: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            handler_type: handler_type.into(),
            method: method.into(),
        }
    }

    /// Namespace of the handler type; empty for a top-level type.
    #[must_use]
    pub fn namespace(&self) -> &str {
        self.handler_type
            .rsplit_once(NAMESPACE_SEPARATOR)
            .map_or("", |(namespace, _)| namespace)
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.handler_type, self.method)
    }
}

/// Route an endpoint is reachable on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Pattern with `{name}` parameters, e.g. `orders/{id}`.
    pub pattern: String,

    /// Allowed HTTP methods in declaration order.
    #[serde(default)]
    pub methods: Vec<String>,

    /// Declared parameter names; derived from the pattern when empty.
    #[serde(default)]
    pub parameters: Vec<String>,
}

impl Route {
    /// A route on `pattern` allowing `methods`.
    pub fn new(pattern: impl Into<String>, methods: &[&str]) -> Self {
        Self {
            pattern: pattern.into(),
            methods: methods.iter().map(|m| (*m).to_string()).collect(),
            parameters: Vec::new(),
        }
    }

    /// First declared method.
    #[must_use]
    pub fn primary_method(&self) -> Option<&str> {
        self.methods.first().map(String::as_str)
    }

    /// Whether `method` is allowed, ignoring case.
    #[must_use]
    pub fn allows(&self, method: &str) -> bool {
        self.methods.iter().any(|m| m.eq_ignore_ascii_case(method))
    }

    /// Whether a request on this route can carry a body.
    #[must_use]
    pub fn allows_body(&self) -> bool {
        self.allows("POST") || self.allows("PUT")
    }

    /// Declared parameter names, or the `{name}` segments of the pattern.
    #[must_use]
    pub fn parameter_names(&self) -> Vec<String> {
        if !self.parameters.is_empty() {
            return self.parameters.clone();
        }
        ROUTE_PARAMETER
            .captures_iter(&self.pattern)
            .map(|c| c[1].to_string())
            .collect()
    }

    /// Whether `name` is one of this route's parameters, compared exactly.
    #[must_use]
    pub fn has_parameter(&self, name: &str) -> bool {
        self.parameter_names().iter().any(|p| p == name)
    }

    /// First literal (non-parameter) segment of the pattern.
    #[must_use]
    pub fn first_segment(&self) -> Option<&str> {
        self.pattern
            .split('/')
            .find(|s| !s.is_empty() && !ROUTE_PARAMETER.is_match(s))
    }
}

/// Description attached to an endpoint at registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointAnnotation {
    /// Display name.
    pub name: Option<String>,
    /// Comments.
    pub comments: Option<String>,
    /// Comments for the request payload.
    pub request_comments: Option<String>,
    /// Comments for the response payload.
    pub response_comments: Option<String>,
}

/// Resource an endpoint explicitly belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceAnnotation {
    /// Resource name; endpoints naming the same resource are grouped.
    pub name: String,
    /// Comments.
    #[serde(default)]
    pub comments: Option<String>,
}

/// A status code an endpoint documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCodeAnnotation {
    /// Numeric status.
    pub code: u16,
    /// Short name, e.g. `Not Found`.
    #[serde(default)]
    pub name: Option<String>,
    /// Comments.
    #[serde(default)]
    pub comments: Option<String>,
}

/// Direction of a documented header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderKind {
    /// Sent by the caller.
    Request,
    /// Returned to the caller.
    Response,
}

impl fmt::Display for HeaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request => write!(f, "request"),
            Self::Response => write!(f, "response"),
        }
    }
}

/// A header an endpoint documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderAnnotation {
    /// Direction.
    pub kind: HeaderKind,
    /// Header name.
    pub name: String,
    /// Comments.
    #[serde(default)]
    pub comments: Option<String>,
    /// Whether the header may be omitted.
    #[serde(default)]
    pub optional: bool,
}

/// One routed operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointDescriptor {
    /// Handler identity.
    pub handler: HandlerId,

    /// Route.
    pub route: Route,

    /// Input payload type.
    #[serde(default)]
    pub input: Option<FieldType>,

    /// Output payload type.
    #[serde(default)]
    pub output: Option<FieldType>,

    /// The handler method is hidden.
    #[serde(default)]
    pub hidden: bool,

    /// The whole handler type is hidden.
    #[serde(default)]
    pub handler_hidden: bool,

    /// Endpoint description.
    #[serde(default)]
    pub annotation: Option<EndpointAnnotation>,

    /// Explicit resource.
    #[serde(default)]
    pub resource: Option<ResourceAnnotation>,

    /// Documented status codes.
    #[serde(default)]
    pub status_codes: Vec<StatusCodeAnnotation>,

    /// Documented headers.
    #[serde(default)]
    pub headers: Vec<HeaderAnnotation>,
}

impl EndpointDescriptor {
    /// A visible endpoint with no payloads or annotations.
    #[must_use]
    pub const fn new(handler: HandlerId, route: Route) -> Self {
        Self {
            handler,
            route,
            input: None,
            output: None,
            hidden: false,
            handler_hidden: false,
            annotation: None,
            resource: None,
            status_codes: Vec::new(),
            headers: Vec::new(),
        }
    }

    /// Set the input payload.
    #[must_use]
    pub fn with_input(mut self, input: FieldType) -> Self {
        self.input = Some(input);
        self
    }

    /// Set the output payload.
    #[must_use]
    pub fn with_output(mut self, output: FieldType) -> Self {
        self.output = Some(output);
        self
    }

    /// Place in an explicit resource.
    #[must_use]
    pub fn in_resource(mut self, name: impl Into<String>) -> Self {
        self.resource = Some(ResourceAnnotation {
            name: name.into(),
            comments: None,
        });
        self
    }

    /// Whether the endpoint is hidden through its method or its handler type.
    #[inline]
    #[must_use]
    pub const fn is_hidden(&self) -> bool {
        self.hidden || self.handler_hidden
    }
}

/// A module declared for a namespace and everything below it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDeclaration {
    /// Namespace, e.g. `shop::orders`.
    pub namespace: String,
    /// Module name.
    pub name: String,
    /// Comments.
    #[serde(default)]
    pub comments: Option<String>,
}

/// A resource declared for a namespace and everything below it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDeclaration {
    /// Namespace, e.g. `shop::orders::lines`.
    pub namespace: String,
    /// Resource name.
    pub name: String,
    /// Comments.
    #[serde(default)]
    pub comments: Option<String>,
}

/// Whether `namespace` is `declared` or nested inside it.
#[must_use]
pub fn namespace_contains(declared: &str, namespace: &str) -> bool {
    declared.is_empty()
        || namespace == declared
        || namespace
            .strip_prefix(declared)
            .is_some_and(|rest| rest.starts_with(NAMESPACE_SEPARATOR))
}

/// Immutable snapshot consumed by one generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    /// Registered types.
    #[serde(default)]
    pub types: TypeRegistry,

    /// Module declarations.
    #[serde(default)]
    pub modules: Vec<ModuleDeclaration>,

    /// Resource declarations.
    #[serde(default)]
    pub resources: Vec<ResourceDeclaration>,

    /// Routed endpoints in host order.
    #[serde(default)]
    pub endpoints: Vec<EndpointDescriptor>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_namespace() {
        let handler = HandlerId::new("shop::orders::OrdersHandler", "get");
        assert_eq!(handler.namespace(), "shop::orders");
        assert_eq!(handler.to_string(), "shop::orders::OrdersHandler.get");

        assert_eq!(HandlerId::new("Root", "get").namespace(), "");
    }

    #[test]
    fn test_parameter_names_from_pattern() {
        let route = Route::new("orders/{order_id}/lines/{line*}", &["GET"]);
        assert_eq!(route.parameter_names(), vec!["order_id", "line"]);
        assert!(route.has_parameter("order_id"));
        assert!(!route.has_parameter("ORDER_ID"));
        assert!(!route.has_parameter("orders"));
    }

    #[test]
    fn test_declared_parameters_win() {
        let mut route = Route::new("orders/{id}", &["GET"]);
        route.parameters = vec!["order".into()];
        assert_eq!(route.parameter_names(), vec!["order"]);
    }

    #[test]
    fn test_allows_ignores_case() {
        let route = Route::new("orders", &["get", "Post"]);
        assert!(route.allows("GET"));
        assert!(route.allows("post"));
        assert!(route.allows_body());
        assert_eq!(route.primary_method(), Some("get"));
    }

    #[test]
    fn test_first_segment_skips_parameters() {
        assert_eq!(Route::new("/{tenant}/orders/{id}", &[]).first_segment(), Some("orders"));
        assert_eq!(Route::new("/", &[]).first_segment(), None);
    }

    #[test]
    fn test_namespace_contains() {
        assert!(namespace_contains("shop", "shop"));
        assert!(namespace_contains("shop", "shop::orders"));
        assert!(!namespace_contains("shop", "shopping::orders"));
        assert!(namespace_contains("", "anything"));
    }

    #[test]
    fn test_inventory_deserialization() {
        let json = r#"{
            "types": [
                { "key": "orders::Order", "name": "Order", "kind": "complex",
                  "members": [{ "name": "id", "type": "i64" }] }
            ],
            "modules": [{ "namespace": "orders", "name": "Orders" }],
            "endpoints": [{
                "handler": { "handler_type": "orders::OrdersHandler", "method": "get" },
                "route": { "pattern": "orders/{id}", "methods": ["GET"] },
                "output": { "type": "orders::Order" }
            }]
        }"#;
        let inventory: Inventory = serde_json::from_str(json).unwrap();
        assert_eq!(inventory.endpoints.len(), 1);
        assert!(inventory.types.get("orders::Order").is_some());
        assert!(inventory.resources.is_empty());
    }
}
