//! The generated specification document.
//!
//! A plain tree with no cross-references other than type identifiers used
//! by [`Member`] and [`Data`] entries. Serializes as camelCase JSON.

use serde::{Deserialize, Serialize};

/// Root of the generated document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Specification {
    /// Specification name.
    pub name: String,

    /// Comments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,

    /// Type catalog, sorted by name.
    #[serde(default)]
    pub types: Vec<Type>,

    /// Modules, sorted by name.
    #[serde(default)]
    pub modules: Vec<Module>,

    /// Resources owned by no module, sorted by name.
    #[serde(default)]
    pub resources: Vec<Resource>,
}

impl Specification {
    /// Look up a catalog entry by id.
    #[must_use]
    pub fn type_by_id(&self, id: &str) -> Option<&Type> {
        self.types.iter().find(|t| t.id == id)
    }

    /// Every endpoint in the document, module resources first.
    pub fn endpoints(&self) -> impl Iterator<Item = &Endpoint> {
        self.modules
            .iter()
            .flat_map(|m| m.resources.iter())
            .chain(self.resources.iter())
            .flat_map(|r| r.endpoints.iter())
    }
}

/// A group of resources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    /// Name.
    pub name: String,
    /// Comments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    /// Owned resources, sorted by name.
    #[serde(default)]
    pub resources: Vec<Resource>,
}

/// A group of endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Name.
    pub name: String,
    /// Comments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    /// Owned endpoints, sorted by path then verb rank.
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
}

/// One documented operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    /// Name.
    pub name: String,
    /// Comments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    /// Path plus querystring template.
    pub url: String,
    /// Primary HTTP method.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Parameters bound from the path.
    #[serde(default)]
    pub url_parameters: Vec<UrlParameter>,
    /// Parameters bound from the querystring.
    #[serde(default)]
    pub querystring_parameters: Vec<QuerystringParameter>,
    /// Documented status codes.
    #[serde(default)]
    pub status_codes: Vec<StatusCode>,
    /// Documented headers.
    #[serde(default)]
    pub headers: Vec<Header>,
    /// Request payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<Data>,
    /// Response payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Data>,
}

impl Endpoint {
    /// URL with the querystring template stripped.
    #[must_use]
    pub fn path(&self) -> &str {
        self.url.split('?').next().unwrap_or_default()
    }
}

/// A catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Type {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Comments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    /// Members in declaration order.
    #[serde(default)]
    pub members: Vec<Member>,
}

/// A member of a catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Name.
    pub name: String,
    /// Comments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    /// Default value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    /// Whether the member must be supplied.
    #[serde(default)]
    pub required: bool,
    /// Type name for primitives and enums, type id otherwise.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Whether the member is a list.
    #[serde(default)]
    pub is_array: bool,
    /// Name of a single item when the member is a list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array_item_name: Option<String>,
    /// Options when the member is an enum.
    #[serde(default)]
    pub options: Vec<EnumOption>,
}

/// A parameter bound from the path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlParameter {
    /// Name.
    pub name: String,
    /// Comments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    /// Type name.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Options when the parameter is an enum.
    #[serde(default)]
    pub options: Vec<EnumOption>,
}

/// A parameter bound from the querystring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuerystringParameter {
    /// Name.
    pub name: String,
    /// Comments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    /// Element type name.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Options when the parameter is an enum.
    #[serde(default)]
    pub options: Vec<EnumOption>,
    /// Default value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    /// Whether the parameter may repeat.
    #[serde(default)]
    pub multiple_allowed: bool,
    /// Whether the parameter must be supplied.
    #[serde(default)]
    pub required: bool,
}

/// A documented status code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCode {
    /// Numeric code.
    pub code: u16,
    /// Short name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Comments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

/// A documented header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Header {
    /// `request` or `response`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Header name.
    pub name: String,
    /// Comments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    /// Whether the header may be omitted.
    #[serde(default)]
    pub optional: bool,
}

/// An enum option.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumOption {
    /// Display name, when documented.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Comments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    /// Declared name or literal value, per the enum emission mode.
    pub value: String,
}

/// A request or response payload reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Data {
    /// Display name.
    pub name: String,
    /// Comments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    /// Type identifier.
    #[serde(rename = "type")]
    pub type_id: String,
    /// Whether the payload is a list.
    #[serde(default)]
    pub is_array: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_path_strips_querystring() {
        let endpoint = Endpoint {
            url: "/orders?page={page}&size={size}".into(),
            ..Endpoint::default()
        };
        assert_eq!(endpoint.path(), "/orders");
    }

    #[test]
    fn test_serialization_is_camel_case() {
        let member = Member {
            name: "lines".into(),
            type_name: "orders::Line".into(),
            is_array: true,
            array_item_name: Some("line".into()),
            ..Member::default()
        };
        let json = serde_json::to_string(&member).unwrap();
        assert!(json.contains("\"isArray\":true"));
        assert!(json.contains("\"arrayItemName\":\"line\""));
        assert!(json.contains("\"type\":\"orders::Line\""));
        assert!(!json.contains("defaultValue"));
    }

    #[test]
    fn test_endpoints_iterates_modules_then_root() {
        let endpoint = |url: &str| Endpoint {
            url: url.into(),
            ..Endpoint::default()
        };
        let spec = Specification {
            modules: vec![Module {
                name: "Orders".into(),
                comments: None,
                resources: vec![Resource {
                    name: "orders".into(),
                    comments: None,
                    endpoints: vec![endpoint("/orders")],
                }],
            }],
            resources: vec![Resource {
                name: "health".into(),
                comments: None,
                endpoints: vec![endpoint("/health")],
            }],
            ..Specification::default()
        };
        let urls: Vec<_> = spec.endpoints().map(|e| e.url.as_str()).collect();
        assert_eq!(urls, vec!["/orders", "/health"]);
    }
}
