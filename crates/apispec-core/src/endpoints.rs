//! Endpoint assembly and ordering.

use crate::assembler::DescriptionAssembler;
use crate::error::{Result, SpecError};
use crate::inventory::EndpointDescriptor;
use crate::metadata::{FieldType, MemberDescriptor, TypeDescriptor};
use crate::model::{Endpoint, QuerystringParameter, UrlParameter};
use crate::type_graph::{effective_type, member_type};

/// Ordering weight of an HTTP method, ignoring case.
///
/// `GET` sorts first and `DELETE` last; unknown or missing methods sit just
/// before `DELETE`.
#[must_use]
pub fn verb_rank(method: Option<&str>) -> u8 {
    let Some(method) = method else { return 4 };
    match method.to_ascii_lowercase().as_str() {
        "get" => 0,
        "post" => 1,
        "put" => 2,
        "update" => 3,
        "delete" => 5,
        _ => 4,
    }
}

/// Sort endpoints by path, then by verb rank. Ties keep their order.
pub fn sort_endpoints(endpoints: &mut [Endpoint]) {
    endpoints.sort_by(|a, b| {
        a.path()
            .cmp(b.path())
            .then_with(|| verb_rank(a.method.as_deref()).cmp(&verb_rank(b.method.as_deref())))
    });
}

/// Builds [`Endpoint`] nodes.
#[derive(Debug, Clone, Copy)]
pub struct EndpointAssembler<'a> {
    descriptions: DescriptionAssembler<'a>,
}

impl<'a> EndpointAssembler<'a> {
    /// Assembler resolving descriptions through `descriptions`.
    #[must_use]
    pub const fn new(descriptions: DescriptionAssembler<'a>) -> Self {
        Self { descriptions }
    }

    /// Assemble and order a group of endpoints.
    ///
    /// # Errors
    ///
    /// Fails on the first endpoint [`EndpointAssembler::assemble`] rejects.
    pub fn assemble_all<'e>(
        &self,
        endpoints: impl IntoIterator<Item = &'e EndpointDescriptor>,
    ) -> Result<Vec<Endpoint>> {
        let mut assembled = endpoints
            .into_iter()
            .map(|e| self.assemble(e))
            .collect::<Result<Vec<_>>>()?;
        sort_endpoints(&mut assembled);
        Ok(assembled)
    }

    /// Assemble one endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::UnknownRouteParameter`] if a route parameter has
    /// no member on the input type, or [`SpecError::UnknownType`] if a
    /// payload names an unregistered type.
    pub fn assemble(&self, endpoint: &EndpointDescriptor) -> Result<Endpoint> {
        let registry = self.descriptions.registry();
        let options = self.descriptions.options();
        let overrides = &options.overrides;
        let description = options.conventions.endpoints.describe(endpoint).unwrap_or_default();
        let route = &endpoint.route;

        let input = endpoint
            .input
            .as_ref()
            .map(|field| effective_type(registry, &options.conventions, &field.type_key))
            .transpose()?;

        let (url_parameters, querystring_parameters) = match input {
            Some(ty) => (
                self.url_parameters(endpoint, ty)?,
                self.querystring_parameters(endpoint, ty)?,
            ),
            None => (Vec::new(), Vec::new()),
        };

        let request = match &endpoint.input {
            Some(field) if route.allows_body() => self
                .descriptions
                .data(field, description.request_comments, Some(endpoint))?
                .map(|data| overrides.requests.apply(endpoint, data)),
            _ => None,
        };
        let response = match &endpoint.output {
            Some(field) => self
                .descriptions
                .data(field, description.response_comments, None)?
                .map(|data| overrides.responses.apply(endpoint, data)),
            None => None,
        };

        let node = Endpoint {
            name: description
                .name
                .unwrap_or_else(|| endpoint.handler.method.clone()),
            comments: description.comments,
            url: url(&route.pattern, &querystring_parameters),
            method: route.primary_method().map(str::to_string),
            url_parameters,
            querystring_parameters,
            status_codes: self.descriptions.status_codes(endpoint),
            headers: self.descriptions.headers(endpoint),
            request,
            response,
        };
        Ok(overrides.endpoints.apply(endpoint, node))
    }

    /// URL parameters in route order.
    ///
    /// Each route parameter names the input member with exactly that name.
    /// Hidden and auto-bound members are bound but not documented.
    fn url_parameters(
        &self,
        endpoint: &EndpointDescriptor,
        input: &TypeDescriptor,
    ) -> Result<Vec<UrlParameter>> {
        let registry = self.descriptions.registry();
        let conventions = &self.descriptions.options().conventions;
        let mut parameters = Vec::new();
        for name in endpoint.route.parameter_names() {
            let member = input
                .members
                .iter()
                .find(|m| m.name == name)
                .ok_or_else(|| SpecError::UnknownRouteParameter {
                    handler: endpoint.handler.to_string(),
                    parameter: name.clone(),
                    input_type: input.key.clone(),
                })?;
            if member.hidden || member.auto_bound {
                continue;
            }
            let member_ty = member_type(registry, conventions, member)?;
            let description = conventions.members.describe(member).unwrap_or_default();
            let node = UrlParameter {
                name: description.name.unwrap_or_else(|| member.name.clone()),
                comments: description.comments,
                type_name: registry.xml_name(&rendered_field(member, member_ty))?,
                options: self.descriptions.options_of(member_ty),
            };
            parameters.push(
                self.descriptions
                    .options()
                    .overrides
                    .url_parameters
                    .apply(endpoint, member, node),
            );
        }
        Ok(parameters)
    }

    fn querystring_parameters(
        &self,
        endpoint: &EndpointDescriptor,
        input: &TypeDescriptor,
    ) -> Result<Vec<QuerystringParameter>> {
        let registry = self.descriptions.registry();
        let conventions = &self.descriptions.options().conventions;
        let mut parameters = Vec::new();
        for member in input
            .members
            .iter()
            .filter(|m| m.querystring && !m.hidden && !m.auto_bound)
        {
            let member_ty = member_type(registry, conventions, member)?;
            let description = conventions.members.describe(member).unwrap_or_default();
            let node = QuerystringParameter {
                name: description.name.unwrap_or_else(|| member.name.clone()),
                comments: description.comments,
                type_name: member_ty.xml_name().to_string(),
                options: self.descriptions.options_of(member_ty),
                default_value: description
                    .default_value
                    .map(|value| self.descriptions.default_value(member_ty, value)),
                multiple_allowed: member.field_type.list,
                required: description.required.unwrap_or(false),
            };
            parameters.push(
                self.descriptions
                    .options()
                    .overrides
                    .querystring
                    .apply(endpoint, member, node),
            );
        }
        parameters.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(parameters)
    }
}

fn rendered_field(member: &MemberDescriptor, member_ty: &TypeDescriptor) -> FieldType {
    FieldType {
        type_key: member_ty.key.clone(),
        ..member.field_type.clone()
    }
}

/// `/pattern?k={k}&...` for the given querystring parameters.
fn url(pattern: &str, querystring: &[QuerystringParameter]) -> String {
    let mut url = if pattern.starts_with('/') {
        pattern.to_string()
    } else {
        format!("/{pattern}")
    };
    if !querystring.is_empty() {
        let pairs: Vec<String> = querystring
            .iter()
            .map(|p| format!("{0}={{{0}}}", p.name))
            .collect();
        url.push('?');
        url.push_str(&pairs.join("&"));
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::{EndpointAnnotation, HandlerId, Route};
    use crate::metadata::{EnumOptionDescriptor, MemberAnnotation, TypeRegistry};
    use crate::options::SpecificationOptions;

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry
            .register(TypeDescriptor::enumeration(
                "Sort",
                "Sort",
                vec![
                    EnumOptionDescriptor::new("Newest", 0),
                    EnumOptionDescriptor::new("Oldest", 1),
                ],
            ))
            .register(TypeDescriptor::complex(
                "Query",
                "Query",
                vec![
                    MemberDescriptor::new("id", FieldType::new("i64")),
                    MemberDescriptor::new("tags", FieldType::list_of("string")).querystring(),
                    MemberDescriptor::new("sort", FieldType::new("Sort"))
                        .querystring()
                        .annotated(MemberAnnotation {
                            default_value: Some("Newest".into()),
                            required: Some(true),
                            ..MemberAnnotation::default()
                        }),
                    MemberDescriptor::new("secret", FieldType::new("string"))
                        .querystring()
                        .hidden(),
                    MemberDescriptor::new("user", FieldType::new("string"))
                        .querystring()
                        .auto_bound(),
                ],
            ))
            .register(TypeDescriptor::complex("Order", "Order", vec![]));
        registry
    }

    fn endpoint(pattern: &str, methods: &[&str]) -> EndpointDescriptor {
        EndpointDescriptor::new(HandlerId::new("shop::OrdersHandler", "handle"), Route::new(pattern, methods))
    }

    fn ordered(endpoints: Vec<EndpointDescriptor>) -> Vec<(String, Option<String>)> {
        let registry = registry();
        let options = SpecificationOptions::default();
        let assembler = EndpointAssembler::new(DescriptionAssembler::new(&registry, &options));
        assembler
            .assemble_all(&endpoints)
            .unwrap()
            .into_iter()
            .map(|e| (e.url, e.method))
            .collect()
    }

    #[test]
    fn test_verb_rank() {
        assert_eq!(verb_rank(Some("GET")), 0);
        assert_eq!(verb_rank(Some("post")), 1);
        assert_eq!(verb_rank(Some("Put")), 2);
        assert_eq!(verb_rank(Some("UPDATE")), 3);
        assert_eq!(verb_rank(Some("PATCH")), 4);
        assert_eq!(verb_rank(None), 4);
        assert_eq!(verb_rank(Some("delete")), 5);
    }

    #[test]
    fn test_order_by_path_then_verb() {
        let result = ordered(vec![
            endpoint("/a", &["POST"]),
            endpoint("/a", &["GET"]),
            endpoint("/b", &["GET"]),
        ]);
        let expected = vec![
            ("/a".to_string(), Some("GET".to_string())),
            ("/a".to_string(), Some("POST".to_string())),
            ("/b".to_string(), Some("GET".to_string())),
        ];
        assert_eq!(result, expected);
    }

    #[test]
    fn test_delete_sorts_after_unknown_verbs() {
        let methods: Vec<Option<String>> = ordered(vec![
            endpoint("/items", &["DELETE"]),
            endpoint("/items", &["GET"]),
            endpoint("/items", &["PATCH"]),
        ])
        .into_iter()
        .map(|(_, method)| method)
        .collect();
        assert_eq!(
            methods,
            vec![Some("GET".into()), Some("PATCH".into()), Some("DELETE".into())]
        );
    }

    #[test]
    fn test_querystring_parameters() {
        let registry = registry();
        let options = SpecificationOptions::default();
        let assembler = EndpointAssembler::new(DescriptionAssembler::new(&registry, &options));
        let get = endpoint("orders/{id}", &["GET"]).with_input(FieldType::new("Query"));

        let assembled = assembler.assemble(&get).unwrap();
        assert_eq!(assembled.url, "/orders/{id}?sort={sort}&tags={tags}");

        let names: Vec<&str> = assembled
            .querystring_parameters
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["sort", "tags"]);

        let sort = &assembled.querystring_parameters[0];
        assert_eq!(sort.type_name, "Sort");
        assert_eq!(sort.default_value.as_deref(), Some("Newest"));
        assert!(sort.required);
        assert!(!sort.multiple_allowed);
        assert_eq!(sort.options.len(), 2);

        let tags = &assembled.querystring_parameters[1];
        assert_eq!(tags.type_name, "string");
        assert!(tags.multiple_allowed);
        assert!(!tags.required);
    }

    #[test]
    fn test_url_parameters() {
        let registry = registry();
        let options = SpecificationOptions::default();
        let assembler = EndpointAssembler::new(DescriptionAssembler::new(&registry, &options));
        let get = endpoint("orders/{id}", &["GET"]).with_input(FieldType::new("Query"));

        let assembled = assembler.assemble(&get).unwrap();
        assert_eq!(assembled.url_parameters.len(), 1);
        assert_eq!(assembled.url_parameters[0].name, "id");
        assert_eq!(assembled.url_parameters[0].type_name, "long");
        // GET carries no body
        assert!(assembled.request.is_none());
    }

    #[test]
    fn test_hidden_and_auto_bound_route_members_are_not_documented() {
        let registry = registry();
        let options = SpecificationOptions::default();
        let assembler = EndpointAssembler::new(DescriptionAssembler::new(&registry, &options));

        let by_user = endpoint("orders/{user}", &["GET"]).with_input(FieldType::new("Query"));
        let assembled = assembler.assemble(&by_user).unwrap();
        assert!(assembled.url_parameters.is_empty());
        assert_eq!(assembled.url, "/orders/{user}?sort={sort}&tags={tags}");

        let by_secret = endpoint("orders/{secret}", &["GET"]).with_input(FieldType::new("Query"));
        assert!(assembler.assemble(&by_secret).unwrap().url_parameters.is_empty());
    }

    #[test]
    fn test_route_parameters_match_member_names_exactly() {
        let registry = registry();
        let options = SpecificationOptions::default();
        let assembler = EndpointAssembler::new(DescriptionAssembler::new(&registry, &options));
        let get = endpoint("orders/{ID}", &["GET"]).with_input(FieldType::new("Query"));

        let err = assembler.assemble(&get).unwrap_err();
        assert!(matches!(
            err,
            SpecError::UnknownRouteParameter { ref parameter, .. } if parameter == "ID"
        ));
    }

    #[test]
    fn test_unknown_route_parameter() {
        let registry = registry();
        let options = SpecificationOptions::default();
        let assembler = EndpointAssembler::new(DescriptionAssembler::new(&registry, &options));
        let get = endpoint("orders/{order_id}", &["GET"]).with_input(FieldType::new("Query"));

        let err = assembler.assemble(&get).unwrap_err();
        assert!(matches!(
            err,
            SpecError::UnknownRouteParameter { ref parameter, ref input_type, .. }
                if parameter == "order_id" && input_type == "Query"
        ));
    }

    #[test]
    fn test_payloads_and_annotation() {
        let registry = registry();
        let options = SpecificationOptions::default();
        let assembler = EndpointAssembler::new(DescriptionAssembler::new(&registry, &options));
        let mut post = endpoint("orders", &["POST"])
            .with_input(FieldType::new("Order"))
            .with_output(FieldType::list_of("Order"));
        post.annotation = Some(EndpointAnnotation {
            name: Some("Create order".into()),
            comments: None,
            request_comments: Some("The new order.".into()),
            response_comments: Some("All orders.".into()),
        });

        let assembled = assembler.assemble(&post).unwrap();
        assert_eq!(assembled.name, "Create order");
        assert_eq!(assembled.method.as_deref(), Some("POST"));

        let request = assembled.request.unwrap();
        assert_eq!(request.type_id, "Order:shop::OrdersHandler.handle");
        assert_eq!(request.comments.as_deref(), Some("The new order."));

        let response = assembled.response.unwrap();
        assert_eq!(response.type_id, "Order");
        assert!(response.is_array);
        assert_eq!(response.comments.as_deref(), Some("All orders."));
    }

    #[test]
    fn test_endpoint_override() {
        let registry = registry();
        let mut options = SpecificationOptions::default();
        options.overrides.endpoints.push(|source, mut endpoint| {
            endpoint.comments = Some(format!("Handled by {}", source.handler));
            endpoint
        });
        let assembler = EndpointAssembler::new(DescriptionAssembler::new(&registry, &options));

        let assembled = assembler.assemble(&endpoint("orders", &["GET"])).unwrap();
        assert_eq!(
            assembled.comments.as_deref(),
            Some("Handled by shop::OrdersHandler.handle")
        );
        assert_eq!(assembled.name, "handle");
    }
}
