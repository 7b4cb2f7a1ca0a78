//! Generation options.
//!
//! [`SpecificationOptions`] bundles the serializable settings from
//! [`SpecificationConfig`] with the pieces that can only be supplied in
//! code: description conventions, default factories, id conventions and
//! override chains.

use std::fmt;

use crate::config::{EnumValue, OrphanPolicy, SpecificationConfig};
use crate::description::{
    Conventions, DescriptionConvention, EndpointDescription, HeaderDescription, MemberDescription,
    ModuleDescription, OptionDescription, ResourceDescription, StatusCodeDescription,
    TypeDescription,
};
use crate::inventory::{EndpointDescriptor, HandlerId};
use crate::metadata::{EnumOptionDescriptor, MemberDescriptor, TypeDescriptor};
use crate::overrides::OverrideSet;

/// Builds the module of an endpoint no module convention matched.
pub type ModuleFactory =
    Box<dyn Fn(&EndpointDescriptor) -> Option<ModuleDescription> + Send + Sync>;

/// Builds the resource of an endpoint no resource convention matched.
pub type ResourceFactory = Box<dyn Fn(&EndpointDescriptor) -> ResourceDescription + Send + Sync>;

/// Identifier of a globally scoped type.
pub type TypeIdConvention = Box<dyn Fn(&TypeDescriptor) -> String + Send + Sync>;

/// Identifier of a request type scoped to one handler.
pub type InputTypeIdConvention = Box<dyn Fn(&TypeDescriptor, &HandlerId) -> String + Send + Sync>;

/// Everything one generation needs besides the inventory.
pub struct SpecificationOptions {
    /// Serializable settings.
    pub settings: SpecificationConfig,
    /// Description lookup per entity kind.
    pub conventions: Conventions,
    /// Module for orphans under [`OrphanPolicy::UseDefault`].
    pub default_module_factory: ModuleFactory,
    /// Resource for orphans under [`OrphanPolicy::UseDefault`].
    pub default_resource_factory: ResourceFactory,
    /// Id of globally scoped types.
    pub type_id_convention: TypeIdConvention,
    /// Id of handler-scoped request types.
    pub input_type_id_convention: InputTypeIdConvention,
    /// Override chains.
    pub overrides: OverrideSet,
}

impl fmt::Debug for SpecificationOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpecificationOptions")
            .field("settings", &self.settings)
            .field("conventions", &self.conventions)
            .field("overrides", &self.overrides)
            .finish_non_exhaustive()
    }
}

impl Default for SpecificationOptions {
    fn default() -> Self {
        Self::new(SpecificationConfig::default())
    }
}

/// Default resource: named after the first literal route segment.
#[must_use]
pub fn resource_from_route(endpoint: &EndpointDescriptor) -> ResourceDescription {
    let segment = endpoint.route.first_segment().unwrap_or("/");
    ResourceDescription::new(format!("route:{segment}"), segment)
}

fn no_module(_: &EndpointDescriptor) -> Option<ModuleDescription> {
    None
}

fn type_key(ty: &TypeDescriptor) -> String {
    ty.key.clone()
}

fn handler_scoped_type_key(ty: &TypeDescriptor, handler: &HandlerId) -> String {
    format!("{}:{handler}", ty.key)
}

impl SpecificationOptions {
    /// Options with the default factories and conventions.
    ///
    /// Orphans defaulted on the module axis stay module-less and surface as
    /// root resources.
    #[must_use]
    pub fn new(settings: SpecificationConfig) -> Self {
        Self {
            settings,
            conventions: Conventions::default(),
            default_module_factory: Box::new(no_module),
            default_resource_factory: Box::new(resource_from_route),
            type_id_convention: Box::new(type_key),
            input_type_id_convention: Box::new(handler_scoped_type_key),
            overrides: OverrideSet::default(),
        }
    }

    /// Replace the module convention. Declared modules are no longer
    /// consulted.
    #[must_use]
    pub fn with_module_convention<C>(mut self, convention: C) -> Self
    where
        C: DescriptionConvention<EndpointDescriptor, Description = ModuleDescription>
            + Send
            + Sync
            + 'static,
    {
        self.conventions.modules = Some(Box::new(convention));
        self
    }

    /// Replace the resource convention. Resource annotations and declared
    /// resources are no longer consulted.
    #[must_use]
    pub fn with_resource_convention<C>(mut self, convention: C) -> Self
    where
        C: DescriptionConvention<EndpointDescriptor, Description = ResourceDescription>
            + Send
            + Sync
            + 'static,
    {
        self.conventions.resources = Some(Box::new(convention));
        self
    }

    /// Replace the endpoint convention.
    #[must_use]
    pub fn with_endpoint_convention<C>(mut self, convention: C) -> Self
    where
        C: DescriptionConvention<EndpointDescriptor, Description = EndpointDescription>
            + Send
            + Sync
            + 'static,
    {
        self.conventions.endpoints = Box::new(convention);
        self
    }

    /// Replace the type convention.
    #[must_use]
    pub fn with_type_convention<C>(mut self, convention: C) -> Self
    where
        C: DescriptionConvention<TypeDescriptor, Description = TypeDescription>
            + Send
            + Sync
            + 'static,
    {
        self.conventions.types = Box::new(convention);
        self
    }

    /// Replace the member convention.
    #[must_use]
    pub fn with_member_convention<C>(mut self, convention: C) -> Self
    where
        C: DescriptionConvention<MemberDescriptor, Description = MemberDescription>
            + Send
            + Sync
            + 'static,
    {
        self.conventions.members = Box::new(convention);
        self
    }

    /// Replace the enum option convention.
    #[must_use]
    pub fn with_option_convention<C>(mut self, convention: C) -> Self
    where
        C: DescriptionConvention<EnumOptionDescriptor, Description = OptionDescription>
            + Send
            + Sync
            + 'static,
    {
        self.conventions.options = Box::new(convention);
        self
    }

    /// Replace the status code convention.
    #[must_use]
    pub fn with_status_code_convention<C>(mut self, convention: C) -> Self
    where
        C: DescriptionConvention<EndpointDescriptor, Description = Vec<StatusCodeDescription>>
            + Send
            + Sync
            + 'static,
    {
        self.conventions.status_codes = Box::new(convention);
        self
    }

    /// Replace the header convention.
    #[must_use]
    pub fn with_header_convention<C>(mut self, convention: C) -> Self
    where
        C: DescriptionConvention<EndpointDescriptor, Description = Vec<HeaderDescription>>
            + Send
            + Sync
            + 'static,
    {
        self.conventions.headers = Box::new(convention);
        self
    }

    /// Replace the default module factory.
    #[must_use]
    pub fn with_default_module<F>(mut self, factory: F) -> Self
    where
        F: Fn(&EndpointDescriptor) -> Option<ModuleDescription> + Send + Sync + 'static,
    {
        self.default_module_factory = Box::new(factory);
        self
    }

    /// Replace the default resource factory.
    #[must_use]
    pub fn with_default_resource<F>(mut self, factory: F) -> Self
    where
        F: Fn(&EndpointDescriptor) -> ResourceDescription + Send + Sync + 'static,
    {
        self.default_resource_factory = Box::new(factory);
        self
    }

    /// Replace the global type-id convention.
    #[must_use]
    pub fn with_type_id<F>(mut self, convention: F) -> Self
    where
        F: Fn(&TypeDescriptor) -> String + Send + Sync + 'static,
    {
        self.type_id_convention = Box::new(convention);
        self
    }

    /// Replace the request type-id convention.
    #[must_use]
    pub fn with_input_type_id<F>(mut self, convention: F) -> Self
    where
        F: Fn(&TypeDescriptor, &HandlerId) -> String + Send + Sync + 'static,
    {
        self.input_type_id_convention = Box::new(convention);
        self
    }

    /// Set both orphan policies.
    #[must_use]
    pub fn with_orphan_policies(mut self, modules: OrphanPolicy, resources: OrphanPolicy) -> Self {
        self.settings.orphaned_module_endpoints = modules;
        self.settings.orphaned_resource_endpoints = resources;
        self
    }

    /// Set the enum emission mode.
    #[must_use]
    pub fn with_enum_value(mut self, mode: EnumValue) -> Self {
        self.settings.enum_value = mode;
        self
    }

    /// Id of a globally scoped type.
    #[must_use]
    pub fn type_id(&self, ty: &TypeDescriptor) -> String {
        (self.type_id_convention)(ty)
    }

    /// Id of `ty`, scoped to `handler` when given.
    #[must_use]
    pub fn scoped_type_id(&self, ty: &TypeDescriptor, handler: Option<&HandlerId>) -> String {
        match handler {
            Some(handler) => (self.input_type_id_convention)(ty, handler),
            None => self.type_id(ty),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::Route;

    #[test]
    fn test_default_type_ids() {
        let options = SpecificationOptions::default();
        let ty = TypeDescriptor::complex("orders::Order", "Order", vec![]);
        let handler = HandlerId::new("orders::OrdersHandler", "post");

        assert_eq!(options.scoped_type_id(&ty, None), "orders::Order");
        assert_eq!(
            options.scoped_type_id(&ty, Some(&handler)),
            "orders::Order:orders::OrdersHandler.post"
        );
    }

    #[test]
    fn test_default_factories() {
        let options = SpecificationOptions::default();
        let endpoint = EndpointDescriptor::new(
            HandlerId::new("orders::OrdersHandler", "get"),
            Route::new("/{tenant}/orders/{id}", &["GET"]),
        );

        assert!((options.default_module_factory)(&endpoint).is_none());
        let resource = (options.default_resource_factory)(&endpoint);
        assert_eq!(resource.name, "orders");
        assert_eq!(resource.key, "route:orders");
    }

    #[test]
    fn test_builder_replaces_conventions() {
        let options = SpecificationOptions::default()
            .with_type_id(|ty| ty.name.to_lowercase())
            .with_enum_value(EnumValue::Literal);
        let ty = TypeDescriptor::complex("orders::Order", "Order", vec![]);

        assert_eq!(options.type_id(&ty), "order");
        assert_eq!(options.settings.enum_value, EnumValue::Literal);
    }
}
