//! Module and resource assignment.
//!
//! Each visible endpoint is matched against the module and resource
//! conventions. Endpoints left without a match are handled per axis by the
//! configured [`OrphanPolicy`].

use tracing::{debug, warn};

use crate::config::OrphanPolicy;
use crate::description::{
    DescriptionConvention, ModuleConvention, ModuleDescription, ResourceConvention,
    ResourceDescription,
};
use crate::error::{Result, SpecError};
use crate::inventory::{EndpointDescriptor, Inventory};
use crate::options::SpecificationOptions;

/// An endpoint together with its resolved grouping.
#[derive(Debug, Clone)]
pub struct EndpointMapping<'a> {
    /// The endpoint.
    pub endpoint: &'a EndpointDescriptor,
    /// Owning module; `None` places the resource at the specification root.
    pub module: Option<ModuleDescription>,
    /// Owning resource.
    pub resource: ResourceDescription,
}

struct Candidate<'a> {
    endpoint: &'a EndpointDescriptor,
    module: Option<ModuleDescription>,
    resource: Option<ResourceDescription>,
}

/// Assigns endpoints to modules and resources.
#[derive(Debug)]
pub struct OrphanResolver<'a> {
    inventory: &'a Inventory,
    options: &'a SpecificationOptions,
}

impl<'a> OrphanResolver<'a> {
    /// Resolver over `inventory`.
    #[must_use]
    pub const fn new(inventory: &'a Inventory, options: &'a SpecificationOptions) -> Self {
        Self { inventory, options }
    }

    /// Map every visible endpoint to its module and resource.
    ///
    /// Hidden endpoints are dropped first. Then, per axis, unmatched
    /// endpoints are dropped (`exclude`), given the default factory's result
    /// (`use_default`), or collected into one error (`fail`). The module
    /// axis is checked before the resource axis.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::OrphanedModuleEndpoints`] or
    /// [`SpecError::OrphanedResourceEndpoints`] naming every offending
    /// handler when a `fail` policy is violated.
    pub fn resolve(&self) -> Result<Vec<EndpointMapping<'a>>> {
        let settings = &self.options.settings;
        let conventions = &self.options.conventions;
        let declared_modules = ModuleConvention::new(&self.inventory.modules);
        let declared_resources = ResourceConvention::new(&self.inventory.resources);
        let modules: &dyn DescriptionConvention<EndpointDescriptor, Description = ModuleDescription> =
            match &conventions.modules {
                Some(custom) => &**custom,
                None => &declared_modules,
            };
        let resources: &dyn DescriptionConvention<
            EndpointDescriptor,
            Description = ResourceDescription,
        > = match &conventions.resources {
            Some(custom) => &**custom,
            None => &declared_resources,
        };

        let mut candidates: Vec<Candidate<'a>> = self
            .inventory
            .endpoints
            .iter()
            .filter(|e| !e.is_hidden())
            .map(|endpoint| Candidate {
                endpoint,
                module: modules.describe(endpoint),
                resource: resources.describe(endpoint),
            })
            .collect();

        let before = candidates.len();
        if settings.orphaned_module_endpoints == OrphanPolicy::Exclude {
            candidates.retain(|c| c.module.is_some());
        }
        if settings.orphaned_resource_endpoints == OrphanPolicy::Exclude {
            candidates.retain(|c| c.resource.is_some());
        }
        if candidates.len() < before {
            debug!(
                excluded = before - candidates.len(),
                "Excluded endpoints without a module or resource"
            );
        }

        for candidate in &mut candidates {
            if settings.orphaned_module_endpoints == OrphanPolicy::UseDefault
                && candidate.module.is_none()
            {
                candidate.module = (self.options.default_module_factory)(candidate.endpoint);
            }
            if settings.orphaned_resource_endpoints == OrphanPolicy::UseDefault
                && candidate.resource.is_none()
            {
                candidate.resource =
                    Some((self.options.default_resource_factory)(candidate.endpoint));
            }
        }

        if settings.orphaned_module_endpoints == OrphanPolicy::Fail {
            let orphans = offending(&candidates, |c| c.module.is_none());
            if !orphans.is_empty() {
                warn!(count = orphans.len(), "Endpoints without a module");
                return Err(SpecError::OrphanedModuleEndpoints(orphans));
            }
        }
        if settings.orphaned_resource_endpoints == OrphanPolicy::Fail {
            let orphans = offending(&candidates, |c| c.resource.is_none());
            if !orphans.is_empty() {
                warn!(count = orphans.len(), "Endpoints without a resource");
                return Err(SpecError::OrphanedResourceEndpoints(orphans));
            }
        }

        // Every remaining candidate has a resource: excluded, defaulted or
        // checked above.
        Ok(candidates
            .into_iter()
            .filter_map(|c| {
                c.resource.map(|resource| EndpointMapping {
                    endpoint: c.endpoint,
                    module: c.module,
                    resource,
                })
            })
            .collect())
    }
}

fn offending(candidates: &[Candidate<'_>], orphaned: impl Fn(&Candidate<'_>) -> bool) -> Vec<String> {
    candidates
        .iter()
        .filter(|c| orphaned(c))
        .map(|c| c.endpoint.handler.to_string())
        .collect()
}
