//! Specification generation.
//!
//! [`SpecificationService::generate`] runs one generation over an
//! inventory snapshot:
//!
//! 1. resolve each endpoint's module and resource ([`OrphanResolver`])
//! 2. build the type catalog ([`TypeGraphWalker`])
//! 3. group endpoints into modules and resources, assembling each endpoint
//! 4. merge with a prior document when configured

use std::collections::BTreeMap;

use tracing::{debug, info, info_span};

use crate::assembler::DescriptionAssembler;
use crate::description::{ModuleDescription, ResourceDescription};
use crate::endpoints::EndpointAssembler;
use crate::error::Result;
use crate::inventory::{EndpointDescriptor, Inventory};
use crate::merge::{CommentMerge, MergeService};
use crate::model::{Module, Resource, Specification, Type};
use crate::options::SpecificationOptions;
use crate::orphans::{EndpointMapping, OrphanResolver};
use crate::type_graph::TypeGraphWalker;

/// Generates specification documents.
pub struct SpecificationService {
    options: SpecificationOptions,
    merge: Box<dyn MergeService>,
}

impl std::fmt::Debug for SpecificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpecificationService")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Default for SpecificationService {
    fn default() -> Self {
        Self::new(SpecificationOptions::default())
    }
}

impl SpecificationService {
    /// Service merging with [`CommentMerge`].
    #[must_use]
    pub fn new(options: SpecificationOptions) -> Self {
        Self {
            options,
            merge: Box::new(CommentMerge),
        }
    }

    /// Replace the merge collaborator.
    #[must_use]
    pub fn with_merge(mut self, merge: impl MergeService + 'static) -> Self {
        self.merge = Box::new(merge);
        self
    }

    /// The generation options.
    #[must_use]
    pub const fn options(&self) -> &SpecificationOptions {
        &self.options
    }

    /// Generate the specification for `inventory`.
    ///
    /// # Errors
    ///
    /// - [`crate::SpecError::OrphanedModuleEndpoints`] /
    ///   [`crate::SpecError::OrphanedResourceEndpoints`] when a `fail` orphan
    ///   policy is violated
    /// - [`crate::SpecError::UnknownRouteParameter`] and
    ///   [`crate::SpecError::UnknownType`] for malformed registrations
    /// - merge errors when a prior document is configured but unreadable
    pub fn generate(&self, inventory: &Inventory) -> Result<Specification> {
        let settings = &self.options.settings;
        let _span = info_span!("generate", name = %settings.name).entered();

        let mappings = OrphanResolver::new(inventory, &self.options).resolve()?;
        debug!(endpoints = mappings.len(), "Resolved endpoint grouping");

        let descriptions = DescriptionAssembler::new(&inventory.types, &self.options);
        let endpoints = EndpointAssembler::new(descriptions);

        let types = self.types(descriptions, &mappings)?;

        let mut modules: BTreeMap<&str, (&ModuleDescription, Vec<&EndpointMapping<'_>>)> =
            BTreeMap::new();
        let mut root: Vec<&EndpointMapping<'_>> = Vec::new();
        for mapping in &mappings {
            match &mapping.module {
                Some(module) => {
                    modules
                        .entry(module.key.as_str())
                        .or_insert_with(|| (module, Vec::new()))
                        .1
                        .push(mapping);
                }
                None => root.push(mapping),
            }
        }

        let mut assembled_modules = Vec::with_capacity(modules.len());
        for (description, members) in modules.into_values() {
            let node = Module {
                name: description.name.clone(),
                comments: description.comments.clone(),
                resources: self.resources(endpoints, &members)?,
            };
            assembled_modules.push(self.options.overrides.modules.apply(description, node));
        }
        assembled_modules.sort_by(|a, b| a.name.cmp(&b.name));

        let mut specification = Specification {
            name: settings.name.clone(),
            comments: settings.comments.clone(),
            types,
            modules: assembled_modules,
            resources: self.resources(endpoints, &root)?,
        };

        info!(
            types = specification.types.len(),
            modules = specification.modules.len(),
            endpoints = specification.endpoints().count(),
            "Generated specification"
        );

        if let Some(prior) = &settings.merge_specification_path {
            specification = self.merge.merge(specification, prior)?;
            debug!(path = %prior.display(), "Merged prior specification");
        }
        Ok(specification)
    }

    /// Catalog of every type reachable from the mapped endpoints, sorted by
    /// name then id.
    fn types(
        &self,
        descriptions: DescriptionAssembler<'_>,
        mappings: &[EndpointMapping<'_>],
    ) -> Result<Vec<Type>> {
        let endpoints: Vec<&EndpointDescriptor> = mappings.iter().map(|m| m.endpoint).collect();
        let contexts = TypeGraphWalker::new(descriptions.registry(), &self.options.conventions)
            .walk(&endpoints)?;

        let mut types = contexts
            .iter()
            .map(|context| descriptions.describe_type(context))
            .collect::<Result<Vec<_>>>()?;
        types.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(types)
    }

    /// Group mappings by resource key and assemble each resource, sorted by
    /// name.
    fn resources(
        &self,
        endpoints: EndpointAssembler<'_>,
        mappings: &[&EndpointMapping<'_>],
    ) -> Result<Vec<Resource>> {
        let mut groups: BTreeMap<&str, (&ResourceDescription, Vec<&EndpointDescriptor>)> =
            BTreeMap::new();
        for mapping in mappings {
            groups
                .entry(mapping.resource.key.as_str())
                .or_insert_with(|| (&mapping.resource, Vec::new()))
                .1
                .push(mapping.endpoint);
        }

        let mut resources = Vec::with_capacity(groups.len());
        for (description, members) in groups.into_values() {
            let node = Resource {
                name: description.name.clone(),
                comments: description.comments.clone(),
                endpoints: endpoints.assemble_all(members)?,
            };
            resources.push(self.options.overrides.resources.apply(description, node));
        }
        resources.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(resources)
    }
}
