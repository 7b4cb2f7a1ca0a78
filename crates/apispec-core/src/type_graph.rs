//! Discovery of the types reachable from endpoint payloads.
//!
//! Request roots are scoped to their endpoint so that two actions accepting
//! the same type get distinct catalog entries; response roots and every
//! nested type are global. Primitives, enums and hidden types are never
//! catalogued.

use std::collections::HashSet;

use tracing::debug;

use crate::description::Conventions;
use crate::error::Result;
use crate::inventory::{EndpointDescriptor, HandlerId};
use crate::metadata::{MemberDescriptor, TypeDescriptor, TypeRegistry};

/// A discovered type and the endpoint its identifier is scoped to.
#[derive(Debug, Clone, Copy)]
pub struct TypeContext<'a> {
    /// Type to describe, after substitution.
    pub ty: &'a TypeDescriptor,
    /// Endpoint whose request this type is; `None` for global types.
    pub scope: Option<&'a EndpointDescriptor>,
}

impl<'a> TypeContext<'a> {
    /// Handler the identifier is scoped to.
    #[must_use]
    pub fn handler(&self) -> Option<&'a HandlerId> {
        self.scope.map(|e| &e.handler)
    }

    fn dedup_key(&self) -> (&'a str, Option<&'a HandlerId>) {
        (self.ty.key.as_str(), self.handler())
    }
}

/// Resolve `key` and apply the type convention's substitution, if any.
pub(crate) fn effective_type<'a>(
    registry: &'a TypeRegistry,
    conventions: &Conventions,
    key: &str,
) -> Result<&'a TypeDescriptor> {
    let ty = registry.resolve(key)?;
    match conventions.types.describe(ty).and_then(|d| d.substitute) {
        Some(substitute) => registry.resolve(&substitute),
        None => Ok(ty),
    }
}

/// Element type a member reports, after member and type substitution.
pub(crate) fn member_type<'a>(
    registry: &'a TypeRegistry,
    conventions: &Conventions,
    member: &MemberDescriptor,
) -> Result<&'a TypeDescriptor> {
    let key = conventions
        .members
        .describe(member)
        .and_then(|d| d.substitute)
        .unwrap_or_else(|| member.field_type.type_key.clone());
    effective_type(registry, conventions, &key)
}

fn is_catalogued(ty: &TypeDescriptor) -> bool {
    !ty.is_simple() && !ty.hidden
}

/// Walks the member graph of payload types.
#[derive(Debug, Clone, Copy)]
pub struct TypeGraphWalker<'a> {
    registry: &'a TypeRegistry,
    conventions: &'a Conventions,
}

impl<'a> TypeGraphWalker<'a> {
    /// Walker over `registry`, substituting types per `conventions`.
    #[must_use]
    pub const fn new(registry: &'a TypeRegistry, conventions: &'a Conventions) -> Self {
        Self {
            registry,
            conventions,
        }
    }

    /// Root contexts: request types of body-carrying endpoints, then each
    /// distinct response type.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SpecError::UnknownType`] for unregistered payloads.
    pub fn roots(&self, endpoints: &[&'a EndpointDescriptor]) -> Result<Vec<TypeContext<'a>>> {
        let mut roots = Vec::new();

        for &endpoint in endpoints {
            let Some(input) = &endpoint.input else { continue };
            if endpoint.route.allows("GET") || endpoint.route.allows("DELETE") {
                continue;
            }
            let ty = effective_type(self.registry, self.conventions, &input.type_key)?;
            if is_catalogued(ty) {
                roots.push(TypeContext {
                    ty,
                    scope: Some(endpoint),
                });
            }
        }

        let mut outputs = HashSet::new();
        for &endpoint in endpoints {
            let Some(output) = &endpoint.output else { continue };
            let ty = effective_type(self.registry, self.conventions, &output.type_key)?;
            if is_catalogued(ty) && outputs.insert(ty.key.as_str()) {
                roots.push(TypeContext { ty, scope: None });
            }
        }

        Ok(roots)
    }

    /// Every catalogued type reachable from `endpoints`, deduplicated by
    /// type and scope, in discovery order.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SpecError::UnknownType`] if any reachable member
    /// names an unregistered type.
    pub fn walk(&self, endpoints: &[&'a EndpointDescriptor]) -> Result<Vec<TypeContext<'a>>> {
        let roots = self.roots(endpoints)?;

        let mut descendants = Vec::new();
        let mut expanded = HashSet::new();
        for root in &roots {
            if expanded.insert(root.ty.key.as_str()) {
                self.descend(root.ty, vec![root.ty.key.as_str()], &mut descendants, &mut expanded)?;
            }
        }

        let mut seen = HashSet::new();
        let discovered: Vec<TypeContext<'a>> = roots
            .into_iter()
            .chain(descendants.into_iter().map(|ty| TypeContext { ty, scope: None }))
            .filter(|context| seen.insert(context.dedup_key()))
            .collect();

        debug!(types = discovered.len(), "Discovered payload types");
        Ok(discovered)
    }

    /// Collect the complex children of `ty`, recursing depth-first.
    ///
    /// `ancestors` is the path from the root to `ty`. A child already on it
    /// closes a cycle: it is still recorded as a global type, but not
    /// entered again.
    fn descend(
        &self,
        ty: &'a TypeDescriptor,
        ancestors: Vec<&'a str>,
        found: &mut Vec<&'a TypeDescriptor>,
        expanded: &mut HashSet<&'a str>,
    ) -> Result<()> {
        for member in &ty.members {
            if member.hidden || member.auto_bound {
                continue;
            }
            let child = member_type(self.registry, self.conventions, member)?;
            if !is_catalogued(child) {
                continue;
            }
            found.push(child);
            if ancestors.contains(&child.key.as_str()) {
                continue;
            }
            if expanded.insert(child.key.as_str()) {
                let mut path = ancestors.clone();
                path.push(child.key.as_str());
                self.descend(child, path, found, expanded)?;
            }
        }
        Ok(())
    }
}
