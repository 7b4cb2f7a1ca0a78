//! Merging a fresh specification with a previously saved one.

use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::model::{Endpoint, Resource, Specification, Type};
use crate::storage;

/// Combines a freshly generated document with one persisted earlier.
pub trait MergeService: Send + Sync {
    /// Merge `fresh` with the document stored at `prior`.
    ///
    /// # Errors
    ///
    /// Implementations fail when the prior document cannot be read.
    fn merge(&self, fresh: Specification, prior: &Path) -> Result<Specification>;
}

/// Keeps hand-written comments from a prior document.
///
/// Comments present in the fresh document always win; missing ones are
/// taken from the prior entry with the same identity. A missing prior file
/// leaves the document as generated.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommentMerge;

impl MergeService for CommentMerge {
    fn merge(&self, fresh: Specification, prior: &Path) -> Result<Specification> {
        if !prior.exists() {
            debug!(path = %prior.display(), "No prior specification to merge");
            return Ok(fresh);
        }
        let prior = storage::load_specification(prior)?;
        Ok(merge_comments(fresh, &prior))
    }
}

fn fill(target: &mut Option<String>, source: &Option<String>) {
    if target.is_none() {
        target.clone_from(source);
    }
}

/// Fill comments missing from `fresh` with those of `prior`.
///
/// Modules and resources are matched by name, endpoints by URL and method,
/// types by id, and members and parameters by name.
#[must_use]
pub fn merge_comments(mut fresh: Specification, prior: &Specification) -> Specification {
    fill(&mut fresh.comments, &prior.comments);

    for module in &mut fresh.modules {
        if let Some(old) = prior.modules.iter().find(|m| m.name == module.name) {
            fill(&mut module.comments, &old.comments);
            merge_resources(&mut module.resources, &old.resources);
        }
    }
    merge_resources(&mut fresh.resources, &prior.resources);

    for ty in &mut fresh.types {
        if let Some(old) = prior.types.iter().find(|t| t.id == ty.id) {
            merge_type(ty, old);
        }
    }
    fresh
}

fn merge_resources(fresh: &mut [Resource], prior: &[Resource]) {
    for resource in fresh {
        let Some(old) = prior.iter().find(|r| r.name == resource.name) else {
            continue;
        };
        fill(&mut resource.comments, &old.comments);
        for endpoint in &mut resource.endpoints {
            if let Some(old) = old
                .endpoints
                .iter()
                .find(|e| e.url == endpoint.url && e.method == endpoint.method)
            {
                merge_endpoint(endpoint, old);
            }
        }
    }
}

fn merge_endpoint(fresh: &mut Endpoint, prior: &Endpoint) {
    fill(&mut fresh.comments, &prior.comments);
    for parameter in &mut fresh.url_parameters {
        if let Some(old) = prior.url_parameters.iter().find(|p| p.name == parameter.name) {
            fill(&mut parameter.comments, &old.comments);
        }
    }
    for parameter in &mut fresh.querystring_parameters {
        if let Some(old) = prior
            .querystring_parameters
            .iter()
            .find(|p| p.name == parameter.name)
        {
            fill(&mut parameter.comments, &old.comments);
        }
    }
    if let (Some(request), Some(old)) = (&mut fresh.request, &prior.request) {
        fill(&mut request.comments, &old.comments);
    }
    if let (Some(response), Some(old)) = (&mut fresh.response, &prior.response) {
        fill(&mut response.comments, &old.comments);
    }
}

fn merge_type(fresh: &mut Type, prior: &Type) {
    fill(&mut fresh.comments, &prior.comments);
    for member in &mut fresh.members {
        if let Some(old) = prior.members.iter().find(|m| m.name == member.name) {
            fill(&mut member.comments, &old.comments);
        }
    }
}
