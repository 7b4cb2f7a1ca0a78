//! Caller-registered override chains.
//!
//! An override receives the source metadata and the node built so far and
//! returns the node to emit. Chains run in registration order, after the
//! convention and default stages.

use std::fmt;

use crate::description::{ModuleDescription, ResourceDescription};
use crate::inventory::EndpointDescriptor;
use crate::metadata::{EnumOptionDescriptor, MemberDescriptor, TypeDescriptor};
use crate::model::{
    Data, Endpoint, EnumOption, Header, Member, Module, QuerystringParameter, Resource,
    StatusCode, Type, UrlParameter,
};

type OverrideFn<S, T> = Box<dyn Fn(&S, T) -> T + Send + Sync>;
type PairOverrideFn<A, B, T> = Box<dyn Fn(&A, &B, T) -> T + Send + Sync>;

/// Ordered chain of overrides for nodes of type `T` built from `S`.
pub struct Overrides<S: ?Sized, T> {
    chain: Vec<OverrideFn<S, T>>,
}

impl<S: ?Sized, T> Default for Overrides<S, T> {
    fn default() -> Self {
        Self { chain: Vec::new() }
    }
}

impl<S: ?Sized, T> fmt::Debug for Overrides<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overrides")
            .field("len", &self.chain.len())
            .finish()
    }
}

impl<S: ?Sized, T> Overrides<S, T> {
    /// Append an override.
    pub fn push<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&S, T) -> T + Send + Sync + 'static,
    {
        self.chain.push(Box::new(f));
        self
    }

    /// Run every override over `node`.
    pub fn apply(&self, source: &S, node: T) -> T {
        self.chain.iter().fold(node, |node, f| f(source, node))
    }

    /// Number of registered overrides.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Whether the chain is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }
}

/// Override chain whose source is a pair, e.g. an endpoint and one of its
/// input members.
pub struct PairOverrides<A, B, T> {
    chain: Vec<PairOverrideFn<A, B, T>>,
}

impl<A, B, T> Default for PairOverrides<A, B, T> {
    fn default() -> Self {
        Self { chain: Vec::new() }
    }
}

impl<A, B, T> fmt::Debug for PairOverrides<A, B, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PairOverrides")
            .field("len", &self.chain.len())
            .finish()
    }
}

impl<A, B, T> PairOverrides<A, B, T> {
    /// Append an override.
    pub fn push<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&A, &B, T) -> T + Send + Sync + 'static,
    {
        self.chain.push(Box::new(f));
        self
    }

    /// Run every override over `node`.
    pub fn apply(&self, first: &A, second: &B, node: T) -> T {
        self.chain.iter().fold(node, |node, f| f(first, second, node))
    }

    /// Number of registered overrides.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Whether the chain is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }
}

/// One override chain per entity kind.
#[derive(Debug, Default)]
pub struct OverrideSet {
    /// Modules, keyed by their grouping description.
    pub modules: Overrides<ModuleDescription, Module>,
    /// Resources, keyed by their grouping description.
    pub resources: Overrides<ResourceDescription, Resource>,
    /// Endpoints.
    pub endpoints: Overrides<EndpointDescriptor, Endpoint>,
    /// URL parameters.
    pub url_parameters: PairOverrides<EndpointDescriptor, MemberDescriptor, UrlParameter>,
    /// Querystring parameters.
    pub querystring: PairOverrides<EndpointDescriptor, MemberDescriptor, QuerystringParameter>,
    /// Status codes.
    pub status_codes: Overrides<EndpointDescriptor, StatusCode>,
    /// Headers.
    pub headers: Overrides<EndpointDescriptor, Header>,
    /// Request payloads.
    pub requests: Overrides<EndpointDescriptor, Data>,
    /// Response payloads.
    pub responses: Overrides<EndpointDescriptor, Data>,
    /// Catalog types.
    pub types: Overrides<TypeDescriptor, Type>,
    /// Type members.
    pub members: Overrides<MemberDescriptor, Member>,
    /// Enum options.
    pub options: Overrides<EnumOptionDescriptor, EnumOption>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_runs_in_registration_order() {
        let mut overrides: Overrides<str, String> = Overrides::default();
        overrides
            .push(|_, node| format!("{node}-first"))
            .push(|source, node| format!("{node}-{source}"));

        assert_eq!(overrides.len(), 2);
        assert_eq!(overrides.apply("second", "node".into()), "node-first-second");
    }

    #[test]
    fn test_empty_chain_is_identity() {
        let overrides: Overrides<TypeDescriptor, Type> = Overrides::default();
        let ty = Type {
            id: "a".into(),
            name: "A".into(),
            ..Type::default()
        };
        let source = TypeDescriptor::complex("a", "A", vec![]);
        assert_eq!(overrides.apply(&source, ty.clone()), ty);
        assert!(overrides.is_empty());
    }

    #[test]
    fn test_pair_overrides_see_both_sources() {
        let mut overrides: PairOverrides<u16, &str, String> = PairOverrides::default();
        overrides.push(|code, name, node| format!("{node}{code}{name}"));
        assert_eq!(overrides.apply(&4, &"x", "n".into()), "n4x");
    }
}
