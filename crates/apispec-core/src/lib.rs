//! # apispec-core
//!
//! Turns a host framework's inventory of routed endpoints into a normalized
//! API specification document.
//!
//! This crate provides:
//! - A static type-descriptor registry and endpoint inventory model
//! - Module/resource assignment with per-axis orphan policies
//! - Type-graph discovery with cycle avoidance and deduplication
//! - Convention → default → override resolution for every document node
//! - Deterministic ordering of the generated document
//! - Configuration management and JSON/TOML persistence
//!
//! ## Architecture
//!
//! The crate is organized into the following modules:
//!
//! - [`metadata`] - Type descriptors and the registry
//! - [`inventory`] - Endpoint descriptors, routes and grouping declarations
//! - [`description`] - Description conventions per entity kind
//! - [`overrides`] - Caller-registered override chains
//! - [`options`] - Factories, id conventions and settings for one generation
//! - [`orphans`] - Module and resource assignment
//! - [`type_graph`] - Discovery of catalogued payload types
//! - [`assembler`] - Description resolution for types, members and options
//! - [`endpoints`] - Endpoint assembly and ordering
//! - [`specification`] - The generation entry point
//! - [`merge`] - Merging with a previously saved document
//! - [`model`] - The generated document
//! - [`config`] - Configuration loading, saving, and validation
//! - [`storage`] - Reading and writing inventories and documents
//! - [`error`] - Unified error types for the crate
//!
//! ## Example
//!
//! ```rust
//! use apispec_core::{
//!     EndpointDescriptor, FieldType, HandlerId, Inventory, MemberDescriptor, Route,
//!     SpecificationService, TypeDescriptor,
//! };
//!
//! let mut inventory = Inventory::default();
//! inventory.types.register(TypeDescriptor::complex(
//!     "orders::Order",
//!     "Order",
//!     vec![MemberDescriptor::new("id", FieldType::new("i64"))],
//! ));
//! inventory.endpoints.push(
//!     EndpointDescriptor::new(
//!         HandlerId::new("orders::OrdersHandler", "get"),
//!         Route::new("orders/{id}", &["GET"]),
//!     )
//!     .with_input(FieldType::new("orders::Order"))
//!     .with_output(FieldType::new("orders::Order")),
//! );
//!
//! let specification = SpecificationService::default().generate(&inventory).unwrap();
//! assert_eq!(specification.types.len(), 1);
//! assert_eq!(specification.resources[0].name, "orders");
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(missing_docs)]

pub mod assembler;
pub mod config;
pub mod description;
pub mod endpoints;
pub mod error;
pub mod inventory;
pub mod merge;
pub mod metadata;
pub mod model;
pub mod options;
pub mod orphans;
pub mod overrides;
pub mod specification;
pub mod storage;
pub mod type_graph;

#[cfg(test)]
mod testing;

// Re-export primary types for convenience
pub use config::{
    Config, ConfigError, ConfigResult, EnumValue, InventoryConfig, OrphanPolicy, OutputConfig,
    ServerConfig, SpecificationConfig,
};
pub use description::{
    BoxedConvention, Conventions, DescriptionConvention, ModuleDescription, ResourceDescription,
};
pub use endpoints::verb_rank;
pub use error::{Result, SpecError};
pub use inventory::{
    EndpointDescriptor, HandlerId, Inventory, ModuleDeclaration, ResourceDeclaration, Route,
};
pub use merge::{CommentMerge, MergeService};
pub use metadata::{FieldType, MemberDescriptor, TypeDescriptor, TypeKind, TypeRegistry};
pub use model::Specification;
pub use options::SpecificationOptions;
pub use specification::SpecificationService;
pub use storage::{load_inventory, load_specification, save_specification};
