//! Application state shared across handlers.

use std::sync::Arc;

use apispec_core::{
    load_inventory, Config, Inventory, Result, Specification, SpecificationOptions,
    SpecificationService,
};
use tokio::sync::RwLock;
use tracing::info;

/// Shared application state.
pub type SharedState = Arc<RwLock<AppState>>;

/// The loaded configuration, inventory snapshot and the document generated
/// from them.
#[derive(Debug)]
pub struct AppState {
    /// Active configuration.
    pub config: Config,
    /// Inventory the specification was generated from.
    pub inventory: Inventory,
    /// Current specification.
    pub specification: Specification,
}

/// Generate a specification for `inventory` with the settings in `config`.
///
/// # Errors
///
/// Propagates every generation error.
pub fn generate(config: &Config, inventory: &Inventory) -> Result<Specification> {
    let options = SpecificationOptions::new(config.specification.clone());
    SpecificationService::new(options).generate(inventory)
}

impl AppState {
    /// State for an already loaded inventory.
    ///
    /// # Errors
    ///
    /// Propagates every generation error.
    pub fn new(config: Config, inventory: Inventory) -> Result<Self> {
        let specification = generate(&config, &inventory)?;
        Ok(Self {
            config,
            inventory,
            specification,
        })
    }

    /// Load the inventory named in `config` and generate from it.
    ///
    /// # Errors
    ///
    /// Fails if the inventory cannot be read or generation fails.
    pub fn load(config: Config) -> Result<Self> {
        let inventory = load_inventory(&config.inventory.path)?;
        info!(
            path = %config.inventory.path.display(),
            endpoints = inventory.endpoints.len(),
            "Loaded inventory"
        );
        Self::new(config, inventory)
    }

    /// Wrap in [`SharedState`].
    #[must_use]
    pub fn shared(self) -> SharedState {
        Arc::new(RwLock::new(self))
    }
}

/// Reload the inventory and regenerate, swapping the new document in only
/// when generation succeeds.
///
/// # Errors
///
/// Fails if the inventory cannot be read or generation fails; the current
/// document is kept.
pub async fn regenerate(state: &SharedState) -> Result<Specification> {
    let config = state.read().await.config.clone();
    let inventory = load_inventory(&config.inventory.path)?;
    let specification = generate(&config, &inventory)?;

    let mut guard = state.write().await;
    guard.inventory = inventory;
    guard.specification = specification.clone();
    info!(
        types = specification.types.len(),
        modules = specification.modules.len(),
        "Specification regenerated"
    );
    Ok(specification)
}
