//! Reading inventories and reading/writing specification documents.
//!
//! Inventories are JSON or TOML, picked by file extension. Specifications
//! are always pretty-printed JSON.

use std::path::Path;

use crate::error::{Result, SpecError};
use crate::inventory::Inventory;
use crate::model::Specification;

fn parse_error(path: &Path, message: impl ToString) -> SpecError {
    SpecError::DocumentParseError {
        path: path.to_path_buf(),
        message: message.to_string(),
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
}

/// Load an endpoint inventory.
///
/// # Errors
///
/// Returns [`SpecError::IoError`] if the file cannot be read and
/// [`SpecError::DocumentParseError`] if it is not a valid inventory.
pub fn load_inventory(path: impl AsRef<Path>) -> Result<Inventory> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    if is_toml(path) {
        toml::from_str(&content).map_err(|e| parse_error(path, e))
    } else {
        serde_json::from_str(&content).map_err(|e| parse_error(path, e))
    }
}

/// Load a previously saved specification.
///
/// # Errors
///
/// Returns [`SpecError::IoError`] if the file cannot be read and
/// [`SpecError::DocumentParseError`] if it is not a valid document.
pub fn load_specification(path: impl AsRef<Path>) -> Result<Specification> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| parse_error(path, e))
}

/// Save a specification as pretty JSON, creating parent directories.
///
/// # Errors
///
/// Returns [`SpecError::IoError`] if the file cannot be written.
pub fn save_specification(specification: &Specification, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let content = serde_json::to_string_pretty(specification)
        .map_err(|e| SpecError::PersistenceError(e.to_string()))?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_specification_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out").join("specification.json");
        let specification = Specification {
            name: "Shop".into(),
            comments: Some("Shop API".into()),
            ..Specification::default()
        };

        save_specification(&specification, &path).unwrap();
        let loaded = load_specification(&path).unwrap();
        assert_eq!(loaded, specification);
    }

    #[test]
    fn test_load_inventory_from_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("inventory.toml");
        std::fs::write(
            &path,
            r#"
[[types]]
key = "orders::Order"
name = "Order"
kind = "complex"

[[modules]]
namespace = "orders"
name = "Orders"

[[endpoints]]
handler = { handler_type = "orders::OrdersHandler", method = "get" }
route = { pattern = "orders/{id}", methods = ["GET"] }
output = { type = "orders::Order" }
"#,
        )
        .unwrap();

        let inventory = load_inventory(&path).unwrap();
        assert_eq!(inventory.endpoints.len(), 1);
        assert_eq!(inventory.modules[0].name, "Orders");
        assert!(inventory.types.get("orders::Order").is_some());
    }

    #[test]
    fn test_load_inventory_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("inventory.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = load_inventory(&path).unwrap_err();
        assert!(matches!(err, SpecError::DocumentParseError { .. }));
        assert!(err.is_io_error());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_specification("/nonexistent/specification.json").unwrap_err();
        assert!(matches!(err, SpecError::IoError(_)));
    }
}
