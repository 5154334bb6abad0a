//! Catalog source port: Trait for loading the static catalogs.
//!
//! Loading is the one blocking boundary of the engine; it happens once at
//! startup, before predictions are served.

use crate::domain::Catalogs;

/// Trait for catalog loading.
pub trait CatalogSource: Send + Sync {
    /// Error type for load operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load every catalog from the underlying source.
    ///
    /// # Errors
    /// Returns error if any catalog is missing or malformed.
    fn load(&self) -> Result<Catalogs, Self::Error>;
}
