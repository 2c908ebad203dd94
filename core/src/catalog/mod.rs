//! Mitigation source catalogs from TOML
//!
//! ```toml
//! [[source]]
//! name = "Major Resolve"
//! source = "buff"
//! ability_id = 61694
//! resistance_value = 5948
//!
//! [[source]]
//! name = "Fortified Brass"
//! source = "gear"
//! set_id = 352
//! number_of_pieces = 4
//! resistance_value = 3460
//! ```

mod error;
mod loader;

pub use error::CatalogError;
pub use loader::{CatalogFile, load_catalog_file, load_catalog_str};
