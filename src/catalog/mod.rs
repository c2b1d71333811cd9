pub mod debris_catalog;
pub mod loader;

pub use debris_catalog::{DebrisCatalog, FragmentId, FragmentRecord};
pub use loader::{load_catalog, read_catalog, CatalogFilter};
