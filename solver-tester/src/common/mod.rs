pub mod catalog;
pub mod util;

pub use catalog::{CatalogSource, CatalogSourceError};
pub use util::{parse_seeds, split_csv};
