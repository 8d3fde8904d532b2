pub mod catalog;
pub mod enrichment;
pub mod providers;
pub mod recommendations;
pub mod similarity;

pub use catalog::{CatalogColumns, CatalogStore};
pub use enrichment::DetailEnricher;
pub use recommendations::{Recommender, DEFAULT_K};
pub use similarity::SimilarityIndex;
