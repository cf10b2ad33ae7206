pub mod cache;
pub mod cleaner;
pub mod connectors;
pub mod normalize;

pub use cache::HistoryCache;
pub use cleaner::SeriesCleaner;
pub use connectors::{CsvConnector, DataPreview, DatasetMetadata};
pub use normalize::FormatNormalizer;
