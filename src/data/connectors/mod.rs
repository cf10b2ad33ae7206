mod csv;
mod types;
mod validator;

pub use csv::CsvConnector;
pub use types::{
    ColumnStats,
    DataPreview,
    DatasetMetadata,
    OptionalColumn,
    RequiredColumn,
};
pub use validator::{clean_header, FrameValidator};
