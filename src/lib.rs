pub mod config;
pub mod delay_manager;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod formatter;
pub mod input_loader;
pub mod logger;
pub mod model;
pub mod pipeline;
pub mod reprocessor;
pub mod text;
pub mod toc;

// Exporting types for convenience
pub use config::Config;
pub use delay_manager::DelayRange;
pub use error::{Error, FetchError};
pub use extractor::Extractor;
pub use fetcher::{DocsFetcher, PageSource};
pub use formatter::format_record;
pub use model::{Member, Record};
pub use pipeline::Pipeline;
pub use reprocessor::reprocess_all;
