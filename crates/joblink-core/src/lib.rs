pub mod adapters;
pub mod company;
pub mod config;
pub mod error;
pub mod industry;
pub mod models;
pub mod patterns;
pub mod period;
pub mod pipeline;
pub mod record;
pub mod testutil;
pub mod text;
pub mod traits;

pub use config::Config;
pub use error::AppError;
pub use models::ScrapedMetadata;
pub use pipeline::{MetadataPipeline, resolve_html};
pub use record::{AssembledRecord, FIELDS, JobRecord, Overrides, assemble_record};
pub use traits::{Fetcher, RowSink};
