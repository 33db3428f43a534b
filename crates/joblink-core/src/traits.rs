use std::future::Future;

use crate::error::AppError;
use crate::record::JobRecord;

/// Fetches raw HTML content from a URL.
pub trait Fetcher: Send + Sync + Clone {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, AppError>> + Send;
}

/// Destination for assembled job records (the tracking sheet).
///
/// Implementations must make sure the header row equals
/// [`FIELDS`](crate::record::FIELDS) before any data row is written.
pub trait RowSink {
    /// Create the header row if missing, or repair it in place if it differs.
    fn ensure_header(&mut self) -> Result<(), AppError>;

    /// Append one record as a new row, in canonical field order.
    fn append_row(&mut self, record: &JobRecord) -> Result<(), AppError>;
}
