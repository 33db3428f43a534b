//! Test utilities: mock implementations of the core traits.
//!
//! Handwritten mocks for dependency injection in unit tests.
//! Mocks use `Arc<Mutex<_>>` for interior mutability, allowing
//! test assertions on recorded calls.

use std::sync::{Arc, Mutex};

use crate::error::AppError;
use crate::record::{FIELDS, JobRecord};
use crate::traits::{Fetcher, RowSink};

// ---------------------------------------------------------------------------
// MockFetcher
// ---------------------------------------------------------------------------

/// Mock fetcher that returns a configurable response.
#[derive(Clone)]
pub struct MockFetcher {
    /// Queue of responses. Each call pops the first element.
    /// If empty, returns a default HTML string.
    responses: Arc<Mutex<Vec<Result<String, AppError>>>>,
    /// URLs requested so far.
    pub requested: Arc<Mutex<Vec<String>>>,
}

impl MockFetcher {
    pub fn new(html: &str) -> Self {
        Self::with_responses(vec![Ok(html.to_string())])
    }

    pub fn with_error(error: AppError) -> Self {
        Self::with_responses(vec![Err(error)])
    }

    pub fn with_responses(responses: Vec<Result<String, AppError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            requested: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        self.requested.lock().unwrap().push(url.to_string());
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok("<html><body>default</body></html>".to_string())
        } else {
            responses.remove(0)
        }
    }
}

// ---------------------------------------------------------------------------
// MemorySink
// ---------------------------------------------------------------------------

/// In-memory sheet: row 0 is the header once ensured.
#[derive(Clone, Default)]
pub struct MemorySink {
    pub rows: Arc<Mutex<Vec<Vec<String>>>>,
    fail_append: Option<Arc<Mutex<Option<AppError>>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sheet whose first row is already `header`.
    pub fn with_header(header: &[&str]) -> Self {
        let sink = Self::default();
        sink.rows
            .lock()
            .unwrap()
            .push(header.iter().map(|h| h.to_string()).collect());
        sink
    }

    /// A sink whose next append fails.
    pub fn with_append_error(error: AppError) -> Self {
        Self {
            rows: Arc::default(),
            fail_append: Some(Arc::new(Mutex::new(Some(error)))),
        }
    }
}

impl RowSink for MemorySink {
    fn ensure_header(&mut self) -> Result<(), AppError> {
        let header: Vec<String> = FIELDS.iter().map(|f| f.to_string()).collect();
        let mut rows = self.rows.lock().unwrap();
        match rows.first_mut() {
            None => rows.push(header),
            Some(first) if *first != header => *first = header,
            Some(_) => {}
        }
        Ok(())
    }

    fn append_row(&mut self, record: &JobRecord) -> Result<(), AppError> {
        if let Some(fail) = &self.fail_append {
            if let Some(e) = fail.lock().unwrap().take() {
                return Err(e);
            }
        }
        self.rows.lock().unwrap().push(record.to_row());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_repairs_header() {
        let mut sink = MemorySink::with_header(&["AID", "Wrong"]);
        sink.ensure_header().unwrap();
        sink.append_row(&JobRecord::default()).unwrap();
        let rows = sink.rows.lock().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], FIELDS.to_vec());
    }

    #[test]
    fn memory_sink_append_error() {
        let mut sink = MemorySink::with_append_error(AppError::SinkError("quota".into()));
        sink.ensure_header().unwrap();
        assert!(sink.append_row(&JobRecord::default()).is_err());
        assert!(sink.append_row(&JobRecord::default()).is_ok());
    }
}
