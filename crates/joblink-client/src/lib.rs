pub mod fetcher;
pub mod sheet;

pub use fetcher::ReqwestFetcher;
pub use sheet::CsvSheet;
