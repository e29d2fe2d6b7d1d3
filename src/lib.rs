pub mod catalog;
pub mod cli;
pub mod config;
pub mod downloader;
pub mod error;

pub use catalog::{Catalog, ImageEntry};
pub use config::Settings;
pub use downloader::{Downloader, EntryOutcome, FileDownloader, Response, RunResult};
pub use error::FetchError;
