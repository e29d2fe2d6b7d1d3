mod fetcher;

use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use url::Url;

use crate::catalog::{Catalog, ImageEntry};
use crate::config::Settings;
use crate::error::FetchError;

pub use fetcher::UReqFetcher;

#[derive(Debug)]
pub enum Response {
    Ok(Vec<u8>),
    Status(u16),
    NetworkError(String),
    InvalidBody(String),
}

impl Response {
    pub fn ok(body: Vec<u8>) -> Self {
        Self::Ok(body)
    }

    pub fn status(code: u16) -> Self {
        Self::Status(code)
    }

    pub fn not_found() -> Self {
        Self::Status(404)
    }

    pub fn network_error(reason: impl Into<String>) -> Self {
        Self::NetworkError(reason.into())
    }

    pub fn invalid_body(reason: impl Into<String>) -> Self {
        Self::InvalidBody(reason.into())
    }
}

pub trait FileDownloader {
    fn fetch(&self, url: &str) -> Response;
}

/// What happened to a single catalog entry.
#[derive(Debug)]
pub enum EntryOutcome {
    /// The file was already on disk and large enough.
    Skipped,
    Downloaded { bytes: usize },
    Failed { error: FetchError },
}

impl EntryOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunResult {
    pub success_count: usize,
    pub fail_count: usize,
}

impl RunResult {
    pub fn record(&mut self, outcome: &EntryOutcome) {
        if outcome.is_success() {
            self.success_count += 1;
        } else {
            self.fail_count += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.success_count + self.fail_count
    }
}

enum ExistingFile {
    Missing,
    Valid,
    Incomplete(u64),
}

pub struct Downloader<T: FileDownloader> {
    fetcher: T,
    root: PathBuf,
    delay: Duration,
    min_valid_size: u64,
}

impl<T> Downloader<T>
where
    T: FileDownloader,
{
    /// Creates the root directory if needed.
    pub fn with_fetcher(settings: &Settings, fetcher: T) -> Result<Self, FetchError> {
        let root = Self::create_root(&settings.root_dir)?;

        Ok(Downloader {
            fetcher,
            root,
            delay: settings.delay(),
            min_valid_size: settings.min_valid_size,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Processes every entry once, in catalog order.
    ///
    /// Network failures are counted and the loop moves on; filesystem errors
    /// abort the run.
    pub fn run(&self, catalog: &Catalog) -> Result<RunResult, FetchError> {
        tracing::info!(root = %self.root.display(), entries = catalog.len(), "Starting download");

        let mut result = RunResult::default();

        for entry in catalog {
            let outcome = self.process(entry)?;

            result.record(&outcome);
        }

        tracing::info!(
            succeeded = result.success_count,
            failed = result.fail_count,
            "Download finished"
        );

        Ok(result)
    }

    pub fn process(&self, entry: &ImageEntry) -> Result<EntryOutcome, FetchError> {
        let relative = entry.relative_path.display();

        let target = self.root.join(&entry.relative_path);

        match self.check_existing(&target)? {
            ExistingFile::Valid => {
                println!("⚠ exists, skipping: {}", relative);

                return Ok(EntryOutcome::Skipped);
            }

            ExistingFile::Incomplete(size) => {
                println!("⚠ exists but looks corrupt, re-downloading: {}", relative);

                tracing::debug!(path = %target.display(), size, "Removing incomplete file");

                fs::remove_file(&target)?;
            }

            ExistingFile::Missing => {}
        }

        let outcome = match self.fetch(&entry.source_url) {
            Ok(body) => {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }

                fs::write(&target, &body)?;

                println!("✓ downloaded: {}", relative);

                tracing::debug!(path = %target.display(), bytes = body.len(), "Saved file");

                EntryOutcome::Downloaded { bytes: body.len() }
            }

            Err(error) => {
                println!("✗ failed: {} - {}", relative, error);

                tracing::warn!(url = %entry.source_url, %error, "Download failed");

                EntryOutcome::Failed { error }
            }
        };

        tracing::trace!(delay_ms = self.delay.as_millis() as u64, "Waiting before next request");

        thread::sleep(self.delay);

        Ok(outcome)
    }

    fn check_existing(&self, target: &Path) -> Result<ExistingFile, FetchError> {
        match fs::metadata(target) {
            Ok(metadata) if metadata.len() > self.min_valid_size => Ok(ExistingFile::Valid),
            Ok(metadata) => Ok(ExistingFile::Incomplete(metadata.len())),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(ExistingFile::Missing),
            Err(error) => Err(error.into()),
        }
    }

    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        tracing::debug!(url = parsed.as_str(), "Fetching");

        match self.fetcher.fetch(parsed.as_str()) {
            Response::Ok(body) => Ok(body),

            Response::Status(status) => Err(FetchError::Status {
                url: url.to_string(),
                status,
            }),

            Response::NetworkError(reason) => Err(FetchError::Network {
                url: url.to_string(),
                reason,
            }),

            Response::InvalidBody(reason) => Err(FetchError::InvalidBody {
                url: url.to_string(),
                reason,
            }),
        }
    }

    fn create_root(root: &Path) -> Result<PathBuf, FetchError> {
        let absolute_path = if root.is_absolute() {
            root.to_path_buf()
        } else {
            env::current_dir()?.join(root)
        };

        fs::create_dir_all(&absolute_path)?;

        Ok(absolute_path)
    }
}

impl Downloader<UReqFetcher> {
    pub fn new(settings: &Settings) -> Result<Self, FetchError> {
        let fetcher = UReqFetcher::new(settings.timeout(), &settings.user_agent);

        Downloader::with_fetcher(settings, fetcher)
    }
}

#[cfg(test)]
use fetcher::MockFetcher;
