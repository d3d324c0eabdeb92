//! Data loading: resolves an ordered list of local/remote sources into raw
//! CSV bytes.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info, warn};

/// A candidate location for the dataset, tried in the order configured.
#[derive(Debug, Clone)]
pub enum DataSource {
    Local(PathBuf),
    Remote(String),
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Local(path) => write!(f, "{}", path.display()),
            DataSource::Remote(url) => write!(f, "{url}"),
        }
    }
}

/// Every configured source was skipped or failed.
#[derive(Debug, Error)]
#[error("all data sources failed; provide a local dataset or check connectivity")]
pub struct DataUnavailable;

/// Raw dataset bytes plus the source they came from.
#[derive(Debug)]
pub struct LoadedData {
    pub bytes: Vec<u8>,
    pub source: String,
}

/// Tries each source in order and returns the first that resolves.
///
/// A local source that does not exist on disk is skipped silently; any
/// other failure is logged and the next source is tried. Sources after the
/// first success are never touched, so a valid local file means no network
/// I/O at all.
///
/// # Errors
///
/// Returns [`DataUnavailable`] when no source yields data.
pub fn load_dataset<C: HttpClient>(
    client: &C,
    sources: &[DataSource],
) -> Result<LoadedData, DataUnavailable> {
    for source in sources {
        match source {
            DataSource::Local(path) => {
                if !path.exists() {
                    debug!(path = %path.display(), "local source not present, skipping");
                    continue;
                }
                match std::fs::read(path) {
                    Ok(bytes) => {
                        info!(path = %path.display(), bytes = bytes.len(), "loaded local dataset");
                        return Ok(LoadedData {
                            bytes,
                            source: source.to_string(),
                        });
                    }
                    Err(e) => warn!(path = %path.display(), error = %e, "local read failed"),
                }
            }
            DataSource::Remote(url) => {
                info!(url, "downloading dataset");
                match client.get(url) {
                    Ok(bytes) => {
                        info!(url, bytes = bytes.len(), "download complete");
                        return Ok(LoadedData {
                            bytes,
                            source: source.to_string(),
                        });
                    }
                    Err(e) => warn!(url, error = %e, "download failed"),
                }
            }
        }
    }

    Err(DataUnavailable)
}
