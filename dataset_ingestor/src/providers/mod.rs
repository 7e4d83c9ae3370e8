//! Provider abstraction for snapshot sources.
//!
//! [`SnapshotProvider`] is the unified interface for obtaining one complete
//! raw snapshot, whether the datasets are fetched over HTTP from the
//! publisher or read from a local mirror. The trait is async and
//! object-safe so callers can pick a provider at runtime
//! (`Box<dyn SnapshotProvider>`), which is exactly what
//! [`provider_for`] does based on the configured source locations.

mod file;
mod http;

use async_trait::async_trait;
use shared_utils::config::SourceSet;

use crate::errors::Error;
use crate::models::snapshot::RawSnapshot;

pub use file::FileProvider;
pub use http::HttpProvider;

/// A source of complete raw snapshots.
#[async_trait]
pub trait SnapshotProvider: Send + Sync {
    /// Fetch the three dataset payloads. No parsing, no store access.
    async fn fetch(&self) -> Result<RawSnapshot, Error>;
}

/// Pick a provider for the configured locations: HTTP when all three are
/// URLs, local files otherwise.
pub fn provider_for(sources: &SourceSet) -> Result<Box<dyn SnapshotProvider>, Error> {
    if sources.is_remote() {
        Ok(Box::new(HttpProvider::new(sources.clone())?))
    } else {
        Ok(Box::new(FileProvider::new(sources.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_paths_select_the_file_provider() {
        let sources = SourceSet {
            nation: "_data/nation.json".into(),
            regions: "_data/regions.json".into(),
            provinces: "_data/provinces.json".into(),
        };
        // Just proving the dispatch compiles and picks without error;
        // fetch behavior is covered in the provider modules.
        assert!(provider_for(&sources).is_ok());
    }
}
