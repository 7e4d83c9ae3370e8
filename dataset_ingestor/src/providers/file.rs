//! Local-file snapshot provider, for mirrored datasets.

use async_trait::async_trait;
use shared_utils::config::SourceSet;

use crate::errors::Error;
use crate::models::snapshot::RawSnapshot;
use crate::providers::SnapshotProvider;

/// Reads the three datasets from local paths (e.g. a clone of the
/// publisher's data repository refreshed by an external job).
pub struct FileProvider {
    sources: SourceSet,
}

impl FileProvider {
    /// Build a provider over three local paths.
    pub fn new(sources: SourceSet) -> Self {
        Self { sources }
    }
}

#[async_trait]
impl SnapshotProvider for FileProvider {
    async fn fetch(&self) -> Result<RawSnapshot, Error> {
        let nation = tokio::fs::read(&self.sources.nation).await?;
        let regions = tokio::fs::read(&self.sources.regions).await?;
        let provinces = tokio::fs::read(&self.sources.provinces).await?;
        Ok(RawSnapshot {
            nation,
            regions,
            provinces,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn reads_all_three_files() {
        let dir = tempfile::TempDir::new().unwrap();
        for (name, body) in [("n.json", "[1]"), ("r.json", "[2]"), ("p.json", "[3]")] {
            let mut f = std::fs::File::create(dir.path().join(name)).unwrap();
            write!(f, "{body}").unwrap();
        }
        let at = |name: &str| dir.path().join(name).to_string_lossy().to_string();
        let provider = FileProvider::new(SourceSet {
            nation: at("n.json"),
            regions: at("r.json"),
            provinces: at("p.json"),
        });
        let raw = provider.fetch().await.unwrap();
        assert_eq!(raw.nation, b"[1]");
        assert_eq!(raw.regions, b"[2]");
        assert_eq!(raw.provinces, b"[3]");
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let provider = FileProvider::new(SourceSet {
            nation: "/definitely/not/here.json".into(),
            regions: "/nor/here.json".into(),
            provinces: "/nope.json".into(),
        });
        assert!(matches!(provider.fetch().await, Err(Error::Io(_))));
    }
}
