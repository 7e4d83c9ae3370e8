//! HTTP snapshot provider.

use async_trait::async_trait;
use reqwest::Client;
use shared_utils::config::SourceSet;

use crate::errors::Error;
use crate::models::snapshot::RawSnapshot;
use crate::providers::SnapshotProvider;

/// Fetches the three datasets from their published URLs.
pub struct HttpProvider {
    client: Client,
    sources: SourceSet,
}

impl HttpProvider {
    /// Build a provider with a dedicated client.
    pub fn new(sources: SourceSet) -> Result<Self, Error> {
        let client = Client::builder()
            .user_agent(concat!("report-sync/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, sources })
    }

    async fn fetch_one(&self, url: &str) -> Result<Vec<u8>, Error> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(Error::Upstream {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl SnapshotProvider for HttpProvider {
    async fn fetch(&self) -> Result<RawSnapshot, Error> {
        // Fixed order; the fingerprint depends on it.
        let nation = self.fetch_one(&self.sources.nation).await?;
        let regions = self.fetch_one(&self.sources.regions).await?;
        let provinces = self.fetch_one(&self.sources.provinces).await?;
        Ok(RawSnapshot {
            nation,
            regions,
            provinces,
        })
    }
}
