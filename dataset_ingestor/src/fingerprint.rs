//! Content fingerprint over a raw snapshot.
//!
//! The refresh pipeline compares this against the fingerprint persisted
//! with the previous refresh to decide whether anything changed upstream.
//! The hash covers the three payloads in a fixed order (nation, regions,
//! provinces) so the value is deterministic for a given snapshot.

use sha2::{Digest, Sha256};

use crate::models::snapshot::RawSnapshot;

/// Hasher input granularity. Keeps each `update` call bounded no matter
/// how large a payload grows.
const CHUNK_SIZE: usize = 4096;

/// Hex-encoded SHA-256 over the three payloads in publisher order.
pub fn fingerprint(raw: &RawSnapshot) -> String {
    let mut hasher = Sha256::new();
    for payload in [&raw.nation, &raw.regions, &raw.provinces] {
        for chunk in payload.chunks(CHUNK_SIZE) {
            hasher.update(chunk);
        }
    }
    format!("{:x}", hasher.finalize())
}
