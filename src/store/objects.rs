use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::models::ObjectEntry;

/// Store path prefix holding incoming SOS clips
pub const SOS_PREFIX: &str = "sos_messages/";
/// Store path prefix holding enrollment voice samples
pub const SAMPLE_PREFIX: &str = "voicesamples/";

/// Interface to the object-storage collaborator.
///
/// Listing and retrieval are the only operations the pipeline needs; upload,
/// deletion, and access control belong to the surrounding system.
#[allow(async_fn_in_trait)]
pub trait ObjectStore {
    /// List objects whose path starts with the given prefix
    async fn list_objects(&self, prefix: &str) -> Result<Vec<ObjectEntry>>;

    /// Fetch the raw bytes behind an object's URL
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>>;
}

/// Object store backed by a local JSON manifest.
///
/// Stands in for the storage collaborator when running from the CLI: the
/// manifest lists entries with paths and URLs, and bytes are fetched over
/// HTTP for http(s) URLs or from the filesystem otherwise.
pub struct ManifestStore {
    entries: Vec<ObjectEntry>,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct Manifest {
    objects: Vec<ObjectEntry>,
}

impl ManifestStore {
    pub fn new(entries: Vec<ObjectEntry>) -> Self {
        Self {
            entries,
            http: reqwest::Client::new(),
        }
    }

    /// Load a manifest file of the form `{"objects": [{name, path, url, created_at}]}`
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {:?}", path))?;
        let manifest: Manifest =
            serde_json::from_str(&content).context("Failed to parse manifest JSON")?;
        Ok(Self::new(manifest.objects))
    }
}

impl ObjectStore for ManifestStore {
    async fn list_objects(&self, prefix: &str) -> Result<Vec<ObjectEntry>> {
        Ok(self
            .entries
            .iter()
            .filter(|entry| entry.path.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        if url.starts_with("http://") || url.starts_with("https://") {
            let response = self
                .http
                .get(url)
                .send()
                .await
                .with_context(|| format!("Failed to download {}", url))?
                .error_for_status()
                .with_context(|| format!("Download rejected for {}", url))?;
            let bytes = response
                .bytes()
                .await
                .with_context(|| format!("Failed to read body of {}", url))?;
            Ok(bytes.to_vec())
        } else {
            std::fs::read(url).with_context(|| format!("Failed to read file {}", url))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use chrono::Utc;

    use super::*;

    fn entry(name: &str, prefix: &str) -> ObjectEntry {
        ObjectEntry {
            name: name.to_string(),
            path: format!("{}{}", prefix, name),
            url: format!("https://x/{}", name),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_list_filters_by_prefix() {
        let store = ManifestStore::new(vec![
            entry("a.mp3", SOS_PREFIX),
            entry("b.mp3", SAMPLE_PREFIX),
            entry("c.mp3", SOS_PREFIX),
        ]);

        let sos = store.list_objects(SOS_PREFIX).await.unwrap();
        assert_eq!(sos.len(), 2);
        let samples = store.list_objects(SAMPLE_PREFIX).await.unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].name, "b.mp3");
    }

    #[tokio::test]
    async fn test_fetch_bytes_from_filesystem() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"fake audio bytes").unwrap();

        let store = ManifestStore::new(vec![]);
        let bytes = store
            .fetch_bytes(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(bytes, b"fake audio bytes");
    }

    #[tokio::test]
    async fn test_fetch_bytes_missing_file() {
        let store = ManifestStore::new(vec![]);
        assert!(store.fetch_bytes("/no/such/file.mp3").await.is_err());
    }

    #[test]
    fn test_manifest_parse() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"objects": [{{"name": "a.mp3", "path": "sos_messages/a.mp3",
                "url": "https://x/a.mp3", "created_at": "2026-08-01T10:00:00Z"}}]}}"#
        )
        .unwrap();

        let store = ManifestStore::from_file(file.path()).unwrap();
        assert_eq!(store.entries.len(), 1);
        assert_eq!(store.entries[0].name, "a.mp3");
    }
}
