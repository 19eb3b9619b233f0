use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single object listed from the audio store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectEntry {
    /// Object file name (e.g. "BPriyaa_Stranded.mp3")
    pub name: String,
    /// Full path within the store (e.g. "sos_messages/BPriyaa_Stranded.mp3")
    pub path: String,
    /// Resolvable download URL
    pub url: String,
    /// Creation timestamp reported by the store
    pub created_at: DateTime<Utc>,
}

/// Raw audio fetched from the store. Immutable once fetched.
#[derive(Debug, Clone)]
pub struct AudioClip {
    /// URL the bytes were fetched from
    pub source_url: String,
    /// Opaque audio payload
    pub bytes: Vec<u8>,
    /// When the fetch completed
    pub fetched_at: DateTime<Utc>,
}

impl AudioClip {
    pub fn new(source_url: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            source_url: source_url.into(),
            bytes,
            fetched_at: Utc::now(),
        }
    }

    /// Trailing path segment of the source URL with any query string stripped
    pub fn filename(&self) -> &str {
        filename_from_url(&self.source_url)
    }
}

/// Extract the filename component from a download URL
pub fn filename_from_url(url: &str) -> &str {
    let last = url.rsplit('/').next().unwrap_or(url);
    last.split('?').next().unwrap_or(last)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_from_url() {
        assert_eq!(filename_from_url("https://x/o/a.mp3?alt=media"), "a.mp3");
        assert_eq!(filename_from_url("a.mp3"), "a.mp3");
        assert_eq!(
            filename_from_url("https://store/o/sos_messages%2FBPriyaa_Stranded.mp3?token=t"),
            "sos_messages%2FBPriyaa_Stranded.mp3"
        );
    }

    #[test]
    fn test_clip_filename() {
        let clip = AudioClip::new("https://x/voicesamples/Udhay_samplevoice.mp3?alt=media", vec![]);
        assert_eq!(clip.filename(), "Udhay_samplevoice.mp3");
    }
}
