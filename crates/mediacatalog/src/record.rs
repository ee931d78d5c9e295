//! Media file metadata records.
//!
//! A [`FileInfo`] maps one-to-one onto a row of the `files` table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata describing a single media file.
///
/// The `path` is the catalog key; everything else is stored as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    /// Location of the media file. Unique within a catalog.
    pub path: String,

    /// Frames per second.
    pub fps: u32,

    /// When recording started.
    pub start_time: DateTime<Utc>,

    /// When recording ended.
    pub end_time: DateTime<Utc>,

    /// Length of the media in seconds.
    pub duration_secs: i64,

    /// File size in bytes.
    pub size: u64,

    /// Frame width in pixels.
    pub width: u32,

    /// Frame height in pixels.
    pub height: u32,

    /// Container or media type tag, e.g. `MP4`.
    pub media_type: String,

    /// Free-form identifier for the file.
    pub identifier: String,

    /// GPS information, stored verbatim.
    pub gps: String,
}

impl FileInfo {
    /// Create a record for `path` with both timestamps set to now and every
    /// other field zero or empty.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            path: path.into(),
            fps: 0,
            start_time: now,
            end_time: now,
            duration_secs: 0,
            size: 0,
            width: 0,
            height: 0,
            media_type: String::new(),
            identifier: String::new(),
            gps: String::new(),
        }
    }

    /// The fixed record inserted by `mediacat demo`.
    #[must_use]
    pub fn sample(now: DateTime<Utc>) -> Self {
        Self {
            path: "test".to_string(),
            fps: 25,
            start_time: now,
            end_time: now,
            duration_secs: 0,
            size: 1000,
            width: 1080,
            height: 720,
            media_type: "MP4".to_string(),
            identifier: "-uuid-".to_string(),
            gps: "gps info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults() {
        let info = FileInfo::new("/media/clip.mp4");

        assert_eq!(info.path, "/media/clip.mp4");
        assert_eq!(info.fps, 0);
        assert_eq!(info.start_time, info.end_time);
        assert_eq!(info.duration_secs, 0);
        assert_eq!(info.size, 0);
        assert!(info.media_type.is_empty());
        assert!(info.identifier.is_empty());
        assert!(info.gps.is_empty());
    }

    #[test]
    fn test_sample_record() {
        let now = Utc::now();
        let info = FileInfo::sample(now);

        assert_eq!(info.path, "test");
        assert_eq!(info.fps, 25);
        assert_eq!(info.start_time, now);
        assert_eq!(info.end_time, now);
        assert_eq!(info.size, 1000);
        assert_eq!((info.width, info.height), (1080, 720));
        assert_eq!(info.media_type, "MP4");
        assert_eq!(info.identifier, "-uuid-");
        assert_eq!(info.gps, "gps info");
    }

    #[test]
    fn test_json_field_names() {
        let info = FileInfo::sample(Utc::now());
        let json = serde_json::to_value(&info).unwrap();

        assert_eq!(json["path"], "test");
        assert_eq!(json["media_type"], "MP4");
        assert_eq!(json["duration_secs"], 0);
    }
}
