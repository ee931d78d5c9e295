//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone, Utc};
use clap::{Args, Subcommand};

use crate::config::Config;
use crate::record::FileInfo;

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Path of the media file (the catalog key)
    #[arg(short, long)]
    pub path: String,

    /// Frames per second
    #[arg(long, default_value_t = 0)]
    pub fps: u32,

    /// Recording start, RFC 3339 or unix seconds [default: now]
    #[arg(long, value_parser = parse_timestamp)]
    pub start: Option<DateTime<Utc>>,

    /// Recording end, RFC 3339 or unix seconds [default: now]
    #[arg(long, value_parser = parse_timestamp)]
    pub end: Option<DateTime<Utc>>,

    /// Duration in seconds
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub duration: i64,

    /// File size in bytes
    #[arg(long, default_value_t = 0)]
    pub size: u64,

    /// Frame width in pixels
    #[arg(long, default_value_t = 0)]
    pub width: u32,

    /// Frame height in pixels
    #[arg(long, default_value_t = 0)]
    pub height: u32,

    /// Media type tag, e.g. MP4
    #[arg(long = "type", default_value = "", allow_hyphen_values = true)]
    pub media_type: String,

    /// Identifier for the file
    #[arg(long = "uuid", default_value = "", allow_hyphen_values = true)]
    pub identifier: String,

    /// GPS information
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub gps: String,

    /// Print the stored record as JSON
    #[arg(short, long)]
    pub json: bool,
}

impl AddCommand {
    /// Build the record to insert, filling missing timestamps with `now`.
    #[must_use]
    pub fn into_file_info(self, now: DateTime<Utc>) -> FileInfo {
        FileInfo {
            path: self.path,
            fps: self.fps,
            start_time: self.start.unwrap_or(now),
            end_time: self.end.unwrap_or(now),
            duration_secs: self.duration,
            size: self.size,
            width: self.width,
            height: self.height,
            media_type: self.media_type,
            identifier: self.identifier,
            gps: self.gps,
        }
    }
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

impl ConfigCommand {
    /// Configuration file this command reads.
    ///
    /// `validate --file` takes precedence over the global `--config`, which
    /// takes precedence over the default location.
    #[must_use]
    pub fn target_file(&self, global: Option<&Path>) -> PathBuf {
        let file = match self {
            Self::Validate { file } => file.as_deref(),
            Self::Show { .. } | Self::Path => None,
        };
        file.or(global)
            .map_or_else(Config::default_config_path, Path::to_path_buf)
    }
}

/// Parse a timestamp given as unix seconds or RFC 3339.
///
/// # Errors
///
/// Returns a message suitable for clap when the input is neither.
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(secs) = input.parse::<i64>() {
        return Utc
            .timestamp_opt(secs, 0)
            .single()
            .ok_or_else(|| format!("unix timestamp out of range: {secs}"));
    }

    DateTime::parse_from_rfc3339(input)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("expected RFC 3339 or unix seconds, got '{input}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};
    use clap::Parser;

    fn parse_add(args: &[&str]) -> AddCommand {
        let mut argv = vec!["mediacat", "add"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Add(add) => add,
            other => panic!("expected add, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_timestamp_unix_seconds() {
        let ts = parse_timestamp("1714564800").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_timestamp_rfc3339_with_offset() {
        let ts = parse_timestamp("2024-05-01T14:00:00+02:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        let err = parse_timestamp("yesterday").unwrap_err();
        assert!(err.contains("yesterday"));
    }

    #[test]
    fn test_parse_timestamp_out_of_range() {
        assert!(parse_timestamp(&i64::MAX.to_string()).is_err());
    }

    #[test]
    fn test_add_defaults() {
        let now = Utc::now();
        let info = parse_add(&["--path", "clip.mp4"]).into_file_info(now);

        assert_eq!(info.path, "clip.mp4");
        assert_eq!(info.start_time, now);
        assert_eq!(info.end_time, now);
        assert_eq!(info.fps, 0);
        assert!(info.media_type.is_empty());
    }

    #[test]
    fn test_add_all_fields() {
        let add = parse_add(&[
            "-p",
            "/media/a.mp4",
            "--fps",
            "25",
            "--start",
            "1714564800",
            "--end",
            "2024-05-01T12:01:00Z",
            "--duration",
            "60",
            "--size",
            "1000",
            "--width",
            "1080",
            "--height",
            "720",
            "--type",
            "MP4",
            "--uuid",
            "-uuid-",
            "--gps",
            "gps info",
            "--json",
        ]);
        assert!(add.json);

        let info = add.into_file_info(Utc::now());
        assert_eq!(info.fps, 25);
        assert_eq!(info.start_time.timestamp(), 1_714_564_800);
        assert_eq!(info.end_time.timestamp(), 1_714_564_860);
        assert_eq!(info.duration_secs, 60);
        assert_eq!(info.size, 1000);
        assert_eq!((info.width, info.height), (1080, 720));
        assert_eq!(info.media_type, "MP4");
        assert_eq!(info.identifier, "-uuid-");
        assert_eq!(info.gps, "gps info");
    }

    #[test]
    fn test_add_accepts_leading_hyphen_values() {
        let info = parse_add(&[
            "-p",
            "harbour.mp4",
            "--gps",
            "-33.8688,151.2093",
            "--type",
            "-raw",
        ])
        .into_file_info(Utc::now());

        assert_eq!(info.gps, "-33.8688,151.2093");
        assert_eq!(info.media_type, "-raw");
    }

    #[test]
    fn test_config_target_file_precedence() {
        let global = Path::new("/etc/mediacatalog/global.toml");
        let explicit = ConfigCommand::Validate {
            file: Some(PathBuf::from("/tmp/good.toml")),
        };
        assert_eq!(
            explicit.target_file(Some(global)),
            PathBuf::from("/tmp/good.toml")
        );

        let bare = ConfigCommand::Validate { file: None };
        assert_eq!(bare.target_file(Some(global)), global);
        assert_eq!(ConfigCommand::Path.target_file(Some(global)), global);
        assert_eq!(
            ConfigCommand::Path.target_file(None),
            Config::default_config_path()
        );
    }

    #[test]
    fn test_add_rejects_bad_timestamp() {
        let result = Cli::try_parse_from(["mediacat", "add", "-p", "a", "--start", "soon"]);
        assert!(result.is_err());
    }
}
