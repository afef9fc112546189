//! Configuration structures and loading logic.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub download: DownloadOptions,

    #[serde(default)]
    pub http: HttpOptions,
}

/// Download engine options.
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadOptions {
    /// Root directory for all output.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Re-download volumes whose archive already exists.
    #[serde(default)]
    pub overwrite: bool,

    /// Number of concurrent image fetches per volume.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Delay each fetch slot waits before issuing a request.
    #[serde(default = "default_throttle_interval")]
    pub throttle_interval_ms: u64,

    /// Upper bound of an extra random delay added to each wait.
    #[serde(default)]
    pub throttle_jitter_ms: u64,

    /// Base URL joined with relative image URLs.
    #[serde(default)]
    pub base_image_url: Option<String>,

    /// Extension of downloaded image files (without dot).
    #[serde(default = "default_image_extension")]
    pub image_extension: String,

    /// Extension of volume archives (without dot).
    #[serde(default = "default_archive_extension")]
    pub archive_extension: String,

    /// Whether to show a per-volume progress bar.
    #[serde(default = "default_true")]
    pub show_progress: bool,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            output_dir: None,
            overwrite: false,
            concurrency: default_concurrency(),
            throttle_interval_ms: default_throttle_interval(),
            throttle_jitter_ms: 0,
            base_image_url: None,
            image_extension: default_image_extension(),
            archive_extension: default_archive_extension(),
            show_progress: true,
        }
    }
}

/// HTTP client options.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpOptions {
    /// Browser user agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Accept-Language header sent with every request.
    #[serde(default = "default_accept_language")]
    pub accept_language: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Send the volume page URL as the Referer of its image requests.
    #[serde(default = "default_true")]
    pub send_referer: bool,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
            request_timeout_secs: default_request_timeout(),
            send_referer: true,
        }
    }
}

fn default_concurrency() -> usize {
    5
}

fn default_throttle_interval() -> u64 {
    1000
}

fn default_image_extension() -> String {
    "jpg".to_string()
}

fn default_archive_extension() -> String {
    "zip".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/100.0.4896.127 Safari/537.36".to_string()
}

fn default_accept_language() -> String {
    "zh-CN,zh;q=0.9,en;q=0.8,en-GB;q=0.7,en-US;q=0.6".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Get the effective output root.
    pub fn output_dir(&self) -> PathBuf {
        self.download
            .output_dir
            .clone()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }

    /// Throttle interval as a duration.
    pub fn throttle_interval(&self) -> Duration {
        Duration::from_millis(self.download.throttle_interval_ms)
    }

    /// Throttle jitter as a duration.
    pub fn throttle_jitter(&self) -> Duration {
        Duration::from_millis(self.download.throttle_jitter_ms)
    }

    /// Request timeout as a duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.http.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.download.concurrency, 5);
        assert_eq!(config.download.image_extension, "jpg");
        assert_eq!(config.download.archive_extension, "zip");
        assert!(!config.download.overwrite);
        assert!(config.http.send_referer);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            [download]
            output_dir = "/comics"
            concurrency = 8
            throttle_interval_ms = 250
            base_image_url = "http://img.example.com"

            [http]
            request_timeout_secs = 10
            "#,
        )
        .unwrap();
        assert_eq!(config.output_dir(), PathBuf::from("/comics"));
        assert_eq!(config.download.concurrency, 8);
        assert_eq!(config.throttle_interval(), Duration::from_millis(250));
        assert_eq!(
            config.download.base_image_url.as_deref(),
            Some("http://img.example.com")
        );
        assert_eq!(config.http.request_timeout_secs, 10);
        assert_eq!(config.http.user_agent, default_user_agent());
    }

    #[test]
    fn test_load_from_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[download]\noverwrite = true\n").unwrap();

        let loaded = Config::load(&path).unwrap();
        assert!(loaded.download.overwrite);
        assert_eq!(loaded.download.concurrency, 5);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/no/such/config.toml")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
