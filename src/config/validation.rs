//! Configuration validation logic.

use regex::Regex;

use crate::config::loader::Config;
use crate::error::{Error, Result};

/// Maximum number of concurrent fetches per volume.
const MAX_CONCURRENCY: usize = 64;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_concurrency(config.download.concurrency)?;
    validate_extension("image_extension", &config.download.image_extension)?;
    validate_extension("archive_extension", &config.download.archive_extension)?;
    if let Some(base) = &config.download.base_image_url {
        validate_base_image_url(base)?;
    }
    validate_timeout(config.http.request_timeout_secs)?;
    validate_user_agent(&config.http.user_agent)?;

    Ok(())
}

/// Validate the per-volume concurrency.
pub fn validate_concurrency(concurrency: usize) -> Result<()> {
    if concurrency == 0 || concurrency > MAX_CONCURRENCY {
        return Err(Error::ConfigValidation {
            field: "concurrency".to_string(),
            message: format!(
                "Concurrency must be between 1 and {} (got {})",
                MAX_CONCURRENCY, concurrency
            ),
        });
    }
    Ok(())
}

/// Validate a file extension (without the leading dot).
pub fn validate_extension(field: &str, extension: &str) -> Result<()> {
    if extension.is_empty() {
        return Err(Error::MissingConfig(field.to_string()));
    }

    let pattern = Regex::new(r"^[A-Za-z0-9]{1,8}$").unwrap();
    if !pattern.is_match(extension) {
        return Err(Error::ConfigValidation {
            field: field.to_string(),
            message: format!(
                "Extension '{}' must be 1-8 alphanumeric characters without a leading dot",
                extension
            ),
        });
    }

    Ok(())
}

/// Validate the base URL used for relative image URLs.
pub fn validate_base_image_url(base: &str) -> Result<()> {
    let url = url::Url::parse(base).map_err(|e| Error::ConfigValidation {
        field: "base_image_url".to_string(),
        message: format!("'{}' is not an absolute URL: {}", base, e),
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(Error::ConfigValidation {
            field: "base_image_url".to_string(),
            message: format!("Unsupported scheme '{}'", url.scheme()),
        });
    }

    Ok(())
}

/// Validate the request timeout.
pub fn validate_timeout(seconds: u64) -> Result<()> {
    if seconds == 0 {
        return Err(Error::ConfigValidation {
            field: "request_timeout_secs".to_string(),
            message: "Timeout must be at least 1 second".to_string(),
        });
    }
    Ok(())
}

/// Validate the user agent string.
pub fn validate_user_agent(user_agent: &str) -> Result<()> {
    if user_agent.trim().is_empty() {
        return Err(Error::MissingConfig("user_agent".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_concurrency_bounds() {
        assert!(validate_concurrency(1).is_ok());
        assert!(validate_concurrency(64).is_ok());
        assert!(validate_concurrency(0).is_err());
        assert!(validate_concurrency(65).is_err());
    }

    #[test]
    fn test_extension() {
        assert!(validate_extension("image_extension", "jpg").is_ok());
        assert!(validate_extension("archive_extension", "cbz").is_ok());
        assert!(matches!(
            validate_extension("image_extension", ""),
            Err(Error::MissingConfig(_))
        ));
        assert!(validate_extension("image_extension", ".jpg").is_err());
        assert!(validate_extension("image_extension", "a/b").is_err());
    }

    #[test]
    fn test_base_image_url() {
        assert!(validate_base_image_url("http://lao.haotu90.top").is_ok());
        assert!(validate_base_image_url("https://img.example.com/images/").is_ok());
        assert!(validate_base_image_url("/images").is_err());
        assert!(validate_base_image_url("ftp://example.com").is_err());
    }

    #[test]
    fn test_timeout() {
        assert!(validate_timeout(0).is_err());
        assert!(validate_timeout(5).is_ok());
    }
}
