use crate::config::types::{ArchiveConfig, ArtifactsConfig, Config, CrawlerConfig, DatabaseConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_database_config(&config.database)?;
    validate_artifacts_config(&config.artifacts)?;
    if let Some(archive) = &config.archive {
        validate_archive_config(archive)?;
    }
    Ok(())
}

/// Validates crawler configuration
///
/// The day count is deliberately not checked here: a non-positive value
/// is rejected by the date generator at run time, where a CLI override
/// is also subject to the same check.
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "base-url must use HTTPS, got '{}'",
            config.base_url
        )));
    }

    if config.retry_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "retry-attempts must be >= 1, got {}",
            config.retry_attempts
        )));
    }

    if config.settle_delay_ms > 60_000 {
        return Err(ConfigError::Validation(format!(
            "settle-delay-ms must be <= 60000, got {}",
            config.settle_delay_ms
        )));
    }

    if config.retry_delay_ms > 60_000 {
        return Err(ConfigError::Validation(format!(
            "retry-delay-ms must be <= 60000, got {}",
            config.retry_delay_ms
        )));
    }

    Ok(())
}

/// Validates database configuration
fn validate_database_config(config: &DatabaseConfig) -> Result<(), ConfigError> {
    if config.path.is_empty() {
        return Err(ConfigError::Validation(
            "database path cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates artifact storage configuration
fn validate_artifacts_config(config: &ArtifactsConfig) -> Result<(), ConfigError> {
    if config.root.is_empty() {
        return Err(ConfigError::Validation(
            "artifacts root cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates archive configuration
fn validate_archive_config(config: &ArchiveConfig) -> Result<(), ConfigError> {
    if config.bucket.is_empty() {
        return Err(ConfigError::Validation(
            "archive bucket cannot be empty".to_string(),
        ));
    }

    if config.prefix.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "archive prefix must not start with '/', got '{}'",
            config.prefix
        )));
    }

    Ok(())
}
