use crate::config::types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use crate::ConfigError;
use std::fs;
use url::Url;

/// Validates the entire configuration
///
/// Runs before any network activity; any error aborts the run.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    let base_url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if base_url.scheme() != "http" && base_url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must use http or https, got '{}'",
            config.base_url
        )));
    }

    if base_url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url has no host: '{}'",
            config.base_url
        )));
    }

    if config.listing_path.is_empty() {
        return Err(ConfigError::Validation(
            "listing-path cannot be empty".to_string(),
        ));
    }

    if config.seed_page < 1 {
        return Err(ConfigError::Validation(format!(
            "seed-page must be >= 1, got {}",
            config.seed_page
        )));
    }

    if config.parallelism < 1 || config.parallelism > 100 {
        return Err(ConfigError::Validation(format!(
            "parallelism must be between 1 and 100, got {}",
            config.parallelism
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if let Some(contact_url) = &config.contact_url {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;
    }

    Ok(())
}

/// Validates export formats, sort keys and the output directory
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    let formats = config.export_formats()?;
    if formats.is_empty() {
        return Err(ConfigError::Validation(
            "at least one export format is required".to_string(),
        ));
    }

    config.sort_keys()?;

    validate_output_directory(config)
}

fn validate_output_directory(config: &OutputConfig) -> Result<(), ConfigError> {
    let path = config.directory_path();
    let display = path.display().to_string();

    let metadata = fs::metadata(&path).map_err(|e| ConfigError::OutputDirectory {
        path: display.clone(),
        reason: e.to_string(),
    })?;

    if !metadata.is_dir() {
        return Err(ConfigError::OutputDirectory {
            path: display,
            reason: "not a directory".to_string(),
        });
    }

    Ok(())
}
