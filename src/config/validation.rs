use crate::config::types::{Config, CrawlerConfig, LanguageEntry, OutputConfig, PartitionEntry};
use crate::ConfigError;
use std::collections::HashSet;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    validate_languages(&config.languages)?;
    validate_partitions(&config.partitions)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.worker_pool_size < 1 || config.worker_pool_size > 100 {
        return Err(ConfigError::Validation(format!(
            "worker_pool_size must be between 1 and 100, got {}",
            config.worker_pool_size
        )));
    }

    if config.politeness_delay_ms < 1 {
        return Err(ConfigError::Validation(format!(
            "politeness_delay_ms must be >= 1ms, got {}ms",
            config.politeness_delay_ms
        )));
    }

    if config.continuation_marker.is_empty() {
        return Err(ConfigError::Validation(
            "continuation_marker cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the configured language set
fn validate_languages(languages: &[LanguageEntry]) -> Result<(), ConfigError> {
    if languages.len() < 2 {
        return Err(ConfigError::Validation(format!(
            "at least 2 languages are required to form a pair, got {}",
            languages.len()
        )));
    }

    let mut seen = HashSet::new();
    for language in languages {
        if language.code.is_empty() {
            return Err(ConfigError::Validation(
                "language code cannot be empty".to_string(),
            ));
        }

        if !seen.insert(language.code.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate language code '{}'",
                language.code
            )));
        }

        if language.url_token.is_empty() {
            return Err(ConfigError::Validation(format!(
                "language '{}' has an empty url-token",
                language.code
            )));
        }

        validate_cell_class(&language.code, &language.cell_class)?;
    }

    Ok(())
}

/// Validates a cell class name
///
/// Classes are spliced into `td.{class}` selectors, so they are restricted
/// to characters that cannot change the selector's meaning.
fn validate_cell_class(code: &str, class: &str) -> Result<(), ConfigError> {
    if class.is_empty() {
        return Err(ConfigError::Validation(format!(
            "language '{}' has an empty cell-class",
            code
        )));
    }

    if !class
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "cell-class '{}' for language '{}' may contain only alphanumerics, '-' and '_'",
            class, code
        )));
    }

    Ok(())
}

/// Validates partition entries
fn validate_partitions(partitions: &[PartitionEntry]) -> Result<(), ConfigError> {
    if partitions.is_empty() {
        return Err(ConfigError::Validation(
            "at least one partition is required".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for partition in partitions {
        if partition.name.is_empty() {
            return Err(ConfigError::Validation(
                "partition name cannot be empty".to_string(),
            ));
        }

        if !seen.insert(partition.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate partition name '{}'",
                partition.name
            )));
        }

        if partition.documents.is_empty() {
            return Err(ConfigError::Validation(format!(
                "partition '{}' has an empty documents path",
                partition.name
            )));
        }
    }

    Ok(())
}
