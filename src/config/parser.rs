use crate::config::types::{Config, DocumentRef};
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    // Read the configuration file
    let content = std::fs::read_to_string(path)?;

    // Parse TOML
    let config: Config = toml::from_str(&content)?;

    // Validate the configuration
    validate(&config)?;

    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// This is used to detect whether the configuration changed between runs,
/// since output files are append-only and a silent config change would mix
/// corpora.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

/// Loads a partition's document list from a JSON file
///
/// The file holds one JSON object mapping document titles to URL templates.
/// Titles are carried only for log messages; the template order in the file
/// is the fetch order, so object key order is preserved.
///
/// # Arguments
///
/// * `path` - Path to the JSON document-list file
///
/// # Returns
///
/// * `Ok(Vec<DocumentRef>)` - Documents in file order
/// * `Err(ConfigError)` - Failed to read or parse the file, or a template
///   is missing a `{lang1}`/`{lang2}` placeholder
pub fn load_documents(path: &Path) -> Result<Vec<DocumentRef>, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let entries: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&content)?;

    let mut documents = Vec::with_capacity(entries.len());
    for (title, value) in entries {
        let template = value.as_str().ok_or_else(|| {
            ConfigError::Validation(format!(
                "Document '{}' in {} must map to a URL template string",
                title,
                path.display()
            ))
        })?;

        for placeholder in ["{lang1}", "{lang2}"] {
            if !template.contains(placeholder) {
                return Err(ConfigError::Validation(format!(
                    "Document '{}' template is missing the {} placeholder",
                    title, placeholder
                )));
            }
        }

        documents.push(DocumentRef {
            title,
            template: template.to_string(),
        });
    }

    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    const VALID_CONFIG: &str = r#"
[crawler]
worker-pool-size = 10
politeness-delay-ms = 500

[output]
directory = "./corpus"

[[language]]
code = "zh"
url-token = "tcv2019"
cell-class = "bstw"
space-insignificant = true

[[language]]
code = "tru"
url-token = "tru"
cell-class = "nor"

[[partition]]
name = "n_testament"
documents = "n_testament.json"
"#;

    #[test]
    fn test_load_valid_config() {
        let file = create_temp_file(VALID_CONFIG);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.worker_pool_size, 10);
        assert_eq!(config.crawler.politeness_delay_ms, 500);
        // Marker falls back to the source site's sentinel
        assert_eq!(config.crawler.continuation_marker, "併於上節");
        assert_eq!(config.languages.len(), 2);
        assert!(config.languages[0].space_insignificant);
        assert!(!config.languages[1].space_insignificant);
        assert_eq!(config.partitions.len(), 1);
    }

    #[test]
    fn test_crawler_section_falls_back_to_defaults() {
        let config_content = r#"
[crawler]

[output]
directory = "./corpus"

[[language]]
code = "zh"
url-token = "tcv2019"
cell-class = "bstw"

[[language]]
code = "tru"
url-token = "tru"
cell-class = "nor"

[[partition]]
name = "n_testament"
documents = "n_testament.json"
"#;
        let file = create_temp_file(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.worker_pool_size, 10);
        assert_eq!(config.crawler.politeness_delay_ms, 500);
        assert_eq!(config.crawler.continuation_marker, "併於上節");
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_file("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_validation_error() {
        // Only one language configured: no pair can be formed
        let config_content = r#"
[crawler]
worker-pool-size = 10
politeness-delay-ms = 500

[output]
directory = "./corpus"

[[language]]
code = "zh"
url-token = "tcv2019"
cell-class = "bstw"

[[partition]]
name = "n_testament"
documents = "n_testament.json"
"#;
        let file = create_temp_file(config_content);
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_file("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        // Same content should produce same hash
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64); // SHA-256 produces 64 hex characters
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_file("content 1");
        let file2 = create_temp_file("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_load_documents_preserves_order() {
        let file = create_temp_file(
            r#"{
  "Zephaniah": "https://example.com/z?a={lang1}&b={lang2}",
  "Genesis": "https://example.com/g?a={lang1}&b={lang2}",
  "Malachi": "https://example.com/m?a={lang1}&b={lang2}"
}"#,
        );

        let documents = load_documents(file.path()).unwrap();
        let titles: Vec<&str> = documents.iter().map(|d| d.title.as_str()).collect();
        // File order, not alphabetical order
        assert_eq!(titles, vec!["Zephaniah", "Genesis", "Malachi"]);
    }

    #[test]
    fn test_load_documents_rejects_missing_placeholder() {
        let file = create_temp_file(r#"{"Genesis": "https://example.com/g?a={lang1}"}"#);
        let result = load_documents(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_load_documents_rejects_non_string_value() {
        let file = create_temp_file(r#"{"Genesis": 42}"#);
        let result = load_documents(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }
}
