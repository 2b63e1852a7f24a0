// ⚙️ Loader configuration
// Defaults match the BioMuta v3 complete dataset; a TOML file may override them

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{IngestError, Result};

/// Name of the export inside the data folder
pub const DEFAULT_FILE_NAME: &str = "biomuta-master.csv";

/// Column count of the BioMuta v3 header
pub const VALID_COLUMN_NO: usize = 22;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderConfig {
    /// File name looked up inside the data folder
    pub file_name: String,

    /// Exact number of header columns required
    pub expected_columns: usize,

    /// Placeholder values that mean "no value" in optional fields
    pub sentinels: Vec<String>,

    /// Delimiter of multi-valued fields (uberon_id, pmid_list)
    pub list_separator: String,

    /// Keys left as strings by the numeric coercion pass
    pub numeric_skip_keys: Vec<String>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        LoaderConfig {
            file_name: DEFAULT_FILE_NAME.to_string(),
            expected_columns: VALID_COLUMN_NO,
            sentinels: vec!["-".to_string()],
            list_separator: ";".to_string(),
            numeric_skip_keys: Vec::new(),
        }
    }
}

impl LoaderConfig {
    /// Parse a TOML document; absent keys keep their defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: LoaderConfig =
            toml::from_str(text).map_err(|e| IngestError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| IngestError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.file_name.trim().is_empty() {
            return Err(IngestError::Config("file_name must not be empty".to_string()));
        }
        if self.expected_columns == 0 {
            return Err(IngestError::Config(
                "expected_columns must be greater than zero".to_string(),
            ));
        }
        if self.list_separator.is_empty() {
            return Err(IngestError::Config(
                "list_separator must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// True when `value` is one of the configured "no value" placeholders
    pub fn is_sentinel(&self, value: &str) -> bool {
        self.sentinels.iter().any(|s| s == value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LoaderConfig::default();
        assert_eq!(config.file_name, "biomuta-master.csv");
        assert_eq!(config.expected_columns, 22);
        assert!(config.is_sentinel("-"));
        assert!(!config.is_sentinel(""));
        assert_eq!(config.list_separator, ";");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = LoaderConfig::from_toml_str("expected_columns = 23\n").unwrap();
        assert_eq!(config.expected_columns, 23);
        assert_eq!(config.file_name, DEFAULT_FILE_NAME);
        assert_eq!(config.sentinels, vec!["-".to_string()]);
    }

    #[test]
    fn test_sentinel_override() {
        let config = LoaderConfig::from_toml_str("sentinels = [\"-\", \"NA\"]\n").unwrap();
        assert!(config.is_sentinel("NA"));
        assert!(config.is_sentinel("-"));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = LoaderConfig::from_toml_str("colums = 3\n");
        assert!(matches!(result, Err(IngestError::Config(_))));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(LoaderConfig::from_toml_str("expected_columns = 0\n").is_err());
        assert!(LoaderConfig::from_toml_str("list_separator = \"\"\n").is_err());
        assert!(LoaderConfig::from_toml_str("file_name = \" \"\n").is_err());
    }
}
