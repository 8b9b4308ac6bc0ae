use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::catalog::FieldCatalog;

/// Top-level application configuration loaded from file + environment.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub catalog: CatalogSection,
    pub logging: LoggingSection,
}

impl AppConfig {
    /// Load configuration from disk and environment.
    pub fn load() -> Result<Self> {
        let config_path = env::var("DASHLENS_CONFIG").unwrap_or_else(|_| "config.toml".to_string());

        let mut builder = config::Config::builder();

        if Path::new(&config_path).exists() {
            builder = builder.add_source(config::File::from(PathBuf::from(&config_path)));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("DASHLENS")
                .separator("_")
                .try_parsing(true),
        );

        let settings = builder.build()?;
        let mut config: Self = settings.try_deserialize()?;

        if config.logging.level.trim().is_empty() {
            config.logging.level = "info".to_string();
        }

        Ok(config)
    }

    /// Load the field catalog named by `catalog.file`, or an empty catalog
    /// when no file is configured.
    pub fn load_catalog(&self) -> Result<FieldCatalog> {
        let Some(file) = &self.catalog.file else {
            return Ok(FieldCatalog::new());
        };

        let settings = config::Config::builder()
            .add_source(config::File::from(PathBuf::from(file)))
            .build()
            .with_context(|| format!("failed to read catalog file {}", file))?;

        settings
            .try_deserialize()
            .with_context(|| format!("invalid catalog file {}", file))
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct CatalogSection {
    pub file: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Text,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.catalog.file.is_none());
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_load_catalog_without_file_is_empty() {
        let config = AppConfig::default();
        let catalog = config.load_catalog().unwrap();
        assert!(catalog.database_with_name("db1").name.is_empty());
    }

    #[test]
    fn test_load_catalog_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[databases.db1]
pretty_name = "Database One"

[databases.db1.tables.t1]
pretty_name = "Table One"

[databases.db1.tables.t1.fields.id]
pretty_name = "Identifier"
type = "keyword"
"#
        )
        .unwrap();

        let config = AppConfig {
            catalog: CatalogSection {
                file: Some(path.to_string_lossy().to_string()),
            },
            logging: LoggingSection::default(),
        };
        let catalog = config.load_catalog().unwrap();
        assert_eq!(catalog.database_with_name("db1").pretty_name, "Database One");
        assert_eq!(
            catalog.field_with_name("db1", "t1", "id").field_type,
            "keyword"
        );
    }
}
