use crate::error::{Result, TrackError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";

/// One routed category: the scan suffix letter and the directory its day
/// files live in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryDef {
    pub suffix: char,
    pub name: String,

    /// The daily summary totals the insulation area column for this category
    /// instead of the metal one.
    #[serde(default)]
    pub insulation_area: bool,
}

/// Configuration for floortrack, stored in `<data dir>/config.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrackConfig {
    /// Category routing table, keyed by the trailing suffix letter.
    #[serde(default = "default_categories")]
    pub categories: Vec<CategoryDef>,
}

fn default_categories() -> Vec<CategoryDef> {
    vec![
        CategoryDef {
            suffix: 'L',
            name: "Laser Cutter".to_string(),
            insulation_area: false,
        },
        CategoryDef {
            suffix: 'K',
            name: "Knock Out".to_string(),
            insulation_area: false,
        },
        CategoryDef {
            suffix: 'I',
            name: "Insulation".to_string(),
            insulation_area: true,
        },
        CategoryDef {
            suffix: 'S',
            name: "Straight Line".to_string(),
            insulation_area: false,
        },
    ]
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            categories: default_categories(),
        }
    }
}

impl TrackConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(TrackError::Io)?;
        let config: TrackConfig =
            serde_json::from_str(&content).map_err(TrackError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(TrackError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(TrackError::Serialization)?;
        fs::write(config_path, content).map_err(TrackError::Io)?;
        Ok(())
    }

    /// Look a category up by its suffix letter.
    pub fn category(&self, suffix: char) -> Option<&CategoryDef> {
        self.categories.iter().find(|c| c.suffix == suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_category_table() {
        let config = TrackConfig::default();
        assert_eq!(config.categories.len(), 4);
        assert_eq!(config.category('L').unwrap().name, "Laser Cutter");
        assert!(config.category('I').unwrap().insulation_area);
        assert!(config.category('X').is_none());
    }

    #[test]
    fn load_missing_config_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = TrackConfig::load(dir.path()).unwrap();
        assert_eq!(config, TrackConfig::default());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = TrackConfig::default();
        config.categories.push(CategoryDef {
            suffix: 'P',
            name: "Plastic".to_string(),
            insulation_area: false,
        });
        config.save(dir.path()).unwrap();

        let loaded = TrackConfig::load(dir.path()).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.category('P').unwrap().name, "Plastic");
    }
}
