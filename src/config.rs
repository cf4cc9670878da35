use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub general: GeneralConfig,
    pub archives: ArchiveConfig,
    pub init: InitConfig,
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralConfig {
    pub log_level: String,
}

/// Where the prebuilt plugin archives live and which versions they carry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArchiveConfig {
    pub directory: PathBuf,
    pub bepinex_mono_version: String,
    pub bepinex_il2cpp_version: String,
    pub xunity_version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InitConfig {
    pub timeout_secs: u64,
    pub poll_interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PathsConfig {
    pub log_export_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| home.join(".local/share"))
            .join("xunity-installer");

        // Archives ship in a `File` folder next to the executable
        let archive_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|p| p.join("File")))
            .filter(|dir| dir.is_dir())
            .unwrap_or_else(|| data_dir.join("archives"));

        Self {
            general: GeneralConfig {
                log_level: "info".to_string(),
            },
            archives: ArchiveConfig {
                directory: archive_dir,
                bepinex_mono_version: "5.4.23.2".to_string(),
                bepinex_il2cpp_version: "6.0.0-be.733+995f049".to_string(),
                xunity_version: "5.4.4".to_string(),
            },
            init: InitConfig {
                timeout_secs: 60,
                poll_interval_ms: 1000,
            },
            paths: PathsConfig {
                log_export_dir: dirs::document_dir().unwrap_or(home),
            },
        }
    }
}

impl Config {
    /// Load from `path` (or the default location), writing defaults on first run.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_path);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(config_path, contents)?;

        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("xunity-installer")
            .join("config.toml")
    }
}
