use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, Instant};

use crate::config::ArchiveConfig;
use crate::error::{InstallerError, Result};
use crate::game::{Backend, GameFingerprint};
use crate::ini::IniDocument;
use crate::paths;
use crate::pe::Architecture;
use crate::translator::BUNDLED_FONTS;

/// Everything the installer may have put into a game directory.
pub const INSTALLED_ITEMS: &[&str] = &[
    "BepInEx",
    "dotnet",
    ".doorstop_version",
    "changelog.txt",
    "doorstop_config.ini",
    "doorstop.dll",
    "winhttp.dll",
    "sourcehansanscn_u6",
    "sourcehansanscn_u2022",
    "sourcehansanscn_u2021",
    "sourcehansanscn_u2020",
    "sourcehansanscn_u2019",
    "sourcehansanscn_u2018",
    "tangyuanti_u2018",
];

/// Names of the prebuilt archives for each game variant.
#[derive(Debug, Clone)]
pub struct ArchiveCatalog {
    pub directory: PathBuf,
    pub bepinex_mono_version: String,
    pub bepinex_il2cpp_version: String,
    pub xunity_version: String,
}

impl From<&ArchiveConfig> for ArchiveCatalog {
    fn from(config: &ArchiveConfig) -> Self {
        Self {
            directory: config.directory.clone(),
            bepinex_mono_version: config.bepinex_mono_version.clone(),
            bepinex_il2cpp_version: config.bepinex_il2cpp_version.clone(),
            xunity_version: config.xunity_version.clone(),
        }
    }
}

impl ArchiveCatalog {
    pub fn bepinex_archive(&self, architecture: Architecture, backend: Backend) -> String {
        let arch = architecture.archive_tag();
        match backend {
            Backend::Mono => format!("BepInEx_win_{}_{}.zip", arch, self.bepinex_mono_version),
            Backend::IL2CPP => format!(
                "BepInEx-Unity.IL2CPP-win-{}-{}.zip",
                arch, self.bepinex_il2cpp_version
            ),
        }
    }

    pub fn xunity_archive(&self, backend: Backend) -> String {
        match backend {
            Backend::Mono => format!("XUnity.AutoTranslator-BepInEx-{}.zip", self.xunity_version),
            Backend::IL2CPP => format!(
                "XUnity.AutoTranslator-BepInEx-IL2CPP-{}.zip",
                self.xunity_version
            ),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.directory.join(name)
    }
}

pub struct PluginInstaller {
    game_dir: PathBuf,
    catalog: ArchiveCatalog,
}

impl PluginInstaller {
    pub fn new(game_dir: impl Into<PathBuf>, catalog: ArchiveCatalog) -> Self {
        Self {
            game_dir: game_dir.into(),
            catalog,
        }
    }

    pub fn catalog(&self) -> &ArchiveCatalog {
        &self.catalog
    }

    pub fn install_bepinex(&self, architecture: Architecture, backend: Backend) -> Result<()> {
        let archive = self.catalog.bepinex_archive(architecture, backend);
        self.extract(&archive)?;
        tracing::info!("BepInEx installed from {}", archive);
        Ok(())
    }

    pub fn install_xunity(&self, backend: Backend) -> Result<()> {
        let archive = self.catalog.xunity_archive(backend);
        self.extract(&archive)?;
        tracing::info!("XUnity.AutoTranslator installed from {}", archive);
        Ok(())
    }

    pub fn install_plugins(&self, fingerprint: &GameFingerprint) -> Result<()> {
        self.install_bepinex(fingerprint.architecture, fingerprint.backend)?;
        self.install_xunity(fingerprint.backend)
    }

    fn extract(&self, archive_name: &str) -> Result<()> {
        let archive_path = self.catalog.path(archive_name);
        if !archive_path.is_file() {
            return Err(InstallerError::ArchiveNotFound(archive_name.to_string()));
        }

        tracing::debug!("Extracting {} into {}", archive_path.display(), self.game_dir.display());
        let file = fs::File::open(&archive_path)?;
        let wrap = |source| InstallerError::Extraction {
            archive: archive_name.to_string(),
            source,
        };
        let mut archive = zip::ZipArchive::new(file).map_err(wrap)?;
        archive.extract(&self.game_dir).map_err(wrap)?;
        Ok(())
    }

    /// Run the game until the translator writes its config, then close it.
    pub async fn initialize_plugin(
        &self,
        executable: &Path,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Result<()> {
        let config_path = paths::xunity_config_file(&self.game_dir);
        tracing::info!("Starting {} to generate plugin config", executable.display());

        let mut child = tokio::process::Command::new(executable)
            .current_dir(&self.game_dir)
            .kill_on_drop(true)
            .spawn()?;

        let started = Instant::now();
        while !config_path.exists() {
            if started.elapsed() >= timeout {
                if let Err(e) = child.kill().await {
                    tracing::warn!("Failed to stop game process: {}", e);
                }
                return Err(InstallerError::InitTimeout(timeout.as_secs()));
            }
            tokio::time::sleep(poll_interval).await;
        }

        tracing::info!("Plugin config generated after {:.1}s", started.elapsed().as_secs_f32());
        if let Err(e) = child.kill().await {
            // Game may already have exited on its own
            tracing::debug!("Game process not killed: {}", e);
        }
        Ok(())
    }

    /// Start the game without waiting for it. Returns the process id.
    pub fn launch_game(&self, executable: &Path) -> Result<u32> {
        let child = Command::new(executable)
            .current_dir(&self.game_dir)
            .spawn()
            .map_err(|e| {
                InstallerError::CommandFailed(format!("{}: {}", executable.display(), e))
            })?;
        tracing::info!("Launched {} (PID {})", executable.display(), child.id());
        Ok(child.id())
    }

    /// Remove every installed item. Stops at the first item that cannot be removed.
    pub fn uninstall(&self) -> Result<Vec<PathBuf>> {
        let mut removed = Vec::new();

        for item in INSTALLED_ITEMS {
            let path = self.game_dir.join(item);
            let Ok(metadata) = fs::symlink_metadata(&path) else {
                continue;
            };

            let result = if metadata.is_dir() {
                fs::remove_dir_all(&path)
            } else {
                remove_file_forced(&path)
            };
            result.map_err(|source| InstallerError::RemoveFailed {
                path: path.clone(),
                source,
            })?;

            tracing::info!("Removed {}", path.display());
            removed.push(path);
        }

        Ok(removed)
    }

    /// Delete the translation cache. Returns false when there was nothing to delete.
    pub fn clear_translations(&self) -> Result<bool> {
        let dir = paths::translation_dir(&self.game_dir);
        if !dir.exists() {
            return Ok(false);
        }
        fs::remove_dir_all(&dir).map_err(|source| InstallerError::RemoveFailed {
            path: dir.clone(),
            source,
        })?;
        tracing::info!("Cleared translations in {}", dir.display());
        Ok(true)
    }

    /// Path of the auto-generated translations for the configured target language.
    pub fn translation_file(&self) -> Result<PathBuf> {
        let config_path = paths::xunity_config_file(&self.game_dir);
        if !config_path.exists() {
            return Err(InstallerError::ConfigMissing(config_path));
        }

        let config = IniDocument::load(&config_path)?;
        let language = config.get_or("General", "Language", "");
        if language.is_empty() {
            return Err(InstallerError::LanguageNotSet);
        }

        let file = paths::translation_file(&self.game_dir, language);
        if !file.exists() {
            return Err(InstallerError::TranslationNotFound(file));
        }
        Ok(file)
    }

    pub fn edit_translations(&self) -> Result<PathBuf> {
        let file = self.translation_file()?;
        open_with_default_app(&file)?;
        Ok(file)
    }

    /// Copy the plugin log to `dest`. A directory gets a timestamped file name.
    pub fn export_log(&self, dest: &Path) -> Result<PathBuf> {
        let log = paths::plugin_log_file(&self.game_dir);
        if !log.exists() {
            return Err(InstallerError::LogNotFound(log));
        }

        let target = if dest.is_dir() {
            dest.join(default_log_export_name(chrono::Local::now()))
        } else {
            dest.to_path_buf()
        };
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::copy(&log, &target)?;
        tracing::info!("Exported plugin log to {}", target.display());
        Ok(target)
    }

    /// Copy the plugin log into `dir` under a timestamped name, creating `dir` if needed.
    pub fn export_log_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        self.export_log(&dir.join(default_log_export_name(chrono::Local::now())))
    }

    /// Sync bundled TextMeshPro fonts with the selected override and fallback fonts.
    ///
    /// A bundled font name copies that font into the game directory. An
    /// empty selection removes every bundled font. Other names are left alone,
    /// they refer to fonts the user placed there.
    pub fn apply_fonts(&self, override_font: &str, fallback_font: &str) -> Result<()> {
        for (font, kind) in [(override_font, "override"), (fallback_font, "fallback")] {
            if BUNDLED_FONTS.contains(&font) {
                self.copy_font(font, kind)?;
            } else if font.is_empty() {
                self.remove_fonts(kind)?;
            }
        }
        Ok(())
    }

    fn copy_font(&self, font: &str, kind: &str) -> Result<()> {
        let source = self.catalog.path(font);
        if !source.exists() {
            tracing::warn!("Bundled {} font {} not found in {}", kind, font, self.catalog.directory.display());
            return Ok(());
        }

        let target = self.game_dir.join(font);
        if target.exists() {
            remove_file_forced(&target)?;
        }
        fs::copy(&source, &target)?;
        tracing::info!("Copied {} font {}", kind, font);
        Ok(())
    }

    fn remove_fonts(&self, kind: &str) -> Result<()> {
        for font in BUNDLED_FONTS {
            let target = self.game_dir.join(font);
            if target.is_file() {
                remove_file_forced(&target).map_err(|source| InstallerError::RemoveFailed {
                    path: target.clone(),
                    source,
                })?;
                tracing::info!("Removed {} font {}", kind, font);
            }
        }
        Ok(())
    }
}

pub fn default_log_export_name<Tz: chrono::TimeZone>(now: chrono::DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("XUnity_{}.log", now.format("%Y%m%d_%H%M%S"))
}

/// Clear the read-only flag, then delete.
fn remove_file_forced(path: &Path) -> std::io::Result<()> {
    let mut permissions = fs::metadata(path)?.permissions();
    if permissions.readonly() {
        #[allow(clippy::permissions_set_readonly_false)]
        permissions.set_readonly(false);
        fs::set_permissions(path, permissions)?;
    }
    fs::remove_file(path)
}

pub fn open_with_default_app(path: &Path) -> Result<()> {
    let status = if cfg!(target_os = "windows") {
        Command::new("cmd").arg("/C").arg("start").arg("").arg(path).spawn()
    } else if cfg!(target_os = "macos") {
        Command::new("open").arg(path).spawn()
    } else {
        Command::new("xdg-open").arg(path).spawn()
    };

    status
        .map(|_| ())
        .map_err(|e| InstallerError::CommandFailed(format!("open {}: {}", path.display(), e)))
}
