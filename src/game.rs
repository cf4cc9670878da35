use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{InstallerError, Result};
use crate::paths;
use crate::pe::{self, Architecture};
use crate::scan;
use crate::version::{self, PowerShellVersionInfo, VersionInfoSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Backend {
    Mono,
    IL2CPP,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Mono => write!(f, "Mono"),
            Backend::IL2CPP => write!(f, "IL2CPP"),
        }
    }
}

/// What the installer needs to know about a game to pick archives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameFingerprint {
    pub game_dir: PathBuf,
    pub executable: PathBuf,
    pub version: String,
    pub architecture: Architecture,
    pub backend: Backend,
}

impl GameFingerprint {
    pub fn executable_name(&self) -> String {
        self.executable
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

pub struct GameDetector {
    version_source: Box<dyn VersionInfoSource>,
}

impl Default for GameDetector {
    fn default() -> Self {
        Self::new(Box::new(PowerShellVersionInfo::new()))
    }
}

impl GameDetector {
    pub fn new(version_source: Box<dyn VersionInfoSource>) -> Self {
        Self { version_source }
    }

    pub fn analyze(&self, game_dir: &Path) -> Result<GameFingerprint> {
        tracing::info!("Analyzing {}", game_dir.display());

        let executable = scan::find_main_executable(game_dir)?
            .ok_or_else(|| InstallerError::NoExecutable(game_dir.to_path_buf()))?;

        if !scan::is_unity_game(game_dir) {
            return Err(InstallerError::NotUnity(game_dir.to_path_buf()));
        }

        let version = version::detect_version(self.version_source.as_ref(), game_dir, &executable);
        let architecture = match pe::detect_architecture(&executable) {
            Ok(arch) => arch,
            Err(e) => {
                tracing::warn!("Failed to read PE header of {}: {}", executable.display(), e);
                None
            }
        };
        let backend = scan::detect_backend(game_dir);

        let mut missing = Vec::new();
        if version.is_none() {
            missing.push("engine version");
        }
        if architecture.is_none() {
            missing.push("architecture");
        }
        if backend.is_none() {
            missing.push("scripting backend");
        }

        match (version, architecture, backend) {
            (Some(version), Some(architecture), Some(backend)) => {
                tracing::info!("Detected {} {} game, version {}", architecture, backend, version);
                Ok(GameFingerprint {
                    game_dir: game_dir.to_path_buf(),
                    executable,
                    version,
                    architecture,
                    backend,
                })
            }
            _ => Err(InstallerError::IncompleteFingerprint(missing.join(", "))),
        }
    }
}

/// Which plugin components are present in a game directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallationStatus {
    pub bepinex: bool,
    pub xunity: bool,
    pub config: bool,
}

impl InstallationStatus {
    pub fn detect(game_dir: &Path) -> Self {
        let bepinex = paths::bepinex_dir(game_dir).exists();
        let xunity = bepinex && scan::contains_file(game_dir, paths::XUNITY_CORE_DLL);
        let config = paths::xunity_config_file(game_dir).exists();

        let status = Self { bepinex, xunity, config };
        tracing::debug!("Installation status for {}: {:?}", game_dir.display(), status);
        status
    }

    pub fn plugins_installed(&self) -> bool {
        self.bepinex && self.xunity
    }

    pub fn can_install(&self) -> bool {
        !self.plugins_installed()
    }

    pub fn can_initialize(&self) -> bool {
        self.plugins_installed() && !self.config
    }

    pub fn can_edit_config(&self) -> bool {
        self.config
    }

    /// Clear/edit translations and log export need a fully set up plugin.
    pub fn can_use_extras(&self) -> bool {
        self.config && self.plugins_installed()
    }

    pub fn can_uninstall(&self) -> bool {
        self.bepinex || self.xunity || self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pe::fake_pe_image;
    use crate::version::MockVersionInfoSource;
    use std::fs;
    use tempfile::tempdir;

    fn detector_with_version(version: Option<&'static str>) -> GameDetector {
        let mut source = MockVersionInfoSource::new();
        source
            .expect_file_version()
            .returning(move |_| version.map(str::to_string));
        source.expect_product_version().returning(|_| None);
        GameDetector::new(Box::new(source))
    }

    fn mono_game(dir: &Path, machine: u16) {
        fs::write(dir.join("Game.exe"), fake_pe_image(machine)).unwrap();
        fs::write(dir.join("UnityCrashHandler64.exe"), vec![0u8; 4096]).unwrap();
        fs::write(dir.join("UnityPlayer.dll"), "").unwrap();
        fs::create_dir_all(dir.join("Game_Data").join("Managed")).unwrap();
    }

    #[test]
    fn test_analyze_mono_x64() {
        let dir = tempdir().unwrap();
        mono_game(dir.path(), 0x8664);

        let fingerprint = detector_with_version(Some("2020.3.1.0"))
            .analyze(dir.path())
            .unwrap();

        assert_eq!(fingerprint.executable, dir.path().join("Game.exe"));
        assert_eq!(fingerprint.executable_name(), "Game.exe");
        assert_eq!(fingerprint.version, "2020.3.1.0");
        assert_eq!(fingerprint.architecture, Architecture::X64);
        assert_eq!(fingerprint.backend, Backend::Mono);
    }

    #[test]
    fn test_analyze_il2cpp_x86() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Game.exe"), fake_pe_image(0x014c)).unwrap();
        fs::write(dir.path().join("GameAssembly.dll"), "").unwrap();
        fs::create_dir_all(dir.path().join("Game_Data").join("il2cpp_data")).unwrap();

        let fingerprint = detector_with_version(Some("1.0.0")).analyze(dir.path()).unwrap();
        assert_eq!(fingerprint.architecture, Architecture::X86);
        assert_eq!(fingerprint.backend, Backend::IL2CPP);
    }

    #[test]
    fn test_analyze_without_executable() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("UnityPlayer.dll"), "").unwrap();

        let err = detector_with_version(None).analyze(dir.path()).unwrap_err();
        assert!(matches!(err, InstallerError::NoExecutable(_)));
    }

    #[test]
    fn test_analyze_non_unity() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Game.exe"), fake_pe_image(0x8664)).unwrap();

        let err = detector_with_version(Some("1.0")).analyze(dir.path()).unwrap_err();
        assert!(matches!(err, InstallerError::NotUnity(_)));
    }

    #[test]
    fn test_analyze_incomplete_names_missing_parts() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Game.exe"), b"not a pe file").unwrap();
        fs::write(dir.path().join("UnityPlayer.dll"), "").unwrap();

        let err = detector_with_version(None).analyze(dir.path()).unwrap_err();
        match err {
            InstallerError::IncompleteFingerprint(missing) => {
                assert_eq!(missing, "engine version, architecture, scripting backend");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_status_empty_dir() {
        let dir = tempdir().unwrap();
        let status = InstallationStatus::detect(dir.path());
        assert_eq!(status, InstallationStatus::default());
        assert!(status.can_install());
        assert!(!status.can_initialize());
        assert!(!status.can_uninstall());
    }

    #[test]
    fn test_status_installed_not_initialized() {
        let dir = tempdir().unwrap();
        let plugin = dir.path().join("BepInEx/plugins/XUnity.AutoTranslator");
        fs::create_dir_all(&plugin).unwrap();
        fs::write(plugin.join("XUnity.AutoTranslator.Plugin.Core.dll"), "").unwrap();

        let status = InstallationStatus::detect(dir.path());
        assert!(status.plugins_installed());
        assert!(!status.can_install());
        assert!(status.can_initialize());
        assert!(!status.can_edit_config());
        assert!(!status.can_use_extras());
        assert!(status.can_uninstall());
    }

    #[test]
    fn test_status_fully_configured() {
        let dir = tempdir().unwrap();
        let plugin = dir.path().join("BepInEx/plugins/XUnity.AutoTranslator");
        fs::create_dir_all(&plugin).unwrap();
        fs::write(plugin.join("XUnity.AutoTranslator.Plugin.Core.dll"), "").unwrap();
        fs::create_dir_all(dir.path().join("BepInEx/config")).unwrap();
        fs::write(paths::xunity_config_file(dir.path()), "[General]\n").unwrap();

        let status = InstallationStatus::detect(dir.path());
        assert!(!status.can_initialize());
        assert!(status.can_edit_config());
        assert!(status.can_use_extras());
    }
}
