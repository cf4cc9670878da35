//! Engine version probing
//!
//! The version recorded for a game is the executable's version resource,
//! queried through PowerShell. Games whose binaries carry no usable version
//! fall back to scanning Unity's data files for an editor version string.

use regex::bytes::Regex;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::Command;
use which::which;

use crate::scan;

const MAX_SCAN_BYTES: u64 = 1024 * 1024;
const DATA_FILES: &[&str] = &["globalgamemanagers", "globalgamemanagers.assets", "data.unity3d"];
const EMPTY_VERSION: &str = "0.0.0.0";

/// Source of Windows version-resource strings for an executable.
#[cfg_attr(test, mockall::automock)]
pub trait VersionInfoSource {
    fn file_version(&self, exe: &Path) -> Option<String>;
    fn product_version(&self, exe: &Path) -> Option<String>;
}

/// Reads version resources by shelling out to PowerShell.
#[derive(Debug, Clone, Default)]
pub struct PowerShellVersionInfo {
    powershell: Option<PathBuf>,
}

impl PowerShellVersionInfo {
    pub fn new() -> Self {
        let powershell = which("powershell").or_else(|_| which("pwsh")).ok();
        if powershell.is_none() {
            tracing::debug!("PowerShell not found, executable version info unavailable");
        }
        Self { powershell }
    }

    fn query(&self, exe: &Path, field: &str) -> Option<String> {
        let powershell = self.powershell.as_ref()?;
        // Single quotes are doubled inside a PowerShell literal string
        let escaped = exe.display().to_string().replace('\'', "''");
        let script = format!("(Get-Item '{}').VersionInfo.{}", escaped, field);

        let output = Command::new(powershell)
            .args(["-NoProfile", "-NonInteractive", "-Command", &script])
            .output()
            .ok()?;

        if !output.status.success() {
            tracing::debug!(
                "PowerShell {} query failed: {}",
                field,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return None;
        }

        let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if value.is_empty() { None } else { Some(value) }
    }
}

impl VersionInfoSource for PowerShellVersionInfo {
    fn file_version(&self, exe: &Path) -> Option<String> {
        self.query(exe, "FileVersion")
    }

    fn product_version(&self, exe: &Path) -> Option<String> {
        self.query(exe, "ProductVersion")
    }
}

/// FileVersion, or ProductVersion when FileVersion is empty or all zeroes.
pub fn probe_executable_version(source: &dyn VersionInfoSource, exe: &Path) -> Option<String> {
    match source.file_version(exe) {
        Some(version) if !version.is_empty() && version != EMPTY_VERSION => Some(version),
        _ => source
            .product_version(exe)
            .filter(|v| !v.is_empty() && v != EMPTY_VERSION),
    }
}

/// Search the head of Unity's data files for an editor version like `2019.4.40f1`.
pub fn scan_unity_version(data_dir: &Path) -> Option<String> {
    let pattern = Regex::new(r"(?-u)\b(\d{4}\.\d+\.\d+[a-z]\d+)\b").ok()?;

    for name in DATA_FILES {
        let path = data_dir.join(name);
        if !path.is_file() {
            continue;
        }

        let mut buffer = Vec::new();
        let read = File::open(&path)
            .and_then(|f| f.take(MAX_SCAN_BYTES).read_to_end(&mut buffer));
        if let Err(e) = read {
            tracing::debug!("Failed to read {}: {}", path.display(), e);
            continue;
        }

        if let Some(found) = pattern.captures(&buffer).and_then(|c| c.get(1)) {
            let version = String::from_utf8_lossy(found.as_bytes()).to_string();
            tracing::debug!("Unity version {} found in {}", version, name);
            return Some(version);
        }
    }

    None
}

pub fn detect_version(source: &dyn VersionInfoSource, game_dir: &Path, exe: &Path) -> Option<String> {
    probe_executable_version(source, exe)
        .or_else(|| scan::find_data_dir(game_dir).and_then(|data| scan_unity_version(&data)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_file_version_preferred() {
        let mut source = MockVersionInfoSource::new();
        source
            .expect_file_version()
            .returning(|_| Some("2021.3.16.4913".to_string()));
        source.expect_product_version().never();

        let version = probe_executable_version(&source, Path::new("Game.exe"));
        assert_eq!(version.as_deref(), Some("2021.3.16.4913"));
    }

    #[test]
    fn test_zero_file_version_falls_back_to_product() {
        let mut source = MockVersionInfoSource::new();
        source
            .expect_file_version()
            .returning(|_| Some("0.0.0.0".to_string()));
        source
            .expect_product_version()
            .returning(|_| Some("1.2.0".to_string()));

        let version = probe_executable_version(&source, Path::new("Game.exe"));
        assert_eq!(version.as_deref(), Some("1.2.0"));
    }

    #[test]
    fn test_no_version_info() {
        let mut source = MockVersionInfoSource::new();
        source.expect_file_version().returning(|_| None);
        source.expect_product_version().returning(|_| None);

        assert_eq!(probe_executable_version(&source, Path::new("Game.exe")), None);
    }

    #[test]
    fn test_scan_globalgamemanagers() {
        let dir = tempdir().unwrap();
        let mut data = vec![0u8, 1, 2, 3];
        data.extend_from_slice(b"\x002019.4.40f1\x00more");
        fs::write(dir.path().join("globalgamemanagers"), data).unwrap();

        assert_eq!(scan_unity_version(dir.path()).as_deref(), Some("2019.4.40f1"));
    }

    #[test]
    fn test_scan_without_data_files() {
        let dir = tempdir().unwrap();
        assert_eq!(scan_unity_version(dir.path()), None);
    }

    #[test]
    fn test_detect_version_uses_data_dir_fallback() {
        let dir = tempdir().unwrap();
        let data_dir = dir.path().join("Game_Data");
        fs::create_dir(&data_dir).unwrap();
        fs::write(data_dir.join("data.unity3d"), b"UnityFS\x005.x.x\x002018.4.36f1\x00").unwrap();

        let mut source = MockVersionInfoSource::new();
        source.expect_file_version().returning(|_| None);
        source.expect_product_version().returning(|_| None);

        let version = detect_version(&source, dir.path(), &dir.path().join("Game.exe"));
        assert_eq!(version.as_deref(), Some("2018.4.36f1"));
    }
}
