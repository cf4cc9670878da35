//! Directory heuristics for Unity game folders
//!
//! Looks only at names: immediate `.exe` files for the main binary and
//! marker files/folders anywhere below the game root for engine and backend.

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::Result;
use crate::game::Backend;

pub const UNITY_FILES: &[&str] = &["UnityPlayer.dll", "UnityCrashHandler64.exe", "GameAssembly.dll"];
pub const UNITY_FOLDERS: &[&str] = &["Managed", "il2cpp_data"];

/// Files in the game root that are never the game itself.
pub const EXCLUDED_EXECUTABLES: &[&str] = &[
    "UnityCrashHandler64.exe",
    "UnityCrashHandler32.exe",
    "UnityPlayer.exe",
    "BepInEx.exe",
    "winhttp.dll",
    "doorstop_config.ini",
    "changelog.txt",
    "install_script.bat",
    "install_script_x64.bat",
    "uninstall_script.bat",
    "uninstall_script_x64.bat",
];

const MONO_FOLDERS: &[&str] = &["Mono", "Managed"];
const IL2CPP_FOLDER: &str = "il2cpp_data";
const IL2CPP_ASSEMBLY: &str = "GameAssembly.dll";

/// Candidate executables directly inside `dir`, with their sizes.
pub fn list_executables(dir: &Path) -> Result<Vec<(PathBuf, u64)>> {
    let mut executables = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();

        let excluded = EXCLUDED_EXECUTABLES
            .iter()
            .any(|excluded| excluded.eq_ignore_ascii_case(&name));
        if !name.to_lowercase().ends_with(".exe") || excluded {
            continue;
        }

        let metadata = entry.metadata()?;
        if metadata.is_file() {
            executables.push((entry.path(), metadata.len()));
        }
    }

    Ok(executables)
}

/// The largest executable in `dir` is taken to be the game binary.
pub fn find_main_executable(dir: &Path) -> Result<Option<PathBuf>> {
    let mut executables = list_executables(dir)?;

    // Largest first, then by name so equal sizes resolve the same way every time
    executables.sort_by(|(a_path, a_size), (b_path, b_size)| {
        b_size.cmp(a_size).then_with(|| a_path.cmp(b_path))
    });

    let main = executables.into_iter().next().map(|(path, _)| path);
    if let Some(ref exe) = main {
        tracing::info!("Found game executable: {}", exe.display());
    }
    Ok(main)
}

pub fn is_unity_game(dir: &Path) -> bool {
    if UNITY_FILES.iter().any(|file| dir.join(file).exists()) {
        return true;
    }

    walk_dirs(dir).any(|name| UNITY_FOLDERS.contains(&name.as_str()))
}

/// Mono markers are checked across the whole tree before IL2CPP markers.
pub fn detect_backend(dir: &Path) -> Option<Backend> {
    if walk_dirs(dir).any(|name| MONO_FOLDERS.contains(&name.as_str())) {
        return Some(Backend::Mono);
    }

    let il2cpp = WalkDir::new(dir)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .any(|entry| {
            let name = entry.file_name().to_string_lossy();
            (entry.file_type().is_dir() && name == IL2CPP_FOLDER)
                || (entry.file_type().is_file() && name == IL2CPP_ASSEMBLY)
        });

    if il2cpp { Some(Backend::IL2CPP) } else { None }
}

/// First `<Name>_Data` directory in `dir`, alphabetically.
pub fn find_data_dir(dir: &Path) -> Option<PathBuf> {
    let mut candidates: Vec<PathBuf> = fs::read_dir(dir)
        .ok()?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .filter(|e| e.file_name().to_string_lossy().ends_with("_Data"))
        .map(|e| e.path())
        .collect();

    candidates.sort();
    candidates.into_iter().next()
}

/// Returns true if a file with this exact name exists anywhere below `dir`.
pub fn contains_file(dir: &Path, file_name: &str) -> bool {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .any(|e| e.file_type().is_file() && e.file_name().to_string_lossy() == file_name)
}

fn walk_dirs(dir: &Path) -> impl Iterator<Item = String> {
    WalkDir::new(dir)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
        .map(|e| e.file_name().to_string_lossy().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn write_sized(path: &Path, size: usize) {
        fs::write(path, vec![0u8; size]).unwrap();
    }

    #[test]
    fn test_largest_executable_wins() {
        let dir = tempdir().unwrap();
        write_sized(&dir.path().join("Launcher.exe"), 10);
        write_sized(&dir.path().join("Game.exe"), 100);
        write_sized(&dir.path().join("UnityCrashHandler64.exe"), 1000);

        let main = find_main_executable(dir.path()).unwrap();
        assert_eq!(main, Some(dir.path().join("Game.exe")));
    }

    #[test]
    fn test_excluded_names_ignore_case() {
        let dir = tempdir().unwrap();
        write_sized(&dir.path().join("Game.EXE"), 100);
        write_sized(&dir.path().join("UNITYCRASHHANDLER64.EXE"), 1000);

        let main = find_main_executable(dir.path()).unwrap();
        assert_eq!(main, Some(dir.path().join("Game.EXE")));
    }

    #[test]
    fn test_equal_sizes_resolve_by_name() {
        let dir = tempdir().unwrap();
        write_sized(&dir.path().join("b.exe"), 50);
        write_sized(&dir.path().join("a.exe"), 50);

        let main = find_main_executable(dir.path()).unwrap();
        assert_eq!(main, Some(dir.path().join("a.exe")));
    }

    #[test]
    fn test_no_executable() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("readme.txt"), "hi").unwrap();
        fs::create_dir(dir.path().join("folder.exe")).unwrap();

        assert_eq!(find_main_executable(dir.path()).unwrap(), None);
    }

    #[test]
    fn test_unity_detected_by_root_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("UnityPlayer.dll"), "").unwrap();
        assert!(is_unity_game(dir.path()));
    }

    #[test]
    fn test_unity_detected_by_nested_folder() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("Game_Data").join("il2cpp_data")).unwrap();
        assert!(is_unity_game(dir.path()));
    }

    #[test]
    fn test_not_unity() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("bin").join("data")).unwrap();
        fs::write(dir.path().join("Game.exe"), "").unwrap();
        assert!(!is_unity_game(dir.path()));
    }

    #[test]
    fn test_backend_mono() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("Game_Data").join("Managed")).unwrap();
        assert_eq!(detect_backend(dir.path()), Some(Backend::Mono));
    }

    #[test]
    fn test_backend_il2cpp_by_assembly() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("GameAssembly.dll"), "").unwrap();
        assert_eq!(detect_backend(dir.path()), Some(Backend::IL2CPP));
    }

    #[test]
    fn test_backend_mono_wins_over_il2cpp() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("Game_Data").join("il2cpp_data")).unwrap();
        fs::create_dir_all(dir.path().join("MonoBleedingEdge").join("Mono")).unwrap();
        assert_eq!(detect_backend(dir.path()), Some(Backend::Mono));
    }

    #[test]
    fn test_backend_unknown() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("Plugins")).unwrap();
        assert_eq!(detect_backend(dir.path()), None);
    }

    #[test]
    fn test_find_data_dir() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("Game_Data")).unwrap();
        fs::create_dir(dir.path().join("MonoBleedingEdge")).unwrap();
        assert_eq!(find_data_dir(dir.path()), Some(dir.path().join("Game_Data")));
    }

    #[test]
    fn test_contains_file_nested() {
        let dir = tempdir().unwrap();
        let plugin = dir.path().join("BepInEx").join("plugins").join("XUnity.AutoTranslator");
        fs::create_dir_all(&plugin).unwrap();
        fs::write(plugin.join("XUnity.AutoTranslator.Plugin.Core.dll"), "").unwrap();

        assert!(contains_file(dir.path(), "XUnity.AutoTranslator.Plugin.Core.dll"));
        assert!(!contains_file(dir.path(), "Missing.dll"));
    }
}
