use pretty_assertions::assert_eq;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;

use xunity_installer::game::{Backend, GameDetector, InstallationStatus};
use xunity_installer::installer::{ArchiveCatalog, PluginInstaller};
use xunity_installer::paths;
use xunity_installer::pe::Architecture;
use xunity_installer::translator::{ConfigEditor, Endpoint, TextFramework};
use xunity_installer::version::VersionInfoSource;

struct FixedVersion(&'static str);

impl VersionInfoSource for FixedVersion {
    fn file_version(&self, _exe: &Path) -> Option<String> {
        Some(self.0.to_string())
    }

    fn product_version(&self, _exe: &Path) -> Option<String> {
        None
    }
}

fn pe_image(machine: u16) -> Vec<u8> {
    let mut image = vec![0u8; 0x100];
    image[0..2].copy_from_slice(b"MZ");
    image[0x3C..0x40].copy_from_slice(&0x80u32.to_le_bytes());
    image[0x80..0x84].copy_from_slice(b"PE\0\0");
    image[0x84..0x86].copy_from_slice(&machine.to_le_bytes());
    image
}

fn write_zip(path: &Path, entries: &[(&str, &str)]) {
    let mut zip = zip::ZipWriter::new(fs::File::create(path).unwrap());
    let options = zip::write::SimpleFileOptions::default();
    for (name, contents) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(contents.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

fn catalog(dir: &Path) -> ArchiveCatalog {
    ArchiveCatalog {
        directory: dir.to_path_buf(),
        bepinex_mono_version: "5.4.23.2".to_string(),
        bepinex_il2cpp_version: "6.0.0-be.733+995f049".to_string(),
        xunity_version: "5.4.4".to_string(),
    }
}

#[test]
fn mono_game_full_lifecycle() {
    let game = tempdir().unwrap();
    let archives = tempdir().unwrap();

    fs::write(game.path().join("Demo.exe"), pe_image(0x8664)).unwrap();
    fs::write(game.path().join("UnityPlayer.dll"), "").unwrap();
    fs::create_dir_all(game.path().join("Demo_Data/Managed")).unwrap();

    write_zip(
        &archives.path().join("BepInEx_win_x64_5.4.23.2.zip"),
        &[
            ("winhttp.dll", ""),
            ("doorstop_config.ini", "[General]\nenabled=true\n"),
            ("BepInEx/core/BepInEx.dll", ""),
        ],
    );
    write_zip(
        &archives.path().join("XUnity.AutoTranslator-BepInEx-5.4.4.zip"),
        &[(
            "BepInEx/plugins/XUnity.AutoTranslator/XUnity.AutoTranslator.Plugin.Core.dll",
            "",
        )],
    );

    let fingerprint = GameDetector::new(Box::new(FixedVersion("2019.4.40.1")))
        .analyze(game.path())
        .unwrap();
    assert_eq!(fingerprint.architecture, Architecture::X64);
    assert_eq!(fingerprint.backend, Backend::Mono);
    assert_eq!(fingerprint.executable_name(), "Demo.exe");

    let installer = PluginInstaller::new(game.path(), catalog(archives.path()));
    assert!(InstallationStatus::detect(game.path()).can_install());

    installer.install_plugins(&fingerprint).unwrap();
    let status = InstallationStatus::detect(game.path());
    assert!(status.plugins_installed());
    assert!(status.can_initialize());
    assert!(!status.can_edit_config());

    // Stand in for the plugin's first run
    let config_path = paths::xunity_config_file(game.path());
    fs::create_dir_all(config_path.parent().unwrap()).unwrap();
    fs::write(
        &config_path,
        "\u{feff}[Service]\nEndpoint=GoogleTranslate\nFallbackEndpoint=\n\n[General]\nLanguage=en\nFromLanguage=ja\n",
    )
    .unwrap();
    assert!(InstallationStatus::detect(game.path()).can_use_extras());

    let mut editor = ConfigEditor::open(game.path()).unwrap();
    let mut settings = editor.settings();
    assert_eq!(settings.endpoint, None);
    settings.language = "simplified-chinese".to_string();
    settings.endpoint = Some(Endpoint::Papago);
    settings.set_framework(TextFramework::IMGUI, false);
    editor.apply(&settings);
    editor.save().unwrap();

    let saved = fs::read_to_string(&config_path).unwrap();
    assert!(saved.starts_with("[Service]\nEndpoint=PapagoTranslate\n"));
    assert!(saved.contains("Language=zh-CN\n"));
    assert!(saved.contains("EnableIMGUI=False\n"));

    let removed = installer.uninstall().unwrap();
    assert_eq!(removed.len(), 3);
    assert!(!game.path().join("BepInEx").exists());
    assert!(game.path().join("Demo.exe").exists());
    assert!(!InstallationStatus::detect(game.path()).can_uninstall());
}

#[test]
fn il2cpp_game_uses_il2cpp_archives() {
    let game = tempdir().unwrap();
    let archives = tempdir().unwrap();

    fs::write(game.path().join("Demo.exe"), pe_image(0x014c)).unwrap();
    fs::write(game.path().join("GameAssembly.dll"), "").unwrap();
    fs::create_dir_all(game.path().join("Demo_Data/il2cpp_data")).unwrap();

    let fingerprint = GameDetector::new(Box::new(FixedVersion("1.0.0")))
        .analyze(game.path())
        .unwrap();
    assert_eq!(fingerprint.architecture, Architecture::X86);
    assert_eq!(fingerprint.backend, Backend::IL2CPP);

    let installer = PluginInstaller::new(game.path(), catalog(archives.path()));
    let err = installer.install_plugins(&fingerprint).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Archive not found: BepInEx-Unity.IL2CPP-win-x86-6.0.0-be.733+995f049.zip"
    );
}
