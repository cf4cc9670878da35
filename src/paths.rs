use std::path::{Path, PathBuf};

pub const BEPINEX_DIR: &str = "BepInEx";
pub const XUNITY_CONFIG_FILE: &str = "AutoTranslatorConfig.ini";
pub const XUNITY_CORE_DLL: &str = "XUnity.AutoTranslator.Plugin.Core.dll";
pub const PLUGIN_LOG_FILE: &str = "LogOutput.log";
pub const TRANSLATIONS_FILE: &str = "_AutoGeneratedTranslations.txt";

pub fn bepinex_dir(game: &Path) -> PathBuf {
    game.join(BEPINEX_DIR)
}

pub fn bepinex_config_dir(game: &Path) -> PathBuf {
    bepinex_dir(game).join("config")
}

pub fn xunity_config_file(game: &Path) -> PathBuf {
    bepinex_config_dir(game).join(XUNITY_CONFIG_FILE)
}

pub fn translation_dir(game: &Path) -> PathBuf {
    bepinex_dir(game).join("Translation")
}

pub fn translation_file(game: &Path, language: &str) -> PathBuf {
    translation_dir(game).join(language).join("Text").join(TRANSLATIONS_FILE)
}

pub fn plugin_log_file(game: &Path) -> PathBuf {
    bepinex_dir(game).join(PLUGIN_LOG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_file_is_under_bepinex_config() {
        let game = PathBuf::from(r"C:\Games\Example");
        assert_eq!(
            xunity_config_file(&game),
            game.join("BepInEx").join("config").join("AutoTranslatorConfig.ini")
        );
    }

    #[test]
    fn translation_file_is_per_language() {
        let game = PathBuf::from("/games/example");
        assert_eq!(
            translation_file(&game, "zh-CN"),
            game.join("BepInEx/Translation/zh-CN/Text/_AutoGeneratedTranslations.txt")
        );
    }
}
