//! Typed view of `AutoTranslatorConfig.ini`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{InstallerError, Result};
use crate::ini::IniDocument;
use crate::paths;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Endpoint {
    Google,
    Bing,
    Papago,
    Baidu,
    LingoCloud,
    Custom,
}

impl Endpoint {
    pub const ALL: [Endpoint; 6] = [
        Endpoint::Papago,
        Endpoint::Baidu,
        Endpoint::LingoCloud,
        Endpoint::Custom,
        Endpoint::Google,
        Endpoint::Bing,
    ];

    /// Value the plugin expects in `Service.Endpoint`.
    pub fn config_value(self) -> &'static str {
        match self {
            Endpoint::Google => "GoogleTranslateV2",
            Endpoint::Bing => "BingTranslate",
            Endpoint::Papago => "PapagoTranslate",
            Endpoint::Baidu => "BaiduTranslate",
            Endpoint::LingoCloud => "LingoCloudTranslate",
            Endpoint::Custom => "CustomTranslate",
        }
    }

    pub fn from_config_value(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.config_value() == value)
    }

    /// Accepts a short name (`google`, `lingocloud`, ...) or the plugin's own value.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "google" => Some(Endpoint::Google),
            "bing" => Some(Endpoint::Bing),
            "papago" => Some(Endpoint::Papago),
            "baidu" => Some(Endpoint::Baidu),
            "lingocloud" | "caiyun" => Some(Endpoint::LingoCloud),
            "custom" => Some(Endpoint::Custom),
            _ => Self::from_config_value(name),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Endpoint::Google => "Google",
            Endpoint::Bing => "Bing",
            Endpoint::Papago => "Papago",
            Endpoint::Baidu => "Baidu",
            Endpoint::LingoCloud => "LingoCloud",
            Endpoint::Custom => "Custom",
        };
        write!(f, "{}", name)
    }
}

pub const LANGUAGE_ALIASES: &[(&str, &str)] = &[
    ("chinese", "zh"),
    ("simplified-chinese", "zh-CN"),
    ("traditional-chinese", "zh-TW"),
    ("english", "en"),
    ("japanese", "ja"),
    ("russian", "ru"),
    ("korean", "ko"),
];

/// Resolve a language alias to its code; anything else is taken as a code already.
pub fn resolve_language(input: &str) -> String {
    let trimmed = input.trim();
    LANGUAGE_ALIASES
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(trimmed))
        .map(|(_, code)| code.to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

/// Fonts shipped next to the plugin archives that can replace TextMeshPro fonts.
pub const BUNDLED_FONTS: &[&str] = &[
    "sourcehansanscn_u6",
    "sourcehansanscn_u2018",
    "sourcehansanscn_u2019",
    "sourcehansanscn_u2020",
    "sourcehansanscn_u2021",
    "sourcehansanscn_u2022",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextFramework {
    UGUI,
    NGUI,
    TextMeshPro,
    TextMesh,
    IMGUI,
    FairyGUI,
}

impl TextFramework {
    pub const ALL: [TextFramework; 6] = [
        TextFramework::UGUI,
        TextFramework::NGUI,
        TextFramework::TextMeshPro,
        TextFramework::TextMesh,
        TextFramework::IMGUI,
        TextFramework::FairyGUI,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TextFramework::UGUI => "UGUI",
            TextFramework::NGUI => "NGUI",
            TextFramework::TextMeshPro => "TextMeshPro",
            TextFramework::TextMesh => "TextMesh",
            TextFramework::IMGUI => "IMGUI",
            TextFramework::FairyGUI => "FairyGUI",
        }
    }

    pub fn config_key(self) -> String {
        format!("Enable{}", self.name())
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name().eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatorSettings {
    pub from_language: String,
    pub language: String,
    pub endpoint: Option<Endpoint>,
    pub fallback_endpoint: Option<Endpoint>,
    pub custom_url: String,
    pub baidu_app_id: String,
    pub baidu_app_secret: String,
    pub lingocloud_token: String,
    pub max_characters_per_translation: String,
    pub force_split_text_after_characters: String,
    pub override_font_text_mesh_pro: String,
    pub fallback_font_text_mesh_pro: String,
    /// Indexed like `TextFramework::ALL`.
    pub frameworks: [bool; 6],
}

impl Default for TranslatorSettings {
    fn default() -> Self {
        Self {
            from_language: String::new(),
            language: String::new(),
            endpoint: None,
            fallback_endpoint: None,
            custom_url: String::new(),
            baidu_app_id: String::new(),
            baidu_app_secret: String::new(),
            lingocloud_token: String::new(),
            max_characters_per_translation: String::new(),
            force_split_text_after_characters: String::new(),
            override_font_text_mesh_pro: String::new(),
            fallback_font_text_mesh_pro: String::new(),
            frameworks: [true; 6],
        }
    }
}

impl TranslatorSettings {
    pub fn from_ini(doc: &IniDocument) -> Self {
        let text = |section: &str, key: &str| doc.get_or(section, key, "").to_string();

        let mut frameworks = [true; 6];
        for (i, framework) in TextFramework::ALL.iter().enumerate() {
            frameworks[i] = doc.get_bool("TextFrameworks", &framework.config_key(), true);
        }

        Self {
            from_language: text("General", "FromLanguage"),
            language: text("General", "Language"),
            endpoint: doc.get("Service", "Endpoint").and_then(Endpoint::from_config_value),
            fallback_endpoint: doc
                .get("Service", "FallbackEndpoint")
                .and_then(Endpoint::from_config_value),
            custom_url: text("Custom", "Url"),
            baidu_app_id: text("Baidu", "BaiduAppId"),
            baidu_app_secret: text("Baidu", "BaiduAppSecret"),
            lingocloud_token: text("LingoCloud", "LingoCloudToken"),
            max_characters_per_translation: text("Behaviour", "MaxCharactersPerTranslation"),
            force_split_text_after_characters: text("Behaviour", "ForceSplitTextAfterCharacters"),
            override_font_text_mesh_pro: text("Behaviour", "OverrideFontTextMeshPro"),
            fallback_font_text_mesh_pro: text("Behaviour", "FallbackFontTextMeshPro"),
            frameworks,
        }
    }

    pub fn framework_enabled(&self, framework: TextFramework) -> bool {
        self.frameworks[framework as usize]
    }

    pub fn set_framework(&mut self, framework: TextFramework, enabled: bool) {
        self.frameworks[framework as usize] = enabled;
    }

    /// Write these settings into `doc`, plus the fixed tuning the installer always applies.
    pub fn apply(&self, doc: &mut IniDocument) {
        let endpoint_value = |e: Option<Endpoint>| e.map(Endpoint::config_value).unwrap_or("");

        doc.set("General", "FromLanguage", &resolve_language(&self.from_language));
        doc.set("General", "Language", &resolve_language(&self.language));

        doc.set("Service", "Endpoint", endpoint_value(self.endpoint));
        doc.set("Service", "FallbackEndpoint", endpoint_value(self.fallback_endpoint));

        doc.set("Custom", "Url", &self.custom_url);
        doc.set("Baidu", "BaiduAppId", &self.baidu_app_id);
        doc.set("Baidu", "BaiduAppSecret", &self.baidu_app_secret);
        doc.set("LingoCloud", "LingoCloudToken", &self.lingocloud_token);

        doc.set("Behaviour", "MaxCharactersPerTranslation", &self.max_characters_per_translation);
        doc.set("Behaviour", "ForceSplitTextAfterCharacters", &self.force_split_text_after_characters);
        doc.set("Behaviour", "OverrideFontTextMeshPro", &self.override_font_text_mesh_pro);
        doc.set("Behaviour", "FallbackFontTextMeshPro", &self.fallback_font_text_mesh_pro);

        for framework in TextFramework::ALL {
            let value = if self.framework_enabled(framework) { "True" } else { "False" };
            doc.set("TextFrameworks", &framework.config_key(), value);
        }

        doc.set("Baidu", "DelaySeconds", "0.1");
        doc.set("Custom", "EnableShortDelay", "True");
        doc.set("Custom", "DisableSpamChecks", "True");
        doc.set("Behaviour", "ReloadTranslationsOnFileChange", "True");
    }
}

/// The plugin config of one game, loaded for editing.
pub struct ConfigEditor {
    path: PathBuf,
    document: IniDocument,
}

impl ConfigEditor {
    pub fn open(game_dir: &Path) -> Result<Self> {
        let path = paths::xunity_config_file(game_dir);
        if !path.exists() {
            return Err(InstallerError::ConfigMissing(path));
        }
        let document = IniDocument::load(&path)?;
        tracing::debug!("Loaded {} sections from {}", document.sections().len(), path.display());
        Ok(Self { path, document })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &IniDocument {
        &self.document
    }

    pub fn settings(&self) -> TranslatorSettings {
        TranslatorSettings::from_ini(&self.document)
    }

    pub fn set_raw(&mut self, section: &str, key: &str, value: &str) {
        self.document.set(section, key, value);
    }

    pub fn apply(&mut self, settings: &TranslatorSettings) {
        settings.apply(&mut self.document);
    }

    pub fn save(&self) -> Result<()> {
        self.document.save(&self.path)?;
        tracing::info!("Saved plugin config {}", self.path.display());
        Ok(())
    }
}
