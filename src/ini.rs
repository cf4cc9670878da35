//! Order-preserving INI documents
//!
//! XUnity.AutoTranslator writes a flat `key=value` file grouped into
//! sections. Edits keep the existing section and key order so a saved file
//! diffs cleanly against the one the plugin generated.

use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::Result;

const BOM: char = '\u{feff}';
const DEFAULT_SECTION: &str = "General";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniSection {
    pub name: String,
    pub entries: Vec<(String, String)>,
}

impl IniSection {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            entries: Vec::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn set(&mut self, key: &str, value: &str) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.entries.push((key.to_string(), value.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    sections: Vec<IniSection>,
}

impl IniDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(text: &str) -> Self {
        let mut doc = Self::new();
        let mut current: Option<String> = None;

        for (number, line) in text.trim_start_matches(BOM).lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with(';') || trimmed.starts_with('#') {
                continue;
            }

            if trimmed.starts_with('[') && trimmed.ends_with(']') {
                let name = trimmed[1..trimmed.len() - 1].trim().to_string();
                doc.section_mut(&name);
                current = Some(name);
                continue;
            }

            match trimmed.split_once('=') {
                Some((key, value)) if !key.trim().is_empty() => {
                    let section = current.get_or_insert_with(|| DEFAULT_SECTION.to_string()).clone();
                    doc.set(&section, key.trim(), value.trim());
                }
                _ => tracing::warn!("Ignoring malformed INI line {}: {}", number + 1, trimmed),
            }
        }

        doc
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_string())?;
        Ok(())
    }

    pub fn sections(&self) -> &[IniSection] {
        &self.sections
    }

    pub fn section(&self, name: &str) -> Option<&IniSection> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section).and_then(|s| s.get(key))
    }

    pub fn get_or<'a>(&'a self, section: &str, key: &str, default: &'a str) -> &'a str {
        self.get(section, key).unwrap_or(default)
    }

    /// Accepts `true/yes/1/on` and `false/no/0/off` in any case.
    pub fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        match self.get(section, key).map(|v| v.to_lowercase()) {
            Some(v) if matches!(v.as_str(), "true" | "yes" | "1" | "on") => true,
            Some(v) if matches!(v.as_str(), "false" | "no" | "0" | "off") => false,
            _ => default,
        }
    }

    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        self.section_mut(section).set(key, value);
    }

    fn section_mut(&mut self, name: &str) -> &mut IniSection {
        let index = match self.sections.iter().position(|s| s.name == name) {
            Some(index) => index,
            None => {
                self.sections.push(IniSection::new(name));
                self.sections.len() - 1
            }
        };
        &mut self.sections[index]
    }
}

impl fmt::Display for IniDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for section in &self.sections {
            writeln!(f, "[{}]", section.name)?;
            for (key, value) in &section.entries {
                writeln!(f, "{}={}", key, value)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    const SAMPLE: &str = "\u{feff}[Service]\nEndpoint = GoogleTranslate\nFallbackEndpoint=\n\n; comment\n[General]\nLanguage=zh\nFromLanguage=ja\n";

    #[test]
    fn test_parse_strips_bom_and_spaces() {
        let doc = IniDocument::parse(SAMPLE);
        assert_eq!(doc.get("Service", "Endpoint"), Some("GoogleTranslate"));
        assert_eq!(doc.get("Service", "FallbackEndpoint"), Some(""));
        assert_eq!(doc.get("General", "Language"), Some("zh"));
        assert_eq!(doc.get("General", "Missing"), None);
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let doc = IniDocument::parse("[General]\nLanguage=en\n");
        assert_eq!(doc.get("General", "language"), None);
    }

    #[test]
    fn test_keys_before_header_go_to_general() {
        let doc = IniDocument::parse("Language=en\n[Other]\nA=1\n");
        assert_eq!(doc.get("General", "Language"), Some("en"));
        assert_eq!(doc.sections()[0].name, "General");
    }

    #[test]
    fn test_value_may_contain_equals() {
        let doc = IniDocument::parse("[Custom]\nUrl=http://host/api?a=b\n");
        assert_eq!(doc.get("Custom", "Url"), Some("http://host/api?a=b"));
    }

    #[test]
    fn test_round_trip_preserves_order() {
        let mut doc = IniDocument::parse(SAMPLE);
        doc.set("General", "Language", "en");
        doc.set("Behaviour", "MaxCharactersPerTranslation", "200");

        assert_eq!(
            doc.to_string(),
            "[Service]\nEndpoint=GoogleTranslate\nFallbackEndpoint=\n\n\
             [General]\nLanguage=en\nFromLanguage=ja\n\n\
             [Behaviour]\nMaxCharactersPerTranslation=200\n\n"
        );
    }

    #[test]
    fn test_get_bool_variants() {
        let doc = IniDocument::parse("[T]\na=True\nb=no\nc=1\nd=maybe\n");
        assert!(doc.get_bool("T", "a", false));
        assert!(!doc.get_bool("T", "b", true));
        assert!(doc.get_bool("T", "c", false));
        assert!(doc.get_bool("T", "d", true));
        assert!(!doc.get_bool("T", "missing", false));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config").join("test.ini");

        let mut doc = IniDocument::new();
        doc.set("General", "Language", "ko");
        doc.save(&path).unwrap();

        let loaded = IniDocument::load(&path).unwrap();
        assert_eq!(loaded, doc);
        assert!(!std::fs::read(&path).unwrap().starts_with(&[0xEF, 0xBB, 0xBF]));
    }
}
