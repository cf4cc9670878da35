use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input, MultiSelect, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::Config;
use crate::game::{GameDetector, GameFingerprint, InstallationStatus};
use crate::installer::{ArchiveCatalog, PluginInstaller};
use crate::translator::{ConfigEditor, Endpoint, TextFramework, TranslatorSettings, BUNDLED_FONTS};

#[derive(Parser)]
#[command(
    name = "xuinstall",
    author,
    version,
    about = "XUnity Installer - BepInEx + XUnity.AutoTranslator setup for Unity games",
    long_about = "Detects a Unity game's architecture and scripting backend, installs the matching \
                  BepInEx and XUnity.AutoTranslator builds, and edits the translator configuration"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(long, help = "Launch GUI")]
    pub gui: bool,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Detect engine version, architecture and scripting backend")]
    Detect {
        #[arg(help = "Game directory")]
        path: PathBuf,

        #[arg(long, help = "Print the result as JSON")]
        json: bool,
    },

    #[command(about = "Show which plugin components are installed")]
    Status {
        #[arg(help = "Game directory")]
        path: PathBuf,
    },

    #[command(about = "Install BepInEx and XUnity.AutoTranslator")]
    Install {
        #[arg(help = "Game directory")]
        path: PathBuf,
    },

    #[command(about = "Run the game once so the plugin generates its config")]
    Init {
        #[arg(help = "Game directory")]
        path: PathBuf,

        #[arg(long, help = "Seconds to wait for the config file")]
        timeout: Option<u64>,
    },

    #[command(about = "Launch the game")]
    Launch {
        #[arg(help = "Game directory")]
        path: PathBuf,
    },

    #[command(about = "View or edit the translator configuration")]
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    #[command(about = "Remove all installed plugin files")]
    Uninstall {
        #[arg(help = "Game directory")]
        path: PathBuf,

        #[arg(long, help = "Skip confirmation")]
        yes: bool,
    },

    #[command(about = "Manage translated text")]
    Translations {
        #[command(subcommand)]
        action: TranslationCommands,
    },

    #[command(about = "Plugin log operations")]
    Log {
        #[command(subcommand)]
        action: LogCommands,
    },

    #[command(about = "Manage installer settings")]
    Settings {
        #[command(subcommand)]
        action: SettingsCommands,
    },

    #[command(about = "Launch GUI")]
    Gui,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    #[command(about = "Show translator settings")]
    Show {
        #[arg(help = "Game directory")]
        path: PathBuf,
    },

    #[command(about = "Get a raw config value")]
    Get {
        #[arg(help = "Game directory")]
        path: PathBuf,

        #[arg(help = "Section name")]
        section: String,

        #[arg(help = "Key name")]
        key: String,
    },

    #[command(about = "Set a raw config value")]
    Set {
        #[arg(help = "Game directory")]
        path: PathBuf,

        #[arg(help = "Section name")]
        section: String,

        #[arg(help = "Key name")]
        key: String,

        #[arg(help = "Value")]
        value: String,
    },

    #[command(about = "Edit translator settings (interactive when no options are given)")]
    Edit {
        #[arg(help = "Game directory")]
        path: PathBuf,

        #[command(flatten)]
        options: EditOptions,
    },
}

#[derive(clap::Args, Default)]
pub struct EditOptions {
    #[arg(long, help = "Source language code or name (e.g. ja, japanese)")]
    pub from: Option<String>,

    #[arg(long, help = "Target language code or name (e.g. zh-CN, english)")]
    pub to: Option<String>,

    #[arg(long, help = "Primary service (google, bing, papago, baidu, lingocloud, custom, none)")]
    pub endpoint: Option<String>,

    #[arg(long, help = "Fallback service")]
    pub fallback: Option<String>,

    #[arg(long, help = "Custom translation endpoint URL")]
    pub custom_url: Option<String>,

    #[arg(long, help = "Baidu AppId")]
    pub baidu_id: Option<String>,

    #[arg(long, help = "Baidu AppSecret")]
    pub baidu_secret: Option<String>,

    #[arg(long, help = "LingoCloud token")]
    pub lingocloud_token: Option<String>,

    #[arg(long, help = "Maximum characters per translation")]
    pub max_chars: Option<String>,

    #[arg(long, help = "Force line split after this many characters")]
    pub split_chars: Option<String>,

    #[arg(long, help = "TextMeshPro override font (empty to remove bundled fonts)")]
    pub font: Option<String>,

    #[arg(long, help = "TextMeshPro fallback font")]
    pub fallback_font: Option<String>,

    #[arg(long, help = "Enable capturing for a text framework")]
    pub enable: Vec<String>,

    #[arg(long, help = "Disable capturing for a text framework")]
    pub disable: Vec<String>,
}

impl EditOptions {
    fn is_empty(&self) -> bool {
        self.from.is_none()
            && self.to.is_none()
            && self.endpoint.is_none()
            && self.fallback.is_none()
            && self.custom_url.is_none()
            && self.baidu_id.is_none()
            && self.baidu_secret.is_none()
            && self.lingocloud_token.is_none()
            && self.max_chars.is_none()
            && self.split_chars.is_none()
            && self.font.is_none()
            && self.fallback_font.is_none()
            && self.enable.is_empty()
            && self.disable.is_empty()
    }

    /// Fold the given options into `settings`.
    pub fn apply_to(&self, settings: &mut TranslatorSettings) -> Result<()> {
        let assign = |target: &mut String, value: &Option<String>| {
            if let Some(v) = value {
                *target = v.clone();
            }
        };

        assign(&mut settings.from_language, &self.from);
        assign(&mut settings.language, &self.to);
        assign(&mut settings.custom_url, &self.custom_url);
        assign(&mut settings.baidu_app_id, &self.baidu_id);
        assign(&mut settings.baidu_app_secret, &self.baidu_secret);
        assign(&mut settings.lingocloud_token, &self.lingocloud_token);
        assign(&mut settings.max_characters_per_translation, &self.max_chars);
        assign(&mut settings.force_split_text_after_characters, &self.split_chars);
        assign(&mut settings.override_font_text_mesh_pro, &self.font);
        assign(&mut settings.fallback_font_text_mesh_pro, &self.fallback_font);

        if let Some(name) = &self.endpoint {
            settings.endpoint = parse_endpoint(name)?;
        }
        if let Some(name) = &self.fallback {
            settings.fallback_endpoint = parse_endpoint(name)?;
        }

        for (names, enabled) in [(&self.enable, true), (&self.disable, false)] {
            for name in names {
                let framework = TextFramework::parse(name)
                    .with_context(|| format!("Unknown text framework '{}'", name))?;
                settings.set_framework(framework, enabled);
            }
        }

        Ok(())
    }
}

fn parse_endpoint(name: &str) -> Result<Option<Endpoint>> {
    if name.is_empty() || name.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    Endpoint::parse(name)
        .map(Some)
        .with_context(|| format!("Unknown translation service '{}'", name))
}

#[derive(Subcommand)]
pub enum TranslationCommands {
    #[command(about = "Delete all translated text")]
    Clear {
        #[arg(help = "Game directory")]
        path: PathBuf,

        #[arg(long, help = "Skip confirmation")]
        yes: bool,
    },

    #[command(about = "Open the translation file in the default editor")]
    Edit {
        #[arg(help = "Game directory")]
        path: PathBuf,
    },

    #[command(about = "Print the translation file path")]
    Path {
        #[arg(help = "Game directory")]
        path: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum LogCommands {
    #[command(about = "Copy the plugin log out of the game directory")]
    Export {
        #[arg(help = "Game directory")]
        path: PathBuf,

        #[arg(long, short, help = "Destination file or directory")]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum SettingsCommands {
    #[command(about = "Show current settings")]
    Show,

    #[command(about = "Print the settings file path")]
    Path,

    #[command(about = "Reset settings to defaults")]
    Reset {
        #[arg(long, help = "Confirm reset")]
        yes: bool,
    },
}

impl Cli {
    /// No subcommand, `--gui` or `gui` all open the window.
    pub fn wants_gui(&self) -> bool {
        self.gui || matches!(self.command, None | Some(Commands::Gui))
    }

    /// Run the parsed command against an already loaded `config`.
    pub async fn execute(self, config: Config) -> Result<()> {
        let config_path = self.config.clone().unwrap_or_else(Config::config_path);

        let gui = self.wants_gui();
        let command = match self.command {
            Some(command) if !gui => command,
            _ => return crate::gui::run_gui(config),
        };

        match command {
            Commands::Detect { path, json } => handle_detect(&path, json),
            Commands::Status { path } => handle_status(&path),
            Commands::Install { path } => handle_install(&config, &path),
            Commands::Init { path, timeout } => handle_init(&config, &path, timeout).await,
            Commands::Launch { path } => handle_launch(&config, &path),
            Commands::Config { action } => handle_config_command(&config, action),
            Commands::Uninstall { path, yes } => handle_uninstall(&config, &path, yes),
            Commands::Translations { action } => handle_translation_command(&config, action),
            Commands::Log { action } => handle_log_command(&config, action),
            Commands::Settings { action } => handle_settings_command(&config_path, action),
            Commands::Gui => crate::gui::run_gui(config),
        }
    }
}

fn installer_for(config: &Config, path: &Path) -> PluginInstaller {
    PluginInstaller::new(path, ArchiveCatalog::from(&config.archives))
}

fn detect(path: &Path) -> Result<GameFingerprint> {
    GameDetector::default()
        .analyze(path)
        .with_context(|| format!("Failed to analyze {}", path.display()))
}

fn confirm(prompt: &str, skip: bool) -> Result<bool> {
    if skip {
        return Ok(true);
    }
    Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
}

fn yes_no(value: bool) -> ColoredString {
    if value { "✅ Yes".green() } else { "❌ No".red() }
}

fn print_fingerprint(fingerprint: &GameFingerprint) {
    println!("{}", "🎮 Game Information".bold().cyan());
    println!("  Executable:     {}", fingerprint.executable_name().yellow());
    println!("  Engine version: {}", fingerprint.version.yellow());
    println!("  Architecture:   {}", fingerprint.architecture.to_string().yellow());
    println!("  Backend:        {}", fingerprint.backend.to_string().yellow());
}

fn handle_detect(path: &Path, json: bool) -> Result<()> {
    let fingerprint = detect(path)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&fingerprint)?);
    } else {
        print_fingerprint(&fingerprint);
    }
    Ok(())
}

fn handle_status(path: &Path) -> Result<()> {
    let status = InstallationStatus::detect(path);

    println!("{}", "📦 Installation Status".bold().cyan());
    println!("  BepInEx:        {}", yes_no(status.bepinex));
    println!("  XUnity plugin:  {}", yes_no(status.xunity));
    println!("  Plugin config:  {}", yes_no(status.config));

    println!();
    println!("{}", "Available actions:".bold());
    let actions = [
        (status.can_install(), "install"),
        (status.can_initialize(), "init"),
        (status.can_edit_config(), "config edit"),
        (status.can_use_extras(), "translations / log export"),
        (status.can_uninstall(), "uninstall"),
    ];
    for (available, name) in actions {
        if available {
            println!("  • {}", name.green());
        } else {
            println!("  • {}", name.dimmed());
        }
    }
    Ok(())
}

fn handle_install(config: &Config, path: &Path) -> Result<()> {
    let fingerprint = detect(path)?;
    print_fingerprint(&fingerprint);

    let status = InstallationStatus::detect(path);
    if !status.can_install() {
        println!("{} Translation plugin is already installed", "ℹ️".blue());
        return Ok(());
    }

    let installer = installer_for(config, path);
    println!();
    println!(
        "{} Installing {}...",
        "📦",
        installer
            .catalog()
            .bepinex_archive(fingerprint.architecture, fingerprint.backend)
            .cyan()
    );
    installer.install_bepinex(fingerprint.architecture, fingerprint.backend)?;

    println!(
        "{} Installing {}...",
        "📦",
        installer.catalog().xunity_archive(fingerprint.backend).cyan()
    );
    installer.install_xunity(fingerprint.backend)?;

    println!("{} {}", "✅".green(), "Translation plugin installed".bold());
    println!("  Next: run {} to generate the plugin config", format!("xuinstall init {}", path.display()).yellow());
    Ok(())
}

async fn handle_init(config: &Config, path: &Path, timeout: Option<u64>) -> Result<()> {
    let fingerprint = detect(path)?;
    let status = InstallationStatus::detect(path);
    if !status.plugins_installed() {
        anyhow::bail!("Install the translation plugin before initializing it");
    }
    if status.config {
        println!("{} Plugin is already initialized", "ℹ️".blue());
        return Ok(());
    }

    let timeout = Duration::from_secs(timeout.unwrap_or(config.init.timeout_secs));
    let poll = Duration::from_millis(config.init.poll_interval_ms);

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.set_message(format!("Waiting for {} to generate the plugin config...", fingerprint.executable_name()));
    pb.enable_steady_tick(Duration::from_millis(120));

    let result = installer_for(config, path)
        .initialize_plugin(&fingerprint.executable, timeout, poll)
        .await;

    match result {
        Ok(()) => {
            pb.finish_with_message("Plugin config generated");
            println!("{} {}", "✅".green(), "Plugin initialized".bold());
            Ok(())
        }
        Err(e) => {
            pb.abandon_with_message("Initialization failed");
            Err(e).context("Check that the plugin loads correctly in this game")
        }
    }
}

fn handle_launch(config: &Config, path: &Path) -> Result<()> {
    let fingerprint = detect(path)?;
    println!("{} Launching {}...", "🚀", fingerprint.executable_name().bold().green());
    let pid = installer_for(config, path).launch_game(&fingerprint.executable)?;
    println!("✅ Launched (PID: {})", pid);
    Ok(())
}

fn print_settings(settings: &TranslatorSettings) {
    let service = |e: Option<Endpoint>| e.map(|e| e.to_string()).unwrap_or_else(|| "-".to_string());
    let text = |s: &str| if s.is_empty() { "-".dimmed() } else { s.yellow() };

    println!("{}", "Languages:".bold());
    println!("  From: {}", text(&settings.from_language));
    println!("  To:   {}", text(&settings.language));

    println!("{}", "Services:".bold());
    println!("  Primary:  {}", service(settings.endpoint).yellow());
    println!("  Fallback: {}", service(settings.fallback_endpoint).yellow());
    println!("  Custom URL:       {}", text(&settings.custom_url));
    println!("  Baidu AppId:      {}", text(&settings.baidu_app_id));
    println!("  Baidu AppSecret:  {}", text(&settings.baidu_app_secret));
    println!("  LingoCloud token: {}", text(&settings.lingocloud_token));

    println!("{}", "Text:".bold());
    println!("  Max characters: {}", text(&settings.max_characters_per_translation));
    println!("  Split after:    {}", text(&settings.force_split_text_after_characters));
    println!("  TMP font:          {}", text(&settings.override_font_text_mesh_pro));
    println!("  TMP fallback font: {}", text(&settings.fallback_font_text_mesh_pro));

    println!("{}", "Captured frameworks:".bold());
    for framework in TextFramework::ALL {
        println!("  {:<12} {}", framework.name(), yes_no(settings.framework_enabled(framework)));
    }
}

fn handle_config_command(config: &Config, action: ConfigCommands) -> Result<()> {
    match action {
        ConfigCommands::Show { path } => {
            let editor = ConfigEditor::open(&path)?;
            println!("{}", "⚙️  Translator Configuration".bold().cyan());
            println!("  {}", editor.path().display().to_string().dimmed());
            println!();
            print_settings(&editor.settings());
            Ok(())
        }
        ConfigCommands::Get { path, section, key } => {
            let editor = ConfigEditor::open(&path)?;
            match editor.document().get(&section, &key) {
                Some(value) => {
                    println!("{}", value);
                    Ok(())
                }
                None => anyhow::bail!("{}.{} is not set", section, key),
            }
        }
        ConfigCommands::Set { path, section, key, value } => {
            let mut editor = ConfigEditor::open(&path)?;
            editor.set_raw(&section, &key, &value);
            editor.save()?;
            println!("{} {}.{} = {}", "✅".green(), section, key, value.yellow());
            Ok(())
        }
        ConfigCommands::Edit { path, options } => {
            let mut editor = ConfigEditor::open(&path)?;
            let mut settings = editor.settings();

            if options.is_empty() {
                prompt_settings(&mut settings)?;
            } else {
                options.apply_to(&mut settings)?;
            }

            installer_for(config, &path).apply_fonts(
                &settings.override_font_text_mesh_pro,
                &settings.fallback_font_text_mesh_pro,
            )?;
            editor.apply(&settings);
            editor.save()?;
            println!("{} {}", "✅".green(), "Configuration updated".bold());
            Ok(())
        }
    }
}

fn prompt_text(prompt: &str, current: &str) -> Result<String> {
    Ok(Input::<String>::new()
        .with_prompt(prompt)
        .with_initial_text(current)
        .allow_empty(true)
        .interact_text()?)
}

fn prompt_endpoint(prompt: &str, current: Option<Endpoint>) -> Result<Option<Endpoint>> {
    let mut items: Vec<String> = vec!["(none)".to_string()];
    items.extend(Endpoint::ALL.iter().map(|e| e.to_string()));

    let default = current
        .and_then(|c| Endpoint::ALL.iter().position(|e| *e == c))
        .map(|i| i + 1)
        .unwrap_or(0);

    let choice = Select::new()
        .with_prompt(prompt)
        .items(&items)
        .default(default)
        .interact()?;
    Ok(if choice == 0 { None } else { Some(Endpoint::ALL[choice - 1]) })
}

fn prompt_settings(settings: &mut TranslatorSettings) -> Result<()> {
    println!("{}", "Language hint: codes like en, ja, zh-CN or names like japanese".dimmed());
    settings.from_language = prompt_text("Source language", &settings.from_language)?;
    settings.language = prompt_text("Target language", &settings.language)?;

    settings.endpoint = prompt_endpoint("Primary service", settings.endpoint)?;
    settings.fallback_endpoint = prompt_endpoint("Fallback service", settings.fallback_endpoint)?;

    settings.custom_url = prompt_text("Custom service URL", &settings.custom_url)?;
    settings.baidu_app_id = prompt_text("Baidu AppId", &settings.baidu_app_id)?;
    settings.baidu_app_secret = prompt_text("Baidu AppSecret", &settings.baidu_app_secret)?;
    settings.lingocloud_token = prompt_text("LingoCloud token", &settings.lingocloud_token)?;

    settings.max_characters_per_translation =
        prompt_text("Max characters per translation", &settings.max_characters_per_translation)?;
    settings.force_split_text_after_characters =
        prompt_text("Split text after characters", &settings.force_split_text_after_characters)?;

    println!("{} {}", "Bundled fonts:".dimmed(), BUNDLED_FONTS.join(", ").dimmed());
    settings.override_font_text_mesh_pro =
        prompt_text("TextMeshPro override font", &settings.override_font_text_mesh_pro)?;
    settings.fallback_font_text_mesh_pro =
        prompt_text("TextMeshPro fallback font", &settings.fallback_font_text_mesh_pro)?;

    let names: Vec<&str> = TextFramework::ALL.iter().map(|f| f.name()).collect();
    let selected = MultiSelect::new()
        .with_prompt("Capture text from")
        .items(&names)
        .defaults(&settings.frameworks)
        .interact()?;
    for (i, framework) in TextFramework::ALL.iter().enumerate() {
        settings.set_framework(*framework, selected.contains(&i));
    }

    Ok(())
}

fn handle_uninstall(config: &Config, path: &Path, yes: bool) -> Result<()> {
    let status = InstallationStatus::detect(path);
    if !status.can_uninstall() {
        println!("Nothing to uninstall in {}", path.display());
        return Ok(());
    }

    if !confirm("Remove BepInEx, the translation plugin and all their files?", yes)? {
        return Ok(());
    }

    let removed = installer_for(config, path).uninstall()?;
    for item in &removed {
        println!("  {} {}", "🗑️", item.display().to_string().dimmed());
    }
    println!("{} {}", "✅".green(), "Plugin uninstalled".bold());
    Ok(())
}

fn handle_translation_command(config: &Config, action: TranslationCommands) -> Result<()> {
    match action {
        TranslationCommands::Clear { path, yes } => {
            if !confirm("Delete all translated text?", yes)? {
                return Ok(());
            }
            if installer_for(config, &path).clear_translations()? {
                println!("{} {}", "✅".green(), "Translations cleared".bold());
            } else {
                println!("No translated text found");
            }
            Ok(())
        }
        TranslationCommands::Edit { path } => {
            let file = installer_for(config, &path).edit_translations()?;
            println!("Opened {}", file.display().to_string().cyan());
            Ok(())
        }
        TranslationCommands::Path { path } => {
            println!("{}", installer_for(config, &path).translation_file()?.display());
            Ok(())
        }
    }
}

fn handle_log_command(config: &Config, action: LogCommands) -> Result<()> {
    match action {
        LogCommands::Export { path, output } => {
            let installer = installer_for(config, &path);
            let exported = match output {
                Some(dest) => installer.export_log(&dest)?,
                None => installer.export_log_to_dir(&config.paths.log_export_dir)?,
            };
            println!("{} Plugin log exported to {}", "✅".green(), exported.display().to_string().cyan());
            Ok(())
        }
    }
}

fn handle_settings_command(config_path: &Path, action: SettingsCommands) -> Result<()> {
    match action {
        SettingsCommands::Show => {
            let config = Config::load(Some(config_path))?;
            println!("{}", "⚙️  Installer Settings".bold().cyan());
            println!();
            println!("{}", "Archives:".bold());
            println!("  Directory:       {}", config.archives.directory.display().to_string().yellow());
            println!("  BepInEx Mono:    {}", config.archives.bepinex_mono_version.yellow());
            println!("  BepInEx IL2CPP:  {}", config.archives.bepinex_il2cpp_version.yellow());
            println!("  XUnity:          {}", config.archives.xunity_version.yellow());
            println!("{}", "Initialization:".bold());
            println!("  Timeout:         {}s", config.init.timeout_secs);
            println!("  Poll interval:   {}ms", config.init.poll_interval_ms);
            println!("{}", "Paths:".bold());
            println!("  Log export dir:  {}", config.paths.log_export_dir.display());
            println!("  Log level:       {}", config.general.log_level);
            Ok(())
        }
        SettingsCommands::Path => {
            println!("{}", config_path.display());
            Ok(())
        }
        SettingsCommands::Reset { yes } => {
            if !yes {
                println!("Use --yes to confirm resetting settings to defaults");
                return Ok(());
            }
            Config::default().save_to(config_path)?;
            println!("{} Settings reset to defaults", "✅".green());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_edit_flags() {
        let cli = Cli::try_parse_from([
            "xuinstall", "config", "edit", "/games/demo", "--to", "english", "--endpoint", "google",
            "--disable", "imgui",
        ])
        .unwrap();

        let Some(Commands::Config { action: ConfigCommands::Edit { path, options } }) = cli.command else {
            panic!("expected config edit");
        };
        assert_eq!(path, PathBuf::from("/games/demo"));

        let mut settings = TranslatorSettings::default();
        options.apply_to(&mut settings).unwrap();
        assert_eq!(settings.language, "english");
        assert_eq!(settings.endpoint, Some(Endpoint::Google));
        assert!(!settings.framework_enabled(TextFramework::IMGUI));
    }

    #[test]
    fn test_gui_flag_keeps_config_path() {
        let cli = Cli::try_parse_from(["xuinstall", "--gui", "--config", "custom.toml"]).unwrap();
        assert!(cli.wants_gui());
        assert!(cli.command.is_none());
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));

        let cli = Cli::try_parse_from(["xuinstall"]).unwrap();
        assert!(cli.wants_gui());

        let cli = Cli::try_parse_from(["xuinstall", "status", "/games/demo"]).unwrap();
        assert!(!cli.wants_gui());
    }

    #[test]
    fn test_edit_rejects_unknown_names() {
        let mut settings = TranslatorSettings::default();
        let options = EditOptions {
            endpoint: Some("deepl".to_string()),
            ..Default::default()
        };
        assert!(options.apply_to(&mut settings).is_err());

        let options = EditOptions {
            enable: vec!["Flash".to_string()],
            ..Default::default()
        };
        assert!(options.apply_to(&mut settings).is_err());
    }

    #[test]
    fn test_endpoint_none_clears() {
        let mut settings = TranslatorSettings {
            fallback_endpoint: Some(Endpoint::Bing),
            ..Default::default()
        };
        let options = EditOptions {
            fallback: Some("none".to_string()),
            ..Default::default()
        };
        options.apply_to(&mut settings).unwrap();
        assert_eq!(settings.fallback_endpoint, None);
    }
}
