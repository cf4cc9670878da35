#[cfg(feature = "gui")]
use anyhow::Result;
#[cfg(feature = "gui")]
use eframe::egui;
#[cfg(feature = "gui")]
use poll_promise::Promise;
#[cfg(feature = "gui")]
use std::path::PathBuf;
#[cfg(feature = "gui")]
use std::time::Duration;

use crate::config::Config;
#[cfg(feature = "gui")]
use crate::game::{GameDetector, GameFingerprint, InstallationStatus};
#[cfg(feature = "gui")]
use crate::installer::{self, ArchiveCatalog, PluginInstaller};
#[cfg(feature = "gui")]
use crate::translator::{ConfigEditor, Endpoint, TextFramework, TranslatorSettings, BUNDLED_FONTS};

#[cfg(feature = "gui")]
const OK_COLOR: egui::Color32 = egui::Color32::from_rgb(76, 175, 80);
#[cfg(feature = "gui")]
const WARN_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 193, 7);

#[cfg(feature = "gui")]
pub struct InstallerApp {
    config: Config,
    game_dir: Option<PathBuf>,
    fingerprint: Option<GameFingerprint>,
    status: InstallationStatus,
    status_line: String,
    status_is_error: bool,
    editor: Option<EditorState>,
    pending: Option<PendingAction>,
    init_promise: Option<Promise<Result<(), String>>>,
    show_about: bool,
}

#[cfg(feature = "gui")]
struct EditorState {
    editor: ConfigEditor,
    settings: TranslatorSettings,
}

#[cfg(feature = "gui")]
#[derive(Debug, Clone, Copy, PartialEq)]
enum PendingAction {
    Uninstall,
    ClearTranslations,
}

#[cfg(feature = "gui")]
impl PendingAction {
    fn prompt(self) -> &'static str {
        match self {
            PendingAction::Uninstall => "Remove BepInEx, the translation plugin and all their files?",
            PendingAction::ClearTranslations => "Delete all translated text?",
        }
    }
}

#[cfg(feature = "gui")]
#[derive(Debug, Clone, Copy, PartialEq)]
enum EditorAction {
    Save,
    Cancel,
}

#[cfg(feature = "gui")]
impl InstallerApp {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            game_dir: None,
            fingerprint: None,
            status: InstallationStatus::default(),
            status_line: "Select a game folder to begin".to_string(),
            status_is_error: false,
            editor: None,
            pending: None,
            init_promise: None,
            show_about: false,
        }
    }

    fn installer(&self) -> Option<PluginInstaller> {
        let dir = self.game_dir.as_ref()?;
        Some(PluginInstaller::new(dir, ArchiveCatalog::from(&self.config.archives)))
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status_line = message.into();
        self.status_is_error = false;
    }

    fn set_error(&mut self, message: impl Into<String>) {
        self.status_line = message.into();
        self.status_is_error = true;
        tracing::warn!("{}", self.status_line);
    }

    fn busy(&self) -> bool {
        self.init_promise.is_some()
    }

    fn select_game(&mut self, dir: PathBuf) {
        tracing::info!("Selected game folder {}", dir.display());
        self.editor = None;
        self.fingerprint = None;
        self.game_dir = None;
        self.status = InstallationStatus::default();

        match GameDetector::default().analyze(&dir) {
            Ok(fingerprint) => {
                self.set_status(format!("Detected {}", fingerprint.executable_name()));
                self.fingerprint = Some(fingerprint);
                self.game_dir = Some(dir);
                self.refresh_status();
            }
            // A rejected folder leaves every action disabled
            Err(e) => self.set_error(e.to_string()),
        }
    }

    fn refresh_status(&mut self) {
        if let Some(dir) = &self.game_dir {
            self.status = InstallationStatus::detect(dir);
        }
    }

    fn install(&mut self) {
        let (Some(installer), Some(fingerprint)) = (self.installer(), self.fingerprint.clone()) else {
            return;
        };
        match installer.install_plugins(&fingerprint) {
            Ok(()) => self.set_status("Translation plugin installed"),
            Err(e) => self.set_error(format!("Install failed: {}", e)),
        }
        self.refresh_status();
    }

    fn start_initialize(&mut self, ctx: &egui::Context) {
        let (Some(installer), Some(fingerprint)) = (self.installer(), self.fingerprint.clone()) else {
            return;
        };
        let timeout = Duration::from_secs(self.config.init.timeout_secs);
        let poll = Duration::from_millis(self.config.init.poll_interval_ms);
        let ctx = ctx.clone();

        self.set_status("Waiting for the game to generate the plugin config...");
        self.init_promise = Some(Promise::spawn_thread("plugin_init", move || {
            let result = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|e| e.to_string())
                .and_then(|rt| {
                    rt.block_on(installer.initialize_plugin(&fingerprint.executable, timeout, poll))
                        .map_err(|e| e.to_string())
                });
            ctx.request_repaint();
            result
        }));
    }

    fn poll_initialize(&mut self) {
        let finished = self
            .init_promise
            .as_ref()
            .and_then(|promise| promise.ready().cloned());

        if let Some(result) = finished {
            self.init_promise = None;
            match result {
                Ok(()) => self.set_status("Plugin initialized"),
                Err(e) => self.set_error(format!("Initialization failed: {}", e)),
            }
            self.refresh_status();
        }
    }

    fn launch(&mut self) {
        let (Some(installer), Some(fingerprint)) = (self.installer(), self.fingerprint.as_ref()) else {
            return;
        };
        match installer.launch_game(&fingerprint.executable) {
            Ok(pid) => self.set_status(format!("Launched (PID {})", pid)),
            Err(e) => self.set_error(e.to_string()),
        }
    }

    fn open_editor(&mut self) {
        let Some(dir) = &self.game_dir else {
            return;
        };
        match ConfigEditor::open(dir) {
            Ok(editor) => {
                let settings = editor.settings();
                self.editor = Some(EditorState { editor, settings });
            }
            Err(e) => self.set_error(e.to_string()),
        }
    }

    fn save_editor(&mut self) {
        let Some(mut state) = self.editor.take() else {
            return;
        };
        let Some(installer) = self.installer() else {
            return;
        };

        let result = installer
            .apply_fonts(
                &state.settings.override_font_text_mesh_pro,
                &state.settings.fallback_font_text_mesh_pro,
            )
            .and_then(|()| {
                state.editor.apply(&state.settings);
                state.editor.save()
            });

        match result {
            Ok(()) => self.set_status("Configuration saved"),
            Err(e) => {
                self.set_error(format!("Saving configuration failed: {}", e));
                self.editor = Some(state);
            }
        }
    }

    fn edit_translations(&mut self) {
        let Some(installer) = self.installer() else {
            return;
        };
        match installer.edit_translations() {
            Ok(file) => self.set_status(format!("Opened {}", file.display())),
            Err(e) => self.set_error(e.to_string()),
        }
    }

    fn export_log(&mut self) {
        let Some(installer) = self.installer() else {
            return;
        };
        let Some(dest) = rfd::FileDialog::new()
            .set_directory(&self.config.paths.log_export_dir)
            .set_file_name(installer::default_log_export_name(chrono::Local::now()))
            .add_filter("Log", &["log"])
            .save_file()
        else {
            return;
        };

        match installer.export_log(&dest) {
            Ok(path) => self.set_status(format!("Plugin log exported to {}", path.display())),
            Err(e) => self.set_error(e.to_string()),
        }
    }

    fn run_pending(&mut self, action: PendingAction) {
        let Some(installer) = self.installer() else {
            return;
        };
        match action {
            PendingAction::Uninstall => match installer.uninstall() {
                Ok(removed) => {
                    self.editor = None;
                    self.set_status(format!("Plugin uninstalled ({} items removed)", removed.len()));
                }
                Err(e) => self.set_error(format!("Uninstall failed: {}", e)),
            },
            PendingAction::ClearTranslations => match installer.clear_translations() {
                Ok(true) => self.set_status("Translations cleared"),
                Ok(false) => self.set_status("No translated text found"),
                Err(e) => self.set_error(e.to_string()),
            },
        }
        self.refresh_status();
    }

    fn show_versions(&self, ui: &mut egui::Ui) {
        ui.heading("📦 Bundled Versions");
        egui::Grid::new("versions_grid").num_columns(2).show(ui, |ui| {
            ui.label("BepInEx (Mono):");
            ui.label(self.config.archives.bepinex_mono_version.as_str());
            ui.end_row();
            ui.label("BepInEx (IL2CPP):");
            ui.label(self.config.archives.bepinex_il2cpp_version.as_str());
            ui.end_row();
            ui.label("XUnity.AutoTranslator:");
            ui.label(self.config.archives.xunity_version.as_str());
            ui.end_row();
        });
        ui.small(format!("Archives: {}", self.config.archives.directory.display()));
    }

    fn show_fingerprint(&self, ui: &mut egui::Ui) {
        ui.heading("🎮 Game");
        egui::Grid::new("fingerprint_grid").num_columns(2).show(ui, |ui| {
            let value = |f: fn(&GameFingerprint) -> String| {
                self.fingerprint.as_ref().map(f).unwrap_or_else(|| "-".to_string())
            };
            ui.label("Executable:");
            ui.label(value(|fp| fp.executable_name()));
            ui.end_row();
            ui.label("Engine version:");
            ui.label(value(|fp| fp.version.clone()));
            ui.end_row();
            ui.label("Architecture:");
            ui.label(value(|fp| fp.architecture.to_string()));
            ui.end_row();
            ui.label("Backend:");
            ui.label(value(|fp| fp.backend.to_string()));
            ui.end_row();
        });

        ui.add_space(4.0);
        ui.horizontal(|ui| {
            for (present, name) in [
                (self.status.bepinex, "BepInEx"),
                (self.status.xunity, "XUnity"),
                (self.status.config, "Config"),
            ] {
                let (color, mark) = if present { (OK_COLOR, "✔") } else { (egui::Color32::GRAY, "✖") };
                ui.colored_label(color, format!("{} {}", mark, name));
            }
        });
    }

    fn show_actions(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let idle = !self.busy() && self.pending.is_none();
        let has_game = self.fingerprint.is_some();
        let status = self.status;

        ui.heading("⚙️ Actions");
        ui.horizontal_wrapped(|ui| {
            if ui
                .add_enabled(idle && has_game && status.can_install(), egui::Button::new("📥 Install"))
                .clicked()
            {
                self.install();
            }
            if ui
                .add_enabled(idle && has_game && status.can_initialize(), egui::Button::new("🔧 Initialize"))
                .clicked()
            {
                self.start_initialize(ctx);
            }
            if ui
                .add_enabled(idle && status.can_edit_config(), egui::Button::new("📝 Edit Config"))
                .clicked()
            {
                self.open_editor();
            }
            if ui.add_enabled(idle && has_game, egui::Button::new("🚀 Launch")).clicked() {
                self.launch();
            }
        });

        ui.horizontal_wrapped(|ui| {
            let extras = idle && status.can_use_extras();
            if ui.add_enabled(extras, egui::Button::new("🧹 Clear Translations")).clicked() {
                self.pending = Some(PendingAction::ClearTranslations);
            }
            if ui.add_enabled(extras, egui::Button::new("📄 Edit Translations")).clicked() {
                self.edit_translations();
            }
            if ui.add_enabled(extras, egui::Button::new("📤 Export Log")).clicked() {
                self.export_log();
            }
            if ui
                .add_enabled(idle && status.can_uninstall(), egui::Button::new("🗑 Uninstall"))
                .clicked()
            {
                self.pending = Some(PendingAction::Uninstall);
            }
        });

        if self.busy() {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Initializing plugin...");
            });
        }
    }

    fn show_editor_window(&mut self, ctx: &egui::Context) {
        let mut action = None;
        if let Some(state) = self.editor.as_mut() {
            egui::Window::new("Translator Configuration")
                .collapsible(false)
                .resizable(true)
                .default_width(420.0)
                .show(ctx, |ui| {
                    action = settings_form(ui, &mut state.settings);
                });
        }

        match action {
            Some(EditorAction::Save) => self.save_editor(),
            Some(EditorAction::Cancel) => self.editor = None,
            None => {}
        }
    }

    fn show_confirm_window(&mut self, ctx: &egui::Context) {
        let Some(action) = self.pending else {
            return;
        };

        let mut answer = None;
        egui::Window::new("Confirm")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(action.prompt());
                ui.horizontal(|ui| {
                    if ui.button("Yes").clicked() {
                        answer = Some(true);
                    }
                    if ui.button("No").clicked() {
                        answer = Some(false);
                    }
                });
            });

        if let Some(confirmed) = answer {
            self.pending = None;
            if confirmed {
                self.run_pending(action);
            }
        }
    }
}

#[cfg(feature = "gui")]
fn endpoint_label(endpoint: Option<Endpoint>) -> String {
    endpoint.map(|e| e.to_string()).unwrap_or_else(|| "(none)".to_string())
}

#[cfg(feature = "gui")]
fn endpoint_combo(ui: &mut egui::Ui, id: &str, value: &mut Option<Endpoint>) {
    egui::ComboBox::from_id_salt(id)
        .selected_text(endpoint_label(*value))
        .show_ui(ui, |ui| {
            ui.selectable_value(value, None, endpoint_label(None));
            for endpoint in Endpoint::ALL {
                ui.selectable_value(value, Some(endpoint), endpoint.to_string());
            }
        });
}

#[cfg(feature = "gui")]
fn font_combo(ui: &mut egui::Ui, id: &str, value: &mut String) {
    ui.horizontal(|ui| {
        egui::ComboBox::from_id_salt(id)
            .selected_text(if value.is_empty() { "(none)" } else { value.as_str() })
            .show_ui(ui, |ui| {
                ui.selectable_value(value, String::new(), "(none)");
                for font in BUNDLED_FONTS {
                    ui.selectable_value(value, font.to_string(), *font);
                }
            });
        ui.text_edit_singleline(value);
    });
}

#[cfg(feature = "gui")]
fn settings_form(ui: &mut egui::Ui, settings: &mut TranslatorSettings) -> Option<EditorAction> {
    egui::Grid::new("settings_grid").num_columns(2).spacing([12.0, 6.0]).show(ui, |ui| {
        ui.label("Source language:");
        ui.text_edit_singleline(&mut settings.from_language);
        ui.end_row();
        ui.label("Target language:");
        ui.text_edit_singleline(&mut settings.language);
        ui.end_row();

        ui.label("Primary service:");
        endpoint_combo(ui, "endpoint", &mut settings.endpoint);
        ui.end_row();
        ui.label("Fallback service:");
        endpoint_combo(ui, "fallback_endpoint", &mut settings.fallback_endpoint);
        ui.end_row();

        ui.label("Custom URL:");
        ui.text_edit_singleline(&mut settings.custom_url);
        ui.end_row();
        ui.label("Baidu AppId:");
        ui.text_edit_singleline(&mut settings.baidu_app_id);
        ui.end_row();
        ui.label("Baidu AppSecret:");
        ui.add(egui::TextEdit::singleline(&mut settings.baidu_app_secret).password(true));
        ui.end_row();
        ui.label("LingoCloud token:");
        ui.add(egui::TextEdit::singleline(&mut settings.lingocloud_token).password(true));
        ui.end_row();

        ui.label("Max characters:");
        ui.text_edit_singleline(&mut settings.max_characters_per_translation);
        ui.end_row();
        ui.label("Split after characters:");
        ui.text_edit_singleline(&mut settings.force_split_text_after_characters);
        ui.end_row();

        ui.label("TMP override font:");
        font_combo(ui, "override_font", &mut settings.override_font_text_mesh_pro);
        ui.end_row();
        ui.label("TMP fallback font:");
        font_combo(ui, "fallback_font", &mut settings.fallback_font_text_mesh_pro);
        ui.end_row();
    });

    ui.small("Languages accept codes (en, ja, zh-CN) or names (english, japanese)");
    ui.separator();

    ui.label("Capture text from:");
    ui.horizontal_wrapped(|ui| {
        for framework in TextFramework::ALL {
            let mut enabled = settings.framework_enabled(framework);
            if ui.checkbox(&mut enabled, framework.name()).changed() {
                settings.set_framework(framework, enabled);
            }
        }
    });

    ui.separator();
    let mut action = None;
    ui.horizontal(|ui| {
        if ui.button("💾 Save").clicked() {
            action = Some(EditorAction::Save);
        }
        if ui.button("Cancel").clicked() {
            action = Some(EditorAction::Cancel);
        }
    });
    action
}

#[cfg(feature = "gui")]
impl eframe::App for InstallerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_initialize();

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("📂 Open Game Folder").clicked() {
                        ui.close_menu();
                        if let Some(dir) = rfd::FileDialog::new().pick_folder() {
                            self.select_game(dir);
                        }
                    }
                    ui.separator();
                    if ui.button("❌ Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.menu_button("Help", |ui| {
                    if ui.button("ℹ️ About").clicked() {
                        self.show_about = true;
                    }
                });
            });
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            let color = if self.status_is_error { egui::Color32::RED } else { OK_COLOR };
            ui.colored_label(color, self.status_line.as_str());
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                let label = self
                    .game_dir
                    .as_ref()
                    .map(|d| d.display().to_string())
                    .unwrap_or_else(|| "No game selected".to_string());
                if ui.add_enabled(!self.busy(), egui::Button::new("📂 Browse...")).clicked() {
                    if let Some(dir) = rfd::FileDialog::new().pick_folder() {
                        self.select_game(dir);
                    }
                }
                ui.colored_label(if self.game_dir.is_some() { OK_COLOR } else { WARN_COLOR }, label);
            });

            ui.separator();
            ui.columns(2, |columns| {
                self.show_fingerprint(&mut columns[0]);
                self.show_versions(&mut columns[1]);
            });
            ui.separator();
            self.show_actions(ui, ctx);
        });

        self.show_editor_window(ctx);
        self.show_confirm_window(ctx);

        if self.show_about {
            egui::Window::new("About XUnity Installer")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(format!("XUnity Installer v{}", env!("CARGO_PKG_VERSION")));
                    ui.separator();
                    ui.label("Installs BepInEx and XUnity.AutoTranslator into Unity games.");
                    if ui.button("Close").clicked() {
                        self.show_about = false;
                    }
                });
        }
    }
}

#[cfg(feature = "gui")]
pub fn run_gui(config: Config) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([720.0, 520.0])
            .with_min_inner_size([560.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "XUnity Installer",
        options,
        Box::new(|_cc| Ok(Box::new(InstallerApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run GUI: {}", e))
}

#[cfg(not(feature = "gui"))]
pub fn run_gui(_config: Config) -> anyhow::Result<()> {
    Err(anyhow::anyhow!(
        "GUI feature not enabled. Compile with --features gui"
    ))
}
