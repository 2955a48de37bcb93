//! The dialogs behind the shortcuts: open/save browser, quit
//! confirmation, help, and preferences.

use crate::app::{RoomApp, StyleMode};
use egui::Context;
use roomcore::color::parse_color;
use roomcore::storage::FileBrowser;
use roomcore::theme::{self, Theme};
use roomcore::widgets::{dialog_frame, FileListItem};
use std::path::PathBuf;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum FileDialogMode {
    Open,
    Save,
}

pub struct FileDialogState {
    pub mode: FileDialogMode,
    pub browser: FileBrowser,
    pub filename: String,
}

impl FileDialogState {
    pub fn open(start_dir: PathBuf) -> Self {
        Self {
            mode: FileDialogMode::Open,
            browser: FileBrowser::new(start_dir),
            filename: String::new(),
        }
    }

    pub fn save(start_dir: PathBuf, suggested: String) -> Self {
        Self {
            mode: FileDialogMode::Save,
            browser: FileBrowser::new(start_dir),
            filename: suggested,
        }
    }
}

/// Editing state for the preferences window.
pub struct PrefsState {
    pub available: Vec<String>,
    /// The in-progress custom theme (drives the live preview).
    pub custom: Theme,
    /// Raw text being typed into the color fields; only valid colors
    /// make it into `custom`.
    pub color_edits: Vec<(String, String)>,
    pub font_edit: String,
    pub font_size: f32,
    pub width: f32,
    pub height: f32,
    pub padding: f32,
}

const COLOR_KEYS: &[&str] = &["background", "foreground", "textboxbg", "border"];

impl PrefsState {
    pub fn new(theme: &Theme, config: &crate::config::Config) -> Self {
        let custom = if config.custom.is_empty() {
            theme.clone()
        } else {
            Theme::from_values(config.custom.clone())
        };
        let color_edits = COLOR_KEYS
            .iter()
            .map(|key| {
                (
                    key.to_string(),
                    custom.get(key).unwrap_or_default().to_string(),
                )
            })
            .collect();
        Self {
            available: theme::available_themes(),
            font_edit: custom.font().to_string(),
            font_size: custom.font_size(),
            width: custom.width_fraction(),
            height: custom.height_fraction(),
            padding: custom.padding(),
            color_edits,
            custom,
        }
    }
}

enum FileAction {
    None,
    Cancel,
    Open(PathBuf),
    Save(PathBuf),
}

impl RoomApp {
    pub(crate) fn render_file_dialog(&mut self, ctx: &Context) {
        let (title, action_label) = match self.file_dialog.as_ref().map(|d| d.mode) {
            Some(FileDialogMode::Open) => {
                (self.i18n.tr("dialog-open-title"), self.i18n.tr("dialog-open"))
            }
            Some(FileDialogMode::Save) => {
                (self.i18n.tr("dialog-save-title"), self.i18n.tr("dialog-save"))
            }
            None => return,
        };
        let location_label = self.i18n.tr("dialog-location");
        let filename_label = self.i18n.tr("dialog-filename");
        let cancel_label = self.i18n.tr("dialog-cancel");
        let frame = dialog_frame(&ctx.style().visuals);

        let mut action = FileAction::None;
        let Some(dialog) = self.file_dialog.as_mut() else { return };

        egui::Window::new(title)
            .frame(frame)
            .collapsible(false)
            .resizable(false)
            .default_width(420.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(location_label);
                    ui.label(dialog.browser.current_dir.to_string_lossy().to_string());
                });
                ui.separator();
                egui::ScrollArea::vertical()
                    .max_height(240.0)
                    .show(ui, |ui| {
                        let entries = dialog.browser.entries.clone();
                        for (idx, entry) in entries.iter().enumerate() {
                            let selected = dialog.browser.selected_index == Some(idx);
                            let response = ui.add(
                                FileListItem::new(&entry.name, entry.is_directory)
                                    .selected(selected),
                            );
                            if response.clicked() {
                                dialog.browser.selected_index = Some(idx);
                                if !entry.is_directory && dialog.mode == FileDialogMode::Save {
                                    dialog.filename = entry.name.clone();
                                }
                            }
                            if response.double_clicked() {
                                if entry.is_directory {
                                    dialog.browser.navigate_to(entry.path.clone());
                                } else if dialog.mode == FileDialogMode::Open {
                                    action = FileAction::Open(entry.path.clone());
                                }
                            }
                        }
                    });
                if dialog.mode == FileDialogMode::Save {
                    ui.separator();
                    ui.horizontal(|ui| {
                        ui.label(filename_label);
                        ui.text_edit_singleline(&mut dialog.filename);
                    });
                }
                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button(cancel_label).clicked() {
                        action = FileAction::Cancel;
                    }
                    if ui.button(action_label).clicked() {
                        match dialog.mode {
                            FileDialogMode::Open => {
                                if let Some(entry) = dialog.browser.selected_entry() {
                                    if !entry.is_directory {
                                        action = FileAction::Open(entry.path.clone());
                                    }
                                }
                            }
                            FileDialogMode::Save => {
                                if !dialog.filename.is_empty() {
                                    action = FileAction::Save(
                                        dialog.browser.current_dir.join(&dialog.filename),
                                    );
                                }
                            }
                        }
                    }
                });
            });

        match action {
            FileAction::None => {}
            FileAction::Cancel => self.file_dialog = None,
            FileAction::Open(path) => {
                self.file_dialog = None;
                self.open_path(path);
            }
            FileAction::Save(path) => {
                self.file_dialog = None;
                self.save_current_as(path);
            }
        }
    }

    pub(crate) fn render_close_dialog(&mut self, ctx: &Context) {
        let title = self.i18n.tr("close-title");
        let untitled = self.i18n.tr("untitled");
        let name = self.buffers.current().title().unwrap_or(untitled);
        let question = self.tr_name("close-question", &name);
        let save = self.i18n.tr("close-save");
        let discard = self.i18n.tr("close-discard");
        let cancel = self.i18n.tr("dialog-cancel");
        let frame = dialog_frame(&ctx.style().visuals);

        let mut do_save = false;
        let mut do_discard = false;
        egui::Window::new(title)
            .frame(frame)
            .collapsible(false)
            .resizable(false)
            .default_width(300.0)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(question);
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button(&discard).clicked() {
                        do_discard = true;
                    }
                    if ui.button(&cancel).clicked() {
                        self.show_close_dialog = false;
                    }
                    if ui.button(&save).clicked() {
                        do_save = true;
                    }
                });
            });

        if do_discard {
            self.finish_close_buffer();
        }
        if do_save {
            self.save_current();
            if self.buffers.current().modified {
                // Still unnamed; the save dialog took over.
                self.show_close_dialog = false;
            } else {
                self.finish_close_buffer();
            }
        }
    }

    pub(crate) fn render_quit_dialog(&mut self, ctx: &Context) {
        let title = self.i18n.tr("quit-title");
        let question = self.i18n.tr("quit-question");
        let save_all = self.i18n.tr("quit-save-all");
        let discard = self.i18n.tr("quit-discard");
        let cancel = self.i18n.tr("dialog-cancel");
        let untitled = self.i18n.tr("untitled");
        let unsaved: Vec<String> = self
            .buffers
            .modified_buffers()
            .map(|b| b.title().unwrap_or_else(|| untitled.clone()))
            .collect();
        let frame = dialog_frame(&ctx.style().visuals);

        let mut do_save = false;
        let mut do_discard = false;
        egui::Window::new(title)
            .frame(frame)
            .collapsible(false)
            .resizable(false)
            .default_width(320.0)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(question);
                for name in &unsaved {
                    ui.monospace(format!("  {}", name));
                }
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button(&discard).clicked() {
                        do_discard = true;
                    }
                    if ui.button(&cancel).clicked() {
                        self.show_quit_dialog = false;
                    }
                    if ui.button(&save_all).clicked() {
                        do_save = true;
                    }
                });
            });

        if do_discard {
            self.quit_discarding(ctx);
        }
        if do_save {
            self.quit_saving(ctx);
        }
    }

    pub(crate) fn render_help(&mut self, ctx: &Context) {
        let title = self.i18n.tr("help-title");
        let rows = [
            ("ctrl+n", self.i18n.tr("help-new")),
            ("ctrl+o", self.i18n.tr("help-open")),
            ("ctrl+s", self.i18n.tr("help-save")),
            ("ctrl+shift+s", self.i18n.tr("help-save-as")),
            ("ctrl+w", self.i18n.tr("help-close")),
            ("ctrl+pgup", self.i18n.tr("help-prev")),
            ("ctrl+pgdn", self.i18n.tr("help-next")),
            ("ctrl+up", self.i18n.tr("help-scroll-up")),
            ("ctrl+down", self.i18n.tr("help-scroll-down")),
            ("ctrl+p", self.i18n.tr("help-prefs")),
            ("ctrl+h", self.i18n.tr("help-help")),
            ("ctrl+q", self.i18n.tr("help-quit")),
        ];
        let frame = dialog_frame(&ctx.style().visuals);

        let mut open = true;
        egui::Window::new(title)
            .frame(frame)
            .collapsible(false)
            .resizable(false)
            .default_width(300.0)
            .show(ctx, |ui| {
                for (shortcut, description) in &rows {
                    shortcut_row(ui, shortcut, description);
                }
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if ui.button("ok").clicked() {
                        open = false;
                    }
                });
            });
        if !open {
            self.show_help = false;
        }
    }

    pub(crate) fn render_prefs(&mut self, ctx: &Context) {
        let title = self.i18n.tr("prefs-title");
        let theme_label = self.i18n.tr("prefs-theme");
        let border_label = self.i18n.tr("prefs-border");
        let autosave_label = self.i18n.tr("prefs-autosave");
        let autosave_every_label = self.i18n.tr("prefs-autosave-every");
        let custom_label = self.i18n.tr("prefs-custom");
        let colors_label = self.i18n.tr("prefs-colors");
        let font_label = self.i18n.tr("prefs-font");
        let geometry_label = self.i18n.tr("prefs-geometry");
        let save_custom_label = self.i18n.tr("prefs-save-custom");
        let close_label = self.i18n.tr("prefs-close");
        let frame = dialog_frame(&ctx.style().visuals);

        let mut pick: Option<String> = None;
        let mut config_changed = false;
        let mut custom_changed = false;
        let mut save_custom = false;
        let mut close = false;

        {
            let current_theme_name = self.theme_name.clone();
            let Some(prefs) = self.prefs.as_mut() else { return };
            let config = &mut self.config;

            egui::Window::new(title)
                .frame(frame)
                .collapsible(false)
                .resizable(false)
                .default_width(340.0)
                .show(ctx, |ui| {
                    ui.label(theme_label);
                    ui.horizontal_wrapped(|ui| {
                        for name in &prefs.available {
                            let selected = *name == current_theme_name;
                            if ui.selectable_label(selected, name).clicked() && !selected {
                                pick = Some(name.clone());
                            }
                        }
                    });
                    ui.separator();

                    if ui.checkbox(&mut config.show_border, border_label).changed() {
                        config_changed = true;
                    }
                    if ui.checkbox(&mut config.autosave, autosave_label).changed() {
                        config_changed = true;
                    }
                    if config.autosave {
                        ui.horizontal(|ui| {
                            ui.label(autosave_every_label);
                            if ui
                                .add(
                                    egui::DragValue::new(&mut config.autosave_interval_mins)
                                        .clamp_range(1..=60),
                                )
                                .changed()
                            {
                                config_changed = true;
                            }
                        });
                    }
                    ui.separator();

                    ui.collapsing(custom_label, |ui| {
                        ui.label(colors_label);
                        for (key, value) in prefs.color_edits.iter_mut() {
                            ui.horizontal(|ui| {
                                ui.label(key.as_str());
                                if ui.text_edit_singleline(value).changed() {
                                    if let Some(color) = parse_color(value) {
                                        prefs.custom.set_color(key, color);
                                        custom_changed = true;
                                    }
                                }
                            });
                        }
                        ui.add_space(4.0);
                        ui.label(font_label);
                        ui.horizontal(|ui| {
                            if ui.text_edit_singleline(&mut prefs.font_edit).changed() {
                                prefs.custom.set("font", prefs.font_edit.clone());
                                custom_changed = true;
                            }
                            if ui
                                .add(
                                    egui::DragValue::new(&mut prefs.font_size)
                                        .clamp_range(8.0..=48.0),
                                )
                                .changed()
                            {
                                prefs.custom.set("fontsize", format!("{}", prefs.font_size));
                                custom_changed = true;
                            }
                        });
                        ui.add_space(4.0);
                        ui.label(geometry_label);
                        if ui
                            .add(egui::Slider::new(&mut prefs.width, 0.2..=1.0).text("width"))
                            .changed()
                        {
                            prefs.custom.set("width", format!("{:.2}", prefs.width));
                            custom_changed = true;
                        }
                        if ui
                            .add(egui::Slider::new(&mut prefs.height, 0.2..=1.0).text("height"))
                            .changed()
                        {
                            prefs.custom.set("height", format!("{:.2}", prefs.height));
                            custom_changed = true;
                        }
                        if ui
                            .add(egui::Slider::new(&mut prefs.padding, 0.0..=40.0).text("padding"))
                            .changed()
                        {
                            prefs.custom.set("padding", format!("{:.0}", prefs.padding));
                            custom_changed = true;
                        }
                        ui.add_space(4.0);
                        if ui.button(save_custom_label).clicked() {
                            save_custom = true;
                        }
                    });

                    ui.separator();
                    ui.vertical_centered(|ui| {
                        if ui.button(close_label).clicked() {
                            close = true;
                        }
                    });
                });
        }

        if let Some(name) = pick {
            self.pick_theme(&name, ctx);
        }
        if config_changed {
            self.save_config();
        }
        if custom_changed {
            self.style_mode = StyleMode::Custom;
            self.style_dirty = true;
        }
        if save_custom {
            self.save_custom_theme(ctx);
        }
        if close {
            self.close_prefs(ctx);
        }
    }

    /// Switch to a named theme: load, apply, remember in the config.
    fn pick_theme(&mut self, name: &str, ctx: &Context) {
        match Theme::load(name) {
            Ok(theme) => {
                self.theme = theme;
                self.theme_name = name.to_string();
                self.config.theme = name.to_string();
                self.style_mode = StyleMode::Normal;
                self.apply_style(ctx);
                self.save_config();
                let msg = self.tr_name("status-theme", name);
                self.flash(msg);
            }
            Err(e) => {
                eprintln!("{}", e);
                let msg = self.tr_name("theme-not-found", name);
                self.flash(msg);
            }
        }
    }

    /// Persist the custom theme to the user themes dir and make it the
    /// active theme.
    fn save_custom_theme(&mut self, ctx: &Context) {
        let Some(prefs) = self.prefs.as_ref() else { return };
        let custom = prefs.custom.clone();
        match custom.save("custom") {
            Ok(_) => {
                self.config.custom = custom
                    .entries()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect();
                self.config.theme = "custom".to_string();
                self.theme = custom;
                self.theme_name = "custom".to_string();
                self.style_mode = StyleMode::Normal;
                self.apply_style(ctx);
                self.save_config();
                if let Some(prefs) = self.prefs.as_mut() {
                    prefs.available = theme::available_themes();
                }
                let msg = self.tr_name("status-theme-saved", "custom");
                self.flash(msg);
            }
            Err(e) => {
                eprintln!("could not save theme: {}", e);
                let mut args = roomcore::i18n::FluentArgs::new();
                args.set("error", e.to_string());
                let msg = self.i18n.tr_with("status-save-failed", &args);
                self.flash(msg);
            }
        }
    }
}

fn shortcut_row(ui: &mut egui::Ui, shortcut: &str, description: &str) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(shortcut).monospace().strong());
        ui.add_space(20.0);
        ui.label(description);
    });
}
