//! The writing room.
//!
//! One fullscreen window: a centered text box sized as a fraction of the
//! screen, a double border in the theme's border color, and a status
//! label that fades out at the bottom. Everything else lives behind
//! keyboard shortcuts and the dialogs in `dialogs.rs`.

use crate::autosave;
use crate::buffer::BufferList;
use crate::config::Config;
use crate::dialogs::{FileDialogState, PrefsState};
use crate::scroll::RoomScroll;
use egui::{Context, Key, Rect, Stroke, TextStyle};
use roomcore::i18n::{FluentArgs, I18n};
use roomcore::storage;
use roomcore::theme::Theme;
use roomcore::{consume_special_keys, FadeLabel, RepaintController};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Points moved per ctrl+arrow scroll step.
const SCROLL_STEP: f32 = 40.0;

/// Which theme drives the style: the named theme from the config, or
/// the preferences dialog's in-progress custom theme (live preview).
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum StyleMode {
    Normal,
    Custom,
}

pub struct RoomApp {
    pub(crate) config: Config,
    pub(crate) i18n: I18n,
    /// The loaded named theme.
    pub(crate) theme: Theme,
    pub(crate) theme_name: String,
    pub(crate) style_mode: StyleMode,
    /// Re-run `apply_style` at the top of the next frame.
    pub(crate) style_dirty: bool,

    pub(crate) buffers: BufferList,
    status: FadeLabel,
    scroll: RoomScroll,
    repaint: RepaintController,

    pub(crate) file_dialog: Option<FileDialogState>,
    pub(crate) prefs: Option<PrefsState>,
    pub(crate) show_help: bool,
    pub(crate) show_close_dialog: bool,
    pub(crate) show_quit_dialog: bool,
    quit_confirmed: bool,

    last_autosave: Instant,
}

impl RoomApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        style_override: Option<String>,
        cli_lang: Option<String>,
        files: Vec<PathBuf>,
    ) -> Self {
        Self::with_context(&cc.egui_ctx, style_override, cli_lang, files)
    }

    fn with_context(
        ctx: &Context,
        style_override: Option<String>,
        cli_lang: Option<String>,
        files: Vec<PathBuf>,
    ) -> Self {
        let config = Config::load();
        let i18n = I18n::new(cli_lang, config.language.clone());

        let requested = style_override.unwrap_or_else(|| config.theme.clone());
        let (theme, theme_name, load_error) = match Theme::load(&requested) {
            Ok(theme) => (theme, requested, None),
            Err(e) => {
                eprintln!("{}", e);
                // Fall back to any theme we can find, or built-in defaults.
                let fallback = roomcore::theme::available_themes()
                    .into_iter()
                    .next()
                    .and_then(|name| Theme::load(&name).ok().map(|t| (t, name)));
                match fallback {
                    Some((t, name)) => (t, name, Some(requested)),
                    None => (Theme::default(), requested.clone(), Some(requested)),
                }
            }
        };

        let mut app = Self {
            config,
            i18n,
            theme,
            theme_name,
            style_mode: StyleMode::Normal,
            style_dirty: false,
            buffers: BufferList::new(),
            status: FadeLabel::new(),
            scroll: RoomScroll::default(),
            repaint: RepaintController::new(),
            file_dialog: None,
            prefs: None,
            show_help: false,
            show_close_dialog: false,
            show_quit_dialog: false,
            quit_confirmed: false,
            last_autosave: Instant::now(),
        };

        app.apply_style(ctx);

        let now = Instant::now();
        if let Some(missing) = load_error {
            app.status
                .set_text(app.tr_name("theme-not-found", &missing), now);
        } else {
            let mut args = FluentArgs::new();
            args.set("version", env!("CARGO_PKG_VERSION"));
            app.status
                .set_text(app.i18n.tr_with("status-welcome", &args), now);
        }

        for path in files {
            app.open_path(path);
        }

        app
    }

    // --- small helpers ------------------------------------------------

    pub(crate) fn flash(&mut self, text: String) {
        self.status.set_text(text, Instant::now());
    }

    pub(crate) fn tr_name(&self, key: &str, name: &str) -> String {
        let mut args = FluentArgs::new();
        args.set("name", name);
        self.i18n.tr_with(key, &args)
    }

    fn tr_error(&self, key: &str, error: &str) -> String {
        let mut args = FluentArgs::new();
        args.set("error", error);
        self.i18n.tr_with(key, &args)
    }

    pub(crate) fn buffer_title(&self) -> String {
        self.buffers
            .current()
            .title()
            .unwrap_or_else(|| self.i18n.tr("untitled"))
    }

    pub(crate) fn save_config(&self) {
        if let Err(e) = self.config.save() {
            eprintln!("could not save config: {}", e);
        }
    }

    /// Apply the active style (normal or custom preview) to the context
    /// and re-point the fade label at its colors.
    pub(crate) fn apply_style(&mut self, ctx: &Context) {
        let theme = match self.style_mode {
            StyleMode::Custom => self
                .prefs
                .as_ref()
                .map(|p| &p.custom)
                .unwrap_or(&self.theme),
            StyleMode::Normal => &self.theme,
        };
        theme.apply(ctx);
        self.status.set_colors(theme.foreground(), theme.background());
    }

    /// The theme currently driving the paint.
    pub(crate) fn active_theme(&self) -> &Theme {
        match self.style_mode {
            StyleMode::Custom => self
                .prefs
                .as_ref()
                .map(|p| &p.custom)
                .unwrap_or(&self.theme),
            StyleMode::Normal => &self.theme,
        }
    }

    // --- buffer operations --------------------------------------------

    fn announce_buffer(&mut self) {
        let title = self.buffer_title();
        let marker = if self.buffers.current().modified { "*" } else { "" };
        let mut args = FluentArgs::new();
        args.set("num", self.buffers.position());
        args.set("total", self.buffers.len());
        args.set("title", format!("{}{}", title, marker));
        let msg = self.i18n.tr_with("status-buffer", &args);
        self.flash(msg);
    }

    fn new_buffer(&mut self) {
        self.buffers.new_buffer();
        self.scroll = RoomScroll::default();
        self.announce_buffer();
    }

    pub(crate) fn open_path(&mut self, path: PathBuf) {
        match self.buffers.open(path.clone()) {
            Ok(()) => {
                self.scroll = RoomScroll::default();
                let msg = self.tr_name("status-opened", &self.buffer_title());
                self.flash(msg);
            }
            Err(e) => {
                eprintln!("could not open {}: {}", path.display(), e);
                let msg = self.tr_error("status-open-failed", &e.to_string());
                self.flash(msg);
            }
        }
    }

    pub(crate) fn save_current(&mut self) {
        if self.buffers.current().path.is_none() {
            self.show_save_dialog();
            return;
        }
        match self.buffers.current_mut().save() {
            Ok(()) => {
                autosave::remove_snapshot(&storage::autosave_dir(), self.buffers.current());
                let msg = self.i18n.tr("status-saved");
                self.flash(msg);
            }
            Err(e) => {
                let msg = self.tr_error("status-save-failed", &e.to_string());
                self.flash(msg);
            }
        }
    }

    pub(crate) fn save_current_as(&mut self, path: PathBuf) {
        match self.buffers.current_mut().save_as(path) {
            Ok(()) => {
                autosave::remove_snapshot(&storage::autosave_dir(), self.buffers.current());
                let msg = self.tr_name("status-saved-as", &self.buffer_title());
                self.flash(msg);
            }
            Err(e) => {
                let msg = self.tr_error("status-save-failed", &e.to_string());
                self.flash(msg);
            }
        }
    }

    /// Ctrl+W. A modified buffer gets the confirmation dialog first.
    fn close_buffer(&mut self) {
        if self.buffers.current().modified {
            self.show_close_dialog = true;
            return;
        }
        self.finish_close_buffer();
    }

    pub(crate) fn finish_close_buffer(&mut self) {
        self.show_close_dialog = false;
        self.buffers.close_current();
        self.scroll = RoomScroll::default();
        let msg = self.i18n.tr("status-closed");
        self.flash(msg);
    }

    fn cycle_buffer(&mut self, forward: bool) {
        if forward {
            self.buffers.next();
        } else {
            self.buffers.prev();
        }
        self.scroll = RoomScroll::default();
        self.announce_buffer();
    }

    fn show_open_dialog(&mut self) {
        self.file_dialog = Some(FileDialogState::open(storage::documents_dir()));
    }

    fn show_save_dialog(&mut self) {
        let suggested = self
            .buffers
            .current()
            .title()
            .unwrap_or_else(|| format!("{}.txt", self.i18n.tr("untitled")));
        self.file_dialog = Some(FileDialogState::save(storage::documents_dir(), suggested));
    }

    fn toggle_prefs(&mut self, ctx: &Context) {
        if self.prefs.is_some() {
            self.close_prefs(ctx);
        } else {
            self.prefs = Some(PrefsState::new(&self.theme, &self.config));
        }
    }

    pub(crate) fn close_prefs(&mut self, ctx: &Context) {
        self.prefs = None;
        if self.style_mode == StyleMode::Custom {
            self.style_mode = StyleMode::Normal;
            self.apply_style(ctx);
        }
    }

    /// Save every modified buffer that has a path; unnamed modified
    /// buffers fall through to the save dialog.
    fn save_all(&mut self) -> bool {
        let mut all_saved = true;
        for buffer in self.buffers.iter_mut() {
            if !buffer.modified {
                continue;
            }
            if buffer.path.is_none() {
                all_saved = false;
                continue;
            }
            if let Err(e) = buffer.save() {
                eprintln!("could not save: {}", e);
                all_saved = false;
            }
        }
        all_saved
    }

    pub(crate) fn request_quit(&mut self, ctx: &Context) {
        if self.buffers.any_modified() {
            self.show_quit_dialog = true;
        } else {
            self.quit_confirmed = true;
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }

    pub(crate) fn quit_discarding(&mut self, ctx: &Context) {
        self.quit_confirmed = true;
        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
    }

    pub(crate) fn quit_saving(&mut self, ctx: &Context) {
        if self.save_all() {
            self.quit_confirmed = true;
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        } else {
            // Something needs a filename; surface the dialog instead.
            self.show_quit_dialog = false;
            self.show_save_dialog();
        }
    }

    // --- keyboard -----------------------------------------------------

    /// Intercept the ctrl chords before `TextEdit` sees them. Everything
    /// else (typing, arrows, clipboard) stays with the text widget.
    fn handle_keyboard(&mut self, ctx: &Context) {
        consume_special_keys(ctx);

        let mut actions: Vec<Box<dyn FnOnce(&mut Self, &Context)>> = Vec::new();

        ctx.input_mut(|i| {
            let events = std::mem::take(&mut i.events);
            let mut remaining = Vec::new();

            for event in events {
                let mut handled = false;
                if let egui::Event::Key {
                    key,
                    pressed: true,
                    modifiers,
                    ..
                } = &event
                {
                    if modifiers.command {
                        let shift = modifiers.shift;
                        handled = true;
                        match key {
                            Key::N => actions.push(Box::new(|s, _| s.new_buffer())),
                            Key::O => actions.push(Box::new(|s, _| s.show_open_dialog())),
                            Key::S if shift => actions.push(Box::new(|s, _| s.show_save_dialog())),
                            Key::S => actions.push(Box::new(|s, _| s.save_current())),
                            Key::W => actions.push(Box::new(|s, _| s.close_buffer())),
                            Key::PageUp => actions.push(Box::new(|s, _| s.cycle_buffer(false))),
                            Key::PageDown => actions.push(Box::new(|s, _| s.cycle_buffer(true))),
                            Key::ArrowUp => {
                                actions.push(Box::new(|s, _| s.scroll.scroll_up(SCROLL_STEP)))
                            }
                            Key::ArrowDown => {
                                actions.push(Box::new(|s, _| s.scroll.scroll_down(SCROLL_STEP)))
                            }
                            Key::P => actions.push(Box::new(|s, ctx| s.toggle_prefs(ctx))),
                            Key::H => actions.push(Box::new(|s, _| s.show_help = !s.show_help)),
                            Key::Q => actions.push(Box::new(|s, ctx| s.request_quit(ctx))),
                            _ => handled = false,
                        }
                    }
                }
                if !handled {
                    remaining.push(event);
                }
            }
            i.events = remaining;
        });

        for action in actions {
            action(self, ctx);
        }
    }

    // --- autosave -----------------------------------------------------

    fn autosave_interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.config.autosave_interval_mins.max(1)) * 60)
    }

    fn run_autosave(&mut self, now: Instant) {
        if !self.config.autosave {
            return;
        }
        let interval = self.autosave_interval();
        if now.saturating_duration_since(self.last_autosave) >= interval {
            autosave::snapshot_modified(&storage::autosave_dir(), self.buffers.modified_buffers());
            self.last_autosave = now;
        }
        let remaining = interval.saturating_sub(now.saturating_duration_since(self.last_autosave));
        self.repaint.wake_in(remaining);
    }

    // --- rendering ----------------------------------------------------

    fn render_room(&mut self, ctx: &Context) {
        let theme_bg = self.active_theme().background();
        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(theme_bg))
            .show(ctx, |ui| {
                let screen = ctx.screen_rect();
                let theme = self.active_theme();
                let room = centered_room(screen, theme.width_fraction(), theme.height_fraction());

                let status_height = ui.text_style_height(&TextStyle::Body) + 8.0;
                let text_outer = Rect::from_min_max(
                    room.min,
                    egui::pos2(room.max.x, room.max.y - status_height),
                );

                let border_color = theme.border();
                let textbox_bg = theme.textbox_bg();
                let foreground = theme.foreground();
                let font_size = theme.font_size();
                let family = if theme.wants_monospace() {
                    egui::FontFamily::Monospace
                } else {
                    egui::FontFamily::Proportional
                };
                let padding = theme.padding();

                // Double 1px border (the boxout/boxin pair); both collapse
                // when the border is switched off.
                let border_width = if self.config.show_border { 2.0 } else { 0.0 };
                let painter = ui.painter();
                painter.rect_filled(text_outer, 0.0, textbox_bg);
                if self.config.show_border {
                    painter.rect_stroke(text_outer, 0.0, Stroke::new(1.0, border_color));
                    painter.rect_stroke(text_outer.shrink(1.0), 0.0, Stroke::new(1.0, border_color));
                }

                let text_inner = text_outer.shrink(border_width + padding);

                // Wheel scrolling is ours: no scrollbars, clamped steps
                // against last frame's extents.
                self.scroll.apply_wheel(ctx.input(|i| i.raw_scroll_delta.y));

                // The scroll area's own wheel handling stays off; the
                // clamped offset above is the only scroll path.
                let mut scroll_area = egui::ScrollArea::vertical()
                    .id_source("room-text")
                    .scroll_bar_visibility(egui::scroll_area::ScrollBarVisibility::AlwaysHidden)
                    .enable_scrolling(false)
                    .auto_shrink([false, false]);
                if self.scroll.take_moved() {
                    scroll_area = scroll_area.vertical_scroll_offset(self.scroll.offset());
                }

                let mut changed = false;
                let output = ui
                    .allocate_ui_at_rect(text_inner, |ui| {
                        let available = ui.available_size();
                        scroll_area.show(ui, |ui| {
                            let buffer = self.buffers.current_mut();
                            let response = ui.add(
                                egui::TextEdit::multiline(&mut buffer.text)
                                    .font(egui::FontId::new(font_size, family))
                                    .text_color(foreground)
                                    .desired_width(available.x)
                                    .desired_rows((available.y / font_size.max(1.0)) as usize)
                                    .frame(false),
                            );
                            if response.changed() {
                                changed = true;
                            }
                        })
                    })
                    .inner;
                if changed {
                    self.buffers.current_mut().modified = true;
                }

                // Track where the scroll actually ended up (the TextEdit
                // auto-scrolls to keep the cursor visible) and re-clamp.
                self.scroll.sync(
                    output.state.offset.y,
                    output.content_size.y,
                    output.inner_rect.height(),
                );

                // Status line, bottom-left of the room.
                let now = Instant::now();
                let color = self.status.color_at(now);
                if !self.status.message().is_empty() {
                    ui.painter().text(
                        egui::pos2(room.min.x + 4.0, room.max.y - status_height / 2.0),
                        egui::Align2::LEFT_CENTER,
                        self.status.message(),
                        egui::FontId::new(font_size * 0.9, egui::FontFamily::Proportional),
                        color,
                    );
                }
            });
    }
}

/// The writing box: `width_fraction` x `height_fraction` of the screen,
/// centered both ways.
pub(crate) fn centered_room(screen: Rect, width_fraction: f32, height_fraction: f32) -> Rect {
    let size = egui::vec2(
        screen.width() * width_fraction,
        screen.height() * height_fraction,
    );
    let min = egui::pos2(
        screen.min.x + (screen.width() - size.x) / 2.0,
        screen.min.y + (screen.height() - size.y) / 2.0,
    );
    Rect::from_min_size(min, size)
}

impl eframe::App for RoomApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.repaint.begin_frame();

        if self.style_dirty {
            self.apply_style(ctx);
            self.style_dirty = false;
        }

        self.handle_keyboard(ctx);

        // Files dropped onto the window open like command-line arguments.
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });
        for path in dropped {
            self.open_path(path);
        }

        let now = Instant::now();
        self.run_autosave(now);

        self.render_room(ctx);

        if self.file_dialog.is_some() {
            self.render_file_dialog(ctx);
        }
        if self.show_close_dialog {
            self.render_close_dialog(ctx);
        }
        if self.show_quit_dialog {
            self.render_quit_dialog(ctx);
        }
        if self.show_help {
            self.render_help(ctx);
        }
        if self.prefs.is_some() {
            self.render_prefs(ctx);
        }

        // Window close with unsaved work turns into the quit dialog.
        if ctx.input(|i| i.viewport().close_requested())
            && self.buffers.any_modified()
            && !self.quit_confirmed
        {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            self.show_quit_dialog = true;
        }

        if let Some(delay) = self.status.next_wake(now) {
            self.repaint.wake_in(delay);
        }

        self.repaint.end_frame(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_room_is_centered() {
        let screen = Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(1000.0, 800.0));
        let room = centered_room(screen, 0.6, 0.95);
        assert_eq!(room.width(), 600.0);
        assert_eq!(room.height(), 760.0);
        assert_eq!(room.min.x, 200.0);
        assert_eq!(room.min.y, 20.0);
        // symmetric margins
        assert_eq!(screen.max.x - room.max.x, room.min.x);
        assert_eq!(screen.max.y - room.max.y, room.min.y);
    }

    #[test]
    fn test_full_fractions_fill_the_screen() {
        let screen = Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(1280.0, 720.0));
        let room = centered_room(screen, 1.0, 1.0);
        assert_eq!(room, screen);
    }

    // The wiring of render_room: the scroll area's own wheel handling is
    // off, so a wheel event moves the clamped offset exactly once even
    // with the pointer hovering the area.
    #[test]
    fn test_wheel_scroll_applies_exactly_once() {
        let ctx = egui::Context::default();
        let mut scroll = RoomScroll::default();
        scroll.sync(0.0, 2000.0, 300.0);

        let mut input = egui::RawInput::default();
        input.screen_rect = Some(Rect::from_min_size(
            egui::pos2(0.0, 0.0),
            egui::vec2(400.0, 300.0),
        ));
        input.events.push(egui::Event::PointerMoved(egui::pos2(200.0, 150.0)));
        input.events.push(egui::Event::Scroll(egui::vec2(0.0, -50.0)));

        let mut seen_offset = None;
        let _ = ctx.run(input, |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                scroll.apply_wheel(ctx.input(|i| i.raw_scroll_delta.y));
                let mut area = egui::ScrollArea::vertical()
                    .id_source("room-text")
                    .scroll_bar_visibility(egui::scroll_area::ScrollBarVisibility::AlwaysHidden)
                    .enable_scrolling(false)
                    .auto_shrink([false, false]);
                if scroll.take_moved() {
                    area = area.vertical_scroll_offset(scroll.offset());
                }
                let output = area.show(ui, |ui| {
                    ui.allocate_space(egui::vec2(100.0, 2000.0));
                });
                seen_offset = Some(output.state.offset.y);
            });
        });

        assert_eq!(seen_offset, Some(50.0));
    }

    #[test]
    fn test_closing_a_modified_buffer_asks_first() {
        let ctx = egui::Context::default();
        let mut app = RoomApp::with_context(&ctx, None, None, Vec::new());
        app.buffers.current_mut().text = "draft".to_string();
        app.buffers.current_mut().modified = true;

        app.close_buffer();
        assert!(app.show_close_dialog);
        assert_eq!(app.buffers.current().text, "draft");

        // discard path
        app.finish_close_buffer();
        assert!(!app.show_close_dialog);
        assert!(app.buffers.current().text.is_empty());
    }

    #[test]
    fn test_closing_a_clean_buffer_is_immediate() {
        let ctx = egui::Context::default();
        let mut app = RoomApp::with_context(&ctx, None, None, Vec::new());
        app.buffers.current_mut().text = "kept".to_string();

        app.close_buffer();
        assert!(!app.show_close_dialog);
        assert!(app.buffers.current().text.is_empty());
    }
}
