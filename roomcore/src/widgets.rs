//! Dialog widgets that pick their colors up from the applied theme.

use egui::{Response, Ui, Widget};

/// Frame for dialog windows: theme background, 1px border-colored outline.
pub fn dialog_frame(visuals: &egui::Visuals) -> egui::Frame {
    egui::Frame::none()
        .fill(visuals.window_fill)
        .stroke(visuals.window_stroke)
        .inner_margin(egui::Margin::same(8.0))
}

/// File list row for the open/save dialogs. Selection uses the theme's
/// selection colors instead of a fixed palette.
pub struct FileListItem<'a> {
    name: &'a str,
    is_directory: bool,
    selected: bool,
}

impl<'a> FileListItem<'a> {
    pub fn new(name: &'a str, is_directory: bool) -> Self {
        Self {
            name,
            is_directory,
            selected: false,
        }
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }
}

impl<'a> Widget for FileListItem<'a> {
    fn ui(self, ui: &mut Ui) -> Response {
        let height = ui.spacing().interact_size.y;
        let (rect, response) = ui.allocate_exact_size(
            egui::vec2(ui.available_width(), height),
            egui::Sense::click(),
        );

        if ui.is_rect_visible(rect) {
            let visuals = ui.visuals().clone();
            let painter = ui.painter();

            let (bg, text_color) = if self.selected {
                (visuals.selection.bg_fill, visuals.selection.stroke.color)
            } else if response.hovered() {
                (visuals.faint_bg_color, visuals.widgets.hovered.fg_stroke.color)
            } else {
                (visuals.window_fill, visuals.widgets.noninteractive.fg_stroke.color)
            };
            painter.rect_filled(rect, 0.0, bg);

            let icon = if self.is_directory { "📁" } else { "📄" };
            painter.text(
                egui::pos2(rect.min.x + 4.0, rect.center().y),
                egui::Align2::LEFT_CENTER,
                icon,
                egui::FontId::proportional(12.0),
                text_color,
            );
            painter.text(
                egui::pos2(rect.min.x + 24.0, rect.center().y),
                egui::Align2::LEFT_CENTER,
                self.name,
                egui::FontId::proportional(12.0),
                text_color,
            );
        }

        response
    }
}
