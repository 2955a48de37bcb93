//! roomcore, the shared library for QuietRoom.

pub mod color;
pub mod fade;
pub mod i18n;
pub mod repaint;
pub mod storage;
pub mod theme;
pub mod widgets;

pub use fade::FadeLabel;
pub use repaint::RepaintController;
pub use theme::Theme;

/// Consume the cmd+plus/minus zoom chords before egui acts on them, so
/// the theme's font size stays in charge. Call at the start of
/// `update()`.
pub fn consume_special_keys(ctx: &egui::Context) {
    ctx.input_mut(|i| {
        i.events.retain(|event| {
            !matches!(
                event,
                egui::Event::Key { key, modifiers, .. }
                    if modifiers.command
                        && matches!(key, egui::Key::Plus | egui::Key::Minus | egui::Key::Equals)
            )
        });
    });
}
