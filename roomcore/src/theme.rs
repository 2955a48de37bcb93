//! Theme engine for QuietRoom.
//!
//! A theme is a named bundle of style strings (colors, font, geometry)
//! read from an INI-like `.theme` file with a single `[theme]` section.
//! Lookup order is user dir, system dir, then the bundled directories
//! next to the executable. Saving always writes to the user dir.

use crate::color::{parse_color, to_hex};
use crate::storage::{self, Result, StorageError};
use egui::{
    Color32, FontData, FontDefinitions, FontFamily, FontId, Rounding, Stroke, Style, TextStyle,
    Visuals,
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// The style keys a complete theme carries, in the order they are
/// written out.
pub const THEME_KEYS: &[&str] = &[
    "background",
    "foreground",
    "textboxbg",
    "border",
    "font",
    "fontsize",
    "width",
    "height",
    "padding",
];

const FILE_EXTENSION: &str = "theme";

/// A loaded theme: style-key to string value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Theme {
    values: BTreeMap<String, String>,
}

impl Theme {
    /// Load a theme by name, searching user, system, then bundled dirs.
    pub fn load(name: &str) -> Result<Self> {
        Self::load_from_dirs(name, &storage::theme_search_dirs())
    }

    /// Load a theme by name from an explicit list of directories.
    /// The first directory containing `<name>.theme` wins.
    pub fn load_from_dirs(name: &str, dirs: &[PathBuf]) -> Result<Self> {
        let path = lookup_theme(name, dirs)
            .ok_or_else(|| StorageError::ThemeNotFound(name.to_string()))?;
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_ini(&text))
    }

    /// Parse theme text. Only `key = value` pairs inside the `[theme]`
    /// section count; `;` and `#` lines are comments.
    pub fn from_ini(text: &str) -> Self {
        let mut values = BTreeMap::new();
        let mut in_theme_section = false;
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }
            if let Some(section) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                in_theme_section = section.trim().eq_ignore_ascii_case("theme");
                continue;
            }
            if !in_theme_section {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                values.insert(key.trim().to_lowercase(), value.trim().to_string());
            }
        }
        Self { values }
    }

    /// Build a theme from raw key/value pairs (the preferences dialog's
    /// custom style editor goes through this).
    pub fn from_values(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            values: pairs.into_iter().collect(),
        }
    }

    /// Serialize in `.theme` form: `[theme]` header, the well-known keys
    /// in order, then any extra keys alphabetically.
    pub fn to_ini(&self) -> String {
        let mut out = String::from("[theme]\n");
        for key in THEME_KEYS {
            if let Some(value) = self.values.get(*key) {
                out.push_str(&format!("{} = {}\n", key, value));
            }
        }
        for (key, value) in &self.values {
            if !THEME_KEYS.contains(&key.as_str()) {
                out.push_str(&format!("{} = {}\n", key, value));
            }
        }
        out
    }

    /// Save under the given name in the user themes directory.
    pub fn save(&self, name: &str) -> Result<PathBuf> {
        self.save_to_dir(name, &storage::user_themes_dir())
    }

    /// Save `<name>.theme` into a specific directory, creating it.
    pub fn save_to_dir(&self, name: &str, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.{}", name, FILE_EXTENSION));
        std::fs::write(&path, self.to_ini())?;
        Ok(path)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_lowercase(), value.into());
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|s| s.as_str())
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn color_or(&self, key: &str, fallback: Color32) -> Color32 {
        self.get(key).and_then(parse_color).unwrap_or(fallback)
    }

    // Typed accessors. Malformed or missing values fall back to a usable
    // default rather than aborting a paint.

    pub fn background(&self) -> Color32 {
        self.color_or("background", Color32::from_rgb(0, 0, 0))
    }

    pub fn foreground(&self) -> Color32 {
        self.color_or("foreground", Color32::from_rgb(221, 221, 221))
    }

    pub fn textbox_bg(&self) -> Color32 {
        self.color_or("textboxbg", self.background())
    }

    pub fn border(&self) -> Color32 {
        self.color_or("border", self.foreground())
    }

    pub fn font(&self) -> &str {
        self.get("font").unwrap_or("sans")
    }

    pub fn font_size(&self) -> f32 {
        self.get("fontsize")
            .and_then(|v| v.parse::<f32>().ok())
            .filter(|v| *v > 0.0)
            .unwrap_or(12.0)
    }

    /// Width of the writing box as a fraction of the screen, in (0, 1].
    pub fn width_fraction(&self) -> f32 {
        self.fraction_or("width", 0.6)
    }

    /// Height of the writing box as a fraction of the screen, in (0, 1].
    pub fn height_fraction(&self) -> f32 {
        self.fraction_or("height", 0.95)
    }

    fn fraction_or(&self, key: &str, fallback: f32) -> f32 {
        self.get(key)
            .and_then(|v| v.parse::<f32>().ok())
            .filter(|v| *v > 0.0)
            .map(|v| v.min(1.0))
            .unwrap_or(fallback)
    }

    /// Inner padding around the text view, in points.
    pub fn padding(&self) -> f32 {
        self.get("padding")
            .and_then(|v| v.parse::<f32>().ok())
            .filter(|v| *v >= 0.0)
            .unwrap_or(6.0)
    }

    /// Whether the theme's font asks for the monospace family.
    pub fn wants_monospace(&self) -> bool {
        self.font().to_lowercase().contains("mono")
    }

    /// Update a color value, stored as `#rrggbb`.
    pub fn set_color(&mut self, key: &str, color: Color32) {
        self.set(key, to_hex(color));
    }

    /// Apply the theme to an egui context: fonts, text styles, visuals.
    pub fn apply(&self, ctx: &egui::Context) {
        let mut fonts = FontDefinitions::default();
        let family = if self.wants_monospace() {
            FontFamily::Monospace
        } else {
            FontFamily::Proportional
        };
        // A matching font file on disk takes precedence over egui's
        // built-ins; a bare family word like "sans" just picks the family.
        if let Some(data) = load_font_data(self.font()) {
            fonts
                .font_data
                .insert("theme-font".to_owned(), FontData::from_owned(data));
            fonts
                .families
                .entry(family.clone())
                .or_default()
                .insert(0, "theme-font".to_owned());
        }
        ctx.set_fonts(fonts);

        let size = self.font_size();
        let mut style = Style::default();
        style.text_styles = [
            (TextStyle::Small, FontId::new((size * 0.8).max(8.0), family.clone())),
            (TextStyle::Body, FontId::new(size, family.clone())),
            (TextStyle::Button, FontId::new(size, family.clone())),
            (TextStyle::Heading, FontId::new(size * 1.5, family.clone())),
            (TextStyle::Monospace, FontId::new(size, FontFamily::Monospace)),
        ]
        .into();

        let background = self.background();
        let foreground = self.foreground();
        let textbox_bg = self.textbox_bg();

        let mut visuals = if is_dark(background) {
            Visuals::dark()
        } else {
            Visuals::light()
        };
        visuals.window_fill = background;
        visuals.panel_fill = background;
        visuals.faint_bg_color = textbox_bg;
        visuals.extreme_bg_color = textbox_bg;
        visuals.window_rounding = Rounding::ZERO;
        visuals.menu_rounding = Rounding::ZERO;
        visuals.window_stroke = Stroke::new(1.0, self.border());
        visuals.window_shadow = egui::epaint::Shadow::NONE;
        visuals.popup_shadow = egui::epaint::Shadow::NONE;

        // Selection swaps the text colors.
        visuals.selection.bg_fill = foreground;
        visuals.selection.stroke = Stroke::new(1.0, textbox_bg);
        visuals.text_cursor = Stroke::new(2.0, foreground);

        let themed = |ws: &mut egui::style::WidgetVisuals| {
            ws.bg_fill = background;
            ws.weak_bg_fill = background;
            ws.bg_stroke = Stroke::new(1.0, self.border());
            ws.fg_stroke = Stroke::new(1.0, foreground);
            ws.rounding = Rounding::ZERO;
        };
        themed(&mut visuals.widgets.noninteractive);
        themed(&mut visuals.widgets.inactive);
        themed(&mut visuals.widgets.hovered);
        themed(&mut visuals.widgets.active);
        themed(&mut visuals.widgets.open);
        visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, foreground);

        style.visuals = visuals;
        style.spacing.item_spacing = egui::vec2(4.0, 4.0);
        style.spacing.button_padding = egui::vec2(8.0, 4.0);
        ctx.set_style(style);
    }
}

/// Perceived-luminance check used to pick the base visuals.
fn is_dark(color: Color32) -> bool {
    let l = 0.299 * color.r() as f32 + 0.587 * color.g() as f32 + 0.114 * color.b() as f32;
    l < 128.0
}

/// Find `<name>.theme` in the given directories, first hit wins.
fn lookup_theme(name: &str, dirs: &[PathBuf]) -> Option<PathBuf> {
    for dir in dirs {
        let path = dir.join(format!("{}.{}", name, FILE_EXTENSION));
        if path.is_file() {
            return Some(path);
        }
    }
    None
}

/// Load a font file matching the theme's font name from disk (searched
/// relative to the exe and standard paths).
fn load_font_data(font_name: &str) -> Option<Vec<u8>> {
    let stem = font_name.trim();
    if stem.is_empty() || stem.eq_ignore_ascii_case("sans") || stem.eq_ignore_ascii_case("mono") {
        return None;
    }
    let mut search_paths = Vec::new();
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            search_paths.push(dir.join("fonts"));
            search_paths.push(dir.to_path_buf());
            if let Some(parent) = dir.parent() {
                if let Some(grandparent) = parent.parent() {
                    search_paths.push(grandparent.join("fonts"));
                }
            }
        }
    }
    search_paths.push(PathBuf::from("/usr/share/quietroom/fonts"));
    search_paths.push(PathBuf::from("/usr/share/fonts"));

    for dir in search_paths {
        for ext in ["ttf", "otf"] {
            let path = dir.join(format!("{}.{}", stem, ext));
            if let Ok(data) = std::fs::read(&path) {
                return Some(data);
            }
        }
    }
    None
}

/// Names of every theme reachable through the search path, deduplicated
/// (earlier directories shadow later ones) and sorted.
pub fn available_themes() -> Vec<String> {
    themes_in_dirs(&storage::theme_search_dirs())
}

pub fn themes_in_dirs(dirs: &[PathBuf]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for dir in dirs {
        let Ok(read_dir) = std::fs::read_dir(dir) else {
            continue;
        };
        for entry in read_dir.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(FILE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if !names.iter().any(|n| n == stem) {
                    names.push(stem.to_string());
                }
            }
        }
    }
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREEN: &str = "\
[theme]
background = #000000
foreground = #007700
textboxbg = #000000
border = #003300
font = mono
fontsize = 14
width = 0.6
height = 0.95
padding = 6
";

    #[test]
    fn test_parse_theme_section_only() {
        let text = "\
; a comment
[general]
foreground = #123456
[theme]
foreground = #007700
# another comment
fontsize = 14
";
        let theme = Theme::from_ini(text);
        assert_eq!(theme.get("foreground"), Some("#007700"));
        assert_eq!(theme.font_size(), 14.0);
    }

    #[test]
    fn test_accessor_fallbacks() {
        let theme = Theme::from_ini("[theme]\nfontsize = banana\nwidth = -2\n");
        assert_eq!(theme.font_size(), 12.0);
        assert_eq!(theme.width_fraction(), 0.6);
        assert_eq!(theme.background(), Color32::from_rgb(0, 0, 0));
        // textboxbg falls back to background, border to foreground
        assert_eq!(theme.textbox_bg(), theme.background());
        assert_eq!(theme.border(), theme.foreground());
    }

    #[test]
    fn test_fraction_clamps_to_one() {
        let theme = Theme::from_ini("[theme]\nwidth = 1.8\nheight = 0.5\n");
        assert_eq!(theme.width_fraction(), 1.0);
        assert_eq!(theme.height_fraction(), 0.5);
    }

    #[test]
    fn test_save_round_trips_all_keys() {
        let tmp = tempfile::tempdir().unwrap();
        let theme = Theme::from_ini(GREEN);
        theme.save_to_dir("green", tmp.path()).unwrap();

        let reloaded = Theme::load_from_dirs("green", &[tmp.path().to_path_buf()]).unwrap();
        assert_eq!(theme, reloaded);
        for key in THEME_KEYS {
            assert_eq!(theme.get(key), reloaded.get(key), "key {}", key);
        }
    }

    #[test]
    fn test_lookup_order_prefers_earlier_dir() {
        let user = tempfile::tempdir().unwrap();
        let system = tempfile::tempdir().unwrap();
        let mut a = Theme::from_ini(GREEN);
        a.set("fontsize", "20");
        a.save_to_dir("green", user.path()).unwrap();
        Theme::from_ini(GREEN).save_to_dir("green", system.path()).unwrap();

        let dirs = vec![user.path().to_path_buf(), system.path().to_path_buf()];
        let loaded = Theme::load_from_dirs("green", &dirs).unwrap();
        assert_eq!(loaded.font_size(), 20.0);
    }

    #[test]
    fn test_missing_theme_is_a_domain_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = Theme::load_from_dirs("nope", &[tmp.path().to_path_buf()]).unwrap_err();
        assert!(matches!(err, StorageError::ThemeNotFound(ref n) if n == "nope"));
    }

    #[test]
    fn test_themes_in_dirs_dedups_and_sorts() {
        let user = tempfile::tempdir().unwrap();
        let system = tempfile::tempdir().unwrap();
        Theme::from_ini(GREEN).save_to_dir("green", user.path()).unwrap();
        Theme::from_ini(GREEN).save_to_dir("green", system.path()).unwrap();
        Theme::from_ini(GREEN).save_to_dir("amber", system.path()).unwrap();
        std::fs::write(system.path().join("notes.txt"), "not a theme").unwrap();

        let dirs = vec![user.path().to_path_buf(), system.path().to_path_buf()];
        assert_eq!(themes_in_dirs(&dirs), vec!["amber", "green"]);
    }

    #[test]
    fn test_apply_styles_the_context() {
        let ctx = egui::Context::default();
        let theme = Theme::from_ini(GREEN);
        theme.apply(&ctx);

        let visuals = ctx.style().visuals.clone();
        assert_eq!(visuals.text_cursor, Stroke::new(2.0, theme.foreground()));
        assert_eq!(visuals.panel_fill, theme.background());
        assert_eq!(visuals.extreme_bg_color, theme.textbox_bg());
        assert_eq!(visuals.selection.bg_fill, theme.foreground());
    }

    #[test]
    fn test_wants_monospace() {
        let mut theme = Theme::default();
        theme.set("font", "JetBrains Mono");
        assert!(theme.wants_monospace());
        theme.set("font", "sans");
        assert!(!theme.wants_monospace());
    }
}
