//! Color parsing for theme files.
//!
//! Theme values use GDK-style color strings: `#rgb`, `#rrggbb`, or the
//! 16-bit-per-channel `#rrrrggggbbbb`, plus a few names that shipped
//! themes actually use.

use egui::Color32;

/// Named colors accepted in theme files.
const NAMED: &[(&str, Color32)] = &[
    ("white", Color32::from_rgb(255, 255, 255)),
    ("black", Color32::from_rgb(0, 0, 0)),
    ("gray", Color32::from_rgb(128, 128, 128)),
    ("grey", Color32::from_rgb(128, 128, 128)),
    ("red", Color32::from_rgb(255, 0, 0)),
    ("green", Color32::from_rgb(0, 128, 0)),
    ("blue", Color32::from_rgb(0, 0, 255)),
    ("yellow", Color32::from_rgb(255, 255, 0)),
];

/// Parse a theme color string. Returns `None` for anything malformed.
pub fn parse_color(s: &str) -> Option<Color32> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        return match hex.len() {
            // #rgb, each nibble doubled
            3 => {
                let r = u8::from_str_radix(&hex[0..1], 16).ok()?;
                let g = u8::from_str_radix(&hex[1..2], 16).ok()?;
                let b = u8::from_str_radix(&hex[2..3], 16).ok()?;
                Some(Color32::from_rgb(r * 17, g * 17, b * 17))
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Color32::from_rgb(r, g, b))
            }
            // #rrrrggggbbbb with 16 bits per channel, high byte kept
            12 => {
                let r = u16::from_str_radix(&hex[0..4], 16).ok()?;
                let g = u16::from_str_radix(&hex[4..8], 16).ok()?;
                let b = u16::from_str_radix(&hex[8..12], 16).ok()?;
                Some(Color32::from_rgb(
                    (r >> 8) as u8,
                    (g >> 8) as u8,
                    (b >> 8) as u8,
                ))
            }
            _ => None,
        };
    }
    let lower = s.to_ascii_lowercase();
    NAMED.iter().find(|(n, _)| *n == lower).map(|(_, c)| *c)
}

/// Serialize a color as `#rrggbb` (the form theme files are written with).
pub fn to_hex(color: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}

/// Linear interpolation between two values.
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Per-channel linear interpolation between two colors.
/// `t` is clamped to 0..=1; 0 yields `a`, 1 yields `b`.
pub fn lerp_color(a: Color32, b: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    Color32::from_rgb(
        lerp(a.r() as f32, b.r() as f32, t).round() as u8,
        lerp(a.g() as f32, b.g() as f32, t).round() as u8,
        lerp(a.b() as f32, b.b() as f32, t).round() as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rrggbb() {
        assert_eq!(parse_color("#336699"), Some(Color32::from_rgb(0x33, 0x66, 0x99)));
        assert_eq!(parse_color("  #FFFFFF "), Some(Color32::from_rgb(255, 255, 255)));
    }

    #[test]
    fn test_parse_short_and_long_forms() {
        assert_eq!(parse_color("#fff"), Some(Color32::from_rgb(255, 255, 255)));
        assert_eq!(parse_color("#abc"), Some(Color32::from_rgb(0xaa, 0xbb, 0xcc)));
        // 16-bit channels keep the high byte
        assert_eq!(
            parse_color("#ffff00000000"),
            Some(Color32::from_rgb(255, 0, 0))
        );
    }

    #[test]
    fn test_parse_named() {
        assert_eq!(parse_color("White"), Some(Color32::from_rgb(255, 255, 255)));
        assert_eq!(parse_color("black"), Some(Color32::from_rgb(0, 0, 0)));
    }

    #[test]
    fn test_parse_garbage() {
        assert_eq!(parse_color(""), None);
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("#zzzzzz"), None);
        assert_eq!(parse_color("chartreuse-ish"), None);
    }

    #[test]
    fn test_hex_round_trip() {
        let c = Color32::from_rgb(0x99, 0xbb, 0x44);
        assert_eq!(parse_color(&to_hex(c)), Some(c));
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = Color32::from_rgb(0, 0, 0);
        let b = Color32::from_rgb(200, 100, 50);
        assert_eq!(lerp_color(a, b, 0.0), a);
        assert_eq!(lerp_color(a, b, 1.0), b);
        assert_eq!(lerp_color(a, b, 0.5), Color32::from_rgb(100, 50, 25));
        // out-of-range factors clamp
        assert_eq!(lerp_color(a, b, -1.0), a);
        assert_eq!(lerp_color(a, b, 2.0), b);
    }
}
