//! Localisation.
//!
//! Fluent bundles embedded from `assets/i18n/`, one `.ftl` per locale.
//! The locale is resolved from the CLI, then the config file, then the
//! OS, falling back to `en-US`.

use fluent_bundle::{FluentBundle, FluentResource};
pub use fluent_bundle::FluentArgs;
use rust_embed::RustEmbed;
use std::collections::HashMap;
use unic_langid::LanguageIdentifier;

#[derive(RustEmbed)]
#[folder = "assets/i18n/"]
struct Asset;

pub struct I18n {
    bundles: HashMap<LanguageIdentifier, FluentBundle<FluentResource>>,
    pub available_locales: Vec<LanguageIdentifier>,
    current_locale: LanguageIdentifier,
}

impl Default for I18n {
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl I18n {
    /// Load every embedded bundle and pick a locale. `cli_lang` comes
    /// from `--lang`, `config_lang` from the preferences file.
    pub fn new(cli_lang: Option<String>, config_lang: Option<String>) -> Self {
        let mut bundles = HashMap::new();
        let mut available_locales = Vec::new();

        for file in Asset::iter() {
            let filename = file.as_ref();
            let Some(locale_str) = filename.strip_suffix(".ftl") else {
                continue;
            };
            let Ok(locale) = locale_str.parse::<LanguageIdentifier>() else {
                continue;
            };
            let Some(content) = Asset::get(filename) else {
                continue;
            };
            let source = String::from_utf8_lossy(content.data.as_ref()).to_string();
            let Ok(res) = FluentResource::try_new(source) else {
                eprintln!("[i18n] skipping malformed bundle {}", filename);
                continue;
            };
            let mut bundle = FluentBundle::new(vec![locale.clone()]);
            // No Unicode isolation marks around placeables; these strings
            // go straight to the screen.
            bundle.set_use_isolating(false);
            if bundle.add_resource(res).is_ok() {
                bundles.insert(locale.clone(), bundle);
                available_locales.push(locale);
            }
        }

        let current_locale = resolve_locale(cli_lang, config_lang, &available_locales)
            .or_else(|| "en-US".parse().ok())
            .unwrap_or_default();

        Self {
            bundles,
            available_locales,
            current_locale,
        }
    }

    pub fn current_locale(&self) -> &LanguageIdentifier {
        &self.current_locale
    }

    pub fn set_locale(&mut self, locale: LanguageIdentifier) {
        if self.bundles.contains_key(&locale) {
            self.current_locale = locale;
        }
    }

    /// Translate a message with no arguments.
    pub fn tr(&self, key: &str) -> String {
        self.format(key, None)
    }

    /// Translate a message with Fluent arguments, e.g. the theme name in
    /// `theme-not-found`.
    pub fn tr_with(&self, key: &str, args: &FluentArgs) -> String {
        self.format(key, Some(args))
    }

    fn format(&self, key: &str, args: Option<&FluentArgs>) -> String {
        if let Some(bundle) = self.bundles.get(&self.current_locale) {
            if let Some(msg) = bundle.get_message(key) {
                if let Some(pattern) = msg.value() {
                    let mut errors = vec![];
                    let value = bundle.format_pattern(pattern, args, &mut errors);
                    if errors.is_empty() {
                        return value.to_string();
                    }
                }
            }
        }
        format!("MISSING: {}", key)
    }
}

/// Find a bundle for the requested tag: exact match first, then any
/// bundle sharing the language subtag (so "fr-FR" lands on "fr").
fn match_available(requested: &str, available: &[LanguageIdentifier]) -> Option<LanguageIdentifier> {
    let lang = requested.parse::<LanguageIdentifier>().ok()?;
    if available.contains(&lang) {
        return Some(lang);
    }
    available
        .iter()
        .find(|a| a.language == lang.language)
        .cloned()
}

fn resolve_locale(
    cli_lang: Option<String>,
    config_lang: Option<String>,
    available: &[LanguageIdentifier],
) -> Option<LanguageIdentifier> {
    // 1. CLI flag
    if let Some(lang) = cli_lang.and_then(|s| match_available(&s, available)) {
        return Some(lang);
    }

    // 2. Config file
    if let Some(lang) = config_lang.and_then(|s| match_available(&s, available)) {
        return Some(lang);
    }

    // 3. OS locale
    if let Some(lang) = sys_locale::get_locale().and_then(|s| match_available(&s, available)) {
        return Some(lang);
    }

    None
}
