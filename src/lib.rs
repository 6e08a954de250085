#![doc = include_str!("../README.md")]

//! # netif-console
//!
//! Client bootstrap for the netif monitor console, built on [Bevy](https://bevyengine.org/):
//!
//! - **Persisted locale**: the active display language survives restarts
//! - **Closed allow-list**: only `zh-CN` and `en-US` are accepted, anything else is ignored
//! - **Bundled translations**: `messages/` is compiled in by `build.rs`
//! - **Fallback**: keys missing in the active locale resolve from `zh-CN`
//! - **Bootstrap**: icon library, plugin components and a deferred icon re-scan
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bevy::prelude::*;
//! use netif_console::{ I18n, bootstrap::BootstrapPlugin };
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(BootstrapPlugin::default())
//!         .add_systems(Startup, setup_ui)
//!         .run();
//! }
//!
//! fn setup_ui(mut commands: Commands, i18n: Res<I18n>) {
//!     let text = i18n.translation("app");
//!
//!     commands.spawn((
//!         Text::new(text.t("netif.list")),
//!         Node::default(),
//!     ));
//! }
//! ```

use bevy::prelude::*;

pub mod bootstrap;
pub mod icons;
pub mod locale;
pub mod plugin_components;
pub mod storage;
pub mod store;

use std::collections::HashMap;
use serde_json::Value;
use regex::Regex;
use once_cell::sync::Lazy;

pub use locale::{ Locale, UnknownLocale };
pub use storage::{ FileStorage, LocaleStorage, MemoryStorage, StorageBackend, StorageError };
pub use store::{ LocaleStore, LOCALE_STORAGE_KEY };

/// Configuration for the translation engine and its locale store.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use netif_console::{ LocaleConfig, StorageBackend };
///
/// let config = LocaleConfig {
///     storage: StorageBackend::Memory(HashMap::new()),
///     ..Default::default()
/// };
/// assert_eq!(config.storage_key, "locale");
/// ```
#[derive(Debug, Clone, Resource)]
pub struct LocaleConfig {
    /// Whether to use bundled translations (true) or filesystem loading (false).
    /// Forced on for WASM targets and with the `bundle-only` feature.
    pub use_bundled_translations: bool,
    /// Folder holding `<locale>/<file>.json` bundles for filesystem loading.
    /// Default: "messages"
    pub messages_folder: String,
    /// Locale consulted when the active one lacks a key.
    /// Default: `zh-CN`
    pub fallback_locale: Locale,
    /// Durable storage key of the persisted locale.
    /// Default: "locale"
    pub storage_key: String,
    /// Where the persisted locale lives.
    pub storage: StorageBackend,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            use_bundled_translations: true,
            messages_folder: "messages".to_string(),
            fallback_locale: Locale::ZhCn,
            storage_key: LOCALE_STORAGE_KEY.to_string(),
            storage: StorageBackend::default(),
        }
    }
}

impl LocaleConfig {
    fn bundled(&self) -> bool {
        self.use_bundled_translations ||
            cfg!(target_arch = "wasm32") ||
            cfg!(feature = "bundle-only")
    }
}

// ---------- Bevy Plugin ----------

/// Injects the [`I18n`] resource so every system can read translations and
/// the active locale.
///
/// # Example
///
/// ```rust
/// use bevy::prelude::*;
/// use netif_console::{ I18nPlugin, LocaleConfig, Locale };
///
/// App::new().add_plugins(I18nPlugin::with_config(LocaleConfig {
///     fallback_locale: Locale::EnUs,
///     ..Default::default()
/// }));
/// ```
#[derive(Default)]
pub struct I18nPlugin {
    pub config: LocaleConfig,
}

impl I18nPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: LocaleConfig) -> Self {
        Self { config }
    }
}

impl Plugin for I18nPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config.clone()).init_resource::<I18n>();
    }
}

/// A value in a translation file: either text, or a group of texts addressed
/// with a dotted key.
///
/// ```json
/// "title": "Network Interface Monitor",
/// "netif": { "list": "Interfaces" }
/// ```
#[derive(Debug, Clone)]
pub enum SectionValue {
    Text(String),
    Map(HashMap<String, String>),
}

/// Translation keys to their values within a file.
type SectionMap = HashMap<String, SectionValue>;
/// File names to their section maps.
type FileMap = HashMap<String, SectionMap>;
/// Locale tags to file maps.
type LangMap = HashMap<String, FileMap>;

/// All loaded bundles, organized as `locales -> files -> keys -> values`.
#[derive(Debug)]
pub struct Translations {
    pub langs: LangMap,
}

/// Translation engine resource. Owns the bundles and the [`LocaleStore`].
///
/// # Example
///
/// ```rust
/// use bevy::prelude::*;
/// use netif_console::I18n;
///
/// fn switch_to_english(mut i18n: ResMut<I18n>) {
///     i18n.set_locale("en-US");
/// }
///
/// fn header(i18n: Res<I18n>) {
///     println!("[{}] {}", i18n.locale_value(), i18n.translation("app").t("title"));
/// }
/// ```
#[derive(Resource)]
pub struct I18n {
    translations: Translations,
    store: LocaleStore,
    fallback_locale: Locale,
}

impl FromWorld for I18n {
    fn from_world(world: &mut World) -> Self {
        let config = world.get_resource::<LocaleConfig>().cloned().unwrap_or_default();
        I18n::new(&config)
    }
}

// ---------- Loaders ----------

// Loading from filesystem (dev/desktop mode)
#[cfg(not(target_arch = "wasm32"))]
fn load_filesystem_translations(messages_folder: &str) -> Translations {
    match load_translation_from_fs(messages_folder) {
        Ok(langs) => Translations { langs },
        Err(e) => {
            warn!("Failed to load translations from '{}': {}", messages_folder, e);
            create_error_translations()
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn load_filesystem_translations(_messages_folder: &str) -> Translations {
    warn!("Filesystem loading not available on WASM, using bundled translations");
    load_bundled_translations()
}

fn load_bundled_translations() -> Translations {
    match load_bundled_data() {
        Ok(langs) => {
            if langs.is_empty() {
                load_filesystem_translations("messages")
            } else {
                Translations { langs }
            }
        }
        Err(e) => {
            warn!("Failed to load bundled translations: {}", e);
            create_error_translations()
        }
    }
}

// Generated by build.rs
fn load_bundled_data() -> Result<LangMap, serde_json::Error> {
    const BUNDLED_TRANSLATIONS: &str = include_str!(
        concat!(env!("OUT_DIR"), "/all_translations.json")
    );

    let value: Value = serde_json::from_str(BUNDLED_TRANSLATIONS)?;
    Ok(parse_translation_value(&value))
}

fn parse_translation_value(value: &Value) -> LangMap {
    let mut lang_map = HashMap::new();

    if let Some(langs_obj) = value.as_object() {
        for (locale_tag, files_value) in langs_obj {
            let mut file_map = HashMap::new();

            if let Some(files_obj) = files_value.as_object() {
                for (file_name, sections_value) in files_obj {
                    file_map.insert(file_name.clone(), parse_section_map(sections_value));
                }
            }
            lang_map.insert(locale_tag.clone(), file_map);
        }
    }

    lang_map
}

// Non-string leaves and deeper nesting are skipped
fn parse_section_map(sections_value: &Value) -> SectionMap {
    let mut section_map = HashMap::new();

    if let Some(sections_obj) = sections_value.as_object() {
        for (key, val) in sections_obj {
            let section_value = if let Some(text) = val.as_str() {
                SectionValue::Text(text.to_string())
            } else if let Some(nested) = val.as_object() {
                let nested_map = nested
                    .iter()
                    .filter_map(|(nested_key, nested_val)| {
                        nested_val.as_str().map(|s| (nested_key.clone(), s.to_string()))
                    })
                    .collect();
                SectionValue::Map(nested_map)
            } else {
                continue;
            };
            section_map.insert(key.clone(), section_value);
        }
    }

    section_map
}

#[cfg(not(target_arch = "wasm32"))]
fn load_translation_from_fs(messages_folder: &str) -> std::io::Result<LangMap> {
    use std::fs;
    use std::path::Path;

    let message_dir = Path::new(messages_folder);

    if !message_dir.exists() {
        return Err(
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} folder not found", messages_folder)
            )
        );
    }

    let mut lang_map = HashMap::new();

    for folder_entry in fs::read_dir(message_dir)? {
        let folder = folder_entry?;
        if !folder.file_type()?.is_dir() {
            continue;
        }
        let locale_tag = folder.file_name().to_string_lossy().to_string();
        let mut file_map = HashMap::new();

        for file_entry in fs::read_dir(folder.path())? {
            let path = file_entry?.path();

            if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("json") {
                let file_name = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("unknown")
                    .to_string();

                let content = fs::read_to_string(&path)?;
                let json: Value = serde_json
                    ::from_str(&content)
                    .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

                file_map.insert(file_name, parse_section_map(&json));
            }
        }

        lang_map.insert(locale_tag, file_map);
    }

    Ok(lang_map)
}

fn create_error_translations() -> Translations {
    let mut section_map = HashMap::new();
    section_map.insert("error".to_string(), SectionValue::Text("Translation Error".to_string()));

    let mut file_map = HashMap::new();
    file_map.insert("error".to_string(), section_map);

    let mut lang_map = HashMap::new();
    lang_map.insert(Locale::default().tag().to_string(), file_map);

    Translations { langs: lang_map }
}

// ---------- API ----------

/// Extension trait for switching the locale straight from an `App`.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use bevy::prelude::*;
/// use netif_console::{ I18nPlugin, LocaleAppExt, LocaleConfig, StorageBackend };
///
/// let mut app = App::new();
/// app.add_plugins(I18nPlugin::with_config(LocaleConfig {
///     storage: StorageBackend::Memory(HashMap::new()),
///     ..Default::default()
/// }));
/// app.set_locale("en-US");
/// assert_eq!(app.locale_value(), Some("en-US"));
/// ```
pub trait LocaleAppExt {
    /// Switches and persists the active locale. Unsupported tags are ignored.
    fn set_locale(&mut self, locale: &str);
    /// The active locale tag, if the [`I18nPlugin`] is installed.
    fn locale_value(&self) -> Option<&str>;
}

impl LocaleAppExt for App {
    fn set_locale(&mut self, locale: &str) {
        if let Some(mut i18n) = self.world_mut().get_resource_mut::<I18n>() {
            i18n.set_locale(locale);
        }
    }

    fn locale_value(&self) -> Option<&str> {
        self.world().get_resource::<I18n>().map(|i18n| i18n.locale_value())
    }
}

// ---------- Translation Handling ----------

/// Translations of a single file in the active locale, with the fallback
/// locale's copy of the same file behind it.
///
/// ```rust,ignore
/// let t = i18n.translation("app");
/// let title = t.t("title");
/// let rx = t.t("traffic.rx");
/// let rate = t.t_with_arg("traffic.rate", &[&"1.2 MB/s"]);
/// ```
pub struct I18nPartial {
    /// Translations for the active locale
    file_translations: SectionMap,
    /// Translations for the fallback locale
    fallback_translations: SectionMap,
}

impl I18n {
    /// Loads the bundles and restores the persisted locale.
    pub fn new(config: &LocaleConfig) -> Self {
        let translations = if config.bundled() {
            load_bundled_translations()
        } else {
            load_filesystem_translations(&config.messages_folder)
        };

        for locale in Locale::ALL {
            if !translations.langs.contains_key(locale.tag()) {
                warn!("No translation bundle for locale '{}'", locale);
            }
        }

        let store = LocaleStore::initialize(config.storage.open(), config.storage_key.clone());
        info!("Active locale: {}", store.locale());

        Self {
            translations,
            store,
            fallback_locale: config.fallback_locale,
        }
    }

    /// Translations of `translation_file` (file name without `.json`).
    pub fn translation(&self, translation_file: &str) -> I18nPartial {
        let lookup = |locale: Locale| {
            self.translations.langs
                .get(locale.tag())
                .and_then(|files| files.get(translation_file))
                .cloned()
                .unwrap_or_default()
        };

        I18nPartial {
            file_translations: lookup(self.store.locale()),
            fallback_translations: lookup(self.fallback_locale),
        }
    }

    /// Switches and persists the active locale. Unsupported tags are ignored.
    pub fn set_locale(&mut self, locale: &str) {
        self.store.set_locale(locale);
    }

    pub fn locale(&self) -> Locale {
        self.store.locale()
    }

    /// The active locale tag, e.g. `"zh-CN"`.
    pub fn locale_value(&self) -> &str {
        self.store.locale_value()
    }

    pub fn fallback_locale(&self) -> Locale {
        self.fallback_locale
    }

    pub fn available_locales(&self) -> &'static [Locale] {
        &Locale::ALL
    }

    pub fn store(&self) -> &LocaleStore {
        &self.store
    }
}

// ---------- Text helpers ----------
static ARG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{(\w*)\}\}").unwrap());

impl I18nPartial {
    /// The translation of `key`, looked up in the active locale and then the
    /// fallback locale. `"group.key"` addresses an entry of a nested group.
    /// An unknown key translates to itself.
    pub fn t(&self, key: &str) -> String {
        self.get_text_value(key).unwrap_or_else(|| key.to_string())
    }

    /// Like [`I18nPartial::t`], replacing `{{...}}` placeholders with `args`
    /// in order.
    ///
    /// ```rust,ignore
    /// // "welcome": "Welcome, {{name}}"
    /// i18n.translation("app").t_with_arg("welcome", &[&"admin"]); // "Welcome, admin"
    /// ```
    pub fn t_with_arg(&self, key: &str, args: &[&dyn ToString]) -> String {
        let template = self.t(key);
        replace_placeholders(&template, args)
    }

    fn get_text_value(&self, key: &str) -> Option<String> {
        lookup_text(&self.file_translations, key).or_else(||
            lookup_text(&self.fallback_translations, key)
        )
    }
}

fn lookup_text(sections: &SectionMap, key: &str) -> Option<String> {
    if let Some(SectionValue::Text(s)) = sections.get(key) {
        return Some(s.clone());
    }
    let (group, nested_key) = key.split_once('.')?;
    match sections.get(group) {
        Some(SectionValue::Map(m)) => m.get(nested_key).cloned(),
        _ => None,
    }
}

fn replace_placeholders(template: &str, args: &[&dyn ToString]) -> String {
    let parts: Vec<&str> = ARG_RE.split(template).collect();
    let mut result = String::new();

    for (i, part) in parts.iter().enumerate() {
        result.push_str(part);
        if i + 1 < parts.len() {
            match args.get(i) {
                Some(arg) => result.push_str(&arg.to_string()),
                None => result.push_str("{{}}"),
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::{ tempdir, TempDir };

    fn memory_config(saved: Option<&str>) -> LocaleConfig {
        let mut items = HashMap::new();
        if let Some(saved) = saved {
            items.insert(LOCALE_STORAGE_KEY.to_string(), saved.to_string());
        }
        LocaleConfig {
            storage: StorageBackend::Memory(items),
            ..Default::default()
        }
    }

    #[test]
    fn bundles_cover_every_locale() {
        let i18n = I18n::new(&memory_config(None));
        for locale in Locale::ALL {
            assert!(i18n.translations.langs.contains_key(locale.tag()), "missing {locale}");
        }
    }

    #[test]
    fn translation_follows_active_locale() {
        let mut i18n = I18n::new(&memory_config(None));
        assert_eq!(i18n.translation("app").t("title"), "网络接口监控");

        i18n.set_locale("en-US");
        assert_eq!(i18n.translation("app").t("title"), "Network Interface Monitor");
        assert_eq!(i18n.translation("app").t("netif.list"), "Interfaces");
    }

    #[test]
    fn unsupported_locale_keeps_translations() {
        let mut i18n = I18n::new(&memory_config(Some("en-US")));
        i18n.set_locale("fr-FR");
        assert_eq!(i18n.locale_value(), "en-US");
        assert_eq!(i18n.translation("app").t("language"), "Language");
    }

    #[test]
    fn missing_key_falls_back_to_zh_cn() {
        let i18n = I18n::new(&memory_config(Some("en-US")));
        assert_eq!(i18n.translation("app").t("traffic.total"), "总计");
    }

    #[test]
    fn unknown_key_translates_to_itself() {
        let i18n = I18n::new(&memory_config(None));
        assert_eq!(i18n.translation("app").t("netif.nope"), "netif.nope");
        assert_eq!(i18n.translation("missing_file").t("title"), "title");
    }

    #[test]
    fn placeholders_are_replaced_in_order() {
        let i18n = I18n::new(&memory_config(Some("en-US")));
        let t = i18n.translation("app");
        assert_eq!(t.t_with_arg("welcome", &[&"admin"]), "Welcome, admin");
        assert_eq!(t.t_with_arg("traffic.rate", &[&"1.2 MB/s"]), "Rate: 1.2 MB/s");
    }

    #[test]
    fn placeholders_without_args_stay_visible() {
        assert_eq!(replace_placeholders("{{a}} and {{b}}", &[&1]), "1 and {{}}");
        assert_eq!(replace_placeholders("no placeholders", &[&1]), "no placeholders");
    }

    #[test]
    fn parse_skips_non_string_leaves() {
        let value = serde_json::json!({
            "en-US": {
                "app": {
                    "title": "Monitor",
                    "count": 3,
                    "netif": { "up": "Up", "flags": [1, 2] }
                }
            }
        });
        let langs = parse_translation_value(&value);
        let app = &langs["en-US"]["app"];

        assert!(matches!(app.get("title"), Some(SectionValue::Text(s)) if s == "Monitor"));
        assert!(app.get("count").is_none());
        assert_eq!(lookup_text(app, "netif.up").as_deref(), Some("Up"));
        assert_eq!(lookup_text(app, "netif.flags"), None);
    }

    #[test]
    fn filesystem_translations_load_from_folder() {
        let folder = concat!(env!("CARGO_MANIFEST_DIR"), "/messages");
        let langs = load_translation_from_fs(folder).expect("messages folder should load");
        assert!(langs.contains_key("zh-CN"));
        assert!(langs.contains_key("en-US"));
    }

    #[test]
    fn missing_messages_folder_is_an_error() {
        assert!(load_translation_from_fs("definitely/not/here").is_err());
    }

    #[test]
    fn app_extension_switches_locale() {
        let mut app = App::new();
        app.add_plugins(I18nPlugin::with_config(memory_config(None)));
        assert_eq!(app.locale_value(), Some("zh-CN"));

        app.set_locale("en-US");
        assert_eq!(app.locale_value(), Some("en-US"));

        app.set_locale("fr-FR");
        assert_eq!(app.locale_value(), Some("en-US"));
    }

    #[test]
    fn app_extension_without_plugin_is_inert() {
        let mut app = App::new();
        assert_eq!(app.locale_value(), None);

        app.set_locale("en-US");
        assert_eq!(app.locale_value(), None);
        assert!(!app.world().contains_resource::<I18n>());
    }

    fn messages_folder() -> TempDir {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let zh = temp_dir.path().join("zh-CN");
        let en = temp_dir.path().join("en-US");
        fs::create_dir_all(&zh).expect("failed to create zh-CN folder");
        fs::create_dir_all(&en).expect("failed to create en-US folder");
        fs::write(zh.join("app.json"), r#"{ "title": "监控" }"#).expect("failed to write zh-CN");
        fs::write(
            en.join("app.json"),
            r#"{ "title": "Monitor", "only_en": "English only" }"#
        ).expect("failed to write en-US");
        temp_dir
    }

    fn filesystem_config(folder: &TempDir) -> LocaleConfig {
        LocaleConfig {
            use_bundled_translations: false,
            messages_folder: folder.path().to_string_lossy().to_string(),
            ..memory_config(None)
        }
    }

    #[test]
    fn filesystem_mode_reads_messages_folder() {
        let folder = messages_folder();
        let mut i18n = I18n::new(&filesystem_config(&folder));
        assert_eq!(i18n.translation("app").t("title"), "监控");

        i18n.set_locale("en-US");
        assert_eq!(i18n.translation("app").t("title"), "Monitor");
    }

    #[test]
    fn configured_fallback_locale_is_consulted() {
        let folder = messages_folder();
        let config = LocaleConfig {
            fallback_locale: Locale::EnUs,
            ..filesystem_config(&folder)
        };
        let i18n = I18n::new(&config);

        assert_eq!(i18n.fallback_locale(), Locale::EnUs);
        assert_eq!(i18n.locale(), Locale::ZhCn);
        assert_eq!(i18n.translation("app").t("only_en"), "English only");
        assert_eq!(i18n.translation("app").t("title"), "监控");
    }

    #[test]
    fn missing_messages_folder_uses_error_bundle() {
        let config = LocaleConfig {
            use_bundled_translations: false,
            messages_folder: "definitely/not/here".to_string(),
            ..memory_config(None)
        };
        let i18n = I18n::new(&config);

        assert_eq!(i18n.translation("error").t("error"), "Translation Error");
        assert_eq!(i18n.translation("app").t("title"), "title");
    }

    #[test]
    fn engine_exposes_locale_store() {
        let mut i18n = I18n::new(&memory_config(Some("en-US")));
        assert_eq!(i18n.available_locales(), &Locale::ALL);
        assert_eq!(i18n.store().locale(), Locale::EnUs);

        i18n.set_locale("zh-CN");
        let persisted = i18n.store().storage().get_item(LOCALE_STORAGE_KEY).unwrap();
        assert_eq!(persisted.as_deref(), Some("zh-CN"));
    }
}
