use bevy::log::{ debug, warn };

use crate::locale::Locale;
use crate::storage::LocaleStorage;

/// Key under which the active locale tag is persisted.
pub const LOCALE_STORAGE_KEY: &str = "locale";

/// Single owner of the active locale, persisted through a [`LocaleStorage`].
pub struct LocaleStore {
    current: Locale,
    key: String,
    storage: Box<dyn LocaleStorage>,
}

impl LocaleStore {
    /// Reads the persisted locale under `key`, falling back to
    /// [`Locale::default`] when it is missing, unreadable or not allow-listed.
    pub fn initialize(storage: Box<dyn LocaleStorage>, key: impl Into<String>) -> Self {
        let key = key.into();
        let saved = match storage.get_item(&key) {
            Ok(saved) => saved,
            Err(e) => {
                warn!("Failed to read '{}' from storage: {}", key, e);
                None
            }
        };

        let current = match saved.as_deref().and_then(Locale::from_tag) {
            Some(locale) => locale,
            None => {
                if let Some(saved) = &saved {
                    debug!("Ignoring persisted locale '{}'", saved);
                }
                Locale::default()
            }
        };

        Self { current, key, storage }
    }

    /// Switches to `candidate` and persists it. Tags outside the allow-list
    /// leave both the store and the storage untouched.
    pub fn set_locale(&mut self, candidate: &str) {
        let Some(locale) = Locale::from_tag(candidate) else {
            return;
        };
        self.current = locale;
        if let Err(e) = self.storage.set_item(&self.key, locale.tag()) {
            warn!("Failed to persist locale '{}': {}", locale, e);
        }
    }

    pub fn locale(&self) -> Locale {
        self.current
    }

    pub fn locale_value(&self) -> &'static str {
        self.current.tag()
    }

    pub fn storage(&self) -> &dyn LocaleStorage {
        self.storage.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{ MemoryStorage, StorageError };
    use std::collections::HashMap;

    fn store_with(saved: Option<&str>) -> LocaleStore {
        let mut items = HashMap::new();
        if let Some(saved) = saved {
            items.insert(LOCALE_STORAGE_KEY.to_string(), saved.to_string());
        }
        LocaleStore::initialize(Box::new(MemoryStorage::with_items(items)), LOCALE_STORAGE_KEY)
    }

    fn persisted(store: &LocaleStore) -> Option<String> {
        store.storage().get_item(LOCALE_STORAGE_KEY).unwrap()
    }

    #[test]
    fn initialize_without_saved_value_uses_default() {
        let store = store_with(None);
        assert_eq!(store.locale_value(), "zh-CN");
        assert_eq!(persisted(&store), None);
    }

    #[test]
    fn initialize_restores_saved_locale() {
        assert_eq!(store_with(Some("en-US")).locale(), Locale::EnUs);
    }

    #[test]
    fn initialize_ignores_unsupported_saved_value() {
        let store = store_with(Some("fr-FR"));
        assert_eq!(store.locale_value(), "zh-CN");
    }

    #[test]
    fn set_locale_updates_value_and_storage() {
        for candidate in ["zh-CN", "en-US"] {
            let mut store = store_with(None);
            store.set_locale(candidate);
            assert_eq!(store.locale_value(), candidate);
            assert_eq!(persisted(&store).as_deref(), Some(candidate));
        }
    }

    #[test]
    fn set_locale_ignores_unsupported_tags() {
        let mut store = store_with(Some("en-US"));
        for candidate in ["fr-FR", "", "EN-US", "zh"] {
            store.set_locale(candidate);
            assert_eq!(store.locale_value(), "en-US");
            assert_eq!(persisted(&store).as_deref(), Some("en-US"));
        }
    }

    #[test]
    fn set_locale_ignores_unsupported_tag_without_writing() {
        let mut store = store_with(None);
        store.set_locale("fr-FR");
        assert_eq!(store.locale(), Locale::ZhCn);
        assert_eq!(persisted(&store), None);
    }

    #[test]
    fn set_locale_twice_matches_once() {
        let mut once = store_with(Some("en-US"));
        once.set_locale("zh-CN");

        let mut twice = store_with(Some("en-US"));
        twice.set_locale("zh-CN");
        twice.set_locale("zh-CN");

        assert_eq!(once.locale(), twice.locale());
        assert_eq!(persisted(&once), persisted(&twice));
    }

    struct BrokenStorage;

    impl LocaleStorage for BrokenStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(std::io::Error::other("unavailable").into())
        }

        fn set_item(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(std::io::Error::other("read-only").into())
        }
    }

    #[test]
    fn storage_failures_are_absorbed() {
        let mut store = LocaleStore::initialize(Box::new(BrokenStorage), LOCALE_STORAGE_KEY);
        assert_eq!(store.locale(), Locale::ZhCn);

        store.set_locale("en-US");
        assert_eq!(store.locale(), Locale::EnUs);
    }
}
