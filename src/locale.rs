//! The closed set of display languages the console supports.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A display language from the allow-list.
///
/// Only two locales exist. Anything else coming from storage or from a UI
/// handler is rejected by [`Locale::from_tag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    /// Simplified Chinese, the default and fallback locale.
    #[default]
    ZhCn,
    /// American English.
    EnUs,
}

impl Locale {
    /// Every allow-listed locale, default first.
    pub const ALL: [Locale; 2] = [Locale::ZhCn, Locale::EnUs];

    /// The tag stored in durable storage and used as the bundle folder name.
    pub const fn tag(self) -> &'static str {
        match self {
            Locale::ZhCn => "zh-CN",
            Locale::EnUs => "en-US",
        }
    }

    /// Looks up an allow-listed locale by its exact tag.
    pub fn from_tag(tag: &str) -> Option<Locale> {
        Self::ALL.into_iter().find(|locale| locale.tag() == tag)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("locale '{0}' is not supported")]
pub struct UnknownLocale(pub String);

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locale::from_tag(s).ok_or_else(|| UnknownLocale(s.to_string()))
    }
}
