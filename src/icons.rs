//! Icon component and the placeholder re-scan.
//!
//! UI code spawns [`IconPlaceholder`]s by name. [`rescan_placeholders`] swaps
//! every placeholder whose name is known to the [`IconLibrary`] for a rendered
//! [`Icon`].

use std::collections::HashMap;

use bevy::prelude::*;

/// Icons the console ships with, as icon-font code points.
const BUILTIN_ICONS: &[(&str, char)] = &[
    ("network-wired", '\u{f6ff}'),
    ("wifi", '\u{f1eb}'),
    ("globe", '\u{f0ac}'),
    ("language", '\u{f1ab}'),
    ("arrow-down", '\u{f063}'),
    ("arrow-up", '\u{f062}'),
    ("play", '\u{f04b}'),
    ("stop", '\u{f04d}'),
    ("circle-check", '\u{f058}'),
    ("circle-xmark", '\u{f057}'),
    ("gear", '\u{f013}'),
];

/// Marks an entity that should display the named icon once the library has
/// scanned it.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct IconPlaceholder {
    pub name: String,
}

impl IconPlaceholder {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct Icon {
    pub name: String,
    pub glyph: char,
}

#[derive(Resource, Debug, Clone)]
pub struct IconLibrary {
    glyphs: HashMap<String, char>,
    rescans: u32,
}

impl Default for IconLibrary {
    fn default() -> Self {
        Self {
            glyphs: BUILTIN_ICONS.iter()
                .map(|(name, glyph)| (name.to_string(), *glyph))
                .collect(),
            rescans: 0,
        }
    }
}

impl IconLibrary {
    pub fn add(&mut self, name: impl Into<String>, glyph: char) {
        self.glyphs.insert(name.into(), glyph);
    }

    pub fn glyph(&self, name: &str) -> Option<char> {
        self.glyphs.get(name).copied()
    }

    /// Number of completed placeholder scans.
    pub fn rescans(&self) -> u32 {
        self.rescans
    }
}

/// Registers the icon components and the [`IconLibrary`].
pub struct IconPlugin;

impl Plugin for IconPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<IconLibrary>();
    }
}

/// Replaces known placeholders with [`Icon`]s and returns how many were
/// replaced. Unknown names stay as placeholders.
pub fn rescan_placeholders(
    commands: &mut Commands,
    library: &mut IconLibrary,
    placeholders: &Query<(Entity, &IconPlaceholder)>
) -> usize {
    let mut replaced = 0;
    for (entity, placeholder) in placeholders.iter() {
        let Some(glyph) = library.glyph(&placeholder.name) else {
            debug!("Unknown icon '{}' on {:?}", placeholder.name, entity);
            continue;
        };
        commands
            .entity(entity)
            .remove::<IconPlaceholder>()
            .insert(Icon { name: placeholder.name.clone(), glyph });
        replaced += 1;
    }
    library.rescans += 1;
    replaced
}
