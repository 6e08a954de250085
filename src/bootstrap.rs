//! One-time startup of the console.
//!
//! [`run`] builds the UI root, registers the icon component, injects the
//! translation engine, registers the plugin components, mounts the window on
//! the page anchor and arms the deferred icon re-scan. [`BootstrapPlugin`]
//! holds everything except the window, so headless apps can use it too.

use std::time::Duration;

use bevy::prelude::*;
use bevy::window::WindowPlugin;

use crate::icons::{ rescan_placeholders, IconLibrary, IconPlaceholder, IconPlugin };
use crate::plugin_components::register_plugin_components;
use crate::{ I18nPlugin, LocaleConfig };

pub const MOUNT_SELECTOR: &str = "#app";
pub const ICON_RESCAN_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    pub locale: LocaleConfig,
    /// CSS selector of the canvas the primary window is mounted on.
    pub mount_selector: String,
    /// Delay between startup and the one-shot icon re-scan.
    pub icon_rescan_delay: Duration,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            locale: LocaleConfig::default(),
            mount_selector: MOUNT_SELECTOR.to_string(),
            icon_rescan_delay: ICON_RESCAN_DELAY,
        }
    }
}

/// The page anchor the UI root is attached to.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct MountPoint(pub String);

/// The pending icon re-scan. Fires once, never re-arms.
#[derive(Resource, Debug)]
pub struct DeferredIconRescan {
    timer: Timer,
    fired: bool,
}

impl DeferredIconRescan {
    pub fn new(delay: Duration) -> Self {
        Self {
            timer: Timer::new(delay, TimerMode::Once),
            fired: false,
        }
    }

    pub fn fired(&self) -> bool {
        self.fired
    }
}

fn run_deferred_icon_rescan(
    time: Res<Time>,
    mut rescan: ResMut<DeferredIconRescan>,
    mut commands: Commands,
    mut library: ResMut<IconLibrary>,
    placeholders: Query<(Entity, &IconPlaceholder)>
) {
    if rescan.fired || !rescan.timer.tick(time.delta()).just_finished() {
        return;
    }
    rescan.fired = true;
    let replaced = rescan_placeholders(&mut commands, &mut library, &placeholders);
    debug!("Icon re-scan replaced {} placeholder(s)", replaced);
}

/// Registers the icon library, the translation engine and the plugin
/// components, and schedules the deferred icon re-scan.
///
/// Like any unique Bevy plugin it can only be added once per app.
#[derive(Default)]
pub struct BootstrapPlugin {
    pub config: BootstrapConfig,
}

impl BootstrapPlugin {
    pub fn with_config(config: BootstrapConfig) -> Self {
        Self { config }
    }
}

impl Plugin for BootstrapPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(IconPlugin).add_plugins(I18nPlugin::with_config(self.config.locale.clone()));
        register_plugin_components(app);
        app.insert_resource(MountPoint(self.config.mount_selector.clone()))
            .insert_resource(DeferredIconRescan::new(self.config.icon_rescan_delay))
            .add_systems(Update, run_deferred_icon_rescan);
    }
}

/// Window settings that attach the primary window to the canvas matching
/// `selector` and let it follow the parent element's size.
pub fn mount_window_plugin(selector: &str) -> WindowPlugin {
    WindowPlugin {
        primary_window: Some(Window {
            title: "netif".to_string(),
            canvas: Some(selector.to_string()),
            fit_canvas_to_parent: true,
            ..default()
        }),
        ..default()
    }
}

/// Builds, mounts and runs the console.
pub fn run(config: BootstrapConfig) -> AppExit {
    let selector = config.mount_selector.clone();
    let mut app = App::new();
    app.add_plugins(DefaultPlugins.set(mount_window_plugin(&selector)))
        .add_plugins(BootstrapPlugin::with_config(config));
    info!("Mounting console on '{}'", selector);
    app.run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_mounts_on_app_after_100ms() {
        let config = BootstrapConfig::default();
        assert_eq!(config.mount_selector, "#app");
        assert_eq!(config.icon_rescan_delay, Duration::from_millis(100));
    }

    #[test]
    fn window_plugin_targets_selector() {
        let plugin = mount_window_plugin("#app");
        let window = plugin.primary_window.expect("primary window is configured");
        assert_eq!(window.canvas.as_deref(), Some("#app"));
        assert!(window.fit_canvas_to_parent);
    }

    #[test]
    fn deferred_rescan_starts_pending() {
        let rescan = DeferredIconRescan::new(ICON_RESCAN_DELAY);
        assert!(!rescan.fired());
    }
}
