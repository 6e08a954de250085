//! Pre-built UI components shared by the console's plugin pages.

use bevy::prelude::*;

/// Card summarizing one network interface.
#[derive(Component, Reflect, Debug, Clone, Default)]
#[reflect(Component)]
pub struct InterfaceCard {
    pub ifname: String,
}

/// Live receive/transmit rate label.
#[derive(Component, Reflect, Debug, Clone, Default)]
#[reflect(Component)]
pub struct TrafficRate {
    pub ifname: String,
    pub rx_bytes_per_second: u64,
    pub tx_bytes_per_second: u64,
}

/// Switch that starts or stops monitoring an interface.
#[derive(Component, Reflect, Debug, Clone, Default)]
#[reflect(Component)]
pub struct MonitorToggle {
    pub ifname: String,
    pub enabled: bool,
}

/// Language picker bound to the active locale.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct LocaleSwitcher;

/// Names of the registered plugin components, in registration order.
#[derive(Resource, Debug, Default)]
pub struct PluginComponentRegistry {
    names: Vec<&'static str>,
}

impl PluginComponentRegistry {
    pub fn names(&self) -> &[&'static str] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(&name)
    }
}

/// Registers every pre-built plugin component with the app's type registry.
pub fn register_plugin_components(app: &mut App) {
    app.register_type::<InterfaceCard>()
        .register_type::<TrafficRate>()
        .register_type::<MonitorToggle>()
        .register_type::<LocaleSwitcher>();

    let mut registry = PluginComponentRegistry::default();
    registry.names.extend(["interface-card", "traffic-rate", "monitor-toggle", "locale-switcher"]);
    app.insert_resource(registry);
}
