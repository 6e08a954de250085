use bevy::prelude::*;
use netif_console::bootstrap::{ self, BootstrapConfig };

fn main() -> AppExit {
    bootstrap::run(BootstrapConfig::default())
}
