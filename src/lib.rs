pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{Settings, TomlConfig};

pub use adapters::PocketBaseStore;
pub use crate::core::{
    inventory::{InventoryService, ItemForm},
    state::InventoryState,
};
pub use domain::expiry::{Clock, ExpiryPolicy, FixedClock, SystemClock};
pub use domain::model::{ExpiryStatus, InventoryItem, Severity};
pub use utils::error::{PantryError, Result};
