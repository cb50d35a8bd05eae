// Adapters layer: concrete implementations for external systems.

pub mod pocketbase;

pub use pocketbase::{PocketBaseSettings, PocketBaseStore};
