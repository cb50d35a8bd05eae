pub mod inventory;
pub mod report;
pub mod state;

pub use crate::domain::model::{InventoryItem, ItemRecord, Severity};
pub use crate::domain::ports::{ConfigProvider, ListQuery, RecordStore};
pub use crate::utils::error::Result;
