use crate::core::inventory::InventoryService;
use crate::domain::expiry::Clock;
use crate::domain::model::InventoryItem;
use crate::domain::ports::RecordStore;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq)]
pub struct InventorySnapshot {
    pub items: Vec<InventoryItem>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl Default for InventorySnapshot {
    fn default() -> Self {
        // 第一次 refresh 之前視為載入中
        Self {
            items: Vec::new(),
            is_loading: true,
            error: None,
        }
    }
}

/// Shared inventory handle. Clones see the same items.
#[derive(Debug, Clone, Default)]
pub struct InventoryState {
    inner: Arc<RwLock<InventorySnapshot>>,
}

impl InventoryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> InventorySnapshot {
        self.inner.read().await.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.inner.read().await.is_loading
    }

    pub async fn error(&self) -> Option<String> {
        self.inner.read().await.error.clone()
    }

    /// Reload items. On failure the previous items are kept and `error`
    /// holds the user-facing message. Loading is always cleared.
    pub async fn refresh<S: RecordStore, K: Clock>(&self, service: &InventoryService<S, K>) {
        {
            let mut state = self.inner.write().await;
            state.is_loading = true;
            state.error = None;
        }

        let result = service.fetch_items().await;

        let mut state = self.inner.write().await;
        match result {
            Ok(items) => state.items = items,
            Err(e) => {
                tracing::warn!("Inventory refresh failed: {}", e);
                state.error = Some(e.user_friendly_message());
            }
        }
        state.is_loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::expiry::FixedClock;
    use crate::domain::model::{ImageRecord, ItemPatch, ItemRecord, NewItem, Page};
    use crate::domain::ports::ListQuery;
    use crate::utils::error::{PantryError, Result};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct FlakyStore {
        healthy: AtomicBool,
    }

    #[async_trait]
    impl RecordStore for FlakyStore {
        async fn list_items(&self, query: &ListQuery) -> Result<Page<ItemRecord>> {
            if !self.healthy.load(Ordering::SeqCst) {
                return Err(PantryError::BackendError {
                    status: 502,
                    message: "Bad Gateway".to_string(),
                });
            }
            Ok(Page {
                page: query.page,
                per_page: query.per_page,
                total_items: 1,
                total_pages: 1,
                items: vec![ItemRecord {
                    id: "a".to_string(),
                    name: "Yogurt".to_string(),
                    category: "Cooked Food".to_string(),
                    quantity: 2,
                    expiry: "2025-05-21 00:00:00.000Z".to_string(),
                    created: "2025-05-19 00:00:00.000Z".to_string(),
                    used: false,
                    image: String::new(),
                    expand: None,
                }],
            })
        }

        async fn get_item(&self, id: &str) -> Result<ItemRecord> {
            Err(PantryError::NotFoundError {
                collection: "items".to_string(),
                id: id.to_string(),
            })
        }

        async fn create_item(&self, _item: &NewItem) -> Result<ItemRecord> {
            unimplemented!()
        }

        async fn update_item(&self, _id: &str, _patch: &ItemPatch) -> Result<ItemRecord> {
            unimplemented!()
        }

        async fn delete_item(&self, _id: &str) -> Result<()> {
            unimplemented!()
        }

        fn file_url(&self, _image: &ImageRecord) -> Option<String> {
            None
        }
    }

    fn service(healthy: bool) -> InventoryService<FlakyStore, FixedClock> {
        InventoryService::with_clock(
            FlakyStore {
                healthy: AtomicBool::new(healthy),
            },
            FixedClock(NaiveDate::from_ymd_opt(2025, 5, 21).unwrap()),
        )
    }

    #[test]
    fn test_starts_loading() {
        let state = InventoryState::new();
        let snapshot = tokio_test::block_on(state.snapshot());
        assert!(snapshot.is_loading);
        assert!(snapshot.items.is_empty());
        assert!(snapshot.error.is_none());
    }

    #[tokio::test]
    async fn test_refresh_success_replaces_items() {
        let state = InventoryState::new();
        let service = service(true);

        state.refresh(&service).await;

        let snapshot = state.snapshot().await;
        assert!(!snapshot.is_loading);
        assert!(snapshot.error.is_none());
        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(snapshot.items[0].expiry, "Today");
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_items_and_sets_error() {
        let state = InventoryState::new();
        let service = service(true);
        state.refresh(&service).await;

        service.store().healthy.store(false, Ordering::SeqCst);
        let shared = state.clone();
        shared.refresh(&service).await;

        let snapshot = state.snapshot().await;
        assert!(!snapshot.is_loading);
        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(
            state.error().await.as_deref(),
            Some("Failed to fetch items. Please check your connection and try again.")
        );

        // 下一次成功時清除錯誤
        service.store().healthy.store(true, Ordering::SeqCst);
        state.refresh(&service).await;
        assert!(state.error().await.is_none());
        assert!(!state.is_loading().await);
    }
}
