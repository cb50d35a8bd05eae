use chrono::NaiveDate;
use httpmock::prelude::*;
use httpmock::Method::PATCH;
use pantry_track::config::{Overrides, Settings, TomlConfig};
use pantry_track::core::inventory::{filter_by_category, group_by_severity};
use pantry_track::domain::model::ItemField;
use pantry_track::{
    FixedClock, InventoryService, InventoryState, ItemForm, PantryError, PocketBaseStore, Severity,
};
use std::io::Write;
use tempfile::NamedTempFile;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 5, 21).unwrap()
}

fn service_for(server: &MockServer) -> InventoryService<PocketBaseStore, FixedClock> {
    let settings = Settings::resolve(
        &TomlConfig::default(),
        Overrides {
            base_url: Some(server.base_url()),
            ..Default::default()
        },
    );
    let store = PocketBaseStore::new(&settings).unwrap();
    InventoryService::with_clock(store, FixedClock(today())).with_policy(settings.policy)
}

fn item(id: &str, name: &str, category: &str, expiry: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "category": category,
        "quantity": 1,
        "expiry": expiry,
        "created": "2025-05-01 08:00:00.000Z",
        "used": false,
        "image": ""
    })
}

fn inventory_page() -> serde_json::Value {
    let mut milk = item("r1", "Sữa Vinamilk", "Canned/Packed", "2025-05-22 00:00:00.000Z");
    milk["image"] = serde_json::json!("img1");
    milk["expand"] = serde_json::json!({
        "image": {
            "id": "img1",
            "collectionId": "pbc_images",
            "collectionName": "item_images",
            "image": "milk_abc.jpg"
        }
    });

    serde_json::json!({
        "page": 1,
        "perPage": 50,
        "totalItems": 5,
        "totalPages": 1,
        "items": [
            milk,
            item("r2", "Bread", "Cooked Food", "2025-05-20 00:00:00.000Z"),
            item("r3", "Apples", "Fruits/Vegetables", "2025-05-26 00:00:00.000Z"),
            item("r4", "Rice", "Canned/Packed", "2025-05-31 00:00:00.000Z"),
            item("r5", "Soup", "canned/packed", "2025-05-21 00:00:00.000Z")
        ]
    })
}

#[tokio::test]
async fn test_fetch_classifies_every_item() {
    let server = MockServer::start();
    let list_mock = server.mock(|when, then| {
        when.method(GET).path("/api/collections/items/records");
        then.status(200).json_body(inventory_page());
    });

    let items = service_for(&server).fetch_items().await.unwrap();
    list_mock.assert();

    let summary: Vec<(&str, Severity, &str)> = items
        .iter()
        .map(|i| (i.name.as_str(), i.status, i.expiry.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Sữa Vinamilk", Severity::Critical, "Tomorrow"),
            ("Bread", Severity::Outdated, "Expired"),
            ("Apples", Severity::Warning, "5 days"),
            ("Rice", Severity::Neutral, "10 days"),
            ("Soup", Severity::Critical, "Today"),
        ]
    );

    assert_eq!(
        items[0].image.as_deref(),
        Some(format!("{}/api/files/pbc_images/img1/milk_abc.jpg", server.base_url()).as_str())
    );
    assert!(items[1].image.is_none());
    assert_eq!(items[0].day_added, "01/05/2025");
    assert_eq!(items[3].day_expired, "31/05/2025");

    let canned = filter_by_category(&items, "Canned/Packed");
    assert_eq!(canned.len(), 3);

    let groups = group_by_severity(&items);
    assert_eq!(groups[&Severity::Critical].len(), 2);
    assert_eq!(groups[&Severity::Outdated][0].name, "Bread");
}

#[tokio::test]
async fn test_state_refresh_reports_fetch_failure() {
    let server = MockServer::start();
    let list_mock = server.mock(|when, then| {
        when.method(GET).path("/api/collections/items/records");
        then.status(500).json_body(serde_json::json!({
            "code": 500,
            "message": "Something went wrong while processing your request.",
            "data": {}
        }));
    });

    let service = service_for(&server);
    let state = InventoryState::new();
    state.refresh(&service).await;

    list_mock.assert();
    let snapshot = state.snapshot().await;
    assert!(!snapshot.is_loading);
    assert!(snapshot.items.is_empty());
    assert_eq!(
        snapshot.error.as_deref(),
        Some("Failed to fetch items. Please check your connection and try again.")
    );
}

#[tokio::test]
async fn test_unreachable_server_is_fetch_failure() {
    // 沒有任何服務在這個埠
    let settings = Settings::resolve(
        &TomlConfig::default(),
        Overrides {
            base_url: Some("http://127.0.0.1:9".to_string()),
            ..Default::default()
        },
    );
    let store = PocketBaseStore::new(&settings).unwrap();
    let service = InventoryService::with_clock(store, FixedClock(today()));

    let err = service.fetch_items().await.unwrap_err();
    assert!(matches!(err, PantryError::FetchFailedError { .. }));
}

#[tokio::test]
async fn test_add_item_round_trip() {
    let server = MockServer::start();
    let create_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/collections/items/records")
            .json_body(serde_json::json!({
                "name": "Tomato Soup",
                "category": "Canned/Packed",
                "quantity": 1,
                "expiry": "2025-05-23 00:00:00.000Z",
                "image": "img7",
                "used": false
            }));
        then.status(200).json_body(serde_json::json!({
            "id": "new1",
            "name": "Tomato Soup",
            "category": "Canned/Packed",
            "quantity": 1,
            "expiry": "2025-05-23 00:00:00.000Z",
            "created": "2025-05-21 12:00:00.000Z",
            "used": false,
            "image": "img7"
        }));
    });

    let item = service_for(&server)
        .add_item(ItemForm {
            name: "Tomato Soup".to_string(),
            category: "Canned/Packed".to_string(),
            quantity: "0".to_string(),
            expiry: "2025-05-23".to_string(),
            image: Some("img7".to_string()),
        })
        .await
        .unwrap();

    create_mock.assert();
    assert_eq!(item.id, "new1");
    assert_eq!(item.status, Severity::Critical);
    assert_eq!(item.expiry, "2 days");
    assert_eq!(item.day_added, "21/05/2025");
}

#[tokio::test]
async fn test_invalid_form_never_hits_server() {
    let server = MockServer::start();
    let create_mock = server.mock(|when, then| {
        when.method(POST);
        then.status(200);
    });

    let err = service_for(&server)
        .add_item(ItemForm {
            name: "Tuna".to_string(),
            expiry: "next week".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(err, PantryError::ValidationError { .. }));
    create_mock.assert_hits(0);
}

#[tokio::test]
async fn test_edit_expiry_reclassifies() {
    let server = MockServer::start();
    let patch_mock = server.mock(|when, then| {
        when.method(PATCH)
            .path("/api/collections/items/records/r3")
            .json_body(serde_json::json!({"expiry": "2025-06-10 00:00:00.000Z"}));
        then.status(200).json_body(item(
            "r3",
            "Apples",
            "Fruits/Vegetables",
            "2025-06-10 00:00:00.000Z",
        ));
    });

    let updated = service_for(&server)
        .update_field("r3", ItemField::Expiry, "2025-06-10")
        .await
        .unwrap();

    patch_mock.assert();
    assert_eq!(updated.status, Severity::Neutral);
    assert_eq!(updated.expiry, "20 days");
}

#[tokio::test]
async fn test_thresholds_from_config_file() {
    let server = MockServer::start();
    let list_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/collections/items/records")
            .query_param("perPage", "20");
        then.status(200).json_body(inventory_page());
    });

    let mut config_file = NamedTempFile::new().unwrap();
    write!(
        config_file,
        "[backend]\nbase_url = \"{}\"\npage_size = 20\n\n[expiry]\ncritical_max_days = 6\nwarning_max_days = 14\n",
        server.base_url()
    )
    .unwrap();

    let file = TomlConfig::from_file(config_file.path()).unwrap();
    let settings = Settings::resolve(&file, Overrides::default());
    let store = PocketBaseStore::new(&settings).unwrap();
    let service = InventoryService::with_clock(store, FixedClock(today()))
        .with_policy(settings.policy)
        .with_page_size(settings.page_size);

    let items = service.fetch_items().await.unwrap();
    list_mock.assert();
    let apples = items.iter().find(|i| i.name == "Apples").unwrap();
    let rice = items.iter().find(|i| i.name == "Rice").unwrap();

    assert_eq!(apples.status, Severity::Critical);
    assert_eq!(rice.status, Severity::Warning);
}
