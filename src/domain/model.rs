use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Freshness bucket derived from days-until-expiry. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Critical,
    Warning,
    Neutral,
    Outdated,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::Warning,
        Severity::Neutral,
        Severity::Outdated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::Warning => "Warning",
            Severity::Neutral => "Neutral",
            Severity::Outdated => "Outdated",
        }
    }

    /// Badge colour (Catppuccin Latte).
    pub fn color_hex(&self) -> &'static str {
        match self {
            Severity::Critical => "#d20f39",
            Severity::Warning => "#df8e1d",
            Severity::Neutral => "#40a02b",
            Severity::Outdated => "#7c7f93",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Severity::ALL
            .into_iter()
            .find(|severity| severity.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown status '{}', expected one of Critical, Warning, Neutral, Outdated",
                    s
                )
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiryStatus {
    pub days_left: i64,
    pub severity: Severity,
    pub text: String,
}

/// Image record from the `item_images` collection, as expanded on an item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    pub id: String,
    #[serde(default)]
    pub collection_id: String,
    #[serde(default)]
    pub collection_name: String,
    /// Stored file name.
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemExpand {
    #[serde(default)]
    pub image: Option<ImageRecord>,
}

/// Raw `items` record as returned by the record store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub expiry: String,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub used: bool,
    /// Relation id into `item_images`; empty when no image is attached.
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub expand: Option<ItemExpand>,
}

impl ItemRecord {
    pub fn expanded_image(&self) -> Option<&ImageRecord> {
        self.expand.as_ref().and_then(|e| e.image.as_ref())
    }
}

/// Paged list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub page: u32,
    pub per_page: u32,
    #[serde(default)]
    pub total_items: i64,
    #[serde(default)]
    pub total_pages: i64,
    pub items: Vec<T>,
}

/// Item as shown to a user, with the severity recomputed at read time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    pub category: String,
    pub quantity: u32,
    pub status: Severity,
    /// en-GB formatted, e.g. `21/05/2025`
    pub day_added: String,
    pub day_expired: String,
    pub expiry_date: NaiveDate,
    /// Countdown text: "Today", "Tomorrow", "5 days", "Expired".
    pub expiry: String,
    pub days_left: i64,
    pub image: Option<String>,
    pub used: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub category: String,
    pub quantity: u32,
    #[serde(with = "backend_date")]
    pub expiry: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub used: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "backend_date::option",
        default
    )]
    pub expiry: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used: Option<bool>,
}

impl ItemPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.quantity.is_none()
            && self.expiry.is_none()
            && self.used.is_none()
    }
}

/// Editable item fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    Name,
    Category,
    Quantity,
    Expiry,
    Used,
}

impl FromStr for ItemField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(ItemField::Name),
            "category" => Ok(ItemField::Category),
            "quantity" | "qty" => Ok(ItemField::Quantity),
            "expiry" | "day_expired" => Ok(ItemField::Expiry),
            "used" => Ok(ItemField::Used),
            other => Err(format!(
                "unknown field '{}', expected name, category, quantity, expiry or used",
                other
            )),
        }
    }
}

/// Dates go over the wire in PocketBase's datetime layout.
pub(crate) mod backend_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d 00:00:00.000Z";

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        crate::domain::expiry::parse_expiry(&raw).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use chrono::NaiveDate;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            date: &Option<NaiveDate>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match date {
                Some(date) => super::serialize(date, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveDate>, D::Error> {
            let raw: Option<String> = Option::deserialize(deserializer)?;
            raw.map(|value| {
                crate::domain::expiry::parse_expiry(&value).map_err(serde::de::Error::custom)
            })
            .transpose()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_parse_is_case_insensitive() {
        assert_eq!("critical".parse::<Severity>().unwrap(), Severity::Critical);
        assert_eq!(" Outdated ".parse::<Severity>().unwrap(), Severity::Outdated);
        assert!("fresh".parse::<Severity>().is_err());
    }

    #[test]
    fn test_new_item_wire_format() {
        let item = NewItem {
            name: "Canned Tuna".to_string(),
            category: "Canned/Packed".to_string(),
            quantity: 2,
            expiry: NaiveDate::from_ymd_opt(2025, 5, 21).unwrap(),
            image: None,
            used: false,
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["expiry"], "2025-05-21 00:00:00.000Z");
        assert_eq!(json["quantity"], 2);
        assert!(json.get("image").is_none());
    }

    #[test]
    fn test_patch_only_sends_set_fields() {
        let patch = ItemPatch {
            used: Some(true),
            ..Default::default()
        };

        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({"used": true}));
        assert!(!patch.is_empty());
        assert!(ItemPatch::default().is_empty());
    }

    #[test]
    fn test_item_record_with_expanded_image() {
        let record: ItemRecord = serde_json::from_value(serde_json::json!({
            "id": "abc123",
            "name": "Milk",
            "category": "Canned/Packed",
            "quantity": 1,
            "expiry": "2025-05-21 00:00:00.000Z",
            "created": "2025-05-01 10:00:00.000Z",
            "used": false,
            "image": "img1",
            "expand": {
                "image": {
                    "id": "img1",
                    "collectionId": "pbc_123",
                    "collectionName": "item_images",
                    "image": "milk_x1.jpg"
                }
            }
        }))
        .unwrap();

        let image = record.expanded_image().unwrap();
        assert_eq!(image.collection_id, "pbc_123");
        assert_eq!(image.image, "milk_x1.jpg");
    }
}
