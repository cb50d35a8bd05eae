use crate::domain::expiry::{parse_expiry, Clock, ExpiryPolicy, SystemClock};
use crate::domain::model::{InventoryItem, ItemField, ItemPatch, ItemRecord, NewItem, Severity};
use crate::domain::ports::{ListQuery, RecordStore, DEFAULT_PAGE_SIZE};
use crate::utils::error::{PantryError, Result};
use crate::utils::validation::validate_date_input;
use chrono::NaiveDate;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

pub const ALL_CATEGORIES: &str = "All";

pub const DEFAULT_CATEGORIES: [&str; 4] =
    ["All", "Canned/Packed", "Fruits/Vegetables", "Cooked Food"];

const MISSING_FIELDS_MESSAGE: &str = "Please fill in at least the item name and expiry date.";

/// Values of the "add item" form, exactly as typed.
#[derive(Debug, Clone, Default)]
pub struct ItemForm {
    pub name: String,
    pub category: String,
    pub quantity: String,
    /// `YYYY-MM-DD`
    pub expiry: String,
    /// Relation id of a previously uploaded image record.
    pub image: Option<String>,
}

impl ItemForm {
    /// Check the form and turn it into a create payload.
    pub fn into_new_item(self) -> Result<NewItem> {
        let name = self.name.trim().to_string();
        let expiry_input = self.expiry.trim().to_string();

        if name.is_empty() {
            return Err(PantryError::MissingFieldError {
                field: "name".to_string(),
                message: MISSING_FIELDS_MESSAGE.to_string(),
            });
        }
        if expiry_input.is_empty() {
            return Err(PantryError::MissingFieldError {
                field: "expiry".to_string(),
                message: MISSING_FIELDS_MESSAGE.to_string(),
            });
        }

        validate_date_input("expiry", &expiry_input)?;
        let expiry = parse_expiry(&expiry_input)?;

        Ok(NewItem {
            name,
            category: self.category.trim().to_string(),
            quantity: parse_form_quantity(&self.quantity)?,
            expiry,
            image: self
                .image
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty()),
            used: false,
        })
    }
}

fn leading_integer() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\s*([+-]?\d+)").expect("static quantity pattern"))
}

/// Reads the leading integer the way a form field would (`"2.5"` is 2,
/// `"12abc"` is 12). Blank, non-numeric or 0 falls back to 1.
fn parse_form_quantity(input: &str) -> Result<u32> {
    let Some(digits) = leading_integer().captures(input).and_then(|c| c.get(1)) else {
        return Ok(1);
    };

    match digits.as_str().parse::<i64>() {
        Ok(n) if n < 0 => Err(PantryError::validation("Quantity cannot be negative.")),
        Ok(0) => Ok(1),
        Ok(n) => u32::try_from(n).map_err(|_| PantryError::validation("Quantity is too large.")),
        Err(_) => Err(PantryError::validation("Quantity is too large.")),
    }
}

fn parse_edit_quantity(input: &str) -> Result<u32> {
    input.trim().parse::<u32>().map_err(|_| {
        PantryError::validation(format!(
            "Quantity must be a whole number of 0 or more, got '{}'.",
            input.trim()
        ))
    })
}

fn parse_used(input: &str) -> Result<bool> {
    match input.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" | "used" => Ok(true),
        "false" | "no" | "n" | "0" | "unused" => Ok(false),
        other => Err(PantryError::validation(format!(
            "'{}' is not a yes/no value.",
            other
        ))),
    }
}

/// en-GB short date, e.g. `21/05/2025`.
pub fn format_day(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

pub struct InventoryService<S: RecordStore, K: Clock = SystemClock> {
    store: S,
    clock: K,
    policy: ExpiryPolicy,
    page_size: u32,
}

impl<S: RecordStore> InventoryService<S, SystemClock> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: RecordStore, K: Clock> InventoryService<S, K> {
    pub fn with_clock(store: S, clock: K) -> Self {
        Self {
            store,
            clock,
            policy: ExpiryPolicy::default(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_policy(mut self, policy: ExpiryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn policy(&self) -> &ExpiryPolicy {
        &self.policy
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Build the display view of a record, recomputing its status for today.
    pub fn to_inventory_item(&self, record: ItemRecord) -> Result<InventoryItem> {
        let expiry_date =
            parse_expiry(&record.expiry).map_err(|e| PantryError::CorruptRecordError {
                id: record.id.clone(),
                field: "expiry date".to_string(),
                source: Box::new(e),
            })?;
        let status = self.policy.classify(expiry_date, self.clock.today());

        let day_added = match parse_expiry(&record.created) {
            Ok(created) => format_day(created),
            Err(_) => {
                tracing::debug!("Record {} has no usable created date", record.id);
                record.created.clone()
            }
        };

        let image = record
            .expanded_image()
            .and_then(|image| self.store.file_url(image));

        Ok(InventoryItem {
            quantity: u32::try_from(record.quantity.max(0)).unwrap_or(u32::MAX),
            day_added,
            day_expired: format_day(expiry_date),
            expiry_date,
            expiry: status.text,
            days_left: status.days_left,
            status: status.severity,
            image,
            used: record.used,
            id: record.id,
            name: record.name,
            category: record.category,
        })
    }

    /// Newest first, one page. Network failures become `FetchFailedError`.
    pub async fn fetch_items(&self) -> Result<Vec<InventoryItem>> {
        let query = ListQuery::default().with_per_page(self.page_size);

        let page = match self.store.list_items(&query).await {
            Ok(page) => page,
            Err(e) => {
                tracing::error!("[Inventory] API error in fetch_items: {}", e);
                return Err(PantryError::FetchFailedError {
                    source: Box::new(e),
                });
            }
        };

        let items = page
            .items
            .into_iter()
            .map(|record| self.to_inventory_item(record))
            .collect::<Result<Vec<_>>>()?;

        tracing::info!("📦 Loaded {} items", items.len());
        Ok(items)
    }

    pub async fn get_item(&self, id: &str) -> Result<InventoryItem> {
        let record = self.store.get_item(id).await?;
        self.to_inventory_item(record)
    }

    pub async fn add_item(&self, form: ItemForm) -> Result<InventoryItem> {
        let new_item = form.into_new_item()?;
        let record = self.store.create_item(&new_item).await.map_err(|e| {
            tracing::error!("Failed to save item '{}': {}", new_item.name, e);
            e
        })?;
        self.to_inventory_item(record)
    }

    /// Edit one field from its textual value.
    pub async fn update_field(
        &self,
        id: &str,
        field: ItemField,
        value: &str,
    ) -> Result<InventoryItem> {
        let mut patch = ItemPatch::default();
        match field {
            ItemField::Name => {
                let name = value.trim();
                if name.is_empty() {
                    return Err(PantryError::MissingFieldError {
                        field: "name".to_string(),
                        message: "Item name cannot be empty.".to_string(),
                    });
                }
                patch.name = Some(name.to_string());
            }
            ItemField::Category => patch.category = Some(value.trim().to_string()),
            ItemField::Quantity => patch.quantity = Some(parse_edit_quantity(value)?),
            ItemField::Expiry => {
                validate_date_input("expiry", value)?;
                patch.expiry = Some(parse_expiry(value)?);
            }
            ItemField::Used => patch.used = Some(parse_used(value)?),
        }

        tracing::debug!("Updating {:?} on item {}", field, id);
        let record = self.store.update_item(id, &patch).await?;
        self.to_inventory_item(record)
    }

    pub async fn set_used(&self, id: &str, used: bool) -> Result<InventoryItem> {
        let patch = ItemPatch {
            used: Some(used),
            ..Default::default()
        };
        let record = self.store.update_item(id, &patch).await?;
        self.to_inventory_item(record)
    }

    pub async fn delete_item(&self, id: &str) -> Result<()> {
        self.store.delete_item(id).await
    }
}

/// Case-insensitive category match; `All` keeps everything.
pub fn filter_by_category<'a>(items: &'a [InventoryItem], category: &str) -> Vec<&'a InventoryItem> {
    let wanted = category.trim();
    items
        .iter()
        .filter(|item| {
            wanted.eq_ignore_ascii_case(ALL_CATEGORIES)
                || (!item.category.is_empty() && item.category.to_lowercase() == wanted.to_lowercase())
        })
        .collect()
}

pub fn filter_by_severity(items: &[InventoryItem], severity: Severity) -> Vec<&InventoryItem> {
    items.iter().filter(|item| item.status == severity).collect()
}

/// Buckets in Critical, Warning, Neutral, Outdated order; empty buckets omitted.
pub fn group_by_severity(items: &[InventoryItem]) -> BTreeMap<Severity, Vec<&InventoryItem>> {
    let mut groups: BTreeMap<Severity, Vec<&InventoryItem>> = BTreeMap::new();
    for item in items {
        groups.entry(item.status).or_default().push(item);
    }
    groups
}
