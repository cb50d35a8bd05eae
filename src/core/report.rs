use crate::core::inventory::group_by_severity;
use crate::domain::model::InventoryItem;
use crate::utils::error::{PantryError, Result};
use serde::Serialize;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

#[derive(Serialize)]
struct CsvRow<'a> {
    id: &'a str,
    name: &'a str,
    category: &'a str,
    quantity: u32,
    status: &'a str,
    expiry: &'a str,
    day_added: &'a str,
    day_expired: &'a str,
    used: bool,
}

pub fn render(items: &[&InventoryItem], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(items)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(items)?),
        OutputFormat::Csv => render_csv(items),
    }
}

pub fn render_csv(items: &[&InventoryItem]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for item in items {
        writer.serialize(CsvRow {
            id: &item.id,
            name: &item.name,
            category: &item.category,
            quantity: item.quantity,
            status: item.status.as_str(),
            expiry: &item.expiry,
            day_added: &item.day_added,
            day_expired: &item.day_expired,
            used: item.used,
        })?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| PantryError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| PantryError::validation(e.to_string()))
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let mut out: String = value.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

pub fn render_table(items: &[&InventoryItem]) -> String {
    if items.is_empty() {
        return "No items.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<16} {:<24} {:<18} {:>4}  {:<10} {:<9} {:<10} {}",
        "ID", "NAME", "CATEGORY", "QTY", "EXPIRES", "STATUS", "ON", "USED"
    );
    for item in items {
        let _ = writeln!(
            out,
            "{:<16} {:<24} {:<18} {:>4}  {:<10} {:<9} {:<10} {}",
            truncate(&item.id, 16),
            truncate(&item.name, 24),
            truncate(&item.category, 18),
            item.quantity,
            item.expiry,
            item.status.as_str(),
            item.day_expired,
            if item.used { "yes" } else { "no" }
        );
    }
    out
}

/// Items under a heading per severity, Critical first.
pub fn render_grouped(items: &[InventoryItem]) -> String {
    let groups = group_by_severity(items);
    if groups.is_empty() {
        return "No items.\n".to_string();
    }

    let mut out = String::new();
    for (severity, group) in groups {
        let _ = writeln!(out, "== {} ({}) ==", severity, group.len());
        for item in group {
            let _ = writeln!(
                out,
                "  {:<24} {:<10} x{}",
                truncate(&item.name, 24),
                item.expiry,
                item.quantity
            );
        }
    }
    out
}

/// Multi-line detail view of one item.
pub fn render_detail(item: &InventoryItem) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", item.name);
    let _ = writeln!(
        out,
        "  Status:      {} ({})",
        item.status,
        if item.used { "Used" } else { "Unused" }
    );
    let _ = writeln!(out, "  Category:    {}", item.category);
    let _ = writeln!(out, "  Quantity:    {}", item.quantity);
    let _ = writeln!(out, "  Day added:   {}", item.day_added);
    let _ = writeln!(out, "  Day expired: {} ({})", item.day_expired, item.expiry);
    if let Some(image) = &item.image {
        let _ = writeln!(out, "  Image:       {}", image);
    }
    let _ = writeln!(out, "  ID:          {}", item.id);
    out
}
