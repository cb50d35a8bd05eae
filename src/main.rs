use chrono::NaiveDate;
use clap::Parser;
use pantry_track::config::{CliConfig, Command, LogFormat, Settings};
use pantry_track::core::inventory::{filter_by_category, filter_by_severity, InventoryService};
use pantry_track::core::report::{self, OutputFormat};
use pantry_track::domain::model::Severity;
use pantry_track::utils::{logger, validation::Validate};
use pantry_track::{Clock, FixedClock, ItemForm, PantryError, PocketBaseStore, SystemClock};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    match cli.log_format {
        LogFormat::Text => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(),
    }

    tracing::debug!("CLI config: {:?}", cli.command);

    if let Err(e) = run(cli).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: CliConfig) -> Result<(), PantryError> {
    let settings = cli.settings()?;
    settings.validate()?;

    let today = cli.today.unwrap_or_else(|| SystemClock.today());
    if cli.today.is_some() {
        tracing::info!("📅 Using {} as today", today);
    }

    match cli.command {
        Command::Classify { dates } => classify(&settings, today, &dates)?,
        Command::Statuses => {
            for severity in Severity::ALL {
                println!("{:<9} {}", severity.as_str(), severity.color_hex());
            }
        }
        Command::List {
            category,
            status,
            format,
            grouped,
        } => {
            if !settings
                .categories
                .iter()
                .any(|known| known.eq_ignore_ascii_case(category.trim()))
            {
                tracing::warn!(
                    "Category '{}' is not one of: {}",
                    category,
                    settings.categories.join(", ")
                );
            }

            let service = connect(&settings, today)?;
            let all_items = service.fetch_items().await?;

            let mut items = filter_by_category(&all_items, &category);
            if let Some(severity) = status {
                items.retain(|item| item.status == severity);
            }

            if grouped {
                let owned: Vec<_> = items.into_iter().cloned().collect();
                print!("{}", report::render_grouped(&owned));
            } else {
                print!("{}", report::render(&items, format)?);
                if format == OutputFormat::Table {
                    print_summary(&all_items);
                }
            }
        }
        Command::Show { id } => {
            let service = connect(&settings, today)?;
            let item = service.get_item(&id).await?;
            print!("{}", report::render_detail(&item));
        }
        Command::Add {
            name,
            category,
            quantity,
            expiry,
            image,
        } => {
            let service = connect(&settings, today)?;
            let item = service
                .add_item(ItemForm {
                    name,
                    category,
                    quantity,
                    expiry,
                    image,
                })
                .await?;
            println!("✅ Item added to your inventory!");
            print!("{}", report::render_detail(&item));
        }
        Command::Edit { id, field, value } => {
            let service = connect(&settings, today)?;
            let item = service.update_field(&id, field, &value).await?;
            println!("✅ Item updated");
            print!("{}", report::render_detail(&item));
        }
        Command::Use { id, undo } => {
            let service = connect(&settings, today)?;
            let item = service.set_used(&id, !undo).await?;
            println!(
                "✅ {} marked as {}",
                item.name,
                if item.used { "used" } else { "unused" }
            );
        }
        Command::Delete { id } => {
            let service = connect(&settings, today)?;
            service.delete_item(&id).await?;
            println!("🗑️  Item {} deleted", id);
        }
    }

    Ok(())
}

fn connect(
    settings: &Settings,
    today: NaiveDate,
) -> Result<InventoryService<PocketBaseStore, FixedClock>, PantryError> {
    tracing::info!("🔗 Using record store at {}", settings.base_url);
    let store = PocketBaseStore::new(settings)?;
    Ok(InventoryService::with_clock(store, FixedClock(today))
        .with_policy(settings.policy)
        .with_page_size(settings.page_size))
}

fn classify(
    settings: &Settings,
    today: NaiveDate,
    dates: &[String],
) -> Result<(), PantryError> {
    for date in dates {
        let status = settings.policy.classify_str(date, today)?;
        println!(
            "{:<12} {:<9} {:<10} ({} days left)",
            date.trim(),
            status.severity.as_str(),
            status.text,
            status.days_left
        );
    }
    Ok(())
}

fn print_summary(items: &[pantry_track::InventoryItem]) {
    let counts: Vec<String> = Severity::ALL
        .iter()
        .map(|severity| format!("{}: {}", severity, filter_by_severity(items, *severity).len()))
        .collect();
    println!("\n{} items ({})", items.len(), counts.join(", "));
}
