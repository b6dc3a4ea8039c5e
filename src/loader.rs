use serde_json::Value;

use crate::{
    constants::LOADER_PROGRESS_INTERVAL,
    error::{ApiError, Error},
    predicate::Predicate,
    schema::Cocktail,
    store::CatalogStore,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub loaded: usize,
    pub skipped: usize,
    pub total_in_store: i64,
}

/// Splits an export file into raw records. Only the top level is checked
/// here so one bad record cannot sink the batch.
pub fn parse_records(text: &str) -> Result<Vec<Value>, Error> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(records)) => Ok(records),
        Ok(_) => Err(ApiError::InvalidRequest.new("Expected a JSON array of cocktails")),
        Err(e) => Err(ApiError::InvalidRequest.new(&format!("Invalid JSON: {e}"))),
    }
}

fn record_label(record: &Value) -> &str {
    record
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("Unknown")
}

/// Replaces the recipe table with `records`. Records that fail to decode or
/// insert are logged and skipped. User tables are not touched.
pub async fn load_cocktails(
    records: Vec<Value>,
    store: &dyn CatalogStore,
) -> Result<LoadSummary, Error> {
    log::info!("Loading {} cocktails...", records.len());

    let removed = store.clear_cocktails().await?;
    log::info!("Cleared {removed} existing cocktails");

    let mut summary = LoadSummary::default();
    for record in records {
        let label = record_label(&record).to_owned();

        let cocktail: Cocktail = match serde_json::from_value(record) {
            Ok(cocktail) => cocktail,
            Err(e) => {
                log::error!("Error loading cocktail {label}: {e}");
                summary.skipped += 1;
                continue;
            }
        };

        if let Err(e) = store.insert_cocktail(&cocktail).await {
            log::error!("Error loading cocktail {label}: {e}");
            summary.skipped += 1;
            continue;
        }

        summary.loaded += 1;
        if summary.loaded % LOADER_PROGRESS_INTERVAL == 0 {
            log::info!("Loaded {} cocktails...", summary.loaded);
        }
    }

    summary.total_in_store = store.count_cocktails(&Predicate::True).await?;
    log::info!(
        "Loaded {} cocktails ({} skipped), {} in store",
        summary.loaded,
        summary.skipped,
        summary.total_in_store
    );

    Ok(summary)
}
