// Location import — bulk load locations from a CSV export.
//
// Expected headers: Name, Zone, State, City, "Entrance Fee in INR", Type.
// The `Type` column becomes the location description, which is the text the
// recommender works from.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use tracing::info;

use crate::db::models::NewLocation;
use crate::db::Database;

/// One CSV row, as exported.
#[derive(Debug, Deserialize)]
struct LocationRecord {
    #[serde(rename = "Name")]
    name: Option<String>,
    #[serde(rename = "Zone")]
    zone: Option<String>,
    #[serde(rename = "State")]
    state: Option<String>,
    #[serde(rename = "City")]
    city: Option<String>,
    #[serde(rename = "Entrance Fee in INR", default)]
    entrance_fee: Option<String>,
    #[serde(rename = "Type")]
    kind: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
}

/// Import every row from `reader`. A bad row anywhere aborts the import
/// and nothing is written.
pub async fn import_locations<R: Read>(
    db: &Arc<dyn Database>,
    reader: R,
) -> Result<ImportSummary> {
    import_with_progress(db, reader, None).await
}

/// Import a CSV file, showing a spinner while rows are written.
pub async fn import_csv_file(db: &Arc<dyn Database>, path: &Path) -> Result<ImportSummary> {
    let file =
        File::open(path).with_context(|| format!("CSV file not found at {}", path.display()))?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg} [{elapsed}]").expect("valid template"),
    );
    spinner.enable_steady_tick(Duration::from_millis(120));

    let summary = import_with_progress(db, file, Some(&spinner)).await;
    spinner.finish_and_clear();
    summary
}

async fn import_with_progress<R: Read>(
    db: &Arc<dyn Database>,
    reader: R,
    progress: Option<&ProgressBar>,
) -> Result<ImportSummary> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut locations = Vec::new();

    // Validate the whole file before writing anything.
    for (i, record) in csv_reader.deserialize::<LocationRecord>().enumerate() {
        // Row 1 is the header.
        let row = i + 2;
        let record = record.with_context(|| format!("Failed to parse CSV row {row}"))?;
        let location = to_location(record).with_context(|| format!("Invalid CSV row {row}"))?;
        locations.push(location);

        if let Some(pb) = progress {
            pb.set_message(format!("Parsed {} rows", locations.len()));
        }
    }

    if let Some(pb) = progress {
        pb.set_message(format!("Writing {} locations", locations.len()));
    }
    let ids = db.insert_locations(&locations).await?;

    info!(imported = ids.len(), "Location import finished");
    Ok(ImportSummary {
        imported: ids.len(),
    })
}

fn to_location(record: LocationRecord) -> Result<NewLocation> {
    Ok(NewLocation {
        name: non_blank(record.name),
        zone: non_blank(record.zone),
        state: non_blank(record.state),
        city: non_blank(record.city),
        entry_price: parse_fee(record.entrance_fee.as_deref())?,
        description: record.kind.trim().to_string(),
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Blank fees mean free entry.
fn parse_fee(raw: Option<&str>) -> Result<i64> {
    let raw = raw.unwrap_or("").trim();
    if raw.is_empty() {
        return Ok(0);
    }
    let fee: i64 = raw
        .parse()
        .with_context(|| format!("Entrance fee '{raw}' is not a whole number"))?;
    if fee < 0 {
        anyhow::bail!("Entrance fee {fee} is negative");
    }
    Ok(fee)
}
