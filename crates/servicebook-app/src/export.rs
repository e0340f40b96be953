//! CSV export of the full record set
//!
//! One row per record in display order, every cell quote-wrapped so free
//! text with commas, quotes or line breaks survives any standard CSV reader.

use chrono::{DateTime, Local, Utc};
use csv::{QuoteStyle, WriterBuilder};

use servicebook_types::{Error, Result, ServiceItem, VehicleRecord};

/// Export column order; fixed, one header row
pub const CSV_HEADERS: [&str; 20] = [
    "ID",
    "Owner",
    "Reg Number",
    "Brand",
    "Model",
    "Year",
    "Kilometers",
    "Gearbox",
    "Motive Power",
    "Drive Mode",
    "Brake Front Left (%)",
    "Brake Front Right (%)",
    "Brake Rear Left (%)",
    "Brake Rear Right (%)",
    "Scanning",
    "Scanning Status",
    "Engine Services",
    "Chassis Services",
    "Additional Info",
    "Registered On",
];

/// Render all records to CSV text, in the given (display) order.
///
/// Returns `None` for an empty record set - the caller shows a "nothing to
/// export" notice instead of producing a file.
pub fn records_to_csv(records: &[VehicleRecord]) -> Result<Option<String>> {
    if records.is_empty() {
        return Ok(None);
    }

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(Vec::new());

    writer
        .write_record(CSV_HEADERS)
        .map_err(|e| Error::Csv(e.to_string()))?;

    for record in records {
        let scan = record.scan_entry();
        let row = [
            record.id.clone(),
            record.user_id.clone(),
            record.reg_number.clone(),
            record.brand.clone(),
            record.model.clone(),
            record.year.clone(),
            record.kilometers.clone(),
            record.gearbox.map(|g| g.label()).unwrap_or("").to_string(),
            record.motive_power.map(|m| m.label()).unwrap_or("").to_string(),
            record.drive_mode.map(|d| d.label()).unwrap_or("").to_string(),
            record.brake_percentages.front_left.clone(),
            record.brake_percentages.front_right.clone(),
            record.brake_percentages.rear_left.clone(),
            record.brake_percentages.rear_right.clone(),
            scan.map(|s| s.service_type.clone()).unwrap_or_default(),
            scan.map(flag_summary).unwrap_or_default(),
            service_summary(&record.engine_services),
            service_summary(&record.chassis_services),
            record.additional_info.clone(),
            format_timestamp(record.timestamp),
        ];
        writer
            .write_record(&row)
            .map_err(|e| Error::Csv(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Csv(e.to_string()))?;
    let content = String::from_utf8(bytes).map_err(|e| Error::Csv(e.to_string()))?;
    Ok(Some(content))
}

/// Default export file name, stamped with the local date
pub fn export_file_name(now: DateTime<Local>) -> String {
    format!("vehicle_service_records_{}.csv", now.format("%Y%m%d"))
}

/// `"<type> (<active flags>)"`, `Pending` when no flag is set
fn item_summary(item: &ServiceItem) -> String {
    format!("{} ({})", item.service_type, flag_summary(item))
}

fn flag_summary(item: &ServiceItem) -> String {
    let flags = item.active_flags();
    if flags.is_empty() {
        "Pending".to_string()
    } else {
        flags.join(", ")
    }
}

/// Flatten a service list into one cell
fn service_summary(items: &[ServiceItem]) -> String {
    items.iter().map(item_summary).collect::<Vec<_>>().join("; ")
}

fn format_timestamp(timestamp: Option<DateTime<Utc>>) -> String {
    match timestamp {
        Some(ts) => ts.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string(),
        None => String::new(),
    }
}
