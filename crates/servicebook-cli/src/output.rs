//! Output formatting module

use chrono::Local;
use servicebook_types::{OutputFormat, Result, ServiceItem, VehicleRecord};

/// Print the record list in the requested format
pub fn output_records(output_format: OutputFormat, records: &[VehicleRecord]) -> Result<()> {
    if output_format == OutputFormat::Json {
        let values = records
            .iter()
            .map(record_to_json)
            .collect::<Result<Vec<_>>>()?;
        println!("{}", serde_json::to_string_pretty(&values)?);
        return Ok(());
    }

    // Table format
    println!(
        "{:<36} {:<10} {:<10} {:<18} {:>9} {:<7} {:<7} {:<6} {:>8} {:<17}",
        "ID", "Reg. No.", "Brand", "Model", "KM", "Gear", "Power", "Drive", "Flagged", "Registered On"
    );
    println!("{}", "-".repeat(134));
    for record in records {
        let model = if record.year.is_empty() {
            record.model.clone()
        } else {
            format!("{} ({})", record.model, record.year)
        };
        println!(
            "{:<36} {:<10} {:<10} {:<18} {:>9} {:<7} {:<7} {:<6} {:>8} {:<17}",
            record.id,
            record.reg_number,
            record.brand,
            model,
            record.kilometers,
            record.gearbox.map(|g| g.label()).unwrap_or(""),
            record.motive_power.map(|m| m.label()).unwrap_or(""),
            record.drive_mode.map(|d| d.label()).unwrap_or(""),
            flagged_count(record),
            registered_on(record)
        );
    }
    println!("\n{} record(s)", records.len());

    Ok(())
}

/// Print one record in full
pub fn output_record(output_format: OutputFormat, record: &VehicleRecord) -> Result<()> {
    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&record_to_json(record)?)?);
        return Ok(());
    }

    println!("\nVehicle Service Record");
    println!("======================");
    println!("ID:              {}", record.id);
    println!("Reg number:      {}", record.reg_number);
    println!("Brand:           {}", record.brand);
    println!("Model:           {} ({})", record.model, record.year);
    println!("Kilometers:      {}", record.kilometers);
    println!(
        "Gearbox:         {}",
        record.gearbox.map(|g| g.label()).unwrap_or("-")
    );
    println!(
        "Motive power:    {}",
        record.motive_power.map(|m| m.label()).unwrap_or("-")
    );
    println!(
        "Drive mode:      {}",
        record.drive_mode.map(|d| d.label()).unwrap_or("-")
    );

    print_service_section("Engine services", &record.engine_services);
    print_service_section("Chassis services", &record.chassis_services);

    if let Some(scan) = record.scan_entry() {
        println!("\nVehicle scanning:");
        println!("  - {} ({})", scan.service_type, status_label(scan));
    }

    let brakes = &record.brake_percentages;
    println!("\nBrake test (%):");
    println!("  Front:  L {:<6} R {:<6}", brakes.front_left, brakes.front_right);
    println!("  Rear:   L {:<6} R {:<6}", brakes.rear_left, brakes.rear_right);

    if !record.additional_info.is_empty() {
        println!("\nAdditional info:");
        for line in record.additional_info.lines() {
            println!("  {}", line);
        }
    }

    println!("\nOwner:           {}", record.user_id);
    println!("Registered on:   {}", registered_on(record));

    Ok(())
}

fn print_service_section(title: &str, items: &[ServiceItem]) {
    println!("\n{}:", title);
    if items.is_empty() {
        println!("  (none recorded)");
        return;
    }
    for (index, item) in items.iter().enumerate() {
        println!("  {:>2}. {} ({})", index, item.service_type, status_label(item));
    }
}

fn status_label(item: &ServiceItem) -> String {
    let flags = item.active_flags();
    if flags.is_empty() {
        "Pending".to_string()
    } else {
        flags.join(", ")
    }
}

fn flagged_count(record: &VehicleRecord) -> usize {
    record
        .engine_services
        .iter()
        .chain(&record.chassis_services)
        .filter(|item| item.has_active_flag())
        .count()
}

/// Creation time in local display form; legacy records show N/A
fn registered_on(record: &VehicleRecord) -> String {
    match record.timestamp {
        Some(ts) => ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
        None => "N/A".to_string(),
    }
}

fn record_to_json(record: &VehicleRecord) -> Result<serde_json::Value> {
    let mut value = record.to_document()?;
    if let serde_json::Value::Object(ref mut map) = value {
        map.insert(
            "id".to_string(),
            serde_json::Value::String(record.id.clone()),
        );
    }
    Ok(value)
}
