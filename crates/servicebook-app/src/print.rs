//! Printable report rendering
//!
//! Turns one record into a standalone HTML document: inline styles only, no
//! external resources, ready for the platform print dialog. Pure
//! transformation - rendering never mutates the record.
//!
//! Service sections use the filtered strategy: only items with at least one
//! active flag are printed, with a placeholder row when none qualify.

use servicebook_types::{DriveMode, Gearbox, MotivePower, ServiceItem, VehicleRecord};

/// Render one record as a self-contained printable HTML document
pub fn render_record(record: &VehicleRecord) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!(
        "<title>Vehicle Service Record - {}</title>\n",
        esc(&record.reg_number)
    ));
    html.push_str("<style>\n");
    html.push_str("body { font-family: Arial, Helvetica, sans-serif; margin: 24px; color: #222; }\n");
    html.push_str("h1 { font-size: 20px; border-bottom: 2px solid #222; padding-bottom: 6px; }\n");
    html.push_str("h2 { font-size: 15px; margin-top: 20px; }\n");
    html.push_str("table { border-collapse: collapse; width: 100%; margin-top: 6px; }\n");
    html.push_str("th, td { border: 1px solid #999; padding: 4px 8px; text-align: left; font-size: 13px; }\n");
    html.push_str("th { background: #eee; }\n");
    html.push_str(".options span { display: inline-block; border: 1px solid #999; border-radius: 3px; padding: 2px 8px; margin-right: 6px; font-size: 12px; }\n");
    html.push_str(".options span.marked { background: #222; color: #fff; font-weight: bold; }\n");
    html.push_str(".placeholder { color: #666; font-style: italic; }\n");
    html.push_str(".info { white-space: pre-line; border: 1px solid #999; padding: 8px; font-size: 13px; min-height: 2em; }\n");
    html.push_str(".meta { color: #666; font-size: 12px; margin-top: 24px; }\n");
    html.push_str("</style>\n</head>\n<body>\n");

    html.push_str("<h1>Vehicle Service Record</h1>\n");

    // Vehicle scalars
    html.push_str("<table>\n");
    for (label, value) in [
        ("Reg Number", &record.reg_number),
        ("Brand", &record.brand),
        ("Model", &record.model),
        ("Year", &record.year),
        ("Kilometers", &record.kilometers),
    ] {
        html.push_str(&format!("<tr><th>{}</th><td>{}</td></tr>\n", label, esc(value)));
    }
    html.push_str("</table>\n");

    // Enum fields always show the full option catalog; the stored value,
    // when it matches one, is marked
    push_options(
        &mut html,
        "Gearbox",
        Gearbox::ALL.iter().map(|g| g.label()),
        record.gearbox.map(|g| g.label()),
    );
    push_options(
        &mut html,
        "Motive Power",
        MotivePower::ALL.iter().map(|m| m.label()),
        record.motive_power.map(|m| m.label()),
    );
    push_options(
        &mut html,
        "Drive Mode",
        DriveMode::ALL.iter().map(|d| d.label()),
        record.drive_mode.map(|d| d.label()),
    );

    push_service_section(&mut html, "Engine Services", &record.engine_services);
    push_service_section(&mut html, "Chassis Services", &record.chassis_services);

    // Scanning: single entry, type plus the three flag indicators
    html.push_str("<h2>Vehicle Scanning</h2>\n<table>\n");
    html.push_str("<tr><th>Type</th><th>Done</th><th>Urgent</th><th>Later</th></tr>\n");
    if let Some(scan) = record.scan_entry() {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            esc(&scan.service_type),
            indicator(scan.done),
            indicator(scan.urgent),
            indicator(scan.later)
        ));
    }
    html.push_str("</table>\n");

    // Brake grid, front/rear x left/right; unmeasured wheels stay empty
    let brakes = &record.brake_percentages;
    html.push_str("<h2>Brake Test (%)</h2>\n<table>\n");
    html.push_str("<tr><th></th><th>Left</th><th>Right</th></tr>\n");
    html.push_str(&format!(
        "<tr><th>Front</th><td>{}</td><td>{}</td></tr>\n",
        esc(&brakes.front_left),
        esc(&brakes.front_right)
    ));
    html.push_str(&format!(
        "<tr><th>Rear</th><td>{}</td><td>{}</td></tr>\n",
        esc(&brakes.rear_left),
        esc(&brakes.rear_right)
    ));
    html.push_str("</table>\n");

    html.push_str("<h2>Additional Info</h2>\n");
    html.push_str(&format!("<div class=\"info\">{}</div>\n", esc(&record.additional_info)));

    let registered = record
        .timestamp
        .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "N/A".to_string());
    html.push_str(&format!("<p class=\"meta\">Registered on: {}</p>\n", esc(&registered)));

    html.push_str("</body>\n</html>\n");
    html
}

/// Default output file name for a printed record
pub fn print_file_name(record: &VehicleRecord) -> String {
    let base = if record.reg_number.is_empty() {
        record.id.as_str()
    } else {
        record.reg_number.as_str()
    };
    let sanitized: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("service_record_{sanitized}.html")
}

fn push_options<'a>(
    html: &mut String,
    title: &str,
    options: impl Iterator<Item = &'a str>,
    selected: Option<&str>,
) {
    html.push_str(&format!("<h2>{title}</h2>\n<p class=\"options\">"));
    for option in options {
        if selected == Some(option) {
            html.push_str(&format!("<span class=\"marked\">{}</span>", esc(option)));
        } else {
            html.push_str(&format!("<span>{}</span>", esc(option)));
        }
    }
    html.push_str("</p>\n");
}

fn push_service_section(html: &mut String, title: &str, items: &[ServiceItem]) {
    html.push_str(&format!("<h2>{title}</h2>\n<table>\n"));
    html.push_str("<tr><th>Type</th><th>Status</th></tr>\n");
    let mut printed = 0;
    for item in items.iter().filter(|i| i.has_active_flag()) {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td></tr>\n",
            esc(&item.service_type),
            item.active_flags().join(", ")
        ));
        printed += 1;
    }
    if printed == 0 {
        html.push_str("<tr><td colspan=\"2\" class=\"placeholder\">No services recorded</td></tr>\n");
    }
    html.push_str("</table>\n");
}

fn indicator(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        ""
    }
}

fn esc(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
