//! Command handlers

use std::fs;
use std::path::PathBuf;

use chrono::Local;

use servicebook_app::config::Config;
use servicebook_app::logging::init_logging;
use servicebook_app::repository::{open_identity, open_record_store};
use servicebook_app::{export, print, NewRecordInput, RecordListService};
use servicebook_domain::{BrakeCorner, FieldEdit, ScalarField, ServiceCategory, ServiceFlag};
use servicebook_types::{
    DriveMode, Error, Gearbox, MotivePower, OutputFormat, Result,
};

use crate::cli::{Cli, Commands};
use crate::output::{output_record, output_records};

pub fn execute(cli: Cli) -> Result<()> {
    init_logging(cli.verbose);

    // Load config
    let mut config = Config::load()?;

    // Override from CLI args
    if let Some(ref store_dir) = cli.store_dir {
        config.store_dir = Some(store_dir.clone());
    }
    let output_format = cli.format.unwrap_or(config.output_format);

    // Identity bootstrap, as the original deployment does at startup: every
    // record operation is gated on a signed-in user; only Config works
    // without one
    let user_id = match &cli.command {
        Commands::Config { .. } => String::new(),
        _ => resolve_user_id(&config, cli.token.as_deref())?,
    };

    match &cli.command {
        Commands::Register {
            reg_number,
            brand,
            model,
            year,
            kilometers,
            gearbox,
            motive_power,
            drive_mode,
        } => {
            let input = NewRecordInput {
                reg_number: reg_number.clone(),
                brand: brand.clone(),
                model: model.clone(),
                year: year.clone(),
                kilometers: kilometers.clone(),
                gearbox: parse_gearbox(gearbox.as_deref())?,
                motive_power: parse_motive_power(motive_power.as_deref())?,
                drive_mode: parse_drive_mode(drive_mode.as_deref())?,
            };
            cmd_register(&config, &user_id, input)
        }

        Commands::List { limit } => cmd_list(&config, output_format, *limit),

        Commands::Show { id } => cmd_show(&config, output_format, id),

        Commands::Edit { .. } => cmd_edit(&config, &cli.command),

        Commands::Delete { id, yes } => cmd_delete(&config, id, *yes),

        Commands::Export { output } => cmd_export(&config, output.clone()),

        Commands::Print { id, output } => cmd_print(&config, id, output.clone()),

        Commands::Import { file, dry_run } => cmd_import(&config, file, *dry_run),

        Commands::Config {
            show,
            set_app_id,
            set_store_dir,
            set_output,
            reset,
        } => cmd_config(
            *show,
            set_app_id.clone(),
            set_store_dir.clone(),
            *set_output,
            *reset,
        ),
    }
}

fn open_service(config: &Config) -> Result<RecordListService> {
    let store = open_record_store(config)?;
    Ok(RecordListService::new(Box::new(store), config.scope_key()))
}

/// Establish the acting identity: token sign-in when a token is given,
/// stored anonymous identity otherwise
fn resolve_user_id(config: &Config, token: Option<&str>) -> Result<String> {
    let identity = open_identity(config)?;
    let user_id = match token {
        Some(token) => identity.sign_in_with_token(token)?,
        None => identity.sign_in_anonymously()?,
    };
    Ok(user_id)
}

fn cmd_register(config: &Config, user_id: &str, input: NewRecordInput) -> Result<()> {
    let mut service = open_service(config)?;
    let id = service.register(input, user_id)?;
    println!("Service registration successful! Record ID: {}", id);
    Ok(())
}

fn cmd_list(config: &Config, output_format: OutputFormat, limit: Option<usize>) -> Result<()> {
    let mut service = open_service(config)?;
    service.refresh();

    if let Some(err) = service.subscription_error() {
        eprintln!("Error: {}", err);
    }

    let records = service.records();
    if records.is_empty() {
        println!("No records found. Register a service first!");
        return Ok(());
    }

    let shown = limit.unwrap_or(records.len()).min(records.len());
    output_records(output_format, &records[..shown])
}

fn cmd_show(config: &Config, output_format: OutputFormat, id: &str) -> Result<()> {
    let mut service = open_service(config)?;
    service.refresh();
    let record = service
        .get(id)
        .ok_or_else(|| Error::RecordNotFound(id.to_string()))?;
    output_record(output_format, record)
}

fn cmd_edit(config: &Config, command: &Commands) -> Result<()> {
    let Commands::Edit {
        id,
        reg_number,
        brand,
        model,
        year,
        kilometers,
        gearbox,
        motive_power,
        drive_mode,
        additional_info,
        brake_front_left,
        brake_front_right,
        brake_rear_left,
        brake_rear_right,
        scan_type,
        toggles,
    } = command
    else {
        unreachable!("cmd_edit called for a non-edit command");
    };

    let mut service = open_service(config)?;
    service.refresh();
    service.begin_edit(id)?;

    let scalar_edits = [
        (ScalarField::RegNumber, reg_number),
        (ScalarField::Brand, brand),
        (ScalarField::Model, model),
        (ScalarField::Year, year),
        (ScalarField::Kilometers, kilometers),
        (ScalarField::AdditionalInfo, additional_info),
    ];
    for (field, value) in scalar_edits {
        if let Some(value) = value {
            service.apply_edit(FieldEdit::Scalar(field, value.clone()))?;
        }
    }

    // enum-backed scalars get validated up front, like a radio group only
    // offering its catalog
    if let Some(value) = gearbox {
        parse_gearbox(Some(value))?;
        service.apply_edit(FieldEdit::Scalar(ScalarField::Gearbox, value.clone()))?;
    }
    if let Some(value) = motive_power {
        parse_motive_power(Some(value))?;
        service.apply_edit(FieldEdit::Scalar(ScalarField::MotivePower, value.clone()))?;
    }
    if let Some(value) = drive_mode {
        parse_drive_mode(Some(value))?;
        service.apply_edit(FieldEdit::Scalar(ScalarField::DriveMode, value.clone()))?;
    }

    let brake_edits = [
        (BrakeCorner::FrontLeft, brake_front_left),
        (BrakeCorner::FrontRight, brake_front_right),
        (BrakeCorner::RearLeft, brake_rear_left),
        (BrakeCorner::RearRight, brake_rear_right),
    ];
    for (corner, value) in brake_edits {
        if let Some(value) = value {
            service.apply_edit(FieldEdit::BrakeCorner(corner, value.clone()))?;
        }
    }

    if let Some(value) = scan_type {
        service.apply_edit(FieldEdit::ScanType(value.clone()))?;
    }

    for toggle in toggles {
        let (category, index, flag) = parse_toggle(toggle)?;
        service.toggle_service_flag(category, index, flag)?;
    }

    let saved = service.save_edit()?;
    println!("Record {} updated", saved.id);
    Ok(())
}

fn cmd_delete(config: &Config, id: &str, yes: bool) -> Result<()> {
    let mut service = open_service(config)?;
    service.refresh();
    let record = service
        .get(id)
        .ok_or_else(|| Error::RecordNotFound(id.to_string()))?;
    let reg_number = record.reg_number.clone();

    service.request_delete(id);

    // Confirmation
    if !yes {
        println!("Delete record {} ({})? [y/N]", reg_number, id);
        let mut input = String::new();
        std::io::stdin().read_line(&mut input).ok();
        if !input.trim().eq_ignore_ascii_case("y") {
            service.cancel_delete();
            println!("Cancelled.");
            return Ok(());
        }
    }

    service.confirm_delete()?;
    println!("Record {} deleted", id);
    Ok(())
}

fn cmd_export(config: &Config, output: Option<PathBuf>) -> Result<()> {
    let mut service = open_service(config)?;
    service.refresh();

    let Some(csv) = export::records_to_csv(service.records())? else {
        // guarded empty state, not an error - no file is produced
        println!("No records to export.");
        return Ok(());
    };

    let path = output.unwrap_or_else(|| PathBuf::from(export::export_file_name(Local::now())));
    fs::write(&path, csv)?;
    println!(
        "Exported {} record(s) to {}",
        service.records().len(),
        path.display()
    );
    Ok(())
}

fn cmd_print(config: &Config, id: &str, output: Option<PathBuf>) -> Result<()> {
    let mut service = open_service(config)?;
    service.refresh();
    let record = service
        .get(id)
        .ok_or_else(|| Error::RecordNotFound(id.to_string()))?;

    let html = print::render_record(record);
    let path = output.unwrap_or_else(|| PathBuf::from(print::print_file_name(record)));
    fs::write(&path, html)?;
    println!("Printable document written to {}", path.display());
    Ok(())
}

fn cmd_import(config: &Config, file: &PathBuf, dry_run: bool) -> Result<()> {
    let content = fs::read_to_string(file)?;
    let documents: Vec<serde_json::Value> = serde_json::from_str(&content)?;

    if dry_run {
        println!("[Dry run] {} record(s) would be imported", documents.len());
        return Ok(());
    }

    let mut service = open_service(config)?;
    let count = service.import_documents(documents)?;
    println!("Imported {} record(s)", count);
    Ok(())
}

fn cmd_config(
    show: bool,
    set_app_id: Option<String>,
    set_store_dir: Option<PathBuf>,
    set_output: Option<OutputFormat>,
    reset: bool,
) -> Result<()> {
    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut modified = false;

    if let Some(app_id) = set_app_id {
        config.app_id = app_id;
        modified = true;
    }

    if let Some(store_dir) = set_store_dir {
        config.store_dir = Some(store_dir);
        modified = true;
    }

    if let Some(output_format) = set_output {
        config.output_format = output_format;
        modified = true;
    }

    if modified {
        config.save()?;
        println!("Configuration updated");
    }

    if show || !modified {
        println!("{}", config);
    }

    Ok(())
}

fn parse_gearbox(value: Option<&str>) -> Result<Option<Gearbox>> {
    match value {
        None => Ok(None),
        Some(v) => Gearbox::from_stored(v)
            .map(Some)
            .ok_or_else(|| Error::InvalidArgument(format!("unknown gearbox '{v}' (Auto, Manual)"))),
    }
}

fn parse_motive_power(value: Option<&str>) -> Result<Option<MotivePower>> {
    match value {
        None => Ok(None),
        Some(v) => MotivePower::from_stored(v).map(Some).ok_or_else(|| {
            Error::InvalidArgument(format!(
                "unknown motive power '{v}' (Petrol, Diesel, Gas, Hybrid, PHEV, HEV)"
            ))
        }),
    }
}

fn parse_drive_mode(value: Option<&str>) -> Result<Option<DriveMode>> {
    match value {
        None => Ok(None),
        Some(v) => DriveMode::from_stored(v)
            .map(Some)
            .ok_or_else(|| Error::InvalidArgument(format!("unknown drive mode '{v}' (Rear, Front, 4x4)"))),
    }
}

/// Parse a toggle spec of the form `<category>:<index>:<flag>`
fn parse_toggle(spec: &str) -> Result<(ServiceCategory, usize, ServiceFlag)> {
    let invalid = || {
        Error::InvalidArgument(format!(
            "invalid toggle '{spec}' (expected <engine|chassis|scanning>:<index>:<done|urgent|later>)"
        ))
    };

    let mut parts = spec.split(':');
    let category = match parts.next() {
        Some("engine") => ServiceCategory::Engine,
        Some("chassis") => ServiceCategory::Chassis,
        Some("scanning") => ServiceCategory::Scanning,
        _ => return Err(invalid()),
    };
    let index: usize = parts.next().and_then(|i| i.parse().ok()).ok_or_else(invalid)?;
    let flag = match parts.next() {
        Some("done") => ServiceFlag::Done,
        Some("urgent") => ServiceFlag::Urgent,
        Some("later") => ServiceFlag::Later,
        _ => return Err(invalid()),
    };
    if parts.next().is_some() {
        return Err(invalid());
    }
    Ok((category, index, flag))
}
