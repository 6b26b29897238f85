pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use kycdesk_core::config::{AppConfig, LoadOptions};
use kycdesk_core::{AmbulanceCategory, ApprovalState, FieldKey, RegistrantType};

#[derive(Debug, Parser)]
#[command(
    name = "kycdesk",
    about = "KYC verification workbench CLI",
    long_about = "Review registrant KYC submissions, inspect field documents, and record per-field approval decisions against the verification backend.",
    after_help = "Examples:\n  kycdesk list --registrant-type FLEET_OWNER --page 2\n  kycdesk show drv-104 dl_details\n  kycdesk decline drv-104 bank_details --remark \"IFSC mismatch\""
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a kycdesk.toml config file")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "List registrants for one page of the current filters")]
    List {
        #[arg(long, value_parser = parse_registrant_type, help = "DRIVER or FLEET_OWNER")]
        registrant_type: Option<RegistrantType>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, help = "Rows per page (defaults to the configured page size)")]
        page_size: Option<u32>,
        #[arg(long, help = "Substring match on name, id, or vehicle number")]
        search: Option<String>,
        #[arg(long, help = "Only registrations submitted on this date (YYYY-MM-DD)")]
        date: Option<NaiveDate>,
    },
    #[command(about = "Show the detail document behind one verifiable field")]
    Show {
        id: String,
        #[arg(value_parser = parse_field_key)]
        field: FieldKey,
        #[arg(long, value_parser = parse_registrant_type, help = "DRIVER or FLEET_OWNER")]
        registrant_type: Option<RegistrantType>,
    },
    #[command(about = "Record an ACCEPTED decision for one field")]
    Approve {
        id: String,
        #[arg(value_parser = parse_field_key)]
        field: FieldKey,
    },
    #[command(about = "Record a DECLINED decision for one field (remark required)")]
    Decline {
        id: String,
        #[arg(value_parser = parse_field_key)]
        field: FieldKey,
        #[arg(long, help = "Reason shown to the registrant")]
        remark: String,
    },
    #[command(about = "Reset one field back to PENDING")]
    Hold {
        id: String,
        #[arg(value_parser = parse_field_key)]
        field: FieldKey,
    },
    #[command(about = "Reassign a vehicle's ambulance category")]
    SetCategory {
        vehicle_id: String,
        #[arg(value_parser = parse_category, help = "MFR, PTS, BLS, DBA, or ALS")]
        category: AmbulanceCategory,
    },
    #[command(about = "Correct a registrant's address")]
    SetAddress { id: String, address: String },
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
}

fn parse_registrant_type(raw: &str) -> Result<RegistrantType, String> {
    RegistrantType::parse(raw)
        .ok_or_else(|| format!("unsupported registrant type `{raw}` (expected DRIVER|FLEET_OWNER)"))
}

fn parse_field_key(raw: &str) -> Result<FieldKey, String> {
    FieldKey::parse(raw).ok_or_else(|| {
        let known = FieldKey::ALL.map(|field| field.as_str()).join(", ");
        format!("unknown field `{raw}` (expected one of: {known})")
    })
}

fn parse_category(raw: &str) -> Result<AmbulanceCategory, String> {
    AmbulanceCategory::parse(raw)
        .ok_or_else(|| format!("unknown ambulance category `{raw}` (expected MFR|PTS|BLS|DBA|ALS)"))
}

fn init_logging(config: &AppConfig) {
    use kycdesk_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

pub async fn run() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::load(LoadOptions {
        config_path: cli.config.clone(),
        require_file: cli.config.is_some(),
        ..LoadOptions::default()
    }) {
        Ok(config) => config,
        Err(error) => {
            let result =
                commands::CommandResult::failure("config", "config_validation", error.to_string(), 2);
            println!("{}", result.output);
            return ExitCode::from(result.exit_code);
        }
    };
    init_logging(&config);

    let result = match cli.command {
        Command::List { registrant_type, page, page_size, search, date } => {
            commands::list::run(&config, registrant_type, page, page_size, search, date).await
        }
        Command::Show { id, field, registrant_type } => {
            commands::show::run(&config, registrant_type, &id, field).await
        }
        Command::Approve { id, field } => {
            commands::approval::run(&config, &id, field, ApprovalState::Accepted, None).await
        }
        Command::Decline { id, field, remark } => {
            commands::approval::run(&config, &id, field, ApprovalState::Declined, Some(remark)).await
        }
        Command::Hold { id, field } => {
            commands::approval::run(&config, &id, field, ApprovalState::Pending, None).await
        }
        Command::SetCategory { vehicle_id, category } => {
            commands::category::run(&config, &vehicle_id, category).await
        }
        Command::SetAddress { id, address } => {
            commands::address::run(&config, &id, &address).await
        }
        Command::Config => commands::CommandResult {
            exit_code: 0,
            output: commands::config::run(cli.config.as_deref()),
        },
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
