//! Command-line front end. Each subcommand drives one [`RecordsScreen`]
//! or the dashboard and returns the text to print.
//!
//! [`RecordsScreen`]: crate::screen::RecordsScreen

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};

use crate::records::{RecordKind, TimeWindow};

#[derive(Debug, Parser)]
#[command(name = "carelog")]
#[command(
    about = "Track medications, appointments, emergency contacts and daily activities",
    long_about = None
)]
pub struct Cli {
    /// Owner id to act as (falls back to CARELOG_OWNER, then saved settings)
    #[arg(long, global = true)]
    pub owner: Option<String>,

    /// Log progress to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show records grouped by day
    List {
        #[arg(value_enum)]
        kind: KindArg,

        /// Case-insensitive text to look for
        #[arg(short, long, default_value = "")]
        search: String,

        /// all, today or this-week (defaults to the saved setting)
        #[arg(short, long)]
        window: Option<TimeWindow>,
    },

    /// Add a record
    Add {
        #[command(subcommand)]
        record: AddCommand,
    },

    /// Delete a record after confirmation
    Delete {
        #[arg(value_enum)]
        kind: KindArg,

        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Recent records, upcoming appointments and insights
    Dashboard,

    /// Show or change saved settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    #[value(alias = "activities")]
    Activity,
    #[value(alias = "medications")]
    Medication,
    #[value(alias = "appointments")]
    Appointment,
    #[value(alias = "contacts")]
    Contact,
}

impl From<KindArg> for RecordKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Activity => RecordKind::Activity,
            KindArg::Medication => RecordKind::Medication,
            KindArg::Appointment => RecordKind::Appointment,
            KindArg::Contact => RecordKind::Contact,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum AddCommand {
    Activity {
        /// Exercise, Walking, Medication, Meal, Social, Appointment or Other
        #[arg(long = "type", value_name = "TYPE")]
        activity_type: String,

        #[arg(short, long)]
        description: String,

        /// When it was completed, e.g. 2024-03-10T09:30 (defaults to now)
        #[arg(long)]
        at: Option<String>,
    },
    Medication {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        dosage: String,

        /// First day, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        start: Option<String>,

        /// Last day, YYYY-MM-DD
        #[arg(long)]
        end: Option<String>,
    },
    Appointment {
        #[arg(short, long)]
        title: String,

        /// Date and time, e.g. 2024-03-15T10:00
        #[arg(long)]
        at: String,

        #[arg(short, long)]
        location: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },
    Contact {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        relationship: String,

        #[arg(short, long)]
        phone: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    Show,
    SetOwner {
        owner: String,
    },
    ClearOwner,
    SetWindow {
        window: TimeWindow,
    },
    /// Reload the list from the store after every add or delete
    SetRefetch {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
}
