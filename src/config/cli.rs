use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "school-portal")]
#[command(about = "Command line client for the school admissions backend")]
pub struct CliConfig {
    /// TOML configuration file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL, overrides the configuration file
    #[arg(long, global = true, env = "SCHOOL_PORTAL_BASE_URL")]
    pub base_url: Option<String>,

    /// Directory slips are written to, overrides the configuration file
    #[arg(long, global = true)]
    pub output: Option<String>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Log in and store the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "SCHOOL_PORTAL_PASSWORD")]
        password: String,
    },
    /// End the stored session
    Logout,
    /// List guardians, or show one with their students
    Guardians {
        #[arg(long, short = 's')]
        search: Option<String>,
        #[arg(long, conflicts_with = "search")]
        id: Option<String>,
    },
    /// List teachers
    Teachers {
        #[arg(long, short = 's')]
        search: Option<String>,
    },
    /// List registrations
    Registrations {
        #[arg(long, short = 's')]
        search: Option<String>,
    },
    /// Generate a roll number slip PDF
    Slip {
        #[arg(long, required_unless_present = "id")]
        roll_number: Option<String>,
        #[arg(long, conflicts_with = "roll_number")]
        id: Option<String>,
    },
    /// Upload a registration's profile picture
    UploadPhoto {
        #[arg(long)]
        id: String,
        file: PathBuf,
    },
    /// Upload an admission's payment attachment
    UploadPayment {
        #[arg(long)]
        id: String,
        file: PathBuf,
    },
    /// Send a message through the public contact form
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        message: String,
    },
    /// Check a phone number against the 03XX-XXXXXXX format
    CheckPhone { phone: String },
    /// Check an email address
    CheckEmail { email: String },
}
