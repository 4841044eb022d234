//! CLI argument definitions.

use clap::{Args, Parser, Subcommand};

/// Livestock records - drug-withdrawal tracking for a farm
#[derive(Parser, Debug)]
#[command(name = "livestock")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// SQLite database path (in-memory when unset)
    #[arg(long, global = true, env = "LIVESTOCK_DB")]
    pub db: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show withdrawal status
    Status(StatusArgs),

    /// List treatments still in withdrawal
    Alerts(ReportArgs),

    /// Show the herd dashboard
    Dashboard(ReportArgs),

    /// Suggest a drug for a diagnosis
    Recommend(RecommendArgs),

    /// Sign in and remember the session
    Login(LoginArgs),

    /// Forget the stored session
    Logout,

    /// Record a treatment as the signed-in veterinarian
    Treat(TreatArgs),
}

/// Evaluation time and output format shared by read commands
#[derive(Args, Debug, Clone, Default)]
pub struct ReportArgs {
    /// Evaluate as of this instant (RFC 3339 or YYYY-MM-DD) instead of now
    #[arg(long)]
    pub at: Option<String>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Animal ID (all animals when omitted)
    pub animal_id: Option<String>,

    #[command(flatten)]
    pub report: ReportArgs,
}

/// Arguments for the recommend command
#[derive(Args, Debug)]
pub struct RecommendArgs {
    /// Free-text diagnosis
    #[arg(required = true, num_args = 1..)]
    pub diagnosis: Vec<String>,
}

/// Arguments for the login command
#[derive(Args, Debug)]
pub struct LoginArgs {
    pub email: String,

    #[arg(env = "LIVESTOCK_PASSWORD", hide_env_values = true)]
    pub password: String,
}

/// Arguments for the treat command
#[derive(Args, Debug)]
pub struct TreatArgs {
    /// Animal ID
    #[arg(long)]
    pub animal: String,

    /// Drug ID
    #[arg(long)]
    pub drug: String,

    #[arg(long)]
    pub diagnosis: String,

    /// Dosage as administered (e.g., "5ml intramuscular")
    #[arg(long)]
    pub dosage: String,

    /// Symptom report this treatment answers
    #[arg(long)]
    pub report: Option<String>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}
