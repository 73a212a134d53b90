use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "catalint",
    about = "Catalint: schema and business-rule checks over catalog JSON sources",
    version
)]
pub struct Cli {
    /// Content repository root to scan
    #[arg(long, global = true, default_value = ".")]
    pub root: String,

    /// Output directory (defaults to <root>/tools/catalint/out)
    #[arg(long, global = true)]
    pub out: Option<String>,

    /// Directory with rule-config overrides (suffix map, enums, schemas)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Discover, load, validate, and write reports
    Lint,

    /// Everything `lint` does, plus derived-field output
    Derive,

    /// The full pipeline with derived-field output
    All,

    /// Everything `lint` does, plus additive fix suggestions
    Fix,

    /// Fixed regression check over the known MAD sample kits
    Smoke,
}
