//! Campaign Cleaner CLI - split zipped campaign extracts into clean tables
//!
//! # Main Command
//!
//! ```bash
//! campaign-cleaner clean                          # files/input -> files/output
//! campaign-cleaner clean -i data/in -o data/out   # explicit directories
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! campaign-cleaner inspect part.csv.zip   # Parse one archive to JSON
//! campaign-cleaner validate part.csv.zip  # Check one archive against the raw schema
//! campaign-cleaner rules                  # Show the built-in cleaning rules
//! ```

use clap::{Parser, Subcommand};
use campaign_cleaner::{
    archive_records, clean_campaign_data, logs, operations_description, read_archive,
    CleanOptions, CleaningRules, RawRecordValidator,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "campaign-cleaner")]
#[command(about = "Split zipped bank-marketing extracts into client, campaign and economics tables", long_about = None)]
struct Cli {
    /// Debug-level logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full cleaning pipeline
    Clean {
        /// Directory holding the zipped extracts
        #[arg(short, long)]
        input_dir: Option<PathBuf>,

        /// Directory receiving the three CSV tables
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Archive file name pattern
        #[arg(short, long)]
        pattern: Option<String>,

        /// JSON rules file replacing the built-in rules
        #[arg(short, long)]
        rules: Option<PathBuf>,
    },

    /// Parse one archive and output its rows as JSON
    Inspect {
        /// Input archive
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate one archive against the raw record schema
    Validate {
        /// Input archive
        input: PathBuf,
    },

    /// Show the built-in cleaning rules
    Rules {
        /// Also describe the available operations
        #[arg(long)]
        describe: bool,
    },
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logs::init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Clean {
            input_dir,
            output_dir,
            pattern,
            rules,
        } => cmd_clean(input_dir, output_dir, pattern, rules),

        Commands::Inspect { input, output } => cmd_inspect(&input, output.as_deref()),

        Commands::Validate { input } => cmd_validate(&input),

        Commands::Rules { describe } => cmd_rules(describe),
    };

    if let Err(e) = result {
        logs::log_error(e.to_string());
        std::process::exit(1);
    }
}

fn cmd_clean(
    input_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    pattern: Option<String>,
    rules: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = CleanOptions::from_env();
    if let Some(dir) = input_dir {
        options.input_dir = dir;
    }
    if let Some(dir) = output_dir {
        options.output_dir = dir;
    }
    if let Some(p) = pattern {
        options.pattern = p;
    }
    if rules.is_some() {
        options.rules_path = rules;
    }

    let summary = clean_campaign_data(&options)?;

    eprintln!("Archives: {}", summary.archives.len());
    eprintln!("Rows:     {}", summary.rows);
    eprintln!("Client:   {}", summary.client_path.display());
    eprintln!("Campaign: {}", summary.campaign_path.display());
    eprintln!("Economics: {}", summary.economics_path.display());
    Ok(())
}

fn cmd_inspect(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let contents = read_archive(input)?;
    let parsed = &contents.parsed;

    eprintln!("Member: {}", contents.member);
    eprintln!("   Encoding: {}", parsed.encoding);
    eprintln!("   Delimiter: '{}'", format_delimiter(parsed.delimiter));
    eprintln!("   Columns: {}", parsed.headers.join(", "));
    eprintln!("Parsed {} records", parsed.records.len());

    let json = serde_json::to_string_pretty(&parsed.records)?;
    write_output(&json, output)?;
    Ok(())
}

fn cmd_validate(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let contents = read_archive(input)?;
    let validator = RawRecordValidator::new()?;

    let records = archive_records(&contents, &validator)?;
    eprintln!(
        "{}: {} records match the raw schema",
        contents.source_name,
        records.len()
    );
    Ok(())
}

fn cmd_rules(describe: bool) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", CleaningRules::default().to_json()?);
    if describe {
        println!();
        println!("{}", operations_description());
    }
    Ok(())
}

fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
