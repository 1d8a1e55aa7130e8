use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

/// Retorica: topic modeling for legislative speech transcripts.
///
/// Builds a document-term matrix from a speech file, fits the
/// expressed-agenda von-Mises-Fisher model through R, and writes
/// per-author topic emphasis tables. Finished runs are loaded into a
/// SQLite store for the dashboard.
#[derive(Parser)]
#[command(name = "retorica", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database
    Init,

    /// Run the topic model over a speech file
    Model {
        /// Line-delimited JSON speech file, pre-sorted by author
        docsfile: PathBuf,

        /// Minimum document frequency for cuts (fraction of documents)
        #[arg(long, default_value = "0.0")]
        mindf: f64,

        /// Maximum document frequency for cuts (1.0 = no upper cutoff)
        #[arg(long, default_value = "1.0")]
        maxdf: f64,

        /// Number of topic categories to fit
        #[arg(long, default_value = "70")]
        ncats: usize,

        /// Concentration parameter of the von-Mises-Fisher components
        #[arg(long, default_value = "400.0")]
        kappa: f64,

        /// Ask the fitting routine for per-iteration output
        #[arg(long)]
        verbose: bool,

        /// Directory for the output artifacts; created if missing.
        /// Defaults to ./vonmon/<timestamp>.
        #[arg(short = 'o', long)]
        output_directory: Option<PathBuf>,
    },

    /// Load a finished run's result and topics CSVs into the store
    Load {
        /// result.csv from a model run
        result_file: PathBuf,

        /// Topics CSV: title followed by the topic's words, one row per
        /// topic, in words.csv row order
        topics_file: PathBuf,

        /// Dashboard title
        #[arg(short, long)]
        title: String,
    },

    /// Show store status (DB size, record counts)
    Status,
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("retorica=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            info!("Initializing Retorica database...");
            let config = retorica::config::Config::load()?;
            let conn = retorica::db::initialize(&config.db_path)?;
            let table_count = retorica::db::schema::table_count(&conn)?;
            println!("Database initialized at: {}", config.db_path);
            println!("Tables created: {table_count}");
            println!("\nNext: run `retorica model <docsfile>`, then `retorica load`.");
        }

        Commands::Model {
            docsfile,
            mindf,
            maxdf,
            ncats,
            kappa,
            verbose,
            output_directory,
        } => {
            let config = retorica::config::Config::load()?;
            config.require_vonmon()?;

            let output_dir = output_directory.unwrap_or_else(|| {
                PathBuf::from("vonmon").join(retorica::output::run_dir_slug())
            });

            let args = retorica::pipeline::vonmon::ModelArgs {
                docsfile,
                mindf: mindf.clamp(0.0, 1.0),
                maxdf: maxdf.clamp(0.0, 1.0),
                ncats,
                kappa,
                verbose,
                output_dir: output_dir.clone(),
            };

            // The R backend keeps its handoff files and the saved .rds
            // next to the run's other artifacts.
            let fitter = retorica::model::rscript::RScriptFitter::new(
                &config.rscript_bin,
                &config.vonmon_script,
                &output_dir.join("rdata"),
            );

            let summary = retorica::pipeline::vonmon::run(&fitter, &args)?;
            retorica::output::terminal::display_run_summary(&summary);
        }

        Commands::Load {
            result_file,
            topics_file,
            title,
        } => {
            let config = retorica::config::Config::load()?;
            let conn = retorica::db::open(&config.db_path)?;

            let summary = retorica::loader::run(&conn, &title, &result_file, &topics_file)?;
            retorica::output::terminal::display_load_summary(&summary);
        }

        Commands::Status => {
            let config = retorica::config::Config::load()?;
            if !std::path::Path::new(&config.db_path).exists() {
                println!("Database: not initialized");
                println!("\nRun `retorica init` to set up the database.");
                return Ok(());
            }
            let conn = retorica::db::open(&config.db_path)?;
            retorica::status::show(&conn, &config.db_path)?;
        }
    }

    Ok(())
}
