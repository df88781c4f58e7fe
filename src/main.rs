use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::{error, info};

use scriptref_scraper_lib::delay_manager::MAX_DELAY_SECS;
use scriptref_scraper_lib::{
    input_loader, logger, reprocess_all, toc, Config, DelayRange, DocsFetcher, Error, Extractor,
    Pipeline,
};

#[derive(Parser)]
#[command(
    name = "scriptref_scraper",
    about = "Scrape script-reference pages and build an indexable text dump"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Root of the documentation site
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Directory for batch_NNN.json files
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Directory for per-class text documents
    #[arg(long, global = true)]
    index_dir: Option<PathBuf>,

    /// Append-only log file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Newline-delimited list of classes to scrape
    #[arg(long, global = true)]
    class_list: Option<PathBuf>,

    /// Minimum seconds to wait after each fetch
    #[arg(long, global = true, value_parser = parse_delay)]
    min_delay: Option<f64>,

    /// Maximum seconds to wait after each fetch
    #[arg(long, global = true, value_parser = parse_delay)]
    max_delay: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the table of contents and write the class list
    Toc {
        /// Where to write the list (default: --class-list)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Fetch and parse every listed class, saving batch 001
    Scrape {
        /// Only scrape the first N classes
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Convert saved batches into one text document per class
    Reprocess,
}

impl Cli {
    fn config(&self) -> Config {
        let mut config = Config::default();
        if let Some(url) = &self.base_url {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(dir) = &self.index_dir {
            config.index_dir = dir.clone();
        }
        if let Some(file) = &self.log_file {
            config.log_file = file.clone();
        }
        if let Some(file) = &self.class_list {
            config.class_list = file.clone();
        }
        let min = self.min_delay.unwrap_or(config.delay.min_secs);
        let max = self.max_delay.unwrap_or(config.delay.max_secs);
        config.delay = DelayRange::new(min, max);
        config
    }
}

/// Seconds between 0 and [`MAX_DELAY_SECS`].
fn parse_delay(value: &str) -> Result<f64, String> {
    let secs: f64 = value.parse().map_err(|e| format!("not a number: {}", e))?;
    if !secs.is_finite() || !(0.0..=MAX_DELAY_SECS).contains(&secs) {
        return Err(format!("must be between 0 and {} seconds", MAX_DELAY_SECS));
    }
    Ok(secs)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = cli.config();
    logger::init(&config.log_file);

    let result = match cli.command {
        Commands::Toc { output } => {
            let output = output.unwrap_or_else(|| config.class_list.clone());
            toc::download_and_write(&config, &output).map(|count| {
                println!("Wrote {} classes to {}", count, output.display());
            })
        }
        Commands::Scrape { limit } => scrape(&config, limit),
        Commands::Reprocess => reprocess_all(&config.data_dir, &config.index_dir).map(|count| {
            println!("Processed {} classes into {}", count, config.index_dir.display());
        }),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn scrape(config: &Config, limit: Option<usize>) -> Result<(), Error> {
    let mut identifiers = match input_loader::load_identifiers(&config.class_list) {
        Ok(ids) => ids,
        Err(Error::MissingInput(path)) => {
            error!("Error: {} not found. Run the toc command first.", path.display());
            eprintln!("{} not found. Run the toc command first.", path.display());
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    if let Some(limit) = limit {
        identifiers.truncate(limit);
        info!("Scraping first {} classes", identifiers.len());
    }

    let fetcher = DocsFetcher::new(config)?;
    let pipeline = Pipeline::new(fetcher, Extractor::new(config.base_url.clone()));
    let (records, path) =
        pipeline.run_and_save(&identifiers, config.batch_size, &config.data_dir)?;

    println!(
        "Scraped {} out of {} classes into {}",
        records.len(),
        identifiers.len(),
        path.display()
    );
    Ok(())
}
