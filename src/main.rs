use anyhow::Result;
use clap::{CommandFactory, Parser};
use std::path::{Path, PathBuf};

use brandprofiler::checkpoint::{CheckpointStore, JsonCheckpointStore, SlugState};
use brandprofiler::cli::{Cli, Commands};
use brandprofiler::config::AppConfig;
use brandprofiler::leads::{self, BusinessRecord};
use brandprofiler::logger::{BatchLogger, VerbosityLevel};
use brandprofiler::pipeline::{eligible_for_all, Orchestrator};
use brandprofiler::slug::generate_slug;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                match cli.verbose {
                    0 => "warn",
                    1 => "info",
                    _ => "debug",
                }
                .into()
            }),
        )
        .init();

    if cli.init {
        let path = AppConfig::create_default_config()?;
        println!("Created default configuration at {}", path.display());
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => AppConfig::load_from_path(Path::new(path))?,
        None => {
            // Offer to materialize the default config on interactive runs;
            // declining (or a non-TTY stdin) falls back to the embedded
            // defaults inside load()
            if !Path::new(brandprofiler::config::CONFIG_PATH).exists() {
                if let Some(path) = AppConfig::prompt_create_config()? {
                    println!("Created {}", path.display());
                }
            }
            AppConfig::load()?
        }
    };

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let leads = leads::load_leads(Path::new(&cli.input))?;
    let output_dir = PathBuf::from(&cli.output_dir);
    let store = JsonCheckpointStore::new(&output_dir);
    let logger = BatchLogger::new(VerbosityLevel::from_verbose_count(cli.verbose));

    match command {
        Commands::List => list_leads(&leads, &store, &output_dir),

        Commands::Generate { name } => {
            run_single(&leads, &name, false, config, store, output_dir, logger).await
        }

        Commands::Reset { name } => {
            run_single(&leads, &name, true, config, store, output_dir, logger).await
        }

        Commands::All { min_rating } => {
            let floor = min_rating.unwrap_or(config.batch.min_rating);
            let worthy = eligible_for_all(&leads, floor);
            let worthy_count = worthy.len();
            let progress = store.load()?;
            let pending: Vec<BusinessRecord> = worthy
                .into_iter()
                .filter(|lead| !progress.is_completed(&generate_slug(&lead.name)))
                .collect();
            println!(
                "{} companies to process ({} already done)",
                pending.len(),
                worthy_count - pending.len()
            );

            let orchestrator = Orchestrator::new(config, Box::new(store), output_dir, logger)?;
            orchestrator.run(&pending, false).await?;
            Ok(())
        }
    }
}

async fn run_single(
    leads: &[BusinessRecord],
    query: &str,
    force: bool,
    config: AppConfig,
    store: JsonCheckpointStore,
    output_dir: PathBuf,
    logger: BatchLogger,
) -> Result<()> {
    let Some(lead) = leads::find_lead(leads, query) else {
        anyhow::bail!(
            "Company \"{}\" not found in the lead sheet. Run `brandprofiler list` to see all companies.",
            query
        );
    };

    let orchestrator = Orchestrator::new(config, Box::new(store), output_dir, logger)?;
    orchestrator.run(std::slice::from_ref(lead), force).await?;
    Ok(())
}

fn list_leads(
    leads: &[BusinessRecord],
    store: &JsonCheckpointStore,
    output_dir: &Path,
) -> Result<()> {
    let progress = store.load()?;

    println!("\nCompanies in lead sheet:\n");
    for lead in leads {
        let slug = generate_slug(&lead.name);
        let artifact = output_dir.join(format!("{}.toml", slug));
        let status = match progress.state(&slug) {
            SlugState::Completed => "done",
            SlugState::Failed => "fail",
            SlugState::Pending if artifact.exists() => "file",
            SlugState::Pending => "pend",
        };
        let web = if lead.website.is_some() { "web" } else { "   " };
        let rating = lead
            .rating
            .map(|r| format!("{:.1}", r))
            .unwrap_or_else(|| "   ".to_string());
        println!(
            "  [{}] [{}] {:>4}  {:<45} ({})",
            status, web, rating, lead.name, slug
        );
    }
    println!("\nTotal: {} companies", leads.len());
    println!("Status: done = completed, fail = failed, file = profile exists, pend = pending");
    Ok(())
}
