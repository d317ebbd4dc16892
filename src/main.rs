use clap::{Parser, Subcommand};
use std::path::PathBuf;
use volunteer_scheduler::{
    ObjectiveStrategy, SchedulerConfig, SchedulingInput, ShiftCatalog, export, ingest, report,
    server, solver,
};

#[derive(Parser, Debug)]
#[command(name = "volunteer-scheduler", version, about = "Assign volunteers to weekly shifts")]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Solve a schedule from CSV files
    Solve {
        #[arg(long)]
        volunteers: PathBuf,
        #[arg(long)]
        groups: Option<PathBuf>,
        /// Directory for the CSV exports
        #[arg(long, default_value = "exported_files")]
        out_dir: PathBuf,
        #[arg(long)]
        strategy: Option<ObjectiveStrategy>,
        /// Print the result as JSON instead of the text report
        #[arg(long)]
        json: bool,
    },
    /// Serve the HTTP API
    Serve {
        #[arg(long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Cli::parse()).await {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> volunteer_scheduler::Result<()> {
    let mut config = SchedulerConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Solve {
            volunteers,
            groups,
            out_dir,
            strategy,
            json,
        } => {
            if let Some(strategy) = strategy {
                config.objective.strategy = strategy;
            }
            let catalog = ShiftCatalog::from_rotation(&config.rotation);
            let input = SchedulingInput {
                volunteers: ingest::read_volunteers_csv(&volunteers, &catalog)?,
                groups: match groups {
                    Some(path) => ingest::read_groups_csv(&path)?,
                    None => Vec::new(),
                },
                rotation: None,
                objective: None,
            };

            let output = tokio::task::block_in_place(|| solver::solve(&input, &config))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                report::print_report(&output);
            }
            export::export_schedules(&output, &out_dir)?;
        }
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            server::run_server(config).await?;
        }
    }
    Ok(())
}
