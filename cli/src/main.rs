use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod util;

#[derive(Parser)]
#[command(
    name = "garden",
    version,
    about = "Virtual Garden CLI: send synthesised voice-platform events to a running skill service"
)]
struct Cli {
    /// Skill service base URL
    #[arg(long, env = "GARDEN_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    /// Application id to put in the event (must match the service's GARDEN_SKILL_ID)
    #[arg(long, env = "GARDEN_SKILL_ID")]
    skill_id: Option<String>,

    /// Platform user id; the last dot-separated part becomes the garden key
    #[arg(long, env = "GARDEN_USER_ID", default_value = commands::invoke::DEFAULT_USER_ID)]
    user_id: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check service health (includes the plant service ping)
    Health,
    /// Open the skill without a question, like "open virtual garden"
    Launch,
    /// Send one intent
    Ask(commands::invoke::AskArgs),
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "garden=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let code = match cli.command {
        Commands::Health => commands::health::run(&cli.api_url).await,
        Commands::Launch => {
            let target = commands::invoke::Target::new(&cli.api_url, cli.skill_id, &cli.user_id);
            commands::invoke::launch(&target).await
        }
        Commands::Ask(args) => {
            let target = commands::invoke::Target::new(&cli.api_url, cli.skill_id, &cli.user_id);
            commands::invoke::ask(&target, args).await
        }
    };

    std::process::exit(code);
}
