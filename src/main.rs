use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use handijobs::cli::{self, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "handijobs=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => cli::commands::init().await,
        Commands::Login { email, password } => cli::commands::login(&email, password).await,
        Commands::Register {
            email,
            first_name,
            last_name,
            role,
            company_name,
            accept_terms,
        } => {
            cli::commands::register(
                &email,
                &first_name,
                &last_name,
                role,
                company_name,
                accept_terms,
            )
            .await
        }
        Commands::Whoami { format } => cli::commands::whoami(format).await,
        Commands::Logout => cli::commands::logout().await,
        Commands::Refresh => cli::commands::refresh().await,
        Commands::Guard { role } => cli::commands::guard(role).await,
        Commands::Validate { form, file } => cli::commands::validate(form, &file).await,
        Commands::Prefs { action } => cli::commands::prefs(action).await,
    }
}
