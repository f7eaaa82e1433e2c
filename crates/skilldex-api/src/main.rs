//! Skilldex CLI and Slack webhook entry point.
//!
//! Binary name: `skdx`
//!
//! Parses CLI arguments, initializes the database and services, then
//! dispatches to the appropriate command handler or starts the webhook
//! server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,skilldex=debug",
        _ => "trace",
    };

    skilldex_observe::tracing_setup::init_tracing(filter, cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "skdx", &mut std::io::stdout());
        return Ok(());
    }

    // Initialize application state (DB, Slack client, services)
    let state = AppState::init().await?;

    match cli.command {
        Commands::Serve { port, host } => {
            let host = host.unwrap_or_else(|| state.config.host.clone());
            let port = port.unwrap_or(state.config.port);
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            println!(
                "  {} Skilldex listening on {}",
                console::style("⚡").bold(),
                console::style(format!("http://{addr}")).cyan()
            );
            println!("  {}", console::style("Press Ctrl+C to stop").dim());

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            println!("\n  Server stopped.");
        }

        Commands::Status => {
            cli::status::status(&state, cli.json).await?;
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    skilldex_observe::tracing_setup::shutdown_tracing();
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
