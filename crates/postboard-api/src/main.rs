//! Postboard CLI and REST API entry point.
//!
//! Binary name: `postboard`
//!
//! Every command opens the data directory first; `serve` then hands the
//! same state to the HTTP router.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::post::ListPostsArgs;
use cli::{Cli, Commands, CreateResource, DeleteResource, ListResource};
use postboard_infra::config::resolve_data_dir;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Completions are generated without touching the database
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "postboard", &mut std::io::stdout());
        return Ok(());
    }

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn,postboard=info",
        1 => "info,postboard=debug,postboard_core=debug",
        _ => "trace",
    };

    let state = AppState::init(resolve_data_dir()).await?;

    let otel = state.config.otel || matches!(cli.command, Commands::Serve { otel: true, .. });
    postboard_observe::init_tracing(filter, otel).map_err(|e| anyhow::anyhow!(e))?;
    tracing::debug!(data_dir = %state.data_dir.display(), "state initialized");

    let result = run(cli, state).await;
    postboard_observe::shutdown_tracing();
    result
}

async fn run(cli: Cli, state: AppState) -> anyhow::Result<()> {
    match cli.command {
        Commands::Create { resource } => match resource {
            CreateResource::User {
                username,
                email,
                admin,
            } => {
                cli::user::create_user(&state, username, email, admin, cli.json).await?;
            }
        },

        Commands::List { resource } => match resource {
            ListResource::Posts {
                skip,
                take,
                cursor,
                filter,
                sort,
                order,
                author,
            } => {
                let args = ListPostsArgs {
                    skip,
                    take,
                    cursor,
                    filter,
                    sort,
                    order,
                    author,
                };
                cli::post::list_posts(&state, args, cli.json).await?;
            }
            ListResource::Users => {
                cli::user::list_users(&state, cli.json).await?;
            }
            ListResource::Contacts => {
                let caller = cli::resolve_caller(&state, cli.token.as_deref()).await?;
                cli::contact::list_contacts(&state, &caller, cli.json).await?;
            }
        },

        Commands::Show { id } => {
            cli::post::show_post(&state, id, cli.json).await?;
        }

        Commands::Delete { resource } => {
            let caller = cli::resolve_caller(&state, cli.token.as_deref()).await?;
            match resource {
                DeleteResource::Post { id } => {
                    cli::post::delete_post(&state, &caller, id, cli.json).await?;
                }
                DeleteResource::Contact { id } => {
                    cli::contact::delete_contact(&state, &caller, id, cli.json).await?;
                }
            }
        }

        Commands::Serve { port, host, .. } => {
            let host = host.unwrap_or_else(|| state.config.host.clone());
            let port = port.unwrap_or(state.config.port);
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            if !cli.quiet {
                println!(
                    "  {} Postboard API listening on {}",
                    console::style("⚡").bold(),
                    console::style(format!("http://{addr}")).cyan()
                );
                println!("  {}", console::style("Press Ctrl+C to stop").dim());
            }
            tracing::info!(%addr, "server started");

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            tracing::info!("server stopped");
        }

        Commands::Completions { .. } => unreachable!("handled in main"),
    }

    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
