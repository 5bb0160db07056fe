//! CLI command definitions and dispatch for the `postboard` binary.
//!
//! Uses clap derive macros for argument parsing. The CLI follows a verb-noun
//! pattern (e.g., `postboard create user`, `postboard list posts`).

pub mod contact;
pub mod post;
pub mod user;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use postboard_types::user::Caller;

use crate::state::AppState;

/// Run and administer a Postboard blog backend.
#[derive(Parser)]
#[command(name = "postboard", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// API token identifying who runs admin commands.
    #[arg(long, global = true, env = "POSTBOARD_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new resource.
    Create {
        #[command(subcommand)]
        resource: CreateResource,
    },

    /// List resources.
    #[command(alias = "ls")]
    List {
        #[command(subcommand)]
        resource: ListResource,
    },

    /// Show details of a post.
    Show {
        /// Post id.
        id: i64,
    },

    /// Delete a resource.
    #[command(alias = "rm")]
    Delete {
        #[command(subcommand)]
        resource: DeleteResource,
    },

    /// Start the REST API server.
    Serve {
        /// Port to listen on (defaults to `port` in config.toml).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (defaults to `host` in config.toml).
        #[arg(long)]
        host: Option<String>,

        /// Export spans through OpenTelemetry (stdout).
        #[arg(long)]
        otel: bool,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum CreateResource {
    /// Register a user and print their API token.
    User {
        username: String,

        #[arg(long)]
        email: String,

        /// Grant the admin role.
        #[arg(long)]
        admin: bool,
    },
}

#[derive(Subcommand)]
pub enum ListResource {
    /// List posts (paginated when both --skip and --take are given).
    Posts {
        #[arg(long)]
        skip: Option<i64>,

        #[arg(long)]
        take: Option<i64>,

        /// Start from this post id.
        #[arg(long)]
        cursor: Option<i64>,

        /// Case-insensitive match on title or body.
        #[arg(long)]
        filter: Option<String>,

        /// Sort key: createdAt, activity or score.
        #[arg(long)]
        sort: Option<String>,

        /// Sort order: asc or desc.
        #[arg(long)]
        order: Option<String>,

        /// Only posts by this username.
        #[arg(long)]
        author: Option<String>,
    },

    /// List registered users.
    Users,

    /// List contact requests (admin token required).
    Contacts,
}

#[derive(Subcommand)]
pub enum DeleteResource {
    /// Delete a post (owner or admin token required).
    Post { id: i64 },

    /// Delete a contact request (admin token required).
    Contact { id: i64 },
}

/// Resolve `--token` / `POSTBOARD_TOKEN` into a caller.
pub async fn resolve_caller(state: &AppState, token: Option<&str>) -> anyhow::Result<Caller> {
    let Some(token) = token else {
        return Ok(Caller::Anonymous);
    };

    match state.user_service.authenticate(token).await? {
        Some(user) => Ok(Caller::from(&user)),
        None => anyhow::bail!("the provided token does not belong to any user"),
    }
}
