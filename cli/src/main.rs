//! Command-line entry point for the users API client.
//!
//! # Usage
//!
//! ```bash
//! # Open tasks for user 1 (no subcommand)
//! users-client
//!
//! # Against a local mock server
//! USERS_API_BASE_URL=http://127.0.0.1:3000 users-client get 1
//!
//! # Write comments of user 3's newest post into ./out
//! users-client --output-dir out save-comments 3
//! ```
//!
//! Command output goes to stdout. Logs go to stderr, filtered by `RUST_LOG`.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;
use users_core::{ApiResponse, ClientConfig, UsersClient, DEFAULT_BASE_URL};

/// User whose open tasks are printed when no subcommand is given.
const DEFAULT_USER_ID: u64 = 1;

/// Client for a JSONPlaceholder-style users API.
#[derive(Parser, Debug)]
#[command(name = "users-client")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// API root; the users collection is `{base_url}/users`
    #[arg(long, env = "USERS_API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Directory that receives saved comment files
    #[arg(long, env = "USERS_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// List all users
    List,
    /// Fetch one user by id
    Get { id: u64 },
    /// Look a user up by username (sent unescaped)
    Find { username: String },
    /// Create a user from a JSON document
    Create { json: String },
    /// Replace a user with a JSON document
    Update { id: u64, json: String },
    /// Delete a user and print the response status
    Delete { id: u64 },
    /// Print the user's incomplete todos as a JSON array
    OpenTasks {
        #[arg(default_value_t = DEFAULT_USER_ID)]
        user_id: u64,
    },
    /// Save the comments of the user's newest post to a file
    SaveComments { user_id: u64 },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_tracing();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::FAILURE
        }
    }
}

fn setup_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ClientConfig::new(cli.base_url).with_output_dir(cli.output_dir);
    let client = UsersClient::new(&config);

    match cli.command.unwrap_or(Command::OpenTasks {
        user_id: DEFAULT_USER_ID,
    }) {
        Command::List => print_body(client.list_users().context("listing users")?),
        Command::Get { id } => {
            print_body(client.get_user(id).with_context(|| format!("fetching user {id}"))?)
        }
        Command::Find { username } => print_body(
            client
                .find_user_by_username(&username)
                .with_context(|| format!("looking up username {username}"))?,
        ),
        Command::Create { json } => print_body(client.create_user(&json).context("creating user")?),
        Command::Update { id, json } => print_body(
            client
                .update_user(id, &json)
                .with_context(|| format!("updating user {id}"))?,
        ),
        Command::Delete { id } => {
            let status = client
                .delete_user(id)
                .with_context(|| format!("deleting user {id}"))?;
            println!("{status}");
        }
        Command::OpenTasks { user_id } => {
            let open = client
                .open_tasks(user_id)
                .with_context(|| format!("fetching open tasks for user {user_id}"))?;
            println!("Open tasks for user with ID {user_id}:");
            println!("{open}");
        }
        Command::SaveComments { user_id } => {
            let saved = client
                .save_last_post_comments(user_id)
                .with_context(|| format!("saving last post comments for user {user_id}"))?;
            println!("Comments saved to {}", saved.path.display());
        }
    }

    Ok(())
}

fn print_body(response: ApiResponse) {
    if !response.is_success() {
        warn!(status = response.status, "server returned a non-success status");
    }
    println!("{}", response.body);
}
