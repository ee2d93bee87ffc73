use clap::{Parser, Subcommand};
use puzzlers_types::{Difficulty, UserRole};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "puzzlers",
    about = "IEEE Puzzlers - API forwarder and admin CLI",
    version = env!("CARGO_PKG_VERSION"),
    author,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, global = true, help = "Path to config.json (default: <data dir>/config.json)")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Start the forwarding server (default if no command specified)")]
    Serve {
        #[arg(short, long, help = "Listen port (overrides config and PUZZLERS_PORT)")]
        port: Option<u16>,
    },

    #[command(about = "Log in and store the bearer token")]
    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long, env = "PUZZLERS_PASSWORD", hide_env_values = true)]
        password: String,
    },

    #[command(about = "Forget the stored token")]
    Logout,

    #[command(about = "Show the current session")]
    Whoami {
        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(subcommand, about = "Manage user accounts (Admin only)")]
    Users(UserCommands),

    #[command(subcommand, about = "List, create and delete puzzles")]
    Puzzles(PuzzleCommands),

    #[command(subcommand, about = "View configuration")]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "List all users")]
    List {
        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Register a new user")]
    Register {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        password: String,

        #[arg(short, long, help = "PUZZLE_CREATOR or Admin")]
        role: UserRole,
    },

    #[command(about = "Delete a user")]
    Delete {
        #[arg(help = "User ID")]
        id: String,
    },
}

#[derive(Subcommand)]
pub enum PuzzleCommands {
    #[command(about = "List puzzles")]
    List {
        #[arg(long, conflicts_with = "creator", help = "Only puzzles created by the logged-in user")]
        mine: bool,

        #[arg(long, help = "Only puzzles created by this user ID")]
        creator: Option<String>,

        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Create a puzzle (PUZZLE_CREATOR only)")]
    Create {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        solution: String,

        #[arg(short, long, default_value = "easy", help = "easy, medium or hard")]
        difficulty: Difficulty,

        #[arg(short, long, help = "Path to an image file")]
        image: Option<PathBuf>,
    },

    #[command(about = "Delete a puzzle (PUZZLE_CREATOR only)")]
    Delete {
        #[arg(help = "Puzzle ID")]
        id: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    #[command(about = "Show the effective configuration")]
    Show {
        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Write the effective configuration to the config file")]
    Init {
        #[arg(short, long, help = "Overwrite an existing file")]
        force: bool,
    },
}
