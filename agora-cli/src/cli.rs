use std::path::PathBuf;

use agora_client::PostId;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "agora",
    about = "Agora - terminal client for the Agora social service",
    version = env!("CARGO_PKG_VERSION"),
    author,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, env = "AGORA_URL", default_value = "http://127.0.0.1:8000")]
    pub url: String,

    #[arg(long, global = true, env = "AGORA_DATA_DIR", help = "Where the session is kept [default: ~/.agora]")]
    pub data_dir: Option<PathBuf>,

    #[arg(long, global = true, env = "AGORA_TIMEOUT_SECS", default_value = "30")]
    pub timeout: u64,

    #[arg(short, long, global = true, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Sign in and remember the session")]
    Login {
        #[arg(help = "Account email")]
        email: String,

        #[arg(long, env = "AGORA_PASSWORD", hide_env_values = true)]
        password: String,
    },

    #[command(about = "Create an account")]
    Signup {
        #[arg(long, help = "Full name")]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long, env = "AGORA_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long, help = "Repeat the password [default: same as --password]")]
        confirm_password: Option<String>,

        #[arg(long, help = "Date of birth (YYYY-MM-DD)")]
        dob: Option<NaiveDate>,

        #[arg(long, help = "Path to a profile picture")]
        picture: Option<PathBuf>,
    },

    #[command(about = "Forget the saved session")]
    Logout,

    #[command(subcommand, about = "View or edit your profile")]
    Profile(ProfileCommands),

    #[command(about = "Show the feed")]
    Feed {
        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Publish a post")]
    Post {
        #[arg(help = "Post text")]
        text: Option<String>,

        #[arg(short, long, help = "Path to an image to attach")]
        image: Option<PathBuf>,
    },

    #[command(about = "Delete one of your posts")]
    Delete {
        #[arg(help = "Post ID")]
        id: PostId,
    },

    #[command(about = "Like a post, or take the like back")]
    Like {
        #[arg(help = "Post ID")]
        id: PostId,
    },

    #[command(about = "Dislike a post, or take the dislike back")]
    Dislike {
        #[arg(help = "Post ID")]
        id: PostId,
    },
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    #[command(about = "Show your profile")]
    Show {
        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Change profile fields; omitted fields keep their value")]
    Edit {
        #[arg(long, help = "Full name")]
        name: Option<String>,

        #[arg(long, help = "Date of birth (YYYY-MM-DD)")]
        dob: Option<NaiveDate>,

        #[arg(long, help = "Path to a new profile picture")]
        picture: Option<PathBuf>,
    },
}
