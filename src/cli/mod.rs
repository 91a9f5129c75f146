pub mod auth;
pub mod groups;
pub mod lights;
pub mod output;
pub mod scenes;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "huec",
    version,
    about = "Hue bridge CLI - control lights, groups, and scenes"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Bridge IP address (overrides stored credentials)
    #[arg(short = 'b', long = "bridge", global = true, env = "HUEC_BRIDGE")]
    pub bridge: Option<String>,

    /// Bridge API username (overrides stored credentials)
    #[arg(short = 'u', long = "user", global = true, env = "HUEC_USER")]
    pub user: Option<String>,

    /// Output as human-readable table instead of JSON
    #[arg(short = 't', long = "table", global = true)]
    pub table: bool,

    /// Verbose output (show HTTP requests/responses)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Pair with a bridge and store the issued username
    Authorize {
        /// Bridge IP address
        ip: Option<String>,

        /// Ask the bridge to issue this specific username
        #[arg(long)]
        username: Option<String>,

        /// Skip the link-button confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Show stored bridge credentials
    Status,

    /// Clear stored bridge credentials
    Forget,

    /// Inspect and control lights
    #[command(subcommand)]
    Lights(lights::LightsCommand),

    /// Inspect and control groups
    #[command(subcommand)]
    Groups(groups::GroupsCommand),

    /// Inspect stored scenes
    #[command(subcommand)]
    Scenes(scenes::ScenesCommand),
}
