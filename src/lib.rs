pub mod api;
pub mod auth;
pub mod bridge;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;

pub use bridge::{Bridge, BridgeOptions};
pub use error::AppError;
pub use models::attribute::NullWritePolicy;
pub use models::group::{Group, GroupState};
pub use models::light::Light;
pub use models::light_state::LightState;
pub use models::scene::Scene;

use cli::output::print_error;
use config::{OutputMode, RuntimeConfig};

pub async fn run(cli_args: cli::Cli) -> i32 {
    let config = RuntimeConfig {
        output_mode: if cli_args.table {
            OutputMode::Table
        } else {
            OutputMode::Json
        },
        verbose: cli_args.verbose,
        bridge: cli_args.bridge,
        user: cli_args.user,
    };

    let result = dispatch(cli_args.command, &config).await;

    match result {
        Ok(()) => 0,
        Err(err) => {
            print_error(&err);
            err.exit_code()
        }
    }
}

async fn dispatch(command: cli::Commands, config: &RuntimeConfig) -> Result<(), AppError> {
    match command {
        cli::Commands::Authorize { ip, username, yes } => {
            cli::auth::handle_authorize(ip.as_deref(), username.as_deref(), yes, config).await
        }
        cli::Commands::Status => cli::auth::handle_status(config).await,
        cli::Commands::Forget => cli::auth::handle_forget(config).await,
        cli::Commands::Lights(cmd) => cli::lights::handle(&cmd, config).await,
        cli::Commands::Groups(cmd) => cli::groups::handle(&cmd, config).await,
        cli::Commands::Scenes(cmd) => cli::scenes::handle(&cmd, config).await,
    }
}
