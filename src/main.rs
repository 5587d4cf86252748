use clap::Parser;

mod cli;
mod commands;
mod domain;
mod error;
mod platform;
mod services;

use cli::{Cli, Commands};
use commands::{handle_guild_commands, handle_santa_commands};
use domain::models::GroupId;
use platform::local::LocalGuild;
use services::config::load_config;
use services::output::print_err;
use services::storage::{load_guild, save_guild};

fn init_tracing(default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = load_config()?;
    init_tracing(&config.general.log_filter);

    let guild = LocalGuild::new(
        GroupId(cli.guild.clone()),
        &config.general.role_name,
        load_guild(&cli.guild)?,
    );

    let outcome = match &cli.command {
        Commands::Guild { command } => handle_guild_commands(cli, command, &guild),
        Commands::Santa(command) => {
            handle_santa_commands(cli, command, &config.general, &guild).await
        }
    };

    // Messages already handed to the platform stay delivered even when the
    // command itself failed.
    if let Some(state) = guild.state() {
        save_guild(&state)?;
    }
    outcome
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(&cli).await {
        print_err(cli.json, error::error_code(&err), &err);
        std::process::exit(1);
    }
}
