//! Riffbox CLI
//!
//! Offline rendering and inspection for the Riffbox effects engine.

use clap::Parser;
use env_logger::Env;
use log::info;

use riffbox::cli::{commands, Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    info!("Riffbox v{}", env!("CARGO_PKG_VERSION"));

    let config = commands::load_config(cli.config.as_deref(), cli.sample_rate, cli.block_size)?;

    match cli.command {
        Commands::Render {
            input,
            output,
            preset,
            bits,
        } => commands::render(&config, &input, &output, preset.as_deref(), bits),
        Commands::Tone {
            frequency,
            seconds,
            amplitude,
            preset,
            output,
        } => commands::tone(
            &config,
            frequency,
            seconds,
            amplitude,
            preset.as_deref(),
            output.as_deref(),
        ),
        Commands::Tune {
            frequency,
            blocks,
            input,
        } => commands::tune(&config, frequency, blocks, input.as_deref()),
        Commands::Presets { name } => commands::presets(name.as_deref()),
        Commands::Params { effect } => commands::params(&config, effect.as_deref()),
    }
}
