use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::{io, process};
use tracing::error;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

use smartbudget::handlers;
use smartbudget::utils::config::EnvConfig;

#[derive(Parser)]
#[command(name = "smartbudget")]
#[command(about = "Budget statements and PromptPay payment codes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a PromptPay payload
    Qr(handlers::qr::QrArgs),

    /// Decode and verify a PromptPay payload
    Decode(handlers::decode::DecodeArgs),

    /// Render the monthly statement of a budget file
    Statement(handlers::statement::StatementArgs),

    /// Evaluate an amount expression
    Calc(handlers::calc::CalcArgs),
}

fn main() -> Result<(), anyhow::Error> {
    dotenv().ok();
    LogTracer::init().context("Unable to setup log tracer")?;

    let config = EnvConfig::init()?;

    // stdout carries payloads, logs go to stderr
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(io::stderr());
    let bunyan_formatting_layer =
        BunyanFormattingLayer::new(config.app_name.clone(), non_blocking_writer);
    let subscriber = Registry::default()
        .with(EnvFilter::new(&config.log_level))
        .with(JsonStorageLayer)
        .with(bunyan_formatting_layer);

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install `tracing` subscriber.")?;

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Qr(args) => handlers::qr::execute(&config, args),
        Commands::Decode(args) => handlers::decode::execute(args),
        Commands::Statement(args) => handlers::statement::execute(&config, args),
        Commands::Calc(args) => handlers::calc::execute(args),
    };

    if let Err(err) = result {
        error!("Command failed ===> {:#}", err);
        eprintln!("{err:#}");
        drop(guard);
        process::exit(1);
    }

    Ok(())
}
