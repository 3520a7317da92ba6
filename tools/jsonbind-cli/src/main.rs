mod commands;
mod schema_file;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use commands::{decode::DecodeArgs, schema::SchemaArgs};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "jsonbind", about = "Decode JSON documents into schema-described records")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a JSON document and print the populated record
    Decode(DecodeArgs),
    /// Print the binding table of the schema's types
    Schema(SchemaArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Decode(args) => args.run(),
        Commands::Schema(args) => args.run(),
    }
}

/// `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
