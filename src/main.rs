//! Bitcoin node adapter entry point.
//!
//! Loads the adapter configuration, bootstraps a client against the node and
//! runs a single adapter operation. Results are printed to stdout as JSON; logs
//! go to stderr or to a file.
//!
//! # Flow
//! 1. Applies CLI options to the logging environment
//! 2. Loads and validates `config/adapter.json` (or `--config`)
//! 3. Bootstraps the client (node reachable and past the minimum height)
//! 4. Runs the requested command and prints its result

use bitcoin_node_adapter::{
	bootstrap::{initialize_adapter, Result},
	models::{BlockIdentifier, DEFAULT_CONFIG_PATH},
	services::blockchain::{BitcoinClientTrait, BlockChainClient},
	utils::logging::setup_logging,
};

use clap::{Parser, Subcommand};
use dotenvy::dotenv_override;
use serde::Serialize;
use std::{
	env::{set_var, var},
	path::PathBuf,
};
use tracing::{error, instrument};

#[derive(Parser)]
#[command(
	name = "bitcoin-node-adapter",
	about = "Normalizes a Bitcoin Core node's blocks and transactions into canonical payment records.",
	version
)]
struct Cli {
	/// Path to the adapter configuration file
	#[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
	config: PathBuf,

	/// Write logs to file instead of stderr
	#[arg(long)]
	log_file: bool,

	/// Set log level (trace, debug, info, warn, error)
	#[arg(long, value_name = "LEVEL")]
	log_level: Option<String>,

	/// Path to store log files (default: logs/)
	#[arg(long, value_name = "PATH")]
	log_path: Option<String>,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Print the current chain height
	Height,
	/// Print a block by height or hash; integers above the minimum height are heights
	Block {
		#[arg(value_name = "ID")]
		identifier: String,
	},
	/// Print the block at a height
	BlockByHeight {
		#[arg(value_name = "HEIGHT")]
		height: u64,
	},
	/// Print the fee rate to use for a new transaction (BTC/kvB)
	Fee,
	/// Print the confirmations of a transaction (0 when unknown)
	Confirmations {
		#[arg(value_name = "TXID")]
		transaction_hash: String,
	},
	/// Broadcast a signed raw transaction and print its id
	Broadcast {
		#[arg(value_name = "HEX")]
		raw_transaction: String,
	},
}

impl Cli {
	/// Apply CLI options to environment variables, overriding any existing values
	fn apply_to_env(&self) {
		// Reload environment variables from .env file
		dotenv_override().ok();

		if self.log_file {
			set_var("LOG_MODE", "file");
		}

		if let Ok(level) = var("RUST_LOG") {
			set_var("LOG_LEVEL", level);
		}

		if let Some(level) = &self.log_level {
			set_var("LOG_LEVEL", level);
			set_var("RUST_LOG", level);
		}

		if let Some(path) = &self.log_path {
			set_var("LOG_DATA_DIR", path);
		}
	}
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
	println!("{}", serde_json::to_string_pretty(value)?);
	Ok(())
}

#[instrument(skip(cli), fields(command = ?cli.command))]
async fn run(cli: Cli) -> Result<()> {
	let client = initialize_adapter(Some(cli.config.as_path()), None).await?;

	match cli.command {
		Command::Height => print_json(&client.get_latest_block_number().await?),
		Command::Block { identifier } => {
			let identifier = BlockIdentifier::parse(&identifier, client.config().minimum_height);
			print_json(&client.get_block(&identifier).await?)
		}
		Command::BlockByHeight { height } => print_json(&client.get_block_by_height(height).await?),
		Command::Fee => print_json(&client.estimate_fee().await?),
		Command::Confirmations { transaction_hash } => {
			print_json(&client.get_confirmations(&transaction_hash).await?)
		}
		Command::Broadcast { raw_transaction } => {
			print_json(&client.send_raw_transaction(&raw_transaction).await?)
		}
	}
}

/// Main entry point for the adapter CLI.
///
/// # Errors
/// Returns an error if the configuration is invalid, bootstrap fails or the command fails.
#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	cli.apply_to_env();

	setup_logging().unwrap_or_else(|e| {
		eprintln!("Failed to setup logging: {}", e);
	});

	run(cli).await.inspect_err(|e| {
		error!("{}", e);
	})
}
