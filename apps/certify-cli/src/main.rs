use std::{env, time::Duration};

use clap::{Parser, Subcommand};
use certify_core::log_msg;
use ethers::types::Address;
use eyre::Context;

use certify_client::{certify::CertifyClient, tx_client::TxClient};

mod commands;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long)]
    rpc_url: Option<String>,

    #[arg(long, env = "CERTIFY_ADDRESS")]
    certify_address: String,

    /// Interval between receipt polls, in milliseconds
    #[arg(long, default_value_t = 1000)]
    poll_interval_ms: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Grant the right to publish (chairperson only)
    Grant { publisher: Address, username: String },

    /// Revoke the right to publish (chairperson only)
    Revoke { publisher: Address },

    /// Show username of the publisher
    Publisher { publisher: Address },

    /// Show chairperson of the registry
    Chairperson,

    /// Sign certificate content with own key and publish it for the recipient
    Publish { recipient: Address, uri: String },

    /// Verify that certificate was signed by the signer
    Verify { token_id: u64, signer: Address },

    /// List all issued certificates
    List,

    /// Show the id the next certificate will receive
    Counter,
}

fn get_private_key() -> eyre::Result<String> {
    env::var("CERTIFY_PRIVATE_KEY").context("CERTIFY_PRIVATE_KEY not found in environment")
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();
    let rpc_url = cli.rpc_url.unwrap_or("http://localhost:8547".to_owned());
    let certify_address: Address = cli
        .certify_address
        .parse()
        .context("Invalid Certify address")?;

    // Only transactions need the key, so anyone can verify and list
    let certify = if commands::requires_signer(&cli.command) {
        let tx_client = TxClient::try_new_from_url(&rpc_url, get_private_key)
            .await?
            .with_poll_interval(Duration::from_millis(cli.poll_interval_ms));
        CertifyClient::new(tx_client, certify_address)
    } else {
        CertifyClient::try_read_only_from_url(&rpc_url, certify_address)?
    };

    log_msg!("Connected as {:?}", certify.address());

    let output = commands::run_command(&certify, cli.command).await?;
    println!("{}", output);

    Ok(())
}
