//! # quote-view
//!
//! Read-only CLI: fetches the quotes stored under a ledger address and prints
//! them newest first.
//!
//! Configuration comes from `QS_*` environment variables; flags override the
//! node URL.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use quote_sync::{
    init_logging, Address, FetchOutcome, QuoteBoardApi, QuoteBoardService, QuoteSyncConfig,
    RestLedgerGateway, WalletIdentity,
};

/// Print the quotes stored under a ledger address.
#[derive(Parser, Debug)]
#[command(name = "quote-view")]
#[command(version, about = "Print the on-chain quotes of an address")]
struct Args {
    /// Address to inspect (0x followed by 64 hex digits). Defaults to --identity.
    address: Option<String>,

    /// Act as this account; its quotes are shown when no address is given.
    #[arg(short, long)]
    identity: Option<String>,

    /// Ledger REST endpoint, overriding QS_NODE_URL.
    #[arg(short, long)]
    node: Option<String>,

    /// Print records as JSON lines.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = QuoteSyncConfig::from_env();
    if let Some(node) = args.node {
        config.node_url = node;
    }
    config.validate().context("invalid configuration")?;
    init_logging(&config).context("failed to install logging")?;

    let wallet = match args.identity.as_deref() {
        Some(raw) => WalletIdentity::with_address(
            Address::parse(raw).with_context(|| format!("invalid identity {raw:?}"))?,
        ),
        None => WalletIdentity::new(),
    };
    if args.address.is_none() && args.identity.is_none() {
        bail!("nothing to show: pass an ADDRESS or --identity");
    }

    let gateway = Arc::new(RestLedgerGateway::new(&config).context("failed to build HTTP client")?);
    let board = QuoteBoardService::new(config, gateway, Arc::new(wallet));

    info!(scope = args.address.as_deref().unwrap_or("self"), "Fetching quotes");
    let outcome = board
        .set_scope(args.address.as_deref().unwrap_or_default())
        .await
        .context("fetch failed")?;

    let FetchOutcome::Applied(records) = outcome else {
        bail!("fetch was superseded");
    };

    if records.is_empty() {
        println!("No quotes.");
        return Ok(());
    }
    for quote in &records {
        if args.json {
            println!("{}", serde_json::to_string(quote)?);
        } else {
            println!(
                "[{}] {} \"{}\" - {} ({} likes{})",
                quote.created_at.format("%Y-%m-%d %H:%M"),
                quote.id,
                quote.content,
                quote.author,
                quote.like_count,
                if quote.is_custom { ", custom" } else { "" },
            );
        }
    }
    Ok(())
}
