//! Checkout
//!
//! Prices a basket of scanned items against the configured catalog and promotions.

use std::io;

use tracing_subscriber::EnvFilter;

use checkout::cli::{self, CheckoutArgs};

fn main() -> anyhow::Result<()> {
    let args = CheckoutArgs::load().unwrap_or_else(|err| err.exit());

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .init();

    let pricer = args.pricer()?;

    cli::run(&pricer, &args.command, io::stdout().lock())
}
