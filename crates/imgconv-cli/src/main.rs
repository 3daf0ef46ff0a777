//! imgconv CLI. Command-line client for the image converter API.
//!
//! Set IMGCONV_API_KEY (or RAPIDAPI_KEY). IMGCONV_API_URL overrides the endpoint.

use clap::Parser;
use imgconv_cli::{init_tracing, run, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    run(cli, |name| std::env::var(name).ok()).await
}
