//! DocBay - documentation hosting server binary.

use docbay::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::load()?;

    // Start server
    docbay::start_server(config).await?;

    Ok(())
}
