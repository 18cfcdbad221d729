mod cli;
mod logging;
mod preview;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cli::run().await
}
