// src/main.rs

use devloop::{cli, logging, run};

#[tokio::main]
async fn main() {
    // Always printed, even with logging disabled.
    if let Err(err) = run_main().await {
        eprintln!("devloop error: {err:#}");
        std::process::exit(1);
    }
}

async fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    logging::init_logging(args.log, args.log_level)?;
    run(args).await?;
    Ok(())
}
