//! Background removal CLI tool
//!
//! Command-line interface for the model-free bgremove-heuristic library.

#[cfg(feature = "cli")]
use bgremove_heuristic::cli;

#[cfg(feature = "cli")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cli::main().await
}

#[cfg(not(feature = "cli"))]
fn main() {
    panic!("CLI feature not enabled. Please rebuild with --features cli");
}
