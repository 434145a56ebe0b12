use anyhow::Result;
use tracing_subscriber::EnvFilter;

use lazy_cast::{repl, samples, Evaluator};

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let evaluator = Evaluator::new();
    samples::load(&evaluator);
    repl::run(&evaluator)
}
