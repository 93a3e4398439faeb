use clap::Parser;
use context_local_buffer::{errors::Result, ContextStore};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Demo runner: buffers "test" on the main thread, prints it, then clears.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {}

fn main() {
    let _args = Args::parse();
    init_tracing();

    if let Err(e) = run() {
        error!("demo failed: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let store = ContextStore::new();
    store.append("test")?;

    // Print the current buffer.
    println!("{}", store.snapshot()?);

    let cleared = store.clear()?;
    info!(cleared = cleared.len(), "demo finished");
    Ok(())
}

/// Stderr logging with thread names and ids; `RUST_LOG` overrides the filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("clb=info,context_local_buffer=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .init();
}
