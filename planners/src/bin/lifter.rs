use std::io::Read;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use lift_planners::driver::Driver;
use lift_sim::Cave;
use tracing::info;

/// Best-effort solver for Lambda Lift cave maps.
#[derive(Debug, Parser)]
#[command(name = "lifter")]
struct Opt {
    /// Map file to solve; reads the map from standard input when absent.
    #[arg(long, short)]
    file: Option<PathBuf>,
    /// Logging verbosity: 0 error, 1 warn, 2 info, 3 debug, 4 and up trace.
    #[arg(long, default_value_t = 0)]
    log: u8,
}

fn main() -> Result<()> {
    // Terminate the process if a thread panics.
    // take_hook() returns the default hook in case when a custom one is not set
    let orig_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // invoke the default handler and exit the process
        orig_hook(panic_info);
        std::process::exit(1);
    }));

    let opt = Opt::parse();

    let level = match opt.log {
        0 => tracing::Level::ERROR,
        1 => tracing::Level::WARN,
        2 => tracing::Level::INFO,
        3 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let subscriber = tracing_subscriber::fmt()
        .with_timer(tracing_subscriber::fmt::time::Uptime::from(
            std::time::Instant::now(),
        ))
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let text = match &opt.file {
        Some(path) => {
            anyhow::ensure!(path.exists(), "Map file {} does not exist", path.display());
            std::fs::read_to_string(path)
                .with_context(|| format!("Could not read map file {}", path.display()))?
        }
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Could not read the map from standard input")?;
            buf
        }
    };
    let cave = Cave::parse(&text).context("Malformed map")?;

    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = interrupted.clone();
    ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed))
        .context("Could not install the interrupt handler")?;

    let solution = Driver::new(interrupted).run(&cave);
    info!(%solution, "done");
    println!("{}", solution.route);
    Ok(())
}
