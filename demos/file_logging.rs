//! File logging example
//!
//! Demonstrates fanning one log call out to console and file destinations
//! with independent thresholds, via a Mux.
//!
//! Run with: cargo run --example file_logging

use logferry::prelude::*;

fn main() -> Result<()> {
    println!("=== logferry - File Logging Example ===\n");

    // Console shows everything; the file keeps warnings and worse
    let mut console = Logger::new(Box::new(ConsoleDestination::new(Box::new(
        PlainTextFormat::new(true),
    ))))
    .with_run_level(Level::Debug);
    console.open(&DestinationConfig::new())?;

    let mut file = Logger::new(Box::new(FileDestination::new(Box::new(
        PlainTextFormat::new(true),
    ))))
    .with_run_level(Level::Warning);
    // %DATE% expands to today's date, e.g. application-2026-08-25.log
    file.open(&DestinationConfig::new().set("file_name", "application-%DATE%"))?;

    let mut mux = Mux::new();
    mux.add_log(console);
    mux.add_channel("app", file);

    println!("1. Logging to both console and file:");
    mux.info("Application started");
    mux.debug("Loading configuration...");
    mux.info("Configuration loaded successfully");
    mux.warning("Using default settings for some options");
    mux.error("Failed to load optional plugin");

    println!("\n2. Performing some operations:");
    for i in 1..=5 {
        mux.info(format!("Processing item {}/5", i));
        if i == 3 {
            mux.warning("Item 3 took longer than expected");
        }
    }
    mux.info("All operations completed");

    // Close flushes the file destination
    mux.close();

    println!("\n=== Example completed successfully! ===");
    println!("Check the dated application-*.log file for warnings and errors");

    Ok(())
}
