//! Basic logger usage example
//!
//! Demonstrates console logging with run levels, context fields, and the
//! logging macros.
//!
//! Run with: cargo run --example basic_usage

use logferry::prelude::*;
use logferry::{info, warning};

fn main() -> Result<()> {
    println!("=== logferry - Basic Usage Example ===\n");

    // Console destination with a dated plain-text format
    let destination = ConsoleDestination::new(Box::new(PlainTextFormat::new(true)));
    let mut logger = Logger::new(Box::new(destination)).with_run_level(Level::Debug);
    logger.open(&DestinationConfig::new())?;

    println!("1. Logging at different levels:");
    logger.debug("This is a debug message");
    logger.info("This is an info message");
    logger.notice("This is a notice message");
    logger.warning("This is a warning message");
    logger.error("This is an error message");
    logger.critical("This is a critical message");

    println!("\n2. Raising the threshold to WARNING - debug and info won't show:");
    logger.set_run_level(Level::Warning);
    logger.debug("Debug message (hidden)");
    logger.info("Info message (hidden)");
    logger.warning("Warning message (visible)");

    println!("\n3. Context fields travel with every record:");
    logger.set_run_level(Level::Info);
    logger.set_context("service", "billing");
    logger.info("charge accepted");
    logger.info_with_context(
        "charge declined",
        Context::new()
            .with_field("order_id", "ORD-1042")
            .with_field("amount", 45.99),
    );
    logger.clear_context();

    println!("\n4. The format macros:");
    let port = 8080;
    info!(logger, "Server listening on port {}", port);
    warning!(logger, "Retry attempt {} of {}", 3, 5);

    logger.close();
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
