//! Network delivery example
//!
//! Demonstrates the reliability behavior of the network destinations: an
//! unreachable collector never breaks the application, drops are counted,
//! and reconnect attempts are bounded.
//!
//! Run with: cargo run --example network_delivery

use logferry::prelude::*;

fn main() -> Result<()> {
    println!("=== logferry - Network Delivery Example ===\n");

    // Point at a syslog collector that (most likely) is not listening.
    // A refused connection is Ok(false), never an error: the configuration
    // is kept and each write makes one bounded reconnect attempt.
    let destination = PapertrailDestination::new(Box::new(RawFormat::new()));
    let mut logger = Logger::new(Box::new(destination)).with_run_level(Level::Info);

    let config = DestinationConfig::new()
        .set("host", "127.0.0.1")
        .set("port", 51514)
        .set("use_tls", false)
        .set("system_name", "demo-host")
        .set("max_reconnect_attempts", 2)
        .set("reconnect_delay", 0.1);

    let connected = logger.open(&config)?;
    println!("1. open() returned connected = {connected}");

    println!("\n2. Writing five records (the app keeps running either way):");
    for i in 1..=5 {
        logger.info(format!("event {}", i));
    }

    let metrics = logger.metrics();
    println!("\n3. Delivery metrics:");
    println!("   delivered:  {}", metrics.delivered_count());
    println!("   dropped:    {}", metrics.dropped_count());
    println!("   reconnects: {}", metrics.reconnect_count());
    println!("   drop rate:  {:.1}%", metrics.drop_rate());

    logger.close();

    println!("\nStart a local listener (e.g. `nc -l 51514`) and run again to");
    println!("see the same records arrive as RFC 5424 syslog lines.");
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
