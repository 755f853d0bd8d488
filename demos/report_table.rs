//! Times a couple of regions and prints the report table.
//!
//! Run with `RUST_LOG=debug cargo run --example report_table` to see the
//! registry's own log events.

use std::thread;
use std::time::Duration;

use region_profiler::{ProfileRegistry, ProfilerError, profile};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), ProfilerError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut registry = ProfileRegistry::new();

    profile!(registry, {
        thread::sleep(Duration::from_millis(10));
    });

    for _ in 0..10 {
        let _region = registry.region("foo for")?;
        for _ in 0..4 {
            thread::sleep(Duration::from_millis(10));
        }
    }

    registry.print_report()?;
    println!("{}", registry.report().to_json()?);
    Ok(())
}
