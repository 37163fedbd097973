use bookstore_demo::{DemoConfig, run};
use bookstore_inventory::{BookStore, LoggingMailService, LoggingShippingService};

fn main() -> anyhow::Result<()> {
    bookstore_observability::init();

    let config = DemoConfig::from_env();
    tracing::info!(?config, "starting bookstore demo");

    let mut store = BookStore::new(LoggingShippingService, LoggingMailService, config.clock());
    let report = run(&mut store, &config)?;
    let removed = serde_json::to_string(&report.removed)?;

    tracing::info!(
        purchases = report.purchases.len(),
        failures = report.failures.len(),
        remaining = store.len(),
        removed = %removed,
        "demo finished"
    );
    Ok(())
}
