use anyhow::Context;
use sectioned_dashboard::dashboard::{
    DashboardEvent, DashboardSettings, Driver, IndexPath, ReplicaSink,
};
use sectioned_dashboard::logging;

/// Replays a JSON event script through the dashboard engine and prints one
/// JSON line per handled event, followed by the final layout.
fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let events_path = args
        .next()
        .context("usage: sectioned_dashboard <events.json> [dashboard.json]")?;
    let settings_path = DashboardSettings::path_for(&args.next().unwrap_or_else(|| ".".into()));

    let settings = DashboardSettings::load(&settings_path)?;
    logging::init(settings.debug_logging, settings.log_file.clone());
    tracing::info!(settings = %settings_path.display(), "dashboard settings loaded");

    let content = std::fs::read_to_string(&events_path)
        .with_context(|| format!("reading {events_path}"))?;
    let events: Vec<DashboardEvent> =
        serde_json::from_str(&content).with_context(|| format!("parsing {events_path}"))?;

    let mut driver = Driver::from_settings(&settings, ReplicaSink::new());
    for event in events {
        let handled = driver.handle(event);
        println!("{}", serde_json::to_string(&handled)?);
    }

    let (engine, sink) = driver.into_parts();
    if let Some(err) = sink.last_error() {
        anyhow::bail!("renderer replica diverged: {err}");
    }

    let policy = settings.unsupported_policy();
    let structure = engine.current_structure();
    for (s, entry) in structure.entries().iter().enumerate() {
        for (i, module) in entry.items.iter().enumerate() {
            let resolved = engine.item_layout_at(IndexPath::new(s, i))?;
            let effective = resolved.effective(policy)?;
            println!(
                "{}",
                serde_json::json!({
                    "section": entry.section,
                    "id": module.id(),
                    "layout": effective,
                })
            );
        }
    }

    let diagnostics = engine.diagnostics();
    tracing::info!(
        applies = diagnostics.applies,
        slow_applies = diagnostics.slow_applies,
        anomalies = diagnostics.anomalies.values().sum::<u64>(),
        "dashboard replay finished"
    );
    Ok(())
}
