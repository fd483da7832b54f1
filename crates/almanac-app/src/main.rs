use std::path::Path;

use almanac_core::config::load_config;
use almanac_recur::recur::start_of_day;
use almanac_service::{
    AgendaEntry, CalendarService, EventRepository, InMemoryEventRepository, NewEvent,
};
use anyhow::Context;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    let config = load_config()?;

    tracing::debug!(config = ?config, "Configuration loaded");

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping info");
    }

    let repository = InMemoryEventRepository::new();
    let loaded = load_events(Path::new(&config.agenda.events_path), &repository)?;
    tracing::info!(path = %config.agenda.events_path, loaded, "Events loaded");

    let day = config
        .agenda
        .day()?
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let service = CalendarService::from_settings(repository, &config)?;
    let agenda = service.agenda_for_day(day, start_of_day(day))?;

    println!("Agenda for {}", day.format("%A, %Y-%m-%d"));
    if agenda.is_empty() {
        println!("  nothing scheduled");
    }
    for entry in &agenda {
        println!("  {}", render_entry(entry));
    }

    Ok(())
}

/// Reads a JSON array of events into `repository`, skipping invalid ones.
fn load_events(path: &Path, repository: &impl EventRepository) -> anyhow::Result<usize> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read events from {}", path.display()))?;
    let events: Vec<NewEvent> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse events in {}", path.display()))?;

    let mut loaded = 0;
    for event in events {
        let title = event.title.clone();
        match repository.insert(event) {
            Ok(_) => loaded += 1,
            Err(e) => tracing::warn!(%title, "Skipping invalid event: {e}"),
        }
    }
    Ok(loaded)
}

fn render_entry(entry: &AgendaEntry) -> String {
    let when = if entry.all_day {
        "all day".to_string()
    } else {
        format!(
            "{}-{}",
            entry.occurrence.start.format("%m-%d %H:%M"),
            entry.occurrence.end.format("%m-%d %H:%M")
        )
    };

    let mut line = format!("{when}  {}", entry.title);
    if !entry.location.is_empty() {
        line.push_str(&format!(" @ {}", entry.location));
    }
    line.push_str(&format!("  ({})", entry.summary));
    line
}
