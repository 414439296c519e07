use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::filter::LevelFilter;
use veronika_card::PreviewConfig;
use veronika_card::RecordingHost;
use veronika_card::Registry;
use veronika_card::StateSnapshot;
use veronika_card::UiEvent;
use veronika_card::TAG_NAME;

/// Render the cleaning-plan card for a state snapshot and replay gestures on it.
#[derive(Debug, Parser)]
#[command(name = "veronika-card", version)]
struct Args {
    /// JSON file mapping entity ids to {state, attributes}
    #[arg(long)]
    states: PathBuf,

    /// TOML file with [logging] and [card] sections
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured log level
    #[arg(long, value_enum)]
    log_level: Option<veronika_card::LogLevel>,

    /// Print indented markup
    #[arg(long)]
    pretty: bool,

    /// Click the element with this id (repeatable)
    #[arg(long = "click", value_name = "ID")]
    clicks: Vec<String>,

    /// Flip a toggle, as ID=on or ID=off (repeatable)
    #[arg(long = "toggle", value_name = "ID=on|off", value_parser = parse_toggle)]
    toggles: Vec<(String, bool)>,
}

fn parse_toggle(s: &str) -> Result<(String, bool), String> {
    let (id, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ID=on|off, got '{}'", s))?;
    let checked = match value {
        "on" | "true" => true,
        "off" | "false" => false,
        other => return Err(format!("invalid toggle value '{}'", other)),
    };
    Ok((id.to_string(), checked))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => PreviewConfig::from_file(path)?,
        None => PreviewConfig::default(),
    };

    let level = args.log_level.unwrap_or(config.logging.level);
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::from(level))
        .with_writer(std::io::stderr)
        .init();

    let states = std::fs::read_to_string(&args.states)
        .with_context(|| format!("Failed to read states file {}", args.states.display()))?;
    let snapshot = StateSnapshot::from_json(&states)
        .with_context(|| format!("Failed to parse states file {}", args.states.display()))?;
    if snapshot.is_empty() {
        tracing::warn!("No entities in {}", args.states.display());
    } else {
        tracing::info!("Loaded {} entities from {}", snapshot.len(), args.states.display());
    }

    let registry = Registry::with_builtin()?;
    tracing::info!(
        "Registered cards: {}",
        registry.tags().collect::<Vec<_>>().join(", ")
    );
    let mut card = registry
        .create(TAG_NAME)
        .with_context(|| format!("No card registered as <{}>", TAG_NAME))?;

    card.configure(config.card_options()?);
    card.deliver_state(&snapshot);

    if args.pretty {
        print!("{}", card.pretty_html());
    } else {
        println!("{}", card.html());
    }

    let gestures = args
        .clicks
        .iter()
        .map(|id| UiEvent::click(id.as_str()))
        .chain(
            args.toggles
                .iter()
                .map(|(id, checked)| UiEvent::change(id.as_str(), *checked)),
        );

    let mut host = RecordingHost::new();
    for event in gestures {
        if !card.dispatch(&event, &mut host) {
            tracing::warn!("Nothing bound to {}", event.target());
        }
        for call in host.take_calls() {
            println!("{}", serde_json::to_string(&call)?);
        }
        for alert in host.alerts.drain(..) {
            println!("{}", alert);
        }
    }

    Ok(())
}
