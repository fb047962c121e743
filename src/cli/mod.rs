use std::sync::Arc;

use anyhow::Context;
use clap::{Arg, ArgAction, Command};
use tracing::info;

use crate::selection::SeededJitter;
use crate::store::InMemoryStore;
use crate::types::{AnchorEvent, BudgetRange, DatePreferences, Occasion, TimeOfDay, Venue};
use crate::PlanEngine;

/// CLI entry point: load venues/events from JSON files, build preferences
/// from flags, and print the generated plan.
pub async fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let matches = Command::new("datecraft")
        .version("0.1.0")
        .about("Generate a date itinerary from a venue catalog")
        .arg(
            Arg::new("venues")
                .long("venues")
                .value_name("FILE")
                .help("Path to a JSON array of venues")
                .required(true),
        )
        .arg(
            Arg::new("events")
                .long("events")
                .value_name("FILE")
                .help("Path to a JSON array of events"),
        )
        .arg(
            Arg::new("occasion")
                .short('o')
                .long("occasion")
                .value_name("OCCASION")
                .help("first_date, anniversary, birthday, casual_hangout, ...")
                .default_value("first_date"),
        )
        .arg(
            Arg::new("budget")
                .short('b')
                .long("budget")
                .value_name("SYMBOL")
                .help("$, $$, $$$ or $$$$")
                .default_value("$$"),
        )
        .arg(
            Arg::new("vibes")
                .long("vibes")
                .value_name("LIST")
                .help("Comma-separated vibe labels, e.g. cozy,romantic"),
        )
        .arg(
            Arg::new("duration")
                .short('d')
                .long("duration")
                .value_name("HOURS")
                .help("Desired total duration in hours")
                .default_value("3"),
        )
        .arg(
            Arg::new("time-of-day")
                .short('t')
                .long("time-of-day")
                .value_name("PERIOD")
                .help("morning, afternoon, evening, night or full_day")
                .default_value("evening"),
        )
        .arg(
            Arg::new("anchor-event")
                .long("anchor-event")
                .value_name("ID")
                .help("Event id to build the itinerary around"),
        )
        .arg(
            Arg::new("exclude")
                .long("exclude")
                .value_name("IDS")
                .help("Comma-separated venue ids to leave out"),
        )
        .arg(
            Arg::new("downtown-only")
                .long("downtown-only")
                .action(ArgAction::SetTrue)
                .help("Restrict to downtown venues"),
        )
        .arg(
            Arg::new("with-dog")
                .long("with-dog")
                .action(ArgAction::SetTrue)
                .help("Prefer pet-friendly venues"),
        )
        .arg(
            Arg::new("with-kids")
                .long("with-kids")
                .action(ArgAction::SetTrue)
                .help("Prefer kid-friendly venues and skip 21+ spots"),
        )
        .arg(
            Arg::new("under-21")
                .long("under-21")
                .action(ArgAction::SetTrue)
                .help("Skip age-restricted venues"),
        )
        .arg(
            Arg::new("optimize-route")
                .long("optimize-route")
                .action(ArgAction::SetTrue)
                .help("Reorder stops to minimize back-and-forth"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_name("N")
                .help("Seed the selection jitter for reproducible output"),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .action(ArgAction::SetTrue)
                .help("Include generation counters in the output"),
        )
        .get_matches();

    let venues_path = matches
        .get_one::<String>("venues")
        .context("--venues is required")?;
    let venues: Vec<Venue> = load_json(venues_path)
        .with_context(|| format!("failed to load venues from {venues_path}"))?;
    let events: Vec<AnchorEvent> = match matches.get_one::<String>("events") {
        Some(path) => {
            load_json(path).with_context(|| format!("failed to load events from {path}"))?
        }
        None => Vec::new(),
    };
    info!(venues = venues.len(), events = events.len(), "catalog loaded");

    let occasion_raw = matches.get_one::<String>("occasion").cloned().unwrap_or_default();
    let occasion: Occasion = serde_json::from_value(serde_json::Value::String(occasion_raw.clone()))
        .with_context(|| format!("unknown occasion: {occasion_raw}"))?;
    let tod_raw = matches
        .get_one::<String>("time-of-day")
        .cloned()
        .unwrap_or_default();
    let time_of_day: TimeOfDay = serde_json::from_value(serde_json::Value::String(tod_raw.clone()))
        .with_context(|| format!("unknown time of day: {tod_raw}"))?;
    let budget_raw = matches.get_one::<String>("budget").cloned().unwrap_or_default();
    let budget = BudgetRange::from_symbol(&budget_raw)
        .with_context(|| format!("unknown budget symbol: {budget_raw}"))?;
    let duration_hours: f64 = matches
        .get_one::<String>("duration")
        .cloned()
        .unwrap_or_default()
        .parse()
        .context("--duration must be a number of hours")?;

    let with_kids = matches.get_flag("with-kids");
    let prefs = DatePreferences {
        occasion,
        budget,
        vibes: split_list(matches.get_one::<String>("vibes")),
        duration_hours,
        time_of_day,
        activity_level: 3,
        with_dog: matches.get_flag("with-dog"),
        with_young_children: with_kids,
        needs_wheelchair_access: false,
        avoid_stairs: false,
        needs_wifi: false,
        downtown_only: matches.get_flag("downtown-only"),
        military_access: false,
        twenty_one_plus: !matches.get_flag("under-21") && !with_kids,
        exclude_venue_ids: split_list(matches.get_one::<String>("exclude")),
        anchor_event_id: matches.get_one::<String>("anchor-event").cloned(),
    };

    let store = Arc::new(InMemoryStore::new(venues, events));
    let mut engine = PlanEngine::new(store).with_debug_counters(matches.get_flag("debug"));
    if let Some(seed) = matches.get_one::<String>("seed") {
        let seed: u64 = seed.parse().context("--seed must be an integer")?;
        engine = engine.with_jitter(SeededJitter::new(seed));
    }

    let mut plan = engine.generate_plan(&prefs).await?;
    if matches.get_flag("optimize-route") {
        plan.stops = crate::optimize_stop_order(plan.stops);
    }
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}

fn load_json<T: serde::de::DeserializeOwned>(path: &str) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn split_list(raw: Option<&String>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect()
    })
    .unwrap_or_default()
}
