//! CLI inspection entry point.
//!
//! # Responsibility
//! - Verify `volunteam_core` linkage without the Flutter runtime.
//! - Print the list and map payloads a host would render for a dataset.
//! - Inspect or clear the persisted session.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use rusqlite::Connection;
use std::path::PathBuf;
use volunteam_core::db::open_db;
use volunteam_core::{
    greeting, init_logging, parse_event_instant, AppConfig, AuthenticationContext, EdgePadding,
    EventFeed, EventListView, EventMapView, JsonEventSource, Route, RouteRecorder,
    SessionLifecycleController, SqliteSessionStore,
};

#[derive(Parser)]
#[command(name = "volunteam")]
#[command(about = "Inspect volunteer events and the stored session")]
struct Cli {
    /// Write rolling logs into this absolute directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print core ping and version
    Ping,
    /// Print the event list
    List {
        /// Dataset path (defaults to VOLUNTEAM_EVENTS_PATH or db.json)
        #[arg(short, long)]
        events: Option<PathBuf>,

        /// Reference instant (e.g. "2025-03-20T15:00:00Z"); defaults to now
        #[arg(long)]
        at: Option<String>,
    },
    /// Print map markers and the framing region
    Map {
        /// Dataset path (defaults to VOLUNTEAM_EVENTS_PATH or db.json)
        #[arg(short, long)]
        events: Option<PathBuf>,

        /// Reference instant (e.g. "2025-03-20T15:00:00Z"); defaults to now
        #[arg(long)]
        at: Option<String>,

        /// Fraction of the map reserved on the top and bottom edges
        #[arg(long, default_value_t = 0.0)]
        pad_vertical: f64,

        /// Fraction of the map reserved on the left and right edges
        #[arg(long, default_value_t = 0.0)]
        pad_horizontal: f64,
    },
    /// Restore the stored session and print the greeting
    Session,
    /// Clear the stored session
    Logout,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load();

    if let Some(log_dir) = &cli.log_dir {
        init_logging(&config.log_level, &log_dir.to_string_lossy())
            .map_err(|e| anyhow::anyhow!(e))?;
    }

    match cli.command {
        Commands::Ping => {
            println!("volunteam_core ping={}", volunteam_core::ping());
            println!("volunteam_core version={}", volunteam_core::core_version());
            Ok(())
        }
        Commands::List { events, at } => {
            let now = resolve_now(at.as_deref())?;
            let feed = load_feed(events.unwrap_or(config.events_path))?;
            let visible = feed.visible_at(now);
            let view = EventListView::from_visible(&visible);

            if visible.is_fallback() {
                println!("No upcoming events; showing all.");
            }
            for item in &view.items {
                println!("{}  {}  {}", item.starts_at, item.event_id, item.title);
                if !item.description.is_empty() {
                    println!("    {}", item.description);
                }
            }
            println!("{}", view.footer);
            Ok(())
        }
        Commands::Map {
            events,
            at,
            pad_vertical,
            pad_horizontal,
        } => {
            let now = resolve_now(at.as_deref())?;
            let mut feed = load_feed(events.unwrap_or(config.events_path))?;
            feed.mark_surface_ready(EdgePadding::new(pad_vertical, pad_horizontal));
            let view = EventMapView::from_visible(&feed.visible_at(now), feed.region_at(now));

            for marker in &view.markers {
                println!(
                    "{:>10.5} {:>11.5}  {}  {}",
                    marker.position.latitude, marker.position.longitude, marker.event_id, marker.label
                );
            }
            match view.region {
                Some(region) => println!(
                    "region center=({:.5}, {:.5}) delta=({:.5}, {:.5})",
                    region.center.latitude,
                    region.center.longitude,
                    region.latitude_delta,
                    region.longitude_delta
                ),
                None => println!("region: nothing to frame"),
            }
            Ok(())
        }
        Commands::Session => {
            let conn = open_db(&config.db_path)
                .with_context(|| format!("opening {}", config.db_path.display()))?;
            let mut auth = AuthenticationContext::new();
            let mut controller = SessionLifecycleController::new(
                SqliteSessionStore::new(&conn),
                RouteRecorder::new(),
                &mut auth,
            );
            controller.restore()?;
            drop(controller);

            match greeting(&auth) {
                Some(line) => println!("{line}"),
                None => println!("Signed out."),
            }
            Ok(())
        }
        Commands::Logout => {
            let conn = open_db(&config.db_path)
                .with_context(|| format!("opening {}", config.db_path.display()))?;
            if let Some(route) = clear_stored_session(&conn)? {
                println!("Signed out; next screen: {}", route.screen_id());
            }
            Ok(())
        }
    }
}

/// Removes both session keys whatever their content, so an undecodable
/// `userInfo` can still be cleared. Returns the route logout asked for.
fn clear_stored_session(conn: &Connection) -> Result<Option<Route>> {
    let mut auth = AuthenticationContext::new();
    let mut controller =
        SessionLifecycleController::new(SqliteSessionStore::new(conn), RouteRecorder::new(), &mut auth);
    controller.logout()?;
    Ok(controller.navigator().last().cloned())
}

fn load_feed(path: PathBuf) -> Result<EventFeed> {
    let mut feed = EventFeed::new();
    let source = JsonEventSource::from_path(path.clone());
    feed.reload(&source)
        .with_context(|| format!("loading events from {}", path.display()))?;
    Ok(feed)
}

fn resolve_now(at: Option<&str>) -> Result<DateTime<Utc>> {
    match at {
        Some(raw) => parse_event_instant(raw).with_context(|| format!("invalid --at value `{raw}`")),
        None => Ok(Utc::now()),
    }
}
