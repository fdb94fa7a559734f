use chrono::{DateTime, TimeZone, Utc};
use volunteam_core::{
    greeting, AuthenticationContext, CatalogError, EdgePadding, Event, EventCatalog, EventFeed,
    EventListView, EventMapView, JsonEventSource, Position, StaticEventSource,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

fn event(id: &str, year: i32, latitude: f64, longitude: f64) -> Event {
    Event::new(
        id,
        format!("Event {id}"),
        "",
        Position::new(latitude, longitude),
        Utc.with_ymd_and_hms(year, 6, 1, 12, 0, 0).unwrap(),
    )
    .unwrap()
}

fn loaded_feed() -> EventFeed {
    let mut feed = EventFeed::new();
    feed.reload(&StaticEventSource::new(vec![
        event("a", 2099, 10.0, 10.0),
        event("b", 2000, 50.0, 50.0),
        event("c", 2098, 20.0, 20.0),
    ]))
    .unwrap();
    feed
}

#[test]
fn region_waits_for_surface_ready() {
    let mut feed = loaded_feed();
    assert!(feed.is_loaded());
    assert_eq!(feed.region_at(now()), None);

    assert!(feed.mark_surface_ready(EdgePadding::none()));
    let region = feed.region_at(now()).unwrap();

    assert!((region.center.latitude - 15.0).abs() < 1e-9);
    assert!(region.contains(&Position::new(10.0, 10.0)));
    assert!(region.contains(&Position::new(20.0, 20.0)));
    assert!(!region.contains(&Position::new(50.0, 50.0)));
}

#[test]
fn region_waits_for_data_ready() {
    let mut feed = EventFeed::new();
    assert!(!feed.mark_surface_ready(EdgePadding::new(0.1, 0.1)));
    assert_eq!(feed.region_at(now()), None);

    feed.reload(&StaticEventSource::new(vec![event("a", 2099, 1.0, 1.0)]))
        .unwrap();
    assert!(feed.region_at(now()).is_some());
}

#[test]
fn empty_catalog_never_reaches_the_planner() {
    let mut feed = EventFeed::new();
    feed.reload(&StaticEventSource::default()).unwrap();
    feed.mark_surface_ready(EdgePadding::none());

    assert!(feed.visible_at(now()).is_empty());
    assert_eq!(feed.region_at(now()), None);
}

#[test]
fn failed_reload_keeps_previous_catalog() {
    let mut feed = loaded_feed();
    feed.mark_surface_ready(EdgePadding::none());
    let before = feed.region_at(now());

    let err = feed
        .reload(&JsonEventSource::from_json("not a dataset"))
        .unwrap_err();

    assert!(matches!(err, CatalogError::DataUnavailable(_)));
    assert_eq!(feed.catalog().len(), 3);
    assert_eq!(feed.region_at(now()), before);
}

#[test]
fn list_and_map_describe_the_same_visible_set() {
    let feed = loaded_feed();
    let visible = feed.visible_at(now());

    let list = EventListView::from_visible(&visible);
    let map = EventMapView::from_visible(&visible, feed.region_at(now()));

    let list_ids: Vec<&str> = list.items.iter().map(|item| item.event_id.as_str()).collect();
    let map_ids: Vec<&str> = map.markers.iter().map(|marker| marker.event_id.as_str()).collect();
    assert_eq!(list_ids, vec!["a", "c"]);
    assert_eq!(list_ids, map_ids);
    assert_eq!(list.footer, "2 event(s) found");
    assert_eq!(map.markers[1].label, "Event c");
    assert_eq!(map.region, None);
}

#[test]
fn visible_set_follows_the_reference_time() {
    let feed = EventFeed::with_catalog(
        EventCatalog::from_events(vec![event("a", 2025, 0.0, 0.0), event("b", 2030, 0.0, 0.0)])
            .unwrap(),
    );

    let early = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let later = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    assert_eq!(feed.visible_at(early).len(), 2);
    assert_eq!(feed.visible_at(later).len(), 1);
}

#[test]
fn greeting_is_absent_without_session() {
    assert_eq!(greeting(&AuthenticationContext::new()), None);
}
