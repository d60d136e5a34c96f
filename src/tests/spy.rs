use super::ScrollSpy;
use crate::catalog::{Accessor, Dive};
use crate::config::Config;
use crate::error::SpyError;
use crate::section::SectionDescriptor;
use crate::tracker::{Geometry, Position, ScrollMetrics, SectionBox};
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;

/// Every section is 100 tall, laid out back to back.
struct Even {
    ids: Vec<String>,
    scroll_top: f64,
}

impl Geometry for Even {
    fn section_box(&self, dom_id: &str) -> Option<SectionBox> {
        let i = self.ids.iter().position(|id| id == dom_id)?;
        let top = f64::from(u32::try_from(i).unwrap()) * 100.0;
        Some(SectionBox {
            offset_top: top,
            bottom: top + 100.0 - self.scroll_top,
        })
    }
}

fn children(n: usize) -> Vec<SectionDescriptor> {
    (1..=n)
        .map(|i| SectionDescriptor::titled(&format!("section{i}")))
        .collect()
}

fn scroll_to(spy: &mut ScrollSpy, y: f64) -> Option<Position> {
    let geometry = Even {
        ids: spy.entries().iter().map(|e| e.dom_id.clone()).collect(),
        scroll_top: y,
    };
    let metrics = ScrollMetrics {
        scroll_top: y,
        viewport_height: 100.0,
        document_height: 1000.0,
    };
    spy.handle_scroll(metrics, &geometry)
}

#[test]
fn test_build_exposes_catalog() {
    let spy = ScrollSpy::build(children(3), Config::default()).unwrap();

    assert_eq!(spy.current_index(), 0);
    let scroll_to: Vec<String> = spy.nav_items().into_iter().map(|n| n.scroll_to).collect();
    assert_eq!(
        scroll_to,
        ["section1-section", "section2-section", "section3-section"]
    );
    assert_eq!(
        spy.mutated_children()[1].id.as_deref(),
        Some("section2-section")
    );
    assert!(spy.listener().is_some());
}

#[test]
fn test_invalid_boundary_fails_before_arming() {
    for boundary in [1.5, -0.1, f64::NAN] {
        let config = Config {
            viewport_boundary: boundary,
            ..Config::default()
        };
        let result = ScrollSpy::build(children(2), config);
        assert!(matches!(result, Err(SpyError::InvalidBoundary(_))));
    }
}

#[test]
fn test_boundary_limits_are_accepted() {
    for boundary in [0.0, 1.0] {
        let config = Config {
            viewport_boundary: boundary,
            ..Config::default()
        };
        assert!(ScrollSpy::build(children(2), config).is_ok());
    }
}

#[test]
fn test_missing_title_fails_build() {
    let mut descriptors = children(2);
    descriptors.push(SectionDescriptor::with_prop("caption", "untitled"));
    let result = ScrollSpy::build(descriptors, Config::default());
    assert!(matches!(
        result,
        Err(SpyError::MissingTitle { index: 2, .. })
    ));
}

#[test]
fn test_set_current_index_range() {
    let mut spy = ScrollSpy::build(children(3), Config::default()).unwrap();

    assert!(spy.set_current_index(0).is_ok());
    assert!(spy.set_current_index(2).is_ok());
    assert_eq!(spy.current_index(), 2);
    assert!(matches!(
        spy.set_current_index(3),
        Err(SpyError::OutOfRange(3))
    ));
    assert!(matches!(
        spy.set_current_index_signed(-1),
        Err(SpyError::OutOfRange(-1))
    ));
    assert_eq!(spy.current_index(), 2);
}

#[test]
fn test_set_current_index_on_empty_catalog() {
    let mut spy = ScrollSpy::build(Vec::new(), Config::default()).unwrap();
    assert_eq!(spy.current_index(), 0);
    assert!(spy.set_current_index(0).is_err());
}

#[test]
fn test_activate_by_id() {
    let mut spy = ScrollSpy::build(children(3), Config::default()).unwrap();
    assert_eq!(spy.activate("section3-section"), Some(2));
    assert_eq!(spy.current_index(), 2);
    assert_eq!(spy.activate("nowhere"), None);
    assert_eq!(spy.current_index(), 2);
}

#[test]
fn test_scroll_events_drive_index() {
    let mut spy = ScrollSpy::build(children(3), Config::default()).unwrap();

    // Section 2 starts at 100; boundary 0.3 of a 100 viewport
    assert_eq!(scroll_to(&mut spy, 69.0), Some(Position::InRange(0)));
    assert_eq!(scroll_to(&mut spy, 70.0), Some(Position::InRange(1)));
    assert_eq!(scroll_to(&mut spy, 900.0), Some(Position::AtBottom));
    assert_eq!(spy.current_index(), 2);
    assert_eq!(scroll_to(&mut spy, 0.0), Some(Position::AtTop));
    assert_eq!(spy.current_index(), 0);
}

#[test]
fn test_observers_see_changes_only() {
    let mut spy = ScrollSpy::build(children(3), Config::default()).unwrap();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let id = spy.subscribe(move |index| sink.borrow_mut().push(index));

    scroll_to(&mut spy, 50.0);
    scroll_to(&mut spy, 75.0);
    scroll_to(&mut spy, 80.0);
    spy.set_current_index(2).unwrap();
    spy.set_current_index(2).unwrap();
    assert_eq!(*seen.borrow(), vec![1, 2]);

    assert!(spy.unsubscribe(id));
    assert!(!spy.unsubscribe(id));
    spy.set_current_index(0).unwrap();
    assert_eq!(*seen.borrow(), vec![1, 2]);
}

#[test]
fn test_disabled_spy_ignores_scroll() {
    let config = Config {
        enabled: false,
        ..Config::default()
    };
    let mut spy = ScrollSpy::build(children(3), config).unwrap();
    assert!(spy.listener().is_none());
    assert_eq!(scroll_to(&mut spy, 900.0), None);
    assert_eq!(spy.current_index(), 0);
}

#[test]
fn test_disabling_freezes_index() {
    let mut spy = ScrollSpy::build(children(3), Config::default()).unwrap();
    scroll_to(&mut spy, 70.0);
    assert_eq!(spy.current_index(), 1);

    spy.set_enabled(false);
    assert!(spy.listener().is_none());
    assert_eq!(scroll_to(&mut spy, 0.0), None);
    assert_eq!(spy.current_index(), 1);

    spy.set_enabled(true);
    assert_eq!(scroll_to(&mut spy, 0.0), Some(Position::AtTop));
    assert_eq!(spy.current_index(), 0);
}

#[test]
fn test_config_change_rearms_with_new_values() {
    let mut spy = ScrollSpy::build(children(3), Config::default()).unwrap();
    let first = spy.listener().unwrap().generation;

    spy.set_config(Config {
        viewport_boundary: 0.5,
        ..Config::default()
    })
    .unwrap();
    let listener = spy.listener().unwrap();
    assert!(listener.generation > first);
    assert!((listener.tracker.boundary() - 0.5).abs() < f64::EPSILON);

    // With the wider boundary section 2 activates as soon as 100 - y <= 50
    scroll_to(&mut spy, 50.0);
    assert_eq!(spy.current_index(), 1);
}

#[test]
fn test_rejected_config_keeps_previous_listener() {
    let mut spy = ScrollSpy::build(children(3), Config::default()).unwrap();
    let before = *spy.listener().unwrap();

    let result = spy.set_config(Config {
        viewport_boundary: 2.0,
        ..Config::default()
    });
    assert!(result.is_err());
    assert_eq!(spy.listener(), Some(&before));
    assert!((spy.config().viewport_boundary - 0.3).abs() < f64::EPSILON);
}

#[test]
fn test_new_children_rebuild_and_clamp() {
    let mut spy = ScrollSpy::build(children(5), Config::default()).unwrap();
    let generation = spy.listener().unwrap().generation;
    spy.set_current_index(4).unwrap();

    spy.set_children(children(2)).unwrap();
    assert_eq!(spy.nav_items().len(), 2);
    assert_eq!(spy.current_index(), 1);
    assert!(spy.listener().unwrap().generation > generation);
}

#[test]
fn test_rebuild_from_mutated_children_keeps_ids() {
    let mut descriptors = children(2);
    descriptors[0].id = Some("custom".to_string());
    let spy = ScrollSpy::build(descriptors, Config::default()).unwrap();
    let again = ScrollSpy::build(spy.mutated_children().to_vec(), Config::default()).unwrap();

    assert_eq!(spy.nav_items(), again.nav_items());
    assert_eq!(again.nav_items()[0].scroll_to, "custom");
}

#[test]
fn test_dive_accessor_from_config() {
    let descriptors = vec![
        SectionDescriptor::with_prop("heading", json!({ "title": "Deep" })),
        SectionDescriptor::with_prop("heading", json!({ "title": "Deeper" })),
    ];
    let config = Config {
        dive_accessor: Some("heading".to_string()),
        ..Config::default()
    };
    let spy = ScrollSpy::build(descriptors, config).unwrap();
    assert_eq!(spy.nav_items()[1].label, "Deeper");
}

#[test]
fn test_custom_accessor_survives_rebuild() {
    let descriptors = vec![SectionDescriptor::with_prop("meta", json!({ "name": "Named" }))];
    let accessor = Accessor::with_source("name", Dive(Some("meta".to_string())));
    let mut spy =
        ScrollSpy::build_with_accessor(descriptors, Config::default(), accessor).unwrap();

    spy.set_config(Config {
        content_top_offset: 12.0,
        ..Config::default()
    })
    .unwrap();
    assert_eq!(spy.nav_items()[0].scroll_to, "named-section");
}
