use super::{derive_id, slug, Accessor, Catalog, CatalogEntry, NavItem, TitleSource};
use crate::error::SpyError;
use crate::section::SectionDescriptor;
use serde_json::{json, Map, Value};

fn titled(titles: &[&str]) -> Vec<SectionDescriptor> {
    titles.iter().map(|t| SectionDescriptor::titled(t)).collect()
}

#[test]
fn test_three_sections_derive_ids() {
    let catalog = Catalog::build(
        &titled(&["section1", "section2", "section3"]),
        &Accessor::default(),
    )
    .unwrap();

    assert_eq!(
        catalog.nav_items(),
        vec![
            NavItem {
                label: "section1".to_string(),
                scroll_to: "section1-section".to_string()
            },
            NavItem {
                label: "section2".to_string(),
                scroll_to: "section2-section".to_string()
            },
            NavItem {
                label: "section3".to_string(),
                scroll_to: "section3-section".to_string()
            },
        ]
    );
}

#[test]
fn test_order_and_length_follow_input() {
    let titles = ["Zeta", "Alpha", "Mu", "Alpha Beta"];
    let catalog = Catalog::build(&titled(&titles), &Accessor::default()).unwrap();

    assert_eq!(catalog.len(), titles.len());
    let labels: Vec<&str> = catalog.entries.iter().map(|e| e.label.as_str()).collect();
    assert_eq!(labels, titles);
    assert_eq!(catalog.entries[3].dom_id, "alpha-beta-section");
}

#[test]
fn test_explicit_id_preserved() {
    let descriptors = vec![
        SectionDescriptor::titled("Getting Started").with_id("start"),
        SectionDescriptor::titled("Usage"),
    ];
    let catalog = Catalog::build(&descriptors, &Accessor::default()).unwrap();

    assert_eq!(catalog.entries[0].dom_id, "start");
    assert_eq!(catalog.entries[1].dom_id, "usage-section");
    assert_eq!(catalog.annotated[0], descriptors[0]);
    assert_eq!(catalog.annotated[1].id.as_deref(), Some("usage-section"));
    assert_eq!(catalog.annotated[1].props, descriptors[1].props);
}

#[test]
fn test_empty_explicit_id_is_replaced() {
    let descriptors = vec![SectionDescriptor::titled("Usage").with_id("")];
    let catalog = Catalog::build(&descriptors, &Accessor::default()).unwrap();

    assert_eq!(catalog.entries[0].dom_id, "usage-section");
    assert_eq!(catalog.annotated[0].id.as_deref(), Some("usage-section"));
}

#[test]
fn test_rebuild_from_annotated_is_idempotent() {
    let descriptors = titled(&["One", "Two Words", "Ünïcode Title"]);
    let first = Catalog::build(&descriptors, &Accessor::default()).unwrap();
    let second = Catalog::build(&first.annotated, &Accessor::default()).unwrap();

    assert_eq!(first.entries, second.entries);
    assert_eq!(first.annotated, second.annotated);
}

#[test]
fn test_build_is_deterministic() {
    let descriptors = titled(&["A", "B"]);
    let a = Catalog::build(&descriptors, &Accessor::default()).unwrap();
    let b = Catalog::build(&descriptors, &Accessor::default()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_input_is_not_mutated() {
    let descriptors = titled(&["Keep Me"]);
    let before = descriptors.clone();
    let _ = Catalog::build(&descriptors, &Accessor::default()).unwrap();
    assert_eq!(descriptors, before);
    assert!(descriptors[0].id.is_none());
}

#[test]
fn test_missing_title_aborts_whole_build() {
    let descriptors = vec![
        SectionDescriptor::titled("Fine"),
        SectionDescriptor::with_prop("name", "No title here"),
        SectionDescriptor::titled("Also fine"),
    ];

    match Catalog::build(&descriptors, &Accessor::default()) {
        Err(SpyError::MissingTitle { index, accessor }) => {
            assert_eq!(index, 1);
            assert_eq!(accessor, "title");
        }
        other => panic!("expected MissingTitle, got {other:?}"),
    }
}

#[test]
fn test_non_string_title_rejected() {
    let descriptors = vec![SectionDescriptor::with_prop("title", 42)];
    let err = Catalog::build(&descriptors, &Accessor::default()).unwrap_err();
    assert!(matches!(err, SpyError::MissingTitle { index: 0, .. }));
}

#[test]
fn test_dive_accessor_reads_nested_title() {
    let descriptors = vec![
        SectionDescriptor::with_prop("props", json!({ "heading": "Nested One" })),
        SectionDescriptor::with_prop("props", json!({ "heading": "Nested Two" })),
    ];
    let accessor = Accessor::new("heading", Some("props"));
    let catalog = Catalog::build(&descriptors, &accessor).unwrap();

    assert_eq!(catalog.entries[0].label, "Nested One");
    assert_eq!(catalog.entries[1].dom_id, "nested-two-section");
}

#[test]
fn test_dive_accessor_missing_nested_object() {
    let descriptors = vec![
        SectionDescriptor::with_prop("props", json!({ "heading": "Present" })),
        SectionDescriptor::titled("Top-level only"),
    ];
    let accessor = Accessor::new("heading", Some("props"));

    match Catalog::build(&descriptors, &accessor) {
        Err(SpyError::MissingTitle { index, accessor }) => {
            assert_eq!(index, 1);
            assert_eq!(accessor, "heading");
        }
        other => panic!("expected MissingTitle, got {other:?}"),
    }
}

struct Caption;

impl TitleSource for Caption {
    fn resolve<'a>(&self, descriptor: &'a SectionDescriptor) -> Option<&'a Map<String, Value>> {
        descriptor
            .props
            .get("figure")?
            .get("caption")?
            .as_object()
    }
}

#[test]
fn test_custom_title_source() {
    let descriptors = vec![SectionDescriptor::with_prop(
        "figure",
        json!({ "caption": { "text": "Deep Caption" } }),
    )];
    let accessor = Accessor::with_source("text", Caption);
    let catalog = Catalog::build(&descriptors, &accessor).unwrap();

    assert_eq!(
        catalog.entries,
        vec![CatalogEntry {
            label: "Deep Caption".to_string(),
            dom_id: "deep-caption-section".to_string(),
        }]
    );
}

#[test]
fn test_slug_only_lowercases_and_replaces_spaces() {
    assert_eq!(slug("Hello World"), "hello-world");
    assert_eq!(slug("What's  New?"), "what's--new?");
    assert_eq!(slug("Ärger Über"), "ärger-über");
    assert_eq!(slug("tabs\tstay"), "tabs\tstay");
    assert_eq!(derive_id(""), "-section");
}

#[test]
fn test_colliding_slugs_are_not_deduplicated() {
    let catalog = Catalog::build(&titled(&["Intro", "intro"]), &Accessor::default()).unwrap();

    assert_eq!(catalog.entries[0].dom_id, "intro-section");
    assert_eq!(catalog.entries[1].dom_id, "intro-section");
    assert_eq!(catalog.position("intro-section"), Some(0));
}

#[test]
fn test_empty_input() {
    let catalog = Catalog::build(&[], &Accessor::default()).unwrap();
    assert!(catalog.is_empty());
    assert!(catalog.annotated.is_empty());
}
