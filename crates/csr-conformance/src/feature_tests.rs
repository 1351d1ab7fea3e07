// crates/csr-conformance/src/feature_tests.rs
// ============================================================================
// Module: Feature Unit Tests
// Description: Unit coverage for feature identity and set operations.
// Purpose: Ensure feature sets stay unique, ordered, and name-keyed.
// Dependencies: csr-conformance
// ============================================================================

//! ## Overview
//! Unit coverage for feature identity and set operations.

#![allow(clippy::panic, clippy::use_debug, reason = "Test-only assertions.")]

use super::DURATION;
use super::Feature;
use super::FeatureSet;
use super::KEY_USAGES;
use super::URI_SANS;
use super::well_known;

#[test]
fn features_compare_by_name() {
    assert_eq!(Feature::new("KeyUsages"), KEY_USAGES);
    assert_eq!(Feature::from("Duration"), DURATION);
    assert_ne!(Feature::new("keyusages"), KEY_USAGES);
}

#[test]
fn set_ignores_duplicates() {
    let mut set = FeatureSet::new();
    set.add(KEY_USAGES);
    set.add(Feature::new("KeyUsages"));
    assert_eq!(set.len(), 1);
    assert!(set.contains(&KEY_USAGES));
}

#[test]
fn delete_removes_feature() {
    let mut set = FeatureSet::from([KEY_USAGES, DURATION]);
    set.delete(&KEY_USAGES);
    assert!(!set.contains(&KEY_USAGES));
    assert!(set.contains(&DURATION));
    set.delete(&URI_SANS);
    assert_eq!(set.len(), 1);
}

#[test]
fn list_and_display_are_sorted() {
    let set = FeatureSet::from([URI_SANS, KEY_USAGES, DURATION]);
    assert_eq!(set.list(), vec![DURATION, KEY_USAGES, URI_SANS]);
    assert_eq!(set.to_string(), "Duration, KeyUsages, URISANs");
    assert_eq!(FeatureSet::new().to_string(), "");
}

#[test]
fn intersection_keeps_only_shared_members() {
    let unsupported = FeatureSet::from([KEY_USAGES, DURATION]);
    let shared = unsupported.intersection(&[URI_SANS, DURATION]);
    assert_eq!(shared, FeatureSet::from([DURATION]));
    assert!(unsupported.intersection(&FeatureSet::new()).is_empty());
}

#[test]
fn well_known_names_are_unique() {
    let all: FeatureSet = well_known().into_iter().collect();
    assert_eq!(all.len(), well_known().len());
}

#[test]
fn feature_set_serializes_as_name_list() {
    let set = FeatureSet::from([KEY_USAGES, DURATION]);
    let json = serde_json::to_string(&set).unwrap_or_else(|err| panic!("serialize: {err}"));
    assert_eq!(json, r#"["Duration","KeyUsages"]"#);
    let parsed: FeatureSet =
        serde_json::from_str(&json).unwrap_or_else(|err| panic!("deserialize: {err}"));
    assert_eq!(parsed, set);
}
