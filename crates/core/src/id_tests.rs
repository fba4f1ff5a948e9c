// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::borrow::Borrow;
use std::collections::HashMap;

crate::define_id! {
    /// Id type used only by these tests.
    pub struct SampleId;
}

#[test]
fn define_id_display_and_as_str() {
    let id = SampleId::new("frame-7");
    assert_eq!(id.as_str(), "frame-7");
    assert_eq!(id.to_string(), "frame-7");
}

#[test]
fn define_id_compares_with_str() {
    let id: SampleId = "abc".into();
    assert_eq!(id, *"abc");
    assert_eq!(id, "abc");
}

#[test]
fn define_id_borrows_as_str_for_map_lookup() {
    let mut map = HashMap::new();
    map.insert(SampleId::new("k"), 42);
    assert_eq!(map.get("k"), Some(&42));

    let id = SampleId::new("key");
    let borrowed: &str = id.borrow();
    assert_eq!(borrowed, "key");
}

#[test]
fn define_id_serializes_as_plain_string() {
    let id = SampleId::new("serde-test");
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "\"serde-test\"");
    let parsed: SampleId = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, id);
}

#[yare::parameterized(
    truncates = { "abcdefghijklmnop", 8, "abcdefgh" },
    shorter   = { "abc", 8, "abc" },
    exact     = { "abcdefgh", 8, "abcdefgh" },
    multibyte = { "ééééé", 2, "éé" },
)]
fn short_truncates_by_chars(input: &str, n: usize, expected: &str) {
    assert_eq!(input.short(n), expected);
    assert_eq!(SampleId::new(input).short(n), expected);
}

#[test]
fn uuid_gen_creates_unique_ids() {
    let ids = UuidIdGen;
    let a = ids.next();
    let b = ids.next();
    assert_ne!(a, b);
    assert_eq!(a.len(), 36);
}

#[test]
fn sequential_gen_clones_share_the_counter() {
    let first = SequentialIdGen::new("task");
    let second = first.clone();
    assert_eq!(first.next(), "task-1");
    assert_eq!(second.next(), "task-2");
    assert_eq!(SampleId::generate(&first), "task-3");
}

#[test]
fn sequential_gen_is_unique_across_threads() {
    let ids = SequentialIdGen::new("t");
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let ids = ids.clone();
            std::thread::spawn(move || (0..100).map(|_| ids.next()).collect::<Vec<_>>())
        })
        .collect();

    let mut all: Vec<String> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    all.sort();
    all.dedup();
    assert_eq!(all.len(), 400);
}
