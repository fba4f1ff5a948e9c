// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;

#[yare::parameterized(
    single      = { "7", &[7] },
    range       = { "1-4", &[1, 2, 3, 4] },
    mixed       = { "1-3, 10,12-13", &[1, 2, 3, 10, 12, 13] },
    unsorted    = { "9,2,5", &[2, 5, 9] },
    overlapping = { "1-3,2-4", &[1, 2, 3, 4] },
    degenerate  = { "5-5", &[5] },
)]
fn parse_ok(spec: &str, expected: &[u32]) {
    assert_eq!(FrameRange::parse(spec).unwrap().frames(), expected);
}

#[yare::parameterized(
    letters      = { "a-b" },
    trailing     = { "1-3," },
    backwards    = { "5-1" },
    zero         = { "0-3" },
    negative     = { "-3" },
    double_dash  = { "1--3" },
    float        = { "1.5" },
)]
fn parse_malformed(spec: &str) {
    assert!(matches!(
        FrameRange::parse(spec),
        Err(ValidationError::Malformed { .. })
    ));
}

#[test]
fn parse_empty() {
    assert_eq!(FrameRange::parse("  "), Err(ValidationError::Empty));
    assert_eq!(FrameRange::parse(""), Err(ValidationError::Empty));
}

#[test]
fn parse_rejects_huge_ranges() {
    assert!(FrameRange::parse("1-4000000000").is_err());
}

#[test]
fn parse_rejects_many_items_over_cap_before_collecting() {
    let spec: Vec<String> = (0..8u32)
        .map(|i| format!("{}-{}", i * 1_000_000 + 1, i * 1_000_000 + 999_999))
        .collect();
    match FrameRange::parse(&spec.join(",")) {
        Err(ValidationError::Malformed { reason, .. }) => {
            assert_eq!(reason, format!("more than {MAX_FRAMES} frames"));
        }
        other => panic!("expected frame cap error, got {other:?}"),
    }
}

#[test]
fn parse_accepts_items_filling_cap() {
    let range = FrameRange::parse("1-500000,600001-1100000").unwrap();
    assert_eq!(range.len(), MAX_FRAMES);
}

#[yare::parameterized(
    zero     = { 0 },
    negative = { -4 },
)]
fn chunk_size_must_be_positive(size: i64) {
    let range = FrameRange::parse("1-10").unwrap();
    assert_eq!(
        range.chunks(size).unwrap_err(),
        ValidationError::InvalidChunkSize(size)
    );
}

#[test]
fn chunks_split_in_order() {
    let chunks = iter_frame_range("1-5,9", 2).unwrap();
    assert_eq!(chunks, vec![vec![1, 2], vec![3, 4], vec![5, 9]]);
}

#[test]
fn chunks_restart_identically() {
    let range = FrameRange::parse("1-10").unwrap();
    let chunks = range.chunks(3).unwrap();
    assert_eq!(chunks.len(), 4);
    let first: Vec<_> = chunks.clone().collect();
    let second: Vec<_> = chunks.collect();
    assert_eq!(first, second);
    assert_eq!(range.chunk_count(3).unwrap(), 4);
}

#[yare::parameterized(
    empty         = { &[], "" },
    single        = { &[4], "4" },
    pair          = { &[1, 2], "1,2" },
    run           = { &[1, 2, 3], "1-3" },
    mixed         = { &[1, 2, 3, 5, 7, 8, 9, 10], "1-3,5,7-10" },
    unsorted_dups = { &[3, 1, 2, 2], "1-3" },
)]
fn merge_display(frames: &[u32], expected: &str) {
    assert_eq!(frame_range_merge(frames, RangeStyle::Display), expected);
}

#[test]
fn merge_blender_style() {
    assert_eq!(
        frame_range_merge(&[1, 2, 3, 5, 6], RangeStyle::Blender),
        "1..3,5,6"
    );
}

#[yare::parameterized(
    six_hashes   = { "/render/_intermediate/merge-smpl50-frm-######", 7, "/render/_intermediate/merge-smpl50-frm-000007" },
    with_suffix  = { "/out/shot-####.exr", 12, "/out/shot-0012.exr" },
    last_run     = { "/out/#/frame-###", 3, "/out/#/frame-003" },
    wider_frame  = { "/out/f-##", 1234, "/out/f-1234" },
    no_hashes    = { "/out/frame-", 5, "/out/frame-0005" },
)]
fn fills_frame_path(template: &str, frame: u32, expected: &str) {
    assert_eq!(frame_path(template, frame), expected);
}

proptest! {
    #[test]
    fn chunks_are_disjoint_exhaustive_and_bounded(
        frames in proptest::collection::btree_set(1u32..500, 1..80),
        chunk_size in 1i64..20,
    ) {
        let spec = frames.iter().map(|f| f.to_string()).collect::<Vec<_>>().join(",");
        let chunks = iter_frame_range(&spec, chunk_size).unwrap();

        for chunk in &chunks {
            prop_assert!(!chunk.is_empty());
            prop_assert!(chunk.len() as i64 <= chunk_size);
        }
        let flat: Vec<u32> = chunks.concat();
        let expected: Vec<u32> = frames.iter().copied().collect();
        prop_assert_eq!(flat, expected);
        prop_assert_eq!(chunks, iter_frame_range(&spec, chunk_size).unwrap());
    }

    #[test]
    fn merged_display_string_parses_back(
        frames in proptest::collection::btree_set(1u32..300, 1..50),
    ) {
        let frames: Vec<u32> = frames.into_iter().collect();
        let merged = frame_range_merge(&frames, RangeStyle::Display);
        let parsed = FrameRange::parse(&merged).unwrap();
        prop_assert_eq!(parsed.frames(), frames.as_slice());
    }
}
