// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Frame range parsing, chunking and formatting.
//!
//! A frame range spec is a comma-separated list of frame numbers and
//! inclusive ranges, e.g. `"1-10,15,20-22"`. Chunking splits the sorted,
//! de-duplicated frames into groups of at most `chunk_size` frames.

use std::collections::BTreeSet;
use std::fmt::Write as _;
use thiserror::Error;

/// Errors from parsing a frame range spec or chunk size.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("frame range is empty")]
    Empty,

    #[error("malformed frame range {spec:?}: {reason}")]
    Malformed { spec: String, reason: String },

    #[error("chunk size must be positive, got {0}")]
    InvalidChunkSize(i64),
}

/// Upper bound on the number of frames one spec may expand to.
pub const MAX_FRAMES: usize = 1_000_000;

/// Output style of [`frame_range_merge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangeStyle {
    /// `1-3,5`, used in task names
    #[default]
    Display,
    /// `1..3,5`, passed verbatim to the renderer
    Blender,
}

impl RangeStyle {
    fn separator(&self) -> &'static str {
        match self {
            RangeStyle::Display => "-",
            RangeStyle::Blender => "..",
        }
    }
}

/// A parsed, sorted set of frame numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameRange {
    frames: Vec<u32>,
}

impl FrameRange {
    /// Parse a frame range spec such as `"1-10,15"`.
    pub fn parse(spec: &str) -> Result<Self, ValidationError> {
        let malformed = |reason: String| ValidationError::Malformed {
            spec: spec.to_string(),
            reason,
        };

        if spec.trim().is_empty() {
            return Err(ValidationError::Empty);
        }

        // Items are counted before any frame is collected, overlaps included
        let mut ranges = Vec::new();
        let mut total = 0usize;
        for item in spec.split(',') {
            let item = item.trim();
            if item.is_empty() {
                return Err(malformed("empty item".to_string()));
            }
            let (start, end) = match item.split_once('-') {
                Some((start, end)) => {
                    let start = parse_frame(start).map_err(&malformed)?;
                    let end = parse_frame(end).map_err(&malformed)?;
                    if start > end {
                        return Err(malformed(format!("range {item} runs backwards")));
                    }
                    if (end - start) as usize >= MAX_FRAMES {
                        return Err(malformed(format!("range {item} exceeds {MAX_FRAMES} frames")));
                    }
                    (start, end)
                }
                None => {
                    let frame = parse_frame(item).map_err(&malformed)?;
                    (frame, frame)
                }
            };
            total += (end - start) as usize + 1;
            if total > MAX_FRAMES {
                return Err(malformed(format!("more than {MAX_FRAMES} frames")));
            }
            ranges.push((start, end));
        }

        let mut frames = BTreeSet::new();
        for (start, end) in ranges {
            frames.extend(start..=end);
        }
        Ok(Self {
            frames: frames.into_iter().collect(),
        })
    }

    pub fn frames(&self) -> &[u32] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Split into groups of at most `chunk_size` frames.
    pub fn chunks(&self, chunk_size: i64) -> Result<FrameChunks<'_>, ValidationError> {
        let size = usize::try_from(chunk_size)
            .ok()
            .filter(|size| *size > 0)
            .ok_or(ValidationError::InvalidChunkSize(chunk_size))?;
        Ok(FrameChunks {
            frames: &self.frames,
            size,
        })
    }

    /// Number of groups [`FrameRange::chunks`] yields for `chunk_size`.
    pub fn chunk_count(&self, chunk_size: i64) -> Result<usize, ValidationError> {
        Ok(self.chunks(chunk_size)?.len())
    }
}

fn parse_frame(text: &str) -> Result<u32, String> {
    let text = text.trim();
    let frame: u32 = text
        .parse()
        .map_err(|_| format!("{text:?} is not a frame number"))?;
    if frame == 0 {
        return Err("frame numbers start at 1".to_string());
    }
    Ok(frame)
}

/// Lazy iterator over frame groups.
///
/// Cloning restarts from the same position, so the sequence can be replayed
/// and always yields the same groups.
#[derive(Debug, Clone)]
pub struct FrameChunks<'a> {
    frames: &'a [u32],
    size: usize,
}

impl Iterator for FrameChunks<'_> {
    type Item = Vec<u32>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.frames.is_empty() {
            return None;
        }
        let take = self.size.min(self.frames.len());
        let (head, rest) = self.frames.split_at(take);
        self.frames = rest;
        Some(head.to_vec())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.frames.len().div_ceil(self.size);
        (n, Some(n))
    }
}

impl ExactSizeIterator for FrameChunks<'_> {}

/// Parse `spec` and chunk it in one go.
pub fn iter_frame_range(spec: &str, chunk_size: i64) -> Result<Vec<Vec<u32>>, ValidationError> {
    let range = FrameRange::parse(spec)?;
    let chunks = range.chunks(chunk_size)?.collect();
    Ok(chunks)
}

/// Collapse frames into a compact range string.
///
/// Consecutive runs of three or more frames become `a-b` (or `a..b`);
/// pairs and single frames are listed.
pub fn frame_range_merge(frames: &[u32], style: RangeStyle) -> String {
    let mut sorted = frames.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut out = String::new();
    let mut i = 0;
    while i < sorted.len() {
        let start = sorted[i];
        let mut end = start;
        while i + 1 < sorted.len() && end.checked_add(1) == Some(sorted[i + 1]) {
            i += 1;
            end = sorted[i];
        }
        if !out.is_empty() {
            out.push(',');
        }
        match end - start {
            0 => {
                let _ = write!(out, "{start}");
            }
            1 => {
                let _ = write!(out, "{start},{end}");
            }
            _ => {
                let _ = write!(out, "{start}{}{end}", style.separator());
            }
        }
        i += 1;
    }
    out
}

/// Fill a `#`-padded path template with a frame number.
///
/// The last run of `#` becomes the frame number zero-padded to the run's
/// width. Templates without `#` get the frame appended, padded to 4 digits.
pub fn frame_path(template: &str, frame: u32) -> String {
    match template.rfind('#') {
        Some(last) => {
            let head = &template[..=last];
            let first = head.trim_end_matches('#').len();
            let width = last + 1 - first;
            format!(
                "{}{:0width$}{}",
                &template[..first],
                frame,
                &template[last + 1..],
                width = width
            )
        }
        None => format!("{template}{frame:04}"),
    }
}

#[cfg(test)]
#[path = "frames_tests.rs"]
mod tests;
