//! Path strings addressing into a form tree.
//!
//! A path is split on `.` and bracket characters, so `"a.b.0"` and
//! `"a.b[0]"` address the same node. Empty segments produced by the split
//! are discarded. A segment consisting solely of ASCII digits is a
//! sequence index; any other segment is a mapping key. There is no escape
//! mechanism for numeric-looking mapping keys.

/// Container shape a path segment requires of the node it indexes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Shape {
    Map,
    Seq,
}

/// Decides which container shape `segment` addresses.
pub(crate) fn decide_shape(segment: &str) -> Shape {
    if seq_index(segment).is_some() {
        Shape::Seq
    } else {
        Shape::Map
    }
}

/// Parses `segment` as a sequence index.
///
/// Only all-digit segments qualify. Signs, whitespace, and values that do
/// not fit a `usize` are rejected.
pub(crate) fn seq_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    segment.parse().ok()
}

/// Splits a path into its non-empty segments.
pub(crate) fn split_segments(path: &str) -> Vec<&str> {
    path.split(['.', '[', ']'])
        .filter(|segment| !segment.is_empty())
        .collect()
}
