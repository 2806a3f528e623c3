//! Line-keyed annotations: breakpoints and error markers.
//!
//! Both sets are caller-owned value objects; the editor only keeps their line
//! keys consistent while lines are inserted and removed. The shift logic is
//! shared through one arena so the two containers cannot drift apart.

use std::collections::{BTreeMap, BTreeSet};

/// A highlighted span inside an error-marked line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorLocation {
    /// Display column where the span starts.
    pub column: usize,
    /// Span length in display columns.
    pub length: usize,
}

/// Diagnostic payload attached to one line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorMarker {
    /// Human-readable message.
    pub description: String,
    /// Spans to underline within the line; empty marks the whole line.
    pub locations: Vec<ErrorLocation>,
}

/// Ordered breakpoint lines.
pub type Breakpoints = BTreeSet<usize>;

/// Error markers keyed by line number.
pub type ErrorMarkers = BTreeMap<usize, ErrorMarker>;

/// The shared arena of line-keyed annotation sets.
///
/// Every line insertion/removal funnels through [`lines_inserted`] and
/// [`lines_removed`], which apply one key-shift rule to all containers:
/// inserting at `i` bumps keys `>= i` by the insertion count; removing
/// `[i, j)` drops keys inside the range and pulls keys `>= j` back by
/// `j - i`.
///
/// [`lines_inserted`]: LineAnnotations::lines_inserted
/// [`lines_removed`]: LineAnnotations::lines_removed
#[derive(Debug, Clone, Default)]
pub struct LineAnnotations {
    breakpoints: Breakpoints,
    error_markers: ErrorMarkers,
}

impl LineAnnotations {
    /// The current breakpoint set.
    pub fn breakpoints(&self) -> &Breakpoints {
        &self.breakpoints
    }

    /// Replaces the breakpoint set.
    pub fn set_breakpoints(&mut self, breakpoints: Breakpoints) {
        self.breakpoints = breakpoints;
    }

    /// Toggles the breakpoint on `line`, returning whether it is now set.
    pub fn toggle_breakpoint(&mut self, line: usize) -> bool {
        if self.breakpoints.remove(&line) {
            false
        } else {
            self.breakpoints.insert(line);
            true
        }
    }

    /// The current error markers.
    pub fn error_markers(&self) -> &ErrorMarkers {
        &self.error_markers
    }

    /// Replaces the error markers.
    pub fn set_error_markers(&mut self, markers: ErrorMarkers) {
        self.error_markers = markers;
    }

    /// Shifts keys for `count` lines inserted at index `at`.
    pub fn lines_inserted(&mut self, at: usize, count: usize) {
        if count == 0 {
            return;
        }
        self.breakpoints = self
            .breakpoints
            .iter()
            .map(|&line| if line >= at { line + count } else { line })
            .collect();
        self.error_markers = std::mem::take(&mut self.error_markers)
            .into_iter()
            .map(|(line, marker)| {
                let key = if line >= at { line + count } else { line };
                (key, marker)
            })
            .collect();
    }

    /// Shifts keys for the removal of lines `[start, end)`; keys inside the
    /// removed range are dropped.
    pub fn lines_removed(&mut self, start: usize, end: usize) {
        debug_assert!(end >= start);
        let count = end - start;
        if count == 0 {
            return;
        }
        self.breakpoints = self
            .breakpoints
            .iter()
            .filter(|&&line| !(start..end).contains(&line))
            .map(|&line| if line >= end { line - count } else { line })
            .collect();
        self.error_markers = std::mem::take(&mut self.error_markers)
            .into_iter()
            .filter(|(line, _)| !(start..end).contains(line))
            .map(|(line, marker)| {
                let key = if line >= end { line - count } else { line };
                (key, marker)
            })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(text: &str) -> ErrorMarker {
        ErrorMarker {
            description: text.to_string(),
            locations: Vec::new(),
        }
    }

    fn arena(breakpoints: &[usize], marker_lines: &[usize]) -> LineAnnotations {
        let mut a = LineAnnotations::default();
        a.set_breakpoints(breakpoints.iter().copied().collect());
        a.set_error_markers(
            marker_lines
                .iter()
                .map(|&line| (line, marker("boom")))
                .collect(),
        );
        a
    }

    #[test]
    fn insert_shifts_keys_at_and_after() {
        let mut a = arena(&[1, 3, 7], &[3, 5]);
        a.lines_inserted(3, 1);
        assert_eq!(
            a.breakpoints().iter().copied().collect::<Vec<_>>(),
            vec![1, 4, 8]
        );
        assert_eq!(a.error_markers().keys().copied().collect::<Vec<_>>(), vec![4, 6]);
    }

    #[test]
    fn insert_before_keys_leaves_none_behind() {
        let mut a = arena(&[0, 2], &[0]);
        a.lines_inserted(0, 2);
        assert_eq!(
            a.breakpoints().iter().copied().collect::<Vec<_>>(),
            vec![2, 4]
        );
        assert_eq!(a.error_markers().keys().copied().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn remove_drops_in_range_and_rekeys_after() {
        let mut a = arena(&[1, 3, 4, 9], &[2, 4, 9]);
        a.lines_removed(3, 6);
        assert_eq!(
            a.breakpoints().iter().copied().collect::<Vec<_>>(),
            vec![1, 6]
        );
        assert_eq!(a.error_markers().keys().copied().collect::<Vec<_>>(), vec![2, 6]);
    }

    #[test]
    fn toggle_breakpoint_round_trips() {
        let mut a = LineAnnotations::default();
        assert!(a.toggle_breakpoint(5));
        assert!(a.breakpoints().contains(&5));
        assert!(!a.toggle_breakpoint(5));
        assert!(!a.breakpoints().contains(&5));
    }
}
