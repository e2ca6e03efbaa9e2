//! Sparse per-line gutter annotations.
//!
//! The store is pure bookkeeping keyed by 1-based line number and owns no text. Error
//! annotations are rebuilt wholesale after every detection pass. Breakpoints and fold starts
//! persist by raw line number, so inserting or deleting lines above them misattributes them;
//! readers re-validate against the current line count through [`LineAnnotationStore::kinds_at`].

use crate::diagnostics::ErrorRecord;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

bitflags! {
    /// The set of annotation kinds present on one line.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct AnnotationKinds: u8 {
        /// At least one error record points at the line.
        const ERROR = 1;
        /// A user breakpoint.
        const BREAKPOINT = 1 << 1;
        /// The line the debugger is currently executing.
        const DEBUG_CURRENT = 1 << 2;
        /// The line starts a foldable region.
        const FOLD_START = 1 << 3;
    }
}

/// Line-indexed annotation model read by the gutter painter.
#[derive(Debug, Clone, Default)]
pub struct LineAnnotationStore {
    entries: BTreeMap<usize, AnnotationKinds>,
    errors: Vec<ErrorRecord>,
    debug_line: Option<usize>,
    version: u64,
}

impl LineAnnotationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Incremented on every mutation that changes the store.
    pub fn version(&self) -> u64 {
        self.version
    }

    fn insert(&mut self, line: usize, kind: AnnotationKinds) -> bool {
        if line == 0 {
            return false;
        }
        let entry = self.entries.entry(line).or_default();
        if entry.contains(kind) {
            return false;
        }
        entry.insert(kind);
        self.version += 1;
        true
    }

    fn remove(&mut self, line: usize, kind: AnnotationKinds) -> bool {
        let Some(entry) = self.entries.get_mut(&line) else {
            return false;
        };
        if !entry.contains(kind) {
            return false;
        }
        entry.remove(kind);
        if entry.is_empty() {
            self.entries.remove(&line);
        }
        self.version += 1;
        true
    }

    fn remove_everywhere(&mut self, kind: AnnotationKinds) {
        let mut changed = false;
        self.entries.retain(|_, kinds| {
            changed |= kinds.contains(kind);
            kinds.remove(kind);
            !kinds.is_empty()
        });
        if changed {
            self.version += 1;
        }
    }

    /// Replace all error records and rebuild the `ERROR` annotations.
    ///
    /// Records pointing past `line_count` are dropped.
    pub fn replace_errors(&mut self, records: Vec<ErrorRecord>, line_count: usize) {
        self.remove_everywhere(AnnotationKinds::ERROR);
        self.errors = records
            .into_iter()
            .filter(|r| r.line >= 1 && r.line <= line_count)
            .collect();
        let lines: Vec<usize> = self.errors.iter().map(|r| r.line).collect();
        for line in lines {
            self.insert(line, AnnotationKinds::ERROR);
        }
        self.version += 1;
    }

    /// Current error records.
    pub fn errors(&self) -> &[ErrorRecord] {
        &self.errors
    }

    /// Error records on one line, for tooltips.
    pub fn errors_on(&self, line: usize) -> impl Iterator<Item = &ErrorRecord> {
        self.errors.iter().filter(move |r| r.line == line)
    }

    /// Add a breakpoint. Returns `false` if it already existed or `line` is 0.
    pub fn set_breakpoint(&mut self, line: usize) -> bool {
        self.insert(line, AnnotationKinds::BREAKPOINT)
    }

    /// Remove a breakpoint. Returns `false` if there was none.
    pub fn clear_breakpoint(&mut self, line: usize) -> bool {
        self.remove(line, AnnotationKinds::BREAKPOINT)
    }

    /// Toggle a breakpoint. Returns whether the line now has one.
    pub fn toggle_breakpoint(&mut self, line: usize) -> bool {
        if self.clear_breakpoint(line) {
            false
        } else {
            self.set_breakpoint(line)
        }
    }

    /// Remove every breakpoint.
    pub fn clear_breakpoints(&mut self) {
        self.remove_everywhere(AnnotationKinds::BREAKPOINT);
    }

    /// Breakpoint lines, ascending.
    pub fn breakpoints(&self) -> Vec<usize> {
        self.lines_with(AnnotationKinds::BREAKPOINT)
    }

    /// Set or clear the line the debugger is executing. At most one line carries it.
    pub fn set_debug_line(&mut self, line: Option<usize>) {
        if self.debug_line == line {
            return;
        }
        if let Some(old) = self.debug_line.take() {
            self.remove(old, AnnotationKinds::DEBUG_CURRENT);
        }
        if let Some(new) = line.filter(|&l| l > 0) {
            self.insert(new, AnnotationKinds::DEBUG_CURRENT);
            self.debug_line = Some(new);
        }
    }

    /// The line the debugger is executing.
    pub fn debug_line(&self) -> Option<usize> {
        self.debug_line
    }

    /// Mark or unmark a fold start.
    pub fn mark_fold_start(&mut self, line: usize, foldable: bool) {
        if foldable {
            self.insert(line, AnnotationKinds::FOLD_START);
        } else {
            self.remove(line, AnnotationKinds::FOLD_START);
        }
    }

    /// Remove every fold start.
    pub fn clear_fold_starts(&mut self) {
        self.remove_everywhere(AnnotationKinds::FOLD_START);
    }

    /// Kinds on `line`, or empty if the line no longer exists in a buffer of `line_count` lines.
    pub fn kinds_at(&self, line: usize, line_count: usize) -> AnnotationKinds {
        if line == 0 || line > line_count {
            return AnnotationKinds::empty();
        }
        self.entries.get(&line).copied().unwrap_or_default()
    }

    /// Lines carrying `kind`, ascending. Not re-validated.
    pub fn lines_with(&self, kind: AnnotationKinds) -> Vec<usize> {
        self.entries
            .iter()
            .filter(|(_, kinds)| kinds.contains(kind))
            .map(|(&line, _)| line)
            .collect()
    }

    /// Returns `true` if no line carries any annotation.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
