//! Indentation-delimited code folding.
//!
//! Foldability is memoized per line and the whole cache is dropped on any text change. The
//! cache is only ever filled for lines the gutter actually asks about (the visible window), so a
//! keystroke in a large buffer never costs work proportional to the buffer.
//!
//! Folded state is kept by raw line number. It does not follow lines when text above them is
//! inserted or removed.

use crate::text;
use script_editor_lang::BlockDelimiter;
use std::collections::{BTreeSet, HashMap};
use tracing::trace;

/// Fold region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoldRegion {
    /// Start line number (1-based, stays visible)
    pub start_line: usize,
    /// End line number (inclusive)
    pub end_line: usize,
    /// Whether folded
    pub collapsed: bool,
}

impl FoldRegion {
    /// Check if line number is within fold region
    pub fn contains_line(&self, line: usize) -> bool {
        line >= self.start_line && line <= self.end_line
    }

    /// Lines hidden while the region is collapsed.
    pub fn hidden_lines(&self) -> std::ops::RangeInclusive<usize> {
        self.start_line + 1..=self.end_line
    }
}

/// Lazily computed fold state for the current buffer.
#[derive(Debug, Clone)]
pub struct FoldRegionIndex {
    block: BlockDelimiter,
    cache: HashMap<usize, bool>,
    cache_valid: bool,
    folded: BTreeSet<usize>,
    hidden: BTreeSet<usize>,
}

impl FoldRegionIndex {
    /// Create an empty index for a language's block delimiter.
    pub fn new(block: BlockDelimiter) -> Self {
        Self {
            block,
            cache: HashMap::new(),
            cache_valid: true,
            folded: BTreeSet::new(),
            hidden: BTreeSet::new(),
        }
    }

    /// Drop every memoized foldability answer. Called on each text change.
    pub fn invalidate(&mut self) {
        self.cache_valid = false;
    }

    /// Returns `true` if the cache has not been invalidated since it was last filled.
    pub fn is_cache_valid(&self) -> bool {
        self.cache_valid
    }

    /// Number of memoized lines.
    pub fn cached_len(&self) -> usize {
        if self.cache_valid { self.cache.len() } else { 0 }
    }

    /// Returns `(foldable, folded)` for a 1-based line.
    pub fn can_fold(&mut self, line: usize, lines: &[&str]) -> (bool, bool) {
        if !self.cache_valid {
            self.cache.clear();
            self.cache_valid = true;
        }
        let foldable = match self.cache.get(&line) {
            Some(&foldable) => foldable,
            None => {
                let foldable = self.compute_foldable(line, lines);
                trace!(line, foldable, "fold cache fill");
                self.cache.insert(line, foldable);
                foldable
            }
        };
        (foldable, self.folded.contains(&line))
    }

    /// Fill the cache for an inclusive 1-based visible range and return the answers in order.
    pub fn prepare_visible(
        &mut self,
        first: usize,
        last: usize,
        lines: &[&str],
    ) -> Vec<(usize, bool, bool)> {
        let last = last.min(lines.len());
        (first.max(1)..=last)
            .map(|line| {
                let (foldable, folded) = self.can_fold(line, lines);
                (line, foldable, folded)
            })
            .collect()
    }

    fn compute_foldable(&self, line: usize, lines: &[&str]) -> bool {
        if line == 0 || line >= lines.len() {
            return false;
        }
        let current = lines[line - 1];
        let next = lines[line];
        current.trim_end().ends_with(self.block.opener())
            && text::indent_level(next) > text::indent_level(current)
    }

    /// The region starting at `line`, if the line is foldable in the current text.
    pub fn region_at(&mut self, line: usize, lines: &[&str]) -> Option<FoldRegion> {
        let (foldable, folded) = self.can_fold(line, lines);
        if !foldable {
            return None;
        }
        Some(FoldRegion {
            start_line: line,
            end_line: Self::region_end(line, lines),
            collapsed: folded,
        })
    }

    /// Last line hidden by folding `line`: deeper lines, plus blank lines followed by a deeper line.
    fn region_end(line: usize, lines: &[&str]) -> usize {
        let base = text::indent_level(lines[line - 1]);
        let mut end = line;
        for (idx, candidate) in lines.iter().enumerate().skip(line) {
            if candidate.trim().is_empty() {
                continue;
            }
            if text::indent_level(candidate) > base {
                end = idx + 1;
            } else {
                break;
            }
        }
        end
    }

    /// Fold `line`. Returns the collapsed region, or `None` if the line cannot fold.
    pub fn fold(&mut self, line: usize, lines: &[&str]) -> Option<FoldRegion> {
        let mut region = self.region_at(line, lines)?;
        self.folded.insert(line);
        self.hidden.extend(region.hidden_lines());
        region.collapsed = true;
        Some(region)
    }

    /// Unfold `line`, recomputing the boundary from the current text.
    ///
    /// Lines still covered by another collapsed region (an enclosing one or a nested one) stay
    /// hidden.
    pub fn unfold(&mut self, line: usize, lines: &[&str]) -> Option<FoldRegion> {
        if !self.folded.remove(&line) {
            return None;
        }
        if line == 0 || line > lines.len() {
            return None;
        }
        let region = FoldRegion {
            start_line: line,
            end_line: Self::region_end(line, lines),
            collapsed: false,
        };
        self.rebuild_hidden(lines);
        Some(region)
    }

    /// Recompute the hidden set from every folded line that still exists in `lines`.
    fn rebuild_hidden(&mut self, lines: &[&str]) {
        self.hidden.clear();
        for &start in &self.folded {
            if start == 0 || start > lines.len() {
                continue;
            }
            let end = Self::region_end(start, lines);
            self.hidden.extend(start + 1..=end);
        }
    }

    /// Fold or unfold `line`. Returns the new collapsed state, or `None` if nothing changed.
    pub fn toggle(&mut self, line: usize, lines: &[&str]) -> Option<bool> {
        if self.folded.contains(&line) {
            self.unfold(line, lines).map(|_| false)
        } else {
            self.fold(line, lines).map(|_| true)
        }
    }

    /// Returns `true` if `line` is hidden inside a collapsed region.
    pub fn is_hidden(&self, line: usize) -> bool {
        self.hidden.contains(&line)
    }

    /// Lines currently folded, ascending.
    pub fn folded_lines(&self) -> impl Iterator<Item = usize> + '_ {
        self.folded.iter().copied()
    }

    /// Expand everything.
    pub fn unfold_all(&mut self) {
        self.folded.clear();
        self.hidden.clear();
    }
}

impl Default for FoldRegionIndex {
    fn default() -> Self {
        Self::new(BlockDelimiter::Colon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_foldability_rule() {
        let lines = ["def f():", "    a", "x:", "y", "if x:  ", "\tz", "last:"];
        let mut index = FoldRegionIndex::default();
        assert_eq!(index.can_fold(1, &lines), (true, false));
        assert_eq!(index.can_fold(2, &lines), (false, false));
        assert_eq!(index.can_fold(3, &lines), (false, false));
        assert_eq!(index.can_fold(5, &lines), (true, false));
        assert_eq!(index.can_fold(7, &lines), (false, false));
        assert_eq!(index.can_fold(99, &lines), (false, false));
    }

    #[test]
    fn test_brace_languages_fold_on_open_brace() {
        let lines = ["proc f() {", "    print 1;", "}"];
        let mut index = FoldRegionIndex::new(BlockDelimiter::Brace);
        assert_eq!(index.can_fold(1, &lines), (true, false));
        let region = index.fold(1, &lines).unwrap();
        assert_eq!((region.start_line, region.end_line), (1, 2));
        assert!(!index.is_hidden(3));
    }

    #[test]
    fn test_fold_and_unfold_are_symmetric() {
        let lines = ["def f():", "    a", "    b", "c"];
        let mut index = FoldRegionIndex::default();

        let region = index.fold(1, &lines).unwrap();
        assert_eq!((region.start_line, region.end_line), (1, 3));
        assert!(region.collapsed);
        assert!(!index.is_hidden(1));
        assert!(index.is_hidden(2) && index.is_hidden(3));
        assert!(!index.is_hidden(4));
        assert_eq!(index.can_fold(1, &lines), (true, true));

        let region = index.unfold(1, &lines).unwrap();
        assert_eq!((region.start_line, region.end_line), (1, 3));
        assert!((1..=4).all(|l| !index.is_hidden(l)));
    }

    #[test]
    fn test_interior_blank_lines_fold_but_trailing_do_not() {
        let lines = ["class A:", "    x = 1", "", "    y = 2", "", "z = 3"];
        let mut index = FoldRegionIndex::default();
        let region = index.fold(1, &lines).unwrap();
        assert_eq!(region.end_line, 4);
        assert!(index.is_hidden(3));
        assert!(!index.is_hidden(5));
    }

    #[test]
    fn test_unfold_keeps_nested_fold_hidden() {
        let lines = ["def f():", "    if x:", "        a", "    b"];
        let mut index = FoldRegionIndex::default();
        index.fold(2, &lines).unwrap();
        index.fold(1, &lines).unwrap();
        index.unfold(1, &lines).unwrap();
        assert!(!index.is_hidden(2));
        assert!(index.is_hidden(3));
        assert!(!index.is_hidden(4));
    }

    #[test]
    fn test_unfolding_inner_region_inside_collapsed_outer_keeps_it_hidden() {
        let lines = ["def f():", "    if x:", "        a", "    b", "c"];
        let mut index = FoldRegionIndex::default();
        index.fold(2, &lines).unwrap();
        index.fold(1, &lines).unwrap();

        let region = index.unfold(2, &lines).unwrap();
        assert_eq!((region.start_line, region.end_line), (2, 3));
        assert_eq!(index.can_fold(1, &lines), (true, true));
        assert!((2..=4).all(|l| index.is_hidden(l)));
        assert!(!index.is_hidden(5));

        index.unfold(1, &lines).unwrap();
        assert!((1..=5).all(|l| !index.is_hidden(l)));
    }

    #[test]
    fn test_invalidate_drops_cache_and_fills_lazily() {
        let lines: Vec<String> = (0..10_000)
            .map(|i| if i % 2 == 0 { "if x:".to_string() } else { "    y".to_string() })
            .collect();
        let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
        let mut index = FoldRegionIndex::default();

        let visible = index.prepare_visible(5000, 5039, &lines);
        assert_eq!(visible.len(), 40);
        assert_eq!(index.cached_len(), 40);

        index.invalidate();
        assert!(!index.is_cache_valid());
        assert_eq!(index.cached_len(), 0);

        index.can_fold(1, &lines);
        assert_eq!(index.cached_len(), 1);
    }

    #[test]
    fn test_toggle_reports_new_state() {
        let lines = ["for i in x:", "    pass"];
        let mut index = FoldRegionIndex::default();
        assert_eq!(index.toggle(1, &lines), Some(true));
        assert_eq!(index.folded_lines().collect::<Vec<_>>(), vec![1]);
        assert_eq!(index.toggle(1, &lines), Some(false));
        assert_eq!(index.toggle(2, &lines), None);
        index.fold(1, &lines);
        index.unfold_all();
        assert!(!index.is_hidden(2));
    }
}
