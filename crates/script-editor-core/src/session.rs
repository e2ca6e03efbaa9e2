//! Editor surface integration.
//!
//! [`CheckSession`] glues the pieces to a host editor widget through the narrow
//! [`EditorSurface`] capability trait:
//!
//! - **Edits**: [`CheckSession::on_text_changed`] re-arms the debounce timer and drops the fold cache
//! - **Passes**: [`CheckSession::poll`] runs the pipeline once the timer fires and rewrites error annotations
//! - **Gutter**: [`CheckSession::gutter`] answers per visible line, filling the fold cache lazily
//! - **Change Notifications**: subscribers see every version bump
//!
//! Everything runs on the host's UI thread; a pass never overlaps another because a new edit
//! always replaces the pending deadline before a new one is armed.
//!
//! # Example
//!
//! ```rust
//! use script_editor_core::{CheckSession, CheckerConfig, CompileError, Compiler, EditorSurface};
//! use script_editor_lang::LanguageConfig;
//! use std::time::{Duration, Instant};
//!
//! struct AlwaysOk;
//! impl Compiler for AlwaysOk {
//!     fn compile(&mut self, _source: &str) -> Result<(), CompileError> {
//!         Ok(())
//!     }
//! }
//!
//! struct Buffer(String);
//! impl EditorSurface for Buffer {
//!     fn text(&self) -> String {
//!         self.0.clone()
//!     }
//!     fn visible_line_range(&self) -> (usize, usize) {
//!         (1, 40)
//!     }
//! }
//!
//! let mut session =
//!     CheckSession::new(AlwaysOk, LanguageConfig::python(), &CheckerConfig::default()).unwrap();
//! let buffer = Buffer("def f():\n    pass\n".to_string());
//!
//! let t0 = Instant::now();
//! session.on_text_changed(t0);
//! assert!(!session.poll(&buffer, t0));
//! assert!(session.poll(&buffer, t0 + Duration::from_millis(1500)));
//!
//! let gutter = session.gutter(&buffer);
//! assert!(gutter[0].foldable);
//! ```

use crate::annotations::{AnnotationKinds, LineAnnotationStore};
use crate::checker::SyntaxChecker;
use crate::compiler::Compiler;
use crate::config::CheckerConfig;
use crate::debounce::DebounceScheduler;
use crate::diagnostics::ErrorRecord;
use crate::error::CheckerError;
use crate::folding::{FoldRegion, FoldRegionIndex};
use crate::text;
use script_editor_lang::LanguageConfig;
use serde::Serialize;
use std::time::Instant;
use tracing::debug;

/// What the session needs from the editing widget.
pub trait EditorSurface {
    /// Current full buffer text.
    fn text(&self) -> String;

    /// Inclusive, 1-based range of visible lines.
    fn visible_line_range(&self) -> (usize, usize);
}

/// State change types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionChangeType {
    /// The buffer was edited.
    TextChanged,
    /// A detection pass replaced the error records.
    DiagnosticsChanged,
    /// Breakpoints changed.
    BreakpointsChanged,
    /// The debugger's current line changed.
    DebugLineChanged,
    /// A region was folded or unfolded.
    FoldingChanged,
}

/// State change record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionChange {
    /// Change type
    pub change_type: SessionChangeType,
    /// Old version number
    pub old_version: u64,
    /// New version number
    pub new_version: u64,
}

/// State change callback function type
pub type SessionChangeCallback = Box<dyn FnMut(&SessionChange) + Send>;

/// Everything the gutter painter needs for one visible line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GutterLine {
    /// 1-based line number.
    pub line: usize,
    /// Annotation kinds on the line.
    pub kinds: AnnotationKinds,
    /// Whether the line starts a foldable region.
    pub foldable: bool,
    /// Whether that region is collapsed.
    pub folded: bool,
    /// Whether the line is hidden inside a collapsed region.
    pub hidden: bool,
    /// First error message on the line, for tooltips.
    pub message: Option<String>,
}

/// Per-document checking session.
pub struct CheckSession<C> {
    checker: SyntaxChecker<C>,
    scheduler: DebounceScheduler,
    store: LineAnnotationStore,
    folds: FoldRegionIndex,
    version: u64,
    callbacks: Vec<SessionChangeCallback>,
}

impl<C: Compiler> CheckSession<C> {
    /// Create a session for `lang`.
    pub fn new(compiler: C, lang: LanguageConfig, config: &CheckerConfig) -> Result<Self, CheckerError> {
        let folds = FoldRegionIndex::new(lang.block);
        Ok(Self {
            checker: SyntaxChecker::new(compiler, lang, config)?,
            scheduler: DebounceScheduler::new(config.debounce_delay()),
            store: LineAnnotationStore::new(),
            folds,
            version: 0,
            callbacks: Vec::new(),
        })
    }

    /// Subscribe to state changes.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&SessionChange) + Send + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    /// Current version number
    pub fn version(&self) -> u64 {
        self.version
    }

    fn notify_change(&mut self, change_type: SessionChangeType) {
        let old_version = self.version;
        self.version += 1;
        let change = SessionChange {
            change_type,
            old_version,
            new_version: self.version,
        };
        for callback in &mut self.callbacks {
            callback(&change);
        }
    }

    /// Annotation store (read-only).
    pub fn store(&self) -> &LineAnnotationStore {
        &self.store
    }

    /// Debounce scheduler (read-only).
    pub fn scheduler(&self) -> &DebounceScheduler {
        &self.scheduler
    }

    /// Current error records.
    pub fn errors(&self) -> &[ErrorRecord] {
        self.store.errors()
    }

    /// Report a text mutation at `now`.
    pub fn on_text_changed(&mut self, now: Instant) {
        self.scheduler.notify(now);
        self.folds.invalidate();
        self.notify_change(SessionChangeType::TextChanged);
    }

    /// Drive the debounce timer. Returns `true` if a pass ran.
    pub fn poll<S: EditorSurface + ?Sized>(&mut self, surface: &S, now: Instant) -> bool {
        if !self.scheduler.poll(now) {
            return false;
        }
        self.run_now(surface);
        true
    }

    /// Run a pass immediately, e.g. right after a file is opened.
    pub fn run_now<S: EditorSurface + ?Sized>(&mut self, surface: &S) {
        let text = surface.text();
        let records = self.checker.check(&text);
        let line_count = text::split_lines(&text).len();
        debug!(records = records.len(), line_count, "detection pass finished");
        self.store.replace_errors(records, line_count);
        self.notify_change(SessionChangeType::DiagnosticsChanged);
    }

    /// Gutter state for every visible line.
    pub fn gutter<S: EditorSurface + ?Sized>(&mut self, surface: &S) -> Vec<GutterLine> {
        let text = surface.text();
        let lines = text::split_lines(&text);
        let (first, last) = surface.visible_line_range();

        let visible = self.folds.prepare_visible(first, last, &lines);
        let mut out = Vec::with_capacity(visible.len());
        for (line, foldable, folded) in visible {
            self.store.mark_fold_start(line, foldable);
            out.push(GutterLine {
                line,
                kinds: self.store.kinds_at(line, lines.len()),
                foldable,
                folded,
                hidden: self.folds.is_hidden(line),
                message: self.store.errors_on(line).next().map(|r| r.message.clone()),
            });
        }
        out
    }

    /// [`gutter`](Self::gutter) serialized as JSON, for hosts behind an FFI boundary.
    pub fn gutter_json<S: EditorSurface + ?Sized>(&mut self, surface: &S) -> serde_json::Result<String> {
        serde_json::to_string(&self.gutter(surface))
    }

    /// `(foldable, folded)` for one line.
    pub fn fold_state<S: EditorSurface + ?Sized>(&mut self, surface: &S, line: usize) -> (bool, bool) {
        let text = surface.text();
        self.folds.can_fold(line, &text::split_lines(&text))
    }

    /// Fold or unfold the region starting at `line`.
    pub fn toggle_fold<S: EditorSurface + ?Sized>(&mut self, surface: &S, line: usize) -> Option<FoldRegion> {
        let text = surface.text();
        let lines = text::split_lines(&text);
        let (_, folded) = self.folds.can_fold(line, &lines);
        let region = if folded {
            self.folds.unfold(line, &lines)
        } else {
            self.folds.fold(line, &lines)
        };
        if region.is_some() {
            self.notify_change(SessionChangeType::FoldingChanged);
        }
        region
    }

    /// Returns `true` if `line` is hidden by a collapsed region.
    pub fn is_hidden(&self, line: usize) -> bool {
        self.folds.is_hidden(line)
    }

    /// Toggle a breakpoint. Returns whether the line now has one.
    pub fn toggle_breakpoint(&mut self, line: usize) -> bool {
        let now_set = self.store.toggle_breakpoint(line);
        self.notify_change(SessionChangeType::BreakpointsChanged);
        now_set
    }

    /// Replace all breakpoints, as reported by the debugger.
    pub fn set_breakpoints(&mut self, lines: impl IntoIterator<Item = usize>) {
        self.store.clear_breakpoints();
        for line in lines {
            self.store.set_breakpoint(line);
        }
        self.notify_change(SessionChangeType::BreakpointsChanged);
    }

    /// Breakpoint lines, ascending.
    pub fn breakpoints(&self) -> Vec<usize> {
        self.store.breakpoints()
    }

    /// Set or clear the line the debugger is executing.
    pub fn set_debug_line(&mut self, line: Option<usize>) {
        if self.store.debug_line() == line {
            return;
        }
        self.store.set_debug_line(line);
        self.notify_change(SessionChangeType::DebugLineChanged);
    }

    /// The line the debugger is executing.
    pub fn debug_line(&self) -> Option<usize> {
        self.store.debug_line()
    }
}
