#![warn(missing_docs)]
//! Script Editor Core - headless syntax checking and gutter state for script editors
//!
//! # Overview
//!
//! `script-editor-core` is the non-visual half of a script editor embedded in a 3D host
//! application. It does not paint anything: a UI layer feeds it buffer text and the visible line
//! window, and reads back error records, breakpoints, the debugger's current line and fold state.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  CheckSession (editor surface integration)  │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  DebounceScheduler                          │  ← Edit bursts → one pass
//! ├─────────────────────────────────────────────┤
//! │  SyntaxChecker                              │  ← Pipeline boundary
//! │    MultiPassErrorDetector → Resolver        │
//! ├─────────────────────────────────────────────┤
//! │  LineAnnotationStore / FoldRegionIndex      │  ← Gutter state
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use script_editor_core::{CompileError, Compiler, SyntaxChecker, CheckerConfig};
//! use script_editor_lang::LanguageConfig;
//!
//! /// A toy compiler that rejects any line containing `??`.
//! struct Toy;
//!
//! impl Compiler for Toy {
//!     fn compile(&mut self, source: &str) -> Result<(), CompileError> {
//!         match source.lines().position(|l| l.contains("??") && !l.trim_start().starts_with('#')) {
//!             Some(idx) => Err(CompileError::syntax(idx + 1, 1, "invalid syntax")),
//!             None => Ok(()),
//!         }
//!     }
//! }
//!
//! let mut checker = SyntaxChecker::new(Toy, LanguageConfig::python(), &CheckerConfig::default()).unwrap();
//! let records = checker.check("a = 1\nb ??\nc ??\n");
//! assert_eq!(records.iter().map(|r| r.line).collect::<Vec<_>>(), vec![2, 3]);
//! ```
//!
//! # Module Description
//!
//! - [`diagnostics`] - error records produced by a detection pass
//! - [`compiler`] - the single-error compiler seam
//! - [`detector`] - multi-pass error discovery with line masking
//! - [`resolver`] - re-localization of implausible error lines
//! - [`debounce`] - single-slot cooperative timer
//! - [`folding`] - lazily cached indentation folding
//! - [`annotations`] - sparse per-line gutter annotations
//! - [`checker`] - the detection pipeline
//! - [`session`] - editor-surface integration and change notifications

pub mod annotations;
pub mod checker;
pub mod compiler;
pub mod config;
pub mod debounce;
pub mod detector;
pub mod diagnostics;
pub mod error;
pub mod folding;
pub mod resolver;
pub mod session;
pub mod text;

pub use annotations::{AnnotationKinds, LineAnnotationStore};
pub use checker::SyntaxChecker;
pub use compiler::{CompileError, Compiler};
pub use config::{CheckerConfig, DetectorConfig, ResolverConfig};
pub use debounce::{DebounceScheduler, DebounceState};
pub use detector::{DetectionPass, MultiPassErrorDetector};
pub use diagnostics::{ErrorKind, ErrorRecord};
pub use error::CheckerError;
pub use folding::{FoldRegion, FoldRegionIndex};
pub use resolver::ErrorLineResolver;
pub use session::{
    CheckSession, EditorSurface, GutterLine, SessionChange, SessionChangeCallback,
    SessionChangeType,
};
