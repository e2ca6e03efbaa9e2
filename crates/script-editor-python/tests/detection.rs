use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use script_editor_core::text::split_lines;
use script_editor_core::{
    CheckerConfig, CompileError, Compiler, DetectorConfig, ErrorKind, ErrorRecord,
    MultiPassErrorDetector, SyntaxChecker,
};
use script_editor_lang::LanguageConfig;
use script_editor_python::PythonCompiler;
use std::collections::BTreeSet;

/// Records the line count of every source handed to the compiler.
struct Recording {
    inner: PythonCompiler,
    line_counts: Vec<usize>,
}

impl Compiler for Recording {
    fn compile(&mut self, source: &str) -> Result<(), CompileError> {
        self.line_counts.push(split_lines(source).len());
        self.inner.compile(source)
    }
}

fn recording() -> Recording {
    Recording {
        inner: PythonCompiler::new().unwrap(),
        line_counts: Vec::new(),
    }
}

fn detector<C: Compiler>(compiler: C) -> MultiPassErrorDetector<C> {
    MultiPassErrorDetector::new(compiler, LanguageConfig::python(), DetectorConfig::default())
}

#[test]
fn test_unclosed_paren_is_one_error_on_def_line() {
    let records = detector(PythonCompiler::new().unwrap()).detect("def f(\n    pass\n");
    assert_eq!(
        records,
        vec![ErrorRecord::new(
            1,
            6,
            "'(' was never closed",
            ErrorKind::SyntaxError
        )]
    );
}

#[test]
fn test_missing_colon_and_incomplete_def() {
    let records = detector(PythonCompiler::new().unwrap()).detect("if True\n    x = 1\ndef\n");
    assert!(records.len() >= 2);
    assert!(records.iter().any(|r| r.line == 1));
    assert!(records.iter().any(|r| r.line == 3));
    assert!(records.iter().all(|r| r.kind == ErrorKind::SyntaxError));
}

#[test]
fn test_blank_input_makes_no_attempts() {
    for text in ["", "   ", "\n\n", " \t \n  \n"] {
        let mut d = detector(recording());
        let pass = d.detect_pass(text);
        assert!(pass.found.is_empty());
        assert_eq!(pass.attempt, 0);
        assert!(d.compiler().line_counts.is_empty());
    }
}

#[test]
fn test_fifty_errors_are_bounded() {
    let text: String = (0..50).map(|i| format!("x{i} = = {i}\n")).collect();
    let mut d = detector(recording());
    let pass = d.detect_pass(&text);
    assert_eq!(pass.attempt, 10);
    assert_eq!(d.compiler().line_counts.len(), 10);
    assert_eq!(pass.found.len(), 10);
    let lines: BTreeSet<usize> = pass.found.iter().map(|r| r.line).collect();
    assert_eq!(lines.len(), 10);
    assert!(lines.iter().all(|&l| (1..=50).contains(&l)));
}

#[test]
fn test_fifty_lone_defs_are_capped() {
    let text = "def\n".repeat(50);
    let records = detector(PythonCompiler::new().unwrap()).detect(&text);
    assert_eq!(records.len(), 10);
    assert!(records.iter().all(|r| r.kind == ErrorKind::SyntaxError));
}

#[test]
fn test_independent_errors_across_blocks() {
    let text = "\
def a():
    return (1 +
x = 1

def b()
    pass

class C:
    y = 'unterminated
";
    let records = detector(PythonCompiler::new().unwrap()).detect(text);
    let lines: Vec<(usize, &str)> = records
        .iter()
        .map(|r| (r.line, r.message.as_str()))
        .collect();
    assert!(lines.contains(&(2, "'(' was never closed")), "{lines:?}");
    assert!(lines.iter().any(|&(l, _)| (5..=6).contains(&l)), "{lines:?}");
    assert!(lines.iter().any(|&(l, _)| (8..=9).contains(&l)), "{lines:?}");
}

#[test]
fn test_incomplete_keyword_reported_after_attempt_cap() {
    let mut d = MultiPassErrorDetector::new(
        PythonCompiler::new().unwrap(),
        LanguageConfig::python(),
        DetectorConfig {
            max_attempts: 1,
            max_records: 10,
        },
    );
    let pass = d.detect_pass("x = = 1\ny = 2\ndef\n");
    assert_eq!(pass.attempt, 1);
    assert_eq!(pass.found.len(), 2, "{:?}", pass.found);
    assert_eq!(pass.found[0].line, 1);
    assert_eq!(pass.found[0].kind, ErrorKind::SyntaxError);
    assert_eq!(
        pass.found[1],
        ErrorRecord::new(3, 1, "Incomplete statement: def", ErrorKind::PatternWarning)
    );
}

#[test]
fn test_incomplete_keyword_reported_after_repeated_line() {
    // Pins every error to line 1, so the second attempt repeats a masked line.
    struct FirstLine(PythonCompiler);
    impl Compiler for FirstLine {
        fn compile(&mut self, source: &str) -> Result<(), CompileError> {
            match self.0.compile(source) {
                Err(CompileError::Syntax {
                    column, message, ..
                }) => Err(CompileError::Syntax {
                    line: Some(1),
                    column,
                    message,
                }),
                other => other,
            }
        }
    }
    let mut d = detector(FirstLine(PythonCompiler::new().unwrap()));
    let pass = d.detect_pass("x = = 1\ny = 2\ndef\n");
    assert_eq!(pass.attempt, 2);
    assert_eq!(pass.masked_lines, BTreeSet::from([1]));
    assert_eq!(pass.found.len(), 2, "{:?}", pass.found);
    assert_eq!(pass.found[0].kind, ErrorKind::SyntaxError);
    assert_eq!(
        pass.found[1],
        ErrorRecord::new(3, 1, "Incomplete statement: def", ErrorKind::PatternWarning)
    );
}

fn random_program(rng: &mut StdRng) -> String {
    const FRAGMENTS: &[&str] = &[
        "x = 1",
        "    y = (2,",
        "def f(a):",
        "    return a",
        "if x",
        "else:",
        "print 'hi'",
        "",
        "# comment",
        "z = [1, 2]]",
        "s = '''doc",
        "'''",
        "class",
        "    pass",
        "for i in range(3):",
        "        deep = 1",
        "w = 'open",
        "import",
    ];
    let count = rng.gen_range(1..40);
    let mut out = String::new();
    for _ in 0..count {
        out.push_str(FRAGMENTS.choose(rng).copied().unwrap_or(""));
        out.push('\n');
    }
    out
}

#[test]
fn test_masking_preserves_line_count() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..200 {
        let text = random_program(&mut rng);
        let expected = split_lines(&text).len();
        let mut d = detector(recording());
        let pass = d.detect_pass(&text);
        assert!(pass.attempt <= 10);
        assert!(pass.found.len() <= 10);
        assert!(
            d.compiler().line_counts.iter().all(|&n| n == expected),
            "{text:?}"
        );
        assert!(pass.found.iter().all(|r| r.line >= 1 && r.line <= expected));
    }
}

#[test]
fn test_detection_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut checker = SyntaxChecker::new(
        PythonCompiler::new().unwrap(),
        LanguageConfig::python(),
        &CheckerConfig::default(),
    )
    .unwrap();
    for _ in 0..100 {
        let text = random_program(&mut rng);
        let first = checker.check(&text);
        let second = checker.check(&text);
        assert_eq!(first, second);
    }
}

#[test]
fn test_comment_only_error_line_is_relocated() {
    // The unmatched bracket sits on line 2; a compiler that gave up later would point past it.
    struct LateReporter(PythonCompiler);
    impl Compiler for LateReporter {
        fn compile(&mut self, source: &str) -> Result<(), CompileError> {
            match self.0.compile(source) {
                Err(CompileError::Syntax { message, .. }) => Err(CompileError::Syntax {
                    line: Some(3),
                    column: None,
                    message,
                }),
                other => other,
            }
        }
    }
    let mut checker = SyntaxChecker::new(
        LateReporter(PythonCompiler::new().unwrap()),
        LanguageConfig::python(),
        &CheckerConfig::default(),
    )
    .unwrap();
    let records = checker.check("def f():\n    return g(1))\n# trailing note\n");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].line, 2);
    assert_eq!(records[0].message, "unmatched ')'");
}
