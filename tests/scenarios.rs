//! End-to-end scenarios driving `compile_source` on complete programs,
//! asserting on the emitted listing and/or diagnostic text. The last test
//! drives the file-based `compile_file` entry point instead, over a real
//! `tempfile` temp directory, to exercise the on-disk driver glue the
//! in-memory scenarios above skip.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use mppc::compile_file;
use mppc::compile_source;
use mppc::config::CompilerConfig;

struct Shared(Rc<RefCell<Vec<u8>>>);

impl Write for Shared {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().write(buf)
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn compile(source: &str) -> (String, String, String) {
    let errs = Rc::new(RefCell::new(Vec::new()));
    let warns = Rc::new(RefCell::new(Vec::new()));
    let config = CompilerConfig::default();
    let result = compile_source(
        source,
        &config,
        Box::new(Shared(errs.clone())),
        Box::new(Shared(warns.clone())),
    );
    (
        result.quadruples,
        String::from_utf8(errs.borrow().clone()).unwrap(),
        String::from_utf8(warns.borrow().clone()).unwrap(),
    )
}

#[test]
fn simple_assignment_emits_the_expected_quadruples() {
    let (quads, errs, _warns) = compile("int main() { int x = 3; x = x + 1; return x; }");
    assert!(errs.is_empty(), "unexpected errors: {errs}");
    for expected in [
        "PROC main",
        "PUSH_INT 3",
        "POP_INT x",
        "PUSH_INT x",
        "PUSH_INT 1",
        "ADD_INT",
        "POP_INT x",
        "PUSH_INT x",
        "RET",
        "ENDP main",
    ] {
        assert!(quads.contains(expected), "missing `{expected}` in:\n{quads}");
    }
}

#[test]
fn duplicate_case_value_is_an_error_with_a_note_and_suppresses_emission() {
    let (quads, errs, warns) = compile(
        "int main() { int x = 0; switch (x) { case 1: break; case 1: break; } return 0; }",
    );
    assert!(quads.is_empty());
    assert!(errs.contains("duplicate case value"), "{errs}");
    assert!(warns.contains("previously used here"), "{warns}");
}

#[test]
fn break_outside_loop_or_switch_is_an_error() {
    let (quads, errs, _warns) = compile("int main() { break; return 0; }");
    assert!(quads.is_empty());
    assert!(errs.contains("break-statement not within loop or switch"), "{errs}");
}

#[test]
fn uninitialized_use_is_an_error_before_the_unused_warning() {
    let (quads, errs, warns) = compile_with_warnings("int main() { int x; return x; }");
    assert!(quads.is_empty());
    assert!(errs.contains("used without being initialized"), "{errs}");
    assert!(warns.contains("is never used"), "{warns}");
}

fn compile_with_warnings(source: &str) -> (String, String, String) {
    let errs = Rc::new(RefCell::new(Vec::new()));
    let warns = Rc::new(RefCell::new(Vec::new()));
    let mut config = CompilerConfig::default();
    config.warnings_enabled = true;
    let result = compile_source(
        source,
        &config,
        Box::new(Shared(errs.clone())),
        Box::new(Shared(warns.clone())),
    );
    (
        result.quadruples,
        String::from_utf8(errs.borrow().clone()).unwrap(),
        String::from_utf8(warns.borrow().clone()).unwrap(),
    )
}

#[test]
fn shadowing_across_nested_scopes_produces_suffixed_aliases_in_emission() {
    let (quads, errs, _warns) = compile(
        "int x; int f() { int x = 1; { int x = 2; return x; } } int main() { return f(); }",
    );
    assert!(errs.is_empty(), "unexpected errors: {errs}");
    assert!(quads.contains("POP_INT x@1"), "{quads}");
    assert!(quads.contains("POP_INT x@2"), "{quads}");
    assert!(quads.contains("PUSH_INT x@2"), "{quads}");
}

#[test]
fn cross_initialization_in_switch_is_an_error_with_a_note() {
    let (quads, errs, warns) = compile(
        "int main() { int x = 0; switch (x) { int y = 1; case 1: return y; default: return 0; } }",
    );
    assert!(quads.is_empty());
    assert!(errs.contains("jump to case label"), "{errs}");
    assert!(warns.contains("crosses initialization of 'int y'"), "{warns}");
}

#[test]
fn compile_file_writes_the_listing_to_the_configured_output_path() {
    let dir = tempfile::tempdir().unwrap();
    let source_path = dir.path().join("main.mpp");
    let output_path = dir.path().join("main.quad");
    std::fs::write(&source_path, "int main() { return 0; }").unwrap();

    let config = CompilerConfig {
        output_path: output_path.clone(),
        ..CompilerConfig::default()
    };
    let result = compile_file(&source_path, &config).unwrap();
    assert!(!result.had_errors);

    let written = std::fs::read_to_string(&output_path).unwrap();
    assert_eq!(written, result.quadruples);
    assert!(written.contains("PROC main"));
}
