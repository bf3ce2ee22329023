use l1c::listing::{write_rpn, write_tables, SEPARATOR};
use l1c::{compile, run, L1c, L1cError};
use l1_types::{Literal, Tables};
use l1_vm::RuntimeErrorKind;
use std::io::Write as _;
use test_log::test;
use tracing::info;

fn value_of(tables: &Tables, name: &str) -> Option<Literal> {
    tables
        .identifiers
        .by_name(name)
        .and_then(|entry| entry.value())
        .cloned()
}

#[test]
fn declared_then_assigned() -> eyre::Result<()> {
    let finished = run("var y: number\ny = 5\ny = y + 1")?;
    assert_eq!(value_of(&finished.tables, "y"), Some(Literal::Number(6.0)));
    Ok(())
}

#[test]
fn typed_constants_do_not_mix() {
    let error = run("val s: string = 'a'\nval n: number = s + 1").expect_err("should fail");
    let L1cError::Runtime(error) = error else {
        panic!("expected a runtime error, got {error}");
    };
    assert!(matches!(
        error.error(),
        RuntimeErrorKind::TypeMismatch { .. }
    ));
    assert_eq!(error.row(), Some(2));
}

#[test]
fn syntax_errors_stop_before_running() {
    let error = run("var y").expect_err("should fail");
    assert!(matches!(error, L1cError::Syntax(_)));
    assert!(error.to_string().starts_with("Syntax is wrong!"));
}

#[test]
fn unidentified_lexemes_are_reported() {
    let error = compile("var x = 1\nx = x ? 2").expect_err("should fail");
    assert_eq!(
        error.to_string(),
        "Unidentified lexem \"?\" on the row 2."
    );
}

#[test]
fn counting_loop() -> eyre::Result<()> {
    let finished = run("var sum = 0\nfor var i = 1 to 11 do\nsum = sum + i\nend")?;
    assert_eq!(value_of(&finished.tables, "sum"), Some(Literal::Number(55.0)));
    assert_eq!(finished.compiled.program.tables.identifiers.marks().count(), 2);
    Ok(())
}

#[test]
fn labels_and_jumps() -> eyre::Result<()> {
    let source = "var n = 0\nvar steps = 0\nagain:\nn = n + 2\nsteps = steps + 1\nif n < 10 then goto again";
    let finished = run(source)?;
    assert_eq!(value_of(&finished.tables, "n"), Some(Literal::Number(10.0)));
    assert_eq!(value_of(&finished.tables, "steps"), Some(Literal::Number(5.0)));
    Ok(())
}

#[test]
fn step_limit_is_configurable() -> eyre::Result<()> {
    let l1c = L1c::builder().step_limit(100).build()?;
    let error = l1c.run("var x = 0\nL:\nx = x + 1\ngoto L").expect_err("should not finish");
    let L1cError::Runtime(error) = error else {
        panic!("expected a runtime error, got {error}");
    };
    assert_eq!(error.error(), &RuntimeErrorKind::StepLimitExceeded(100));
    Ok(())
}

#[test]
fn run_source_file() -> eyre::Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(file, "val greeting: string = 'hello'")?;
    writeln!(file, "val limit: number = 3")?;
    writeln!(file, "var same = limit == 3")?;
    let finished = L1c::default().run_file(file.path())?;
    assert_eq!(value_of(&finished.tables, "same"), Some(Literal::Boolean(true)));
    assert_eq!(
        value_of(&finished.tables, "greeting"),
        Some(Literal::String("hello".to_string()))
    );

    let mut listing = vec![];
    write_tables(&mut listing, &finished.tables)?;
    writeln!(listing, "{SEPARATOR}")?;
    write_rpn(&mut listing, &finished.compiled.program.rpn, &finished.tables)?;
    let listing = String::from_utf8(listing)?;
    info!("listing:\n{listing}");
    assert_eq!(listing.lines().filter(|line| *line == SEPARATOR).count(), 2);
    Ok(())
}

#[test]
fn missing_source_file() {
    let error = L1c::default()
        .run_file("does/not/exist.l1")
        .expect_err("should fail");
    assert!(matches!(error, L1cError::Io(_)));
}
