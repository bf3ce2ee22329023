use l1_grammar::{parse, Program};
use l1_lexing::lex;
use l1_rpn::{Instr, Op};
use l1_types::ValueType;
use test_log::test;

fn compile(source: &str) -> Program {
    let lexed = lex(source);
    assert!(lexed.is_clean(), "{:?}", lexed.diagnostics);
    parse(&lexed.lexemes, lexed.tables).expect("should parse")
}

#[test]
fn declaration_lowers_to_postfix() {
    let program = compile("val x: number = 3 + 4");
    assert_eq!(program.rpn.to_text(&program.tables), "x val 3 4 + =");
    assert!(program.rpn.iter().all(|record| record.row == 1));
}

#[test]
fn for_loop_allocates_two_marks() {
    let program = compile("var x = 0\nvar i: number\nfor i = 0 to 3 do x = x + 1 end");
    let marks = program.tables.identifiers.marks().collect::<Vec<_>>();
    assert_eq!(marks.len(), 2);
    assert!(marks.iter().all(|mark| mark.value_type() == ValueType::Mark));
    assert_eq!(
        program.rpn.to_text(&program.tables),
        "x var 0 = i var i 0 = _m2 : i 3 < _m3 if x x 1 + = i i 1 + = _m2 goto _m3 :"
    );
}

#[test]
fn multi_row_for_loop() {
    let program = compile("var s = 0\nfor var i = 1 to 10 do\ns = s + i\nend");
    let records = program.rpn.records();
    let jump = records
        .iter()
        .position(|record| record.instr == Instr::Op(Op::Goto))
        .expect("loop jumps back");
    assert_eq!(records[jump].row, 4);
    assert_eq!(records[0].row, 1);
}

#[test]
fn constant_definition() {
    let program = compile("var x: string\nx = 'hello'");
    assert_eq!(program.rpn.to_text(&program.tables), "x var x 'hello' =");
}

#[test]
fn condition_and_labels() {
    let program = compile("var a = 1\nvar b = 2\nif a > b then goto done\na = 3\ndone:");
    assert_eq!(
        program.rpn.to_text(&program.tables),
        "a var 1 = b var 2 = a b > _m3 if done goto _m3 : a 3 = done :"
    );
    assert_eq!(
        program
            .tables
            .identifiers
            .by_name("done")
            .map(|done| done.value_type()),
        Some(ValueType::Mark)
    );
}
