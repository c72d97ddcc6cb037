use quadvm::interpreter::engine::{Vm, VmConfig};
use quadvm::interpreter::errors::RuntimeError;
use quadvm::memory::store::ConstantTable;
use quadvm::parser::constants::parse_constants;
use quadvm::parser::parser::Parser;
use std::fs;
use std::path::Path;

const CONSTANTS: &str = r#"
int     200000  7
int     200001  2
int     200002  -7
int     200003  9223372036854775807
int     200004  5000000000
real    210000  0.5
real    210001  2.0
bool    220000  true
bool    220001  false
string  230000  "ab"
string  230001  "cd"
"#;

/// Run `lines` against the shared constant table and return the output
fn eval(lines: &[&str]) -> Result<Vec<String>, RuntimeError> {
    let table = parse_constants(CONSTANTS).expect("Constant table failed to load");
    let program = Parser::from_lines(lines).parse_program()?;
    Vm::new().run(program, table)
}

#[test]
fn test_int_arithmetic() {
    let output = eval(&[
        "+ 200000 200001 170000",
        "print 170000",
        "- 200000 200001 170001",
        "print 170001",
        "* 200000 200001 170002",
        "print 170002",
        "** 200000 200001 170003",
        "print 170003",
        "mod 200002 200001 170004",
        "print 170004",
    ])
    .expect("Execution failed");
    assert_eq!(output, vec!["9", "5", "14", "49", "1"]);
}

#[test]
fn test_real_promotion() {
    let output = eval(&[
        "+ 200000 210000 177500",
        "print 177500",
        "/ 200000 200001 177501",
        "print 177501",
        "* 210001 200001 177502",
        "print 177502",
    ])
    .expect("Execution failed");
    assert_eq!(output, vec!["7.5", "3.5", "4.0"]);
}

#[test]
fn test_string_operators() {
    let output = eval(&[
        "+ 230000 230001 192500",
        "print 192500",
        "* 230001 200001 192501",
        "print 192501",
        "< 230000 230001 185000",
        "print 185000",
    ])
    .expect("Execution failed");
    assert_eq!(output, vec!["abcd", "cdcd", "True"]);
}

#[test]
fn test_logic_and_unary() {
    let output = eval(&[
        "and 220000 220001 185000",
        "print 185000",
        "or 220000 220001 185001",
        "print 185001",
        "not 220001 185002",
        "print 185002",
        "u- 200000 170000",
        "print 170000",
        "++ 200000 170001",
        "print 170001",
        "-- 200000 170002",
        "print 170002",
    ])
    .expect("Execution failed");
    assert_eq!(output, vec!["False", "True", "True", "-7", "8", "6"]);
}

#[test]
fn test_mixed_kind_comparison_is_type_mismatch() {
    let err = eval(&["< 230000 200000 185000"]).unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::TypeMismatch { ref operation, pc: Some(0), .. } if operation == "<"
    ));

    // equality across kinds is just false
    let output = eval(&["equals 230000 200000 185000", "print 185000"]).expect("Execution failed");
    assert_eq!(output, vec!["False"]);
}

#[test]
fn test_overflow_is_reported() {
    let err = eval(&["+ 200003 200003 170000"]).unwrap_err();
    assert!(matches!(err, RuntimeError::IntegerOverflow { pc: Some(0), .. }));
}

#[test]
fn test_huge_string_repeat_is_an_error() {
    let err = eval(&["* 230000 200003 192500"]).unwrap_err();
    assert!(matches!(err, RuntimeError::IntegerOverflow { pc: Some(0), .. }));
}

#[test]
fn test_power_with_exponent_beyond_u32() {
    // 7 ** 5000000000 really overflows
    let err = eval(&["** 200000 200004 170000"]).unwrap_err();
    assert!(matches!(err, RuntimeError::IntegerOverflow { pc: Some(0), .. }));

    let table = parse_constants("int 200000 1\nint 200001 5000000000\nint 200002 -1\n")
        .expect("Constant table failed to load");
    let program = Parser::from_lines(&[
        "** 200000 200001 170000",
        "print 170000",
        "** 200002 200001 170001",
        "print 170001",
    ])
    .parse_program()
    .expect("Decoding failed");
    let output = Vm::new().run(program, table).expect("Execution failed");
    assert_eq!(output, vec!["1", "1"]);
}

#[test]
fn test_mod_by_zero() {
    let err = eval(&["- 200000 200000 170000", "mod 200000 170000 170001"]).unwrap_err();
    assert_eq!(err.pc(), Some(1));
    assert_eq!(err.kind(), "division-by-zero");
}

#[test]
fn test_sum_to_five_demo() {
    let dir = Path::new("demos");
    let source =
        fs::read_to_string(dir.join("sum_to_five.quad")).expect("Failed to read demo program");
    let constants = fs::read_to_string(dir.join("sum_to_five.consts"))
        .expect("Failed to read demo constants");

    let table = parse_constants(&constants).expect("Constant table failed to load");
    let program = Parser::new(&source).parse_program().expect("Decoding failed");

    let mut vm = Vm::with_config(VmConfig {
        history_limit: Some(64 * 1024 * 1024),
        max_steps: Some(1_000),
    });
    vm.run(program, table).expect("Execution failed");

    let output = vm.output().get_output();
    println!("VM output:\n{}", output.join("\n"));
    assert_eq!(output, vec!["1", "2", "3", "4", "5", "sum = 15"]);

    // One snapshot per executed instruction plus the final state
    assert_eq!(vm.total_snapshots(), vm.steps() + 1);
}

#[test]
fn test_empty_constant_table() {
    let program = Parser::new("GOTO 1\n").parse_program().expect("Decoding failed");
    let output = Vm::new()
        .run(program, ConstantTable::default())
        .expect("Execution failed");
    assert!(output.is_empty());
}
