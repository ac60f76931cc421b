use exprc::{
    compile,
    ir::{execute, Instruction},
    Options,
};

fn eval(text: &str) -> i64 {
    let function = compile(text, "main").unwrap();
    execute(&function.body).unwrap()
}

#[test]
fn precedence() {
    assert_eq!(eval("2+3*4"), 14);
    assert_eq!(eval("2*3+4"), 10);
    assert_eq!(eval("(2+3)*4"), 20);
    assert_eq!(eval("10-6/2"), 7);
}

#[test]
fn left_associativity() {
    assert_eq!(eval("8-3-2"), 3);
    assert_eq!(eval("16/4/2"), 2);
    assert_eq!(eval("2*9/3"), 6);
    assert_eq!(eval("100/10*10"), 100);
}

#[test]
fn unary_and_grouping() {
    assert_eq!(eval("-(3+4)"), -7);
    assert_eq!(eval("+(3+4)"), 7);
    assert_eq!(eval("-3*-4"), 12);
    assert_eq!(eval("-(-(2))"), 2);
    assert_eq!(eval("((((1))))"), 1);
}

#[test]
fn signed_division_truncates_toward_zero() {
    assert_eq!(eval("-7/2"), -3);
    assert_eq!(eval("7/-2"), -3);
    assert_eq!(eval("-7/-2"), 3);
    assert_eq!(eval("7/2"), 3);
}

#[test]
fn whitespace_tolerant() {
    assert_eq!(eval("  12 + 34 - 5 "), 41);
    assert_eq!(eval("5+20-4"), 21);
    assert_eq!(eval("\t1\n+\n1"), 2);
}

fn is_sign(c: char) -> bool {
    c == '+' || c == '-'
}

#[test]
fn additive_chains_match_left_fold() {
    let cases = ["0", "42", "1+2+3+4", "10-1-1-1", "5-10+3", "1000-999+1-2"];

    for text in cases {
        let mut total = 0i64;
        let mut sign = 1;
        for part in text.split_inclusive(is_sign) {
            let digits = part.trim_end_matches(is_sign);
            total += sign * digits.parse::<i64>().unwrap();
            sign = if part.ends_with('-') { -1 } else { 1 };
        }

        assert_eq!(eval(text), total, "{}", text);
    }
}

#[test]
fn large_literals() {
    assert_eq!(eval("9223372036854775807"), i64::MAX);
    assert_eq!(eval("-9223372036854775807-1"), i64::MIN);
}

#[test]
fn body_is_balanced() {
    let function = compile("1+2*(3-4)/5", "main").unwrap();

    let pushes = function
        .body
        .iter()
        .filter(|i| matches!(i, Instruction::PushConst(_) | Instruction::Push(_)))
        .count();
    let pops = function
        .body
        .iter()
        .filter(|i| matches!(i, Instruction::Pop(_)))
        .count();

    assert_eq!(pushes, pops);
}

#[test]
fn runtime_division_by_zero_is_not_a_compile_error() {
    let function = compile("1/0", "main").unwrap();
    assert!(execute(&function.body).is_err());

    assert!(exprc::compile_to_string("1/0", &Options::default()).is_ok());
}
