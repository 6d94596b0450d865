use std::collections::HashMap;

use exprcc::{compile, CompileError, LexError, Syntax, SyntaxError};

/// Execute the subset of x86-64 the code generator emits and return `%rax`
/// at `ret`.
fn run(asm: &str, syntax: Syntax) -> i64 {
    let mut regs: HashMap<String, i64> = HashMap::new();
    let mut stack: Vec<i64> = vec![];

    let operand = |s: &str| -> String { s.trim().trim_start_matches(['%', '$']).to_string() };

    for line in asm.lines().map(str::trim) {
        if line.starts_with('.') || line.ends_with(':') {
            continue;
        }
        let (mnemonic, rest) = line.split_once(' ').unwrap_or((line, ""));
        let args: Vec<String> = rest.split(',').map(operand).collect();
        // normalise to (dst, src)
        let (dst, src) = match (syntax, args.as_slice()) {
            (Syntax::Att, [src, dst]) => (dst.clone(), src.clone()),
            (Syntax::Intel, [dst, src]) => (dst.clone(), src.clone()),
            (_, [one]) => (one.clone(), String::new()),
            _ => unreachable!("{line}"),
        };
        let value = |regs: &HashMap<String, i64>, s: &str| -> i64 {
            s.parse().unwrap_or_else(|_| regs[s])
        };

        match mnemonic {
            "mov" => {
                let v = value(&regs, &src);
                regs.insert(dst, v);
            }
            "push" => stack.push(regs[&dst]),
            "pop" => {
                let v = stack.pop().expect("stack underflow");
                regs.insert(dst, v);
            }
            "add" | "sub" | "imul" => {
                let (a, b) = (regs[&dst], value(&regs, &src));
                let v = match mnemonic {
                    "add" => a.wrapping_add(b),
                    "sub" => a.wrapping_sub(b),
                    _ => a.wrapping_mul(b),
                };
                regs.insert(dst, v);
            }
            "cqo" => {
                let rdx = if regs["rax"] < 0 { -1 } else { 0 };
                regs.insert("rdx".to_string(), rdx);
            }
            "idiv" => {
                let (a, b) = (regs["rax"], regs[&dst]);
                regs.insert("rax".to_string(), a / b);
                regs.insert("rdx".to_string(), a % b);
            }
            "ret" => {
                assert!(stack.is_empty(), "stack not balanced");
                return regs["rax"];
            }
            _ => panic!("unknown instruction {line}"),
        }
    }
    panic!("program fell off the end without ret");
}

fn eval(src: &str) -> i64 {
    let att = run(&compile(src, Syntax::Att).unwrap(), Syntax::Att);
    let intel = run(&compile(src, Syntax::Intel).unwrap(), Syntax::Intel);
    assert_eq!(att, intel, "dialects disagree on {src}");
    att
}

#[test]
fn additive_chains() {
    assert_eq!(eval("10"), 10);
    assert_eq!(eval("1-2+3"), 2);
    assert_eq!(eval(" 12 + 34 - 5 "), 41);
    assert_eq!(eval("0"), 0);
}

#[test]
fn precedence() {
    assert_eq!(eval("2+3*4"), 14);
    assert_eq!(eval("2*3+4"), 10);
    assert_eq!(eval("10-6/2"), 7);
}

#[test]
fn left_associativity() {
    assert_eq!(eval("8-3-2"), 3);
    assert_eq!(eval("100/10/5"), 2);
    assert_eq!(eval("12/2*3"), 18);
}

#[test]
fn parentheses() {
    assert_eq!(eval("(2+3)*4"), 20);
    assert_eq!(eval("8-(3-2)"), 7);
    assert_eq!(eval("5+6*7"), 47);
    assert_eq!(eval("5*(9-6)"), 15);
    assert_eq!(eval("(3+5)/2"), 4);
}

#[test]
fn unary() {
    assert_eq!(eval("-3+5"), 2);
    assert_eq!(eval("-(2+3)"), -5);
    assert_eq!(eval("+7"), 7);
    assert_eq!(eval("-10+20"), 10);
    assert_eq!(eval("2*-3"), -6);
    assert_eq!(eval("-(-3)"), 3);
}

#[test]
fn division_truncates_toward_zero() {
    assert_eq!(eval("7/2"), 3);
    assert_eq!(eval("-7/2"), -3);
    assert_eq!(eval("7/-2"), -3);
    assert_eq!(eval("-7/-2"), 3);
}

#[test]
fn wraps_like_native_arithmetic() {
    assert_eq!(eval("9223372036854775807+1"), i64::MIN);
}

#[test]
fn deterministic_output() {
    let src = "(1+2)*-3/4";
    assert_eq!(
        compile(src, Syntax::Att).unwrap(),
        compile(src, Syntax::Att).unwrap()
    );
    assert_eq!(
        compile(src, Syntax::Intel).unwrap(),
        compile(src, Syntax::Intel).unwrap()
    );
}

#[test]
fn program_shape() {
    let asm = compile("1", Syntax::Att).unwrap();
    assert_eq!(asm.lines().filter(|l| *l == "main:").count(), 1);
    assert_eq!(asm.lines().last(), Some("  ret"));
    assert!(compile("1", Syntax::Intel)
        .unwrap()
        .starts_with("  .intel_syntax noprefix\n"));
}

#[test]
fn rejects_malformed_input() {
    assert!(matches!(
        compile("1+", Syntax::Att),
        Err(CompileError::Syntax {
            source: SyntaxError::UnexpectedToken { offset: 2, .. }
        })
    ));
    assert!(matches!(
        compile("(1+2", Syntax::Att),
        Err(CompileError::Syntax { .. })
    ));
    assert!(matches!(
        compile("1+a", Syntax::Att),
        Err(CompileError::Lex {
            source: LexError::InvalidChar { ch: 'a', offset: 2 }
        })
    ));
    assert!(matches!(
        compile("", Syntax::Att),
        Err(CompileError::Syntax { .. })
    ));
    assert!(matches!(
        compile("99999999999999999999", Syntax::Att),
        Err(CompileError::Lex {
            source: LexError::NumberOverflow { .. }
        })
    ));
}

#[test]
fn diagnostics() {
    let err = compile("(1+2", Syntax::Att).unwrap_err();
    assert_eq!(err.report("(1+2"), "(1+2\n    ^ expected ')', but got end of input");

    let err = compile("1 + 2 3", Syntax::Att).unwrap_err();
    assert_eq!(
        err.report("1 + 2 3"),
        "1 + 2 3\n      ^ expected an operator or end of input, but got '3'"
    );
}
