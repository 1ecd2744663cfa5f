use pretty_assertions::assert_eq;
use tree_scheme::Interpreter;

fn run_all(interpreter: &mut Interpreter, forms: &[&str]) -> Vec<String> {
    forms
        .iter()
        .map(|f| interpreter.run(f).unwrap())
        .collect()
}

#[test]
fn empty_source_prints_nothing() {
    let mut interpreter = Interpreter::new();
    assert_eq!(interpreter.run("").unwrap(), "");
    assert_eq!(interpreter.run("   ").unwrap(), "");
}

#[test]
fn integer_and_boolean_round_trip() {
    let mut interpreter = Interpreter::new();
    assert_eq!(interpreter.run("42").unwrap(), "42");
    assert_eq!(interpreter.run("-7").unwrap(), "-7");
    assert_eq!(interpreter.run("#t").unwrap(), "#t");
    assert_eq!(interpreter.run("#f").unwrap(), "#f");
}

#[test]
fn quote_identity() {
    let mut interpreter = Interpreter::new();
    assert_eq!(interpreter.run("'(1 2 3)").unwrap(), "(1 2 3)");
    assert_eq!(interpreter.run("(quote (1 2))").unwrap(), "(1 2)");
    assert_eq!(interpreter.run("'x").unwrap(), "x");
}

#[test]
fn pair_printer_shapes() {
    let mut interpreter = Interpreter::new();
    assert_eq!(interpreter.run("(cons 1 2)").unwrap(), "(1 . 2)");
    assert_eq!(interpreter.run("(list 1 2 3)").unwrap(), "(1 2 3)");
    assert_eq!(interpreter.run("(cons 1 (cons 2 '()))").unwrap(), "(1 2)");
    assert_eq!(interpreter.run("'()").unwrap(), "()");
}

#[test]
fn short_circuit_and_or() {
    let mut interpreter = Interpreter::new();
    interpreter.run("(define hit 0)").unwrap();
    interpreter
        .run("(and #f (set! hit (+ hit 1)))")
        .unwrap();
    assert_eq!(interpreter.run("hit").unwrap(), "0");

    interpreter
        .run("(or #t (set! hit (+ hit 1)))")
        .unwrap();
    assert_eq!(interpreter.run("hit").unwrap(), "0");

    assert_eq!(
        interpreter.run("(and 1 2 'c '(f g))").unwrap(),
        "(f g)"
    );
    assert_eq!(interpreter.run("(or #f (< 2 1))").unwrap(), "#f");
}

#[test]
fn closure_captures_frame_by_reference() {
    let mut interpreter = Interpreter::new();
    interpreter.run("(define x 1)").unwrap();
    interpreter
        .run("(define get-x (lambda () x))")
        .unwrap();
    interpreter.run("(set! x 99)").unwrap();
    assert_eq!(interpreter.run("(get-x)").unwrap(), "99");

    interpreter.run("(define x 2)").unwrap();
    assert_eq!(interpreter.run("(get-x)").unwrap(), "99");
}

#[test]
fn pair_aliasing_through_set_car() {
    let mut interpreter = Interpreter::new();
    interpreter.run("(define x '(1 . 2))").unwrap();
    interpreter.run("(set-car! x 5)").unwrap();
    assert_eq!(interpreter.run("(car x)").unwrap(), "5");
    assert_eq!(interpreter.run("(cdr x)").unwrap(), "2");
}

#[test]
fn list_predicate_honesty() {
    let mut interpreter = Interpreter::new();
    assert_eq!(interpreter.run("(list? '())").unwrap(), "#t");
    assert_eq!(interpreter.run("(list? '(1 2 3))").unwrap(), "#t");
    assert_eq!(interpreter.run("(list? '(1 . 2))").unwrap(), "#f");
}

#[test]
fn list_tail_and_list_ref() {
    let mut interpreter = Interpreter::new();
    assert_eq!(interpreter.run("(list-tail '(1 2 3) 1)").unwrap(), "(2 3)");
    assert_eq!(interpreter.run("(list-ref '(1 2 3) 2)").unwrap(), "3");
}

#[test]
fn closures_accumulate_state_independently() {
    let mut interpreter = Interpreter::new();
    let forms = [
        "(define x 1)",
        "(define range (lambda (x) (lambda () (set! x (+ x 1)) x)))",
        "(define my-range (range 10))",
        "(my-range)",
        "(my-range)",
        "(my-range)",
        "x",
    ];
    let outputs = run_all(&mut interpreter, &forms);
    assert_eq!(outputs[3], "11");
    assert_eq!(outputs[4], "12");
    assert_eq!(outputs[5], "13");
    assert_eq!(outputs[6], "1");
}

#[test]
fn recursive_fibonacci() {
    let mut interpreter = Interpreter::new();
    interpreter
        .run("(define (fib x) (if (< x 3) 1 (+ (fib (- x 1)) (fib (- x 2)))))")
        .unwrap();
    assert_eq!(interpreter.run("(fib 7)").unwrap(), "13");
}

#[test]
fn nested_define_captures_its_own_frame() {
    let mut interpreter = Interpreter::new();
    let forms = [
        "(define (foo x) (define (bar) (set! x (+ (* x 2) 2)) x) bar)",
        "(define my-foo (foo 20))",
        "(define foo 1543)",
        "(my-foo)",
    ];
    let outputs = run_all(&mut interpreter, &forms);
    assert_eq!(outputs[3], "42");
}

#[test]
fn syntax_errors_are_classified() {
    let mut interpreter = Interpreter::new();
    assert!(matches!(
        interpreter.run("(if 1)"),
        Err(tree_scheme::SchemeError::Syntax(_))
    ));
    assert!(matches!(
        interpreter.run("(define)"),
        Err(tree_scheme::SchemeError::Syntax(_))
    ));
    assert!(matches!(
        interpreter.run("1 2"),
        Err(tree_scheme::SchemeError::Syntax(_))
    ));
}

#[test]
fn runtime_errors_are_classified() {
    let mut interpreter = Interpreter::new();
    assert!(matches!(
        interpreter.run("(car 1)"),
        Err(tree_scheme::SchemeError::Runtime(_))
    ));
    assert!(matches!(
        interpreter.run("(/ 1 0)"),
        Err(tree_scheme::SchemeError::Runtime(_))
    ));
    assert!(matches!(
        interpreter.run("(1 2 3)"),
        Err(tree_scheme::SchemeError::Runtime(_))
    ));
}

#[test]
fn name_errors_are_classified() {
    let mut interpreter = Interpreter::new();
    assert!(matches!(
        interpreter.run("unbound-name"),
        Err(tree_scheme::SchemeError::Name(_))
    ));
    assert!(matches!(
        interpreter.run("(set! unbound-name 1)"),
        Err(tree_scheme::SchemeError::Name(_))
    ));
}
