// Integration tests for the minic tokenizer and parser

use indoc::indoc;
use minic::diagnostics::Stage;
use minic::error::CompileError;
use minic::parser::ast::*;
use minic::parser::lexer::{tokenize, TokenKind};
use minic::parser::parse::{parse, parse_expression};
use minic::parser::parse_source;

fn expr(source: &str) -> Expr {
    let lexed = tokenize(source);
    assert!(!lexed.had_error(), "lexer errors: {:?}", lexed.diagnostics);
    parse_expression(&lexed.tokens).expect("Expression parsing failed")
}

fn int_value(expr: &Expr) -> i64 {
    match expr {
        Expr::IntLiteral(lit) => lit.value,
        other => panic!("Expected int literal, got {:?}", other),
    }
}

fn binary(expr: &Expr) -> &BinaryOpExpr {
    match expr {
        Expr::BinaryOp(binary) => binary,
        other => panic!("Expected binary op, got {:?}", other),
    }
}

fn body_of(program: &Program, index: usize) -> &[Stmt] {
    &program.functions[index].body.statements
}

#[test]
fn test_tokenize_simple_sum() {
    let lexed = tokenize("1+2");

    assert!(!lexed.had_error());
    let kinds: Vec<_> = lexed.tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![TokenKind::IntLiteral, TokenKind::Plus, TokenKind::IntLiteral]
    );

    let columns: Vec<_> = lexed.tokens.iter().map(|t| t.begin.column).collect();
    assert_eq!(columns, vec![1, 2, 3]);
    for token in &lexed.tokens {
        assert_eq!(token.begin.line, 1);
        assert_eq!(token.end.column, token.begin.column + 1);
    }
}

#[test]
fn test_tokenize_unterminated_string_terminates() {
    let lexed = tokenize("\"abc");

    assert!(lexed.had_error());
    assert!(lexed.tokens.is_empty());
    assert_eq!(lexed.diagnostics[0].stage, Stage::Lexer);
    assert_eq!(lexed.diagnostics[0].message, "Unterminated string literal");
}

#[test]
fn test_tokenize_multi_dot_float() {
    let lexed = tokenize("1.2.3");

    assert!(lexed.had_error());
    assert_eq!(lexed.tokens.len(), 1);
    let token = &lexed.tokens[0];
    assert_eq!(token.kind, TokenKind::FloatLiteral);
    assert_eq!(token.lexeme, "1.2.3");
    assert_eq!(token.begin, SourceLocation::new(1, 1));
    assert_eq!(token.end, SourceLocation::new(1, 6));
}

#[test]
fn test_multi_dot_float_fails_to_parse() {
    let lexed = tokenize("1.2.3");
    let err = parse_expression(&lexed.tokens).unwrap_err();

    assert_eq!(err.message, "Malformed float literal '1.2.3'");
    assert_eq!(err.location, SourceLocation::new(1, 1));
}

#[test]
fn test_parse_single_function() {
    let program = parse_source("int main() { x; }").expect("Parsing failed");

    assert_eq!(program.functions.len(), 1);
    let main = &program.functions[0];
    assert_eq!(main.return_type.lexeme, "int");
    assert_eq!(main.name.lexeme, "main");
    assert!(main.params.is_empty());

    let body = body_of(&program, 0);
    assert_eq!(body.len(), 1);
    assert!(matches!(&body[0], Stmt::Expr(Expr::VarRef(var)) if var.name.lexeme == "x"));
}

#[test]
fn test_precedence() {
    let tree = expr("1+2*3");

    let add = binary(&tree);
    assert_eq!(add.op, BinOp::Add);
    assert_eq!(int_value(&add.lhs), 1);

    let mul = binary(&add.rhs);
    assert_eq!(mul.op, BinOp::Mul);
    assert_eq!(int_value(&mul.lhs), 2);
    assert_eq!(int_value(&mul.rhs), 3);
}

#[test]
fn test_power_is_right_associative() {
    let tree = expr("2^3^4");

    let outer = binary(&tree);
    assert_eq!(outer.op, BinOp::Pow);
    assert_eq!(int_value(&outer.lhs), 2);

    let inner = binary(&outer.rhs);
    assert_eq!(inner.op, BinOp::Pow);
    assert_eq!(int_value(&inner.lhs), 3);
    assert_eq!(int_value(&inner.rhs), 4);
}

#[test]
fn test_subtraction_is_left_associative() {
    let tree = expr("10 - 4 - 3");

    let outer = binary(&tree);
    assert_eq!(outer.op, BinOp::Sub);
    assert_eq!(int_value(&outer.rhs), 3);

    let inner = binary(&outer.lhs);
    assert_eq!(int_value(&inner.lhs), 10);
    assert_eq!(int_value(&inner.rhs), 4);
}

#[test]
fn test_assignment_is_right_associative() {
    let tree = expr("a = b = 1");

    let outer = binary(&tree);
    assert_eq!(outer.op, BinOp::Assign);
    assert!(matches!(&*outer.lhs, Expr::VarRef(v) if v.name.lexeme == "a"));

    let inner = binary(&outer.rhs);
    assert_eq!(inner.op, BinOp::Assign);
    assert_eq!(int_value(&inner.rhs), 1);
}

#[test]
fn test_unary_binds_looser_than_power() {
    let tree = expr("-2^2");

    match tree {
        Expr::UnaryOp(unary) => {
            assert_eq!(unary.op, UnOp::Neg);
            assert_eq!(binary(&unary.operand).op, BinOp::Pow);
        }
        other => panic!("Expected unary op, got {:?}", other),
    }
}

#[test]
fn test_for_loop_desugars_to_while() {
    let source = "int main() { for(int i=0;i<10;i=i+1){x;} }";
    let program = parse_source(source).expect("Parsing failed");

    let body = body_of(&program, 0);
    assert_eq!(body.len(), 1);
    let Stmt::Compound(outer) = &body[0] else {
        panic!("Expected compound statement, got {:?}", body[0]);
    };
    assert_eq!(outer.statements.len(), 2);

    match &outer.statements[0] {
        Stmt::VarDecl(decl) => {
            assert_eq!(decl.var_type.lexeme, "int");
            assert_eq!(decl.name.lexeme, "i");
            assert_eq!(int_value(decl.init.as_ref().unwrap()), 0);
        }
        other => panic!("Expected declaration, got {:?}", other),
    }

    let Stmt::While(while_stmt) = &outer.statements[1] else {
        panic!("Expected while, got {:?}", outer.statements[1]);
    };
    assert_eq!(binary(&while_stmt.condition).op, BinOp::Lt);

    let Stmt::Compound(loop_body) = &*while_stmt.body else {
        panic!("Expected compound loop body");
    };
    assert_eq!(loop_body.statements.len(), 2);

    // Original body, wrapped once more
    match &loop_body.statements[0] {
        Stmt::Compound(wrapper) => {
            assert_eq!(wrapper.statements.len(), 1);
            match &wrapper.statements[0] {
                Stmt::Compound(original) => {
                    assert!(matches!(
                        &original.statements[..],
                        [Stmt::Expr(Expr::VarRef(v))] if v.name.lexeme == "x"
                    ));
                }
                other => panic!("Expected original block, got {:?}", other),
            }
        }
        other => panic!("Expected wrapper block, got {:?}", other),
    }

    match &loop_body.statements[1] {
        Stmt::Expr(increment) => assert_eq!(binary(increment).op, BinOp::Assign),
        other => panic!("Expected increment, got {:?}", other),
    }
}

#[test]
fn test_for_loop_with_empty_and_expression_init() {
    let source = indoc! {"
        int main() {
            for (; i; i = i - 1) ;
            for (i = 0; i < 3; i = i + 1) ;
        }
    "};
    let program = parse_source(source).expect("Parsing failed");
    let body = body_of(&program, 0);

    let Stmt::Compound(first) = &body[0] else {
        panic!("Expected compound statement");
    };
    assert!(matches!(first.statements[0], Stmt::Empty));

    let Stmt::Compound(second) = &body[1] else {
        panic!("Expected compound statement");
    };
    assert!(matches!(&second.statements[0], Stmt::Expr(Expr::BinaryOp(b)) if b.op == BinOp::Assign));
}

#[test]
fn test_missing_function_name() {
    let lexed = tokenize("int (){}");
    let parsed = parse(&lexed.tokens);

    assert!(parsed.had_error());
    assert!(parsed.program.is_none());
    assert_eq!(parsed.diagnostics.len(), 1);
    assert_eq!(
        parsed.diagnostics[0].to_string(),
        "parser: error: 1:5: Expected token type 'IDENTIFIER', but got 'LEFT_PAREN'"
    );
}

#[test]
fn test_declarations_and_arrays() {
    let source = indoc! {r#"
        void setup(int n, float scale) {
            int count;
            float ratio = 0.5;
            int values[16];
            values[n - 1] = count;
            print("done", values[0]);
        }
    "#};
    let program = parse_source(source).expect("Parsing failed");

    let setup = &program.functions[0];
    assert_eq!(setup.return_type.lexeme, "void");
    let params: Vec<_> = setup
        .params
        .iter()
        .map(|p| (p.var_type.lexeme.as_str(), p.name.lexeme.as_str()))
        .collect();
    assert_eq!(params, vec![("int", "n"), ("float", "scale")]);

    let body = body_of(&program, 0);
    assert_eq!(body.len(), 5);
    assert!(matches!(&body[0], Stmt::VarDecl(d) if d.init.is_none()));
    match &body[1] {
        Stmt::VarDecl(decl) => match decl.init.as_ref().unwrap() {
            Expr::FloatLiteral(lit) => assert_eq!(lit.value, 0.5),
            other => panic!("Expected float literal, got {:?}", other),
        },
        other => panic!("Expected declaration, got {:?}", other),
    }
    match &body[2] {
        Stmt::ArrayDecl(decl) => {
            assert_eq!(decl.elem_type.lexeme, "int");
            assert_eq!(decl.name.lexeme, "values");
            assert_eq!(decl.size.value, 16);
        }
        other => panic!("Expected array declaration, got {:?}", other),
    }
    match &body[3] {
        Stmt::Expr(Expr::BinaryOp(assign)) => {
            assert!(matches!(&*assign.lhs, Expr::ArrayRef(a) if a.name.lexeme == "values"));
        }
        other => panic!("Expected assignment, got {:?}", other),
    }
    match &body[4] {
        Stmt::Expr(Expr::FuncCall(call)) => {
            assert_eq!(call.name.lexeme, "print");
            assert_eq!(call.args.len(), 2);
            assert!(matches!(&call.args[0], Expr::StringLiteral(s) if s.value == "done"));
            assert!(matches!(&call.args[1], Expr::ArrayRef(_)));
        }
        other => panic!("Expected call, got {:?}", other),
    }
}

#[test]
fn test_control_flow_statements() {
    let source = indoc! {"
        int abs(int x) {
            if (x < 0) return -x;
            else if (x == 0) { return 0; }
            while (x != 1) x = x / 2;
            return;
        }
    "};
    let program = parse_source(source).expect("Parsing failed");
    let body = body_of(&program, 0);
    assert_eq!(body.len(), 3);

    match &body[0] {
        Stmt::If(if_stmt) => {
            assert_eq!(binary(&if_stmt.condition).op, BinOp::Lt);
            assert!(matches!(&*if_stmt.then_branch, Stmt::Return(r) if r.value.is_some()));
            match if_stmt.else_branch.as_deref() {
                Some(Stmt::If(nested)) => {
                    assert!(nested.else_branch.is_none());
                    assert!(matches!(&*nested.then_branch, Stmt::Compound(_)));
                }
                other => panic!("Expected nested if, got {:?}", other),
            }
        }
        other => panic!("Expected if, got {:?}", other),
    }

    match &body[1] {
        Stmt::While(while_stmt) => {
            assert_eq!(binary(&while_stmt.condition).op, BinOp::Ne);
            assert!(matches!(&*while_stmt.body, Stmt::Expr(_)));
        }
        other => panic!("Expected while, got {:?}", other),
    }

    assert!(matches!(&body[2], Stmt::Return(r) if r.value.is_none()));
}

#[test]
fn test_dangling_else_binds_to_nearest_if() {
    let program = parse_source("int f() { if (a) if (b) c; else d; }").expect("Parsing failed");

    let Stmt::If(outer) = &body_of(&program, 0)[0] else {
        panic!("Expected if");
    };
    assert!(outer.else_branch.is_none());
    assert!(matches!(&*outer.then_branch, Stmt::If(inner) if inner.else_branch.is_some()));
}

#[test]
fn test_multiple_functions_and_comments() {
    let source = indoc! {"
        // helpers
        int one() { return 1; } // trailing
        int two() { return one() + one(); }
    "};
    let program = parse_source(source).expect("Parsing failed");

    let names: Vec<_> = program
        .functions
        .iter()
        .map(|f| f.name.lexeme.as_str())
        .collect();
    assert_eq!(names, vec!["one", "two"]);
}

#[test]
fn test_locations_span_lines() {
    let source = indoc! {"
        int main() {
            total = 1;
        }
    "};
    let program = parse_source(source).expect("Parsing failed");

    let stmt = &body_of(&program, 0)[0];
    assert_eq!(stmt.location(), Some(SourceLocation::new(2, 5)));
}

#[test]
fn test_syntax_error_messages() {
    let cases = [
        ("int main() { x = ; }", "Unexpected token type 'SEMICOLON' for atom", 1, 18),
        ("int main() { int a[3; }", "Expected ']' after array size", 1, 21),
        ("int main() { f(1, 2; }", "Expected ')' after function arguments", 1, 20),
        ("int main() { while x) ; }", "Expected '(' after 'while'", 1, 20),
        ("int main() { return 1 }", "Expected ';' after return", 1, 23),
    ];

    for (source, message, line, column) in cases {
        let err = parse_source(source).unwrap_err();
        let diagnostics = err.diagnostics();
        assert_eq!(diagnostics.len(), 1, "source: {source}");
        assert_eq!(diagnostics[0].message, message, "source: {source}");
        assert_eq!(
            (diagnostics[0].line(), diagnostics[0].column()),
            (line, column),
            "source: {source}"
        );
    }
}

#[test]
fn test_lexical_errors_are_all_reported() {
    let source = indoc! {"
        int main() {
            x = 1 $ 2;
            y = !3;
        }
    "};
    let err = parse_source(source).unwrap_err();

    match err {
        CompileError::Lex(diagnostics) => {
            assert_eq!(diagnostics.len(), 2);
            assert_eq!(diagnostics[0].message, "Invalid character '$'");
            assert_eq!(diagnostics[0].location, SourceLocation::new(2, 11));
            assert_eq!(diagnostics[1].message, "Expected '=' after '!'");
            assert_eq!(diagnostics[1].location, SourceLocation::new(3, 9));
        }
        other => panic!("Expected lexical errors, got {:?}", other),
    }
}

#[test]
fn test_integer_out_of_range() {
    let err = parse_source("int main() { x = 99999999999999999999; }").unwrap_err();

    let diagnostics = err.diagnostics();
    assert_eq!(
        diagnostics[0].message,
        "Integer literal '99999999999999999999' is out of range"
    );
}
