//! AST pretty printer
//!
//! Turns a tree back into minic source text. Binary and unary expressions are
//! fully parenthesized and literals keep their original lexeme, so parsing the
//! output again yields the same tree shape. `for` loops come out in their
//! rewritten block-and-while form.

use crate::parser::ast::*;
use std::fmt;

const INDENT: &str = "    ";

/// Render a whole program, one function after another.
pub fn print_program(program: &Program) -> String {
    let mut printer = Printer::default();
    for (i, function) in program.functions.iter().enumerate() {
        if i > 0 {
            printer.out.push('\n');
        }
        printer.func_decl(function);
    }
    printer.out
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&print_program(self))
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::IntLiteral(lit) => write!(f, "{}", lit.token.lexeme),
            Expr::FloatLiteral(lit) => write!(f, "{}", lit.token.lexeme),
            Expr::StringLiteral(lit) => write!(f, "\"{}\"", lit.value),
            Expr::VarRef(var) => write!(f, "{}", var.name.lexeme),
            Expr::ArrayRef(array) => write!(f, "{}[{}]", array.name.lexeme, array.index),
            Expr::FuncCall(call) => {
                write!(f, "{}(", call.name.lexeme)?;
                for (i, arg) in call.args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
            Expr::UnaryOp(unary) => write!(f, "({}{})", unary.op.symbol(), unary.operand),
            Expr::BinaryOp(binary) => write!(
                f,
                "({} {} {})",
                binary.lhs,
                binary.op.symbol(),
                binary.rhs
            ),
        }
    }
}

#[derive(Default)]
struct Printer {
    out: String,
    depth: usize,
}

impl Printer {
    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn func_decl(&mut self, function: &FuncDecl) {
        let params = function
            .params
            .iter()
            .map(|param| format!("{} {}", param.var_type.lexeme, param.name.lexeme))
            .collect::<Vec<_>>()
            .join(", ");

        self.line(&format!(
            "{} {}({}) {{",
            function.return_type.lexeme, function.name.lexeme, params
        ));
        self.block_contents(&function.body);
        self.line("}");
    }

    fn block_contents(&mut self, block: &CompoundStmt) {
        self.depth += 1;
        for stmt in &block.statements {
            self.stmt(stmt);
        }
        self.depth -= 1;
    }

    /// Print `header` followed by a statement body: blocks open on the header
    /// line, anything else goes on its own indented line.
    fn headed(&mut self, header: &str, body: &Stmt) {
        match body {
            Stmt::Compound(block) => {
                self.line(&format!("{header} {{"));
                self.block_contents(block);
                self.line("}");
            }
            _ => {
                self.line(header);
                self.depth += 1;
                self.stmt(body);
                self.depth -= 1;
            }
        }
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expr(expr) => self.line(&format!("{expr};")),
            Stmt::VarDecl(decl) => match &decl.init {
                Some(init) => self.line(&format!(
                    "{} {} = {};",
                    decl.var_type.lexeme, decl.name.lexeme, init
                )),
                None => self.line(&format!("{} {};", decl.var_type.lexeme, decl.name.lexeme)),
            },
            Stmt::ArrayDecl(decl) => self.line(&format!(
                "{} {}[{}];",
                decl.elem_type.lexeme, decl.name.lexeme, decl.size.token.lexeme
            )),
            Stmt::Compound(block) => {
                self.line("{");
                self.block_contents(block);
                self.line("}");
            }
            Stmt::While(stmt) => {
                self.headed(&format!("while ({})", stmt.condition), &stmt.body);
            }
            Stmt::If(stmt) => {
                self.headed(&format!("if ({})", stmt.condition), &stmt.then_branch);
                if let Some(else_branch) = &stmt.else_branch {
                    self.headed("else", else_branch);
                }
            }
            Stmt::Return(stmt) => match &stmt.value {
                Some(value) => self.line(&format!("return {value};")),
                None => self.line("return;"),
            },
            Stmt::Empty => self.line(";"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::tokenize;
    use crate::parser::parse::{parse, parse_expression};

    fn print_expr(source: &str) -> String {
        parse_expression(&tokenize(source).tokens).unwrap().to_string()
    }

    #[test]
    fn test_expression_parenthesization() {
        assert_eq!(print_expr("1+2*3"), "(1 + (2 * 3))");
        assert_eq!(print_expr("-a^2"), "(-(a ^ 2))");
        assert_eq!(print_expr("x = y = f(1, \"s\")"), "(x = (y = f(1, \"s\")))");
        assert_eq!(print_expr("a[i + 1] <= 2.50"), "(a[(i + 1)] <= 2.50)");
    }

    #[test]
    fn test_print_function_with_desugared_for() {
        let tokens = tokenize("int f(int n, float x) { for (; n; n = n - 1) x; return; }").tokens;
        let program = parse(&tokens).program.unwrap();

        let expected = "\
int f(int n, float x) {
    {
        ;
        while (n) {
            {
                x;
            }
            (n = (n - 1));
        }
    }
    return;
}
";
        assert_eq!(print_program(&program), expected);
    }

    #[test]
    fn test_print_if_else_chain() {
        let tokens =
            tokenize("void g() { if (a) b; else if (c) { d; } else e; int arr[3]; }").tokens;
        let program = parse(&tokens).program.unwrap();

        let expected = "\
void g() {
    if (a)
        b;
    else
        if (c) {
            d;
        }
        else
            e;
    int arr[3];
}
";
        assert_eq!(program.to_string(), expected);
    }
}
