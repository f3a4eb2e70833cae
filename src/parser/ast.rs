// AST (Abstract Syntax Tree) definitions for the minic front end

use crate::parser::lexer::Token;

/// Source location information for error reporting.
///
/// Both fields are 1-indexed. A newline moves to the next line and resets the
/// column; every other character (tabs included) advances the column by one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Location of the first character of a source file.
    pub fn start() -> Self {
        Self::new(1, 1)
    }
}

impl Default for SourceLocation {
    fn default() -> Self {
        Self::start()
    }
}

/// Binary operators, including assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Assign, // =
    // Equality
    Eq,
    Ne,
    // Comparison
    Lt,
    Le,
    Gt,
    Ge,
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow, // ^
}

impl BinOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinOp::Assign => "=",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Pow => "^",
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Plus, // +x
    Neg,  // -x
}

impl UnOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnOp::Plus => "+",
            UnOp::Neg => "-",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntLiteral {
    pub value: i64,
    pub token: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FloatLiteral {
    pub value: f64,
    pub token: Token,
}

/// String literal with its delimiting quotes already stripped from `value`
#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    pub value: String,
    pub token: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarRefExpr {
    pub name: Token,
}

/// `name[index]`
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayRefExpr {
    pub name: Token,
    pub index: Box<Expr>,
}

/// `name(arg, ...)`
#[derive(Debug, Clone, PartialEq)]
pub struct FuncCallExpr {
    pub name: Token,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryOpExpr {
    pub op: UnOp,
    pub operator: Token,
    pub operand: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOpExpr {
    pub op: BinOp,
    pub operator: Token,
    pub lhs: Box<Expr>,
    pub rhs: Box<Expr>,
}

/// Expression nodes
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    IntLiteral(IntLiteral),
    FloatLiteral(FloatLiteral),
    StringLiteral(StringLiteral),
    VarRef(VarRefExpr),
    ArrayRef(ArrayRefExpr),
    FuncCall(FuncCallExpr),
    UnaryOp(UnaryOpExpr),
    BinaryOp(BinaryOpExpr),
}

impl Expr {
    pub fn binary(op: BinOp, operator: Token, lhs: Expr, rhs: Expr) -> Self {
        Expr::BinaryOp(BinaryOpExpr {
            op,
            operator,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    pub fn unary(op: UnOp, operator: Token, operand: Expr) -> Self {
        Expr::UnaryOp(UnaryOpExpr {
            op,
            operator,
            operand: Box::new(operand),
        })
    }

    /// Get the source location of this expression (its leftmost token)
    pub fn location(&self) -> SourceLocation {
        match self {
            Expr::IntLiteral(lit) => lit.token.begin,
            Expr::FloatLiteral(lit) => lit.token.begin,
            Expr::StringLiteral(lit) => lit.token.begin,
            Expr::VarRef(var) => var.name.begin,
            Expr::ArrayRef(array) => array.name.begin,
            Expr::FuncCall(call) => call.name.begin,
            Expr::UnaryOp(unary) => unary.operator.begin,
            Expr::BinaryOp(binary) => binary.lhs.location(),
        }
    }
}

/// Scalar variable declaration, also used for function parameters
/// (which never carry an initializer).
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub var_type: Token,
    pub name: Token,
    pub init: Option<Expr>,
}

/// Fixed-size array declaration: `type name[size];`
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayDecl {
    pub elem_type: Token,
    pub name: Token,
    pub size: IntLiteral,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompoundStmt {
    pub statements: Vec<Stmt>,
}

impl CompoundStmt {
    pub fn new(statements: Vec<Stmt>) -> Self {
        Self { statements }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Box<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_branch: Box<Stmt>,
    pub else_branch: Option<Box<Stmt>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub keyword: Token,
    pub value: Option<Expr>,
}

/// Statement nodes. `for` loops never appear here: the parser rewrites them
/// into a `Compound` holding the init statement and a `While`.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expr(Expr),
    VarDecl(VarDecl),
    ArrayDecl(ArrayDecl),
    Compound(CompoundStmt),
    While(WhileStmt),
    If(IfStmt),
    Return(ReturnStmt),
    Empty,
}

impl Stmt {
    /// Get the source location of this statement, if any token produced it.
    ///
    /// Empty statements and empty blocks carry no tokens.
    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            Stmt::Expr(expr) => Some(expr.location()),
            Stmt::VarDecl(decl) => Some(decl.var_type.begin),
            Stmt::ArrayDecl(decl) => Some(decl.elem_type.begin),
            Stmt::Compound(block) => block.statements.iter().find_map(Stmt::location),
            Stmt::While(stmt) => Some(stmt.condition.location()),
            Stmt::If(stmt) => Some(stmt.condition.location()),
            Stmt::Return(stmt) => Some(stmt.keyword.begin),
            Stmt::Empty => None,
        }
    }
}

/// Function definition: `type name(params) { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub return_type: Token,
    pub name: Token,
    pub params: Vec<VarDecl>,
    pub body: CompoundStmt,
}

/// Top-level program structure
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub functions: Vec<FuncDecl>,
}

impl Program {
    pub fn new() -> Self {
        Program::default()
    }
}
