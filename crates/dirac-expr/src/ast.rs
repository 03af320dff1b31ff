//! Abstract syntax tree for evaluator expressions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// Real numeric literal.
    Number(f64),
    /// Named constant (`pi`, `e`, `i`).
    Constant(Constant),
    /// Unary negation.
    Neg(Box<Expression>),
    /// Binary operation.
    BinOp {
        left: Box<Expression>,
        op: BinOp,
        right: Box<Expression>,
    },
    /// Function call.
    FnCall {
        function: Function,
        args: Vec<Expression>,
    },
    /// Matrix literal, row by row.
    Matrix(Vec<Vec<Expression>>),
    /// Parenthesized expression.
    Paren(Box<Expression>),
}

impl Expression {
    /// Height of the tree; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        let children = match self {
            Expression::Number(_) | Expression::Constant(_) => 0,
            Expression::Neg(e) | Expression::Paren(e) => e.depth(),
            Expression::BinOp { left, right, .. } => left.depth().max(right.depth()),
            Expression::FnCall { args, .. } => {
                args.iter().map(Expression::depth).max().unwrap_or(0)
            }
            Expression::Matrix(rows) => rows
                .iter()
                .flatten()
                .map(Expression::depth)
                .max()
                .unwrap_or(0),
        };
        children + 1
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinOp {
    /// Operator symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Pow => "^",
        }
    }
}

/// Named constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Constant {
    /// π
    Pi,
    /// Euler's number.
    E,
    /// The imaginary unit.
    I,
}

impl Constant {
    /// Look up a constant by identifier.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "pi" => Some(Constant::Pi),
            "e" => Some(Constant::E),
            "i" => Some(Constant::I),
            _ => None,
        }
    }

    /// Identifier of the constant.
    pub fn name(self) -> &'static str {
        match self {
            Constant::Pi => "pi",
            Constant::E => "e",
            Constant::I => "i",
        }
    }
}

/// Built-in functions. All of them take exactly one argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Function {
    Sqrt,
    Exp,
    Log,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Abs,
    Arg,
    Re,
    Im,
    Conj,
    Transpose,
    CTranspose,
}

impl Function {
    /// Look up a function by identifier.
    pub fn from_name(name: &str) -> Option<Self> {
        let function = match name {
            "sqrt" => Function::Sqrt,
            "exp" => Function::Exp,
            "log" => Function::Log,
            "sin" => Function::Sin,
            "cos" => Function::Cos,
            "tan" => Function::Tan,
            "asin" => Function::Asin,
            "acos" => Function::Acos,
            "atan" => Function::Atan,
            "sinh" => Function::Sinh,
            "cosh" => Function::Cosh,
            "tanh" => Function::Tanh,
            "abs" => Function::Abs,
            "arg" => Function::Arg,
            "re" => Function::Re,
            "im" => Function::Im,
            "conj" => Function::Conj,
            "transpose" => Function::Transpose,
            "ctranspose" => Function::CTranspose,
            _ => return None,
        };
        Some(function)
    }

    /// Identifier of the function.
    pub fn name(self) -> &'static str {
        match self {
            Function::Sqrt => "sqrt",
            Function::Exp => "exp",
            Function::Log => "log",
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Asin => "asin",
            Function::Acos => "acos",
            Function::Atan => "atan",
            Function::Sinh => "sinh",
            Function::Cosh => "cosh",
            Function::Tanh => "tanh",
            Function::Abs => "abs",
            Function::Arg => "arg",
            Function::Re => "re",
            Function::Im => "im",
            Function::Conj => "conj",
            Function::Transpose => "transpose",
            Function::CTranspose => "ctranspose",
        }
    }

    /// Number of arguments the function takes.
    pub fn arity(self) -> usize {
        1
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Number(v) => write!(f, "{v}"),
            Expression::Constant(c) => write!(f, "{}", c.name()),
            Expression::Neg(e) => write!(f, "-{e}"),
            Expression::BinOp { left, op, right } => {
                write!(f, "{left} {} {right}", op.symbol())
            }
            Expression::FnCall { function, args } => {
                write!(f, "{}(", function.name())?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
            Expression::Matrix(rows) => {
                write!(f, "[")?;
                for (r, row) in rows.iter().enumerate() {
                    if r > 0 {
                        write!(f, "; ")?;
                    }
                    for (c, entry) in row.iter().enumerate() {
                        if c > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{entry}")?;
                    }
                }
                write!(f, "]")
            }
            Expression::Paren(e) => write!(f, "({e})"),
        }
    }
}
