//! FILENAME: parser/src/ast.rs
//! PURPOSE: Defines the Abstract Syntax Tree (AST) for formula expressions.
//! CONTEXT: After the Lexer tokenizes a formula string, the Parser converts
//! those tokens into this tree structure. The Evaluator then traverses this
//! tree to compute the final result.
//!
//! SUPPORTED EXPRESSIONS:
//! - Literals: numbers, strings
//! - Cell references: A1, AA100
//! - Ranges: A1:B10
//! - Binary operations: +, -, *, /, ^, &, =, <>, <, >, <=, >=
//! - Unary operations: - (negation)
//! - Function calls: SUM, AVERAGE, MIN, MAX, COUNT, COUNTA, IF, AND, OR, NOT,
//!   ABS, ROUND, FLOOR, CEILING, SQRT, POWER, MOD, LEN, UPPER, LOWER, TRIM,
//!   CONCATENATE, LEFT, RIGHT, MID

use engine::Position;

/// A parsed formula expression — the tree the evaluator walks.
#[derive(Debug, PartialEq, Clone)]
pub enum Expression {
    Number(f64),
    Str(String),
    CellRef(Position),
    Range(Position, Position),
    BinaryOp {
        left: Box<Expression>,
        op: BinaryOperator,
        right: Box<Expression>,
    },
    UnaryOp {
        op: UnaryOperator,
        operand: Box<Expression>,
    },
    FunctionCall {
        func: BuiltinFunction,
        args: Vec<Expression>,
    },
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Concat,
    Equal,
    NotEqual,
    LessThan,
    GreaterThan,
    LessEqual,
    GreaterEqual,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum UnaryOperator {
    Negate,
}

/// The fixed function set this grammar recognizes. Resolved to a variant at
/// parse time so the evaluator never string-compares a function name.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BuiltinFunction {
    Sum,
    Average,
    Min,
    Max,
    Count,
    CountA,
    If,
    And,
    Or,
    Not,
    Abs,
    Round,
    Floor,
    Ceiling,
    Sqrt,
    Power,
    Mod,
    Len,
    Upper,
    Lower,
    Trim,
    Concatenate,
    Left,
    Right,
    Mid,
}

impl BuiltinFunction {
    /// Resolves an uppercased function name to a variant, or `None` if it
    /// isn't one of the functions this grammar supports.
    pub fn from_name(name: &str) -> Option<BuiltinFunction> {
        Some(match name {
            "SUM" => BuiltinFunction::Sum,
            "AVERAGE" => BuiltinFunction::Average,
            "MIN" => BuiltinFunction::Min,
            "MAX" => BuiltinFunction::Max,
            "COUNT" => BuiltinFunction::Count,
            "COUNTA" => BuiltinFunction::CountA,
            "IF" => BuiltinFunction::If,
            "AND" => BuiltinFunction::And,
            "OR" => BuiltinFunction::Or,
            "NOT" => BuiltinFunction::Not,
            "ABS" => BuiltinFunction::Abs,
            "ROUND" => BuiltinFunction::Round,
            "FLOOR" => BuiltinFunction::Floor,
            "CEILING" => BuiltinFunction::Ceiling,
            "SQRT" => BuiltinFunction::Sqrt,
            "POWER" => BuiltinFunction::Power,
            "MOD" => BuiltinFunction::Mod,
            "LEN" => BuiltinFunction::Len,
            "UPPER" => BuiltinFunction::Upper,
            "LOWER" => BuiltinFunction::Lower,
            "TRIM" => BuiltinFunction::Trim,
            "CONCATENATE" => BuiltinFunction::Concatenate,
            "LEFT" => BuiltinFunction::Left,
            "RIGHT" => BuiltinFunction::Right,
            "MID" => BuiltinFunction::Mid,
            _ => return None,
        })
    }

    /// True for the aggregate functions that accept a `Range` argument
    /// directly rather than only scalar expressions.
    pub fn takes_range(&self) -> bool {
        matches!(
            self,
            BuiltinFunction::Sum
                | BuiltinFunction::Average
                | BuiltinFunction::Min
                | BuiltinFunction::Max
                | BuiltinFunction::Count
                | BuiltinFunction::CountA
        )
    }
}
