//! FILENAME: parser/src/render.rs
//! PURPOSE: Renders an `Expression` back to its normalized printable form —
//! whitespace and redundant parentheses removed, used for `Cell::get_text`
//! and the no-op-write short-circuit.
//! CONTEXT: Precedence-aware: a child only gets parenthesized when omitting
//! the parens would change the parse.

use engine::Position;

use crate::ast::{BinaryOperator, BuiltinFunction, Expression, UnaryOperator};

pub fn canonical_text(expr: &Expression) -> String {
    render(expr, 0)
}

/// Binding power, loosest to tightest — mirrors the parser's grammar levels.
fn precedence(op: BinaryOperator) -> u8 {
    match op {
        BinaryOperator::Equal
        | BinaryOperator::NotEqual
        | BinaryOperator::LessThan
        | BinaryOperator::GreaterThan
        | BinaryOperator::LessEqual
        | BinaryOperator::GreaterEqual => 1,
        BinaryOperator::Concat => 2,
        BinaryOperator::Add | BinaryOperator::Subtract => 3,
        BinaryOperator::Multiply | BinaryOperator::Divide => 4,
        BinaryOperator::Power => 6,
    }
}

fn op_text(op: BinaryOperator) -> &'static str {
    match op {
        BinaryOperator::Add => "+",
        BinaryOperator::Subtract => "-",
        BinaryOperator::Multiply => "*",
        BinaryOperator::Divide => "/",
        BinaryOperator::Power => "^",
        BinaryOperator::Concat => "&",
        BinaryOperator::Equal => "=",
        BinaryOperator::NotEqual => "<>",
        BinaryOperator::LessThan => "<",
        BinaryOperator::GreaterThan => ">",
        BinaryOperator::LessEqual => "<=",
        BinaryOperator::GreaterEqual => ">=",
    }
}

fn func_name(func: BuiltinFunction) -> &'static str {
    match func {
        BuiltinFunction::Sum => "SUM",
        BuiltinFunction::Average => "AVERAGE",
        BuiltinFunction::Min => "MIN",
        BuiltinFunction::Max => "MAX",
        BuiltinFunction::Count => "COUNT",
        BuiltinFunction::CountA => "COUNTA",
        BuiltinFunction::If => "IF",
        BuiltinFunction::And => "AND",
        BuiltinFunction::Or => "OR",
        BuiltinFunction::Not => "NOT",
        BuiltinFunction::Abs => "ABS",
        BuiltinFunction::Round => "ROUND",
        BuiltinFunction::Floor => "FLOOR",
        BuiltinFunction::Ceiling => "CEILING",
        BuiltinFunction::Sqrt => "SQRT",
        BuiltinFunction::Power => "POWER",
        BuiltinFunction::Mod => "MOD",
        BuiltinFunction::Len => "LEN",
        BuiltinFunction::Upper => "UPPER",
        BuiltinFunction::Lower => "LOWER",
        BuiltinFunction::Trim => "TRIM",
        BuiltinFunction::Concatenate => "CONCATENATE",
        BuiltinFunction::Left => "LEFT",
        BuiltinFunction::Right => "RIGHT",
        BuiltinFunction::Mid => "MID",
    }
}

fn render_pos(p: Position) -> String {
    p.to_string()
}

fn render(expr: &Expression, parent_prec: u8) -> String {
    match expr {
        Expression::Number(n) => n.to_string(),
        Expression::Str(s) => format!("\"{s}\""),
        Expression::CellRef(p) => render_pos(*p),
        Expression::Range(start, end) => format!("{}:{}", render_pos(*start), render_pos(*end)),
        Expression::UnaryOp { op, operand } => {
            let op_str = match op {
                UnaryOperator::Negate => "-",
            };
            format!("{op_str}{}", render(operand, 5))
        }
        Expression::BinaryOp { left, op, right } => {
            let prec = precedence(*op);
            let left_text = render(left, prec);
            // Right-hand side of a left-associative operator needs parens at
            // equal precedence to preserve grouping; power is right-assoc.
            let right_prec = if matches!(op, BinaryOperator::Power) { prec } else { prec + 1 };
            let right_text = render(right, right_prec);
            let text = format!("{left_text}{}{right_text}", op_text(*op));
            if prec < parent_prec {
                format!("({text})")
            } else {
                text
            }
        }
        Expression::FunctionCall { func, args } => {
            let rendered_args: Vec<String> = args.iter().map(|a| render(a, 0)).collect();
            format!("{}({})", func_name(*func), rendered_args.join(","))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn roundtrip(expr: &str) -> String {
        canonical_text(&parse(expr).unwrap())
    }

    #[test]
    fn strips_whitespace() {
        assert_eq!(roundtrip("1 + 1"), "1+1");
        assert_eq!(roundtrip("1+1"), "1+1");
    }

    #[test]
    fn strips_redundant_parens() {
        assert_eq!(roundtrip("(1+2)*3"), "(1+2)*3");
        assert_eq!(roundtrip("1+(2*3)"), "1+2*3");
        assert_eq!(roundtrip("(1+2)"), "1+2");
    }

    #[test]
    fn preserves_function_calls_and_ranges() {
        assert_eq!(roundtrip("SUM(A1:A3)"), "SUM(A1:A3)");
        assert_eq!(roundtrip("sum( a1 : a3 )"), "SUM(A1:A3)");
    }
}
