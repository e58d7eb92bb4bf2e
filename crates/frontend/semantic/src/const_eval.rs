//! # Constant folding
//!
//! Folds literal expressions the way the compiler does for compile-time
//! constants: integral arithmetic wraps, shift distances are masked, and `+`
//! with a string operand concatenates. Identifiers fold to the value of the
//! `static final` constant they reference.
//!
//! Conditional operators, comparisons and the ternary operator are not folded.

use jfront_syntax::{
    BinaryOperator, ConstantValue, LiteralKind, NodeId, NodeKind, SyntaxTree, UnaryOperator,
};
use num_traits::{CheckedRem, PrimInt, WrappingAdd, WrappingMul, WrappingSub};
use smol_str::SmolStr;
use thiserror::Error;

use crate::sema::{NodeRef, Sema};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstEvalError {
    /// A referenced value is not a known constant.
    #[error("expression references a value that is not a compile-time constant")]
    Unknown,
    #[error("expression cannot be folded")]
    Unsupported,
    #[error("division by zero in constant expression")]
    DivisionByZero,
    #[error("invalid literal `{0}`")]
    InvalidLiteral(String),
}

impl Sema {
    /// Folds the expression at `node` to a constant value.
    pub fn resolve_as_constant(&self, node: NodeRef) -> Result<ConstantValue, ConstEvalError> {
        let folder = Folder {
            sema: self,
            tree: self.tree_of(node),
        };
        folder.fold(node.node)
    }
}

struct Folder<'a> {
    sema: &'a Sema,
    tree: &'a SyntaxTree,
}

impl Folder<'_> {
    fn fold(&self, node: NodeId) -> Result<ConstantValue, ConstEvalError> {
        match self.tree.kind(node) {
            NodeKind::Literal { kind, value } => parse_literal(*kind, value),
            NodeKind::Parenthesized => self.fold(self.operand(node, 0)?),
            NodeKind::Unary(op) => fold_unary(*op, self.fold(self.operand(node, 0)?)?),
            NodeKind::Binary(op) => {
                if !is_foldable(*op) {
                    return Err(ConstEvalError::Unsupported);
                }
                let left = self.fold(self.operand(node, 0)?)?;
                let right = self.fold(self.operand(node, 1)?)?;
                fold_binary(*op, left, right)
            }
            NodeKind::Identifier { .. } | NodeKind::MemberSelect => self
                .tree
                .node(node)
                .binding
                .and_then(|binding| self.sema.symbol_for(binding).constant_value(self.sema))
                .ok_or(ConstEvalError::Unknown),
            _ => Err(ConstEvalError::Unsupported),
        }
    }

    fn operand(&self, node: NodeId, index: usize) -> Result<NodeId, ConstEvalError> {
        self.tree
            .children(node)
            .get(index)
            .copied()
            .ok_or(ConstEvalError::Unsupported)
    }
}

const fn is_foldable(op: BinaryOperator) -> bool {
    !matches!(
        op,
        BinaryOperator::ConditionalAnd
            | BinaryOperator::ConditionalOr
            | BinaryOperator::Equal
            | BinaryOperator::NotEqual
            | BinaryOperator::Less
            | BinaryOperator::LessOrEqual
            | BinaryOperator::Greater
            | BinaryOperator::GreaterOrEqual
    )
}

/// Operand after unary numeric promotion.
#[derive(Debug, Clone, Copy)]
enum Numeric {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
}

impl Numeric {
    fn of(value: &ConstantValue) -> Option<Self> {
        match *value {
            ConstantValue::Int(v) => Some(Self::Int(v)),
            ConstantValue::Char(c) => Some(Self::Int(c as i32)),
            ConstantValue::Long(v) => Some(Self::Long(v)),
            ConstantValue::Float(v) => Some(Self::Float(v)),
            ConstantValue::Double(v) => Some(Self::Double(v)),
            ConstantValue::Boolean(_) | ConstantValue::String(_) => None,
        }
    }

    const fn as_i64(self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(v as i64),
            Self::Long(v) => Some(v),
            Self::Float(_) | Self::Double(_) => None,
        }
    }

    fn as_f32(self) -> f32 {
        match self {
            Self::Int(v) => v as f32,
            Self::Long(v) => v as f32,
            Self::Float(v) => v,
            Self::Double(v) => v as f32,
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Self::Int(v) => f64::from(v),
            Self::Long(v) => v as f64,
            Self::Float(v) => f64::from(v),
            Self::Double(v) => v,
        }
    }
}

/// Both operands after binary numeric promotion.
enum Promoted {
    Int(i32, i32),
    Long(i64, i64),
    Float(f32, f32),
    Double(f64, f64),
}

fn promote(left: Numeric, right: Numeric) -> Promoted {
    use Numeric::*;
    match (left, right) {
        (Double(_), _) | (_, Double(_)) => Promoted::Double(left.as_f64(), right.as_f64()),
        (Float(_), _) | (_, Float(_)) => Promoted::Float(left.as_f32(), right.as_f32()),
        (Int(l), Int(r)) => Promoted::Int(l, r),
        (Long(l), Long(r)) => Promoted::Long(l, r),
        (Int(l), Long(r)) => Promoted::Long(i64::from(l), r),
        (Long(l), Int(r)) => Promoted::Long(l, i64::from(r)),
    }
}

fn fold_unary(op: UnaryOperator, operand: ConstantValue) -> Result<ConstantValue, ConstEvalError> {
    if let (UnaryOperator::LogicalComplement, ConstantValue::Boolean(value)) = (op, &operand) {
        return Ok(ConstantValue::Boolean(!value));
    }
    let numeric = Numeric::of(&operand).ok_or(ConstEvalError::Unsupported)?;
    match (op, numeric) {
        (UnaryOperator::Plus, Numeric::Int(v)) => Ok(ConstantValue::Int(v)),
        (UnaryOperator::Plus, _) => Ok(operand),
        (UnaryOperator::Minus, Numeric::Int(v)) => Ok(ConstantValue::Int(v.wrapping_neg())),
        (UnaryOperator::Minus, Numeric::Long(v)) => Ok(ConstantValue::Long(v.wrapping_neg())),
        (UnaryOperator::Minus, Numeric::Float(v)) => Ok(ConstantValue::Float(-v)),
        (UnaryOperator::Minus, Numeric::Double(v)) => Ok(ConstantValue::Double(-v)),
        (UnaryOperator::BitwiseComplement, Numeric::Int(v)) => Ok(ConstantValue::Int(!v)),
        (UnaryOperator::BitwiseComplement, Numeric::Long(v)) => Ok(ConstantValue::Long(!v)),
        _ => Err(ConstEvalError::Unsupported),
    }
}

fn fold_binary(
    op: BinaryOperator,
    left: ConstantValue,
    right: ConstantValue,
) -> Result<ConstantValue, ConstEvalError> {
    match (&left, &right) {
        (ConstantValue::String(_), _) | (_, ConstantValue::String(_)) => {
            return match op {
                BinaryOperator::Plus => Ok(ConstantValue::String(SmolStr::new(format!(
                    "{left}{right}"
                )))),
                _ => Err(ConstEvalError::Unsupported),
            };
        }
        (ConstantValue::Boolean(l), ConstantValue::Boolean(r)) => {
            return match op {
                BinaryOperator::And => Ok(ConstantValue::Boolean(l & r)),
                BinaryOperator::Or => Ok(ConstantValue::Boolean(l | r)),
                BinaryOperator::Xor => Ok(ConstantValue::Boolean(l ^ r)),
                _ => Err(ConstEvalError::Unsupported),
            };
        }
        _ => {}
    }
    let left = Numeric::of(&left).ok_or(ConstEvalError::Unsupported)?;
    let right = Numeric::of(&right).ok_or(ConstEvalError::Unsupported)?;
    if matches!(
        op,
        BinaryOperator::LeftShift | BinaryOperator::RightShift | BinaryOperator::UnsignedRightShift
    ) {
        return shift(op, left, right);
    }
    match promote(left, right) {
        Promoted::Int(l, r) => integral(op, l, r).map(ConstantValue::Int),
        Promoted::Long(l, r) => integral(op, l, r).map(ConstantValue::Long),
        Promoted::Float(l, r) => floating(op, l, r).map(ConstantValue::Float),
        Promoted::Double(l, r) => floating(op, l, r).map(ConstantValue::Double),
    }
}

fn integral<T>(op: BinaryOperator, left: T, right: T) -> Result<T, ConstEvalError>
where
    T: PrimInt + WrappingAdd + WrappingSub + WrappingMul + CheckedRem,
{
    Ok(match op {
        BinaryOperator::Plus => left.wrapping_add(&right),
        BinaryOperator::Minus => left.wrapping_sub(&right),
        BinaryOperator::Multiply => left.wrapping_mul(&right),
        BinaryOperator::Divide | BinaryOperator::Remainder if right.is_zero() => {
            return Err(ConstEvalError::DivisionByZero);
        }
        // MIN / -1 overflows back to MIN, MIN % -1 is 0.
        BinaryOperator::Divide => left.checked_div(&right).unwrap_or(left),
        BinaryOperator::Remainder => left.checked_rem(&right).unwrap_or_else(T::zero),
        BinaryOperator::And => left & right,
        BinaryOperator::Or => left | right,
        BinaryOperator::Xor => left ^ right,
        _ => return Err(ConstEvalError::Unsupported),
    })
}

fn floating<T: num_traits::Float>(
    op: BinaryOperator,
    left: T,
    right: T,
) -> Result<T, ConstEvalError> {
    match op {
        BinaryOperator::Plus => Ok(left + right),
        BinaryOperator::Minus => Ok(left - right),
        BinaryOperator::Multiply => Ok(left * right),
        BinaryOperator::Divide => Ok(left / right),
        BinaryOperator::Remainder => Ok(left % right),
        _ => Err(ConstEvalError::Unsupported),
    }
}

/// The result has the type of the left operand; the distance is masked to its width.
fn shift(
    op: BinaryOperator,
    value: Numeric,
    distance: Numeric,
) -> Result<ConstantValue, ConstEvalError> {
    let distance = distance.as_i64().ok_or(ConstEvalError::Unsupported)?;
    match value {
        Numeric::Int(v) => {
            let n = (distance & 0x1f) as u32;
            Ok(ConstantValue::Int(match op {
                BinaryOperator::LeftShift => v.wrapping_shl(n),
                BinaryOperator::RightShift => v.wrapping_shr(n),
                _ => ((v as u32) >> n) as i32,
            }))
        }
        Numeric::Long(v) => {
            let n = (distance & 0x3f) as u32;
            Ok(ConstantValue::Long(match op {
                BinaryOperator::LeftShift => v.wrapping_shl(n),
                BinaryOperator::RightShift => v.wrapping_shr(n),
                _ => ((v as u64) >> n) as i64,
            }))
        }
        Numeric::Float(_) | Numeric::Double(_) => Err(ConstEvalError::Unsupported),
    }
}

/// Parses literal source text, including quotes for chars and strings.
pub fn parse_literal(kind: LiteralKind, text: &str) -> Result<ConstantValue, ConstEvalError> {
    let invalid = || ConstEvalError::InvalidLiteral(text.to_owned());
    match kind {
        LiteralKind::Int => {
            let (value, decimal) = parse_integral(text).ok_or_else(invalid)?;
            let limit = if decimal { 1 << 31 } else { u64::from(u32::MAX) };
            if value > limit {
                return Err(invalid());
            }
            Ok(ConstantValue::Int(value as u32 as i32))
        }
        LiteralKind::Long => {
            let digits = text.strip_suffix(['l', 'L']).ok_or_else(invalid)?;
            let (value, decimal) = parse_integral(digits).ok_or_else(invalid)?;
            if decimal && value > 1 << 63 {
                return Err(invalid());
            }
            Ok(ConstantValue::Long(value as i64))
        }
        LiteralKind::Float => {
            let digits = text.strip_suffix(['f', 'F']).unwrap_or(text).replace('_', "");
            digits
                .parse::<f32>()
                .map(ConstantValue::Float)
                .map_err(|_| invalid())
        }
        LiteralKind::Double => {
            let digits = text.strip_suffix(['d', 'D']).unwrap_or(text).replace('_', "");
            digits
                .parse::<f64>()
                .map(ConstantValue::Double)
                .map_err(|_| invalid())
        }
        LiteralKind::Char => {
            let body = unquote(text, '\'').ok_or_else(invalid)?;
            let mut chars = unescape(body).ok_or_else(invalid)?.into_iter();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(ConstantValue::Char(c)),
                _ => Err(invalid()),
            }
        }
        LiteralKind::String => {
            let body = unquote(text, '"').ok_or_else(invalid)?;
            let chars = unescape(body).ok_or_else(invalid)?;
            Ok(ConstantValue::String(chars.into_iter().collect()))
        }
        LiteralKind::Boolean => match text {
            "true" => Ok(ConstantValue::Boolean(true)),
            "false" => Ok(ConstantValue::Boolean(false)),
            _ => Err(invalid()),
        },
        LiteralKind::Null => Err(ConstEvalError::Unsupported),
    }
}

/// Magnitude of an integral literal and whether it was written in decimal.
fn parse_integral(text: &str) -> Option<(u64, bool)> {
    let digits = text.replace('_', "");
    let (radix, body) = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        (16, hex)
    } else if let Some(binary) = digits
        .strip_prefix("0b")
        .or_else(|| digits.strip_prefix("0B"))
    {
        (2, binary)
    } else if digits.len() > 1 && digits.starts_with('0') {
        (8, &digits[1..])
    } else {
        (10, digits.as_str())
    };
    let value = u64::from_str_radix(body, radix).ok()?;
    Some((value, radix == 10))
}

fn unquote(text: &str, quote: char) -> Option<&str> {
    text.strip_prefix(quote)?.strip_suffix(quote)
}

fn unescape(body: &str) -> Option<Vec<char>> {
    let mut out = Vec::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let escaped = match chars.next()? {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            'b' => '\u{8}',
            'f' => '\u{c}',
            's' => ' ',
            '\'' => '\'',
            '"' => '"',
            '\\' => '\\',
            'u' => {
                while chars.peek() == Some(&'u') {
                    chars.next();
                }
                let hex: String = chars.by_ref().take(4).collect();
                if hex.len() != 4 {
                    return None;
                }
                char::from_u32(u32::from_str_radix(&hex, 16).ok()?)?
            }
            first @ '0'..='7' => {
                // Up to three octal digits, at most \377.
                let max_len = if first <= '3' { 3 } else { 2 };
                let mut value = first.to_digit(8)?;
                for _ in 1..max_len {
                    match chars.peek().and_then(|c| c.to_digit(8)) {
                        Some(digit) => {
                            value = value * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                char::from_u32(value)?
            }
            _ => return None,
        };
        out.push(escaped);
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integral_literals() {
        assert_eq!(parse_literal(LiteralKind::Int, "42"), Ok(ConstantValue::Int(42)));
        assert_eq!(parse_literal(LiteralKind::Int, "0x01"), Ok(ConstantValue::Int(1)));
        assert_eq!(parse_literal(LiteralKind::Int, "0b101"), Ok(ConstantValue::Int(5)));
        assert_eq!(parse_literal(LiteralKind::Int, "017"), Ok(ConstantValue::Int(15)));
        assert_eq!(parse_literal(LiteralKind::Int, "1_000"), Ok(ConstantValue::Int(1000)));
        assert_eq!(
            parse_literal(LiteralKind::Int, "0xFFFFFFFF"),
            Ok(ConstantValue::Int(-1))
        );
        assert_eq!(parse_literal(LiteralKind::Long, "2L"), Ok(ConstantValue::Long(2)));
        assert_eq!(
            parse_literal(LiteralKind::Long, "0xFFFFFFFFFFFFFFFFL"),
            Ok(ConstantValue::Long(-1))
        );
        assert!(matches!(
            parse_literal(LiteralKind::Int, "0x1FFFFFFFF"),
            Err(ConstEvalError::InvalidLiteral(_))
        ));
    }

    #[test]
    fn test_textual_literals() {
        assert_eq!(parse_literal(LiteralKind::Char, "'a'"), Ok(ConstantValue::Char('a')));
        assert_eq!(
            parse_literal(LiteralKind::Char, "'\\n'"),
            Ok(ConstantValue::Char('\n'))
        );
        assert_eq!(
            parse_literal(LiteralKind::Char, "'\\u0041'"),
            Ok(ConstantValue::Char('A'))
        );
        assert_eq!(
            parse_literal(LiteralKind::Char, "'\\101'"),
            Ok(ConstantValue::Char('A'))
        );
        assert_eq!(
            parse_literal(LiteralKind::String, "\"a\\tb\""),
            Ok(ConstantValue::String("a\tb".into()))
        );
        assert_eq!(
            parse_literal(LiteralKind::Boolean, "true"),
            Ok(ConstantValue::Boolean(true))
        );
        assert_eq!(
            parse_literal(LiteralKind::Null, "null"),
            Err(ConstEvalError::Unsupported)
        );
    }

    #[test]
    fn test_floating_literals() {
        assert_eq!(parse_literal(LiteralKind::Float, "1.5f"), Ok(ConstantValue::Float(1.5)));
        assert_eq!(
            parse_literal(LiteralKind::Double, "2.5e1"),
            Ok(ConstantValue::Double(25.0))
        );
        assert_eq!(parse_literal(LiteralKind::Double, "3d"), Ok(ConstantValue::Double(3.0)));
    }

    #[test]
    fn test_numeric_promotion() {
        assert_eq!(
            fold_binary(BinaryOperator::Plus, ConstantValue::Int(1), ConstantValue::Long(2)),
            Ok(ConstantValue::Long(3))
        );
        assert_eq!(
            fold_binary(BinaryOperator::Plus, ConstantValue::Char('a'), ConstantValue::Int(1)),
            Ok(ConstantValue::Int(98))
        );
        assert_eq!(
            fold_binary(
                BinaryOperator::Divide,
                ConstantValue::Int(1),
                ConstantValue::Double(2.0)
            ),
            Ok(ConstantValue::Double(0.5))
        );
    }

    #[test]
    fn test_integral_overflow_wraps() {
        assert_eq!(
            fold_binary(BinaryOperator::Plus, ConstantValue::Int(i32::MAX), ConstantValue::Int(1)),
            Ok(ConstantValue::Int(i32::MIN))
        );
        assert_eq!(
            fold_binary(
                BinaryOperator::Divide,
                ConstantValue::Int(i32::MIN),
                ConstantValue::Int(-1)
            ),
            Ok(ConstantValue::Int(i32::MIN))
        );
        assert_eq!(
            fold_unary(UnaryOperator::Minus, ConstantValue::Long(i64::MIN)),
            Ok(ConstantValue::Long(i64::MIN))
        );
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(
            fold_binary(BinaryOperator::Remainder, ConstantValue::Long(1), ConstantValue::Long(0)),
            Err(ConstEvalError::DivisionByZero)
        );
        assert_eq!(
            fold_binary(
                BinaryOperator::Divide,
                ConstantValue::Double(1.0),
                ConstantValue::Int(0)
            ),
            Ok(ConstantValue::Double(f64::INFINITY))
        );
    }

    #[test]
    fn test_shifts_mask_distance() {
        assert_eq!(
            fold_binary(BinaryOperator::LeftShift, ConstantValue::Int(1), ConstantValue::Int(33)),
            Ok(ConstantValue::Int(2))
        );
        assert_eq!(
            fold_binary(
                BinaryOperator::UnsignedRightShift,
                ConstantValue::Int(-1),
                ConstantValue::Int(28)
            ),
            Ok(ConstantValue::Int(15))
        );
        assert_eq!(
            fold_binary(
                BinaryOperator::RightShift,
                ConstantValue::Long(-16),
                ConstantValue::Int(2)
            ),
            Ok(ConstantValue::Long(-4))
        );
    }

    #[test]
    fn test_string_concatenation() {
        assert_eq!(
            fold_binary(
                BinaryOperator::Plus,
                ConstantValue::String("a".into()),
                ConstantValue::Double(1.0)
            ),
            Ok(ConstantValue::String("a1.0".into()))
        );
        assert_eq!(
            fold_binary(
                BinaryOperator::Minus,
                ConstantValue::String("a".into()),
                ConstantValue::Int(1)
            ),
            Err(ConstEvalError::Unsupported)
        );
    }

    #[test]
    fn test_boolean_operators() {
        assert_eq!(
            fold_binary(
                BinaryOperator::Xor,
                ConstantValue::Boolean(true),
                ConstantValue::Boolean(true)
            ),
            Ok(ConstantValue::Boolean(false))
        );
        assert_eq!(
            fold_unary(UnaryOperator::LogicalComplement, ConstantValue::Boolean(false)),
            Ok(ConstantValue::Boolean(true))
        );
        assert!(!is_foldable(BinaryOperator::ConditionalOr));
    }
}
