use std::fmt;

use smol_str::SmolStr;

/// Compile-time constant. `byte` and `short` constants are widened to `Int`.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Char(char),
    Boolean(bool),
    String(SmolStr),
}

impl ConstantValue {
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Long(_) => "long",
            Self::Float(_) => "float",
            Self::Double(_) => "double",
            Self::Char(_) => "char",
            Self::Boolean(_) => "boolean",
            Self::String(_) => "java.lang.String",
        }
    }
}

/// Renders the value the way string concatenation would.
impl fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Long(v) => write!(f, "{v}"),
            Self::Float(v) => write_floating(f, f64::from(*v), &format!("{v:e}")),
            Self::Double(v) => write_floating(f, *v, &format!("{v:e}")),
            Self::Char(v) => write!(f, "{v}"),
            Self::Boolean(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v}"),
        }
    }
}

/// `scientific` is the shortest round-trip text of the value in its own
/// width, as produced by `{:e}`. Magnitudes in `[1e-3, 1e7)` are written in
/// plain decimal, all others as `d.dddE<exp>`, always with a fractional digit.
fn write_floating(f: &mut fmt::Formatter<'_>, value: f64, scientific: &str) -> fmt::Result {
    if value.is_nan() {
        return write!(f, "NaN");
    }
    let sign = if value.is_sign_negative() { "-" } else { "" };
    if value.is_infinite() {
        return write!(f, "{sign}Infinity");
    }
    if value == 0.0 {
        return write!(f, "{sign}0.0");
    }
    let (mantissa, exponent) = scientific
        .trim_start_matches('-')
        .split_once('e')
        .ok_or(fmt::Error)?;
    let exponent: i32 = exponent.parse().map_err(|_| fmt::Error)?;
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let (lead, rest) = digits.split_at(1);

    if !(-3..7).contains(&exponent) {
        let rest = if rest.is_empty() { "0" } else { rest };
        return write!(f, "{sign}{lead}.{rest}E{exponent}");
    }
    if exponent < 0 {
        let zeros = "0".repeat(exponent.unsigned_abs() as usize - 1);
        return write!(f, "{sign}0.{zeros}{digits}");
    }
    let int_len = exponent as usize + 1;
    if digits.len() > int_len {
        let (int_part, frac_part) = digits.split_at(int_len);
        write!(f, "{sign}{int_part}.{frac_part}")
    } else {
        let zeros = "0".repeat(int_len - digits.len());
        write!(f, "{sign}{digits}{zeros}.0")
    }
}
