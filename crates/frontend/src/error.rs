use jfront_syntax::OracleError;
use thiserror::Error;

/// Why a unit could not be decorated. Held inside a [`crate::UnitResult`]
/// until the consumer asks for the unit.
#[derive(Debug, Error)]
pub enum ParseError {
    /// First syntax error the oracle reported for the unit.
    #[error("Parse error in {unit}{}: {message}", at_line(.line))]
    Syntax {
        unit: String,
        line: Option<usize>,
        message: String,
    },
    #[error("Unable to parse source file {unit}")]
    Oracle {
        unit: String,
        #[source]
        source: OracleError,
    },
    #[error("Binding oracle panicked while parsing {unit}: {message}")]
    Panicked { unit: String, message: String },
}

impl ParseError {
    pub fn unit(&self) -> &str {
        match self {
            Self::Syntax { unit, .. } | Self::Oracle { unit, .. } | Self::Panicked { unit, .. } => {
                unit
            }
        }
    }
}

fn at_line(line: &Option<usize>) -> String {
    line.map(|line| format!(" at line {line}"))
        .unwrap_or_default()
}
