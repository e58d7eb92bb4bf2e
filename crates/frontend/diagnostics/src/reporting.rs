//! Rendering of diagnostics against the unit source with ariadne.

use crate::Diagnostic;
use ariadne::{Label, Report, Source};

/// Build a formatted report for one diagnostic of a unit.
pub fn build_diagnostic_message(
    unit_name: &str,
    source: &str,
    diagnostic: &Diagnostic,
    with_color: bool,
) -> String {
    let mut write_buffer = Vec::new();
    let code_u32: u32 = diagnostic.code.into();
    let span = (unit_name, diagnostic.span.into_range());
    let report = Report::build(diagnostic.severity.into(), span.clone())
        .with_config(
            ariadne::Config::new()
                .with_index_type(ariadne::IndexType::Byte)
                .with_color(with_color),
        )
        .with_code(code_u32)
        .with_message(&diagnostic.message)
        .with_label(Label::new(span).with_message(&diagnostic.message));
    if report
        .finish()
        .write((unit_name, Source::from(source)), &mut write_buffer)
        .is_err()
    {
        return diagnostic.to_string();
    }
    String::from_utf8_lossy(&write_buffer).to_string()
}
