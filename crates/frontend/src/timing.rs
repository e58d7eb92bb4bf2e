//! Per-unit parse durations.

use std::time::Duration;

use tracing::debug;

const REPORTED_UNITS: usize = 10;

#[derive(Debug, Default)]
pub struct ExecutionTimeReport {
    entries: Vec<(String, Duration)>,
}

impl ExecutionTimeReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, unit: &str, elapsed: Duration) {
        self.entries.push((unit.to_owned(), elapsed));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> Duration {
        self.entries.iter().map(|(_, elapsed)| *elapsed).sum()
    }

    /// Slowest units first. Ties keep recording order.
    pub fn slowest(&self, limit: usize) -> Vec<(&str, Duration)> {
        let mut sorted: Vec<_> = self
            .entries
            .iter()
            .map(|(unit, elapsed)| (unit.as_str(), *elapsed))
            .collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted.truncate(limit);
        sorted
    }

    pub fn report(&self) {
        if self.entries.is_empty() {
            return;
        }
        debug!(
            "Parsed {} units in {} ms",
            self.entries.len(),
            self.total().as_millis()
        );
        for (unit, elapsed) in self.slowest(REPORTED_UNITS) {
            debug!("  {unit}: {} ms", elapsed.as_millis());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slowest_units_first() {
        let mut report = ExecutionTimeReport::new();
        report.record("A.java", Duration::from_millis(5));
        report.record("B.java", Duration::from_millis(20));
        report.record("C.java", Duration::from_millis(5));
        report.record("D.java", Duration::from_millis(1));

        let slowest: Vec<_> = report.slowest(3).into_iter().map(|(unit, _)| unit).collect();
        assert_eq!(slowest, vec!["B.java", "A.java", "C.java"]);
        assert_eq!(report.total(), Duration::from_millis(31));
        assert_eq!(report.len(), 4);
    }
}
