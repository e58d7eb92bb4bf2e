//! Scripted binding oracle.

use std::cell::{Cell, RefCell};
use std::sync::Arc;

use indexmap::IndexMap;
use jfront_diagnostics::Diagnostic;
use jfront_syntax::{
    BatchOutput, BatchUnit, BindingOracle, Bindings, OracleConfig, OracleError, ParsedUnit,
    SourceUnit, SyntaxTree,
};
use rustc_hash::FxHashSet;

/// Replays prepared trees over one shared bindings index.
///
/// Units are looked up by name. Unknown units fail with [`OracleError::Parse`].
pub struct FakeOracle {
    bindings: Arc<dyn Bindings>,
    units: IndexMap<String, (SyntaxTree, Vec<Diagnostic>)>,
    omitted_from_batch: FxHashSet<String>,
    failing_units: FxHashSet<String>,
    failing_in_batch: FxHashSet<String>,
    panicking_units: FxHashSet<String>,
    batch_failure: Option<String>,
    panic_on_batch: bool,
    unit_calls: RefCell<Vec<String>>,
    batch_calls: Cell<usize>,
    last_config: RefCell<Option<OracleConfig>>,
}

impl FakeOracle {
    pub fn new(bindings: Arc<dyn Bindings>) -> Self {
        Self {
            bindings,
            units: IndexMap::new(),
            omitted_from_batch: FxHashSet::default(),
            failing_units: FxHashSet::default(),
            failing_in_batch: FxHashSet::default(),
            panicking_units: FxHashSet::default(),
            batch_failure: None,
            panic_on_batch: false,
            unit_calls: RefCell::default(),
            batch_calls: Cell::new(0),
            last_config: RefCell::default(),
        }
    }

    /// Registers a tree under its unit name.
    pub fn with_unit(mut self, tree: SyntaxTree) -> Self {
        self.units
            .insert(tree.unit_name().to_owned(), (tree, Vec::new()));
        self
    }

    pub fn with_problems(mut self, unit: &str, problems: Vec<Diagnostic>) -> Self {
        if let Some((_, existing)) = self.units.get_mut(unit) {
            existing.extend(problems);
        }
        self
    }

    /// The batch result silently leaves `unit` out.
    pub fn omit_from_batch(mut self, unit: &str) -> Self {
        self.omitted_from_batch.insert(unit.to_owned());
        self
    }

    /// Every parse of `unit` fails, per unit and inside a batch.
    pub fn fail_unit(mut self, unit: &str) -> Self {
        self.failing_units.insert(unit.to_owned());
        self
    }

    /// Only the batch entry of `unit` fails.
    pub fn fail_in_batch(mut self, unit: &str) -> Self {
        self.failing_in_batch.insert(unit.to_owned());
        self
    }

    pub fn panic_on_unit(mut self, unit: &str) -> Self {
        self.panicking_units.insert(unit.to_owned());
        self
    }

    pub fn fail_batch(mut self, message: &str) -> Self {
        self.batch_failure = Some(message.to_owned());
        self
    }

    pub fn panic_on_batch(mut self) -> Self {
        self.panic_on_batch = true;
        self
    }

    /// Unit names passed to `parse_unit`, in call order.
    pub fn unit_calls(&self) -> Vec<String> {
        self.unit_calls.borrow().clone()
    }

    pub fn batch_calls(&self) -> usize {
        self.batch_calls.get()
    }

    pub fn last_config(&self) -> Option<OracleConfig> {
        self.last_config.borrow().clone()
    }

    fn parse_failure(unit: &str) -> OracleError {
        OracleError::Other(anyhow::anyhow!("scripted failure for {unit}"))
    }

    fn lookup(&self, unit: &str) -> Result<(SyntaxTree, Vec<Diagnostic>), OracleError> {
        if self.failing_units.contains(unit) {
            return Err(Self::parse_failure(unit));
        }
        self.units
            .get(unit)
            .cloned()
            .ok_or_else(|| OracleError::Parse {
                unit: unit.to_owned(),
                message: "unit was not prepared".to_owned(),
            })
    }
}

impl BindingOracle for FakeOracle {
    fn parse_unit(
        &self,
        unit: &SourceUnit,
        config: &OracleConfig,
    ) -> Result<ParsedUnit, OracleError> {
        self.unit_calls.borrow_mut().push(unit.name.clone());
        *self.last_config.borrow_mut() = Some(config.clone());
        if self.panicking_units.contains(&unit.name) {
            panic!("scripted panic for {}", unit.name);
        }
        let (tree, problems) = self.lookup(&unit.name)?;
        Ok(ParsedUnit {
            tree,
            bindings: Arc::clone(&self.bindings),
            problems,
        })
    }

    fn parse_batch(
        &self,
        units: &[SourceUnit],
        config: &OracleConfig,
    ) -> Result<BatchOutput, OracleError> {
        self.batch_calls.set(self.batch_calls.get() + 1);
        *self.last_config.borrow_mut() = Some(config.clone());
        if self.panic_on_batch {
            panic!("scripted batch panic");
        }
        if let Some(message) = &self.batch_failure {
            return Err(OracleError::Environment(message.clone()));
        }
        let produced = units
            .iter()
            .filter(|unit| !self.omitted_from_batch.contains(&unit.name))
            .map(|unit| {
                let outcome = if self.failing_in_batch.contains(&unit.name) {
                    Err(Self::parse_failure(&unit.name))
                } else {
                    self.lookup(&unit.name)
                        .map(|(tree, problems)| BatchUnit { tree, problems })
                };
                (unit.name.clone(), outcome)
            })
            .collect();
        Ok(BatchOutput {
            bindings: Arc::clone(&self.bindings),
            units: produced,
        })
    }
}
