//! Annotation metadata attached to symbols.

use std::rc::Rc;

use jfront_syntax::AnnotationValue;
use smol_str::SmolStr;

use crate::sema::Sema;
use crate::symbols::SymbolId;

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationInstance {
    /// Type symbol of the annotation.
    pub symbol: SymbolId,
    pub values: Vec<(SmolStr, AnnotationValue)>,
}

impl AnnotationInstance {
    pub fn fully_qualified_name(&self, sema: &Sema) -> SmolStr {
        self.symbol
            .type_(sema)
            .map(|ty| ty.fully_qualified_name(sema))
            .unwrap_or_default()
    }

    pub fn value(&self, name: &str) -> Option<&AnnotationValue> {
        self.values
            .iter()
            .find(|(value_name, _)| value_name == name)
            .map(|(_, value)| value)
    }

    /// True when the named value is, or contains, the enum constant `constant`.
    pub fn has_enum_value(&self, name: &str, constant: &str) -> bool {
        fn matches(value: &AnnotationValue, constant: &str) -> bool {
            match value {
                AnnotationValue::EnumConstant(name) => name == constant,
                AnnotationValue::Array(values) => values.iter().any(|v| matches(v, constant)),
                _ => false,
            }
        }
        self.values
            .iter()
            .filter(|(value_name, _)| value_name == name)
            .any(|(_, value)| matches(value, constant))
    }
}

/// Annotations of one symbol in declaration order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SymbolMetadata {
    annotations: Vec<AnnotationInstance>,
}

impl SymbolMetadata {
    pub fn annotations(&self) -> &[AnnotationInstance] {
        &self.annotations
    }

    pub fn is_annotated_with(&self, sema: &Sema, fully_qualified_name: &str) -> bool {
        self.annotations
            .iter()
            .any(|a| a.fully_qualified_name(sema) == fully_qualified_name)
    }

    /// Values of the first annotation with the given type, `None` if absent.
    pub fn values_for(
        &self,
        sema: &Sema,
        fully_qualified_name: &str,
    ) -> Option<&[(SmolStr, AnnotationValue)]> {
        self.annotations
            .iter()
            .find(|a| a.fully_qualified_name(sema) == fully_qualified_name)
            .map(|a| a.values.as_slice())
    }
}

impl SymbolId {
    /// Metadata of this symbol. Synthetic symbols and broken bindings share one
    /// empty instance per run.
    pub fn metadata(self, sema: &Sema) -> Rc<SymbolMetadata> {
        if let Some(cached) = sema.metadata.borrow().get(&self) {
            return Rc::clone(cached);
        }
        let annotations = self
            .data(sema)
            .binding()
            .and_then(|binding| sema.bindings().annotations(binding));
        let metadata = match annotations {
            Some(annotations) if !annotations.is_empty() => Rc::new(SymbolMetadata {
                annotations: annotations
                    .into_iter()
                    .map(|annotation| AnnotationInstance {
                        symbol: sema.symbol_for(annotation.annotation_type),
                        values: annotation.values,
                    })
                    .collect(),
            }),
            _ => sema.empty_metadata(),
        };
        Rc::clone(sema.metadata.borrow_mut().entry(self).or_insert(metadata))
    }
}
