//! # Nullability aggregation
//!
//! A symbol's nullability comes from the first scope, innermost first, that
//! carries a recognized annotation:
//!
//! 1. the symbol itself (`VARIABLE` or `METHOD` level)
//! 2. the method owning a parameter or local (`METHOD`)
//! 3. each enclosing class, innermost first (`CLASS`)
//! 4. the package of the outermost class (`PACKAGE`)
//!
//! Which annotations count depends on the target (parameter, field, local,
//! method return) and on the level. Within one scope the strongest annotation
//! wins. Annotations that are not themselves nullness annotations are searched
//! for meta-annotations, and results found that way are flagged.

use rustc_hash::FxHashSet;

use crate::metadata::{AnnotationInstance, SymbolMetadata};
use crate::sema::Sema;
use crate::symbols::{MethodOrigin, Symbol, SymbolId, VariableOrigin};

/// Ordered from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NullabilityType {
    NoAnnotation,
    Unknown,
    StrongNullable,
    WeakNullable,
    NonNull,
}

/// Ordered from broadest to narrowest scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NullabilityLevel {
    Unknown,
    Package,
    Class,
    Method,
    Variable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NullabilityTarget {
    Parameter,
    Field,
    LocalVariable,
    /// Return value of a method.
    Method,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NullabilityData {
    pub ty: NullabilityType,
    pub level: NullabilityLevel,
    pub annotation: Option<AnnotationInstance>,
    /// Symbol carrying `annotation`.
    pub site: Option<SymbolId>,
    pub meta_annotation: bool,
}

impl NullabilityData {
    pub const fn new(
        ty: NullabilityType,
        level: NullabilityLevel,
        annotation: Option<AnnotationInstance>,
        site: Option<SymbolId>,
        meta_annotation: bool,
    ) -> Self {
        Self {
            ty,
            level,
            annotation,
            site,
            meta_annotation,
        }
    }

    pub const fn no_annotation(level: NullabilityLevel) -> Self {
        Self::new(NullabilityType::NoAnnotation, level, None, None, false)
    }

    pub const fn unknown(level: NullabilityLevel) -> Self {
        Self::new(NullabilityType::Unknown, level, None, None, false)
    }

    /// A fact at a narrower level also holds for every broader `min_level`.
    fn is(
        &self,
        types: &[NullabilityType],
        min_level: NullabilityLevel,
        ignore_meta_annotation: bool,
        default_value: bool,
    ) -> bool {
        if self.ty == NullabilityType::Unknown {
            return default_value;
        }
        if ignore_meta_annotation && self.meta_annotation {
            return false;
        }
        types.contains(&self.ty) && self.level >= min_level
    }

    pub fn is_non_null(
        &self,
        min_level: NullabilityLevel,
        ignore_meta_annotation: bool,
        default_value: bool,
    ) -> bool {
        self.is(
            &[NullabilityType::NonNull],
            min_level,
            ignore_meta_annotation,
            default_value,
        )
    }

    pub fn is_nullable(
        &self,
        min_level: NullabilityLevel,
        ignore_meta_annotation: bool,
        default_value: bool,
    ) -> bool {
        self.is(
            &[NullabilityType::WeakNullable, NullabilityType::StrongNullable],
            min_level,
            ignore_meta_annotation,
            default_value,
        )
    }

    pub fn is_strong_nullable(
        &self,
        min_level: NullabilityLevel,
        ignore_meta_annotation: bool,
        default_value: bool,
    ) -> bool {
        self.is(
            &[NullabilityType::StrongNullable],
            min_level,
            ignore_meta_annotation,
            default_value,
        )
    }
}

const STRONG_NULLABLE: &[&str] = &[
    "javax.annotation.CheckForNull",
    "edu.umd.cs.findbugs.annotations.CheckForNull",
    "org.netbeans.api.annotations.common.CheckForNull",
    "org.springframework.lang.Nullable",
    "reactor.util.annotation.Nullable",
    "org.eclipse.jdt.annotation.Nullable",
    "org.eclipse.jgit.annotations.Nullable",
];

const WEAK_NULLABLE: &[&str] = &[
    "android.annotation.Nullable",
    "android.support.annotation.Nullable",
    "androidx.annotation.Nullable",
    "com.sun.istack.internal.Nullable",
    "com.mongodb.lang.Nullable",
    "edu.umd.cs.findbugs.annotations.Nullable",
    "io.reactivex.annotations.Nullable",
    "io.reactivex.rxjava3.annotations.Nullable",
    "javax.annotation.Nullable",
    "org.checkerframework.checker.nullness.compatqual.NullableDecl",
    "org.checkerframework.checker.nullness.compatqual.NullableType",
    "org.checkerframework.checker.nullness.qual.Nullable",
    "org.jetbrains.annotations.Nullable",
    "org.jmlspecs.annotation.Nullable",
    "org.netbeans.api.annotations.common.NullAllowed",
    "org.netbeans.api.annotations.common.NullUnknown",
];

const NON_NULL: &[&str] = &[
    "android.annotation.NonNull",
    "android.support.annotation.NonNull",
    "androidx.annotation.NonNull",
    "com.sun.istack.internal.NotNull",
    "com.mongodb.lang.NonNull",
    "edu.umd.cs.findbugs.annotations.NonNull",
    "io.reactivex.annotations.NonNull",
    "io.reactivex.rxjava3.annotations.NonNull",
    "javax.validation.constraints.NotNull",
    "lombok.NonNull",
    "org.checkerframework.checker.nullness.compatqual.NonNullDecl",
    "org.checkerframework.checker.nullness.compatqual.NonNullType",
    "org.checkerframework.checker.nullness.qual.NonNull",
    "org.eclipse.jdt.annotation.NonNull",
    "org.eclipse.jgit.annotations.NonNull",
    "org.jetbrains.annotations.NotNull",
    "org.jmlspecs.annotation.NonNull",
    "org.netbeans.api.annotations.common.NonNull",
    "org.springframework.lang.NonNull",
    "reactor.util.annotation.NonNull",
];

/// `when=ALWAYS` (or nothing) is non-null, `UNKNOWN` weak, `MAYBE`/`NEVER` strong.
const JAVAX_NONNULL: &str = "javax.annotation.Nonnull";
const MONGODB_NON_NULL_API: &str = "com.mongodb.lang.NonNullApi";
const SPRING_NON_NULL_API: &str = "org.springframework.lang.NonNullApi";
const SPRING_NON_NULL_FIELDS: &str = "org.springframework.lang.NonNullFields";
const JAVAX_PARAMETERS_NONNULL_BY_DEFAULT: &str = "javax.annotation.ParametersAreNonnullByDefault";
const JAVAX_PARAMETERS_NULLABLE_BY_DEFAULT: &str =
    "javax.annotation.ParametersAreNullableByDefault";
const ECLIPSE_NON_NULL_BY_DEFAULT: &str = "org.eclipse.jdt.annotation.NonNullByDefault";

const DEFAULT_ANNOTATIONS: &[&str] = &[
    JAVAX_NONNULL,
    MONGODB_NON_NULL_API,
    SPRING_NON_NULL_API,
    SPRING_NON_NULL_FIELDS,
    JAVAX_PARAMETERS_NONNULL_BY_DEFAULT,
    JAVAX_PARAMETERS_NULLABLE_BY_DEFAULT,
    ECLIPSE_NON_NULL_BY_DEFAULT,
];

fn is_known_annotation(name: &str) -> bool {
    [STRONG_NULLABLE, WEAK_NULLABLE, NON_NULL, DEFAULT_ANNOTATIONS]
        .iter()
        .any(|family| family.contains(&name))
}

#[derive(Debug, Clone, Copy)]
enum Classifier {
    StrongNullable,
    /// Both nullable families, reported as weak.
    Nullable,
    NonNull,
    JavaxNonnull,
    Named(&'static str, NullabilityType),
    /// Eclipse default, applying when it has no value or lists the location.
    EclipseNonNullByDefault(&'static str),
}

impl Classifier {
    fn classify(self, name: &str, annotation: &AnnotationInstance) -> NullabilityType {
        match self {
            Self::StrongNullable if STRONG_NULLABLE.contains(&name) => {
                NullabilityType::StrongNullable
            }
            Self::Nullable if STRONG_NULLABLE.contains(&name) || WEAK_NULLABLE.contains(&name) => {
                NullabilityType::WeakNullable
            }
            Self::NonNull if NON_NULL.contains(&name) => {
                if annotation.values.is_empty() {
                    NullabilityType::NonNull
                } else {
                    NullabilityType::Unknown
                }
            }
            Self::JavaxNonnull if name == JAVAX_NONNULL => {
                if annotation.values.is_empty() || annotation.has_enum_value("when", "ALWAYS") {
                    NullabilityType::NonNull
                } else if annotation.has_enum_value("when", "UNKNOWN") {
                    NullabilityType::WeakNullable
                } else {
                    NullabilityType::StrongNullable
                }
            }
            Self::Named(expected, ty) if name == expected => ty,
            Self::EclipseNonNullByDefault(location)
                if name == ECLIPSE_NON_NULL_BY_DEFAULT
                    && (annotation.values.is_empty()
                        || annotation.has_enum_value("value", location)) =>
            {
                NullabilityType::NonNull
            }
            _ => NullabilityType::NoAnnotation,
        }
    }
}

fn classifiers(target: NullabilityTarget, level: NullabilityLevel) -> &'static [Classifier] {
    use Classifier::*;
    use NullabilityLevel as Level;
    use NullabilityTarget as Target;
    use NullabilityType::{NonNull as NonNullType, WeakNullable as WeakType};

    match (target, level) {
        (Target::Parameter, Level::Variable) => &[
            StrongNullable,
            Nullable,
            NonNull,
            JavaxNonnull,
            EclipseNonNullByDefault("PARAMETER"),
        ],
        (Target::Field, Level::Variable) => &[
            StrongNullable,
            Nullable,
            NonNull,
            JavaxNonnull,
            EclipseNonNullByDefault("FIELD"),
        ],
        (Target::LocalVariable, Level::Variable) => {
            &[StrongNullable, Nullable, NonNull, JavaxNonnull]
        }
        (Target::Method, Level::Method) => &[
            StrongNullable,
            Nullable,
            NonNull,
            JavaxNonnull,
            EclipseNonNullByDefault("RETURN_TYPE"),
        ],
        (Target::Parameter, Level::Method | Level::Class) => &[
            Named(JAVAX_PARAMETERS_NONNULL_BY_DEFAULT, NonNullType),
            Named(JAVAX_PARAMETERS_NULLABLE_BY_DEFAULT, WeakType),
            EclipseNonNullByDefault("PARAMETER"),
        ],
        (Target::Parameter, Level::Package) => &[
            Named(MONGODB_NON_NULL_API, NonNullType),
            Named(SPRING_NON_NULL_API, NonNullType),
            Named(JAVAX_PARAMETERS_NONNULL_BY_DEFAULT, NonNullType),
            Named(JAVAX_PARAMETERS_NULLABLE_BY_DEFAULT, WeakType),
            EclipseNonNullByDefault("PARAMETER"),
        ],
        (Target::Field, Level::Method | Level::Class) => &[EclipseNonNullByDefault("FIELD")],
        (Target::Field, Level::Package) => &[
            Named(SPRING_NON_NULL_FIELDS, NonNullType),
            EclipseNonNullByDefault("FIELD"),
        ],
        (Target::Method, Level::Class) => &[EclipseNonNullByDefault("RETURN_TYPE")],
        (Target::Method, Level::Package) => &[
            Named(MONGODB_NON_NULL_API, NonNullType),
            Named(SPRING_NON_NULL_API, NonNullType),
            EclipseNonNullByDefault("RETURN_TYPE"),
        ],
        _ => &[],
    }
}

impl SymbolId {
    /// Which nullability conventions apply to this symbol, if any.
    pub fn nullability_target(self, sema: &Sema) -> Option<NullabilityTarget> {
        match self.data(sema) {
            Symbol::Variable(VariableOrigin::Placeholder { .. }) => {
                Some(NullabilityTarget::Parameter)
            }
            Symbol::Variable(VariableOrigin::Declared(_)) => Some(if self.is_field(sema) {
                NullabilityTarget::Field
            } else if self.is_parameter(sema) {
                NullabilityTarget::Parameter
            } else {
                NullabilityTarget::LocalVariable
            }),
            Symbol::Method(_) => Some(NullabilityTarget::Method),
            _ => None,
        }
    }

    /// Nullability of this symbol. Symbols without a target report
    /// `NO_ANNOTATION` at `UNKNOWN` level.
    pub fn nullability_data(self, sema: &Sema) -> NullabilityData {
        match self.nullability_target(sema) {
            Some(target) => self.nullability_data_for(sema, target),
            None => NullabilityData::no_annotation(NullabilityLevel::Unknown),
        }
    }

    pub fn nullability_data_for(self, sema: &Sema, target: NullabilityTarget) -> NullabilityData {
        let scopes = nullability_scopes(sema, self);
        for &(scope, level) in &scopes {
            let data = data_at_level(sema, &scope.metadata(sema), scope, target, level);
            if data.ty != NullabilityType::NoAnnotation {
                return data;
            }
        }
        let last_level = scopes
            .last()
            .map_or(NullabilityLevel::Unknown, |&(_, level)| level);
        NullabilityData::no_annotation(last_level)
    }
}

/// Scopes consulted for `symbol`, innermost first.
fn nullability_scopes(sema: &Sema, symbol: SymbolId) -> Vec<(SymbolId, NullabilityLevel)> {
    let mut scopes = Vec::new();
    match symbol.data(sema) {
        Symbol::Variable(_) => {
            scopes.push((symbol, NullabilityLevel::Variable));
            let owner = symbol.owner(sema);
            if matches!(owner.data(sema), Symbol::Method(MethodOrigin::Declared(_))) {
                scopes.push((owner, NullabilityLevel::Method));
            }
        }
        Symbol::Method(_) => scopes.push((symbol, NullabilityLevel::Method)),
        _ => return scopes,
    }
    let mut class = symbol.enclosing_class(sema);
    let mut outermost = None;
    while let Some(current) = class {
        scopes.push((current, NullabilityLevel::Class));
        outermost = Some(current);
        class = current
            .owner(sema)
            .enclosing_class(sema)
            .filter(|&next| next != current);
    }
    let package = outermost
        .map(|outermost| outermost.owner(sema))
        .filter(|owner| owner.is_package_symbol(sema))
        .unwrap_or(sema.root_package());
    scopes.push((package, NullabilityLevel::Package));
    scopes
}

fn data_at_level(
    sema: &Sema,
    metadata: &SymbolMetadata,
    site: SymbolId,
    target: NullabilityTarget,
    level: NullabilityLevel,
) -> NullabilityData {
    let classifiers = classifiers(target, level);
    if classifiers.is_empty() {
        return NullabilityData::no_annotation(level);
    }
    let mut visited = FxHashSet::default();
    search(sema, &mut visited, metadata, site, level, false, classifiers)
}

fn search(
    sema: &Sema,
    visited: &mut FxHashSet<SymbolId>,
    metadata: &SymbolMetadata,
    site: SymbolId,
    level: NullabilityLevel,
    meta_annotation: bool,
    classifiers: &[Classifier],
) -> NullabilityData {
    let direct = direct_data(sema, metadata, site, level, meta_annotation, classifiers);
    if direct.ty != NullabilityType::NoAnnotation {
        return direct;
    }
    for annotation in metadata.annotations() {
        let name = annotation.fully_qualified_name(sema);
        // Only unknown annotations are searched: known ones may carry
        // contradicting meta-annotations.
        if visited.insert(annotation.symbol) && !is_known_annotation(&name) {
            let nested = search(
                sema,
                visited,
                &annotation.symbol.metadata(sema),
                annotation.symbol,
                level,
                true,
                classifiers,
            );
            if nested.ty != NullabilityType::NoAnnotation {
                return nested;
            }
        }
    }
    NullabilityData::no_annotation(level)
}

fn direct_data(
    sema: &Sema,
    metadata: &SymbolMetadata,
    site: SymbolId,
    level: NullabilityLevel,
    meta_annotation: bool,
    classifiers: &[Classifier],
) -> NullabilityData {
    let mut strongest = NullabilityType::NoAnnotation;
    let mut chosen = None;
    for annotation in metadata.annotations() {
        let ty = if annotation.symbol.is_unknown(sema) {
            NullabilityType::Unknown
        } else {
            let name = annotation.fully_qualified_name(sema);
            classifiers
                .iter()
                .map(|classifier| classifier.classify(&name, annotation))
                .find(|&ty| ty != NullabilityType::NoAnnotation)
                .unwrap_or(NullabilityType::NoAnnotation)
        };
        if ty > strongest {
            strongest = ty;
            chosen = Some(annotation);
        }
    }
    match (strongest, chosen) {
        (NullabilityType::Unknown, _) => NullabilityData::unknown(level),
        (ty, Some(annotation)) => NullabilityData::new(
            ty,
            level,
            Some(annotation.clone()),
            Some(site),
            meta_annotation,
        ),
        (_, None) => NullabilityData::no_annotation(level),
    }
}
