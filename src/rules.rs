//! Removal rules: binding matchers to the program elements they apply to.
//!
//! A [`crate::rules::RemovalRule`] pairs an [`AnnotationMatcher`] with a
//! [`crate::rules::TargetKind`] scope. Rules are assembled into an immutable
//! [`crate::rules::RuleSet`] through [`crate::rules::RuleSetBuilder`];
//! configuration is frozen before any traversal begins, so a rule set can be
//! shared freely between concurrent `process` invocations.
//!
//! `TargetKind::All` is sugar: it expands into every concrete
//! [`crate::rules::ElementKind`] while the rule set is built, never at match
//! time, keeping the traversal loop free of special cases.
//!
//! # Usage Examples
//!
//! ```rust
//! use classpurge::{NameMatcher, RuleSet, TargetKind};
//!
//! let rules = RuleSet::builder()
//!     .remove(NameMatcher::new("com.example.Generated"))
//!     .remove_from(TargetKind::Method, NameMatcher::new("com.example.Traced"))
//!     .build();
//!
//! use classpurge::ElementKind;
//! assert!(rules.matches(ElementKind::Field, "com.example.Generated"));
//! assert!(rules.matches(ElementKind::Method, "com.example.Traced"));
//! assert!(!rules.matches(ElementKind::Field, "com.example.Traced"));
//! ```

use std::sync::Arc;

use strum::{Display, EnumCount, EnumIter, IntoEnumIterator};

use crate::matcher::AnnotationMatcher;

/// The concrete kinds of program elements annotations can be removed from.
///
/// Local variable annotations are not retained in class files at all, so no
/// kind exists for them. Methods named `<init>` are constructors; `<clinit>`
/// is neither a method nor a constructor for removal purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumCount, EnumIter)]
pub enum ElementKind {
    /// Annotations on the class or interface itself.
    Class,
    /// Annotations on field declarations.
    Field,
    /// Annotations on constructors (`<init>` methods).
    Constructor,
    /// Annotations on regular method declarations.
    Method,
    /// Annotations on formal parameters of methods and constructors.
    Parameter,
    /// Annotations on record components.
    RecordComponent,
}

/// The scope a removal rule applies to: one [`ElementKind`], or all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    /// Class-level annotations only.
    Class,
    /// Field annotations only.
    Field,
    /// Constructor annotations only.
    Constructor,
    /// Method annotations only.
    Method,
    /// Parameter annotations only.
    Parameter,
    /// Record component annotations only.
    RecordComponent,
    /// Every concrete kind; expanded at rule-set construction time.
    All,
}

impl TargetKind {
    /// The concrete kinds this target expands to.
    fn expand(self) -> Vec<ElementKind> {
        match self {
            TargetKind::Class => vec![ElementKind::Class],
            TargetKind::Field => vec![ElementKind::Field],
            TargetKind::Constructor => vec![ElementKind::Constructor],
            TargetKind::Method => vec![ElementKind::Method],
            TargetKind::Parameter => vec![ElementKind::Parameter],
            TargetKind::RecordComponent => vec![ElementKind::RecordComponent],
            TargetKind::All => ElementKind::iter().collect(),
        }
    }
}

impl From<ElementKind> for TargetKind {
    fn from(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Class => TargetKind::Class,
            ElementKind::Field => TargetKind::Field,
            ElementKind::Constructor => TargetKind::Constructor,
            ElementKind::Method => TargetKind::Method,
            ElementKind::Parameter => TargetKind::Parameter,
            ElementKind::RecordComponent => TargetKind::RecordComponent,
        }
    }
}

/// One removal rule: a matcher bound to a target scope.
pub struct RemovalRule {
    target: TargetKind,
    matcher: Arc<dyn AnnotationMatcher>,
}

impl RemovalRule {
    /// Create a rule removing annotations matched by `matcher` from `target`.
    pub fn new(target: TargetKind, matcher: impl AnnotationMatcher + 'static) -> Self {
        RemovalRule {
            target,
            matcher: Arc::new(matcher),
        }
    }

    /// The scope this rule applies to.
    #[must_use]
    pub fn target(&self) -> TargetKind {
        self.target
    }
}

/// An immutable set of removal rules, indexed by element kind.
///
/// Owned by the caller and read-only during a traversal; sharing one rule set
/// across worker threads is safe.
pub struct RuleSet {
    filtered: [Vec<Arc<dyn AnnotationMatcher>>; ElementKind::COUNT],
}

impl RuleSet {
    /// Start building a rule set.
    #[must_use]
    pub fn builder() -> RuleSetBuilder {
        RuleSetBuilder { rules: Vec::new() }
    }

    /// Build a rule set from an already-assembled rule collection.
    #[must_use]
    pub fn from_rules(rules: impl IntoIterator<Item = RemovalRule>) -> Self {
        let mut filtered: [Vec<Arc<dyn AnnotationMatcher>>; ElementKind::COUNT] =
            Default::default();
        for rule in rules {
            for kind in rule.target.expand() {
                filtered[kind as usize].push(Arc::clone(&rule.matcher));
            }
        }
        RuleSet { filtered }
    }

    /// Returns `true` if no rule targets any kind.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filtered.iter().all(Vec::is_empty)
    }

    /// Returns `true` if at least one rule targets `kind`.
    ///
    /// Lets the engine copy whole attribute tables verbatim when no rule could
    /// ever match inside them.
    #[must_use]
    pub fn applies_to(&self, kind: ElementKind) -> bool {
        !self.filtered[kind as usize].is_empty()
    }

    /// Returns `true` if any rule targeting `kind` matches `class_name`.
    #[must_use]
    pub fn matches(&self, kind: ElementKind, class_name: &str) -> bool {
        self.filtered[kind as usize]
            .iter()
            .any(|matcher| matcher.matches(class_name))
    }
}

/// Builder assembling a [`RuleSet`].
///
/// All configuration happens here; the built rule set is immutable.
pub struct RuleSetBuilder {
    rules: Vec<RemovalRule>,
}

impl RuleSetBuilder {
    /// Remove the matched annotations from all element kinds.
    #[must_use]
    pub fn remove(self, matcher: impl AnnotationMatcher + 'static) -> Self {
        self.remove_from(TargetKind::All, matcher)
    }

    /// Remove the matched annotations from the given scope only.
    #[must_use]
    pub fn remove_from(mut self, target: TargetKind, matcher: impl AnnotationMatcher + 'static) -> Self {
        self.rules.push(RemovalRule::new(target, matcher));
        self
    }

    /// Freeze the configuration into an immutable [`RuleSet`].
    #[must_use]
    pub fn build(self) -> RuleSet {
        RuleSet::from_rules(self.rules)
    }
}
