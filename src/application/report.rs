//! Results of a verification run.

use std::fmt;

use termtree::Tree;

use crate::domain::{Exemption, KindId};

/// Which contract a mutator or kind broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// The mutator changed nothing the listener could see.
    NoNotification,
    /// A node argument does not have the receiver as ancestor.
    ParentNotInstalled,
    /// The first element of a collection argument does not have the
    /// receiver as ancestor.
    CollectionParentNotInstalled,
    /// The mutator refused without being declared unsettable.
    RefusedWithoutExemption,
    /// A refusal or unsupported report that still emitted events or
    /// attached the argument.
    RefusedButMutated,
    /// The kind declares no mutators.
    NoMutators,
    /// No mutator of the kind reached a parent assertion.
    NoParentAssertions,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ViolationKind::NoNotification => "no change event emitted",
            ViolationKind::ParentNotInstalled => "argument does not have the receiver as ancestor",
            ViolationKind::CollectionParentNotInstalled => {
                "first collection element does not have the receiver as ancestor"
            }
            ViolationKind::RefusedWithoutExemption => "refused but not declared unsettable",
            ViolationKind::RefusedButMutated => "refused but changed the receiver",
            ViolationKind::NoMutators => "kind declares no mutators",
            ViolationKind::NoParentAssertions => "no parent assertion was reached",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractViolation {
    pub kind: KindId,
    /// `None` for kind-level violations
    pub mutator: Option<String>,
    pub violation: ViolationKind,
}

impl fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.mutator {
            Some(m) => write!(f, "{}.{}: {}", self.kind, m, self.violation),
            None => write!(f, "{}: {}", self.kind, self.violation),
        }
    }
}

/// How a mutator invocation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrialOutcome {
    Applied,
    Refused,
    /// Accepted unsupported-operation report of an unsettable mutator
    Unsupported(String),
}

/// One mutator invocation.
#[derive(Debug, Clone)]
pub struct MutatorTrial {
    pub mutator: String,
    pub parameter: String,
    pub argument: String,
    pub exemption: Option<Exemption>,
    pub outcome: TrialOutcome,
    /// Events observed during the invocation
    pub events: usize,
    pub violations: Vec<ViolationKind>,
}

impl MutatorTrial {
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    fn label(&self) -> String {
        let mut text = format!(
            "{}({}) = {} -> {} event(s)",
            self.mutator, self.parameter, self.argument, self.events
        );
        if let Some(e) = self.exemption {
            text.push_str(&format!(" [{}]", e));
        }
        match &self.outcome {
            TrialOutcome::Applied => {}
            TrialOutcome::Refused => text.push_str(" refused"),
            TrialOutcome::Unsupported(detail) => text.push_str(&format!(" unsupported: {}", detail)),
        }
        text
    }
}

/// Everything a run learned about one kind.
#[derive(Debug, Clone)]
pub struct KindReport {
    pub kind: KindId,
    pub trials: Vec<MutatorTrial>,
    pub violations: Vec<ContractViolation>,
    pub parent_assertions: usize,
    pub collection_parent_assertions: usize,
}

impl KindReport {
    pub fn new(kind: KindId) -> Self {
        Self {
            kind,
            trials: Vec::new(),
            violations: Vec::new(),
            parent_assertions: 0,
            collection_parent_assertions: 0,
        }
    }

    pub fn is_passing(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn trial(&self, mutator: &str) -> Option<&MutatorTrial> {
        self.trials.iter().find(|t| t.mutator == mutator)
    }

    pub fn to_tree(&self) -> Tree<String> {
        let status = if self.is_passing() { "ok" } else { "FAILED" };
        let mut tree = Tree::new(format!(
            "{} {} ({} mutators, {} parent / {} collection assertions)",
            self.kind,
            status,
            self.trials.len(),
            self.parent_assertions,
            self.collection_parent_assertions
        ));
        for trial in &self.trials {
            let mut leaf = Tree::new(trial.label());
            for v in &trial.violations {
                leaf.push(Tree::new(format!("violation: {}", v)));
            }
            tree.push(leaf);
        }
        for v in self.violations.iter().filter(|v| v.mutator.is_none()) {
            tree.push(Tree::new(format!("violation: {}", v.violation)));
        }
        tree
    }
}

#[derive(Debug, Clone, Default)]
pub struct VerificationReport {
    pub kinds: Vec<KindReport>,
    /// Kinds excluded by configuration
    pub skipped: Vec<KindId>,
    /// `exclude_kinds` entries that name no catalogued kind
    pub unknown_exclusions: Vec<String>,
}

impl VerificationReport {
    /// Passing means every verified kind passed and nothing was skipped.
    pub fn is_passing(&self) -> bool {
        self.skipped.is_empty() && self.kinds.iter().all(KindReport::is_passing)
    }

    pub fn violations(&self) -> impl Iterator<Item = &ContractViolation> {
        self.kinds.iter().flat_map(|k| k.violations.iter())
    }

    pub fn kind(&self, kind: KindId) -> Option<&KindReport> {
        self.kinds.iter().find(|k| k.kind == kind)
    }

    pub fn trial_count(&self) -> usize {
        self.kinds.iter().map(|k| k.trials.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCK: KindId = KindId::new("Block");

    fn trial(mutator: &str, violations: Vec<ViolationKind>) -> MutatorTrial {
        MutatorTrial {
            mutator: mutator.to_string(),
            parameter: "List<Statement>".to_string(),
            argument: "[Block#1]".to_string(),
            exemption: None,
            outcome: TrialOutcome::Applied,
            events: 1,
            violations,
        }
    }

    #[test]
    fn given_failing_trial_when_rendering_then_violation_is_nested() {
        let mut report = KindReport::new(BLOCK);
        report.trials.push(trial("set_statements", vec![ViolationKind::NoNotification]));
        report.violations.push(ContractViolation {
            kind: BLOCK,
            mutator: Some("set_statements".to_string()),
            violation: ViolationKind::NoNotification,
        });
        report.violations.push(ContractViolation {
            kind: BLOCK,
            mutator: None,
            violation: ViolationKind::NoParentAssertions,
        });

        let rendered = report.to_tree().to_string();

        assert!(rendered.starts_with("Block FAILED (1 mutators"));
        assert!(rendered.contains("set_statements(List<Statement>) = [Block#1] -> 1 event(s)"));
        assert!(rendered.contains("violation: no change event emitted"));
        assert!(rendered.contains("violation: no parent assertion was reached"));
    }

    #[test]
    fn given_skipped_kind_when_judging_then_not_passing() {
        let mut report = VerificationReport::default();
        report.kinds.push(KindReport::new(BLOCK));
        assert!(report.is_passing());

        report.skipped.push(KindId::new("If"));
        assert!(!report.is_passing());
        assert_eq!(report.violations().count(), 0);
    }

    #[test]
    fn given_violation_when_displaying_then_names_kind_and_mutator() {
        let v = ContractViolation {
            kind: BLOCK,
            mutator: Some("add_statement".to_string()),
            violation: ViolationKind::ParentNotInstalled,
        };
        assert_eq!(
            v.to_string(),
            "Block.add_statement: argument does not have the receiver as ancestor"
        );
    }
}
