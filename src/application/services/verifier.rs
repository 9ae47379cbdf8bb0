//! Contract verification engine
//!
//! For every verifiable kind and every one of its mutators: synthesize an
//! argument, clone a fresh receiver from the kind's prototype, invoke, and
//! check that an event fired and that the argument now sits below the
//! receiver.

use std::cell::RefCell;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use tracing::{debug, info, instrument, warn};

use crate::application::report::{
    ContractViolation, KindReport, MutatorTrial, TrialOutcome, VerificationReport, ViolationKind,
};
use crate::application::services::synthesizer::Synthesizer;
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::{
    DomainError, EventCounter, Exemption, KindDef, KindId, Model, MutationFailure,
    MutationOutcome, NodeId, SharedListener, StructuralMutator, TypeDescriptor, Value,
};

/// Installs a listener and syntax-error tolerance for the duration of a run.
///
/// Both are restored when the scope is dropped, whichever way the run ends.
pub struct RunScope<'m> {
    model: &'m mut Model,
    previous_listener: Option<SharedListener>,
    previous_ignore_syntax_errors: bool,
}

impl<'m> RunScope<'m> {
    pub fn install(model: &'m mut Model, listener: SharedListener) -> Self {
        let previous_listener = model.set_listener(Some(listener));
        let previous_ignore_syntax_errors = model.set_ignore_syntax_errors(true);
        Self {
            model,
            previous_listener,
            previous_ignore_syntax_errors,
        }
    }
}

impl Deref for RunScope<'_> {
    type Target = Model;

    fn deref(&self) -> &Model {
        self.model
    }
}

impl DerefMut for RunScope<'_> {
    fn deref_mut(&mut self) -> &mut Model {
        self.model
    }
}

impl Drop for RunScope<'_> {
    fn drop(&mut self) {
        self.model.set_listener(self.previous_listener.take());
        self.model
            .set_ignore_syntax_errors(self.previous_ignore_syntax_errors);
    }
}

pub struct Verifier {
    synthesizer: Synthesizer,
    exclude_kinds: Vec<String>,
}

impl Default for Verifier {
    fn default() -> Self {
        Self::new(Synthesizer::default(), Vec::new())
    }
}

impl Verifier {
    pub fn new(synthesizer: Synthesizer, exclude_kinds: Vec<String>) -> Self {
        Self {
            synthesizer,
            exclude_kinds,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            Synthesizer::new(settings.synthesis.clone()),
            settings.verify.exclude_kinds.clone(),
        )
    }

    /// Verifies every verifiable kind in the model's catalog.
    pub fn verify_all(&self, model: &mut Model) -> ApplicationResult<VerificationReport> {
        self.verify(model, &[])
    }

    /// Verifies the kinds named in `selected`, or all of them when empty.
    #[instrument(level = "debug", skip(self, model))]
    pub fn verify(&self, model: &mut Model, selected: &[String]) -> ApplicationResult<VerificationReport> {
        let catalog = model.catalog().clone();
        for name in selected {
            if catalog.find(name).is_none() {
                return Err(DomainError::UnknownKind(name.clone()).into());
            }
        }

        let counter = Rc::new(RefCell::new(EventCounter::new()));
        let listener: SharedListener = counter.clone();
        let mut scope = RunScope::install(model, listener);

        let mut report = VerificationReport::default();
        for name in &self.exclude_kinds {
            if catalog.find(name).is_none() {
                warn!(kind = name.as_str(), "exclude_kinds entry matches no kind");
                report.unknown_exclusions.push(name.clone());
            }
        }
        for kind in catalog.verifiable_kinds() {
            let name = kind.id().name();
            if !selected.is_empty() && !selected.iter().any(|s| s == name) {
                continue;
            }
            if self.exclude_kinds.iter().any(|e| e == name) {
                warn!(kind = name, "skipped by configuration");
                report.skipped.push(kind.id());
                continue;
            }
            let kind_report = self.verify_kind(&mut scope, &counter, kind)?;
            info!(
                kind = name,
                trials = kind_report.trials.len(),
                violations = kind_report.violations.len(),
                "kind verified"
            );
            report.kinds.push(kind_report);
        }
        Ok(report)
    }

    fn verify_kind(
        &self,
        model: &mut Model,
        counter: &Rc<RefCell<EventCounter>>,
        kind: &KindDef,
    ) -> ApplicationResult<KindReport> {
        let mut report = KindReport::new(kind.id());
        let prototype = self
            .synthesizer
            .synthesize(model, &TypeDescriptor::kind(kind.id()))?
            .as_node()
            .ok_or_else(|| ApplicationError::SynthesisFailure(TypeDescriptor::kind(kind.id())))?;

        for mutator in kind.mutator_table() {
            let trial = self.run_trial(model, counter, kind.id(), prototype, mutator.as_ref(), &mut report)?;
            for v in &trial.violations {
                report.violations.push(ContractViolation {
                    kind: kind.id(),
                    mutator: Some(trial.mutator.clone()),
                    violation: *v,
                });
            }
            report.trials.push(trial);
        }

        if report.trials.is_empty() {
            report.violations.push(kind_violation(kind.id(), ViolationKind::NoMutators));
        }
        if report.parent_assertions + report.collection_parent_assertions == 0 {
            report
                .violations
                .push(kind_violation(kind.id(), ViolationKind::NoParentAssertions));
        }
        Ok(report)
    }

    #[instrument(level = "trace", skip_all, fields(kind = %kind, mutator = mutator.name()))]
    fn run_trial(
        &self,
        model: &mut Model,
        counter: &Rc<RefCell<EventCounter>>,
        kind: KindId,
        prototype: NodeId,
        mutator: &dyn StructuralMutator,
        report: &mut KindReport,
    ) -> ApplicationResult<MutatorTrial> {
        let argument = self.synthesizer.synthesize(model, mutator.parameter())?;
        let receiver = model.clone_node(prototype)?;

        counter.borrow_mut().reset_changed();
        let before = counter.borrow().count();
        let outcome = mutator.apply(model, receiver, &argument);
        let after = counter.borrow().count();

        let exemption = mutator.exemption();
        let mut trial = MutatorTrial {
            mutator: mutator.name().to_string(),
            parameter: mutator.parameter().to_string(),
            argument: argument.to_string(),
            exemption,
            outcome: TrialOutcome::Applied,
            events: after - before,
            violations: Vec::new(),
        };

        match outcome {
            MutationOutcome::Applied => {
                if after <= before {
                    trial.violations.push(ViolationKind::NoNotification);
                }
                if exemption.is_none() {
                    check_parent(model, receiver, &argument, report, &mut trial);
                }
            }
            MutationOutcome::Refused => {
                trial.outcome = TrialOutcome::Refused;
                if exemption != Some(Exemption::Unsettable) {
                    trial.violations.push(ViolationKind::RefusedWithoutExemption);
                }
                check_untouched(model, receiver, &argument, &mut trial);
            }
            MutationOutcome::Failed(MutationFailure::Unsupported(detail)) => {
                if exemption != Some(Exemption::Unsettable) {
                    return Err(ApplicationError::UnsupportedMutation {
                        kind,
                        mutator: trial.mutator,
                        detail,
                    });
                }
                trial.outcome = TrialOutcome::Unsupported(detail);
                check_untouched(model, receiver, &argument, &mut trial);
            }
            MutationOutcome::Failed(MutationFailure::Domain(e)) => return Err(e.into()),
            MutationOutcome::Failed(MutationFailure::Internal(source)) => {
                return Err(ApplicationError::ToolkitInternal {
                    kind,
                    mutator: trial.mutator,
                    source,
                })
            }
        }

        debug!(
            events = trial.events,
            violations = trial.violations.len(),
            "trial finished"
        );
        Ok(trial)
    }
}

/// Node arguments must sit below the receiver; for collections the first
/// element is checked.
fn check_parent(
    model: &Model,
    receiver: NodeId,
    argument: &Value,
    report: &mut KindReport,
    trial: &mut MutatorTrial,
) {
    if let Some(node) = argument.as_node() {
        report.parent_assertions += 1;
        if !model.has_ancestor(node, receiver) {
            trial.violations.push(ViolationKind::ParentNotInstalled);
        }
    } else if let Some(first) = argument.first_node() {
        report.collection_parent_assertions += 1;
        if !model.has_ancestor(first, receiver) {
            trial
                .violations
                .push(ViolationKind::CollectionParentNotInstalled);
        }
    }
}

/// A refusing mutator must leave no trace: no event and no link from the
/// argument to the receiver.
fn check_untouched(model: &Model, receiver: NodeId, argument: &Value, trial: &mut MutatorTrial) {
    let attached = argument
        .nodes()
        .into_iter()
        .any(|node| model.has_ancestor(node, receiver));
    if trial.events > 0 || attached {
        trial.violations.push(ViolationKind::RefusedButMutated);
    }
}

fn kind_violation(kind: KindId, violation: ViolationKind) -> ContractViolation {
    ContractViolation {
        kind,
        mutator: None,
        violation,
    }
}
