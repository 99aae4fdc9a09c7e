//! Checker combination policy.
//!
//! A node is accepted if any checker confidently accepts it; when several
//! accept, the highest confidence wins. When none accepts but at least one
//! comes close, the node is *ambiguous* and the decision escalates to the
//! human port. Everything else is a rejection and the node expands further.

use std::sync::Arc;

use crate::checker::Checker;
use crate::human::ConfirmPort;
use crate::verdict::Verdict;

/// Set-level combination thresholds.
#[derive(Debug, Clone)]
pub struct SetConfig {
    /// Confidence at or above which a non-accepting verdict makes the node
    /// ambiguous (the "ask a human" band).
    pub ambiguous_confidence: f64,
}

impl Default for SetConfig {
    fn default() -> Self {
        Self {
            ambiguous_confidence: 0.42,
        }
    }
}

/// The combined judgment over all checkers for one candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum Judgement {
    /// Some checker confidently accepted.
    Accept {
        confidence: f64,
        checker: &'static str,
        reason: String,
    },
    /// No acceptance, but the best verdict is close enough to warrant a
    /// human decision.
    Ambiguous {
        confidence: f64,
        checker: &'static str,
        reason: String,
    },
    /// Everyone rejected; best residual confidence retained for
    /// best-guess reporting.
    Reject { confidence: f64 },
}

/// An ordered set of checkers plus the confirmation port.
pub struct CheckerSet {
    checkers: Vec<Box<dyn Checker>>,
    confirm: Arc<dyn ConfirmPort>,
    config: SetConfig,
}

impl std::fmt::Debug for CheckerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckerSet")
            .field("checkers", &self.names())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl CheckerSet {
    #[must_use]
    pub fn new(
        checkers: Vec<Box<dyn Checker>>,
        confirm: Arc<dyn ConfirmPort>,
        config: SetConfig,
    ) -> Self {
        Self {
            checkers,
            confirm,
            config,
        }
    }

    /// Names of the active checkers, in evaluation order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.checkers.iter().map(|c| c.name()).collect()
    }

    /// Evaluate every checker and combine verdicts.
    ///
    /// Deterministic: checkers run in their registered order and ties in
    /// confidence keep the earlier checker.
    #[must_use]
    pub fn judge(&self, text: &str) -> Judgement {
        let mut best_accept: Option<(f64, &'static str, String)> = None;
        let mut best_other: Option<(f64, &'static str, String)> = None;
        for checker in &self.checkers {
            let Verdict {
                is_valid,
                confidence,
                reason,
            } = checker.evaluate(text);
            log::trace!(
                "checker {} on {:?}: valid={is_valid} confidence={confidence:.2}",
                checker.name(),
                truncate_for_log(text),
            );
            let slot = if is_valid {
                &mut best_accept
            } else {
                &mut best_other
            };
            let better = slot.as_ref().map_or(true, |(c, _, _)| confidence > *c);
            if better {
                *slot = Some((confidence, checker.name(), reason));
            }
        }
        if let Some((confidence, checker, reason)) = best_accept {
            return Judgement::Accept {
                confidence,
                checker,
                reason,
            };
        }
        match best_other {
            Some((confidence, checker, reason))
                if confidence >= self.config.ambiguous_confidence =>
            {
                Judgement::Ambiguous {
                    confidence,
                    checker,
                    reason,
                }
            }
            Some((confidence, _, _)) => Judgement::Reject { confidence },
            None => Judgement::Reject { confidence: 0.0 },
        }
    }

    /// Ask the human port about an ambiguous candidate. The engine calls
    /// this at most once per node.
    #[must_use]
    pub fn confirm(&self, candidate: &str, reason: &str) -> bool {
        self.confirm.confirm(candidate, reason)
    }
}

fn truncate_for_log(text: &str) -> &str {
    let mut end = text.len().min(48);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// The default automated checker set: quadgram, script ratio, dictionary.
#[must_use]
pub fn default_checker_set(confirm: Arc<dyn ConfirmPort>) -> CheckerSet {
    CheckerSet::new(
        vec![
            Box::new(crate::quadgram::QuadgramChecker::default()),
            Box::new(crate::script::ScriptChecker::default()),
            Box::new(crate::dictionary::DictionaryChecker::default()),
        ],
        confirm,
        SetConfig::default(),
    )
}
