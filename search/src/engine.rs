//! Search entry point and expansion loop.
//!
//! State machine: `Ready → Expanding → (Found | Exhausted)`. Each
//! expanding step pops the best frontier node, applies every applicable
//! decoder through the cache, judges every distinct variant with the
//! checker set, and either terminates on the first acceptance or enqueues
//! the surviving children. All runtime terminations — including budget and
//! deadline exhaustion — are expressed in the returned
//! [`SearchOutcome`], never as errors.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use rayon::prelude::*;

use peel_analysis::{CheckerSet, Judgement};
use peel_codecs::DecoderCatalog;

use crate::cache::{CacheKey, CacheStats, DecodeCache};
use crate::error::SearchError;
use crate::fingerprint::{fingerprint, DOMAIN_SEARCH_NODE};
use crate::frontier::BestFirstFrontier;
use crate::node::{chain_to, render_chain, ChainStep, NodeId, SearchNode};
use crate::policy::SearchPolicy;

/// Why an exhausted search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExhaustReason {
    /// The frontier emptied: every reachable candidate was tried.
    SpaceExhausted,
    /// The node-count budget ran out.
    NodeBudget,
    /// The wall-clock deadline passed.
    Deadline,
}

impl ExhaustReason {
    /// Diagnostic label distinguishing plain exhaustion from resource
    /// exhaustion.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SpaceExhausted => "search space exhausted",
            Self::NodeBudget => "node budget exhausted",
            Self::Deadline => "time budget exhausted",
        }
    }
}

/// A successful decode.
#[derive(Debug, Clone, PartialEq)]
pub struct Found {
    /// The recovered plaintext.
    pub plaintext: String,
    /// Decoders applied from the input to the plaintext, in order.
    pub chain: Vec<ChainStep>,
    /// Confidence of the accepting checker.
    pub confidence: f64,
    /// Name of the accepting checker.
    pub checker: &'static str,
}

/// The most plausible candidate seen by an exhausted search.
#[derive(Debug, Clone, PartialEq)]
pub struct BestGuess {
    pub text: String,
    pub chain: Vec<ChainStep>,
    pub confidence: f64,
}

/// Terminal result of a search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// A checker accepted a candidate; first acceptance wins globally.
    Found(Found),
    /// No candidate was accepted within the budgets.
    Exhausted {
        best_guess: Option<BestGuess>,
        reason: ExhaustReason,
    },
}

impl SearchOutcome {
    /// Whether the search found plaintext.
    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Full result of a search run: the outcome plus the explored graph.
#[derive(Debug)]
pub struct SearchReport {
    pub outcome: SearchOutcome,
    /// Every node created, indexed by [`NodeId`].
    pub nodes: Vec<SearchNode>,
    /// Node ids in the order they were expanded.
    pub expanded: Vec<NodeId>,
    /// Children dropped because their text was already seen.
    pub duplicates_suppressed: u64,
    /// Largest frontier size reached.
    pub frontier_high_water: u64,
    /// Cache counters at the end of the run.
    pub cache: CacheStats,
}

/// A decoded child candidate before it becomes a node.
struct RawChild {
    decoder: &'static str,
    priority: i32,
    variant: Option<String>,
    text: String,
}

enum NodeFate {
    Accepted(Found),
    Expandable,
}

/// The search engine. Catalog, checkers, policy, and cache are borrowed
/// immutable context: one engine instance per top-level request, no
/// process-wide state.
pub struct SearchEngine<'a> {
    catalog: &'a DecoderCatalog,
    checkers: &'a CheckerSet,
    policy: &'a SearchPolicy,
    cache: &'a DecodeCache,
}

impl<'a> SearchEngine<'a> {
    #[must_use]
    pub fn new(
        catalog: &'a DecoderCatalog,
        checkers: &'a CheckerSet,
        policy: &'a SearchPolicy,
        cache: &'a DecodeCache,
    ) -> Self {
        Self {
            catalog,
            checkers,
            policy,
            cache,
        }
    }

    /// Run the search to termination.
    ///
    /// Deterministic for a fixed input, catalog, checker set, policy, and
    /// cache state, in both single-threaded and parallel modes — parallel
    /// workers only decode; node creation, judging, and acceptance
    /// selection happen sequentially in frontier order.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] only for pre-flight policy validation
    /// failures; a search that starts always produces a report.
    #[allow(clippy::too_many_lines)]
    pub fn run(&self, input: &str) -> Result<SearchReport, SearchError> {
        self.policy.validate()?;
        let started = Instant::now();
        let stop = AtomicBool::new(false);

        let mut frontier = BestFirstFrontier::new();
        let mut nodes: Vec<SearchNode> = Vec::new();
        let mut expanded: Vec<NodeId> = Vec::new();
        let mut duplicates_suppressed = 0u64;
        let mut creation_order = 0u64;
        let mut best: Option<BestGuess> = None;

        let root_fp = fingerprint(DOMAIN_SEARCH_NODE, input.as_bytes());
        frontier.mark_visited(root_fp.hex_digest());
        nodes.push(SearchNode {
            id: 0,
            parent: None,
            text: input.to_string(),
            fingerprint: root_fp,
            depth: 0,
            producing_priority: i32::MAX,
            priority_sum: 0,
            creation_order,
            step: None,
        });
        creation_order += 1;

        // The root may already be plaintext (chain = []).
        match self.judge_node(0, &nodes, &mut best) {
            NodeFate::Accepted(found) => {
                return Ok(self.report(
                    SearchOutcome::Found(found),
                    nodes,
                    expanded,
                    duplicates_suppressed,
                    frontier.high_water(),
                ));
            }
            NodeFate::Expandable => {
                let key = nodes[0].frontier_key(self.policy.ordering);
                frontier.push(key, 0);
            }
        }

        let workers = self.policy.parallel_workers.max(1);
        let reason = loop {
            if stop.load(Ordering::Relaxed) || self.past_deadline(started) {
                break ExhaustReason::Deadline;
            }
            if nodes.len() as u64 >= self.policy.max_nodes {
                break ExhaustReason::NodeBudget;
            }
            if frontier.is_empty() {
                break ExhaustReason::SpaceExhausted;
            }

            let mut batch: Vec<NodeId> = Vec::with_capacity(workers);
            while batch.len() < workers {
                match frontier.pop() {
                    Some(id) => batch.push(id),
                    None => break,
                }
            }

            // Decode phase. Workers share only the cache and the stop
            // flag; decode outcomes are pure, so evaluation order cannot
            // change them.
            let children_per_node: Vec<Vec<RawChild>> = if workers > 1 && batch.len() > 1 {
                batch
                    .par_iter()
                    .map(|&id| self.decode_applications(&nodes[id].text, started, &stop))
                    .collect()
            } else {
                batch
                    .iter()
                    .map(|&id| self.decode_applications(&nodes[id].text, started, &stop))
                    .collect()
            };

            // Commit phase: sequential and deterministic, in frontier pop
            // order. Acceptances across the batch are collected first;
            // ties break on chain priority-sum, then creation order — not
            // on wall-clock arrival.
            let mut accepts: Vec<(i64, u64, Found)> = Vec::new();
            for (&parent_id, children) in batch.iter().zip(children_per_node) {
                expanded.push(parent_id);
                let mut created_here = 0usize;
                for child in children {
                    if created_here >= self.policy.max_children_per_node {
                        log::debug!(
                            "node {parent_id}: child cap {} reached, dropping remainder",
                            self.policy.max_children_per_node
                        );
                        break;
                    }
                    if child.text.is_empty() || child.text == nodes[parent_id].text {
                        continue;
                    }
                    let fp = fingerprint(DOMAIN_SEARCH_NODE, child.text.as_bytes());
                    if !frontier.mark_visited(fp.hex_digest()) {
                        duplicates_suppressed += 1;
                        continue;
                    }
                    let id = nodes.len();
                    let parent = &nodes[parent_id];
                    let node = SearchNode {
                        id,
                        parent: Some(parent_id),
                        text: child.text,
                        fingerprint: fp,
                        depth: parent.depth + 1,
                        producing_priority: child.priority,
                        priority_sum: parent.priority_sum + i64::from(child.priority),
                        creation_order,
                        step: Some(ChainStep {
                            decoder: child.decoder.to_string(),
                            variant: child.variant,
                        }),
                    };
                    creation_order += 1;
                    nodes.push(node);
                    created_here += 1;

                    match self.judge_node(id, &nodes, &mut best) {
                        NodeFate::Accepted(found) => {
                            accepts.push((nodes[id].priority_sum, nodes[id].creation_order, found));
                            // Later children of this parent cannot beat
                            // this acceptance on priority-sum.
                            break;
                        }
                        NodeFate::Expandable => {
                            if nodes[id].depth < self.policy.max_depth {
                                let key = nodes[id].frontier_key(self.policy.ordering);
                                frontier.push(key, id);
                            }
                        }
                    }
                }
            }

            if let Some((_, _, found)) = accepts
                .into_iter()
                .min_by_key(|&(priority_sum, order, _)| (std::cmp::Reverse(priority_sum), order))
            {
                log::info!(
                    "found plaintext via [{}] with confidence {:.2}",
                    render_chain(&found.chain),
                    found.confidence
                );
                return Ok(self.report(
                    SearchOutcome::Found(found),
                    nodes,
                    expanded,
                    duplicates_suppressed,
                    frontier.high_water(),
                ));
            }
        };

        log::info!(
            "{}: {} nodes created, {} expanded",
            reason.as_str(),
            nodes.len(),
            expanded.len()
        );
        Ok(self.report(
            SearchOutcome::Exhausted {
                best_guess: best,
                reason,
            },
            nodes,
            expanded,
            duplicates_suppressed,
            frontier.high_water(),
        ))
    }

    fn past_deadline(&self, started: Instant) -> bool {
        self.policy
            .deadline
            .is_some_and(|limit| started.elapsed() >= limit)
    }

    /// Apply every applicable decoder (in catalog priority order) to one
    /// node's text, consulting the cache first. Safe to call from worker
    /// threads; checks the stop flag between decoders so cancellation is
    /// prompt.
    fn decode_applications(
        &self,
        text: &str,
        started: Instant,
        stop: &AtomicBool,
    ) -> Vec<RawChild> {
        let mut out = Vec::new();
        for descriptor in self.catalog.iter() {
            if stop.load(Ordering::Relaxed) {
                break;
            }
            if self.past_deadline(started) {
                stop.store(true, Ordering::Relaxed);
                break;
            }
            if !descriptor.decoder().can_apply(text) {
                continue;
            }
            let key = CacheKey::new(text, descriptor.identifier, &descriptor.params.digest());
            let outcome = if let Some(hit) = self.cache.get(&key) {
                hit
            } else {
                let computed = descriptor.decoder().decode(text, &descriptor.params);
                self.cache.put(key, computed.clone());
                computed
            };
            if !outcome.succeeded {
                continue;
            }
            for variant in outcome.variants {
                out.push(RawChild {
                    decoder: descriptor.identifier,
                    priority: descriptor.priority,
                    variant: variant.tag,
                    text: variant.text,
                });
            }
        }
        out
    }

    /// Judge one node with the checker set; ambiguity escalates to the
    /// confirmation port exactly once.
    fn judge_node(&self, id: NodeId, nodes: &[SearchNode], best: &mut Option<BestGuess>) -> NodeFate {
        let node = &nodes[id];
        match self.checkers.judge(&node.text) {
            Judgement::Accept {
                confidence,
                checker,
                reason,
            } => {
                log::debug!("accepted by {checker}: {reason}");
                NodeFate::Accepted(Found {
                    plaintext: node.text.clone(),
                    chain: chain_to(nodes, id),
                    confidence,
                    checker,
                })
            }
            Judgement::Ambiguous {
                confidence,
                checker,
                reason,
            } => {
                log::debug!("ambiguous per {checker} ({reason}), asking for confirmation");
                if self.checkers.confirm(&node.text, &reason) {
                    NodeFate::Accepted(Found {
                        plaintext: node.text.clone(),
                        chain: chain_to(nodes, id),
                        confidence,
                        checker,
                    })
                } else {
                    // A human "no" rejects this node as the answer; the
                    // node still expands and siblings are untouched.
                    let better = best.as_ref().map_or(true, |b| confidence > b.confidence);
                    if better {
                        *best = Some(BestGuess {
                            text: node.text.clone(),
                            chain: chain_to(nodes, id),
                            confidence,
                        });
                    }
                    NodeFate::Expandable
                }
            }
            Judgement::Reject { confidence } => {
                let better = best.as_ref().map_or(true, |b| confidence > b.confidence);
                if better {
                    *best = Some(BestGuess {
                        text: node.text.clone(),
                        chain: chain_to(nodes, id),
                        confidence,
                    });
                }
                NodeFate::Expandable
            }
        }
    }

    fn report(
        &self,
        outcome: SearchOutcome,
        nodes: Vec<SearchNode>,
        expanded: Vec<NodeId>,
        duplicates_suppressed: u64,
        frontier_high_water: u64,
    ) -> SearchReport {
        SearchReport {
            outcome,
            nodes,
            expanded,
            duplicates_suppressed,
            frontier_high_water,
            cache: self.cache.stats(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use peel_analysis::{CheckerSet, DenyAll, SetConfig};
    use peel_codecs::{
        DecodeOutcome, Decoder, DecoderCatalog, DecoderDescriptor, DecoderParams,
    };

    /// Stub decoder that prefixes its tag onto the text, so every
    /// application yields a fresh, distinct candidate.
    struct Prefixer {
        id: &'static str,
    }

    impl Decoder for Prefixer {
        fn identifier(&self) -> &'static str {
            self.id
        }
        fn can_apply(&self, _text: &str) -> bool {
            true
        }
        fn decode(&self, text: &str, _params: &DecoderParams) -> DecodeOutcome {
            DecodeOutcome::single(format!("{}|{text}", self.id))
        }
    }

    fn reject_everything() -> CheckerSet {
        CheckerSet::new(Vec::new(), Arc::new(DenyAll), SetConfig::default())
    }

    fn two_decoder_catalog(high: &'static str, low: &'static str) -> DecoderCatalog {
        DecoderCatalog::new(vec![
            DecoderDescriptor::new(Arc::new(Prefixer { id: high }), 90, DecoderParams::new()),
            DecoderDescriptor::new(Arc::new(Prefixer { id: low }), 10, DecoderParams::new()),
        ])
        .unwrap()
    }

    fn step_decoder(report: &SearchReport, id: NodeId) -> String {
        report.nodes[id]
            .step
            .as_ref()
            .map(|s| s.decoder.clone())
            .unwrap_or_default()
    }

    #[test]
    fn higher_priority_child_expands_first() {
        let catalog = two_decoder_catalog("hi", "lo");
        let checkers = reject_everything();
        let policy = SearchPolicy {
            max_depth: 2,
            max_nodes: 8,
            ..SearchPolicy::default()
        };
        let cache = DecodeCache::new();
        let report = SearchEngine::new(&catalog, &checkers, &policy, &cache)
            .run("seed")
            .unwrap();

        assert!(!report.outcome.is_found());
        assert_eq!(report.expanded[0], 0, "root expands first");
        assert_eq!(step_decoder(&report, report.expanded[1]), "hi");
        assert_eq!(step_decoder(&report, report.expanded[2]), "lo");
    }

    #[test]
    fn priority_override_flips_expansion_order() {
        let mut catalog = two_decoder_catalog("hi", "lo");
        catalog.override_priority("lo", 99).unwrap();
        let checkers = reject_everything();
        let policy = SearchPolicy {
            max_depth: 2,
            max_nodes: 8,
            ..SearchPolicy::default()
        };
        let cache = DecodeCache::new();
        let report = SearchEngine::new(&catalog, &checkers, &policy, &cache)
            .run("seed")
            .unwrap();

        assert_eq!(step_decoder(&report, report.expanded[1]), "lo");
    }

    #[test]
    fn node_budget_terminates_with_budget_reason() {
        let catalog = two_decoder_catalog("a", "b");
        let checkers = reject_everything();
        let policy = SearchPolicy {
            max_depth: 50,
            max_nodes: 6,
            ..SearchPolicy::default()
        };
        let cache = DecodeCache::new();
        let report = SearchEngine::new(&catalog, &checkers, &policy, &cache)
            .run("seed")
            .unwrap();

        match report.outcome {
            SearchOutcome::Exhausted { reason, .. } => {
                assert_eq!(reason, ExhaustReason::NodeBudget);
            }
            SearchOutcome::Found(_) => panic!("nothing should be found"),
        }
    }

    #[test]
    fn depth_equals_chain_length_for_every_node() {
        let catalog = two_decoder_catalog("x", "y");
        let checkers = reject_everything();
        let policy = SearchPolicy {
            max_depth: 3,
            max_nodes: 30,
            ..SearchPolicy::default()
        };
        let cache = DecodeCache::new();
        let report = SearchEngine::new(&catalog, &checkers, &policy, &cache)
            .run("seed")
            .unwrap();

        for node in &report.nodes {
            let chain = chain_to(&report.nodes, node.id);
            assert_eq!(chain.len() as u32, node.depth, "node {}", node.id);
        }
    }
}
