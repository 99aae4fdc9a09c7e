//! End-to-end decode scenarios against the built-in catalog and checkers.

use std::sync::Arc;

use peel_analysis::{default_checker_set, CheckerSet, ConfirmPort, DenyAll};
use peel_codecs::builtin_catalog;
use peel_search::{
    render_chain, DecodeCache, ExhaustReason, SearchEngine, SearchOutcome, SearchPolicy,
};

fn checkers() -> CheckerSet {
    default_checker_set(Arc::new(DenyAll))
}

fn run(input: &str) -> peel_search::SearchReport {
    run_with_policy(input, &SearchPolicy::default())
}

fn run_with_policy(input: &str, policy: &SearchPolicy) -> peel_search::SearchReport {
    let catalog = builtin_catalog(None);
    let set = checkers();
    let cache = DecodeCache::new();
    SearchEngine::new(&catalog, &set, policy, &cache)
        .run(input)
        .expect("default policy is valid")
}

fn found_chain(report: &peel_search::SearchReport) -> (String, String) {
    match &report.outcome {
        SearchOutcome::Found(found) => (found.plaintext.clone(), render_chain(&found.chain)),
        SearchOutcome::Exhausted { .. } => panic!("expected Found, got {:?}", report.outcome),
    }
}

#[test]
fn base64_single_layer() {
    let report = run("aGVsbG8gd29ybGQ=");
    let (plaintext, chain) = found_chain(&report);
    assert_eq!(plaintext, "hello world");
    assert_eq!(chain, "base64");
}

#[test]
fn url_encoded_chinese() {
    let report = run("%E4%BD%A0%E5%A5%BD");
    let (plaintext, chain) = found_chain(&report);
    assert_eq!(plaintext, "你好");
    assert_eq!(chain, "url");
}

#[test]
fn caesar_shift_three() {
    let report = run("khoor zruog");
    let (plaintext, chain) = found_chain(&report);
    assert_eq!(plaintext, "hello world");
    assert_eq!(chain, "caesar:shift=3");
}

#[test]
fn double_layer_base64_of_hex() {
    // base64("74657374") where 74657374 is hex("test").
    let report = run("NzQ2NTczNzQ=");
    let (plaintext, chain) = found_chain(&report);
    assert_eq!(plaintext, "test");
    assert_eq!(chain, "base64 -> hex");
    match &report.outcome {
        SearchOutcome::Found(found) => assert_eq!(found.chain.len(), 2),
        SearchOutcome::Exhausted { .. } => unreachable!(),
    }
}

#[test]
fn random_noise_exhausts_with_best_guess() {
    let policy = SearchPolicy {
        max_nodes: 400,
        ..SearchPolicy::default()
    };
    let report = run_with_policy("]]];;;[[[", &policy);
    match &report.outcome {
        SearchOutcome::Exhausted { best_guess, reason } => {
            assert!(matches!(
                reason,
                ExhaustReason::SpaceExhausted | ExhaustReason::NodeBudget
            ));
            assert!(best_guess.is_some(), "a best guess must be reported");
        }
        SearchOutcome::Found(found) => panic!("noise should not decode: {found:?}"),
    }
}

#[test]
fn plaintext_input_found_at_depth_zero() {
    let report = run("hello world");
    let (plaintext, chain) = found_chain(&report);
    assert_eq!(plaintext, "hello world");
    assert_eq!(chain, "", "no decoders applied");
    assert_eq!(report.expanded.len(), 0, "root must not be expanded");
}

#[test]
fn morse_input_decodes() {
    let report = run(".... . .-.. .-.. --- / .-- --- .-. .-.. -..");
    let (plaintext, chain) = found_chain(&report);
    assert_eq!(plaintext, "HELLO WORLD");
    assert_eq!(chain, "morse");
}

#[test]
fn pawnshop_hanzi_decode() {
    // 当铺 digit groups for "test attack dawn"; the script checker holds the
    // raw hanzi at ambiguous (DenyAll answers no), so the search continues
    // down to the pawnshop decode.
    let input = peel_codecs::codecs::cjk::Pawnshop::encode("test attack dawn");
    let report = run(&input);
    let (plaintext, chain) = found_chain(&report);
    assert_eq!(plaintext, "test attack dawn");
    assert_eq!(chain, "pawnshop");
}

#[test]
fn determinism_two_identical_runs() {
    let a = run("NzQ2NTczNzQ=");
    let b = run("NzQ2NTczNzQ=");
    assert_eq!(a.expanded, b.expanded, "expansion order must be identical");
    assert_eq!(a.nodes.len(), b.nodes.len());
    for (x, y) in a.nodes.iter().zip(b.nodes.iter()) {
        assert_eq!(x.text, y.text);
        assert_eq!(x.creation_order, y.creation_order);
    }
    assert_eq!(found_chain(&a), found_chain(&b));
}

#[test]
fn parallel_mode_reaches_the_same_outcome() {
    let sequential = run("NzQ2NTczNzQ=");
    let parallel = run_with_policy(
        "NzQ2NTczNzQ=",
        &SearchPolicy {
            parallel_workers: 4,
            ..SearchPolicy::default()
        },
    );
    assert_eq!(found_chain(&sequential), found_chain(&parallel));
}

#[test]
fn shared_cache_reuse_across_requests() {
    let catalog = builtin_catalog(None);
    let set = checkers();
    let policy = SearchPolicy::default();
    let cache = DecodeCache::new();

    let first = SearchEngine::new(&catalog, &set, &policy, &cache)
        .run("NzQ2NTczNzQ=")
        .unwrap();
    let hits_before = cache.stats().hits;
    let second = SearchEngine::new(&catalog, &set, &policy, &cache)
        .run("NzQ2NTczNzQ=")
        .unwrap();
    assert!(
        cache.stats().hits > hits_before,
        "second run must hit the shared cache"
    );
    assert_eq!(found_chain(&first), found_chain(&second));
}

struct AcceptAll;

impl ConfirmPort for AcceptAll {
    fn confirm(&self, _candidate: &str, _reason: &str) -> bool {
        true
    }
}

#[test]
fn human_confirmation_accepts_ambiguous_root() {
    // Bare pawnshop hanzi is held at ambiguous confidence; a human "yes"
    // makes it the answer with an empty chain.
    let catalog = builtin_catalog(None);
    let set = default_checker_set(Arc::new(AcceptAll));
    let policy = SearchPolicy::default();
    let cache = DecodeCache::new();
    let report = SearchEngine::new(&catalog, &set, &policy, &cache)
        .run("由口工 由口大")
        .unwrap();
    match report.outcome {
        SearchOutcome::Found(found) => {
            assert_eq!(found.plaintext, "由口工 由口大");
            assert!(found.chain.is_empty());
        }
        SearchOutcome::Exhausted { .. } => panic!("confirmation should accept the root"),
    }
}

#[test]
fn wordlist_enables_vigenere() {
    let wordlist = vec!["apple".to_string(), "lemon".to_string()];
    let catalog = builtin_catalog(Some(wordlist));
    let set = checkers();
    let policy = SearchPolicy::default();
    let cache = DecodeCache::new();
    // "hello world" under key "lemon".
    let report = SearchEngine::new(&catalog, &set, &policy, &cache)
        .run("sixzb hsdzq")
        .unwrap();
    let (plaintext, chain) = found_chain(&report);
    assert_eq!(plaintext, "hello world");
    assert_eq!(chain, "vigenere:key=lemon");
}
