//! Peel analysis: judges whether a candidate string is plausibly plaintext.
//!
//! Checkers are pure scoring functions over text — no I/O, no shared state.
//! The one deliberately impure capability, human confirmation, is modeled
//! as an injected port ([`ConfirmPort`]) so the search engine stays free of
//! terminal concerns.
//!
//! Thresholds are calibration data, not constants: every checker exposes
//! its accept/ambiguity bounds through a config struct with measured
//! defaults.

#![forbid(unsafe_code)]

pub mod checker;
pub mod dictionary;
pub mod human;
pub mod quadgram;
pub mod script;
pub mod set;
pub mod verdict;

pub use checker::Checker;
pub use dictionary::{DictionaryChecker, DictionaryConfig};
pub use human::{ConfirmPort, DenyAll};
pub use quadgram::{QuadgramChecker, QuadgramConfig};
pub use script::{ScriptChecker, ScriptConfig};
pub use set::{default_checker_set, CheckerSet, Judgement, SetConfig};
pub use verdict::Verdict;
