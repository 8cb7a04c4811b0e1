#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Grammar-driven code completion.
//!
//! Given a token stream and a caret position, walks the grammar's ATN over
//! the tokens typed so far and reports which tokens may come next and which
//! "preferred" rules the caret sits in.
//!
//! ```ignore
//! let recognizer = GrammarRecognizer::from_text(GRAMMAR)?;
//! let mut stream = recognizer.tokenize("x = ")?;
//! let mut core = CodeCompletionCore::builder(&recognizer)
//!     .preferred_rules([recognizer.rule_index("expr").unwrap()])
//!     .build()?;
//! let candidates = core.collect_candidates(&mut stream, 2, None)?;
//! ```

pub mod engine;

pub use engine::{
    AlwaysTrue, CancellationToken, CandidatesCollection, CodeCompletionCore, CollectStats,
    CompletionBuilder, CompletionError, FollowSetCache, FollowSetWithPath, FollowSetsHolder,
    Limits, NoopTracer, PredicateContext, PredicateError, PredicateEvaluator, PrintTracer,
    RuleContext, RulePreference, TokenWindow, Tracer, Verbosity,
};
