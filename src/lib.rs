//! # pairwise
//!
//! A pairwise combinatorial test case generation engine.
//!
//! Given one set of candidate values per test parameter, the engine
//! produces a small list of test cases in which every pair of values from
//! any two distinct parameters occurs together at least once. The
//! construction approximates a strength-two covering array with a
//! randomized greedy search in the spirit of Bob Jenkins' "jenny" tool,
//! seeded from a fixed deterministic generator so that equal inputs always
//! produce equal case lists. Hosts rely on that stability to derive test
//! identifiers from the generated argument tuples.
//!
//! The layers, bottom up: a reproducible random source ([`FleaRand`]), the
//! feature and obligation model ([`tuples`]), the uncovered-obligation
//! index ([`UncoveredTuples`]), the greedy generator
//! ([`PairwiseGenerator`]), and the value-mapping strategies
//! ([`PairwiseStrategy`], [`CombinatorialStrategy`]) that hosts call with
//! concrete values.

pub mod coverage;
pub mod generator;
pub mod random;
pub mod strategy;
pub mod tuples;

pub use coverage::UncoveredTuples;
pub use generator::{
    verify_pairwise_coverage, CoverageError, GeneratorConfig, GeneratorStats, PairwiseGenerator,
};
pub use random::{FleaRand, RandomSource};
pub use strategy::{CombinatorialStrategy, CombiningStrategy, PairwiseStrategy, TestCaseData};
pub use tuples::{FeatureInfo, FeatureTuple, TestCase};
