// Combining strategies over concrete parameter values.
//
// A combining strategy turns a list of per-parameter value sets into test
// cases, each carrying one argument per parameter. PairwiseStrategy is the
// interesting one; CombinatorialStrategy is the exhaustive cross product it
// is measured against.

use crate::generator::{CoverageError, GeneratorConfig, PairwiseGenerator};

/// The arguments of one generated test case, one value per parameter in
/// declaration order. Hosts typically feed these straight into a
/// parameterized test invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCaseData<T> {
    pub arguments: Vec<T>,
}

/// Turns per-parameter value sets into a list of test cases.
///
/// Values are identified purely by their position in the source list and
/// are never compared to each other, so duplicated values within one
/// parameter's set are treated as distinct.
pub trait CombiningStrategy<T: Clone> {
    /// Combine the materialized value sets. An empty parameter list, or
    /// any parameter with no values at all, produces zero test cases.
    fn test_cases(&self, sources: &[Vec<T>]) -> Result<Vec<TestCaseData<T>>, CoverageError>;
}

/// Generates test cases so that every pair of values from any two distinct
/// parameters appears together in at least one case.
///
/// Covering all pairs takes far fewer cases than covering all
/// combinations, and most failures involve the interaction of at most two
/// parameters, which makes this a practical stand-in for the exhaustive
/// product when that product is too large to run.
#[derive(Debug, Clone, Default)]
pub struct PairwiseStrategy {
    config: GeneratorConfig,
}

impl PairwiseStrategy {
    pub fn new() -> PairwiseStrategy {
        PairwiseStrategy::default()
    }

    /// A strategy with a custom generator configuration. The default keeps
    /// the fixed seed, and with it byte-identical output for identical
    /// inputs across runs.
    pub fn with_config(config: GeneratorConfig) -> PairwiseStrategy {
        PairwiseStrategy { config }
    }

    /// Materialize arbitrary value sources and combine them. Enumeration
    /// order is preserved and defines the value-to-feature mapping, so two
    /// calls over equal sources yield equal case lists.
    pub fn test_cases_from<T, S, V>(&self, sources: S) -> Result<Vec<TestCaseData<T>>, CoverageError>
    where
        T: Clone,
        S: IntoIterator<Item = V>,
        V: IntoIterator<Item = T>,
    {
        let materialized: Vec<Vec<T>> = sources
            .into_iter()
            .map(|source| source.into_iter().collect())
            .collect();

        self.test_cases(&materialized)
    }
}

impl<T: Clone> CombiningStrategy<T> for PairwiseStrategy {
    fn test_cases(&self, sources: &[Vec<T>]) -> Result<Vec<TestCaseData<T>>, CoverageError> {
        if sources.is_empty() || sources.iter().any(Vec::is_empty) {
            // An empty value set makes no pairing possible to satisfy.
            return Ok(Vec::new());
        }

        let dimensions: Vec<usize> = sources.iter().map(Vec::len).collect();

        let mut generator = PairwiseGenerator::new(self.config.clone());
        let cases = generator.generate(&dimensions)?;

        Ok(cases
            .into_iter()
            .map(|case| TestCaseData {
                arguments: case
                    .features
                    .iter()
                    .enumerate()
                    .map(|(d, &f)| sources[d][f].clone())
                    .collect(),
            })
            .collect())
    }
}

/// The exhaustive cross product of the value sets, last parameter varying
/// fastest. Mostly useful as the oracle pairwise output is bounded by, and
/// for parameter sets small enough to run in full.
#[derive(Debug, Clone, Copy, Default)]
pub struct CombinatorialStrategy;

impl CombinatorialStrategy {
    pub fn new() -> CombinatorialStrategy {
        CombinatorialStrategy
    }
}

impl<T: Clone> CombiningStrategy<T> for CombinatorialStrategy {
    fn test_cases(&self, sources: &[Vec<T>]) -> Result<Vec<TestCaseData<T>>, CoverageError> {
        if sources.is_empty() || sources.iter().any(Vec::is_empty) {
            return Ok(Vec::new());
        }

        let mut cases = Vec::new();
        let mut indices = vec![0usize; sources.len()];

        loop {
            cases.push(TestCaseData {
                arguments: indices
                    .iter()
                    .enumerate()
                    .map(|(d, &f)| sources[d][f].clone())
                    .collect(),
            });

            // Odometer increment, rightmost position first.
            let mut d = sources.len();
            loop {
                if d == 0 {
                    return Ok(cases);
                }
                d -= 1;
                indices[d] += 1;
                if indices[d] < sources[d].len() {
                    break;
                }
                indices[d] = 0;
            }
        }
    }
}
