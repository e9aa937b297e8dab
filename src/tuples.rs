// Features, coverage tuples, and test cases.
//
// Terminology follows the combinatorial testing literature. A dimension is
// one test parameter; a feature is one value of one dimension. A tuple is
// an obligation that some generated test case sets all of its features at
// the same time.

/// One specific value of one specific test parameter, identified by the
/// parameter's position and the value's position within that parameter's
/// value list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureInfo {
    pub dimension: usize,
    pub feature: usize,
}

impl FeatureInfo {
    pub fn new(dimension: usize, feature: usize) -> FeatureInfo {
        FeatureInfo { dimension, feature }
    }
}

/// A coverage obligation over a single feature or a pair of features from
/// two different dimensions.
///
/// Pairwise generation only ever creates singletons and pairs. The covering
/// machinery itself does not care about the width, so triples and beyond
/// would slot in without changes to `TestCase::covers`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureTuple {
    Single(FeatureInfo),
    Pair(FeatureInfo, FeatureInfo),
}

impl FeatureTuple {
    pub fn single(feature: FeatureInfo) -> FeatureTuple {
        FeatureTuple::Single(feature)
    }

    /// A pair obligation. Both features must come from different
    /// dimensions; the generator never builds a same-dimension pair, so
    /// this is asserted rather than surfaced as an error.
    pub fn pair(first: FeatureInfo, second: FeatureInfo) -> FeatureTuple {
        debug_assert!(
            first.dimension != second.dimension,
            "pair tuple must span two dimensions"
        );
        FeatureTuple::Pair(first, second)
    }

    pub fn len(&self) -> usize {
        match self {
            FeatureTuple::Single(_) => 1,
            FeatureTuple::Pair(_, _) => 2,
        }
    }

    /// The features this obligation binds, in construction order.
    pub fn features(&self) -> impl Iterator<Item = FeatureInfo> {
        let (first, rest) = match *self {
            FeatureTuple::Single(a) => (a, None),
            FeatureTuple::Pair(a, b) => (a, Some(b)),
        };
        std::iter::once(first).chain(rest)
    }
}

/// A single test case: one chosen feature index per dimension.
///
/// Mutable while the generator is shaping a candidate; once accepted into
/// the result set it is never touched again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub features: Vec<usize>,
}

impl TestCase {
    pub fn new(dimensions: usize) -> TestCase {
        TestCase {
            features: vec![0; dimensions],
        }
    }

    /// True when this case sets every feature the tuple asks for.
    pub fn covers(&self, tuple: &FeatureTuple) -> bool {
        tuple
            .features()
            .all(|f| self.features[f.dimension] == f.feature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singleton_coverage_checks_one_slot() {
        let mut case = TestCase::new(3);
        case.features = vec![2, 0, 1];

        assert!(case.covers(&FeatureTuple::single(FeatureInfo::new(0, 2))));
        assert!(!case.covers(&FeatureTuple::single(FeatureInfo::new(0, 1))));
        assert!(case.covers(&FeatureTuple::single(FeatureInfo::new(2, 1))));
    }

    #[test]
    fn pair_coverage_needs_both_slots() {
        let mut case = TestCase::new(3);
        case.features = vec![2, 0, 1];

        let covered = FeatureTuple::pair(FeatureInfo::new(0, 2), FeatureInfo::new(2, 1));
        assert!(case.covers(&covered));

        let half_covered = FeatureTuple::pair(FeatureInfo::new(0, 2), FeatureInfo::new(2, 0));
        assert!(!case.covers(&half_covered));
    }

    #[test]
    fn tuple_lengths() {
        let single = FeatureTuple::single(FeatureInfo::new(0, 0));
        let pair = FeatureTuple::pair(FeatureInfo::new(0, 0), FeatureInfo::new(1, 0));

        assert_eq!(single.len(), 1);
        assert_eq!(pair.len(), 2);
        assert_eq!(single.features().count(), 1);
        assert_eq!(pair.features().count(), 2);
    }

    #[test]
    #[should_panic(expected = "pair tuple must span two dimensions")]
    fn same_dimension_pair_is_rejected() {
        FeatureTuple::pair(FeatureInfo::new(1, 0), FeatureInfo::new(1, 1));
    }
}
