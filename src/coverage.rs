// Uncovered-tuple bookkeeping for the pairwise generator.
//
// Tuples live in a bucket table indexed by dimension and then feature, one
// bucket per feature holding every still-uncovered obligation that feature
// participates in. A pair tuple is filed under both of its features, so
// scoring a candidate's choice at one dimension touches a single bucket
// instead of the whole tuple population. The duplication is intentional and
// removal keeps both copies in step.

use crate::tuples::{FeatureInfo, FeatureTuple, TestCase};

/// The obligations not yet satisfied by any accepted test case.
///
/// Built once per generation run and consumed by removal only; when the
/// last bucket empties, the run is complete.
#[derive(Debug, Clone)]
pub struct UncoveredTuples {
    buckets: Vec<Vec<Vec<FeatureTuple>>>,
}

impl UncoveredTuples {
    /// Build the full obligation set for the given dimension sizes: one
    /// singleton per feature, plus one pair for every combination of two
    /// features from two distinct dimensions.
    pub fn build(dimensions: &[usize]) -> UncoveredTuples {
        let mut buckets = Vec::with_capacity(dimensions.len());

        for (d, &size) in dimensions.iter().enumerate() {
            let mut per_feature = Vec::with_capacity(size);
            for f in 0..size {
                per_feature.push(feature_bucket(dimensions, d, f));
            }
            buckets.push(per_feature);
        }

        UncoveredTuples { buckets }
    }

    /// Pop the first remaining obligation, scanning buckets in ascending
    /// dimension and feature order. `None` means every obligation has been
    /// met and generation can stop.
    ///
    /// Only the scanned bucket is touched here; the twin copy of a pair
    /// tuple stays where it is until `remove_covered` runs for the test
    /// case that satisfied it.
    pub fn next_tuple(&mut self) -> Option<FeatureTuple> {
        for per_feature in &mut self.buckets {
            for bucket in per_feature {
                if !bucket.is_empty() {
                    return Some(bucket.remove(0));
                }
            }
        }

        None
    }

    /// How many obligations in the bucket for `(dimension, feature)` the
    /// candidate satisfies as currently configured. Pure scoring, no
    /// mutation.
    pub fn covered_count(&self, case: &TestCase, dimension: usize, feature: usize) -> usize {
        self.buckets[dimension][feature]
            .iter()
            .filter(|tuple| case.covers(tuple))
            .count()
    }

    /// Drop every obligation the accepted case satisfies from every bucket
    /// it was filed under.
    pub fn remove_covered(&mut self, case: &TestCase) {
        for per_feature in &mut self.buckets {
            for bucket in per_feature {
                bucket.retain(|tuple| !case.covers(tuple));
            }
        }
    }

    /// Total bucket entries remaining. Pair tuples are filed twice, so this
    /// counts each of them twice; it still bounds the number of generation
    /// rounds left.
    pub fn len(&self) -> usize {
        self.buckets
            .iter()
            .flat_map(|per_feature| per_feature.iter())
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn feature_bucket(dimensions: &[usize], dimension: usize, feature: usize) -> Vec<FeatureTuple> {
    let anchor = FeatureInfo::new(dimension, feature);
    let mut bucket = vec![FeatureTuple::single(anchor)];

    for (d, &size) in dimensions.iter().enumerate() {
        if d == dimension {
            continue;
        }
        for f in 0..size {
            bucket.push(FeatureTuple::pair(anchor, FeatureInfo::new(d, f)));
        }
    }

    bucket
}
