//! The Soft Robinson-Foulds Distance: for every non-trivial leaf
//! subset, test whether it is a soft cluster of each of two networks over
//! the same leaf set; the distance is the number of subsets where the two
//! networks disagree, halved — mirroring the standard unrooted
//! Robinson-Foulds convention of counting each differing bipartition once
//! rather than once per complementary subset.

use crate::ccp;
use crate::components::{build_components, ComponentSet};
use crate::error::{PhyloError, Result};
use crate::model::{LeafSet, Network};
use crate::options::{CcpOptions, SrfdOptions};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Compute the soft Robinson-Foulds distance between `a` and `b`.
///
/// Both networks must share the same sorted leaf label set — labels are
/// matched by name, not by index, since the two networks were built
/// independently and may intern labels in different orders.
pub fn distance(a: &Network, b: &Network, options: &SrfdOptions) -> Result<f64> {
    if a.leaf_labels() != b.leaf_labels() {
        return Err(PhyloError::LeafSetMismatch);
    }
    let n = a.leaf_count();
    if n < 2 {
        return Ok(0.0);
    }

    let components_a = build_components(a)?;
    let components_b = build_components(b)?;

    let subsets: Vec<Vec<usize>> = nontrivial_subsets(n).collect();

    let disagreements: u64 = if options.parallel {
        count_parallel(a, &components_a, b, &components_b, &subsets, n)?
    } else {
        count_sequential(a, &components_a, b, &components_b, &subsets, n)?
    };

    Ok(disagreements as f64 / 2.0)
}

fn disagrees(a: &Network, components_a: &ComponentSet, b: &Network, components_b: &ComponentSet, members: &[usize], n: usize) -> Result<bool> {
    let leaf_set = LeafSet::from_indices(n, members.iter().copied());
    let opts = CcpOptions::default();
    let in_a = ccp::contains_with(a, components_a, &leaf_set, &opts).map(|o| o.is_cluster())?;
    let in_b = ccp::contains_with(b, components_b, &leaf_set, &opts).map(|o| o.is_cluster())?;
    Ok(in_a != in_b)
}

#[cfg(feature = "parallel")]
fn count_parallel(a: &Network, components_a: &ComponentSet, b: &Network, components_b: &ComponentSet, subsets: &[Vec<usize>], n: usize) -> Result<u64> {
    subsets
        .par_iter()
        .map(|members| disagrees(a, components_a, b, components_b, members, n))
        .try_fold(|| 0u64, |acc, result| result.map(|d| acc + d as u64))
        .try_reduce(|| 0u64, |a, b| Ok(a + b))
}

#[cfg(not(feature = "parallel"))]
fn count_parallel(a: &Network, components_a: &ComponentSet, b: &Network, components_b: &ComponentSet, subsets: &[Vec<usize>], n: usize) -> Result<u64> {
    count_sequential(a, components_a, b, components_b, subsets, n)
}

fn count_sequential(a: &Network, components_a: &ComponentSet, b: &Network, components_b: &ComponentSet, subsets: &[Vec<usize>], n: usize) -> Result<u64> {
    let mut count = 0u64;
    for members in subsets {
        if disagrees(a, components_a, b, components_b, members, n)? {
            count += 1;
        }
    }
    Ok(count)
}

/// Every subset of `0..n` except the empty set and the full set, in
/// lexicographic order within each size class, sizes `1..n`.
fn nontrivial_subsets(n: usize) -> impl Iterator<Item = Vec<usize>> {
    (1..n).flat_map(move |k| Combinations::new(n, k))
}

/// Lexicographic k-combinations of `0..n`, generated in place by advancing
/// the rightmost index that has room to grow and resetting everything to
/// its right.
struct Combinations {
    n: usize,
    k: usize,
    current: Option<Vec<usize>>,
    started: bool,
}

impl Combinations {
    fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            k,
            current: if k <= n { Some((0..k).collect()) } else { None },
            started: false,
        }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        let c = self.current.as_mut()?;
        if !self.started {
            self.started = true;
            return Some(c.clone());
        }
        if self.k == 0 {
            self.current = None;
            return None;
        }

        let mut i = self.k;
        loop {
            if i == 0 {
                self.current = None;
                return None;
            }
            i -= 1;
            if c[i] != i + self.n - self.k {
                break;
            }
        }
        c[i] += 1;
        for j in (i + 1)..self.k {
            c[j] = c[j - 1] + 1;
        }
        Some(c.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combinations_enumerate_all_k_subsets_of_four_choose_two() {
        let got: Vec<Vec<usize>> = Combinations::new(4, 2).collect();
        assert_eq!(
            got,
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![0, 3],
                vec![1, 2],
                vec![1, 3],
                vec![2, 3],
            ]
        );
    }

    #[test]
    fn nontrivial_subsets_excludes_empty_and_full() {
        let all: Vec<Vec<usize>> = nontrivial_subsets(3).collect();
        assert_eq!(all.len(), (1usize << 3) - 2);
        assert!(!all.iter().any(|s| s.is_empty() || s.len() == 3));
    }

    #[test]
    fn identical_networks_have_zero_distance() {
        use crate::model::NetworkBuilder;
        let edges = vec![
            ("r".to_string(), "a".to_string()),
            ("r".to_string(), "b".to_string()),
            ("a".to_string(), "leaf1".to_string()),
            ("a".to_string(), "leaf2".to_string()),
            ("b".to_string(), "leaf3".to_string()),
        ];
        let net = NetworkBuilder::from_edges(&edges).unwrap();
        let d = distance(&net, &net, &SrfdOptions { parallel: false }).unwrap();
        assert_eq!(d, 0.0);
    }
}
