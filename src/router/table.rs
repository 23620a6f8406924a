//! Hop-bounded best-rate table.
//!
//! `levels[h][i]` is the best amount of asset `i` reachable from one unit of the
//! source using at most `h` conversions. Each level relaxes every viable edge from the
//! previous level, then carries forward any cell the previous level already beat, so
//! values never decrease with `h`.
//!
//! The predecessor map of a level only holds cells whose value was produced by a
//! conversion *at that level*. A cell without an entry was carried from the level
//! below, which is what path reconstruction relies on.

use crate::graph::AssetIndex;
use num_rational::BigRational;
use num_traits::{One, Zero};
use std::collections::HashMap;

/// A viable directed conversion with its marginal rate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub from: AssetIndex,
    pub to: AssetIndex,
    pub rate: BigRational,
}

/// The filled DP table of one search.
#[derive(Debug, Clone)]
pub struct HopTable {
    levels: Vec<Vec<BigRational>>,
    predecessors: Vec<HashMap<AssetIndex, AssetIndex>>,
    destination: AssetIndex,
    /// Level at which the destination last strictly improved; 0 while unreached
    best_level: usize,
}

impl HopTable {
    /// Run the search over `asset_count` assets.
    ///
    /// `edges` are relaxed in the order given; on equal candidates the earlier edge
    /// keeps the cell. Levels are computed until `max_hops`, or until the destination
    /// stops improving once reached, or until a level changes nothing while the
    /// destination is still unreached.
    pub fn solve(
        asset_count: usize,
        source: AssetIndex,
        destination: AssetIndex,
        max_hops: usize,
        edges: &[Edge],
    ) -> Self {
        let mut start = vec![BigRational::zero(); asset_count];
        start[source] = BigRational::one();

        let mut table = Self {
            levels: vec![start],
            predecessors: vec![HashMap::new()],
            destination,
            best_level: 0,
        };
        let mut best = table.levels[0][destination].clone();

        for hop in 1..=max_hops {
            let previous = &table.levels[hop - 1];
            let mut current = vec![BigRational::zero(); asset_count];
            let mut predecessor = HashMap::new();

            for edge in edges {
                let amount_in = &previous[edge.from];
                if amount_in.is_zero() {
                    continue;
                }
                let candidate = amount_in * &edge.rate;
                if candidate > current[edge.to] {
                    current[edge.to] = candidate;
                    predecessor.insert(edge.to, edge.from);
                }
            }

            // Carry forward anything a shorter route already does better
            for (index, carried) in previous.iter().enumerate() {
                if *carried > current[index] {
                    current[index] = carried.clone();
                    predecessor.remove(&index);
                }
            }

            let changed = current != *previous;
            let reached = current[destination].clone();

            tracing::trace!(
                hop,
                converted_cells = predecessor.len(),
                destination_reached = !reached.is_zero(),
                "DP level computed"
            );

            table.levels.push(current);
            table.predecessors.push(predecessor);

            if reached > best {
                best = reached;
                table.best_level = hop;
                continue;
            }
            if best.is_zero() && changed {
                continue;
            }
            break;
        }

        table
    }

    /// Number of levels computed, level 0 included
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Level holding the best destination value
    pub fn best_level(&self) -> usize {
        self.best_level
    }

    /// Value of `index` at `level`
    pub fn value(&self, level: usize, index: AssetIndex) -> Option<&BigRational> {
        self.levels.get(level).and_then(|row| row.get(index))
    }

    /// Best destination value and the asset indices leading to it.
    ///
    /// Returns `None` when the destination was never reached.
    pub fn best_route(&self) -> Option<(BigRational, Vec<AssetIndex>)> {
        let rate = self.levels[self.best_level][self.destination].clone();
        if rate.is_zero() {
            return None;
        }
        Some((rate, self.reconstruct()))
    }

    /// Walk predecessors from the destination back down to level 0.
    fn reconstruct(&self) -> Vec<AssetIndex> {
        let mut path = Vec::with_capacity(self.best_level + 1);
        let mut current = self.destination;

        for level in (1..=self.best_level).rev() {
            if let Some(&previous) = self.predecessors[level].get(&current) {
                path.push(current);
                current = previous;
            }
        }
        path.push(current);
        path.reverse();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    fn rate(numer: i64, denom: i64) -> BigRational {
        BigRational::new(BigInt::from(numer), BigInt::from(denom))
    }

    fn edge(from: AssetIndex, to: AssetIndex, r: BigRational) -> Edge {
        Edge { from, to, rate: r }
    }

    /// Both directions of a pool with marginal rate `r` from `a` to `b`
    fn pool(a: AssetIndex, b: AssetIndex, r: BigRational) -> [Edge; 2] {
        let inverse = r.recip();
        [edge(a, b, r), edge(b, a, inverse)]
    }

    #[test]
    fn test_two_hop_route_without_direct_pool() {
        // 0 -> 1 at 2, 1 -> 2 at 1/2, no pool between 0 and 2
        let edges: Vec<Edge> = [pool(0, 1, rate(2, 1)), pool(1, 2, rate(1, 2))].concat();

        let table = HopTable::solve(3, 0, 2, 2, &edges);
        let (value, path) = table.best_route().unwrap();
        assert_eq!(value, rate(1, 1));
        assert_eq!(path, vec![0, 1, 2]);
        assert_eq!(table.best_level(), 2);
    }

    #[test]
    fn test_direct_route_stops_early() {
        let edges: Vec<Edge> = [pool(0, 1, rate(3, 1)), pool(1, 2, rate(1, 1))].concat();

        let table = HopTable::solve(3, 0, 1, 5, &edges);
        let (value, path) = table.best_route().unwrap();
        assert_eq!(value, rate(3, 1));
        assert_eq!(path, vec![0, 1]);
        // Level 2 did not improve the destination, so nothing beyond it was computed
        assert_eq!(table.depth(), 3);
    }

    #[test]
    fn test_longer_route_beats_direct_pool() {
        let edges: Vec<Edge> = [
            pool(0, 2, rate(1, 1)),
            pool(0, 1, rate(2, 1)),
            pool(1, 2, rate(1, 1)),
        ]
        .concat();

        let direct = HopTable::solve(3, 0, 2, 1, &edges);
        assert_eq!(direct.best_route().unwrap(), (rate(1, 1), vec![0, 2]));

        let routed = HopTable::solve(3, 0, 2, 2, &edges);
        assert_eq!(routed.best_route().unwrap(), (rate(2, 1), vec![0, 1, 2]));
    }

    #[test]
    fn test_carried_value_drops_stale_predecessor() {
        // At level 2 the lossy 1 -> 0 edge offers 1/2 for the source, which is
        // recorded and then beaten by the carried value of 1.
        let edges = vec![edge(0, 1, rate(2, 1)), edge(1, 0, rate(1, 4))];

        let table = HopTable::solve(3, 0, 2, 2, &edges);
        assert_eq!(table.value(2, 0), Some(&rate(1, 1)));
        assert!(!table.predecessors[2].contains_key(&0));
        assert!(table.best_route().is_none());
    }

    #[test]
    fn test_three_conversion_route_beats_two() {
        // Level 2 reaches 3 via 1 at 2; level 3 improves it via 4 and 5 at 3.
        let edges: Vec<Edge> = [
            pool(0, 1, rate(2, 1)),
            pool(1, 3, rate(1, 1)),
            pool(0, 4, rate(1, 1)),
            pool(4, 5, rate(1, 1)),
            pool(5, 3, rate(3, 1)),
        ]
        .concat();

        let table = HopTable::solve(6, 0, 3, 3, &edges);
        let (value, path) = table.best_route().unwrap();
        assert_eq!(value, rate(3, 1));
        assert_eq!(path, vec![0, 4, 5, 3]);
    }

    #[test]
    fn test_unreachable_destination() {
        let edges: Vec<Edge> = pool(0, 1, rate(1, 1)).to_vec();

        let table = HopTable::solve(3, 0, 2, 5, &edges);
        assert!(table.best_route().is_none());
        // Level 2 changed nothing, so the search stopped there
        assert!(table.depth() <= 3);
    }

    #[test]
    fn test_values_never_decrease_across_levels() {
        let edges: Vec<Edge> = [
            pool(0, 1, rate(2, 1)),
            pool(1, 2, rate(3, 2)),
            pool(2, 3, rate(1, 3)),
            pool(0, 3, rate(1, 1)),
        ]
        .concat();

        let table = HopTable::solve(4, 0, 3, 5, &edges);
        for level in 1..table.depth() {
            for index in 0..4 {
                assert!(table.value(level, index).unwrap() >= table.value(level - 1, index).unwrap());
            }
        }
    }

    #[test]
    fn test_more_hops_never_worse() {
        let edges: Vec<Edge> = [
            pool(0, 1, rate(5, 4)),
            pool(1, 2, rate(5, 4)),
            pool(2, 3, rate(5, 4)),
            pool(3, 4, rate(5, 4)),
            pool(0, 4, rate(2, 1)),
        ]
        .concat();

        let mut previous = BigRational::zero();
        for max_hops in 1..=5 {
            let (value, path) = HopTable::solve(5, 0, 4, max_hops, &edges).best_route().unwrap();
            assert!(value >= previous);
            assert_eq!(path.first(), Some(&0));
            assert_eq!(path.last(), Some(&4));
            previous = value;
        }
    }
}
