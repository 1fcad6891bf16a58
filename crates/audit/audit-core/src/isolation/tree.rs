//! Single isolation tree stored as a node arena.

use rand::Rng;

/// Euler-Mascheroni constant, used to approximate harmonic numbers.
const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Average path length of an unsuccessful search in a binary search tree
/// of `n` points. Normalizes isolation depths.
pub fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Node {
    /// Values `< split` go left, the rest go right.
    Split { split: f64, left: usize, right: usize },
    /// Terminal node holding `size` training points.
    Leaf { size: usize },
}

/// Randomized binary partition tree over one feature.
#[derive(Debug, Clone)]
pub struct IsolationTree {
    nodes: Vec<Node>,
}

impl IsolationTree {
    /// Grow a tree over `sample` (reordered in place), stopping at `max_depth`.
    pub fn grow<R: Rng>(sample: &mut [f64], max_depth: usize, rng: &mut R) -> Self {
        let mut tree = Self {
            nodes: Vec::with_capacity(2 * sample.len()),
        };
        tree.grow_node(sample, 0, max_depth, rng);
        tree
    }

    fn grow_node<R: Rng>(
        &mut self,
        values: &mut [f64],
        depth: usize,
        max_depth: usize,
        rng: &mut R,
    ) -> usize {
        let id = self.nodes.len();
        self.nodes.push(Node::Leaf { size: values.len() });

        if depth >= max_depth || values.len() <= 1 {
            return id;
        }

        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        let Some(split) = draw_split(min, max, rng) else {
            return id;
        };

        let mid = partition(values, split);
        let (lower, upper) = values.split_at_mut(mid);
        let left = self.grow_node(lower, depth + 1, max_depth, rng);
        let right = self.grow_node(upper, depth + 1, max_depth, rng);
        self.nodes[id] = Node::Split { split, left, right };
        id
    }

    /// Number of edges from the root to the leaf `value` falls into, plus the
    /// expected remaining depth of that leaf's unresolved points.
    pub fn path_length(&self, value: f64) -> f64 {
        let mut id = 0;
        let mut depth = 0.0;
        loop {
            match self.nodes[id] {
                Node::Split { split, left, right } => {
                    id = if value < split { left } else { right };
                    depth += 1.0;
                }
                Node::Leaf { size } => return depth + average_path_length(size),
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Longest root-to-leaf edge count.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(0usize, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            match self.nodes[id] {
                Node::Split { left, right, .. } => {
                    stack.push((left, depth + 1));
                    stack.push((right, depth + 1));
                }
                Node::Leaf { .. } => deepest = deepest.max(depth),
            }
        }
        deepest
    }
}

/// Uniform threshold strictly inside `(min, max)`, or `None` when the range
/// has no interior.
fn draw_split<R: Rng>(min: f64, max: f64, rng: &mut R) -> Option<f64> {
    if !(max > min) {
        return None;
    }
    // Weighted form stays finite when `max - min` would overflow.
    let r = rng.gen::<f64>();
    let split = min * (1.0 - r) + max * r;
    if split > min && split < max {
        return Some(split);
    }
    let mid = min / 2.0 + max / 2.0;
    (mid > min && mid < max).then_some(mid)
}

/// Move values `< split` to the front; returns how many there are.
fn partition(values: &mut [f64], split: f64) -> usize {
    let mut mid = 0;
    for i in 0..values.len() {
        if values[i] < split {
            values.swap(i, mid);
            mid += 1;
        }
    }
    mid
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_average_path_length() {
        assert_eq!(average_path_length(0), 0.0);
        assert_eq!(average_path_length(1), 0.0);
        assert_eq!(average_path_length(2), 1.0);
        // 2 * (ln 255 + gamma) - 2 * 255 / 256
        let c256 = average_path_length(256);
        assert!((c256 - 10.244_770_920_116_851).abs() < 1e-9);
        assert!(average_path_length(100) > average_path_length(10));
    }

    #[test]
    fn test_partition() {
        let mut values = vec![5.0, 1.0, 7.0, 2.0, 9.0];
        let mid = partition(&mut values, 4.0);
        assert_eq!(mid, 2);
        assert!(values[..mid].iter().all(|&v| v < 4.0));
        assert!(values[mid..].iter().all(|&v| v >= 4.0));
    }

    #[test]
    fn test_draw_split_stays_inside_range() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..1000 {
            let split = draw_split(3.0, 3.5, &mut rng).unwrap();
            assert!(split > 3.0 && split < 3.5);
        }
        assert!(draw_split(2.0, 2.0, &mut rng).is_none());
        assert!(draw_split(f64::NAN, 1.0, &mut rng).is_none());
    }

    #[test]
    fn test_draw_split_spans_full_f64_range() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1000 {
            let split = draw_split(-f64::MAX, f64::MAX, &mut rng).unwrap();
            assert!(split.is_finite());
            assert!(split > -f64::MAX && split < f64::MAX);
        }
    }

    #[test]
    fn test_tree_splits_extreme_magnitudes() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut sample = vec![-f64::MAX, -1.0, 0.0, 1.0, 2.0, f64::MAX];
        let tree = IsolationTree::grow(&mut sample, 3, &mut rng);
        assert!(tree.node_count() > 1);
        assert!(tree.path_length(f64::MAX).is_finite());
    }

    #[test]
    fn test_tree_respects_max_depth() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut sample: Vec<f64> = (0..64).map(|i| i as f64).collect();
        let tree = IsolationTree::grow(&mut sample, 6, &mut rng);
        assert!(tree.depth() <= 6);
        assert!(tree.node_count() >= 3);
    }

    #[test]
    fn test_identical_values_make_single_leaf() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut sample = vec![4.0; 16];
        let tree = IsolationTree::grow(&mut sample, 4, &mut rng);
        assert_eq!(tree.node_count(), 1);
        assert!((tree.path_length(4.0) - average_path_length(16)).abs() < 1e-12);
    }

    #[test]
    fn test_extreme_value_isolated_quickly() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut sample = vec![10.0, 11.0, 9.0, 10.5, 12.0, 11.5, 9.5, 10000.0];
        let tree = IsolationTree::grow(&mut sample, 3, &mut rng);
        assert!(tree.path_length(10000.0) <= tree.path_length(10.5));
    }
}
