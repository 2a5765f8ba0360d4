//! Union-find over dense cell indices, used by Kruskal's algorithm to tell whether carving a
//! wall would join two separate passage trees or close a loop.

#[derive(Debug, Clone)]
pub struct DisjointSet {
    parents: Vec<usize>,
    ranks: Vec<u8>,
    sets_count: usize,
}

impl DisjointSet {
    /// `elements_count` singleton sets, `0..elements_count`.
    pub fn new(elements_count: usize) -> DisjointSet {
        DisjointSet {
            parents: (0..elements_count).collect(),
            ranks: vec![0; elements_count],
            sets_count: elements_count,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Number of disjoint sets remaining.
    #[inline]
    pub fn sets_count(&self) -> usize {
        self.sets_count
    }

    /// Representative of the set containing `element`.
    ///
    /// Path halving: every visited node is pointed at its grandparent, iteratively, so deep
    /// chains never recurse.
    ///
    /// Panics if `element` is out of range.
    pub fn find(&mut self, element: usize) -> usize {
        let mut current = element;
        while self.parents[current] != current {
            let grandparent = self.parents[self.parents[current]];
            self.parents[current] = grandparent;
            current = grandparent;
        }
        current
    }

    /// Merge the sets containing `a` and `b`, union by rank.
    /// Returns false, changing nothing, if they were already in the same set.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let (root_a, root_b) = (self.find(a), self.find(b));
        if root_a == root_b {
            return false;
        }

        let (rank_a, rank_b) = (self.ranks[root_a], self.ranks[root_b]);
        if rank_a < rank_b {
            self.parents[root_a] = root_b;
        } else if rank_a > rank_b {
            self.parents[root_b] = root_a;
        } else {
            self.parents[root_b] = root_a;
            self.ranks[root_a] = rank_a.saturating_add(1);
        }
        self.sets_count -= 1;
        true
    }

    pub fn same_set(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::quickcheck;

    #[test]
    fn singletons() {
        let mut sets = DisjointSet::new(5);
        assert_eq!(sets.len(), 5);
        assert_eq!(sets.sets_count(), 5);
        for i in 0..5 {
            assert_eq!(sets.find(i), i);
        }
    }

    #[test]
    fn union_merges_once() {
        let mut sets = DisjointSet::new(4);
        assert!(sets.union(0, 1));
        assert!(sets.union(2, 3));
        assert_eq!(sets.sets_count(), 2);
        assert!(!sets.union(1, 0));
        assert!(sets.same_set(0, 1));
        assert!(!sets.same_set(1, 2));

        assert!(sets.union(1, 3));
        assert!(sets.same_set(0, 2));
        assert!(!sets.union(0, 3));
        assert_eq!(sets.sets_count(), 1);
    }

    #[test]
    fn long_chain_does_not_overflow_the_stack() {
        let n = 200_000;
        let mut sets = DisjointSet::new(n);
        for i in 1..n {
            assert!(sets.union(i - 1, i));
        }
        let root = sets.find(0);
        assert_eq!(sets.find(n - 1), root);
        assert_eq!(sets.sets_count(), 1);
    }

    #[test]
    fn union_count_matches_set_count() {
        fn prop(pairs: Vec<(u8, u8)>) -> bool {
            let n = 256;
            let mut sets = DisjointSet::new(n);
            let merges = pairs.iter()
                .filter(|&&(a, b)| sets.union(a as usize, b as usize))
                .count();
            sets.sets_count() == n - merges
        }
        quickcheck(prop as fn(Vec<(u8, u8)>) -> bool);
    }
}
