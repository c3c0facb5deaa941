// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Ordered cross-products of one or two collections.
//!
//! A [`Combinator`] pairs two sides, each either a plain ordered set or another
//! combinator, and enumerates the concatenated tuples first-side-major: the
//! second side is fully iterated for every element of the first side.
//! Synchronized merges use it to enumerate the input combinations they must
//! wait for, one per element of the product of the sources' duplication
//! batches.
//!
//! ```rust
//! use the_joinery::engine::Combinator;
//!
//! let combinator = Combinator::from_sets(vec![vec!['a', 'b'], vec!['x', 'y']]);
//! assert_eq!(combinator.len(), 4);
//! assert_eq!(
//!     combinator.combinations(),
//!     vec![vec!['a', 'x'], vec!['a', 'y'], vec!['b', 'x'], vec!['b', 'y']]
//! );
//! ```

/// One side of a [`Combinator`].
#[derive(Debug, Clone, PartialEq)]
pub enum Side<T> {
    Set(Vec<T>),
    Nested(Box<Combinator<T>>),
}

impl<T: Clone> Side<T> {
    fn len(&self) -> usize {
        match self {
            Side::Set(items) => items.len(),
            Side::Nested(combinator) => combinator.len(),
        }
    }

    fn tuples(&self) -> Vec<Vec<T>> {
        match self {
            Side::Set(items) => items.iter().map(|item| vec![item.clone()]).collect(),
            Side::Nested(combinator) => combinator.combinations(),
        }
    }
}

impl<T> From<Vec<T>> for Side<T> {
    fn from(items: Vec<T>) -> Self {
        Side::Set(items)
    }
}

impl<T> From<Combinator<T>> for Side<T> {
    fn from(combinator: Combinator<T>) -> Self {
        Side::Nested(Box::new(combinator))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Combinator<T> {
    a: Side<T>,
    b: Side<T>,
}

impl<T: Clone> Combinator<T> {
    pub fn new(a: impl Into<Side<T>>, b: impl Into<Side<T>>) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
        }
    }

    /// Nests any number of sets: `[s0, s1, s2]` becomes `(s0, (s1, s2))`.
    pub fn from_sets(mut sets: Vec<Vec<T>>) -> Self {
        match sets.len() {
            0 => Self::new(Vec::new(), Vec::new()),
            1 => Self::new(sets.remove(0), Vec::new()),
            2 => {
                let b = sets.remove(1);
                Self::new(sets.remove(0), b)
            }
            _ => {
                let first = sets.remove(0);
                Self::new(first, Self::from_sets(sets))
            }
        }
    }

    /// Product of both side lengths, or the non-empty side's length when the
    /// other side is empty.
    pub fn len(&self) -> usize {
        match (self.a.len(), self.b.len()) {
            (0, b) => b,
            (a, 0) => a,
            (a, b) => a * b,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every combination, in first-side-major order.
    pub fn combinations(&self) -> Vec<Vec<T>> {
        let mut combinations = Vec::with_capacity(self.len());
        self.for_each(|combination| combinations.push(combination));
        combinations
    }

    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(Vec<T>),
    {
        let (a, b) = (self.a.tuples(), self.b.tuples());
        match (a.is_empty(), b.is_empty()) {
            (true, _) => b.into_iter().for_each(f),
            (_, true) => a.into_iter().for_each(f),
            _ => {
                for head in &a {
                    for tail in &b {
                        let mut combination = Vec::with_capacity(head.len() + tail.len());
                        combination.extend(head.iter().cloned());
                        combination.extend(tail.iter().cloned());
                        f(combination);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_table_driven() {
        struct TestCase {
            name: &'static str,
            combinator: Combinator<u8>,
            expected_len: usize,
        }

        let test_cases = vec![
            TestCase {
                name: "both empty",
                combinator: Combinator::new(vec![], vec![]),
                expected_len: 0,
            },
            TestCase {
                name: "first empty",
                combinator: Combinator::new(vec![], vec![1, 2, 3]),
                expected_len: 3,
            },
            TestCase {
                name: "second empty",
                combinator: Combinator::new(vec![1, 2], vec![]),
                expected_len: 2,
            },
            TestCase {
                name: "both populated",
                combinator: Combinator::new(vec![1, 2], vec![3, 4, 5]),
                expected_len: 6,
            },
            TestCase {
                name: "nested second side",
                combinator: Combinator::new(vec![1, 2], Combinator::new(vec![3, 4], vec![5, 6])),
                expected_len: 8,
            },
            TestCase {
                name: "nested empty side",
                combinator: Combinator::new(vec![1, 2], Combinator::new(vec![], vec![])),
                expected_len: 2,
            },
        ];

        for case in test_cases {
            assert_eq!(case.combinator.len(), case.expected_len, "case: {}", case.name);
            assert_eq!(
                case.combinator.combinations().len(),
                case.expected_len,
                "case: {}",
                case.name
            );
        }
    }

    #[test]
    fn test_combinations_are_first_side_major() {
        let combinator = Combinator::new(vec![1, 2], vec![3, 4]);
        assert_eq!(
            combinator.combinations(),
            vec![vec![1, 3], vec![1, 4], vec![2, 3], vec![2, 4]]
        );
    }

    #[test]
    fn test_nested_combinations_concatenate() {
        let combinator = Combinator::from_sets(vec![vec![0, 1], vec![0], vec![0, 1]]);
        assert_eq!(combinator.len(), 4);
        assert_eq!(
            combinator.combinations(),
            vec![vec![0, 0, 0], vec![0, 0, 1], vec![1, 0, 0], vec![1, 0, 1]]
        );
    }

    #[test]
    fn test_single_set_yields_singletons() {
        let combinator = Combinator::from_sets(vec![vec!['a', 'b']]);
        assert_eq!(combinator.combinations(), vec![vec!['a'], vec!['b']]);
        assert!(Combinator::<char>::from_sets(vec![]).is_empty());
    }
}
