//! Approximate string matching for reference-location lookup.
//!
//! [`SequenceRatio`] scores candidates with the Ratcliff/Obershelp "gestalt"
//! ratio `2·M / (|a| + |b|)`, where `M` is the number of characters in the
//! recursively found longest common blocks.

use std::cmp::Ordering;
use std::collections::HashMap;

/// Sequences at least this long drop overly common characters from the
/// block search.
const AUTOJUNK_MIN_LEN: usize = 200;

/// Picks the single best candidate for a query.
pub trait BestMatch {
    /// Index of the best candidate whose similarity is at least `cutoff`, or
    /// `None` when no candidate clears it.
    fn best_match(&self, query: &str, candidates: &[&str], cutoff: f64) -> Option<usize>;
}

/// Gestalt pattern matching. Ties on score go to the lexicographically
/// greatest candidate.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceRatio;

impl BestMatch for SequenceRatio {
    fn best_match(&self, query: &str, candidates: &[&str], cutoff: f64) -> Option<usize> {
        let query: Vec<char> = query.chars().collect();
        let index = BlockIndex::new(&query);

        let mut best: Option<(f64, usize)> = None;
        for (i, candidate) in candidates.iter().enumerate() {
            let chars: Vec<char> = candidate.chars().collect();
            let score = index.ratio(&chars);
            if score < cutoff {
                continue;
            }
            let better = match best {
                None => true,
                Some((best_score, best_i)) => match score.partial_cmp(&best_score) {
                    Some(Ordering::Greater) => true,
                    Some(Ordering::Equal) => *candidate > candidates[best_i],
                    _ => false,
                },
            };
            if better {
                best = Some((score, i));
            }
        }
        best.map(|(_, i)| i)
    }
}

/// Similarity of `a` against `b` in `[0, 1]`.
pub fn similarity(a: &str, b: &str) -> f64 {
    let b: Vec<char> = b.chars().collect();
    let a: Vec<char> = a.chars().collect();
    BlockIndex::new(&b).ratio(&a)
}

/// Positions of every character of the fixed sequence `b`.
struct BlockIndex<'a> {
    b: &'a [char],
    positions: HashMap<char, Vec<usize>>,
}

impl<'a> BlockIndex<'a> {
    fn new(b: &'a [char]) -> Self {
        let mut positions: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, c) in b.iter().enumerate() {
            positions.entry(*c).or_default().push(j);
        }
        if b.len() >= AUTOJUNK_MIN_LEN {
            let limit = b.len() / 100 + 1;
            positions.retain(|_, js| js.len() <= limit);
        }
        BlockIndex { b, positions }
    }

    fn ratio(&self, a: &[char]) -> f64 {
        let total = a.len() + self.b.len();
        if total == 0 {
            return 1.0;
        }
        2.0 * self.matched_chars(a) as f64 / total as f64
    }

    /// Total size of the matching blocks between `a` and `b`.
    fn matched_chars(&self, a: &[char]) -> usize {
        let mut matched = 0;
        let mut queue = vec![(0, a.len(), 0, self.b.len())];
        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, k) = self.longest_match(a, alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            matched += k;
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }
        matched
    }

    /// Longest block `a[i..i+k] == b[j..j+k]` inside the given ranges,
    /// earliest in `a` and then in `b` among equals.
    fn longest_match(
        &self,
        a: &[char],
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> (usize, usize, usize) {
        let (mut best_i, mut best_j, mut best_k) = (alo, blo, 0);
        let mut run_at: HashMap<usize, usize> = HashMap::new();

        for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
            let mut next_run: HashMap<usize, usize> = HashMap::new();
            if let Some(js) = self.positions.get(c) {
                for &j in js {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| run_at.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next_run.insert(j, k);
                    if k > best_k {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_k = k;
                    }
                }
            }
            run_at = next_run;
        }

        // Extend across characters left out of the index by autojunk
        while best_i > alo && best_j > blo && a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_k += 1;
        }
        while best_i + best_k < ahi
            && best_j + best_k < bhi
            && a[best_i + best_k] == self.b[best_j + best_k]
        {
            best_k += 1;
        }

        (best_i, best_j, best_k)
    }
}
