//! Gestalt pattern matching (Ratcliff/Obershelp) similarity.
//!
//! [`SequenceMatcher`] finds the longest common block, then recurses on the
//! unmatched pieces on either side; `ratio = 2 * M / T` where `M` is the
//! total matched length and `T` the combined length. Two cheaper upper
//! bounds, [`SequenceMatcher::quick_ratio`] and
//! [`SequenceMatcher::real_quick_ratio`], let [`get_close_matches`] reject
//! most candidates without running the full comparison.
//!
//! The results are the same as the classic `difflib` implementation with no
//! junk predicate and the "popular element" heuristic enabled.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// Sequences at least this long drop elements that occur in more than 1% of
/// positions from the match index.
const AUTOJUNK_MIN_LEN: usize = 200;

/// A matched block: `a[a_start..a_start + len] == b[b_start..b_start + len]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Block {
    pub a_start: usize,
    pub b_start: usize,
    pub len: usize,
}

/// Compares a changing sequence `a` against a fixed sequence `b`.
///
/// `b` is indexed once at construction, so comparing many candidates
/// against one word should keep the word as `b` and swap `a` with
/// [`SequenceMatcher::set_a`].
#[derive(Debug, Clone)]
pub struct SequenceMatcher {
    a: Vec<char>,
    b: Vec<char>,
    b2j: HashMap<char, Vec<usize>>,
    b_counts: HashMap<char, usize>,
}

impl SequenceMatcher {
    #[must_use]
    pub fn new(a: &str, b: &str) -> Self {
        let b: Vec<char> = b.chars().collect();

        let mut b_counts: HashMap<char, usize> = HashMap::new();
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b2j.entry(c).or_default().push(j);
            *b_counts.entry(c).or_default() += 1;
        }

        if b.len() >= AUTOJUNK_MIN_LEN {
            let limit = b.len() / 100 + 1;
            let popular: HashSet<char> = b2j
                .iter()
                .filter(|(_, positions)| positions.len() > limit)
                .map(|(c, _)| *c)
                .collect();
            for c in &popular {
                b2j.remove(c);
            }
        }

        Self {
            a: a.chars().collect(),
            b,
            b2j,
            b_counts,
        }
    }

    /// Replace the `a` side, keeping the index of `b`.
    pub fn set_a(&mut self, a: &str) {
        self.a = a.chars().collect();
    }

    /// Longest matching block in `a[alo..ahi]` and `b[blo..bhi]`.
    ///
    /// Of all maximal blocks, the one starting earliest in `a` wins, then
    /// the one starting earliest in `b`.
    fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> Block {
        let mut best = Block {
            a_start: alo,
            b_start: blo,
            len: 0,
        };

        // j2len[j] = length of the match ending at a[i - 1], b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next.insert(j, k);
                    if k > best.len {
                        best = Block {
                            a_start: i + 1 - k,
                            b_start: j + 1 - k,
                            len: k,
                        };
                    }
                }
            }
            j2len = next;
        }

        // Popular elements are absent from b2j; grow the block over them.
        while best.a_start > alo
            && best.b_start > blo
            && self.a[best.a_start - 1] == self.b[best.b_start - 1]
        {
            best.a_start -= 1;
            best.b_start -= 1;
            best.len += 1;
        }
        while best.a_start + best.len < ahi
            && best.b_start + best.len < bhi
            && self.a[best.a_start + best.len] == self.b[best.b_start + best.len]
        {
            best.len += 1;
        }

        best
    }

    /// All non-overlapping matching blocks, in increasing order, with
    /// adjacent blocks merged.
    #[must_use]
    pub fn matching_blocks(&self) -> Vec<Block> {
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];
        let mut blocks = Vec::new();

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let block = self.find_longest_match(alo, ahi, blo, bhi);
            if block.len == 0 {
                continue;
            }
            blocks.push(block);
            if alo < block.a_start && blo < block.b_start {
                queue.push((alo, block.a_start, blo, block.b_start));
            }
            if block.a_start + block.len < ahi && block.b_start + block.len < bhi {
                queue.push((block.a_start + block.len, ahi, block.b_start + block.len, bhi));
            }
        }
        blocks.sort_unstable();

        let mut merged: Vec<Block> = Vec::with_capacity(blocks.len());
        for block in blocks {
            match merged.last_mut() {
                Some(last)
                    if last.a_start + last.len == block.a_start
                        && last.b_start + last.len == block.b_start =>
                {
                    last.len += block.len;
                }
                _ => merged.push(block),
            }
        }
        merged
    }

    /// Similarity in `[0, 1]`; `1.0` when both sequences are empty.
    #[must_use]
    pub fn ratio(&self) -> f64 {
        let matches: usize = self.matching_blocks().iter().map(|b| b.len).sum();
        calculate_ratio(matches, self.a.len() + self.b.len())
    }

    /// Upper bound on [`ratio`](Self::ratio) from character multiset overlap.
    #[must_use]
    pub fn quick_ratio(&self) -> f64 {
        let mut available: HashMap<char, usize> = HashMap::new();
        let mut matches = 0;
        for &c in &self.a {
            let remaining = available
                .entry(c)
                .or_insert_with(|| self.b_counts.get(&c).copied().unwrap_or(0));
            if *remaining > 0 {
                *remaining -= 1;
                matches += 1;
            }
        }
        calculate_ratio(matches, self.a.len() + self.b.len())
    }

    /// Upper bound on [`ratio`](Self::ratio) from lengths alone.
    #[must_use]
    pub fn real_quick_ratio(&self) -> f64 {
        let (la, lb) = (self.a.len(), self.b.len());
        calculate_ratio(la.min(lb), la + lb)
    }
}

fn calculate_ratio(matches: usize, length: usize) -> f64 {
    if length == 0 {
        1.0
    } else {
        2.0 * matches as f64 / length as f64
    }
}

/// Gestalt similarity of `a` against `b`.
#[must_use]
pub fn ratio(a: &str, b: &str) -> f64 {
    SequenceMatcher::new(a, b).ratio()
}

/// The best `n` candidates whose similarity to `word` is at least `cutoff`.
///
/// Results are ordered by score, highest first; equal scores are ordered by
/// candidate, greatest first. Each entry carries its score.
#[must_use]
pub fn get_close_matches<'a, S: AsRef<str>>(
    word: &str,
    candidates: &'a [S],
    n: usize,
    cutoff: f64,
) -> Vec<(&'a str, f64)> {
    if n == 0 {
        return Vec::new();
    }

    let mut matcher = SequenceMatcher::new("", word);
    let mut scored: Vec<(&'a str, f64)> = Vec::new();
    for candidate in candidates {
        let candidate = candidate.as_ref();
        matcher.set_a(candidate);
        if matcher.real_quick_ratio() >= cutoff && matcher.quick_ratio() >= cutoff {
            let score = matcher.ratio();
            if score >= cutoff {
                scored.push((candidate, score));
            }
        }
    }

    scored.sort_by(|x, y| match y.1.total_cmp(&x.1) {
        Ordering::Equal => y.0.cmp(x.0),
        other => other,
    });
    scored.truncate(n);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_ratio_identical_and_disjoint() {
        assert!(approx(ratio("matrix", "matrix"), 1.0));
        assert!(approx(ratio("abc", "xyz"), 0.0));
        assert!(approx(ratio("", ""), 1.0));
        assert!(approx(ratio("", "abc"), 0.0));
    }

    #[test]
    fn test_ratio_known_values() {
        // Classic reference pair: matching blocks "a" + "b" + "c" = 3 of 4+4.
        assert!(approx(ratio("abcd", "bcde"), 0.75));
        // "incept" + "o" + "n" = 8 of 9+9.
        assert!(approx(ratio("inceptoin", "inception"), 16.0 / 18.0));
    }

    #[test]
    fn test_matching_blocks() {
        let m = SequenceMatcher::new("abxcd", "abcd");
        let blocks = m.matching_blocks();
        assert_eq!(
            blocks,
            vec![
                Block {
                    a_start: 0,
                    b_start: 0,
                    len: 2
                },
                Block {
                    a_start: 3,
                    b_start: 2,
                    len: 2
                },
            ]
        );
    }

    #[test]
    fn test_quick_ratios_bound_ratio() {
        for (a, b) in [
            ("thematrix", "matrixreloaded"),
            ("inceptoin", "inception"),
            ("starwarsepisode4newhope", "starwarsanewhope"),
        ] {
            let m = SequenceMatcher::new(a, b);
            let r = m.ratio();
            assert!(m.quick_ratio() >= r);
            assert!(m.real_quick_ratio() >= m.quick_ratio());
        }
    }

    #[test]
    fn test_ratio_in_unit_interval() {
        for (a, b) in [("a", "aaaa"), ("heat", "theheat"), ("xyz", "")] {
            let r = ratio(a, b);
            assert!((0.0..=1.0).contains(&r));
        }
    }

    #[test]
    fn test_long_sequences_use_popularity_heuristic() {
        let a = "a".repeat(250);
        let b = "a".repeat(250);
        // Every element is popular in `b`, so only block extension can match.
        assert!(ratio(&a, &b) <= 1.0);
        let c = format!("{}x", "ab".repeat(120));
        assert!(ratio(&c, &c) > 0.0);
    }

    #[test]
    fn test_get_close_matches_orders_by_score() {
        let candidates = ["ape", "apple", "peach", "puppy"];
        let matches = get_close_matches("appel", &candidates, 3, 0.6);
        let names: Vec<&str> = matches.iter().map(|(c, _)| *c).collect();
        assert_eq!(names, vec!["apple", "ape"]);
    }

    #[test]
    fn test_get_close_matches_limits_and_cutoff() {
        let candidates = ["thematrix", "matrixreloaded", "inception"];
        assert!(get_close_matches("xyzabc", &candidates, 3, 0.6).is_empty());
        assert_eq!(get_close_matches("thematrix", &candidates, 1, 0.0).len(), 1);
        assert!(get_close_matches("thematrix", &candidates, 0, 0.0).is_empty());
    }

    #[test]
    fn test_get_close_matches_breaks_ties_by_candidate_descending() {
        let candidates = ["abx", "aby"];
        let matches = get_close_matches("abz", &candidates, 2, 0.5);
        let names: Vec<&str> = matches.iter().map(|(c, _)| *c).collect();
        assert_eq!(names, vec!["aby", "abx"]);
    }
}
