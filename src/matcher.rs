//! Question matching: blended similarity scoring and best-match selection.
//!
//! The matcher operates on plain strings and a slice of knowledge-base items,
//! with no configuration or I/O dependencies. The calling application builds
//! a [`MatchParams`] (usually from config defaults) and passes the knowledge
//! base in.
//!
//! # Scoring algorithm
//!
//! 1. Normalize both the query and the candidate question.
//! 2. Compute a character-sequence ratio in `[0, 1]`: longest matching blocks
//!    between the two normalized strings, `2 × matched chars / total length`.
//! 3. Tokenize both strings and compute word-set overlap:
//!    `|A ∩ B| / max(1, |A ∪ B|)`.
//! 4. If the shared tokens contain an agent acronym AND a non-acronym word,
//!    and overlap clears the bonus gate, add the acronym bonus.
//! 5. `score = sequence_weight × ratio + token_weight × overlap + bonus`.
//!
//! Word overlap carries most of the weight: paraphrased questions share
//! vocabulary far more reliably than they share character runs. The acronym
//! bonus is gated so a bare product code in an otherwise unrelated question
//! cannot drag an entry over the acceptance threshold.

use std::collections::HashMap;

use crate::knowledge::QAItem;
use crate::text::{normalize, tokenize};

/// The product's agent short-codes, matched as whole tokens.
pub const ACRONYM_TOKENS: [&str; 3] = ["eva", "cam", "phil"];

/// Scoring and acceptance tuning, decoupled from application config.
///
/// The defaults are tuned constants carried over from the original support
/// agent; overriding them changes which queries match, so they are surfaced
/// in `[matching]` config but rarely touched.
#[derive(Debug, Clone)]
pub struct MatchParams {
    /// Weight of the character-sequence ratio term.
    pub sequence_weight: f64,
    /// Weight of the token-overlap term.
    pub token_weight: f64,
    /// Minimum score for a confident match; below this the caller falls back.
    pub accept_threshold: f64,
    /// Flat bonus added when the acronym conditions hold.
    pub acronym_bonus: f64,
    /// Minimum token overlap required before the bonus applies.
    pub acronym_min_overlap: f64,
}

impl Default for MatchParams {
    fn default() -> Self {
        Self {
            sequence_weight: 0.35,
            token_weight: 0.65,
            accept_threshold: 0.40,
            acronym_bonus: 0.2,
            acronym_min_overlap: 0.25,
        }
    }
}

/// Result of scanning the knowledge base for one query.
///
/// `item` is `None` when no candidate reached the acceptance threshold;
/// `score` is the best score seen either way (0.0 for an empty candidate set).
#[derive(Debug, Clone)]
pub struct BestMatch<'a> {
    pub item: Option<&'a QAItem>,
    pub score: f64,
}

/// Longest-matching-blocks similarity ratio between two strings, in `[0, 1]`.
///
/// Both inputs are compared as sequences of chars: find the longest common
/// block, recurse on the text to its left and right, and sum the matched
/// lengths. The ratio is `2 × matches / (len(a) + len(b))`; two empty strings
/// ratio to `1.0`. No junk heuristic is applied — inputs here are short
/// normalized questions.
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() && b.is_empty() {
        return 1.0;
    }

    // Positions of each char in `b`, for the longest-block scan.
    let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, &ch) in b.iter().enumerate() {
        b2j.entry(ch).or_default().push(j);
    }

    let mut matches = 0usize;
    let mut regions = vec![(0usize, a.len(), 0usize, b.len())];

    while let Some((alo, ahi, blo, bhi)) = regions.pop() {
        let (i, j, size) = longest_block(&a, &b2j, alo, ahi, blo, bhi);
        if size > 0 {
            matches += size;
            regions.push((alo, i, blo, j));
            regions.push((i + size, ahi, j + size, bhi));
        }
    }

    2.0 * matches as f64 / (a.len() + b.len()) as f64
}

/// Find the longest block common to `a[alo..ahi]` and `b[blo..bhi]`.
///
/// Returns `(start_in_a, start_in_b, length)`; length 0 when the regions
/// share nothing. Uses the classic rolling `j -> run length` table so each
/// region costs O(|a| × occupancy) rather than O(|a| × |b|).
fn longest_block(
    a: &[char],
    b2j: &HashMap<char, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0usize);
    let mut run_lengths: HashMap<usize, usize> = HashMap::new();

    for i in alo..ahi {
        let mut next_runs: HashMap<usize, usize> = HashMap::new();
        if let Some(positions) = b2j.get(&a[i]) {
            for &j in positions {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let k = if j > blo {
                    run_lengths.get(&(j - 1)).copied().unwrap_or(0) + 1
                } else {
                    1
                };
                next_runs.insert(j, k);
                if k > best_size {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_size = k;
                }
            }
        }
        run_lengths = next_runs;
    }

    (best_i, best_j, best_size)
}

/// Blended similarity between a query and a candidate question.
///
/// See the module docs for the algorithm. Total over all string inputs.
pub fn similarity_score(a: &str, b: &str, params: &MatchParams) -> f64 {
    let a_norm = normalize(a);
    let b_norm = normalize(b);

    let sequence = sequence_ratio(&a_norm, &b_norm);

    let a_tokens = tokenize(&a_norm);
    let b_tokens = tokenize(&b_norm);

    let union = a_tokens.union(&b_tokens).count();
    let shared: Vec<&String> = a_tokens.intersection(&b_tokens).collect();
    let overlap = shared.len() as f64 / union.max(1) as f64;

    let shared_acronym = shared.iter().any(|t| ACRONYM_TOKENS.contains(&t.as_str()));
    let shared_non_acronym = shared.iter().any(|t| !ACRONYM_TOKENS.contains(&t.as_str()));
    let bonus = if shared_acronym && shared_non_acronym && overlap >= params.acronym_min_overlap {
        params.acronym_bonus
    } else {
        0.0
    };

    params.sequence_weight * sequence + params.token_weight * overlap + bonus
}

/// Scan `items` in order and return the best-scoring entry, thresholded.
///
/// Selection uses strict `>`, so the first item reaching a given score wins
/// ties. A best score strictly below `params.accept_threshold` returns
/// `item: None` with the score preserved; a score exactly at the threshold is
/// accepted. An empty slice yields `(None, 0.0)`. Never fails.
pub fn find_best_match<'a>(query: &str, items: &'a [QAItem], params: &MatchParams) -> BestMatch<'a> {
    let mut best_item: Option<&QAItem> = None;
    let mut best_score = 0.0f64;

    for item in items {
        let score = similarity_score(query, &item.question, params);
        if score > best_score {
            best_score = score;
            best_item = Some(item);
        }
    }

    if best_score < params.accept_threshold {
        return BestMatch {
            item: None,
            score: best_score,
        };
    }

    BestMatch {
        item: best_item,
        score: best_score,
    }
}
