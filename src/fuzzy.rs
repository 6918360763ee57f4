//! Fuzzy string matching utilities using Levenshtein distance
//!
//! Used to suggest known phrases when an utterance doesn't match any
//! command, since transcription errors are usually a letter or two off.

/// Fuzzy match using Levenshtein distance, allows ~30% errors
pub fn fuzzy_match(expected: &str, actual: &str) -> bool {
    if expected == actual {
        return true;
    }
    let max_dist = (expected.len() / 3).max(1);
    levenshtein(expected, actual) <= max_dist
}

/// Calculate Levenshtein distance between two strings
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut row = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        row[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            row[j] = (prev[j] + 1).min(row[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut row);
    }
    prev[b.len()]
}

/// Clean text for matching: lowercase and remove non-alphanumeric characters
pub fn clean_for_matching(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Candidates that fuzzily match the start of `input`, closest first.
///
/// Each candidate is compared against as many leading words of the input
/// as it has, so "new clas named foo" still suggests "new class named".
pub fn suggest(input: &str, candidates: &[String], limit: usize) -> Vec<String> {
    let cleaned = clean_for_matching(input);
    let words: Vec<&str> = cleaned.split_whitespace().collect();
    if words.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(usize, &String)> = candidates
        .iter()
        .filter_map(|candidate| {
            let n = candidate.split_whitespace().count().min(words.len());
            let prefix = words[..n].join(" ");
            fuzzy_match(candidate, &prefix).then(|| (levenshtein(candidate, &prefix), candidate))
        })
        .collect();

    scored.sort_by_key(|(dist, _)| *dist);
    scored
        .into_iter()
        .map(|(_, c)| c.clone())
        .fold(Vec::new(), |mut out, c| {
            if out.len() < limit && !out.contains(&c) {
                out.push(c);
            }
            out
        })
}
