//! Word frequencies for free-text uploads

use dx_core::Table;
use dx_data::sources::TEXT_COLUMN;
use indexmap::IndexMap;

use crate::frequencies;

/// Number of words reported
pub const WORD_TOP_N: usize = 50;

/// Shortest token kept
const MIN_WORD_LEN: usize = 3;

const STOP_WORDS: &[&str] = &[
    "about", "above", "after", "again", "against", "all", "and", "any", "are", "aren't", "because",
    "been", "before", "being", "below", "between", "both", "but", "can", "could", "did", "didn't",
    "does", "doesn't", "doing", "don't", "down", "during", "each", "few", "for", "from", "further",
    "had", "has", "have", "having", "her", "here", "hers", "herself", "him", "himself", "his",
    "how", "i'm", "i've", "into", "isn't", "it's", "its", "itself", "just", "let's", "more",
    "most", "myself", "nor", "not", "now", "off", "once", "only", "other", "our", "ours",
    "ourselves", "out", "over", "own", "same", "she", "should", "some", "such", "than", "that",
    "the", "their", "theirs", "them", "themselves", "then", "there", "these", "they", "this",
    "those", "through", "too", "under", "until", "very", "was", "wasn't", "were", "what", "when",
    "where", "which", "while", "who", "whom", "why", "will", "with", "would", "you", "your",
    "yours", "yourself", "yourselves",
];

/// Split text into lower-case word tokens
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|token| token.trim_matches('\'').to_lowercase())
        .filter(|token| !token.is_empty())
}

fn is_content_word(token: &str) -> bool {
    token.chars().count() >= MIN_WORD_LEN
        && !token.chars().all(|c| c.is_numeric())
        && !STOP_WORDS.contains(&token)
}

/// Most frequent content words of the `text` column
///
/// Returns an empty map for tables without a text column.
pub fn word_frequencies(table: &Table) -> IndexMap<String, usize> {
    let Some(column) = table.column(TEXT_COLUMN) else {
        return IndexMap::new();
    };

    let words = column
        .cells
        .iter()
        .filter_map(|cell| cell.label())
        .flat_map(|line| tokenize(&line).filter(|t| is_content_word(t)).collect::<Vec<_>>());

    frequencies(words).into_iter().take(WORD_TOP_N).collect()
}
