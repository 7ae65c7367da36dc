//! Words that never make it into a vocabulary list.

use std::collections::HashSet;

/// Standard English stopwords
pub const ENGLISH: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];

/// Common words and sung fillers that carry nothing for a learner
pub const FILLERS: &[&str] = &[
    "the", "and", "a", "to", "of", "in", "i", "you", "is", "that", "it", "for", "on", "with",
    "as", "are", "be", "this", "was", "have", "or", "at", "not", "your", "from", "my", "by",
    "but", "all", "they", "we", "an", "what", "so", "me", "do", "if", "up", "can", "no", "out",
    "will", "he", "she", "them", "when", "who", "get", "just", "like", "some", "would", "could",
    "should", "their", "there", "then", "than", "more", "been", "had", "has", "am", "oh", "yeah",
    "la", "na", "ooh", "hey", "um", "uh", "mm", "ah", "got",
];

/// The union of [`ENGLISH`] and [`FILLERS`]
pub fn stop_words() -> HashSet<&'static str> {
    ENGLISH.iter().chain(FILLERS.iter()).copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_contains_both_lists() {
        let words = stop_words();
        assert!(words.contains("themselves"));
        assert!(words.contains("yeah"));
        assert!(!words.contains("heaven"));
    }
}
