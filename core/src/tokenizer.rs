use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref RE: Regex = Regex::new(r"(?u)\p{L}[\p{L}\p{N}_']*").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","also","am","an","and","any","are","aren't","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","can't","cannot","could","couldn't",
            "did","didn't","do","does","doesn't","doing","don't","down","during",
            "each","few","for","from","further",
            "had","hadn't","has","hasn't","have","haven't","having","he","he'd","he'll","he's","her","here","here's","hers","herself","him","himself","his","how","how's",
            "i","i'd","i'll","i'm","i've","if","in","into","is","isn't","it","it's","its","itself",
            "let's","me","more","most","mustn't","my","myself",
            "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "same","she","she'd","she'll","she's","should","shouldn't","so","some","such",
            "than","that","that's","the","their","theirs","them","themselves","then","there","there's","these","they","they'd","they'll","they're","they've","this","those","through","to","too",
            "under","until","up","very",
            "was","wasn't","we","we'd","we'll","we're","we've","were","weren't","what","what's","when","when's","where","where's","which","while","who","who's","whom","why","why's","with","won't","would","wouldn't",
            "you","you'd","you'll","you're","you've","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

/// Text analysis settings shared by index build and query projection.
///
/// The index stores the analyzer it was built with so that a query is always
/// tokenized by exactly the same rules as the descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analyzer {
    pub stem: bool,
}

impl Default for Analyzer {
    fn default() -> Self { Self { stem: true } }
}

impl Analyzer {
    pub fn new(stem: bool) -> Self { Self { stem } }

    /// Tokenize text into terms using NFKC normalization, lowercase, stopword removal and (optionally) stemming.
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let normalized = text.nfkc().collect::<String>().to_lowercase();
        let mut tokens = Vec::new();
        for mat in RE.find_iter(&normalized) {
            let token = mat.as_str().trim_end_matches('\'');
            if token.is_empty() || is_stopword(token) { continue; }
            if self.stem {
                tokens.push(STEMMER.stem(token).to_string());
            } else {
                tokens.push(token.to_string());
            }
        }
        tokens
    }
}

/// Tokenize with the default analyzer.
pub fn tokenize(text: &str) -> Vec<String> {
    Analyzer::default().analyze(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_tokenize() {
        let t = tokenize("Beaches and the BEACH!");
        assert_eq!(t, vec!["beach".to_string(), "beach".to_string()]);
    }

    #[test]
    fn unstemmed_keeps_surface_form() {
        let t = Analyzer::new(false).analyze("Ancient Temples");
        assert_eq!(t, vec!["ancient".to_string(), "temples".to_string()]);
    }

    #[test]
    fn empty_and_stopword_only_text_yield_nothing() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("the and of it's").is_empty());
    }
}
