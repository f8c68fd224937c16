use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref RE: Regex = Regex::new(r"(?u)\p{L}[\p{L}\p{N}_']*|\p{N}+").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","aren't","as","at",
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

fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(token)
}

/// Tokenize text into canonical terms: NFKC normalization, lowercase,
/// stopword removal, and reduction to the Snowball base form, in input order.
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized = text.nfkc().collect::<String>().to_lowercase();
    let mut tokens = Vec::new();
    for mat in RE.find_iter(&normalized) {
        let token = mat.as_str();
        if is_stopword(token) {
            continue;
        }
        tokens.push(STEMMER.stem(token).to_string());
    }
    tokens
}

/// Reduce raw text to a canonical keyword string. Empty input, or input that
/// is entirely stopwords, yields an empty string; that is a valid result and
/// embeds to the zero vector downstream.
pub fn normalize(text: &str) -> String {
    tokenize(text).join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_tokenize() {
        let t = tokenize("Running, runner's run!");
        assert!(t.iter().any(|w| w == "run"));
    }

    #[test]
    fn stopwords_only_normalizes_to_empty() {
        assert_eq!(normalize("the and of a"), "");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn keeps_numeric_grade_tokens() {
        let t = tokenize("Grade 5 fractions");
        assert!(t.iter().any(|w| w == "5"));
    }
}
