use crate::lemmatizer::Lemmatizer;
use crate::stopwords::StopwordFilter;
use crate::tokenizer::{strip_punctuation, tokenize};

/// Lemmas of this many characters or fewer are dropped
pub const MIN_TOKEN_CHARS: usize = 3;

/// Turns raw post text into the upper-cased lemmas fed to the topic model.
pub struct TextPreparer<'a> {
    lemmatizer: &'a dyn Lemmatizer,
    stopwords: &'a StopwordFilter,
}

impl<'a> TextPreparer<'a> {
    pub fn new(lemmatizer: &'a dyn Lemmatizer, stopwords: &'a StopwordFilter) -> Self {
        TextPreparer {
            lemmatizer,
            stopwords,
        }
    }

    /// Tokenize, lemmatize and filter `text`. Order is preserved and repeated
    /// lemmas are kept.
    pub fn prepare(&self, text: &str) -> Vec<String> {
        tokenize(text)
            .iter()
            .map(|token| self.lemmatizer.lemma(token))
            .filter(|lemma| self.keep(lemma))
            .map(|lemma| lemma.to_uppercase())
            .collect()
    }

    /// `prepare` preceded by the punctuation pass applied to whole files
    pub fn prepare_file_contents(&self, contents: &str) -> Vec<String> {
        self.prepare(&strip_punctuation(contents))
    }

    fn keep(&self, lemma: &str) -> bool {
        lemma.chars().count() > MIN_TOKEN_CHARS && !self.stopwords.is_stopword(lemma)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lemmatizer::{Identity, LookupLemmatizer};
    use std::collections::HashMap;

    #[test]
    fn test_prepare_filters_short_and_stop_words() {
        let stopwords = StopwordFilter::german();
        let preparer = TextPreparer::new(&Identity, &stopwords);

        let tokens = preparer.prepare("Wir und die Klimaschutz im Wahlkampf für bezahlbare Mieten");
        assert_eq!(tokens, vec!["KLIMASCHUTZ", "BEZAHLBARE", "MIETEN"]);
    }

    #[test]
    fn test_surviving_tokens_respect_filter() {
        let stopwords = StopwordFilter::german();
        let preparer = TextPreparer::new(&Identity, &stopwords);
        let text = "Am Sonntag ist Bundestagswahl! Geht wählen, für eine starke Zukunft in Hessen. \
                    Mehr Infos: https://www.example.de/wahl #btw21";

        let tokens = preparer.prepare_file_contents(text);
        assert!(!tokens.is_empty());
        for token in &tokens {
            assert!(token.chars().count() > MIN_TOKEN_CHARS, "{token} too short");
            assert!(!stopwords.is_stopword(token), "{token} is a stop word");
            assert_eq!(token, &token.to_uppercase());
        }
    }

    #[test]
    fn test_prepare_applies_lemmas_before_filtering() {
        let mut table = HashMap::new();
        table.insert("wahlen".to_string(), "wahl".to_string());
        table.insert("familien".to_string(), "familie".to_string());
        let lemmatizer = LookupLemmatizer::new(table);
        let stopwords = StopwordFilter::german();
        let preparer = TextPreparer::new(&lemmatizer, &stopwords);

        let tokens = preparer.prepare("Familien Wahlen Familien");
        assert_eq!(tokens, vec!["FAMILIE", "FAMILIE"]);
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let stopwords = StopwordFilter::empty();
        let preparer = TextPreparer::new(&Identity, &stopwords);

        // "größ" is four characters but six bytes; "über" is four characters.
        assert_eq!(preparer.prepare("öl über größ"), vec!["ÜBER", "GRÖSS"]);
    }
}
