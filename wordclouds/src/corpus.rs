//! Dictionary and bag-of-words corpus construction.
//!
//! Every retained token becomes its own pseudo-document: the token is split on
//! whitespace (a lemma may expand to several words) and the resulting words
//! form one document. This mirrors how the party texts have always been fed to
//! the topic model.

use counter::Counter;
use std::collections::HashMap;

/// Sparse document vector: `(term id, count)` sorted by term id
pub type BagOfWords = Vec<(usize, usize)>;

/// Term ↔ id mapping
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    token2id: HashMap<String, usize>,
    id2token: Vec<String>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dictionary over `documents`, assigning ids in first-seen order
    pub fn from_documents(documents: &[Vec<String>]) -> Self {
        let mut dictionary = Self::new();
        for doc in documents {
            dictionary.add_document(doc);
        }
        dictionary
    }

    pub fn add_document(&mut self, doc: &[String]) {
        for word in doc {
            if !self.token2id.contains_key(word) {
                self.token2id.insert(word.clone(), self.id2token.len());
                self.id2token.push(word.clone());
            }
        }
    }

    /// Count the known words of `doc`. Unknown words are ignored.
    pub fn doc2bow(&self, doc: &[String]) -> BagOfWords {
        let counts: Counter<usize> = doc
            .iter()
            .filter_map(|word| self.token2id.get(word).copied())
            .collect();
        let mut bow: BagOfWords = counts.into_iter().collect();
        bow.sort_unstable_by_key(|&(id, _)| id);
        bow
    }

    pub fn id(&self, token: &str) -> Option<usize> {
        self.token2id.get(token).copied()
    }

    pub fn token(&self, id: usize) -> Option<&str> {
        self.id2token.get(id).map(String::as_str)
    }

    pub fn tokens(&self) -> &[String] {
        &self.id2token
    }

    pub fn len(&self) -> usize {
        self.id2token.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id2token.is_empty()
    }
}

/// Bag-of-words corpus together with the dictionary it was built from
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    pub dictionary: Dictionary,
    pub documents: Vec<BagOfWords>,
}

impl Corpus {
    /// One pseudo-document per token
    pub fn from_tokens(tokens: &[String]) -> Self {
        let text_data: Vec<Vec<String>> = tokens
            .iter()
            .map(|token| token.split_whitespace().map(str::to_string).collect())
            .collect();
        Self::from_documents(&text_data)
    }

    pub fn from_documents(text_data: &[Vec<String>]) -> Self {
        let dictionary = Dictionary::from_documents(text_data);
        let documents = text_data.iter().map(|doc| dictionary.doc2bow(doc)).collect();
        Corpus {
            dictionary,
            documents,
        }
    }

    pub fn num_words(&self) -> usize {
        self.documents
            .iter()
            .flat_map(|bow| bow.iter().map(|&(_, count)| count))
            .sum()
    }

    /// True when there is nothing to model
    pub fn is_empty(&self) -> bool {
        self.num_words() == 0
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }
}
