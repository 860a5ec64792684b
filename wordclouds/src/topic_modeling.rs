use crate::corpus::Corpus;
use crate::error::{Error, Result};
use rand::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeledTopic {
    pub id: usize,
    pub words: Vec<(String, f64)>, // Word and its probability in this topic
    pub prevalence: f64,           // Share of corpus words assigned to this topic
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LDAConfig {
    pub num_topics: usize,
    pub passes: usize,
    pub alpha: Option<f64>, // Document-topic concentration, 1/num_topics when unset
    pub eta: Option<f64>,   // Topic-word concentration, 1/num_topics when unset
    pub seed: Option<u64>,
}

impl Default for LDAConfig {
    fn default() -> Self {
        LDAConfig {
            num_topics: 3,
            passes: 100,
            alpha: None,
            eta: None,
            seed: None,
        }
    }
}

impl LDAConfig {
    fn symmetric_prior(&self) -> f64 {
        1.0 / self.num_topics as f64
    }

    pub fn alpha(&self) -> f64 {
        self.alpha.unwrap_or_else(|| self.symmetric_prior())
    }

    pub fn eta(&self) -> f64 {
        self.eta.unwrap_or_else(|| self.symmetric_prior())
    }
}

/// Latent Dirichlet Allocation fitted with collapsed Gibbs sampling, one sweep
/// over the corpus per pass.
pub struct SimpleLDA {
    config: LDAConfig,
}

impl SimpleLDA {
    pub fn new(config: LDAConfig) -> Result<Self> {
        if config.num_topics == 0 {
            return Err(Error::InvalidTopicCount);
        }
        if !(config.alpha() > 0.0 && config.alpha().is_finite()) {
            return Err(Error::InvalidParameter("alpha must be positive".into()));
        }
        if !(config.eta() > 0.0 && config.eta().is_finite()) {
            return Err(Error::InvalidParameter("eta must be positive".into()));
        }
        Ok(SimpleLDA { config })
    }

    pub fn config(&self) -> &LDAConfig {
        &self.config
    }

    pub fn fit(&self, corpus: &Corpus) -> Result<TopicModel> {
        if corpus.is_empty() {
            return Err(Error::EmptyCorpus);
        }

        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        // Expand each bag of words into one word id per occurrence
        let word_docs: Vec<Vec<usize>> = corpus
            .documents
            .iter()
            .map(|bow| {
                bow.iter()
                    .flat_map(|&(word_id, count)| std::iter::repeat(word_id).take(count))
                    .collect()
            })
            .collect();

        let (topic_word_counts, topic_counts) =
            self.run_lda(&word_docs, corpus.dictionary.len(), &mut rng);

        Ok(TopicModel {
            num_topics: self.config.num_topics,
            eta: self.config.eta(),
            vocabulary: corpus.dictionary.tokens().to_vec(),
            topic_word_counts,
            topic_counts,
        })
    }

    fn run_lda(
        &self,
        word_docs: &[Vec<usize>],
        vocab_size: usize,
        rng: &mut StdRng,
    ) -> (Vec<Vec<usize>>, Vec<usize>) {
        let num_topics = self.config.num_topics;

        let mut topic_word_counts = vec![vec![0usize; vocab_size]; num_topics];
        let mut doc_topic_counts = vec![vec![0usize; num_topics]; word_docs.len()];
        let mut topic_counts = vec![0usize; num_topics];

        // Random initialization
        let mut assignments: Vec<Vec<usize>> = Vec::with_capacity(word_docs.len());
        for (doc_id, doc) in word_docs.iter().enumerate() {
            let mut doc_assignments = Vec::with_capacity(doc.len());
            for &word_id in doc {
                let topic = rng.gen_range(0..num_topics);
                topic_word_counts[topic][word_id] += 1;
                doc_topic_counts[doc_id][topic] += 1;
                topic_counts[topic] += 1;
                doc_assignments.push(topic);
            }
            assignments.push(doc_assignments);
        }

        let alpha = self.config.alpha();
        let eta = self.config.eta();
        let eta_sum = eta * vocab_size as f64;
        let mut weights = vec![0.0; num_topics];

        for pass in 0..self.config.passes {
            for (doc_id, doc) in word_docs.iter().enumerate() {
                for (pos, &word_id) in doc.iter().enumerate() {
                    let old_topic = assignments[doc_id][pos];

                    // Remove current assignment
                    topic_word_counts[old_topic][word_id] -= 1;
                    doc_topic_counts[doc_id][old_topic] -= 1;
                    topic_counts[old_topic] -= 1;

                    let mut total = 0.0;
                    for (topic, weight) in weights.iter_mut().enumerate() {
                        let word_prob = (topic_word_counts[topic][word_id] as f64 + eta)
                            / (topic_counts[topic] as f64 + eta_sum);
                        let doc_prob = doc_topic_counts[doc_id][topic] as f64 + alpha;
                        *weight = word_prob * doc_prob;
                        total += *weight;
                    }
                    let new_topic = sample_index(&weights, total, rng);

                    topic_word_counts[new_topic][word_id] += 1;
                    doc_topic_counts[doc_id][new_topic] += 1;
                    topic_counts[new_topic] += 1;
                    assignments[doc_id][pos] = new_topic;
                }
            }

            if (pass + 1) % 25 == 0 {
                tracing::debug!(pass = pass + 1, passes = self.config.passes, "gibbs sweep");
            }
        }

        (topic_word_counts, topic_counts)
    }
}

fn sample_index(weights: &[f64], total: f64, rng: &mut StdRng) -> usize {
    let threshold = rng.gen::<f64>() * total;
    let mut cumsum = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumsum += w;
        if cumsum >= threshold {
            return i;
        }
    }
    weights.len() - 1
}

/// A fitted model. Owns only counts and the vocabulary, so it can outlive the
/// corpus it was trained on.
#[derive(Debug, Clone)]
pub struct TopicModel {
    num_topics: usize,
    eta: f64,
    vocabulary: Vec<String>,
    topic_word_counts: Vec<Vec<usize>>, // Topics x Words
    topic_counts: Vec<usize>,
}

impl TopicModel {
    pub fn num_topics(&self) -> usize {
        self.num_topics
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// Probability of every vocabulary term under `topic_id`
    pub fn topic_terms(&self, topic_id: usize) -> Vec<f64> {
        let eta_sum = self.eta * self.vocabulary.len() as f64;
        let denom = self.topic_counts[topic_id] as f64 + eta_sum;
        self.topic_word_counts[topic_id]
            .iter()
            .map(|&count| (count as f64 + self.eta) / denom)
            .collect()
    }

    /// The `n` most probable terms of `topic_id`, most probable first
    pub fn show_topic(&self, topic_id: usize, n: usize) -> Vec<(String, f64)> {
        let mut word_probs: Vec<(usize, f64)> =
            self.topic_terms(topic_id).into_iter().enumerate().collect();
        word_probs.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        word_probs.truncate(n);

        word_probs
            .into_iter()
            .map(|(word_id, prob)| (self.vocabulary[word_id].clone(), prob))
            .collect()
    }

    /// Human readable topics, e.g. `0.052*"KLIMA" + 0.031*"ZUKUNFT"`
    pub fn print_topics(&self, num_words: usize) -> Vec<(usize, String)> {
        (0..self.num_topics)
            .map(|topic_id| {
                let terms: Vec<String> = self
                    .show_topic(topic_id, num_words)
                    .iter()
                    .map(|(word, prob)| format!("{:.3}*\"{}\"", prob, word))
                    .collect();
                (topic_id, terms.join(" + "))
            })
            .collect()
    }

    /// Share of all corpus words currently assigned to each topic
    pub fn prevalence(&self) -> Vec<f64> {
        let total: usize = self.topic_counts.iter().sum();
        self.topic_counts
            .iter()
            .map(|&count| {
                if total == 0 {
                    0.0
                } else {
                    count as f64 / total as f64
                }
            })
            .collect()
    }

    pub fn topics(&self, num_words: usize) -> Vec<ModeledTopic> {
        let prevalence = self.prevalence();
        (0..self.num_topics)
            .map(|id| {
                ModeledTopic {
                    id,
                    words: self.show_topic(id, num_words),
                    prevalence: prevalence[id],
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_theme_corpus() -> Corpus {
        let mut docs = Vec::new();
        for _ in 0..20 {
            docs.push(vec!["KLIMA".to_string(), "ENERGIE".to_string(), "WIND".to_string()]);
            docs.push(vec!["RENTE".to_string(), "PFLEGE".to_string(), "ARBEIT".to_string()]);
        }
        Corpus::from_documents(&docs)
    }

    fn seeded(num_topics: usize, seed: u64) -> SimpleLDA {
        SimpleLDA::new(LDAConfig {
            num_topics,
            passes: 30,
            seed: Some(seed),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = LDAConfig::default();
        assert_eq!(config.num_topics, 3);
        assert_eq!(config.passes, 100);
        assert!((config.alpha() - 1.0 / 3.0).abs() < 1e-12);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_invalid_config() {
        let zero = LDAConfig {
            num_topics: 0,
            ..Default::default()
        };
        assert!(matches!(SimpleLDA::new(zero), Err(Error::InvalidTopicCount)));

        let negative = LDAConfig {
            eta: Some(-1.0),
            ..Default::default()
        };
        assert!(matches!(SimpleLDA::new(negative), Err(Error::InvalidParameter(_))));

        let not_a_number = LDAConfig {
            alpha: Some(f64::NAN),
            ..Default::default()
        };
        assert!(matches!(SimpleLDA::new(not_a_number), Err(Error::InvalidParameter(_))));

        let infinite = LDAConfig {
            eta: Some(f64::INFINITY),
            ..Default::default()
        };
        assert!(matches!(SimpleLDA::new(infinite), Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn test_empty_corpus_fails_fast() {
        let lda = seeded(3, 1);
        let corpus = Corpus::from_tokens(&[]);
        assert!(matches!(lda.fit(&corpus), Err(Error::EmptyCorpus)));
    }

    #[test]
    fn test_topic_distributions_are_normalized() {
        let model = seeded(3, 7).fit(&two_theme_corpus()).unwrap();

        assert_eq!(model.num_topics(), 3);
        for topic in 0..model.num_topics() {
            let sum: f64 = model.topic_terms(topic).iter().sum();
            assert!((sum - 1.0).abs() < 1e-9);
        }
        let prevalence: f64 = model.prevalence().iter().sum();
        assert!((prevalence - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_show_topic_is_sorted_and_truncated() {
        let model = seeded(2, 3).fit(&two_theme_corpus()).unwrap();

        let top = model.show_topic(0, 4);
        assert_eq!(top.len(), 4);
        assert!(top.windows(2).all(|w| w[0].1 >= w[1].1));

        // Asking for more terms than the vocabulary holds returns all of them
        assert_eq!(model.show_topic(1, 20).len(), 6);
    }

    #[test]
    fn test_print_topics_format() {
        let model = seeded(3, 11).fit(&two_theme_corpus()).unwrap();
        let printed = model.print_topics(2);

        assert_eq!(printed.len(), 3);
        for (i, (topic_id, line)) in printed.iter().enumerate() {
            assert_eq!(*topic_id, i);
            assert_eq!(line.matches(" + ").count(), 1);
            assert!(line.contains("*\""));
        }
    }

    #[test]
    fn test_seed_makes_fit_reproducible() {
        let corpus = two_theme_corpus();
        let a = seeded(3, 42).fit(&corpus).unwrap();
        let b = seeded(3, 42).fit(&corpus).unwrap();

        for topic in 0..3 {
            assert_eq!(a.show_topic(topic, 6), b.show_topic(topic, 6));
        }
    }

    #[test]
    fn test_topics_summary() {
        let model = seeded(2, 5).fit(&two_theme_corpus()).unwrap();
        let topics = model.topics(3);

        assert_eq!(topics.len(), 2);
        assert_eq!(topics[1].id, 1);
        assert_eq!(topics[0].words.len(), 3);
        assert!(topics.iter().all(|t| t.prevalence > 0.0 && t.prevalence < 1.0));
    }

    #[test]
    fn test_two_themes_are_separated() {
        let climate: Vec<&str> = vec!["KLIMA", "ENERGIE", "WIND"];
        let social: Vec<&str> = vec!["RENTE", "PFLEGE", "ARBEIT"];
        let corpus = two_theme_corpus();

        for seed in [1, 2, 3, 4, 5] {
            let model = seeded(2, seed).fit(&corpus).unwrap();
            for topic in 0..2 {
                let top: Vec<String> = model.show_topic(topic, 3).into_iter().map(|(w, _)| w).collect();
                let all_climate = top.iter().all(|w| climate.contains(&w.as_str()));
                let all_social = top.iter().all(|w| social.contains(&w.as_str()));
                assert!(all_climate || all_social, "seed {seed}: topic {topic} mixes themes: {top:?}");
            }
        }
    }
}
