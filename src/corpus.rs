use include_dir::{include_dir, Dir};
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::ConfigurationError;

static CORPORA_DIR: Dir = include_dir!("src/corpora");

/// A named collection of words for word-stream sessions.
#[derive(Deserialize, Clone, Debug)]
pub struct WordCorpus {
    pub name: String,
    pub words: Vec<String>,
}

/// A named collection of passages for fixed-passage sessions.
#[derive(Deserialize, Clone, Debug)]
pub struct PassageCorpus {
    pub name: String,
    pub passages: Vec<String>,
}

impl WordCorpus {
    pub fn load(name: &str) -> Result<Self, ConfigurationError> {
        let corpus: WordCorpus = read_corpus(&format!("{name}.words.json"), name)?;
        if corpus.words.is_empty() {
            return Err(ConfigurationError::EmptyCorpus {
                name: name.to_string(),
            });
        }
        Ok(corpus)
    }
}

impl PassageCorpus {
    pub fn load(name: &str) -> Result<Self, ConfigurationError> {
        let corpus: PassageCorpus = read_corpus(&format!("{name}.passages.json"), name)?;
        if corpus.passages.is_empty() {
            return Err(ConfigurationError::EmptyCorpus {
                name: name.to_string(),
            });
        }
        Ok(corpus)
    }
}

fn read_corpus<T: DeserializeOwned>(file_name: &str, name: &str) -> Result<T, ConfigurationError> {
    let file = CORPORA_DIR
        .get_file(file_name)
        .ok_or_else(|| ConfigurationError::CorpusNotFound {
            name: name.to_string(),
        })?;
    let text = file
        .contents_utf8()
        .ok_or_else(|| ConfigurationError::MalformedCorpus {
            name: name.to_string(),
        })?;
    serde_json::from_str(text).map_err(|_| ConfigurationError::MalformedCorpus {
        name: name.to_string(),
    })
}

/// Draws `count` words, each independently and uniformly at random.
/// No memoization: call again for the next session.
pub fn generate_word_stream<R: Rng>(
    corpus: &WordCorpus,
    count: usize,
    rng: &mut R,
) -> Result<Vec<String>, ConfigurationError> {
    if corpus.words.is_empty() {
        return Err(ConfigurationError::EmptyCorpus {
            name: corpus.name.clone(),
        });
    }
    Ok((0..count)
        .map(|_| corpus.words[rng.gen_range(0..corpus.words.len())].clone())
        .collect())
}

/// Draws one passage uniformly at random.
pub fn select_passage<R: Rng>(
    corpus: &PassageCorpus,
    rng: &mut R,
) -> Result<String, ConfigurationError> {
    if corpus.passages.is_empty() {
        return Err(ConfigurationError::EmptyCorpus {
            name: corpus.name.clone(),
        });
    }
    Ok(corpus.passages[rng.gen_range(0..corpus.passages.len())].clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_load_halloween_words() {
        let corpus = WordCorpus::load("halloween").unwrap();
        assert_eq!(corpus.name, "halloween");
        assert!(!corpus.words.is_empty());
        assert!(corpus.words.contains(&"ghost".to_string()));
    }

    #[test]
    fn test_load_halloween_passages() {
        let corpus = PassageCorpus::load("halloween").unwrap();
        assert_eq!(corpus.name, "halloween");
        assert!(!corpus.passages.is_empty());
    }

    #[test]
    fn test_load_unknown_corpus() {
        assert_matches!(
            WordCorpus::load("nonexistent"),
            Err(ConfigurationError::CorpusNotFound { .. })
        );
        assert_matches!(
            PassageCorpus::load("nonexistent"),
            Err(ConfigurationError::CorpusNotFound { .. })
        );
    }

    #[test]
    fn test_word_stream_length_and_membership() {
        let corpus = WordCorpus::load("halloween").unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let words = generate_word_stream(&corpus, 25, &mut rng).unwrap();
        assert_eq!(words.len(), 25);
        assert!(words.iter().all(|w| corpus.words.contains(w)));
    }

    #[test]
    fn test_word_stream_is_reproducible_under_a_seed() {
        let corpus = WordCorpus::load("halloween").unwrap();
        let first = generate_word_stream(&corpus, 10, &mut StdRng::seed_from_u64(42)).unwrap();
        let second = generate_word_stream(&corpus, 10, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_single_word_corpus_repeats() {
        let corpus = WordCorpus {
            name: "test".into(),
            words: vec!["ghost".into()],
        };
        let mut rng = StdRng::seed_from_u64(0);
        let words = generate_word_stream(&corpus, 3, &mut rng).unwrap();
        assert_eq!(words, vec!["ghost", "ghost", "ghost"]);
    }

    #[test]
    fn test_empty_word_corpus_is_a_configuration_error() {
        let corpus = WordCorpus {
            name: "empty".into(),
            words: vec![],
        };
        let mut rng = StdRng::seed_from_u64(0);
        assert_matches!(
            generate_word_stream(&corpus, 5, &mut rng),
            Err(ConfigurationError::EmptyCorpus { .. })
        );
    }

    #[test]
    fn test_select_passage_comes_from_corpus() {
        let corpus = PassageCorpus::load("halloween").unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let passage = select_passage(&corpus, &mut rng).unwrap();
        assert!(corpus.passages.contains(&passage));
    }

    #[test]
    fn test_empty_passage_corpus_is_a_configuration_error() {
        let corpus = PassageCorpus {
            name: "empty".into(),
            passages: vec![],
        };
        let mut rng = StdRng::seed_from_u64(0);
        assert_matches!(
            select_passage(&corpus, &mut rng),
            Err(ConfigurationError::EmptyCorpus { .. })
        );
    }
}
