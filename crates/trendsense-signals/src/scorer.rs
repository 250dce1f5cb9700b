//! Raw polarity scorers behind the sentiment classifier.

use vader_sentiment::SentimentIntensityAnalyzer;

/// Produces a compound polarity score in `[-1.0, 1.0]` for a text.
///
/// Implementations must be deterministic: the same text always yields the
/// same score.
pub trait PolarityScorer: Send + Sync {
    fn compound(&self, text: &str) -> f64;
}

/// VADER (Valence Aware Dictionary and sEntiment Reasoner), tuned for
/// social-media text: handles emphasis, negation, caps and emoji.
pub struct VaderScorer {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl VaderScorer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }
}

impl Default for VaderScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl PolarityScorer for VaderScorer {
    fn compound(&self, text: &str) -> f64 {
        self.analyzer
            .polarity_scores(text)
            .get("compound")
            .copied()
            .unwrap_or(0.0)
    }
}

/// Product-review word weights.
///
/// Keys are lowercase single words. Values in `(0.0, 1.0]` are positive,
/// in `[-1.0, 0.0)` are negative. The final score is clamped to `[-1.0, 1.0]`.
pub(crate) const LEXICON: &[(&str, f64)] = &[
    // Positive signals
    ("love", 0.5),
    ("loved", 0.5),
    ("loving", 0.5),
    ("great", 0.4),
    ("good", 0.3),
    ("excellent", 0.5),
    ("amazing", 0.5),
    ("awesome", 0.5),
    ("best", 0.5),
    ("recommend", 0.4),
    ("obsessed", 0.4),
    ("musthave", 0.4),
    ("worth", 0.3),
    ("quality", 0.3),
    ("cool", 0.3),
    ("favorite", 0.4),
    ("perfect", 0.5),
    ("viral", 0.2),
    ("win", 0.4),
    ("wow", 0.3),
    // Negative signals
    ("bad", -0.4),
    ("terrible", -0.6),
    ("awful", -0.6),
    ("worst", -0.6),
    ("hate", -0.6),
    ("broken", -0.5),
    ("broke", -0.4),
    ("refund", -0.4),
    ("return", -0.2),
    ("returned", -0.3),
    ("scam", -0.7),
    ("overpriced", -0.4),
    ("recall", -0.7),
    ("defective", -0.6),
    ("disappointed", -0.5),
    ("disappointing", -0.5),
    ("waste", -0.5),
    ("cheap", -0.2),
    ("problem", -0.3),
    ("fail", -0.4),
];

/// Keyword scorer over [`LEXICON`].
///
/// Splits text into lowercase words, sums matching weights, and clamps the
/// result to `[-1.0, 1.0]`. Returns `0.0` for empty or unknown text.
#[derive(Debug, Default, Clone, Copy)]
pub struct LexiconScorer;

impl PolarityScorer for LexiconScorer {
    fn compound(&self, text: &str) -> f64 {
        lexicon_score(text)
    }
}

#[must_use]
pub fn lexicon_score(text: &str) -> f64 {
    let mut score = 0.0_f64;
    for word in text.split_whitespace() {
        let w = word
            .trim_matches(|c: char| !c.is_alphabetic())
            .to_lowercase();
        if let Some(&(_, weight)) = LEXICON.iter().find(|(lex_word, _)| *lex_word == w) {
            score += weight;
        }
    }
    score.clamp(-1.0, 1.0)
}
