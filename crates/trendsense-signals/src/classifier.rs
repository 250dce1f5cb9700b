//! Three-way sentiment labelling over a swappable polarity scorer.

use std::sync::Arc;

use trendsense_core::{Classification, ScorerKind, SentimentLabel};

use crate::scorer::{LexiconScorer, PolarityScorer, VaderScorer};

/// Compound scores at or above this are positive.
pub const POSITIVE_THRESHOLD: f64 = 0.05;
/// Compound scores at or below this are negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

/// Map a compound score onto a label. Non-finite scores are neutral.
#[must_use]
pub fn label_for_score(compound: f64) -> SentimentLabel {
    if compound >= POSITIVE_THRESHOLD {
        SentimentLabel::Positive
    } else if compound <= NEGATIVE_THRESHOLD {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}

#[derive(Clone)]
pub struct SentimentClassifier {
    scorer: Arc<dyn PolarityScorer>,
}

impl SentimentClassifier {
    #[must_use]
    pub fn new(scorer: Arc<dyn PolarityScorer>) -> Self {
        Self { scorer }
    }

    #[must_use]
    pub fn for_kind(kind: ScorerKind) -> Self {
        match kind {
            ScorerKind::Vader => Self::new(Arc::new(VaderScorer::new())),
            ScorerKind::Lexicon => Self::new(Arc::new(LexiconScorer)),
        }
    }

    /// Classify `text`. Blank text is neutral with a zero score.
    #[must_use]
    pub fn classify(&self, text: &str) -> Classification {
        if text.trim().is_empty() {
            return Classification::NEUTRAL;
        }
        let compound = self.scorer.compound(text);
        if !compound.is_finite() {
            return Classification::NEUTRAL;
        }
        Classification {
            label: label_for_score(compound),
            compound_score: compound,
        }
    }
}

impl Default for SentimentClassifier {
    fn default() -> Self {
        Self::for_kind(ScorerKind::Vader)
    }
}

impl std::fmt::Debug for SentimentClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentimentClassifier").finish_non_exhaustive()
    }
}
