//! Folding classified posts into a [`TrendReport`].

use std::collections::{BTreeMap, BTreeSet};

use trendsense_core::{Platform, SentimentLabel, SentimentTally, SourceStatus, TrendReport};

use crate::classifier::SentimentClassifier;
use crate::sources::FetchBatch;
use crate::topics::extract_topics;

/// Overall verdict from per-platform tallies: the larger of the summed
/// positive and negative counts wins, ties are neutral.
#[must_use]
pub fn summarize(breakdown: &BTreeMap<Platform, SentimentTally>) -> SentimentLabel {
    let total = breakdown
        .values()
        .fold(SentimentTally::default(), |acc, t| acc.merge(*t));
    match total.positive.cmp(&total.negative) {
        std::cmp::Ordering::Greater => SentimentLabel::Positive,
        std::cmp::Ordering::Less => SentimentLabel::Negative,
        std::cmp::Ordering::Equal => SentimentLabel::Neutral,
    }
}

/// Accumulates settled fetch batches for one aggregate call.
///
/// Every requested platform starts with a zero tally and a `timed_out`
/// status; absorbing a batch replaces the status. The result does not depend
/// on the order batches are absorbed in.
#[derive(Debug)]
pub struct ReportBuilder<'a> {
    classifier: &'a SentimentClassifier,
    breakdown: BTreeMap<Platform, SentimentTally>,
    status: BTreeMap<Platform, SourceStatus>,
    topics: BTreeSet<String>,
    volume: u64,
}

impl<'a> ReportBuilder<'a> {
    #[must_use]
    pub fn new(classifier: &'a SentimentClassifier, requested: &[Platform]) -> Self {
        Self {
            classifier,
            breakdown: requested
                .iter()
                .map(|p| (*p, SentimentTally::default()))
                .collect(),
            status: requested
                .iter()
                .map(|p| (*p, SourceStatus::TimedOut))
                .collect(),
            topics: BTreeSet::new(),
            volume: 0,
        }
    }

    /// Classify and tally every post of `batch`, settling `platform`.
    ///
    /// Posts are tallied under their own platform.
    pub fn absorb(&mut self, platform: Platform, batch: FetchBatch) {
        self.status.insert(platform, batch.status);
        self.breakdown.entry(platform).or_default();

        for post in batch.posts {
            let label = self.classifier.classify(&post.text).label;
            let tally = self.breakdown.entry(post.platform).or_default();
            *tally = tally.record(label);
            self.topics.extend(extract_topics(&post.text));
            self.volume += 1;
        }
    }

    #[must_use]
    pub fn finish(self) -> TrendReport {
        TrendReport {
            overall_sentiment: summarize(&self.breakdown),
            trending_topics: self.topics,
            volume: self.volume,
            sentiment_breakdown: self.breakdown,
            source_status: self.status,
        }
    }
}
