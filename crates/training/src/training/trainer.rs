//! BPE merge engine.
//!
//! The trainer is a small state machine: it starts `Idle`, enters `Training`
//! once a corpus is loaded and indexed, and ends in a terminal
//! `Stopped(reason)`. Each [`BpeTrainer::step`] performs one merge, so callers
//! can observe progress or abort between merges.

use super::pair_index::{PairIndex, PairIndexOptions};
use super::sequence::TokenSequence;
use ahash::AHashSet;
use bytemerge_core::{
    byte_sequence, MergeCandidate, MergeRule, MergeRules, Pair, PairPriorityQueue, Result,
    TokenizerError, Vocabulary, BYTE_VOCAB_SIZE,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest number of merges before token ids leave `u32`.
const MAX_MERGES: usize = u32::MAX as usize - BYTE_VOCAB_SIZE;

/// Configuration for BPE training.
///
/// At least one stopping criterion must be set. Without a vocabulary size,
/// training runs until no pair reaches `min_frequency`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Target vocabulary size, byte entries included (must exceed 256)
    pub vocab_size: Option<usize>,
    /// Minimum count for a pair to be merged (defaults to 1)
    pub min_frequency: Option<u64>,
    /// Whether to build the initial pair index in parallel
    pub parallel: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            vocab_size: None,
            min_frequency: None,
            parallel: true,
        }
    }
}

impl TrainingConfig {
    /// Create a configuration builder.
    pub fn builder() -> TrainingConfigBuilder {
        TrainingConfigBuilder::new()
    }

    /// Check the configuration before training starts.
    pub fn validate(&self) -> Result<()> {
        if self.vocab_size.is_none() && self.min_frequency.is_none() {
            return Err(TokenizerError::InvalidConfiguration(
                "no stopping criterion: set a vocabulary size, a minimum frequency, or both"
                    .to_string(),
            ));
        }
        if let Some(size) = self.vocab_size {
            if size <= BYTE_VOCAB_SIZE {
                return Err(TokenizerError::InvalidConfiguration(format!(
                    "vocabulary size must be greater than {BYTE_VOCAB_SIZE}, got {size}"
                )));
            }
        }
        if self.min_frequency == Some(0) {
            return Err(TokenizerError::InvalidConfiguration(
                "minimum frequency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// The frequency floor actually applied.
    pub fn effective_min_frequency(&self) -> u64 {
        self.min_frequency.unwrap_or(1)
    }

    /// Number of merges the vocabulary size asks for, if one is set.
    pub fn target_merges(&self) -> Option<usize> {
        self.vocab_size
            .map(|size| size.saturating_sub(BYTE_VOCAB_SIZE))
    }
}

/// Builder for [`TrainingConfig`].
#[derive(Debug, Clone, Default)]
pub struct TrainingConfigBuilder {
    config: TrainingConfig,
}

impl TrainingConfigBuilder {
    /// Create a builder with no stopping criterion set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target vocabulary size.
    pub fn vocab_size(mut self, size: usize) -> Self {
        self.config.vocab_size = Some(size);
        self
    }

    /// Set the minimum frequency for merges.
    pub fn min_frequency(mut self, freq: u64) -> Self {
        self.config.min_frequency = Some(freq);
        self
    }

    /// Enable or disable the parallel index build.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    /// Validate and build the configuration.
    pub fn build(self) -> Result<TrainingConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Why training stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StopReason {
    /// The vocabulary reached the configured size
    TargetReached,
    /// The best remaining pair occurs fewer times than the minimum frequency
    BelowMinFrequency,
    /// No adjacent pair is left
    Exhausted,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StopReason::TargetReached => "target vocabulary size reached",
            StopReason::BelowMinFrequency => "best pair below minimum frequency",
            StopReason::Exhausted => "no pairs left to merge",
        })
    }
}

/// Lifecycle of a trainer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainerState {
    /// Configured, no corpus loaded yet
    Idle,
    /// Corpus indexed, merges in progress
    Training,
    /// Terminal
    Stopped(StopReason),
}

/// One completed merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeStep {
    /// The rule recorded by this step
    pub rule: MergeRule,
    /// Count of the pair when it was selected, overlapping occurrences included
    pub count: u64,
    /// Number of occurrences actually replaced
    pub replaced: u64,
}

/// Result of a single [`BpeTrainer::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// A merge was applied
    Merged(MergeStep),
    /// Training has stopped; nothing was changed
    Stopped(StopReason),
}

/// Everything a training run produced.
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    /// Byte entries plus one entry per merge
    pub vocab: Vocabulary,
    /// Merge rules in rank order
    pub merges: MergeRules,
    /// The corpus after all merges
    pub tokens: Vec<u32>,
    /// `None` if the caller finished before training stopped
    pub stop_reason: Option<StopReason>,
    /// Configuration used
    pub config: TrainingConfig,
    /// Length of the corpus in bytes
    pub corpus_len: usize,
}

/// BPE trainer.
///
/// Owns the token sequence and pair index exclusively; the vocabulary and
/// merge table only grow.
#[derive(Debug)]
pub struct BpeTrainer {
    config: TrainingConfig,
    state: TrainerState,
    sequence: TokenSequence,
    index: PairIndex,
    queue: PairPriorityQueue,
    vocab: Vocabulary,
    merges: MergeRules,
    corpus_len: usize,
}

impl BpeTrainer {
    /// Create an idle trainer with a validated configuration.
    pub fn new(config: TrainingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: TrainerState::Idle,
            sequence: TokenSequence::default(),
            index: PairIndex::default(),
            queue: PairPriorityQueue::new(),
            vocab: Vocabulary::seed(),
            merges: MergeRules::new(),
            corpus_len: 0,
        })
    }

    /// Train on `corpus` until a stopping criterion is met.
    pub fn train(config: TrainingConfig, corpus: &[u8]) -> Result<TrainingOutcome> {
        let mut trainer = Self::new(config)?;
        trainer.load_corpus(corpus)?;
        trainer.run()?;
        Ok(trainer.finish())
    }

    /// Sequence the corpus and bulk-build the pair index.
    ///
    /// Moves the trainer from `Idle` to `Training`. A corpus shorter than two
    /// bytes is accepted; the first step then stops with zero merges.
    pub fn load_corpus(&mut self, corpus: &[u8]) -> Result<()> {
        if self.state != TrainerState::Idle {
            return Err(TokenizerError::Training(format!(
                "corpus can only be loaded once (trainer is {:?})",
                self.state
            )));
        }

        log::info!(
            "Training on {} bytes (vocab_size: {:?}, min_frequency: {})",
            corpus.len(),
            self.config.vocab_size,
            self.config.effective_min_frequency()
        );
        if corpus.len() < 2 {
            log::info!("Corpus has fewer than two bytes; there is nothing to merge");
        }

        let tokens = byte_sequence(corpus);
        let options = PairIndexOptions {
            parallel: self.config.parallel,
        };
        self.index = PairIndex::build_with_options(&tokens, options);
        self.sequence = TokenSequence::from_tokens(&tokens);
        self.corpus_len = corpus.len();

        self.queue = PairPriorityQueue::with_capacity(self.index.len());
        self.queue.extend(
            self.index
                .counts()
                .map(|(pair, count)| MergeCandidate::new(pair, count)),
        );

        let expected = self
            .config
            .target_merges()
            .unwrap_or(usize::MAX)
            .min(tokens.len().saturating_sub(1));
        self.merges = MergeRules::with_capacity(expected);
        self.vocab = Vocabulary::with_capacity(BYTE_VOCAB_SIZE + expected);

        log::info!("Indexed {} distinct pairs", self.index.len());
        self.state = TrainerState::Training;
        Ok(())
    }

    /// Perform one merge, or report why training has stopped.
    ///
    /// A step either completes or fails without changing any state.
    pub fn step(&mut self) -> Result<StepOutcome> {
        match self.state {
            TrainerState::Idle => {
                return Err(TokenizerError::Training(
                    "no corpus loaded; call load_corpus first".to_string(),
                ))
            }
            TrainerState::Stopped(reason) => return Ok(StepOutcome::Stopped(reason)),
            TrainerState::Training => {}
        }

        if self
            .config
            .vocab_size
            .is_some_and(|size| self.vocab.len() >= size)
        {
            return Ok(self.stop(StopReason::TargetReached));
        }

        let index = &self.index;
        let Some(candidate) = self.queue.pop_live(|pair| index.count(pair)) else {
            return Ok(self.stop(StopReason::Exhausted));
        };

        if candidate.count < self.config.effective_min_frequency() {
            self.queue.push(candidate);
            return Ok(self.stop(StopReason::BelowMinFrequency));
        }

        if self.merges.len() >= MAX_MERGES {
            self.queue.push(candidate);
            return Err(TokenizerError::VocabularyOverflow {
                max: u32::MAX as usize,
            });
        }

        let pair = candidate.pair;
        let rule = match self.merges.push(pair, self.merges.next_id()) {
            Ok(rule) => rule,
            Err(err) => {
                self.queue.push(candidate);
                return Err(err);
            }
        };
        // Operands were checked by the rule table, so this cannot fail.
        let id = self.vocab.add_merge_entry(pair.0, pair.1)?;
        debug_assert_eq!(id, rule.new_id);

        let replaced = self.apply_merge(pair, rule.new_id);

        log::debug!(
            "merge {}: ({}, {}) -> {} (count {})",
            rule.rank,
            pair.0,
            pair.1,
            rule.new_id,
            candidate.count
        );
        self.log_progress(rule.rank as usize + 1);

        Ok(StepOutcome::Merged(MergeStep {
            rule,
            count: candidate.count,
            replaced,
        }))
    }

    /// Step until training stops.
    pub fn run(&mut self) -> Result<StopReason> {
        loop {
            if let StepOutcome::Stopped(reason) = self.step()? {
                return Ok(reason);
            }
        }
    }

    /// Consume the trainer and hand out what it built.
    pub fn finish(self) -> TrainingOutcome {
        let stop_reason = match self.state {
            TrainerState::Stopped(reason) => Some(reason),
            _ => None,
        };
        TrainingOutcome {
            tokens: self.sequence.to_vec(),
            vocab: self.vocab,
            merges: self.merges,
            stop_reason,
            config: self.config,
            corpus_len: self.corpus_len,
        }
    }

    /// Current state.
    pub fn state(&self) -> TrainerState {
        self.state
    }

    /// Configuration in use.
    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Vocabulary built so far.
    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    /// Merge rules recorded so far.
    pub fn merges(&self) -> &MergeRules {
        &self.merges
    }

    /// The current token sequence.
    pub fn tokens(&self) -> Vec<u32> {
        self.sequence.to_vec()
    }

    /// Length of the current token sequence.
    pub fn token_count(&self) -> usize {
        self.sequence.len()
    }

    /// Current count of a pair in the token sequence.
    pub fn pair_count(&self, pair: Pair) -> u64 {
        self.index.count(pair)
    }

    /// Rewrite every occurrence of `pair` and patch the index around it.
    ///
    /// Occurrences are visited left to right, so overlapping runs merge
    /// greedily from the left. Returns the number of replacements.
    fn apply_merge(&mut self, pair: Pair, new_id: u32) -> u64 {
        let positions = self.index.take_positions(pair);
        let mut touched: AHashSet<Pair> = AHashSet::new();
        let mut replaced = 0u64;

        for pos in positions {
            // Consumed by an overlapping occurrence to its left.
            if self.sequence.pair_at(pos) != Some(pair) {
                continue;
            }
            let Some(right) = self.sequence.next_of(pos) else {
                continue;
            };
            let prev = self.sequence.prev_of(pos);
            let after = self.sequence.next_of(right);

            let prev_token = prev.and_then(|p| self.sequence.token_at(p));
            let after_token = after.and_then(|a| self.sequence.token_at(a));

            if let (Some(p), Some(token)) = (prev, prev_token) {
                let old = (token, pair.0);
                self.index.remove(old, p);
                touched.insert(old);
            }
            if let Some(token) = after_token {
                let old = (pair.1, token);
                self.index.remove(old, right);
                touched.insert(old);
            }

            self.sequence.merge_at(pos, new_id);
            replaced += 1;

            if let (Some(p), Some(token)) = (prev, prev_token) {
                let new = (token, new_id);
                self.index.add(new, p);
                touched.insert(new);
            }
            if let Some(token) = after_token {
                let new = (new_id, token);
                self.index.add(new, pos);
                touched.insert(new);
            }
        }

        for pair in touched {
            self.queue.update(pair, self.index.count(pair));
        }
        debug_assert_eq!(self.index.count(pair), 0);

        replaced
    }

    fn stop(&mut self, reason: StopReason) -> StepOutcome {
        self.state = TrainerState::Stopped(reason);
        log::info!(
            "Training stopped after {} merges: {} ({} tokens left from {} bytes)",
            self.merges.len(),
            reason,
            self.sequence.len(),
            self.corpus_len
        );
        StepOutcome::Stopped(reason)
    }

    fn log_progress(&self, merges_done: usize) {
        let every = match self.config.target_merges() {
            Some(total) => (total / 10).max(1),
            None => 1000,
        };
        if merges_done % every == 0 {
            log::info!(
                "Merged {} pairs, vocabulary size {}, {} tokens",
                merges_done,
                self.vocab.len(),
                self.sequence.len()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::counter::{merge_pair_in_place, PairCounter};
    use ahash::AHashMap;
    use proptest::prelude::*;

    fn config(vocab_size: Option<usize>, min_frequency: Option<u64>) -> TrainingConfig {
        TrainingConfig {
            vocab_size,
            min_frequency,
            parallel: false,
        }
    }

    fn pairs(merges: &MergeRules) -> Vec<(Pair, u32)> {
        merges.iter().map(|r| (r.pair, r.new_id)).collect()
    }

    fn sorted(counts: AHashMap<Pair, u64>) -> Vec<(Pair, u64)> {
        let mut counts: Vec<_> = counts.into_iter().collect();
        counts.sort_unstable();
        counts
    }

    /// Full-recount BPE with the same selection and stopping rules.
    fn train_naive(config: &TrainingConfig, corpus: &[u8]) -> (Vec<(Pair, u32)>, Vec<u32>) {
        let mut tokens = byte_sequence(corpus);
        let mut merges = Vec::new();
        let mut next_id = BYTE_VOCAB_SIZE as u32;

        loop {
            if config
                .vocab_size
                .is_some_and(|size| next_id as usize >= size)
            {
                break;
            }
            let Some((pair, count)) = PairCounter::new(&tokens).most_frequent() else {
                break;
            };
            if count < config.effective_min_frequency() {
                break;
            }
            merge_pair_in_place(&mut tokens, pair, next_id);
            merges.push((pair, next_id));
            next_id += 1;
        }

        (merges, tokens)
    }

    #[test]
    fn test_config_validation() {
        assert!(matches!(
            TrainingConfig::default().validate(),
            Err(TokenizerError::InvalidConfiguration(_))
        ));
        assert!(TrainingConfig::builder().vocab_size(256).build().is_err());
        assert!(TrainingConfig::builder().vocab_size(257).build().is_ok());
        assert!(TrainingConfig::builder().min_frequency(0).build().is_err());

        let config = TrainingConfig::builder().min_frequency(3).build().unwrap();
        assert_eq!(config.effective_min_frequency(), 3);
        assert_eq!(config.target_merges(), None);

        let config = TrainingConfig::builder().vocab_size(300).build().unwrap();
        assert_eq!(config.effective_min_frequency(), 1);
        assert_eq!(config.target_merges(), Some(44));
        assert!(config.parallel);
    }

    #[test]
    fn test_config_from_json() {
        let config: TrainingConfig = serde_json::from_str(r#"{"vocab_size": 1000}"#).unwrap();
        assert_eq!(config.vocab_size, Some(1000));
        assert_eq!(config.min_frequency, None);
        assert!(config.parallel);
    }

    #[test]
    fn test_state_machine() {
        let mut trainer = BpeTrainer::new(config(Some(258), None)).unwrap();
        assert_eq!(trainer.state(), TrainerState::Idle);
        assert!(matches!(trainer.step(), Err(TokenizerError::Training(_))));

        trainer.load_corpus(b"aaabdaaabac").unwrap();
        assert_eq!(trainer.state(), TrainerState::Training);
        assert!(trainer.load_corpus(b"again").is_err());

        assert!(matches!(trainer.step().unwrap(), StepOutcome::Merged(_)));
        assert!(matches!(trainer.step().unwrap(), StepOutcome::Merged(_)));
        let stopped = StepOutcome::Stopped(StopReason::TargetReached);
        assert_eq!(trainer.step().unwrap(), stopped);
        assert_eq!(trainer.step().unwrap(), stopped);
        assert_eq!(
            trainer.state(),
            TrainerState::Stopped(StopReason::TargetReached)
        );
        assert_eq!(trainer.merges().len(), 2);
    }

    #[test]
    fn test_rejects_invalid_config() {
        assert!(matches!(
            BpeTrainer::new(config(None, None)),
            Err(TokenizerError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_classic_example() {
        let mut trainer = BpeTrainer::new(config(Some(258), None)).unwrap();
        trainer.load_corpus(b"aaabdaaabac").unwrap();

        let StepOutcome::Merged(first) = trainer.step().unwrap() else {
            panic!("expected a merge");
        };
        assert_eq!(first.rule.pair, (97, 97));
        assert_eq!(first.rule.new_id, 256);
        assert_eq!(first.count, 4);
        assert_eq!(first.replaced, 2);

        // (97, 98) and (256, 97) both occur twice now.
        assert_eq!(trainer.pair_count((97, 98)), 2);
        assert_eq!(trainer.pair_count((256, 97)), 2);

        let StepOutcome::Merged(second) = trainer.step().unwrap() else {
            panic!("expected a merge");
        };
        assert_eq!(second.rule.pair, (97, 98));
        assert_eq!(second.rule.new_id, 257);
        assert_eq!(second.count, 2);

        let outcome = {
            trainer.run().unwrap();
            trainer.finish()
        };
        assert_eq!(outcome.stop_reason, Some(StopReason::TargetReached));
        assert_eq!(outcome.tokens, vec![256, 257, 100, 256, 257, 97, 99]);
        assert_eq!(outcome.vocab.len(), 258);
        assert_eq!(outcome.vocab.resolve(257).unwrap(), b"ab");
        assert_eq!(outcome.corpus_len, 11);
    }

    #[test]
    fn test_empty_and_tiny_corpora() {
        for corpus in [&b""[..], &b"x"[..]] {
            let outcome = BpeTrainer::train(config(Some(300), None), corpus).unwrap();
            assert_eq!(outcome.stop_reason, Some(StopReason::Exhausted));
            assert!(outcome.merges.is_empty());
            assert_eq!(outcome.vocab.len(), 256);
            assert_eq!(outcome.tokens, byte_sequence(corpus));
        }
    }

    #[test]
    fn test_repeated_byte_collapses() {
        let corpus = vec![b'a'; 1000];
        let outcome = BpeTrainer::train(config(Some(300), None), &corpus).unwrap();

        assert_eq!(outcome.merges.len(), 14);
        assert_eq!(outcome.stop_reason, Some(StopReason::Exhausted));
        assert_eq!(outcome.tokens, vec![269]);
        assert_eq!(outcome.merges.rule(0).map(|r| r.pair), Some((97, 97)));
        assert_eq!(outcome.merges.rule(1).map(|r| r.pair), Some((256, 256)));
        assert_eq!(outcome.vocab.resolve(269).unwrap(), corpus.as_slice());
    }

    #[test]
    fn test_overlapping_counts() {
        let outcome = BpeTrainer::train(config(None, Some(1)), b"aaaa").unwrap();
        assert_eq!(pairs(&outcome.merges), vec![((97, 97), 256), ((256, 256), 257)]);
        assert_eq!(outcome.tokens, vec![257]);
        assert_eq!(outcome.stop_reason, Some(StopReason::Exhausted));
    }

    #[test]
    fn test_min_frequency_stop() {
        let outcome =
            BpeTrainer::train(config(None, Some(2)), b"hello world hello world").unwrap();

        assert_eq!(outcome.stop_reason, Some(StopReason::BelowMinFrequency));
        assert_eq!(
            pairs(&outcome.merges),
            vec![
                ((32, 119), 256),
                ((101, 108), 257),
                ((104, 257), 258),
                ((108, 100), 259),
                ((108, 111), 260),
                ((111, 114), 261),
                ((256, 261), 262),
                ((258, 260), 263),
                ((262, 259), 264),
                ((263, 264), 265),
            ]
        );
        assert_eq!(outcome.tokens, vec![265, 32, 265]);
        assert_eq!(
            outcome.vocab.resolve(265).unwrap(),
            b"hello world".as_slice()
        );
    }

    #[test]
    fn test_tie_break() {
        let outcome = BpeTrainer::train(config(Some(257), None), b"abcabcxyxy").unwrap();
        assert_eq!(pairs(&outcome.merges), vec![((97, 98), 256)]);
        assert_eq!(outcome.tokens, vec![256, 99, 256, 99, 120, 121, 120, 121]);
    }

    #[test]
    fn test_parallel_index_gives_same_result() {
        let corpus: Vec<u8> = (0..200_000u32)
            .map(|i| b"the quick brown fox "[(i % 20) as usize] ^ ((i / 997) % 3) as u8)
            .collect();
        let sequential = BpeTrainer::train(config(Some(400), None), &corpus).unwrap();
        let parallel = BpeTrainer::train(
            TrainingConfig {
                parallel: true,
                ..config(Some(400), None)
            },
            &corpus,
        )
        .unwrap();

        assert_eq!(sequential.merges, parallel.merges);
        assert_eq!(sequential.tokens, parallel.tokens);
    }

    proptest! {
        #[test]
        fn prop_index_matches_recount_after_every_step(
            corpus in proptest::collection::vec(0u8..4, 0..120),
        ) {
            let mut trainer = BpeTrainer::new(config(Some(300), None)).unwrap();
            trainer.load_corpus(&corpus).unwrap();

            while let StepOutcome::Merged(_) = trainer.step().unwrap() {
                let tokens = trainer.tokens();
                prop_assert_eq!(
                    sorted(trainer.index.count_map()),
                    sorted(PairCounter::new(&tokens).count_pairs_sequential())
                );
            }
        }

        #[test]
        fn prop_matches_naive_trainer(
            corpus in proptest::collection::vec(0u8..5, 0..150),
            extra in 1usize..40,
            min_frequency in 1u64..4,
        ) {
            let config = config(Some(BYTE_VOCAB_SIZE + extra), Some(min_frequency));
            let outcome = BpeTrainer::train(config.clone(), &corpus).unwrap();
            let (merges, tokens) = train_naive(&config, &corpus);

            prop_assert_eq!(pairs(&outcome.merges), merges);
            prop_assert_eq!(outcome.tokens, tokens);
        }

        #[test]
        fn prop_ids_are_gapless_and_deterministic(
            corpus in proptest::collection::vec(any::<u8>(), 0..200),
        ) {
            let first = BpeTrainer::train(config(None, Some(1)), &corpus).unwrap();
            let second = BpeTrainer::train(config(None, Some(1)), &corpus).unwrap();

            for (rank, rule) in first.merges.iter().enumerate() {
                prop_assert_eq!(rule.rank as usize, rank);
                prop_assert_eq!(rule.new_id as usize, BYTE_VOCAB_SIZE + rank);
            }
            prop_assert_eq!(first.merges, second.merges);
            prop_assert_eq!(first.tokens, second.tokens);
        }
    }
}
