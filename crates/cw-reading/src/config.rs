//! Configuration for a reading session.

/// Reversal probability of the reference deck.
pub const DEFAULT_REVERSAL_PROBABILITY: f64 = 0.3;

/// Keywords shown when question analysis fails.
pub const DEFAULT_KEYWORD_FALLBACK: &str = "命运, 神秘, 星辰";

/// Interpretation text shown when narrative generation fails.
pub const DEFAULT_NARRATIVE_ERROR: &str = "宇宙连接中断，请稍后重试...";

/// Storage key the journal blob lives under.
pub const DEFAULT_STORAGE_KEY: &str = "tarot_journal";

/// Configuration for a reading session.
#[derive(Debug, Clone)]
pub struct ReadingConfig {
    /// RNG seed for reproducible draws. `None` seeds from OS entropy.
    pub seed: Option<u64>,
    /// Chance that each drawn card comes up reversed (0.0-1.0).
    pub reversal_probability: f64,
    /// Keywords substituted when analysis fails.
    pub keyword_fallback: String,
    /// Interpretation substituted when the narrative stream fails.
    pub narrative_error: String,
    /// Key the journal is persisted under.
    pub storage_key: String,
    /// Number of face-down slots offered for selection. `None` uses the catalog size.
    pub deck_slots: Option<usize>,
}

impl Default for ReadingConfig {
    fn default() -> Self {
        Self {
            seed: None,
            reversal_probability: DEFAULT_REVERSAL_PROBABILITY,
            keyword_fallback: DEFAULT_KEYWORD_FALLBACK.to_string(),
            narrative_error: DEFAULT_NARRATIVE_ERROR.to_string(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            deck_slots: None,
        }
    }
}

impl ReadingConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the reversal probability (clamped to 0.0-1.0; NaN becomes 0.0).
    pub fn with_reversal_probability(mut self, probability: f64) -> Self {
        self.reversal_probability = clamp_probability(probability);
        self
    }

    /// Set the fallback keyword string.
    pub fn with_keyword_fallback(mut self, keywords: impl Into<String>) -> Self {
        self.keyword_fallback = keywords.into();
        self
    }

    /// Set the narrative failure message.
    pub fn with_narrative_error(mut self, message: impl Into<String>) -> Self {
        self.narrative_error = message.into();
        self
    }

    /// Set the journal storage key.
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Set the number of selectable deck slots (at least 1).
    pub fn with_deck_slots(mut self, slots: usize) -> Self {
        self.deck_slots = Some(slots.max(1));
        self
    }
}

/// Clamp a probability into `[0, 1]`, mapping NaN to 0.
pub fn clamp_probability(p: f64) -> f64 {
    if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) }
}
