//! The draw engine.
//!
//! A draw shuffles the whole catalog, keeps the first `count` archetypes, and
//! then flips an independent coin for each one to decide its orientation.
//! Nothing is retained between draws except the RNG stream.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use cw_core::{
    Archetype, Catalog, CoreError, CoreResult, DrawnCard, PositionedCard, SpreadDefinition,
};

use crate::config::{ReadingConfig, clamp_probability};

/// Draw `count` distinct archetypes from `catalog`, each reversed with
/// probability `reversal_probability`.
///
/// Asking for more cards than the catalog holds is a configuration error.
pub fn draw<R: Rng + ?Sized>(
    catalog: &[Archetype],
    count: usize,
    reversal_probability: f64,
    rng: &mut R,
) -> CoreResult<Vec<DrawnCard>> {
    if count > catalog.len() {
        return Err(CoreError::SpreadExceedsCatalog {
            requested: count,
            available: catalog.len(),
        });
    }

    let mut pool: Vec<&Archetype> = catalog.iter().collect();
    pool.shuffle(rng);
    pool.truncate(count);

    let p = clamp_probability(reversal_probability);
    Ok(pool
        .into_iter()
        .map(|archetype| DrawnCard::new(archetype.clone(), rng.random_bool(p)))
        .collect())
}

/// Pair drawn cards with a spread's positions in draw order.
pub fn pair_with_positions(spread: &SpreadDefinition, cards: &[DrawnCard]) -> Vec<PositionedCard> {
    spread
        .positions
        .iter()
        .zip(cards)
        .map(|(position, card)| PositionedCard {
            position_name: position.name.clone(),
            card: card.clone(),
        })
        .collect()
}

/// A catalog together with the RNG and reversal odds used to draw from it.
#[derive(Debug, Clone)]
pub struct Deck {
    catalog: Catalog,
    reversal_probability: f64,
    rng: StdRng,
    draws_performed: u64,
}

impl Deck {
    /// Create a deck. A `None` seed draws from OS entropy.
    pub fn new(catalog: Catalog, reversal_probability: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            catalog,
            reversal_probability: clamp_probability(reversal_probability),
            rng,
            draws_performed: 0,
        }
    }

    /// Create a Major Arcana deck from a reading configuration.
    pub fn from_config(config: &ReadingConfig) -> Self {
        Self::new(
            Catalog::major_arcana(),
            config.reversal_probability,
            config.seed,
        )
    }

    /// Number of archetypes in the catalog.
    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    /// The reversal probability applied to each card.
    pub fn reversal_probability(&self) -> f64 {
        self.reversal_probability
    }

    /// How many draws this deck has performed.
    pub fn draws_performed(&self) -> u64 {
        self.draws_performed
    }

    /// Draw `count` cards.
    pub fn draw(&mut self, count: usize) -> CoreResult<Vec<DrawnCard>> {
        let cards = draw(
            self.catalog.as_slice(),
            count,
            self.reversal_probability,
            &mut self.rng,
        )?;
        self.draws_performed += 1;
        tracing::debug!(count, draws = self.draws_performed, "cards drawn");
        Ok(cards)
    }
}
