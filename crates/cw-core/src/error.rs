/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by catalog and spread validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// A spread declares a card count that differs from its position list.
    #[error("spread \"{spread}\" declares {card_count} cards but has {positions} positions")]
    PositionCountMismatch {
        /// The offending spread id.
        spread: String,
        /// The declared card count.
        card_count: usize,
        /// The number of positions actually listed.
        positions: usize,
    },

    /// A spread needs more cards than the catalog holds.
    #[error("spread needs {requested} cards but the catalog only holds {available}")]
    SpreadExceedsCatalog {
        /// Cards the spread asks for.
        requested: usize,
        /// Cards available in the catalog.
        available: usize,
    },

    /// A spread must hold at least one card.
    #[error("spread \"{0}\" has no cards")]
    EmptySpread(String),

    /// No shipped spread carries the given id.
    #[error("unknown spread: \"{0}\"")]
    UnknownSpread(String),

    /// Two catalog entries share an id.
    #[error("duplicate archetype id {0}")]
    DuplicateArchetype(u32),

    /// No archetype matches the given id or name.
    #[error("unknown archetype: \"{0}\"")]
    UnknownArchetype(String),
}
