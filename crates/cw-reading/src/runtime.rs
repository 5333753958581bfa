//! Async runtime that executes session effects.
//!
//! The runtime owns the session, the deck, and the journal. User triggers go
//! through [`ReadingRuntime::dispatch`]; collaborator calls run on spawned
//! tasks and report back over a channel, drained by [`ReadingRuntime::pump`].

use std::sync::Arc;

use chrono::Utc;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::ReadingConfig;
use crate::draw::Deck;
use crate::journal::{Journal, JournalStore};
use crate::oracle::{
    KeywordAnalyzer, LocalKeywordAnalyzer, NarrativeRequest, Narrator, TemplateNarrator,
};
use crate::session::{Effect, Event, Ignored, SessionState, transition};

/// What happened to a dispatched trigger.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The trigger changed the session.
    Applied,
    /// The trigger was dropped; the session is unchanged.
    Ignored(Ignored),
}

impl Outcome {
    /// Whether the trigger was applied.
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

/// Drives one reading session at a time against its collaborators and journal.
pub struct ReadingRuntime {
    state: SessionState,
    deck: Deck,
    config: ReadingConfig,
    analyzer: Arc<dyn KeywordAnalyzer>,
    narrator: Arc<dyn Narrator>,
    journal: Journal,
    store: JournalStore,
    event_tx: mpsc::UnboundedSender<Event>,
    event_rx: mpsc::UnboundedReceiver<Event>,
}

impl ReadingRuntime {
    /// Create a runtime and load the journal from `store`.
    pub fn new(
        config: ReadingConfig,
        analyzer: Arc<dyn KeywordAnalyzer>,
        narrator: Arc<dyn Narrator>,
        store: JournalStore,
    ) -> Self {
        let deck = Deck::from_config(&config);
        let slots = config.deck_slots.unwrap_or_else(|| deck.len());
        let journal = store.load();
        tracing::debug!(entries = journal.len(), key = store.key(), "journal loaded");
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self {
            state: SessionState::new(slots),
            deck,
            config,
            analyzer,
            narrator,
            journal,
            store,
            event_tx,
            event_rx,
        }
    }

    /// Create a runtime backed by the offline collaborators.
    pub fn offline(config: ReadingConfig, store: JournalStore) -> Self {
        Self::new(
            config,
            Arc::new(LocalKeywordAnalyzer),
            Arc::new(TemplateNarrator),
            store,
        )
    }

    /// The current session.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The deck being drawn from.
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Saved readings, most recent first.
    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// Apply a trigger and execute whatever it asks for.
    pub fn dispatch(&mut self, event: Event) -> Outcome {
        let name = event.name();
        match transition(&self.state, event, &mut self.deck) {
            Ok(result) => {
                let from = self.state.phase();
                self.state = result.state;
                if from != self.state.phase() {
                    tracing::debug!(event = name, %from, to = %self.state.phase(), "phase changed");
                }
                for effect in result.effects {
                    self.execute_effect(effect);
                }
                Outcome::Applied
            }
            Err(reason) => {
                tracing::debug!(event = name, %reason, "trigger ignored");
                Outcome::Ignored(reason)
            }
        }
    }

    /// Save the current reading, stamped now (or just after the newest entry).
    pub fn save(&mut self) -> Outcome {
        let at = self.journal.fresh_timestamp(Utc::now());
        self.dispatch(Event::Save { at })
    }

    /// Wait for the next collaborator event and apply it.
    pub async fn pump(&mut self) -> Option<(Event, Outcome)> {
        let event = self.event_rx.recv().await?;
        let outcome = self.dispatch(event.clone());
        Some((event, outcome))
    }

    /// Pump until the session no longer waits on a collaborator, calling
    /// `on_applied` for every event that changed the session.
    pub async fn settle<F>(&mut self, mut on_applied: F)
    where
        F: FnMut(&Event),
    {
        while self.state.is_awaiting_collaborator() {
            match self.pump().await {
                Some((event, Outcome::Applied)) => on_applied(&event),
                Some((_, Outcome::Ignored(_))) => {}
                None => break,
            }
        }
    }

    fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::AnalyzeQuestion {
                generation,
                question,
            } => self.spawn_analysis(generation, question),
            Effect::StreamNarrative {
                generation,
                request,
            } => self.spawn_narrative(generation, request),
            Effect::PersistJournal { entry } => {
                let id = entry.id.clone();
                self.journal.prepend(entry);
                match self.store.save(&self.journal) {
                    Ok(()) => tracing::info!(%id, entries = self.journal.len(), "reading saved"),
                    Err(e) => tracing::warn!(%id, error = %e, "journal write failed"),
                }
            }
        }
    }

    fn spawn_analysis(&self, generation: u64, question: String) {
        let analyzer = Arc::clone(&self.analyzer);
        let tx = self.event_tx.clone();
        let fallback = self.config.keyword_fallback.clone();
        let on_panic = Event::KeywordsReady {
            generation,
            keywords: fallback.clone(),
        };
        let task = tokio::spawn(async move {
            let keywords = match analyzer.summarize_keywords(&question).await {
                Ok(keywords) if !keywords.trim().is_empty() => keywords,
                Ok(_) => {
                    tracing::warn!("keyword analysis returned nothing, using fallback");
                    fallback
                }
                Err(e) => {
                    tracing::warn!(error = %e, "keyword analysis failed, using fallback");
                    fallback
                }
            };
            let event = Event::KeywordsReady {
                generation,
                keywords,
            };
            if tx.send(event).is_err() {
                tracing::debug!(generation, "runtime gone before keywords arrived");
            }
        });
        supervise(task, self.event_tx.clone(), on_panic);
    }

    fn spawn_narrative(&self, generation: u64, request: NarrativeRequest) {
        let narrator = Arc::clone(&self.narrator);
        let tx = self.event_tx.clone();
        let message = self.config.narrative_error.clone();
        let on_panic = Event::NarrativeFailed {
            generation,
            message: message.clone(),
        };
        let task = tokio::spawn(async move {
            let result = match narrator.stream_interpretation(request).await {
                Ok(mut stream) => {
                    let mut result = Ok(());
                    while let Some(item) = stream.next().await {
                        match item {
                            Ok(text) => {
                                if tx.send(Event::NarrativeChunk { generation, text }).is_err() {
                                    return;
                                }
                            }
                            Err(e) => {
                                result = Err(e);
                                break;
                            }
                        }
                    }
                    result
                }
                Err(e) => Err(e),
            };
            let last = match result {
                Ok(()) => Event::NarrativeFinished { generation },
                Err(e) => {
                    tracing::warn!(error = %e, "narrative stream failed");
                    Event::NarrativeFailed {
                        generation,
                        message,
                    }
                }
            };
            if tx.send(last).is_err() {
                tracing::debug!(generation, "runtime gone before narrative finished");
            }
        });
        supervise(task, self.event_tx.clone(), on_panic);
    }
}

/// Report a collaborator task that died without sending its final event as
/// `fallback`, so the session never waits on it forever.
fn supervise(task: JoinHandle<()>, tx: mpsc::UnboundedSender<Event>, fallback: Event) {
    tokio::spawn(async move {
        if let Err(e) = task.await {
            tracing::warn!(error = %e, event = fallback.name(), "collaborator task died");
            if tx.send(fallback).is_err() {
                tracing::debug!("runtime gone before collaborator fallback");
            }
        }
    });
}
