//! Scripted collaborators for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use futures::StreamExt;

use super::{CollaboratorError, KeywordAnalyzer, NarrativeRequest, NarrativeStream, Narrator};

/// Returns a fixed answer, or fails.
pub struct ScriptedAnalyzer {
    answer: Result<String, CollaboratorError>,
    pub questions: Mutex<Vec<String>>,
}

impl ScriptedAnalyzer {
    pub fn answering(keywords: &str) -> Self {
        Self {
            answer: Ok(keywords.to_string()),
            questions: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            answer: Err(CollaboratorError::Analysis("service down".into())),
            questions: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl KeywordAnalyzer for ScriptedAnalyzer {
    async fn summarize_keywords(&self, question: &str) -> Result<String, CollaboratorError> {
        self.questions.lock().unwrap().push(question.to_string());
        self.answer.clone()
    }
}

/// Streams a fixed list of fragments; an `Err` item fails the stream there.
pub struct ScriptedNarrator {
    fragments: Vec<Result<String, CollaboratorError>>,
    fail_to_open: bool,
    pub requests: Mutex<Vec<NarrativeRequest>>,
}

impl ScriptedNarrator {
    pub fn streaming(fragments: &[&str]) -> Self {
        Self {
            fragments: fragments.iter().map(|f| Ok(f.to_string())).collect(),
            fail_to_open: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_after(fragments: &[&str]) -> Self {
        let mut narrator = Self::streaming(fragments);
        narrator
            .fragments
            .push(Err(CollaboratorError::Narrative("connection reset".into())));
        narrator
    }

    pub fn unreachable() -> Self {
        Self {
            fragments: Vec::new(),
            fail_to_open: true,
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Narrator for ScriptedNarrator {
    async fn stream_interpretation(
        &self,
        request: NarrativeRequest,
    ) -> Result<NarrativeStream, CollaboratorError> {
        self.requests.lock().unwrap().push(request);
        if self.fail_to_open {
            return Err(CollaboratorError::Narrative("unreachable".into()));
        }
        Ok(futures::stream::iter(self.fragments.clone()).boxed())
    }
}
