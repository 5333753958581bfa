//! Offline collaborators.

use async_trait::async_trait;
use futures::StreamExt;

use super::{CollaboratorError, KeywordAnalyzer, NarrativeRequest, NarrativeStream, Narrator};

const MAX_KEYWORDS: usize = 3;

const STOPWORDS: &[&str] = &[
    "about", "am", "an", "and", "are", "be", "can", "do", "does", "for", "how", "in", "is", "it",
    "me", "my", "of", "on", "or", "should", "that", "the", "this", "to", "what", "when", "where",
    "which", "who", "why", "will", "with", "you", "your", "我", "我的", "如何", "怎么", "什么",
    "会", "吗", "呢",
];

/// Picks up to three distinct salient words from the question.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalKeywordAnalyzer;

impl LocalKeywordAnalyzer {
    /// Extract keywords synchronously.
    pub fn extract(question: &str) -> Vec<String> {
        let mut keywords: Vec<String> = Vec::new();
        for token in question.split(is_separator) {
            let token = token.to_lowercase();
            if token.chars().count() < 2 || STOPWORDS.contains(&token.as_str()) {
                continue;
            }
            if !keywords.contains(&token) {
                keywords.push(token);
            }
            if keywords.len() == MAX_KEYWORDS {
                break;
            }
        }
        keywords
    }
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c.is_ascii_punctuation() || "，。？！、；：“”‘’（）《》…".contains(c)
}

#[async_trait]
impl KeywordAnalyzer for LocalKeywordAnalyzer {
    async fn summarize_keywords(&self, question: &str) -> Result<String, CollaboratorError> {
        let keywords = Self::extract(question);
        if keywords.is_empty() {
            return Err(CollaboratorError::Analysis(
                "question has no usable words".to_string(),
            ));
        }
        Ok(keywords.join(", "))
    }
}

/// Builds an interpretation from card meanings and streams it a paragraph at a time.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateNarrator;

impl TemplateNarrator {
    /// The interpretation as paragraphs, each ending in a blank line.
    pub fn paragraphs(request: &NarrativeRequest) -> Vec<String> {
        let mut out = vec!["**单张分析**\n\n".to_string()];
        for c in &request.cards {
            out.push(format!(
                "*{}* ({}): {}。{}\n\n",
                c.position_name,
                c.card,
                c.position_description,
                c.card.meaning()
            ));
        }

        out.push("**综合联结**\n\n".to_string());
        let reversed = request.cards.iter().filter(|c| c.card.is_reversed).count();
        let themes: Vec<&str> = request
            .cards
            .iter()
            .map(|c| c.card.archetype.theme.as_str())
            .collect();
        let mood = if reversed * 2 > request.cards.len() {
            "逆位居多，能量受阻，需要向内审视。"
        } else {
            "正位居多，能量顺畅，可以主动前行。"
        };
        out.push(format!(
            "围绕「{}」，{}的牌面串联起{}。{}\n\n",
            request.question,
            request.spread_name,
            themes.join("、"),
            mood
        ));

        out.push("**最终指引**\n\n".to_string());
        let guidance = match request.cards.last() {
            Some(last) => format!(
                "以「{}」为指引：{}。",
                last.card.archetype.theme,
                last.card.meaning()
            ),
            None => "静心倾听内在的声音。".to_string(),
        };
        out.push(format!("{guidance}\n"));
        out
    }
}

#[async_trait]
impl Narrator for TemplateNarrator {
    async fn stream_interpretation(
        &self,
        request: NarrativeRequest,
    ) -> Result<NarrativeStream, CollaboratorError> {
        let paragraphs = Self::paragraphs(&request);
        Ok(futures::stream::iter(paragraphs.into_iter().map(Ok)).boxed())
    }
}
