//! Deck themes and custom card backs.

use std::fmt;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::error::{ReadingError, ReadingResult};

/// Largest card back image accepted (5 MB).
pub const MAX_BACK_IMAGE_SIZE: u64 = 5 * 1024 * 1024;

/// Id of the theme built from a user-supplied image.
pub const CUSTOM_THEME_ID: &str = "custom";

const IMAGE_TYPES: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("svg", "image/svg+xml"),
    ("bmp", "image/bmp"),
];

/// How card faces are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontStyle {
    /// Plain starfield faces.
    Classic,
    /// Gold-leaf faces.
    Mystic,
    /// Illustrated faces.
    Illustration,
}

impl fmt::Display for FrontStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FrontStyle::Classic => "classic",
            FrontStyle::Mystic => "mystic",
            FrontStyle::Illustration => "illustration",
        };
        write!(f, "{name}")
    }
}

/// What the back of every card shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardBack {
    /// A CSS gradient.
    Gradient(String),
    /// An image as a `data:` URI.
    Image(String),
}

/// A named card back and face style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckTheme {
    /// Stable identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Card back.
    pub back: CardBack,
    /// Card face style.
    pub front_style: FrontStyle,
}

impl DeckTheme {
    fn gradient(id: &str, name: &str, css: &str, front_style: FrontStyle) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            back: CardBack::Gradient(css.to_string()),
            front_style,
        }
    }
}

/// The themes that ship with the application.
pub fn shipped_themes() -> Vec<DeckTheme> {
    vec![
        DeckTheme::gradient(
            "classic",
            "经典星空",
            "linear-gradient(135deg, #1e1b4b 0%, #312e81 100%)",
            FrontStyle::Classic,
        ),
        DeckTheme::gradient(
            "mystic_gold",
            "神秘金沙",
            "linear-gradient(135deg, #451a03 0%, #78350f 100%)",
            FrontStyle::Mystic,
        ),
        DeckTheme::gradient(
            "nebula",
            "星云幻梦",
            "linear-gradient(135deg, #4c1d95 0%, #db2777 100%)",
            FrontStyle::Illustration,
        ),
    ]
}

/// Holds the active theme.
#[derive(Debug, Clone)]
pub struct ThemeSelector {
    themes: Vec<DeckTheme>,
    current: DeckTheme,
}

impl Default for ThemeSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl ThemeSelector {
    /// Start with the shipped themes, the first one active.
    pub fn new() -> Self {
        let themes = shipped_themes();
        let current = themes[0].clone();
        Self { themes, current }
    }

    /// The active theme.
    pub fn current(&self) -> &DeckTheme {
        &self.current
    }

    /// Themes available for selection.
    pub fn themes(&self) -> &[DeckTheme] {
        &self.themes
    }

    /// Activate a shipped theme by id.
    pub fn select(&mut self, id: &str) -> ReadingResult<&DeckTheme> {
        let theme = self
            .themes
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| ReadingError::UnknownTheme(id.to_string()))?;
        self.current = theme.clone();
        Ok(&self.current)
    }

    /// Activate a custom theme whose back is the image at `path`.
    ///
    /// On failure the previous theme stays active.
    pub fn install_custom_back(&mut self, path: &Path) -> ReadingResult<&DeckTheme> {
        let uri = image_data_uri(path)?;
        self.current = DeckTheme {
            id: CUSTOM_THEME_ID.to_string(),
            name: "自定义牌背".to_string(),
            back: CardBack::Image(uri),
            front_style: FrontStyle::Classic,
        };
        tracing::info!(path = %path.display(), "custom card back installed");
        Ok(&self.current)
    }
}

fn media_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    IMAGE_TYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, media_type)| *media_type)
}

/// Read an image file into a base64 `data:` URI.
pub fn image_data_uri(path: &Path) -> ReadingResult<String> {
    let media_type = media_type(path).ok_or_else(|| {
        ReadingError::InvalidImage(format!("unsupported image type: {}", path.display()))
    })?;
    let size = std::fs::metadata(path)?.len();
    if size == 0 {
        return Err(ReadingError::InvalidImage(format!("{} is empty", path.display())));
    }
    if size > MAX_BACK_IMAGE_SIZE {
        return Err(ReadingError::InvalidImage(format!(
            "{} is {size} bytes (limit {MAX_BACK_IMAGE_SIZE})",
            path.display()
        )));
    }
    let bytes = std::fs::read(path)?;
    Ok(format!("data:{media_type};base64,{}", BASE64.encode(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_theme_ids() {
        let ids: Vec<String> = shipped_themes().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["classic", "mystic_gold", "nebula"]);
        assert_eq!(ThemeSelector::new().current().name, "经典星空");
    }

    #[test]
    fn select_by_id() {
        let mut selector = ThemeSelector::new();
        let theme = selector.select("nebula").unwrap();
        assert_eq!(theme.front_style, FrontStyle::Illustration);
        assert!(matches!(
            selector.select("gothic"),
            Err(ReadingError::UnknownTheme(_))
        ));
        assert_eq!(selector.current().id, "nebula");
    }

    #[test]
    fn custom_back_becomes_data_uri() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("back.PNG");
        std::fs::write(&path, b"\x89PNG").unwrap();

        let mut selector = ThemeSelector::new();
        let theme = selector.install_custom_back(&path).unwrap();
        assert_eq!(theme.id, "custom");
        assert_eq!(theme.name, "自定义牌背");
        assert_eq!(
            theme.back,
            CardBack::Image("data:image/png;base64,iVBORw==".into())
        );
    }

    #[test]
    fn bad_image_keeps_previous_theme() {
        let dir = tempfile::tempdir().unwrap();
        let mut selector = ThemeSelector::new();
        selector.select("mystic_gold").unwrap();

        let text = dir.path().join("notes.txt");
        std::fs::write(&text, "hello").unwrap();
        assert!(matches!(
            selector.install_custom_back(&text),
            Err(ReadingError::InvalidImage(_))
        ));

        let empty = dir.path().join("empty.jpg");
        std::fs::write(&empty, b"").unwrap();
        assert!(selector.install_custom_back(&empty).is_err());

        let missing = dir.path().join("missing.png");
        assert!(matches!(
            selector.install_custom_back(&missing),
            Err(ReadingError::Io(_))
        ));

        assert_eq!(selector.current().id, "mystic_gold");
    }
}
