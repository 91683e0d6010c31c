//! Style number identification
//!
//! Candidate patterns are tried in priority order against the whole text.
//! The first pattern that matches anywhere wins and its first match is
//! returned; later patterns are never consulted.

use std::sync::LazyLock;

use regex::Regex;

/// A named style-number pattern. Capture group 1 holds the token.
#[derive(Debug, Clone)]
pub struct StylePattern {
    pub name: &'static str,
    regex: Regex,
}

impl StylePattern {
    /// Build a pattern; `pattern` must define capture group 1.
    pub fn new(name: &'static str, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name,
            regex: Regex::new(pattern)?,
        })
    }

    /// First token matched by this pattern, trimmed
    pub fn find(&self, text: &str) -> Option<String> {
        self.regex
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
    }
}

/// English label, e.g. `STYLE NO: TH2F7ASZ501ME`
const LABELED_EN: &str = r"(?i)STYLE\s*NO\.?\s*[:.\s]\s*([A-Z0-9]{10,15})";
/// Korean label (스타일 번호)
const LABELED_KO: &str = r"(?i)스타일\s*번호\s*[:.\s]\s*([A-Z0-9]{10,15})";
/// Bare code shape without a label, e.g. `TH2FA501ME`
const STRUCTURAL: &str = r"(?i)([A-Z]{2,4}[0-9]{1,2}[A-Z]{1,4}[0-9]{3,6}[A-Z]{0,3})";

static DEFAULT_PATTERNS: LazyLock<Vec<StylePattern>> = LazyLock::new(|| {
    [
        ("labeled-en", LABELED_EN),
        ("labeled-ko", LABELED_KO),
        ("structural", STRUCTURAL),
    ]
    .into_iter()
    .map(|(name, pattern)| StylePattern {
        name,
        regex: Regex::new(pattern).expect("static regex"),
    })
    .collect()
});

/// Ordered list of style-number patterns
#[derive(Debug, Clone)]
pub struct StyleIdentifier {
    patterns: Vec<StylePattern>,
}

impl Default for StyleIdentifier {
    fn default() -> Self {
        Self {
            patterns: DEFAULT_PATTERNS.clone(),
        }
    }
}

impl StyleIdentifier {
    pub fn with_patterns(patterns: Vec<StylePattern>) -> Self {
        Self { patterns }
    }

    pub fn patterns(&self) -> &[StylePattern] {
        &self.patterns
    }

    /// Locate the style number in `text`
    pub fn identify(&self, text: &str) -> Option<String> {
        self.patterns.iter().find_map(|pattern| {
            let found = pattern.find(text)?;
            tracing::debug!(pattern = pattern.name, style_no = %found, "Style number matched");
            Some(found)
        })
    }
}

/// Locate the style number using the default pattern list
pub fn identify_style_no(text: &str) -> Option<String> {
    StyleIdentifier::default().identify(text)
}
