//! Style-mapping ruleset: which HTML element each piece of document
//! formatting becomes.
//!
//! One rule per line, `selector => target`. `#` at the start of a line or
//! after whitespace starts a comment.
//!
//! Selectors: `b`, `i`, `u`, `strike`, `highlight`, `li`,
//! `p[style-name='Name']`, `p[text-align="center"]`, `p[border-bottom]`.
//! Targets: `tag` or `tag.class.other-class`. A trailing `:fresh` is accepted
//! and ignored.

use thiserror::Error;

/// Ruleset used for uploaded resumes.
pub const RESUME_STYLE_MAP: &str = r#"
u => u
b => strong
i => em
strike => del
highlight => mark

p[text-align="center"] => p.center-align
p[text-align="right"] => p.right-align
p[border-bottom] => p.has-border-bottom

li => li
"#;

#[derive(Debug, Error, PartialEq)]
pub enum StyleMapError {
    #[error("line {line}: expected `selector => target`")]
    MissingArrow { line: usize },

    #[error("line {line}: unsupported selector `{selector}`")]
    UnsupportedSelector { line: usize, selector: String },

    #[error("line {line}: invalid target `{target}`")]
    InvalidTarget { line: usize, target: String },
}

/// Inline formatting that a run can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMarker {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Highlight,
}

impl RunMarker {
    /// Outer-to-inner nesting order when a run carries several markers.
    pub const NESTING: [RunMarker; 5] = [
        RunMarker::Bold,
        RunMarker::Italic,
        RunMarker::Underline,
        RunMarker::Strikethrough,
        RunMarker::Highlight,
    ];

    fn from_selector(selector: &str) -> Option<Self> {
        match selector {
            "b" => Some(RunMarker::Bold),
            "i" => Some(RunMarker::Italic),
            "u" => Some(RunMarker::Underline),
            "strike" => Some(RunMarker::Strikethrough),
            "highlight" => Some(RunMarker::Highlight),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParagraphMatcher {
    /// Case-insensitive match on the paragraph style's display name.
    StyleName(String),
    /// Normalised alignment: left, center, right, justify.
    TextAlign(String),
    BorderBottom,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    Run(RunMarker),
    Paragraph(ParagraphMatcher),
    ListItem,
}

/// An HTML element name with optional classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlTarget {
    pub tag: String,
    pub classes: Vec<String>,
}

impl HtmlTarget {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            classes: Vec::new(),
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        let raw = raw.strip_suffix(":fresh").unwrap_or(raw).trim();
        let mut parts = raw.split('.');
        let tag = parts.next().filter(|t| is_name(t))?;
        let classes: Vec<String> = parts.map(str::to_string).collect();
        if classes.iter().any(|c| !is_name(c)) {
            return None;
        }
        Some(Self {
            tag: tag.to_string(),
            classes,
        })
    }

    pub fn open_tag(&self) -> String {
        if self.classes.is_empty() {
            format!("<{}>", self.tag)
        } else {
            format!("<{} class=\"{}\">", self.tag, self.classes.join(" "))
        }
    }

    pub fn close_tag(&self) -> String {
        format!("</{}>", self.tag)
    }
}

fn is_name(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
    pub selector: Selector,
    pub target: HtmlTarget,
}

/// Paragraph facts a paragraph rule can match against.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParagraphFacts<'a> {
    pub style_name: Option<&'a str>,
    pub alignment: Option<&'a str>,
    pub border_bottom: bool,
}

/// Ordered ruleset. The first matching rule wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleMap {
    rules: Vec<StyleRule>,
}

impl StyleMap {
    /// Parses a ruleset, failing on the first malformed line.
    pub fn parse(source: &str) -> Result<Self, StyleMapError> {
        let mut rules = Vec::new();
        for (idx, line) in source.lines().enumerate() {
            if let Some(rule) = parse_line(idx + 1, line)? {
                rules.push(rule);
            }
        }
        Ok(Self { rules })
    }

    /// Parses a ruleset, skipping malformed lines. Returns the skipped-line
    /// errors alongside the usable rules.
    pub fn parse_lenient(source: &str) -> (Self, Vec<StyleMapError>) {
        let mut rules = Vec::new();
        let mut skipped = Vec::new();
        for (idx, line) in source.lines().enumerate() {
            match parse_line(idx + 1, line) {
                Ok(Some(rule)) => rules.push(rule),
                Ok(None) => {}
                Err(e) => skipped.push(e),
            }
        }
        (Self { rules }, skipped)
    }

    pub fn resume_default() -> Self {
        Self::parse_lenient(RESUME_STYLE_MAP).0
    }

    pub fn run_target(&self, marker: RunMarker) -> Option<&HtmlTarget> {
        self.rules.iter().find_map(|r| match r.selector {
            Selector::Run(m) if m == marker => Some(&r.target),
            _ => None,
        })
    }

    pub fn paragraph_target(&self, facts: ParagraphFacts<'_>) -> Option<&HtmlTarget> {
        self.rules.iter().find_map(|r| match &r.selector {
            Selector::Paragraph(matcher) if matches_paragraph(matcher, facts) => Some(&r.target),
            _ => None,
        })
    }

    pub fn list_item_target(&self) -> Option<&HtmlTarget> {
        self.rules.iter().find_map(|r| match r.selector {
            Selector::ListItem => Some(&r.target),
            _ => None,
        })
    }
}

fn matches_paragraph(matcher: &ParagraphMatcher, facts: ParagraphFacts<'_>) -> bool {
    match matcher {
        ParagraphMatcher::StyleName(name) => facts
            .style_name
            .is_some_and(|s| s.eq_ignore_ascii_case(name)),
        ParagraphMatcher::TextAlign(align) => facts.alignment == Some(align.as_str()),
        ParagraphMatcher::BorderBottom => facts.border_bottom,
    }
}

fn parse_line(line_no: usize, line: &str) -> Result<Option<StyleRule>, StyleMapError> {
    let line = strip_comment(line).trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (selector, target) = line
        .split_once("=>")
        .ok_or(StyleMapError::MissingArrow { line: line_no })?;
    let (selector, target) = (selector.trim(), target.trim());

    let selector = parse_selector(selector).ok_or_else(|| StyleMapError::UnsupportedSelector {
        line: line_no,
        selector: selector.to_string(),
    })?;
    let target = HtmlTarget::parse(target).ok_or_else(|| StyleMapError::InvalidTarget {
        line: line_no,
        target: target.to_string(),
    })?;

    Ok(Some(StyleRule { selector, target }))
}

/// `#` opens a comment at the start of a line or after whitespace only, so
/// style names such as `C# Skills` survive.
fn strip_comment(line: &str) -> &str {
    let mut after_space = true;
    for (idx, c) in line.char_indices() {
        if c == '#' && after_space {
            return &line[..idx];
        }
        after_space = c.is_whitespace();
    }
    line
}

fn parse_selector(raw: &str) -> Option<Selector> {
    if raw == "li" {
        return Some(Selector::ListItem);
    }
    if let Some(marker) = RunMarker::from_selector(raw) {
        return Some(Selector::Run(marker));
    }

    let inner = raw.strip_prefix("p[")?.strip_suffix(']')?.trim();
    if inner == "border-bottom" {
        return Some(Selector::Paragraph(ParagraphMatcher::BorderBottom));
    }
    let (key, value) = inner.split_once('=')?;
    let value = unquote(value.trim())?;
    match key.trim() {
        "style-name" => Some(Selector::Paragraph(ParagraphMatcher::StyleName(
            value.to_string(),
        ))),
        "text-align" => Some(Selector::Paragraph(ParagraphMatcher::TextAlign(
            value.to_ascii_lowercase(),
        ))),
        _ => None,
    }
}

fn unquote(value: &str) -> Option<&str> {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
}
