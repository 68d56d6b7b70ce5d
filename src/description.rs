//! Release-notes normalization.
//!
//! Release notes arrive as GitHub-flavoured markdown with the occasional HTML
//! tag. Catalog clients render `versionDescription` as plain text, so the notes
//! are run through a fixed pipeline of [`Stage`]s. Stages are applied in
//! declaration order and later stages assume earlier ones already ran: header
//! markers are stripped before bullets are introduced, and bullets are
//! introduced before paragraph spacing collapses `\r\n\r\n`.

use regex::Regex;
use std::sync::LazyLock;

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^<]+?>").expect("valid regex"));
static HEADER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#{1,6}\s?").expect("valid regex"));
static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([\r\n])-").expect("valid regex"));

/// Text shown when a release has no notes at all.
pub const MISSING_DESCRIPTION: &str = "No description provided.";

/// One step of the normalization pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Remove `<...>` tags.
    StripTags,
    /// Remove markdown header markers (`#` to `######` plus one optional space).
    StripHeaders,
    /// Remove `**` bold markers, keeping the enclosed text.
    StripBold,
    /// Turn a `-` that starts a line into `•`.
    Bullets,
    /// Turn backticks into double quotes.
    Backticks,
    /// Collapse `\r\n\r\n` into `\r \n`.
    ParagraphSpacing,
}

/// The stages in the order they must run.
pub const PIPELINE: [Stage; 6] = [
    Stage::StripTags,
    Stage::StripHeaders,
    Stage::StripBold,
    Stage::Bullets,
    Stage::Backticks,
    Stage::ParagraphSpacing,
];

impl Stage {
    pub fn apply(self, text: &str) -> String {
        match self {
            Stage::StripTags => TAG.replace_all(text, "").into_owned(),
            Stage::StripHeaders => HEADER.replace_all(text, "").into_owned(),
            Stage::StripBold => text.replace("**", ""),
            Stage::Bullets => LIST_MARKER.replace_all(text, "${1}•").into_owned(),
            Stage::Backticks => text.replace('`', "\""),
            Stage::ParagraphSpacing => text.replace("\r\n\r\n", "\r \n"),
        }
    }
}

/// Runs the full [`PIPELINE`] over `text`.
pub fn normalize(text: &str) -> String {
    PIPELINE
        .iter()
        .fold(text.to_string(), |acc, stage| stage.apply(&acc))
}

/// Normalizes optional release notes, substituting [`MISSING_DESCRIPTION`] when absent.
pub fn describe(body: Option<&str>) -> String {
    match body {
        Some(text) => normalize(text),
        None => MISSING_DESCRIPTION.to_string(),
    }
}
