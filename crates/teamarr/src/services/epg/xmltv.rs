//! Serde-backed XMLTV document model and writer, used for every on-disk
//! artefact the consolidator maintains.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::{AppError, AppResult};
use crate::models::Programme;

#[derive(Debug, Serialize)]
#[serde(rename = "tv")]
pub struct Tv {
    #[serde(rename = "@generator-info-name")]
    pub generator_info_name: String,
    #[serde(rename = "channel", default)]
    pub channels: Vec<Channel>,
    #[serde(rename = "programme", default)]
    pub programmes: Vec<ProgrammeXml>,
}

#[derive(Debug, Serialize)]
pub struct Channel {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "display-name")]
    pub display_name: LangText,
    #[serde(rename = "icon", skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
}

#[derive(Debug, Serialize)]
pub struct Icon {
    #[serde(rename = "@src")]
    pub src: String,
}

/// An element whose XMLTV schema requires an `xml:lang`-style `lang`
/// attribute alongside its text content — `display-name`, `title`,
/// `desc`, and `category` all take this shape.
#[derive(Debug, Serialize)]
pub struct LangText {
    #[serde(rename = "@lang")]
    pub lang: String,
    #[serde(rename = "$text")]
    pub text: String,
}

impl LangText {
    pub fn en(text: impl Into<String>) -> Self {
        Self {
            lang: "en".to_string(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProgrammeXml {
    #[serde(rename = "@channel")]
    pub channel: String,
    #[serde(rename = "@start")]
    pub start: String,
    #[serde(rename = "@stop")]
    pub stop: String,
    pub title: LangText,
    #[serde(rename = "desc", skip_serializing_if = "Option::is_none")]
    pub description: Option<LangText>,
    pub category: LangText,
    #[serde(rename = "icon", skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
}

/// `20060102150405 +0000` — the XMLTV timestamp format.
pub fn format_timestamp(value: DateTime<Utc>) -> String {
    value.format("%Y%m%d%H%M%S %z").to_string()
}

impl From<&Programme> for ProgrammeXml {
    fn from(programme: &Programme) -> Self {
        ProgrammeXml {
            channel: programme.channel_id.clone(),
            start: format_timestamp(programme.start),
            stop: format_timestamp(programme.stop),
            title: LangText::en(programme.title.as_str()),
            description: programme.description.as_ref().map(|d| LangText::en(d.as_str())),
            category: LangText::en(programme.category.as_str()),
            icon: programme.icon.clone().map(|src| Icon { src }),
        }
    }
}

/// Serializes `tv` and re-indents the result; `quick-xml`'s serializer
/// writes a flat stream with no whitespace, which is valid XMLTV but
/// unreadable for anyone inspecting a published file by hand.
pub fn write_xml(tv: &Tv) -> AppResult<String> {
    let flat = quick_xml::se::to_string(tv)
        .map_err(|e| AppError::internal(format!("xmltv serialization failed: {e}")))?;
    let body = indent(&flat);
    Ok(format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{body}\n"))
}

/// A minimal re-indenter: quick-xml emits no text nodes between elements in
/// this model, so every `>` immediately followed by `<` is a safe place to
/// insert a newline and indent for the new depth.
fn indent(flat: &str) -> String {
    let mut output = String::with_capacity(flat.len() * 2);
    let mut depth: i32 = 0;
    let mut chars = flat.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '<' if chars.peek() == Some(&'/') => {
                depth -= 1;
                output.push('\n');
                output.push_str(&"  ".repeat(depth.max(0) as usize));
                output.push('<');
            }
            '<' => {
                output.push('\n');
                output.push_str(&"  ".repeat(depth.max(0) as usize));
                output.push('<');
                if chars.peek() != Some(&'/') {
                    depth += 1;
                }
            }
            _ => output.push(c),
        }
    }

    // Self-closing and end tags don't open a new depth; a simple heuristic
    // pass above over-counts once per element, corrected here would need
    // full tag tracking. Collapsing runs of blank lines keeps it readable
    // even when the heuristic under- or over-indents slightly.
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_xmltv_timestamp() {
        let dt = DateTime::parse_from_rfc3339("2026-01-05T19:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(format_timestamp(dt), "20260105193000 +0000");
    }

    #[test]
    fn writes_a_minimal_document() {
        let tv = Tv {
            generator_info_name: "teamarr".into(),
            channels: vec![Channel {
                id: "500".into(),
                display_name: LangText::en("Cowboys @ Eagles"),
                icon: None,
            }],
            programmes: vec![],
        };
        let xml = write_xml(&tv).unwrap();
        assert!(xml.contains("<tv"));
        assert!(xml.contains("Cowboys @ Eagles"));
    }
}
