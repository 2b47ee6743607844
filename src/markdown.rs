//! Markdown subset renderer.
//!
//! Supports `#`/`##`/`###` headings, `**bold**`, `*italic*`, fenced code blocks,
//! inline code, `-` and `1.` list items and blank-line separated paragraphs.
//! Anything else is emitted as escaped literal text. Block structure is resolved
//! first, inline markup second, and text inside code is never touched by the
//! emphasis rules.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;

use crate::slug::slugify;

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,3})[ \t]+(.*\S)\s*$").expect("valid regex"));
static FENCE_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```(\w*)\s*$").expect("valid regex"));
static BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^- (.+)$").expect("valid regex"));
static NUMBERED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\. (.+)$").expect("valid regex"));
static CODE_SPAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`]+)`").expect("valid regex"));
static BOLD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("valid regex"));
static ITALIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*(.+?)\*").expect("valid regex"));
static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x{E000}(\d+)\x{E000}").expect("valid regex"));

// private use code point, stripped from the input before it is used as a marker
const CODE_MARKER: char = '\u{E000}';

/// Prefix shared by every heading anchor inside the article body.
pub const ANCHOR_PREFIX: &str = "content-";

/// A heading that received an id in the rendered body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Anchor {
    pub id: String,
    pub text: String,
    pub level: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderedDocument {
    pub html: String,
    pub anchors: Vec<Anchor>,
}

/// Id used for a level-2/3 heading. The body renderer and the table of contents
/// both go through here.
pub fn anchor_id(heading: &str) -> String {
    format!("{ANCHOR_PREFIX}{}", slugify(heading))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Bullet,
    Numbered,
}

impl ListKind {
    fn tag(self) -> &'static str {
        match self {
            ListKind::Bullet => "ul",
            ListKind::Numbered => "ol",
        }
    }
}

#[derive(Debug)]
enum Block<'a> {
    Heading { level: u8, text: &'a str },
    Code { lang: &'a str, lines: Vec<&'a str> },
    List { kind: ListKind, items: Vec<&'a str> },
    Paragraph(Vec<&'a str>),
}

pub fn render(raw_body: &str) -> RenderedDocument {
    let blocks = parse_blocks(raw_body);
    let mut html = Vec::with_capacity(blocks.len());
    let mut anchors = Vec::new();

    for block in blocks {
        match block {
            Block::Heading { level: 1, text } => {
                html.push(format!("<h1>{}</h1>", render_inline(text)));
            }
            Block::Heading { level, text } => {
                let id = anchor_id(text);
                html.push(format!(
                    "<h{level} id=\"{}\">{}</h{level}>",
                    html_escape::encode_double_quoted_attribute(&id),
                    render_inline(text)
                ));
                anchors.push(Anchor {
                    id,
                    text: text.to_string(),
                    level,
                });
            }
            Block::Code { lang, lines } => {
                let class = if lang.is_empty() {
                    String::new()
                } else {
                    format!(" class=\"language-{lang}\"")
                };
                html.push(format!(
                    "<pre><code{class}>{}</code></pre>",
                    html_escape::encode_text(&lines.join("\n"))
                ));
            }
            Block::List { kind, items } => {
                let items: String = items
                    .iter()
                    .map(|item| format!("<li>{}</li>", render_inline(item)))
                    .collect();
                html.push(format!("<{tag}>{items}</{tag}>", tag = kind.tag()));
            }
            Block::Paragraph(lines) => {
                let body = lines
                    .iter()
                    .map(|line| render_inline(line))
                    .collect::<Vec<_>>()
                    .join("<br />");
                html.push(format!("<p>{body}</p>"));
            }
        }
    }

    RenderedDocument {
        html: html.join("\n"),
        anchors,
    }
}

fn parse_blocks(raw_body: &str) -> Vec<Block<'_>> {
    let lines: Vec<&str> = raw_body
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    let mut blocks = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if line.trim().is_empty() {
            flush_paragraph(&mut blocks, &mut paragraph);
            i += 1;
            continue;
        }

        if let Some(open) = FENCE_OPEN_RE.captures(line) {
            let close = lines[i + 1..]
                .iter()
                .position(|l| l.trim_end() == "```")
                .map(|offset| i + 1 + offset);
            // an unterminated fence is just text
            if let Some(close) = close {
                flush_paragraph(&mut blocks, &mut paragraph);
                let lang = open.get(1).map_or("", |m| m.as_str());
                blocks.push(Block::Code {
                    lang,
                    lines: lines[i + 1..close].to_vec(),
                });
                i = close + 1;
                continue;
            }
        }

        if let Some(caps) = HEADING_RE.captures(line) {
            flush_paragraph(&mut blocks, &mut paragraph);
            let level = caps[1].len() as u8;
            let text = caps.get(2).map_or("", |m| m.as_str());
            blocks.push(Block::Heading { level, text });
            i += 1;
            continue;
        }

        if let Some((kind, item)) = list_item(line) {
            flush_paragraph(&mut blocks, &mut paragraph);
            i += 1;
            if let Some(Block::List { kind: open, items }) = blocks.last_mut() {
                if *open == kind {
                    items.push(item);
                    continue;
                }
            }
            blocks.push(Block::List {
                kind,
                items: vec![item],
            });
            continue;
        }

        paragraph.push(line);
        i += 1;
    }
    flush_paragraph(&mut blocks, &mut paragraph);
    blocks
}

fn flush_paragraph<'a>(blocks: &mut Vec<Block<'a>>, paragraph: &mut Vec<&'a str>) {
    if !paragraph.is_empty() {
        blocks.push(Block::Paragraph(std::mem::take(paragraph)));
    }
}

fn list_item(line: &str) -> Option<(ListKind, &str)> {
    if let Some(caps) = BULLET_RE.captures(line) {
        return caps.get(1).map(|m| (ListKind::Bullet, m.as_str()));
    }
    NUMBERED_RE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| (ListKind::Numbered, m.as_str()))
}

/// Escapes the text and applies emphasis across the whole line. Code spans
/// are parked behind placeholders first so their content is never emphasized.
fn render_inline(text: &str) -> String {
    let text = text.replace(CODE_MARKER, "");
    let mut spans = Vec::new();
    let masked = CODE_SPAN_RE.replace_all(&text, |caps: &Captures| {
        spans.push(format!(
            "<code>{}</code>",
            html_escape::encode_text(&caps[1])
        ));
        format!("{CODE_MARKER}{}{CODE_MARKER}", spans.len() - 1)
    });

    let escaped = html_escape::encode_text(&masked);
    let bold = BOLD_RE.replace_all(&escaped, "<strong>$1</strong>");
    let emphasized = ITALIC_RE.replace_all(&bold, "<em>$1</em>");

    PLACEHOLDER_RE
        .replace_all(&emphasized, |caps: &Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|index| spans.get(index))
                .cloned()
                .unwrap_or_default()
        })
        .into_owned()
}
