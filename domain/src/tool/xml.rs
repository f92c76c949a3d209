//! Pseudo-XML tool-use parsing
//!
//! The legacy text surface lets a model request a tool with
//! `<tool_name><param>value</param></tool_name>` embedded anywhere in its
//! reply. Matching is first-match and non-greedy: the earliest open tag
//! with a closing tag anywhere after it wins, and the inner text ends at
//! the FIRST occurrence of the closing tag.

use crate::tool::params::ToolParams;

/// A parsed tool request from model text
#[derive(Debug, Clone, PartialEq)]
pub struct ToolUse {
    pub name: String,
    pub params: ToolParams,
}

/// Extract the first pseudo-XML tool use from model output.
///
/// Returns `None` when the text contains no complete tag pair. Inner tags
/// become string parameters; free text between parameter tags is ignored.
pub fn parse_tool_use(text: &str) -> Option<ToolUse> {
    let (name, inner, _) = first_tag(text)?;
    let mut params = ToolParams::new();
    let mut rest = inner;
    while let Some((param_name, value, consumed)) = first_tag(rest) {
        params.insert(param_name, value.to_string());
        rest = &rest[consumed..];
    }
    Some(ToolUse {
        name: name.to_string(),
        params,
    })
}

/// Find the earliest `<name>…</name>` pair in `text`.
///
/// Returns the tag name, the inner text (up to the first closing tag),
/// and the byte offset just past the closing tag.
fn first_tag(text: &str) -> Option<(&str, &str, usize)> {
    let bytes = text.as_bytes();
    let mut pos = 0;
    while let Some(open_rel) = text[pos..].find('<') {
        let open = pos + open_rel;
        let name_start = open + 1;
        let mut name_end = name_start;
        while name_end < bytes.len() && is_tag_byte(bytes[name_end]) {
            name_end += 1;
        }
        if name_end > name_start && bytes.get(name_end) == Some(&b'>') {
            let name = &text[name_start..name_end];
            let inner_start = name_end + 1;
            let closing = format!("</{}>", name);
            if let Some(close_rel) = text[inner_start..].find(&closing) {
                let inner_end = inner_start + close_rel;
                return Some((name, &text[inner_start..inner_end], inner_end + closing.len()));
            }
        }
        pos = open + 1;
    }
    None
}

fn is_tag_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
