//! Markdown rendering — a constrained subset converted to markup via
//! ordered, non-overlapping substitution passes.
//!
//! Pass order is headers → bold → italic → fenced code → inline code →
//! list items → line breaks. The order matters: fenced blocks are
//! lifted into placeholders at their pass and restored at the end, so
//! the inline-code, list-item and line-break passes never reinterpret
//! their contents.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static H3_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^### (.*)$").expect("h3 pattern"));
static H2_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^## (.*)$").expect("h2 pattern"));
static H1_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^# (.*)$").expect("h1 pattern"));
static BOLD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold pattern"));
static ITALIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.*?)\*").expect("italic pattern"));
static FENCED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```(.*?)```").expect("fence pattern"));
static INLINE_CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`(.*?)`").expect("code pattern"));
static LIST_ITEM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*[-*]\s(.+)").expect("list pattern"));

/// Sentinel wrapping lifted fenced-block indices; control characters
/// do not occur in chat text.
const FENCE_MARK: char = '\u{1}';

/// Convert a constrained markdown subset (headers 1-3, bold, italic,
/// fenced and inline code, unordered lists, line breaks) to markup.
///
/// Input containing none of the constructs comes back with only line
/// breaks converted.
pub fn render_markdown(text: &str) -> String {
    let mut out = H3_RE.replace_all(text, "<h3>${1}</h3>").into_owned();
    out = H2_RE.replace_all(&out, "<h2>${1}</h2>").into_owned();
    out = H1_RE.replace_all(&out, "<h1>${1}</h1>").into_owned();
    out = BOLD_RE
        .replace_all(&out, "<strong>${1}</strong>")
        .into_owned();
    out = ITALIC_RE.replace_all(&out, "<em>${1}</em>").into_owned();

    // Lift fenced blocks out of the text before the passes that would
    // corrupt their contents run.
    let mut fences: Vec<String> = Vec::new();
    out = FENCED_RE
        .replace_all(&out, |caps: &Captures| {
            fences.push(format!("<pre><code>{}</code></pre>", &caps[1]));
            format!("{}{}{}", FENCE_MARK, fences.len() - 1, FENCE_MARK)
        })
        .into_owned();

    out = INLINE_CODE_RE
        .replace_all(&out, "<code>${1}</code>")
        .into_owned();
    out = LIST_ITEM_RE.replace_all(&out, "<li>${1}</li>").into_owned();
    out = wrap_list_items(&out);
    out = out.replace('\n', "<br>");

    for (i, fence) in fences.iter().enumerate() {
        out = out.replace(&format!("{}{}{}", FENCE_MARK, i, FENCE_MARK), fence);
    }
    out
}

/// Wrap the run from the first list item to the last in a single
/// `<ul>` element, as the source format expects.
fn wrap_list_items(text: &str) -> String {
    let (Some(start), Some(end)) = (text.find("<li>"), text.rfind("</li>")) else {
        return text.to_string();
    };
    let end = end + "</li>".len();
    format!(
        "{}<ul>{}</ul>{}",
        &text[..start],
        &text[start..end],
        &text[end..]
    )
}
