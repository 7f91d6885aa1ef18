//! Generated reports and footnote markup
//!
//! Report bodies are markdown-like text carrying inline `^fnN^` markers.
//! Markers render as superscript links that resolve against the report's
//! ordered footnote list, numbered from 1.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    /// Inline footnote marker, e.g. `^fn2^`
    static ref FOOTNOTE_MARKER: Regex = Regex::new(r"\^fn(\d+)\^").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    PeerBenchmark,
    RiskFactors,
    FinancialReporting,
    GeneralCompliance,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub kind: ReportKind,
    pub title: String,
    pub body: String,
    pub footnotes: Vec<String>,
}

impl Report {
    /// Marker numbers in order of appearance
    pub fn footnote_markers(&self) -> Vec<u32> {
        footnote_markers(&self.body)
    }

    /// Markers that point past the end of the footnote list
    pub fn unresolved_markers(&self) -> Vec<u32> {
        self.footnote_markers()
            .into_iter()
            .filter(|n| *n == 0 || *n as usize > self.footnotes.len())
            .collect()
    }

    pub fn rendered_body(&self) -> String {
        render_markers(&self.body)
    }

    pub fn rendered_footnotes(&self) -> String {
        render_footnote_list(&self.footnotes)
    }
}

pub fn footnote_markers(text: &str) -> Vec<u32> {
    FOOTNOTE_MARKER
        .captures_iter(text)
        .filter_map(|caps| caps[1].parse().ok())
        .collect()
}

/// Rewrite every `^fnN^` marker into a superscript reference link
pub fn render_markers(text: &str) -> String {
    FOOTNOTE_MARKER
        .replace_all(
            text,
            r#"<sup class="footnote-link" data-footnote="$1">[$1]</sup>"#,
        )
        .into_owned()
}

pub fn render_footnote_list(footnotes: &[String]) -> String {
    let mut html = String::from("<ol class=\"footnotes\">");
    for (i, note) in footnotes.iter().enumerate() {
        html.push_str(&format!("<li id=\"fn{}\">{}</li>", i + 1, note));
    }
    html.push_str("</ol>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Report {
        Report {
            kind: ReportKind::GeneralCompliance,
            title: "Sample".to_string(),
            body: "Safe harbor applies.^fn1^ Controls need work.^fn2^".to_string(),
            footnotes: vec!["Section 27A".to_string(), "Item 307".to_string()],
        }
    }

    #[test]
    fn test_markers_rewritten_to_superscript_links() {
        assert_eq!(
            render_markers("See note^fn12^."),
            r#"See note<sup class="footnote-link" data-footnote="12">[12]</sup>."#
        );
    }

    #[test]
    fn test_text_without_markers_unchanged() {
        assert_eq!(render_markers("plain ^fn^ text"), "plain ^fn^ text");
        assert!(footnote_markers("plain ^fnx^ text").is_empty());
    }

    #[test]
    fn test_footnote_list_is_keyed_by_position() {
        let report = sample();
        assert_eq!(
            report.rendered_footnotes(),
            r#"<ol class="footnotes"><li id="fn1">Section 27A</li><li id="fn2">Item 307</li></ol>"#
        );
    }

    #[test]
    fn test_markers_resolve_against_list() {
        let mut report = sample();
        assert_eq!(report.footnote_markers(), vec![1, 2]);
        assert!(report.unresolved_markers().is_empty());

        report.body.push_str(" Dangling.^fn3^");
        assert_eq!(report.unresolved_markers(), vec![3]);
    }
}
