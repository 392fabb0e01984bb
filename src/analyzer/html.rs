//! HTML tree extraction: tag-subtree removal and ordered, weighted text-block extraction.

use crate::config::StructuralWeights;
use scraper::{Html, Selector};
use std::collections::HashSet;

/// Tags whose entire subtree is dropped before any text extraction happens.
const REMOVED_TAGS_SELECTOR: &str = "script, style, noscript, footer, header, nav";

/// A block of extracted text carrying the structural weight it should contribute.
pub struct WeightedBlock {
    pub text: String,
    pub weight: f64,
}

/// Extracts, in analyzer traversal order (title, h1, h2, h3, b, strong, then the full body),
/// the text blocks contributing to a document's weighted term frequencies.
///
/// The body block is the `<body>` element's own text (minus removed subtrees), not the whole
/// document: `<title>` lives in `<head>`, a sibling of `<body>` under HTML5 tree construction,
/// so it is not re-seen here. In-body structural tags (`<h1>`-`<h3>`, `<b>`, `<strong>`) are
/// still visited twice — once structurally, once as part of this pass — which is intended, not
/// a bug: it lets a bolded heading carry both its structural weight and its ordinary body
/// weight.
pub fn extract_weighted_blocks(html_src: &str, weights: &StructuralWeights) -> Vec<WeightedBlock> {
    let document = Html::parse_document(html_src);

    let removed_selector = Selector::parse(REMOVED_TAGS_SELECTOR).expect("static selector");
    let mut excluded_ids = HashSet::new();
    for el in document.select(&removed_selector) {
        for node in el.descendants() {
            excluded_ids.insert(node.id());
        }
    }

    let mut blocks = Vec::new();

    let structural: [(&str, f64); 6] = [
        ("title", weights.title),
        ("h1", weights.h1),
        ("h2", weights.h2),
        ("h3", weights.h3),
        ("b", weights.b),
        ("strong", weights.strong),
    ];

    for (tag, weight) in structural {
        let selector = match Selector::parse(tag) {
            Ok(s) => s,
            Err(_) => continue,
        };
        for el in document.select(&selector) {
            if excluded_ids.contains(&el.id()) {
                continue;
            }
            let text = text_excluding(el, &excluded_ids);
            if !text.trim().is_empty() {
                blocks.push(WeightedBlock { text, weight });
            }
        }
    }

    let body_selector = Selector::parse("body").expect("static selector");
    let body_el = document.select(&body_selector).next().unwrap_or_else(|| document.root_element());
    let body_text = text_excluding(body_el, &excluded_ids);
    blocks.push(WeightedBlock {
        text: body_text,
        weight: weights.body,
    });

    blocks
}

/// Joins the text content of `el`'s descendants (self included), skipping any node whose id is
/// in `excluded`.
fn text_excluding(el: scraper::ElementRef, excluded: &HashSet<ego_tree::NodeId>) -> String {
    let mut parts = Vec::new();
    for node in el.descendants() {
        if excluded.contains(&node.id()) {
            continue;
        }
        if let Some(text) = node.value().as_text() {
            parts.push(text.to_string());
        }
    }
    parts.join(" ")
}

/// Returns true if `content` looks like an iCalendar payload rather than HTML.
pub fn looks_like_non_html(content: &str) -> bool {
    content.trim_start().starts_with("BEGIN:")
}
