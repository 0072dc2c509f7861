//! Verse extraction from rendered bilingual pages
//!
//! The source renders one table row per verse, with one `td` cell per
//! language, distinguished by the cell's class attribute. Cells also carry
//! presentational artifacts that must not contaminate the corpus text:
//! hyperlinks (verse-number anchors and footnote markers) and `size="+2"`
//! font elements (section headers). Both are skipped wholesale during text
//! collection.

use ego_tree::NodeRef;
use scraper::{Html, Node, Selector};
use thiserror::Error;

/// Errors raised while extracting verse cells from a page
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The two selected cell sequences differ in length, so the page does
    /// not pair cells 1:1 and cannot be aligned.
    #[error("verse cell count mismatch: td.{class1} has {count1} cells, td.{class2} has {count2}")]
    CellCountMismatch {
        class1: String,
        count1: usize,
        class2: String,
        count2: usize,
    },

    #[error("invalid cell selector: {0}")]
    Selector(String),
}

/// Extracts the two parallel verse-fragment sequences from a page
///
/// Selects all `td` cells carrying `cell_class1` and, separately,
/// `cell_class2`, preserving document order. Each cell collapses to one
/// whitespace-normalized string. The two sequences must be the same length;
/// a mismatch means the page layout violated the 1:1 pairing assumption and
/// the document must be skipped, not aligned.
///
/// # Arguments
///
/// * `html` - Raw page markup
/// * `cell_class1` - Cell class of the first language
/// * `cell_class2` - Cell class of the second language
///
/// # Returns
///
/// * `Ok((frags1, frags2))` - Equal-length fragment sequences
/// * `Err(ExtractError)` - Mismatched cell counts or an invalid selector
pub fn extract_verses(
    html: &str,
    cell_class1: &str,
    cell_class2: &str,
) -> Result<(Vec<String>, Vec<String>), ExtractError> {
    let document = Html::parse_document(html);

    let frags1 = select_cells(&document, cell_class1)?;
    let frags2 = select_cells(&document, cell_class2)?;

    if frags1.len() != frags2.len() {
        return Err(ExtractError::CellCountMismatch {
            class1: cell_class1.to_string(),
            count1: frags1.len(),
            class2: cell_class2.to_string(),
            count2: frags2.len(),
        });
    }

    Ok((frags1, frags2))
}

/// Selects all `td.{class}` cells and collapses each to normalized text
fn select_cells(document: &Html, class: &str) -> Result<Vec<String>, ExtractError> {
    let selector = Selector::parse(&format!("td.{}", class))
        .map_err(|e| ExtractError::Selector(e.to_string()))?;

    Ok(document
        .select(&selector)
        .map(|cell| cell_text(*cell))
        .collect())
}

/// Collapses a cell's text nodes into one string joined with single spaces
///
/// Hyperlink and `font size="+2"` subtrees are skipped entirely; all other
/// whitespace runs collapse to a single space and the result is trimmed.
fn cell_text(cell: NodeRef<'_, Node>) -> String {
    let mut words: Vec<&str> = Vec::new();
    collect_words(cell, &mut words);
    words.join(" ")
}

fn collect_words<'a>(node: NodeRef<'a, Node>, words: &mut Vec<&'a str>) {
    for child in node.children() {
        match child.value() {
            Node::Text(text) => {
                words.extend(text.split_whitespace());
            }
            Node::Element(element) => {
                // Footnote markers and anchors
                if element.name() == "a" {
                    continue;
                }
                // Section headers
                if element.name() == "font" && element.attr("size") == Some("+2") {
                    continue;
                }
                collect_words(child, words);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[(&str, &str)]) -> String {
        let body: String = rows
            .iter()
            .map(|(c1, c2)| {
                format!(
                    r#"<tr><td class="bstw">{}</td><td class="nor">{}</td></tr>"#,
                    c1, c2
                )
            })
            .collect();
        format!("<html><body><table>{}</table></body></html>", body)
    }

    #[test]
    fn test_extract_parallel_cells_in_document_order() {
        let html = table(&[("你好", "hello"), ("再見", "goodbye")]);
        let (frags1, frags2) = extract_verses(&html, "bstw", "nor").unwrap();

        assert_eq!(frags1, vec!["你好", "再見"]);
        assert_eq!(frags2, vec!["hello", "goodbye"]);
    }

    #[test]
    fn test_hyperlinks_are_skipped() {
        let html = table(&[(
            r#"<a href="/note#1">1:1</a> 起初"#,
            r#"<a href="/note#1">1:1</a> in the beginning"#,
        )]);
        let (frags1, frags2) = extract_verses(&html, "bstw", "nor").unwrap();

        assert_eq!(frags1, vec!["起初"]);
        assert_eq!(frags2, vec!["in the beginning"]);
    }

    #[test]
    fn test_section_header_fonts_are_skipped() {
        let html = table(&[(
            r#"<font size="+2">創世記</font> 起初"#,
            r#"<font size="+2">Genesis</font> in the beginning"#,
        )]);
        let (frags1, frags2) = extract_verses(&html, "bstw", "nor").unwrap();

        assert_eq!(frags1, vec!["起初"]);
        assert_eq!(frags2, vec!["in the beginning"]);
    }

    #[test]
    fn test_other_font_elements_are_kept() {
        let html = table(&[(r#"<font size="-1">小字</font> 經文"#, "plain text")]);
        let (frags1, _) = extract_verses(&html, "bstw", "nor").unwrap();

        assert_eq!(frags1, vec!["小字 經文"]);
    }

    #[test]
    fn test_whitespace_is_normalized() {
        let html = table(&[("  one\n   two\t three  ", "a\nb")]);
        let (frags1, frags2) = extract_verses(&html, "bstw", "nor").unwrap();

        assert_eq!(frags1, vec!["one two three"]);
        assert_eq!(frags2, vec!["a b"]);
    }

    #[test]
    fn test_nested_markup_text_is_joined() {
        let html = table(&[("<b>bold</b> and <i>italic</i>", "x")]);
        let (frags1, _) = extract_verses(&html, "bstw", "nor").unwrap();

        assert_eq!(frags1, vec!["bold and italic"]);
    }

    #[test]
    fn test_cell_count_mismatch_is_an_error() {
        let html = r#"<html><body><table>
            <tr><td class="bstw">a</td><td class="nor">b</td></tr>
            <tr><td class="bstw">c</td></tr>
        </table></body></html>"#;

        let err = extract_verses(html, "bstw", "nor").unwrap_err();
        match err {
            ExtractError::CellCountMismatch {
                count1, count2, ..
            } => {
                assert_eq!(count1, 2);
                assert_eq!(count2, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unrelated_cells_are_ignored() {
        let html = r#"<html><body><table>
            <tr><td class="chap">Chapter 1</td></tr>
            <tr><td class="bstw">a</td><td class="nor">b</td></tr>
        </table></body></html>"#;

        let (frags1, frags2) = extract_verses(html, "bstw", "nor").unwrap();
        assert_eq!(frags1, vec!["a"]);
        assert_eq!(frags2, vec!["b"]);
    }

    #[test]
    fn test_continuation_marker_cells_survive_intact() {
        let html = table(&[("併於上節", "carried over text")]);
        let (frags1, frags2) = extract_verses(&html, "bstw", "nor").unwrap();

        assert_eq!(frags1, vec!["併於上節"]);
        assert_eq!(frags2, vec!["carried over text"]);
    }
}
