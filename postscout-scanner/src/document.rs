use crate::error::{Result, ScanError};
use crate::normalize::normalize_link;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Elements whose text never renders.
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// The parts of an HTML page the crawler cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    /// Raw `href` values of anchor elements, in document order
    pub hrefs: Vec<String>,
    /// Visible body text with whitespace collapsed
    pub text: String,
}

/// Turns a response body into links and text.
pub trait PageParser: Send + Sync {
    fn parse(&self, body: &str) -> Result<ParsedPage>;
}

pub struct HtmlParser {
    links: Selector,
    body: Selector,
}

impl HtmlParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            links: Self::selector("a[href]")?,
            body: Self::selector("body")?,
        })
    }

    fn selector(css: &str) -> Result<Selector> {
        Selector::parse(css).map_err(|e| ScanError::ParseError(format!("selector {}: {:?}", css, e)))
    }
}

impl PageParser for HtmlParser {
    fn parse(&self, body: &str) -> Result<ParsedPage> {
        let document = Html::parse_document(body);

        let hrefs = document
            .select(&self.links)
            .filter_map(|a| a.value().attr("href"))
            .map(str::to_string)
            .collect();

        let mut raw_text = String::new();
        if let Some(body) = document.select(&self.body).next() {
            for node in body.descendants() {
                let Some(text) = node.value().as_text() else {
                    continue;
                };
                let hidden = node.ancestors().any(|ancestor| {
                    ancestor
                        .value()
                        .as_element()
                        .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
                });
                if !hidden {
                    raw_text.push_str(text);
                }
            }
        }

        Ok(ParsedPage {
            hrefs,
            text: collapse_whitespace(&raw_text),
        })
    }
}

/// Collapse every whitespace run to one space and trim both ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize the hrefs of a page, dropping filtered and duplicate links.
/// First-seen order is kept so the frontier fills deterministically.
pub fn extract_links(hrefs: &[String], base: &Url, seed_host: &str) -> Vec<Url> {
    let mut seen = HashSet::new();
    hrefs
        .iter()
        .filter_map(|href| normalize_link(href, base, seed_host))
        .filter(|url| seen.insert(url.as_str().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(html: &str) -> ParsedPage {
        HtmlParser::new().unwrap().parse(html).unwrap()
    }

    #[test]
    fn test_text_is_collapsed_and_trimmed() {
        let page = parse(
            "<html><body>\n\t  Hello\n\n   <b>big</b>\tworld  \n</body></html>",
        );
        assert_eq!(page.text, "Hello big world");
    }

    #[test]
    fn test_text_skips_scripts_and_styles() {
        let page = parse(
            r#"<html><head><title>T</title></head><body>
                <style>.x { color: red }</style>
                <p>Visible</p>
                <script>var hidden = 1;</script>
                <noscript>enable js</noscript>
            </body></html>"#,
        );
        assert_eq!(page.text, "Visible");
    }

    #[test]
    fn test_head_text_is_not_content() {
        let page = parse("<html><head><title>Title only</title></head><body></body></html>");
        assert_eq!(page.text, "");
    }

    #[test]
    fn test_whitespace_only_body_is_empty() {
        let page = parse("<html><body>  \n\t <div>   </div> </body></html>");
        assert!(page.text.is_empty());
    }

    #[test]
    fn test_hrefs_in_document_order() {
        let page = parse(
            r##"<body><a href="/b">B</a><a>no href</a><a href="#x">X</a><a href="/a">A</a></body>"##,
        );
        assert_eq!(page.hrefs, vec!["/b", "#x", "/a"]);
    }

    #[test]
    fn test_non_html_body_still_parses() {
        let page = parse("just some plain text");
        assert_eq!(page.text, "just some plain text");
        assert!(page.hrefs.is_empty());
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\n b\t\tc  "), "a b c");
        assert_eq!(collapse_whitespace("\u{a0}x\u{a0}"), "x");
        assert_eq!(collapse_whitespace(" \n "), "");
    }

    #[test]
    fn test_extract_links_dedups_and_filters() {
        let base = Url::parse("https://ex.com/").unwrap();
        let hrefs: Vec<String> = [
            "/a",
            "https://other.com/x",
            "/a#section",
            "mailto:me@ex.com",
            "#top",
            "/b",
            "https://ex.com/a",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let links = extract_links(&hrefs, &base, "ex.com");
        let links: Vec<&str> = links.iter().map(Url::as_str).collect();
        assert_eq!(links, vec!["https://ex.com/a", "https://ex.com/b"]);
    }
}
