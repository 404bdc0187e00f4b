//! Read-only view of a parsed HTML document
//!
//! Extraction only needs three queries: the first element whose class
//! attribute contains a fragment, all elements of a tag carrying a class, and
//! the descendants of an element with a given tag. The traits below expose
//! exactly those, so the extraction rules stay independent of the parser.

use scraper::{ElementRef, Html, Selector};

/// A parsed document that can be queried by class and tag
pub trait Document {
    type Node<'a>: Element
    where
        Self: 'a;

    /// First element (document order) whose `class` attribute contains `fragment`
    fn first_with_class_fragment(&self, fragment: &str) -> Option<Self::Node<'_>>;

    /// All `tag` elements that carry `class` as one of their class tokens
    fn select_all(&self, tag: &str, class: &str) -> Vec<Self::Node<'_>>;
}

/// An element inside a [`Document`]
pub trait Element: Sized {
    /// Concatenated text of the element and all its descendants, untrimmed
    fn text(&self) -> String;

    /// Descendant elements with the given tag name, in document order
    fn descendants(&self, tag: &str) -> Vec<Self>;
}

/// [`Document`] backed by the `scraper` crate
pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    /// Parses a full HTML document. Malformed markup is repaired, never rejected.
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }
}

/// Element of an [`HtmlDocument`]
#[derive(Debug, Clone, Copy)]
pub struct HtmlElement<'a>(ElementRef<'a>);

impl Document for HtmlDocument {
    type Node<'a> = HtmlElement<'a>;

    fn first_with_class_fragment(&self, fragment: &str) -> Option<HtmlElement<'_>> {
        let selector = parse_selector(&format!("[class*=\"{}\"]", fragment))?;
        self.html.select(&selector).next().map(HtmlElement)
    }

    fn select_all(&self, tag: &str, class: &str) -> Vec<HtmlElement<'_>> {
        match parse_selector(&format!("{}.{}", tag, class)) {
            Some(selector) => self.html.select(&selector).map(HtmlElement).collect(),
            None => Vec::new(),
        }
    }
}

impl<'a> Element for HtmlElement<'a> {
    fn text(&self) -> String {
        self.0.text().collect()
    }

    fn descendants(&self, tag: &str) -> Vec<Self> {
        match parse_selector(tag) {
            Some(selector) => self.0.select(&selector).map(HtmlElement).collect(),
            None => Vec::new(),
        }
    }
}

/// Builds a selector, treating an unparseable one as matching nothing
fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(selector) => Some(selector),
        Err(e) => {
            tracing::debug!("Ignoring invalid selector {:?}: {:?}", selector, e);
            None
        }
    }
}
