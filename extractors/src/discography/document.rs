use super::text::normalize_whitespace;
use scraper::{ElementRef, Html, Selector};

/// Section heading depth searched for a release table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingLevel {
    Primary,
    Secondary,
}

impl HeadingLevel {
    /// Levels in the order they are searched.
    pub const SEARCH_ORDER: [HeadingLevel; 2] = [HeadingLevel::Primary, HeadingLevel::Secondary];

    pub fn tag(&self) -> &'static str {
        match self {
            HeadingLevel::Primary => "h2",
            HeadingLevel::Secondary => "h3",
        }
    }
}

/// A fetched HTML page together with its `<title>` text.
pub struct ParsedDocument {
    html: Html,
    title: String,
}

impl ParsedDocument {
    pub fn parse(body: &str) -> Self {
        let html = Html::parse_document(body);
        let title = first_descendant(html.root_element(), "title")
            .map(|title| element_text(&title))
            .unwrap_or_default();

        Self { html, title }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// First heading at `level` whose text contains `needle`, ignoring case.
    pub fn find_heading(&self, level: HeadingLevel, needle: &str) -> Option<ElementRef<'_>> {
        let needle = needle.to_lowercase();
        self.html
            .select(&selector(level.tag()))
            .find(|heading| element_text(heading).to_lowercase().contains(&needle))
    }

    /// Nearest `<table>` after `anchor` in document order.
    ///
    /// The table does not have to be a sibling of the anchor; Parsoid output
    /// often wraps tables in `<section>` or `<div>` elements.
    pub fn following_table<'a>(&'a self, anchor: ElementRef<'a>) -> Option<ElementRef<'a>> {
        let anchor_id = (*anchor).id();
        self.html
            .tree
            .root()
            .descendants()
            .skip_while(|node| node.id() != anchor_id)
            .skip(1)
            .filter_map(ElementRef::wrap)
            .find(|element| element.value().name() == "table")
    }
}

/// Text content of an element with whitespace collapsed.
pub fn element_text(element: &ElementRef<'_>) -> String {
    normalize_whitespace(&element.text().collect::<String>())
}

/// First descendant of `element` matching the tag name `tag`.
pub fn first_descendant<'a>(element: ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
    element.select(&selector(tag)).next()
}

/// All descendants of `element` matching `tag`, in document order.
pub fn descendants<'a>(element: ElementRef<'a>, tag: &str) -> Vec<ElementRef<'a>> {
    element.select(&selector(tag)).collect()
}

fn selector(tag: &str) -> Selector {
    // Only called with plain tag names
    Selector::parse(tag).expect("tag names are valid selectors")
}
