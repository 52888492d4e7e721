use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

lazy_static! {
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
    static ref CURRENCY_RE: Regex = Regex::new(r"(?:US|A|C)?[\$£€¥₹]").unwrap();
}

/// Collapses runs of whitespace into single spaces and trims the ends.
pub fn clean_text(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").trim().to_string()
}

/// Removes currency symbols (and `US$`/`A$`/`C$` prefixes) from a price label.
pub fn strip_currency(text: &str) -> String {
    clean_text(&CURRENCY_RE.replace_all(text, ""))
}

/// Parsed product page. Holds the DOM, so it is built and dropped inside
/// synchronous code and never lives across an `.await`.
pub struct PageExtractor {
    document: Html,
}

impl PageExtractor {
    pub fn new(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    /// Cleaned text of the first element matching `css`, if it has any.
    pub fn text_of(&self, css: &str) -> Option<String> {
        let sel = Selector::parse(css).ok()?;
        self.document
            .select(&sel)
            .find_map(|elem| non_empty(element_text(&elem)))
    }

    /// Contents of the document's `<title>` element.
    pub fn document_title(&self) -> Option<String> {
        self.text_of("title")
    }
}

fn element_text(elem: &ElementRef) -> String {
    clean_text(&elem.text().collect::<String>())
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
