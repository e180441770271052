//! HTML extraction for guide listing and guide detail pages
//!
//! This module handles parsing fetched documents to extract:
//! - Guide links from listing pages
//! - The highest page index advertised by a listing page's pagination
//! - One [`Record`] per guide page

use crate::config::CrawlerConfig;
use crate::record::Record;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use thiserror::Error;
use url::Url;

/// URL path marker shared by every guide detail page
const GUIDE_PATH_MARKER: &str = "/guide/";

/// Errors raised while reading a document
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("{url} does not look like a guide page")]
    NotAGuidePage { url: String },

    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Invalid base URL: {0}")]
    BaseUrl(#[from] url::ParseError),
}

/// Site-specific reading of listing and detail documents
///
/// Implementations are synchronous; the crawler parses a document and runs
/// every extraction on it without yielding.
pub trait Extractor: Send + Sync {
    /// Returns true if `url` points at a detail page
    fn is_detail_url(&self, url: &str) -> bool;

    /// Returns the URL of listing page `page`
    fn listing_url(&self, page: u32) -> String;

    /// Returns the absolute detail page URLs a listing page links to
    fn extract_listing_links(&self, document: &Html) -> Vec<String>;

    /// Returns the highest page index in the pagination control, if any
    fn extract_max_page_index(&self, document: &Html) -> Option<u32>;

    /// Reads one record from a detail page
    fn extract_record(&self, url: &str, document: &Html) -> Result<Record, ExtractError>;
}

/// Compiled selectors for the guide site markup
struct GuideSelectors {
    link: Selector,
    pagination: Selector,
    pagination_item: Selector,
    anchor: Selector,
    title_bar: Selector,
    name: Selector,
    overview: Selector,
    difficulty: Selector,
    time_needed: Selector,
    platforms: Selector,
    platinum_icon: Selector,
    span: Selector,
    guide_info: Selector,
}

impl GuideSelectors {
    fn new() -> Result<Self, ExtractError> {
        Ok(Self {
            link: selector("a[href]")?,
            pagination: selector(".pagination")?,
            pagination_item: selector("li")?,
            anchor: selector("a")?,
            title_bar: selector(".title-bar")?,
            name: selector(".title-bar h3:nth-of-type(1) a:nth-of-type(2)")?,
            overview: selector(".overview-info")?,
            difficulty: selector(".overview-info span:nth-of-type(1) span:nth-of-type(1)")?,
            time_needed: selector(".overview-info span:nth-of-type(3) span:nth-of-type(1)")?,
            platforms: selector(".platforms")?,
            platinum_icon: selector("img[alt=Platinum]")?,
            span: selector("span")?,
            guide_info: selector(".guide-info")?,
        })
    }
}

fn selector(css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|e| ExtractError::InvalidSelector {
        selector: css.to_string(),
        reason: e.to_string(),
    })
}

/// [`Extractor`] for the guide site
pub struct GuideExtractor {
    base_url: Url,
    listing_path: String,
    selectors: GuideSelectors,
}

impl GuideExtractor {
    /// Creates an extractor resolving links against `base_url`
    ///
    /// # Arguments
    ///
    /// * `base_url` - Site root, e.g. `https://psnprofiles.com`
    /// * `listing_path` - Listing path the page index is appended to
    pub fn new(base_url: &str, listing_path: &str) -> Result<Self, ExtractError> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            listing_path: listing_path.to_string(),
            selectors: GuideSelectors::new()?,
        })
    }

    /// Creates an extractor from the crawler configuration
    pub fn from_config(config: &CrawlerConfig) -> Result<Self, ExtractError> {
        Self::new(&config.base_url, &config.listing_path)
    }

    /// Resolves a guide href to an absolute URL without fragment
    fn resolve_link(&self, href: &str) -> Option<String> {
        let mut url = self.base_url.join(href.trim()).ok()?;
        url.set_fragment(None);
        Some(url.to_string())
    }

    fn first_text(&self, document: &Html, selector: &Selector) -> String {
        document
            .select(selector)
            .next()
            .map(|element| element_text(&element))
            .unwrap_or_default()
    }

    fn platforms(&self, document: &Html) -> String {
        document
            .select(&self.selectors.platforms)
            .next()
            .map(|list| {
                child_elements(&list)
                    .map(|platform| element_text(&platform))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default()
    }

    /// Reads the rarity cell of the table row holding the platinum trophy
    fn platinum_rarity(&self, document: &Html) -> String {
        let row = document
            .select(&self.selectors.platinum_icon)
            .next()
            .and_then(|icon| {
                icon.ancestors()
                    .filter_map(ElementRef::wrap)
                    .find(|ancestor| ancestor.value().name() == "tr")
            });

        let Some(row) = row else {
            return String::new();
        };

        let cells: Vec<ElementRef> = child_elements(&row).collect();
        if cells.len() < 2 {
            return String::new();
        }

        child_elements(&cells[cells.len() - 2])
            .next()
            .and_then(|content| content.select(&self.selectors.span).next())
            .map(|span| element_text(&span))
            .unwrap_or_default()
    }

    /// Fills favourites, rating, rating count and views from the block
    /// beside `.guide-info`
    fn read_guide_info(&self, document: &Html, record: &mut Record) {
        let block = document
            .select(&self.selectors.guide_info)
            .next()
            .and_then(|info| info.parent())
            .and_then(ElementRef::wrap)
            .and_then(|parent| {
                child_elements(&parent)
                    .filter(|child| child.value().name() == "div")
                    .nth(1)
            });

        let Some(block) = block else {
            return;
        };

        for (index, item) in child_elements(&block).enumerate() {
            match index {
                0 => record.user_favourites = leading_text(&item),
                1 => {
                    let stars = highest_checked_star(&item);
                    let count = rating_count(&item);

                    record.guide_rating_count = count.to_string();
                    if stars > 0 || count > 0 {
                        record.guide_rating = format!("{}/5", stars);
                    }
                }
                2 => record.views = leading_text(&item),
                _ => break,
            }
        }
    }
}

impl Extractor for GuideExtractor {
    fn is_detail_url(&self, url: &str) -> bool {
        url.contains(GUIDE_PATH_MARKER)
    }

    fn listing_url(&self, page: u32) -> String {
        format!(
            "{}{}{}",
            self.base_url.as_str().trim_end_matches('/'),
            self.listing_path,
            page
        )
    }

    fn extract_listing_links(&self, document: &Html) -> Vec<String> {
        let mut seen = HashSet::new();

        document
            .select(&self.selectors.link)
            .filter_map(|element| element.value().attr("href"))
            .filter(|href| href.contains(GUIDE_PATH_MARKER))
            .filter_map(|href| self.resolve_link(href))
            .filter(|link| seen.insert(link.clone()))
            .collect()
    }

    fn extract_max_page_index(&self, document: &Html) -> Option<u32> {
        let pagination = document.select(&self.selectors.pagination).next()?;

        pagination
            .select(&self.selectors.pagination_item)
            .filter(|item| item.value().attr("class").is_none())
            .filter_map(|item| {
                let text = item
                    .select(&self.selectors.anchor)
                    .next()
                    .map(|anchor| element_text(&anchor))?;

                match text.parse::<u32>() {
                    Ok(page) => Some(page),
                    Err(_) => {
                        tracing::debug!("Page number could not be resolved from '{}'", text);
                        None
                    }
                }
            })
            .max()
    }

    fn extract_record(&self, url: &str, document: &Html) -> Result<Record, ExtractError> {
        let selectors = &self.selectors;

        if document.select(&selectors.title_bar).next().is_none()
            && document.select(&selectors.overview).next().is_none()
        {
            return Err(ExtractError::NotAGuidePage {
                url: url.to_string(),
            });
        }

        let mut record = Record::new(url);
        record.name = self.first_text(document, &selectors.name);
        record.platforms = self.platforms(document);
        record.difficulty = self.first_text(document, &selectors.difficulty);
        record.time_needed = self.first_text(document, &selectors.time_needed);
        record.platinum_rarity = self.platinum_rarity(document);
        self.read_guide_info(document, &mut record);

        Ok(record)
    }
}

fn child_elements<'a>(element: &ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.children().filter_map(ElementRef::wrap)
}

fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Text of the first child node, e.g. `12` in `<div>12 <span>views</span></div>`
fn leading_text(element: &ElementRef) -> String {
    let Some(node) = element.first_child() else {
        return String::new();
    };

    match node.value() {
        Node::Text(text) => text.trim().to_string(),
        Node::Element(_) => ElementRef::wrap(node)
            .map(|child| element_text(&child))
            .unwrap_or_default(),
        _ => String::new(),
    }
}

/// Highest `N` among checked star inputs with an id of the form `x-N`
fn highest_checked_star(rating: &ElementRef) -> u32 {
    child_elements(rating)
        .next()
        .map(|stars| {
            child_elements(&stars)
                .filter(|star| star.value().attr("checked").is_some())
                .filter_map(|star| {
                    let id = star.value().attr("id")?;
                    let parts: Vec<&str> = id.split('-').collect();
                    match parts.as_slice() {
                        [_, n] => n.parse::<u32>().ok(),
                        _ => None,
                    }
                })
                .max()
                .unwrap_or(0)
        })
        .unwrap_or(0)
}

/// Vote count from the trailing `"<n> ratings"` element
fn rating_count(rating: &ElementRef) -> u32 {
    let Some(label) = child_elements(rating).last() else {
        return 0;
    };

    let text = element_text(&label);
    let parts: Vec<&str> = text.split(' ').collect();
    match parts.as_slice() {
        [n, _] => n.parse().unwrap_or(0),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING_PAGE: &str = r##"
        <html><body>
            <div class="guide-list">
                <a href="/guide/1-first-game">First</a>
                <a href="/guide/1-first-game#comments">First, comments</a>
                <a href="https://psnprofiles.com/guide/2-second-game">Second</a>
                <a href="/guides/popular?page=2">Next page</a>
                <a href="/trophies/3-not-a-guide">Trophies</a>
                <a>No href</a>
            </div>
            <ul class="pagination">
                <li class="disabled"><a>&laquo;</a></li>
                <li class="active"><a>1</a></li>
                <li><a href="/guides/popular?page=2">2</a></li>
                <li><a href="/guides/popular?page=3">3</a></li>
                <li><a>...</a></li>
                <li><a href="/guides/popular?page=12">12</a></li>
                <li class="next"><a>&raquo;</a></li>
            </ul>
            <ul class="pagination"><li><a>99</a></li></ul>
        </body></html>
    "##;

    const GUIDE_PAGE: &str = r#"
        <html><body>
            <div class="title-bar">
                <h3><a href="/guides">Guides</a> <a href="/trophies/1-first-game">First Game</a></h3>
            </div>
            <div class="guide-meta">
                <div class="guide-info">By someone</div>
                <div>
                    <div>12 <span>favourites</span></div>
                    <div>
                        <div class="stars">
                            <input id="star-1" checked>
                            <input id="star-2" checked>
                            <input id="star-3" checked>
                            <input id="star-4">
                            <input id="star-5">
                        </div>
                        <span>31 ratings</span>
                    </div>
                    <div>1,204 <span>views</span></div>
                </div>
            </div>
            <div class="overview-info">
                <span class="tag"><span class="typo-top">4/10</span><br><span class="typo-bottom">Difficulty</span></span>
                <span class="tag"><span class="typo-top">2</span><br><span class="typo-bottom">Playthroughs</span></span>
                <span class="tag"><span class="typo-top">40</span><br><span class="typo-bottom">Hours</span></span>
            </div>
            <div class="platforms"><span class="tag">PS4</span><span class="tag">PS5</span></div>
            <table>
                <tr>
                    <td><img alt="Platinum" src="/platinum.png"></td>
                    <td>First Game Platinum</td>
                    <td><span class="hover"><span class="typo-top">12.34%</span><span>Ultra Rare</span></span></td>
                    <td><img alt="Rarity" src="/rarity.png"></td>
                </tr>
            </table>
        </body></html>
    "#;

    fn extractor() -> GuideExtractor {
        GuideExtractor::new("https://psnprofiles.com", "/guides/popular?page=").unwrap()
    }

    #[test]
    fn test_listing_url() {
        assert_eq!(
            extractor().listing_url(3),
            "https://psnprofiles.com/guides/popular?page=3"
        );
    }

    #[test]
    fn test_is_detail_url() {
        let extractor = extractor();
        assert!(extractor.is_detail_url("https://psnprofiles.com/guide/1-first-game"));
        assert!(!extractor.is_detail_url("https://psnprofiles.com/guides/popular?page=1"));
    }

    #[test]
    fn test_extract_listing_links() {
        let document = Html::parse_document(LISTING_PAGE);
        let links = extractor().extract_listing_links(&document);

        assert_eq!(
            links,
            vec![
                "https://psnprofiles.com/guide/1-first-game".to_string(),
                "https://psnprofiles.com/guide/2-second-game".to_string(),
            ]
        );
    }

    #[test]
    fn test_extract_max_page_index_uses_first_pagination() {
        let document = Html::parse_document(LISTING_PAGE);
        assert_eq!(extractor().extract_max_page_index(&document), Some(12));
    }

    #[test]
    fn test_no_pagination_gives_no_candidate() {
        let document = Html::parse_document("<html><body><p>Nothing here</p></body></html>");
        assert_eq!(extractor().extract_max_page_index(&document), None);
    }

    #[test]
    fn test_extract_record() {
        let document = Html::parse_document(GUIDE_PAGE);
        let record = extractor()
            .extract_record("https://psnprofiles.com/guide/1-first-game", &document)
            .unwrap();

        assert_eq!(record.link, "https://psnprofiles.com/guide/1-first-game");
        assert_eq!(record.name, "First Game");
        assert_eq!(record.platforms, "PS4 PS5");
        assert_eq!(record.difficulty, "4/10");
        assert_eq!(record.time_needed, "40");
        assert_eq!(record.platinum_rarity, "12.34%");
        assert_eq!(record.user_favourites, "12");
        assert_eq!(record.guide_rating, "3/5");
        assert_eq!(record.guide_rating_count, "31");
        assert_eq!(record.views, "1,204");
    }

    #[test]
    fn test_unrated_guide_has_empty_rating() {
        let html = GUIDE_PAGE
            .replace(" checked", "")
            .replace("31 ratings", "No ratings yet");
        let document = Html::parse_document(&html);
        let record = extractor()
            .extract_record("https://psnprofiles.com/guide/1-first-game", &document)
            .unwrap();

        assert_eq!(record.guide_rating, "");
        assert_eq!(record.guide_rating_count, "0");
    }

    #[test]
    fn test_missing_sections_leave_fields_empty() {
        let html = r#"<html><body><div class="title-bar"><h3><a>Guides</a><a>Lonely</a></h3></div></body></html>"#;
        let document = Html::parse_document(html);
        let record = extractor()
            .extract_record("https://psnprofiles.com/guide/7-lonely", &document)
            .unwrap();

        assert_eq!(record.name, "Lonely");
        assert_eq!(record.difficulty, "");
        assert_eq!(record.platinum_rarity, "");
        assert_eq!(record.guide_rating_count, "");
    }

    #[test]
    fn test_non_guide_document_is_an_error() {
        let document = Html::parse_document("<html><body><h1>Slow down!</h1></body></html>");
        let result = extractor().extract_record("https://psnprofiles.com/guide/1", &document);
        assert!(matches!(result, Err(ExtractError::NotAGuidePage { .. })));
    }
}
