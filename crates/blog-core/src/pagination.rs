//! Pagination contract of the collection endpoints.
//!
//! Requests carry `page`/`size`/`sort` query parameters. Responses carry the
//! total number of items in `X-Total-Count` and the page cursors in an
//! RFC 8288 `Link` header:
//!
//! ```text
//! </api/comments?page=1&size=20>; rel="next",</api/comments?page=4&size=20>; rel="last",...
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Which slice of a collection to fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    /// Sort expression such as `id,asc`.
    pub sort: Option<String>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_SIZE)
    }
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size,
            sort: None,
        }
    }

    pub fn sorted(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Query parameters in the order the endpoints document them.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.to_string()), ("size", self.size.to_string())];
        if let Some(sort) = &self.sort {
            pairs.push(("sort", sort.clone()));
        }
        pairs
    }
}

/// Page cursors of a collection response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    pub first: Option<u32>,
    pub prev: Option<u32>,
    pub next: Option<u32>,
    pub last: Option<u32>,
}

impl Links {
    /// Cursors for `page` of a collection of `total` items split in pages of `size`.
    pub fn for_page(page: u32, size: u32, total: u64) -> Self {
        let size = u64::from(size.max(1));
        let pages = total.div_ceil(size);
        let last = u32::try_from(pages.saturating_sub(1)).unwrap_or(u32::MAX);

        Self {
            first: Some(0),
            prev: (page > 0).then(|| page - 1),
            next: (u64::from(page) + 1 < pages).then(|| page + 1),
            last: Some(last),
        }
    }

    /// The collection fits in one page.
    pub fn is_single_page(&self) -> bool {
        self.first == self.last
    }

    /// Parse a `Link` header value.
    ///
    /// Each section must be `<url>; rel="name"`; the cursor is the `page`
    /// query parameter of the url. Unknown relations are ignored.
    pub fn parse(header: &str) -> Result<Self, ApiError> {
        if header.trim().is_empty() {
            return Err(ApiError::Decode("link header must not be empty".to_string()));
        }

        let mut links = Links::default();
        for section in split_sections(header) {
            let mut parts = section.split(';');
            let (Some(target), Some(rel), None) = (parts.next(), parts.next(), parts.next()) else {
                return Err(ApiError::Decode(format!(
                    "link section could not be split on ';': {section}"
                )));
            };

            let url = target.trim().trim_start_matches('<').trim_end_matches('>');
            let page = url
                .split_once('?')
                .map(|(_, query)| query)
                .unwrap_or_default()
                .split('&')
                .filter_map(|pair| pair.split_once('='))
                .find(|(key, _)| *key == "page")
                .and_then(|(_, value)| value.parse::<u32>().ok());

            let name = rel.trim().trim_start_matches("rel=").trim_matches('"');
            match name {
                "first" => links.first = page,
                "prev" => links.prev = page,
                "next" => links.next = page,
                "last" => links.last = page,
                _ => {}
            }
        }

        Ok(links)
    }

    /// Render the cursors as a `Link` header value for `path`.
    pub fn to_header(&self, path: &str, size: u32) -> String {
        [
            ("next", self.next),
            ("prev", self.prev),
            ("last", self.last),
            ("first", self.first),
        ]
        .into_iter()
        .filter_map(|(rel, page)| {
            page.map(|page| format!("<{path}?page={page}&size={size}>; rel=\"{rel}\""))
        })
        .collect::<Vec<_>>()
        .join(",")
    }
}

/// Split a header on the commas that separate sections, leaving commas that
/// belong to a url (`sort=id,asc`) alone.
fn split_sections(header: &str) -> Vec<String> {
    let mut sections: Vec<String> = Vec::new();
    for piece in header.split(',') {
        match sections.last_mut() {
            Some(current) if !piece.trim_start().starts_with('<') => {
                current.push(',');
                current.push_str(piece);
            }
            _ => sections.push(piece.to_string()),
        }
    }
    sections
}

/// One page of a collection response.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<E> {
    pub items: Vec<E>,
    pub total_items: u64,
    pub links: Links,
}

impl<E> Page<E> {
    pub fn new(items: Vec<E>, total_items: u64, links: Links) -> Self {
        Self {
            items,
            total_items,
            links,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), 0, Links::for_page(0, DEFAULT_PAGE_SIZE, 0))
    }
}

/// Fold a freshly loaded page into the entities already held.
///
/// The page replaces the held entities when the collection is a single page,
/// when the page is the first one, or when nothing is held yet. Later pages
/// are appended so scrolling accumulates the collection.
pub fn merge_page<E>(mut held: Vec<E>, page: Page<E>) -> Vec<E> {
    if page.links.is_single_page() || page.links.prev.is_none() || held.is_empty() {
        return page.items;
    }
    held.extend(page.items);
    held
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_link_header() {
        let header = r#"</api/comments?page=2&size=20>; rel="next",</api/comments?page=0&size=20>; rel="prev",</api/comments?page=4&size=20>; rel="last",</api/comments?page=0&size=20>; rel="first""#;
        let links = Links::parse(header).unwrap();

        assert_eq!(
            links,
            Links {
                first: Some(0),
                prev: Some(0),
                next: Some(2),
                last: Some(4),
            }
        );
    }

    #[test]
    fn test_parse_keeps_commas_inside_urls() {
        let header = r#"</api/posts?sort=id,asc&page=1&size=5>; rel="next", </api/posts?sort=id,asc&page=3&size=5>; rel="last""#;
        let links = Links::parse(header).unwrap();
        assert_eq!(links.next, Some(1));
        assert_eq!(links.last, Some(3));
        assert_eq!(links.first, None);
    }

    #[test]
    fn test_parse_rejects_malformed_header() {
        assert!(matches!(Links::parse(""), Err(ApiError::Decode(_))));
        assert!(matches!(
            Links::parse("</api/posts?page=1>"),
            Err(ApiError::Decode(_))
        ));
    }

    #[test]
    fn test_header_round_trips_through_parse() {
        let links = Links::for_page(1, 10, 35);
        assert_eq!(links.prev, Some(0));
        assert_eq!(links.next, Some(2));
        assert_eq!(links.last, Some(3));

        let parsed = Links::parse(&links.to_header("/api/posts", 10)).unwrap();
        assert_eq!(parsed, links);
    }

    #[test]
    fn test_links_for_empty_collection() {
        let links = Links::for_page(0, 20, 0);
        assert!(links.is_single_page());
        assert_eq!(links.next, None);
        assert_eq!(links.prev, None);
    }

    #[test]
    fn test_merge_appends_later_pages() {
        let held = vec![1, 2];
        let page = Page::new(vec![3, 4], 6, Links::for_page(1, 2, 6));
        assert_eq!(merge_page(held, page), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_merge_replaces_on_first_page() {
        let held = vec![1, 2, 3, 4];
        let page = Page::new(vec![9, 8], 6, Links::for_page(0, 2, 6));
        assert_eq!(merge_page(held, page), vec![9, 8]);
    }

    #[test]
    fn test_query_pairs() {
        let request = PageRequest::new(2, 5).sorted("id,desc");
        assert_eq!(
            request.query_pairs(),
            vec![
                ("page", "2".to_string()),
                ("size", "5".to_string()),
                ("sort", "id,desc".to_string()),
            ]
        );
        assert_eq!(PageRequest::default().query_pairs().len(), 2);
    }
}
