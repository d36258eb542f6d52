//! REST resource paths and header names of the conventional collection API.

/// Header carrying the total number of items of a paginated collection.
pub const TOTAL_COUNT_HEADER: &str = "X-Total-Count";

/// RFC 8288 header carrying the pagination cursors.
pub const LINK_HEADER: &str = "Link";

/// `/api/<collection>`
pub fn collection_path(collection: &str) -> String {
    format!("/api/{collection}")
}

/// `/api/_search/<collection>`
pub fn search_path(collection: &str) -> String {
    format!("/api/_search/{collection}")
}

/// `/api/<collection>/{id}`
pub fn item_path(collection: &str, id: i64) -> String {
    format!("/api/{collection}/{id}")
}
