//! REST implementation of the collection API.

use std::marker::PhantomData;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};

use blog_core::ApiError;
use blog_core::domain::{Comment, Entity, EntityId, Post, User};
use blog_core::pagination::{Links, Page, PageRequest};
use blog_core::ports::EntityApi;
use blog_shared::ErrorResponse;
use blog_shared::api::{LINK_HEADER, TOTAL_COUNT_HEADER, collection_path, item_path, search_path};

/// Generic REST client for one entity collection.
pub struct RestEntityApi<E: Entity> {
    client: reqwest::Client,
    base_url: String,
    _entity: PhantomData<fn() -> E>,
}

/// REST post API.
pub type RestPostApi = RestEntityApi<Post>;

/// REST comment API.
pub type RestCommentApi = RestEntityApi<Comment>;

/// REST user API (read-only use: selection candidates).
pub type RestUserApi = RestEntityApi<User>;

impl<E: Entity> RestEntityApi<E> {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            _entity: PhantomData,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn fetch_page(&self, request: RequestBuilder) -> Result<Page<E>, ApiError> {
        let response = send(request).await?;

        let header = |name: &str| {
            response
                .headers()
                .get(name)
                .map(|value| {
                    value
                        .to_str()
                        .map(str::to_owned)
                        .map_err(|e| ApiError::Decode(format!("{name} header: {e}")))
                })
                .transpose()
        };
        let total = header(TOTAL_COUNT_HEADER)?;
        let links = match header(LINK_HEADER)? {
            Some(link) => Links::parse(&link)?,
            None => Links::default(),
        };

        let items: Vec<E> = decode(response).await?;
        let total_items = match total {
            Some(total) => total
                .trim()
                .parse()
                .map_err(|_| ApiError::Decode(format!("{TOTAL_COUNT_HEADER} header: {total}")))?,
            None => items.len() as u64,
        };

        Ok(Page::new(items, total_items, links))
    }
}

#[async_trait]
impl<E: Entity> EntityApi<E> for RestEntityApi<E> {
    async fn list(&self, page: &PageRequest) -> Result<Page<E>, ApiError> {
        let url = self.url(&collection_path(E::COLLECTION));
        tracing::debug!(entity = E::NAME, %url, page = page.page, size = page.size, "Fetching list");

        self.fetch_page(self.client.get(url).query(&page.query_pairs()))
            .await
    }

    async fn search(&self, query: &str, page: &PageRequest) -> Result<Page<E>, ApiError> {
        let url = self.url(&search_path(E::COLLECTION));
        tracing::debug!(entity = E::NAME, %url, query, "Searching");

        let mut params = vec![("query", query.to_string())];
        params.extend(page.query_pairs());
        self.fetch_page(self.client.get(url).query(&params)).await
    }

    async fn get(&self, id: EntityId) -> Result<E, ApiError> {
        let url = self.url(&item_path(E::COLLECTION, id));
        tracing::debug!(entity = E::NAME, %url, "Fetching entity");

        decode(send(self.client.get(url)).await?).await
    }

    async fn create(&self, entity: &E) -> Result<E, ApiError> {
        let url = self.url(&collection_path(E::COLLECTION));
        tracing::debug!(entity = E::NAME, %url, "Creating entity");

        decode(send(self.client.post(url).json(entity)).await?).await
    }

    async fn update(&self, entity: &E) -> Result<E, ApiError> {
        let url = self.url(&collection_path(E::COLLECTION));
        tracing::debug!(entity = E::NAME, %url, id = entity.id(), "Updating entity");

        decode(send(self.client.put(url).json(entity)).await?).await
    }

    async fn delete(&self, id: EntityId) -> Result<(), ApiError> {
        let url = self.url(&item_path(E::COLLECTION, id));
        tracing::debug!(entity = E::NAME, %url, "Deleting entity");

        send(self.client.delete(url)).await?;
        Ok(())
    }
}

/// Send a request, turning transport failures and non-2xx responses into errors.
async fn send(request: RequestBuilder) -> Result<Response, ApiError> {
    let response = request
        .send()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;

    if response.status().is_success() {
        Ok(response)
    } else {
        Err(error_from_response(response).await)
    }
}

/// Prefer the problem-details body, fall back to the raw body or status text.
async fn error_from_response(response: Response) -> ApiError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    let message = match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(problem) => problem.summary(),
        Err(_) if !body.trim().is_empty() => body,
        Err(_) => status.canonical_reason().unwrap_or("Unknown status").to_string(),
    };

    ApiError::Status {
        status: status.as_u16(),
        message,
    }
}

async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response
        .json()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn api<E: Entity>(server: &MockServer) -> RestEntityApi<E> {
        RestEntityApi::new(reqwest::Client::new(), server.uri())
    }

    #[tokio::test]
    async fn test_list_reads_pagination_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/posts"))
            .and(query_param("page", "1"))
            .and(query_param("size", "2"))
            .and(query_param("sort", "id,asc"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("X-Total-Count", "5")
                    .insert_header(
                        "Link",
                        r#"</api/posts?page=2&size=2>; rel="next",</api/posts?page=0&size=2>; rel="prev",</api/posts?page=2&size=2>; rel="last",</api/posts?page=0&size=2>; rel="first""#,
                    )
                    .set_body_json(json!([
                        {"id": 3, "title": "third", "content": "c"},
                        {"id": 4, "title": "fourth", "content": "d", "creator": {"id": 1, "login": "admin"}}
                    ])),
            )
            .mount(&server)
            .await;

        let page = api::<Post>(&server)
            .list(&PageRequest::new(1, 2).sorted("id,asc"))
            .await
            .unwrap();

        assert_eq!(page.total_items, 5);
        assert_eq!(page.links.next, Some(2));
        assert_eq!(page.links.prev, Some(0));
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[1].creator, Some(User::new(1, "admin")));
    }

    #[tokio::test]
    async fn test_empty_collection() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/comments"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("X-Total-Count", "0")
                    .set_body_json(json!([])),
            )
            .mount(&server)
            .await;

        let page = api::<Comment>(&server)
            .list(&PageRequest::default())
            .await
            .unwrap();

        assert_eq!(page.total_items, 0);
        assert!(page.items.is_empty());
        assert_eq!(page.links, Links::default());
    }

    #[tokio::test]
    async fn test_search_sends_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/_search/comments"))
            .and(query_param("query", "id:7"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("X-Total-Count", "1")
                    .set_body_json(json!([{"id": 7, "text": "AAAAAAAAAA"}])),
            )
            .mount(&server)
            .await;

        let page = api::<Comment>(&server)
            .search("id:7", &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.items[0].id, Some(7));
    }

    #[tokio::test]
    async fn test_create_omits_absent_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/comments"))
            .and(body_json(json!({"text": "hi", "creationDate": "2020-01-01"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": 1, "text": "hi", "creationDate": "2020-01-01", "post": null
            })))
            .mount(&server)
            .await;

        let saved = api::<Comment>(&server)
            .create(&Comment::new("hi", NaiveDate::from_ymd_opt(2020, 1, 1)))
            .await
            .unwrap();

        assert_eq!(saved.id, Some(1));
        assert_eq!(saved.post, None);
    }

    #[tokio::test]
    async fn test_problem_details_become_error_message() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/comments"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "type": "https://www.jhipster.tech/problem/problem-with-message",
                "title": "Bad Request",
                "status": 400,
                "detail": "Invalid id",
                "message": "error.idnull",
                "entityName": "comment",
                "errorKey": "idnull"
            })))
            .mount(&server)
            .await;

        let mut comment = Comment::new("x", None);
        comment.id = Some(1);
        let err = api::<Comment>(&server).update(&comment).await.unwrap_err();

        assert_eq!(
            err,
            ApiError::Status {
                status: 400,
                message: "Bad Request: Invalid id".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_delete_and_missing_entity() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/comments/3"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/comments/3"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let api = api::<Comment>(&server);
        api.delete(3).await.unwrap();

        let err = api.get(3).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert!(err.to_string().contains("Not Found"));
    }

    #[tokio::test]
    async fn test_malformed_total_count() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/posts"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("X-Total-Count", "many")
                    .set_body_json(json!([])),
            )
            .mount(&server)
            .await;

        let err = api::<Post>(&server)
            .list(&PageRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
