//! Collection-resource handlers, generic over the entity type.

use actix_web::http::header;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use blog_core::domain::{Entity, EntityId};
use blog_core::pagination::{DEFAULT_PAGE_SIZE, Page, PageRequest};
use blog_core::ports::EntityApi;
use blog_infra::InMemoryEntityApi;
use blog_shared::api::{LINK_HEADER, TOTAL_COUNT_HEADER, collection_path, item_path, search_path};

use crate::middleware::error::{AppError, AppResult};

type Storage<E> = web::Data<InMemoryEntityApi<E>>;

/// Register the six collection routes of `E` (relative to `/api`).
pub fn routes<E: Entity>(cfg: &mut web::ServiceConfig) {
    let collection_route = format!("/{}", E::COLLECTION);
    let item_route = format!("/{}/{{id}}", E::COLLECTION);
    let search_route = format!("/_search/{}", E::COLLECTION);

    cfg.route(&collection_route, web::get().to(list::<E>))
        .route(&collection_route, web::post().to(create::<E>))
        .route(&collection_route, web::put().to(update::<E>))
        .route(&item_route, web::get().to(get::<E>))
        .route(&item_route, web::delete().to(delete::<E>))
        .route(&search_route, web::get().to(search::<E>));
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: u32,
    #[serde(default = "default_size")]
    pub size: u32,
    pub sort: Option<String>,
}

fn default_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl PageQuery {
    fn into_request(self) -> PageRequest {
        PageRequest {
            page: self.page,
            size: self.size.max(1),
            sort: self.sort,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    #[serde(default)]
    pub page: u32,
    #[serde(default = "default_size")]
    pub size: u32,
    pub sort: Option<String>,
}

/// Collection page with `X-Total-Count` and `Link` headers.
fn paged<E: Entity>(path: &str, request: &PageRequest, page: Page<E>) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((TOTAL_COUNT_HEADER, page.total_items.to_string()))
        .insert_header((LINK_HEADER, page.links.to_header(path, request.size)))
        .json(page.items)
}

/// GET /api/<entities>?page=&size=&sort=
pub async fn list<E: Entity>(
    storage: Storage<E>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let request = query.into_inner().into_request();
    let page = storage
        .list(&request)
        .await
        .map_err(|e| AppError::from_api(E::NAME, e))?;

    Ok(paged(&collection_path(E::COLLECTION), &request, page))
}

/// GET /api/_search/<entities>?query=&page=&size=&sort=
pub async fn search<E: Entity>(
    storage: Storage<E>,
    query: web::Query<SearchQuery>,
) -> AppResult<HttpResponse> {
    let SearchQuery {
        query,
        page,
        size,
        sort,
    } = query.into_inner();
    let request = PageQuery { page, size, sort }.into_request();
    tracing::debug!(entity = E::NAME, %query, "Search request");

    let page = storage
        .search(&query, &request)
        .await
        .map_err(|e| AppError::from_api(E::NAME, e))?;

    Ok(paged(&search_path(E::COLLECTION), &request, page))
}

/// GET /api/<entities>/{id}
pub async fn get<E: Entity>(
    storage: Storage<E>,
    id: web::Path<EntityId>,
) -> AppResult<HttpResponse> {
    let entity = storage
        .get(id.into_inner())
        .await
        .map_err(|e| AppError::from_api(E::NAME, e))?;

    Ok(HttpResponse::Ok().json(entity))
}

/// POST /api/<entities>
pub async fn create<E: Entity>(storage: Storage<E>, body: web::Json<E>) -> AppResult<HttpResponse> {
    let saved = storage
        .create(&body.into_inner())
        .await
        .map_err(|e| AppError::from_api(E::NAME, e))?;

    let location = saved
        .id()
        .map(|id| item_path(E::COLLECTION, id))
        .unwrap_or_default();
    tracing::info!(entity = E::NAME, id = saved.id(), "Created");

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, location))
        .json(saved))
}

/// PUT /api/<entities>
pub async fn update<E: Entity>(storage: Storage<E>, body: web::Json<E>) -> AppResult<HttpResponse> {
    let saved = storage
        .update(&body.into_inner())
        .await
        .map_err(|e| AppError::from_api(E::NAME, e))?;
    tracing::info!(entity = E::NAME, id = saved.id(), "Updated");

    Ok(HttpResponse::Ok().json(saved))
}

/// DELETE /api/<entities>/{id}
pub async fn delete<E: Entity>(
    storage: Storage<E>,
    id: web::Path<EntityId>,
) -> AppResult<HttpResponse> {
    let id = id.into_inner();
    storage
        .delete(id)
        .await
        .map_err(|e| AppError::from_api(E::NAME, e))?;
    tracing::info!(entity = E::NAME, id, "Deleted");

    Ok(HttpResponse::NoContent().finish())
}
