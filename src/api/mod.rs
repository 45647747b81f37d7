//! HTTP transport for the catalog
//!
//! Handlers decode the path and urlencoded body, call the catalog service
//! and turn the resulting [`Page`] into a response: rendered views become
//! `{"view": NAME, ...}` JSON documents, redirects become `303 See Other`.

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod genres;
pub mod health;
pub mod home;
pub mod openapi;

use axum::{
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    views::{Page, View},
    AppState,
};

/// Decoded urlencoded body. Repeated keys are kept as separate pairs.
pub type FormPairs = axum::Form<Vec<(String, String)>>;

#[derive(Serialize)]
struct Rendered<'a, V> {
    view: &'static str,
    #[serde(flatten)]
    data: &'a V,
}

impl<V: View> IntoResponse for Page<V> {
    fn into_response(self) -> Response {
        match self {
            Page::Render(view) => Json(Rendered {
                view: V::NAME,
                data: &view,
            })
            .into_response(),
            Page::Redirect(location) => Redirect::to(&location).into_response(),
        }
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let catalog = Router::new()
        .route("/", get(home::index))
        // Authors
        .route("/authors", get(authors::author_list))
        .route(
            "/author/create",
            get(authors::author_create_get).post(authors::author_create_post),
        )
        .route("/author/:id", get(authors::author_detail))
        .route(
            "/author/:id/update",
            get(authors::author_update_get).post(authors::author_update_post),
        )
        .route(
            "/author/:id/delete",
            get(authors::author_delete_get).post(authors::author_delete_post),
        )
        // Books
        .route("/books", get(books::book_list))
        .route(
            "/book/create",
            get(books::book_create_get).post(books::book_create_post),
        )
        .route("/book/:id", get(books::book_detail))
        .route(
            "/book/:id/update",
            get(books::book_update_get).post(books::book_update_post),
        )
        .route(
            "/book/:id/delete",
            get(books::book_delete_get).post(books::book_delete_post),
        )
        // Genres
        .route("/genres", get(genres::genre_list))
        .route(
            "/genre/create",
            get(genres::genre_create_get).post(genres::genre_create_post),
        )
        .route("/genre/:id", get(genres::genre_detail))
        .route(
            "/genre/:id/update",
            get(genres::genre_update_get).post(genres::genre_update_post),
        )
        .route(
            "/genre/:id/delete",
            get(genres::genre_delete_get).post(genres::genre_delete_post),
        )
        // Book instances
        .route("/bookinstances", get(book_instances::book_instance_list))
        .route(
            "/bookinstance/create",
            get(book_instances::book_instance_create_get)
                .post(book_instances::book_instance_create_post),
        )
        .route("/bookinstance/:id", get(book_instances::book_instance_detail))
        .route(
            "/bookinstance/:id/update",
            get(book_instances::book_instance_update_get)
                .post(book_instances::book_instance_update_post),
        )
        .route(
            "/bookinstance/:id/delete",
            get(book_instances::book_instance_delete_get)
                .post(book_instances::book_instance_delete_post),
        );

    let api = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .nest("/catalog", catalog)
        .with_state(state);

    Router::new()
        .merge(api)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::IndexView;
    use axum::http::{header::LOCATION, StatusCode};

    #[tokio::test]
    async fn test_rendered_page_is_tagged_with_view_name() {
        let page = Page::Render(IndexView {
            title: "Local Library Home".to_string(),
            error: None,
            data: [("book_count", 2)].into_iter().collect(),
        });

        let response = page.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["view"], "index");
        assert_eq!(json["title"], "Local Library Home");
        assert_eq!(json["data"]["book_count"], 2);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_redirect_is_see_other() {
        let response = Page::<IndexView>::redirect("/catalog/authors").into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/catalog/authors");
    }
}
