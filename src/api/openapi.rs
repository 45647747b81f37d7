//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{authors, book_instances, books, genres, health, home};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog Server API",
        version = "0.1.0",
        description = "Local library catalog: authors, books, genres and their copies. \
                       Views are returned as JSON documents tagged with their template name; \
                       form posts take urlencoded bodies and answer with a view or a 303 redirect.",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Home
        home::index,
        // Authors
        authors::author_list,
        authors::author_detail,
        authors::author_create_get,
        authors::author_create_post,
        authors::author_update_get,
        authors::author_update_post,
        authors::author_delete_get,
        authors::author_delete_post,
        // Books
        books::book_list,
        books::book_detail,
        books::book_create_get,
        books::book_create_post,
        books::book_update_get,
        books::book_update_post,
        books::book_delete_get,
        books::book_delete_post,
        // Genres
        genres::genre_list,
        genres::genre_detail,
        genres::genre_create_get,
        genres::genre_create_post,
        genres::genre_update_get,
        genres::genre_update_post,
        genres::genre_delete_get,
        genres::genre_delete_post,
        // Book instances
        book_instances::book_instance_list,
        book_instances::book_instance_detail,
        book_instances::book_instance_create_get,
        book_instances::book_instance_create_post,
        book_instances::book_instance_update_get,
        book_instances::book_instance_update_post,
        book_instances::book_instance_delete_get,
        book_instances::book_instance_delete_post,
    ),
    components(
        schemas(
            crate::models::Author,
            crate::models::Book,
            crate::models::Genre,
            crate::models::BookInstance,
            crate::models::BookInstanceStatus,
            crate::services::validation::Violation,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "catalog", description = "Catalog summary"),
        (name = "authors", description = "Author management"),
        (name = "books", description = "Book management"),
        (name = "genres", description = "Genre management"),
        (name = "bookinstances", description = "Book copy management")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documents_catalog_routes() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        assert!(paths.iter().any(|p| p.as_str() == "/catalog/author/{id}/delete"));
        assert!(paths.iter().any(|p| p.as_str() == "/catalog/bookinstances"));
    }
}
