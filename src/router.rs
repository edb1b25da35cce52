use std::time::Duration;

use axum::{
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::error::ApiError;
use crate::handlers::{method_not_allowed, protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let timeout = state.request_timeout;

    let router = Router::new()
        // Public auth routes
        .merge(auth_public_routes())
        // Protected API
        .merge(
            actor_routes()
                .merge(film_routes())
                .merge(user_routes())
                .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware)),
        );

    // Global middleware
    with_request_timeout(router, timeout)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bounds every request. Dropping the handler future cancels its queries.
fn with_request_timeout<S>(router: Router<S>, timeout: Duration) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(TimeoutLayer::new(timeout))
        .layer(middleware::map_response(timeout_body))
}

/// `TimeoutLayer` answers with an empty 408; give it the plain-text body
/// every other error carries.
async fn timeout_body(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        return ApiError::RequestTimeout.into_response();
    }
    response
}

fn auth_public_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/api/auth/register", post(auth::register_post).fallback(method_not_allowed))
        .route("/api/auth/authenticate", post(auth::authenticate_post).fallback(method_not_allowed))
}

fn actor_routes() -> Router<AppState> {
    use protected::actor;

    Router::new()
        .route(
            "/api/actor",
            get(actor::list).post(actor::create).fallback(method_not_allowed),
        )
        .route(
            "/api/actor/:id",
            get(actor::get)
                .put(actor::put)
                .patch(actor::patch)
                .delete(actor::delete)
                .fallback(method_not_allowed),
        )
}

fn film_routes() -> Router<AppState> {
    use protected::film;

    Router::new()
        .route(
            "/api/film",
            get(film::list).post(film::create).fallback(method_not_allowed),
        )
        // Static segment wins over `:id`
        .route("/api/film/search", get(film::search).fallback(method_not_allowed))
        .route(
            "/api/film/:id",
            get(film::get)
                .put(film::put)
                .patch(film::patch)
                .delete(film::delete)
                .fallback(method_not_allowed),
        )
}

fn user_routes() -> Router<AppState> {
    use protected::user;

    Router::new()
        .route("/api/user", get(user::list).fallback(method_not_allowed))
        .route(
            "/api/user/:id",
            get(user::get)
                .put(user::put)
                .patch(user::patch)
                .delete(user::delete)
                .fallback(method_not_allowed),
        )
}
