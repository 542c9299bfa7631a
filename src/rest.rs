use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::{
    handlers::{account, articles, news, newsletter, reset},
    state::AppState,
};

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    Router::new()
        .route("/api/user/signup", post(account::signup))
        .route("/api/user/login", post(account::login))
        .route("/api/user/profile", get(account::profile))
        .route(
            "/api/user/preferences",
            get(account::preferences).put(account::update_preferences),
        )
        .route("/api/user/request-reset", post(reset::request_reset))
        .route("/api/user/reset-password", post(reset::reset_password))
        .route("/api/news/search", get(news::search))
        .route("/api/news/liked", get(articles::liked))
        .route("/api/news/saved", get(articles::saved))
        .route(
            "/api/news/like",
            post(articles::toggle_like).delete(articles::unlike),
        )
        .route(
            "/api/news/save",
            post(articles::toggle_save).delete(articles::unsave),
        )
        .route("/api/news/status", get(articles::status))
        .route("/api/news/recommendations", get(news::recommendations))
        .route("/api/newsletter/subscribe", post(newsletter::subscribe))
        .route("/api/newsletter/unsubscribe", get(newsletter::unsubscribe))
        .route(
            "/api/newsletter/confirm-unsubscribe",
            get(newsletter::confirm_unsubscribe),
        )
        .layer(cors)
        .with_state(state)
}
