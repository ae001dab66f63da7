use axum::http::StatusCode;
use axum::{Json, Router};
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};

use utoipa::OpenApi as OpenApiT;
use utoipa_swagger_ui::SwaggerUi;

use crate::{AppState, dto::ApiResponse, handlers};

pub fn api_router<T: OpenApiT>(_state: AppState) -> Router<AppState> {
    let open_api = T::openapi();

    // Everything a user owns hangs off "/v1/users/{user_id}"
    let users_router = Router::new()
        .route("/", post(handlers::create_profile))
        .route(
            "/{user_id}",
            get(handlers::get_profile).patch(handlers::update_profile),
        )
        .route(
            "/{user_id}/setup",
            get(handlers::get_setup).post(handlers::register_setup),
        )
        .route(
            "/{user_id}/goals",
            get(handlers::get_active_goals).post(handlers::calculate_goals),
        )
        .route("/{user_id}/goals/{cycle}", get(handlers::get_cycle_goals))
        .route("/{user_id}/cycle", get(handlers::get_cycle_state))
        .route("/{user_id}/cycle/advance", post(handlers::advance_cycle))
        .route(
            "/{user_id}/operations/preview",
            post(handlers::preview_operation),
        )
        .route("/{user_id}/operations", post(handlers::record_operation))
        .route(
            "/{user_id}/cycles/{cycle}/operations",
            get(handlers::list_cycle_operations),
        )
        .route("/{user_id}/statistics", get(handlers::list_statistics))
        .route(
            "/{user_id}/statistics/recompute",
            post(handlers::recompute_statistics),
        )
        .route("/{user_id}/dashboard", get(handlers::get_dashboard))
        .route("/{user_id}/journal", delete(handlers::reset_journal));

    Router::new()
        .route("/health", get(health))
        .nest("/v1/users", users_router)
        .merge(SwaggerUi::new("/v1/docs").url("/v1/docs/openapi.json", open_api))
        .fallback(handler_404)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn handler_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::error(
            "The requested resource was not found".to_string(),
        )),
    )
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, header};
    use tower::ServiceExt;

    use daytrade_metrics::MetricsRegistry;

    use super::*;
    use crate::docs::ApiDoc;

    // The pool never connects: every request below is settled before the
    // handler reaches the database.
    fn app() -> Router {
        let pool = daytrade_db::init_pool("postgres://localhost:1/unused", 1).unwrap();
        let state = AppState {
            pool,
            metrics: MetricsRegistry::new(),
        };
        api_router::<ApiDoc>(state.clone()).with_state(state)
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    const USER: &str = "/v1/users/6f1c1c4e-8f7a-4d7e-9a55-2c3f4b5a6d7e";

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let response = app()
            .oneshot(Request::get("/v1/nothing").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_user_id_is_rejected() {
        let response = app()
            .oneshot(
                Request::get("/v1/users/not-a-uuid/setup")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unparseable_amount_is_rejected() {
        let response = app()
            .oneshot(json_request(
                "POST",
                &format!("{USER}/setup"),
                r#"{"market_mode":"spot","box1":"lots","box2":"10"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_empty_boxes_are_rejected() {
        let response = app()
            .oneshot(json_request(
                "POST",
                &format!("{USER}/setup"),
                r#"{"box1":"R$ 0,00","box2":"0"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_out_of_range_day_is_rejected() {
        let response = app()
            .oneshot(json_request(
                "POST",
                &format!("{USER}/operations"),
                r#"{"day":31,"operation_type":"profit","amount":"10"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invalid_goal_percentage_is_rejected() {
        let response = app()
            .oneshot(json_request(
                "POST",
                &format!("{USER}/goals"),
                r#"{"initial_investment":"1000","return_percentage":"150"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_oversized_amounts_are_rejected() {
        let cases = [
            (
                "goals",
                r#"{"initial_investment":"79228162514264337593543950","return_percentage":"100"}"#,
            ),
            (
                "goals",
                r#"{"initial_investment":"1000","return_percentage":"50"}"#,
            ),
            (
                "setup",
                r#"{"box1":"1000000000000000000","box2":"0"}"#,
            ),
            (
                "operations",
                r#"{"day":1,"operation_type":"profit","amount":"79228162514264337593543950"}"#,
            ),
        ];

        for (path, body) in cases {
            let response = app()
                .oneshot(json_request("POST", &format!("{USER}/{path}"), body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{path}: {body}");
        }
    }

    #[tokio::test]
    async fn test_blank_profile_name_is_rejected() {
        let response = app()
            .oneshot(json_request(
                "POST",
                "/v1/users",
                r#"{"name":"  ","email":"ana@example.com"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
