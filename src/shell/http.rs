use axum::{
    Extension, Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::modules::history::use_cases::lookup_read_timestamps::inbound::http as lookup_http;
use crate::modules::history::use_cases::record_read::inbound::http as record_http;
use crate::shell::graphql::{self, GRAPHQL_PATH, build_schema};
use crate::shell::state::AppState;

pub fn router(state: AppState) -> Router {
    let schema = build_schema(state.clone());
    Router::new()
        .route(
            "/history/get_node_read_timestamps",
            post(lookup_http::handle),
        )
        .route("/history/{item_id}/read", post(record_http::handle))
        .route(GRAPHQL_PATH, get(graphql::graphiql).post(graphql::graphql))
        .layer(Extension(schema))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod router_tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::modules::history::adapters::inbound::session::USER_HEADER;
    use crate::shared::core::clock::FixedClock;
    use crate::shell::state::AppState;

    use super::router;

    fn make_test_state() -> AppState {
        AppState::in_memory(Arc::new(FixedClock::new(1_700_000_000)))
    }

    fn gql(user: Option<&str>, query: &str) -> Request<Body> {
        let mut builder = Request::post("/gql").header("content-type", "application/json");
        if let Some(user) = user {
            builder = builder.header(USER_HEADER, user);
        }
        let body = serde_json::json!({ "query": query }).to_string();
        builder.body(Body::from(body)).unwrap()
    }

    async fn json_of(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn it_should_mark_and_look_up_reads_over_graphql() {
        let app = router(make_test_state());

        let marked = app
            .clone()
            .oneshot(gql(Some("7"), r#"mutation { markAsRead(itemId: "42") }"#))
            .await
            .unwrap();
        assert_eq!(marked.status(), StatusCode::OK);
        assert_eq!(
            json_of(marked).await["data"]["markAsRead"],
            serde_json::json!(1_700_000_000)
        );

        let looked_up = app
            .oneshot(gql(
                Some("7"),
                r#"{ lastReadTimestamps(itemIds: ["42", "43"]) { itemId lastReadAt } }"#,
            ))
            .await
            .unwrap();
        assert_eq!(
            json_of(looked_up).await["data"]["lastReadTimestamps"],
            serde_json::json!([{ "itemId": "42", "lastReadAt": 1_700_000_000 }])
        );
    }

    #[tokio::test]
    async fn it_should_reject_anonymous_graphql_requests() {
        let response = router(make_test_state())
            .oneshot(gql(None, r#"mutation { markAsRead(itemId: "42") }"#))
            .await
            .unwrap();

        let json = json_of(response).await;
        assert!(json["errors"][0]["message"]
            .as_str()
            .unwrap()
            .contains("anonymous"));
    }

    #[tokio::test]
    async fn it_should_serve_both_rest_endpoints() {
        let app = router(make_test_state());

        let marked = app
            .clone()
            .oneshot(
                Request::post("/history/42/read")
                    .header(USER_HEADER, "7")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(marked.status(), StatusCode::OK);

        let looked_up = app
            .oneshot(
                Request::post("/history/get_node_read_timestamps")
                    .header(USER_HEADER, "7")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"node_ids":["42"]}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            json_of(looked_up).await,
            serde_json::json!({ "42": 1_700_000_000 })
        );
    }
}
