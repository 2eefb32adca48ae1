mod chain;
mod health;
pub mod models;
mod nodes;
mod tx;

use actix_web::web::{self, ServiceConfig};

use crate::error::Error;
pub use models::AppState;

pub fn init_routes(cfg: &mut ServiceConfig) {
    // Bodies that fail to decode are malformed input, reported like any other.
    let json_config = web::JsonConfig::default()
        .error_handler(|err, _req| Error::MalformedInput(err.to_string()).into());

    cfg.app_data(json_config).service(
        web::scope("/api/v1")
            .service(health::health_check)
            .service(chain::get_chain)
            .service(chain::validate_chain)
            .service(chain::mine_block)
            .service(tx::post_transaction)
            .service(nodes::connect_nodes)
            .service(nodes::resolve_chain),
    );
}

#[cfg(test)]
mod tests {
    use super::{AppState, init_routes};
    use crate::node::tests::test_node;
    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use serde_json::{Value, json};
    use std::time::Duration;

    fn state() -> web::Data<AppState> {
        web::Data::new(AppState {
            node: test_node(),
            peer_timeout: Duration::from_millis(200),
        })
    }

    #[actix_web::test]
    async fn chain_starts_at_genesis() {
        let app = test::init_service(App::new().app_data(state()).configure(init_routes)).await;
        let req = test::TestRequest::get().uri("/api/v1/chain/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["length"], 1);
        assert_eq!(body["chain"][0]["index"], 1);
        assert_eq!(body["chain"][0]["proof"], 1);
        assert_eq!(body["chain"][0]["previous_hash"], "0");
    }

    #[actix_web::test]
    async fn transaction_then_mine() {
        let app = test::init_service(App::new().app_data(state()).configure(init_routes)).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/transactions/")
            .set_json(json!({ "sender": "alice", "receiver": "bob", "amount": 10 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["index"], 2);

        let req = test::TestRequest::post().uri("/api/v1/mine/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["index"], 2);
        assert_eq!(body["transactions"].as_array().unwrap().len(), 2);
        assert_eq!(body["transactions"][0]["sender"], "alice");

        let req = test::TestRequest::get().uri("/api/v1/validate/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["valid"], true);
        assert_eq!(body["length"], 2);
    }

    #[actix_web::test]
    async fn transaction_missing_amount_is_bad_request() {
        let app = test::init_service(App::new().app_data(state()).configure(init_routes)).await;
        let req = test::TestRequest::post()
            .uri("/api/v1/transactions/")
            .set_json(json!({ "sender": "alice", "receiver": "bob" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("amount"));
    }

    #[actix_web::test]
    async fn negative_and_fractional_amounts_are_accepted() {
        let app = test::init_service(App::new().app_data(state()).configure(init_routes)).await;
        for (amount, index) in [(json!(-3), 2), (json!(2.5), 2)] {
            let req = test::TestRequest::post()
                .uri("/api/v1/transactions/")
                .set_json(json!({ "sender": "alice", "receiver": "bob", "amount": amount }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::CREATED);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["index"], index);
        }

        let req = test::TestRequest::post().uri("/api/v1/mine/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["transactions"][0]["amount"], json!(-3));
        assert_eq!(body["transactions"][1]["amount"], json!(2.5));
    }

    #[actix_web::test]
    async fn string_amount_is_bad_request() {
        let app = test::init_service(App::new().app_data(state()).configure(init_routes)).await;
        let req = test::TestRequest::post()
            .uri("/api/v1/transactions/")
            .set_json(json!({ "sender": "alice", "receiver": "bob", "amount": "5" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn mine_response_is_message_plus_flat_block() {
        let app = test::init_service(App::new().app_data(state()).configure(init_routes)).await;
        let req = test::TestRequest::post().uri("/api/v1/mine/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["message"], "Block #2 mined");
        assert_eq!(body["index"], 2);
        assert!(body["previous_hash"].is_string());
        assert!(body["timestamp"].is_i64());
        assert!(body.get("block").is_none());
    }

    #[actix_web::test]
    async fn connect_nodes_and_resolve_with_dead_peer() {
        let app = test::init_service(App::new().app_data(state()).configure(init_routes)).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/nodes/")
            .set_json(json!({ "nodes": ["http://127.0.0.1:9", "127.0.0.1:9"] }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["total_nodes"], json!(["127.0.0.1:9"]));

        let req = test::TestRequest::get().uri("/api/v1/nodes/resolve/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["replaced"], false);
        assert_eq!(body["chain"].as_array().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn connect_without_nodes_is_bad_request() {
        let app = test::init_service(App::new().app_data(state()).configure(init_routes)).await;
        let req = test::TestRequest::post()
            .uri("/api/v1/nodes/")
            .set_json(json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
