use catalog_core::db::open_db_in_memory;
use catalog_core::{ProductService, SqliteProductRepository};
use catalog_rpc::{CatalogHandler, MessagePattern, RpcRequest, RpcResponse};
use rusqlite::Connection;
use serde_json::{json, Value};

fn handler(conn: &Connection) -> CatalogHandler<SqliteProductRepository<'_>> {
    let repo = SqliteProductRepository::try_new(conn).unwrap();
    CatalogHandler::new(ProductService::new(repo), 10)
}

fn call(
    handler: &CatalogHandler<SqliteProductRepository<'_>>,
    cmd: &str,
    payload: Value,
) -> RpcResponse {
    handler.handle(RpcRequest {
        cmd: cmd.to_string(),
        payload,
        request_id: None,
    })
}

#[test]
fn create_find_remove_and_list_scenario() {
    let conn = open_db_in_memory().unwrap();
    let handler = handler(&conn);

    let a = call(&handler, "create_product", json!({ "name": "A", "price": 10 }));
    assert!(a.ok, "{:?}", a.error);
    assert_eq!(a.data.as_ref().unwrap()["id"], 1);
    assert_eq!(a.data.as_ref().unwrap()["available"], true);

    let b = call(&handler, "create_product", json!({ "name": "B", "price": 20 }));
    assert_eq!(b.data.unwrap()["id"], 2);

    let removed = call(&handler, "delete_product", json!({ "id": 1 }));
    assert!(removed.ok);
    assert_eq!(removed.data.unwrap()["available"], false);

    let listed = call(&handler, "find_all_products", json!({ "page": 1, "limit": 10 }));
    let data = listed.data.unwrap();
    assert_eq!(data["data"].as_array().unwrap().len(), 1);
    assert_eq!(data["data"][0]["id"], 2);
    assert_eq!(
        data["meta"],
        json!({ "page": 1, "totalPages": 1, "totalCount": 1 })
    );
}

#[test]
fn find_all_applies_default_pagination() {
    let conn = open_db_in_memory().unwrap();
    let handler = handler(&conn);
    for index in 0..12 {
        call(
            &handler,
            "create_product",
            json!({ "name": format!("p{index}"), "price": 1 }),
        );
    }

    let listed = call(&handler, "find_all_products", Value::Null);
    let data = listed.data.unwrap();
    assert_eq!(data["data"].as_array().unwrap().len(), 10);
    assert_eq!(data["meta"]["page"], 1);
    assert_eq!(data["meta"]["totalPages"], 2);
}

#[test]
fn find_one_wraps_product_in_data_and_reports_not_found() {
    let conn = open_db_in_memory().unwrap();
    let handler = handler(&conn);
    call(&handler, "create_product", json!({ "name": "A", "price": 1.5 }));

    let found = call(&handler, "find_one_product", json!({ "id": 1 }));
    assert_eq!(found.data.unwrap()["data"]["name"], "A");

    let missing = call(&handler, "find_one_product", json!({ "id": 7 }));
    assert!(!missing.ok);
    let error = missing.error.unwrap();
    assert_eq!(error.status, 400);
    assert_eq!(error.message, "Product with id 7 not found");
}

#[test]
fn update_ignores_identifier_in_payload_body() {
    let conn = open_db_in_memory().unwrap();
    let handler = handler(&conn);
    call(&handler, "create_product", json!({ "name": "A", "price": 1 }));
    call(&handler, "create_product", json!({ "name": "B", "price": 2 }));

    let updated = call(&handler, "update_product", json!({ "id": 1, "name": "X" }));
    let data = updated.data.unwrap();
    assert_eq!(data["id"], 1);
    assert_eq!(data["name"], "X");

    let other = call(&handler, "find_one_product", json!({ "id": 2 }));
    assert_eq!(other.data.unwrap()["data"]["name"], "B");
}

#[test]
fn validate_products_dedups_and_fails_as_a_whole() {
    let conn = open_db_in_memory().unwrap();
    let handler = handler(&conn);
    call(&handler, "create_product", json!({ "name": "A", "price": 1 }));
    call(&handler, "create_product", json!({ "name": "B", "price": 2 }));

    let ok = call(&handler, "validate_products", json!({ "ids": [1, 1, 2] }));
    assert_eq!(ok.data.unwrap().as_array().unwrap().len(), 2);

    let failed = call(&handler, "validate_products", json!({ "ids": [1, 2, 999] }));
    assert!(!failed.ok);
    assert!(failed.data.is_none());
    let error = failed.error.unwrap();
    assert_eq!(error.status, 400);
    assert_eq!(error.message, "Some products were not found");
}

#[test]
fn invalid_payloads_are_rejected_before_the_core() {
    let conn = open_db_in_memory().unwrap();
    let handler = handler(&conn);

    let cases = [
        ("create_product", json!({ "name": "", "price": 1 })),
        ("create_product", json!({ "name": "A", "price": -3 })),
        ("create_product", json!({ "name": "A", "price": 0.12345 })),
        ("create_product", json!({ "name": "A", "price": "ten" })),
        ("find_all_products", json!({ "page": 0 })),
        ("find_all_products", json!({ "limit": -1 })),
        ("find_one_product", json!({ "id": 0 })),
        ("validate_products", json!({ "ids": [] })),
    ];
    for (cmd, payload) in cases {
        let response = call(&handler, cmd, payload.clone());
        assert!(!response.ok, "{cmd} accepted {payload}");
        assert_eq!(response.error.unwrap().status, 400);
    }

    let listed = call(&handler, "find_all_products", json!({}));
    assert_eq!(listed.data.unwrap()["meta"]["totalCount"], 0);
}

#[test]
fn unknown_pattern_and_malformed_line_are_client_errors() {
    let conn = open_db_in_memory().unwrap();
    let handler = handler(&conn);

    let unknown = call(&handler, "drop_table", json!({}));
    assert!(unknown.error.unwrap().message.contains("drop_table"));

    let line = handler.handle_line("{not json");
    let response: RpcResponse = serde_json::from_str(&line).unwrap();
    assert!(!response.ok);
    assert_eq!(response.error.unwrap().status, 400);
}

#[test]
fn handle_line_echoes_request_id() {
    let conn = open_db_in_memory().unwrap();
    let handler = handler(&conn);

    let line = handler.handle_line(
        r#"{"cmd":"create_product","payload":{"name":"A","price":3.25},"requestId":"req-1"}"#,
    );
    let response: RpcResponse = serde_json::from_str(&line).unwrap();
    assert!(response.ok);
    assert_eq!(response.request_id, "req-1");
    let data = response.data.unwrap();
    assert!(data["price"].is_number());
    assert_eq!(data["price"].as_f64(), Some(3.25));
}

#[test]
fn every_pattern_parses_from_its_wire_name() {
    for pattern in MessagePattern::ALL {
        assert_eq!(pattern.as_str().parse::<MessagePattern>().unwrap(), pattern);
    }
}
