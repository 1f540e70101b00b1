// This file is part of the product Groceries.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

mod common;

use actix_web::{http::StatusCode, test};
use groceries::shopping::{Category, Database, FileSnapshotStore, SnapshotStore};
use serde_json::{Value, json};
use std::fs;

#[actix_web::test]
async fn added_item_shows_up_canonicalized() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(harness.state.clone(), None)).await;

    let req = test::TestRequest::post().uri("/api/Groceries/milk").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = common::read_json(resp).await;
    assert_eq!(body, json!({"Groceries": ["Milk"], "Alcohol": []}));

    let req = test::TestRequest::get().uri("/api").to_request();
    let body = common::read_json(test::call_service(&app, req).await).await;
    assert_eq!(body["Groceries"], json!(["Milk"]));
}

#[actix_web::test]
async fn adding_twice_keeps_one_entry() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(harness.state.clone(), None)).await;

    for uri in ["/api/Groceries/milk", "/api/Groceries/bread", "/api/Groceries/MILK"] {
        let resp = test::call_service(&app, test::TestRequest::post().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get().uri("/api").to_request();
    let body = common::read_json(test::call_service(&app, req).await).await;
    assert_eq!(body["Groceries"], json!(["Milk", "Bread"]));
    assert_eq!(
        harness.catalog_names(Category::Groceries).await,
        vec!["Milk", "Bread"]
    );
}

#[actix_web::test]
async fn removing_from_active_keeps_catalog() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(harness.state.clone(), None)).await;

    test::call_service(
        &app,
        test::TestRequest::post().uri("/api/Groceries/milk").to_request(),
    )
    .await;
    let req = test::TestRequest::delete().uri("/api/Groceries/milk").to_request();
    let body = common::read_json(test::call_service(&app, req).await).await;
    assert_eq!(body["Groceries"], json!([]));
    assert_eq!(harness.catalog_names(Category::Groceries).await, vec!["Milk"]);

    let req = test::TestRequest::get()
        .uri("/api/search/Groceries/mi")
        .to_request();
    let hits = common::names(&common::read_json(test::call_service(&app, req).await).await);
    assert!(hits.contains(&"Milk".to_string()));
}

#[actix_web::test]
async fn removing_from_catalog_forgets_item() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(harness.state.clone(), None)).await;

    test::call_service(
        &app,
        test::TestRequest::post().uri("/api/Groceries/milk").to_request(),
    )
    .await;
    let req = test::TestRequest::delete()
        .uri("/api/meili/Groceries/milk")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = common::read_json(resp).await;
    assert_eq!(body["Groceries"], json!([]));
    assert!(harness.catalog_names(Category::Groceries).await.is_empty());

    let req = test::TestRequest::get()
        .uri("/api/search/Groceries/milk")
        .to_request();
    let hits = common::read_json(test::call_service(&app, req).await).await;
    assert_eq!(hits, json!([]));
}

#[actix_web::test]
async fn search_returns_matching_names_per_category() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(harness.state.clone(), None)).await;

    for uri in [
        "/api/Groceries/milk",
        "/api/Groceries/mint",
        "/api/Alcohol/mild%20ale",
    ] {
        test::call_service(&app, test::TestRequest::post().uri(uri).to_request()).await;
    }

    let req = test::TestRequest::get()
        .uri("/api/search/Groceries/mi")
        .to_request();
    let hits = common::names(&common::read_json(test::call_service(&app, req).await).await);
    assert!(hits.contains(&"Milk".to_string()));
    assert!(hits.contains(&"Mint".to_string()));
    assert!(!hits.contains(&"Mild ale".to_string()));
}

#[actix_web::test]
async fn search_is_capped_at_eight_names() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(harness.state.clone(), None)).await;

    for i in 0..12 {
        let uri = format!("/api/Groceries/tea%20{}", i);
        test::call_service(&app, test::TestRequest::post().uri(&uri).to_request()).await;
    }

    let req = test::TestRequest::get()
        .uri("/api/search/Groceries/tea")
        .to_request();
    let hits = common::read_json(test::call_service(&app, req).await).await;
    assert_eq!(hits.as_array().map(Vec::len), Some(8));
}

#[actix_web::test]
async fn legacy_key_route_returns_active_lists() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(harness.state.clone(), None)).await;

    test::call_service(
        &app,
        test::TestRequest::post().uri("/api/Alcohol/gin").to_request(),
    )
    .await;
    let req = test::TestRequest::get().uri("/api/key").to_request();
    let body = common::read_json(test::call_service(&app, req).await).await;
    assert_eq!(body, json!({"Groceries": [], "Alcohol": ["Gin"]}));
}

#[actix_web::test]
async fn unknown_category_is_bad_request() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(harness.state.clone(), None)).await;

    for req in [
        test::TestRequest::post().uri("/api/groceries/milk").to_request(),
        test::TestRequest::delete().uri("/api/Snacks/chips").to_request(),
        test::TestRequest::delete()
            .uri("/api/meili/Beer/lager")
            .to_request(),
        test::TestRequest::get().uri("/api/search/Wine/red").to_request(),
    ] {
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = common::read_json(resp).await;
        let message = body["error"].as_str().expect("error message");
        assert!(message.contains("Groceries, Alcohol"), "{}", message);
    }

    let req = test::TestRequest::get().uri("/api").to_request();
    let body = common::read_json(test::call_service(&app, req).await).await;
    assert_eq!(body, json!({"Groceries": [], "Alcohol": []}));
}

#[actix_web::test]
async fn blank_name_is_bad_request() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(harness.state.clone(), None)).await;

    let req = test::TestRequest::post().uri("/api/Groceries/%20%20").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(harness.catalog_names(Category::Groceries).await.is_empty());
}

#[actix_web::test]
async fn double_encoded_names_are_decoded_again() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(harness.state.clone(), None)).await;

    let req = test::TestRequest::post()
        .uri("/api/Groceries/50%2525%20cream")
        .to_request();
    let body = common::read_json(test::call_service(&app, req).await).await;
    assert_eq!(body["Groceries"], json!(["50% cream"]));
}

#[actix_web::test]
async fn state_survives_restart() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(harness.state.clone(), None)).await;
    for uri in ["/api/Groceries/eggs", "/api/Alcohol/rum", "/api/Groceries/flour"] {
        test::call_service(&app, test::TestRequest::post().uri(uri).to_request()).await;
    }
    test::call_service(
        &app,
        test::TestRequest::delete().uri("/api/Groceries/Eggs").to_request(),
    )
    .await;

    let restarted = harness.restart().await;
    assert_eq!(restarted.store.active().await.groceries, vec!["Flour"]);
    assert_eq!(restarted.store.active().await.alcohol, vec!["Rum"]);
    assert_eq!(restarted.store.catalog(Category::Groceries).await.len(), 2);

    let on_disk = FileSnapshotStore::new(harness.fixture.db_file())
        .unwrap()
        .load()
        .unwrap()
        .expect("snapshot");
    assert_eq!(on_disk.active_list(Category::Groceries), ["Flour"]);
}

#[actix_web::test]
async fn legacy_snapshot_is_loaded() {
    let fixture = groceries::util::test_fixtures::TestFixtureRoot::new_unique("api-legacy")
        .expect("fixture");
    let paths = fixture.runtime_paths().expect("paths");
    let legacy = json!({
        "active": {"Groceries": ["Milk"], "Alcohol": []},
        "Groceries": [{"id": groceries::shopping::derive_id("Milk"), "name": "Milk"}],
        "Alcohol": []
    });
    fs::write(&paths.db_file, legacy.to_string()).unwrap();

    let config = groceries::util::test_config();
    let state = groceries::app_state::AppState::open(&config, paths.clone())
        .await
        .expect("open legacy snapshot");
    assert_eq!(state.store.active().await.groceries, vec!["Milk"]);

    // The in-memory index starts empty on restart; reindex brings it back.
    assert_eq!(state.store.rebuild_index().await.unwrap(), 1);
    assert_eq!(
        state.store.search(Category::Groceries, "mil").await.unwrap(),
        vec!["Milk"]
    );

    state
        .store
        .add_item(Category::Alcohol, "port")
        .await
        .expect("add");
    let raw: Value = serde_json::from_str(&fs::read_to_string(&paths.db_file).unwrap()).unwrap();
    assert_eq!(raw["version"], json!(1));
    let reloaded: Database = serde_json::from_value(raw).unwrap();
    assert_eq!(reloaded.active_list(Category::Alcohol), ["Port"]);
}

#[actix_web::test]
async fn corrupt_snapshot_prevents_startup() {
    let fixture = groceries::util::test_fixtures::TestFixtureRoot::new_unique("api-corrupt")
        .expect("fixture");
    let paths = fixture.runtime_paths().expect("paths");
    fs::write(&paths.db_file, "{not json").unwrap();

    let result =
        groceries::app_state::AppState::open(&groceries::util::test_config(), paths).await;
    assert!(result.is_err());
    assert_eq!(fs::read_to_string(fixture.db_file()).unwrap(), "{not json");
}

#[actix_web::test]
async fn frontend_is_served_next_to_api() {
    let harness = common::TestHarness::new().await;
    fs::create_dir_all(&harness.runtime_paths.static_dir).unwrap();
    fs::write(
        harness.runtime_paths.static_dir.join("index.html"),
        "<h1>Shopping</h1>",
    )
    .unwrap();
    let app = test::init_service(common::build_test_app(
        harness.state.clone(),
        harness.frontend_dir(),
    ))
    .await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert_eq!(&body[..], b"<h1>Shopping</h1>");

    let req = test::TestRequest::get().uri("/api").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
