mod common;

use serde_json::json;
use tasvideos_api::PublicationsModule;
use tasvideos_core::{TestApp, TestResponse};

async fn catalog_app() -> TestApp {
    let app = TestApp::with_module(PublicationsModule).await;
    common::seed_catalog(&app.db).await;
    app
}

async fn list(app: &TestApp, query: &str) -> TestResponse {
    app.client
        .get(&app.url(&format!("/api/v1/publications?{query}")))
        .await
}

fn ids(res: &TestResponse) -> Vec<i64> {
    res.data()
        .as_array()
        .expect("data should be an array")
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect()
}

// ═══ GET /api/v1/publications/{id} ═══

#[tokio::test]
async fn test_get_publication_by_id() {
    let app = catalog_app().await;
    let res = app.client.get(&app.url("/api/v1/publications/2")).await;

    assert_eq!(res.status, 200);
    assert!(res.is_success());
    let data = res.data();
    assert_eq!(data["id"], 2);
    assert_eq!(data["title"], "SNES Super Metroid in 41:41.45");
    assert_eq!(data["class"], "Moons");
    assert_eq!(data["systemCode"], "SNES");
    assert_eq!(data["gameName"], "Super Metroid");
    assert_eq!(data["rerecords"], 8000);
    assert_eq!(data["obsoletedById"], serde_json::Value::Null);
    assert_eq!(data["authors"], json!(["Charlie"]));
    assert_eq!(data["flags"], json!(["commentary", "verified"]));
}

#[tokio::test]
async fn test_get_publication_sorts_authors() {
    let app = catalog_app().await;
    let res = app.client.get(&app.url("/api/v1/publications/1")).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.data()["authors"], json!(["Alpha", "bravo"]));
}

#[tokio::test]
async fn test_get_obsoleted_publication_by_id() {
    let app = catalog_app().await;
    let res = app.client.get(&app.url("/api/v1/publications/4")).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.data()["obsoletedById"], 1);
    assert_eq!(res.data()["flags"], json!([]));
}

#[tokio::test]
async fn test_get_missing_publication_returns_404() {
    let app = catalog_app().await;
    let res = app.client.get(&app.url("/api/v1/publications/999")).await;

    assert_eq!(res.status, 404);
    assert!(!res.is_success());
    assert_eq!(res.error()["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_get_publication_with_non_numeric_id_returns_400() {
    let app = catalog_app().await;
    let res = app.client.get(&app.url("/api/v1/publications/abc")).await;

    assert_eq!(res.status, 400);
    assert_eq!(res.error()["code"], "BAD_REQUEST");
}

// ═══ GET /api/v1/publications: listing & sorting ═══

#[tokio::test]
async fn test_list_excludes_obsoleted_by_default() {
    let app = catalog_app().await;
    let res = list(&app, "").await;

    assert_eq!(res.status, 200);
    assert_eq!(ids(&res), vec![1, 2, 3]);
}

#[tokio::test]
async fn test_list_on_empty_catalog() {
    let app = TestApp::with_module(PublicationsModule).await;
    let res = list(&app, "").await;

    assert_eq!(res.status, 200);
    assert_eq!(res.data(), json!([]));
}

#[tokio::test]
async fn test_sort_descending() {
    let app = catalog_app().await;
    let res = list(&app, "sort=-createTimestamp").await;

    assert_eq!(res.status, 200);
    assert_eq!(ids(&res), vec![2, 1, 3]);
}

#[tokio::test]
async fn test_sort_ascending_is_case_insensitive() {
    let app = catalog_app().await;
    let res = list(&app, "sort=FRAMES").await;

    assert_eq!(res.status, 200);
    assert_eq!(ids(&res), vec![1, 3, 2]);
}

#[tokio::test]
async fn test_sort_falls_back_to_id_for_ties() {
    let app = catalog_app().await;
    let res = list(&app, "sort=systemCode&showObsoleted=true").await;

    assert_eq!(res.status, 200);
    assert_eq!(ids(&res), vec![3, 1, 4, 2]);
}

#[tokio::test]
async fn test_sort_by_multiple_fields() {
    let app = catalog_app().await;
    let res = list(&app, "sort=year,-rerecords&showObsoleted=true").await;

    assert_eq!(res.status, 200);
    assert_eq!(ids(&res), vec![1, 4, 2, 3]);
}

#[tokio::test]
async fn test_sort_by_unknown_field_returns_400() {
    let app = catalog_app().await;
    let res = list(&app, "sort=title,-rating").await;

    assert_eq!(res.status, 400);
    let error = res.error();
    assert_eq!(error["code"], "VALIDATION_ERROR");
    assert_eq!(error["fields"][0]["field"], "sort");
    let message = error["fields"][0]["message"].as_str().unwrap();
    assert!(message.contains("rating"));
    assert!(!message.contains("title"));
}

#[tokio::test]
async fn test_bad_sort_and_bad_limit_are_reported_together() {
    let app = catalog_app().await;
    let res = list(&app, "sort=rating&limit=0").await;

    assert_eq!(res.status, 400);
    let error = res.error();
    assert_eq!(error["code"], "VALIDATION_ERROR");
    let fields: Vec<&str> = error["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["sort", "limit"]);
}

#[tokio::test]
async fn test_sort_by_collection_returns_400() {
    let app = catalog_app().await;
    let res = list(&app, "sort=authors").await;

    assert_eq!(res.status, 400);
    assert_eq!(res.error()["fields"][0]["field"], "sort");
}

// ═══ Paging ═══

#[tokio::test]
async fn test_limit_and_offset() {
    let app = catalog_app().await;
    let res = list(&app, "limit=2&offset=1").await;

    assert_eq!(res.status, 200);
    assert_eq!(ids(&res), vec![2, 3]);
}

#[tokio::test]
async fn test_page_and_per_page() {
    let app = catalog_app().await;
    let res = list(&app, "page=2&perPage=2").await;

    assert_eq!(res.status, 200);
    assert_eq!(ids(&res), vec![3]);
}

#[tokio::test]
async fn test_offset_past_end_is_empty() {
    let app = catalog_app().await;
    let res = list(&app, "offset=50").await;

    assert_eq!(res.status, 200);
    assert!(ids(&res).is_empty());
}

#[tokio::test]
async fn test_offset_beyond_signed_range_is_empty() {
    let app = catalog_app().await;
    let res = list(&app, "offset=18446744073709551615").await;

    assert_eq!(res.status, 200);
    assert!(ids(&res).is_empty());
}

#[tokio::test]
async fn test_page_beyond_signed_range_is_empty() {
    let app = catalog_app().await;

    let res = list(&app, "page=18446744073709551615").await;
    assert_eq!(res.status, 200);
    assert!(ids(&res).is_empty());

    let res = list(&app, "page=18446744073709551615&perPage=100&sort=-year").await;
    assert_eq!(res.status, 200);
    assert!(ids(&res).is_empty());
}

#[tokio::test]
async fn test_zero_limit_returns_400() {
    let app = catalog_app().await;
    let res = list(&app, "limit=0").await;

    assert_eq!(res.status, 400);
    assert_eq!(res.error()["code"], "VALIDATION_ERROR");
    assert_eq!(res.error()["fields"][0]["field"], "limit");
}

#[tokio::test]
async fn test_oversized_limit_returns_400() {
    let app = catalog_app().await;
    let res = list(&app, "limit=101").await;

    assert_eq!(res.status, 400);
}

#[tokio::test]
async fn test_non_numeric_limit_returns_400() {
    let app = catalog_app().await;
    let res = list(&app, "limit=lots").await;

    assert_eq!(res.status, 400);
    assert_eq!(res.error()["code"], "BAD_REQUEST");
}

// ═══ Filters ═══

#[tokio::test]
async fn test_filter_by_system_ignores_case() {
    let app = catalog_app().await;

    assert_eq!(ids(&list(&app, "systems=nes").await), vec![1]);
    assert_eq!(ids(&list(&app, "systems=NES,gba").await), vec![1, 3]);
}

#[tokio::test]
async fn test_filter_by_class() {
    let app = catalog_app().await;

    assert_eq!(ids(&list(&app, "classNames=moons").await), vec![2]);
    assert_eq!(ids(&list(&app, "classNames=Stars,Standard").await), vec![1, 3]);
}

#[tokio::test]
async fn test_filter_by_year_range() {
    let app = catalog_app().await;

    assert_eq!(ids(&list(&app, "startYear=1990").await), vec![2, 3]);
    assert_eq!(ids(&list(&app, "endYear=1994").await), vec![1, 2]);
    assert_eq!(ids(&list(&app, "startYear=1990&endYear=2000").await), vec![2]);
}

#[tokio::test]
async fn test_inverted_year_range_returns_400() {
    let app = catalog_app().await;
    let res = list(&app, "startYear=2000&endYear=1990").await;

    assert_eq!(res.status, 400);
    assert_eq!(res.error()["fields"][0]["field"], "endYear");
}

#[tokio::test]
async fn test_filter_by_flags_matches_any() {
    let app = catalog_app().await;

    assert_eq!(ids(&list(&app, "flags=VERIFIED").await), vec![1, 2]);
    assert_eq!(ids(&list(&app, "flags=commentary").await), vec![2]);
    assert!(ids(&list(&app, "flags=nonexistent").await).is_empty());
}

#[tokio::test]
async fn test_filter_by_author() {
    let app = catalog_app().await;

    assert_eq!(ids(&list(&app, "authorIds=2").await), vec![1, 3]);
    assert_eq!(ids(&list(&app, "authorIds=1&showObsoleted=true").await), vec![1, 4]);
}

#[tokio::test]
async fn test_filter_by_non_numeric_author_returns_400() {
    let app = catalog_app().await;
    let res = list(&app, "authorIds=2,two").await;

    assert_eq!(res.status, 400);
    assert_eq!(res.error()["fields"][0]["field"], "authorIds");
}

#[tokio::test]
async fn test_filter_by_game() {
    let app = catalog_app().await;

    assert_eq!(ids(&list(&app, "gameIds=1").await), vec![1]);
    assert_eq!(ids(&list(&app, "gameIds=1&showObsoleted=true").await), vec![1, 4]);
}

#[tokio::test]
async fn test_only_obsoleted() {
    let app = catalog_app().await;

    assert_eq!(ids(&list(&app, "onlyObsoleted=true").await), vec![4]);
    assert_eq!(
        ids(&list(&app, "onlyObsoleted=true&showObsoleted=false").await),
        vec![4]
    );
}

#[tokio::test]
async fn test_filters_combine() {
    let app = catalog_app().await;
    let res = list(&app, "systems=nes&flags=verified&showObsoleted=true").await;

    assert_eq!(ids(&res), vec![1]);
}

// ═══ Field selection ═══

#[tokio::test]
async fn test_fields_projects_each_item() {
    let app = catalog_app().await;
    let res = list(&app, "fields=id,Title").await;

    assert_eq!(res.status, 200);
    let data = res.data();
    let items = data.as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(
        items[0],
        json!({"id": 1, "title": "NES Super Mario Bros. in 4:54.032"})
    );
    for item in items {
        assert_eq!(item.as_object().unwrap().len(), 2);
    }
}

#[tokio::test]
async fn test_fields_keeps_duplicate_rows() {
    let app = catalog_app().await;
    let res = list(&app, "systems=nes&showObsoleted=true&fields=systemCode").await;

    assert_eq!(
        res.data(),
        json!([{"systemCode": "NES"}, {"systemCode": "NES"}])
    );
}

#[tokio::test]
async fn test_fields_ignores_unknown_names() {
    let app = catalog_app().await;
    let res = list(&app, "fields=gameName,nonsense&limit=1").await;

    assert_eq!(res.data(), json!([{"gameName": "Super Mario Bros."}]));
}

#[tokio::test]
async fn test_list_includes_authors_and_flags() {
    let app = catalog_app().await;
    let res = list(&app, "fields=id,authors,flags").await;

    assert_eq!(
        res.data(),
        json!([
            {"id": 1, "authors": ["Alpha", "bravo"], "flags": ["Verified"]},
            {"id": 2, "authors": ["Charlie"], "flags": ["commentary", "verified"]},
            {"id": 3, "authors": ["bravo"], "flags": []}
        ])
    );
}

// ═══ Docs ═══

#[tokio::test]
async fn test_openapi_lists_publication_paths() {
    let app = TestApp::with_module(PublicationsModule).await;
    let res = app.client.get(&app.url("/api-docs/openapi.json")).await;

    assert_eq!(res.status, 200);
    let doc = res.json();
    let paths = &doc["paths"];
    assert!(paths.get("/api/v1/publications").is_some());
    assert!(paths.get("/api/v1/publications/{id}").is_some());
}
