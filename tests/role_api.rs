mod common;

use adminapi::{
    entities::{prelude::*, role_menu, user_role},
    repository::association,
};
use axum::http::{Method, StatusCode};
use common::{ids, setup};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::json;

async fn seed_menus(app: &common::TestApp, codes: &[&str]) -> Vec<i64> {
    let mut created = Vec::new();
    for code in codes {
        let (status, body) = app
            .post("/api/v1/menus", json!({"code": code, "name": code}))
            .await;
        assert_eq!(status, StatusCode::OK);
        created.push(body["id"].as_i64().unwrap());
    }
    created
}

#[tokio::test]
async fn create_assigns_id_and_defaults() {
    let app = setup().await;

    let (status, body) = app
        .post(
            "/api/v1/roles",
            json!({"code": "code1", "name": "name1", "status": "enabled"}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
    assert_eq!(body["code"], "code1");
    assert_eq!(body["status"], "enabled");
    assert_eq!(body["sequence"], 0);
    assert_eq!(body["description"], "");
    assert_eq!(body["menu"], json!([]));
    assert_eq!(body["created"], body["updated"]);
    assert_eq!(body["created"].as_str().unwrap().len(), "2024-04-04 13:56:35.671521".len());
}

#[tokio::test]
async fn duplicate_code_is_rejected() {
    let app = setup().await;
    let body = json!({"code": "code1", "name": "name1", "status": "enabled"});

    app.post("/api/v1/roles", body.clone()).await;
    let (status, err) = app.post("/api/v1/roles", body).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err, json!({"code": 40000, "message": "role code occupy"}));
    assert_eq!(Role::find().count(&app.db).await.unwrap(), 1);
}

#[tokio::test]
async fn create_with_menus_round_trips() {
    let app = setup().await;
    let menus = seed_menus(&app, &["dashboard", "settings"]).await;

    let (_, created) = app
        .post(
            "/api/v1/roles",
            json!({
                "code": "viewer",
                "name": "Viewer",
                "description": "read only",
                "sequence": 3,
                "menu": [
                    {"menu_id": menus[0], "created": "2024-04-04 13:56:35.671521"},
                    {"menu_id": menus[1]}
                ]
            }),
        )
        .await;
    assert_eq!(ids(&created["menu"], "menu_id"), menus);
    assert_eq!(created["menu"][0]["created"], "2024-04-04 13:56:35.671521");

    let id = created["id"].as_i64().unwrap();
    let (status, fetched) = app.get(&format!("/api/v1/roles/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn update_replaces_menu_grants() {
    let app = setup().await;
    let menus = seed_menus(&app, &["m1", "m2", "m3"]).await;
    let (_, created) = app
        .post(
            "/api/v1/roles",
            json!({"code": "editor", "name": "Editor", "menu": [{"menu_id": menus[0]}, {"menu_id": menus[1]}]}),
        )
        .await;
    let id = created["id"].as_i64().unwrap();

    let (status, updated) = app
        .put(
            &format!("/api/v1/roles/{id}"),
            json!({"status": "disabled", "menu": [{"menu_id": menus[1]}, {"menu_id": menus[2]}]}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "disabled");
    assert_eq!(updated["name"], "Editor");
    assert_eq!(ids(&updated["menu"], "menu_id"), vec![menus[1], menus[2]]);

    let (_, fetched) = app.get(&format!("/api/v1/roles/{id}")).await;
    assert_eq!(ids(&fetched["menu"], "menu_id"), vec![menus[1], menus[2]]);
}

#[tokio::test]
async fn update_can_keep_own_code_but_not_take_another() {
    let app = setup().await;
    app.post("/api/v1/roles", json!({"code": "taken", "name": "Taken"})).await;
    let (_, mine) = app.post("/api/v1/roles", json!({"code": "mine", "name": "Mine"})).await;
    let id = mine["id"].as_i64().unwrap();

    let (status, _) = app
        .put(&format!("/api/v1/roles/{id}"), json!({"code": "mine", "sequence": 9}))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, err) = app
        .put(&format!("/api/v1/roles/{id}"), json!({"code": "taken"}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["code"], 40000);
}

#[tokio::test]
async fn delete_cascades_to_menu_grants_and_user_assignments() {
    let app = setup().await;
    let menus = seed_menus(&app, &["reports"]).await;
    let (_, role) = app
        .post(
            "/api/v1/roles",
            json!({"code": "analyst", "name": "Analyst", "menu": [{"menu_id": menus[0]}]}),
        )
        .await;
    let role_id = role["id"].as_i64().unwrap();
    app.post(
        "/api/v1/users",
        json!({"username": "nora", "password": "pw", "role": [{"role_id": role_id}]}),
    )
    .await;

    let (status, body) = app.delete(&format!("/api/v1/roles/{role_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::Value::Null);

    let role_id = role_id as i32;
    let remaining = association::list_role_menus_by_role_ids(&app.db, &[role_id])
        .await
        .unwrap();
    assert!(remaining.is_empty());
    assert_eq!(
        RoleMenu::find()
            .filter(role_menu::Column::RoleId.eq(role_id))
            .count(&app.db)
            .await
            .unwrap(),
        0
    );
    assert_eq!(
        UserRole::find()
            .filter(user_role::Column::RoleId.eq(role_id))
            .count(&app.db)
            .await
            .unwrap(),
        0
    );
    assert_eq!(AppUser::find().count(&app.db).await.unwrap(), 1);
    assert_eq!(Menu::find().count(&app.db).await.unwrap(), 1);

    let (status, err) = app.get(&format!("/api/v1/roles/{role_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["code"], 40001);
}

#[tokio::test]
async fn list_filters_by_code_and_status() {
    let app = setup().await;
    app.post("/api/v1/roles", json!({"code": "sys-admin", "name": "Admin"})).await;
    app.post("/api/v1/roles", json!({"code": "sys-audit", "name": "Audit", "status": "disabled"})).await;
    app.post("/api/v1/roles", json!({"code": "guest", "name": "Guest"})).await;

    let (_, sys) = app.get("/api/v1/roles?code=sys").await;
    assert_eq!(ids(&sys, "id"), vec![1, 2]);

    let (_, enabled) = app.get("/api/v1/roles?code=sys&status=enabled").await;
    assert_eq!(ids(&enabled, "id"), vec![1]);

    let (_, unfiltered) = app.get("/api/v1/roles?code=&name=&pageSize=2").await;
    assert_eq!(ids(&unfiltered, "id"), vec![1, 2]);
}

#[tokio::test]
async fn bad_requests_map_to_registry_codes() {
    let app = setup().await;

    let (status, err) = app.raw(Method::POST, "/api/v1/roles", "{\"code\": ").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err, json!({"code": 20000, "message": "parse error"}));

    let (status, err) = app.post("/api/v1/roles", json!({"code": "", "name": "Empty"})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(err, json!({"code": 20003, "message": "validate error"}));

    let (status, err) = app
        .post(
            "/api/v1/roles",
            json!({"code": "when", "name": "When", "created": "yesterday"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err, json!({"code": 20002, "message": "convert error"}));
    assert_eq!(Role::find().count(&app.db).await.unwrap(), 0);

    let (status, err) = app.get("/api/v1/roles/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], 20000);
}

#[tokio::test]
async fn repeated_menu_id_is_a_validation_error() {
    let app = setup().await;
    let menus = seed_menus(&app, &["twice"]).await;

    let (status, err) = app
        .post(
            "/api/v1/roles",
            json!({"code": "dup", "name": "Dup", "menu": [{"menu_id": menus[0]}, {"menu_id": menus[0]}]}),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(err["code"], 20003);
    assert_eq!(Role::find().count(&app.db).await.unwrap(), 0);

    let (_, role) = app.post("/api/v1/roles", json!({"code": "dup", "name": "Dup"})).await;
    let id = role["id"].as_i64().unwrap();
    let (status, _) = app
        .put(
            &format!("/api/v1/roles/{id}"),
            json!({"menu": [{"menu_id": menus[0]}, {"menu_id": menus[0]}]}),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(RoleMenu::find().count(&app.db).await.unwrap(), 0);
}
