mod common;

use adminapi::entities::prelude::*;
use axum::http::StatusCode;
use common::{TestApp, ids, setup};
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::{Value, json};

async fn create_menu(app: &TestApp, body: Value) -> Value {
    let (status, created) = app.post("/api/v1/menus", body).await;
    assert_eq!(status, StatusCode::OK, "{created}");
    created
}

#[tokio::test]
async fn parent_path_tracks_ancestors() {
    let app = setup().await;

    let root = create_menu(&app, json!({"code": "system", "name": "System", "type": "catalog"})).await;
    let root_id = root["id"].as_i64().unwrap();
    assert_eq!(root["parent_id"], 0);
    assert_eq!(root["parent_path"], "");

    let child = create_menu(&app, json!({"code": "users", "name": "Users", "type": "menu", "parent_id": root_id})).await;
    let child_id = child["id"].as_i64().unwrap();
    assert_eq!(child["parent_path"], format!("{root_id}."));

    let grandchild = create_menu(&app, json!({"code": "add", "name": "Add user", "parent_id": child_id})).await;
    assert_eq!(grandchild["parent_path"], format!("{root_id}.{child_id}."));
    assert_eq!(grandchild["type"], "button");
}

#[tokio::test]
async fn unknown_parent_is_rejected() {
    let app = setup().await;

    let (status, err) = app
        .post("/api/v1/menus", json!({"code": "orphan", "name": "Orphan", "parent_id": 99}))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err, json!({"code": 50001, "message": "menu not exist"}));
    assert_eq!(Menu::find().count(&app.db).await.unwrap(), 0);
}

#[tokio::test]
async fn code_is_unique_per_parent() {
    let app = setup().await;
    let a = create_menu(&app, json!({"code": "a", "name": "A"})).await;
    let b = create_menu(&app, json!({"code": "b", "name": "B"})).await;

    create_menu(&app, json!({"code": "list", "name": "List", "parent_id": a["id"]})).await;
    create_menu(&app, json!({"code": "list", "name": "List", "parent_id": b["id"]})).await;

    let (status, err) = app
        .post("/api/v1/menus", json!({"code": "list", "name": "Again", "parent_id": a["id"]}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err, json!({"code": 50000, "message": "menu code occupy"}));
}

#[tokio::test]
async fn create_round_trips_resources_roles_and_property() {
    let app = setup().await;
    let (_, role) = app.post("/api/v1/roles", json!({"code": "admin", "name": "Admin"})).await;
    let role_id = role["id"].as_i64().unwrap();

    let created = create_menu(
        &app,
        json!({
            "code": "orders",
            "name": "Orders",
            "description": "order management",
            "sequence": 2,
            "type": "menu",
            "path": "/orders",
            "property": {"icon": "cart", "hidden": false},
            "status": "disabled",
            "resource": [
                {"method": "GET", "path": "/api/v1/orders"},
                {"method": "POST", "path": "/api/v1/orders"}
            ],
            "role": [{"role_id": role_id}]
        }),
    )
    .await;

    assert_eq!(created["property"], json!({"icon": "cart", "hidden": false}));
    assert_eq!(created["resource"].as_array().unwrap().len(), 2);
    assert_eq!(created["resource"][1]["method"], "POST");
    assert_eq!(ids(&created["role"], "role_id"), vec![role_id]);

    let id = created["id"].as_i64().unwrap();
    let (_, fetched) = app.get(&format!("/api/v1/menus/{id}")).await;
    assert_eq!(fetched, created);

    // the grant shows up from the role side too
    let (_, role) = app.get(&format!("/api/v1/roles/{role_id}")).await;
    assert_eq!(ids(&role["menu"], "menu_id"), vec![id]);
}

#[tokio::test]
async fn update_replaces_only_supplied_lists() {
    let app = setup().await;
    let (_, role) = app.post("/api/v1/roles", json!({"code": "ops", "name": "Ops"})).await;
    let created = create_menu(
        &app,
        json!({
            "code": "jobs",
            "name": "Jobs",
            "resource": [{"method": "GET", "path": "/api/v1/jobs"}],
            "role": [{"role_id": role["id"]}]
        }),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let (status, updated) = app
        .put(
            &format!("/api/v1/menus/{id}"),
            json!({"name": "Batch jobs", "resource": [{"method": "DELETE", "path": "/api/v1/jobs/{id}"}]}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Batch jobs");
    assert_eq!(updated["code"], "jobs");
    assert_eq!(updated["resource"].as_array().unwrap().len(), 1);
    assert_eq!(updated["resource"][0]["method"], "DELETE");
    assert_eq!(updated["role"], created["role"]);
    assert_eq!(Resource::find().count(&app.db).await.unwrap(), 1);
}

#[tokio::test]
async fn parent_cannot_change_on_update() {
    let app = setup().await;
    let a = create_menu(&app, json!({"code": "a", "name": "A"})).await;
    let b = create_menu(&app, json!({"code": "b", "name": "B"})).await;
    let child = create_menu(&app, json!({"code": "c", "name": "C", "parent_id": a["id"]})).await;
    let id = child["id"].as_i64().unwrap();

    let (status, err) = app
        .put(&format!("/api/v1/menus/{id}"), json!({"parent_id": b["id"]}))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(err["code"], 20003);

    let (status, same) = app
        .put(&format!("/api/v1/menus/{id}"), json!({"parent_id": a["id"], "sequence": 5}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(same["sequence"], 5);
    assert_eq!(same["parent_path"], child["parent_path"]);
}

#[tokio::test]
async fn delete_is_blocked_while_children_exist() {
    let app = setup().await;
    let root = create_menu(&app, json!({"code": "root", "name": "Root"})).await;
    let root_id = root["id"].as_i64().unwrap();
    let child = create_menu(&app, json!({"code": "leaf", "name": "Leaf", "parent_id": root_id})).await;
    let child_id = child["id"].as_i64().unwrap();

    let (status, err) = app.delete(&format!("/api/v1/menus/{root_id}")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err, json!({"code": 50002, "message": "menu has children"}));
    assert_eq!(Menu::find().count(&app.db).await.unwrap(), 2);

    let (status, _) = app.delete(&format!("/api/v1/menus/{child_id}")).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.delete(&format!("/api/v1/menus/{root_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(Menu::find().count(&app.db).await.unwrap(), 0);
}

#[tokio::test]
async fn sibling_ids_sharing_a_prefix_are_not_children() {
    let app = setup().await;
    // ids 1..=11 so that menu 1 and menu 11 share a leading digit
    for n in 1..=11 {
        create_menu(&app, json!({"code": format!("m{n}"), "name": "M"})).await;
    }
    create_menu(&app, json!({"code": "under-11", "name": "U", "parent_id": 11})).await;

    let (status, _) = app.delete("/api/v1/menus/1").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn delete_removes_resources_and_grants() {
    let app = setup().await;
    let (_, role) = app.post("/api/v1/roles", json!({"code": "r", "name": "R"})).await;
    let menu = create_menu(
        &app,
        json!({
            "code": "tmp",
            "name": "Tmp",
            "resource": [{"method": "GET", "path": "/tmp"}],
            "role": [{"role_id": role["id"]}]
        }),
    )
    .await;
    let id = menu["id"].as_i64().unwrap();

    let (status, _) = app.delete(&format!("/api/v1/menus/{id}")).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(Resource::find().count(&app.db).await.unwrap(), 0);
    assert_eq!(RoleMenu::find().count(&app.db).await.unwrap(), 0);
    assert_eq!(Role::find().count(&app.db).await.unwrap(), 1);

    let (status, err) = app.delete(&format!("/api/v1/menus/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["code"], 50001);
}

#[tokio::test]
async fn list_filters_by_parent_and_type() {
    let app = setup().await;
    let root = create_menu(&app, json!({"code": "root", "name": "Root", "type": "catalog"})).await;
    create_menu(&app, json!({"code": "page", "name": "Page", "type": "menu", "parent_id": root["id"]})).await;
    create_menu(&app, json!({"code": "btn", "name": "Button", "parent_id": root["id"]})).await;

    let (_, children) = app.get("/api/v1/menus?parentId=1").await;
    assert_eq!(ids(&children, "id"), vec![2, 3]);

    let (_, pages) = app.get("/api/v1/menus?type=menu").await;
    assert_eq!(ids(&pages, "id"), vec![2]);

    let (_, paged) = app.get("/api/v1/menus?current=2&pageSize=2").await;
    assert_eq!(ids(&paged, "id"), vec![3]);
}

#[tokio::test]
async fn repeated_role_id_is_a_validation_error() {
    let app = setup().await;
    let (_, role) = app.post("/api/v1/roles", json!({"code": "r", "name": "R"})).await;

    let (status, err) = app
        .post(
            "/api/v1/menus",
            json!({"code": "m", "name": "M", "role": [{"role_id": role["id"]}, {"role_id": role["id"]}]}),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(err["code"], 20003);
    assert_eq!(Menu::find().count(&app.db).await.unwrap(), 0);

    let menu = create_menu(&app, json!({"code": "m", "name": "M"})).await;
    let id = menu["id"].as_i64().unwrap();
    let (status, _) = app
        .put(
            &format!("/api/v1/menus/{id}"),
            json!({"role": [{"role_id": role["id"]}, {"role_id": role["id"]}]}),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(RoleMenu::find().count(&app.db).await.unwrap(), 0);
}

#[tokio::test]
async fn update_validates_resource_rows() {
    let app = setup().await;
    let menu = create_menu(
        &app,
        json!({"code": "files", "name": "Files", "resource": [{"method": "GET", "path": "/files"}]}),
    )
    .await;
    let id = menu["id"].as_i64().unwrap();

    let (status, err) = app
        .put(
            &format!("/api/v1/menus/{id}"),
            json!({"resource": [{"method": "", "path": ""}]}),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(err, json!({"code": 20003, "message": "validate error"}));

    let (_, fetched) = app.get(&format!("/api/v1/menus/{id}")).await;
    assert_eq!(fetched["resource"], menu["resource"]);
}

#[tokio::test]
async fn property_can_be_cleared_with_null() {
    let app = setup().await;
    let menu = create_menu(&app, json!({"code": "p", "name": "P", "property": {"icon": "x"}})).await;
    let id = menu["id"].as_i64().unwrap();

    let (_, kept) = app.put(&format!("/api/v1/menus/{id}"), json!({"name": "Q"})).await;
    assert_eq!(kept["property"], json!({"icon": "x"}));

    let (status, cleared) = app
        .put(&format!("/api/v1/menus/{id}"), json!({"property": null}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleared["property"], Value::Null);

    let (_, fetched) = app.get(&format!("/api/v1/menus/{id}")).await;
    assert_eq!(fetched["property"], Value::Null);
}
