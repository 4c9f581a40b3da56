mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{create_locker, data, id_of, send, send_raw, test_app};

#[tokio::test]
async fn study_session_scenario() {
    let app = test_app();

    // Two lockers, one resource each
    let l1 = create_locker(&app, "Algorithms", "p1").await;
    let l2 = create_locker(&app, "Databases", "p2").await;
    let p1 = [("x-locker-password", "p1")];
    let p2 = [("x-locker-password", "p2")];

    let (status, r1) = send(
        &app,
        Method::POST,
        &format!("/private-resources?lockerId={}", l1),
        &p1,
        Some(json!({ "title": "Dijkstra notes", "category": "graphs", "content": "priority queue" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(data(&r1)["lockerId"], l1.as_str());
    assert_eq!(data(&r1)["type"], "note");
    let r1 = id_of(&r1);

    let (status, r2) = send(
        &app,
        Method::POST,
        &format!("/private-resources?lockerId={}", l2),
        &p2,
        Some(json!({ "title": "B-trees", "category": "indexes" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let r2 = id_of(&r2);

    // Each locker only lists its own
    let (_, list) = send(&app, Method::GET, &format!("/private-resources?lockerId={}", l1), &p1, None).await;
    let list = data(&list).as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"], r1.as_str());

    // l2's resource is invisible through l1
    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/private-resources?lockerId={}&id={}", l1, r2),
        &p1,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The wrong locker's password does not open l1
    let (status, _) = send(&app, Method::GET, &format!("/private-resources?lockerId={}", l1), &p2, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Private resources never appear in the public list
    let (_, public) = send(&app, Method::GET, "/resources", &[], None).await;
    assert_eq!(data(&public).as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn wrong_password_is_rejected_for_every_method() {
    let app = test_app();
    let locker = create_locker(&app, "Exams", "right").await;
    let right = [("x-locker-password", "right")];
    let wrong = [("x-locker-password", "wrong")];

    let (_, created) = send(
        &app,
        Method::POST,
        &format!("/private-resources?lockerId={}", locker),
        &right,
        Some(json!({ "title": "Past paper", "category": "exams" })),
    )
    .await;
    let id = id_of(&created);
    let item = format!("/private-resources?lockerId={}&id={}", locker, id);
    let collection = format!("/private-resources?lockerId={}", locker);

    let attempts = [
        (Method::GET, collection.clone(), None),
        (Method::GET, item.clone(), None),
        (Method::POST, collection.clone(), Some(json!({ "title": "Sneaky", "category": "x" }))),
        (Method::PUT, item.clone(), Some(json!({ "title": "Sneaky" }))),
        (Method::DELETE, item.clone(), None),
    ];
    for (method, uri, body) in attempts {
        let (status, err) = send(&app, method.clone(), &uri, &wrong, body.clone()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        assert_eq!(err["success"], false);

        let (status, _) = send(&app, method.clone(), &uri, &[], body).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {} without password", method, uri);
    }

    // Bad input behind a wrong password still reads as 401
    let (status, _) = send_raw(&app, Method::POST, &collection, &wrong, "{oops").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/private-resources?lockerId={}&id=garbage", locker),
        &wrong,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Nothing changed
    let (_, list) = send(&app, Method::GET, &collection, &right, None).await;
    let list = data(&list).as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["title"], "Past paper");
}

#[tokio::test]
async fn locker_id_cannot_be_reassigned() {
    let app = test_app();
    let home = create_locker(&app, "Home", "p1").await;
    let other = create_locker(&app, "Other", "p2").await;
    let p1 = [("x-locker-password", "p1")];

    // Body lockerId is ignored on create
    let (_, created) = send(
        &app,
        Method::POST,
        &format!("/private-resources?lockerId={}", home),
        &p1,
        Some(json!({ "title": "Mine", "category": "misc", "lockerId": other })),
    )
    .await;
    assert_eq!(data(&created)["lockerId"], home.as_str());
    let id = id_of(&created);

    // ...and on update
    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/private-resources?lockerId={}&id={}", home, id),
        &p1,
        Some(json!({ "title": "Still mine", "lockerId": other })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data(&updated)["lockerId"], home.as_str());
    assert_eq!(data(&updated)["title"], "Still mine");

    let (_, moved) = send(
        &app,
        Method::GET,
        &format!("/private-resources?lockerId={}", other),
        &[("x-locker-password", "p2")],
        None,
    )
    .await;
    assert_eq!(data(&moved).as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn request_shape_errors() {
    let app = test_app();
    let locker = create_locker(&app, "Exams", "p1").await;
    let p1 = [("x-locker-password", "p1")];

    let (status, _) = send(&app, Method::GET, "/private-resources", &p1, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/private-resources?lockerId={}", locker),
        &p1,
        Some(json!({ "category": "exams" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/private-resources?lockerId={}", locker),
        &p1,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/private-resources?lockerId={}&id={}", locker, uuid::Uuid::new_v4()),
        &p1,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
