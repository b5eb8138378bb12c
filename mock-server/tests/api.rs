use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Session, StatusBody, Store, DUPLICATE_BOARD_MESSAGE};
use tower::ServiceExt;

async fn body_text(response: axum::response::Response) -> String {
    let bytes: bytes::Bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: axum::response::Response) -> StatusBody {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn form_request(method: &str, uri: &str, session: &Session, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(http::header::COOKIE, &session.cookie)
        .header("X-CSRFToken", &session.csrf_token)
        .body(body.to_string())
        .unwrap()
}

fn seeded() -> Store {
    Store::new("alice").with_board("Road Trips", "travel_places", "Drives", 60)
}

// --- pages ---

#[tokio::test]
async fn profile_lists_board_cards() {
    let resp = app(seeded()).oneshot(get("/alice/")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("id=\"board1000\""));
    assert!(html.contains("href=\"/alice/road-trips/\""));
    assert!(html.contains("pinBoard createBoard"));
}

#[tokio::test]
async fn unknown_profile_is_404() {
    let resp = app(seeded()).oneshot(get("/bob/")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn board_page_exposes_meta_list_and_more_link() {
    let resp = app(seeded()).oneshot(get("/alice/road-trips/")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("<meta property=\"pinterestapp:pins\" content=\"60\">"));
    assert!(html.contains("<li data=\"1000\"><span>Road Trips</span></li>"));
    // 60 pins at 25 per page is 3 pages.
    assert!(html.contains("class=\"MoreGrid\" href=\"?page=4\""));
    assert_eq!(html.matches("class=\"pin\"").count(), 25);
}

#[tokio::test]
async fn last_grid_page_holds_the_remainder() {
    let resp = app(seeded()).oneshot(get("/alice/road-trips/?page=3")).await.unwrap();
    let html = body_text(resp).await;
    assert_eq!(html.matches("class=\"pin\"").count(), 10);
}

// --- create ---

#[tokio::test]
async fn create_requires_session_headers() {
    let resp = app(seeded())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/board/create/")
                .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body("name=New&category=art&collaborator=me".to_string())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn create_duplicate_name_fails_in_json() {
    let store = seeded();
    let session = store.session().clone();
    let resp = app(store)
        .oneshot(form_request(
            "POST",
            "/board/create/",
            &session,
            "name=road_trips&category=art&collaborator=me",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body.status, "failure");
    assert_eq!(body.message.as_deref(), Some(DUPLICATE_BOARD_MESSAGE));
}

// --- full lifecycle ---

#[tokio::test]
async fn create_update_delete_lifecycle() {
    use tower::Service;

    let store = Store::new("alice");
    let session = store.session().clone();
    let mut app = app(store).into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form_request(
            "POST",
            "/board/create/",
            &session,
            "name=Weekend+Projects&category=diy_crafts&collaborator=me",
        ))
        .await
        .unwrap();
    let created = body_json(resp).await;
    assert_eq!(created.status, "success");
    assert_eq!(created.url.as_deref(), Some("/alice/weekend-projects/"));
    let id = created.id.unwrap();

    // update (rename)
    let body = format!(
        "name=Garage+Projects&description=Tools&change_BoardCollaborators=me\
         &csrfmiddlewaretoken={}&collaborator_name=Enter+a+name&category=diy_crafts",
        session.csrf_token
    );
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form_request("POST", "/alice/weekend-projects/settings/", &session, &body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await.status, "success");

    // renamed board answers on its new path only
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/alice/garage-projects/"))
        .await
        .unwrap();
    let html = body_text(resp).await;
    assert!(html.contains(&format!("<li data=\"{id}\"><span>Garage Projects</span></li>")));
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/alice/weekend-projects/"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // delete, then delete again
    for expected in [StatusCode::OK, StatusCode::NOT_FOUND] {
        let resp = ServiceExt::ready(&mut app)
            .await
            .unwrap()
            .call(form_request("DELETE", "/alice/garage-projects/settings/", &session, ""))
            .await
            .unwrap();
        assert_eq!(resp.status(), expected);
    }
}
