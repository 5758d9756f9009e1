use axum::http::StatusCode;

mod helpers;

use helpers::setup_app;

fn names(body: &serde_json::Value) -> Vec<&str> {
    body["results"]
        .as_array()
        .map(|results| {
            results
                .iter()
                .filter_map(|r| r["base_name"].as_str())
                .collect()
        })
        .unwrap_or_default()
}

#[tokio::test]
async fn test_health_and_ready() -> anyhow::Result<()> {
    let app = setup_app().await?;

    let (status, body) = app.get("/health").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = app.get("/ready").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
    assert_eq!(body["catalog"]["ingredients"], 3);
    assert_eq!(body["catalog"]["similarity"], "trigram");

    Ok(())
}

#[tokio::test]
async fn test_browse_envelope() -> anyhow::Result<()> {
    let app = setup_app().await?;

    let (status, body) = app.get("/api/ingredients").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);
    assert_eq!(body["page"], 1);
    assert_eq!(body["page_size"], 24);
    assert_eq!(body["total_pages"], 1);
    assert_eq!(names(&body), vec!["bonito flakes", "kombu", "tomato"]);
    assert!(body["results"][0]["chemistry"]["umami_synergy"].is_number());

    Ok(())
}

#[tokio::test]
async fn test_browse_query_parameters() -> anyhow::Result<()> {
    let app = setup_app().await?;

    let (_, body) = app
        .get("/api/ingredients?dietary%5B%5D=vegan&sort=alpha")
        .await?;
    assert_eq!(names(&body), vec!["kombu", "tomato"]);

    let (_, body) = app.get("/api/ingredients?umami=umami_nuc").await?;
    assert_eq!(names(&body), vec!["bonito flakes"]);

    let (_, body) = app.get("/api/ingredients?q=komb").await?;
    assert_eq!(names(&body), vec!["kombu"]);

    let (status, body) = app
        .get("/api/ingredients?page=oops&page_size=2&sort=unknown")
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 1);
    assert_eq!(body["total_pages"], 2);
    assert_eq!(names(&body).len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_detail() -> anyhow::Result<()> {
    let app = setup_app().await?;
    let kombu = app.ids[0];

    let (status, body) = app.get(&format!("/api/ingredients/{kombu}")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["base_name"], "kombu");
    assert!(body["aliases"].as_array().is_some_and(|a| a.is_empty()));
    assert!(body["similar"].as_array().is_some_and(|a| a.is_empty()));
    assert_eq!(body["complementary"][0]["base_name"], "bonito flakes");

    let (status, body) = app.get("/api/ingredients/9999").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    let (status, _) = app.get("/api/ingredients/kombu").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    Ok(())
}
