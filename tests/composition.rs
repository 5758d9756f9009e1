use axum::http::StatusCode;

mod helpers;

use helpers::setup_app;

#[tokio::test]
async fn test_single_ingredient_matches_catalog() -> anyhow::Result<()> {
    let app = setup_app().await?;
    let kombu = app.ids[0];

    let (_, detail) = app.get(&format!("/api/ingredients/{kombu}")).await?;
    let (status, body) = app
        .post(
            "/api/ingredients/compose_preview",
            &format!(r#"[{{"ingredient_id": {kombu}, "quantity": 100, "unit": "g"}}]"#),
        )
        .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_weight"], 100.0);
    assert_eq!(body["total_synergy"], detail["chemistry"]["umami_synergy"]);
    assert_eq!(body["total_aa"], detail["chemistry"]["umami_aa"]);
    assert_eq!(body["synergy_zone"], "needs_nuc");
    assert_eq!(body["ingredients"][0]["name"], "kombu");
    assert_eq!(body["synergy_level"], "overlimit");
    assert_eq!(body["synergy_level_label"], "Overlimit Zone");
    assert!(
        body["synergy_level_suggestion"]
            .as_str()
            .is_some_and(|s| s.starts_with("Exceeding normal culinary range"))
    );

    Ok(())
}

#[tokio::test]
async fn test_blend_in_mixed_units() -> anyhow::Result<()> {
    let app = setup_app().await?;
    let (kombu, bonito) = (app.ids[0], app.ids[1]);

    let (status, body) = app
        .post(
            "/api/ingredients/compose_preview",
            &format!(
                r#"[
                    {{"ingredient_id": {kombu}, "quantity": 1, "unit": "oz"}},
                    {{"ingredient_id": {bonito}, "quantity": 2, "unit": "Tbsp"}},
                    {{"ingredient_id": {bonito}, "quantity": 0, "unit": "cup"}}
                ]"#
            ),
        )
        .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_weight"], 58.35);
    assert_eq!(body["ingredients"].as_array().map(Vec::len), Some(3));
    assert_eq!(body["ingredients"][1]["quantity_grams"], 30.0);
    assert!(body["total_synergy"].as_f64().is_some_and(|euc| euc > 0.0));
    assert!(body["pui"].as_f64().is_some_and(|pui| (0.0..=100.0).contains(&pui)));

    Ok(())
}

#[tokio::test]
async fn test_invalid_lines_are_bad_requests() -> anyhow::Result<()> {
    let app = setup_app().await?;
    let kombu = app.ids[0];

    let (status, body) = app
        .post(
            "/api/ingredients/compose_preview",
            &format!(r#"[{{"ingredient_id": {kombu}, "quantity": 1, "unit": "litre"}}]"#),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "lines[0].unit");

    let (status, body) = app
        .post(
            "/api/ingredients/compose_preview",
            &format!(r#"[{{"ingredient_id": {kombu}, "quantity": -1, "unit": "g"}}]"#),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "lines[0].quantity");

    let (status, body) = app
        .post(
            "/api/ingredients/compose_preview",
            &format!(r#"[{{"ingredient_id": {kombu}, "quantity": 1e27, "unit": "cup"}}]"#),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "lines[0].quantity");

    // Fits as grams, overflows once scaled by the concentrations.
    let (status, body) = app
        .post(
            "/api/ingredients/compose_preview",
            &format!(r#"[{{"ingredient_id": {kombu}, "quantity": 5e28, "unit": "g"}}]"#),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "lines[0].quantity");

    let (status, body) = app.post("/api/ingredients/compose_preview", "[]").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "quantity");

    let (status, body) = app
        .post("/api/ingredients/compose_preview", "{not json")
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");

    Ok(())
}

#[tokio::test]
async fn test_unknown_ingredient_is_not_found() -> anyhow::Result<()> {
    let app = setup_app().await?;
    let kombu = app.ids[0];

    let (status, body) = app
        .post(
            "/api/ingredients/compose_preview",
            &format!(
                r#"[{{"ingredient_id": {kombu}, "quantity": 10, "unit": "g"}},
                    {{"ingredient_id": 404, "quantity": 10, "unit": "g"}}]"#
            ),
        )
        .await?;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["id"], 404);

    Ok(())
}
