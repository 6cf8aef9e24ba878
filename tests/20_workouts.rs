mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn create_requires_title_and_date() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let user = common::register_user(&client, &server.base_url, "validation").await?;

    let res = client
        .post(format!("{}/api/workouts", server.base_url))
        .bearer_auth(&user.token)
        .json(&json!({ "notes": "no title" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["field_errors"]["title"], "This field is required");
    assert_eq!(body["field_errors"]["date"], "This field is required");
    Ok(())
}

#[tokio::test]
async fn detail_returns_exercises_and_sets_in_order() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let user = common::register_user(&client, &server.base_url, "detail").await?;
    let exercise_ids = common::catalog_exercise_ids(&client, &server.base_url, 3).await?;

    let workout_id =
        common::create_workout(&client, &server.base_url, &user, "Leg Day", true).await?;

    // Add three exercises without explicit order; expect 1, 2, 3
    let mut workout_exercise_ids = Vec::new();
    for exercise_id in &exercise_ids {
        let res = client
            .post(format!("{}/api/workouts/{}/exercises", server.base_url, workout_id))
            .bearer_auth(&user.token)
            .json(&json!({ "exercise_id": exercise_id }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = res.json().await?;
        workout_exercise_ids.push(body["workout_exercise"]["id"].as_i64().unwrap());
    }

    // Sets added out of order for the first exercise
    for (set_number, weight) in [(3, 245.0), (1, 225.0), (2, 235.0)] {
        let res = client
            .post(format!(
                "{}/api/workouts/exercises/{}/sets",
                server.base_url, workout_exercise_ids[0]
            ))
            .bearer_auth(&user.token)
            .json(&json!({ "set_number": set_number, "reps": 5, "weight": weight }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let res = client
        .get(format!("{}/api/workouts/{}", server.base_url, workout_id))
        .bearer_auth(&user.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;

    let exercises = body["workout"]["exercises"].as_array().unwrap();
    assert_eq!(exercises.len(), 3);
    let orders: Vec<i64> = exercises
        .iter()
        .map(|e| e["order_in_workout"].as_i64().unwrap())
        .collect();
    assert_eq!(orders, vec![1, 2, 3]);

    let sets = exercises[0]["sets"].as_array().unwrap();
    let set_numbers: Vec<i64> = sets.iter().map(|s| s["set_number"].as_i64().unwrap()).collect();
    assert_eq!(set_numbers, vec![1, 2, 3]);
    assert_eq!(sets[0]["weight"].as_f64().unwrap(), 225.0);
    Ok(())
}

#[tokio::test]
async fn concurrent_exercise_adds_never_share_an_order() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let user = common::register_user(&client, &server.base_url, "race").await?;
    let exercise_ids = common::catalog_exercise_ids(&client, &server.base_url, 4).await?;

    let workout_id =
        common::create_workout(&client, &server.base_url, &user, "Race Day", true).await?;

    let mut handles = Vec::new();
    for exercise_id in exercise_ids {
        let client = client.clone();
        let url = format!("{}/api/workouts/{}/exercises", server.base_url, workout_id);
        let token = user.token.clone();
        handles.push(tokio::spawn(async move {
            client
                .post(url)
                .bearer_auth(token)
                .json(&json!({ "exercise_id": exercise_id }))
                .send()
                .await
        }));
    }

    let mut orders = Vec::new();
    for handle in handles {
        let res = handle.await??;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = res.json().await?;
        orders.push(body["workout_exercise"]["order_in_workout"].as_i64().unwrap());
    }

    orders.sort_unstable();
    assert_eq!(orders, vec![1, 2, 3, 4], "orders must be unique and dense");
    Ok(())
}

#[tokio::test]
async fn update_is_a_full_field_replace() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let user = common::register_user(&client, &server.base_url, "update").await?;

    let workout_id =
        common::create_workout(&client, &server.base_url, &user, "Push Day", true).await?;

    // PUT without duration or notes wipes them
    let res = client
        .put(format!("{}/api/workouts/{}", server.base_url, workout_id))
        .bearer_auth(&user.token)
        .json(&json!({ "title": "Push Day v2", "date": "2024-02-01", "is_public": false }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["workout"]["title"], "Push Day v2");
    assert_eq!(body["workout"]["duration"], Value::Null);
    assert_eq!(body["workout"]["notes"], "");
    assert_eq!(body["workout"]["is_public"], false);
    Ok(())
}

#[tokio::test]
async fn foreign_workouts_read_as_not_found() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let owner = common::register_user(&client, &server.base_url, "owner").await?;
    let intruder = common::register_user(&client, &server.base_url, "intruder").await?;

    let workout_id =
        common::create_workout(&client, &server.base_url, &owner, "Mine", true).await?;

    // Read, update and delete all answer 404, never 403
    let res = client
        .get(format!("{}/api/workouts/{}", server.base_url, workout_id))
        .bearer_auth(&intruder.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .put(format!("{}/api/workouts/{}", server.base_url, workout_id))
        .bearer_auth(&intruder.token)
        .json(&json!({ "title": "Stolen", "date": "2024-01-01" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .delete(format!("{}/api/workouts/{}", server.base_url, workout_id))
        .bearer_auth(&intruder.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Still intact for the owner
    let res = client
        .get(format!("{}/api/workouts/{}", server.base_url, workout_id))
        .bearer_auth(&owner.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn deleting_a_workout_cascades_to_links_and_sets() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let user = common::register_user(&client, &server.base_url, "cascade").await?;
    let exercise_ids = common::catalog_exercise_ids(&client, &server.base_url, 1).await?;

    let workout_id =
        common::create_workout(&client, &server.base_url, &user, "Doomed", true).await?;

    let res = client
        .post(format!("{}/api/workouts/{}/exercises", server.base_url, workout_id))
        .bearer_auth(&user.token)
        .json(&json!({ "exercise_id": exercise_ids[0] }))
        .send()
        .await?;
    let body: Value = res.json().await?;
    let workout_exercise_id = body["workout_exercise"]["id"].as_i64().unwrap();

    let res = client
        .post(format!(
            "{}/api/workouts/exercises/{}/sets",
            server.base_url, workout_exercise_id
        ))
        .bearer_auth(&user.token)
        .json(&json!({ "set_number": 1, "reps": 5, "weight": 100.0 }))
        .send()
        .await?;
    let body: Value = res.json().await?;
    let set_id = body["set"]["id"].as_i64().unwrap();

    let res = client
        .delete(format!("{}/api/workouts/{}", server.base_url, workout_id))
        .bearer_auth(&user.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    // The orphans are gone: the set and the link no longer resolve
    let res = client
        .put(format!("{}/api/workouts/sets/{}", server.base_url, set_id))
        .bearer_auth(&user.token)
        .json(&json!({ "reps": 8 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .post(format!(
            "{}/api/workouts/exercises/{}/sets",
            server.base_url, workout_exercise_id
        ))
        .bearer_auth(&user.token)
        .json(&json!({ "set_number": 1 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn set_numbers_must_be_positive() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let user = common::register_user(&client, &server.base_url, "setnum").await?;
    let exercise_ids = common::catalog_exercise_ids(&client, &server.base_url, 1).await?;

    let workout_id =
        common::create_workout(&client, &server.base_url, &user, "Sets", true).await?;
    let res = client
        .post(format!("{}/api/workouts/{}/exercises", server.base_url, workout_id))
        .bearer_auth(&user.token)
        .json(&json!({ "exercise_id": exercise_ids[0] }))
        .send()
        .await?;
    let body: Value = res.json().await?;
    let workout_exercise_id = body["workout_exercise"]["id"].as_i64().unwrap();

    for bad in [json!({ "reps": 5 }), json!({ "set_number": 0, "reps": 5 })] {
        let res = client
            .post(format!(
                "{}/api/workouts/exercises/{}/sets",
                server.base_url, workout_exercise_id
            ))
            .bearer_auth(&user.token)
            .json(&bad)
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
    Ok(())
}
