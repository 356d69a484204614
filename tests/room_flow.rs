mod support;

use serde_json::Value;

fn fresh_code() -> String {
    // Codes are uppercased by the server; use hex so both sides agree.
    format!("T{}", uuid::Uuid::new_v4().simple()).to_uppercase()
}

async fn join(client: &reqwest::Client, base_url: &str, code: &str) -> Value {
    let res = client
        .post(format!("{base_url}/rooms"))
        .json(&serde_json::json!({ "code": code }))
        .send()
        .await
        .expect("join request should succeed");
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    res.json().await.expect("join response body")
}

#[tokio::test]
async fn join_creates_a_room_and_a_second_join_reuses_it() {
    let base_url = support::ensure_server();
    let client = reqwest::Client::new();
    let code = fresh_code();

    let room = join(&client, base_url, &code).await;
    assert_eq!(room["state"], "lobby");
    assert_eq!(room["round"], 0);
    assert_eq!(room["score"], serde_json::json!({}));

    let again = join(&client, base_url, &code).await;
    assert_eq!(again["room_id"], room["room_id"]);
}

#[tokio::test]
async fn empty_room_code_is_rejected() {
    let base_url = support::ensure_server();
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{base_url}/rooms"))
        .json(&serde_json::json!({ "code": "  " }))
        .send()
        .await
        .expect("request should succeed");

    assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.expect("error body");
    assert_eq!(body["error"], "room code is required");
}

#[tokio::test]
async fn start_moves_the_room_into_round_one() {
    let base_url = support::ensure_server();
    let client = reqwest::Client::new();
    let room = join(&client, base_url, &fresh_code()).await;
    let room_id = room["room_id"].as_str().expect("room id");

    let res = client
        .post(format!("{base_url}/rooms/{room_id}/start"))
        .send()
        .await
        .expect("start request should succeed");
    assert_eq!(res.status(), reqwest::StatusCode::NO_CONTENT);

    let res = client
        .get(format!("{base_url}/rooms/{room_id}"))
        .send()
        .await
        .expect("room lookup should succeed");
    let snapshot: Value = res.json().await.expect("room body");
    assert_eq!(snapshot["state"], "playing");
    assert_eq!(snapshot["round"], 1);
    assert_eq!(snapshot["score"], serde_json::json!({}));
}

#[tokio::test]
async fn starting_an_unknown_room_is_not_found() {
    let base_url = support::ensure_server();
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{base_url}/rooms/no-such-room/start"))
        .send()
        .await
        .expect("request should succeed");

    assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn any_reported_hit_is_trusted_and_scores() {
    let base_url = support::ensure_server();
    let client = reqwest::Client::new();
    let room = join(&client, base_url, &fresh_code()).await;
    let room_id = room["room_id"].as_str().expect("room id");

    client
        .post(format!("{base_url}/rooms/{room_id}/start"))
        .send()
        .await
        .expect("start request should succeed");

    // The engine does not check that the spawn id is the active target.
    let res = client
        .post(format!("{base_url}/rooms/{room_id}/hits"))
        .json(&serde_json::json!({ "spawn_id": "made-up", "player_name": "Ana" }))
        .send()
        .await
        .expect("hit request should succeed");
    assert_eq!(res.status(), reqwest::StatusCode::OK);

    let result: Value = res.json().await.expect("hit body");
    assert_eq!(result["winner"], "Ana");
    assert_eq!(result["round"], 1);
    assert_eq!(result["spawn_id"], "made-up");
    assert_eq!(result["score"]["Ana"], 1);
}

#[tokio::test]
async fn a_full_match_finishes_after_max_rounds() {
    let base_url = support::ensure_server();
    let client = reqwest::Client::new();
    let room = join(&client, base_url, &fresh_code()).await;
    let room_id = room["room_id"].as_str().expect("room id");
    let max_rounds = room["max_rounds"].as_u64().expect("max rounds");

    client
        .post(format!("{base_url}/rooms/{room_id}/start"))
        .send()
        .await
        .expect("start request should succeed");

    let mut last: Value = Value::Null;
    for n in 0..max_rounds {
        let player = if n % 2 == 0 { "Ana" } else { "Beto" };
        let res = client
            .post(format!("{base_url}/rooms/{room_id}/hits"))
            .json(&serde_json::json!({ "spawn_id": format!("s{n}"), "player_name": player }))
            .send()
            .await
            .expect("hit request should succeed");
        assert_eq!(res.status(), reqwest::StatusCode::OK);
        last = res.json().await.expect("hit body");
    }

    assert_eq!(last["round"].as_u64(), Some(max_rounds));

    let res = client
        .get(format!("{base_url}/rooms/{room_id}"))
        .send()
        .await
        .expect("room lookup should succeed");
    let snapshot: Value = res.json().await.expect("room body");
    assert_eq!(snapshot["state"], "finished");
    assert_eq!(snapshot["round"].as_u64(), Some(max_rounds));
    assert_eq!(snapshot["score"]["Ana"].as_u64(), Some(max_rounds / 2 + 1));
}

#[tokio::test]
async fn double_start_resets_the_score() {
    let base_url = support::ensure_server();
    let client = reqwest::Client::new();
    let room = join(&client, base_url, &fresh_code()).await;
    let room_id = room["room_id"].as_str().expect("room id");

    client
        .post(format!("{base_url}/rooms/{room_id}/start"))
        .send()
        .await
        .expect("start request should succeed");
    client
        .post(format!("{base_url}/rooms/{room_id}/hits"))
        .json(&serde_json::json!({ "spawn_id": "s1", "player_name": "Ana" }))
        .send()
        .await
        .expect("hit request should succeed");
    client
        .post(format!("{base_url}/rooms/{room_id}/start"))
        .send()
        .await
        .expect("restart request should succeed");

    // Score from before the restart is gone; documented non-idempotence.
    let res = client
        .get(format!("{base_url}/rooms/{room_id}"))
        .send()
        .await
        .expect("room lookup should succeed");
    let snapshot: Value = res.json().await.expect("room body");
    assert_eq!(snapshot["round"], 1);
    assert_eq!(snapshot["score"], serde_json::json!({}));
}
