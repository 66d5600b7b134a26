use crate::fixtures::test_app::TestApp;
use bson::doc;
use serde_json::Value;

#[tokio::test]
async fn acceptance_provisions_user_and_consumes_invitation() {
    let app = TestApp::spawn().await;

    let agency = app.seed_agency("join").await;

    let resp = app
        .auth_post(
            &format!("/api/agency/{}/invitation", agency.agency_id),
            &agency.owner.token,
        )
        .json(&serde_json::json!({
            "email": "newhire@example.test",
            "role": "AGENCY_ADMIN",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let token = app.mint_token("usr_newhire", "newhire@example.test", Some("Nina"), Some("Hart"));
    let resp = app
        .auth_post("/api/invitation/accept", &token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let accepted: Value = resp.json().await.unwrap();
    assert_eq!(
        accepted["agency_id"].as_str(),
        Some(agency.agency_id.as_str())
    );

    // The user exists, bound to the invitation's agency and role
    let resp = app
        .auth_get(
            &format!("/api/agency/{}/team", agency.agency_id),
            &agency.owner.token,
        )
        .send()
        .await
        .unwrap();
    let team: Vec<Value> = resp.json().await.unwrap();
    let hired = team
        .iter()
        .find(|m| m["email"] == "newhire@example.test")
        .expect("invited user should be on the team");
    assert_eq!(hired["role"].as_str(), Some("AGENCY_ADMIN"));
    assert_eq!(hired["name"].as_str(), Some("Nina Hart"));

    // The join is on the activity feed
    let resp = app
        .auth_get(
            &format!("/api/agency/{}/notification", agency.agency_id),
            &agency.owner.token,
        )
        .send()
        .await
        .unwrap();
    let notifications: Vec<Value> = resp.json().await.unwrap();
    assert!(
        notifications
            .iter()
            .any(|n| n["message"] == "Nina Hart | Joined")
    );

    // The invitation is consumed
    let remaining = app
        .db
        .collection::<bson::Document>("invitations")
        .count_documents(doc! { "email": "newhire@example.test" })
        .await
        .unwrap();
    assert_eq!(remaining, 0);
}

#[tokio::test]
async fn acceptance_is_idempotent_under_reinvocation() {
    let app = TestApp::spawn().await;

    let agency = app.seed_agency("rejoin").await;

    let resp = app
        .auth_post(
            &format!("/api/agency/{}/invitation", agency.agency_id),
            &agency.owner.token,
        )
        .json(&serde_json::json!({
            "email": "repeat@example.test",
            "role": "SUBACCOUNT_USER",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let token = app.mint_token("usr_repeat", "repeat@example.test", Some("Rob"), Some("Ode"));

    let first: Value = app
        .auth_post("/api/invitation/accept", &token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    // Second call lands on the existing-user fallback
    let second: Value = app
        .auth_post("/api/invitation/accept", &token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(first["agency_id"].as_str(), Some(agency.agency_id.as_str()));
    assert_eq!(first["agency_id"], second["agency_id"]);

    // Net effect of two calls equals one: a single user record
    let users = app
        .db
        .collection::<bson::Document>("users")
        .count_documents(doc! { "email": "repeat@example.test" })
        .await
        .unwrap();
    assert_eq!(users, 1);
}

#[tokio::test]
async fn known_caller_without_invitation_gets_their_agency() {
    let app = TestApp::spawn().await;

    let agency = app.seed_agency("known").await;

    let resp = app
        .auth_post("/api/invitation/accept", &agency.owner.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let accepted: Value = resp.json().await.unwrap();
    assert_eq!(
        accepted["agency_id"].as_str(),
        Some(agency.agency_id.as_str())
    );
}

#[tokio::test]
async fn unknown_caller_gets_no_agency() {
    let app = TestApp::spawn().await;

    let token = app.mint_token("usr_stranger", "stranger@example.test", None, None);
    let resp = app
        .auth_post("/api/invitation/accept", &token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let accepted: Value = resp.json().await.unwrap();
    assert!(accepted["agency_id"].is_null());
}

#[tokio::test]
async fn missing_caller_names_become_the_undefined_placeholder() {
    let app = TestApp::spawn().await;

    let agency = app.seed_agency("nameless").await;

    let resp = app
        .auth_post(
            &format!("/api/agency/{}/invitation", agency.agency_id),
            &agency.owner.token,
        )
        .json(&serde_json::json!({
            "email": "noname@example.test",
            "role": "SUBACCOUNT_USER",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    // Provider supplies neither name part
    let token = app.mint_token("usr_noname", "noname@example.test", None, None);
    let resp = app
        .auth_post("/api/invitation/accept", &token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let resp = app
        .auth_get(
            &format!("/api/agency/{}/team", agency.agency_id),
            &agency.owner.token,
        )
        .send()
        .await
        .unwrap();
    let team: Vec<Value> = resp.json().await.unwrap();
    let member = team
        .iter()
        .find(|m| m["email"] == "noname@example.test")
        .unwrap();
    assert_eq!(member["name"].as_str(), Some("undefined undefined"));
}

#[tokio::test]
async fn invitation_can_never_grant_the_owner_role() {
    let app = TestApp::spawn().await;

    let agency = app.seed_agency("noowner").await;

    let resp = app
        .auth_post(
            &format!("/api/agency/{}/invitation", agency.agency_id),
            &agency.owner.token,
        )
        .json(&serde_json::json!({
            "email": "pretender@example.test",
            "role": "AGENCY_OWNER",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 422);
}
