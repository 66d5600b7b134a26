use crate::fixtures::test_app::TestApp;
use serde_json::Value;

#[tokio::test]
async fn owner_sees_seeded_sub_account() {
    let app = TestApp::spawn().await;

    let agency = app.seed_agency("visible").await;
    let sub_account_id = app.seed_sub_account(&agency, "visible-site").await;

    let resp = app
        .auth_get(
            &format!("/api/sidebar/agency/{}", agency.agency_id),
            &agency.owner.token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let sidebar: Value = resp.json().await.unwrap();

    let visible = sidebar["sub_accounts"].as_array().unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0]["id"].as_str(), Some(sub_account_id.as_str()));
}

#[tokio::test]
async fn revocation_hides_sub_account_but_keeps_the_row() {
    let app = TestApp::spawn().await;

    let agency = app.seed_agency("revoke").await;
    let sub_account_id = app.seed_sub_account(&agency, "revoke-site").await;

    // Revoke the owner's seeded grant
    let resp = app
        .auth_post("/api/permission", &agency.owner.token)
        .json(&serde_json::json!({
            "email": agency.owner.email,
            "sub_account_id": sub_account_id,
            "access": false,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let resp = app
        .auth_get(
            &format!("/api/sidebar/agency/{}", agency.agency_id),
            &agency.owner.token,
        )
        .send()
        .await
        .unwrap();
    let sidebar: Value = resp.json().await.unwrap();
    assert_eq!(
        sidebar["sub_accounts"].as_array().unwrap().len(),
        0,
        "Revoked sub-account must disappear from the visible set"
    );

    // The permission row survives with the flag lowered
    let resp = app
        .auth_get("/api/me", &agency.owner.token)
        .send()
        .await
        .unwrap();
    let me: Value = resp.json().await.unwrap();
    let user_id = me["user"]["id"].as_str().unwrap();

    let resp = app
        .auth_get(
            &format!("/api/user/{user_id}/permission"),
            &agency.owner.token,
        )
        .send()
        .await
        .unwrap();
    let permissions: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(permissions.len(), 1);
    assert_eq!(permissions[0]["access"].as_bool(), Some(false));
}

#[tokio::test]
async fn member_without_grants_sees_no_sub_accounts() {
    let app = TestApp::spawn().await;

    let agency = app.seed_agency("gated").await;
    app.seed_sub_account(&agency, "gated-site").await;

    // Invite and onboard a member with no permission rows
    let resp = app
        .auth_post(
            &format!("/api/agency/{}/invitation", agency.agency_id),
            &agency.owner.token,
        )
        .json(&serde_json::json!({
            "email": "gated-member@example.test",
            "role": "SUBACCOUNT_USER",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let member_token = app.mint_token(
        "usr_gated_member",
        "gated-member@example.test",
        Some("Max"),
        Some("Mustermann"),
    );
    let resp = app
        .auth_post("/api/invitation/accept", &member_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let resp = app
        .auth_get(
            &format!("/api/sidebar/agency/{}", agency.agency_id),
            &member_token,
        )
        .send()
        .await
        .unwrap();
    let sidebar: Value = resp.json().await.unwrap();
    assert_eq!(
        sidebar["sub_accounts"].as_array().unwrap().len(),
        0,
        "A member with no granted permissions sees zero sub-accounts"
    );
}

#[tokio::test]
async fn sidebar_options_are_never_merged() {
    let app = TestApp::spawn().await;

    let agency = app.seed_agency("options").await;
    let sub_account_id = app.seed_sub_account(&agency, "options-site").await;

    let resp = app
        .auth_get(
            &format!("/api/sidebar/agency/{}", agency.agency_id),
            &agency.owner.token,
        )
        .send()
        .await
        .unwrap();
    let agency_sidebar: Value = resp.json().await.unwrap();
    assert_eq!(agency_sidebar["options"].as_array().unwrap().len(), 6);

    let resp = app
        .auth_get(
            &format!("/api/sidebar/subaccount/{sub_account_id}"),
            &agency.owner.token,
        )
        .send()
        .await
        .unwrap();
    let sub_sidebar: Value = resp.json().await.unwrap();
    assert_eq!(sub_sidebar["options"].as_array().unwrap().len(), 8);

    // Each set links into its own scope only
    for option in agency_sidebar["options"].as_array().unwrap() {
        let link = option["link"].as_str().unwrap();
        assert!(link.starts_with(&format!("/agency/{}", agency.agency_id)));
    }
    for option in sub_sidebar["options"].as_array().unwrap() {
        let link = option["link"].as_str().unwrap();
        assert!(link.starts_with(&format!("/subaccount/{sub_account_id}")));
    }
}

#[tokio::test]
async fn sidebar_rejects_foreign_sub_account() {
    let app = TestApp::spawn().await;

    let acme = app.seed_agency("acme-a").await;
    let beta = app.seed_agency("beta-b").await;
    let beta_site = app.seed_sub_account(&beta, "beta-site").await;

    let resp = app
        .auth_get(
            &format!("/api/sidebar/subaccount/{beta_site}"),
            &acme.owner.token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(
        resp.status().as_u16(),
        403,
        "Cross-agency sidebar access should be forbidden"
    );
}
