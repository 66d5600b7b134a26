use serde_json::Value;

use super::test_app::TestApp;

/// A caller provisioned through the identity provider and registered via
/// `/api/me/init`.
pub struct SeededCaller {
    pub subject: String,
    pub email: String,
    pub name: String,
    pub token: String,
}

/// Result of seeding a test agency with its owner.
pub struct SeededAgency {
    pub agency_id: String,
    pub owner: SeededCaller,
}

impl TestApp {
    /// Mint a token for a fresh caller and register their user record.
    pub async fn provision_caller(
        &self,
        handle: &str,
        given_name: &str,
        family_name: &str,
    ) -> SeededCaller {
        let subject = format!("usr_{}", uuid::Uuid::new_v4().simple());
        let email = format!("{handle}@example.test");
        let token = self.mint_token(&subject, &email, Some(given_name), Some(family_name));

        let resp = self
            .auth_post("/api/me/init", &token)
            .json(&serde_json::json!({}))
            .send()
            .await
            .expect("Init request failed");
        assert_eq!(
            resp.status().as_u16(),
            200,
            "Init failed: {}",
            resp.text().await.unwrap_or_default()
        );

        SeededCaller {
            subject,
            email,
            name: format!("{given_name} {family_name}"),
            token,
        }
    }

    /// Provision an owner and create an agency with their company email.
    pub async fn seed_agency(&self, slug: &str) -> SeededAgency {
        let owner = self
            .provision_caller(&format!("{slug}-owner"), "Jane", "Doe")
            .await;

        let resp = self
            .auth_post("/api/agency", &owner.token)
            .json(&serde_json::json!({
                "name": slug,
                "company_email": owner.email,
            }))
            .send()
            .await
            .expect("Agency upsert request failed");
        assert_eq!(
            resp.status().as_u16(),
            200,
            "Agency upsert failed: {}",
            resp.text().await.unwrap_or_default()
        );

        let json: Value = resp.json().await.expect("Failed to parse agency response");
        let agency_id = json["id"].as_str().expect("agency id").to_string();

        SeededAgency { agency_id, owner }
    }

    /// Create a sub-account under the seeded agency, seeding its defaults.
    pub async fn seed_sub_account(&self, agency: &SeededAgency, name: &str) -> String {
        let resp = self
            .auth_post(
                &format!("/api/agency/{}/subaccount", agency.agency_id),
                &agency.owner.token,
            )
            .json(&serde_json::json!({
                "name": name,
                "company_email": format!("{name}@example.test"),
            }))
            .send()
            .await
            .expect("Sub-account upsert request failed");
        assert_eq!(
            resp.status().as_u16(),
            200,
            "Sub-account upsert failed: {}",
            resp.text().await.unwrap_or_default()
        );

        let json: Value = resp
            .json()
            .await
            .expect("Failed to parse sub-account response");
        json["id"].as_str().expect("sub-account id").to_string()
    }
}
