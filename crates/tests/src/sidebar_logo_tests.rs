use bson::{DateTime, oid::ObjectId};
use agencyhub_db::models::{Agency, Plan, SubAccount};
use agencyhub_services::resolve_sidebar_logo;

fn agency(white_label: bool, logo: Option<&str>) -> Agency {
    let now = DateTime::now();
    Agency {
        id: Some(ObjectId::new()),
        name: "Acme".to_string(),
        company_email: "owner@acme.test".to_string(),
        company_phone: None,
        agency_logo: logo.map(str::to_string),
        white_label,
        plan: Plan::Free,
        address: None,
        city: None,
        zip_code: None,
        state: None,
        country: None,
        goal: 5,
        created_at: now,
        updated_at: now,
    }
}

fn sub_account(agency_id: ObjectId, logo: Option<&str>) -> SubAccount {
    let now = DateTime::now();
    SubAccount {
        id: Some(ObjectId::new()),
        agency_id,
        name: "Site".to_string(),
        company_email: "site@acme.test".to_string(),
        company_phone: None,
        sub_account_logo: logo.map(str::to_string),
        address: None,
        city: None,
        zip_code: None,
        state: None,
        country: None,
        goal: 5,
        created_at: now,
        updated_at: now,
    }
}

#[test]
fn white_label_always_wins() {
    let agency = agency(true, Some("/logos/agency.png"));
    let sub = sub_account(agency.id.unwrap(), Some("/logos/sub.png"));

    // Even a sub-account with its own logo renders the agency's
    assert_eq!(
        resolve_sidebar_logo(&agency, Some(&sub)),
        "/logos/agency.png"
    );
}

#[test]
fn sub_account_logo_overrides_when_not_white_labeled() {
    let agency = agency(false, Some("/logos/agency.png"));
    let sub = sub_account(agency.id.unwrap(), Some("/logos/sub.png"));

    assert_eq!(resolve_sidebar_logo(&agency, Some(&sub)), "/logos/sub.png");
}

#[test]
fn unset_sub_account_logo_falls_back_to_agency() {
    let agency = agency(false, Some("/logos/agency.png"));
    let sub = sub_account(agency.id.unwrap(), None);

    assert_eq!(
        resolve_sidebar_logo(&agency, Some(&sub)),
        "/logos/agency.png"
    );
}

#[test]
fn agency_scope_ignores_sub_account_logos() {
    let agency = agency(false, Some("/logos/agency.png"));

    assert_eq!(resolve_sidebar_logo(&agency, None), "/logos/agency.png");
}

#[test]
fn missing_agency_logo_yields_the_default() {
    let agency = agency(false, None);

    assert_eq!(
        resolve_sidebar_logo(&agency, None),
        agencyhub_services::access::DEFAULT_SIDEBAR_LOGO
    );
}
