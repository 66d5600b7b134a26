use mongodb::{Database, IndexModel, options::IndexOptions};
use tracing::info;

pub async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    // Agencies
    create_indexes(
        db,
        "agencies",
        vec![index(bson::doc! { "company_email": 1 })],
    )
    .await?;

    // Sub-accounts
    create_indexes(
        db,
        "sub_accounts",
        vec![index(bson::doc! { "agency_id": 1 })],
    )
    .await?;

    // Users
    create_indexes(
        db,
        "users",
        vec![
            index_unique(bson::doc! { "email": 1 }),
            index(bson::doc! { "agency_id": 1 }),
        ],
    )
    .await?;

    // Permissions
    create_indexes(
        db,
        "permissions",
        vec![
            index_unique(bson::doc! { "email": 1, "sub_account_id": 1 }),
            index(bson::doc! { "sub_account_id": 1 }),
        ],
    )
    .await?;

    // Sidebar options
    create_indexes(
        db,
        "sidebar_options",
        vec![
            index(bson::doc! { "agency_id": 1 }),
            index(bson::doc! { "sub_account_id": 1 }),
        ],
    )
    .await?;

    // Pipelines
    create_indexes(
        db,
        "pipelines",
        vec![index(bson::doc! { "sub_account_id": 1 })],
    )
    .await?;

    // Notifications
    create_indexes(
        db,
        "notifications",
        vec![
            index(bson::doc! { "agency_id": 1, "created_at": -1 }),
            index(bson::doc! { "sub_account_id": 1 }),
        ],
    )
    .await?;

    // Invitations
    create_indexes(
        db,
        "invitations",
        vec![
            index_unique(bson::doc! { "email": 1 }),
            index(bson::doc! { "agency_id": 1, "status": 1 }),
        ],
    )
    .await?;

    info!("All indexes ensured");
    Ok(())
}

fn index(keys: bson::Document) -> IndexModel {
    IndexModel::builder().keys(keys).build()
}

fn index_unique(keys: bson::Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(true).build())
        .build()
}

async fn create_indexes(
    db: &Database,
    collection: &str,
    indexes: Vec<IndexModel>,
) -> Result<(), mongodb::error::Error> {
    db.collection::<bson::Document>(collection)
        .create_indexes(indexes)
        .await?;
    info!(collection, "Indexes created");
    Ok(())
}
