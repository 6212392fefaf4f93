//! Database integration tests.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test --test db_integration -- --ignored`
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `lingkod_test`)
//!   `TEST_DB_PASSWORD` (default: `lingkod_test`)
//!   `TEST_DB_NAME` (default: `lingkod_test`)

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use chrono::Utc;
use lingkod_db::test_utils::{TestDatabase, TestDbConfig};
use sea_orm::Set;

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_database_connection() {
    let config = TestDbConfig::default();
    let result = TestDatabase::with_config(config).await;
    assert!(result.is_ok(), "Failed to connect: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_database_cleanup() {
    let db = TestDatabase::new().await.expect("Failed to connect");
    let result = db.cleanup().await;
    assert!(result.is_ok(), "Cleanup failed: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_migrations_apply() {
    let db = TestDatabase::create_unique()
        .await
        .expect("Failed to create database");

    let result = lingkod_db::migrate(db.connection()).await;
    assert!(result.is_ok(), "Migration failed: {:?}", result.err());

    db.drop_database().await.expect("Failed to drop database");
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_execute_query() {
    let db = TestDatabase::new().await.expect("Failed to connect");

    use sea_orm::ConnectionTrait;
    let result = db
        .connection()
        .execute(sea_orm::Statement::from_string(
            sea_orm::DatabaseBackend::Postgres,
            "SELECT 1".to_string(),
        ))
        .await;

    assert!(result.is_ok(), "Query failed: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_policy_double_swap_restores_order() {
    use lingkod_db::{
        entities::policy_section::{self, PolicyDocument},
        repositories::PolicySectionRepository,
    };

    let db = TestDatabase::create_unique()
        .await
        .expect("Failed to create database");
    lingkod_db::migrate(db.connection())
        .await
        .expect("Migration failed");

    let repo = PolicySectionRepository::new(db.connection_arc());

    for (id, order) in [("ps1", 0), ("ps2", 1)] {
        repo.create(policy_section::ActiveModel {
            id: Set(id.to_string()),
            document: Set(PolicyDocument::PrivacyPolicy),
            title: Set(format!("Section {order}")),
            body: Set("Body".to_string()),
            display_order: Set(order),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        })
        .await
        .unwrap();
    }

    let orders_by_id = |sections: Vec<policy_section::Model>| {
        sections
            .into_iter()
            .map(|s| (s.id, s.display_order))
            .collect::<std::collections::HashMap<_, _>>()
    };

    let sections = repo
        .list_for_document(PolicyDocument::PrivacyPolicy)
        .await
        .unwrap();
    repo.swap_orders(&sections[0], &sections[1]).await.unwrap();

    let swapped = orders_by_id(
        repo.list_for_document(PolicyDocument::PrivacyPolicy)
            .await
            .unwrap(),
    );
    assert_eq!(swapped["ps1"], 1);
    assert_eq!(swapped["ps2"], 0);

    // Swapping back restores the original assignment
    let sections = repo
        .list_for_document(PolicyDocument::PrivacyPolicy)
        .await
        .unwrap();
    repo.swap_orders(&sections[0], &sections[1]).await.unwrap();

    let restored = orders_by_id(
        repo.list_for_document(PolicyDocument::PrivacyPolicy)
            .await
            .unwrap(),
    );
    assert_eq!(restored["ps1"], 0);
    assert_eq!(restored["ps2"], 1);

    db.drop_database().await.expect("Failed to drop database");
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_approved_report_leaves_pending_listing() {
    use lingkod_db::{
        entities::{
            barangay, report,
            report::ReportStatus,
            report_type, user,
            user::{ActiveStatus, CreationStatus, UserRole},
        },
        repositories::{
            BarangayRepository, ReportFilter, ReportRepository, ReportTypeRepository,
            UserRepository,
        },
    };

    let db = TestDatabase::create_unique()
        .await
        .expect("Failed to create database");
    lingkod_db::migrate(db.connection())
        .await
        .expect("Migration failed");
    let conn = db.connection_arc();

    BarangayRepository::new(Arc::clone(&conn))
        .create(barangay::ActiveModel {
            id: Set("b1".to_string()),
            name: Set("Poblacion".to_string()),
            captain_name: Set(None),
            contact_number: Set(None),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        })
        .await
        .unwrap();
    ReportTypeRepository::new(Arc::clone(&conn))
        .create(report_type::ActiveModel {
            id: Set("rt1".to_string()),
            name: Set("Quarterly accomplishment".to_string()),
            shortname: Set(None),
            description: Set(None),
            created_at: Set(Utc::now().into()),
        })
        .await
        .unwrap();
    UserRepository::new(Arc::clone(&conn))
        .create(user::ActiveModel {
            id: Set("sec1".to_string()),
            email: Set("sec1@example.com".to_string()),
            email_lower: Set("sec1@example.com".to_string()),
            password_hash: Set("hash".to_string()),
            token: Set(None),
            role: Set(UserRole::BarangaySecretary),
            first_name: Set("Ana".to_string()),
            last_name: Set("Santos".to_string()),
            middle_name: Set(None),
            date_of_birth: Set(chrono::NaiveDate::from_ymd_opt(1990, 1, 15).unwrap()),
            contact_number: Set(None),
            barangay_id: Set(Some("b1".to_string())),
            valid_id_type_id: Set(None),
            id_front_url: Set(None),
            id_back_url: Set(None),
            creation_status: Set(CreationStatus::Approved),
            reject_reason: Set(None),
            active_status: Set(Some(ActiveStatus::Active)),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        })
        .await
        .unwrap();

    let repo = ReportRepository::new(Arc::clone(&conn));
    let created = repo
        .create(report::ActiveModel {
            id: Set("r1".to_string()),
            barangay_id: Set("b1".to_string()),
            report_type_id: Set("rt1".to_string()),
            submitted_by: Set("sec1".to_string()),
            title: Set("Q1 accomplishment".to_string()),
            year: Set(2026),
            status: Set(ReportStatus::Pending),
            reject_reason: Set(None),
            reviewed_by: Set(None),
            reviewed_at: Set(None),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        })
        .await
        .unwrap();

    let pending_filter = ReportFilter {
        status: Some(ReportStatus::Pending),
        ..Default::default()
    };
    let pending = repo.list(&pending_filter, 10, 0).await.unwrap();
    assert_eq!(pending.len(), 1);

    let mut active: report::ActiveModel = created.into();
    active.status = Set(ReportStatus::Approved);
    active.reviewed_by = Set(Some("staff1".to_string()));
    active.reviewed_at = Set(Some(Utc::now().into()));
    let approved = repo.update(active).await.unwrap();
    assert_eq!(approved.status, ReportStatus::Approved);
    assert!(approved.reject_reason.is_none());

    let pending = repo.list(&pending_filter, 10, 0).await.unwrap();
    assert!(pending.is_empty());

    db.drop_database().await.expect("Failed to drop database");
}

#[test]
fn test_config_from_env() {
    let config = TestDbConfig::default();
    assert!(!config.host.is_empty());
    assert!(config.port > 0);
    assert!(!config.username.is_empty());
    assert!(!config.database.is_empty());
}

#[test]
fn test_database_url_format() {
    let config = TestDbConfig {
        host: "testhost".to_string(),
        port: 5432,
        username: "testuser".to_string(),
        password: "testpass".to_string(),
        database: "testdb".to_string(),
    };

    let url = config.database_url();
    assert!(url.starts_with("postgres://"));
    assert!(url.contains("testhost"));
    assert!(url.contains("5432"));
    assert!(url.contains("testuser"));
    assert!(url.contains("testdb"));
}

#[test]
fn test_postgres_url_format() {
    let config = TestDbConfig::default();
    let url = config.postgres_url();
    assert!(url.ends_with("/postgres"));
}
