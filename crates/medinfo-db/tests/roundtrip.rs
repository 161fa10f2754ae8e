//! Tests against a live Postgres. Run with
//! `DATABASE_URL=postgres://... cargo test -p medinfo-db -- --ignored`.

use medinfo_core::models::doctor::NewDoctor;
use medinfo_core::models::item::{ItemType, NewItem};
use medinfo_core::models::prescription::NewPrescription;
use medinfo_core::models::user::NewUser;
use medinfo_db::error::DbError;
use medinfo_db::{doctors, items, migrate, pool, prescriptions, users};
use sqlx::PgPool;

async fn test_pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = pool::connect(&url).await.unwrap();
    migrate::run_migrations(&pool).await.unwrap();
    pool
}

fn unique(prefix: &str) -> String {
    format!(
        "{prefix}-{}",
        jiff::Timestamp::now().as_nanosecond()
    )
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn migrations_are_idempotent() {
    let pool = test_pool().await;
    migrate::run_migrations(&pool).await.unwrap();
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn duplicate_user_email_is_a_conflict() {
    let pool = test_pool().await;
    let new_user = NewUser {
        name: "Pat".into(),
        phn_number: String::new(),
        email: format!("{}@example.com", unique("pat")),
        password: String::new(),
    };

    let user = users::create_user(&pool, &new_user, "hash").await.unwrap();
    assert_eq!(users::get_user(&pool, user.id).await.unwrap().email, new_user.email);

    let err = users::create_user(&pool, &new_user, "hash").await.unwrap_err();
    assert!(matches!(err, DbError::Conflict(_)), "got {err:?}");

    let (found, hash) = users::find_user_credentials(&pool, &new_user.email)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, user.id);
    assert_eq!(hash, "hash");
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn doctor_resolves_by_username_or_email() {
    let pool = test_pool().await;
    let username = unique("dr");
    let new_doctor = NewDoctor {
        name: "Dr Who".into(),
        phn_number: String::new(),
        speciality: "general".into(),
        username: username.clone(),
        email: format!("{username}@example.com"),
        password: String::new(),
    };
    let doctor = doctors::create_doctor(&pool, &new_doctor, "hash").await.unwrap();
    assert_eq!(doctor.accuracy, 0.0);

    let by_name = doctors::find_doctor_by_identifier(&pool, &username).await.unwrap();
    let by_email = doctors::find_doctor_by_identifier(&pool, &new_doctor.email)
        .await
        .unwrap();
    assert_eq!(by_name.map(|d| d.id), Some(doctor.id));
    assert_eq!(by_email.map(|d| d.id), Some(doctor.id));

    let ghost = doctors::find_doctor_by_identifier(&pool, &unique("ghost"))
        .await
        .unwrap();
    assert!(ghost.is_none());
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn prescription_with_bulk_items() {
    let pool = test_pool().await;
    let prescription = prescriptions::insert_prescription(
        &pool,
        &NewPrescription {
            doc_id: 1,
            user_id: 424_242,
            symptoms: "fever".into(),
            link: "https://example.com/rx.png".into(),
        },
    )
    .await
    .unwrap();
    assert!(!prescription.seen_by_patient);

    let new_items = vec![
        NewItem {
            name: "cbc".into(),
            item_type: ItemType::Test,
            ai_reasons: "{}".into(),
            doc_reason: String::new(),
        },
        NewItem {
            name: "paracetamol".into(),
            item_type: ItemType::Medicine,
            ai_reasons: "{}".into(),
            doc_reason: String::new(),
        },
    ];
    let inserted = items::insert_items_bulk(&pool, prescription.id, &new_items)
        .await
        .unwrap();
    assert_eq!(inserted.len(), 2);
    assert!(inserted.iter().all(|i| i.pres_id == prescription.id));

    let empty = items::insert_items_bulk(&pool, prescription.id, &[]).await.unwrap();
    assert!(empty.is_empty());

    let updated = items::update_doc_reason(&pool, inserted[0].id, "agreed")
        .await
        .unwrap();
    assert_eq!(updated.doc_reason, "agreed");

    let seen = prescriptions::update_seen_by_patient(&pool, prescription.id, true)
        .await
        .unwrap();
    assert!(seen.seen_by_patient);

    let listed = prescriptions::list_user_prescriptions_with_items(&pool, 424_242)
        .await
        .unwrap();
    let entry = listed
        .iter()
        .find(|p| p.prescription.id == prescription.id)
        .unwrap();
    assert_eq!(entry.items.len(), 2);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn missing_rows_are_not_found() {
    let pool = test_pool().await;
    assert!(matches!(
        prescriptions::get_prescription(&pool, i64::MAX).await,
        Err(DbError::NotFound(_))
    ));
    assert!(matches!(
        items::update_doc_reason(&pool, i64::MAX, "x").await,
        Err(DbError::NotFound(_))
    ));
}
