// tests/schema.rs - initializer tests against a live MongoDB
//
// Run with `cargo test -- --ignored` and MONGODB_TEST_URI pointing at a
// disposable server (defaults to mongodb://localhost:27017).

use std::collections::HashSet;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use database::{
    init::{create_collection, drop_database},
    initialize,
    models::{
        resource::ResourceModel,
        role_request::RoleRequestModel,
        user::{self, UserModel},
    },
    schema::collection_names,
    verify, InitOptions, SchemaError,
};
use futures::{FutureExt, TryStreamExt};
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime},
    error::{ErrorKind, WriteFailure},
    options::IndexOptions,
    Client, Database, IndexModel,
};

const DUPLICATE_KEY: i32 = 11000;

async fn scratch_database() -> Database {
    let uri = std::env::var("MONGODB_TEST_URI")
        .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
    let client = Client::with_uri_str(uri)
        .await
        .expect("Failed to connect to test database.");
    client.database(&format!("discord_bot_test_{}", ObjectId::new()))
}

/// Runs `test` against a scratch database that is dropped afterwards, also
/// when an assertion inside `test` fails.
async fn with_scratch_database<F, Fut>(test: F)
where
    F: FnOnce(Database) -> Fut,
    Fut: Future<Output = ()>,
{
    let db = scratch_database().await;
    let outcome = AssertUnwindSafe(test(db.clone())).catch_unwind().await;
    drop_database(&db).await.unwrap();
    if let Err(panic) = outcome {
        std::panic::resume_unwind(panic);
    }
}

fn user(user_id: i64, guild_id: i64) -> UserModel {
    UserModel {
        user_id,
        username: format!("user-{}", user_id),
        guild_id,
        join_date: DateTime::now(),
        roles: vec![],
        last_activity: DateTime::now(),
    }
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn fresh_database_gets_exact_schema() {
    with_scratch_database(|db| async move {
        let report = initialize(&db, &InitOptions::default()).await.unwrap();
        assert_eq!(report.created, collection_names());
        assert!(report.existing.is_empty());
        assert_eq!(report.indexes.len(), 18);

        let live: HashSet<String> = db
            .list_collection_names(None)
            .await
            .unwrap()
            .into_iter()
            .collect();
        let expected: HashSet<String> = collection_names().into_iter().map(String::from).collect();
        assert_eq!(live, expected);

        let drift = verify(&db).await.unwrap();
        assert!(drift.is_clean(), "{}", drift);
    })
    .await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn second_run_is_a_no_op() {
    with_scratch_database(|db| async move {
        let first = initialize(&db, &InitOptions::default()).await.unwrap();
        let second = initialize(&db, &InitOptions::default()).await.unwrap();

        assert!(second.created.is_empty());
        assert_eq!(second.existing, first.created);
        assert_eq!(second.indexes, first.indexes);
        assert!(verify(&db).await.unwrap().is_clean());

        // Already-present collections are not an error either
        assert!(!create_collection(&db, user::COLLECTION).await.unwrap());
    })
    .await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn users_reject_duplicate_membership() {
    with_scratch_database(|db| async move {
        initialize(&db, &InitOptions::default()).await.unwrap();

        let users = db.collection::<UserModel>(user::COLLECTION);
        users.insert_one(user(1, 10), None).await.unwrap();
        // Same user in another guild is a separate membership
        users.insert_one(user(1, 11), None).await.unwrap();

        let err = users.insert_one(user(1, 10), None).await.unwrap_err();
        match *err.kind {
            ErrorKind::Write(WriteFailure::WriteError(ref e)) => assert_eq!(e.code, DUPLICATE_KEY),
            ref other => panic!("expected duplicate key error, got {:?}", other),
        }
    })
    .await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn non_unique_indexes_accept_duplicates() {
    with_scratch_database(|db| async move {
        initialize(&db, &InitOptions::default()).await.unwrap();

        let requests = db.collection::<RoleRequestModel>("role_requests");
        for role in ["devGuy", "sysAdmin"] {
            requests
                .insert_one(
                    RoleRequestModel {
                        user_id: 1,
                        username: "user-1".to_string(),
                        role_name: role.to_string(),
                        guild_id: 10,
                        status: "pending".to_string(),
                        timestamp: DateTime::now(),
                        updated_at: None,
                    },
                    None,
                )
                .await
                .unwrap();
        }

        let count = requests
            .count_documents(doc! { "user_id": 1_i64, "guild_id": 10_i64 }, None)
            .await
            .unwrap();
        assert_eq!(count, 2);
    })
    .await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn text_search_uses_resources_text_index() {
    with_scratch_database(|db| async move {
        initialize(&db, &InitOptions::default()).await.unwrap();

        let resources = db.collection::<ResourceModel>("resources");
        resources
            .insert_one(
                ResourceModel {
                    user_id: 1,
                    username: "user-1".to_string(),
                    title: "Async Rust".to_string(),
                    content: "Notes on tokio runtimes".to_string(),
                    url: None,
                    guild_id: Some(10),
                    timestamp: DateTime::now(),
                },
                None,
            )
            .await
            .unwrap();

        let filter = doc! { "$text": { "$search": "tokio" } };
        let found: Vec<ResourceModel> = resources
            .find(filter.clone(), None)
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Async Rust");

        let plan = db
            .run_command(
                doc! { "explain": { "find": "resources", "filter": filter } },
                None,
            )
            .await
            .unwrap();
        assert!(plan.to_string().contains("title_text_content_text"));
    })
    .await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn conflicting_index_is_surfaced() {
    with_scratch_database(|db| async move {
        // A non-unique index under the name the manifest declares as unique
        let users = db.collection::<UserModel>(user::COLLECTION);
        let model = IndexModel::builder()
            .keys(doc! { "user_id": 1, "guild_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("user_id_1_guild_id_1".to_string())
                    .build(),
            )
            .build();
        users.create_index(model, None).await.unwrap();

        let drift = verify(&db).await.unwrap();
        assert_eq!(drift.uniqueness_mismatches.len(), 1);

        match initialize(&db, &InitOptions::default()).await {
            Err(SchemaError::IndexConflict {
                collection, index, ..
            }) => {
                assert_eq!(collection, "users");
                assert_eq!(index, "user_id_1_guild_id_1");
            }
            other => panic!("expected index conflict, got {:?}", other),
        }
    })
    .await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn dropped_database_reports_every_collection_missing() {
    with_scratch_database(|db| async move {
        initialize(&db, &InitOptions::default()).await.unwrap();
        drop_database(&db).await.unwrap();

        let drift = verify(&db).await.unwrap();
        assert_eq!(drift.missing_collections, collection_names());
        assert!(drift.ensure_clean().is_err());
    })
    .await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn wrong_direction_behind_declared_name_is_drift() {
    with_scratch_database(|db| async move {
        initialize(&db, &InitOptions::default()).await.unwrap();

        let logs = db.collection::<mongodb::bson::Document>("admin_logs");
        logs.drop_index("timestamp_-1", None).await.unwrap();
        let model = IndexModel::builder()
            .keys(doc! { "timestamp": 1 })
            .options(
                IndexOptions::builder()
                    .name("timestamp_-1".to_string())
                    .build(),
            )
            .build();
        logs.create_index(model, None).await.unwrap();

        let drift = verify(&db).await.unwrap();
        assert_eq!(drift.key_mismatches.len(), 1);
        assert_eq!(drift.key_mismatches[0].to_string(), "admin_logs.timestamp_-1");
        assert!(drift.missing_indexes.is_empty());
    })
    .await;
}
