use chrono::Utc;
use screening::RejectionReason;
use screening::entity::rejected_submission;
use screening::pipeline::reject::{finalize_rejection, permanently_blocked};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

use crate::common::{TestApp, spawn};

async fn rejected_by_filename(
    app: &TestApp,
    filename: &str,
) -> Option<rejected_submission::Model> {
    rejected_submission::Entity::find()
        .filter(rejected_submission::Column::Filename.eq(filename))
        .one(&app.db)
        .await
        .unwrap()
}

#[tokio::test]
async fn rejection_moves_the_file_and_writes_the_terminal_row() {
    let app = spawn().await;
    let sub = app.seed("bad.mod", "hash-bad").await;
    app.claim_one(sub.id, 1).await;

    let outcome = app
        .queue
        .reject(&[sub.id], 1, RejectionReason::Corrupt, None, false)
        .await
        .unwrap();
    assert!(outcome.warnings.is_empty());
    assert_eq!(outcome.committed, 1);

    assert!(app.pending(sub.id).await.is_none());

    let row = rejected_by_filename(&app, "bad.mod").await.unwrap();
    assert_eq!(row.reason, RejectionReason::Corrupt);
    assert_eq!(row.message, RejectionReason::Corrupt.default_message());
    assert_eq!(row.rejected_by, 1);
    assert!(!row.is_temporary);

    let date = Utc::now().date_naive();
    let rejected_path = app.files.layout().rejected_path("bad.mod", date);
    assert!(rejected_path.exists());
    assert!(!app.files.staged_exists("bad.mod").await.unwrap());
}

#[tokio::test]
async fn explicit_message_overrides_the_reason_default() {
    let app = spawn().await;
    let sub = app.seed("bad.mod", "hash-bad").await;
    app.claim_one(sub.id, 1).await;

    app.queue
        .reject(
            &[sub.id],
            1,
            RejectionReason::PoorQuality,
            Some("  Single looping pattern, no arrangement.  "),
            true,
        )
        .await
        .unwrap();

    let row = rejected_by_filename(&app, "bad.mod").await.unwrap();
    assert_eq!(row.message, "Single looping pattern, no arrangement.");
    assert!(row.is_temporary);
}

#[tokio::test]
async fn rejection_requires_a_claim_on_every_item() {
    let app = spawn().await;
    let a = app.seed("a.mod", "hash-a").await;
    let b = app.seed("b.mod", "hash-b").await;
    app.claim_one(a.id, 1).await;
    // b stays unclaimed: there is no pre-screen escape hatch for rejection.

    let outcome = app
        .queue
        .reject(&[a.id, b.id], 1, RejectionReason::Other, None, false)
        .await
        .unwrap();
    assert!(outcome.is_rejected());
    assert_eq!(outcome.committed, 0);

    // All-or-nothing: the claimed item was not rejected either.
    assert!(app.pending(a.id).await.is_some());
    assert!(app.pending(b.id).await.is_some());
    assert_eq!(
        rejected_submission::Entity::find().count(&app.db).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn rejection_by_a_non_owner_is_rejected() {
    let app = spawn().await;
    let sub = app.seed("a.mod", "hash-a").await;
    app.claim_one(sub.id, 1).await;

    let outcome = app
        .queue
        .reject(&[sub.id], 2, RejectionReason::Other, None, false)
        .await
        .unwrap();
    assert!(outcome.is_rejected());
    assert!(app.pending(sub.id).await.is_some());
}

#[tokio::test]
async fn permanent_rejection_blocks_the_hash() {
    let app = spawn().await;
    let sub = app.seed("perm.mod", "blocked-hash").await;
    app.claim_one(sub.id, 1).await;
    app.queue
        .reject(&[sub.id], 1, RejectionReason::Ripped, None, false)
        .await
        .unwrap();

    assert!(permanently_blocked(&app.db, "blocked-hash").await.unwrap());
    assert!(!permanently_blocked(&app.db, "unseen-hash").await.unwrap());
}

#[tokio::test]
async fn temporary_rejection_does_not_block_the_hash() {
    let app = spawn().await;
    let sub = app.seed("temp.mod", "temp-hash").await;
    app.claim_one(sub.id, 1).await;
    app.queue
        .reject(&[sub.id], 1, RejectionReason::PoorQuality, None, true)
        .await
        .unwrap();

    assert!(!permanently_blocked(&app.db, "temp-hash").await.unwrap());
}

#[tokio::test]
async fn missing_staged_file_skips_the_item() {
    let app = spawn().await;
    let a = app.seed("a.mod", "hash-a").await;
    let b = app.seed("b.mod", "hash-b").await;
    app.claim_one(a.id, 1).await;
    app.claim_one(b.id, 1).await;
    std::fs::remove_file(app.files.layout().staged_path("a.mod")).unwrap();

    let outcome = app
        .queue
        .reject(&[a.id, b.id], 1, RejectionReason::Other, None, false)
        .await
        .unwrap();
    assert_eq!(outcome.committed, 1);

    assert!(app.pending(a.id).await.is_some());
    assert!(app.pending(b.id).await.is_none());
    assert!(rejected_by_filename(&app, "b.mod").await.is_some());
}

#[tokio::test]
async fn failed_row_commit_reverses_the_rejected_move() {
    let app = spawn().await;
    let sub = app.seed("bad.mod", "hash-bad").await;
    app.claim_one(sub.id, 1).await;
    let model = app.pending(sub.id).await.unwrap();

    // Commit-time ownership check fails for a moderator who does not hold
    // the claim, after the file has already been moved.
    let committed = finalize_rejection(
        &app.db,
        &app.files,
        model,
        2,
        RejectionReason::Other,
        "nope",
        false,
    )
    .await
    .unwrap();
    assert!(!committed);

    // The move was reversed and nothing terminal was written.
    assert!(app.files.staged_exists("bad.mod").await.unwrap());
    let date = Utc::now().date_naive();
    assert!(!app.files.layout().rejected_path("bad.mod", date).exists());
    assert!(app.pending(sub.id).await.is_some());
    assert_eq!(
        rejected_submission::Entity::find().count(&app.db).await.unwrap(),
        0
    );
}
