use screening::ScreeningEventKind;
use screening::Redirect;
use screening::audit;

use crate::common::spawn;

#[tokio::test]
async fn rename_updates_row_file_and_audit_log() {
    let app = spawn().await;
    let sub = app.seed("old_name.mod", "abc").await;
    app.claim_one(sub.id, 1).await;

    let outcome = app.queue.rename(sub.id, 1, "new_name.mod").await.unwrap();
    assert!(outcome.warnings.is_empty());
    assert_eq!(outcome.redirect, Redirect::Item(sub.id));

    let row = app.pending(sub.id).await.unwrap();
    assert_eq!(row.filename, "new_name.mod");

    // The staged file was renamed in place.
    assert!(app.files.staged_exists("new_name.mod").await.unwrap());
    assert!(!app.files.staged_exists("old_name.mod").await.unwrap());

    let events = audit::events_for(&app.db, sub.id).await.unwrap();
    let last = events.last().unwrap();
    assert_eq!(last.event, ScreeningEventKind::Rename);
    assert_eq!(last.detail, "renamed old_name.mod -> new_name.mod");
}

#[tokio::test]
async fn rename_requires_the_claim() {
    let app = spawn().await;
    let sub = app.seed("old.mod", "abc").await;

    let outcome = app.queue.rename(sub.id, 1, "new.mod").await.unwrap();
    assert!(outcome.is_rejected());
    assert_eq!(app.pending(sub.id).await.unwrap().filename, "old.mod");

    app.claim_one(sub.id, 2).await;
    let outcome = app.queue.rename(sub.id, 1, "new.mod").await.unwrap();
    assert!(outcome.is_rejected());
    assert_eq!(app.pending(sub.id).await.unwrap().filename, "old.mod");
}

#[tokio::test]
async fn rename_validates_the_proposed_name() {
    let app = spawn().await;
    let sub = app.seed("old.mod", "abc").await;
    app.claim_one(sub.id, 1).await;

    for bad in ["", "new name.mod", "OLD.MOD", "old.xm", "nested/old.mod"] {
        let outcome = app.queue.rename(sub.id, 1, bad).await.unwrap();
        assert!(outcome.is_rejected(), "'{bad}' should be rejected");
    }
    assert_eq!(app.pending(sub.id).await.unwrap().filename, "old.mod");
    assert!(app.files.staged_exists("old.mod").await.unwrap());
}

#[tokio::test]
async fn rename_rejects_names_already_in_use() {
    let app = spawn().await;
    let sub = app.seed("old.mod", "abc").await;
    let other = app.seed("taken.mod", "def").await;
    app.claim_one(sub.id, 1).await;

    let outcome = app.queue.rename(sub.id, 1, "taken.mod").await.unwrap();
    assert!(outcome.is_rejected());
    assert_eq!(app.pending(sub.id).await.unwrap().filename, "old.mod");
    assert_eq!(app.pending(other.id).await.unwrap().filename, "taken.mod");
}

#[tokio::test]
async fn rename_is_single_target_only() {
    // The action surface takes exactly one id by signature; batched
    // renames are impossible by construction. This covers the companion
    // rule: the target must exist.
    let app = spawn().await;
    let outcome = app.queue.rename(4242, 1, "anything.mod").await.unwrap();
    assert!(outcome.is_rejected());
}
