use screening::{ScreeningEventKind, ScreeningFlag};
use screening::audit;

use crate::common::spawn;

#[tokio::test]
async fn apply_flag_releases_the_claim() {
    let app = spawn().await;
    let sub = app.seed("song1.mod", "abc").await;
    app.claim_one(sub.id, 1).await;

    let outcome = app
        .queue
        .apply_flag(&[sub.id], 1, ScreeningFlag::NeedsSecondOpinion)
        .await
        .unwrap();
    assert_eq!(outcome.committed, 1);

    // The flagged item returns to the pool, visible to all moderators.
    let row = app.pending(sub.id).await.unwrap();
    assert_eq!(row.flag, Some(ScreeningFlag::NeedsSecondOpinion));
    assert_eq!(row.flagged_by, Some(1));
    assert_eq!(row.claimed_by, None);
    assert_eq!(row.claim_time, None);
}

#[tokio::test]
async fn apply_flag_records_the_previous_flag() {
    let app = spawn().await;
    let sub = app.seed("song1.mod", "abc").await;
    app.claim_one(sub.id, 1).await;
    app.queue
        .apply_flag(&[sub.id], 1, ScreeningFlag::PossibleDuplicate)
        .await
        .unwrap();

    app.claim_one(sub.id, 2).await;
    app.queue
        .apply_flag(&[sub.id], 2, ScreeningFlag::UnderInvestigation)
        .await
        .unwrap();

    let events = audit::events_for(&app.db, sub.id).await.unwrap();
    let flag_events: Vec<_> = events
        .iter()
        .filter(|e| e.event == ScreeningEventKind::ApplyFlag)
        .collect();
    assert_eq!(flag_events.len(), 2);
    assert_eq!(flag_events[0].detail, "flag: none -> PossibleDuplicate");
    assert_eq!(
        flag_events[1].detail,
        "flag: PossibleDuplicate -> UnderInvestigation"
    );
}

#[tokio::test]
async fn apply_flag_requires_the_claim() {
    let app = spawn().await;
    let sub = app.seed("song1.mod", "abc").await;

    // Unclaimed: flagging is not permitted.
    let outcome = app
        .queue
        .apply_flag(&[sub.id], 1, ScreeningFlag::PreScreened)
        .await
        .unwrap();
    assert_eq!(outcome.committed, 0);
    assert_eq!(app.pending(sub.id).await.unwrap().flag, None);

    // Claimed by someone else: also not permitted.
    app.claim_one(sub.id, 2).await;
    let outcome = app
        .queue
        .apply_flag(&[sub.id], 1, ScreeningFlag::PreScreened)
        .await
        .unwrap();
    assert_eq!(outcome.committed, 0);
    assert_eq!(app.pending(sub.id).await.unwrap().flag, None);
}

#[tokio::test]
async fn reapplying_the_current_flag_is_not_permitted() {
    let app = spawn().await;
    let sub = app.seed("song1.mod", "abc").await;
    app.claim_one(sub.id, 1).await;
    app.queue
        .apply_flag(&[sub.id], 1, ScreeningFlag::PossibleDuplicate)
        .await
        .unwrap();

    app.claim_one(sub.id, 2).await;
    let outcome = app
        .queue
        .apply_flag(&[sub.id], 2, ScreeningFlag::PossibleDuplicate)
        .await
        .unwrap();
    assert_eq!(outcome.committed, 0);

    // A different escalation flag is fine.
    let outcome = app
        .queue
        .apply_flag(&[sub.id], 2, ScreeningFlag::UnderInvestigation)
        .await
        .unwrap();
    assert_eq!(outcome.committed, 1);
}

#[tokio::test]
async fn pre_screened_items_only_accept_terminal_actions() {
    let app = spawn().await;
    let sub = app.seed("song1.mod", "abc").await;
    app.claim_one(sub.id, 1).await;
    app.queue
        .apply_flag(&[sub.id], 1, ScreeningFlag::PreScreened)
        .await
        .unwrap();

    app.claim_one(sub.id, 2).await;
    let outcome = app
        .queue
        .apply_flag(&[sub.id], 2, ScreeningFlag::NeedsSecondOpinion)
        .await
        .unwrap();
    assert_eq!(outcome.committed, 0);
    assert_eq!(
        app.pending(sub.id).await.unwrap().flag,
        Some(ScreeningFlag::PreScreened)
    );
}

#[tokio::test]
async fn clear_flag_requires_a_fresh_claim() {
    let app = spawn().await;
    let sub = app.seed("song1.mod", "abc").await;
    app.claim_one(sub.id, 1).await;
    app.queue
        .apply_flag(&[sub.id], 1, ScreeningFlag::UnderInvestigation)
        .await
        .unwrap();

    // Without a claim the flag stays.
    let outcome = app.queue.clear_flag(&[sub.id], 2).await.unwrap();
    assert_eq!(outcome.committed, 0);
    assert_eq!(
        app.pending(sub.id).await.unwrap().flag,
        Some(ScreeningFlag::UnderInvestigation)
    );

    // Re-claimed like any unclaimed item, then cleared.
    app.claim_one(sub.id, 2).await;
    let outcome = app.queue.clear_flag(&[sub.id], 2).await.unwrap();
    assert_eq!(outcome.committed, 1);

    let row = app.pending(sub.id).await.unwrap();
    assert_eq!(row.flag, None);
    assert_eq!(row.flagged_by, None);
    assert_eq!(row.claimed_by, None);
    assert_eq!(row.claim_time, None);

    let events = audit::events_for(&app.db, sub.id).await.unwrap();
    let last = events.last().unwrap();
    assert_eq!(last.event, ScreeningEventKind::ClearFlag);
    assert_eq!(last.detail, "flag cleared: UnderInvestigation");
}

#[tokio::test]
async fn clear_flag_on_an_unflagged_claim_is_skipped() {
    let app = spawn().await;
    let sub = app.seed("song1.mod", "abc").await;
    app.claim_one(sub.id, 1).await;

    let outcome = app.queue.clear_flag(&[sub.id], 1).await.unwrap();
    assert_eq!(outcome.committed, 0);
    // The claim is untouched.
    assert_eq!(app.pending(sub.id).await.unwrap().claimed_by, Some(1));
}

#[tokio::test]
async fn flag_and_claim_never_coexist_after_flag_transitions() {
    let app = spawn().await;
    let sub = app.seed("song1.mod", "abc").await;

    app.claim_one(sub.id, 1).await;
    app.queue
        .apply_flag(&[sub.id], 1, ScreeningFlag::NeedsSecondOpinion)
        .await
        .unwrap();
    let row = app.pending(sub.id).await.unwrap();
    assert!(row.flag.is_some() && row.claimed_by.is_none());

    app.claim_one(sub.id, 2).await;
    app.queue.clear_flag(&[sub.id], 2).await.unwrap();
    let row = app.pending(sub.id).await.unwrap();
    assert!(row.flag.is_none() && row.claimed_by.is_none());
}
