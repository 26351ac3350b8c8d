use std::sync::Arc;

use chrono::Utc;
use screening::storage::{ArchiveLayout, ScreeningFiles};
use screening::ScreeningQueue;
use screening::database;
use screening::entity::pending_submission;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use tempfile::TempDir;

/// A screening engine wired to a throwaway SQLite database and temp-dir
/// file roots.
pub struct TestApp {
    pub db: DatabaseConnection,
    pub files: Arc<ScreeningFiles>,
    pub queue: ScreeningQueue,
    /// Kept alive so the temp roots outlive the test.
    _dir: TempDir,
}

pub async fn spawn() -> TestApp {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("screening.db");
    let url = format!("sqlite://{}?mode=rwc", db_path.display());
    let db = database::init_db(&url)
        .await
        .expect("Failed to initialize test database");

    let layout = ArchiveLayout::new(
        dir.path().join("staging"),
        dir.path().join("archive"),
        dir.path().join("rejected"),
    );
    let files = Arc::new(
        ScreeningFiles::new(layout)
            .await
            .expect("Failed to create file store"),
    );
    let queue = ScreeningQueue::new(db.clone(), files.clone(), 48);

    TestApp {
        db,
        files,
        queue,
        _dir: dir,
    }
}

impl TestApp {
    /// Stage a backing file and insert a pending submission for it.
    pub async fn seed(&self, filename: &str, hash: &str) -> pending_submission::Model {
        self.seed_with(filename, hash, |model| model).await
    }

    /// Like [`seed`](Self::seed), with a hook to adjust the row first.
    pub async fn seed_with<F>(
        &self,
        filename: &str,
        hash: &str,
        customize: F,
    ) -> pending_submission::Model
    where
        F: FnOnce(pending_submission::ActiveModel) -> pending_submission::ActiveModel,
    {
        self.files
            .stage(filename, b"fake module bytes")
            .await
            .expect("Failed to stage file");

        let model = pending_submission::ActiveModel {
            hash: Set(hash.to_string()),
            filename: Set(filename.to_string()),
            format: Set("MOD".to_string()),
            channels: Set(4),
            size_bytes: Set(12_345),
            declared_title: Set(None),
            uploader_id: Set(None),
            uploader_handle: Set(None),
            is_own_work: Set(false),
            claimed_by: Set(None),
            claim_time: Set(None),
            flag: Set(None),
            flagged_by: Set(None),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        customize(model)
            .insert(&self.db)
            .await
            .expect("Failed to insert pending submission")
    }

    pub async fn pending(&self, id: i32) -> Option<pending_submission::Model> {
        pending_submission::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .expect("DB query failed")
    }

    /// Claim `id` for `moderator` and assert it succeeded.
    pub async fn claim_one(&self, id: i32, moderator: i32) {
        let outcome = self
            .queue
            .claim(&[id], moderator)
            .await
            .expect("claim failed");
        assert_eq!(outcome.committed, 1, "expected claim of {id} to succeed");
    }
}
