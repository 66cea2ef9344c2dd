use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use dayplan_core::db::migrations::latest_version;
use dayplan_core::db::{open_db, open_db_from_config, open_db_in_memory, DbError};
use dayplan_core::{
    AddToTodayRepository, Clock, CoreConfig, CreateTaskRepository, FixedClock, InMemoryGoalDirectory,
    MarkCompleteRepository, Priority, RepoError, SnapshotRepository, SnapshotService,
    SqliteSnapshotRepository, TaskBook, TaskContext, TaskInfo, TaskTemplate,
};
use rusqlite::Connection;
use std::sync::Arc;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

fn populated_context() -> TaskContext {
    let context = TaskContext::new(
        TaskBook::new(),
        Arc::new(FixedClock::new(today())),
        Arc::new(InMemoryGoalDirectory::default()),
    );
    let gym = TaskTemplate::new(
        TaskInfo::new("Gym", "legs", Some("health")).unwrap(),
        today().succ_opt(),
        false,
    );
    let rent = TaskTemplate::new(TaskInfo::new("Pay rent", "", None).unwrap(), None, true);
    context.create().save_task_available(gym.clone());
    context.create().save_task_available(rent.clone());

    let add = context.add_to_today();
    let done = add.add_task_to_today(&gym, Some(Priority::High), today().pred_opt());
    add.add_task_to_today(&rent, None, None);
    context.mark_complete().update_task_completion_status(done.id(), true);
    context
}

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "task_templates");
    assert_table_exists(&conn, "task_instances");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn configured_db_path_is_used_and_absent_path_stays_in_memory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("configured.db");
    let config = CoreConfig {
        db_path: Some(path.clone()),
        ..CoreConfig::default()
    };
    config.validate().unwrap();

    {
        let conn = open_db_from_config(&config).unwrap();
        let repo = SqliteSnapshotRepository::try_new(&conn).unwrap();
        repo.save_snapshot(populated_context().book()).unwrap();
    }
    assert!(path.exists());

    let conn = open_db_from_config(&config).unwrap();
    let restored = SqliteSnapshotRepository::try_new(&conn)
        .unwrap()
        .load_snapshot()
        .unwrap();
    assert_eq!(restored.template_count(), 2);

    let memory = open_db_from_config(&CoreConfig::default()).unwrap();
    assert_eq!(schema_version(&memory), latest_version());
}

#[test]
fn repository_requires_migrated_connection() {
    let conn = Connection::open_in_memory().unwrap();
    let err = SqliteSnapshotRepository::try_new(&conn).err().unwrap();
    assert!(matches!(
        err,
        RepoError::UninitializedConnection {
            actual_version: 0,
            ..
        }
    ));
}

#[test]
fn snapshot_survives_reopening_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dayplan.db");
    let context = populated_context();
    let (templates, instances) = context.book().records();

    {
        let conn = open_db(&path).unwrap();
        let service = SnapshotService::new(SqliteSnapshotRepository::try_new(&conn).unwrap());
        let stats = service.save(context.book()).unwrap();
        assert_eq!(stats.templates, 2);
        assert_eq!(stats.instances, 2);
    }

    let conn = open_db(&path).unwrap();
    let service = SnapshotService::new(SqliteSnapshotRepository::try_new(&conn).unwrap());
    let restored = service.load().unwrap();
    let (restored_templates, restored_instances) = restored.records();

    assert_eq!(restored_templates, templates);
    assert_eq!(restored_instances, instances);
    assert!(restored_instances
        .iter()
        .any(|i| i.is_completed() && i.completed_at().is_some()));
}

struct SubMillisecondClock;

impl Clock for SubMillisecondClock {
    fn today(&self) -> NaiveDate {
        today()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 17, 46, 40).unwrap()
            + chrono::Duration::nanoseconds(123_456_789)
    }
}

#[test]
fn completion_timestamp_keeps_nanoseconds_across_save_and_load() {
    let context = TaskContext::new(
        TaskBook::new(),
        Arc::new(SubMillisecondClock),
        Arc::new(InMemoryGoalDirectory::default()),
    );
    let walk = TaskTemplate::new(TaskInfo::new("Walk", "", None).unwrap(), None, false);
    context.create().save_task_available(walk.clone());
    let instance = context.add_to_today().add_task_to_today(&walk, None, None);
    assert!(context
        .mark_complete()
        .update_task_completion_status(instance.id(), true));
    let (_, before) = context.book().records();

    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSnapshotRepository::try_new(&conn).unwrap();
    repo.save_snapshot(context.book()).unwrap();
    let (_, after) = repo.load_snapshot().unwrap().records();

    assert_eq!(after[0].completed_at(), Some(SubMillisecondClock.now()));
    assert_eq!(after, before);
}

#[test]
fn saving_again_replaces_previous_rows() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSnapshotRepository::try_new(&conn).unwrap();
    let context = populated_context();
    repo.save_snapshot(context.book()).unwrap();

    let stats = repo.save_snapshot(&TaskBook::new()).unwrap();
    assert_eq!(stats.templates, 0);

    let restored = repo.load_snapshot().unwrap();
    assert_eq!(restored.template_count(), 0);
    assert_eq!(restored.instance_count(), 0);
}

#[test]
fn load_rejects_corrupted_rows() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSnapshotRepository::try_new(&conn).unwrap();
    repo.save_snapshot(populated_context().book()).unwrap();

    conn.execute("UPDATE task_instances SET begin_date = 'yesterday';", [])
        .unwrap();
    let err = repo.load_snapshot().err().unwrap();
    assert!(matches!(err, RepoError::InvalidData(ref message) if message.contains("begin_date")));

    conn.execute(
        "UPDATE task_instances SET begin_date = '2026-10-18', completed_at = '1697000000000';",
        [],
    )
    .unwrap();
    let err = repo.load_snapshot().err().unwrap();
    assert!(matches!(err, RepoError::InvalidData(ref message) if message.contains("completed_at")));

    conn.execute("DELETE FROM task_instances;", []).unwrap();
    conn.execute("UPDATE task_templates SET name = '   ';", [])
        .unwrap();
    let err = repo.load_snapshot().err().unwrap();
    assert!(matches!(err, RepoError::Validation(_)));
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
