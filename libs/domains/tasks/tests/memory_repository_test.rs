//! Integration tests for the in-memory TaskRepository.
//!
//! These exercise the full repository contract: sequence allocation,
//! key derivation, conflict handling, partial updates and the
//! administrative reset.

use std::sync::Arc;

use domain_tasks::{
    CreateTask, MemoryTaskRepository, TaskError, TaskFilter, TaskRepository, UpdateTask,
};

fn create_input(project: &str, summary: &str) -> CreateTask {
    CreateTask {
        project: project.to_string(),
        summary: summary.to_string(),
        description: "details".to_string(),
        status: "open".to_string(),
        tags: vec!["test".to_string()],
    }
}

#[tokio::test]
async fn test_create_derives_sequential_keys_per_project() {
    let repo = MemoryTaskRepository::new();

    let first = repo.create(create_input("home", "first")).await.unwrap();
    let second = repo.create(create_input("home", "second")).await.unwrap();

    assert_eq!(first.key, "HOME-1");
    assert_eq!(first.seq, 1);
    assert_eq!(second.key, "HOME-2");
    assert_eq!(second.seq, 2);
}

#[tokio::test]
async fn test_projects_have_independent_sequences() {
    let repo = MemoryTaskRepository::new();

    let home = repo.create(create_input("home", "a")).await.unwrap();
    let work = repo.create(create_input("work", "b")).await.unwrap();

    assert_eq!(home.key, "HOME-1");
    assert_eq!(work.key, "WORK-1");
}

#[tokio::test]
async fn test_project_case_shares_one_key_space() {
    let repo = MemoryTaskRepository::new();

    // "home" and "HOME" are distinct sequence partitions but produce
    // keys in the same uppercase namespace; the second create collides.
    let first = repo.create(create_input("home", "a")).await.unwrap();
    assert_eq!(first.key, "HOME-1");

    let err = repo.create(create_input("HOME", "b")).await.unwrap_err();
    assert!(matches!(err, TaskError::DuplicateKey(key) if key == "HOME-1"));
}

#[tokio::test]
async fn test_key_conflict_burns_sequence_and_persists_nothing() {
    let repo = MemoryTaskRepository::new();

    repo.create(create_input("home", "a")).await.unwrap();

    // Force a collision from the parallel partition.
    let err = repo.create(create_input("HOME", "b")).await.unwrap_err();
    assert!(matches!(err, TaskError::DuplicateKey(_)));

    // Nothing was persisted for the failed create.
    let all = repo.list(TaskFilter::default()).await.unwrap();
    assert_eq!(all.len(), 1);

    // The burned number leaves a gap: the next create in the uppercase
    // partition continues past it.
    let next = repo.create(create_input("home", "c")).await.unwrap();
    assert_eq!(next.key, "HOME-2");
}

#[tokio::test]
async fn test_get_by_key_roundtrip() {
    let repo = MemoryTaskRepository::new();

    let created = repo.create(create_input("home", "lookup")).await.unwrap();

    let found = repo.get_by_key("HOME-1").await.unwrap().unwrap();
    assert_eq!(found.id, created.id);
    assert_eq!(found.summary, "lookup");

    assert!(repo.get_by_key("HOME-99").await.unwrap().is_none());
}

#[tokio::test]
async fn test_get_by_id_roundtrip() {
    let repo = MemoryTaskRepository::new();

    let created = repo.create(create_input("home", "by id")).await.unwrap();
    let found = repo.get(created.id).await.unwrap().unwrap();
    assert_eq!(found.key, created.key);
}

#[tokio::test]
async fn test_list_filters_by_project_status_and_tag() {
    let repo = MemoryTaskRepository::new();

    repo.create(create_input("home", "a")).await.unwrap();
    repo.create(create_input("work", "b")).await.unwrap();
    repo.create(CreateTask {
        tags: vec!["urgent".to_string()],
        ..create_input("work", "c")
    })
    .await
    .unwrap();

    let by_project = repo
        .list(TaskFilter {
            project: Some("work".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_project.len(), 2);

    let by_tag = repo
        .list(TaskFilter {
            tag: Some("urgent".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_tag.len(), 1);
    assert_eq!(by_tag[0].summary, "c");

    let by_status = repo
        .list(TaskFilter {
            status: Some("open".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_status.len(), 3);
}

#[tokio::test]
async fn test_list_pagination_and_sort() {
    let repo = MemoryTaskRepository::new();

    for i in 0..5 {
        repo.create(create_input("home", &format!("task {}", i)))
            .await
            .unwrap();
    }

    let page = repo
        .list(TaskFilter {
            sort: Some("seq".to_string()),
            skip: 1,
            limit: 2,
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(page.len(), 2);
    assert_eq!(page[0].seq, 2);
    assert_eq!(page[1].seq, 3);

    let newest_first = repo
        .list(TaskFilter {
            sort: Some("seq".to_string()),
            descending: true,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(newest_first[0].seq, 5);
}

#[tokio::test]
async fn test_update_merges_partially_and_preserves_immutables() {
    let repo = MemoryTaskRepository::new();

    let created = repo.create(create_input("home", "before")).await.unwrap();

    let updated = repo
        .update(
            "HOME-1",
            UpdateTask {
                status: Some("done".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.status, "done");
    assert_eq!(updated.summary, "before");
    assert_eq!(updated.project, "home");
    assert_eq!(updated.key, "HOME-1");
    assert_eq!(updated.created, created.created);
    assert!(updated.updated >= created.updated);
}

#[tokio::test]
async fn test_update_missing_key_is_not_found() {
    let repo = MemoryTaskRepository::new();

    let err = repo
        .update("HOME-1", UpdateTask::default())
        .await
        .unwrap_err();
    assert!(matches!(err, TaskError::NotFound(_)));
}

#[tokio::test]
async fn test_delete_returns_removed_task() {
    let repo = MemoryTaskRepository::new();

    repo.create(create_input("home", "doomed")).await.unwrap();

    let removed = repo.delete("HOME-1").await.unwrap();
    assert_eq!(removed.summary, "doomed");
    assert!(repo.get_by_key("HOME-1").await.unwrap().is_none());

    let err = repo.delete("HOME-1").await.unwrap_err();
    assert!(matches!(err, TaskError::NotFound(_)));
}

#[tokio::test]
async fn test_reset_all_restarts_sequences() {
    let repo = MemoryTaskRepository::new();

    repo.create(create_input("home", "a")).await.unwrap();
    repo.create(create_input("home", "b")).await.unwrap();

    repo.reset_all().await.unwrap();

    assert!(repo.list(TaskFilter::default()).await.unwrap().is_empty());

    // Counters are gone too, so keys restart at 1 without colliding.
    let fresh = repo.create(create_input("home", "c")).await.unwrap();
    assert_eq!(fresh.key, "HOME-1");
}

#[tokio::test]
async fn test_reset_all_on_empty_repository_is_idempotent() {
    let repo = MemoryTaskRepository::new();
    repo.reset_all().await.unwrap();
    repo.reset_all().await.unwrap();
}

#[tokio::test]
async fn test_concurrent_creates_get_distinct_contiguous_seqs() {
    let repo = Arc::new(MemoryTaskRepository::new());

    let mut handles = Vec::new();
    for i in 0..32 {
        let repo = Arc::clone(&repo);
        handles.push(tokio::spawn(async move {
            repo.create(create_input("home", &format!("task {}", i)))
                .await
                .unwrap()
                .seq
        }));
    }

    let mut seqs = Vec::new();
    for handle in handles {
        seqs.push(handle.await.unwrap());
    }

    seqs.sort_unstable();
    let expected: Vec<i64> = (1..=32).collect();
    assert_eq!(seqs, expected);
}
