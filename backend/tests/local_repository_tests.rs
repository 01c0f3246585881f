//! Tests for LocalRepository under concurrent access, through the trait
//! object the HTTP layer uses.

use std::collections::HashSet;
use std::sync::Arc;

use text_compliance::api::Pagination;
use text_compliance::db::repositories::LocalRepository;
use text_compliance::db::repository::AnalysisRepository;
use text_compliance::db::services;

#[tokio::test]
async fn test_concurrent_creates_all_persist() {
    let repo: Arc<dyn AnalysisRepository> = Arc::new(LocalRepository::new());

    let mut handles = vec![];
    for i in 0..50 {
        let repo_clone = Arc::clone(&repo);
        handles.push(tokio::spawn(async move {
            repo_clone.create_analysis(&format!("text {}", i), 50).await
        }));
    }

    let mut ids = HashSet::new();
    for handle in handles {
        let record = handle.await.unwrap().unwrap();
        ids.insert(record.id);
    }

    assert_eq!(ids.len(), 50);
    assert_eq!(repo.count_analyses().await.unwrap(), 50);
}

#[tokio::test]
async fn test_concurrent_reads_during_writes() {
    let repo = Arc::new(LocalRepository::new());
    for i in 0..10 {
        repo.create_analysis(&format!("seed {}", i), 50).await.unwrap();
    }

    let mut handles = vec![];
    for i in 0..20 {
        let repo_clone = Arc::clone(&repo);
        handles.push(tokio::spawn(async move {
            if i % 2 == 0 {
                repo_clone
                    .create_analysis(&format!("write {}", i), 30)
                    .await
                    .map(|_| ())
            } else {
                services::fetch_history(repo_clone.as_ref(), Pagination::new(100, 0))
                    .await
                    .map(|page| assert!(page.data.len() as i64 <= page.pagination.total))
            }
        }));
    }

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(repo.len(), 20);
}

#[tokio::test]
async fn test_history_is_newest_first_and_consistent() {
    let repo = LocalRepository::new();
    for i in 0..30 {
        repo.create_analysis(&format!("{}", i), 50).await.unwrap();
    }

    let page = repo.list_analyses(Pagination::new(100, 0)).await.unwrap();
    for pair in page.windows(2) {
        assert!(pair[0].created_at >= pair[1].created_at);
        assert!(pair[0].seq > pair[1].seq);
    }

    let again = repo.list_analyses(Pagination::new(100, 0)).await.unwrap();
    assert_eq!(page, again);
}

#[tokio::test]
async fn test_records_are_never_modified_by_reads() {
    let repo = LocalRepository::new();
    let created = repo.create_analysis("immutable", 40).await.unwrap();

    for _ in 0..3 {
        let page = repo.list_analyses(Pagination::default()).await.unwrap();
        assert_eq!(page, vec![created.clone()]);
    }
    assert_eq!(repo.get_analysis(created.id).await.unwrap(), created);
}

#[tokio::test]
async fn test_clones_share_storage() {
    let repo = LocalRepository::new();
    let clone = repo.clone();
    clone.create_analysis("shared", 50).await.unwrap();

    assert_eq!(repo.len(), 1);
}

#[test]
fn test_local_store_reports_no_pool() {
    let repo: Arc<dyn AnalysisRepository> = Arc::new(LocalRepository::new());
    assert!(repo.pool_stats().is_none());
}
