use std::sync::Arc;

use kanboard::board::{BoardService, CreateColumnArgs};
use kanboard::config::DatabaseConfig;
use kanboard::storage::LocalStorage;

#[tokio::test]
async fn test_local_storage_creation() {
    let result = LocalStorage::connect("sqlite::memory:").await;
    assert!(result.is_ok(), "LocalStorage should be created successfully");
    let board = BoardService::new(Arc::new(result.unwrap()));
    assert!(board.list_columns().await.unwrap().is_empty());
    assert!(board.list_labels().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_schema_creation_is_idempotent_and_data_persists() {
    let dir = tempfile::tempdir().unwrap();
    let config = DatabaseConfig {
        url: format!("sqlite://{}?mode=rwc", dir.path().join("board.db").display()),
    };

    {
        let storage = LocalStorage::new(&config).await.unwrap();
        let board = BoardService::new(Arc::new(storage));
        board
            .create_column(CreateColumnArgs {
                title: "To Do".to_string(),
                order: 1,
            })
            .await
            .unwrap();
    }

    let reopened = LocalStorage::new(&config).await.unwrap();
    let board = BoardService::new(Arc::new(reopened));
    assert_eq!(board.list_columns().await.unwrap()[0].title, "To Do");
}

#[tokio::test]
async fn test_unreachable_database_is_an_error() {
    let result = LocalStorage::connect("sqlite:///nonexistent-dir/for/kanboard/board.db?mode=ro").await;
    assert!(result.is_err());
}
