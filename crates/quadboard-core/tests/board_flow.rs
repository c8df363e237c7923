//! End-to-end board flow: sync engine driving the real gateway against a
//! mock backend.

use quadboard_core::{
    BackendGateway, ConnectionStatus, NullRenderer, Store, SyncEngine, TaskStatus,
};
use std::sync::Arc;
use url::Url;

#[tokio::test]
async fn create_move_complete_delete_against_mock_backend() {
    let mut server = mockito::Server::new_async().await;

    let list = server
        .mock("GET", "/tasks")
        .with_status(200)
        .with_body(
            r#"{"tasks": [{"id": "buy-1", "title": "Buy milk", "status": "uncategorized",
                "created_at": "2025-03-01T10:00:00Z", "updated_at": "2025-03-01T10:00:00Z"}]}"#,
        )
        .expect(1)
        .create_async()
        .await;
    let stats = server
        .mock("GET", "/stats/weekly")
        .with_status(200)
        .with_body(r#"{"stats": {"total_created": 1, "total_completed": 1}}"#)
        .expect(2)
        .create_async()
        .await;
    let update = server
        .mock("POST", "/tasks/update")
        .with_status(200)
        .with_body(
            r#"{"task": {"id": "buy-1", "title": "Buy milk", "status": "urgent_important",
                "created_at": "2025-03-01T10:00:00Z", "updated_at": "2025-03-01T10:05:00Z"},
                "csrf_token": "tok-1"}"#,
        )
        .expect(1)
        .create_async()
        .await;
    let complete = server
        .mock("POST", "/tasks/buy-1/complete")
        .with_status(200)
        .with_body(
            r#"{"task": {"id": "buy-1", "title": "Buy milk", "status": "completed",
                "created_at": "2025-03-01T10:00:00Z", "updated_at": "2025-03-01T10:10:00Z",
                "completed_at": "2025-03-01T10:10:00Z"}, "csrf_token": "tok-2"}"#,
        )
        .expect(1)
        .create_async()
        .await;
    let delete = server
        .mock("POST", "/tasks/buy-1/delete")
        .with_status(500)
        .with_body("backend exploded")
        .expect(1)
        .create_async()
        .await;

    let store = Store::shared();
    let session = store.lock().unwrap().session.clone();
    let gateway =
        BackendGateway::new(Url::parse(&server.url()).unwrap(), None, session.clone()).unwrap();
    let engine = SyncEngine::new(Some(gateway), Arc::clone(&store), Arc::new(NullRenderer));

    engine.initialize().await;
    {
        let store = store.lock().unwrap();
        assert_eq!(store.connection, ConnectionStatus::Connected);
        assert_eq!(store.tasks.len(), 1);
        assert_eq!(store.tasks[0].status, TaskStatus::Uncategorized);
        assert_eq!(store.weekly_stats.as_ref().unwrap().total_created, 1);
    }

    // drag/drop lands the task in the first quadrant
    engine
        .update_task_status("buy-1", TaskStatus::UrgentImportant)
        .await;
    {
        let store = store.lock().unwrap();
        assert_eq!(store.tasks[0].status, TaskStatus::UrgentImportant);
    }
    assert_eq!(session.current().as_deref(), Some("tok-1"));

    engine.complete_task("buy-1").await;
    {
        let store = store.lock().unwrap();
        assert_eq!(store.tasks[0].status, TaskStatus::Completed);
        assert!(store.tasks[0].completed_at.is_some());
    }
    assert_eq!(session.current().as_deref(), Some("tok-2"));

    // completed is terminal: the second attempt never reaches the wire
    engine.complete_task("buy-1").await;

    // delete fails server-side; the optimistic removal must be rolled back
    engine.delete_task("buy-1").await;
    {
        let store = store.lock().unwrap();
        assert_eq!(store.tasks.len(), 1);
        assert_eq!(store.tasks[0].id, "buy-1");
        assert_eq!(store.tasks[0].status, TaskStatus::Completed);
    }

    list.assert_async().await;
    stats.assert_async().await;
    update.assert_async().await;
    complete.assert_async().await;
    delete.assert_async().await;
}
