use async_trait::async_trait;
use super::todo::{NewTodo, Todo, TodoId};

/// Document-store operations the service relies on.
///
/// Update and delete report how many documents matched; zero is not an error.
#[async_trait]
pub trait TodoStore: Send + Sync + 'static {
    async fn init(&self) -> anyhow::Result<()>;
    async fn ping(&self) -> anyhow::Result<()>;
    async fn find_all(&self) -> anyhow::Result<Vec<Todo>>;
    async fn insert_one(&self, todo: NewTodo) -> anyhow::Result<TodoId>;
    async fn update_completed(&self, id: &TodoId) -> anyhow::Result<u64>;
    async fn find_one(&self, id: &TodoId) -> anyhow::Result<Option<Todo>>;
    async fn delete_one(&self, id: &TodoId) -> anyhow::Result<u64>;
    async fn close(&self);
}
