use crate::domain::repository::TodoStore;
use crate::domain::todo::{CreateTodo, NewTodo, Todo, TodoId};
use async_trait::async_trait;

/// Failure of a service operation. `Display` is the message sent to clients;
/// the wrapped store error is only ever logged.
#[derive(Debug, thiserror::Error)]
pub enum TodoError {
    #[error("Todo body is required")]
    BodyRequired,
    #[error("Error getting todos")]
    List(anyhow::Error),
    #[error("Error creating todo")]
    Create(anyhow::Error),
    #[error("Error updating todo")]
    Update(anyhow::Error),
    #[error("Error Fetching updated todo")]
    FetchUpdated(anyhow::Error),
    /// Update matched nothing and the re-fetch came back empty.
    #[error("Error Fetching updated todo")]
    Missing(TodoId),
    #[error("Error deleting todo")]
    Delete(anyhow::Error),
}

impl TodoError {
    pub fn is_client_error(&self) -> bool { matches!(self, TodoError::BodyRequired) }

    pub fn cause(&self) -> Option<&anyhow::Error> {
        match self {
            TodoError::List(e) | TodoError::Create(e) | TodoError::Update(e) | TodoError::FetchUpdated(e) | TodoError::Delete(e) => Some(e),
            TodoError::BodyRequired | TodoError::Missing(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, TodoError>;

#[async_trait]
pub trait TodoService: Send + Sync + 'static {
    async fn list(&self) -> Result<Vec<Todo>>;
    async fn create(&self, input: CreateTodo) -> Result<Todo>;
    async fn complete(&self, id: TodoId) -> Result<Todo>;
    /// Removes the todo and returns what is left in the collection.
    async fn delete(&self, id: TodoId) -> Result<Vec<Todo>>;
}

#[derive(Clone)]
pub struct TodoServiceImpl<R: TodoStore> {
    store: R,
}

impl<R: TodoStore> TodoServiceImpl<R> {
    pub fn new(store: R) -> Self { Self { store } }
}

#[async_trait]
impl<R: TodoStore> TodoService for TodoServiceImpl<R> {
    async fn list(&self) -> Result<Vec<Todo>> {
        self.store.find_all().await.map_err(TodoError::List)
    }

    async fn create(&self, input: CreateTodo) -> Result<Todo> {
        let body = input.body.unwrap_or_default();
        if body.is_empty() { return Err(TodoError::BodyRequired); }

        let new = NewTodo { body, completed: false };
        let id = self.store.insert_one(new.clone()).await.map_err(TodoError::Create)?;
        tracing::debug!(%id, created_at = %id.timestamp(), "todo created");
        Ok(Todo { id, completed: new.completed, body: new.body })
    }

    async fn complete(&self, id: TodoId) -> Result<Todo> {
        let matched = self.store.update_completed(&id).await.map_err(TodoError::Update)?;
        tracing::debug!(%id, matched, "todo complete");

        match self.store.find_one(&id).await.map_err(TodoError::FetchUpdated)? {
            Some(todo) => Ok(todo),
            None => Err(TodoError::Missing(id)),
        }
    }

    async fn delete(&self, id: TodoId) -> Result<Vec<Todo>> {
        let deleted = self.store.delete_one(&id).await.map_err(TodoError::Delete)?;
        tracing::debug!(%id, deleted, "todo delete");
        self.store.find_all().await.map_err(TodoError::List)
    }
}
