use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{sqlite::{SqlitePoolOptions, SqliteRow}, Pool, Row, Sqlite};

use crate::domain::{
    repository::TodoStore,
    todo::{NewTodo, Todo, TodoId},
};

/// Todo collection kept in a single SQLite table, one row per document.
#[derive(Clone)]
pub struct SqliteTodoStore {
    pool: Arc<Pool<Sqlite>>,
}

impl SqliteTodoStore {
    pub async fn connect(database_url: &str) -> Result<Self> {
        prepare_sqlite_file(database_url)?;

        let options = if is_in_memory(database_url) {
            // every connection would otherwise see its own empty database
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };
        let pool = options
            .connect(database_url)
            .await
            .with_context(|| format!("connecting to {database_url}"))?;
        Ok(Self { pool: Arc::new(pool) })
    }
}

#[async_trait]
impl TodoStore for SqliteTodoStore {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS todos (
                id TEXT PRIMARY KEY NOT NULL,
                completed INTEGER NOT NULL DEFAULT 0,
                body TEXT NOT NULL
            )",
        )
        .execute(&*self.pool)
        .await?;
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&*self.pool).await?;
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Todo>> {
        let rows = sqlx::query("SELECT id, completed, body FROM todos ORDER BY rowid")
            .fetch_all(&*self.pool)
            .await?;
        rows.into_iter().map(row_to_todo).collect()
    }

    async fn insert_one(&self, todo: NewTodo) -> Result<TodoId> {
        let id = TodoId::generate();
        sqlx::query("INSERT INTO todos (id, completed, body) VALUES (?1, ?2, ?3)")
            .bind(id.to_hex())
            .bind(todo.completed)
            .bind(&todo.body)
            .execute(&*self.pool)
            .await?;
        Ok(id)
    }

    async fn update_completed(&self, id: &TodoId) -> Result<u64> {
        let result = sqlx::query("UPDATE todos SET completed = 1 WHERE id = ?1")
            .bind(id.to_hex())
            .execute(&*self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn find_one(&self, id: &TodoId) -> Result<Option<Todo>> {
        let row = sqlx::query("SELECT id, completed, body FROM todos WHERE id = ?1")
            .bind(id.to_hex())
            .fetch_optional(&*self.pool)
            .await?;
        row.map(row_to_todo).transpose()
    }

    async fn delete_one(&self, id: &TodoId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?1")
            .bind(id.to_hex())
            .execute(&*self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

fn row_to_todo(row: SqliteRow) -> Result<Todo> {
    let id_str: String = row.try_get("id")?;
    let completed: bool = row.try_get("completed")?;
    let body: String = row.try_get("body")?;

    let id = id_str.parse::<TodoId>().with_context(|| format!("stored todo has malformed id {id_str:?}"))?;
    Ok(Todo { id, completed, body })
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.starts_with("sqlite::memory:") || database_url.contains("mode=memory")
}

/// Creates the database file and its parent directory for `sqlite://` URLs.
fn prepare_sqlite_file(database_url: &str) -> Result<()> {
    if is_in_memory(database_url) { return Ok(()); }
    let Some(path) = database_url.strip_prefix("sqlite://") else { return Ok(()) };
    let path = path.split('?').next().unwrap_or(path);
    // On Windows, absolute paths may look like /C:/path; strip the leading slash
    let path = if cfg!(windows) && path.len() >= 3 && path.as_bytes()[0] == b'/' && path.as_bytes()[2] == b':' {
        &path[1..]
    } else {
        path
    };
    use std::{fs, fs::OpenOptions, path::Path};
    let p = Path::new(path);
    if let Some(parent) = p.parent() { if !parent.as_os_str().is_empty() { fs::create_dir_all(parent)?; } }
    if !p.exists() {
        OpenOptions::new().create(true).append(true).open(p)
            .with_context(|| format!("creating database file {}", p.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> SqliteTodoStore {
        let store = SqliteTodoStore::connect("sqlite::memory:").await.unwrap();
        store.init().await.unwrap();
        store
    }

    #[tokio::test]
    async fn insert_then_find_preserves_fields_and_order() {
        let store = store().await;
        store.ping().await.unwrap();
        let a = store.insert_one(NewTodo { body: "a".into(), completed: false }).await.unwrap();
        let b = store.insert_one(NewTodo { body: "b".into(), completed: false }).await.unwrap();
        assert_ne!(a, b);

        let all = store.find_all().await.unwrap();
        assert_eq!(all.iter().map(|t| t.id).collect::<Vec<_>>(), vec![a, b]);
        assert_eq!(store.find_one(&a).await.unwrap().unwrap().body, "a");
    }

    #[tokio::test]
    async fn update_and_delete_report_matched_counts() {
        let store = store().await;
        let id = store.insert_one(NewTodo { body: "x".into(), completed: false }).await.unwrap();
        let unknown = TodoId::generate();

        assert_eq!(store.update_completed(&id).await.unwrap(), 1);
        assert_eq!(store.update_completed(&unknown).await.unwrap(), 0);
        assert!(store.find_one(&id).await.unwrap().unwrap().completed);

        assert_eq!(store.delete_one(&unknown).await.unwrap(), 0);
        assert_eq!(store.delete_one(&id).await.unwrap(), 1);
        assert!(store.find_one(&id).await.unwrap().is_none());
        assert!(store.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_stored_id_is_a_store_error() {
        let store = store().await;
        sqlx::query("INSERT INTO todos (id, completed, body) VALUES ('not-an-id', 0, 'x')")
            .execute(&*store.pool)
            .await
            .unwrap();
        assert!(store.find_all().await.is_err());
    }

    #[tokio::test]
    async fn file_backed_database_is_created() {
        let dir = std::env::temp_dir().join(format!("todo-api-{}", TodoId::generate()));
        let file = dir.join("nested").join("todos.db");
        let url = format!("sqlite://{}", file.display());

        let store = SqliteTodoStore::connect(&url).await.unwrap();
        store.init().await.unwrap();
        assert!(file.exists());
        store.close().await;
        let _ = std::fs::remove_dir_all(dir);
    }
}
