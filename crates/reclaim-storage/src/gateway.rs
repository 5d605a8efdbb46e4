// SPDX-FileCopyrightText: 2026 Reclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the DataGateway trait.
//!
//! All statements run on tokio-rusqlite's single background thread; batches
//! submitted through [`DataGateway::apply`] execute inside one transaction
//! so a guarded update losing its race aborts every write in the batch.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use reclaim_config::model::StorageConfig;
use reclaim_core::{
    Adapter, AdapterType, Collection, DataGateway, Filter, HealthStatus, Query,
    RealtimePublisher, ReclaimError, Row, RowEvent, WriteOp,
};

use crate::database::{map_tr_err, Database};
use crate::sql;

/// Internal marker carried through tokio-rusqlite when a guarded update
/// matches zero rows.
#[derive(Debug, Error)]
#[error("stale write: {message}")]
struct StaleWrite {
    message: String,
}

/// A statement compiled ahead of a transactional batch.
enum CompiledOp {
    Exec {
        sql: String,
        values: Vec<rusqlite::types::Value>,
    },
    Guarded {
        sql: String,
        values: Vec<rusqlite::types::Value>,
        guard: String,
    },
}

/// SQLite-backed data gateway.
///
/// When a realtime publisher is attached, every successfully inserted row is
/// fanned out through it after the write commits.
pub struct SqliteGateway {
    db: Database,
    publisher: Option<Arc<dyn RealtimePublisher>>,
}

impl SqliteGateway {
    /// Open the database at the configured path and run migrations.
    pub async fn connect(config: &StorageConfig) -> Result<Self, ReclaimError> {
        let db = Database::open(&config.database_path, config.wal_mode).await?;
        Ok(Self {
            db,
            publisher: None,
        })
    }

    /// Attach a realtime publisher receiving every committed insert.
    pub fn with_publisher(mut self, publisher: Arc<dyn RealtimePublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    fn publish_inserts(&self, inserts: &[(Collection, Row)]) {
        if let Some(publisher) = &self.publisher {
            for (collection, row) in inserts {
                publisher.publish(RowEvent {
                    collection: *collection,
                    row: row.clone(),
                });
            }
        }
    }
}

#[async_trait]
impl Adapter for SqliteGateway {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Gateway
    }

    async fn health_check(&self) -> Result<HealthStatus, ReclaimError> {
        self.db
            .connection()
            .call(|conn| {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ReclaimError> {
        self.db.close().await?;
        debug!("sqlite gateway shut down");
        Ok(())
    }
}

#[async_trait]
impl DataGateway for SqliteGateway {
    async fn select(&self, query: Query) -> Result<Vec<Row>, ReclaimError> {
        let (sql, values) = sql::select_sql(&query)?;
        self.db
            .connection()
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql)?;
                let columns: Vec<String> =
                    stmt.column_names().iter().map(|c| c.to_string()).collect();
                let mut rows = Vec::new();
                let mapped = stmt.query_map(rusqlite::params_from_iter(values), |row| {
                    sql::row_to_json(row, &columns)
                })?;
                for row in mapped {
                    rows.push(row?);
                }
                Ok(rows)
            })
            .await
            .map_err(map_tr_err)
    }

    async fn insert(
        &self,
        collection: Collection,
        rows: Vec<Row>,
    ) -> Result<Vec<Row>, ReclaimError> {
        let table = collection.to_string();
        let mut statements = Vec::with_capacity(rows.len());
        for row in &rows {
            statements.push(sql::insert_sql(&table, row)?);
        }

        self.db
            .connection()
            .call(move |conn| {
                let tx = conn.transaction()?;
                for (sql, values) in statements {
                    tx.execute(&sql, rusqlite::params_from_iter(values))?;
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;

        let inserts: Vec<(Collection, Row)> =
            rows.iter().map(|row| (collection, row.clone())).collect();
        self.publish_inserts(&inserts);
        Ok(rows)
    }

    async fn update(
        &self,
        collection: Collection,
        patch: Row,
        filters: Vec<Filter>,
    ) -> Result<u64, ReclaimError> {
        let (sql, values) = sql::update_sql(&collection.to_string(), &patch, &filters)?;
        self.db
            .connection()
            .call(move |conn| {
                let changed = conn.execute(&sql, rusqlite::params_from_iter(values))?;
                Ok(changed as u64)
            })
            .await
            .map_err(map_tr_err)
    }

    async fn delete(
        &self,
        collection: Collection,
        filters: Vec<Filter>,
    ) -> Result<(), ReclaimError> {
        let (where_clause, values) = sql::build_where(&filters)?;
        let sql = format!("DELETE FROM {collection}{where_clause}");
        self.db
            .connection()
            .call(move |conn| {
                conn.execute(&sql, rusqlite::params_from_iter(values))?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    async fn apply(&self, ops: Vec<WriteOp>) -> Result<(), ReclaimError> {
        let mut compiled = Vec::with_capacity(ops.len());
        let mut inserts = Vec::new();
        for op in &ops {
            match op {
                WriteOp::Insert { collection, row } => {
                    let (sql, values) = sql::insert_sql(&collection.to_string(), row)?;
                    inserts.push((*collection, row.clone()));
                    compiled.push(CompiledOp::Exec { sql, values });
                }
                WriteOp::Update {
                    collection,
                    patch,
                    filters,
                    guard,
                } => {
                    let (sql, values) =
                        sql::update_sql(&collection.to_string(), patch, filters)?;
                    match guard {
                        Some(message) => compiled.push(CompiledOp::Guarded {
                            sql,
                            values,
                            guard: message.clone(),
                        }),
                        None => compiled.push(CompiledOp::Exec { sql, values }),
                    }
                }
                WriteOp::Delete {
                    collection,
                    filters,
                } => {
                    let (where_clause, values) = sql::build_where(filters)?;
                    let sql = format!("DELETE FROM {collection}{where_clause}");
                    compiled.push(CompiledOp::Exec { sql, values });
                }
            }
        }

        self.db
            .connection()
            .call(move |conn| {
                let tx = conn.transaction()?;
                for op in compiled {
                    match op {
                        CompiledOp::Exec { sql, values } => {
                            tx.execute(&sql, rusqlite::params_from_iter(values))?;
                        }
                        CompiledOp::Guarded { sql, values, guard } => {
                            let changed =
                                tx.execute(&sql, rusqlite::params_from_iter(values))?;
                            if changed == 0 {
                                // Dropping the transaction rolls back the batch.
                                return Err(tokio_rusqlite::Error::Other(Box::new(
                                    StaleWrite { message: guard },
                                )));
                            }
                        }
                    }
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(|err| match err {
                tokio_rusqlite::Error::Other(inner) => match inner.downcast::<StaleWrite>() {
                    Ok(stale) => ReclaimError::Conflict(stale.message),
                    Err(other) => ReclaimError::Remote {
                        message: "database operation failed".to_string(),
                        source: Some(other),
                    },
                },
                other => map_tr_err(other),
            })?;

        self.publish_inserts(&inserts);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reclaim_core::types::to_row;
    use std::sync::Mutex;
    use tempfile::tempdir;

    struct CapturePublisher {
        events: Mutex<Vec<RowEvent>>,
    }

    impl RealtimePublisher for CapturePublisher {
        fn publish(&self, event: RowEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    fn make_config(path: &std::path::Path) -> StorageConfig {
        StorageConfig {
            database_path: path.display().to_string(),
            wal_mode: true,
        }
    }

    fn item_row(id: &str, status: &str, category: &str) -> Row {
        to_row(&serde_json::json!({
            "id": id,
            "title": "Blue Backpack",
            "description": "Left in the library",
            "category": category,
            "type": "lost",
            "status": status,
            "location": "Main Library",
            "date": "2026-03-14",
            "image_url": null,
            "user_id": "user-a",
            "created_at": "2026-03-14T09:00:00Z",
            "updated_at": "2026-03-14T09:00:00Z",
        }))
        .unwrap()
    }

    async fn open_gateway(dir: &tempfile::TempDir) -> SqliteGateway {
        SqliteGateway::connect(&make_config(&dir.path().join("test.db")))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn insert_and_select_round_trip() {
        let dir = tempdir().unwrap();
        let gw = open_gateway(&dir).await;

        gw.insert(Collection::Items, vec![item_row("i-1", "open", "electronics")])
            .await
            .unwrap();

        let rows = gw
            .select(Query::new(Collection::Items).filter(Filter::eq("id", "i-1")))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("title").unwrap(), "Blue Backpack");
        assert_eq!(rows[0].get("type").unwrap(), "lost");
        assert_eq!(rows[0].get("image_url").unwrap(), &serde_json::Value::Null);
    }

    #[tokio::test]
    async fn select_honors_filters_order_and_limit() {
        let dir = tempdir().unwrap();
        let gw = open_gateway(&dir).await;

        gw.insert(
            Collection::Items,
            vec![
                item_row("i-1", "open", "electronics"),
                item_row("i-2", "resolved", "electronics"),
                item_row("i-3", "open", "documents"),
            ],
        )
        .await
        .unwrap();

        let open = gw
            .select(
                Query::new(Collection::Items)
                    .filter(Filter::eq("status", "open"))
                    .order_desc("id"),
            )
            .await
            .unwrap();
        assert_eq!(open.len(), 2);
        assert_eq!(open[0].get("id").unwrap(), "i-3");

        let limited = gw
            .select(Query::new(Collection::Items).order_asc("id").limit(2))
            .await
            .unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[1].get("id").unwrap(), "i-2");
    }

    #[tokio::test]
    async fn update_reports_matched_row_count() {
        let dir = tempdir().unwrap();
        let gw = open_gateway(&dir).await;

        gw.insert(Collection::Items, vec![item_row("i-1", "open", "electronics")])
            .await
            .unwrap();

        let patch = to_row(&serde_json::json!({"status": "in_progress"})).unwrap();
        let matched = gw
            .update(
                Collection::Items,
                patch.clone(),
                vec![Filter::eq("id", "i-1")],
            )
            .await
            .unwrap();
        assert_eq!(matched, 1);

        let matched = gw
            .update(Collection::Items, patch, vec![Filter::eq("id", "missing")])
            .await
            .unwrap();
        assert_eq!(matched, 0);
    }

    #[tokio::test]
    async fn delete_removes_matching_rows() {
        let dir = tempdir().unwrap();
        let gw = open_gateway(&dir).await;

        gw.insert(Collection::Items, vec![item_row("i-1", "open", "electronics")])
            .await
            .unwrap();
        gw.delete(Collection::Items, vec![Filter::eq("id", "i-1")])
            .await
            .unwrap();

        let rows = gw.select(Query::new(Collection::Items)).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn guarded_batch_aborts_atomically_on_zero_match() {
        let dir = tempdir().unwrap();
        let gw = open_gateway(&dir).await;

        gw.insert(Collection::Items, vec![item_row("i-1", "resolved", "electronics")])
            .await
            .unwrap();

        // First op would succeed, second guard fails: neither may apply.
        let result = gw
            .apply(vec![
                WriteOp::Update {
                    collection: Collection::Items,
                    patch: to_row(&serde_json::json!({"category": "other"})).unwrap(),
                    filters: vec![Filter::eq("id", "i-1")],
                    guard: None,
                },
                WriteOp::Update {
                    collection: Collection::Items,
                    patch: to_row(&serde_json::json!({"status": "resolved"})).unwrap(),
                    filters: vec![
                        Filter::eq("id", "i-1"),
                        Filter::ne("status", "resolved"),
                    ],
                    guard: Some("item already resolved".to_string()),
                },
            ])
            .await;

        match result {
            Err(ReclaimError::Conflict(message)) => {
                assert_eq!(message, "item already resolved")
            }
            other => panic!("expected conflict, got {other:?}"),
        }

        let rows = gw
            .select(Query::new(Collection::Items).filter(Filter::eq("id", "i-1")))
            .await
            .unwrap();
        assert_eq!(rows[0].get("category").unwrap(), "electronics");
    }

    #[tokio::test]
    async fn successful_guarded_batch_commits_both_writes() {
        let dir = tempdir().unwrap();
        let gw = open_gateway(&dir).await;

        gw.insert(Collection::Items, vec![item_row("i-1", "open", "electronics")])
            .await
            .unwrap();

        gw.apply(vec![WriteOp::Update {
            collection: Collection::Items,
            patch: to_row(&serde_json::json!({"status": "resolved"})).unwrap(),
            filters: vec![Filter::eq("id", "i-1"), Filter::ne("status", "resolved")],
            guard: Some("item already resolved".to_string()),
        }])
        .await
        .unwrap();

        let rows = gw.select(Query::new(Collection::Items)).await.unwrap();
        assert_eq!(rows[0].get("status").unwrap(), "resolved");
    }

    #[tokio::test]
    async fn inserts_are_published_to_the_realtime_feed() {
        let dir = tempdir().unwrap();
        let publisher = Arc::new(CapturePublisher {
            events: Mutex::new(Vec::new()),
        });
        let gw = open_gateway(&dir).await.with_publisher(publisher.clone());

        gw.insert(Collection::Items, vec![item_row("i-1", "open", "electronics")])
            .await
            .unwrap();

        let events = publisher.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].collection, Collection::Items);
        assert_eq!(events[0].row.get("id").unwrap(), "i-1");
    }

    #[tokio::test]
    async fn health_check_reports_healthy() {
        let dir = tempdir().unwrap();
        let gw = open_gateway(&dir).await;
        assert_eq!(gw.health_check().await.unwrap(), HealthStatus::Healthy);
        gw.shutdown().await.unwrap();
    }
}
