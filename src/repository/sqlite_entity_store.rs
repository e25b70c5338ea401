// ==========================================
// 批量导入管道 - SQLite 实体存储实现
// ==========================================
// 职责: 将实体载荷以 JSON 形式写入 imported_entity 表
// 红线: 只做数据写入，不含任何转换规则
// ==========================================

use crate::db::{ensure_schema, open_sqlite_connection};
use crate::domain::entity::{EntityKind, EntityPayload};
use crate::repository::entity_store::{CreatedRecord, EntityStore};
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;
use uuid::Uuid;

// ==========================================
// SqliteEntityStore
// ==========================================
pub struct SqliteEntityStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteEntityStore {
    /// 打开数据库并确保表结构存在
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        ensure_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建（与 ConfigManager 共用连接）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            ensure_schema(&guard)?;
        }
        Ok(Self { conn })
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 按实体类型计数
    pub fn count(&self, kind: EntityKind) -> RepositoryResult<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM imported_entity WHERE entity_type = ?1",
            params![kind.collection()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// 按写入顺序读取某类实体的载荷 JSON
    pub fn list_payloads(&self, kind: EntityKind) -> RepositoryResult<Vec<serde_json::Value>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT payload_json FROM imported_entity WHERE entity_type = ?1 ORDER BY rowid",
        )?;
        let rows = stmt.query_map(params![kind.collection()], |row| row.get::<_, String>(0))?;

        let mut payloads = Vec::new();
        for row in rows {
            payloads.push(serde_json::from_str(&row?)?);
        }
        Ok(payloads)
    }
}

#[async_trait]
impl EntityStore for SqliteEntityStore {
    async fn create(&self, payload: &EntityPayload) -> RepositoryResult<CreatedRecord> {
        let id = Uuid::new_v4().to_string();
        let payload_json = serde_json::to_string(&payload.to_data_json()?)?;
        let kind = payload.kind();

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO imported_entity (id, entity_type, payload_json, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![id, kind.collection(), payload_json, Utc::now().to_rfc3339()],
        )?;

        debug!(id = %id, entity = %kind, "实体已写入");
        Ok(CreatedRecord::with_id(id))
    }
}
