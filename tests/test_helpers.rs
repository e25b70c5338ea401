// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时数据库、临时上传文件、可注入故障的实体存储
// ==========================================

#![allow(dead_code)]

use async_trait::async_trait;
use crm_import::db::{ensure_schema, open_sqlite_connection};
use crm_import::repository::{CreatedRecord, EntityStore, RepositoryError, RepositoryResult};
use crm_import::EntityPayload;
use std::error::Error;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时路径不是 UTF-8")?
        .to_string();

    let conn = open_sqlite_connection(&db_path)?;
    ensure_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 插入 global scope 配置
pub fn insert_test_config(db_path: &str, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
    let conn = open_sqlite_connection(db_path)?;
    conn.execute(
        "INSERT OR REPLACE INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)",
        [key, value],
    )?;
    Ok(())
}

/// 写入带指定后缀的临时文件
pub fn write_temp_file(suffix: &str, content: &str) -> Result<NamedTempFile, Box<dyn Error>> {
    let mut temp_file = tempfile::Builder::new().suffix(suffix).tempfile()?;
    temp_file.write_all(content.as_bytes())?;
    temp_file.flush()?;
    Ok(temp_file)
}

// ==========================================
// ScriptedStore - 按调用序号注入结果的假存储
// ==========================================
#[derive(Debug, Clone)]
pub enum StoreOutcome {
    Created,
    NoIdentifier,
    Fail(String),
}

#[derive(Default)]
pub struct ScriptedStore {
    /// 第 N 次调用（0 基）的结果；未指定的调用视为成功
    script: Vec<StoreOutcome>,
    received: Mutex<Vec<EntityPayload>>,
}

impl ScriptedStore {
    pub fn new(script: Vec<StoreOutcome>) -> Self {
        Self {
            script,
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn received(&self) -> Vec<EntityPayload> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl EntityStore for ScriptedStore {
    async fn create(&self, payload: &EntityPayload) -> RepositoryResult<CreatedRecord> {
        let call = {
            let mut received = self.received.lock().unwrap();
            received.push(payload.clone());
            received.len() - 1
        };

        match self.script.get(call).cloned().unwrap_or(StoreOutcome::Created) {
            StoreOutcome::Created => Ok(CreatedRecord::with_id(format!("rec-{}", call + 1))),
            StoreOutcome::NoIdentifier => Ok(CreatedRecord::default()),
            StoreOutcome::Fail(message) => Err(RepositoryError::Rejected { message }),
        }
    }
}
