// ==========================================
// 批量导入管道 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// 原则: 缺失或无法解析的值回落默认值并告警，不中断导入
// ==========================================

use crate::config::import_config_trait::ImportConfigReader;
use crate::config::import_settings::{DEFAULT_MAX_FILE_BYTES, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::db::{configure_sqlite_connection, ensure_schema, open_sqlite_connection};
use crate::importer::field_mapper::MappingOptions;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::collections::BTreeMap;
use std::error::Error;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tracing::warn;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;
        ensure_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA 与建表（均幂等）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            configure_sqlite_connection(&conn_guard)?;
            ensure_schema(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 获取 global 配置快照
    pub fn get_config_snapshot(&self) -> Result<BTreeMap<String, String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt = conn.prepare(
            "SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut snapshot = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            snapshot.insert(key, value);
        }
        Ok(snapshot)
    }

    /// 读取并解析配置值，缺失或格式错误时使用默认值
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> Result<T, Box<dyn Error>>
    where
        T: FromStr,
    {
        let raw = match self.get_config_value(key)? {
            Some(v) => v,
            None => return Ok(default),
        };

        match raw.trim().parse::<T>() {
            Ok(v) => Ok(v),
            Err(_) => {
                warn!(config_key = key, raw_value = %raw, "配置格式错误，使用默认值");
                Ok(default)
            }
        }
    }

    fn get_bool_or_default(&self, key: &str, default: bool) -> Result<bool, Box<dyn Error>> {
        let raw = match self.get_config_value(key)? {
            Some(v) => v,
            None => return Ok(default),
        };

        match raw.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => {
                warn!(config_key = key, raw_value = %raw, "布尔配置格式错误，使用默认值");
                Ok(default)
            }
        }
    }

    fn get_optional_text(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        Ok(self
            .get_config_value(key)?
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty()))
    }
}

// ==========================================
// ImportConfigReader Trait 实现
// ==========================================
#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_mapping_options(&self) -> Result<MappingOptions, Box<dyn Error>> {
        let defaults = MappingOptions::default();
        Ok(MappingOptions {
            substring_match: self
                .get_bool_or_default(config_keys::MAPPING_SUBSTRING_MATCH, defaults.substring_match)?,
            allow_shared_columns: self.get_bool_or_default(
                config_keys::MAPPING_ALLOW_SHARED_COLUMNS,
                defaults.allow_shared_columns,
            )?,
        })
    }

    async fn get_max_file_bytes(&self) -> Result<u64, Box<dyn Error>> {
        self.get_parsed_or_default(config_keys::MAX_FILE_BYTES, DEFAULT_MAX_FILE_BYTES)
    }

    async fn get_content_api_base_url(&self) -> Result<Option<String>, Box<dyn Error>> {
        self.get_optional_text(config_keys::CONTENT_API_BASE_URL)
    }

    async fn get_content_api_token(&self) -> Result<Option<String>, Box<dyn Error>> {
        self.get_optional_text(config_keys::CONTENT_API_TOKEN)
    }

    async fn get_request_timeout_secs(&self) -> Result<u64, Box<dyn Error>> {
        self.get_parsed_or_default(config_keys::REQUEST_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 列映射
    pub const MAPPING_SUBSTRING_MATCH: &str = "import_mapping_substring_match";
    pub const MAPPING_ALLOW_SHARED_COLUMNS: &str = "import_mapping_allow_shared_columns";

    // 文件
    pub const MAX_FILE_BYTES: &str = "import_max_file_bytes";

    // 内容 API
    pub const CONTENT_API_BASE_URL: &str = "content_api_base_url";
    pub const CONTENT_API_TOKEN: &str = "content_api_token";
    pub const REQUEST_TIMEOUT_SECS: &str = "content_api_timeout_secs";
}
