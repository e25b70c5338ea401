// ==========================================
// 批量导入管道 - 仓储层错误类型
// ==========================================
// 范围: 实体创建协作者（SQLite / 内容 API）的失败
// 消息会原样进入逐行报告，因此面向用户书写
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 协作者拒绝 =====
    #[error("{message}")]
    Rejected { message: String },

    #[error("Failed to create {entity}")]
    MissingIdentifier { entity: String },

    // ===== 传输错误 =====
    #[error("Request to content API failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid payload: {0}")]
    Serialization(#[from] serde_json::Error),

    // ===== 数据库错误 =====
    #[error("Database error: {0}")]
    Database(String),

    #[error("Database lock poisoned: {0}")]
    LockError(String),
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => RepositoryError::Database(msg),
            _ => RepositoryError::Database(err.to_string()),
        }
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;
