// ==========================================
// 批量导入管道 - API层错误类型
// ==========================================
// 职责: 将导入/仓储/配置错误归并为调用方可见的错误
// 契约: 输入类问题 → 400，其余 → 500；响应体 {"error": message}
// ==========================================

use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use serde_json::{json, Value};
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ===== 整个文件不可处理 =====
    #[error(transparent)]
    Import(#[from] ImportError),

    // ===== 内部故障 =====
    #[error("Failed to load import settings: {0}")]
    Configuration(String),

    #[error("Entity store unavailable: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 对应的 HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Import(err) if err.is_input_error() => 400,
            _ => 500,
        }
    }

    /// 错误响应体
    pub fn error_body(&self) -> Value {
        json!({ "error": self.to_string() })
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
