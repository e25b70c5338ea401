// ==========================================
// 批量导入管道 - API 层
// ==========================================
// 职责: 面向调用方的导入入口（上传 → 报告 / HTTP 状态映射）
// ==========================================

pub mod error;
pub mod import_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use import_api::{ApiResponse, ImportApi, ImportApiResponse, ImportPreview, UploadedFile};
