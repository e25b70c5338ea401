// ==========================================
// 批量导入管道 - 核心库
// ==========================================
// 技术栈: Rust + SQLite (+ 可选内容 API)
// 定位: CSV / Excel → 联系人 / 线索公司
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 记录 / 实体载荷 / 报告
pub mod domain;

// 导入层 - 解码 / 映射 / 转换 / 协调
pub mod importer;

// 数据仓储层 - 实体创建协作者
pub mod repository;

// 配置层 - 导入设置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 调用方入口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

pub use api::{ApiError, ApiResponse, ImportApi, ImportApiResponse, ImportPreview, UploadedFile};
pub use config::{ConfigManager, ImportConfigReader, ImportSettings};
pub use domain::{DecodedTable, EntityKind, EntityPayload, ImportReport, Record};
pub use importer::{ImportCoordinator, ImportError, MappingOptions, UniversalFileParser};
pub use repository::{EntityStore, HttpEntityStore, SqliteEntityStore};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "crm-bulk-import";
