// ==========================================
// 批量导入管道 - 仓储层
// ==========================================
// 职责: 实体创建协作者（本地 SQLite / 远端内容 API）
// 红线: Repository 不含转换规则，只负责写入
// ==========================================

pub mod entity_store;
pub mod error;
pub mod http_entity_store;
pub mod sqlite_entity_store;

// 重导出核心类型
pub use entity_store::{CreatedRecord, EntityStore};
pub use error::{RepositoryError, RepositoryResult};
pub use http_entity_store::HttpEntityStore;
pub use sqlite_entity_store::SqliteEntityStore;
