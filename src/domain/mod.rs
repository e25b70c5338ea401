// ==========================================
// 批量导入管道 - 领域模型层
// ==========================================
// 职责: 记录、实体载荷、导入报告
// 红线: 不含数据访问逻辑，不含解码逻辑
// ==========================================

pub mod entity;
pub mod record;
pub mod report;

// 重导出核心类型
pub use entity::{ContactPayload, EntityKind, EntityPayload, LeadCompanyPayload};
pub use record::{DecodedTable, Record};
pub use report::ImportReport;
