// ==========================================
// 批量导入管道 - 实体创建协作者 Trait
// ==========================================
// 职责: 定义"创建一个实体"接口（不包含实现）
// 约束: 由调用方注入导入协调器，不使用进程级单例
// ==========================================

use crate::domain::entity::EntityPayload;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// 创建结果句柄
///
/// 只有非空 `id` 视为创建成功
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedRecord {
    pub id: Option<String>,
}

impl CreatedRecord {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
        }
    }

    /// 可识别的记录标识（去空白后非空）
    pub fn identifier(&self) -> Option<&str> {
        self.id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

// ==========================================
// EntityStore Trait
// ==========================================
// 用途: 导入协调器逐行调用的创建协作者
// 实现者: SqliteEntityStore（本地落库）, HttpEntityStore（内容 API）
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// 创建单个实体
    ///
    /// # 参数
    /// - payload: 已通过必填校验的实体载荷
    ///
    /// # 返回
    /// - Ok(CreatedRecord): 协作者的响应（是否含标识由调用方判定）
    /// - Err: 协作者失败（消息进入逐行报告）
    async fn create(&self, payload: &EntityPayload) -> RepositoryResult<CreatedRecord>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_requires_non_blank_id() {
        assert_eq!(CreatedRecord::with_id("42").identifier(), Some("42"));
        assert_eq!(CreatedRecord::with_id("   ").identifier(), None);
        assert_eq!(CreatedRecord::default().identifier(), None);
    }
}
