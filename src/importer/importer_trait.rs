// ==========================================
// 批量导入管道 - 导入组件 Trait
// ==========================================
// 职责: 定义解码器 / 行转换器接口（不包含实现）
// ==========================================

use crate::domain::entity::{EntityKind, EntityPayload};
use crate::domain::record::{DecodedTable, Record};
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::{AliasTable, ColumnMapping};
use std::fmt;

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 表格解码（阶段 0）
// 实现者: CsvParser, ExcelParser
pub trait FileParser: Send + Sync {
    /// 将文件内容解码为标准化记录序列
    ///
    /// # 返回
    /// - Ok(DecodedTable): 列名 + 记录（可能为空，由调用方判定 EmptyFile）
    /// - Err: 解码错误（保留底层原因）
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<DecodedTable>;
}

// ==========================================
// RowTransformer Trait
// ==========================================
// 用途: 单行 → 实体载荷（类型转换 / 枚举标准化 / 默认值 / 派生）
// 实现者: ContactTransformer, LeadCompanyTransformer
pub trait RowTransformer: Send + Sync {
    /// 目标实体类型
    fn kind(&self) -> EntityKind;

    /// 本实体声明的别名表
    fn alias_table(&self) -> &AliasTable;

    /// 转换单行
    ///
    /// # 参数
    /// - record: 解码后的记录
    /// - mapping: 本次导入解析出的列映射
    /// - row_number: 面向用户的行号（含表头偏移）
    fn transform(
        &self,
        record: &Record,
        mapping: &ColumnMapping,
        row_number: usize,
    ) -> Result<EntityPayload, RowRejection>;
}

// ==========================================
// RowRejection - 行级拒绝
// ==========================================
// 局部于单行：计入报告，不中断批次
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRejection {
    pub row_number: usize,
    pub reason: String,
}

impl RowRejection {
    pub fn new(row_number: usize, reason: impl Into<String>) -> Self {
        Self {
            row_number,
            reason: reason.into(),
        }
    }

    pub fn missing_required(row_number: usize, fields: &str) -> Self {
        Self::new(row_number, format!("Missing required field ({})", fields))
    }
}

impl fmt::Display for RowRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Row {}: {}", self.row_number, self.reason)
    }
}

impl std::error::Error for RowRejection {}
