// ==========================================
// 批量导入管道 - 导入层
// ==========================================
// 流程: 解码 → 映射解析 → 逐行转换 → 逐行创建 → 报告
// 支持: Excel (.xlsx/.xls), CSV
// ==========================================

// 模块声明
pub mod contact_transformer;
pub mod data_cleaner;
pub mod derivation;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod import_coordinator;
pub mod importer_trait;
pub mod lead_transformer;

// 重导出核心类型
pub use contact_transformer::ContactTransformer;
pub use data_cleaner::{DataCleaner, EnumTable, TokenCase};
pub use derivation::DerivationService;
pub use error::{ImportError, ImportResult};
pub use field_mapper::{
    AliasTable, ColumnMapping, FieldLookup, FieldMapper, MappingOptions, MappingResolution,
};
pub use file_parser::{normalize_header, CsvParser, ExcelParser, UniversalFileParser, WorkbookFormat};
pub use import_coordinator::{ImportCoordinator, TransformOutcome};
pub use lead_transformer::LeadCompanyTransformer;

// 重导出 Trait 接口
pub use importer_trait::{FileParser, RowRejection, RowTransformer};
