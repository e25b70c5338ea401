// ==========================================
// 批量导入管道 - 导入协调器
// ==========================================
// 流程: 映射解析（一次） → 逐行转换 → 逐行创建 → 汇总报告
// 约束:
// - 严格按文件顺序串行处理，行号 = 记录下标 + 2
// - 单行失败只计入报告，批次不中断
// - 不重试、不回滚（已创建的行保持创建）
// ==========================================

use crate::domain::record::DecodedTable;
use crate::domain::report::{file_row_number, row_message, ImportReport};
use crate::importer::field_mapper::{FieldMapper, MappingOptions, MappingResolution};
use crate::importer::importer_trait::{RowRejection, RowTransformer};
use crate::repository::entity_store::EntityStore;
use crate::repository::error::RepositoryError;
use tracing::{debug, info, instrument, warn};

/// 预演结果：只转换不创建
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformOutcome {
    pub resolution: MappingResolution,
    pub accepted: usize,
    pub rejections: Vec<RowRejection>,
}

// ==========================================
// ImportCoordinator
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ImportCoordinator {
    mapper: FieldMapper,
}

impl ImportCoordinator {
    pub fn new(options: MappingOptions) -> Self {
        Self {
            mapper: FieldMapper::new(options),
        }
    }

    /// 解析本次导入的列映射
    pub fn resolve_mapping(
        &self,
        table: &DecodedTable,
        transformer: &dyn RowTransformer,
    ) -> MappingResolution {
        self.mapper.resolve(transformer.alias_table(), &table.columns)
    }

    /// 执行导入
    ///
    /// # 参数
    /// - table: 已解码的非空记录序列
    /// - transformer: 目标实体的行转换器
    /// - store: 创建协作者（调用时注入）
    ///
    /// # 返回
    /// 汇总报告；即使所有行失败也正常返回
    #[instrument(skip_all, fields(entity = %transformer.kind(), total = table.len()))]
    pub async fn run(
        &self,
        table: &DecodedTable,
        transformer: &dyn RowTransformer,
        store: &dyn EntityStore,
    ) -> ImportReport {
        let kind = transformer.kind();
        let resolution = self.resolve_mapping(table, transformer);
        debug!(mapping = ?resolution.mapping, "列映射");

        let mut report = ImportReport::new(table.len());
        info!("开始逐行导入");

        for (idx, record) in table.records.iter().enumerate() {
            let row_number = file_row_number(idx);

            let payload = match transformer.transform(record, &resolution.mapping, row_number) {
                Ok(payload) => payload,
                Err(rejection) => {
                    warn!(row = row_number, reason = %rejection.reason, "行被拒绝");
                    report.record_failure(rejection.to_string());
                    continue;
                }
            };

            match store.create(&payload).await {
                Ok(created) if created.identifier().is_some() => {
                    report.record_success();
                }
                Ok(_) => {
                    let err = RepositoryError::MissingIdentifier {
                        entity: kind.display_name().to_string(),
                    };
                    warn!(row = row_number, "创建响应缺少记录标识");
                    report.record_failure(row_message(row_number, &err.to_string()));
                }
                Err(err) => {
                    let mut reason = err.to_string();
                    if reason.trim().is_empty() {
                        reason = format!("Failed to create {}", kind.display_name());
                    }
                    warn!(row = row_number, error = %reason, "实体创建失败");
                    report.record_failure(row_message(row_number, &reason));
                }
            }
        }

        info!(
            successful = report.successful,
            failed = report.failed,
            "导入完成"
        );
        report
    }

    /// 预演：解析映射并转换每一行，不调用创建协作者
    #[instrument(skip_all, fields(entity = %transformer.kind(), total = table.len()))]
    pub fn dry_run(&self, table: &DecodedTable, transformer: &dyn RowTransformer) -> TransformOutcome {
        let resolution = self.resolve_mapping(table, transformer);

        let mut outcome = TransformOutcome::default();
        for (idx, record) in table.records.iter().enumerate() {
            match transformer.transform(record, &resolution.mapping, file_row_number(idx)) {
                Ok(_) => outcome.accepted += 1,
                Err(rejection) => outcome.rejections.push(rejection),
            }
        }

        debug!(
            accepted = outcome.accepted,
            rejected = outcome.rejections.len(),
            "预演完成"
        );
        outcome.resolution = resolution;
        outcome
    }
}
