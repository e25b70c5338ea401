// ==========================================
// 批量导入管道 - 导入报告
// ==========================================
// 职责: 一次导入调用的汇总结果（总数/成功/失败/逐行错误）
// 约束: successful + failed == total
// ==========================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    /// 逐行错误消息（"Row N: ..."，按文件顺序）
    pub errors: Vec<String>,
}

impl ImportReport {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    pub fn record_success(&mut self) {
        self.successful += 1;
    }

    pub fn record_failure(&mut self, message: String) {
        self.failed += 1;
        self.errors.push(message);
    }

    /// 是否所有行都已结算
    pub fn is_balanced(&self) -> bool {
        self.successful + self.failed == self.total
    }
}

/// 人类可读行号：0 基记录下标 + 表头偏移
pub fn file_row_number(record_index: usize) -> usize {
    record_index + 2
}

/// 逐行错误消息格式
pub fn row_message(row_number: usize, reason: &str) -> String {
    format!("Row {}: {}", row_number, reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts_balance() {
        let mut report = ImportReport::new(3);
        report.record_success();
        report.record_failure(row_message(3, "boom"));
        assert!(!report.is_balanced());

        report.record_success();
        assert!(report.is_balanced());
        assert_eq!(report.errors, vec!["Row 3: boom".to_string()]);
    }

    #[test]
    fn test_file_row_number_offsets_header() {
        assert_eq!(file_row_number(0), 2);
        assert_eq!(file_row_number(1), 3);
    }
}
