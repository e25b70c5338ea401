// ==========================================
// 批量导入管道 - 解码记录模型
// ==========================================
// 职责: 表格解码器的输出（列键已标准化，值已 TRIM）
// 生命周期: 仅在一次导入流程内，不落库
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// Record - 单行解码记录
// ==========================================
// 约束: 键为标准化列名，值为原始字符串（已 TRIM）
// 缺失单元格以空字符串存在，不会缺键
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(HashMap<String, String>);

impl Record {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// 写入单元格；同名列只保留首次出现的值
    pub fn insert_first(&mut self, key: &str, value: &str) {
        self.0
            .entry(key.to_string())
            .or_insert_with(|| value.trim().to_string());
    }

    /// 读取非空值（空白视为未提供）
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// 读取原始值（可能为空字符串）
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 整行是否全部为空白
    pub fn is_blank(&self) -> bool {
        self.0.values().all(|v| v.trim().is_empty())
    }
}

impl From<HashMap<String, String>> for Record {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map)
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert_first(k.as_ref(), v.as_ref());
        }
        record
    }
}

// ==========================================
// DecodedTable - 解码结果
// ==========================================
// columns: 去重后的标准化列名（文件顺序），映射解析按此顺序扫描
// records: 数据行（不含表头），顺序与文件行一致
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedTable {
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

impl DecodedTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
