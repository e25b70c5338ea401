// ==========================================
// 批量导入管道 - 字段映射解析器
// ==========================================
// 职责: 源列 → 标准字段绑定（别名表 + 启发式匹配）
// 匹配: 精确 → 列名包含别名 → 别名包含列名
// 默认各字段独立解析，同一列可绑定多个字段（列入 ambiguous_columns）
// 约束: 每个标准字段至多绑定一列；同层内按别名声明顺序、列文件顺序取首个命中
// ==========================================

use crate::domain::record::Record;
use crate::importer::file_parser::normalize_header;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

// ==========================================
// AliasTable - 别名表
// ==========================================
#[derive(Debug, Clone)]
pub struct FieldAliases {
    pub field: &'static str,
    /// 已标准化的别名（声明顺序）
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    fields: Vec<FieldAliases>,
}

impl AliasTable {
    /// 由 (标准字段, 别名列表) 声明构造；别名与列名使用同一标准化规则
    pub fn new(entries: &[(&'static str, &[&str])]) -> Self {
        let fields = entries
            .iter()
            .map(|(field, aliases)| FieldAliases {
                field,
                aliases: aliases
                    .iter()
                    .map(|a| normalize_header(a))
                    .filter(|a| !a.is_empty())
                    .collect(),
            })
            .collect();
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldAliases] {
        &self.fields
    }

}

// ==========================================
// MappingOptions - 匹配严格度
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingOptions {
    /// 是否启用子串匹配（关闭后仅精确匹配）
    pub substring_match: bool,
    /// 是否允许同一列绑定到多个标准字段
    pub allow_shared_columns: bool,
}

impl Default for MappingOptions {
    fn default() -> Self {
        Self {
            substring_match: true,
            allow_shared_columns: true,
        }
    }
}

// ==========================================
// ColumnMapping - 列映射结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMapping(BTreeMap<String, String>);

impl ColumnMapping {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn bind(&mut self, field: &str, column: &str) {
        self.0.insert(field.to_string(), column.to_string());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// 解析结果：映射 + 被多个字段共用的列
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingResolution {
    pub mapping: ColumnMapping,
    pub ambiguous_columns: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
enum MatchTier {
    Exact,
    ColumnContainsAlias,
    AliasContainsColumn,
}

impl MatchTier {
    fn matches(self, column: &str, alias: &str) -> bool {
        match self {
            MatchTier::Exact => column == alias,
            MatchTier::ColumnContainsAlias => column.contains(alias),
            MatchTier::AliasContainsColumn => alias.contains(column),
        }
    }
}

// ==========================================
// FieldMapper - 映射解析器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct FieldMapper {
    pub options: MappingOptions,
}

impl FieldMapper {
    pub fn new(options: MappingOptions) -> Self {
        Self { options }
    }

    /// 解析列映射（每次导入执行一次）
    ///
    /// # 参数
    /// - table: 别名表
    /// - columns: 已标准化的源列名（文件顺序）
    ///
    /// # 规则
    /// 1. 精确匹配轮：所有字段按声明顺序先做精确匹配
    /// 2. 子串匹配轮：仍未绑定的字段再做子串匹配
    /// 3. 独占模式（allow_shared_columns = false）下已绑定的列不再参与后续匹配
    pub fn resolve(&self, table: &AliasTable, columns: &[String]) -> MappingResolution {
        let mut mapping = ColumnMapping::default();
        let mut bound: HashSet<&str> = HashSet::new();
        let mut bind_counts: BTreeMap<&str, usize> = BTreeMap::new();

        // 精确匹配轮
        let mut pending = Vec::new();
        for spec in table.fields() {
            match self.find_column(spec, columns, &[MatchTier::Exact], &bound) {
                Some(column) => {
                    mapping.bind(spec.field, column);
                    bound.insert(column);
                    *bind_counts.entry(column).or_insert(0) += 1;
                }
                None => pending.push(spec),
            }
        }

        // 子串匹配轮
        if self.options.substring_match {
            for spec in pending {
                let tiers = [MatchTier::ColumnContainsAlias, MatchTier::AliasContainsColumn];
                if let Some(column) = self.find_column(spec, columns, &tiers, &bound) {
                    mapping.bind(spec.field, column);
                    bound.insert(column);
                    *bind_counts.entry(column).or_insert(0) += 1;
                }
            }
        }

        let ambiguous_columns: Vec<String> = columns
            .iter()
            .filter(|c| bind_counts.get(c.as_str()).copied().unwrap_or(0) > 1)
            .cloned()
            .collect();

        for column in &ambiguous_columns {
            let fields: Vec<&str> = mapping
                .iter()
                .filter(|(_, c)| *c == column.as_str())
                .map(|(f, _)| f)
                .collect();
            warn!(column = %column, fields = ?fields, "列被多个标准字段共用");
        }

        debug!(bound = mapping.len(), total = table.fields().len(), "列映射解析完成");

        MappingResolution {
            mapping,
            ambiguous_columns,
        }
    }

    /// 同层内按别名声明顺序、列文件顺序取首个命中
    fn find_column<'c>(
        &self,
        spec: &FieldAliases,
        columns: &'c [String],
        tiers: &[MatchTier],
        bound: &HashSet<&str>,
    ) -> Option<&'c str> {
        tiers.iter().find_map(|tier| {
            spec.aliases.iter().find_map(|alias| {
                columns
                    .iter()
                    .map(String::as_str)
                    .find(|column| {
                        !column.is_empty()
                            && (self.options.allow_shared_columns || !bound.contains(column))
                            && tier.matches(column, alias)
                    })
            })
        })
    }
}

// ==========================================
// FieldLookup - 声明式取值链
// ==========================================
// 顺序: 映射列 → 已知原始列名同义词 → 未提供
#[derive(Debug, Clone, Copy)]
pub struct FieldLookup {
    pub field: &'static str,
    /// 已标准化的原始列名（解析器漏配时的兜底）
    pub fallback_keys: &'static [&'static str],
}

impl FieldLookup {
    pub const fn new(field: &'static str, fallback_keys: &'static [&'static str]) -> Self {
        Self {
            field,
            fallback_keys,
        }
    }

    /// 取非空值（已 TRIM）
    pub fn resolve<'r>(&self, record: &'r Record, mapping: &ColumnMapping) -> Option<&'r str> {
        if let Some(value) = mapping.get(self.field).and_then(|column| record.get(column)) {
            return Some(value);
        }
        self.fallback_keys.iter().find_map(|key| record.get(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| normalize_header(n)).collect()
    }

    fn lead_table() -> AliasTable {
        AliasTable::new(&[
            ("companyName", &["company_name", "organization"]),
            ("email", &["email", "e-mail"]),
            ("contactName", &["contact name", "contact"]),
        ])
    }

    #[test]
    fn test_exact_match() {
        let resolution =
            FieldMapper::default().resolve(&lead_table(), &columns(&["Company Name", "Email"]));

        assert_eq!(resolution.mapping.get("companyName"), Some("company_name"));
        assert_eq!(resolution.mapping.get("email"), Some("email"));
        assert_eq!(resolution.mapping.get("contactName"), None);
    }

    #[test]
    fn test_column_substring_of_alias() {
        // "company" 是别名 "company_name" 的子串
        let resolution = FieldMapper::default().resolve(&lead_table(), &columns(&["Company"]));
        assert_eq!(resolution.mapping.get("companyName"), Some("company"));
    }

    #[test]
    fn test_alias_substring_of_column() {
        let resolution =
            FieldMapper::default().resolve(&lead_table(), &columns(&["Primary Email Address"]));
        assert_eq!(
            resolution.mapping.get("email"),
            Some("primary_email_address")
        );
    }

    #[test]
    fn test_exact_match_preferred_over_substring() {
        let resolution = FieldMapper::default()
            .resolve(&lead_table(), &columns(&["Work Email", "Email"]));
        assert_eq!(resolution.mapping.get("email"), Some("email"));
    }

    #[test]
    fn test_exact_only_when_substring_disabled() {
        let mapper = FieldMapper::new(MappingOptions {
            substring_match: false,
            ..Default::default()
        });
        let resolution = mapper.resolve(&lead_table(), &columns(&["Company", "E-Mail"]));

        assert_eq!(resolution.mapping.get("companyName"), None);
        assert_eq!(resolution.mapping.get("email"), Some("e_mail"));
    }

    #[test]
    fn test_shared_column_is_reported_as_ambiguous() {
        // "contact_email" 同时包含 "email" 与 "contact"
        let resolution =
            FieldMapper::default().resolve(&lead_table(), &columns(&["Contact Email"]));

        assert_eq!(resolution.mapping.get("email"), Some("contact_email"));
        assert_eq!(resolution.mapping.get("contactName"), Some("contact_email"));
        assert_eq!(resolution.ambiguous_columns, vec!["contact_email".to_string()]);
    }

    #[test]
    fn test_exclusive_columns_when_sharing_disabled() {
        let mapper = FieldMapper::new(MappingOptions {
            allow_shared_columns: false,
            ..Default::default()
        });
        let resolution = mapper.resolve(&lead_table(), &columns(&["Contact Email"]));

        assert_eq!(resolution.mapping.get("email"), Some("contact_email"));
        assert_eq!(resolution.mapping.get("contactName"), None);
        assert!(resolution.ambiguous_columns.is_empty());
    }

    fn name_table() -> AliasTable {
        AliasTable::new(&[("firstName", &["first_name"]), ("fullName", &["name"])])
    }

    #[test]
    fn test_fields_resolve_independently_by_default() {
        // "name" 精确属于 fullName，同时是别名 "first_name" 的子串
        let resolution = FieldMapper::default().resolve(&name_table(), &columns(&["Name"]));

        assert_eq!(resolution.mapping.get("fullName"), Some("name"));
        assert_eq!(resolution.mapping.get("firstName"), Some("name"));
        assert_eq!(resolution.ambiguous_columns, vec!["name".to_string()]);
    }

    #[test]
    fn test_exact_claimed_column_not_reused_when_sharing_disabled() {
        let mapper = FieldMapper::new(MappingOptions {
            allow_shared_columns: false,
            ..Default::default()
        });
        let resolution = mapper.resolve(&name_table(), &columns(&["Name"]));

        assert_eq!(resolution.mapping.get("fullName"), Some("name"));
        assert_eq!(resolution.mapping.get("firstName"), None);
        assert!(resolution.ambiguous_columns.is_empty());
    }

    #[test]
    fn test_mapping_is_deterministic() {
        let cols = columns(&["Organization", "Company Name", "Mail", "Contact"]);
        let first = FieldMapper::default().resolve(&lead_table(), &cols);
        for _ in 0..10 {
            assert_eq!(FieldMapper::default().resolve(&lead_table(), &cols), first);
        }
    }

    #[test]
    fn test_field_lookup_falls_back_to_raw_keys() {
        const EMAIL: FieldLookup = FieldLookup::new("email", &["email_address", "mail"]);
        let record: Record = [("mail", " ada@x.com ")].into_iter().collect();

        assert_eq!(EMAIL.resolve(&record, &ColumnMapping::default()), Some("ada@x.com"));

        let mut mapping = ColumnMapping::default();
        mapping.bind("email", "missing_column");
        assert_eq!(EMAIL.resolve(&record, &mapping), Some("ada@x.com"));
    }

    #[test]
    fn test_field_lookup_empty_mapped_value_uses_fallback() {
        const PHONE: FieldLookup = FieldLookup::new("phone", &["telephone"]);
        let record: Record = [("phone", "  "), ("telephone", "555-0100")]
            .into_iter()
            .collect();
        let mut mapping = ColumnMapping::default();
        mapping.bind("phone", "phone");

        assert_eq!(PHONE.resolve(&record, &mapping), Some("555-0100"));
    }
}
