// ==========================================
// 批量导入管道 - 目标实体载荷
// ==========================================
// 职责: 行转换器的输出，交给外部"创建实体"协作者
// 约束: 每种实体一个强类型结构体，字段缺失在编译期暴露
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// EntityKind - 目标实体类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Contact,
    LeadCompany,
}

impl EntityKind {
    /// 内容 API 中的集合名
    pub fn collection(&self) -> &'static str {
        match self {
            EntityKind::Contact => "contacts",
            EntityKind::LeadCompany => "lead-companies",
        }
    }

    /// 面向用户的实体名称（用于错误消息）
    pub fn display_name(&self) -> &'static str {
        match self {
            EntityKind::Contact => "contact",
            EntityKind::LeadCompany => "lead company",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().replace('-', "_").as_str() {
            "contact" | "contacts" => Some(EntityKind::Contact),
            "lead" | "leads" | "lead_company" | "lead_companies" => Some(EntityKind::LeadCompany),
            _ => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ==========================================
// ContactPayload - 联系人
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    // 有默认值的字段（始终非空）
    pub status: String,
    pub lead_source: String,
}

// ==========================================
// LeadCompanyPayload - 线索公司
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadCompanyPayload {
    /// 公司名称（缺失时由派生规则补齐）
    pub company_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    // 有默认值的字段
    pub revenue: f64,
    pub status: String,
    pub source: String,
}

// ==========================================
// EntityPayload - 提交给创建协作者的载荷
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entity", content = "data", rename_all = "snake_case")]
pub enum EntityPayload {
    Contact(ContactPayload),
    LeadCompany(LeadCompanyPayload),
}

impl EntityPayload {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityPayload::Contact(_) => EntityKind::Contact,
            EntityPayload::LeadCompany(_) => EntityKind::LeadCompany,
        }
    }

    /// 仅序列化实体字段（不带判别标签），供内容 API / 落库使用
    pub fn to_data_json(&self) -> serde_json::Result<serde_json::Value> {
        match self {
            EntityPayload::Contact(c) => serde_json::to_value(c),
            EntityPayload::LeadCompany(l) => serde_json::to_value(l),
        }
    }
}
