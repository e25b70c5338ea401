// ==========================================
// 批量导入管道 - 线索公司行转换器
// ==========================================
// 必填: 公司名 / 联系人 / 邮箱 / 网站 / 电话 至少其一
// 默认: status = NEW, source = IMPORT, revenue = 0
// 派生: 公司名缺失 → 邮箱域名 → 网站域名 → "Imported Company N"
// ==========================================

use crate::domain::entity::{EntityKind, EntityPayload, LeadCompanyPayload};
use crate::domain::record::Record;
use crate::importer::data_cleaner::{DataCleaner, EnumTable, TokenCase};
use crate::importer::derivation::DerivationService;
use crate::importer::field_mapper::{AliasTable, ColumnMapping, FieldLookup};
use crate::importer::importer_trait::{RowRejection, RowTransformer};

pub const DEFAULT_LEAD_STATUS: &str = "NEW";
pub const DEFAULT_SOURCE: &str = "IMPORT";
pub const DEFAULT_REVENUE: f64 = 0.0;

const LEAD_ALIASES: &[(&str, &[&str])] = &[
    ("companyName", &["company_name", "organization", "organisation", "business_name", "account_name"]),
    ("contactName", &["contact_name", "contact", "contact_person", "full_name"]),
    ("email", &["email", "e_mail", "email_address", "mail"]),
    ("phone", &["phone", "phone_number", "telephone", "mobile", "tel"]),
    ("website", &["website", "web_site", "url", "homepage", "domain"]),
    ("industry", &["industry", "sector", "vertical"]),
    ("segment", &["segment", "market_segment", "tier"]),
    ("companySize", &["company_size", "size", "employees", "headcount"]),
    ("revenue", &["revenue", "annual_revenue", "turnover", "deal_value"]),
    ("status", &["status", "lead_status", "stage"]),
    ("source", &["source", "lead_source", "channel"]),
    ("city", &["city", "town"]),
    ("country", &["country"]),
    ("notes", &["notes", "note", "comments", "description"]),
];

const COMPANY_NAME: FieldLookup =
    FieldLookup::new("companyName", &["company_name", "company", "organization", "name"]);
const CONTACT_NAME: FieldLookup = FieldLookup::new("contactName", &["contact_name", "contact"]);
const EMAIL: FieldLookup = FieldLookup::new("email", &["email", "e_mail", "email_address"]);
const PHONE: FieldLookup = FieldLookup::new("phone", &["phone", "phone_number", "telephone"]);
const WEBSITE: FieldLookup = FieldLookup::new("website", &["website", "url", "web"]);
const INDUSTRY: FieldLookup = FieldLookup::new("industry", &["industry"]);
const SEGMENT: FieldLookup = FieldLookup::new("segment", &["segment"]);
const COMPANY_SIZE: FieldLookup = FieldLookup::new("companySize", &["company_size", "size"]);
const REVENUE: FieldLookup = FieldLookup::new("revenue", &["revenue", "annual_revenue"]);
const STATUS: FieldLookup = FieldLookup::new("status", &["status"]);
const SOURCE: FieldLookup = FieldLookup::new("source", &["source", "lead_source"]);
const CITY: FieldLookup = FieldLookup::new("city", &["city"]);
const COUNTRY: FieldLookup = FieldLookup::new("country", &["country"]);
const NOTES: FieldLookup = FieldLookup::new("notes", &["notes", "note"]);

const STATUS_TABLE: EnumTable = EnumTable::new(
    &[
        ("NEW", "NEW"),
        ("CONTACTED", "CONTACTED"),
        ("QUALIFIED", "QUALIFIED"),
        ("PROPOSAL", "PROPOSAL"),
        ("NEGOTIATION", "NEGOTIATION"),
        ("WON", "WON"),
        ("CLOSED_WON", "WON"),
        ("LOST", "LOST"),
        ("CLOSED_LOST", "LOST"),
    ],
    TokenCase::Upper,
);

const SEGMENT_TABLE: EnumTable = EnumTable::new(
    &[
        ("SMB", "SMB"),
        ("SMALL", "SMB"),
        ("SMALL_BUSINESS", "SMB"),
        ("MID_MARKET", "MID_MARKET"),
        ("MID", "MID_MARKET"),
        ("MIDMARKET", "MID_MARKET"),
        ("ENTERPRISE", "ENTERPRISE"),
        ("ENT", "ENTERPRISE"),
        ("LARGE", "ENTERPRISE"),
    ],
    TokenCase::Upper,
);

const SIZE_TABLE: EnumTable = EnumTable::new(
    &[
        ("1-10", "MICRO"),
        ("11-50", "SMALL"),
        ("51-200", "MEDIUM"),
        ("201-500", "LARGE"),
        ("500+", "ENTERPRISE"),
        ("501-1000", "ENTERPRISE"),
        ("1000+", "ENTERPRISE"),
    ],
    TokenCase::Upper,
);

const SOURCE_TABLE: EnumTable = EnumTable::new(
    &[
        ("IMPORT", "IMPORT"),
        ("WEB", "WEBSITE"),
        ("WEBSITE", "WEBSITE"),
        ("REFERRAL", "REFERRAL"),
        ("EVENT", "EVENT"),
        ("TRADE_SHOW", "EVENT"),
        ("COLD_CALL", "COLD_CALL"),
    ],
    TokenCase::Upper,
);

pub struct LeadCompanyTransformer {
    aliases: AliasTable,
    cleaner: DataCleaner,
    derivation: DerivationService,
}

impl LeadCompanyTransformer {
    pub fn new() -> Self {
        Self {
            aliases: AliasTable::new(LEAD_ALIASES),
            cleaner: DataCleaner,
            derivation: DerivationService,
        }
    }

    fn text(&self, lookup: &FieldLookup, record: &Record, mapping: &ColumnMapping) -> Option<String> {
        self.cleaner.normalize_null(lookup.resolve(record, mapping))
    }

    fn token(&self, table: &EnumTable, lookup: &FieldLookup, record: &Record, mapping: &ColumnMapping) -> Option<String> {
        lookup.resolve(record, mapping).map(|raw| table.normalize(raw))
    }
}

impl Default for LeadCompanyTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl RowTransformer for LeadCompanyTransformer {
    fn kind(&self) -> EntityKind {
        EntityKind::LeadCompany
    }

    fn alias_table(&self) -> &AliasTable {
        &self.aliases
    }

    fn transform(
        &self,
        record: &Record,
        mapping: &ColumnMapping,
        row_number: usize,
    ) -> Result<EntityPayload, RowRejection> {
        let company_name = self.text(&COMPANY_NAME, record, mapping);
        let contact_name = self.text(&CONTACT_NAME, record, mapping);
        let email = self.cleaner.clean_email(EMAIL.resolve(record, mapping));
        let website = self.text(&WEBSITE, record, mapping);
        let phone = self.text(&PHONE, record, mapping);

        let identified = company_name.is_some()
            || contact_name.is_some()
            || email.is_some()
            || website.is_some()
            || phone.is_some();
        if !identified {
            return Err(RowRejection::missing_required(
                row_number,
                "company name, contact or email",
            ));
        }

        let company_name = company_name.unwrap_or_else(|| {
            self.derivation
                .derive_company_name(email.as_deref(), website.as_deref(), row_number)
        });

        // 解析失败按未提供处理
        let revenue = self
            .cleaner
            .parse_tolerant_number(REVENUE.resolve(record, mapping))
            .unwrap_or(DEFAULT_REVENUE);

        Ok(EntityPayload::LeadCompany(LeadCompanyPayload {
            company_name,
            contact_name,
            email,
            phone,
            website,
            industry: self.text(&INDUSTRY, record, mapping),
            segment: self.token(&SEGMENT_TABLE, &SEGMENT, record, mapping),
            company_size: self.token(&SIZE_TABLE, &COMPANY_SIZE, record, mapping),
            city: self.text(&CITY, record, mapping),
            country: self.text(&COUNTRY, record, mapping),
            notes: self.text(&NOTES, record, mapping),
            revenue,
            status: STATUS_TABLE.normalize_or(STATUS.resolve(record, mapping), DEFAULT_LEAD_STATUS),
            source: SOURCE_TABLE.normalize_or(SOURCE.resolve(record, mapping), DEFAULT_SOURCE),
        }))
    }
}
