// ==========================================
// 员工信息管理 - 字段归一器
// ==========================================
// 职责: RawRow → NormalizedRecord
// - 同义表头解析（首个非空胜出）
// - 性别/状态词表映射（大小写不敏感）
// - 年龄取整、日期识别（Excel 日序号 / 文本日期）
// 本阶段不拒绝任何行
// ==========================================

use crate::domain::import::{CellValue, DateCell, NormalizedRecord, RawRow};
use crate::domain::types::{EmployeeStatus, Gender, Vocab};
use crate::importer::column_spec::{resolve, resolve_text, EmployeeField};
use crate::importer::employee_importer_trait::FieldNormalizer;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// 1970-01-01 对应的 Excel 日序号
const EXCEL_UNIX_EPOCH_SERIAL: f64 = 25569.0;
const SECONDS_PER_DAY: f64 = 86400.0;

const TEXT_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%Y%m%d"];
const TEXT_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M",
];

// ==========================================
// FieldNormalizerImpl
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct FieldNormalizerImpl;

impl FieldNormalizerImpl {
    pub fn new() -> Self {
        Self
    }
}

impl FieldNormalizer for FieldNormalizerImpl {
    fn normalize(&self, row: &RawRow) -> NormalizedRecord {
        NormalizedRecord {
            employee_no: resolve_text(row, EmployeeField::EmployeeNo),
            name: resolve_text(row, EmployeeField::Name),
            gender: normalize_gender(&resolve_text(row, EmployeeField::Gender)),
            status: normalize_status(&resolve_text(row, EmployeeField::Status)),
            age: parse_age(resolve(row, EmployeeField::Age)),
            phone: optional_text(row, EmployeeField::Phone),
            email: optional_text(row, EmployeeField::Email),
            department: optional_text(row, EmployeeField::Department),
            position: optional_text(row, EmployeeField::Position),
            level: optional_text(row, EmployeeField::Level),
            hire_date: normalize_date(resolve(row, EmployeeField::HireDate)),
        }
    }
}

fn optional_text(row: &RawRow, field: EmployeeField) -> Option<String> {
    let text = resolve_text(row, field);
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// 性别词表
///
/// # 返回
/// - None: 原始值为空
/// - Some(Unmapped): 未命中词表（原样保留）
pub fn normalize_gender(raw: &str) -> Option<Vocab<Gender>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let gender = match trimmed.to_lowercase().as_str() {
        "男" | "男male" | "male" => Vocab::Known(Gender::Male),
        "女" | "女female" | "female" => Vocab::Known(Gender::Female),
        "其他" | "other" => Vocab::Known(Gender::Other),
        _ => Vocab::Unmapped(trimmed.to_string()),
    };
    Some(gender)
}

/// 状态词表（空值默认在职）
pub fn normalize_status(raw: &str) -> Vocab<EmployeeStatus> {
    let trimmed = raw.trim();
    match trimmed.to_lowercase().as_str() {
        "" => Vocab::Known(EmployeeStatus::default()),
        "在职" | "active" => Vocab::Known(EmployeeStatus::Active),
        "离职" | "inactive" => Vocab::Known(EmployeeStatus::Inactive),
        _ => Vocab::Unmapped(trimmed.to_string()),
    }
}

/// 年龄: 数字单元格截断取整；文本可解析为整数时采用；超出 i32 范围或无法解析时缺省
fn parse_age(cell: &CellValue) -> Option<i32> {
    match cell {
        CellValue::Number(n) => truncate_to_i32(*n),
        CellValue::Text(text) => {
            let text = text.trim();
            text.parse::<i32>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().and_then(truncate_to_i32))
        }
        _ => None,
    }
}

fn truncate_to_i32(n: f64) -> Option<i32> {
    let n = n.trunc();
    if n.is_finite() && n >= f64::from(i32::MIN) && n <= f64::from(i32::MAX) {
        Some(n as i32)
    } else {
        None
    }
}

/// 入职日期识别
///
/// - 数字单元格按 Excel 日序号换算
/// - 文本先按常见日期格式解析，失败后若为纯数字再按日序号换算
/// - 仍无法识别的保留原文，由校验器拒绝
pub fn normalize_date(cell: &CellValue) -> Option<DateCell> {
    match cell {
        CellValue::Empty => None,
        CellValue::Number(serial) => Some(
            serial_to_date(*serial)
                .map(DateCell::Parsed)
                .unwrap_or_else(|| DateCell::Unrecognized(cell.as_text())),
        ),
        CellValue::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                return None;
            }
            let parsed = parse_text_date(text).or_else(|| {
                text.parse::<f64>().ok().and_then(serial_to_date)
            });
            Some(
                parsed
                    .map(DateCell::Parsed)
                    .unwrap_or_else(|| DateCell::Unrecognized(text.to_string())),
            )
        }
    }
}

fn parse_text_date(text: &str) -> Option<NaiveDate> {
    TEXT_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            TEXT_DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// Excel 日序号 → 日期
///
/// 时间戳 = (serial - 25569) × 86400 秒，取 UTC 日期部分
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() {
        return None;
    }
    let seconds = ((serial - EXCEL_UNIX_EPOCH_SERIAL) * SECONDS_PER_DAY).round();
    if seconds.abs() > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp(seconds as i64, 0).map(|dt| dt.date_naive())
}
