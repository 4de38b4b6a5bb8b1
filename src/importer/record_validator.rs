// ==========================================
// 员工信息管理 - 记录校验器
// ==========================================
// 规则按顺序检查，第一条未通过即返回:
// 1. 工号非空
// 2. 姓名非空
// 3. 性别非空（无默认值）
// 4. 性别命中词表
// 5. 状态命中词表
// 6. 入职日期（若提供）可识别
// ==========================================

use crate::domain::employee::EmployeeFields;
use crate::domain::import::{DateCell, NormalizedRecord};
use crate::domain::types::Vocab;
use crate::importer::employee_importer_trait::RecordValidator;
use thiserror::Error;

/// 单行校验失败原因（错误信息写入导入报告）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    #[error("工号不能为空")]
    MissingEmployeeNo,

    #[error("姓名不能为空")]
    MissingName,

    #[error("性别不能为空")]
    MissingGender,

    #[error("性别值无效，必须是男、女或其他: {0}")]
    InvalidGender(String),

    #[error("状态值无效，必须是在职或离职: {0}")]
    InvalidStatus(String),

    #[error("入职日期格式无效: {0}")]
    InvalidHireDate(String),
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RecordValidatorImpl;

impl RecordValidatorImpl {
    pub fn new() -> Self {
        Self
    }
}

impl RecordValidator for RecordValidatorImpl {
    fn validate(&self, record: &NormalizedRecord) -> Result<EmployeeFields, ValidationFailure> {
        if record.employee_no.trim().is_empty() {
            return Err(ValidationFailure::MissingEmployeeNo);
        }
        if record.name.trim().is_empty() {
            return Err(ValidationFailure::MissingName);
        }

        let gender = match &record.gender {
            None => return Err(ValidationFailure::MissingGender),
            Some(Vocab::Unmapped(raw)) => return Err(ValidationFailure::InvalidGender(raw.clone())),
            Some(Vocab::Known(gender)) => *gender,
        };

        let status = match &record.status {
            Vocab::Known(status) => *status,
            Vocab::Unmapped(raw) => return Err(ValidationFailure::InvalidStatus(raw.clone())),
        };

        let hire_date = match &record.hire_date {
            None => None,
            Some(DateCell::Parsed(date)) => Some(*date),
            Some(DateCell::Unrecognized(raw)) => {
                return Err(ValidationFailure::InvalidHireDate(raw.clone()))
            }
        };

        Ok(EmployeeFields {
            employee_no: record.employee_no.trim().to_string(),
            name: record.name.trim().to_string(),
            gender,
            age: record.age,
            phone: record.phone.clone(),
            email: record.email.clone(),
            department: record.department.clone(),
            position: record.position.clone(),
            level: record.level.clone(),
            hire_date,
            status,
        })
    }
}
