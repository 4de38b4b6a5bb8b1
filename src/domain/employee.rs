// ==========================================
// 员工信息管理 - 员工领域模型
// ==========================================
// 自然键: employee_no（工号），唯一性由存储层约束
// ==========================================

use crate::domain::types::{EmployeeStatus, Gender};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Employee - 员工实体（已落库）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    // ===== 主键 =====
    pub id: i64,               // 代理主键
    pub employee_no: String,   // 工号（自然键）

    // ===== 基础信息 =====
    pub name: String,
    pub gender: Gender,
    pub age: Option<i32>,
    pub phone: Option<String>,
    pub email: Option<String>,

    // ===== 组织信息 =====
    pub department: Option<String>,
    pub position: Option<String>,
    pub level: Option<String>,    // 职级代码（如 3B）
    pub hire_date: Option<NaiveDate>,
    pub status: EmployeeStatus,

    // ===== 审计字段 =====
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    /// 提取业务字段（不含 id / 审计字段）
    pub fn fields(&self) -> EmployeeFields {
        EmployeeFields {
            employee_no: self.employee_no.clone(),
            name: self.name.clone(),
            gender: self.gender,
            age: self.age,
            phone: self.phone.clone(),
            email: self.email.clone(),
            department: self.department.clone(),
            position: self.position.clone(),
            level: self.level.clone(),
            hire_date: self.hire_date,
            status: self.status,
        }
    }
}

// ==========================================
// EmployeeFields - 写入载荷
// ==========================================
// 用途: create / update 的完整字段集
// 说明: update 为全字段覆写，None 会清空原值
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeFields {
    pub employee_no: String,
    pub name: String,
    pub gender: Gender,
    pub age: Option<i32>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub level: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub status: EmployeeStatus,
}

// ==========================================
// EmployeeFilter - 导出筛选条件
// ==========================================
// name / employee_no: 包含匹配
// department / status: 精确匹配
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeFilter {
    pub name: Option<String>,
    pub employee_no: Option<String>,
    pub department: Option<String>,
    pub status: Option<String>,
}

impl EmployeeFilter {
    /// 内存匹配（与 SQL 条件语义一致）
    pub fn matches(&self, employee: &Employee) -> bool {
        if let Some(name) = non_empty(&self.name) {
            if !employee.name.contains(name) {
                return false;
            }
        }
        if let Some(no) = non_empty(&self.employee_no) {
            if !employee.employee_no.contains(no) {
                return false;
            }
        }
        if let Some(department) = non_empty(&self.department) {
            if employee.department.as_deref() != Some(department) {
                return false;
            }
        }
        if let Some(status) = non_empty(&self.status) {
            if employee.status.as_str() != status {
                return false;
            }
        }
        true
    }
}

/// 空字符串条件视为未设置
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Employee {
        let now = Utc::now();
        Employee {
            id: 1,
            employee_no: "EMP001".to_string(),
            name: "张三".to_string(),
            gender: Gender::Male,
            age: Some(28),
            phone: None,
            email: None,
            department: Some("技术部".to_string()),
            position: None,
            level: None,
            hire_date: None,
            status: EmployeeStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_filter_default_matches_all() {
        assert!(EmployeeFilter::default().matches(&sample()));
    }

    #[test]
    fn test_filter_conditions() {
        let employee = sample();

        let by_name = EmployeeFilter {
            name: Some("张".to_string()),
            ..Default::default()
        };
        assert!(by_name.matches(&employee));

        let by_department = EmployeeFilter {
            department: Some("技术".to_string()),
            ..Default::default()
        };
        assert!(!by_department.matches(&employee));

        let by_status = EmployeeFilter {
            status: Some("inactive".to_string()),
            ..Default::default()
        };
        assert!(!by_status.matches(&employee));

        let blank = EmployeeFilter {
            employee_no: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(blank.matches(&employee));
    }
}
