// ==========================================
// 员工信息管理 - 领域类型定义
// ==========================================
// 职责: 性别/状态枚举、词表归一结果
// 序列化格式: snake_case (与数据库一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 性别 (Gender)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// 规范标识（落库值）
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }

    /// 导出显示标签
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "男",
            Gender::Female => "女",
            Gender::Other => "其他",
        }
    }

    /// 从规范标识解析（仅接受 male/female/other）
    pub fn from_canonical(value: &str) -> Option<Self> {
        match value {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            "other" => Some(Gender::Other),
            _ => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 在职状态 (Employee Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    #[default]
    Active,
    Inactive,
}

impl EmployeeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeStatus::Active => "active",
            EmployeeStatus::Inactive => "inactive",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EmployeeStatus::Active => "在职",
            EmployeeStatus::Inactive => "离职",
        }
    }

    pub fn from_canonical(value: &str) -> Option<Self> {
        match value {
            "active" => Some(EmployeeStatus::Active),
            "inactive" => Some(EmployeeStatus::Inactive),
            _ => None,
        }
    }
}

impl fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// Vocab - 词表归一结果
// ==========================================
// Known: 命中词表
// Unmapped: 未命中，原样保留，交由校验器拒绝
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Vocab<T> {
    Known(T),
    Unmapped(String),
}

impl<T: Copy> Vocab<T> {
    pub fn known(&self) -> Option<T> {
        match self {
            Vocab::Known(value) => Some(*value),
            Vocab::Unmapped(_) => None,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Vocab<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Vocab::Known(value) => write!(f, "{}", value),
            Vocab::Unmapped(raw) => write!(f, "{}", raw),
        }
    }
}
