// ==========================================
// 员工信息管理 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、导入中间产物
// 红线: 不含数据访问逻辑
// ==========================================

pub mod employee;
pub mod import;
pub mod types;

// 重导出核心类型
pub use employee::{Employee, EmployeeFields, EmployeeFilter};
pub use import::{
    CellValue, DateCell, ImportOutcome, NormalizedRecord, RawRow, ReconcileAction, RowError,
};
pub use types::{EmployeeStatus, Gender, Vocab};
