// ==========================================
// 员工信息管理 - 列规格
// ==========================================
// 职责: 导入/导出/模板共用的固定列布局
// - 同义表头按优先级排列（中文工作标签优先，其次规范标识）
// - 首个非空同义列胜出
// ==========================================

use crate::domain::import::{CellValue, RawRow};

/// 规范字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmployeeField {
    EmployeeNo,
    Name,
    Gender,
    Age,
    Phone,
    Email,
    Department,
    Position,
    Level,
    HireDate,
    Status,
}

/// 单列定义
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub field: EmployeeField,
    /// 可接受的表头（优先级从高到低）
    pub synonyms: &'static [&'static str],
    /// 导出表头
    pub label: &'static str,
    /// 导出列宽（字符数）
    pub width: f64,
}

pub const EMPLOYEE_COLUMNS: [ColumnSpec; 11] = [
    ColumnSpec {
        field: EmployeeField::EmployeeNo,
        synonyms: &["工号", "employeeNo"],
        label: "工号",
        width: 12.0,
    },
    ColumnSpec {
        field: EmployeeField::Name,
        synonyms: &["姓名", "name"],
        label: "姓名",
        width: 10.0,
    },
    ColumnSpec {
        field: EmployeeField::Gender,
        synonyms: &["性别", "gender"],
        label: "性别",
        width: 6.0,
    },
    ColumnSpec {
        field: EmployeeField::Age,
        synonyms: &["年龄", "age"],
        label: "年龄",
        width: 6.0,
    },
    ColumnSpec {
        field: EmployeeField::Phone,
        synonyms: &["联系电话", "phone"],
        label: "联系电话",
        width: 15.0,
    },
    ColumnSpec {
        field: EmployeeField::Email,
        synonyms: &["邮箱", "email"],
        label: "邮箱",
        width: 20.0,
    },
    ColumnSpec {
        field: EmployeeField::Department,
        synonyms: &["部门", "department"],
        label: "部门",
        width: 12.0,
    },
    ColumnSpec {
        field: EmployeeField::Position,
        synonyms: &["岗位", "position"],
        label: "岗位",
        width: 12.0,
    },
    ColumnSpec {
        field: EmployeeField::Level,
        synonyms: &["职级", "level"],
        label: "职级",
        width: 8.0,
    },
    ColumnSpec {
        field: EmployeeField::HireDate,
        synonyms: &["入职日期", "hireDate"],
        label: "入职日期",
        width: 12.0,
    },
    ColumnSpec {
        field: EmployeeField::Status,
        synonyms: &["状态", "status"],
        label: "状态",
        width: 8.0,
    },
];

static EMPTY_CELL: CellValue = CellValue::Empty;

/// 取字段的列定义
pub fn column(field: EmployeeField) -> &'static ColumnSpec {
    EMPLOYEE_COLUMNS
        .iter()
        .find(|c| c.field == field)
        .unwrap_or(&EMPLOYEE_COLUMNS[0])
}

/// 按同义表头解析字段值
///
/// 依次尝试同义表头，首个非空单元格胜出；都不存在或都为空时返回 Empty
pub fn resolve(row: &RawRow, field: EmployeeField) -> &CellValue {
    column(field)
        .synonyms
        .iter()
        .filter_map(|header| row.get(header))
        .find(|value| !value.is_blank())
        .unwrap_or(&EMPTY_CELL)
}

/// 按同义表头解析为文本（已 TRIM，缺失为空串）
pub fn resolve_text(row: &RawRow, field: EmployeeField) -> String {
    resolve(row, field).as_text()
}
