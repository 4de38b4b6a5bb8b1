// ==========================================
// 员工信息管理 - 导入领域模型
// ==========================================
// 用途: 导入管道中间产物与最终报告
// 生命周期: 仅在一次导入流程内，不落库
// ==========================================

use crate::domain::types::{EmployeeStatus, Gender, Vocab};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ==========================================
// CellValue - 单元格原始值
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
}

impl CellValue {
    /// 空单元格或纯空白文本
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Number(_) => false,
            CellValue::Text(text) => text.trim().is_empty(),
        }
    }

    /// 统一转为文本（已 TRIM）
    ///
    /// 整数值的数字单元格输出为整数形式（1001 而非 1001.0）
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(text) => text.trim().to_string(),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
        }
    }

    fn to_json(&self) -> Value {
        match self {
            CellValue::Empty => Value::String(String::new()),
            CellValue::Text(text) => Value::String(text.clone()),
            CellValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(n.to_string())),
        }
    }
}

// ==========================================
// RawRow - 解码后的原始行
// ==========================================
// source_row: 文档中的物理行号（1 起，表头占第 1 行）
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub source_row: usize,
    cells: Vec<(String, CellValue)>,
}

impl RawRow {
    pub fn new(source_row: usize, cells: Vec<(String, CellValue)>) -> Self {
        Self { source_row, cells }
    }

    /// 按表头精确取值
    pub fn get(&self, header: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(label, _)| label == header)
            .map(|(_, value)| value)
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|(_, value)| value.is_blank())
    }

    /// 原始数据快照（写入错误报告）
    pub fn snapshot(&self) -> Value {
        let map: Map<String, Value> = self
            .cells
            .iter()
            .map(|(label, value)| (label.clone(), value.to_json()))
            .collect();
        Value::Object(map)
    }
}

// ==========================================
// DateCell - 入职日期归一结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateCell {
    Parsed(NaiveDate),
    Unrecognized(String),
}

// ==========================================
// NormalizedRecord - 归一后的候选记录
// ==========================================
// gender 为 None 表示原始值为空
// status 为空时已默认 active
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    pub employee_no: String,
    pub name: String,
    pub gender: Option<Vocab<Gender>>,
    pub status: Vocab<EmployeeStatus>,
    pub age: Option<i32>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub level: Option<String>,
    pub hire_date: Option<DateCell>,
}

// ==========================================
// ReconcileAction - 对账动作
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileAction {
    Created,
    Updated,
}

// ==========================================
// RowError - 单行失败记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowError {
    pub row: usize,
    pub message: String,
    pub data: Value,
}

// ==========================================
// ImportOutcome - 批次导入报告
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    pub success_count: usize,
    pub failed_count: usize,
    pub created_count: usize,
    pub updated_count: usize,
    pub errors: Vec<RowError>,
}

impl ImportOutcome {
    pub fn record_success(&mut self, action: ReconcileAction) {
        self.success_count += 1;
        match action {
            ReconcileAction::Created => self.created_count += 1,
            ReconcileAction::Updated => self.updated_count += 1,
        }
    }

    pub fn record_failure(&mut self, error: RowError) {
        self.failed_count += 1;
        self.errors.push(error);
    }

    pub fn total_rows(&self) -> usize {
        self.success_count + self.failed_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_as_text_integral_number() {
        assert_eq!(CellValue::Number(1001.0).as_text(), "1001");
        assert_eq!(CellValue::Number(2.5).as_text(), "2.5");
        assert_eq!(CellValue::Text("  EMP001 ".to_string()).as_text(), "EMP001");
        assert_eq!(CellValue::Empty.as_text(), "");
    }

    #[test]
    fn test_raw_row_blank_and_snapshot() {
        let row = RawRow::new(
            3,
            vec![
                ("工号".to_string(), CellValue::Text("EMP001".to_string())),
                ("年龄".to_string(), CellValue::Number(28.0)),
            ],
        );
        assert!(!row.is_blank());
        let snapshot = row.snapshot();
        assert_eq!(snapshot["工号"], "EMP001");
        assert_eq!(snapshot["年龄"], 28.0);

        let blank = RawRow::new(4, vec![("工号".to_string(), CellValue::Text("  ".to_string()))]);
        assert!(blank.is_blank());
    }

    #[test]
    fn test_outcome_counters() {
        let mut outcome = ImportOutcome::default();
        outcome.record_success(ReconcileAction::Created);
        outcome.record_success(ReconcileAction::Updated);
        outcome.record_failure(RowError {
            row: 4,
            message: "x".to_string(),
            data: Value::Null,
        });
        assert_eq!(outcome.success_count, 2);
        assert_eq!(outcome.created_count, 1);
        assert_eq!(outcome.updated_count, 1);
        assert_eq!(outcome.failed_count, 1);
        assert_eq!(outcome.total_rows(), 3);

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["successCount"], 2);
        assert_eq!(json["errors"][0]["row"], 4);
    }
}
