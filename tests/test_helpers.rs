// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、测试文档生成等功能
// ==========================================

#![allow(dead_code)]

use employee_roster::db::ensure_schema;
use employee_roster::domain::{EmployeeFields, EmployeeStatus, Gender};
use rusqlite::Connection;
use rust_xlsxwriter::{Format, Workbook};
use std::error::Error;
use tempfile::NamedTempFile;

/// 标准导入表头
pub const HEADERS: &[&str] = &[
    "工号", "姓名", "性别", "年龄", "联系电话", "邮箱", "部门", "岗位", "职级", "入职日期", "状态",
];

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径不是合法 UTF-8")?
        .to_string();

    let conn = Connection::open(&db_path)?;
    ensure_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 生成 CSV 文档（逗号分隔，行尾换行）
pub fn csv_document(headers: &[&str], rows: &[Vec<&str>]) -> Vec<u8> {
    let mut text = headers.join(",");
    text.push('\n');
    for row in rows {
        text.push_str(&row.join(","));
        text.push('\n');
    }
    text.into_bytes()
}

/// XLSX 测试单元格
#[derive(Debug, Clone, Copy)]
pub enum XCell<'a> {
    Text(&'a str),
    Number(f64),
    /// 日期格式的数字单元格（Excel 日序号）
    Date(f64),
    Empty,
}

/// 生成 XLSX 文档（第一个工作表，第一行表头）
pub fn xlsx_document(headers: &[&str], rows: &[Vec<XCell>]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let worksheet = workbook.add_worksheet();

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header).unwrap();
    }
    for (idx, row) in rows.iter().enumerate() {
        let r = (idx + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            let c = col as u16;
            match cell {
                XCell::Text(text) => {
                    worksheet.write_string(r, c, *text).unwrap();
                }
                XCell::Number(n) => {
                    worksheet.write_number(r, c, *n).unwrap();
                }
                XCell::Date(serial) => {
                    worksheet
                        .write_number_with_format(r, c, *serial, &date_format)
                        .unwrap();
                }
                XCell::Empty => {}
            }
        }
    }

    workbook.save_to_buffer().unwrap()
}

/// 标准员工行（CSV 单元格顺序与 HEADERS 一致）
pub fn employee_row<'a>(employee_no: &'a str, name: &'a str, gender: &'a str) -> Vec<&'a str> {
    vec![
        employee_no,
        name,
        gender,
        "30",
        "13800138000",
        "test@example.com",
        "技术部",
        "工程师",
        "3B",
        "2023-01-15",
        "在职",
    ]
}

/// 最小员工写入载荷
pub fn employee_fields(employee_no: &str, name: &str) -> EmployeeFields {
    EmployeeFields {
        employee_no: employee_no.to_string(),
        name: name.to_string(),
        gender: Gender::Male,
        age: None,
        phone: None,
        email: None,
        department: None,
        position: None,
        level: None,
        hire_date: None,
        status: EmployeeStatus::Active,
    }
}
