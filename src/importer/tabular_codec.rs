// ==========================================
// 员工信息管理 - 表格编解码器
// ==========================================
// 解码: Excel (.xlsx/.xls) / CSV (.csv) → RawRow 序列
// 编码: 员工记录 → Excel / CSV（表头 + 每条记录一行）
// 格式识别: 按文件头魔数，不依赖扩展名
// ==========================================

use crate::domain::employee::EmployeeFields;
use crate::domain::import::{CellValue, RawRow};
use crate::domain::types::{EmployeeStatus, Gender};
use crate::importer::column_spec::{EmployeeField, EMPLOYEE_COLUMNS};
use crate::importer::error::{DecodeError, ImportError, ImportResult};
use calamine::{Data, Reader, Xls, Xlsx};
use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use rust_xlsxwriter::{Format, Workbook};
use std::fmt::Display;
use std::io::Cursor;

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// 导出日期格式（2023/1/15）
pub const EXPORT_DATE_FORMAT: &str = "%Y/%-m/%-d";

// ==========================================
// DocumentFormat - 文档格式
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentFormat {
    #[default]
    Xlsx,
    Xls,
    Csv,
}

impl DocumentFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::Xlsx => "xlsx",
            DocumentFormat::Xls => "xls",
            DocumentFormat::Csv => "csv",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            DocumentFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            DocumentFormat::Xls => "application/vnd.ms-excel",
            DocumentFormat::Csv => "text/csv; charset=utf-8",
        }
    }

    /// 按扩展名识别（大小写不敏感）
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "xlsx" => Some(DocumentFormat::Xlsx),
            "xls" => Some(DocumentFormat::Xls),
            "csv" => Some(DocumentFormat::Csv),
            _ => None,
        }
    }

    /// 按文件头识别
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(ZIP_MAGIC) {
            Some(DocumentFormat::Xlsx)
        } else if bytes.starts_with(OLE_MAGIC) {
            Some(DocumentFormat::Xls)
        } else if std::str::from_utf8(strip_bom(bytes)).is_ok() {
            Some(DocumentFormat::Csv)
        } else {
            None
        }
    }
}

fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
}

// ==========================================
// TabularCodec
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct TabularCodec;

impl TabularCodec {
    pub fn new() -> Self {
        Self
    }

    /// 解码文档为原始行
    ///
    /// # 规则
    /// - 仅读取第一个工作表
    /// - 第一行为表头，不作为数据
    /// - 完全空白的行跳过，其余行保留文档物理行号
    ///
    /// # 返回
    /// - Err(NoDataRows): 仅有表头
    /// - Err(UnrecognizedFormat / WorkbookParse / CsvParse): 无法解析
    pub fn decode(&self, bytes: &[u8]) -> Result<Vec<RawRow>, DecodeError> {
        if bytes.is_empty() {
            return Err(DecodeError::EmptyInput);
        }

        let rows = match DocumentFormat::sniff(bytes) {
            Some(DocumentFormat::Xlsx) => {
                let workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes.to_vec()))
                    .map_err(|e| DecodeError::WorkbookParse(e.to_string()))?;
                decode_workbook(workbook)?
            }
            Some(DocumentFormat::Xls) => {
                let workbook: Xls<_> = Xls::new(Cursor::new(bytes.to_vec()))
                    .map_err(|e| DecodeError::WorkbookParse(e.to_string()))?;
                decode_workbook(workbook)?
            }
            Some(DocumentFormat::Csv) => decode_csv(strip_bom(bytes))?,
            None => return Err(DecodeError::UnrecognizedFormat),
        };

        if rows.is_empty() {
            return Err(DecodeError::NoDataRows);
        }
        Ok(rows)
    }

    /// 编码员工记录
    ///
    /// 表头取列规格的导出标签；枚举输出中文标签，日期输出 2023/1/15 形式
    pub fn encode(
        &self,
        records: &[EmployeeFields],
        format: DocumentFormat,
        sheet_name: &str,
    ) -> ImportResult<Vec<u8>> {
        let rows: Vec<Vec<CellValue>> = records.iter().map(employee_cells).collect();
        match format {
            DocumentFormat::Xlsx => encode_xlsx(&rows, sheet_name),
            DocumentFormat::Csv => encode_csv(&rows),
            DocumentFormat::Xls => Err(ImportError::ExportEncoding(
                "不支持导出为 .xls，请使用 .xlsx 或 .csv".to_string(),
            )),
        }
    }

    /// 生成导入模板（两条示例记录，不访问存储）
    pub fn template(&self, format: DocumentFormat, sheet_name: &str) -> ImportResult<Vec<u8>> {
        self.encode(&template_records(), format, sheet_name)
    }
}

// ==========================================
// 解码
// ==========================================

fn decode_workbook<R>(mut workbook: R) -> Result<Vec<RawRow>, DecodeError>
where
    R: Reader<Cursor<Vec<u8>>>,
    R::Error: Display,
{
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(DecodeError::NoWorksheet)?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| DecodeError::WorkbookParse(e.to_string()))?;

    // 工作表可能不从 A1 开始
    let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);

    let mut rows = range.rows();
    let header_row = rows.next().ok_or(DecodeError::MissingHeader)?;
    let headers: Vec<String> = header_row.iter().map(|c| cell_from_data(c).as_text()).collect();

    let data = rows.enumerate().map(|(idx, row)| {
        // 表头物理行号 = first_row + 1，数据行依次递增
        let source_row = first_row + idx + 2;
        (source_row, row.iter().map(cell_from_data).collect())
    });

    build_rows(&headers, data)
}

fn decode_csv(bytes: &[u8]) -> Result<Vec<RawRow>, DecodeError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // 允许行长度不一致
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut lines = LineCounter::new(bytes);
    let mut data = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        let source_row = record
            .position()
            .map(|p| lines.line_at(p.byte() as usize))
            .unwrap_or(idx + 2);
        let cells = record
            .iter()
            .map(|value| {
                if value.trim().is_empty() {
                    CellValue::Empty
                } else {
                    CellValue::Text(value.trim().to_string())
                }
            })
            .collect();
        data.push((source_row, cells));
    }

    build_rows(&headers, data)
}

/// 记录起始字节 → 物理行号（1 起）
///
/// 跳过记录前的换行符后统计换行数，\r\n / \r / \n 各计一次。
/// 偏移须单调递增，已扫描部分不重复计数
struct LineCounter<'a> {
    bytes: &'a [u8],
    scanned: usize,
    breaks: usize,
    prev: u8,
}

impl<'a> LineCounter<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            scanned: 0,
            breaks: 0,
            prev: 0,
        }
    }

    fn line_at(&mut self, offset: usize) -> usize {
        let offset = offset.clamp(self.scanned, self.bytes.len());
        let start = self.bytes[offset..]
            .iter()
            .position(|b| *b != b'\r' && *b != b'\n')
            .map_or(self.bytes.len(), |p| offset + p);

        for &b in &self.bytes[self.scanned..start] {
            if b == b'\r' || (b == b'\n' && self.prev != b'\r') {
                self.breaks += 1;
            }
            self.prev = b;
        }
        self.scanned = start;
        self.breaks + 1
    }
}

/// 按列位置对齐表头，组装 RawRow（跳过空白行）
fn build_rows<I>(headers: &[String], data: I) -> Result<Vec<RawRow>, DecodeError>
where
    I: IntoIterator<Item = (usize, Vec<CellValue>)>,
{
    if headers.iter().all(|h| h.is_empty()) {
        return Err(DecodeError::MissingHeader);
    }

    let rows = data
        .into_iter()
        .map(|(source_row, cells)| {
            let named = headers
                .iter()
                .zip(cells)
                .filter(|(header, _)| !header.is_empty())
                .map(|(header, value)| (header.clone(), value))
                .collect();
            RawRow::new(source_row, named)
        })
        .filter(|row| !row.is_blank())
        .collect();

    Ok(rows)
}

fn cell_from_data(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(text) => CellValue::Text(text.clone()),
        Data::Float(n) => CellValue::Number(*n),
        Data::Int(n) => CellValue::Number(*n as f64),
        // 日期单元格按日序号处理
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::Error(_) => CellValue::Empty,
        other => CellValue::Text(other.to_string()),
    }
}

// ==========================================
// 编码
// ==========================================

fn format_date(date: NaiveDate) -> String {
    date.format(EXPORT_DATE_FORMAT).to_string()
}

fn optional_text(value: &Option<String>) -> CellValue {
    match value.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => CellValue::Text(text.to_string()),
        _ => CellValue::Empty,
    }
}

/// 员工记录 → 按列规格排列的单元格
pub fn employee_cells(record: &EmployeeFields) -> Vec<CellValue> {
    EMPLOYEE_COLUMNS
        .iter()
        .map(|spec| match spec.field {
            EmployeeField::EmployeeNo => CellValue::Text(record.employee_no.clone()),
            EmployeeField::Name => CellValue::Text(record.name.clone()),
            EmployeeField::Gender => CellValue::Text(record.gender.label().to_string()),
            EmployeeField::Age => record
                .age
                .map(|age| CellValue::Number(age as f64))
                .unwrap_or(CellValue::Empty),
            EmployeeField::Phone => optional_text(&record.phone),
            EmployeeField::Email => optional_text(&record.email),
            EmployeeField::Department => optional_text(&record.department),
            EmployeeField::Position => optional_text(&record.position),
            EmployeeField::Level => optional_text(&record.level),
            EmployeeField::HireDate => record
                .hire_date
                .map(|d| CellValue::Text(format_date(d)))
                .unwrap_or(CellValue::Empty),
            EmployeeField::Status => CellValue::Text(record.status.label().to_string()),
        })
        .collect()
}

fn encode_xlsx(rows: &[Vec<CellValue>], sheet_name: &str) -> ImportResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    for (col, spec) in EMPLOYEE_COLUMNS.iter().enumerate() {
        let col = col as u16;
        worksheet.set_column_width(col, spec.width)?;
        worksheet.write_string_with_format(0, col, spec.label, &header_format)?;
    }

    for (idx, cells) in rows.iter().enumerate() {
        let row = (idx + 1) as u32;
        for (col, cell) in cells.iter().enumerate() {
            let col = col as u16;
            match cell {
                CellValue::Empty => {}
                CellValue::Text(text) => {
                    worksheet.write_string(row, col, text)?;
                }
                CellValue::Number(n) => {
                    worksheet.write_number(row, col, *n)?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn encode_csv(rows: &[Vec<CellValue>]) -> ImportResult<Vec<u8>> {
    // BOM 便于 Excel 正确识别 UTF-8
    let mut writer = WriterBuilder::new().from_writer(UTF8_BOM.to_vec());

    writer.write_record(EMPLOYEE_COLUMNS.iter().map(|spec| spec.label))?;
    for cells in rows {
        writer.write_record(cells.iter().map(CellValue::as_text))?;
    }

    writer
        .into_inner()
        .map_err(|e| ImportError::ExportEncoding(e.to_string()))
}

fn template_records() -> Vec<EmployeeFields> {
    vec![
        EmployeeFields {
            employee_no: "EMP001".to_string(),
            name: "张三".to_string(),
            gender: Gender::Male,
            age: Some(28),
            phone: Some("13800138000".to_string()),
            email: Some("zhangsan@example.com".to_string()),
            department: Some("技术部".to_string()),
            position: Some("前端工程师".to_string()),
            level: Some("3B".to_string()),
            hire_date: NaiveDate::from_ymd_opt(2023, 1, 15),
            status: EmployeeStatus::Active,
        },
        EmployeeFields {
            employee_no: "EMP002".to_string(),
            name: "李四".to_string(),
            gender: Gender::Female,
            age: Some(26),
            phone: Some("13800138001".to_string()),
            email: Some("lisi@example.com".to_string()),
            department: Some("产品部".to_string()),
            position: Some("产品经理".to_string()),
            level: Some("4B".to_string()),
            hire_date: NaiveDate::from_ymd_opt(2023, 3, 20),
            status: EmployeeStatus::Active,
        },
    ]
}
