// ==========================================
// 员工信息管理 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// DecodeError: 整批致命，不进入逐行处理
// ImportError: 导入/导出流程的顶层错误
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 文档解码错误（整批拒绝）
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("文件内容为空")]
    EmptyInput,

    #[error("无法识别的文件格式（仅支持 .xlsx/.xls/.csv）")]
    UnrecognizedFormat,

    #[error("Excel 解析失败: {0}")]
    WorkbookParse(String),

    #[error("CSV 解析失败: {0}")]
    CsvParse(String),

    #[error("Excel 文件无工作表")]
    NoWorksheet,

    #[error("文件缺少表头行")]
    MissingHeader,

    #[error("文件为空：仅包含表头，没有数据行")]
    NoDataRows,
}

impl From<csv::Error> for DecodeError {
    fn from(err: csv::Error) -> Self {
        DecodeError::CsvParse(err.to_string())
    }
}

/// 导入/导出错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("导出文件生成失败: {0}")]
    ExportEncoding(String),

    #[error("数据访问失败: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<rust_xlsxwriter::XlsxError> for ImportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ImportError::ExportEncoding(err.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::ExportEncoding(err.to_string())
    }
}

impl ImportError {
    /// 是否为文档解码错误（调用方据此返回“请求被拒绝”）
    pub fn is_decode(&self) -> bool {
        matches!(self, ImportError::Decode(_))
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
