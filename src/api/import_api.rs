// ==========================================
// 员工信息管理 - 导入导出API
// ==========================================
// 职责: 封装员工导入/导出/模板下载
// - 上传前校验扩展名与文件大小（不做解码）
// - 组装响应消息与下载文件名
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ImportConfigReader;
use crate::domain::employee::EmployeeFilter;
use crate::domain::import::ImportOutcome;
use crate::importer::{DocumentFormat, EmployeeImporter, TabularCodec};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument, warn};

const EXPORT_FILE_STEM: &str = "员工信息";
const TEMPLATE_FILE_STEM: &str = "员工信息导入模板";

/// 导入API响应
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportApiResponse {
    /// 导入报告（successCount / failedCount / errors ...）
    #[serde(flatten)]
    pub outcome: ImportOutcome,
    /// 汇总消息
    pub message: String,
}

impl ImportApiResponse {
    fn from_outcome(outcome: ImportOutcome) -> Self {
        let message = format!(
            "导入完成：成功 {} 条，失败 {} 条",
            outcome.success_count, outcome.failed_count
        );
        Self { outcome, message }
    }
}

/// 下载文件
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// 导入导出API
pub struct ImportApi {
    importer: Arc<dyn EmployeeImporter>,
    config: Arc<dyn ImportConfigReader>,
    codec: TabularCodec,
}

impl ImportApi {
    /// 创建新的ImportApi实例
    pub fn new(importer: Arc<dyn EmployeeImporter>, config: Arc<dyn ImportConfigReader>) -> Self {
        Self {
            importer,
            config,
            codec: TabularCodec::new(),
        }
    }

    /// 导入员工文件
    ///
    /// # 参数
    /// - file_path: 文件路径（.xlsx / .xls / .csv）
    ///
    /// # 返回
    /// - Ok(ImportApiResponse): 导入报告（含逐行失败明细）
    /// - Err(ApiError::InvalidInput): 扩展名不支持、文件过大或不可读
    /// - Err(ApiError::ImportError): 文档无法解析或无数据行
    #[instrument(skip(self))]
    pub async fn import_employees(&self, file_path: &str) -> ApiResult<ImportApiResponse> {
        let path = Path::new(file_path);
        check_extension(path)?;

        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| ApiError::InvalidInput(format!("无法读取文件 {}: {}", file_path, e)))?;

        let max_bytes = self
            .config
            .get_max_upload_bytes()
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        if metadata.len() > max_bytes {
            warn!(size = metadata.len(), max_bytes, "上传文件超过大小限制");
            return Err(ApiError::InvalidInput(format!(
                "文件大小 {} 字节超过限制 {} 字节",
                metadata.len(),
                max_bytes
            )));
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ApiError::InvalidInput(format!("无法读取文件 {}: {}", file_path, e)))?;

        self.import_bytes(&bytes).await
    }

    /// 导入已读入内存的文档（不做扩展名/大小校验）
    pub async fn import_bytes(&self, bytes: &[u8]) -> ApiResult<ImportApiResponse> {
        let outcome = self.importer.import_all(bytes).await?;
        let response = ImportApiResponse::from_outcome(outcome);
        info!(message = %response.message, "导入请求完成");
        Ok(response)
    }

    /// 导出员工
    ///
    /// # 返回
    /// - ExportFile: 文件名形如 员工信息_2024-05-01.xlsx
    #[instrument(skip(self))]
    pub async fn export_employees(
        &self,
        filter: &EmployeeFilter,
        format: DocumentFormat,
    ) -> ApiResult<ExportFile> {
        check_output_format(format)?;

        let sheet_name = self
            .config
            .get_export_sheet_name()
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        let bytes = self.importer.export_all(filter, format, &sheet_name).await?;
        let file_name = format!(
            "{}_{}.{}",
            EXPORT_FILE_STEM,
            Local::now().format("%Y-%m-%d"),
            format.extension()
        );

        Ok(ExportFile {
            file_name,
            content_type: format.content_type(),
            bytes,
        })
    }

    /// 下载导入模板（两条示例记录）
    pub async fn download_template(&self, format: DocumentFormat) -> ApiResult<ExportFile> {
        check_output_format(format)?;

        let sheet_name = self
            .config
            .get_template_sheet_name()
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        let bytes = self.codec.template(format, &sheet_name)?;

        Ok(ExportFile {
            file_name: format!("{}.{}", TEMPLATE_FILE_STEM, format.extension()),
            content_type: format.content_type(),
            bytes,
        })
    }
}

fn check_extension(path: &Path) -> ApiResult<()> {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(DocumentFormat::from_extension)
        .map(|_| ())
        .ok_or_else(|| {
            ApiError::InvalidInput("只支持 Excel 文件 (.xlsx, .xls) 和 CSV 文件 (.csv)".to_string())
        })
}

fn check_output_format(format: DocumentFormat) -> ApiResult<()> {
    match format {
        DocumentFormat::Xlsx | DocumentFormat::Csv => Ok(()),
        DocumentFormat::Xls => Err(ApiError::InvalidInput(
            "导出仅支持 .xlsx 或 .csv".to_string(),
        )),
    }
}
