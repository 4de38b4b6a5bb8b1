// ==========================================
// 员工信息管理 - 员工导入器实现
// ==========================================
// 职责: 整合导入流程，从文档字节到存储
// 流程: 解码 → 归一 → 校验 → 对账落库 → 汇总
// 行处理严格顺序执行，同一文档内重复工号以后出现者为准
// ==========================================

use crate::domain::employee::EmployeeFilter;
use crate::domain::import::{ImportOutcome, RawRow, ReconcileAction, RowError};
use crate::importer::employee_importer_trait::{EmployeeImporter, FieldNormalizer, RecordValidator};
use crate::importer::error::ImportResult;
use crate::importer::field_normalizer::FieldNormalizerImpl;
use crate::importer::reconciler::Reconciler;
use crate::importer::record_validator::RecordValidatorImpl;
use crate::importer::tabular_codec::{DocumentFormat, TabularCodec};
use crate::repository::employee_store::EmployeeStore;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// EmployeeImporterImpl
// ==========================================
pub struct EmployeeImporterImpl<S: EmployeeStore + ?Sized> {
    // 数据访问层
    store: Arc<S>,

    // 导入组件
    codec: TabularCodec,
    normalizer: Box<dyn FieldNormalizer>,
    validator: Box<dyn RecordValidator>,
    reconciler: Reconciler<S>,
}

impl<S: EmployeeStore + ?Sized> EmployeeImporterImpl<S> {
    /// 使用默认组件创建导入器
    pub fn new(store: Arc<S>) -> Self {
        Self::with_components(
            store,
            Box::new(FieldNormalizerImpl::new()),
            Box::new(RecordValidatorImpl::new()),
        )
    }

    /// 指定归一器/校验器创建导入器
    ///
    /// # 参数
    /// - store: 员工存储
    /// - normalizer: 字段归一器
    /// - validator: 记录校验器
    pub fn with_components(
        store: Arc<S>,
        normalizer: Box<dyn FieldNormalizer>,
        validator: Box<dyn RecordValidator>,
    ) -> Self {
        Self {
            reconciler: Reconciler::new(store.clone()),
            store,
            codec: TabularCodec::new(),
            normalizer,
            validator,
        }
    }

    /// 处理单行: 归一 → 校验 → 对账
    ///
    /// 失败时返回 RowError（含原始行快照），不中断批次
    async fn process_row(&self, row: &RawRow) -> Result<ReconcileAction, RowError> {
        let record = self.normalizer.normalize(row);

        let fields = self.validator.validate(&record).map_err(|failure| {
            warn!(row = row.source_row, reason = %failure, "行校验失败");
            RowError {
                row: row.source_row,
                message: failure.to_string(),
                data: row.snapshot(),
            }
        })?;

        match self.reconciler.reconcile(fields).await {
            Ok((employee, action)) => {
                debug!(
                    row = row.source_row,
                    employee_no = %employee.employee_no,
                    action = ?action,
                    "行处理完成"
                );
                Ok(action)
            }
            Err(e) => {
                warn!(row = row.source_row, error = %e, "行落库失败");
                Err(RowError {
                    row: row.source_row,
                    message: e.to_string(),
                    data: row.snapshot(),
                })
            }
        }
    }
}

#[async_trait]
impl<S: EmployeeStore + ?Sized> EmployeeImporter for EmployeeImporterImpl<S> {
    #[instrument(skip(self, bytes), fields(batch_id))]
    async fn import_all(&self, bytes: &[u8]) -> ImportResult<ImportOutcome> {
        let start_time = Instant::now();
        let batch_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("batch_id", batch_id.as_str());

        info!(batch_id = %batch_id, bytes = bytes.len(), "开始导入员工数据");

        // === 步骤 1: 解码 ===
        let rows = self.codec.decode(bytes).map_err(|e| {
            error!(error = %e, "文件解析失败");
            e
        })?;
        info!(total_rows = rows.len(), "文件解析完成");

        // === 步骤 2: 逐行处理（顺序执行） ===
        let mut outcome = ImportOutcome::default();
        for row in &rows {
            match self.process_row(row).await {
                Ok(action) => outcome.record_success(action),
                Err(row_error) => outcome.record_failure(row_error),
            }
        }

        info!(
            batch_id = %batch_id,
            success = outcome.success_count,
            failed = outcome.failed_count,
            created = outcome.created_count,
            updated = outcome.updated_count,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "员工数据导入完成"
        );

        Ok(outcome)
    }

    #[instrument(skip(self, filter))]
    async fn export_all(
        &self,
        filter: &EmployeeFilter,
        format: DocumentFormat,
        sheet_name: &str,
    ) -> ImportResult<Vec<u8>> {
        let employees = self.store.list_all(filter).await?;
        let records: Vec<_> = employees.iter().map(|e| e.fields()).collect();

        let bytes = self
            .codec
            .encode(&records, format, sheet_name)?;

        info!(count = records.len(), bytes = bytes.len(), "员工数据导出完成");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::error::{DecodeError, ImportError};
    use crate::repository::memory_store::InMemoryEmployeeStore;

    fn csv(lines: &[&str]) -> Vec<u8> {
        lines.join("\n").into_bytes()
    }

    #[tokio::test]
    async fn test_import_counts_and_row_numbers() {
        let store = Arc::new(InMemoryEmployeeStore::new());
        let importer = EmployeeImporterImpl::new(store.clone());

        let bytes = csv(&[
            "工号,姓名,性别",
            "EMP001,张三,男",
            "EMP002,,女",
            "EMP003,王五,unknown",
        ]);
        let outcome = importer.import_all(&bytes).await.unwrap();

        assert_eq!(outcome.success_count, 1);
        assert_eq!(outcome.failed_count, 2);
        assert_eq!(outcome.errors[0].row, 3);
        assert_eq!(outcome.errors[0].message, "姓名不能为空");
        assert_eq!(outcome.errors[0].data["工号"], "EMP002");
        assert_eq!(outcome.errors[1].row, 4);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_header_only_rejected() {
        let store = Arc::new(InMemoryEmployeeStore::new());
        let importer = EmployeeImporterImpl::new(store.clone());

        let err = importer.import_all(&csv(&["工号,姓名,性别"])).await.unwrap_err();
        assert!(matches!(err, ImportError::Decode(DecodeError::NoDataRows)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_export_uses_sheet_name_and_filter() {
        let store = Arc::new(InMemoryEmployeeStore::new());
        let importer = EmployeeImporterImpl::new(store);

        importer
            .import_all(&csv(&[
                "工号,姓名,性别,部门",
                "EMP002,李四,女,产品部",
                "EMP001,张三,男,技术部",
            ]))
            .await
            .unwrap();

        let filter = EmployeeFilter {
            department: Some("技术部".to_string()),
            ..Default::default()
        };
        let bytes = importer
            .export_all(&filter, DocumentFormat::Csv, "导出")
            .await
            .unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("EMP001,张三,男"));
    }
}
