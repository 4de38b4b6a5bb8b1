// ==========================================
// 员工信息管理 - 员工导入 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// 管道: 解码 → 归一 → 校验 → 对账落库 → 汇总报告
// ==========================================

use crate::domain::employee::{EmployeeFields, EmployeeFilter};
use crate::domain::import::{ImportOutcome, NormalizedRecord, RawRow};
use crate::importer::error::ImportResult;
use crate::importer::record_validator::ValidationFailure;
use crate::importer::tabular_codec::DocumentFormat;
use async_trait::async_trait;

// ==========================================
// EmployeeImporter Trait
// ==========================================
// 用途: 员工批量导入/导出主接口
// 实现者: EmployeeImporterImpl
#[async_trait]
pub trait EmployeeImporter: Send + Sync {
    /// 导入一份员工表格
    ///
    /// # 参数
    /// - bytes: 文档原始字节（.xlsx/.xls/.csv）
    ///
    /// # 返回
    /// - Ok(ImportOutcome): 逐行处理结果（单行失败不影响其他行）
    /// - Err(ImportError::Decode): 文档无法解析或无数据行，整批拒绝
    ///
    /// # 流程
    /// 1. 解码为原始行
    /// 2. 逐行: 归一 → 校验 → 按工号对账（新建或覆写）
    /// 3. 汇总成功/失败计数与失败明细
    async fn import_all(&self, bytes: &[u8]) -> ImportResult<ImportOutcome>;

    /// 导出员工（按工号升序）
    ///
    /// # 参数
    /// - filter: 过滤条件（姓名/工号包含，部门/状态精确）
    /// - format: 输出格式
    /// - sheet_name: 工作表名（仅 xlsx 生效）
    async fn export_all(
        &self,
        filter: &EmployeeFilter,
        format: DocumentFormat,
        sheet_name: &str,
    ) -> ImportResult<Vec<u8>>;
}

// ==========================================
// FieldNormalizer Trait
// ==========================================
// 用途: 原始行 → 候选记录（纯函数，不失败）
// 实现者: FieldNormalizerImpl
pub trait FieldNormalizer: Send + Sync {
    /// 归一化单行
    ///
    /// 未命中词表的性别/状态原样保留，由校验器拒绝
    fn normalize(&self, row: &RawRow) -> NormalizedRecord;
}

// ==========================================
// RecordValidator Trait
// ==========================================
// 用途: 候选记录 → 可落库字段
// 实现者: RecordValidatorImpl
pub trait RecordValidator: Send + Sync {
    /// 校验候选记录
    ///
    /// # 返回
    /// - Ok(EmployeeFields): 全部规则通过
    /// - Err(ValidationFailure): 第一条未通过的规则
    fn validate(&self, record: &NormalizedRecord) -> Result<EmployeeFields, ValidationFailure>;
}
