// ==========================================
// 员工信息管理 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入/导出所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use async_trait::async_trait;
use std::error::Error;

pub type ConfigError = Box<dyn Error + Send + Sync>;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// 上传文件大小上限（字节）
    ///
    /// # 默认值
    /// - 5242880 (5 MiB)
    async fn get_max_upload_bytes(&self) -> Result<u64, ConfigError>;

    /// 导出工作表名
    ///
    /// # 默认值
    /// - 员工信息
    async fn get_export_sheet_name(&self) -> Result<String, ConfigError>;

    /// 模板工作表名
    ///
    /// # 默认值
    /// - 员工信息模板
    async fn get_template_sheet_name(&self) -> Result<String, ConfigError>;
}
