// ==========================================
// 员工信息管理 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 员工花名册批量导入/导出
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 表格编解码与导入管道
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 组件装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    Employee, EmployeeFields, EmployeeFilter, EmployeeStatus, Gender, ImportOutcome, RowError,
};

// 导入管道
pub use importer::{DocumentFormat, EmployeeImporter, EmployeeImporterImpl, TabularCodec};

// 仓储
pub use repository::{EmployeeRepository, EmployeeStore, InMemoryEmployeeStore};

// API
pub use api::{ExportFile, ImportApi, ImportApiResponse};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "员工信息管理";
