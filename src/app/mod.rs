// ==========================================
// 员工信息管理 - 应用层
// ==========================================
// 职责: 组装仓储/配置/导入器/API
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState, DB_PATH_ENV};
