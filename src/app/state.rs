// ==========================================
// 员工信息管理 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// 所有组件共享同一个 SQLite 连接
// ==========================================

use rusqlite::Connection;
use std::sync::{Arc, Mutex};

use crate::api::ImportApi;
use crate::config::ConfigManager;
use crate::db::{ensure_schema, open_sqlite_connection};
use crate::importer::EmployeeImporterImpl;
use crate::repository::EmployeeRepository;

/// 应用状态
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 员工仓储
    pub employee_repo: Arc<EmployeeRepository>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 员工导入导出API
    pub import_api: Arc<ImportApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径（不存在时自动创建并建表）
    ///
    /// # 返回
    /// - Ok(AppState): 应用状态实例
    /// - Err(String): 初始化错误
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!(db_path = %db_path, "初始化AppState");

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        ensure_schema(&conn).map_err(|e| format!("数据库建表失败: {}", e))?;

        Self::from_connection(db_path, Arc::new(Mutex::new(conn)))
    }

    /// 从已有连接创建（连接须已建表）
    pub fn from_connection(
        db_path: String,
        conn: Arc<Mutex<Connection>>,
    ) -> Result<Self, String> {
        let employee_repo = Arc::new(EmployeeRepository::from_connection(conn.clone()));
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn)
                .map_err(|e| format!("无法初始化配置管理器: {}", e))?,
        );

        let importer = Arc::new(EmployeeImporterImpl::new(employee_repo.clone()));
        let import_api = Arc::new(ImportApi::new(importer, config_manager.clone()));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            employee_repo,
            config_manager,
            import_api,
        })
    }
}

// ==========================================
// 默认数据库路径
// ==========================================

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "EMPLOYEE_ROSTER_DB_PATH";

/// 获取默认数据库路径
///
/// # 优先级
/// 1. 环境变量 EMPLOYEE_ROSTER_DB_PATH
/// 2. 用户数据目录/employee-roster/employee_roster.db
/// 3. ./employee_roster.db
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./employee_roster.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("employee-roster");
        // 目录创建失败时退回当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("employee_roster.db");
        }
    }

    path.to_string_lossy().to_string()
}
