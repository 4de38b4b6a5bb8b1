// ==========================================
// 员工信息管理 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写
// 存储: config_kv 表 (key-value + scope)，仅使用 global 作用域
// ==========================================

use crate::config::import_config_trait::{ConfigError, ImportConfigReader};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 从已有连接创建 ConfigManager（对连接再次应用统一 PRAGMA，幂等）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, ConfigError> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, ConfigError> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 写入 global 配置（存在则覆写）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at)
             VALUES ('global', ?1, ?2, datetime('now'))
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 获取所有 global 配置
    pub fn get_config_snapshot(&self) -> Result<BTreeMap<String, String>, ConfigError> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut snapshot = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            snapshot.insert(key, value);
        }
        Ok(snapshot)
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, ConfigError> {
        Ok(self
            .get_global_config_value(key)?
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| default.to_string()))
    }
}

#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_max_upload_bytes(&self) -> Result<u64, ConfigError> {
        let default = defaults::MAX_FILE_BYTES.to_string();
        let value = self.get_config_or_default(config_keys::MAX_FILE_BYTES, &default)?;
        Ok(value.trim().parse::<u64>().unwrap_or(defaults::MAX_FILE_BYTES))
    }

    async fn get_export_sheet_name(&self) -> Result<String, ConfigError> {
        self.get_config_or_default(config_keys::EXPORT_SHEET_NAME, defaults::EXPORT_SHEET_NAME)
    }

    async fn get_template_sheet_name(&self) -> Result<String, ConfigError> {
        self.get_config_or_default(
            config_keys::TEMPLATE_SHEET_NAME,
            defaults::TEMPLATE_SHEET_NAME,
        )
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 导入
    pub const MAX_FILE_BYTES: &str = "import.max_file_bytes";

    // 导出 / 模板
    pub const EXPORT_SHEET_NAME: &str = "export.sheet_name";
    pub const TEMPLATE_SHEET_NAME: &str = "template.sheet_name";
}

// ==========================================
// 配置默认值
// ==========================================
pub mod defaults {
    pub const MAX_FILE_BYTES: u64 = 5 * 1024 * 1024;
    pub const EXPORT_SHEET_NAME: &str = "员工信息";
    pub const TEMPLATE_SHEET_NAME: &str = "员工信息模板";
}
