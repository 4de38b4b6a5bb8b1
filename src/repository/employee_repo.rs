// ==========================================
// 员工信息管理 - 员工仓储（rusqlite）
// ==========================================
// 职责: 管理 employee 表的读写
// 红线: 不含业务逻辑，只负责数据访问
// 约束: 所有查询使用参数化
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::employee::{non_empty, Employee, EmployeeFields, EmployeeFilter};
use crate::domain::types::{EmployeeStatus, Gender};
use crate::repository::employee_store::EmployeeStore;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

const SELECT_COLUMNS: &str = r#"
    id, employee_no, name, gender, age, phone, email,
    department, position, level, hire_date, status,
    created_at, updated_at
"#;

const DATE_FORMAT: &str = "%Y-%m-%d";

// ==========================================
// EmployeeRow - 行读取中间结构
// ==========================================
// 枚举/日期在锁外转换，转换失败归为 FieldValueError
struct EmployeeRow {
    id: i64,
    employee_no: String,
    name: String,
    gender: String,
    age: Option<i32>,
    phone: Option<String>,
    email: Option<String>,
    department: Option<String>,
    position: Option<String>,
    level: Option<String>,
    hire_date: Option<String>,
    status: String,
    created_at: String,
    updated_at: String,
}

impl EmployeeRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            employee_no: row.get(1)?,
            name: row.get(2)?,
            gender: row.get(3)?,
            age: row.get(4)?,
            phone: row.get(5)?,
            email: row.get(6)?,
            department: row.get(7)?,
            position: row.get(8)?,
            level: row.get(9)?,
            hire_date: row.get(10)?,
            status: row.get(11)?,
            created_at: row.get(12)?,
            updated_at: row.get(13)?,
        })
    }

    fn into_employee(self) -> RepositoryResult<Employee> {
        let gender = Gender::from_canonical(&self.gender).ok_or_else(|| {
            RepositoryError::FieldValueError {
                field: "gender".to_string(),
                message: format!("未知性别值: {}", self.gender),
            }
        })?;
        let status = EmployeeStatus::from_canonical(&self.status).ok_or_else(|| {
            RepositoryError::FieldValueError {
                field: "status".to_string(),
                message: format!("未知状态值: {}", self.status),
            }
        })?;
        let hire_date = match self.hire_date.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|e| {
                RepositoryError::FieldValueError {
                    field: "hire_date".to_string(),
                    message: format!("{}: {}", raw, e),
                }
            })?),
        };

        Ok(Employee {
            id: self.id,
            employee_no: self.employee_no,
            name: self.name,
            gender,
            age: self.age,
            phone: self.phone,
            email: self.email,
            department: self.department,
            position: self.position,
            level: self.level,
            hire_date,
            status,
            created_at: parse_timestamp("created_at", &self.created_at)?,
            updated_at: parse_timestamp("updated_at", &self.updated_at)?,
        })
    }
}

fn parse_timestamp(field: &str, raw: &str) -> RepositoryResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::FieldValueError {
            field: field.to_string(),
            message: format!("{}: {}", raw, e),
        })
}

// ==========================================
// EmployeeRepository - 员工仓储
// ==========================================
pub struct EmployeeRepository {
    conn: Arc<Mutex<Connection>>,
}

impl EmployeeRepository {
    /// 创建新的 EmployeeRepository 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn select_by_employee_no(
        conn: &Connection,
        employee_no: &str,
    ) -> RepositoryResult<Option<EmployeeRow>> {
        let sql = format!("SELECT {} FROM employee WHERE employee_no = ?1", SELECT_COLUMNS);
        let row = conn
            .query_row(&sql, params![employee_no], EmployeeRow::from_row)
            .optional()?;
        Ok(row)
    }

    /// 组装筛选 SQL（返回 WHERE 子句与参数）
    fn build_filter(filter: &EmployeeFilter) -> (String, Vec<String>) {
        let mut clauses = Vec::new();
        let mut values = Vec::new();

        if let Some(name) = non_empty(&filter.name) {
            values.push(name.to_string());
            clauses.push(format!("instr(name, ?{}) > 0", values.len()));
        }
        if let Some(no) = non_empty(&filter.employee_no) {
            values.push(no.to_string());
            clauses.push(format!("instr(employee_no, ?{}) > 0", values.len()));
        }
        if let Some(department) = non_empty(&filter.department) {
            values.push(department.to_string());
            clauses.push(format!("department = ?{}", values.len()));
        }
        if let Some(status) = non_empty(&filter.status) {
            values.push(status.to_string());
            clauses.push(format!("status = ?{}", values.len()));
        }

        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };
        (where_clause, values)
    }
}

#[async_trait]
impl EmployeeStore for EmployeeRepository {
    async fn find_by_employee_no(&self, employee_no: &str) -> RepositoryResult<Option<Employee>> {
        let row = {
            let conn = self.get_conn()?;
            Self::select_by_employee_no(&conn, employee_no)?
        };
        row.map(EmployeeRow::into_employee).transpose()
    }

    async fn create(&self, fields: EmployeeFields) -> RepositoryResult<Employee> {
        let now = Utc::now().to_rfc3339();
        let row = {
            let conn = self.get_conn()?;
            conn.execute(
                r#"
                INSERT INTO employee (
                    employee_no, name, gender, age, phone, email,
                    department, position, level, hire_date, status,
                    created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)
                "#,
                params![
                    fields.employee_no,
                    fields.name,
                    fields.gender.as_str(),
                    fields.age,
                    fields.phone,
                    fields.email,
                    fields.department,
                    fields.position,
                    fields.level,
                    fields.hire_date.map(|d| d.format(DATE_FORMAT).to_string()),
                    fields.status.as_str(),
                    now,
                ],
            )?;
            Self::select_by_employee_no(&conn, &fields.employee_no)?
        };

        row.ok_or_else(|| RepositoryError::NotFound {
            entity: "Employee".to_string(),
            id: fields.employee_no.clone(),
        })?
        .into_employee()
    }

    async fn update(
        &self,
        employee_no: &str,
        fields: EmployeeFields,
    ) -> RepositoryResult<Employee> {
        let now = Utc::now().to_rfc3339();
        let row = {
            let conn = self.get_conn()?;
            let changed = conn.execute(
                r#"
                UPDATE employee SET
                    employee_no = ?1, name = ?2, gender = ?3, age = ?4,
                    phone = ?5, email = ?6, department = ?7, position = ?8,
                    level = ?9, hire_date = ?10, status = ?11, updated_at = ?12
                WHERE employee_no = ?13
                "#,
                params![
                    fields.employee_no,
                    fields.name,
                    fields.gender.as_str(),
                    fields.age,
                    fields.phone,
                    fields.email,
                    fields.department,
                    fields.position,
                    fields.level,
                    fields.hire_date.map(|d| d.format(DATE_FORMAT).to_string()),
                    fields.status.as_str(),
                    now,
                    employee_no,
                ],
            )?;
            if changed == 0 {
                return Err(RepositoryError::NotFound {
                    entity: "Employee".to_string(),
                    id: employee_no.to_string(),
                });
            }
            Self::select_by_employee_no(&conn, &fields.employee_no)?
        };

        row.ok_or_else(|| RepositoryError::NotFound {
            entity: "Employee".to_string(),
            id: fields.employee_no.clone(),
        })?
        .into_employee()
    }

    async fn list_all(&self, filter: &EmployeeFilter) -> RepositoryResult<Vec<Employee>> {
        let (where_clause, values) = Self::build_filter(filter);
        let sql = format!(
            "SELECT {} FROM employee {} ORDER BY employee_no ASC",
            SELECT_COLUMNS, where_clause
        );

        let rows = {
            let conn = self.get_conn()?;
            let mut stmt = conn.prepare(&sql)?;
            let mapped = stmt.query_map(params_from_iter(values.iter()), EmployeeRow::from_row)?;
            let rows = mapped.collect::<rusqlite::Result<Vec<_>>>()?;
            rows
        };

        rows.into_iter().map(EmployeeRow::into_employee).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{configure_sqlite_connection, ensure_schema};

    fn setup_repo() -> EmployeeRepository {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        ensure_schema(&conn).unwrap();
        EmployeeRepository::from_connection(Arc::new(Mutex::new(conn)))
    }

    fn fields(no: &str, department: Option<&str>) -> EmployeeFields {
        EmployeeFields {
            employee_no: no.to_string(),
            name: "张三".to_string(),
            gender: Gender::Male,
            age: Some(28),
            phone: Some("13800138000".to_string()),
            email: None,
            department: department.map(str::to_string),
            position: None,
            level: Some("3B".to_string()),
            hire_date: NaiveDate::from_ymd_opt(2023, 1, 15),
            status: EmployeeStatus::Active,
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = setup_repo();
        let created = repo.create(fields("EMP001", Some("技术部"))).await.unwrap();
        assert_eq!(created.employee_no, "EMP001");
        assert_eq!(created.hire_date, NaiveDate::from_ymd_opt(2023, 1, 15));

        let found = repo.find_by_employee_no("EMP001").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.fields(), created.fields());

        assert!(repo.find_by_employee_no("EMP999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_duplicate_rejected() {
        let repo = setup_repo();
        repo.create(fields("EMP001", None)).await.unwrap();
        let err = repo.create(fields("EMP001", None)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::UniqueConstraintViolation(_)));
    }

    #[tokio::test]
    async fn test_update_overwrites_all_fields() {
        let repo = setup_repo();
        let created = repo.create(fields("EMP001", Some("A"))).await.unwrap();

        let mut next = fields("EMP001", None);
        next.phone = None;
        next.level = None;
        let updated = repo.update("EMP001", next).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.department, None);
        assert_eq!(updated.phone, None);
        assert_eq!(updated.level, None);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = setup_repo();
        let err = repo.update("EMP404", fields("EMP404", None)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_all_filter_and_order() {
        let repo = setup_repo();
        repo.create(fields("EMP003", Some("技术部"))).await.unwrap();
        repo.create(fields("EMP001", Some("技术部"))).await.unwrap();
        repo.create(fields("EMP002", Some("产品部"))).await.unwrap();

        let all = repo.list_all(&EmployeeFilter::default()).await.unwrap();
        let nos: Vec<_> = all.iter().map(|e| e.employee_no.as_str()).collect();
        assert_eq!(nos, vec!["EMP001", "EMP002", "EMP003"]);

        let tech = repo
            .list_all(&EmployeeFilter {
                department: Some("技术部".to_string()),
                employee_no: Some("00".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        let nos: Vec<_> = tech.iter().map(|e| e.employee_no.as_str()).collect();
        assert_eq!(nos, vec!["EMP001", "EMP003"]);
    }
}
