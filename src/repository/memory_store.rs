// ==========================================
// 员工信息管理 - 内存员工存储
// ==========================================
// 用途: 测试/演练替身，语义与 EmployeeRepository 对齐
// - 工号唯一（create 重复 → UniqueConstraintViolation）
// - update 全字段覆写，保留 id / created_at
// - list_all 按工号升序
// ==========================================

use crate::domain::employee::{Employee, EmployeeFields, EmployeeFilter};
use crate::repository::employee_store::EmployeeStore;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Mutex;

#[derive(Default)]
struct StoreInner {
    next_id: i64,
    // 以工号为键，BTreeMap 天然有序
    employees: BTreeMap<String, Employee>,
}

#[derive(Default)]
pub struct InMemoryEmployeeStore {
    inner: Mutex<StoreInner>,
}

impl InMemoryEmployeeStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> RepositoryResult<std::sync::MutexGuard<'_, StoreInner>> {
        self.inner
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 当前记录数
    pub fn len(&self) -> usize {
        self.inner.lock().map(|g| g.employees.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn build_employee(id: i64, fields: EmployeeFields, created_at: chrono::DateTime<Utc>) -> Employee {
    Employee {
        id,
        employee_no: fields.employee_no,
        name: fields.name,
        gender: fields.gender,
        age: fields.age,
        phone: fields.phone,
        email: fields.email,
        department: fields.department,
        position: fields.position,
        level: fields.level,
        hire_date: fields.hire_date,
        status: fields.status,
        created_at,
        updated_at: Utc::now(),
    }
}

#[async_trait]
impl EmployeeStore for InMemoryEmployeeStore {
    async fn find_by_employee_no(&self, employee_no: &str) -> RepositoryResult<Option<Employee>> {
        Ok(self.lock()?.employees.get(employee_no).cloned())
    }

    async fn create(&self, fields: EmployeeFields) -> RepositoryResult<Employee> {
        let mut inner = self.lock()?;
        if inner.employees.contains_key(&fields.employee_no) {
            return Err(RepositoryError::UniqueConstraintViolation(format!(
                "UNIQUE constraint failed: employee.employee_no ({})",
                fields.employee_no
            )));
        }

        inner.next_id += 1;
        let employee = build_employee(inner.next_id, fields, Utc::now());
        inner
            .employees
            .insert(employee.employee_no.clone(), employee.clone());
        Ok(employee)
    }

    async fn update(
        &self,
        employee_no: &str,
        fields: EmployeeFields,
    ) -> RepositoryResult<Employee> {
        let mut inner = self.lock()?;
        let existing = inner
            .employees
            .remove(employee_no)
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "Employee".to_string(),
                id: employee_no.to_string(),
            })?;

        if fields.employee_no != employee_no && inner.employees.contains_key(&fields.employee_no) {
            let conflict = fields.employee_no.clone();
            inner.employees.insert(existing.employee_no.clone(), existing);
            return Err(RepositoryError::UniqueConstraintViolation(format!(
                "UNIQUE constraint failed: employee.employee_no ({})",
                conflict
            )));
        }

        let employee = build_employee(existing.id, fields, existing.created_at);
        inner
            .employees
            .insert(employee.employee_no.clone(), employee.clone());
        Ok(employee)
    }

    async fn list_all(&self, filter: &EmployeeFilter) -> RepositoryResult<Vec<Employee>> {
        Ok(self
            .lock()?
            .employees
            .values()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect())
    }
}
