// ==========================================
// 员工信息管理 - 员工存储 Trait
// ==========================================
// 职责: 定义导入/导出所需的持久化接口（不包含实现）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::domain::employee::{Employee, EmployeeFields, EmployeeFilter};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// EmployeeStore Trait
// ==========================================
// 实现者: EmployeeRepository（rusqlite）、InMemoryEmployeeStore（测试替身）
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// 按工号查询
    ///
    /// # 返回
    /// - Ok(Some(Employee)): 找到记录
    /// - Ok(None): 未找到
    async fn find_by_employee_no(&self, employee_no: &str) -> RepositoryResult<Option<Employee>>;

    /// 新建员工
    ///
    /// # 返回
    /// - Err(UniqueConstraintViolation): 工号已存在
    async fn create(&self, fields: EmployeeFields) -> RepositoryResult<Employee>;

    /// 按工号全字段覆写
    ///
    /// # 说明
    /// - fields 中为 None 的可选字段会被清空
    /// - id / created_at 保持不变
    ///
    /// # 返回
    /// - Err(NotFound): 工号不存在
    async fn update(&self, employee_no: &str, fields: EmployeeFields)
        -> RepositoryResult<Employee>;

    /// 按筛选条件查询全部（工号升序）
    async fn list_all(&self, filter: &EmployeeFilter) -> RepositoryResult<Vec<Employee>>;
}
