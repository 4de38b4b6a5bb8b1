// ==========================================
// 员工信息管理 - 对账器
// ==========================================
// 按工号查找现有记录:
// - 存在 → 全字段覆写（未提供的可选字段清空）
// - 不存在 → 新建
// ==========================================

use crate::domain::employee::{Employee, EmployeeFields};
use crate::domain::import::ReconcileAction;
use crate::repository::employee_store::EmployeeStore;
use crate::repository::error::RepositoryResult;
use std::sync::Arc;
use tracing::{debug, instrument};

pub struct Reconciler<S: EmployeeStore + ?Sized> {
    store: Arc<S>,
}

impl<S: EmployeeStore + ?Sized> Reconciler<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// 新建或覆写一条员工记录
    ///
    /// # 返回
    /// - Ok((Employee, Created)): 工号此前不存在
    /// - Ok((Employee, Updated)): 已覆写同工号记录
    /// - Err: 存储错误（调用方按单行失败处理）
    #[instrument(skip(self, record), fields(employee_no = %record.employee_no))]
    pub async fn reconcile(
        &self,
        record: EmployeeFields,
    ) -> RepositoryResult<(Employee, ReconcileAction)> {
        match self.store.find_by_employee_no(&record.employee_no).await? {
            Some(existing) => {
                debug!(id = existing.id, "工号已存在，覆写");
                let employee = self.store.update(&existing.employee_no, record).await?;
                Ok((employee, ReconcileAction::Updated))
            }
            None => {
                let employee = self.store.create(record).await?;
                debug!(id = employee.id, "新建员工");
                Ok((employee, ReconcileAction::Created))
            }
        }
    }
}
