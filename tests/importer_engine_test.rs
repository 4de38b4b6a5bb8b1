// ==========================================
// 员工信息管理 - EmployeeImporter 集成测试
// ==========================================
// 覆盖: 部分失败隔离 / 幂等重导 / 全字段覆写 / 日序号换算
//       仅表头拒绝 / 同文档重复工号 / 导出再导入
// ==========================================

mod test_helpers;

use async_trait::async_trait;
use chrono::NaiveDate;
use employee_roster::domain::{Employee, EmployeeFields, EmployeeFilter, EmployeeStatus, Gender};
use employee_roster::importer::{
    DecodeError, DocumentFormat, EmployeeImporter, EmployeeImporterImpl, ImportError,
};
use employee_roster::repository::{
    EmployeeRepository, EmployeeStore, InMemoryEmployeeStore, RepositoryError, RepositoryResult,
};
use std::sync::Arc;
use test_helpers::{csv_document, employee_row, xlsx_document, XCell, HEADERS};

// ==========================================
// 辅助函数
// ==========================================
fn setup_sqlite() -> (tempfile::NamedTempFile, Arc<EmployeeRepository>) {
    let (temp_file, db_path) = test_helpers::create_test_db().expect("创建测试数据库失败");
    let repo = EmployeeRepository::new(&db_path).expect("创建Repository失败");
    (temp_file, Arc::new(repo))
}

async fn snapshot<S: EmployeeStore + ?Sized>(store: &S) -> Vec<EmployeeFields> {
    store
        .list_all(&EmployeeFilter::default())
        .await
        .unwrap()
        .iter()
        .map(Employee::fields)
        .collect()
}

async fn hire_date(store: &InMemoryEmployeeStore, employee_no: &str) -> Option<NaiveDate> {
    store
        .find_by_employee_no(employee_no)
        .await
        .unwrap()
        .and_then(|e| e.hire_date)
}

fn five_rows() -> Vec<Vec<&'static str>> {
    vec![
        employee_row("EMP001", "张三", "男"),
        employee_row("EMP002", "李四", "女"),
        employee_row("EMP003", "王五", "male"),
        employee_row("EMP004", "赵六", "Female"),
        employee_row("EMP005", "钱七", "其他"),
    ]
}

// ==========================================
// 测试用例
// ==========================================

#[tokio::test]
async fn test_partial_failure_isolation() {
    employee_roster::logging::init_test();
    let store = Arc::new(InMemoryEmployeeStore::new());
    let importer = EmployeeImporterImpl::new(store.clone());

    let mut rows = five_rows();
    rows[1][2] = "unknown";
    let outcome = importer
        .import_all(&csv_document(HEADERS, &rows))
        .await
        .unwrap();

    assert_eq!(outcome.success_count, 4);
    assert_eq!(outcome.failed_count, 1);
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].row, 3);
    assert!(outcome.errors[0].message.starts_with("性别值无效"));
    assert_eq!(outcome.errors[0].data["工号"], "EMP002");
    assert_eq!(outcome.errors[0].data["性别"], "unknown");

    // 失败行不落库
    assert!(store.find_by_employee_no("EMP002").await.unwrap().is_none());
    assert_eq!(store.len(), 4);
}

#[tokio::test]
async fn test_reimport_is_idempotent() {
    let (_temp, repo) = setup_sqlite();
    let importer = EmployeeImporterImpl::new(repo.clone());
    let document = csv_document(HEADERS, &five_rows());

    let first = importer.import_all(&document).await.unwrap();
    assert_eq!(first.created_count, 5);
    let after_first = snapshot(repo.as_ref()).await;

    let second = importer.import_all(&document).await.unwrap();
    assert_eq!(second.success_count, 5);
    assert_eq!(second.created_count, 0);
    assert_eq!(second.updated_count, 5);

    assert_eq!(snapshot(repo.as_ref()).await, after_first);
}

#[tokio::test]
async fn test_upsert_overwrites_every_field() {
    let (_temp, repo) = setup_sqlite();
    let importer = EmployeeImporterImpl::new(repo.clone());

    let headers = &["工号", "姓名", "性别", "部门", "状态"];
    importer
        .import_all(&csv_document(headers, &[vec!["EMP001", "A", "男", "技术部", "在职"]]))
        .await
        .unwrap();
    let created = repo.find_by_employee_no("EMP001").await.unwrap().unwrap();

    let outcome = importer
        .import_all(&csv_document(headers, &[vec!["EMP001", "B", "女", "", "离职"]]))
        .await
        .unwrap();
    assert_eq!(outcome.updated_count, 1);

    let all = repo.list_all(&EmployeeFilter::default()).await.unwrap();
    assert_eq!(all.len(), 1);
    let updated = &all[0];
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "B");
    assert_eq!(updated.gender, Gender::Female);
    assert_eq!(updated.status, EmployeeStatus::Inactive);
    // 未提供的可选字段被清空，而非保留旧值
    assert_eq!(updated.department, None);
}

#[tokio::test]
async fn test_upsert_replaces_department_value() {
    let (_temp, repo) = setup_sqlite();
    let importer = EmployeeImporterImpl::new(repo.clone());

    let headers = &["工号", "姓名", "性别", "部门"];
    importer
        .import_all(&csv_document(headers, &[vec!["EMP001", "张三", "男", "A"]]))
        .await
        .unwrap();
    let outcome = importer
        .import_all(&csv_document(headers, &[vec!["EMP001", "张三", "男", "B"]]))
        .await
        .unwrap();
    assert_eq!(outcome.updated_count, 1);

    let all = repo.list_all(&EmployeeFilter::default()).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].department.as_deref(), Some("B"));

    let stale = EmployeeFilter {
        department: Some("A".to_string()),
        ..Default::default()
    };
    assert!(repo.list_all(&stale).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_crlf_csv_reports_physical_rows() {
    let store = Arc::new(InMemoryEmployeeStore::new());
    let importer = EmployeeImporterImpl::new(store.clone());

    let document = "工号,姓名,性别\r\nEMP001,张三,男\r\nEMP002,李四,unknown\r\n\r\nEMP003,王五,女\r\n";
    let outcome = importer.import_all(document.as_bytes()).await.unwrap();

    assert_eq!(outcome.success_count, 2);
    assert_eq!(outcome.failed_count, 1);
    assert_eq!(outcome.errors[0].row, 3);
    assert_eq!(outcome.errors[0].data["工号"], "EMP002");
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn test_xlsx_serial_dates() {
    let store = Arc::new(InMemoryEmployeeStore::new());
    let importer = EmployeeImporterImpl::new(store.clone());

    let headers = &["工号", "姓名", "性别", "入职日期"];
    let document = xlsx_document(
        headers,
        &[
            vec![
                XCell::Text("EMP001"),
                XCell::Text("张三"),
                XCell::Text("男"),
                XCell::Number(44962.0),
            ],
            vec![
                XCell::Text("EMP002"),
                XCell::Text("李四"),
                XCell::Text("女"),
                XCell::Date(44971.0),
            ],
            vec![
                XCell::Text("EMP003"),
                XCell::Text("王五"),
                XCell::Text("男"),
                XCell::Text("2023/3/20"),
            ],
        ],
    );

    let outcome = importer.import_all(&document).await.unwrap();
    assert_eq!(outcome.success_count, 3, "errors: {:?}", outcome.errors);

    assert_eq!(hire_date(&store, "EMP001").await, NaiveDate::from_ymd_opt(2023, 2, 5));
    assert_eq!(hire_date(&store, "EMP002").await, NaiveDate::from_ymd_opt(2023, 2, 14));
    assert_eq!(hire_date(&store, "EMP003").await, NaiveDate::from_ymd_opt(2023, 3, 20));
}

#[tokio::test]
async fn test_header_only_document_rejected() {
    let store = Arc::new(InMemoryEmployeeStore::new());
    let importer = EmployeeImporterImpl::new(store.clone());

    let csv = csv_document(HEADERS, &[]);
    assert!(matches!(
        importer.import_all(&csv).await,
        Err(ImportError::Decode(DecodeError::NoDataRows))
    ));

    let xlsx = xlsx_document(HEADERS, &[]);
    assert!(matches!(
        importer.import_all(&xlsx).await,
        Err(ImportError::Decode(DecodeError::NoDataRows))
    ));

    assert!(importer.import_all(b"").await.unwrap_err().is_decode());
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_duplicate_key_last_one_wins() {
    let (_temp, repo) = setup_sqlite();
    let importer = EmployeeImporterImpl::new(repo.clone());

    let rows = vec![
        employee_row("EMP002", "李四", "女"),
        employee_row("EMP002", "李四四", "女"),
    ];
    let outcome = importer
        .import_all(&csv_document(HEADERS, &rows))
        .await
        .unwrap();

    assert_eq!(outcome.success_count, 2);
    assert_eq!(outcome.created_count, 1);
    assert_eq!(outcome.updated_count, 1);

    let all = repo.list_all(&EmployeeFilter::default()).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name, "李四四");
}

#[tokio::test]
async fn test_export_then_import_round_trip() {
    let (_temp, repo) = setup_sqlite();
    let source = EmployeeImporterImpl::new(repo.clone());
    source
        .import_all(&csv_document(HEADERS, &five_rows()))
        .await
        .unwrap();

    let exported = source
        .export_all(&EmployeeFilter::default(), DocumentFormat::Xlsx, "员工信息")
        .await
        .unwrap();

    let target_store = Arc::new(InMemoryEmployeeStore::new());
    let target = EmployeeImporterImpl::new(target_store.clone());
    let outcome = target.import_all(&exported).await.unwrap();
    assert_eq!(outcome.success_count, 5, "errors: {:?}", outcome.errors);

    assert_eq!(
        snapshot(target_store.as_ref()).await,
        snapshot(repo.as_ref()).await
    );
}

#[tokio::test]
async fn test_canonical_headers_and_numeric_keys() {
    let store = Arc::new(InMemoryEmployeeStore::new());
    let importer = EmployeeImporterImpl::new(store.clone());

    let document = xlsx_document(
        &["employeeNo", "name", "gender", "age", "status"],
        &[vec![
            XCell::Number(1001.0),
            XCell::Text("Alice"),
            XCell::Text("FEMALE"),
            XCell::Number(29.0),
            XCell::Empty,
        ]],
    );
    let outcome = importer.import_all(&document).await.unwrap();
    assert_eq!(outcome.success_count, 1, "errors: {:?}", outcome.errors);

    let employee = store.find_by_employee_no("1001").await.unwrap().unwrap();
    assert_eq!(employee.gender, Gender::Female);
    assert_eq!(employee.age, Some(29));
    assert_eq!(employee.status, EmployeeStatus::Active);
}

// ==========================================
// 存储失败: 单行失败记录，批次继续
// ==========================================
struct RejectingStore {
    inner: InMemoryEmployeeStore,
    rejected_no: &'static str,
}

#[async_trait]
impl EmployeeStore for RejectingStore {
    async fn find_by_employee_no(&self, employee_no: &str) -> RepositoryResult<Option<Employee>> {
        self.inner.find_by_employee_no(employee_no).await
    }

    async fn create(&self, fields: EmployeeFields) -> RepositoryResult<Employee> {
        if fields.employee_no == self.rejected_no {
            return Err(RepositoryError::DatabaseQueryError("disk I/O error".to_string()));
        }
        self.inner.create(fields).await
    }

    async fn update(&self, employee_no: &str, fields: EmployeeFields) -> RepositoryResult<Employee> {
        self.inner.update(employee_no, fields).await
    }

    async fn list_all(&self, filter: &EmployeeFilter) -> RepositoryResult<Vec<Employee>> {
        self.inner.list_all(filter).await
    }
}

#[tokio::test]
async fn test_store_failure_does_not_abort_batch() {
    let store = Arc::new(RejectingStore {
        inner: InMemoryEmployeeStore::new(),
        rejected_no: "EMP003",
    });
    let importer = EmployeeImporterImpl::new(store.clone());

    let outcome = importer
        .import_all(&csv_document(HEADERS, &five_rows()))
        .await
        .unwrap();

    assert_eq!(outcome.success_count, 4);
    assert_eq!(outcome.failed_count, 1);
    assert_eq!(outcome.errors[0].row, 4);
    assert!(outcome.errors[0].message.contains("disk I/O error"));
    assert_eq!(store.inner.len(), 4);
}
