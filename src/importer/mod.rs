// ==========================================
// 员工信息管理 - 导入层
// ==========================================
// 职责: 员工表格导入/导出/模板生成
// 支持: Excel (.xlsx/.xls), CSV
// ==========================================

// 模块声明
pub mod column_spec;
pub mod employee_importer;
pub mod employee_importer_trait;
pub mod error;
pub mod field_normalizer;
pub mod reconciler;
pub mod record_validator;
pub mod tabular_codec;

// 重导出核心类型
pub use column_spec::{ColumnSpec, EmployeeField, EMPLOYEE_COLUMNS};
pub use employee_importer::EmployeeImporterImpl;
pub use error::{DecodeError, ImportError, ImportResult};
pub use field_normalizer::{serial_to_date, FieldNormalizerImpl};
pub use reconciler::Reconciler;
pub use record_validator::{RecordValidatorImpl, ValidationFailure};
pub use tabular_codec::{DocumentFormat, TabularCodec};

// 重导出 Trait 接口
pub use employee_importer_trait::{EmployeeImporter, FieldNormalizer, RecordValidator};
