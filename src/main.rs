// ==========================================
// 员工信息管理 - 命令行入口
// ==========================================
// 子命令: import / export / template
// ==========================================

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use employee_roster::app::{get_default_db_path, AppState};
use employee_roster::{logging, DocumentFormat, EmployeeFilter};
use std::path::PathBuf;

/// 员工花名册批量导入/导出工具
#[derive(Debug, Parser)]
#[command(name = "employee-roster", version, about = "员工信息批量导入/导出")]
struct Cli {
    /// 数据库文件路径（默认: $EMPLOYEE_ROSTER_DB_PATH 或用户数据目录）
    #[arg(long = "db", value_name = "PATH", global = true)]
    db_path: Option<PathBuf>,

    /// 以 JSON 行格式输出日志
    #[arg(long = "log-json", global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// 导入员工表格（.xlsx / .xls / .csv）
    Import {
        /// 待导入文件
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// 导出员工信息
    Export {
        /// 输出文件路径（目录时使用默认文件名）
        #[arg(short = 'o', long = "output", value_name = "PATH")]
        output: PathBuf,

        #[arg(short = 'f', long = "format", value_enum, default_value_t = OutputFormat::Xlsx)]
        format: OutputFormat,

        /// 姓名（包含匹配）
        #[arg(long)]
        name: Option<String>,

        /// 工号（包含匹配）
        #[arg(long = "employee-no")]
        employee_no: Option<String>,

        /// 部门（精确匹配）
        #[arg(long)]
        department: Option<String>,

        /// 状态: active / inactive
        #[arg(long)]
        status: Option<String>,
    },
    /// 生成导入模板
    Template {
        #[arg(short = 'o', long = "output", value_name = "PATH")]
        output: PathBuf,

        #[arg(short = 'f', long = "format", value_enum, default_value_t = OutputFormat::Xlsx)]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Xlsx,
    Csv,
}

impl From<OutputFormat> for DocumentFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Xlsx => DocumentFormat::Xlsx,
            OutputFormat::Csv => DocumentFormat::Csv,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_json);

    tracing::info!(version = employee_roster::VERSION, "{}", employee_roster::APP_NAME);

    let db_path = cli
        .db_path
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(get_default_db_path);
    tracing::info!(db_path = %db_path, "使用数据库");

    let state = AppState::new(db_path)
        .map_err(anyhow::Error::msg)
        .context("无法初始化应用")?;

    match cli.command {
        Commands::Import { file } => {
            let response = state
                .import_api
                .import_employees(&file.to_string_lossy())
                .await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Export {
            output,
            format,
            name,
            employee_no,
            department,
            status,
        } => {
            let filter = EmployeeFilter {
                name,
                employee_no,
                department,
                status,
            };
            let file = state
                .import_api
                .export_employees(&filter, format.into())
                .await?;
            let path = resolve_output(output, &file.file_name);
            tokio::fs::write(&path, &file.bytes)
                .await
                .with_context(|| format!("写入文件失败: {}", path.display()))?;
            println!("{}", path.display());
        }
        Commands::Template { output, format } => {
            let file = state.import_api.download_template(format.into()).await?;
            let path = resolve_output(output, &file.file_name);
            tokio::fs::write(&path, &file.bytes)
                .await
                .with_context(|| format!("写入文件失败: {}", path.display()))?;
            println!("{}", path.display());
        }
    }

    Ok(())
}

/// 输出路径为目录时拼接默认文件名
fn resolve_output(output: PathBuf, default_name: &str) -> PathBuf {
    if output.is_dir() {
        output.join(default_name)
    } else {
        output
    }
}
