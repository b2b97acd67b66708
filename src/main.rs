//! 权限引擎命令行入口
//! 查看权限目录与系统角色，计算能力摘要，检查权限

use hr_authz::{config::AppConfig, models::PermissionSet, services, telemetry};

fn main() -> anyhow::Result<()> {
    // ===== CLI 参数处理 =====
    let args: Vec<String> = std::env::args().skip(1).collect();

    let command = match args.first().map(String::as_str) {
        Some("--version") => {
            println!("hr-authz {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Some("--help") | None => {
            print_help();
            return Ok(());
        }
        Some(command) => command.to_string(),
    };

    // 加载 .env 文件（开发环境）
    if let Ok(env) = std::env::var("HRAUTHZ_ENV") {
        dotenv::from_filename(format!(".env.{}", env)).ok();
    } else {
        dotenv::from_filename(".env.local").ok();
        dotenv::dotenv().ok();
    }

    // 1. 加载配置
    let config = AppConfig::from_env().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        anyhow::anyhow!("Failed to load configuration: {}", e)
    })?;

    // 2. 初始化日志
    telemetry::init_telemetry(&config.logging);

    // 3. 构建权限目录与角色存储
    let access = hr_authz::bootstrap(&config)?;

    match command.as_str() {
        "catalog" => {
            for domain in access.catalog.list_domains() {
                println!("{} ({})", domain.name, domain.id);
                for permission in &domain.permissions {
                    println!(
                        "  {:<28} {:<7} {}",
                        permission.id,
                        permission.level.as_str(),
                        permission.name
                    );
                }
            }
        }
        "roles" => {
            for role in access.roles.list(false) {
                let kind = if role.is_system { "system" } else { "custom" };
                println!(
                    "{:<14} {:<16} {:<7} {} permissions",
                    role.id,
                    role.name,
                    kind,
                    role.permission_ids.len()
                );
                for line in access.summarizer.summarize(&role.permission_ids) {
                    println!("    - {}", line);
                }
            }
        }
        "summary" => {
            let selected: PermissionSet = args[1..].iter().cloned().collect();
            let lines = access.summarizer.summarize(&selected);
            if lines.is_empty() {
                println!("No notable abilities ({} permissions)", selected.len());
            }
            for line in lines {
                println!("{}", line);
            }
        }
        "check" => {
            let (Some(role_ids), Some(permission_id)) = (args.get(1), args.get(2)) else {
                eprintln!("用法: hr-authz check <role-id>[,<role-id>...] <permission-id>");
                std::process::exit(2);
            };
            let role_ids: Vec<&str> = role_ids.split(',').map(str::trim).collect();
            let snapshot = access.roles.snapshot();
            let granted = services::has_permission(snapshot.resolve(&role_ids), permission_id);
            println!("{}", if granted { "granted" } else { "denied" });
            if !granted {
                std::process::exit(1);
            }
        }
        other => {
            eprintln!("未知命令: {}", other);
            print_help();
            std::process::exit(2);
        }
    }

    Ok(())
}

/// 打印帮助信息
fn print_help() {
    println!("hr-authz {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("用法: hr-authz <命令> [参数]");
    println!();
    println!("命令:");
    println!("  catalog                         列出权限领域与权限");
    println!("  roles                           列出系统角色及其能力摘要");
    println!("  summary <permission-id>...      计算权限集合的能力摘要");
    println!("  check <role-ids> <permission>   检查角色集合是否拥有权限");
    println!();
    println!("选项:");
    println!("  --version     打印版本信息并退出");
    println!("  --help        打印此帮助信息并退出");
    println!();
    println!("环境变量:");
    println!("  HRAUTHZ_LOGGING__LEVEL, HRAUTHZ_LOGGING__FORMAT");
    println!("  HRAUTHZ_ROLES__SUMMARY_MAX_ITEMS, HRAUTHZ_CATALOG__PATH");
}
