use anyhow::Result;
use clap::Parser;

use properview::cli::{Cli, Commands};
use properview::config::{StaticConfig, get_config, init_config_from};
use properview::errors::ProperviewError;
use properview::runtime::modes::{run_recompute, run_server};
use properview::system::logging::init_logging;

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // 生成配置不需要加载现有配置
    if let Some(Commands::GenerateConfig { output_path }) = &cli.command {
        return generate_config(output_path.as_deref());
    }

    init_config_from(&cli.config);
    let config = get_config();

    // guard 必须存活到进程结束，否则日志不会刷新
    let _log_guard = match init_logging(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Recompute { from, to }) => run_recompute(from, to).await,
        Some(Commands::Serve) | None => run_server().await,
        Some(Commands::GenerateConfig { .. }) => Ok(()),
    };

    if let Err(e) = &result {
        match e.downcast_ref::<ProperviewError>() {
            Some(err) => eprintln!("{}", err.format_colored()),
            None => eprintln!("{:#}", e),
        }
    }
    result
}

fn generate_config(output_path: Option<&str>) -> Result<()> {
    match output_path {
        Some(path) => {
            StaticConfig::default().save_to_file(path)?;
            println!("Configuration written to {}", path);
        }
        None => println!("{}", StaticConfig::generate_sample_config()),
    }
    Ok(())
}
