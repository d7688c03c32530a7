use clap::Parser;

use reelink::cli::{Cli, Commands};
use reelink::config::AppConfig;
use reelink::runtime::modes;
use reelink::system::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref());

    // guard 必须活到进程结束，否则文件日志会丢尾部
    let _log_guard = init_logging(&config.logging)?;

    match cli.command {
        None | Some(Commands::Serve) => modes::run_server(&config).await,
        Some(command) => {
            if let Err(e) = modes::run_cli(command, &config).await {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
