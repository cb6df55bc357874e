use clap::Parser;
use quake_map::core::ConfigProvider;
use quake_map::utils::error::ErrorSeverity;
use quake_map::utils::{logger, validation::Validate};
use quake_map::{CliConfig, EtlEngine, LocalStorage, QuakeError, QuakePipeline, TomlConfig};

async fn run<C>(config: C, monitor_enabled: bool) -> Result<(), QuakeError>
where
    C: ConfigProvider + Validate,
{
    config.validate()?;

    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_path());
    let pipeline = QuakePipeline::new(storage, config)?;
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    let report = engine.run().await?;
    println!(
        "✅ Drew {} earthquakes ({} skipped)",
        report.summary.drawn,
        report.summary.skipped()
    );
    for path in &report.written {
        println!("📁 Output saved to: {}", path);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 載入 TOML 配置 (若有指定)
    let toml = match cli.config.as_deref() {
        Some(path) => match TomlConfig::from_file(path) {
            Ok(config) => Some(config),
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => None,
    };

    // 初始化日誌
    let json_logs = cli.log_json || toml.as_ref().is_some_and(TomlConfig::json_logs);
    if json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting quake-map");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let outcome = match toml {
        Some(config) => {
            let monitor = cli.monitor || config.monitoring_enabled();
            tracing::info!("📁 Using configuration from: {}", cli.config.as_deref().unwrap_or_default());
            run(config, monitor).await
        }
        None => {
            let monitor = cli.monitor;
            run(cli, monitor).await
        }
    };

    if let Err(e) = outcome {
        tracing::error!(
            "❌ Map run failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}
