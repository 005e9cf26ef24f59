use clap::Parser;
use repo_audit::config::toml_config::TomlConfig;
use repo_audit::core::ConfigProvider;
use repo_audit::utils::{logger, validation::Validate};
use repo_audit::{AuditEngine, AuditPipeline, CliConfig, GitFetcher, LocalStorage, WorkDir};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliConfig::parse();

    logger::init_cli_logger(args.verbose);

    tracing::info!("Starting repo-audit");
    if args.verbose {
        tracing::debug!("CLI config: {:?}", args);
    }

    let result = match args.config.clone() {
        Some(path) => {
            tracing::info!("📁 Loading audit profile from: {}", path);
            let mut profile = match TomlConfig::from_file(&path) {
                Ok(profile) => profile,
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path, e);
                    eprintln!("💡 Make sure the file exists and is valid TOML");
                    std::process::exit(2);
                }
            };

            // CLI switches override the profile where given.
            if args.archive {
                profile.load.archive = Some(true);
            }
            if args.keep_work_dir {
                profile.load.keep_work_dir = Some(true);
            }

            let monitor = args.monitor || profile.monitoring_enabled();
            run_audit(profile, monitor).await
        }
        None => {
            let monitor = args.monitor;
            run_audit(args, monitor).await
        }
    };

    match result {
        Ok(output_path) => {
            tracing::info!("✅ Audit completed successfully!");
            tracing::info!("📁 Reports saved to: {}", output_path);
            println!("✅ Audit completed successfully!");
            println!("📁 Reports saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Audit failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                repo_audit::utils::error::ErrorSeverity::Low => 0,
                repo_audit::utils::error::ErrorSeverity::Medium => 1,
                repo_audit::utils::error::ErrorSeverity::High => 2,
                repo_audit::utils::error::ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

async fn run_audit<C>(config: C, monitor_enabled: bool) -> repo_audit::Result<String>
where
    C: ConfigProvider + Validate + Send + Sync + 'static,
{
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        return Err(e);
    }

    let work_dir = WorkDir::create(config.keep_work_dir())?;
    let storage = LocalStorage::new(config.output_dir().to_string());
    let pipeline = AuditPipeline::new(storage, config, GitFetcher, work_dir.path().to_path_buf())?;
    let engine = AuditEngine::new_with_monitoring(pipeline, monitor_enabled);

    let result = engine.run().await;
    work_dir.cleanup();
    result
}
