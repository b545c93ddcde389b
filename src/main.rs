use clap::Parser;
use launchd_svc::config::toml_config::ServiceConfig;
use launchd_svc::core::plist;
use launchd_svc::core::service::SERVICE_NOT_FOUND;
use launchd_svc::utils::error::ErrorSeverity;
use launchd_svc::utils::{logger, validation::Validate};
use launchd_svc::{CliConfig, Operation, ServiceError, TokioCommandRunner};
use std::io::Write;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    let config = match cli.service_config().and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(exit_code(e.severity()));
        }
    };

    if let Err(e) = run(&cli.command, &config).await {
        tracing::error!(
            "❌ {} failed: {} (Category: {:?}, Severity: {:?})",
            config.service.name,
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let code = exit_code(e.severity());
        if code > 0 {
            std::process::exit(code);
        }
    }

    Ok(())
}

async fn run(operation: &Operation, config: &ServiceConfig) -> Result<(), ServiceError> {
    if let Operation::Definition = operation {
        let xml = plist::render(&config.definition()?);
        print_bytes(xml.as_bytes())?;
        return Ok(());
    }

    let service = config.build_service(TokioCommandRunner::new()).await?;
    let specifier = service.user_specifier();

    match operation {
        Operation::Install => {
            let definition = config.definition()?;
            print_bytes(&service.install(&definition).await?)?;
            tracing::info!("✅ Installed {}", specifier);
        }
        Operation::Bootstrap => {
            print_bytes(&service.bootstrap().await?)?;
            tracing::info!("✅ Bootstrapped {}", specifier);
        }
        Operation::Uninstall { keep_definition } => {
            service.bootout(!keep_definition).await?;
            tracing::info!("✅ Booted out {}", specifier);
        }
        Operation::Start => {
            service.start().await?;
            tracing::info!("✅ Started {}", specifier);
        }
        Operation::Stop => {
            service.stop().await?;
            tracing::info!("✅ Stopped {}", specifier);
        }
        Operation::Restart { kill } => {
            service.kickstart(*kill).await?;
            tracing::info!("✅ Kickstarted {}", specifier);
        }
        Operation::Print => {
            print_bytes(&service.print().await?)?;
        }
        Operation::Status { json } => {
            let status = match service.status().await {
                Err(e) if e.exit_code() == Some(SERVICE_NOT_FOUND) => {
                    println!("{}: not loaded", specifier);
                    return Ok(());
                }
                other => other?,
            };
            if *json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                println!(
                    "{}: {} (pid {}, last exit code {})",
                    status.specifier,
                    status.state.as_deref().unwrap_or("unknown"),
                    status.pid.map(|p| p.to_string()).unwrap_or_else(|| "-".to_string()),
                    status.last_exit_code.as_deref().unwrap_or("-")
                );
            }
        }
        Operation::Definition => {}
    }

    Ok(())
}

fn exit_code(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn print_bytes(bytes: &[u8]) -> Result<(), ServiceError> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(bytes)?;
    stdout.flush()?;
    Ok(())
}
