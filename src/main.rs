use clap::Parser;
use drive_map::utils::error::{ErrorSeverity, MapError};
use drive_map::utils::{logger, validation::Validate};
use drive_map::{CliArgs, LocalStorage, LogFormat, MapEngine};

fn exit_code(e: &MapError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn fail(e: &MapError) -> ! {
    tracing::error!(
        "❌ Map generation failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(exit_code(e).max(1));
}

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    // Logging needs the config's format, so a broken config is reported on stderr only.
    let config = match args.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(exit_code(&e).max(1));
        }
    };

    match args.log_format(&config) {
        LogFormat::Compact => logger::init_cli_logger(args.verbose),
        LogFormat::Json => logger::init_json_logger(args.verbose),
    }

    tracing::info!("Starting drive-map");
    tracing::debug!(
        "Geocoder: {}, isochrones: {}, bands: {:?}",
        config.geocoder.endpoint,
        config.isochrones.endpoint,
        config.bands.iter().map(|b| b.minutes).collect::<Vec<_>>()
    );

    if let Err(e) = config.validate() {
        fail(&e);
    }

    let storage = LocalStorage::new(args.output_dir.clone());
    let engine = match MapEngine::from_config(&config, storage) {
        Ok(engine) => engine.with_monitoring(args.monitor),
        Err(e) => fail(&e),
    };

    match engine.handle_form(&args.form()).await {
        Ok(report) => {
            println!("✅ Map generated for {}", report.location.label());
            println!("📁 Output saved to: {}", report.output_path);
            if !report.isochrones_drawn {
                println!("⚠️ Drive-time layers unavailable; map shows the distance radius only");
            }
        }
        Err(e) => fail(&e),
    }
}
