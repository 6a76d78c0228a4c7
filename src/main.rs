use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use yijing_oracle::config::{CastArgs, Command, ServeArgs};
use yijing_oracle::core::derivation::cast_reading;
use yijing_oracle::core::render::render_reading;
use yijing_oracle::server::{create_router, AppState};
use yijing_oracle::utils::error::ErrorSeverity;
use yijing_oracle::utils::{logger, validation::Validate};
use yijing_oracle::{ChatCompletionClient, CliConfig, Draw, Oracle, Result, Settings};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    match &cli.command {
        Command::Serve(args) => logger::init_server_logger(cli.verbose, args.json_logs),
        Command::Cast(_) => logger::init_cli_logger(cli.verbose),
    }

    tracing::info!("Starting yijing v{}", env!("CARGO_PKG_VERSION"));
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let outcome = match cli.command {
        Command::Cast(args) => run_cast(cli.config.as_deref(), args).await,
        Command::Serve(args) => run_serve(cli.config.as_deref(), args).await,
    };

    if let Err(e) = outcome {
        tracing::error!(
            "❌ yijing failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 建議: {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
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
}

async fn run_cast(config_path: Option<&Path>, args: CastArgs) -> Result<()> {
    let settings = Settings::load(config_path)?;

    let at = match args.at {
        Some(at) => at,
        None => settings.divination.now()?,
    };
    let draw = match args.draw {
        Some(value) => Draw::new(value)?,
        None => {
            let mut rng = rand::rng();
            Draw::random(&mut rng)
        }
    };

    let reading = if args.offline {
        cast_reading(at, draw)?
    } else {
        // 呼叫模型之前先確認金鑰與端點
        settings.ai.validate()?;
        let client = ChatCompletionClient::new(&settings.ai)?;
        Oracle::new(Arc::new(client)).consult(at, draw).await?
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reading)?);
    } else {
        println!("{}", render_reading(&reading));
    }

    Ok(())
}

async fn run_serve(config_path: Option<&Path>, args: ServeArgs) -> Result<()> {
    let mut settings = Settings::load(config_path)?;
    if let Some(host) = args.host {
        settings.server.host = host;
    }
    if let Some(port) = args.port {
        settings.server.port = port;
    }

    // 缺少金鑰時直接拒絕啟動
    settings.validate()?;
    tracing::debug!("Resolved settings: {:?}", settings);

    let client = ChatCompletionClient::new(&settings.ai)?;
    tracing::info!(
        "🤖 Interpreting with {} via {} (max {} concurrent)",
        settings.ai.model,
        client.endpoint(),
        settings.ai.max_concurrent_requests
    );

    let state = AppState::new(Oracle::new(Arc::new(client)), settings.divination);
    let app = create_router(state);

    let addr = settings.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("👋 Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
    }
}
