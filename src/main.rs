use std::sync::Arc;

use clap::Parser;
use rust_decimal::Decimal;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use postwise::config::Config;
use postwise::db::{create_pool, init_db, queries, AppState};
use postwise::handlers;
use postwise::models::{CouponType, CreateCoupon, SessionToken};
use postwise::session::SessionKeys;

#[derive(Parser, Debug)]
#[command(name = "postwise")]
#[command(about = "Coupon and route authorization service for the Postwise content platform")]
struct Cli {
    /// Seed sample coupons and print an admin session token (dev mode only)
    #[arg(long)]
    seed: bool,

    /// Delete the database on exit (dev mode only)
    #[arg(long)]
    ephemeral: bool,
}

/// Inserts SAVE20 and FLAT100 unless coupons already exist, then prints a
/// dev admin token.
fn seed_dev_data(state: &AppState) -> postwise::error::Result<()> {
    let conn = state.db.get()?;

    let (total, _) = queries::count_coupons(&conn)?;
    if total > 0 {
        tracing::info!("Database already has coupons, skipping seed");
    } else {
        let samples = [
            ("SAVE20", CouponType::Percent, 20),
            ("FLAT100", CouponType::Fixed, 100),
        ];
        for (code, kind, value) in samples {
            let coupon = queries::create_coupon(
                &conn,
                &CreateCoupon {
                    code: code.to_string(),
                    active: true,
                    kind,
                    value: Decimal::from(value),
                    expires_at: None,
                    max_redemptions: None,
                },
            )?;
            tracing::info!("Seeded coupon {} ({} {})", coupon.code, coupon.kind.as_ref(), coupon.value);
        }
    }

    let token = state
        .sessions
        .issue(&SessionToken::admin("dev-admin", Some("admin@postwise.local".into())))?;

    println!();
    println!("--- COPY FROM HERE ---");
    println!("  admin_token: {}", token);
    println!("--- END COPY ---");
    println!();
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "postwise=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    if config.dev_mode {
        tracing::info!("Running in DEVELOPMENT mode");
    }
    tracing::info!(
        "Discount rounding: {}, app namespaces: {:?}",
        config.coupon_policy.rounding.as_ref(),
        config.guard.app_prefixes
    );

    let db_pool = create_pool(&config.database_path).expect("Failed to create database pool");
    {
        let conn = db_pool.get().expect("Failed to get connection");
        init_db(&conn).expect("Failed to initialize database");
    }

    let state = AppState {
        db: db_pool,
        sessions: SessionKeys::new(config.session_secret.as_bytes(), config.session_cookie.clone()),
        guard: Arc::new(config.guard.clone()),
        coupon_policy: config.coupon_policy,
        dev_mode: config.dev_mode,
    };

    if cli.seed {
        if !config.dev_mode {
            tracing::warn!("--seed flag ignored: not in dev mode (set POSTWISE_ENV=dev)");
        } else if let Err(e) = seed_dev_data(&state) {
            tracing::error!("Failed to seed dev data: {}", e);
        }
    }

    if config.dev_mode {
        tracing::info!("DEV endpoints enabled: POST /dev/session");
    }

    let app = handlers::router(state).layer(TraceLayer::new_for_http());

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    let cleanup_on_exit = cli.ephemeral && config.dev_mode;
    if cleanup_on_exit {
        tracing::info!("EPHEMERAL MODE: database will be deleted on exit");
    }

    tracing::info!("Postwise server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Failed to start server");

    if cleanup_on_exit {
        let db_path = &config.database_path;
        match std::fs::remove_file(db_path) {
            Ok(()) => tracing::info!("Removed {}", db_path),
            Err(e) => tracing::warn!("Failed to remove {}: {}", db_path, e),
        }
        let _ = std::fs::remove_file(format!("{}-wal", db_path));
        let _ = std::fs::remove_file(format!("{}-shm", db_path));
    }
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}
