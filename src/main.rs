use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use tokio::sync::mpsc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::{App, Launch};
use crate::config::{AppConfig, KeyResolver, PermissionMode};
use crate::filter::{FilterCriteria, Radius};
use crate::location::{
    ConfiguredPosition, FixedPermission, LocationProvider, Permission, PermissionApi,
    PromptPermission,
};

mod app;
mod catalog;
mod cli;
mod commands;
mod config;
mod filter;
mod location;
mod map;
mod screen;
mod theme;
mod tui;
mod ui;

pub use theme::Theme;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let _guard = initialize_logging()?;
    info!("Starting nearby");

    let args = cli::Args::parse();
    let mut config = config::load(args.config.as_deref())?;
    args.apply(&mut config);

    if args.list {
        return print_listing(&config);
    }

    let (app_tx, app_rx) = mpsc::unbounded_channel();
    let provider = Arc::new(build_provider(&config, &app_tx));
    let resolver = Arc::new(KeyResolver::new(Arc::new(config.keybindings.clone())));
    let theme = theme::theme_from_name(&config.theme.name);

    let launch = Launch {
        filters: config.filters,
        request_location: config.location.request_on_start,
    };
    let mut app = App::new(launch, provider, resolver, theme, (app_tx, app_rx));
    app.run().await?;

    Ok(())
}

fn build_provider(
    config: &AppConfig,
    app_tx: &mpsc::UnboundedSender<app::AppMessage>,
) -> LocationProvider {
    let location = &config.location;
    let permissions: Arc<dyn PermissionApi> = match location.permission {
        PermissionMode::Prompt => Arc::new(PromptPermission::new(app_tx.clone())),
        PermissionMode::Grant => Arc::new(FixedPermission(Permission::Granted)),
        PermissionMode::Deny => Arc::new(FixedPermission(Permission::Denied)),
    };
    let position = ConfiguredPosition::new(location.coordinate(), location.accuracy)
        .with_delay(Duration::from_millis(location.delay_ms))
        .failing(location.fail.clone());

    LocationProvider::new(
        config.platform.platform(),
        permissions,
        Arc::new(position),
        Duration::from_secs(location.timeout_secs),
    )
}

fn print_listing(config: &AppConfig) -> Result<()> {
    let criteria = FilterCriteria {
        neighborhood_text: config.filters.neighborhood.clone(),
        radius: Radius::from_input(&config.filters.radius),
        category: config.filters.category,
    };
    let records = filter::filter(catalog::catalog(), &criteria);
    info!("Listing {} services for {criteria:?}", records.len());
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

fn initialize_logging() -> Result<WorkerGuard> {
    let directory = dirs::data_local_dir().map_or_else(
        || std::path::PathBuf::from("logs"),
        |path| path.join("nearby").join("logs"),
    );
    std::fs::create_dir_all(&directory)?;

    let file_appender = tracing_appender::rolling::daily(&directory, "nearby.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true),
        )
        .init();

    Ok(guard)
}
