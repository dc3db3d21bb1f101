use std::{process, sync::Arc};

use hitcount::{
    application::{
        counter::CounterConfig,
        error::AppError,
        health::Pingable,
        repos::{CounterRepo, UsersRepo},
    },
    cache::CacheBackend,
    config,
    context::AppContext,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http,
        telemetry,
    },
};
use tokio::{sync::oneshot, task::JoinHandle};
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Migrate(_) => run_migrate(settings).await,
    }
}

async fn run_migrate(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    info!(target: "hitcount::migrate", "schema is up to date");
    repositories.close().await;
    Ok(())
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    let cache = CacheBackend::connect(&settings.cache).await?;
    info!(
        target: "hitcount::serve",
        cache = cache.kind(),
        ttl_secs = settings.counter.cache_ttl.as_secs(),
        "cache backend ready"
    );

    let context = build_application_context(repositories.clone(), &cache, &settings);
    let result = serve_http(&settings, context).await;

    repositories.close().await;
    info!(target: "hitcount::serve", "database pool closed");
    result
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))
        .map_err(AppError::from)?;

    let pool = PostgresRepositories::connect(
        database_url,
        settings.database.max_connections.get(),
        settings.database.acquire_timeout,
    )
    .await
    .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    let repositories = Arc::new(PostgresRepositories::new(pool));
    repositories
        .seed_count()
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    Ok(repositories)
}

fn build_application_context(
    repositories: Arc<PostgresRepositories>,
    cache: &CacheBackend,
    settings: &config::Settings,
) -> AppContext {
    let counter_repo: Arc<dyn CounterRepo> = repositories.clone();
    let users_repo: Arc<dyn UsersRepo> = repositories.clone();
    let database: Arc<dyn Pingable> = repositories;

    AppContext::new(
        counter_repo,
        users_repo,
        cache.store(),
        vec![database, cache.pingable()],
        CounterConfig::from(&settings.counter),
    )
}

async fn serve_http(settings: &config::Settings, context: AppContext) -> Result<(), AppError> {
    let router = http::build_router(context.router_state());

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    info!(
        target: "hitcount::serve",
        addr = %settings.server.addr,
        "listening"
    );

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let mut server: JoinHandle<std::io::Result<()>> = tokio::spawn(async move {
        axum::serve(listener, router.into_make_service())
            .with_graceful_shutdown(async {
                let _ = stop_rx.await;
            })
            .await
    });

    tokio::select! {
        result = &mut server => return flatten_server_result(result),
        () = shutdown_signal() => {}
    }

    info!(target: "hitcount::serve", "shutdown signal received, draining connections");
    let _ = stop_tx.send(());

    match tokio::time::timeout(settings.server.graceful_shutdown, &mut server).await {
        Ok(result) => flatten_server_result(result),
        Err(_) => {
            warn!(
                target: "hitcount::serve",
                timeout_secs = settings.server.graceful_shutdown.as_secs(),
                "graceful shutdown timed out, aborting open connections"
            );
            server.abort();
            Ok(())
        }
    }
}

fn flatten_server_result(
    result: Result<std::io::Result<()>, tokio::task::JoinError>,
) -> Result<(), AppError> {
    match result {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => Err(AppError::unexpected(format!("server error: {err}"))),
        Err(err) => Err(AppError::unexpected(format!("server task failed: {err}"))),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
