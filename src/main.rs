use anyhow::Context;
use nosql_lab::config::{GridMode, LabConfig};
use nosql_lab::context::{AppContext, StoreBinding};
use nosql_lab::dataset::{self, StudentRecord};
use nosql_lab::grid::{GridMap, Partitioner};
use nosql_lab::router::{CACHE_PREFIX, DOCUMENT_PREFIX, GRID_PREFIX, create_app};
use nosql_lab::store::grid::MAP_NAME;
use nosql_lab::store::{CacheStore, DocumentStore, GridStore, SeedOutcome};
use nosql_lab::telemetry;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing();

    let config = LabConfig::from_env().context("Failed to load configuration")?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.worker_threads.max(1))
        .enable_all()
        .build()
        .context("Failed to build runtime")?;

    runtime.block_on(run(config))
}

async fn run(config: LabConfig) -> anyhow::Result<()> {
    tracing::info!(
        "Starting nosql-lab with {} worker threads, grid mode {}",
        config.worker_threads,
        config.grid.mode
    );

    // 1. Dataset:
    let records = dataset::generate(
        config.dataset.size,
        config.dataset.base_student_no,
        config.dataset.seed,
    )
    .context("Failed to generate dataset")?;
    tracing::info!(
        "Generated {} students starting at {}",
        records.len(),
        config.dataset.base_student_no
    );

    // 2. Stores:
    let mut bindings = Vec::new();
    let mut grid_member = None;
    if let Err(e) = open_stores(&config, &mut bindings, &mut grid_member).await {
        AppContext::new(bindings).close_all().await;
        return Err(e);
    }
    let mut ctx = AppContext::new(bindings);
    if let Some(map) = grid_member {
        ctx = ctx.with_grid_member(map);
    }

    // 3. Seed, one backend after another. Any failure aborts startup.
    if let Err(e) = seed_all(&ctx, &records).await {
        ctx.close_all().await;
        return Err(e);
    }

    // 4. HTTP server:
    let app = create_app(ctx.clone());
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("HTTP server listening on {}", addr);
    tracing::info!("Examples:");
    for prefix in [CACHE_PREFIX, GRID_PREFIX, DOCUMENT_PREFIX] {
        tracing::info!(
            "  http://localhost:{}{}/student_no={}",
            config.port,
            prefix,
            config.dataset.base_student_no
        );
    }

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error");

    // 5. Release every backend, whatever the server result.
    ctx.close_all().await;
    tracing::info!("Shutdown complete");

    served
}

async fn open_stores(
    config: &LabConfig,
    bindings: &mut Vec<StoreBinding>,
    grid_member: &mut Option<Arc<GridMap<String, StudentRecord>>>,
) -> anyhow::Result<()> {
    let cache = CacheStore::connect(&config.cache.host, config.cache.port).await?;
    bindings.push(StoreBinding {
        prefix: CACHE_PREFIX.to_string(),
        store: Arc::new(cache),
    });

    let grid = match config.grid.mode {
        GridMode::Embedded => {
            let map = Arc::new(GridMap::new(MAP_NAME, Arc::new(Partitioner::new())));
            *grid_member = Some(map.clone());
            tracing::info!("Started embedded grid member hosting '{}'", MAP_NAME);
            GridStore::embedded(map)
        }
        GridMode::Client => {
            tracing::info!("Using grid member at {}", config.grid.address);
            GridStore::client(&config.grid.address)
        }
    };
    bindings.push(StoreBinding {
        prefix: GRID_PREFIX.to_string(),
        store: Arc::new(grid),
    });

    let document = DocumentStore::connect(
        &config.document.uri,
        &config.document.database,
        &config.document.collection,
    )
    .await?;
    bindings.push(StoreBinding {
        prefix: DOCUMENT_PREFIX.to_string(),
        store: Arc::new(document),
    });

    Ok(())
}

async fn seed_all(ctx: &AppContext, records: &[StudentRecord]) -> anyhow::Result<()> {
    for binding in ctx.bindings() {
        let backend = binding.store.backend();
        let outcome = binding
            .store
            .seed_if_empty(records)
            .await
            .with_context(|| format!("Seeding the {} store failed", backend))?;

        match outcome {
            SeedOutcome::AlreadySeeded => {
                tracing::info!("{} store already seeded", backend);
            }
            SeedOutcome::Seeded { records, batches } => {
                tracing::info!(
                    "{} store seeded with {} students in {} batches",
                    backend,
                    records,
                    batches
                );
            }
        }
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Signal received, starting graceful shutdown");
}
