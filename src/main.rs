use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use movie_homepage::cache::{self, CacheConfig};
use movie_homepage::clients::OphimClient;
use movie_homepage::config::environment::EnvironmentConfig;
use movie_homepage::routes::create_router;
use movie_homepage::services::{CacheScheduler, CdnImageOptimizer};
use movie_homepage::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("🎬 Movie Homepage - Cache del catálogo Ophim");
    info!("================================================");

    let config = EnvironmentConfig::from_env()?;
    let cache_config = CacheConfig::from_env()?;

    // Inicializar cache
    let store = match cache::connect(&cache_config).await {
        Ok(store) => {
            info!("✅ Cache conectado ({:?})", cache_config.backend);
            store
        }
        Err(e) => {
            error!("❌ Error conectando al cache: {}", e);
            return Err(anyhow::anyhow!("Error de cache: {}", e));
        }
    };

    let catalog = Arc::new(OphimClient::new(&config.ophim_base_url, config.upstream_timeout)?);
    let images = Arc::new(CdnImageOptimizer::new(
        &config.ophim_image_cdn,
        config.image_transform_enabled,
    ));

    let app_state = AppState::new(config.clone(), cache_config.clone(), catalog, images, store);

    // Refrescos programados y warm-up
    let scheduler = CacheScheduler::new(
        app_state.orchestrator.clone(),
        app_state.homepage.clone(),
        &cache_config,
    )?;
    scheduler.start();

    let app = create_router(app_state);

    let addr: SocketAddr = config.server_url().parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET    /health - Health check");
    info!("   GET    /homepage/:group - Homepage por grupo (initial, group1, group2)");
    info!("   GET    /fullHomepage - Homepage completo");
    info!("🛠️ Endpoints de administración:");
    info!("   POST   /admin/refresh/new - Refrescar todo");
    info!("   POST   /admin/refresh/group/:group - Refrescar grupo");
    info!("   POST   /admin/refresh/section/:section - Refrescar sección");
    info!("   PUT    /admin/schedule - Habilitar/deshabilitar refrescos programados");
    info!("   DELETE /admin/cache/section/:section - Limpiar sección");
    info!("   DELETE /admin/cache/group/:group - Limpiar grupo");
    info!("   DELETE /admin/cache/clearAll - Limpiar todo");
    info!("   GET    /admin/cache/status - Estado del cache");
    info!("   GET    /admin/info - Información del servicio");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
    }

    scheduler.shutdown();
    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
