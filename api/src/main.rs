use std::sync::Arc;

use actix_web::{web, HttpServer};
use dotenvy::dotenv;
use log::{info, warn};

use hg_api::app::{create_app, AppState};
use hg_core::services::{AuthConfig, AuthService, DeviceBinder, RevocationService, TokenCodec};
use hg_infra::{
    DatabasePool, MySqlCredentialVerifier, MySqlIdentityRepository, MySqlLockoutRepository,
    MySqlSessionRepository,
};
use hg_shared::config::{
    CookieConfig, DatabaseConfig, Environment, JwtConfig, LockoutConfig, SecurityConfig,
    ServerConfig,
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting HailGo auth service");

    let environment = Environment::from_env();
    let server_config = ServerConfig::from_env();
    let database_config = DatabaseConfig::from_env();
    let jwt_config = JwtConfig::from_env();
    let security_config = SecurityConfig::from_env();
    let lockout_config = LockoutConfig::from_env();
    let cookie_config = CookieConfig::from_env();

    if environment.is_production() && !cookie_config.secure {
        warn!("Refresh cookie Secure flag is disabled in production");
    }

    let pool = DatabasePool::new(&database_config).await?;
    pool.run_migrations().await?;

    let sessions = Arc::new(MySqlSessionRepository::new(pool.pool().clone()));
    let lockouts = Arc::new(MySqlLockoutRepository::new(
        pool.pool().clone(),
        lockout_config,
    ));
    let identities = Arc::new(MySqlIdentityRepository::new(pool.pool().clone()));
    let credentials = Arc::new(MySqlCredentialVerifier::new(pool.pool().clone()));

    let tokens = Arc::new(TokenCodec::new(jwt_config)?);
    let devices = DeviceBinder::new(&security_config);
    let auth = Arc::new(AuthService::new(
        sessions.clone(),
        lockouts,
        identities.clone(),
        credentials,
        tokens.clone(),
        devices,
        AuthConfig::from_security(&security_config),
    ));
    let revocation = Arc::new(RevocationService::new(sessions, identities));

    let state = web::Data::new(AppState {
        auth,
        revocation,
        tokens,
        cookies: cookie_config,
    });

    let bind_address = server_config.bind_address();
    info!("Binding to {} ({:?})", bind_address, environment);

    let mut server = HttpServer::new(move || create_app(state.clone()));
    if server_config.workers > 0 {
        server = server.workers(server_config.workers);
    }
    server.bind(&bind_address)?.run().await?;

    Ok(())
}
