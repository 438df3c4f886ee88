use std::time::Duration;

use actix_web::{
    dev::{Server, Service},
    http::KeepAlive,
    middleware::Logger,
    web,
    App,
    HttpServer,
};
use futures::future::{ok, FutureExt};
use log::*;
use shea_store_engine::{
    AuthApi,
    CartApi,
    CatalogApi,
    MemorySessionStore,
    OrderFlowApi,
    SessionApi,
    SessionStore,
    SqliteDatabase,
};

use crate::{
    config::{NotificationAuth, ServerConfig, ServerOptions, SessionBackend},
    errors::ServerError,
    helpers::get_remote_ip,
    integrations::cinetpay::CinetPayGateway,
    middleware::SessionMiddlewareFactory,
    routes::{
        health,
        AddReviewRoute,
        AddToCartRoute,
        CartRoute,
        CartSummaryRoute,
        CategoriesRoute,
        CategoryProductsRoute,
        ClearCartRoute,
        CurrentUserRoute,
        FeaturedProductsRoute,
        InitiatePaymentRoute,
        LoginRoute,
        LogoutRoute,
        MyOrdersRoute,
        OrderByIdRoute,
        PaymentNotificationRoute,
        PaymentStatusRoute,
        ProductByIdRoute,
        ProductReviewsRoute,
        ProductsRoute,
        RegisterRoute,
        RemoveCartItemRoute,
        UpdateCartItemRoute,
    },
    session_reaper::start_session_reaper,
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.run_migrations().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    if config.seed_sample_data {
        let seeded = CatalogApi::new(db.clone())
            .seed_sample_data()
            .await
            .map_err(|e| ServerError::InitializeError(e.to_string()))?;
        if seeded > 0 {
            info!("🚀️ Loaded {seeded} sample products into the empty catalog");
        }
    }
    let gateway = CinetPayGateway::new(config.gateway.api.clone())
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let sessions = match config.session_backend {
        SessionBackend::Sqlite => SessionStore::Sqlite(db.clone()),
        SessionBackend::Memory => {
            warn!("🔐️ Sessions are kept in memory. Everyone is logged out when the server restarts.");
            SessionStore::Memory(MemorySessionStore::new())
        },
    };
    let _reaper = start_session_reaper(sessions.clone(), config.session_reaper_interval);
    let srv = create_server_instance(config, db, gateway, sessions)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    gateway: CinetPayGateway,
    sessions: SessionStore,
) -> Result<Server, ServerError> {
    // Shared by all workers, so that in-memory sessions are visible everywhere
    let sessions = web::Data::new(SessionApi::new(sessions).with_ttl(config.session_ttl));
    let options = ServerOptions::from_config(&config);
    let notification_auth = NotificationAuth::from_config(&config.gateway);
    let srv = HttpServer::new(move || {
        let auth_api = AuthApi::new(db.clone());
        let catalog_api = CatalogApi::new(db.clone());
        let cart_api = CartApi::new(db.clone());
        let orders_api = OrderFlowApi::new(db.clone(), gateway.clone());
        let app = App::new()
            .wrap(SessionMiddlewareFactory::new())
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("shea_store::access_log"))
            .app_data(json_config())
            .app_data(sessions.clone())
            .app_data(web::Data::new(auth_api))
            .app_data(web::Data::new(catalog_api))
            .app_data(web::Data::new(cart_api))
            .app_data(web::Data::new(orders_api))
            .app_data(web::Data::new(options.clone()))
            .app_data(web::Data::new(notification_auth.clone()));
        let use_x_forwarded_for = config.use_x_forwarded_for;
        let use_forwarded = config.use_forwarded;
        let whitelist = config.gateway.whitelist.clone();
        // Registered ahead of the `/api` scope so that the allowlist applies to this route alone
        let notify_scope = web::scope("/api/payment/notify")
            .wrap_fn(move |req, srv| {
                let peer_ip = get_remote_ip(req.request(), use_x_forwarded_for, use_forwarded);
                let whitelisted = match (peer_ip, &whitelist) {
                    (Some(ip), Some(whitelist)) => {
                        info!("📦️ Payment notification from {ip}");
                        whitelist.contains(&ip)
                    },
                    (_, None) => true,
                    (None, Some(_)) => {
                        warn!("🔐️ No IP address found for payment notification, denying access.");
                        false
                    },
                };
                if whitelisted {
                    srv.call(req)
                } else {
                    warn!("🔐️ Payment notification from a peer outside the allowlist. Denying access.");
                    let err = ServerError::Forbidden("Accès refusé".into());
                    ok(req.error_response(err)).boxed_local()
                }
            })
            .service(PaymentNotificationRoute::<SqliteDatabase, CinetPayGateway>::new());
        let api_scope = web::scope("/api")
            .service(LoginRoute::<SqliteDatabase>::new())
            .service(RegisterRoute::<SqliteDatabase>::new())
            .service(LogoutRoute::new())
            .service(CurrentUserRoute::<SqliteDatabase>::new())
            .service(FeaturedProductsRoute::<SqliteDatabase>::new())
            .service(ProductsRoute::<SqliteDatabase>::new())
            .service(ProductByIdRoute::<SqliteDatabase>::new())
            .service(ProductReviewsRoute::<SqliteDatabase>::new())
            .service(AddReviewRoute::<SqliteDatabase>::new())
            .service(CategoriesRoute::<SqliteDatabase>::new())
            .service(CategoryProductsRoute::<SqliteDatabase>::new())
            .service(CartSummaryRoute::<SqliteDatabase>::new())
            .service(CartRoute::<SqliteDatabase>::new())
            .service(AddToCartRoute::<SqliteDatabase>::new())
            .service(ClearCartRoute::<SqliteDatabase>::new())
            .service(UpdateCartItemRoute::<SqliteDatabase>::new())
            .service(RemoveCartItemRoute::<SqliteDatabase>::new())
            .service(MyOrdersRoute::<SqliteDatabase, CinetPayGateway>::new())
            .service(OrderByIdRoute::<SqliteDatabase, CinetPayGateway>::new())
            .service(InitiatePaymentRoute::<SqliteDatabase, SqliteDatabase, CinetPayGateway>::new())
            .service(PaymentStatusRoute::<SqliteDatabase, CinetPayGateway>::new());
        app.service(health).service(notify_scope).service(api_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Malformed JSON bodies are reported like any other invalid input.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        debug!("💻️ Rejected request body. {err}");
        ServerError::validation("body", err.to_string()).into()
    })
}
