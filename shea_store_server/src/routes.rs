//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests:
//! ```nocompile
//!     fn my_handler() -> impl Responder {
//!         std::thread::sleep(Duration::from_secs(5)); // <-- Bad practice! Will cause the current worker thread to
//! hang!
//!     }
//! ```
//! For this reason, any long, non-cpu-bound operation (e.g. I/O, database operations, etc.) should be expressed as
//! futures or asynchronous functions. Async handlers get executed concurrently by worker threads and thus don’t block
//! execution:
//!
//! ```nocompile
//!     async fn my_handler() -> impl Responder {
//!         tokio::time::sleep(Duration::from_secs(5)).await; // <-- Ok. Worker thread will handle other requests here
//!     }
//! ```
use actix_web::{get, http::header::ContentType, web, HttpRequest, HttpResponse, Responder};
use cinetpay_tools::NotificationPayload;
use log::*;
use shea_store_engine::{
    db_types::TransactionId,
    payment_objects::{NotificationOutcome, PaymentStatusReport},
    traits::{CartManagement, CatalogManagement, PaymentGateway, PaymentManagement, ReviewManagement, UserManagement},
    AuthApi,
    CartApi,
    CatalogApi,
    OrderFlowApi,
    SessionApi,
    SessionStore,
};

use crate::{
    config::{NotificationAuth, ServerOptions},
    data_objects::{
        AddToCartRequest,
        InitiatePaymentRequest,
        InitiatePaymentResponse,
        JsonResponse,
        LoginRequest,
        PaymentStatusResponse,
        RegisterRequest,
        ReviewRequest,
        UpdateCartRequest,
        UserResponse,
        Validate,
    },
    errors::ServerError,
    helpers::callback_urls,
    integrations::cinetpay::notification_from_payload,
    middleware::{removal_cookie, session_cookie, SessionUser},
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal) => {
        paste::paste! { pub struct [<$name:camel Route>];}
        paste::paste! {
                impl [<$name:camel Route>] {
                #[allow(clippy::new_without_default)]
                pub fn new() -> Self { Self }
            }
        }
        paste::paste! {
            impl actix_web::dev::HttpServiceFactory for [<$name:camel Route>] {
                fn register(self, config: &mut actix_web::dev::AppService) {
                    let res = actix_web::Resource::new($path)
                        .name(stringify!($name))
                        .guard(actix_web::guard::$method())
                        .to($name);
                    actix_web::dev::HttpServiceFactory::register(res, config);
                }
            }
        }
    };

    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Auth  ----------------------------------------------------
route!(login => Post "/auth/login" impl UserManagement);
/// Logs a user in with their email and password and hands out a session cookie.
///
/// An unknown email and a wrong password get the same `401` answer. With `remember: true` the cookie outlives the
/// browser session.
pub async fn login<U: UserManagement>(
    body: web::Json<LoginRequest>,
    api: web::Data<AuthApi<U>>,
    sessions: web::Data<SessionApi<SessionStore>>,
    options: web::Data<ServerOptions>,
) -> Result<HttpResponse, ServerError> {
    let req = body.into_inner();
    req.validate()?;
    trace!("💻️ Login request for {}", req.email);
    let user = api.authenticate(&req.email, &req.password).await?;
    let session = sessions.start_session(user.id).await?;
    info!("🔐️ User #{} logged in", user.id);
    Ok(HttpResponse::Ok()
        .cookie(session_cookie(&session.key, req.remember, &options))
        .json(UserResponse { success: true, user }))
}

route!(register => Post "/auth/register" impl UserManagement);
/// Creates an account and logs the new user straight in.
pub async fn register<U: UserManagement>(
    body: web::Json<RegisterRequest>,
    api: web::Data<AuthApi<U>>,
    sessions: web::Data<SessionApi<SessionStore>>,
    options: web::Data<ServerOptions>,
) -> Result<HttpResponse, ServerError> {
    let req = body.into_inner();
    req.validate()?;
    let user = api.register(&req.name, &req.email, &req.password).await?;
    let session = sessions.start_session(user.id).await?;
    info!("🔐️ New account #{} registered", user.id);
    Ok(HttpResponse::Ok()
        .cookie(session_cookie(&session.key, req.remember, &options))
        .json(UserResponse { success: true, user }))
}

route!(logout => Post "/auth/logout");
/// Ends the caller's session, if there is one, and clears the cookie. Always succeeds.
pub async fn logout(
    user: Option<SessionUser>,
    sessions: web::Data<SessionApi<SessionStore>>,
    options: web::Data<ServerOptions>,
) -> Result<HttpResponse, ServerError> {
    if let Some(user) = user {
        sessions.end_session(&user.session_key).await?;
        debug!("🔐️ User #{} logged out", user.user_id);
    }
    Ok(HttpResponse::Ok().cookie(removal_cookie(&options)).json(JsonResponse::success("Déconnexion réussie")))
}

route!(current_user => Get "/auth/user" impl UserManagement);
pub async fn current_user<U: UserManagement>(
    user: SessionUser,
    api: web::Data<AuthApi<U>>,
) -> Result<HttpResponse, ServerError> {
    // A session can outlive its account
    let user = api.user(user.user_id).await?.ok_or_else(ServerError::unauthenticated)?;
    Ok(HttpResponse::Ok().json(user))
}

//----------------------------------------------   Catalog  ----------------------------------------------------
route!(products => Get "/products" impl CatalogManagement);
pub async fn products<B: CatalogManagement>(api: web::Data<CatalogApi<B>>) -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET products");
    let products = api.products().await?;
    Ok(HttpResponse::Ok().json(products))
}

route!(featured_products => Get "/products/featured" impl CatalogManagement);
pub async fn featured_products<B: CatalogManagement>(
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let products = api.featured_products().await?;
    Ok(HttpResponse::Ok().json(products))
}

route!(product_by_id => Get "/products/{id}" impl CatalogManagement);
pub async fn product_by_id<B: CatalogManagement>(
    path: web::Path<i64>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    trace!("💻️ GET product #{id}");
    let product = api.product(id).await?.ok_or_else(|| ServerError::NoRecordFound("Produit non trouvé".into()))?;
    Ok(HttpResponse::Ok().json(product))
}

route!(product_reviews => Get "/products/{id}/reviews" impl ReviewManagement);
pub async fn product_reviews<B: ReviewManagement>(
    path: web::Path<i64>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let reviews = api.reviews(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(reviews))
}

route!(add_review => Post "/products/{id}/reviews" impl ReviewManagement);
/// Posts a review for the product on behalf of the logged-in user. The product's rating moves with it.
pub async fn add_review<B: ReviewManagement>(
    user: SessionUser,
    path: web::Path<i64>,
    body: web::Json<ReviewRequest>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let product_id = path.into_inner();
    let req = body.into_inner();
    req.validate()?;
    debug!("💻️ User #{} reviews product #{product_id}", user.user_id);
    let review = api.add_review(user.user_id, req.into_review(product_id)).await?;
    Ok(HttpResponse::Ok().json(review))
}

route!(categories => Get "/categories" impl CatalogManagement);
pub async fn categories<B: CatalogManagement>(api: web::Data<CatalogApi<B>>) -> Result<HttpResponse, ServerError> {
    let categories = api.categories().await?;
    Ok(HttpResponse::Ok().json(categories))
}

route!(category_products => Get "/categories/{id}/products" impl CatalogManagement);
pub async fn category_products<B: CatalogManagement>(
    path: web::Path<i64>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let products = api.products_in_category(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(products))
}

//----------------------------------------------   Cart  ----------------------------------------------------
route!(cart => Get "/cart" impl CartManagement);
pub async fn cart<B: CartManagement>(
    user: SessionUser,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let lines = api.items(user.user_id).await?;
    Ok(HttpResponse::Ok().json(lines))
}

route!(cart_summary => Get "/cart/summary" impl CartManagement);
pub async fn cart_summary<B: CartManagement>(
    user: SessionUser,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let summary = api.summary(user.user_id).await?;
    Ok(HttpResponse::Ok().json(summary))
}

route!(add_to_cart => Post "/cart" impl CartManagement);
/// Adding a product that is already in the cart increases its quantity.
pub async fn add_to_cart<B: CartManagement>(
    user: SessionUser,
    body: web::Json<AddToCartRequest>,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let req = body.into_inner();
    req.validate()?;
    let item = api.add_item(user.user_id, req.product_id, req.quantity).await?;
    Ok(HttpResponse::Ok().json(item))
}

route!(update_cart_item => Put "/cart/{product_id}" impl CartManagement);
pub async fn update_cart_item<B: CartManagement>(
    user: SessionUser,
    path: web::Path<i64>,
    body: web::Json<UpdateCartRequest>,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let product_id = path.into_inner();
    let req = body.into_inner();
    req.validate()?;
    let item = api
        .update_item(user.user_id, product_id, req.quantity)
        .await?
        .ok_or_else(|| ServerError::NoRecordFound("Article non trouvé dans le panier".into()))?;
    Ok(HttpResponse::Ok().json(item))
}

route!(remove_cart_item => Delete "/cart/{product_id}" impl CartManagement);
pub async fn remove_cart_item<B: CartManagement>(
    user: SessionUser,
    path: web::Path<i64>,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let product_id = path.into_inner();
    if api.remove_item(user.user_id, product_id).await? {
        Ok(HttpResponse::Ok().json(JsonResponse::success("Article retiré du panier")))
    } else {
        Err(ServerError::NoRecordFound("Article non trouvé dans le panier".into()))
    }
}

route!(clear_cart => Delete "/cart" impl CartManagement);
pub async fn clear_cart<B: CartManagement>(
    user: SessionUser,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError> {
    api.clear(user.user_id).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success("Panier vidé")))
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(my_orders => Get "/orders" impl PaymentManagement, PaymentGateway);
/// The caller's orders, newest first.
pub async fn my_orders<B: PaymentManagement, G: PaymentGateway>(
    user: SessionUser,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError> {
    let orders = api.orders_for_user(user.user_id).await?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(order_by_id => Get "/orders/{id}" impl PaymentManagement, PaymentGateway);
/// An order and its items. Orders belonging to someone else are reported as missing.
pub async fn order_by_id<B: PaymentManagement, G: PaymentGateway>(
    user: SessionUser,
    path: web::Path<i64>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = path.into_inner();
    debug!("💻️ GET order #{order_id} for user #{}", user.user_id);
    let details = api
        .order_for_user(user.user_id, order_id)
        .await?
        .ok_or_else(|| ServerError::NoRecordFound("Commande non trouvée".into()))?;
    Ok(HttpResponse::Ok().json(details))
}

//----------------------------------------------   Payments  ----------------------------------------------------
route!(initiate_payment => Post "/payment/initiate" impl UserManagement, PaymentManagement, PaymentGateway);
/// Opens a hosted payment page for the caller and records a pending order.
///
/// Callback URLs are built from the configured public URL, or from the scheme and host of this request.
pub async fn initiate_payment<U: UserManagement, B: PaymentManagement, G: PaymentGateway>(
    req: HttpRequest,
    user: SessionUser,
    body: web::Json<InitiatePaymentRequest>,
    auth: web::Data<AuthApi<U>>,
    api: web::Data<OrderFlowApi<B, G>>,
    options: web::Data<ServerOptions>,
) -> Result<HttpResponse, ServerError> {
    let payment = body.into_inner();
    payment.validate()?;
    let customer = auth.user(user.user_id).await?.ok_or_else(ServerError::unauthenticated)?;
    let callbacks = callback_urls(&req, &options);
    let checkout = api.initiate_payment(&customer, payment.into(), &callbacks).await?;
    Ok(HttpResponse::Ok().json(InitiatePaymentResponse::from(checkout)))
}

route!(payment_notification => Post "" impl PaymentManagement, PaymentGateway);
/// The gateway's webhook, mounted at `/api/payment/notify` behind the IP allowlist. CinetPay posts form data, but JSON
/// bodies are accepted too.
///
/// The answer is plain text: `OK` once the notification has been handled (including notifications for unknown
/// transactions), `ERROR` if it could not be.
pub async fn payment_notification<B: PaymentManagement, G: PaymentGateway>(
    req: HttpRequest,
    body: web::Either<web::Json<NotificationPayload>, web::Form<NotificationPayload>>,
    auth: web::Data<NotificationAuth>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError> {
    let payload = match body {
        web::Either::Left(json) => json.into_inner(),
        web::Either::Right(form) => form.into_inner(),
    };
    trace!("💻️ Payment notification for {}: {}", payload.cpm_trans_id, payload.cpm_trans_status);
    let token = req.headers().get("x-token").and_then(|v| v.to_str().ok());
    if !auth.verify(&payload, token) {
        warn!("🔐️ Rejected payment notification for {} with a bad signature", payload.cpm_trans_id);
        return Err(ServerError::Forbidden("Signature invalide".into()));
    }
    let notification = match notification_from_payload(&payload) {
        Ok(n) => n,
        Err(e) => {
            warn!("📦️ Ignoring payment notification. {e}");
            return Ok(plain_text_response(true));
        },
    };
    match api.process_notification(notification).await {
        Ok(NotificationOutcome::Applied(result)) => {
            debug!("📦️ Notification for {} applied. Changed: {}", payload.cpm_trans_id, result.changed());
            Ok(plain_text_response(true))
        },
        Ok(NotificationOutcome::Deferred) => Ok(plain_text_response(true)),
        Err(e) => {
            error!("📦️ Could not apply payment notification for {}. {e}", payload.cpm_trans_id);
            Ok(plain_text_response(false))
        },
    }
}

fn plain_text_response(ok: bool) -> HttpResponse {
    if ok {
        HttpResponse::Ok().insert_header(ContentType::plaintext()).body("OK")
    } else {
        HttpResponse::InternalServerError().insert_header(ContentType::plaintext()).body("ERROR")
    }
}

route!(payment_status => Get "/payment/status/{transaction_id}" impl PaymentManagement, PaymentGateway);
/// Lets the customer poll the gateway for the outcome of their payment. An accepted payment completes the caller's
/// order, just as the notification would have.
pub async fn payment_status<B: PaymentManagement, G: PaymentGateway>(
    user: SessionUser,
    path: web::Path<String>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError> {
    let txid = path
        .into_inner()
        .parse::<TransactionId>()
        .map_err(|e| ServerError::validation("transactionId", e.to_string()))?;
    debug!("💻️ User #{} polls payment {txid}", user.user_id);
    match api.check_payment_status(user.user_id, &txid).await? {
        PaymentStatusReport::Known { status, amount, currency, .. } => {
            Ok(HttpResponse::Ok().json(PaymentStatusResponse { success: true, status, amount, currency }))
        },
        PaymentStatusReport::Unknown { message } => {
            Ok(HttpResponse::Ok().json(JsonResponse::failure(message)))
        },
    }
}
