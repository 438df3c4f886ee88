//! Session middleware for the Shea Store server.
//!
//! The middleware reads the `shea_session` cookie, resolves it against the configured session store and, if it names
//! a live session, attaches a [`SessionUser`] to the request. It never rejects a request itself. Handlers that need a
//! logged-in user take a [`SessionUser`] argument, and the extractor answers `401` when there is none.
//!
//! The session store is read from the application data as `web::Data<SessionApi<SessionStore>>`.

use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    cookie::{time::Duration as CookieDuration, Cookie, SameSite},
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    web,
    Error,
    FromRequest,
    HttpMessage,
    HttpRequest,
};
use futures::future::LocalBoxFuture;
use log::{debug, trace, warn};
use shea_store_engine::{SessionApi, SessionStore};

use crate::{config::ServerOptions, errors::ServerError};

pub const SESSION_COOKIE: &str = "shea_session";

/// The authenticated user behind a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub user_id: i64,
    pub session_key: String,
}

impl FromRequest for SessionUser {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user = req.extensions().get::<SessionUser>().cloned();
        ready(user.ok_or_else(|| {
            trace!("🔐️ No session on request to {}", req.path());
            ServerError::unauthenticated()
        }))
    }
}

/// The cookie handed out at login. Without `remember`, it is a browser-session cookie. The server-side session still
/// expires after the configured lifetime either way.
pub fn session_cookie(key: &str, remember: bool, options: &ServerOptions) -> Cookie<'static> {
    let mut builder = Cookie::build(SESSION_COOKIE, key.to_string())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(options.secure_cookies);
    if remember {
        builder = builder.max_age(CookieDuration::seconds(options.session_ttl.num_seconds()));
    }
    builder.finish()
}

/// A cookie that tells the browser to drop the session cookie.
pub fn removal_cookie(options: &ServerOptions) -> Cookie<'static> {
    let mut cookie = session_cookie("", false, options);
    cookie.make_removal();
    cookie
}

#[derive(Default)]
pub struct SessionMiddlewareFactory;

impl SessionMiddlewareFactory {
    pub fn new() -> Self {
        Self
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = SessionMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionMiddlewareService { service: Rc::new(service) }))
    }
}

pub struct SessionMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SessionMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        Box::pin(async move {
            let key = req.cookie(SESSION_COOKIE).map(|c| c.value().to_string()).filter(|k| !k.is_empty());
            let sessions = req.app_data::<web::Data<SessionApi<SessionStore>>>().cloned();
            match (key, sessions) {
                (Some(key), Some(sessions)) => match sessions.resolve(&key).await {
                    Ok(Some(session)) => {
                        trace!("🔐️ Request from user #{}", session.user_id);
                        req.extensions_mut().insert(SessionUser { user_id: session.user_id, session_key: key });
                    },
                    Ok(None) => debug!("🔐️ Request carries an unknown or expired session"),
                    Err(e) => warn!("🔐️ Could not look up session. Treating request as anonymous. {e}"),
                },
                (Some(_), None) => warn!("🔐️ No session store is configured. Treating request as anonymous."),
                (None, _) => {},
            }
            service.call(req).await
        })
    }
}
