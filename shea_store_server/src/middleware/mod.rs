mod session;

pub use session::{removal_cookie, session_cookie, SessionMiddlewareFactory, SessionUser, SESSION_COOKIE};
