//! Request-scoped models.

pub mod session;

pub use session::{
    ACCESS_TOKEN_COOKIE, SessionCookies, USER_DATA_COOKIE, access_token_cookie, removal_cookies,
    set_cookie_values, user_data_cookie,
};
