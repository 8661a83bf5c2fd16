pub mod appstate;
pub mod configuration;
pub mod cookies;
pub mod errors;
pub mod extractors;
pub mod headers;
pub mod logger;
pub mod middlewares;
pub mod origin;
pub mod server;
pub mod users;
pub mod utils;
pub mod xsrf;
