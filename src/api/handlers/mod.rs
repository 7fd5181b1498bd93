//! HTTP request handlers, one module per route prefix.

pub mod chat_handler;
pub mod cupid_handler;
pub mod dater_handler;
pub mod geo_handler;
pub mod gig_handler;
pub mod manager_handler;
pub mod notify_handler;
pub mod user_handler;
pub mod voice_handler;

pub use chat_handler::chat_routes;
pub use cupid_handler::cupid_routes;
pub use dater_handler::dater_routes;
pub use geo_handler::geo_routes;
pub use gig_handler::gig_routes;
pub use manager_handler::manager_routes;
pub use notify_handler::notify_routes;
pub use user_handler::{account_routes, user_routes};
pub use voice_handler::voice_routes;
