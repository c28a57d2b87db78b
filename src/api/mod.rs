pub mod blocking;
pub mod extract;
pub mod routes;

pub use blocking::run_blocking;
pub use extract::JsonDocument;
pub use routes::create_router;
