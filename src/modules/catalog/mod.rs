pub mod handlers;
pub mod routes;

pub use routes::catalog_routes;
