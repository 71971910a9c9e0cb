pub mod handlers;
pub mod routes;

pub use routes::admission_routes;
