pub mod handlers;
pub mod routes;

pub use routes::institute_routes;
