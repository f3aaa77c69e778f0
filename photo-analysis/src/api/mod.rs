mod extractors;
mod handlers;
mod routes;
mod state;

pub use handlers::PushRequest;
pub use routes::create_router;
pub use state::AppState;
