pub mod users;
pub mod catalog;
pub mod shows;
pub mod bookings;
pub mod extract;

use axum::Router;
use std::sync::Arc;

pub fn routes() -> Router<Arc<crate::AppState>> {
    Router::new()
        .merge(users::routes())
        .merge(catalog::routes())
        .merge(shows::routes())
        .merge(bookings::routes())
}
