pub mod seat_inventory;
pub mod schedule_guard;
pub mod reservation;
pub mod invoice;
pub mod booking;
pub mod catalog;
pub mod accounts;

pub use accounts::{AccountService, JwtKeys};
pub use booking::BookingLifecycleService;
pub use catalog::CatalogService;
