pub mod user;
pub mod catalog;
pub mod show;
pub mod seat;
pub mod booking;
pub mod invoice;

pub use user::User;
pub use catalog::{Location, Movie, Multiplex, MultiplexSummary, Screen};
pub use show::{NewShow, Show, ShowListing, ShowSlot, ShowWindow};
pub use seat::{Seat, SeatStatus};
pub use booking::{Booking, ReservedBooking};
pub use invoice::Invoice;
