pub mod models;
pub mod search;

pub use models::{
    GuestReservation, NewProperty, NewUser, Property, PropertyListing, Reservation, User,
};
pub use search::PropertySearch;
