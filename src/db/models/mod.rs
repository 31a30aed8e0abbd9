mod appointment;
mod barber;
mod customer;
mod media;
mod service;

pub use appointment::*;
pub use barber::*;
pub use customer::*;
pub use media::*;
pub use service::*;
