mod appointment_repository;
mod barber_repository;
mod customer_repository;
mod media_repository;
mod service_repository;

pub use appointment_repository::AppointmentRepository;
pub use barber_repository::BarberRepository;
pub use customer_repository::CustomerRepository;
pub use media_repository::MediaRepository;
pub use service_repository::ServiceRepository;
