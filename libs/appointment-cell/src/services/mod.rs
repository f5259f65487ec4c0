pub mod coordinator;
pub mod records;
pub mod slots;

pub use coordinator::BookingCoordinator;
pub use records::AppointmentRecordsService;
