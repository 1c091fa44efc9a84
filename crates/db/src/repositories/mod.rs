mod system_status_repo;
mod time_slot_repo;

pub use system_status_repo::SystemStatusRepo;
pub use time_slot_repo::{BatchSaveError, TimeSlotRepo};
