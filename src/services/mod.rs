pub mod availability;
pub mod booking;
pub mod cancellation;
pub mod clients;
pub mod messaging;
pub mod salon;
pub mod storage;
