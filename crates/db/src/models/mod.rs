pub mod item;
pub mod order;
pub mod reservation;
pub mod user;
