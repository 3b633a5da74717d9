pub mod items;
pub mod maintenance;
pub mod orders;
pub mod users;
