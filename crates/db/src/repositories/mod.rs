pub mod item_repo;
pub mod order_repo;
pub mod reservation_repo;
pub mod user_repo;

pub use item_repo::ItemRepo;
pub use order_repo::OrderRepo;
pub use reservation_repo::ReservationRepo;
pub use user_repo::UserRepo;
