pub mod balances;
pub mod users;

pub use balances::Balance;
pub use users::User;
