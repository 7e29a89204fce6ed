pub mod order;
pub mod user;

pub use order::{DEFAULT_STATUS, Order, OrderFields, OrderForm};
pub use user::{Actor, Role, User};
