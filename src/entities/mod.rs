pub mod prelude;

pub mod orders;
pub mod users;
