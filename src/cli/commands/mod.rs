mod create_technician;
mod list;

pub use create_technician::cmd_create_technician;
pub use list::cmd_list_orders;
