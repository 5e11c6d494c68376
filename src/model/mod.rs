pub mod attendance;
pub mod menu_item;
pub mod receipt;
pub mod role;
pub mod table;
pub mod user;
