pub mod attendance;
pub mod menu;
pub mod order;
pub mod revenue;
pub mod salary;
pub mod takeaway;
