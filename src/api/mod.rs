pub mod attendance;
pub mod menu;
pub mod receipt;
pub mod salary;
pub mod table;
pub mod takeaway;
pub mod user;

#[cfg(test)]
pub mod test_support;
