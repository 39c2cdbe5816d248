pub mod points;
pub mod purchase;
pub mod session;
