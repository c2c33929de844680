mod bill;
mod user;

pub use bill::{Bill, BillStatus, DisplayBill, NewBill};
pub use user::{User, UserType};
