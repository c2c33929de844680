pub mod bills;
pub mod new_bill;

use crate::error::StoreError;
use crate::models::DisplayBill;

/// What the bills screen must be able to show.
pub trait BillsView {
    fn render_list(&mut self, bills: &[DisplayBill]);
    fn render_error(&mut self, error: &StoreError);
    fn open_receipt(&mut self, file_url: Option<&str>, file_name: Option<&str>);
}

/// What the new bill form must be able to show.
pub trait NewBillView {
    fn show_file_name(&mut self, name: &str);
    fn clear_file(&mut self);
    fn render_error(&mut self, error: &StoreError);
}

pub use bills::Bills;
pub use new_bill::{BillForm, NewBill};
