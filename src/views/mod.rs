//! HTML fragments for the bills table and the new bill form.

mod bills_ui;
mod new_bill_ui;

pub use bills_ui::{HtmlBillsView, sort_by_date_desc};
pub use new_bill_ui::{EXPENSE_TYPES, new_bill_ui};
