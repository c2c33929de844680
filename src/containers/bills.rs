use std::sync::Arc;

use crate::containers::BillsView;
use crate::error::StoreError;
use crate::format::{format_date, format_status};
use crate::models::DisplayBill;
use crate::router::{Navigator, Route};
use crate::store::BillStore;

pub struct Bills {
    store: Arc<dyn BillStore>,
    navigator: Arc<dyn Navigator>,
}

impl Bills {
    pub fn new(store: Arc<dyn BillStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self { store, navigator }
    }

    /// Fetch the user's bills with display labels, in store order.
    pub async fn get_bills(&self) -> Result<Vec<DisplayBill>, StoreError> {
        let Some(bills) = self.store.list_bills().await? else {
            tracing::debug!("store answered without bills");
            return Ok(Vec::new());
        };

        let bills = bills
            .into_iter()
            .filter(|bill| {
                let dated = !bill.date.trim().is_empty();
                if !dated {
                    tracing::warn!(id = %bill.id, "skipping bill without a date");
                }
                dated
            })
            .map(|bill| {
                let formatted_date = match format_date(&bill.date) {
                    Ok(date) => date,
                    Err(e) => {
                        // corrupted data: keep the raw date
                        tracing::warn!(id = %bill.id, date = %bill.date, error = %e, "unformattable bill date");
                        bill.date.clone()
                    }
                };
                DisplayBill {
                    status_label: format_status(bill.status).to_string(),
                    formatted_date,
                    bill,
                }
            })
            .collect();

        Ok(bills)
    }

    /// Fetch and hand the result to the view.
    pub async fn load(&self, view: &mut dyn BillsView) {
        match self.get_bills().await {
            Ok(bills) => view.render_list(&bills),
            Err(e) => {
                tracing::error!(error = %e, "failed to load bills");
                view.render_error(&e);
            }
        }
    }

    /// Open the receipt modal for an already rendered bill.
    pub fn handle_click_icon_eye(&self, view: &mut dyn BillsView, bill: &DisplayBill) {
        view.open_receipt(bill.bill.file_url.as_deref(), bill.bill.file_name.as_deref());
    }

    pub fn handle_click_new_bill(&self) {
        self.navigator.navigate(Route::NewBill);
    }
}
