use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use crate::containers::BillsView;
use crate::error::StoreError;
use crate::models::DisplayBill;

#[derive(Debug, Default)]
pub struct BillsPage {
    pub data: Vec<DisplayBill>,
    pub loading: bool,
    pub error: Option<String>,
}

pub fn loading_page() -> String {
    r#"<div id="loading" data-testid="loading">Loading...</div>"#.to_string()
}

pub fn error_page(error: &str) -> String {
    format!(
        r#"<div class="layout"><div class="content" data-testid="error-message">{}</div></div>"#,
        text(error)
    )
}

/// Receipt popup; an empty body when the bill has no receipt.
pub fn receipt_modal(file_url: Option<&str>, file_name: Option<&str>) -> String {
    let body = match file_url {
        Some(url) => format!(
            r#"<div class="bill-proof-container"><img src="{}" alt="{}" /></div>"#,
            attr(url),
            attr(file_name.unwrap_or("Bill"))
        ),
        None => String::new(),
    };
    format!(
        r#"<div class="modal" id="modaleFile" data-testid="modaleFile"><div class="modal-header"><h5 class="modal-title">Justificatif</h5></div><div class="modal-body">{}</div></div>"#,
        body
    )
}

fn row(bill: &DisplayBill) -> String {
    let amount = format!("{} €", bill.bill.amount);
    format!(
        r#"<tr data-date="{date}"><td>{kind}</td><td>{name}</td><td data-testid="bill-date">{formatted}</td><td>{amount}</td><td>{status}</td><td><div class="icon-actions"><div id="eye" data-testid="icon-eye" data-bill-url="{url}">voir</div></div></td></tr>"#,
        date = attr(&bill.bill.date),
        kind = text(&bill.bill.bill_type),
        name = text(&bill.bill.name),
        formatted = text(&bill.formatted_date),
        amount = text(&amount),
        status = text(&bill.status_label),
        url = attr(bill.bill.file_url.as_deref().unwrap_or("")),
    )
}

/// Most recent first; dates compare as plain strings.
pub fn sort_by_date_desc(bills: &mut [DisplayBill]) {
    bills.sort_by(|a, b| b.bill.date.cmp(&a.bill.date));
}

pub fn bills_ui(page: &BillsPage) -> String {
    if page.loading {
        return loading_page();
    }
    if let Some(error) = &page.error {
        return error_page(error);
    }

    let mut data = page.data.clone();
    sort_by_date_desc(&mut data);
    let rows: String = data.iter().map(row).collect();

    format!(
        r#"<div class="layout"><div class="content"><div class="content-header"><div class="content-title">Mes notes de frais</div><button type="button" data-testid="btn-new-bill" class="btn btn-primary">Nouvelle note de frais</button></div><div id="data-table"><table id="example" class="table table-striped" style="width:100%"><thead><tr><th>Type</th><th>Nom</th><th>Date</th><th>Montant</th><th>Statut</th><th>Actions</th></tr></thead><tbody data-testid="tbody">{}</tbody></table></div></div>{}</div>"#,
        rows,
        receipt_modal(None, None)
    )
}

/// Collects the markup produced by the bills container.
#[derive(Debug, Default)]
pub struct HtmlBillsView {
    pub html: String,
    pub modal: Option<String>,
}

impl BillsView for HtmlBillsView {
    fn render_list(&mut self, bills: &[DisplayBill]) {
        self.html = bills_ui(&BillsPage {
            data: bills.to_vec(),
            ..Default::default()
        });
    }

    fn render_error(&mut self, error: &StoreError) {
        self.html = bills_ui(&BillsPage {
            error: Some(error.user_message()),
            ..Default::default()
        });
    }

    fn open_receipt(&mut self, file_url: Option<&str>, file_name: Option<&str>) {
        self.modal = Some(receipt_modal(file_url, file_name));
    }
}
