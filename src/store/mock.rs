//! In-memory store used by the container and view tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{BillStore, ReceiptFile, UploadedFile};
use crate::error::StoreError;
use crate::models::{Bill, BillStatus, NewBill};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    NotFound,
    Server,
}

impl Failure {
    fn to_error(self) -> StoreError {
        match self {
            Failure::NotFound => StoreError::NotFound("mock".into()),
            Failure::Server => StoreError::Server("mock".into()),
        }
    }
}

#[derive(Default)]
pub struct MockStore {
    bills: Option<Vec<Bill>>,
    failure: Option<Failure>,
    pub list_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
    pub upload_calls: AtomicUsize,
    pub created: Mutex<Vec<NewBill>>,
    pub uploaded: Mutex<Vec<ReceiptFile>>,
}

impl MockStore {
    pub fn with_bills(bills: Vec<Bill>) -> Self {
        Self {
            bills: Some(bills),
            ..Default::default()
        }
    }

    /// A store that answers without any collection.
    pub fn empty_answer() -> Self {
        Self::default()
    }

    pub fn failing(failure: Failure) -> Self {
        Self {
            failure: Some(failure),
            ..Default::default()
        }
    }

    pub fn calls(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BillStore for MockStore {
    async fn list_bills(&self) -> Result<Option<Vec<Bill>>, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(failure) = self.failure {
            return Err(failure.to_error());
        }
        Ok(self.bills.clone())
    }

    async fn create_bill(&self, bill: NewBill) -> Result<Bill, StoreError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(failure) = self.failure {
            return Err(failure.to_error());
        }
        let mut created = self.created.lock().unwrap();
        created.push(bill.clone());
        Ok(into_bill(bill, format!("mock-{}", created.len())))
    }

    async fn upload_file(&self, file: ReceiptFile) -> Result<UploadedFile, StoreError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(failure) = self.failure {
            return Err(failure.to_error());
        }
        let uploaded = UploadedFile {
            file_url: format!("https://localhost:3456/images/{}", file.name),
            file_key: "1234".to_string(),
        };
        self.uploaded.lock().unwrap().push(file);
        Ok(uploaded)
    }
}

fn into_bill(bill: NewBill, id: String) -> Bill {
    Bill {
        id,
        bill_type: bill.bill_type,
        name: bill.name,
        date: bill.date,
        amount: bill.amount,
        vat: bill.vat,
        pct: bill.pct,
        commentary: bill.commentary,
        file_url: bill.file_url,
        file_name: bill.file_name,
        status: bill.status,
        email: bill.email,
    }
}

fn fixture(id: &str, name: &str, date: &str, amount: f64, status: BillStatus) -> Bill {
    Bill {
        id: id.to_string(),
        bill_type: "Hôtel et logement".to_string(),
        name: name.to_string(),
        date: date.to_string(),
        amount,
        vat: Some(80.0),
        pct: Some(20),
        commentary: Some("séminaire billed".to_string()),
        file_url: Some(format!("https://localhost:3456/images/{}.jpg", id)),
        file_name: Some(format!("{}.jpg", id)),
        status,
        email: "a@a".to_string(),
    }
}

/// Four bills deliberately out of date order.
pub fn fixture_bills() -> Vec<Bill> {
    vec![
        fixture("47qAXb6fIm2zOKkLzMro", "encore", "2004-04-04", 400.0, BillStatus::Pending),
        fixture("BeKy5Mo4jkmdfPGYpTxZ", "test1", "2001-01-01", 100.0, BillStatus::Refused),
        fixture("UIUZtnPQvnbFnB0ozvJh", "test3", "2003-03-03", 300.0, BillStatus::Accepted),
        fixture("qcCK3SzECmaZAGRrHjaC", "test2", "2002-02-02", 200.0, BillStatus::Refused),
    ]
}
