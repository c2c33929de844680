use std::sync::Arc;

use chrono::NaiveDate;

use crate::containers::NewBillView;
use crate::error::NewBillError;
use crate::models::{Bill, BillStatus, NewBill as NewBillRecord};
use crate::router::{Navigator, Route};
use crate::session::Session;
use crate::store::{BillStore, ReceiptFile};

const ACCEPTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];
const DEFAULT_PCT: i32 = 20;

/// Raw field values as typed in the form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BillForm {
    pub bill_type: String,
    pub name: String,
    pub date: String,
    pub amount: String,
    pub vat: String,
    pub pct: String,
    pub commentary: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct StoredReceipt {
    file_url: String,
    file_name: String,
}

pub struct NewBill {
    store: Arc<dyn BillStore>,
    navigator: Arc<dyn Navigator>,
    session: Session,
    receipt: Option<StoredReceipt>,
}

impl NewBill {
    pub fn new(store: Arc<dyn BillStore>, navigator: Arc<dyn Navigator>, session: Session) -> Self {
        Self {
            store,
            navigator,
            session,
            receipt: None,
        }
    }

    #[cfg(test)]
    fn file_name(&self) -> Option<&str> {
        self.receipt.as_ref().map(|r| r.file_name.as_str())
    }

    /// Validate the picked receipt and upload it right away.
    pub async fn handle_change_file(
        &mut self,
        view: &mut dyn NewBillView,
        file: ReceiptFile,
    ) -> Result<(), NewBillError> {
        let accepted = file
            .extension()
            .is_some_and(|ext| ACCEPTED_EXTENSIONS.contains(&ext.as_str()));
        if !accepted {
            tracing::warn!(file = %file.name, "rejected receipt extension");
            self.receipt = None;
            view.clear_file();
            return Err(NewBillError::UnsupportedFile(file.name));
        }

        let file_name = file.name.clone();
        let uploaded = match self.store.upload_file(file).await {
            Ok(uploaded) => uploaded,
            Err(e) => {
                tracing::error!(error = %e, "receipt upload failed");
                self.receipt = None;
                view.clear_file();
                view.render_error(&e);
                return Err(e.into());
            }
        };

        tracing::debug!(file = %file_name, key = %uploaded.file_key, url = %uploaded.file_url, "receipt stored");
        view.show_file_name(&file_name);
        self.receipt = Some(StoredReceipt {
            file_url: uploaded.file_url,
            file_name,
        });

        Ok(())
    }

    /// Create the bill from the form and go back to the bills list.
    pub async fn handle_submit(
        &mut self,
        view: &mut dyn NewBillView,
        form: &BillForm,
    ) -> Result<Bill, NewBillError> {
        let record = self.build_record(form)?;

        let created = match self.store.create_bill(record).await {
            Ok(created) => created,
            Err(e) => {
                tracing::error!(error = %e, "bill creation failed");
                view.render_error(&e);
                return Err(e.into());
            }
        };

        tracing::info!(id = %created.id, "new bill submitted");
        self.navigator.navigate(Route::Bills);
        Ok(created)
    }

    fn build_record(&self, form: &BillForm) -> Result<NewBillRecord, NewBillError> {
        let bill_type = required("type", &form.bill_type)?;
        let name = required("name", &form.name)?;
        let date = required("date", &form.date)?;
        let amount = required("amount", &form.amount)?;

        if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
            return Err(invalid("date", date));
        }
        let amount = money("amount", amount)?;

        let vat = match form.vat.trim() {
            "" => None,
            vat => Some(money("vat", vat)?),
        };
        let pct = match form.pct.trim() {
            "" => DEFAULT_PCT,
            pct => pct.parse::<i32>().map_err(|_| invalid("pct", pct))?,
        };
        let commentary = match form.commentary.trim() {
            "" => None,
            commentary => Some(commentary.to_string()),
        };

        Ok(NewBillRecord {
            bill_type: bill_type.to_string(),
            name: name.to_string(),
            date: date.to_string(),
            amount,
            vat,
            pct: Some(pct),
            commentary,
            file_url: self.receipt.as_ref().map(|r| r.file_url.clone()),
            file_name: self.receipt.as_ref().map(|r| r.file_name.clone()),
            status: BillStatus::Pending,
            email: self.session.email().to_string(),
        })
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, NewBillError> {
    match value.trim() {
        "" => Err(NewBillError::MissingField(field)),
        value => Ok(value),
    }
}

/// Amounts must be finite and not negative, as a number input would enforce.
fn money(field: &'static str, value: &str) -> Result<f64, NewBillError> {
    match value.parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount >= 0.0 => Ok(amount),
        _ => Err(invalid(field, value)),
    }
}

fn invalid(field: &'static str, value: &str) -> NewBillError {
    NewBillError::InvalidField {
        field,
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::models::{User, UserType};
    use crate::router::recording::RecordingNavigator;
    use crate::store::mock::{Failure, MockStore};

    #[derive(Default)]
    struct RecordingView {
        file_name: Option<String>,
        cleared: usize,
        errors: Vec<String>,
    }

    impl NewBillView for RecordingView {
        fn show_file_name(&mut self, name: &str) {
            self.file_name = Some(name.to_string());
        }

        fn clear_file(&mut self) {
            self.file_name = None;
            self.cleared += 1;
        }

        fn render_error(&mut self, error: &StoreError) {
            self.errors.push(error.user_message());
        }
    }

    fn session() -> Session {
        Session::new(User {
            user_type: UserType::Employee,
            email: "test@email".to_string(),
        })
    }

    fn container(store: MockStore) -> (NewBill, Arc<MockStore>, Arc<RecordingNavigator>) {
        let store = Arc::new(store);
        let navigator = Arc::new(RecordingNavigator::default());
        let new_bill = NewBill::new(store.clone(), navigator.clone(), session());
        (new_bill, store, navigator)
    }

    fn filled_form() -> BillForm {
        BillForm {
            bill_type: "TypeTest".to_string(),
            name: "NameTest".to_string(),
            date: "2023-06-11".to_string(),
            amount: "999".to_string(),
            vat: "99".to_string(),
            pct: "99".to_string(),
            commentary: "CommentaryTest".to_string(),
        }
    }

    #[tokio::test]
    async fn selecting_a_file_shows_its_name() {
        let (mut new_bill, store, _) = container(MockStore::default());
        let mut view = RecordingView::default();

        new_bill
            .handle_change_file(&mut view, ReceiptFile::new("fichier.jpg", b"fichier".to_vec()))
            .await
            .unwrap();

        assert_eq!(view.file_name.as_deref(), Some("fichier.jpg"));
        assert_eq!(new_bill.file_name(), Some("fichier.jpg"));
        assert_eq!(MockStore::calls(&store.upload_calls), 1);
    }

    #[tokio::test]
    async fn unsupported_file_is_cleared_and_not_uploaded() {
        let (mut new_bill, store, _) = container(MockStore::default());
        let mut view = RecordingView::default();

        let err = new_bill
            .handle_change_file(&mut view, ReceiptFile::new("facture.pdf", vec![]))
            .await
            .unwrap_err();

        assert!(matches!(err, NewBillError::UnsupportedFile(name) if name == "facture.pdf"));
        assert_eq!(view.cleared, 1);
        assert_eq!(new_bill.file_name(), None);
        assert_eq!(MockStore::calls(&store.upload_calls), 0);
    }

    #[tokio::test]
    async fn submitting_a_full_form_creates_once_and_navigates_once() {
        let (mut new_bill, store, navigator) = container(MockStore::default());
        let mut view = RecordingView::default();
        new_bill
            .handle_change_file(&mut view, ReceiptFile::new("test.jpg", b"test".to_vec()))
            .await
            .unwrap();

        let created = new_bill.handle_submit(&mut view, &filled_form()).await.unwrap();

        assert_eq!(MockStore::calls(&store.create_calls), 1);
        assert_eq!(navigator.routes(), vec![Route::Bills]);
        assert_eq!(created.status, BillStatus::Pending);

        let sent = store.created.lock().unwrap()[0].clone();
        assert_eq!(sent.bill_type, "TypeTest");
        assert_eq!(sent.name, "NameTest");
        assert_eq!(sent.date, "2023-06-11");
        assert_eq!(sent.amount, 999.0);
        assert_eq!(sent.vat, Some(99.0));
        assert_eq!(sent.pct, Some(99));
        assert_eq!(sent.commentary.as_deref(), Some("CommentaryTest"));
        assert_eq!(sent.file_name.as_deref(), Some("test.jpg"));
        assert_eq!(
            sent.file_url.as_deref(),
            Some("https://localhost:3456/images/test.jpg")
        );
        assert_eq!(sent.email, "test@email");
    }

    #[tokio::test]
    async fn empty_pct_defaults_to_twenty() {
        let (mut new_bill, store, _) = container(MockStore::default());
        let mut view = RecordingView::default();
        let form = BillForm {
            vat: String::new(),
            pct: String::new(),
            commentary: String::new(),
            ..filled_form()
        };

        new_bill.handle_submit(&mut view, &form).await.unwrap();

        let sent = store.created.lock().unwrap()[0].clone();
        assert_eq!(sent.pct, Some(20));
        assert_eq!(sent.vat, None);
        assert_eq!(sent.commentary, None);
        assert_eq!(sent.file_url, None);
    }

    #[tokio::test]
    async fn missing_or_invalid_fields_never_reach_the_store() {
        let (mut new_bill, store, navigator) = container(MockStore::default());
        let mut view = RecordingView::default();

        let form = BillForm {
            name: "  ".to_string(),
            ..filled_form()
        };
        let err = new_bill.handle_submit(&mut view, &form).await.unwrap_err();
        assert!(matches!(err, NewBillError::MissingField("name")));

        let form = BillForm {
            amount: "beaucoup".to_string(),
            ..filled_form()
        };
        let err = new_bill.handle_submit(&mut view, &form).await.unwrap_err();
        assert!(matches!(err, NewBillError::InvalidField { field: "amount", .. }));

        let form = BillForm {
            date: "11/06/2023".to_string(),
            ..filled_form()
        };
        let err = new_bill.handle_submit(&mut view, &form).await.unwrap_err();
        assert!(matches!(err, NewBillError::InvalidField { field: "date", .. }));

        for amount in ["NaN", "inf", "-5"] {
            let form = BillForm {
                amount: amount.to_string(),
                ..filled_form()
            };
            let err = new_bill.handle_submit(&mut view, &form).await.unwrap_err();
            assert!(matches!(err, NewBillError::InvalidField { field: "amount", .. }), "{}", amount);
        }

        let form = BillForm {
            vat: "infinity".to_string(),
            ..filled_form()
        };
        let err = new_bill.handle_submit(&mut view, &form).await.unwrap_err();
        assert!(matches!(err, NewBillError::InvalidField { field: "vat", .. }));

        assert_eq!(MockStore::calls(&store.create_calls), 0);
        assert!(store.created.lock().unwrap().is_empty());
        assert!(navigator.routes().is_empty());
    }

    #[tokio::test]
    async fn failed_upload_forgets_the_previous_receipt() {
        let (mut new_bill, _, _) = container(MockStore::default());
        let mut view = RecordingView::default();
        new_bill
            .handle_change_file(&mut view, ReceiptFile::new("old.jpg", b"old".to_vec()))
            .await
            .unwrap();

        // same container state, now backed by a failing store
        new_bill.store = Arc::new(MockStore::failing(Failure::Server));
        let err = new_bill
            .handle_change_file(&mut view, ReceiptFile::new("new.jpg", b"new".to_vec()))
            .await
            .unwrap_err();

        assert!(matches!(err, NewBillError::Store(_)));
        assert_eq!(new_bill.file_name(), None);
        assert_eq!(view.file_name, None);
        assert_eq!(view.cleared, 1);
        assert_eq!(view.errors, vec!["Erreur 500".to_string()]);

        let record = new_bill.build_record(&filled_form()).unwrap();
        assert_eq!(record.file_url, None);
        assert_eq!(record.file_name, None);
    }

    #[tokio::test]
    async fn failed_creation_shows_error_without_navigating() {
        for (failure, message) in [(Failure::NotFound, "Erreur 404"), (Failure::Server, "Erreur 500")] {
            let (mut new_bill, store, navigator) = container(MockStore::failing(failure));
            let mut view = RecordingView::default();

            let err = new_bill.handle_submit(&mut view, &filled_form()).await.unwrap_err();

            assert!(matches!(err, NewBillError::Store(_)));
            assert_eq!(view.errors, vec![message.to_string()]);
            assert_eq!(MockStore::calls(&store.create_calls), 1);
            assert!(navigator.routes().is_empty());
        }
    }
}
