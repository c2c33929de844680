use std::path::Path;

use async_trait::async_trait;
use mime::Mime;

use crate::error::StoreError;
use crate::models::{Bill, NewBill};

#[cfg(test)]
pub mod mock;

/// A receipt picked by the user, not yet uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptFile {
    pub name: String,
    pub content_type: Mime,
    pub bytes: Vec<u8>,
}

impl ReceiptFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let content_type = guess_mime(&name);
        Self {
            name,
            content_type,
            bytes,
        }
    }

    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(name, bytes))
    }

    /// Lowercased extension of the file name, if any.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
    }
}

fn guess_mime(name: &str) -> Mime {
    let ext = Path::new(name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase());
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => mime::IMAGE_JPEG,
        Some("png") => mime::IMAGE_PNG,
        Some("pdf") => mime::APPLICATION_PDF,
        _ => mime::APPLICATION_OCTET_STREAM,
    }
}

/// Where an uploaded receipt ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_url: String,
    pub file_key: String,
}

/// The remote collaborator holding bills and receipts.
#[async_trait]
pub trait BillStore: Send + Sync {
    /// `Ok(None)` means the store answered without a collection.
    async fn list_bills(&self) -> Result<Option<Vec<Bill>>, StoreError>;

    async fn create_bill(&self, bill: NewBill) -> Result<Bill, StoreError>;

    async fn upload_file(&self, file: ReceiptFile) -> Result<UploadedFile, StoreError>;
}
