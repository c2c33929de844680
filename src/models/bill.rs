use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    Pending,
    Accepted,
    Refused,
}

impl BillStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillStatus::Pending => "pending",
            BillStatus::Accepted => "accepted",
            BillStatus::Refused => "refused",
        }
    }
}

impl std::str::FromStr for BillStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BillStatus::Pending),
            "accepted" => Ok(BillStatus::Accepted),
            "refused" => Ok(BillStatus::Refused),
            other => Err(format!("unknown bill status: {}", other)),
        }
    }
}

/// An expense report as held by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: String,
    #[serde(rename = "type")]
    pub bill_type: String,
    pub name: String,
    /// ISO `YYYY-MM-DD`; ordered as a plain string.
    pub date: String,
    pub amount: f64,
    pub vat: Option<f64>,
    pub pct: Option<i32>,
    pub commentary: Option<String>,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub status: BillStatus,
    pub email: String,
}

impl<'r> FromRow<'r, PgRow> for Bill {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let status: String = row.try_get("status")?;
        let status = status
            .parse::<BillStatus>()
            .map_err(|e| sqlx::Error::Decode(e.into()))?;

        Ok(Self {
            id: row.try_get("id")?,
            bill_type: row.try_get("type")?,
            name: row.try_get("name")?,
            date: row.try_get("date")?,
            amount: row.try_get("amount")?,
            vat: row.try_get("vat")?,
            pct: row.try_get("pct")?,
            commentary: row.try_get("commentary")?,
            file_url: row.try_get("file_url")?,
            file_name: row.try_get("file_name")?,
            status,
            email: row.try_get("email")?,
        })
    }
}

/// Payload of a create call; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBill {
    #[serde(rename = "type")]
    pub bill_type: String,
    pub name: String,
    pub date: String,
    pub amount: f64,
    pub vat: Option<f64>,
    pub pct: Option<i32>,
    pub commentary: Option<String>,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub status: BillStatus,
    pub email: String,
}

/// A bill prepared for display: labels are computed, the raw record is kept for ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayBill {
    pub bill: Bill,
    pub formatted_date: String,
    pub status_label: String,
}
