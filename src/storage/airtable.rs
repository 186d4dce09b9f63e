//! Hosted spreadsheet database implementation of BookingRepository
//!
//! Talks to an Airtable-compatible REST API: one table, one record per
//! booking, booking attributes stored as record fields under their camelCase
//! names. No retries are attempted; every failure surfaces as a
//! [`StorageError`].

use crate::config::AirtableConfig;
use crate::core::booking::{Booking, BookingFields, BookingId};
use crate::core::error::StorageError;
use crate::core::service::BookingRepository;
use crate::core::validation::validators::{as_whole_number, parse_calendar_date};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

const BACKEND: &str = "airtable";

/// Booking repository backed by a hosted table
#[derive(Clone)]
pub struct AirtableBookingRepository {
    client: Client,
    table_url: String,
    api_key: String,
}

impl AirtableBookingRepository {
    pub fn new(config: &AirtableConfig) -> Result<Self, StorageError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StorageError::Connection {
                backend: BACKEND.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            table_url: format!(
                "{}/{}/{}",
                config.base_url.trim_end_matches('/'),
                config.base_id,
                config.table
            ),
            api_key: config.api_key.clone(),
        })
    }

    pub fn table_url(&self) -> &str {
        &self.table_url
    }

    /// Record endpoint with the id as one percent-encoded path segment
    fn record_url(&self, id: &BookingId) -> Result<Url, StorageError> {
        let invalid = |message: String| StorageError::Query {
            backend: BACKEND.to_string(),
            message,
        };
        let mut url = Url::parse(&self.table_url)
            .map_err(|e| invalid(format!("invalid table url '{}': {}", self.table_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| invalid(format!("table url '{}' cannot take a path", self.table_url)))?
            .push(id.as_str());
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, StorageError> {
        request
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| StorageError::Connection {
                backend: BACKEND.to_string(),
                message: e.to_string(),
            })
    }

    async fn expect_success(
        response: Response,
        id: Option<&BookingId>,
    ) -> Result<Response, StorageError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            if let Some(id) = id {
                return Err(StorageError::NotFound { id: id.clone() });
            }
        }
        let body = response.text().await.unwrap_or_default();
        Err(StorageError::Query {
            backend: BACKEND.to_string(),
            message: format!("HTTP {}: {}", status, body),
        })
    }

    async fn decode<T: for<'de> Deserialize<'de>>(response: Response) -> Result<T, StorageError> {
        response.json::<T>().await.map_err(|e| StorageError::Decode {
            backend: BACKEND.to_string(),
            message: e.to_string(),
        })
    }

    async fn single_record(response: Response) -> Result<Booking, StorageError> {
        let batch: RecordBatch = Self::decode(response).await?;
        batch
            .records
            .into_iter()
            .next()
            .ok_or_else(|| decode_error("response carried no record"))?
            .into_booking()
    }
}

#[async_trait]
impl BookingRepository for AirtableBookingRepository {
    async fn list(&self) -> Result<Vec<Booking>, StorageError> {
        let mut bookings = Vec::new();
        let mut offset: Option<String> = None;

        loop {
            let mut query: Vec<(&str, String)> = vec![
                ("sort[0][field]", "checkinDate".to_string()),
                ("sort[0][direction]", "asc".to_string()),
            ];
            if let Some(offset) = &offset {
                query.push(("offset", offset.clone()));
            }

            let response = self
                .send(self.client.get(&self.table_url).query(&query))
                .await?;
            let response = Self::expect_success(response, None).await?;
            let page: RecordPage = Self::decode(response).await?;

            for record in page.records {
                let id = record.id.clone();
                match record.into_booking() {
                    Ok(booking) => bookings.push(booking),
                    Err(e) => tracing::warn!(id = %id, error = %e, "skipping unreadable airtable record"),
                }
            }

            match page.offset {
                Some(next) => offset = Some(next),
                None => break,
            }
        }

        tracing::debug!(count = bookings.len(), "listed bookings from airtable");
        Ok(bookings)
    }

    async fn get(&self, id: &BookingId) -> Result<Option<Booking>, StorageError> {
        let response = self.send(self.client.get(self.record_url(id)?)).await?;
        match Self::expect_success(response, Some(id)).await {
            Ok(response) => {
                let record: Record = Self::decode(response).await?;
                record.into_booking().map(Some)
            }
            Err(StorageError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn create(
        &self,
        fields: BookingFields,
        created_at: DateTime<Utc>,
    ) -> Result<Booking, StorageError> {
        let body = WriteBatch {
            records: vec![WriteRecord {
                id: None,
                fields: RecordFieldsOut::new(&fields, Some(created_at)),
            }],
        };

        let response = self
            .send(self.client.post(&self.table_url).json(&body))
            .await?;
        let response = Self::expect_success(response, None).await?;
        let booking = Self::single_record(response).await?;
        tracing::debug!(id = %booking.id, "created airtable record");
        Ok(booking)
    }

    async fn update(
        &self,
        id: &BookingId,
        fields: BookingFields,
    ) -> Result<Booking, StorageError> {
        let body = WriteBatch {
            records: vec![WriteRecord {
                id: Some(id.clone()),
                fields: RecordFieldsOut::new(&fields, None),
            }],
        };

        let response = self
            .send(self.client.patch(&self.table_url).json(&body))
            .await?;
        let response = Self::expect_success(response, Some(id)).await?;
        Self::single_record(response).await
    }

    async fn delete(&self, id: &BookingId) -> Result<(), StorageError> {
        let response = self
            .send(
                self.client
                    .delete(&self.table_url)
                    .query(&[("records[]", id.as_str())]),
            )
            .await?;
        Self::expect_success(response, Some(id)).await?;
        tracing::debug!(id = %id, "deleted airtable record");
        Ok(())
    }
}

// =============================================================================
// Wire format
// =============================================================================

#[derive(Debug, Deserialize)]
struct RecordPage {
    #[serde(default)]
    records: Vec<Record>,
    offset: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RecordBatch {
    #[serde(default)]
    records: Vec<Record>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Record {
    id: String,
    #[serde(default)]
    fields: serde_json::Map<String, Value>,
    created_time: Option<DateTime<Utc>>,
}

impl Record {
    fn into_booking(self) -> Result<Booking, StorageError> {
        let field = |name: &str| {
            self.fields
                .get(name)
                .ok_or_else(|| decode_error(format!("record {} lacks field '{}'", self.id, name)))
        };
        let date = |name: &str| {
            field(name).and_then(|value| {
                parse_calendar_date(value)
                    .ok_or_else(|| decode_error(format!("record {} has a bad '{}'", self.id, name)))
            })
        };
        let number = |name: &str| {
            field(name).and_then(|value| {
                value
                    .as_f64()
                    .ok_or_else(|| decode_error(format!("record {} has a bad '{}'", self.id, name)))
            })
        };
        let text = |name: &str| {
            field(name).and_then(|value| {
                value
                    .as_str()
                    .map(str::to_string)
                    .ok_or_else(|| decode_error(format!("record {} has a bad '{}'", self.id, name)))
            })
        };

        let fields = BookingFields {
            checkin_date: date("checkinDate")?,
            checkout_date: date("checkoutDate")?,
            customer_name: text("customerName")?,
            customer_phone: text("customerPhone")?,
            booking_amount: number("bookingAmount")?,
            advance_amount: number("advanceAmount")?,
            number_of_guests: field("numberOfGuests").and_then(|value| {
                as_whole_number(value).ok_or_else(|| {
                    decode_error(format!("record {} has a bad 'numberOfGuests'", self.id))
                })
            })?,
        };

        let created_at = self
            .fields
            .get("createdAt")
            .and_then(Value::as_str)
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|ts| ts.with_timezone(&Utc))
            .or(self.created_time)
            .ok_or_else(|| decode_error(format!("record {} has no creation time", self.id)))?;

        Ok(Booking::new(BookingId::new(self.id), fields, created_at))
    }
}

#[derive(Debug, Serialize)]
struct WriteBatch {
    records: Vec<WriteRecord>,
}

#[derive(Debug, Serialize)]
struct WriteRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<BookingId>,
    fields: RecordFieldsOut,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecordFieldsOut {
    #[serde(flatten)]
    fields: BookingFields,
    #[serde(skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
}

impl RecordFieldsOut {
    fn new(fields: &BookingFields, created_at: Option<DateTime<Utc>>) -> Self {
        Self {
            fields: fields.clone(),
            created_at,
        }
    }
}

fn decode_error(message: impl Into<String>) -> StorageError {
    StorageError::Decode {
        backend: BACKEND.to_string(),
        message: message.into(),
    }
}
