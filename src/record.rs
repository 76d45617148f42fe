use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::types::PatientId;

/// One human name attached to a patient record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameEntry {
    /// Honorific prefix (`Mr.`, `Dr.`, ...), when present.
    pub prefix: Option<String>,
    /// First given name, when present.
    pub given: Option<String>,
    /// Family name. Entries without one are dropped at parse time, so the
    /// collector and transformer can rely on it being populated.
    pub family: String,
}

/// One contact point (phone, email, ...) attached to a patient record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelecomEntry {
    /// Contact system code (`phone`, `email`, ...).
    pub system: Option<String>,
    /// The contact value itself.
    pub value: Option<String>,
    /// Use code (`home`, `work`, ...); FHIR calls this field `use`.
    pub usage: Option<String>,
}

/// One postal address attached to a patient record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressEntry {
    /// First address line.
    pub line: Option<String>,
    /// City name.
    pub city: Option<String>,
    /// State or province.
    pub state: Option<String>,
    /// Postal code.
    pub postal_code: Option<String>,
    /// Country name or code.
    pub country: Option<String>,
}

/// Narrow read-only view of a patient record.
///
/// The collector and transformer depend only on this trait; the bundle
/// parser supplies the concrete type. Entry sequences keep their source
/// order, which the flattened token indices reflect.
pub trait PatientFields {
    /// Record identifier (empty when the source omits it).
    fn id(&self) -> &PatientId;
    /// Name entries in source order.
    fn names(&self) -> &[NameEntry];
    /// Telecom entries in source order.
    fn telecoms(&self) -> &[TelecomEntry];
    /// Address entries in source order.
    fn addresses(&self) -> &[AddressEntry];
    /// Gender code, when present.
    fn gender(&self) -> Option<&str>;
    /// Birth date, when present and decodable.
    fn birth_date(&self) -> Option<NaiveDate>;
    /// Death timestamp, when present and decodable.
    fn deceased_date_time(&self) -> Option<DateTime<FixedOffset>>;
    /// Marital status display text, when present.
    fn marital_status_text(&self) -> Option<&str>;
}
