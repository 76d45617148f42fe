//! FHIR bundle parsing into the narrow patient record interface.
//!
//! The wire model is deliberately lenient: unknown fields are ignored,
//! entries without a resource or with a non-Patient resource type are
//! skipped, and undecodable dates or family-less names are treated as
//! absent. A file that is not a parsable bundle, or a Patient resource
//! that fails to decode, is fatal.

use std::fs;
use std::path::Path;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Deserialize;
use serde_json::Value;

use crate::constants::bundle::{BUNDLE_RESOURCE_TYPE, PATIENT_RESOURCE_TYPE, RESOURCE_TYPE_KEY};
use crate::constants::flatten::BIRTH_DATE_FORMAT;
use crate::errors::PipelineError;
use crate::record::{AddressEntry, NameEntry, PatientFields, TelecomEntry};
use crate::types::PatientId;

#[derive(Debug, Deserialize)]
struct WireBundle {
    #[serde(rename = "resourceType")]
    resource_type: String,
    #[serde(default)]
    entry: Vec<WireEntry>,
}

#[derive(Debug, Deserialize)]
struct WireEntry {
    #[serde(default)]
    resource: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct WirePatient {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Vec<WireName>,
    #[serde(default)]
    telecom: Vec<WireTelecom>,
    #[serde(default)]
    address: Vec<WireAddress>,
    #[serde(default)]
    gender: Option<String>,
    #[serde(default, rename = "birthDate")]
    birth_date: Option<String>,
    #[serde(default, rename = "deceasedDateTime")]
    deceased_date_time: Option<String>,
    #[serde(default, rename = "maritalStatus")]
    marital_status: Option<WireMaritalStatus>,
}

#[derive(Debug, Deserialize)]
struct WireName {
    #[serde(default)]
    prefix: Vec<String>,
    #[serde(default)]
    given: Vec<String>,
    #[serde(default)]
    family: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireTelecom {
    #[serde(default)]
    system: Option<String>,
    #[serde(default)]
    value: Option<String>,
    #[serde(default, rename = "use")]
    usage: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireAddress {
    #[serde(default)]
    line: Vec<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default, rename = "postalCode")]
    postal_code: Option<String>,
    #[serde(default)]
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireMaritalStatus {
    #[serde(default)]
    text: Option<String>,
}

/// Patient record decoded from one bundle entry.
#[derive(Clone, Debug, Default)]
pub struct BundlePatient {
    /// Resource identifier (empty when the bundle omits it).
    pub id: PatientId,
    /// Name entries in bundle order; entries without a family name were
    /// dropped during decoding.
    pub names: Vec<NameEntry>,
    /// Telecom entries in bundle order.
    pub telecoms: Vec<TelecomEntry>,
    /// Address entries in bundle order.
    pub addresses: Vec<AddressEntry>,
    /// Gender code, when present.
    pub gender: Option<String>,
    /// Birth date, when present and decodable.
    pub birth_date: Option<NaiveDate>,
    /// Death timestamp, when present and decodable.
    pub deceased_date_time: Option<DateTime<FixedOffset>>,
    /// Marital status display text, when present.
    pub marital_status_text: Option<String>,
}

impl From<WirePatient> for BundlePatient {
    fn from(wire: WirePatient) -> Self {
        let names = wire
            .name
            .into_iter()
            .filter_map(|name| {
                let family = name.family?;
                Some(NameEntry {
                    prefix: name.prefix.into_iter().next(),
                    given: name.given.into_iter().next(),
                    family,
                })
            })
            .collect();
        let telecoms = wire
            .telecom
            .into_iter()
            .map(|telecom| TelecomEntry {
                system: telecom.system,
                value: telecom.value,
                usage: telecom.usage,
            })
            .collect();
        let addresses = wire
            .address
            .into_iter()
            .map(|address| AddressEntry {
                line: address.line.into_iter().next(),
                city: address.city,
                state: address.state,
                postal_code: address.postal_code,
                country: address.country,
            })
            .collect();
        Self {
            id: wire.id.unwrap_or_default(),
            names,
            telecoms,
            addresses,
            gender: wire.gender,
            birth_date: wire
                .birth_date
                .and_then(|raw| NaiveDate::parse_from_str(&raw, BIRTH_DATE_FORMAT).ok()),
            deceased_date_time: wire
                .deceased_date_time
                .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok()),
            marital_status_text: wire.marital_status.and_then(|status| status.text),
        }
    }
}

impl PatientFields for BundlePatient {
    fn id(&self) -> &PatientId {
        &self.id
    }

    fn names(&self) -> &[NameEntry] {
        &self.names
    }

    fn telecoms(&self) -> &[TelecomEntry] {
        &self.telecoms
    }

    fn addresses(&self) -> &[AddressEntry] {
        &self.addresses
    }

    fn gender(&self) -> Option<&str> {
        self.gender.as_deref()
    }

    fn birth_date(&self) -> Option<NaiveDate> {
        self.birth_date
    }

    fn deceased_date_time(&self) -> Option<DateTime<FixedOffset>> {
        self.deceased_date_time
    }

    fn marital_status_text(&self) -> Option<&str> {
        self.marital_status_text.as_deref()
    }
}

/// Parse one bundle export file into its patient records.
pub fn parse_bundle_file(path: &Path) -> Result<Vec<BundlePatient>, PipelineError> {
    let text = fs::read_to_string(path)?;
    parse_bundle_str(path, &text)
}

/// Parse bundle JSON text into its patient records.
///
/// `path` is used for error reporting only.
pub fn parse_bundle_str(path: &Path, text: &str) -> Result<Vec<BundlePatient>, PipelineError> {
    let bundle: WireBundle =
        serde_json::from_str(text).map_err(|err| PipelineError::MalformedBundle {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
    if bundle.resource_type != BUNDLE_RESOURCE_TYPE {
        return Err(PipelineError::MalformedBundle {
            path: path.to_path_buf(),
            reason: format!(
                "expected resourceType '{BUNDLE_RESOURCE_TYPE}', got '{}'",
                bundle.resource_type
            ),
        });
    }
    let mut patients = Vec::new();
    for entry in bundle.entry {
        let Some(resource) = entry.resource else {
            continue;
        };
        if resource.get(RESOURCE_TYPE_KEY).and_then(Value::as_str) != Some(PATIENT_RESOURCE_TYPE) {
            continue;
        }
        let wire: WirePatient =
            serde_json::from_value(resource).map_err(|err| PipelineError::MalformedBundle {
                path: path.to_path_buf(),
                reason: format!("patient resource failed to decode: {err}"),
            })?;
        patients.push(BundlePatient::from(wire));
    }
    Ok(patients)
}
