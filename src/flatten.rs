//! Record flattening into canonical corpus lines.
//!
//! Flattening is a pure function of the record: no randomness, and token
//! groups always appear in the fixed order id, names, telecoms, gender,
//! birthDate, deceasedDateTime, addresses, maritalStatus. That stable order
//! is what lets line `i` of the original corpus and line `i` of the
//! transformed corpus describe the same source record.

use crate::constants::flatten::{
    BIRTH_DATE_FORMAT, COL_TOKEN, DECEASED_DATE_FORMAT, FIELD_ADDRESS, FIELD_BIRTH_DATE,
    FIELD_DECEASED, FIELD_GENDER, FIELD_ID, FIELD_MARITAL_STATUS, FIELD_NAME, FIELD_TELECOM,
    VAL_TOKEN,
};
use crate::record::{AddressEntry, NameEntry, PatientFields, TelecomEntry};
use crate::types::FlatLine;

/// Serialize every field of `patient` into one canonical corpus line.
pub fn flatten_patient<P: PatientFields + ?Sized>(patient: &P) -> FlatLine {
    assemble_line(patient, patient.id(), &collect_names(patient.names()))
}

/// Assemble a full line from an identifier and a pre-rendered names segment.
///
/// Owns the fixed field order shared by the original and transformed
/// corpora; the transformer substitutes its own identifier and names but
/// never touches the other fields.
pub(crate) fn assemble_line<P: PatientFields + ?Sized>(
    patient: &P,
    id: &str,
    names: &str,
) -> FlatLine {
    let mut line = String::new();
    line.push_str(&field_token(FIELD_ID, &[id]));
    line.push_str(names);
    line.push_str(&collect_telecoms(patient.telecoms()));
    line.push_str(&field_token(FIELD_GENDER, &[patient.gender().unwrap_or("")]));
    let birth = patient
        .birth_date()
        .map(|date| date.format(BIRTH_DATE_FORMAT).to_string())
        .unwrap_or_default();
    line.push_str(&field_token(FIELD_BIRTH_DATE, &[&birth]));
    let deceased = patient
        .deceased_date_time()
        .map(|timestamp| timestamp.format(DECEASED_DATE_FORMAT).to_string())
        .unwrap_or_default();
    line.push_str(&field_token(FIELD_DECEASED, &[&deceased]));
    line.push_str(&collect_addresses(patient.addresses()));
    line.push_str(&field_token(
        FIELD_MARITAL_STATUS,
        &[patient.marital_status_text().unwrap_or("")],
    ));
    line
}

/// Render the default `prefix given family` token for every name entry.
pub fn collect_names(names: &[NameEntry]) -> String {
    let mut out = String::new();
    for (idx, name) in names.iter().enumerate() {
        out.push_str(&name_token(
            idx,
            &[
                name.prefix.as_deref().unwrap_or(""),
                name.given.as_deref().unwrap_or(""),
                &name.family,
            ],
        ));
    }
    out
}

/// Render one indexed name token from already-ordered values.
pub(crate) fn name_token(index: usize, values: &[&str]) -> String {
    field_token(&format!("{FIELD_NAME}{index}"), values)
}

fn collect_telecoms(telecoms: &[TelecomEntry]) -> String {
    let mut out = String::new();
    for (idx, telecom) in telecoms.iter().enumerate() {
        out.push_str(&field_token(
            &format!("{FIELD_TELECOM}{idx}"),
            &[
                telecom.system.as_deref().unwrap_or(""),
                telecom.value.as_deref().unwrap_or(""),
                telecom.usage.as_deref().unwrap_or(""),
            ],
        ));
    }
    out
}

fn collect_addresses(addresses: &[AddressEntry]) -> String {
    let mut out = String::new();
    for (idx, address) in addresses.iter().enumerate() {
        out.push_str(&field_token(
            &format!("{FIELD_ADDRESS}{idx}"),
            &[
                address.line.as_deref().unwrap_or(""),
                address.city.as_deref().unwrap_or(""),
                address.state.as_deref().unwrap_or(""),
                address.postal_code.as_deref().unwrap_or(""),
                address.country.as_deref().unwrap_or(""),
            ],
        ));
    }
    out
}

fn field_token(field: &str, values: &[&str]) -> String {
    let mut token = format!("{COL_TOKEN} {field} {VAL_TOKEN}");
    for value in values {
        token.push(' ');
        token.push_str(value);
    }
    token.push(' ');
    token
}
