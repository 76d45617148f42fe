/// Patient resource identifier as it appears in a bundle.
/// Examples: `8b7c6f2a-1d4e-4f3b-9a0c-5e6d7f8a9b0c`, `example-patient-1`
pub type PatientId = String;
/// One flattened corpus line of `COL <field> VAL <values>` tokens.
/// Example: `COL id VAL example-patient-1 COL name0 VAL Mr. John Doe ...`
pub type FlatLine = String;
/// Zero-based line index into a corpus file, the implicit join key between
/// the original corpus and its transformed counterpart.
pub type LineIndex = usize;
