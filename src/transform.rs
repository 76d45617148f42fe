//! Controlled-noise transformation of flattened records.
//!
//! A transformed line models an imperfect duplicate of its source record:
//! the identifier is always rotated to a fresh random token, and names are
//! probabilistically reordered or partially dropped. Every corruption
//! strategy keeps the family name intact, which is what keeps a corrupted
//! line recognizably linked to its source while breaking surface-form
//! matching. Telecoms, addresses, gender, dates, and marital status are
//! never touched.

use rand::Rng;
use uuid::Builder;

use crate::constants::transform::NAME_CORRUPTION_PROBABILITY;
use crate::flatten::{assemble_line, collect_names, name_token};
use crate::record::{NameEntry, PatientFields};
use crate::types::FlatLine;

/// Name corruption strategies. Every variant preserves the family name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NameCorruption {
    /// Emit `prefix family given` instead of `prefix given family`.
    Switch,
    /// Drop the prefix, emit `family given`.
    MissingPrefix,
    /// Drop both prefix and given name, emit `family` only.
    MissingGiven,
}

impl NameCorruption {
    /// All strategies, in the order used for uniform selection.
    pub const ALL: [NameCorruption; 3] = [
        NameCorruption::Switch,
        NameCorruption::MissingPrefix,
        NameCorruption::MissingGiven,
    ];

    /// Render one indexed name token under this strategy.
    pub fn render(self, index: usize, name: &NameEntry) -> String {
        let prefix = name.prefix.as_deref().unwrap_or("");
        let given = name.given.as_deref().unwrap_or("");
        match self {
            NameCorruption::Switch => name_token(index, &[prefix, &name.family, given]),
            NameCorruption::MissingPrefix => name_token(index, &[&name.family, given]),
            NameCorruption::MissingGiven => name_token(index, &[&name.family]),
        }
    }

    fn choose<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Produces corrupted variants of flattened patient lines.
#[derive(Clone, Copy, Debug)]
pub struct NoiseInjector {
    corruption_probability: f32,
}

impl Default for NoiseInjector {
    fn default() -> Self {
        Self::new(NAME_CORRUPTION_PROBABILITY)
    }
}

impl NoiseInjector {
    /// Create an injector that corrupts names with the given probability
    /// (clamped to `0.0..=1.0`).
    pub fn new(corruption_probability: f32) -> Self {
        Self {
            corruption_probability: corruption_probability.clamp(0.0, 1.0),
        }
    }

    /// Flatten `patient` with a rotated identifier and probabilistically
    /// corrupted names.
    ///
    /// One coin decides whether names are corrupted at all; if it lands, a
    /// strategy is chosen independently per name entry. The identifier is
    /// rotated regardless of the coin.
    pub fn transform_patient<P, R>(&self, patient: &P, rng: &mut R) -> FlatLine
    where
        P: PatientFields + ?Sized,
        R: Rng + ?Sized,
    {
        let rotated = rotated_identifier(rng);
        let corrupt = self.corruption_probability > 0.0
            && rng.random::<f32>() < self.corruption_probability;
        let names = if corrupt {
            let mut out = String::new();
            for (idx, name) in patient.names().iter().enumerate() {
                out.push_str(&NameCorruption::choose(rng).render(idx, name));
            }
            out
        } else {
            collect_names(patient.names())
        };
        assemble_line(patient, &rotated, &names)
    }
}

/// Fresh RFC 4122 v4 identifier drawn from `rng`, so seeded runs rotate
/// identifiers reproducibly.
pub fn rotated_identifier<R: Rng + ?Sized>(rng: &mut R) -> String {
    Builder::from_random_bytes(rng.random()).into_uuid().to_string()
}
