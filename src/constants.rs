use crate::splits::SplitLabel;

/// Constants used by bundle parsing.
pub mod bundle {
    /// Resource type expected at the top level of a bundle export file.
    pub const BUNDLE_RESOURCE_TYPE: &str = "Bundle";
    /// Resource type of the entries the pipeline extracts.
    pub const PATIENT_RESOURCE_TYPE: &str = "Patient";
    /// Wire key carrying the resource type discriminator.
    pub const RESOURCE_TYPE_KEY: &str = "resourceType";
}

/// Constants used by record flattening and token layout.
pub mod flatten {
    /// Token introducing a field name.
    pub const COL_TOKEN: &str = "COL";
    /// Token introducing a field's values.
    pub const VAL_TOKEN: &str = "VAL";
    /// Field name for the record identifier.
    pub const FIELD_ID: &str = "id";
    /// Field-name stem for indexed name tokens (`name0`, `name1`, ...).
    pub const FIELD_NAME: &str = "name";
    /// Field-name stem for indexed telecom tokens.
    pub const FIELD_TELECOM: &str = "telecom";
    /// Field name for gender.
    pub const FIELD_GENDER: &str = "gender";
    /// Field name for the birth date.
    pub const FIELD_BIRTH_DATE: &str = "birthDate";
    /// Field name for the death timestamp.
    pub const FIELD_DECEASED: &str = "deceasedDateTime";
    /// Field-name stem for indexed address tokens.
    pub const FIELD_ADDRESS: &str = "address";
    /// Field name for marital status text.
    pub const FIELD_MARITAL_STATUS: &str = "maritalStatus";
    /// Wire/render format for birth dates.
    pub const BIRTH_DATE_FORMAT: &str = "%Y-%m-%d";
    /// Render format for death timestamps.
    pub const DECEASED_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%:z";
}

/// Constants used by corpus construction.
pub mod corpus {
    /// File stem for the original (untransformed) corpus.
    pub const ORIGINAL_STEM: &str = "patient_train";
    /// File stem for the transformed corpus.
    pub const TRANSFORMED_STEM: &str = "patient_transformed";
    /// Extension shared by corpus files.
    pub const CORPUS_EXTENSION: &str = "txt";
}

/// Constants used by split files and pair labeling.
pub mod splits {
    use super::SplitLabel;

    /// Output filename for the train split.
    pub const TRAIN_FILENAME: &str = "train.txt";
    /// Output filename for the test split.
    pub const TEST_FILENAME: &str = "test.txt";
    /// Output filename for the validation split.
    pub const VALID_FILENAME: &str = "valid.txt";
    /// Wire label for matching pairs.
    pub const LABEL_MATCH: &str = "1";
    /// Wire label for non-matching pairs.
    pub const LABEL_NON_MATCH: &str = "0";
    /// Separator between the original, candidate, and label columns.
    pub const PAIR_SEPARATOR: char = '\t';
    /// Canonical split window order used when carving the corpus.
    pub const ALL_SPLITS: [SplitLabel; 3] =
        [SplitLabel::Train, SplitLabel::Test, SplitLabel::Validation];
}

/// Constants used by the noise transformer.
pub mod transform {
    /// Default probability that a transformed line's names are corrupted.
    pub const NAME_CORRUPTION_PROBABILITY: f32 = 0.5;
}
