use staffcast_data::Record;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// The five categorical fields of an employee record.
///
/// Codecs are parameterized by this identity so an encode failure names
/// the field it happened on, and codecs are never shared across fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoricalField {
    Department,
    JobTitle,
    WorkMode,
    Location,
    Country,
}

impl CategoricalField {
    /// All fields in feature-vector order.
    pub const ALL: [CategoricalField; 5] = [
        CategoricalField::Department,
        CategoricalField::JobTitle,
        CategoricalField::WorkMode,
        CategoricalField::Location,
        CategoricalField::Country,
    ];

    /// Borrows this field's value from a record.
    pub fn value_of<'a>(&self, record: &'a Record) -> &'a str {
        match self {
            CategoricalField::Department => &record.department,
            CategoricalField::JobTitle => &record.job_title,
            CategoricalField::WorkMode => &record.work_mode,
            CategoricalField::Location => &record.location,
            CategoricalField::Country => &record.country,
        }
    }
}

impl fmt::Display for CategoricalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CategoricalField::Department => "Department",
            CategoricalField::JobTitle => "Job_Title",
            CategoricalField::WorkMode => "Work_Mode",
            CategoricalField::Location => "Location",
            CategoricalField::Country => "Country",
        };
        f.write_str(name)
    }
}

/// Errors raised by category codecs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("value {value:?} for {field} was not seen when the codec was fitted")]
    UnknownCategory {
        field: CategoricalField,
        value: String,
    },

    #[error("code {code} out of range for {field} codec with {len} labels")]
    CodeOutOfRange {
        field: CategoricalField,
        code: usize,
        len: usize,
    },

    #[error("cannot fit a codec for {field} on an empty value stream")]
    EmptyVocabulary { field: CategoricalField },
}

pub type EncodeResult<T> = Result<T, EncodeError>;

/// Bidirectional mapping between one field's labels and dense codes.
///
/// Codes are assigned in first-observed order, so the mapping (and
/// everything trained on it) is deterministic for a given value stream.
/// `encode` and `decode` are exact inverses over the fit-time vocabulary.
#[derive(Debug, Clone)]
pub struct CategoryCodec {
    field: CategoricalField,
    labels: Vec<String>,
    codes: HashMap<String, usize>,
}

impl CategoryCodec {
    /// Builds a codec from the values observed for one field.
    pub fn fit<I, S>(field: CategoricalField, values: I) -> EncodeResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut labels = Vec::new();
        let mut codes = HashMap::new();
        for value in values {
            let value = value.as_ref();
            if !codes.contains_key(value) {
                codes.insert(value.to_string(), labels.len());
                labels.push(value.to_string());
            }
        }
        if labels.is_empty() {
            return Err(EncodeError::EmptyVocabulary { field });
        }
        Ok(Self {
            field,
            labels,
            codes,
        })
    }

    /// The field this codec belongs to.
    pub fn field(&self) -> CategoricalField {
        self.field
    }

    /// Maps a label to its code.
    pub fn encode(&self, value: &str) -> EncodeResult<usize> {
        self.codes
            .get(value)
            .copied()
            .ok_or_else(|| EncodeError::UnknownCategory {
                field: self.field,
                value: value.to_string(),
            })
    }

    /// Maps a code back to its label.
    pub fn decode(&self, code: usize) -> EncodeResult<&str> {
        self.labels
            .get(code)
            .map(String::as_str)
            .ok_or(EncodeError::CodeOutOfRange {
                field: self.field,
                code,
                len: self.labels.len(),
            })
    }

    /// The fit-time vocabulary in code order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of distinct labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Always false for a fitted codec; kept for API completeness.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// The five fitted codecs of a pipeline, one per categorical field.
#[derive(Debug, Clone)]
pub struct CodecSet {
    pub department: CategoryCodec,
    pub job_title: CategoryCodec,
    pub work_mode: CategoryCodec,
    pub location: CategoryCodec,
    pub country: CategoryCodec,
}

impl CodecSet {
    /// Fits one codec per categorical field over the given records.
    pub fn fit(records: &[Record]) -> EncodeResult<Self> {
        let fit_field = |field: CategoricalField| {
            CategoryCodec::fit(field, records.iter().map(|r| field.value_of(r)))
        };
        Ok(Self {
            department: fit_field(CategoricalField::Department)?,
            job_title: fit_field(CategoricalField::JobTitle)?,
            work_mode: fit_field(CategoricalField::WorkMode)?,
            location: fit_field(CategoricalField::Location)?,
            country: fit_field(CategoricalField::Country)?,
        })
    }

    /// Borrows the codec for a field.
    pub fn get(&self, field: CategoricalField) -> &CategoryCodec {
        match field {
            CategoricalField::Department => &self.department,
            CategoricalField::JobTitle => &self.job_title,
            CategoricalField::WorkMode => &self.work_mode,
            CategoricalField::Location => &self.location,
            CategoricalField::Country => &self.country,
        }
    }
}
