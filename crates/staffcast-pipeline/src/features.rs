use staffcast_data::Record;
use staffcast_preprocessing::{CodecSet, EncodeResult};

/// Column names of the model input, in positional order.
///
/// Both scalers and both forests are positional, so this order is part
/// of the public contract: five encoded categorical codes, then the
/// three numeric fields.
pub const FEATURE_COLUMNS: [&str; 8] = [
    "Department",
    "Job_Title",
    "Work_Mode",
    "Location",
    "Country",
    "Experience_Years",
    "Performance_Rating",
    "Hire_Year",
];

/// Width of every feature row.
pub const N_FEATURES: usize = FEATURE_COLUMNS.len();

/// Stand-in value for a hire year whose date never parsed.
pub const MISSING_HIRE_YEAR: f64 = 0.0;

/// One prediction request from the presentation layer.
///
/// The five labels must come from the fitted vocabularies; anything
/// else fails the encode step with `UnknownCategory`.
#[derive(Debug, Clone)]
pub struct PredictionRequest {
    pub department: String,
    pub job_title: String,
    pub work_mode: String,
    pub location: String,
    pub country: String,
    pub experience_years: i32,
    pub performance_rating: i32,
    pub hire_year: i32,
}

fn assemble(codes: [usize; 5], experience: f64, rating: f64, hire_year: f64) -> Vec<f64> {
    vec![
        codes[0] as f64,
        codes[1] as f64,
        codes[2] as f64,
        codes[3] as f64,
        codes[4] as f64,
        experience,
        rating,
        hire_year,
    ]
}

/// Builds the feature row for a training record.
///
/// A missing hire year enters as `MISSING_HIRE_YEAR`.
pub fn feature_row_for_record(codecs: &CodecSet, record: &Record) -> EncodeResult<Vec<f64>> {
    let codes = [
        codecs.department.encode(&record.department)?,
        codecs.job_title.encode(&record.job_title)?,
        codecs.work_mode.encode(&record.work_mode)?,
        codecs.location.encode(&record.location)?,
        codecs.country.encode(&record.country)?,
    ];
    Ok(assemble(
        codes,
        record.experience_years as f64,
        record.performance_rating as f64,
        record
            .hire_year
            .map(|y| y as f64)
            .unwrap_or(MISSING_HIRE_YEAR),
    ))
}

/// Builds the feature row for a prediction request.
pub fn feature_row_for_request(
    codecs: &CodecSet,
    request: &PredictionRequest,
) -> EncodeResult<Vec<f64>> {
    let codes = [
        codecs.department.encode(&request.department)?,
        codecs.job_title.encode(&request.job_title)?,
        codecs.work_mode.encode(&request.work_mode)?,
        codecs.location.encode(&request.location)?,
        codecs.country.encode(&request.country)?,
    ];
    Ok(assemble(
        codes,
        request.experience_years as f64,
        request.performance_rating as f64,
        request.hire_year as f64,
    ))
}
