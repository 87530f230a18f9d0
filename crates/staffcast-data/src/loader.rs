use crate::schema::{RawRecord, Record};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading the HR dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("sample of {requested} rows requested but source holds only {available}")]
    SampleSizeExceedsSource { requested: usize, available: usize },
}

pub type LoadResult<T> = Result<T, LoadError>;

/// Controls sampling of the source rows.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Rows to keep; `None` keeps every row.
    pub sample_size: Option<usize>,
    /// Seed for the sampling shuffle.
    pub seed: u64,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            sample_size: Some(30_000),
            seed: 42,
        }
    }
}

impl LoadOptions {
    /// Options that keep the whole source, useful for small test fixtures.
    pub fn full() -> Self {
        Self {
            sample_size: None,
            seed: 42,
        }
    }
}

/// Loads records from a CSV file, sampling per the options.
pub fn load_csv<P: AsRef<Path>>(path: P, options: &LoadOptions) -> LoadResult<Vec<Record>> {
    let rdr = csv::Reader::from_path(path.as_ref())?;
    read_from(rdr, options)
}

/// Loads records from any reader producing CSV with a header row.
pub fn read_records<R: io::Read>(reader: R, options: &LoadOptions) -> LoadResult<Vec<Record>> {
    read_from(csv::Reader::from_reader(reader), options)
}

fn read_from<R: io::Read>(
    mut rdr: csv::Reader<R>,
    options: &LoadOptions,
) -> LoadResult<Vec<Record>> {
    let mut raw = Vec::new();
    for result in rdr.deserialize::<RawRecord>() {
        raw.push(result?);
    }
    let sampled = sample_rows(raw, options)?;

    let mut date_failures = 0usize;
    let records: Vec<Record> = sampled
        .into_iter()
        .map(|r| {
            let rec = Record::from_raw(r);
            if rec.hire_year.is_none() {
                date_failures += 1;
            }
            rec
        })
        .collect();

    if date_failures > 0 {
        log::warn!(
            "{} of {} hire dates failed to parse; their hire years are missing",
            date_failures,
            records.len()
        );
    }
    log::info!("loaded {} records", records.len());
    Ok(records)
}

/// Draws a uniform sample without replacement, deterministic for a seed.
///
/// Fails when more rows are requested than the source holds; the sample
/// is never silently truncated.
fn sample_rows(rows: Vec<RawRecord>, options: &LoadOptions) -> LoadResult<Vec<RawRecord>> {
    let n = match options.sample_size {
        None => return Ok(rows),
        Some(n) => n,
    };
    if rows.len() < n {
        return Err(LoadError::SampleSizeExceedsSource {
            requested: n,
            available: rows.len(),
        });
    }
    if rows.len() == n {
        return Ok(rows);
    }

    let mut indices: Vec<usize> = (0..rows.len()).collect();
    let mut rng = StdRng::seed_from_u64(options.seed);
    indices.shuffle(&mut rng);
    indices.truncate(n);

    let mut picked: Vec<Option<RawRecord>> = rows.into_iter().map(Some).collect();
    Ok(indices
        .into_iter()
        .filter_map(|i| picked[i].take())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV_WITH_INDEX: &str = "\
Unnamed: 0,Department,Job_Title,Work_Mode,Location,Hire_Date,Experience_Years,Performance_Rating,Status,Salary_INR
0,Engineering,Developer,Remote,\"Bangalore, India\",2019-03-15,4,3,Active,900000
1,Sales,Manager,Onsite,\"Mumbai, India\",2017-07-01,8,4,Resigned,1200000
2,HR,Recruiter,Hybrid,Remote,bad-date,2,5,Active,600000
";

    fn small_csv(rows: usize) -> String {
        let mut s = String::from(
            "Department,Job_Title,Work_Mode,Location,Hire_Date,Experience_Years,Performance_Rating,Status,Salary_INR\n",
        );
        for i in 0..rows {
            s.push_str(&format!(
                "Dept{i},Title{i},Remote,\"City{i}, Country{i}\",2020-01-01,{i},3,Active,{}\n",
                50_000 + i * 1_000
            ));
        }
        s
    }

    #[test]
    fn reads_records_and_ignores_index_column() {
        let records = read_records(CSV_WITH_INDEX.as_bytes(), &LoadOptions::full()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].department, "Engineering");
        assert_eq!(records[0].country, "India");
        assert!(records[1].attrition);
        assert_eq!(records[2].country, "Remote");
    }

    #[test]
    fn unparsable_date_becomes_missing_year_not_an_error() {
        let records = read_records(CSV_WITH_INDEX.as_bytes(), &LoadOptions::full()).unwrap();
        assert_eq!(records[0].hire_year, Some(2019));
        assert_eq!(records[2].hire_year, None);
    }

    #[test]
    fn sampling_is_deterministic_for_a_seed() {
        let csv = small_csv(50);
        let opts = LoadOptions {
            sample_size: Some(10),
            seed: 42,
        };
        let a = read_records(csv.as_bytes(), &opts).unwrap();
        let b = read_records(csv.as_bytes(), &opts).unwrap();
        assert_eq!(a.len(), 10);
        assert_eq!(a, b);

        let other = LoadOptions {
            sample_size: Some(10),
            seed: 7,
        };
        let c = read_records(csv.as_bytes(), &other).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn sample_larger_than_source_fails_fast() {
        let csv = small_csv(5);
        let opts = LoadOptions {
            sample_size: Some(10),
            seed: 42,
        };
        let err = read_records(csv.as_bytes(), &opts).unwrap_err();
        match err {
            LoadError::SampleSizeExceedsSource {
                requested,
                available,
            } => {
                assert_eq!(requested, 10);
                assert_eq!(available, 5);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn sample_equal_to_source_keeps_every_row() {
        let csv = small_csv(5);
        let opts = LoadOptions {
            sample_size: Some(5),
            seed: 42,
        };
        let records = read_records(csv.as_bytes(), &opts).unwrap();
        assert_eq!(records.len(), 5);
    }

    #[test]
    fn no_sample_size_keeps_every_row() {
        let csv = small_csv(12);
        let records = read_records(csv.as_bytes(), &LoadOptions::full()).unwrap();
        assert_eq!(records.len(), 12);
    }
}
