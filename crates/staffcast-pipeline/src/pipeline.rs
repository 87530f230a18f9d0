use crate::features::{feature_row_for_record, feature_row_for_request, PredictionRequest};
use crate::summary::{department_summaries, DepartmentSummary, FitReport};
use staffcast_core::{CoreError, Matrix};
use staffcast_data::{load_csv, LoadError, LoadOptions, Record};
use staffcast_metrics::{accuracy, mse, r2_score, rmse};
use staffcast_preprocessing::{CodecSet, EncodeError, ScaleError, StandardScaler};
use staffcast_tree::{ForestParams, ModelError, RandomForestClassifier, RandomForestRegressor};
use std::path::Path;
use thiserror::Error;

/// Umbrella error for the full load-encode-scale-train-predict chain.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Scale(#[from] ScaleError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Everything the fit run needs to know.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub load: LoadOptions,
    pub forest: ForestParams,
}

/// The unfitted pipeline: a config waiting for data.
///
/// `fit` runs the whole load-encode-scale-train chain exactly once and
/// hands back a `FittedPipeline`. There is no refit path; training again
/// means fitting a fresh pipeline.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

/// Outcome of one prediction request.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub attrition: bool,
    pub predicted_salary: f64,
}

/// The immutable artifacts of one fit run.
///
/// Obtainable only through `Pipeline::fit`; every method takes `&self`,
/// so the fitted state can be shared freely across prediction calls.
#[derive(Debug, Clone)]
pub struct FittedPipeline {
    codecs: CodecSet,
    classifier_scaler: StandardScaler,
    regressor_scaler: StandardScaler,
    classifier: RandomForestClassifier,
    regressor: RandomForestRegressor,
    summaries: Vec<DepartmentSummary>,
    report: FitReport,
    hire_year_range: Option<(i32, i32)>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// The configuration this pipeline will fit with.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Loads the CSV per the load options, then fits on the sample.
    pub fn fit_csv<P: AsRef<Path>>(&self, path: P) -> PipelineResult<FittedPipeline> {
        let records = load_csv(path, &self.config.load)?;
        self.fit(records)
    }

    /// Fits codecs, scalers and both forests over the given records.
    ///
    /// Consumes the records; after the fit only the derived artifacts
    /// (codecs, scaler params, models, summaries) remain.
    pub fn fit(&self, records: Vec<Record>) -> PipelineResult<FittedPipeline> {
        if records.is_empty() {
            return Err(ModelError::InsufficientTrainingData {
                reason: "no training records".into(),
            }
            .into());
        }

        let codecs = CodecSet::fit(&records)?;

        let mut rows = Vec::with_capacity(records.len());
        for record in &records {
            rows.push(feature_row_for_record(&codecs, record)?);
        }
        let features = Matrix::from_rows(&rows)?;

        let attrition_y: Vec<f64> = records
            .iter()
            .map(|r| if r.attrition { 1.0 } else { 0.0 })
            .collect();
        let salary_y: Vec<f64> = records.iter().map(|r| r.salary_inr).collect();

        // One scaler per model. They see the same raw features today but
        // stay separate fitted objects so the feature sets may diverge.
        let classifier_scaler = StandardScaler::fit(&features)?;
        let regressor_scaler = StandardScaler::fit(&features)?;
        let x_classifier = classifier_scaler.transform(&features)?;
        let x_regressor = regressor_scaler.transform(&features)?;

        let classifier =
            RandomForestClassifier::fit(&self.config.forest, &x_classifier, &attrition_y)?;
        let regressor = RandomForestRegressor::fit(&self.config.forest, &x_regressor, &salary_y)?;

        let clf_train = classifier.predict(&x_classifier)?;
        let reg_train = regressor.predict(&x_regressor)?;
        let report = FitReport {
            rows_used: records.len(),
            train_accuracy: accuracy(&attrition_y, &clf_train),
            train_mse: mse(&salary_y, &reg_train),
            train_rmse: rmse(&salary_y, &reg_train),
            train_r2: r2_score(&salary_y, &reg_train),
        };
        log::info!(
            "fit complete over {} rows: accuracy {:.3}, rmse {:.0}, r2 {:.3}",
            report.rows_used,
            report.train_accuracy,
            report.train_rmse,
            report.train_r2
        );

        let summaries = department_summaries(&codecs.department, &records)?;
        let hire_year_range = observed_hire_year_range(&records);

        Ok(FittedPipeline {
            codecs,
            classifier_scaler,
            regressor_scaler,
            classifier,
            regressor,
            summaries,
            report,
            hire_year_range,
        })
    }
}

impl FittedPipeline {
    /// Runs the encode-scale-predict chain for one request.
    ///
    /// An unknown label fails this request only; the fitted state is
    /// untouched, so later requests proceed normally.
    pub fn predict(&self, request: &PredictionRequest) -> PipelineResult<Prediction> {
        let raw = feature_row_for_request(&self.codecs, request)?;

        let classifier_row = self.classifier_scaler.transform_row(&raw)?;
        let attrition = self.classifier.predict_row(&classifier_row)? == 1.0;

        let regressor_row = self.regressor_scaler.transform_row(&raw)?;
        let predicted_salary = self.regressor.predict_row(&regressor_row)?;

        Ok(Prediction {
            attrition,
            predicted_salary,
        })
    }

    /// The fitted codecs, for dropdown labels and chart axes.
    pub fn codecs(&self) -> &CodecSet {
        &self.codecs
    }

    /// Per-department aggregates, in department code order.
    pub fn department_summaries(&self) -> &[DepartmentSummary] {
        &self.summaries
    }

    /// Training-fit quality numbers.
    pub fn fit_report(&self) -> &FitReport {
        &self.report
    }

    /// Observed (min, max) hire year, when any date parsed.
    pub fn hire_year_range(&self) -> Option<(i32, i32)> {
        self.hire_year_range
    }
}

fn observed_hire_year_range(records: &[Record]) -> Option<(i32, i32)> {
    let mut range: Option<(i32, i32)> = None;
    for year in records.iter().filter_map(|r| r.hire_year) {
        range = Some(match range {
            None => (year, year),
            Some((lo, hi)) => (lo.min(year), hi.max(year)),
        });
    }
    range
}

#[cfg(test)]
mod tests {
    use super::*;
    use staffcast_data::derive_country;

    const DEPARTMENTS: [&str; 3] = ["Support", "Engineering", "Research"];
    const BASE_SALARIES: [f64; 3] = [50_000.0, 70_000.0, 90_000.0];

    /// Three departments with well separated salary bands and a mix of
    /// attrition outcomes.
    fn training_records(per_department: usize) -> Vec<Record> {
        let mut records = Vec::new();
        for dept in 0..3 {
            for i in 0..per_department {
                let location = if i % 2 == 0 {
                    "Pune, India"
                } else {
                    "Berlin, Germany"
                };
                let attrition = dept == 0 && i % 2 == 0;
                records.push(Record {
                    department: DEPARTMENTS[dept].into(),
                    job_title: format!("{} Role", DEPARTMENTS[dept]),
                    work_mode: ["Remote", "Onsite", "Hybrid"][i % 3].into(),
                    location: location.into(),
                    country: derive_country(location),
                    experience_years: (i % 10) as i32,
                    performance_rating: (i % 5) as i32 + 1,
                    hire_year: Some(2015 + (i % 8) as i32),
                    status: if attrition { "Resigned" } else { "Active" }.into(),
                    attrition,
                    salary_inr: BASE_SALARIES[dept] + ((i % 3) as f64 - 1.0) * 1_000.0,
                });
            }
        }
        records
    }

    fn small_pipeline(n_trees: usize) -> Pipeline {
        Pipeline::new(PipelineConfig {
            load: LoadOptions::full(),
            forest: ForestParams {
                n_trees,
                ..ForestParams::default()
            },
        })
    }

    fn research_request() -> PredictionRequest {
        PredictionRequest {
            department: "Research".into(),
            job_title: "Research Role".into(),
            work_mode: "Remote".into(),
            location: "Pune, India".into(),
            country: "India".into(),
            experience_years: 5,
            performance_rating: 3,
            hire_year: 2018,
        }
    }

    #[test]
    fn fit_on_no_records_fails_fast() {
        let err = small_pipeline(5).fit(Vec::new()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Model(ModelError::InsufficientTrainingData { .. })
        ));
    }

    #[test]
    fn centroid_prediction_regresses_into_department_band() {
        let fitted = small_pipeline(25).fit(training_records(20)).unwrap();
        let prediction = fitted.predict(&research_request()).unwrap();
        // Research salaries were 89k to 91k; an input near that group's
        // centroid must land inside the band.
        assert!(
            (89_000.0..=91_000.0).contains(&prediction.predicted_salary),
            "predicted {} outside the Research band",
            prediction.predicted_salary
        );
    }

    #[test]
    fn refitting_identical_data_gives_identical_predictions() {
        let records = training_records(12);
        let a = small_pipeline(20).fit(records.clone()).unwrap();
        let b = small_pipeline(20).fit(records).unwrap();
        let request = research_request();
        assert_eq!(a.predict(&request).unwrap(), b.predict(&request).unwrap());
    }

    #[test]
    fn unknown_label_fails_the_request_but_not_the_pipeline() {
        let fitted = small_pipeline(10).fit(training_records(8)).unwrap();

        let mut bad = research_request();
        bad.department = "Finance".into();
        let err = fitted.predict(&bad).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Encode(EncodeError::UnknownCategory { .. })
        ));

        // The fitted state is read-only, so the next request is fine.
        assert!(fitted.predict(&research_request()).is_ok());
    }

    #[test]
    fn summaries_and_report_cover_the_training_set() {
        let fitted = small_pipeline(10).fit(training_records(10)).unwrap();

        let summaries = fitted.department_summaries();
        assert_eq!(summaries.len(), 3);
        assert_eq!(summaries[0].department, "Support");
        assert!(summaries[0].attrition_rate > 0.0);
        assert!(summaries[2].mean_salary > summaries[0].mean_salary);

        let report = fitted.fit_report();
        assert_eq!(report.rows_used, 30);
        assert!(report.train_accuracy > 0.5);
        assert!(report.train_r2 > 0.5);
    }

    #[test]
    fn hire_year_range_tracks_observed_years() {
        let fitted = small_pipeline(10).fit(training_records(8)).unwrap();
        assert_eq!(fitted.hire_year_range(), Some((2015, 2022)));
    }

    #[test]
    fn records_without_any_parsed_year_give_no_range() {
        let mut records = training_records(8);
        for r in &mut records {
            r.hire_year = None;
        }
        let fitted = small_pipeline(10).fit(records).unwrap();
        assert_eq!(fitted.hire_year_range(), None);
    }

    #[test]
    fn fit_csv_runs_the_whole_chain() {
        let mut csv = String::from(
            "Unnamed: 0,Department,Job_Title,Work_Mode,Location,Hire_Date,Experience_Years,Performance_Rating,Status,Salary_INR\n",
        );
        for (i, r) in training_records(6).iter().enumerate() {
            csv.push_str(&format!(
                "{},{},{},{},\"{}\",{}-06-01,{},{},{},{}\n",
                i,
                r.department,
                r.job_title,
                r.work_mode,
                r.location,
                r.hire_year.unwrap(),
                r.experience_years,
                r.performance_rating,
                r.status,
                r.salary_inr
            ));
        }

        let path = std::env::temp_dir().join("staffcast_pipeline_fit_csv.csv");
        std::fs::write(&path, csv).unwrap();
        let fitted = small_pipeline(10).fit_csv(&path);
        std::fs::remove_file(&path).ok();

        let fitted = fitted.unwrap();
        assert_eq!(fitted.department_summaries().len(), 3);
        assert_eq!(fitted.fit_report().rows_used, 18);
    }
}
