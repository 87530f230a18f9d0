use serde::Serialize;
use staffcast_data::Record;
use staffcast_preprocessing::{CategoryCodec, EncodeResult};

/// Aggregates for one department, used by the chart views.
#[derive(Debug, Clone, Serialize)]
pub struct DepartmentSummary {
    pub department: String,
    pub mean_salary: f64,
    pub attrition_rate: f64,
}

/// Training-fit quality numbers computed right after fitting.
#[derive(Debug, Clone, Serialize)]
pub struct FitReport {
    pub rows_used: usize,
    pub train_accuracy: f64,
    pub train_mse: f64,
    pub train_rmse: f64,
    pub train_r2: f64,
}

/// Groups the records by department code and aggregates each group.
///
/// Summaries come back in code order, so chart axes line up with the
/// codec's label order.
pub(crate) fn department_summaries(
    codec: &CategoryCodec,
    records: &[Record],
) -> EncodeResult<Vec<DepartmentSummary>> {
    let mut salary_sums = vec![0.0f64; codec.len()];
    let mut attrition_counts = vec![0usize; codec.len()];
    let mut counts = vec![0usize; codec.len()];

    for record in records {
        let code = codec.encode(&record.department)?;
        salary_sums[code] += record.salary_inr;
        if record.attrition {
            attrition_counts[code] += 1;
        }
        counts[code] += 1;
    }

    let mut summaries = Vec::with_capacity(codec.len());
    for code in 0..codec.len() {
        // Every label in the vocabulary was observed at least once.
        let n = counts[code].max(1) as f64;
        summaries.push(DepartmentSummary {
            department: codec.decode(code)?.to_string(),
            mean_salary: salary_sums[code] / n,
            attrition_rate: attrition_counts[code] as f64 / n,
        });
    }
    Ok(summaries)
}
