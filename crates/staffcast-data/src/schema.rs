use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

/// Date formats tried, in order, when deriving the hire year.
const HIRE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%m-%Y", "%m/%d/%Y"];

/// One employee row as it appears in the source CSV.
///
/// Deserialized by header name, so extra columns (such as a leading
/// unnamed index artifact) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "Department")]
    pub department: String,
    #[serde(rename = "Job_Title")]
    pub job_title: String,
    #[serde(rename = "Work_Mode")]
    pub work_mode: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Hire_Date")]
    pub hire_date: String,
    #[serde(rename = "Experience_Years")]
    pub experience_years: i32,
    #[serde(rename = "Performance_Rating")]
    pub performance_rating: i32,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Salary_INR")]
    pub salary_inr: f64,
}

/// One employee row after the derived columns are computed.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub department: String,
    pub job_title: String,
    pub work_mode: String,
    pub location: String,
    /// Derived from `location`: text after the last comma, trimmed.
    pub country: String,
    pub experience_years: i32,
    pub performance_rating: i32,
    /// Derived from the hire date; `None` when the date failed to parse.
    pub hire_year: Option<i32>,
    pub status: String,
    /// True iff the status marks the employee as having left.
    pub attrition: bool,
    pub salary_inr: f64,
}

impl Record {
    /// Computes the derived columns for a raw row.
    pub fn from_raw(raw: RawRecord) -> Self {
        let country = derive_country(&raw.location);
        let hire_year = parse_hire_year(&raw.hire_date);
        let attrition = derive_attrition(&raw.status);
        Self {
            department: raw.department,
            job_title: raw.job_title,
            work_mode: raw.work_mode,
            location: raw.location,
            country,
            experience_years: raw.experience_years,
            performance_rating: raw.performance_rating,
            hire_year,
            status: raw.status,
            attrition,
            salary_inr: raw.salary_inr,
        }
    }
}

/// Derives the country from a location string.
///
/// Takes the text after the last comma, trimmed. A location without a
/// comma yields the whole trimmed string.
pub fn derive_country(location: &str) -> String {
    location
        .rsplit(',')
        .next()
        .unwrap_or(location)
        .trim()
        .to_string()
}

/// Parses a hire-date string into a year, trying each supported format.
///
/// Returns `None` when no format matches.
pub fn parse_hire_year(hire_date: &str) -> Option<i32> {
    let trimmed = hire_date.trim();
    for fmt in HIRE_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(date.year());
        }
    }
    None
}

/// Maps a status label to the binary attrition target.
///
/// "Resigned" and "Terminated" count as attrition; everything else does not.
pub fn derive_attrition(status: &str) -> bool {
    matches!(status, "Resigned" | "Terminated")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn country_after_last_comma_trimmed() {
        assert_eq!(derive_country("Bangalore, India"), "India");
        assert_eq!(derive_country("Austin, Texas, USA"), "USA");
        assert_eq!(derive_country("  Berlin ,  Germany  "), "Germany");
    }

    #[test]
    fn country_without_comma_is_whole_string() {
        assert_eq!(derive_country("Remote"), "Remote");
        assert_eq!(derive_country("  Remote  "), "Remote");
    }

    #[test]
    fn hire_year_accepts_each_supported_format() {
        assert_eq!(parse_hire_year("2019-03-15"), Some(2019));
        assert_eq!(parse_hire_year("15-03-2019"), Some(2019));
        assert_eq!(parse_hire_year("03/15/2019"), Some(2019));
        assert_eq!(parse_hire_year(" 2019-03-15 "), Some(2019));
    }

    #[test]
    fn unparsable_hire_date_yields_none() {
        assert_eq!(parse_hire_year("not a date"), None);
        assert_eq!(parse_hire_year("2019-13-40"), None);
        assert_eq!(parse_hire_year(""), None);
    }

    #[test]
    fn attrition_from_status() {
        assert!(derive_attrition("Resigned"));
        assert!(derive_attrition("Terminated"));
        assert!(!derive_attrition("Active"));
        assert!(!derive_attrition("On Leave"));
    }

    #[test]
    fn from_raw_fills_derived_columns() {
        let raw = RawRecord {
            department: "Engineering".into(),
            job_title: "Developer".into(),
            work_mode: "Remote".into(),
            location: "Pune, India".into(),
            hire_date: "2020-06-01".into(),
            experience_years: 4,
            performance_rating: 3,
            status: "Resigned".into(),
            salary_inr: 950_000.0,
        };
        let rec = Record::from_raw(raw);
        assert_eq!(rec.country, "India");
        assert_eq!(rec.hire_year, Some(2020));
        assert!(rec.attrition);
    }
}
