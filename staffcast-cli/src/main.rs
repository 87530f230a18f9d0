use crossterm::{
    cursor,
    event::{read, Event, KeyCode},
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType},
};
use staffcast::data::LoadOptions;
use staffcast::pipeline::{FittedPipeline, Pipeline, PipelineConfig, Prediction, PredictionRequest};
use staffcast::preprocessing::CategoryCodec;
use std::io::Stdout;

const FORM_LABELS: [&str; 9] = [
    "Department",
    "Job title",
    "Work mode",
    "Location",
    "Country",
    "Experience (years)",
    "Performance rating",
    "Hire year",
    "[ Predict ]",
];
const PREDICT_ROW: usize = 8;

const EXPERIENCE_RANGE: (i32, i32) = (0, 50);
const RATING_RANGE: (i32, i32) = (1, 5);
const DEFAULT_EXPERIENCE: i32 = 5;
const DEFAULT_RATING: i32 = 3;
const DEFAULT_HIRE_YEAR: i32 = 2020;
// Used when no hire date in the sample parsed.
const FALLBACK_YEAR_RANGE: (i32, i32) = (2000, 2025);

const BAR_WIDTH: usize = 28;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut path: Option<String> = None;
    let mut summary = false;
    let mut all_rows = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--summary" => summary = true,
            "--all-rows" => all_rows = true,
            other if !other.starts_with("--") && path.is_none() => path = Some(other.to_string()),
            other => {
                eprintln!("unrecognized argument: {other}");
                print_usage();
                std::process::exit(2);
            }
        }
    }
    let Some(path) = path else {
        print_usage();
        std::process::exit(2);
    };

    let mut config = PipelineConfig::default();
    if all_rows {
        config.load = LoadOptions::full();
    }

    eprintln!("fitting models on {path}, this can take a moment...");
    let fitted = match Pipeline::new(config).fit_csv(&path) {
        Ok(fitted) => fitted,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    if summary {
        print_summary(&fitted)?;
        return Ok(());
    }
    run_form(&fitted)
}

fn print_usage() {
    eprintln!("usage: staffcast-cli <data.csv> [--summary] [--all-rows]");
    eprintln!("  --summary   print the fit report and department aggregates as JSON");
    eprintln!("  --all-rows  train on every source row instead of the default sample");
}

/// JSON output for scripting; everything else goes to stderr.
fn print_summary(fitted: &FittedPipeline) -> serde_json::Result<()> {
    let summary = serde_json::json!({
        "report": fitted.fit_report(),
        "departments": fitted.department_summaries(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

// ─── Interactive form ────────────────────────────────────────────────────

struct Form<'a> {
    fitted: &'a FittedPipeline,
    label_idx: [usize; 5],
    experience: i32,
    rating: i32,
    hire_year: i32,
    year_range: (i32, i32),
    cursor: usize,
    outcome: Option<Result<Prediction, String>>,
}

impl<'a> Form<'a> {
    fn new(fitted: &'a FittedPipeline) -> Self {
        let year_range = fitted.hire_year_range().unwrap_or(FALLBACK_YEAR_RANGE);
        Self {
            fitted,
            label_idx: [0; 5],
            experience: DEFAULT_EXPERIENCE,
            rating: DEFAULT_RATING,
            hire_year: DEFAULT_HIRE_YEAR.clamp(year_range.0, year_range.1),
            year_range,
            cursor: 0,
            outcome: None,
        }
    }

    fn codec(&self, slot: usize) -> &CategoryCodec {
        let codecs = self.fitted.codecs();
        match slot {
            0 => &codecs.department,
            1 => &codecs.job_title,
            2 => &codecs.work_mode,
            3 => &codecs.location,
            _ => &codecs.country,
        }
    }

    fn value_text(&self, row: usize) -> String {
        match row {
            0..=4 => {
                let codec = self.codec(row);
                format!(
                    "< {} >  ({}/{})",
                    codec.labels()[self.label_idx[row]],
                    self.label_idx[row] + 1,
                    codec.len()
                )
            }
            5 => format!("< {} >", self.experience),
            6 => format!("< {} >", self.rating),
            7 => format!("< {} >", self.hire_year),
            _ => String::new(),
        }
    }

    fn adjust(&mut self, delta: i32) {
        match self.cursor {
            row @ 0..=4 => {
                let len = self.codec(row).len();
                let idx = self.label_idx[row] as i32 + delta;
                self.label_idx[row] = idx.rem_euclid(len as i32) as usize;
            }
            5 => {
                self.experience =
                    (self.experience + delta).clamp(EXPERIENCE_RANGE.0, EXPERIENCE_RANGE.1)
            }
            6 => self.rating = (self.rating + delta).clamp(RATING_RANGE.0, RATING_RANGE.1),
            7 => {
                self.hire_year =
                    (self.hire_year + delta).clamp(self.year_range.0, self.year_range.1)
            }
            _ => {}
        }
    }

    fn request(&self) -> PredictionRequest {
        let label = |slot: usize| self.codec(slot).labels()[self.label_idx[slot]].clone();
        PredictionRequest {
            department: label(0),
            job_title: label(1),
            work_mode: label(2),
            location: label(3),
            country: label(4),
            experience_years: self.experience,
            performance_rating: self.rating,
            hire_year: self.hire_year,
        }
    }

    fn run_prediction(&mut self) {
        let result = self.fitted.predict(&self.request());
        self.outcome = Some(result.map_err(|e| e.to_string()));
    }
}

fn run_form(fitted: &FittedPipeline) -> Result<(), Box<dyn std::error::Error>> {
    let mut stdout = std::io::stdout();
    enable_raw_mode()?;
    execute!(stdout, Clear(ClearType::All), cursor::Hide, cursor::MoveTo(0, 0))?;

    let outcome = form_loop(fitted, &mut stdout);

    disable_raw_mode()?;
    execute!(stdout, Clear(ClearType::All), cursor::Show, cursor::MoveTo(0, 0))?;
    outcome
}

fn form_loop(
    fitted: &FittedPipeline,
    stdout: &mut Stdout,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut form = Form::new(fitted);
    loop {
        draw_form(stdout, &form)?;
        if let Event::Key(key) = read()? {
            match key.code {
                KeyCode::Up => {
                    form.cursor = if form.cursor == 0 {
                        FORM_LABELS.len() - 1
                    } else {
                        form.cursor - 1
                    }
                }
                KeyCode::Down => form.cursor = (form.cursor + 1) % FORM_LABELS.len(),
                KeyCode::Left => form.adjust(-1),
                KeyCode::Right => form.adjust(1),
                KeyCode::Enter if form.cursor == PREDICT_ROW => form.run_prediction(),
                KeyCode::Char('c') => show_charts(stdout, fitted)?,
                KeyCode::Esc | KeyCode::Char('q') => break,
                _ => {}
            }
        }
    }
    Ok(())
}

fn draw_form(stdout: &mut Stdout, form: &Form<'_>) -> Result<(), Box<dyn std::error::Error>> {
    execute!(
        stdout,
        Clear(ClearType::All),
        cursor::MoveTo(2, 1),
        SetForegroundColor(Color::Cyan),
        Print("StaffCast :: HR prediction console"),
        cursor::MoveTo(2, 2),
        SetForegroundColor(Color::DarkGrey),
        Print("[Up/Down] field  [Left/Right] value  [Enter] predict  [c] charts  [q] quit"),
        ResetColor,
    )?;

    for (i, label) in FORM_LABELS.iter().enumerate() {
        let line = format!("{:<22}{}", label, form.value_text(i));
        execute!(stdout, cursor::MoveTo(4, (4 + i) as u16))?;
        if i == form.cursor {
            execute!(
                stdout,
                SetForegroundColor(Color::Green),
                Print(" ► "),
                SetForegroundColor(Color::White),
                Print(line),
                ResetColor
            )?;
        } else {
            execute!(
                stdout,
                SetForegroundColor(Color::DarkGrey),
                Print("   "),
                Print(line),
                ResetColor
            )?;
        }
    }

    match &form.outcome {
        None => {}
        Some(Ok(prediction)) => {
            let (verdict, color) = if prediction.attrition {
                ("likely to leave", Color::Red)
            } else {
                ("likely to stay", Color::Green)
            };
            execute!(
                stdout,
                cursor::MoveTo(4, 15),
                SetForegroundColor(color),
                Print(format!("attrition:        {verdict}")),
                cursor::MoveTo(4, 16),
                SetForegroundColor(Color::White),
                Print(format!(
                    "predicted salary: {}",
                    format_inr(prediction.predicted_salary)
                )),
                ResetColor
            )?;
        }
        Some(Err(message)) => {
            execute!(
                stdout,
                cursor::MoveTo(4, 15),
                SetForegroundColor(Color::Yellow),
                Print(format!("prediction failed: {message}")),
                ResetColor
            )?;
        }
    }
    Ok(())
}

// ─── Charts ──────────────────────────────────────────────────────────────

fn show_charts(
    stdout: &mut Stdout,
    fitted: &FittedPipeline,
) -> Result<(), Box<dyn std::error::Error>> {
    let summaries = fitted.department_summaries();
    let max_salary = summaries
        .iter()
        .map(|s| s.mean_salary)
        .fold(0.0_f64, f64::max);
    let max_rate = summaries
        .iter()
        .map(|s| s.attrition_rate)
        .fold(0.0_f64, f64::max);

    execute!(
        stdout,
        Clear(ClearType::All),
        cursor::MoveTo(2, 1),
        SetForegroundColor(Color::Magenta),
        Print("--- Department charts ---"),
        cursor::MoveTo(2, 3),
        SetForegroundColor(Color::White),
        Print("Mean salary"),
        ResetColor
    )?;

    let mut y = 4u16;
    for s in summaries {
        execute!(
            stdout,
            cursor::MoveTo(4, y),
            SetForegroundColor(Color::DarkGrey),
            Print(format!("{:<16}", s.department)),
            SetForegroundColor(Color::Cyan),
            Print(bar(s.mean_salary, max_salary)),
            SetForegroundColor(Color::White),
            Print(format!(" {}", format_inr(s.mean_salary))),
            ResetColor
        )?;
        y += 1;
    }

    y += 1;
    execute!(
        stdout,
        cursor::MoveTo(2, y),
        SetForegroundColor(Color::White),
        Print("Attrition rate"),
        ResetColor
    )?;
    y += 1;
    for s in summaries {
        execute!(
            stdout,
            cursor::MoveTo(4, y),
            SetForegroundColor(Color::DarkGrey),
            Print(format!("{:<16}", s.department)),
            SetForegroundColor(Color::Yellow),
            Print(bar(s.attrition_rate, max_rate)),
            SetForegroundColor(Color::White),
            Print(format!(" {:.1}%", s.attrition_rate * 100.0)),
            ResetColor
        )?;
        y += 1;
    }

    execute!(
        stdout,
        cursor::MoveTo(2, y + 1),
        SetForegroundColor(Color::DarkGrey),
        Print("Press any key to return..."),
        ResetColor
    )?;

    loop {
        if let Event::Key(_) = read()? {
            break;
        }
    }
    execute!(stdout, Clear(ClearType::All))?;
    Ok(())
}

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 {
        return String::new();
    }
    let width = ((value / max) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(width.min(BAR_WIDTH))
}

fn format_inr(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        format!("-₹{grouped}")
    } else {
        format!("₹{grouped}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inr_formatting_groups_thousands() {
        assert_eq!(format_inr(0.0), "₹0");
        assert_eq!(format_inr(950.0), "₹950");
        assert_eq!(format_inr(1_000.0), "₹1,000");
        assert_eq!(format_inr(1_234_567.4), "₹1,234,567");
        assert_eq!(format_inr(1_234_567.6), "₹1,234,568");
        assert_eq!(format_inr(-45_000.0), "-₹45,000");
    }

    #[test]
    fn bars_scale_to_the_largest_value() {
        assert_eq!(bar(10.0, 10.0).chars().count(), BAR_WIDTH);
        assert_eq!(bar(5.0, 10.0).chars().count(), BAR_WIDTH / 2);
        assert_eq!(bar(0.0, 10.0), "");
        assert_eq!(bar(1.0, 0.0), "");
    }
}
