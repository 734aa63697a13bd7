//! Loading grade results produced by the grading step.
//!
//! The grader leaves two files behind in `<workdir>/.hyf/`:
//! - `score.json`: `{ "score": .., "passingScore": .., "pass": .. }`
//! - `test-output.txt`: raw test runner output
//!
//! Both are read and normalized into a single [`GradeResult`], or the whole
//! load fails.

use crate::{Error, Result};
use serde::Deserialize;
use serde_json::{Number, Value};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory (relative to the working directory) holding the grade files.
pub const HYF_DIR: &str = ".hyf";
/// Name of the score record file.
pub const SCORE_FILE: &str = "score.json";
/// Name of the raw test output file.
pub const OUTPUT_FILE: &str = "test-output.txt";

const DEFAULT_SCORE: &str = "0";
const DEFAULT_PASSING_SCORE: &str = "100";

/// Normalized score record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreRecord {
    /// Achieved score, as text.
    pub score: String,
    /// Minimum score needed to pass, as text.
    pub passing_score: String,
    /// Whether the assignment passed.
    pub pass: bool,
}

impl Default for ScoreRecord {
    fn default() -> Self {
        Self {
            score: DEFAULT_SCORE.to_string(),
            passing_score: DEFAULT_PASSING_SCORE.to_string(),
            pass: false,
        }
    }
}

/// Raw shape of `score.json`. Unknown fields are ignored and `null` counts as absent.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawScore {
    #[serde(default)]
    score: Option<Value>,
    #[serde(default)]
    passing_score: Option<Value>,
    #[serde(default)]
    pass: Option<Value>,
}

impl ScoreRecord {
    /// Parse and normalize the contents of a score file.
    ///
    /// # Errors
    ///
    /// Returns the parse failure as text when the document is not a JSON
    /// object or a score field holds an array or object.
    pub fn parse(contents: &str) -> std::result::Result<Self, String> {
        let raw: RawScore = serde_json::from_str(contents).map_err(|e| e.to_string())?;

        let score = raw
            .score
            .map(|value| display_value("score", &value))
            .transpose()?
            .flatten()
            .unwrap_or_else(|| DEFAULT_SCORE.to_string());
        let passing_score = raw
            .passing_score
            .map(|value| display_value("passingScore", &value))
            .transpose()?
            .flatten()
            .unwrap_or_else(|| DEFAULT_PASSING_SCORE.to_string());
        let pass = raw.pass.as_ref().is_some_and(is_truthy);

        Ok(Self {
            score,
            passing_score,
            pass,
        })
    }
}

/// Everything needed to render a grade comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeResult {
    /// The normalized score record.
    pub record: ScoreRecord,
    /// Raw test output, untrimmed.
    pub output: String,
}

impl GradeResult {
    /// Achieved score, as text.
    #[must_use]
    pub fn score(&self) -> &str {
        &self.record.score
    }

    /// Minimum score needed to pass, as text.
    #[must_use]
    pub fn passing_score(&self) -> &str {
        &self.record.passing_score
    }

    /// Whether the assignment passed.
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.record.pass
    }
}

/// Paths of the two grade files under `workdir`.
#[must_use]
pub fn grade_paths(workdir: &Path) -> (PathBuf, PathBuf) {
    let dir = workdir.join(HYF_DIR);
    (dir.join(SCORE_FILE), dir.join(OUTPUT_FILE))
}

/// Load and normalize the grade files from `workdir`.
///
/// # Errors
///
/// Returns [`Error::Load`] if either file is missing or unreadable, or if the
/// score file is not a valid score record.
pub fn load_results(workdir: &Path) -> Result<GradeResult> {
    let (score_path, output_path) = grade_paths(workdir);

    let contents = std::fs::read_to_string(&score_path)
        .map_err(|e| Error::load(&score_path, e.to_string()))?;
    let record = ScoreRecord::parse(&contents).map_err(|e| Error::load(&score_path, e))?;

    let bytes =
        std::fs::read(&output_path).map_err(|e| Error::load(&output_path, e.to_string()))?;
    let output = String::from_utf8_lossy(&bytes).into_owned();

    debug!(
        score = %record.score,
        passing_score = %record.passing_score,
        pass = record.pass,
        output_bytes = bytes.len(),
        "Loaded grade results"
    );

    Ok(GradeResult { record, output })
}

fn display_value(field: &str, value: &Value) -> std::result::Result<Option<String>, String> {
    match value {
        Value::Null => Ok(None),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Number(n) => Ok(Some(display_number(n))),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Array(_) | Value::Object(_) => {
            Err(format!("field `{field}` must be a number or a string"))
        }
    }
}

/// Integral values print without a fractional part so `87` and `87.0` agree.
/// Magnitudes below `1e-6` or from `1e21` up use exponent form, e.g. `1e+21`.
#[allow(clippy::float_cmp)]
fn display_number(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f == 0.0 => "0".to_string(),
        Some(f) if f.abs() < 1e-6 || f.abs() >= 1e21 => exponent_form(f),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

fn exponent_form(f: f64) -> String {
    let formatted = format!("{f:e}");
    match formatted.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => formatted,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
