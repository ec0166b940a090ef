//! Input scripts
//!
//! A script is either a JSON array of inputs or one input per line. In the
//! line form blank lines and lines starting with `#` are skipped.
//!
//! ```text
//! # configuration page
//! {"input":"select","field":"dfmType","value":"product"}
//! {"input":"submit"}
//! ```

use dfm_form::EventSink;
use dfm_wizard::{HostInput, Page, Session};
use thiserror::Error;

/// Script parse failure
#[derive(Debug, Error)]
pub enum ScriptError {
    /// A line is not a valid input
    #[error("line {line}: {source}")]
    Line {
        /// 1-based line number
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// The array form is malformed
    #[error("invalid input array: {0}")]
    Array(#[source] serde_json::Error),
}

/// Parse one script line; `None` for blank and comment lines
///
/// # Errors
/// The JSON error when the line is not an input.
pub fn parse_line(line: &str) -> Result<Option<HostInput>, serde_json::Error> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    serde_json::from_str(line).map(Some)
}

/// Parse a whole script
///
/// # Errors
/// [`ScriptError`] naming the first bad line, or the array error.
pub fn parse_script(text: &str) -> Result<Vec<HostInput>, ScriptError> {
    let trimmed = text.trim_start();
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed).map_err(ScriptError::Array);
    }
    let mut inputs = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let parsed = parse_line(line).map_err(|source| ScriptError::Line {
            line: i + 1,
            source,
        })?;
        inputs.extend(parsed);
    }
    Ok(inputs)
}

/// Outcome of feeding inputs to a page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayReport {
    /// Inputs the page accepted
    pub applied: usize,
    /// Inputs the page rejected
    pub rejected: usize,
    /// Page the last accepted input navigated to
    pub navigated: Option<Page>,
}

/// Feed `inputs` to `session` in order, stopping at the first navigation
///
/// Rejected inputs have already been reported on `sink` and do not stop the
/// replay.
pub async fn replay<I>(session: &mut Session, inputs: I, sink: &mut dyn EventSink) -> ReplayReport
where
    I: IntoIterator<Item = HostInput>,
{
    let mut report = ReplayReport::default();
    for input in inputs {
        match session.apply(input, sink).await {
            Ok(next) => {
                report.applied += 1;
                if next.is_some() {
                    report.navigated = next;
                    break;
                }
            }
            Err(_) => report.rejected += 1,
        }
    }
    tracing::info!(
        page = %session.page(),
        applied = report.applied,
        rejected = report.rejected,
        "replay finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_and_blank_lines_skipped() {
        assert!(parse_line("   ").unwrap().is_none());
        assert!(parse_line("# note").unwrap().is_none());
        assert_eq!(
            parse_line(r#"{"input":"add_row"}"#).unwrap(),
            Some(HostInput::AddRow)
        );
    }

    #[test]
    fn bad_line_is_numbered() {
        let err = parse_script("{\"input\":\"tick\"}\n\n{\"input\":\"jump\"}\n").unwrap_err();
        assert!(matches!(err, ScriptError::Line { line: 3, .. }));
    }

    #[test]
    fn array_form_accepted() {
        let inputs = parse_script(r#" [{"input":"save_draft"},{"input":"submit"}]"#).unwrap();
        assert_eq!(inputs, vec![HostInput::SaveDraft, HostInput::Submit]);
    }
}
