//! Maps raw upstream status/conclusion strings onto `BuildStatus`.
use tracing::debug;

use crate::domain::model::BuildStatus;

/// Total function: anything absent or unrecognized degrades to `Unknown`
/// instead of failing the poll. Anomalies are logged as diagnostics only.
pub fn classify(status: Option<&str>, conclusion: Option<&str>) -> BuildStatus {
    match status {
        Some("completed") => match conclusion {
            Some("success") => BuildStatus::Success,
            Some("failure") => BuildStatus::Failure,
            other => {
                debug!(conclusion = ?other, "unrecognized conclusion for completed run");
                BuildStatus::Unknown
            }
        },
        Some("queued") | Some("in_progress") => BuildStatus::InProgress,
        other => {
            debug!(status = ?other, conclusion = ?conclusion, "unrecognized run status");
            BuildStatus::Unknown
        }
    }
}
