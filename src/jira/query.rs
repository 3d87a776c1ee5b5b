//! JQL for the three kinds of search the report runs.

use crate::model::ReportWindow;
use itertools::Itertools;

/// Issues of `project` created, updated or moved between statuses inside the
/// window, leaving out the ones resolved as `excluded_resolution`.
pub fn changed_issues(project: &str, window: &ReportWindow, excluded_resolution: &str) -> String {
    let (start, end) = (window.start_iso(), window.end_iso());
    format!(
        "project = \"{project}\" AND (\
         (created >= \"{start}\" AND created < \"{end}\") \
         OR (updated >= \"{start}\" AND updated < \"{end}\") \
         OR status CHANGED DURING (\"{start}\", \"{end}\")) \
         AND (resolution is EMPTY OR resolution != \"{excluded_resolution}\")"
    )
}

pub fn fix_version(version_id: &str) -> String {
    format!("fixVersion in ({})", version_id)
}

/// `None` when there is nothing to ask for: `key in ()` is not valid JQL.
pub fn keys<S: AsRef<str>>(keys: &[S]) -> Option<String> {
    if keys.is_empty() {
        return None;
    }
    Some(format!(
        "key in ({})",
        keys.iter().map(|key| key.as_ref()).join(", ")
    ))
}
