//! Application id extraction
//!
//! Tasks that submit work to an external platform (e.g. YARN) print the id
//! they were given. The ids are used later to kill or track those jobs.

use regex::Regex;
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use std::sync::LazyLock;
use tracing::error;

use super::lines::LogLines;

/// `application_<digits>` optionally followed by further `_<digits>` groups,
/// which covers YARN's `application_<clusterTimestamp>_<sequence>`
static APPLICATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"application_\d+(?:_\d+)*").expect("application id pattern is valid")
});

/// Returns the distinct application ids in a log file, in first-seen order
///
/// A missing file or a read failure yields an empty list.
pub fn extract_app_ids(path: &Path) -> Vec<String> {
    if !path.is_file() {
        return Vec::new();
    }

    match scan(path) {
        Ok(app_ids) => app_ids,
        Err(e) => {
            error!("Get appIds from log file error, path: {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

fn scan(path: &Path) -> io::Result<Vec<String>> {
    let mut seen = HashSet::new();
    let mut app_ids = Vec::new();

    for line in LogLines::new(BufReader::new(File::open(path)?)) {
        let line = line?;
        for found in APPLICATION_REGEX.find_iter(&line) {
            if seen.insert(found.as_str().to_string()) {
                app_ids.push(found.as_str().to_string());
            }
        }
    }

    Ok(app_ids)
}
