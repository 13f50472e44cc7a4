//! Locating recordings on disk.
//!
//! Recordings are written as `id_{profile}_cursor_log_{YYYY-mm-dd_HH-MM-SS}.csv`.

use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

const LOG_MARKER: &str = "cursor_log_";
const LOG_TIME_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Capture time encoded in a recording's file name.
pub fn log_timestamp(file_name: &str) -> Option<NaiveDateTime> {
    let (_, rest) = file_name.split_once(LOG_MARKER)?;
    let stamp = rest.strip_suffix(".csv")?;
    NaiveDateTime::parse_from_str(stamp, LOG_TIME_FORMAT).ok()
}

pub fn log_file_name(profile: &str, captured_at: NaiveDateTime) -> String {
    format!("id_{profile}_{LOG_MARKER}{}.csv", captured_at.format(LOG_TIME_FORMAT))
}

fn is_profile_log(file_name: &str, profile: &str) -> bool {
    file_name
        .strip_prefix("id_")
        .and_then(|rest| rest.strip_prefix(profile))
        .is_some_and(|rest| rest.starts_with('_'))
        && file_name.ends_with(".csv")
}

/// Newest recording for `profile` in `dir`.
///
/// Names whose timestamp does not parse rank as oldest. Ties resolve to the
/// lexicographically last name.
pub fn latest_log(dir: &Path, profile: &str) -> io::Result<Option<PathBuf>> {
    let mut names: Vec<String> = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };
        if is_profile_log(&name, profile) {
            names.push(name);
        }
    }

    names.sort();
    Ok(names
        .into_iter()
        .max_by_key(|name| log_timestamp(name))
        .map(|name| dir.join(name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn parses_timestamp_from_name() {
        assert_eq!(
            log_timestamp("id_2_cursor_log_2025-04-14_23-33-29.csv"),
            Some(at(2025, 4, 14, 23, 33, 29))
        );
        assert_eq!(log_timestamp("id_2_cursor_log_yesterday.csv"), None);
        assert_eq!(log_timestamp("notes.csv"), None);
    }

    #[test]
    fn file_name_round_trips() {
        let when = at(2025, 1, 2, 3, 4, 5);
        let name = log_file_name("7", when);
        assert_eq!(name, "id_7_cursor_log_2025-01-02_03-04-05.csv");
        assert_eq!(log_timestamp(&name), Some(when));
    }

    #[test]
    fn profile_prefix_must_end_at_separator() {
        assert!(is_profile_log("id_1_cursor_log_2025-01-01_00-00-00.csv", "1"));
        assert!(!is_profile_log("id_12_cursor_log_2025-01-01_00-00-00.csv", "1"));
        assert!(!is_profile_log("id_1_cursor_log_2025-01-01_00-00-00.txt", "1"));
    }

    #[test]
    fn picks_newest_recording_for_profile() {
        let dir = std::env::temp_dir().join(format!("trajwalk_logs_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        for name in [
            "id_3_cursor_log_2025-04-14_23-33-29.csv",
            "id_3_cursor_log_2025-05-01_08-00-00.csv",
            "id_3_cursor_log_garbled.csv",
            "id_33_cursor_log_2026-01-01_00-00-00.csv",
        ] {
            std::fs::write(dir.join(name), "timestamp,x,y,clicked\n").unwrap();
        }

        let latest = latest_log(&dir, "3").unwrap();
        assert_eq!(latest, Some(dir.join("id_3_cursor_log_2025-05-01_08-00-00.csv")));
        assert_eq!(latest_log(&dir, "4").unwrap(), None);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
