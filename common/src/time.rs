use chrono::{DateTime, Utc};
#[cfg(debug_assertions)]
use std::{
    env, fs,
    path::Path,
    time::{Duration, SystemTime},
};

#[cfg(debug_assertions)]
fn read_fake_time(path: impl AsRef<Path>) -> anyhow::Result<DateTime<Utc>> {
    // Get the time that has elapsed since the fake time was set
    let file_modified = fs::metadata(&path)?.modified()?;
    let system_now = SystemTime::now();

    let duration_since_modified = system_now
        .duration_since(file_modified)
        .unwrap_or(Duration::from_secs(0));

    let duration = chrono::Duration::from_std(duration_since_modified)?;

    // Parse the fake time string
    let time = fs::read_to_string(&path)?;
    let time = DateTime::parse_from_rfc3339(time.trim())?;

    let time_with_elapsed = time + duration;

    Ok(time_with_elapsed.with_timezone(&Utc))
}

/// Time-based behavior such as task scheduling and the minimize timestamp is
/// easiest to test when the clock can be moved around. Unit tests simply pass
/// `now` as a parameter, but tests that exercise a whole running service need
/// to override the top-level calls to `now()`.
///
/// When the `FAKETIME_TIMESTAMP_FILE` environment variable is set (debug
/// builds only), `now()` reads an RFC3339 timestamp from that file, plus the
/// wall-clock time elapsed since the file was last written. Writing a new
/// timestamp to the file time-travels every subsequent `now()` call.
#[cfg(debug_assertions)]
pub fn now() -> DateTime<Utc> {
    if let Ok(path) = env::var("FAKETIME_TIMESTAMP_FILE") {
        match read_fake_time(path) {
            Ok(time) => {
                return time;
            }
            Err(err) => panic!("Failed to read fake time from file: {err}"),
        }
    }

    Utc::now()
}

#[cfg(not(debug_assertions))]
pub fn now() -> DateTime<Utc> {
    Utc::now()
}
