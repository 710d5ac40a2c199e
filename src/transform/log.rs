use super::time::TimestampUnit;
use super::FileReport;
use crate::error::EtlError;
use crate::records::{read_json_lines, JsonLine, LogRecord, PlayEvent};
use crate::warehouse::{LoadTarget, NewSongPlay, TimeBucket, User};
use std::path::Path;
use tracing::debug;

/// Keeps the song plays of a log file, validated into [`PlayEvent`]s.
pub fn play_events(
    lines: Vec<JsonLine<LogRecord>>,
    path: &Path,
) -> Result<Vec<PlayEvent>, EtlError> {
    lines
        .into_iter()
        .filter(|line| line.record.is_song_play())
        .map(|line| PlayEvent::from_log_line(line, path))
        .collect()
}

pub fn user_row(event: &PlayEvent) -> User {
    User {
        user_id: event.user_id,
        first_name: event.first_name.clone(),
        last_name: event.last_name.clone(),
        gender: event.gender.clone(),
        level: event.level.clone(),
    }
}

/// Loads the time buckets, users and song plays of one log file.
///
/// Dimensions are written before the facts referencing them. Every event
/// yields one user write, later events of the same user overwrite earlier ones.
pub fn process_log_file(target: &dyn LoadTarget, path: &Path) -> Result<FileReport, EtlError> {
    let lines = read_json_lines::<LogRecord>(path)?;
    let mut report = FileReport {
        records: lines.len(),
        ..FileReport::default()
    };

    let events = play_events(lines, path)?;
    let buckets = events
        .iter()
        .map(|event| TimeBucket::derive(event.ts, TimestampUnit::Milliseconds))
        .collect::<Result<Vec<_>, _>>()?;

    for bucket in &buckets {
        if target.insert_time_bucket(bucket)? {
            report.time_buckets += 1;
        }
    }

    for event in &events {
        target.upsert_user(&user_row(event))?;
        report.users += 1;
    }

    for (event, bucket) in events.iter().zip(buckets.iter()) {
        let song = target.find_song_match(&event.song, &event.artist, event.length)?;
        if song.is_none() {
            report.unmatched_songplays += 1;
        }
        let (song_id, artist_id) = match song {
            Some(found) => (Some(found.song_id), Some(found.artist_id)),
            None => (None, None),
        };
        target.append_songplay(&NewSongPlay {
            start_time: bucket.start_time,
            user_id: event.user_id,
            level: event.level.clone(),
            song_id,
            artist_id,
            session_id: event.session_id,
            location: event.location.clone(),
            user_agent: event.user_agent.clone(),
        })?;
        report.songplays += 1;
    }

    debug!(
        "{}: {} events, {} song plays, {} without catalog match",
        path.display(),
        report.records,
        report.songplays,
        report.unmatched_songplays
    );
    Ok(report)
}
