//! Typed input records and the line-by-line JSON decoder.
//!
//! Every data file holds one JSON object per line. Lines are decoded strictly
//! into the record type of the file kind, a malformed line or a mistyped
//! field fails the whole file with [`EtlError::Parse`].

use crate::error::EtlError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

/// A decoded record together with its 1-based line number in the file.
#[derive(Debug, Clone)]
pub struct JsonLine<T> {
    pub line: usize,
    pub record: T,
}

/// Reads `path` as newline-delimited JSON. Blank lines are ignored.
pub fn read_json_lines<T: DeserializeOwned>(path: &Path) -> Result<Vec<JsonLine<T>>, EtlError> {
    let file = File::open(path).map_err(|source| EtlError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut out = Vec::new();
    for (index, line_result) in BufReader::new(file).lines().enumerate() {
        let line = index + 1;
        let text = line_result.map_err(|source| match source.kind() {
            // Not UTF-8: the content is malformed, not the file unreadable
            ErrorKind::InvalidData => EtlError::parse(path, line, source.to_string()),
            _ => EtlError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;
        if text.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&text)
            .map_err(|e| EtlError::parse(path, line, e.to_string()))?;
        out.push(JsonLine { line, record });
    }
    Ok(out)
}

/// One line of a song metadata file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SongRecord {
    pub song_id: String,
    pub title: String,
    pub artist_id: String,
    pub year: i32,
    pub duration: f64,
    pub artist_name: String,
    pub artist_location: Option<String>,
    pub artist_latitude: Option<f64>,
    pub artist_longitude: Option<f64>,
}

/// One line of an activity log file.
///
/// Only `page` and `ts` are present on every event kind, the rest is checked
/// when an event is turned into a [`PlayEvent`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    pub page: String,
    pub ts: i64,
    #[serde(default, deserialize_with = "deserialize_user_id")]
    pub user_id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub level: Option<String>,
    pub song: Option<String>,
    pub artist: Option<String>,
    pub length: Option<f64>,
    pub session_id: Option<i64>,
    pub location: Option<String>,
    pub user_agent: Option<String>,
}

pub const NEXT_SONG_PAGE: &str = "NextSong";

impl LogRecord {
    pub fn is_song_play(&self) -> bool {
        self.page == NEXT_SONG_PAGE
    }
}

/// A playback event with every field the warehouse needs.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayEvent {
    pub ts: i64,
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub level: String,
    pub song: String,
    pub artist: String,
    pub length: f64,
    pub session_id: i64,
    pub location: String,
    pub user_agent: String,
}

fn required<T>(value: Option<T>, field: &str, path: &Path, line: usize) -> Result<T, EtlError> {
    value.ok_or_else(|| EtlError::parse(path, line, format!("missing field `{}`", field)))
}

impl PlayEvent {
    pub fn from_log_line(log_line: JsonLine<LogRecord>, path: &Path) -> Result<Self, EtlError> {
        let line = log_line.line;
        let r = log_line.record;
        Ok(PlayEvent {
            ts: r.ts,
            user_id: required(r.user_id, "userId", path, line)?,
            first_name: required(r.first_name, "firstName", path, line)?,
            last_name: required(r.last_name, "lastName", path, line)?,
            gender: required(r.gender, "gender", path, line)?,
            level: required(r.level, "level", path, line)?,
            song: required(r.song, "song", path, line)?,
            artist: required(r.artist, "artist", path, line)?,
            length: required(r.length, "length", path, line)?,
            session_id: required(r.session_id, "sessionId", path, line)?,
            location: required(r.location, "location", path, line)?,
            user_agent: required(r.user_agent, "userAgent", path, line)?,
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawUserId {
    Number(i64),
    Text(String),
}

// Logged-out events carry `"userId": ""`.
fn deserialize_user_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawUserId>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawUserId::Number(id)) => Ok(Some(id)),
        Some(RawUserId::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(RawUserId::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid userId \"{}\"", text))),
    }
}
