//! Common test infrastructure
//!
//! Builds temporary dataset trees laid out like the real song and log data,
//! plus a pipeline writing to a warehouse file inside the same directory.

#![allow(dead_code)]

use sparkify_etl::{EtlConfig, ParseErrorPolicy, Pipeline, SqliteWarehouse};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const SONG_1_ID: &str = "S1";
pub const ARTIST_1_ID: &str = "A1";
pub const SONG_1_TITLE: &str = "Test Song";
pub const ARTIST_1_NAME: &str = "Test Artist";
pub const SONG_1_DURATION: f64 = 180.5;

pub const USER_ID: i64 = 42;
pub const TS_1: i64 = 1541903636796;
pub const TS_2: i64 = 1541903700000;
pub const TS_LOGIN: i64 = 1541903600000;

pub struct TestData {
    pub dir: TempDir,
}

impl TestData {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("song_data")).unwrap();
        fs::create_dir_all(dir.path().join("log_data")).unwrap();
        TestData { dir }
    }

    pub fn song_data_dir(&self) -> PathBuf {
        self.dir.path().join("song_data")
    }

    pub fn log_data_dir(&self) -> PathBuf {
        self.dir.path().join("log_data")
    }

    pub fn db_path(&self) -> PathBuf {
        self.dir.path().join("sparkify.db")
    }

    fn write(root: &Path, relative: &str, lines: &[String]) -> PathBuf {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, lines.join("\n") + "\n").unwrap();
        path
    }

    pub fn add_song_file(&self, relative: &str, lines: &[String]) -> PathBuf {
        Self::write(&self.song_data_dir(), relative, lines)
    }

    pub fn add_raw_song_file(&self, relative: &str, content: &[u8]) -> PathBuf {
        let path = self.song_data_dir().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    pub fn add_log_file(&self, relative: &str, lines: &[String]) -> PathBuf {
        Self::write(&self.log_data_dir(), relative, lines)
    }

    pub fn config(&self, policy: ParseErrorPolicy) -> EtlConfig {
        EtlConfig {
            db_path: self.db_path(),
            song_data_dir: self.song_data_dir(),
            log_data_dir: self.log_data_dir(),
            on_parse_error: policy,
            ..EtlConfig::default()
        }
    }

    pub fn pipeline(&self, policy: ParseErrorPolicy) -> Pipeline {
        let warehouse = SqliteWarehouse::open(self.db_path()).unwrap();
        Pipeline::new(warehouse, self.config(policy))
    }
}

pub fn song_line(
    song_id: &str,
    title: &str,
    artist_id: &str,
    artist_name: &str,
    duration: f64,
) -> String {
    format!(
        r#"{{"num_songs": 1, "artist_id": "{artist_id}", "artist_latitude": 40.7, "artist_longitude": -74.0, "artist_location": "NYC", "artist_name": "{artist_name}", "song_id": "{song_id}", "title": "{title}", "duration": {duration}, "year": 2000}}"#
    )
}

pub fn test_song_line() -> String {
    song_line(SONG_1_ID, SONG_1_TITLE, ARTIST_1_ID, ARTIST_1_NAME, SONG_1_DURATION)
}

pub fn log_line(
    page: &str,
    ts: i64,
    user_id: &str,
    level: &str,
    song: &str,
    artist: &str,
    length: f64,
) -> String {
    format!(
        r#"{{"artist":"{artist}","auth":"Logged In","firstName":"Ada","gender":"F","itemInSession":1,"lastName":"Byron","length":{length},"level":"{level}","location":"San Jose-Sunnyvale-Santa Clara, CA","method":"PUT","page":"{page}","registration":1540919166796.0,"sessionId":583,"song":"{song}","status":200,"ts":{ts},"userAgent":"Mozilla/5.0","userId":"{user_id}"}}"#
    )
}

pub fn login_line(ts: i64) -> String {
    format!(
        r#"{{"artist":null,"auth":"Logged Out","firstName":null,"gender":null,"itemInSession":0,"lastName":null,"length":null,"level":"free","location":null,"method":"PUT","page":"Login","registration":null,"sessionId":583,"song":null,"status":307,"ts":{ts},"userAgent":null,"userId":""}}"#
    )
}

pub fn play_line(ts: i64, level: &str) -> String {
    log_line(
        "NextSong",
        ts,
        &USER_ID.to_string(),
        level,
        SONG_1_TITLE,
        ARTIST_1_NAME,
        SONG_1_DURATION,
    )
}
