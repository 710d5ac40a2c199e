//! Per-file transform and load of the two datasets.

mod log;
mod song;
mod time;

pub use log::{play_events, process_log_file, user_row};
pub use song::{process_song_file, song_rows};
pub use time::{TimestampUnit, MIN_EPOCH_MILLIS};

use std::ops::AddAssign;

/// What loading one file wrote.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FileReport {
    /// Decoded lines, of any event kind.
    pub records: usize,
    pub songs: usize,
    pub artists: usize,
    /// User writes, one per song play.
    pub users: usize,
    /// Newly inserted time buckets.
    pub time_buckets: usize,
    pub songplays: usize,
    /// Song plays stored without song and artist ids.
    pub unmatched_songplays: usize,
}

impl AddAssign for FileReport {
    fn add_assign(&mut self, other: FileReport) {
        self.records += other.records;
        self.songs += other.songs;
        self.artists += other.artists;
        self.users += other.users;
        self.time_buckets += other.time_buckets;
        self.songplays += other.songplays;
        self.unmatched_songplays += other.unmatched_songplays;
    }
}
