//! LoadTarget trait definition.
//!
//! The record transformers write through this trait, the pipeline hands them
//! the transaction of the file being processed.

use super::models::{Artist, NewSongPlay, Song, SongMatch, TimeBucket, User};
use crate::error::EtlError;

/// Write side of the warehouse, scoped to one unit of work.
pub trait LoadTarget {
    // =========================================================================
    // Catalog Dimensions
    // =========================================================================

    /// Insert the song, or overwrite the stored one with the same id.
    fn upsert_song(&self, song: &Song) -> Result<(), EtlError>;

    /// Insert the artist, or overwrite the stored one with the same id.
    fn upsert_artist(&self, artist: &Artist) -> Result<(), EtlError>;

    // =========================================================================
    // Activity Dimensions
    // =========================================================================

    /// Insert the user, or overwrite the stored one with the same id.
    fn upsert_user(&self, user: &User) -> Result<(), EtlError>;

    /// Insert the bucket unless its start time is already stored.
    /// Returns whether a row was inserted.
    fn insert_time_bucket(&self, bucket: &TimeBucket) -> Result<bool, EtlError>;

    // =========================================================================
    // Facts
    // =========================================================================

    /// Append a song play, returning its generated id.
    fn append_songplay(&self, songplay: &NewSongPlay) -> Result<i64, EtlError>;

    /// Find the first song with this title, by an artist with this name and
    /// with exactly this duration.
    fn find_song_match(
        &self,
        title: &str,
        artist_name: &str,
        duration: f64,
    ) -> Result<Option<SongMatch>, EtlError>;
}
