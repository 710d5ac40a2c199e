//! SQLite-backed song-play warehouse.
//!
//! `SqliteWarehouse` owns the only connection of the run. Writes go through a
//! [`FileTransaction`], one per data file, dropping it uncommitted rolls the
//! file's rows back.

use super::models::*;
use super::schema::{
    ARTISTS_TABLE, SONGPLAYS_TABLE, SONGS_TABLE, TIME_TABLE, USERS_TABLE,
    WAREHOUSE_VERSIONED_SCHEMAS,
};
use super::trait_def::LoadTarget;
use super::upsert::{write_row, WritePolicy};
use crate::error::EtlError;
use crate::sqlite_persistence::VersionedSchema;
use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use std::path::Path;
use tracing::info;

pub struct SqliteWarehouse {
    conn: Connection,
}

fn latest_schema() -> &'static VersionedSchema {
    &WAREHOUSE_VERSIONED_SCHEMAS[WAREHOUSE_VERSIONED_SCHEMAS.len() - 1]
}

impl SqliteWarehouse {
    /// Opens the warehouse at `db_path`, creating the schema on a new
    /// database and validating it on an existing one.
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        Self::from_connection(Self::open_connection(db_path.as_ref())?, false)
    }

    /// Opens the warehouse at `db_path` after dropping the warehouse tables
    /// and creating them again, empty. Whatever schema those tables had
    /// before is not validated.
    pub fn open_reset<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        Self::from_connection(Self::open_connection(db_path.as_ref())?, true)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?, false)
    }

    fn open_connection(db_path: &Path) -> Result<Connection> {
        Connection::open_with_flags(
            db_path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI
                | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("Failed to open warehouse database {:?}", db_path))
    }

    fn from_connection(conn: Connection, reset: bool) -> Result<Self> {
        conn.execute("PRAGMA foreign_keys = ON;", [])?;

        let schema = latest_schema();
        if reset {
            info!("Dropping and recreating warehouse tables");
            schema.drop_all(&conn)?;
            schema.create(&conn)?;
            return Ok(SqliteWarehouse { conn });
        }

        let table_count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
            [],
            |r| r.get(0),
        )?;

        if table_count == 0 {
            info!("Creating warehouse schema at version {}", schema.version);
            schema.create(&conn)?;
        } else {
            schema
                .validate(&conn)
                .context("Warehouse schema validation failed")?;
        }

        Ok(SqliteWarehouse { conn })
    }

    /// Starts the unit of work of one data file.
    pub fn begin_file(&mut self) -> Result<FileTransaction<'_>, EtlError> {
        Ok(FileTransaction {
            tx: self.conn.transaction()?,
        })
    }

    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, e)| e)
            .context("Failed to close warehouse database")
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn get_song(&self, song_id: &str) -> Result<Option<Song>, EtlError> {
        let song = self
            .conn
            .query_row(
                "SELECT song_id, title, artist_id, year, duration FROM songs WHERE song_id = ?1",
                params![song_id],
                |r| {
                    Ok(Song {
                        song_id: r.get(0)?,
                        title: r.get(1)?,
                        artist_id: r.get(2)?,
                        year: r.get(3)?,
                        duration: r.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(song)
    }

    pub fn get_artist(&self, artist_id: &str) -> Result<Option<Artist>, EtlError> {
        let artist = self
            .conn
            .query_row(
                "SELECT artist_id, name, location, latitude, longitude FROM artists WHERE artist_id = ?1",
                params![artist_id],
                |r| {
                    Ok(Artist {
                        artist_id: r.get(0)?,
                        name: r.get(1)?,
                        location: r.get(2)?,
                        latitude: r.get(3)?,
                        longitude: r.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(artist)
    }

    pub fn get_user(&self, user_id: i64) -> Result<Option<User>, EtlError> {
        let user = self
            .conn
            .query_row(
                "SELECT user_id, first_name, last_name, gender, level FROM users WHERE user_id = ?1",
                params![user_id],
                |r| {
                    Ok(User {
                        user_id: r.get(0)?,
                        first_name: r.get(1)?,
                        last_name: r.get(2)?,
                        gender: r.get(3)?,
                        level: r.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    pub fn get_time_bucket(&self, start_time: i64) -> Result<Option<TimeBucket>, EtlError> {
        let bucket = self
            .conn
            .query_row(
                "SELECT start_time, hour, day, week, month, year, weekday FROM time WHERE start_time = ?1",
                params![start_time],
                |r| {
                    Ok(TimeBucket {
                        start_time: r.get(0)?,
                        hour: r.get(1)?,
                        day: r.get(2)?,
                        week: r.get(3)?,
                        month: r.get(4)?,
                        year: r.get(5)?,
                        weekday: r.get(6)?,
                    })
                },
            )
            .optional()?;
        Ok(bucket)
    }

    /// All song plays in insertion order.
    pub fn get_songplays(&self) -> Result<Vec<SongPlay>, EtlError> {
        let mut stmt = self.conn.prepare(
            "SELECT songplay_id, start_time, user_id, level, song_id, artist_id, session_id, location, user_agent
             FROM songplays ORDER BY songplay_id",
        )?;
        let songplays = stmt
            .query_map([], |r| {
                Ok(SongPlay {
                    songplay_id: r.get(0)?,
                    start_time: r.get(1)?,
                    user_id: r.get(2)?,
                    level: r.get(3)?,
                    song_id: r.get(4)?,
                    artist_id: r.get(5)?,
                    session_id: r.get(6)?,
                    location: r.get(7)?,
                    user_agent: r.get(8)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(songplays)
    }

    pub fn get_counts(&self) -> Result<WarehouseCounts, EtlError> {
        let count = |table: &str| -> rusqlite::Result<usize> {
            self.conn
                .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| {
                    r.get::<_, i64>(0)
                })
                .map(|c| c as usize)
        };
        Ok(WarehouseCounts {
            songs: count(SONGS_TABLE.name)?,
            artists: count(ARTISTS_TABLE.name)?,
            users: count(USERS_TABLE.name)?,
            time_buckets: count(TIME_TABLE.name)?,
            songplays: count(SONGPLAYS_TABLE.name)?,
        })
    }
}

/// Writes of a single data file, applied atomically on [`commit`](Self::commit).
pub struct FileTransaction<'conn> {
    tx: Transaction<'conn>,
}

impl FileTransaction<'_> {
    pub fn commit(self) -> Result<(), EtlError> {
        self.tx.commit()?;
        Ok(())
    }

    pub fn rollback(self) -> Result<(), EtlError> {
        self.tx.rollback()?;
        Ok(())
    }
}

impl LoadTarget for FileTransaction<'_> {
    fn upsert_song(&self, song: &Song) -> Result<(), EtlError> {
        write_row(
            &self.tx,
            &SONGS_TABLE,
            WritePolicy::Overwrite,
            params![song.song_id, song.title, song.artist_id, song.year, song.duration],
        )?;
        Ok(())
    }

    fn upsert_artist(&self, artist: &Artist) -> Result<(), EtlError> {
        write_row(
            &self.tx,
            &ARTISTS_TABLE,
            WritePolicy::Overwrite,
            params![
                artist.artist_id,
                artist.name,
                artist.location,
                artist.latitude,
                artist.longitude
            ],
        )?;
        Ok(())
    }

    fn upsert_user(&self, user: &User) -> Result<(), EtlError> {
        write_row(
            &self.tx,
            &USERS_TABLE,
            WritePolicy::Overwrite,
            params![
                user.user_id,
                user.first_name,
                user.last_name,
                user.gender,
                user.level
            ],
        )?;
        Ok(())
    }

    fn insert_time_bucket(&self, bucket: &TimeBucket) -> Result<bool, EtlError> {
        let inserted = write_row(
            &self.tx,
            &TIME_TABLE,
            WritePolicy::InsertIfAbsent,
            params![
                bucket.start_time,
                bucket.hour,
                bucket.day,
                bucket.week,
                bucket.month,
                bucket.year,
                bucket.weekday
            ],
        )?;
        Ok(inserted > 0)
    }

    fn append_songplay(&self, songplay: &NewSongPlay) -> Result<i64, EtlError> {
        write_row(
            &self.tx,
            &SONGPLAYS_TABLE,
            WritePolicy::AppendOnly,
            params![
                songplay.start_time,
                songplay.user_id,
                songplay.level,
                songplay.song_id,
                songplay.artist_id,
                songplay.session_id,
                songplay.location,
                songplay.user_agent
            ],
        )?;
        Ok(self.tx.last_insert_rowid())
    }

    fn find_song_match(
        &self,
        title: &str,
        artist_name: &str,
        duration: f64,
    ) -> Result<Option<SongMatch>, EtlError> {
        let mut stmt = self.tx.prepare_cached(
            "SELECT songs.song_id, songs.artist_id
             FROM songs
             JOIN artists ON songs.artist_id = artists.artist_id
             WHERE songs.title = ?1 AND artists.name = ?2 AND songs.duration = ?3
             LIMIT 1",
        )?;
        let found = stmt
            .query_row(params![title, artist_name, duration], |r| {
                Ok(SongMatch {
                    song_id: r.get(0)?,
                    artist_id: r.get(1)?,
                })
            })
            .optional()?;
        Ok(found)
    }
}
