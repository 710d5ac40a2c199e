use super::FileReport;
use crate::error::EtlError;
use crate::records::{read_json_lines, SongRecord};
use crate::warehouse::{Artist, LoadTarget, Song};
use std::path::Path;
use tracing::{debug, warn};

/// Splits a song record into its song and artist rows. Values are copied as-is.
pub fn song_rows(record: &SongRecord) -> (Song, Artist) {
    let song = Song {
        song_id: record.song_id.clone(),
        title: record.title.clone(),
        artist_id: record.artist_id.clone(),
        year: record.year,
        duration: record.duration,
    };
    let artist = Artist {
        artist_id: record.artist_id.clone(),
        name: record.artist_name.clone(),
        location: record.artist_location.clone(),
        latitude: record.artist_latitude,
        longitude: record.artist_longitude,
    };
    (song, artist)
}

/// Loads the song and the artist described by one song file.
///
/// A song file holds a single record, only the first line is loaded.
pub fn process_song_file(target: &dyn LoadTarget, path: &Path) -> Result<FileReport, EtlError> {
    let lines = read_json_lines::<SongRecord>(path)?;
    let first = lines
        .first()
        .ok_or_else(|| EtlError::parse(path, 0, "file contains no records"))?;
    if lines.len() > 1 {
        warn!(
            "{} holds {} song records, only the first one is loaded",
            path.display(),
            lines.len()
        );
    }

    let (song, artist) = song_rows(&first.record);
    target.upsert_song(&song)?;
    target.upsert_artist(&artist)?;
    debug!("Loaded song {} by artist {}", song.song_id, artist.artist_id);

    Ok(FileReport {
        records: lines.len(),
        songs: 1,
        artists: 1,
        ..FileReport::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn song_rows_select_fields_without_transforming_them() {
        let record = SongRecord {
            song_id: "S1".to_string(),
            title: "Test Song".to_string(),
            artist_id: "A1".to_string(),
            year: 2000,
            duration: 180.5,
            artist_name: "Test Artist".to_string(),
            artist_location: Some("NYC".to_string()),
            artist_latitude: Some(40.7),
            artist_longitude: Some(-74.0),
        };

        let (song, artist) = song_rows(&record);
        assert_eq!(
            song,
            Song {
                song_id: "S1".to_string(),
                title: "Test Song".to_string(),
                artist_id: "A1".to_string(),
                year: 2000,
                duration: 180.5,
            }
        );
        assert_eq!(
            artist,
            Artist {
                artist_id: "A1".to_string(),
                name: "Test Artist".to_string(),
                location: Some("NYC".to_string()),
                latitude: Some(40.7),
                longitude: Some(-74.0),
            }
        );
    }

    #[test]
    fn song_rows_keep_empty_and_missing_values() {
        let record = SongRecord {
            song_id: "SOX".to_string(),
            title: "  spaced  ".to_string(),
            artist_id: "ARX".to_string(),
            year: 0,
            duration: 0.0,
            artist_name: "".to_string(),
            artist_location: Some("".to_string()),
            artist_latitude: None,
            artist_longitude: None,
        };

        let (song, artist) = song_rows(&record);
        assert_eq!(song.title, "  spaced  ");
        assert_eq!(song.year, 0);
        assert_eq!(artist.name, "");
        assert_eq!(artist.location.as_deref(), Some(""));
        assert_eq!(artist.latitude, None);
    }
}
