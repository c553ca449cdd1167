use chrono::{DateTime, Utc};
use libsql::{Connection, Row, Value, params::Params};

use super::{CreateSong, Song, SongFilter};
use crate::error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;

const SONG_COLUMNS: &str =
    "id, created_at, updated_at, group_name, song, release_date, text, link";

pub struct Songs<'a> {
    conn: &'a Connection,
}

impl<'a> Songs<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Lists songs whose group and title contain the given filters,
    /// ignoring case for any script. A negative limit is unbounded and a
    /// negative offset starts from the first row.
    pub async fn list_songs(&self, filter: &SongFilter, limit: i64, offset: i64) -> Result<Vec<Song>> {
        let mut clauses = Vec::new();
        let mut args = Vec::new();

        if let Some(group) = filter.group.as_deref().filter(|s| !s.is_empty()) {
            clauses.push(r"group_name_folded LIKE ? ESCAPE '\'");
            args.push(Value::Text(like_pattern(&fold(group))));
        }
        if let Some(song) = filter.song.as_deref().filter(|s| !s.is_empty()) {
            clauses.push(r"song_folded LIKE ? ESCAPE '\'");
            args.push(Value::Text(like_pattern(&fold(song))));
        }

        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };

        let query = format!(
            "SELECT {SONG_COLUMNS} FROM songs {where_clause} ORDER BY id LIMIT ? OFFSET ?"
        );
        args.push(Value::Integer(limit));
        args.push(Value::Integer(offset));

        let mut rows = self.conn.query(&query, Params::Positional(args)).await?;
        let mut songs = Vec::new();
        while let Some(row) = rows.next().await? {
            songs.push(row_to_song(&row)?);
        }

        Ok(songs)
    }

    pub async fn get_song(&self, id: i64) -> Result<Song> {
        let query = format!("SELECT {SONG_COLUMNS} FROM songs WHERE id = ?");
        let mut rows = self.conn.query(&query, libsql::params![id]).await?;

        match rows.next().await? {
            Some(row) => row_to_song(&row),
            None => Err(StorageError::NotFound(id)),
        }
    }

    /// Deleting an id that does not exist is not an error.
    pub async fn delete_song(&self, id: i64) -> Result<()> {
        let affected = self
            .conn
            .execute("DELETE FROM songs WHERE id = ?", libsql::params![id])
            .await?;
        tracing::debug!(id, affected, "deleted song");
        Ok(())
    }

    /// Writes every client-editable column of `song` under `song.id`,
    /// inserting the row if it is missing.
    pub async fn save_song(&self, song: &Song) -> Result<Song> {
        let query = format!(
            r#"
            INSERT INTO songs (id, group_name, song, release_date, text, link, group_name_folded, song_folded)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                group_name = excluded.group_name,
                song = excluded.song,
                group_name_folded = excluded.group_name_folded,
                song_folded = excluded.song_folded,
                release_date = excluded.release_date,
                text = excluded.text,
                link = excluded.link,
                updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
            RETURNING {SONG_COLUMNS}
        "#
        );

        let mut rows = self
            .conn
            .query(
                &query,
                libsql::params![
                    song.id,
                    song.group.as_str(),
                    song.song.as_str(),
                    song.release_date.as_str(),
                    song.text.as_str(),
                    song.link.as_str(),
                    fold(&song.group),
                    fold(&song.song)
                ],
            )
            .await?;

        match rows.next().await? {
            Some(row) => row_to_song(&row),
            None => Err(StorageError::NotFound(song.id)),
        }
    }

    pub async fn create_song(&self, input: CreateSong) -> Result<Song> {
        let query = format!(
            r#"
            INSERT INTO songs (group_name, song, release_date, text, link, group_name_folded, song_folded)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING {SONG_COLUMNS}
        "#
        );

        let mut rows = self
            .conn
            .query(
                &query,
                libsql::params![
                    input.group.as_str(),
                    input.song.as_str(),
                    input.release_date.as_str(),
                    input.text.as_str(),
                    input.link.as_str(),
                    fold(&input.group),
                    fold(&input.song)
                ],
            )
            .await?;

        match rows.next().await? {
            Some(row) => row_to_song(&row),
            None => Err(StorageError::Decode("insert returned no row".to_string())),
        }
    }
}

/// SQLite only folds ASCII case in `LIKE`, so filters compare against
/// lowercase copies kept next to the original columns.
fn fold(value: &str) -> String {
    value.to_lowercase()
}

/// Builds a `%needle%` pattern where `%`, `_` and `\` in the needle match
/// literally under `ESCAPE '\'`.
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| StorageError::Decode(format!("bad timestamp {raw:?}: {e}")))
}

fn row_to_song(row: &Row) -> Result<Song> {
    let created_at: String = row.get(1)?;
    let updated_at: String = row.get(2)?;

    Ok(Song {
        id: row.get(0)?,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
        group: row.get(3)?,
        song: row.get(4)?,
        release_date: row.get(5)?,
        text: row.get(6)?,
        link: row.get(7)?,
    })
}
