use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A stored song. Missing fields in an incoming body take their zero value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Song {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub group: String,
    pub song: String,
    #[serde(rename = "releaseDate")]
    pub release_date: String,
    pub text: String,
    pub link: String,
}

impl Song {
    /// Lyrics split into verses on blank lines.
    pub fn verses(&self) -> Vec<&str> {
        if self.text.is_empty() {
            return Vec::new();
        }
        self.text.split("\n\n").collect()
    }
}

/// Details returned by the song detail service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SongDetail {
    #[serde(rename = "releaseDate", default)]
    pub release_date: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub link: String,
}

/// Body of a create request.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewSong {
    pub group: String,
    pub song: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateSong {
    pub group: String,
    pub song: String,
    pub release_date: String,
    pub text: String,
    pub link: String,
}

impl CreateSong {
    pub fn enriched(new_song: NewSong, detail: SongDetail) -> Self {
        Self {
            group: new_song.group,
            song: new_song.song,
            release_date: detail.release_date,
            text: detail.text,
            link: detail.link,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SongFilter {
    pub group: Option<String>,
    pub song: Option<String>,
}
