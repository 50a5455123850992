//! Asset records as served by the listing and upload endpoints.

pub mod filter;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use filter::{Category, TypeFilterTable};

/// Serde helper for the server's `date_added` format.
///
/// The server renders timestamps as `Jun 01, 2013 at 10:30 UTC`. RFC 3339 is
/// accepted on input as well; output always uses the server format.
pub(crate) mod date_added {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub(crate) const FORMAT: &str = "%b %d, %Y at %H:%M UTC";

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid date_added: {s}")))
    }

    pub(crate) fn parse(s: &str) -> Option<DateTime<Utc>> {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, FORMAT) {
            return Some(naive.and_utc());
        }
        DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// One uploaded asset.
///
/// Records are values: controllers replace them, they never edit one in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    /// Asset key used by delete and lock requests. Older servers omit it,
    /// in which case [`AssetRecord::key`] falls back to `url`.
    #[serde(default)]
    pub id: String,
    pub display_name: String,
    /// Thumbnail URL; `null` for assets without one.
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(with = "date_added")]
    pub date_added: DateTime<Utc>,
    pub url: String,
    #[serde(default)]
    pub external_url: String,
    #[serde(default)]
    pub portable_url: String,
    #[serde(default)]
    pub locked: bool,
}

impl AssetRecord {
    /// Identifier for requests addressing this asset.
    #[must_use]
    pub fn key(&self) -> &str {
        if self.id.is_empty() {
            &self.url
        } else {
            &self.id
        }
    }

    /// Uppercased extension of the display name, or empty.
    #[must_use]
    pub fn asset_type(&self) -> String {
        asset_type(&self.display_name)
    }

    /// `date_added` rendered the way the server renders it.
    #[must_use]
    pub fn date_added_display(&self) -> String {
        self.date_added.format(date_added::FORMAT).to_string()
    }

    /// Copy of this record with a different lock state.
    #[must_use]
    pub fn with_locked(&self, locked: bool) -> Self {
        Self {
            locked,
            ..self.clone()
        }
    }
}

/// Derive an asset type from a display name.
///
/// The type is the last `.`-separated segment, uppercased. Names without a
/// `.` have no type.
///
/// # Examples
///
/// ```
/// use assetlib::asset_type;
///
/// assert_eq!(asset_type("report.final.PDF"), "PDF");
/// assert_eq!(asset_type("photo.jpg"), "JPG");
/// assert_eq!(asset_type("noext"), "");
/// ```
#[must_use]
pub fn asset_type(display_name: &str) -> String {
    let mut segments = display_name.rsplit('.');
    let last = segments.next().unwrap_or_default();
    if segments.next().is_none() {
        return String::new();
    }
    last.to_uppercase()
}
