//! Shared domain enums

use serde::{de, Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// BookGenre
// ---------------------------------------------------------------------------

/// Book genre classification.
///
/// Serialized by name; stored as its `SMALLINT` code. Deserialization accepts
/// either the name (ASCII case-insensitive) or the numeric code, and rejects
/// anything outside the set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema, sqlx::Type)]
#[repr(i16)]
pub enum BookGenre {
    Undefined = 0,
    FiccaoCientifica = 1,
    Romance = 2,
    Misterio = 3,
    Fantasia = 4,
    Biografia = 5,
    Tecnologia = 6,
    Filosofia = 7,
    Autoajuda = 8,
    Satira = 9,
    Ficcao = 10,
    Suspense = 11,
}

impl BookGenre {
    pub const ALL: [BookGenre; 12] = [
        BookGenre::Undefined,
        BookGenre::FiccaoCientifica,
        BookGenre::Romance,
        BookGenre::Misterio,
        BookGenre::Fantasia,
        BookGenre::Biografia,
        BookGenre::Tecnologia,
        BookGenre::Filosofia,
        BookGenre::Autoajuda,
        BookGenre::Satira,
        BookGenre::Ficcao,
        BookGenre::Suspense,
    ];

    /// Wire name of the genre
    pub fn as_str(&self) -> &'static str {
        match self {
            BookGenre::Undefined => "Undefined",
            BookGenre::FiccaoCientifica => "FiccaoCientifica",
            BookGenre::Romance => "Romance",
            BookGenre::Misterio => "Misterio",
            BookGenre::Fantasia => "Fantasia",
            BookGenre::Biografia => "Biografia",
            BookGenre::Tecnologia => "Tecnologia",
            BookGenre::Filosofia => "Filosofia",
            BookGenre::Autoajuda => "Autoajuda",
            BookGenre::Satira => "Satira",
            BookGenre::Ficcao => "Ficcao",
            BookGenre::Suspense => "Suspense",
        }
    }
}

impl TryFrom<i16> for BookGenre {
    type Error = String;

    fn try_from(v: i16) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(BookGenre::Undefined),
            1 => Ok(BookGenre::FiccaoCientifica),
            2 => Ok(BookGenre::Romance),
            3 => Ok(BookGenre::Misterio),
            4 => Ok(BookGenre::Fantasia),
            5 => Ok(BookGenre::Biografia),
            6 => Ok(BookGenre::Tecnologia),
            7 => Ok(BookGenre::Filosofia),
            8 => Ok(BookGenre::Autoajuda),
            9 => Ok(BookGenre::Satira),
            10 => Ok(BookGenre::Ficcao),
            11 => Ok(BookGenre::Suspense),
            other => Err(format!("undefined genre code {}", other)),
        }
    }
}

impl From<BookGenre> for i16 {
    fn from(g: BookGenre) -> Self {
        g as i16
    }
}

impl std::str::FromStr for BookGenre {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookGenre::ALL
            .into_iter()
            .find(|g| g.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("undefined genre '{}'", s))
    }
}

impl std::fmt::Display for BookGenre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GenreRepr {
    Code(i64),
    Name(String),
}

impl<'de> Deserialize<'de> for BookGenre {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match GenreRepr::deserialize(deserializer)? {
            GenreRepr::Code(code) => i16::try_from(code)
                .map_err(|_| format!("undefined genre code {}", code))
                .and_then(BookGenre::try_from)
                .map_err(de::Error::custom),
            GenreRepr::Name(name) => name.parse().map_err(de::Error::custom),
        }
    }
}
