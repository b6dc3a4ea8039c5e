use std::io::{self, Write};

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::ser::{Formatter, Serializer};

use super::error::QueryError;

/// Opaque user identifier. Users themselves live outside this service.
pub type UserId = i32;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measure: Option<String>,
}

impl Ingredient {
    pub fn new(name: &str, measure: Option<&str>) -> Self {
        Self {
            name: name.to_owned(),
            measure: measure.map(|m| m.to_owned()),
        }
    }
}

/// Writes list columns as `[{"name": "Gin"}, ...]` with every non-ASCII
/// character escaped. Substring search runs over this text, so the spacing
/// and escaping are part of the stored format.
struct ListFormatter;

impl Formatter for ListFormatter {
    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        for c in fragment.chars() {
            if (c as u32) < 0x7f {
                writer.write_all(&[c as u8])?;
                continue;
            }
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                write!(writer, "\\u{unit:04x}")?;
            }
        }
        Ok(())
    }
}

/// Encodes a list column. An empty list is stored as NULL.
pub fn encode_list<T: Serialize>(items: &[T]) -> Result<Option<String>, QueryError> {
    if items.is_empty() {
        return Ok(None);
    }

    let mut buf = Vec::new();
    items.serialize(&mut Serializer::with_formatter(&mut buf, ListFormatter))?;
    String::from_utf8(buf)
        .map(Some)
        .map_err(|e| QueryError::new(format!("Encoded list is not UTF-8: {e}")))
}

/// Decodes a list column. NULL and the empty string read back as an empty list.
pub fn decode_list<T: DeserializeOwned>(text: Option<&str>) -> Result<Vec<T>, QueryError> {
    match text {
        Some(text) if !text.is_empty() => Ok(serde_json::from_str(text)?),
        _ => Ok(vec![]),
    }
}

fn nullable_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cocktail {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub alcoholic: Option<String>,
    #[serde(default)]
    pub glass: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub video: Option<String>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub iba: Option<String>,
    #[serde(default)]
    pub date_modified: Option<String>,
    #[serde(default)]
    pub garnish: Option<String>,
}

impl Cocktail {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_owned(),
            name: name.to_owned(),
            category: None,
            alcoholic: None,
            glass: None,
            instructions: None,
            image: None,
            ingredients: vec![],
            video: None,
            tags: vec![],
            iba: None,
            date_modified: None,
            garnish: None,
        }
    }
}

/// A `cocktails` row as stored, with ingredients and tags still serialized.
#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq)]
pub struct CocktailRow {
    pub id: String,
    pub name: String,
    pub category: Option<String>,
    pub alcoholic: Option<String>,
    pub glass: Option<String>,
    pub instructions: Option<String>,
    pub image: Option<String>,
    pub ingredients_json: Option<String>,
    pub video: Option<String>,
    pub tags_json: Option<String>,
    pub iba: Option<String>,
    pub date_modified: Option<String>,
    pub garnish: Option<String>,
}

impl TryFrom<&Cocktail> for CocktailRow {
    type Error = QueryError;

    fn try_from(value: &Cocktail) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.to_owned(),
            name: value.name.to_owned(),
            category: value.category.to_owned(),
            alcoholic: value.alcoholic.to_owned(),
            glass: value.glass.to_owned(),
            instructions: value.instructions.to_owned(),
            image: value.image.to_owned(),
            ingredients_json: encode_list(&value.ingredients)?,
            video: value.video.to_owned(),
            tags_json: encode_list(&value.tags)?,
            iba: value.iba.to_owned(),
            date_modified: value.date_modified.to_owned(),
            garnish: value.garnish.to_owned(),
        })
    }
}

impl TryFrom<CocktailRow> for Cocktail {
    type Error = QueryError;

    fn try_from(value: CocktailRow) -> Result<Self, Self::Error> {
        Ok(Self {
            ingredients: decode_list(value.ingredients_json.as_deref())?,
            tags: decode_list(value.tags_json.as_deref())?,
            id: value.id,
            name: value.name,
            category: value.category,
            alcoholic: value.alcoholic,
            glass: value.glass,
            instructions: value.instructions,
            image: value.image,
            video: value.video,
            iba: value.iba,
            date_modified: value.date_modified,
            garnish: value.garnish,
        })
    }
}

#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BarShelfItem {
    pub id: i32,
    pub user_id: UserId,
    pub ingredient_name: String,
    pub quantity: Option<String>,
    pub date_added: DateTime<Utc>,
}

#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Favorite {
    pub id: i32,
    pub user_id: UserId,
    pub cocktail_id: String,
    pub date_added: DateTime<Utc>,
}

#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq)]
pub struct UserCocktailRow {
    pub id: i32,
    pub user_id: UserId,
    pub name: String,
    pub category: Option<String>,
    pub glass: Option<String>,
    pub instructions: Option<String>,
    pub ingredients_json: Option<String>,
    pub tags_json: Option<String>,
    pub garnish: Option<String>,
    pub date_created: DateTime<Utc>,
}

/// A recipe authored by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserCocktail {
    pub id: i32,
    pub user_id: UserId,
    pub name: String,
    pub category: Option<String>,
    pub glass: Option<String>,
    pub instructions: Option<String>,
    pub ingredients: Vec<Ingredient>,
    pub tags: Vec<String>,
    pub garnish: Option<String>,
    pub date_created: DateTime<Utc>,
}

impl TryFrom<UserCocktailRow> for UserCocktail {
    type Error = QueryError;

    fn try_from(value: UserCocktailRow) -> Result<Self, Self::Error> {
        Ok(Self {
            ingredients: decode_list(value.ingredients_json.as_deref())?,
            tags: decode_list(value.tags_json.as_deref())?,
            id: value.id,
            user_id: value.user_id,
            name: value.name,
            category: value.category,
            glass: value.glass,
            instructions: value.instructions,
            garnish: value.garnish,
            date_created: value.date_created,
        })
    }
}

/// Body of `POST /users/{id}/cocktails`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewUserCocktail {
    pub name: Option<String>,
    pub category: Option<String>,
    pub glass: Option<String>,
    pub instructions: Option<String>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub ingredients: Vec<Ingredient>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub tags: Vec<String>,
    pub garnish: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertStatus {
    Created,
    Updated,
}
