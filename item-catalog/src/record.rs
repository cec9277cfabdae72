use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;
use std::ops::Deref;

/// Extension given to every saved image, whatever the server sends back.
pub const IMAGE_EXTENSION: &str = "webp";

/// Whether a catalog value counts as "set": `null`, `false`, zero, and empty
/// strings, arrays and objects do not.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// One element of a catalog array. Only `id` and `image` are looked at.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ItemRecord(Map<String, Value>);

impl ItemRecord {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The record's identifier, if it is set.
    pub fn id(&self) -> Option<ItemId> {
        self.get("id").and_then(ItemId::from_value)
    }

    /// The record's image field, if it is set. It is not necessarily a string.
    pub fn image(&self) -> Option<&Value> {
        self.get("image").filter(|v| is_truthy(v))
    }

    /// Returns the asset to fetch for this record, or `None` when either the
    /// identifier or the image is missing, empty or zero.
    pub fn asset(&self) -> Option<ItemAsset<'_>> {
        let id = self.id()?;
        let image = self.image()?;
        Some(ItemAsset { id, image })
    }
}

/// Textual form of an item identifier, used as the output file stem.
#[derive(Clone, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Strings are taken verbatim, any other set value uses its JSON text
    /// (`42`, `1.5`, `true`). Unset values are not ids.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            _ if !is_truthy(value) => None,
            Value::String(s) => Some(Self(s.clone())),
            other => Some(Self(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `<id>.webp` names a file directly inside the output directory.
    pub fn is_plain_file_stem(&self) -> bool {
        !matches!(self.0.as_str(), "." | "..") && !self.0.contains(['/', '\\', '\0'])
    }
}

impl Deref for ItemId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A record that passed the filter: an identifier and the image to fetch.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemAsset<'a> {
    pub id: ItemId,
    pub image: &'a Value,
}

impl<'a> ItemAsset<'a> {
    /// The image URL text, or `None` if the image field is not a string.
    pub fn url(&self) -> Option<&'a str> {
        self.image.as_str()
    }

    pub fn file_name(&self) -> String {
        format!("{}.{IMAGE_EXTENSION}", self.id)
    }
}
