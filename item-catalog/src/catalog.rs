use crate::error::Error;
use crate::record::{ItemAsset, ItemRecord};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Catalog files read by default, in processing order. Later files win
/// when two of them use the same item id.
pub const DEFAULT_CATALOG_FILES: &[&str] = &[
    "arc_raiders_items_enriched.json",
    "augment_items_enriched.json",
    "grenade_items_enriched.json",
    "healing_items_enriched.json",
    "quick_use_items_enriched.json",
    "trap_items_enriched.json",
    "shields.json",
    "weapon_items_enriched.json",
    "modification_items_enriched.json",
];

/// The records of one catalog file, in file order.
#[derive(Clone, Debug, PartialEq)]
pub struct CatalogFile {
    path: PathBuf,
    items: Vec<ItemRecord>,
}

impl CatalogFile {
    /// Reads and parses a catalog. Returns `Ok(None)` if the file does not
    /// exist; any other read failure, or content that is not a JSON array
    /// of objects, is an error.
    pub fn read(path: impl AsRef<Path>) -> Result<Option<Self>, Error> {
        let path = path.as_ref();
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(Error::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        Self::from_slice(path, &bytes).map(Some)
    }

    pub fn from_slice(path: impl Into<PathBuf>, bytes: &[u8]) -> Result<Self, Error> {
        let path = path.into();
        match serde_json::from_slice(bytes) {
            Ok(items) => Ok(Self { path, items }),
            Err(source) => Err(Error::Json { path, source }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn items(&self) -> &[ItemRecord] {
        &self.items
    }

    /// Assets of every record that has both an id and an image.
    pub fn assets(&self) -> impl Iterator<Item = ItemAsset<'_>> {
        self.items.iter().filter_map(ItemRecord::asset)
    }
}

/// Result of visiting one path of a [`CatalogSet`].
#[derive(Debug, PartialEq)]
pub enum CatalogEntry {
    Missing(PathBuf),
    Loaded(CatalogFile),
}

/// An ordered list of catalog paths.
#[derive(Clone, Debug, PartialEq)]
pub struct CatalogSet {
    paths: Vec<PathBuf>,
}

impl CatalogSet {
    /// Catalogs named `names` inside `data_dir`. Absolute names are used as is.
    pub fn new<I, P>(data_dir: impl AsRef<Path>, names: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let data_dir = data_dir.as_ref();
        Self {
            paths: names.into_iter().map(|n| data_dir.join(n)).collect(),
        }
    }

    pub fn default_files(data_dir: impl AsRef<Path>) -> Self {
        Self::new(data_dir, DEFAULT_CATALOG_FILES)
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Visits the catalogs in order. Each file is only read when the
    /// iterator reaches it.
    pub fn iter(&self) -> impl Iterator<Item = Result<CatalogEntry, Error>> + '_ {
        self.paths.iter().map(|path| {
            Ok(match CatalogFile::read(path)? {
                Some(file) => CatalogEntry::Loaded(file),
                None => CatalogEntry::Missing(path.clone()),
            })
        })
    }
}
