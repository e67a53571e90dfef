//! Per-site document store.
//!
//! Each site keeps its records in a redb database inside the site directory.
//! Inserts are buffered in the open connection and written in a single
//! transaction by `commit`; a connection dropped without committing leaves
//! the database untouched.
//!
//! # Table design
//!
//! One `DOCUMENTS` table keyed by `"<doctype>\x1f<name>"`, value is the JSON
//! encoded `Document`. The separator sorts below every printable character,
//! so all documents of one doctype form a contiguous key range.

use crate::error::{BenchError, Result};
use redb::{Database, TableDefinition};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

const DOCUMENTS: TableDefinition<&str, &[u8]> = TableDefinition::new("documents");

const KEY_SEP: char = '\u{1f}';

fn doc_key(doctype: &str, name: &str) -> String {
    format!("{doctype}{KEY_SEP}{name}")
}

fn store_err(e: impl std::fmt::Display) -> BenchError {
    BenchError::Store(e.to_string())
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// A record of some doctype, unique by `(doctype, name)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub doctype: String,
    pub name: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Document {
    pub fn new(doctype: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            doctype: doctype.into(),
            name: name.into(),
            fields: Map::new(),
        }
    }

    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(field.to_string(), value.into());
        self
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        if field == "name" {
            return Some(&self.name);
        }
        self.fields.get(field).and_then(Value::as_str)
    }
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// An open connection to one site's records.
pub trait DocumentStore {
    /// True if a document of `doctype` has `field` equal to `value`.
    /// `name` is matched against the document name.
    fn exists(&self, doctype: &str, field: &str, value: &str) -> Result<bool>;

    fn get(&self, doctype: &str, name: &str) -> Result<Option<Document>>;

    /// Stage a new document. Fails with `DuplicateEntry` if `(doctype, name)`
    /// is already taken, committed or staged.
    fn insert(&mut self, doc: Document) -> Result<()>;

    /// Persist everything staged since the last commit.
    fn commit(&mut self) -> Result<()>;
}

/// Opens a `DocumentStore` for a named site.
pub trait Connector {
    type Store: DocumentStore;

    fn connect(&self, site: &str) -> Result<Self::Store>;
}

// ---------------------------------------------------------------------------
// SiteSession
// ---------------------------------------------------------------------------

/// Scoped connection to a site. The store is released when the session is
/// dropped; anything not committed by then is discarded.
pub struct SiteSession<S: DocumentStore> {
    site: String,
    store: S,
}

impl<S: DocumentStore> SiteSession<S> {
    pub fn open<C>(connector: &C, site: &str) -> Result<Self>
    where
        C: Connector<Store = S>,
    {
        let store = connector.connect(site)?;
        tracing::debug!(site, "site connection opened");
        Ok(Self {
            site: site.to_string(),
            store,
        })
    }
}

impl<S: DocumentStore> Deref for SiteSession<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.store
    }
}

impl<S: DocumentStore> DerefMut for SiteSession<S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.store
    }
}

impl<S: DocumentStore> Drop for SiteSession<S> {
    fn drop(&mut self) {
        tracing::debug!(site = %self.site, "site connection released");
    }
}

// ---------------------------------------------------------------------------
// RedbStore
// ---------------------------------------------------------------------------

pub struct RedbStore {
    db: Database,
    pending: Vec<Document>,
}

impl RedbStore {
    /// Open or create the redb database at `path`.
    ///
    /// Creates the `DOCUMENTS` table if it doesn't already exist.
    pub fn open(path: &Path) -> Result<Self> {
        let db = Database::create(path).map_err(store_err)?;
        let wt = db.begin_write().map_err(store_err)?;
        wt.open_table(DOCUMENTS).map_err(store_err)?;
        wt.commit().map_err(store_err)?;
        Ok(Self {
            db,
            pending: Vec::new(),
        })
    }

    /// Committed and staged documents of one doctype.
    pub fn list(&self, doctype: &str) -> Result<Vec<Document>> {
        let prefix = format!("{doctype}{KEY_SEP}");
        let rt = self.db.begin_read().map_err(store_err)?;
        let table = rt.open_table(DOCUMENTS).map_err(store_err)?;

        let mut docs = Vec::new();
        for entry in table.range(prefix.as_str()..).map_err(store_err)? {
            let (k, v) = entry.map_err(store_err)?;
            if !k.value().starts_with(&prefix) {
                break;
            }
            docs.push(serde_json::from_slice::<Document>(v.value())?);
        }
        docs.extend(self.pending.iter().filter(|d| d.doctype == doctype).cloned());
        Ok(docs)
    }
}

impl DocumentStore for RedbStore {
    fn exists(&self, doctype: &str, field: &str, value: &str) -> Result<bool> {
        Ok(self
            .list(doctype)?
            .iter()
            .any(|d| d.get_str(field) == Some(value)))
    }

    fn get(&self, doctype: &str, name: &str) -> Result<Option<Document>> {
        if let Some(doc) = self
            .pending
            .iter()
            .find(|d| d.doctype == doctype && d.name == name)
        {
            return Ok(Some(doc.clone()));
        }
        let rt = self.db.begin_read().map_err(store_err)?;
        let table = rt.open_table(DOCUMENTS).map_err(store_err)?;
        let key = doc_key(doctype, name);
        match table.get(key.as_str()).map_err(store_err)? {
            Some(v) => Ok(Some(serde_json::from_slice(v.value())?)),
            None => Ok(None),
        }
    }

    fn insert(&mut self, doc: Document) -> Result<()> {
        if self.get(&doc.doctype, &doc.name)?.is_some() {
            return Err(BenchError::DuplicateEntry {
                doctype: doc.doctype,
                name: doc.name,
            });
        }
        self.pending.push(doc);
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let wt = self.db.begin_write().map_err(store_err)?;
        {
            let mut table = wt.open_table(DOCUMENTS).map_err(store_err)?;
            for doc in &self.pending {
                let key = doc_key(&doc.doctype, &doc.name);
                let value = serde_json::to_vec(doc)?;
                table
                    .insert(key.as_str(), value.as_slice())
                    .map_err(store_err)?;
            }
        }
        wt.commit().map_err(store_err)?;
        tracing::debug!(documents = self.pending.len(), "committed");
        self.pending.clear();
        Ok(())
    }
}

/// Connects to `sites/<site>/<db_file>` for each site of a bench.
#[derive(Debug, Clone)]
pub struct RedbConnector {
    sites_dir: PathBuf,
    db_file: String,
}

impl RedbConnector {
    pub fn new(sites_dir: impl Into<PathBuf>, db_file: impl Into<String>) -> Self {
        Self {
            sites_dir: sites_dir.into(),
            db_file: db_file.into(),
        }
    }

    pub fn db_path(&self, site: &str) -> PathBuf {
        self.sites_dir.join(site).join(&self.db_file)
    }
}

impl Connector for RedbConnector {
    type Store = RedbStore;

    fn connect(&self, site: &str) -> Result<RedbStore> {
        RedbStore::open(&self.db_path(site))
    }
}
