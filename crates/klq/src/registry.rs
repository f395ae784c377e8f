//! Table registry: the immutable set of named row collections a query runs against.

use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;

use crate::error::LoadError;
use crate::value::Row;

/// A named, ordered sequence of rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    pub name: String,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(name: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Every field name appearing in any row, in first-seen order.
    pub fn fields(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut fields = Vec::new();
        for row in &self.rows {
            for key in row.keys() {
                if seen.insert(key) {
                    fields.push(key.to_string());
                }
            }
        }
        fields
    }
}

/// Row count and field names of one table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableStats {
    pub name: String,
    pub rows: usize,
    pub fields: Vec<String>,
}

/// Tables in insertion order, looked up by exact name.
#[derive(Debug, Clone, Default)]
pub struct TableRegistry {
    tables: Vec<Table>,
    index: HashMap<String, usize>,
}

impl TableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert) that replaces an existing
    /// table of the same name in place.
    pub fn with_table(mut self, name: impl Into<String>, rows: Vec<Row>) -> Self {
        let table = Table::new(name, rows);
        match self.index.get(&table.name) {
            Some(&i) => self.tables[i] = table,
            None => {
                self.index.insert(table.name.clone(), self.tables.len());
                self.tables.push(table);
            }
        }
        self
    }

    /// Add a table, rejecting duplicate names.
    pub fn insert(&mut self, table: Table) -> Result<(), LoadError> {
        if self.index.contains_key(&table.name) {
            return Err(LoadError::DuplicateTable(table.name));
        }
        self.index.insert(table.name.clone(), self.tables.len());
        self.tables.push(table);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Table> {
        self.index.get(name).map(|&i| &self.tables[i])
    }

    pub fn rows(&self, name: &str) -> Option<&[Row]> {
        self.get(name).map(|t| t.rows.as_slice())
    }

    /// Table names in registry order.
    pub fn names(&self) -> Vec<String> {
        self.tables.iter().map(|t| t.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Table> {
        self.tables.iter()
    }

    pub fn stats(&self) -> Vec<TableStats> {
        self.tables
            .iter()
            .map(|t| TableStats {
                name: t.name.clone(),
                rows: t.rows.len(),
                fields: t.fields(),
            })
            .collect()
    }

    /// Sum of row counts across all tables.
    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(|t| t.rows.len()).sum()
    }

    /// Field names of a table, if it exists.
    pub fn fields(&self, name: &str) -> Option<Vec<String>> {
        self.get(name).map(Table::fields)
    }

    /// Build from a JSON object mapping table names to arrays of row objects.
    ///
    /// `origin` names the source in error messages.
    pub fn from_json_value(value: serde_json::Value, origin: &str) -> Result<Self, LoadError> {
        let serde_json::Value::Object(map) = value else {
            return Err(LoadError::NotATableSet(origin.to_string()));
        };
        let mut registry = Self::new();
        for (name, rows) in map {
            let rows = rows_from_json(&name, rows)?;
            registry.insert(Table::new(name, rows))?;
        }
        Ok(registry)
    }

    pub fn from_json_str(text: &str, origin: &str) -> Result<Self, LoadError> {
        let value = serde_json::from_str(text).map_err(|source| LoadError::Json {
            path: origin.to_string(),
            source,
        })?;
        Self::from_json_value(value, origin)
    }

    /// Load from disk.
    ///
    /// A directory contributes one table per `*.json` file (file stem is the
    /// table name, files in name order), each holding an array of objects.
    /// A single file must hold an object of `name -> [rows]`.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let registry = if path.is_dir() {
            Self::load_dir(path)?
        } else {
            let text = std::fs::read_to_string(path)?;
            Self::from_json_str(&text, &path.display().to_string())?
        };
        tracing::info!(
            "Loaded {} tables ({} rows) from {}",
            registry.len(),
            registry.total_rows(),
            path.display()
        );
        Ok(registry)
    }

    fn load_dir(dir: &Path) -> Result<Self, LoadError> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        files.sort();

        let mut registry = Self::new();
        for file in files {
            let Some(name) = file.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
                continue;
            };
            let text = std::fs::read_to_string(&file)?;
            let value = serde_json::from_str(&text).map_err(|source| LoadError::Json {
                path: file.display().to_string(),
                source,
            })?;
            let rows = rows_from_json(&name, value)?;
            tracing::debug!("Table '{}': {} rows from {}", name, rows.len(), file.display());
            registry.insert(Table::new(name, rows))?;
        }
        Ok(registry)
    }
}

fn rows_from_json(table: &str, value: serde_json::Value) -> Result<Vec<Row>, LoadError> {
    let serde_json::Value::Array(items) = value else {
        return Err(LoadError::NotATable(table.to_string()));
    };
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            serde_json::Value::Object(map) => Ok(Row::from(map)),
            _ => Err(LoadError::NotARow {
                table: table.to_string(),
                index,
            }),
        })
        .collect()
}
