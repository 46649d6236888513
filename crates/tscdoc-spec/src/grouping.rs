//! Source files, records and their grouping.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{EngineError, Result};
use crate::header::RecordBody;
use crate::tags::{aggregate, DisplayNames};

/// A discovered `.tsc` file.
///
/// The base name is `<Component>_<Group>_<Name...>`; the group key is its
/// second `_`-separated token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    path: PathBuf,
    base_name: String,
    group_key: String,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let base_name = tscdoc_common_fs::path::stem(&path).unwrap_or_default();

        let tokens: Vec<&str> = base_name.split('_').collect();
        let group_key = match tokens.as_slice() {
            [_, group, _, ..] if !group.is_empty() => Some(group.to_string()),
            _ => None,
        };
        let Some(group_key) = group_key else {
            return Err(EngineError::GroupToken { path, base_name });
        };

        Ok(Self {
            path,
            base_name,
            group_key,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name without extension.
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    pub fn group_key(&self) -> &str {
        &self.group_key
    }

    /// File name with extension, as shown in placeholder text.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.base_name.clone())
    }
}

/// One parsed source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestRecord {
    pub source: SourceFile,
    pub body: RecordBody,
}

/// All records sharing a group key.
#[derive(Debug, Clone)]
pub struct Group {
    /// Raw key as found in file names.
    pub key: String,
    pub display_name: String,
    /// Sorted by base name, then path.
    pub records: Vec<TestRecord>,
    /// First-occurrence scan over `records`.
    pub tags: Vec<String>,
}

impl Group {
    /// `<Component>_oAW_<Display>_Tests`, the section title and file stem.
    pub fn section_name(&self, component: &str) -> String {
        format!("{component}_oAW_{}_Tests", self.display_name)
    }

    pub fn file_name(&self, component: &str) -> String {
        format!("{}.rst", self.section_name(component))
    }
}

/// Partition records by group key. Groups come out sorted by key.
pub fn group_records(records: Vec<TestRecord>, names: &DisplayNames) -> Vec<Group> {
    let mut buckets: BTreeMap<String, Vec<TestRecord>> = BTreeMap::new();
    for record in records {
        buckets
            .entry(record.source.group_key().to_string())
            .or_default()
            .push(record);
    }

    buckets
        .into_iter()
        .map(|(key, mut records)| {
            records.sort_by(|a, b| {
                a.source
                    .base_name()
                    .cmp(b.source.base_name())
                    .then_with(|| a.source.path().cmp(b.source.path()))
            });
            let tags = aggregate(&records);
            Group {
                display_name: names.display(&key),
                key,
                records,
                tags,
            }
        })
        .collect()
}

/// Fail when two groups resolve to the same output file.
///
/// Keys differing only in case, or configured mappings sharing a display
/// name, would otherwise overwrite each other's document.
pub fn ensure_unique_file_names(groups: &[Group], component: &str) -> Result<()> {
    let mut by_file: BTreeMap<String, Vec<&Group>> = BTreeMap::new();
    for group in groups {
        by_file
            .entry(group.file_name(component))
            .or_default()
            .push(group);
    }

    match by_file.into_iter().find(|(_, groups)| groups.len() > 1) {
        Some((file_name, groups)) => {
            let mut sources: Vec<PathBuf> = groups
                .iter()
                .flat_map(|g| g.records.iter().map(|r| r.source.path().to_path_buf()))
                .collect();
            sources.sort();
            Err(EngineError::FileNameCollision {
                file_name,
                keys: groups.iter().map(|g| g.key.clone()).collect(),
                sources,
            })
        }
        None => Ok(()),
    }
}
