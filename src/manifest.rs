//! Registers generated icons in an extension manifest
//!
//! The merge is driven by [`ICON_RULES`]: each rule names a key path and
//! how an existing value there is treated. Top-level `icons` is always
//! replaced; `action.default_icon` is only filled in when absent, so a
//! hand-picked toolbar icon survives repeated runs.
//!
//! Parent objects (`action`) are never created. A manifest without them is
//! rejected before anything is changed or written.

use crate::config::IconConfig;
use crate::error::ManifestError;
use log::debug;
use serde_json::{Map, Value};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// How a rule treats a value already present at its key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// Overwrite unconditionally
    Replace,
    /// Leave an existing value untouched
    SetIfAbsent,
}

/// One entry of the merge policy table
#[derive(Debug, Clone, Copy)]
pub struct MergeRule {
    /// Key path from the document root; every segment but the last must
    /// already be an object
    pub path: &'static [&'static str],
    pub policy: MergePolicy,
}

pub const ICON_RULES: [MergeRule; 2] = [
    MergeRule {
        path: &["icons"],
        policy: MergePolicy::Replace,
    },
    MergeRule {
        path: &["action", "default_icon"],
        policy: MergePolicy::SetIfAbsent,
    },
];

/// What a rule did to its key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Inserted,
    Replaced,
    Kept,
}

/// Per-key result of a merge, in rule order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestChange {
    pub keys: Vec<(String, KeyOutcome)>,
}

impl ManifestChange {
    pub fn outcome(&self, dotted_key: &str) -> Option<KeyOutcome> {
        self.keys
            .iter()
            .find(|(key, _)| key == dotted_key)
            .map(|(_, outcome)| *outcome)
    }

    pub fn icons_written(&self) -> bool {
        matches!(
            self.outcome("icons"),
            Some(KeyOutcome::Inserted | KeyOutcome::Replaced)
        )
    }

    pub fn default_icon_added(&self) -> bool {
        self.outcome("action.default_icon") == Some(KeyOutcome::Inserted)
    }
}

/// Applies [`ICON_RULES`] with `entries` as the value for every rule
pub fn merge_icon_entries(
    doc: &mut Value,
    entries: &Map<String, Value>,
) -> Result<ManifestChange, ManifestError> {
    merge_with_rules(doc, &ICON_RULES, &Value::Object(entries.clone()))
}

/// Applies `rules` to `doc`. Either every rule is applied or, on error,
/// `doc` is left unchanged.
pub fn merge_with_rules(
    doc: &mut Value,
    rules: &[MergeRule],
    value: &Value,
) -> Result<ManifestChange, ManifestError> {
    // Check every parent first so a failing rule can't leave a half-merged document
    for rule in rules {
        parent_object(doc, rule.path)?;
    }

    let mut change = ManifestChange::default();
    for rule in rules {
        let Some((leaf, _)) = rule.path.split_last() else {
            continue;
        };
        let parent = parent_object(doc, rule.path)?;
        let dotted = rule.path.join(".");

        let outcome = match (rule.policy, parent.contains_key(*leaf)) {
            (MergePolicy::SetIfAbsent, true) => KeyOutcome::Kept,
            (MergePolicy::Replace, true) => {
                parent.insert(leaf.to_string(), value.clone());
                KeyOutcome::Replaced
            }
            (_, false) => {
                parent.insert(leaf.to_string(), value.clone());
                KeyOutcome::Inserted
            }
        };

        debug!("{dotted}: {outcome:?}");
        change.keys.push((dotted, outcome));
    }

    Ok(change)
}

/// Walks to the object that holds the last segment of `path`
fn parent_object<'a>(
    doc: &'a mut Value,
    path: &[&str],
) -> Result<&'a mut Map<String, Value>, ManifestError> {
    let mut current = doc.as_object_mut().ok_or(ManifestError::NotAnObject)?;

    let parents = path.split_last().map(|(_, parents)| parents).unwrap_or(&[]);
    for (depth, segment) in parents.iter().enumerate() {
        let section = || path[..=depth].join(".");
        current = current
            .get_mut(*segment)
            .ok_or_else(|| ManifestError::MissingSection(section()))?
            .as_object_mut()
            .ok_or_else(|| ManifestError::SectionNotObject(section()))?;
    }

    Ok(current)
}

pub fn load_manifest(path: &Path) -> Result<Value, ManifestError> {
    let text = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ManifestError::NotFound(path.to_path_buf())
        } else {
            ManifestError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    serde_json::from_str(&text).map_err(|source| ManifestError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes `doc` pretty-printed with two-space indentation.
///
/// The document goes to a temporary file next to `path` which then
/// replaces `path`, so readers never observe a truncated manifest.
pub fn save_manifest(path: &Path, doc: &Value) -> Result<(), ManifestError> {
    let mut json = serde_json::to_string_pretty(doc).map_err(ManifestError::Serialize)?;
    json.push('\n');

    let write_err = |source: io::Error| ManifestError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    if let Ok(meta) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .map_err(write_err)?;
    }
    tmp.write_all(json.as_bytes()).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;

    debug!("Replacing {} via {}", path.display(), tmp.path().display());
    tmp.persist(path).map_err(|err| write_err(err.error))?;

    Ok(())
}

/// Loads the manifest at `path`, registers the configured icons and saves it back
pub fn update_manifest(path: &Path, config: &IconConfig) -> Result<ManifestChange, ManifestError> {
    let mut doc = load_manifest(path)?;
    let change = merge_icon_entries(&mut doc, &config.icon_entries())?;
    save_manifest(path, &doc)?;
    Ok(change)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entries() -> Map<String, Value> {
        IconConfig::default().icon_entries()
    }

    #[test]
    fn policy_table_matches_merge_contract() {
        assert_eq!(ICON_RULES[0].path, ["icons"]);
        assert_eq!(ICON_RULES[0].policy, MergePolicy::Replace);
        assert_eq!(ICON_RULES[1].path, ["action", "default_icon"]);
        assert_eq!(ICON_RULES[1].policy, MergePolicy::SetIfAbsent);
    }

    #[test]
    fn empty_action_gets_both_keys() {
        let mut doc = json!({ "action": {} });
        let change = merge_icon_entries(&mut doc, &entries()).unwrap();

        assert_eq!(change.outcome("icons"), Some(KeyOutcome::Inserted));
        assert!(change.default_icon_added());
        assert_eq!(doc["icons"], doc["action"]["default_icon"]);
        assert_eq!(doc["icons"]["48"], "icons/icon48.png");
    }

    #[test]
    fn existing_icons_are_replaced() {
        let mut doc = json!({ "action": {}, "icons": { "16": "old.png", "64": "x.png" } });
        let change = merge_icon_entries(&mut doc, &entries()).unwrap();

        assert_eq!(change.outcome("icons"), Some(KeyOutcome::Replaced));
        assert_eq!(doc["icons"], Value::Object(entries()));
    }

    #[test]
    fn existing_default_icon_is_kept() {
        let mut doc = json!({ "action": { "default_icon": "custom.png" } });
        let change = merge_icon_entries(&mut doc, &entries()).unwrap();

        assert_eq!(change.outcome("action.default_icon"), Some(KeyOutcome::Kept));
        assert_eq!(doc["action"]["default_icon"], "custom.png");
    }

    #[test]
    fn missing_action_leaves_document_untouched() {
        let mut doc = json!({ "name": "ext" });
        let before = doc.clone();
        let err = merge_icon_entries(&mut doc, &entries()).unwrap_err();

        assert!(matches!(err, ManifestError::MissingSection(ref key) if key == "action"));
        assert_eq!(doc, before);
    }

    #[test]
    fn non_object_action_is_rejected() {
        let mut doc = json!({ "action": [] });
        let err = merge_icon_entries(&mut doc, &entries()).unwrap_err();
        assert!(matches!(err, ManifestError::SectionNotObject(_)));
    }

    #[test]
    fn non_object_root_is_rejected() {
        let mut doc = json!([1, 2, 3]);
        let err = merge_icon_entries(&mut doc, &entries()).unwrap_err();
        assert!(matches!(err, ManifestError::NotAnObject));
    }

    #[test]
    fn untouched_keys_keep_their_order() {
        let mut doc: Value =
            serde_json::from_str(r#"{"name":"x","version":"1","action":{"title":"t"},"zeta":1}"#)
                .unwrap();
        merge_icon_entries(&mut doc, &entries()).unwrap();

        let keys: Vec<&str> = doc.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["name", "version", "action", "zeta", "icons"]);
    }
}
