// src/core/path_grouper.rs

//! Splits a flat file list into per-group relative path lists.
//!
//! Used for partial loads: a list of changed files is split by the
//! extension (or configuration) source folder each file lives in.

use crate::models::HostOs;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Group id → relative paths (forward slashes, first-seen order).
pub type PathGroups = BTreeMap<String, Vec<String>>;

/// Errors raised while reading or writing path list files.
#[derive(Error, Debug)]
pub enum GroupError {
    /// The input list could not be read.
    #[error("Could not read path list '{path}': {source}")]
    ReadList {
        /// The list file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
    /// An output list or its directory could not be written.
    #[error("Could not write path list '{path}': {source}")]
    WriteList {
        /// The file or directory being written.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// A path split into a root prefix and its normal segments.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SlashPath {
    /// `""` for relative paths, `"/"` for POSIX roots, `"C:/"` or `"//server/"` on Windows.
    root: String,
    segments: Vec<String>,
}

impl SlashPath {
    fn parse(raw: &str, host: HostOs) -> Self {
        let raw = if host.is_windows() {
            raw.replace('\\', "/")
        } else {
            raw.to_string()
        };

        let (root, rest) = split_root(&raw, host);
        let mut segments: Vec<String> = Vec::new();
        for segment in rest.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    // Leading `..` is kept on relative paths until they are joined.
                    if root.is_empty() && segments.last().is_none_or(|s| s == "..") {
                        segments.push("..".to_string());
                    } else {
                        segments.pop();
                    }
                }
                other => segments.push(other.to_string()),
            }
        }
        Self { root, segments }
    }

    fn is_absolute(&self) -> bool {
        !self.root.is_empty()
    }

    fn join(mut self, relative: &Self) -> Self {
        for segment in &relative.segments {
            if segment == ".." {
                self.segments.pop();
            } else {
                self.segments.push(segment.clone());
            }
        }
        self
    }

    /// Returns the segments of `self` below `base`, when `base` is an
    /// ancestor of (or equal to) `self`.
    fn strip_base(&self, base: &Self, host: HostOs) -> Option<&[String]> {
        let same = |a: &str, b: &str| {
            if host.is_windows() {
                a.to_lowercase() == b.to_lowercase()
            } else {
                a == b
            }
        };
        if !same(&self.root, &base.root) || base.segments.len() > self.segments.len() {
            return None;
        }
        if self
            .segments
            .iter()
            .zip(&base.segments)
            .all(|(a, b)| same(a, b))
        {
            self.segments.get(base.segments.len()..)
        } else {
            None
        }
    }
}

fn split_root(raw: &str, host: HostOs) -> (String, &str) {
    if host.is_windows() {
        let bytes = raw.as_bytes();
        if let (Some(letter), Some(b':')) = (bytes.first(), bytes.get(1)) {
            if letter.is_ascii_alphabetic() {
                let root = format!("{}:/", char::from(*letter).to_ascii_uppercase());
                return (root, raw.get(2..).unwrap_or_default());
            }
        }
        if let Some(unc) = raw.strip_prefix("//") {
            let (server, rest) = unc.split_once('/').unwrap_or((unc, ""));
            return (format!("//{}/", server), rest);
        }
    }
    match raw.strip_prefix('/') {
        Some(rest) => ("/".to_string(), rest),
        None => (String::new(), raw),
    }
}

/// Assigns every input path to the group whose base directory contains it.
///
/// Relative inputs are resolved against `workspace_root`. Groups are tried
/// longest base first, so nested bases win over their parents. Paths outside
/// every base are dropped. Comparison ignores case on Windows.
pub fn group_paths<P: AsRef<str>>(
    paths: &[P],
    groups: &BTreeMap<String, PathBuf>,
    workspace_root: &Path,
    host: HostOs,
) -> PathGroups {
    let root = SlashPath::parse(&workspace_root.to_string_lossy(), host);
    let resolve = |raw: &str| {
        let parsed = SlashPath::parse(raw, host);
        if parsed.is_absolute() {
            parsed
        } else {
            root.clone().join(&parsed)
        }
    };

    let mut bases: Vec<(&String, SlashPath)> = groups
        .iter()
        .map(|(id, base)| (id, resolve(&base.to_string_lossy())))
        .collect();
    bases.sort_by(|(id_a, a), (id_b, b)| {
        b.segments
            .len()
            .cmp(&a.segments.len())
            .then_with(|| id_a.cmp(id_b))
    });

    let mut result = PathGroups::new();
    let mut seen: HashSet<(&String, String)> = HashSet::new();

    for raw in paths {
        let raw = raw.as_ref().trim();
        if raw.is_empty() {
            continue;
        }
        let resolved = resolve(raw);

        let matched = bases.iter().find_map(|(id, base)| {
            resolved
                .strip_base(base, host)
                .map(|relative| (*id, relative.join("/")))
        });

        match matched {
            Some((id, relative)) => {
                let list = result.entry(id.clone()).or_default();
                if !relative.is_empty() && seen.insert((id, relative.clone())) {
                    list.push(relative);
                }
            }
            None => log::debug!("'{}' is outside every group base directory", raw),
        }
    }

    result
}

/// Reads a newline-delimited path list: one path per non-empty trimmed line.
pub fn read_path_list(path: &Path) -> Result<Vec<String>, GroupError> {
    let content = fs::read_to_string(path).map_err(|source| GroupError::ReadList {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_path_list(&content))
}

/// Splits list content into trimmed, non-empty lines.
pub fn parse_path_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Writes `<dir>/<group>.txt` for every non-empty group and returns what was written.
pub fn write_group_lists(
    groups: &PathGroups,
    dir: &Path,
) -> Result<Vec<(String, PathBuf)>, GroupError> {
    fs::create_dir_all(dir).map_err(|source| GroupError::WriteList {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::new();
    for (id, relatives) in groups {
        if relatives.is_empty() {
            continue;
        }
        let target = dir.join(format!("{}.txt", id));
        let mut content = relatives.join("\n");
        content.push('\n');
        fs::write(&target, content).map_err(|source| GroupError::WriteList {
            path: target.clone(),
            source,
        })?;
        written.push((id.clone(), target));
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn groups(pairs: &[(&str, &str)]) -> BTreeMap<String, PathBuf> {
        pairs
            .iter()
            .map(|(id, base)| (id.to_string(), PathBuf::from(base)))
            .collect()
    }

    #[test]
    fn test_groups_by_containing_base_and_drops_outsiders() {
        let result = group_paths(
            &[
                "/root/cfe/ext1/Forms/F1.xml",
                "/root/cfe/ext2/Module.bsl",
                "/root/other/x.txt",
            ],
            &groups(&[("ext1", "/root/cfe/ext1"), ("ext2", "/root/cfe/ext2")]),
            Path::new("/root"),
            HostOs::Linux,
        );
        assert_eq!(result.len(), 2);
        assert_eq!(result["ext1"], vec!["Forms/F1.xml"]);
        assert_eq!(result["ext2"], vec!["Module.bsl"]);
    }

    #[test]
    fn test_relative_inputs_resolve_against_workspace_root() {
        let result = group_paths(
            &["src/cfe/Sales/Catalogs/Items.xml", "./src/cfe/Sales/../Sales/Ext.xml"],
            &groups(&[("Sales", "src/cfe/Sales")]),
            Path::new("/ws"),
            HostOs::Linux,
        );
        assert_eq!(result["Sales"], vec!["Catalogs/Items.xml", "Ext.xml"]);
    }

    #[test]
    fn test_relative_inputs_may_climb_out_of_workspace_root() {
        let result = group_paths(
            &["../shared/cfe/Ext/Module.bsl"],
            &groups(&[("Ext", "/repo/shared/cfe/Ext")]),
            Path::new("/repo/app"),
            HostOs::Linux,
        );
        assert_eq!(result["Ext"], vec!["Module.bsl"]);
    }

    #[test]
    fn test_longest_base_wins_over_parent() {
        let result = group_paths(
            &["/w/src/cf/Module.bsl", "/w/src/cf/ext/Form.xml"],
            &groups(&[("a_parent", "/w/src/cf"), ("z_nested", "/w/src/cf/ext")]),
            Path::new("/w"),
            HostOs::Linux,
        );
        assert_eq!(result["a_parent"], vec!["Module.bsl"]);
        assert_eq!(result["z_nested"], vec!["Form.xml"]);
    }

    #[test]
    fn test_duplicates_are_removed_preserving_first_seen_order() {
        let result = group_paths(
            &["/b/z.xml", "/b/a.xml", "/b/z.xml", "/b/./a.xml"],
            &groups(&[("g", "/b")]),
            Path::new("/"),
            HostOs::Linux,
        );
        assert_eq!(result["g"], vec!["z.xml", "a.xml"]);
    }

    #[test]
    fn test_prefix_of_a_segment_is_not_containment() {
        let result = group_paths(
            &["/root/ext10/File.xml"],
            &groups(&[("ext1", "/root/ext1")]),
            Path::new("/root"),
            HostOs::Linux,
        );
        assert!(result.is_empty());
    }

    #[test]
    fn test_windows_comparison_ignores_case_and_separators() {
        let result = group_paths(
            &["c:\\Work\\CFE\\Ext1\\Forms\\F1.xml", "Src\\cfe\\EXT1\\Module.bsl"],
            &groups(&[("ext1", "C:/work/cfe/ext1")]),
            Path::new("C:\\work"),
            HostOs::Windows,
        );
        assert_eq!(result["ext1"], vec!["Forms/F1.xml"]);

        let relative = group_paths(
            &["cfe\\EXT1\\Module.bsl"],
            &groups(&[("ext1", "C:/work/cfe/ext1")]),
            Path::new("C:\\Work"),
            HostOs::Windows,
        );
        assert_eq!(relative["ext1"], vec!["Module.bsl"]);
    }

    #[test]
    fn test_posix_comparison_is_case_sensitive() {
        let result = group_paths(
            &["/Root/ext1/a.xml"],
            &groups(&[("ext1", "/root/ext1")]),
            Path::new("/"),
            HostOs::Linux,
        );
        assert!(result.is_empty());
    }

    #[test]
    fn test_parse_path_list_skips_blank_lines_and_crlf() {
        let parsed = parse_path_list("a/b.xml\r\n\r\n   \n  c.bsl  \n");
        assert_eq!(parsed, vec!["a/b.xml", "c.bsl"]);
    }

    #[test]
    fn test_list_files_round_trip() {
        let tmp = TempDir::new().unwrap();
        let list = tmp.path().join("changed.txt");
        fs::write(&list, "/r/e1/A.xml\n/r/e2/B.xml\n/r/e1/C.xml\n").unwrap();

        let paths = read_path_list(&list).unwrap();
        let grouped = group_paths(
            &paths,
            &groups(&[("e1", "/r/e1"), ("e2", "/r/e2")]),
            Path::new("/r"),
            HostOs::Linux,
        );
        let written = write_group_lists(&grouped, &tmp.path().join("out")).unwrap();
        assert_eq!(written.len(), 2);

        let e1 = fs::read_to_string(tmp.path().join("out").join("e1.txt")).unwrap();
        assert_eq!(e1, "A.xml\nC.xml\n");
    }

    #[test]
    fn test_missing_list_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let err = read_path_list(&tmp.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, GroupError::ReadList { .. }));
    }
}
