//! Dataset Path Module
//! Maps a dataset name and file kind to its location under a data root.
//!
//! Layout: `{root}/{family}/{filename}`, where the family is the part of the
//! dataset name before the first underscore (`banc_746` -> `banc`).

use crate::error::{AccessError, Result};
use std::fmt;
use std::str::FromStr;

/// Dataset families whose skeletons are published as level-2 (`_l2`) SWC sets.
const L2_SKELETON_FAMILIES: [&str; 1] = ["banc"];

/// The five artifact kinds published for each dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Meta,
    Edgelist,
    EdgelistSimple,
    Synapses,
    Skeletons,
}

impl FileKind {
    pub const ALL: [FileKind; 5] = [
        FileKind::Meta,
        FileKind::Edgelist,
        FileKind::EdgelistSimple,
        FileKind::Synapses,
        FileKind::Skeletons,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Meta => "meta",
            FileKind::Edgelist => "edgelist",
            FileKind::EdgelistSimple => "edgelist_simple",
            FileKind::Synapses => "synapses",
            FileKind::Skeletons => "skeletons",
        }
    }

    /// File extension including the dot; skeletons are a directory and have none.
    pub fn extension(&self) -> &'static str {
        match self {
            FileKind::Meta | FileKind::Edgelist | FileKind::EdgelistSimple => ".feather",
            FileKind::Synapses => ".parquet",
            FileKind::Skeletons => "",
        }
    }

    fn valid_names() -> String {
        FileKind::ALL
            .iter()
            .map(|kind| kind.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileKind {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self> {
        FileKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                AccessError::InvalidArgument(format!(
                    "Unknown file_type: {s}. Choose: {}",
                    FileKind::valid_names()
                ))
            })
    }
}

/// A dataset artifact under a data root. Built per call and used to derive one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetRef {
    pub root: String,
    pub name: String,
    pub kind: FileKind,
}

impl DatasetRef {
    pub fn new(root: impl Into<String>, name: impl Into<String>, kind: FileKind) -> Self {
        Self {
            root: root.into(),
            name: name.into(),
            kind,
        }
    }

    /// Leading token of the dataset name, e.g. `banc` for `banc_746`.
    pub fn family(&self) -> &str {
        dataset_family(&self.name)
    }

    /// File (or, for skeletons, directory) name without the root and family.
    pub fn filename(&self, space_suffix: Option<&str>) -> String {
        let family = self.family();
        let ext = self.kind.extension();
        match self.kind {
            FileKind::Skeletons => {
                let space = space_suffix
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("{family}_space"));
                if L2_SKELETON_FAMILIES.contains(&family) {
                    format!("{family}_{space}_l2_swc{ext}")
                } else {
                    format!("{family}_{space}_swc{ext}")
                }
            }
            // Published as `simple_edgelist`, not `edgelist_simple`
            FileKind::EdgelistSimple => format!("{}_simple_edgelist{ext}", self.name),
            _ => format!("{}_{}{ext}", self.name, self.kind.as_str()),
        }
    }

    /// Full path string of this artifact. Pure string computation, no I/O.
    pub fn path(&self, space_suffix: Option<&str>) -> String {
        format!(
            "{}/{}/{}",
            self.root,
            self.family(),
            self.filename(space_suffix)
        )
    }
}

pub fn dataset_family(dataset: &str) -> &str {
    dataset.split('_').next().unwrap_or(dataset)
}

/// Resolve `(root, dataset, kind)` to a path, with the kind given by name
/// (`meta`, `edgelist`, `edgelist_simple`, `synapses`, `skeletons`).
pub fn resolve(
    root: &str,
    dataset: &str,
    file_kind: &str,
    space_suffix: Option<&str>,
) -> Result<String> {
    let kind: FileKind = file_kind.parse()?;
    Ok(DatasetRef::new(root, dataset, kind).path(space_suffix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const ROOT: &str = "gs://sjcabs_2025_data";

    #[test]
    fn meta_path_uses_family_directory() {
        let path = resolve(ROOT, "banc_746", "meta", None).unwrap();
        assert_eq!(path, "gs://sjcabs_2025_data/banc/banc_746_meta.feather");
    }

    #[test]
    fn synapses_are_parquet() {
        let path = resolve("/data", "fafb_783", "synapses", None).unwrap();
        assert_eq!(path, "/data/fafb/fafb_783_synapses.parquet");
    }

    #[test]
    fn simple_edgelist_word_order() {
        let path = resolve(ROOT, "banc_746", "edgelist_simple", None).unwrap();
        assert!(path.ends_with("/banc/banc_746_simple_edgelist.feather"));
        assert!(!path.contains("edgelist_simple"));
    }

    #[test]
    fn banc_skeletons_are_level_two() {
        let banc = resolve(ROOT, "banc_746", "skeletons", None).unwrap();
        assert_eq!(banc, "gs://sjcabs_2025_data/banc/banc_banc_space_l2_swc");
        assert!(banc.contains("_l2_swc"));

        let other = resolve(ROOT, "otherfam_1", "skeletons", None).unwrap();
        assert_eq!(other, "gs://sjcabs_2025_data/otherfam/otherfam_otherfam_space_swc");
        assert!(!other.contains("_l2_swc"));
    }

    #[test]
    fn explicit_space_suffix() {
        let path = resolve(ROOT, "fafb_783", "skeletons", Some("jrc2018f")).unwrap();
        assert_eq!(path, "gs://sjcabs_2025_data/fafb/fafb_jrc2018f_swc");
    }

    #[test]
    fn unknown_kind_lists_valid_kinds() {
        let err = resolve(ROOT, "banc_746", "neurons", None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        let msg = err.to_string();
        for kind in FileKind::ALL {
            assert!(msg.contains(kind.as_str()), "{msg} should mention {kind}");
        }
    }

    #[test]
    fn resolve_is_deterministic() {
        for kind in FileKind::ALL {
            let a = resolve(ROOT, "manc_121", kind.as_str(), None).unwrap();
            let b = resolve(ROOT, "manc_121", kind.as_str(), None).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn family_without_underscore_is_whole_name() {
        assert_eq!(dataset_family("hemibrain"), "hemibrain");
        assert_eq!(dataset_family("banc_746"), "banc");
    }
}
