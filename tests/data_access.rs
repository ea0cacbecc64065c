mod common;

use common::{edges, feather_bytes, files_under, parquet_bytes, CountingStore};
use connectome_access::data::TableReader;
use connectome_access::{AccessConfig, Credentials, DataAccess, ErrorKind, FileKind};
use std::fs;
use tempfile::TempDir;

fn local_config(root: &TempDir, cache: &TempDir) -> AccessConfig {
    AccessConfig {
        data_root: root.path().to_str().unwrap().to_string(),
        cache_dir: cache.path().to_path_buf(),
        credentials: Credentials::Anonymous,
        ..AccessConfig::default()
    }
}

#[test]
fn local_root_loads_without_client() {
    let root = TempDir::new().unwrap();
    let cache = TempDir::new().unwrap();
    fs::create_dir_all(root.path().join("banc")).unwrap();
    fs::write(
        root.path().join("banc/banc_746_simple_edgelist.feather"),
        feather_bytes(&edges()),
    )
    .unwrap();
    fs::write(
        root.path().join("banc/banc_746_synapses.parquet"),
        parquet_bytes(&edges()),
    )
    .unwrap();

    let access = DataAccess::connect(local_config(&root, &cache)).unwrap();
    assert!(access.client().is_none());

    let df = access.load_simple_edgelist("banc_746").unwrap();
    assert!(df.equals(&edges()));

    let cols = vec!["post".to_string(), "count".to_string()];
    let syn = access.load_synapses("banc_746", Some(cols.as_slice())).unwrap();
    assert_eq!(TableReader::column_names(&syn), cols);

    assert!(files_under(cache.path()).is_empty());
}

#[test]
fn missing_local_file_is_io_failure() {
    let root = TempDir::new().unwrap();
    let cache = TempDir::new().unwrap();
    let access = DataAccess::connect(local_config(&root, &cache)).unwrap();
    let err = access.load_meta("banc_746").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IoFailure);
}

#[test]
fn skeletons_are_not_tables() {
    let root = TempDir::new().unwrap();
    let cache = TempDir::new().unwrap();
    let access = DataAccess::connect(local_config(&root, &cache)).unwrap();
    let err = access.load("banc_746", FileKind::Skeletons, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert!(access
        .skeleton_dir("banc_746", None)
        .ends_with("/banc/banc_banc_space_l2_swc"));
}

#[test]
fn remote_root_goes_through_client_and_cache() {
    let cache = TempDir::new().unwrap();
    let config = AccessConfig {
        data_root: "gs://sjcabs_2025_data".to_string(),
        cache_dir: cache.path().join("mirror"),
        credentials: Credentials::Anonymous,
        ..AccessConfig::default()
    };
    let store = CountingStore::new().with_object(
        "sjcabs_2025_data/banc/banc_746_meta.feather",
        feather_bytes(&edges()),
    );
    let access = DataAccess::new(config, Some(Box::new(store)));

    assert_eq!(
        access.path_for("banc_746", FileKind::Meta),
        "gs://sjcabs_2025_data/banc/banc_746_meta.feather"
    );
    let first = access.load_meta("banc_746").unwrap();
    let second = access.load_meta("banc_746").unwrap();
    assert!(first.equals(&second));
    assert_eq!(
        files_under(&cache.path().join("mirror")),
        vec![cache
            .path()
            .join("mirror")
            .join("sjcabs_2025_data_banc_banc_746_meta.feather")]
    );
}

#[test]
fn remote_root_without_client_fails_precondition() {
    let cache = TempDir::new().unwrap();
    let config = AccessConfig {
        cache_dir: cache.path().to_path_buf(),
        ..AccessConfig::default()
    };
    let access = DataAccess::new(config, None);
    let err = access.load_edgelist("banc_746").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PreconditionFailed);
}
