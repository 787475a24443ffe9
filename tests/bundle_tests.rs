use apim_cli::bundle::{discover_bundles, zip_directory};
use std::fs;
use std::io::Cursor;
use tempfile::TempDir;

#[test]
fn zipped_directory_preserves_relative_paths() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("proxyA");
    fs::create_dir_all(root.join("policies")).unwrap();
    fs::create_dir_all(root.join("proxies")).unwrap();
    fs::write(root.join("proxyA.xml"), "<APIProxy/>").unwrap();
    fs::write(root.join("policies").join("quota.xml"), "<Quota/>").unwrap();
    fs::write(root.join("proxies").join("default.xml"), "<ProxyEndpoint/>").unwrap();

    let data = zip_directory(&root).unwrap();
    let mut archive = zip::ZipArchive::new(Cursor::new(data)).unwrap();

    let names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    assert_eq!(
        names,
        vec!["policies/quota.xml", "proxies/default.xml", "proxyA.xml"]
    );
}

#[test]
fn discover_finds_directories_and_prebuilt_zips_in_name_order() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("zeta")).unwrap();
    fs::write(dir.path().join("zeta").join("z.xml"), "<z/>").unwrap();
    fs::write(dir.path().join("alpha.zip"), b"PK\x05\x06").unwrap();
    // Non-bundle files are ignored.
    fs::write(dir.path().join("README.md"), "notes").unwrap();

    let bundles = discover_bundles(dir.path()).unwrap();
    let names: Vec<&str> = bundles.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "zeta"]);
}

#[test]
fn missing_bundle_folder_is_an_error() {
    let dir = TempDir::new().unwrap();
    assert!(discover_bundles(&dir.path().join("apiproxies")).is_err());
}
