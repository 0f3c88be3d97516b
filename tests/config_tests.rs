// Integration tests for configuration loading

use std::path::Path;

use chorekit::commands;
use chorekit::config::Config;
use chorekit::geocode::Geocoder;
use chorekit::targets::TargetGroup;

#[test]
fn config_file_drives_targets_and_geocoder() {
    let dir = tempfile::tempdir().unwrap();
    let cache = dir.path().join("cache");
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        format!(
            "[targets]\nsystem = [\"/a\", \"/b\"]\nuser = [\"/c\"]\n\n[geocode]\ncache_dir = {:?}\n",
            cache.display().to_string()
        ),
    )
    .unwrap();

    let config = Config::load(Some(path.as_path())).unwrap();
    let targets = config.target_set_with(None, None).unwrap();
    assert_eq!(
        targets.resolve(TargetGroup::All),
        vec![Path::new("/a"), Path::new("/b"), Path::new("/c")]
    );

    let geocoder = Geocoder::new(&config.geocode).unwrap();
    assert_eq!(geocoder.cache_path("US"), cache.join("US.txt"));
}

#[test]
fn missing_explicit_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(Config::load(Some(dir.path().join("nope.toml").as_path())).is_err());
}

#[test]
fn locate_returns_coordinates_from_cached_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        format!(
            "[geocode]\ndataset_url = \"http://127.0.0.1:9\"\ncache_dir = {:?}\n",
            dir.path().display().to_string()
        ),
    )
    .unwrap();
    std::fs::write(
        dir.path().join("US.txt"),
        "US\t90210\tBeverly Hills\tCalifornia\tCA\tLos Angeles\t037\t\t\t34.0901\t-118.4065\t1\n",
    )
    .unwrap();

    let config = Config::load(Some(path.as_path())).unwrap();
    assert_eq!(
        commands::locate(&config, "90210", "us").unwrap(),
        Some((34.0901, -118.4065))
    );
    assert_eq!(commands::locate(&config, "00000", "us").unwrap(), None);
}
