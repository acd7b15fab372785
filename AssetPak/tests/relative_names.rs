//! Names derived from relative inputs depend on the working directory, so
//! this lives in its own test binary with a single test.

use assetpak::prelude::*;
use pretty_assertions::assert_eq;

fn names(config: &Config) -> Vec<String> {
    discover(&config.validate().unwrap())
        .unwrap()
        .into_iter()
        .map(|a| a.name)
        .collect()
}

#[test]
fn test_relative_root_names() {
    let temp = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(temp.path().join("data/sub")).unwrap();
    std::fs::write(temp.path().join("data/a.txt"), b"a").unwrap();
    std::fs::write(temp.path().join("data/sub/b.txt"), b"b").unwrap();
    std::env::set_current_dir(temp.path()).unwrap();

    let plain = Config::default().with_input(InputConfig::new("data", true));
    assert_eq!(names(&plain), vec!["data/a.txt", "data/sub/b.txt"]);

    let dotted = Config::default().with_input(InputConfig::parse("./data/..."));
    assert_eq!(names(&dotted), vec!["data/a.txt", "data/sub/b.txt"]);

    let prefixed = Config {
        prefix: Some(std::path::absolute("data").unwrap()),
        ..Config::default()
    }
    .with_input(InputConfig::new("data", true));
    assert_eq!(names(&prefixed), vec!["a.txt", "sub/b.txt"]);

    let assets = discover(&plain.validate().unwrap()).unwrap();
    assert!(assets.iter().all(|a| a.path.is_absolute()));
}
