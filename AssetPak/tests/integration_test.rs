use assetpak::encode::unescape;
use assetpak::hash::{encode_hash, hash_bytes};
use assetpak::prelude::*;
use pretty_assertions::assert_eq;
use std::io::Read;
use std::path::Path;
use tempfile::tempdir;

fn write(root: &Path, rel: &str, data: &[u8]) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, data).unwrap();
}

/// Config scanning `root` recursively with names relative to it.
fn rooted(root: &Path) -> Config {
    Config {
        prefix: Some(root.to_path_buf()),
        ..Config::default()
    }
    .with_input(InputConfig::new(root, true))
}

fn names(config: &Config) -> Vec<String> {
    let plan = config.validate().unwrap();
    discover(&plan).unwrap().into_iter().map(|a| a.name).collect()
}

/// Decode every `data` payload of a rendered table, in table order.
fn payloads(source: &str) -> Vec<Vec<u8>> {
    source
        .split("data: b\"")
        .skip(1)
        .map(|rest| {
            let end = rest.find('"').unwrap();
            unescape(&rest[..end]).unwrap()
        })
        .collect()
}

#[test]
fn test_discovery_order_and_names() {
    let temp = tempdir().unwrap();
    write(temp.path(), "b.txt", b"b");
    write(temp.path(), "a.txt", b"a");
    write(temp.path(), "sub/c.txt", b"c");
    write(temp.path(), "sub/deeper/d.txt", b"d");

    assert_eq!(
        names(&rooted(temp.path())),
        vec!["a.txt", "b.txt", "sub/c.txt", "sub/deeper/d.txt"]
    );
}

#[test]
fn test_non_recursive_skips_subdirectories() {
    let temp = tempdir().unwrap();
    write(temp.path(), "a.txt", b"a");
    write(temp.path(), "sub/c.txt", b"c");

    let config = Config {
        prefix: Some(temp.path().to_path_buf()),
        ..Config::default()
    }
    .with_input(InputConfig::new(temp.path(), false));

    assert_eq!(names(&config), vec!["a.txt"]);
}

#[test]
fn test_ignore_patterns_prune_files_and_directories() {
    let temp = tempdir().unwrap();
    write(temp.path(), "keep.txt", b"k");
    write(temp.path(), "notes.tmp", b"t");
    write(temp.path(), "skip/inner.txt", b"i");

    let config = Config {
        ignore: vec!["\\.tmp$".to_string(), "/skip$".to_string()],
        ..rooted(temp.path())
    };

    assert_eq!(names(&config), vec!["keep.txt"]);
}

#[test]
fn test_per_input_prefix_overrides_global() {
    let temp = tempdir().unwrap();
    write(temp.path(), "web/index.html", b"<html>");
    write(temp.path(), "docs/guide.md", b"# guide");

    let config = Config {
        prefix: Some(temp.path().to_path_buf()),
        ..Config::default()
    }
    .with_input(InputConfig::new(temp.path().join("web"), true).with_prefix(temp.path().join("web")))
    .with_input(InputConfig::new(temp.path().join("docs"), true));

    assert_eq!(names(&config), vec!["index.html", "docs/guide.md"]);
}

#[test]
fn test_file_equal_to_prefix_is_invalid() {
    let temp = tempdir().unwrap();
    write(temp.path(), "only.txt", b"x");
    let file = temp.path().join("only.txt");

    let config = Config {
        prefix: Some(file.clone()),
        ..Config::default()
    }
    .with_input(InputConfig::new(&file, false));

    let err = discover(&config.validate().unwrap()).unwrap_err();
    assert!(matches!(err, Error::InvalidFile { .. }));
}

#[test]
fn test_missing_input_fails() {
    let temp = tempdir().unwrap();
    let config = rooted(&temp.path().join("missing"));

    let err = discover(&config.validate().unwrap()).unwrap_err();
    assert!(matches!(err, Error::Fs { .. }));
}

#[cfg(unix)]
#[test]
fn test_symlink_cycle_to_ancestor_terminates() {
    let temp = tempdir().unwrap();
    write(temp.path(), "a.txt", b"a");
    write(temp.path(), "sub/b.txt", b"b");
    std::os::unix::fs::symlink("..", temp.path().join("sub/up")).unwrap();

    assert_eq!(names(&rooted(temp.path())), vec!["a.txt", "sub/b.txt"]);
}

#[cfg(unix)]
#[test]
fn test_symlinked_directory_named_after_link() {
    let temp = tempdir().unwrap();
    let root = temp.path().join("root");
    write(temp.path(), "shared/logo.svg", b"<svg/>");
    write(&root, "index.html", b"<html>");
    std::os::unix::fs::symlink(temp.path().join("shared"), root.join("media")).unwrap();

    assert_eq!(names(&rooted(&root)), vec!["index.html", "media/logo.svg"]);
}

#[cfg(unix)]
#[test]
fn test_two_links_to_one_directory_followed_once() {
    let temp = tempdir().unwrap();
    let root = temp.path().join("root");
    write(temp.path(), "shared/x.txt", b"x");
    std::fs::create_dir_all(&root).unwrap();
    std::os::unix::fs::symlink(temp.path().join("shared"), root.join("a")).unwrap();
    std::os::unix::fs::symlink(temp.path().join("shared"), root.join("b")).unwrap();

    assert_eq!(names(&rooted(&root)), vec!["a/x.txt"]);
}

#[test]
fn test_hash_qualified_names() {
    let temp = tempdir().unwrap();
    write(temp.path(), "css/site.css", b"body{}");

    let config = Config {
        hash_format: HashFormat::NameHashSuffix,
        hash_length: 8,
        ..rooted(temp.path())
    };
    let plan = config.validate().unwrap();
    let assets = discover(&plan).unwrap();

    let encoded = encode_hash(&hash_bytes(b"body{}"), HashEncoding::Hex, 8);
    assert_eq!(assets.len(), 1);
    assert_eq!(assets[0].name, format!("css/site-{encoded}.css"));
    assert_eq!(assets[0].original_name.as_deref(), Some("css/site.css"));
    assert_eq!(assets[0].hash.as_deref(), Some(hash_bytes(b"body{}").as_slice()));

    let table: AssetTable = assets.into_iter().collect();
    assert_eq!(
        table.hashed_name("css/site.css"),
        Some(format!("css/site-{encoded}.css").as_str())
    );
}

#[test]
fn test_duplicate_names_last_write_wins() {
    let temp = tempdir().unwrap();
    write(temp.path(), "one/logo.txt", b"first");
    write(temp.path(), "one/other.txt", b"other");
    write(temp.path(), "two/logo.txt", b"second");

    let config = Config::default()
        .with_input(InputConfig::new(temp.path().join("one"), false).with_prefix(temp.path().join("one")))
        .with_input(InputConfig::new(temp.path().join("two"), false).with_prefix(temp.path().join("two")));
    let plan = config.validate().unwrap();
    let table: AssetTable = discover(&plan).unwrap().into_iter().collect();

    let source = Generator::new(&plan).render(&table).unwrap();
    assert_eq!(payloads(&source), vec![b"second".to_vec(), b"other".to_vec()]);
}

#[test]
fn test_rendered_payloads_round_trip() {
    let temp = tempdir().unwrap();
    let binary: Vec<u8> = (0..=255u8).cycle().take(700).collect();
    write(temp.path(), "a.bin", &binary);
    write(temp.path(), "b.txt", b"plain text\n");
    write(temp.path(), "empty", b"");

    let plan = rooted(temp.path()).validate().unwrap();
    let table: AssetTable = discover(&plan).unwrap().into_iter().collect();
    let source = Generator::new(&plan).render(&table).unwrap();

    assert_eq!(
        payloads(&source),
        vec![binary, b"plain text\n".to_vec(), Vec::new()]
    );
    assert!(source.contains("asset does not exist"));
}

#[test]
fn test_compressed_payloads_round_trip() {
    let temp = tempdir().unwrap();
    let text = "lorem ipsum dolor sit amet ".repeat(40);
    write(temp.path(), "lorem.txt", text.as_bytes());

    let config = Config {
        compress: true,
        compression_level: 9,
        ..rooted(temp.path())
    };
    let plan = config.validate().unwrap();
    let table: AssetTable = discover(&plan).unwrap().into_iter().collect();
    let source = Generator::new(&plan).render(&table).unwrap();

    let packed = payloads(&source).remove(0);
    assert!(packed.len() < text.len());
    let mut unpacked = String::new();
    flate2::read::GzDecoder::new(packed.as_slice())
        .read_to_string(&mut unpacked)
        .unwrap();
    assert_eq!(unpacked, text);
    assert!(source.contains(&format!("size: {},", text.len())));
}

#[test]
fn test_generate_is_deterministic() {
    let temp = tempdir().unwrap();
    let src = temp.path().join("src");
    write(&src, "a.txt", b"alpha");
    write(&src, "nested/b.txt", b"beta");

    let mut config = Config {
        compress: true,
        hash_format: HashFormat::DirHash,
        hash_encoding: HashEncoding::Base32,
        restore: true,
        ..rooted(&src)
    };

    config.output = temp.path().join("out/first.rs");
    let first = generate(&config).unwrap();
    config.output = temp.path().join("out/second.rs");
    let second = generate(&config).unwrap();

    assert_eq!(first.assets, 2);
    assert_eq!(first.bytes_in, 9);
    assert_eq!(second.assets, 2);
    assert_eq!(
        std::fs::read(&first.output).unwrap(),
        std::fs::read(&second.output).unwrap()
    );
}

#[test]
fn test_generate_reports_progress() {
    let temp = tempdir().unwrap();
    let src = temp.path().join("src");
    write(&src, "a.txt", b"a");
    write(&src, "b.txt", b"b");

    let config = Config {
        output: temp.path().join("assets.rs"),
        ..rooted(&src)
    };
    let seen = std::cell::RefCell::new(Vec::new());
    generate_with_progress(&config, &|current, total, name| {
        seen.borrow_mut().push((current, total, name.to_string()));
    })
    .unwrap();

    assert_eq!(
        seen.into_inner(),
        vec![(1, 2, "a.txt".to_string()), (2, 2, "b.txt".to_string())]
    );
}

#[test]
fn test_toml_config_drives_generation() {
    let temp = tempdir().unwrap();
    let src = temp.path().join("static");
    write(&src, "app.js", b"console.log(1)");
    write(&src, "app.js.map", b"{}");

    let text = format!(
        "output = {:?}\nprefix = {:?}\nignore = [\"\\\\.map$\"]\nmem_copy = true\n\n[[input]]\npath = {:?}\nrecursive = true\n",
        temp.path().join("gen.rs"),
        src,
        src,
    );
    let config = Config::from_toml_str(&text).unwrap();
    let summary = generate(&config).unwrap();

    assert_eq!(summary.assets, 1);
    let source = std::fs::read_to_string(summary.output).unwrap();
    assert!(source.contains("// app.js\n"));
    assert!(!source.contains("app.js.map"));
    assert!(!source.contains("fetch_view"));
}
