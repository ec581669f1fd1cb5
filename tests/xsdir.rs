//! Reading directory files from disk and querying the listing

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::{tempdir, TempDir};
use xslist::inventory;
use xslist::xsdir::Entry;
use xslist::{read_xsdir, read_xsdir_strict, Category, Error, Listing};

const HEADER: &str = "\
atomic weight ratios
   1001  0.999167   8016 15.857510
directory
";

/// Write a directory file with the usual header into a fresh directory
fn write_xsdir(lines: &[&str]) -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("xsdir");
    let text = with_header(lines);
    fs::write(&path, text).unwrap();
    (dir, path)
}

fn with_header(lines: &[&str]) -> String {
    let mut text = HEADER.to_string();
    for line in lines {
        text.push_str(line);
        text.push('\n');
    }
    text
}

fn zaids(entries: &[&Entry]) -> Vec<String> {
    entries.iter().map(|e| e.zaid.clone()).collect()
}

fn shipped() -> Listing {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/xsdir");
    read_xsdir(path).unwrap().into_listing()
}

#[test]
fn three_line_directory() {
    let (_dir, path) = write_xsdir(&[
        " 1001.80c  0.999167 endf70a 0 1 1     17969 0 0 2.5301E-08",
        " 1001.24t  0.999167 tmccs   0 1 1234  4000  0 0 2.5301E-08",
        " 8016.80p 15.857510 eprdata 0 1 2020  2000  0 0 0.0",
    ]);

    let listing = read_xsdir(&path).unwrap().into_listing();

    let neutron = listing.list_by_category(Category::ContinuousEnergyNeutron);
    assert_eq!(zaids(&neutron), ["1001.80c"]);
    assert_eq!(listing.resolve("1001").unwrap().zaid, "1001.80c");
    assert_eq!(listing.resolve("8016").unwrap().zaid, "8016.80p");
}

#[test]
fn malformed_line_is_skipped_when_not_strict() {
    let lines = [
        " 1001.80c  0.999167 endf70a 0 1 1    17969 0 0 2.5301E-08",
        " 8016.80c 15.857510 endf70b 0 1 1",
        " 1001.24t  0.999167 tmccs   0 1 1234 4000  0 0 2.5301E-08",
    ];
    let (_dir, path) = write_xsdir(&lines);

    let xsdir = read_xsdir(&path).unwrap();
    let kept: Vec<&str> = xsdir.entries.iter().map(|e| e.zaid.as_str()).collect();
    assert_eq!(kept, ["1001.80c", "1001.24t"]);
    assert_eq!(xsdir.skipped.len(), 1);
    assert_eq!(xsdir.skipped[0].line(), Some(5));
}

#[test]
fn malformed_line_is_fatal_when_strict() {
    let lines = [
        " 1001.80c  0.999167 endf70a 0 1 1    17969 0 0 2.5301E-08",
        " 8016.80c 15.857510 endf70b 0 1 1",
        " 1001.24t  0.999167 tmccs   0 1 1234 4000  0 0 2.5301E-08",
    ];
    let (_dir, path) = write_xsdir(&lines);

    match read_xsdir_strict(&path) {
        Err(Error::MalformedLine { line, text, .. }) => {
            assert_eq!(line, 5);
            assert!(text.starts_with("8016.80c"));
        }
        other => panic!("expected a malformed line, got {other:?}"),
    }
}

#[test]
fn swapping_two_entries_changes_resolution() {
    let first = " 1001.80c 0.999167 endf70a 0 1 1    17969 0 0 2.5301E-08";
    let second = " 1001.24t 0.999167 tmccs   0 1 1234 4000  0 0 2.5301E-08";

    let (_a, path_a) = write_xsdir(&[first, second]);
    let (_b, path_b) = write_xsdir(&[second, first]);

    let a = read_xsdir(path_a).unwrap().into_listing();
    let b = read_xsdir(path_b).unwrap().into_listing();

    assert_eq!(a.resolve("1001").unwrap().zaid, "1001.80c");
    assert_eq!(b.resolve("1001").unwrap().zaid, "1001.24t");

    // exact identifiers do not care about order
    assert_eq!(a.resolve("1001.24t"), b.resolve("1001.24t"));
}

#[test]
fn categories_cover_every_entry_once() {
    let listing = shipped();

    let mut grouped: Vec<(usize, String)> = Category::all()
        .into_iter()
        .flat_map(|c| listing.list_by_category(c))
        .map(|e| (e.line, e.zaid.clone()))
        .collect();
    grouped.sort();

    let mut all: Vec<(usize, String)> = listing
        .entries()
        .iter()
        .map(|e| (e.line, e.zaid.clone()))
        .collect();
    all.sort();

    assert_eq!(grouped, all);
}

#[test]
fn groups_keep_file_order() {
    let listing = shipped();
    for category in Category::all() {
        let lines: Vec<usize> = listing
            .list_by_category(category)
            .iter()
            .map(|e| e.line)
            .collect();
        assert!(lines.windows(2).all(|w| w[0] < w[1]), "{category}");
    }
}

#[test]
fn rebuilding_answers_the_same() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/xsdir");
    let xsdir = read_xsdir(path).unwrap();
    let a = xsdir.listing();
    let b = xsdir.listing();

    for category in Category::all() {
        assert_eq!(a.list_by_category(category), b.list_by_category(category));
    }
    for entry in a.entries() {
        for query in [entry.zaid.as_str(), entry.za()] {
            assert_eq!(a.resolve(query), b.resolve(query));
        }
    }
}

#[test]
fn shipped_directory_audit() {
    let listing = shipped();

    let duplicates = listing.duplicates();
    assert_eq!(duplicates.len(), 1);
    assert_eq!(duplicates[0][0].filename, "ace/sample.ace");
    assert_eq!(duplicates[0][1].filename, "endf70a");

    let unknown = listing.unknown();
    assert_eq!(zaids(&unknown), ["9999.01zz"]);

    // a photon problem resolves hydrogen to the photoatomic table
    let photon = listing.resolve_in("1000", Category::Photoatomic).unwrap();
    assert_eq!(photon.zaid, "1000.12p");
}

#[test]
fn missing_directory_file() {
    let dir = tempdir().unwrap();
    let result = read_xsdir(dir.path().join("xsdir"));
    assert!(matches!(result, Err(Error::FileNotFound { .. })));
}

#[test]
fn file_without_directory_section() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("xsdir");
    fs::write(&path, "atomic weight ratios\n 1001 0.999167\n").unwrap();
    assert!(matches!(read_xsdir(&path), Err(Error::MissingDirectory(_))));
}

#[test]
fn data_files_found_through_datapath() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("lib/route")).unwrap();
    fs::write(dir.path().join("lib/endf70a"), "").unwrap();
    fs::write(dir.path().join("lib/route/tmccs"), "").unwrap();

    let text = "\
datapath=lib
directory
 1001.80c 0.999167 endf70a 0     1 1    17969 0 0 2.5301E-08
 1001.24t 0.999167 tmccs   route 1 1234 4000  0 0 2.5301E-08
 8016.80c 15.85751 endf70b 0     1 1    9000  0 0 2.5301E-08
";
    let path = dir.path().join("xsdir");
    fs::write(&path, text).unwrap();

    let xsdir = read_xsdir(&path).unwrap();
    let datapath = xsdir.data_directory();
    assert_eq!(datapath, dir.path().join("lib"));

    let listing = xsdir.into_listing();
    let found: Vec<bool> = inventory::check_files(&listing, &datapath)
        .iter()
        .map(|c| c.exists)
        .collect();
    assert_eq!(found, [true, true, false]);

    let missing = inventory::missing_files(&listing, &datapath);
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].1, dir.path().join("lib/endf70b"));
}

#[test]
fn json_export_has_one_record_per_entry() {
    let listing = shipped();
    let dir = tempdir().unwrap();
    let path = dir.path().join("tables.json");

    fs::write(&path, serde_json::to_string(&listing.records()).unwrap()).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();

    let records = value.as_array().unwrap();
    assert_eq!(records.len(), listing.len());
    assert_eq!(records[3]["za"], "lwtr");
    assert_eq!(records[3]["category"], "ThermalScattering");
    assert_eq!(records[0]["temperature_k"], 293.6);
}
