use std::fs;

use scrape_engine::{ensure_output_dir, AtomicFileWriter, PersistError};
use tempfile::TempDir;

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("exports").join("today");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn rewrite_replaces_previous_export() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("hotel_rooms.csv", b"a,b\n").unwrap();
    assert_eq!(fs::read(&first).unwrap(), b"a,b\n");

    let second = writer.write("hotel_rooms.csv", b"c,d\n").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read(&second).unwrap(), b"c,d\n");
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
}

#[test]
fn no_partial_file_on_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    let result = writer.write("hotel_rooms.csv", b"data");
    assert!(result.is_err());
    assert!(!file_path.with_file_name("hotel_rooms.csv").exists());
}

#[test]
fn rejects_names_outside_output_dir() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().join("out"));

    let result = writer.write("../escape.csv", b"data");

    assert!(matches!(result, Err(PersistError::InvalidFilename(_))));
    assert!(!temp.path().join("escape.csv").exists());
}
