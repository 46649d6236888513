use std::path::PathBuf;

use tscdoc_common_core::{ErrorCategory, ErrorCode, Result};
use tscdoc_common_fs as fs;

fn replace(target: &std::path::Path, contents: &str) -> Result<()> {
    let mut temp = fs::TempFile::next_to(target)?;
    temp.write(contents.as_bytes())?;
    temp.persist(target)
}

#[test]
fn test_errors_integrate_with_core_types() {
    let result: Result<String> = fs::read_to_string("/nonexistent/file.tsc", 1024);
    let error = result.unwrap_err();

    assert_eq!(error.category(), ErrorCategory::FileSystem);
    assert_eq!(error.code(), ErrorCode::FILE_NOT_FOUND);
    assert_eq!(
        error.path(),
        Some(std::path::Path::new("/nonexistent/file.tsc"))
    );
}

#[test]
fn test_path_normalization() {
    let cases = [
        ("./a/b/../c", "a/c"),
        ("a/../b", "b"),
        ("../../a/b", "../../a/b"),
        ("a/b/c/../../d", "a/d"),
        ("", "."),
        (".", "."),
        ("..", ".."),
    ];

    for (input, expected) in cases {
        assert_eq!(
            fs::path::normalize(input),
            PathBuf::from(expected),
            "Failed for input: {input}"
        );
    }
}

#[test]
fn test_failed_write_leaves_no_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    // A directory at the target path makes the final rename fail.
    let target = dir.path().join("Bogus_component_test.rst");
    std::fs::create_dir(&target).unwrap();
    std::fs::write(target.join("keep"), "x").unwrap();

    assert!(replace(&target, "toc").is_err());

    let leftovers = fs::list_files(dir.path()).unwrap();
    assert!(leftovers.is_empty(), "unexpected files: {leftovers:?}");
}

#[test]
fn test_write_then_read_round_trip_through_bom_reader() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("nested").join("out.rst");

    replace(&target, "Title\n=====\n").unwrap();
    assert_eq!(
        fs::read_to_string(&target, fs::MAX_TEXT_FILE_SIZE).unwrap(),
        "Title\n=====\n"
    );
}
