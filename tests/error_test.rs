use std::io;
use std::path::PathBuf;

use filegen::error::{Error, FsOperation};

#[test]
fn test_fs_error_conversion() {
    let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let err = Error::fs(FsOperation::Read, "/tmp/a.txt")(io_err);

    match err {
        Error::Filesystem { op: FsOperation::Read, path, .. } => assert_eq!(path, PathBuf::from("/tmp/a.txt")),
        _ => panic!("Expected Filesystem variant"),
    }
}

#[test]
fn test_error_display() {
    let err = Error::UnknownNodeType { tag: "zip".to_string() };
    assert_eq!(err.to_string(), "unknown node type 'zip'");

    let err = Error::fs(FsOperation::CreateDir, "/out/sub")(io::Error::new(io::ErrorKind::Other, "denied"));
    assert_eq!(err.to_string(), "failed to create directory '/out/sub': denied");

    let err = Error::child("sub", 3, err);
    assert_eq!(err.to_string(), "failed to generate child 3 of 'sub': failed to create directory '/out/sub': denied");
}

#[test]
fn test_root_cause() {
    let inner = Error::UnknownNodeType { tag: "x".to_string() };
    let err = Error::child("a", 0, Error::child("b", 1, inner));

    assert!(matches!(err.root_cause(), Error::UnknownNodeType { .. }));
}
