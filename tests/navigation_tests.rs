//! Path navigation tests for the native path calls and the navigator.

use sns_napi::core::{AccessMode, TypedBuffer};
use sns_napi::file::{Navigator, NexusFile};
use sns_napi::marshal::{ResultKind, Value};
use sns_napi::mem::{Dataset, Group, MemoryBackend};
use sns_napi::{Dimensions, ErrorKind};

fn tree() -> Group {
    let data = |v: &[i32]| TypedBuffer::from_slice(Dimensions::d1(v.len() as i64), v);
    Group::root().with_group(
        Group::new("entry", "NXentry")
            .with_group(
                Group::new("bank1", "NXdata")
                    .with_data(Dataset::new("counts", data(&[1, 2])))
                    .with_data(Dataset::new("tof", data(&[5, 6]))),
            )
            .with_group(Group::new("bank2", "NXdata").with_data(Dataset::new("counts", data(&[3, 4])))),
    )
}

fn file() -> NexusFile {
    NexusFile::attach(MemoryBackend::from_tree(tree()), "memory", AccessMode::Read)
}

#[test]
fn test_native_open_path() {
    let mut file = file();
    file.open_path("/entry/bank2/counts").unwrap();
    assert_eq!(file.get_data(ResultKind::Int).unwrap(), Value::Ints(vec![3, 4]));

    file.open_path("../../bank1/tof").unwrap();
    assert_eq!(file.get_data(ResultKind::Int).unwrap(), Value::Ints(vec![5, 6]));

    file.open_group_path("/entry/bank1/counts").unwrap();
    assert_eq!(file.get_group_id().unwrap().target(), "/entry/bank1");
    assert_eq!(file.get_info().unwrap_err().kind(), ErrorKind::Io);

    assert_eq!(file.open_path("/entry/nothing").unwrap_err().kind(), ErrorKind::Io);
}

#[test]
fn test_navigator_tracks_path() {
    let mut nav = Navigator::new(file());
    nav.open_path("/entry/bank1/counts").unwrap();
    assert_eq!(nav.path(), ["entry", "bank1", "counts"]);
    assert!(nav.is_data_open());
    assert_eq!(nav.file().get_data(ResultKind::Int).unwrap(), Value::Ints(vec![1, 2]));

    // Sibling dataset: close the open one, open the other.
    nav.open_path("../tof").unwrap();
    assert_eq!(nav.path(), ["entry", "bank1", "tof"]);

    nav.open_path("/entry/bank2/counts").unwrap();
    assert_eq!(nav.path(), ["entry", "bank2", "counts"]);
    assert_eq!(nav.file().get_data(ResultKind::Int).unwrap(), Value::Ints(vec![3, 4]));

    nav.open_path("/").unwrap();
    assert!(nav.path().is_empty());
    assert!(!nav.is_data_open());
}

#[test]
fn test_navigator_classes_and_errors() {
    let mut nav = Navigator::new(file());
    nav.open_path("/entry:NXentry/bank1:NXdata").unwrap();
    assert_eq!(nav.path(), ["entry", "bank1"]);

    let err = nav.open_group_path("counts").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);

    let err = nav.open_path("/entry/missing").unwrap_err();
    assert!(err.to_string().contains("Failed to find entry with name \"missing\""));

    let err = nav.open_path("/..").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn test_navigator_group_stack() {
    let mut nav = Navigator::new(file());
    nav.open_group("entry", "NXentry").unwrap();
    nav.open_group("bank2", "NXdata").unwrap();
    nav.open_data("counts").unwrap();
    assert_eq!(nav.path(), ["entry", "bank2", "counts"]);

    nav.close_data().unwrap();
    nav.close_group().unwrap();
    assert_eq!(nav.path(), ["entry"]);

    // A failed open leaves the stack alone.
    assert!(nav.open_group("bank3", "NXdata").is_err());
    assert_eq!(nav.path(), ["entry"]);

    nav.into_inner().close().unwrap();
}
