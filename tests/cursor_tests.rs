//! Directory cursor and attribute lookup tests.

use std::path::Path;

use sns_napi::core::{
    AccessMode, DataInfo, NapiBackend, NodeLink, NxResult, NxStatus, RawAttr, RawEntry, TypedBuffer,
};
use sns_napi::file::NexusFile;
use sns_napi::marshal::Value;
use sns_napi::mem::{Attribute, Dataset, Group, MemoryBackend};
use sns_napi::{Dimensions, ElementType, Error, ErrorKind};

fn tree() -> Group {
    let counts = TypedBuffer::from_slice(Dimensions::d2(2, 3), &[1i32, 2, 3, 4, 5, 6]);
    Group::root()
        .with_attr(Attribute::text("name", "detector1"))
        .with_attr(Attribute::new("pi", TypedBuffer::from_slice(Dimensions::d1(1), &[3.5f64])))
        .with_attr(Attribute::text("facility", "SNS"))
        .with_group(
            Group::new("entry", "NXentry")
                .with_group(Group::new("instrument", "NXinstrument"))
                .with_data(Dataset::new("counts", counts).with_attr(Attribute::text("units", "counts")))
                .with_group(Group::new("sample", "NXsample")),
        )
}

fn open_tree() -> NexusFile {
    NexusFile::attach(MemoryBackend::from_tree(tree()), "memory", AccessMode::Read)
}

#[test]
fn test_child_cursor_yields_n_then_end() {
    let mut file = open_tree();
    file.open_group("entry", "NXentry").unwrap();
    file.init_group_dir().unwrap();

    let mut seen = Vec::new();
    while let Some(entry) = file.next_entry().unwrap() {
        seen.push((entry.name.clone(), entry.class.clone()));
    }
    assert_eq!(
        seen,
        [
            ("instrument".to_string(), "NXinstrument".to_string()),
            ("counts".to_string(), "SDS".to_string()),
            ("sample".to_string(), "NXsample".to_string()),
        ]
    );
    // Exhausted stays exhausted until re-initialised.
    assert!(file.next_entry().unwrap().is_none());

    file.init_group_dir().unwrap();
    let first = file.next_entry().unwrap().unwrap();
    assert_eq!(first.name, "instrument");
}

#[test]
fn test_child_entry_types() {
    let mut file = open_tree();
    file.open_group("entry", "NXentry").unwrap();
    let entries = file.entries().unwrap();
    let counts = entries.iter().find(|e| e.is_data()).unwrap();
    assert_eq!(counts.element_type(), Some(ElementType::Int32));
    assert_eq!(counts.type_name(), Some("INT32"));
    assert!(!entries[0].is_data());
}

#[test]
fn test_cursor_requires_init() {
    let mut file = open_tree();
    assert!(matches!(file.next_entry(), Err(Error::CursorNotInitialized(_))));
    assert!(matches!(file.next_attr(), Err(Error::CursorNotInitialized(_))));

    // Navigation invalidates an initialised cursor.
    file.init_group_dir().unwrap();
    file.open_group("entry", "NXentry").unwrap();
    assert_eq!(file.next_entry().unwrap_err().kind(), ErrorKind::Runtime);
}

#[test]
fn test_attribute_cursor() {
    let mut file = open_tree();
    assert_eq!(file.attr_count().unwrap(), 3);

    file.init_attr_dir().unwrap();
    let first = file.next_attr().unwrap().unwrap();
    assert_eq!(first.name, "name");
    assert_eq!(first.element_type, ElementType::Char);
    assert_eq!(first.value, Value::Text("detector1".into()));

    let second = file.next_attr().unwrap().unwrap();
    assert_eq!(second.value, Value::Float(3.5));

    assert!(file.next_attr().unwrap().is_some());
    assert!(file.next_attr().unwrap().is_none());
    assert!(file.next_attr().unwrap().is_none());

    let names: Vec<String> = file.attributes().unwrap().into_iter().map(|a| a.name).collect();
    assert_eq!(names, ["name", "pi", "facility"]);
}

#[test]
fn test_attributes_follow_open_node() {
    let mut file = open_tree();
    file.open_path("/entry/counts").unwrap();
    assert_eq!(file.attr_count().unwrap(), 1);
    assert_eq!(file.get_attr("units").unwrap(), Value::Text("counts".into()));
    assert!(matches!(file.get_attr("name"), Err(Error::AttributeNotFound(_))));

    file.close_data().unwrap();
    assert_eq!(file.attr_count().unwrap(), 0);
}

/// Delegates to a [`MemoryBackend`] but fails attribute steps after
/// `fail_after` successful ones.
#[derive(Debug)]
struct FailingScan {
    inner: MemoryBackend,
    fail_after: usize,
    steps: usize,
}

impl NapiBackend for FailingScan {
    fn open(_path: &Path, _mode: AccessMode) -> NxResult<Self> {
        Err(NxStatus::Error)
    }
    fn close(&mut self) -> NxResult<()> {
        self.inner.close()
    }
    fn open_group(&mut self, name: &str, class: &str) -> NxResult<()> {
        self.inner.open_group(name, class)
    }
    fn close_group(&mut self) -> NxResult<()> {
        self.inner.close_group()
    }
    fn open_path(&mut self, path: &str) -> NxResult<()> {
        self.inner.open_path(path)
    }
    fn open_group_path(&mut self, path: &str) -> NxResult<()> {
        self.inner.open_group_path(path)
    }
    fn open_data(&mut self, name: &str) -> NxResult<()> {
        self.inner.open_data(name)
    }
    fn close_data(&mut self) -> NxResult<()> {
        self.inner.close_data()
    }
    fn get_info(&mut self) -> NxResult<DataInfo> {
        self.inner.get_info()
    }
    fn get_data(&mut self, buf: &mut TypedBuffer) -> NxResult<()> {
        self.inner.get_data(buf)
    }
    fn get_slab(&mut self, buf: &mut TypedBuffer, start: &[i64], size: &[i64]) -> NxResult<()> {
        self.inner.get_slab(buf, start, size)
    }
    fn get_attr(&mut self, name: &str, buf: &mut TypedBuffer) -> NxResult<()> {
        self.inner.get_attr(name, buf)
    }
    fn flush(&mut self) -> NxResult<()> {
        self.inner.flush()
    }
    fn init_group_dir(&mut self) -> NxResult<()> {
        self.inner.init_group_dir()
    }
    fn get_next_entry(&mut self) -> NxResult<RawEntry> {
        self.inner.get_next_entry()
    }
    fn get_attr_count(&mut self) -> NxResult<i64> {
        self.inner.get_attr_count()
    }
    fn init_attr_dir(&mut self) -> NxResult<()> {
        self.steps = 0;
        self.inner.init_attr_dir()
    }
    fn get_next_attr(&mut self) -> NxResult<RawAttr> {
        if self.steps >= self.fail_after {
            return Err(NxStatus::Error);
        }
        self.steps += 1;
        self.inner.get_next_attr()
    }
    fn get_group_id(&mut self) -> NxResult<NodeLink> {
        self.inner.get_group_id()
    }
    fn get_data_id(&mut self) -> NxResult<NodeLink> {
        self.inner.get_data_id()
    }
}

fn failing(fail_after: usize) -> NexusFile<FailingScan> {
    let backend = FailingScan { inner: MemoryBackend::from_tree(tree()), fail_after, steps: 0 };
    NexusFile::attach(backend, "memory", AccessMode::Read)
}

#[test]
fn test_failed_scan_step_is_io_error() {
    let mut file = failing(1);
    assert_eq!(file.get_attr("name").unwrap(), Value::Text("detector1".into()));

    let err = file.get_attr("facility").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(!matches!(err, Error::AttributeNotFound(_)));
}

#[test]
fn test_failed_cursor_step_is_end_of_directory() {
    let mut file = failing(2);
    file.init_attr_dir().unwrap();
    assert!(file.next_attr().unwrap().is_some());
    assert!(file.next_attr().unwrap().is_some());
    assert!(file.next_attr().unwrap().is_none());
}
