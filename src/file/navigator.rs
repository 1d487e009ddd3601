//! Path-tracking navigation on top of a [`NexusFile`].
//!
//! The native library only exposes "open this child" and "close the
//! current node". [`Navigator`] remembers the open path so it can move
//! between arbitrary nodes by closing up to the common ancestor and
//! opening down to the target.

use tracing::debug;

use super::NexusFile;
use crate::core::NapiBackend;
use crate::mem::MemoryBackend;
use crate::util::{Error, Result};

/// Class reported for datasets.
pub const DATA_CLASS: &str = "SDS";

/// One component of a target path: a name and, if given, its class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathStep {
    pub name: String,
    pub class: Option<String>,
}

impl PathStep {
    fn parse(component: &str) -> Self {
        match component.split_once(':') {
            Some((name, class)) => Self { name: name.to_string(), class: Some(class.to_string()) },
            None => Self { name: component.to_string(), class: None },
        }
    }
}

/// Resolve `path` against the `current` open path.
///
/// Absolute paths start at the root, relative ones at `current`. `.` is
/// skipped and `..` drops the previous component. Components may carry a
/// class as `name:class`.
pub fn resolve_path(current: &[String], path: &str) -> Result<Vec<PathStep>> {
    let path = path.strip_suffix('/').filter(|p| !p.is_empty()).unwrap_or(path);
    let components: Vec<&str> = if path == "/" {
        Vec::new()
    } else if let Some(abs) = path.strip_prefix('/') {
        abs.split('/').collect()
    } else {
        current.iter().map(String::as_str).chain(path.split('/')).collect()
    };

    let mut steps: Vec<PathStep> = Vec::new();
    for component in components {
        match component {
            "." | "" => {}
            ".." => {
                if steps.pop().is_none() {
                    return Err(Error::invalid("too many '..' in path"));
                }
            }
            other => steps.push(PathStep::parse(other)),
        }
    }
    Ok(steps)
}

/// A [`NexusFile`] that tracks its open path.
#[derive(Debug)]
pub struct Navigator<B: NapiBackend = MemoryBackend> {
    file: NexusFile<B>,
    path: Vec<String>,
    data_open: bool,
}

impl<B: NapiBackend> Navigator<B> {
    pub fn new(file: NexusFile<B>) -> Self {
        Self { file, path: Vec::new(), data_open: false }
    }

    /// Names of the open nodes from the root down.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn is_data_open(&self) -> bool {
        self.data_open
    }

    pub fn file(&mut self) -> &mut NexusFile<B> {
        &mut self.file
    }

    pub fn into_inner(self) -> NexusFile<B> {
        self.file
    }

    pub fn open_group(&mut self, name: &str, class: &str) -> Result<()> {
        self.file.open_group(name, class)?;
        self.path.push(name.to_string());
        Ok(())
    }

    pub fn close_group(&mut self) -> Result<()> {
        self.file.close_group()?;
        self.path.pop();
        Ok(())
    }

    /// Open a dataset, closing one that is already open.
    pub fn open_data(&mut self, name: &str) -> Result<()> {
        if self.data_open {
            self.close_data()?;
        }
        self.file.open_data(name)?;
        self.path.push(name.to_string());
        self.data_open = true;
        Ok(())
    }

    pub fn close_data(&mut self) -> Result<()> {
        self.file.close_data()?;
        self.path.pop();
        self.data_open = false;
        Ok(())
    }

    /// Move to the group or dataset at `path`.
    pub fn open_path(&mut self, path: &str) -> Result<()> {
        self.walk(path, true)
    }

    /// Move to the group at `path`; a dataset target is an error.
    pub fn open_group_path(&mut self, path: &str) -> Result<()> {
        self.walk(path, false)
    }

    fn walk(&mut self, path: &str, open_data: bool) -> Result<()> {
        if self.path.last().is_some_and(|leaf| leaf == path) {
            return Ok(());
        }

        let target = resolve_path(&self.path, path)?;
        let common = self
            .path
            .iter()
            .zip(&target)
            .take_while(|(open, step)| **open == step.name)
            .count();
        let mut up = self.path.len() - common;
        let down = &target[common..];
        debug!(path, up, down = down.len(), "walking path");

        if self.data_open && up > 0 {
            self.close_data()?;
            up -= 1;
        }
        for _ in 0..up {
            self.close_group()?;
        }

        for step in down {
            let class = match &step.class {
                Some(class) => class.clone(),
                None => self.find_class(&step.name)?.ok_or_else(|| {
                    Error::io(format!("Failed to find entry with name \"{}\"", step.name))
                })?,
            };
            if class != DATA_CLASS {
                self.open_group(&step.name, &class)?;
            } else if open_data {
                self.open_data(&step.name)?;
            } else {
                return Err(Error::io(format!(
                    "node {} not in /{}",
                    step.name,
                    self.path.join("/")
                )));
            }
        }
        Ok(())
    }

    /// Class of the child `name` of the current group, by directory scan.
    fn find_class(&mut self, name: &str) -> Result<Option<String>> {
        self.file.init_group_dir()?;
        while let Some(entry) = self.file.next_entry()? {
            if entry.name == name {
                return Ok(Some(entry.class));
            }
        }
        Ok(None)
    }
}
