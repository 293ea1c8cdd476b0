//! Runtime-agnostic description of a container as seen during one collection cycle.
use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

mod error;

pub use error::{Error, Result};

/// The maximum allowed length for a [`ContainerID`].
const CONTAINER_ID_MAX_LEN: usize = 255;

/// Separator used when a container reports more than one name.
const NAME_SEPARATOR: &str = ";";

/// A validated container identifier.
///
/// # Examples
///
/// ```
/// # use dex_exporter::container::{ContainerID, Error};
/// let raw_id = "abc123abc123abc123abc123abc123abc123abc123abc123abc123abc123abcd";
/// let container_id = ContainerID::new(raw_id).unwrap();
/// assert_eq!(container_id.as_ref(), "abc123abc123abc123abc123abc123abc123abc123abc123abc123abc123abcd");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerID(Arc<str>);

impl ContainerID {
    /// Creates a new `ContainerID` from the given raw id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidContainerID`] if the input is empty, longer than
    /// [`CONTAINER_ID_MAX_LEN`], or contains a `/`, which would escape the
    /// runtime API path it is interpolated into.
    pub fn new(src: impl AsRef<str>) -> Result<Self> {
        let src = src.as_ref();
        if src.is_empty() || src.len() > CONTAINER_ID_MAX_LEN || src.contains('/') {
            return Err(Error::InvalidContainerID(src.to_owned()));
        }

        Ok(Self(src.into()))
    }
}

impl AsRef<str> for ContainerID {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ContainerID {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle state of a container. Only `Running` containers get their stats fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerState {
    Running,
    Other(String),
}

impl From<&str> for ContainerState {
    fn from(value: &str) -> Self {
        if value == "running" {
            Self::Running
        } else {
            Self::Other(value.to_owned())
        }
    }
}

/// A container returned by the runtime's listing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerInfo {
    pub id: ContainerID,
    pub names: Vec<String>,
    pub state: ContainerState,
}

impl ContainerInfo {
    pub fn new(id: ContainerID, names: Vec<String>, state: ContainerState) -> Self {
        Self { id, names, state }
    }

    pub fn is_running(&self) -> bool {
        self.state == ContainerState::Running
    }

    /// The label value identifying this container on every emitted metric.
    ///
    /// All names are joined with `;` and a single leading `/` is stripped.
    ///
    /// # Examples
    ///
    /// ```
    /// # use dex_exporter::container::{ContainerID, ContainerInfo, ContainerState};
    /// let info = ContainerInfo::new(
    ///     ContainerID::new("abc").unwrap(),
    ///     vec!["/web".to_owned(), "/proxy/web".to_owned()],
    ///     ContainerState::Running,
    /// );
    /// assert_eq!(info.normalized_name(), "web;/proxy/web");
    /// ```
    pub fn normalized_name(&self) -> String {
        let joined = self.names.join(NAME_SEPARATOR);
        match joined.strip_prefix('/') {
            Some(stripped) => stripped.to_owned(),
            None => joined,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(names: &[&str], state: &str) -> ContainerInfo {
        ContainerInfo::new(
            ContainerID::new("abc123").unwrap(),
            names.iter().map(|n| n.to_string()).collect(),
            ContainerState::from(state),
        )
    }

    #[test]
    fn test_container_id_rejects_invalid() {
        assert!(ContainerID::new("").is_err());
        assert!(ContainerID::new("a".repeat(256)).is_err());
        assert!(ContainerID::new("../images").is_err());
        assert!(ContainerID::new("a".repeat(255)).is_ok());
    }

    #[test]
    fn test_state_from_str() {
        assert_eq!(ContainerState::from("running"), ContainerState::Running);
        assert_eq!(
            ContainerState::from("exited"),
            ContainerState::Other("exited".to_owned())
        );
        // docker reports lowercase states only
        assert!(!info(&["/x"], "Running").is_running());
    }

    #[test]
    fn test_normalized_name_strips_single_slash() {
        assert_eq!(info(&["/web"], "running").normalized_name(), "web");
        assert_eq!(info(&["//web"], "running").normalized_name(), "/web");
        assert_eq!(info(&["web"], "running").normalized_name(), "web");
    }

    #[test]
    fn test_normalized_name_joins_all_names() {
        assert_eq!(
            info(&["/a", "/b"], "running").normalized_name(),
            "a;/b"
        );
        assert_eq!(info(&[], "exited").normalized_name(), "");
    }
}
