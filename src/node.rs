//! The node data model.
//!
//! A [`Node`] pairs a tag, which selects the handler, with a [`Payload`] that
//! the handler consumes. Built-in node kinds each have a dedicated payload
//! struct; [`Payload::Custom`] carries arbitrary data for handlers registered
//! by the embedding application.

use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

/// Unix permission bits.
pub type FileMode = u32;

pub const TYPE_DIR: &str = "dir";
pub const TYPE_ARCHIVE: &str = "tgz";
pub const TYPE_COPY: &str = "copy";
pub const TYPE_REPLACE: &str = "replace";
pub const TYPE_TEMPLATE: &str = "template";

/// Basic unit of the output tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    tag: String,
    payload: Payload,
}

impl Node {
    pub fn new<S: Into<String>>(tag: S, payload: Payload) -> Self {
        Self { tag: tag.into(), payload }
    }

    /// Node rendered by a custom handler registered under `tag`.
    pub fn custom<S: Into<String>>(tag: S, data: serde_json::Value) -> Self {
        Self::new(tag, Payload::Custom(data))
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Resolves relative `src` and `template` paths in this subtree against `base`.
    pub fn rebase_sources(&mut self, base: &Path) {
        match &mut self.payload {
            Payload::Dir(DirPayload { children, .. })
            | Payload::Archive(ArchivePayload { children, .. }) => {
                for child in children {
                    child.rebase_sources(base);
                }
            }
            Payload::Copy(params) => rebase(&mut params.src, base),
            Payload::Replace(params) => rebase(&mut params.template, base),
            Payload::Template(params) => rebase(&mut params.template, base),
            Payload::Custom(_) => {}
        }
    }
}

fn rebase(path: &mut PathBuf, base: &Path) {
    if path.is_relative() {
        *path = base.join(&*path);
    }
}

/// Tag-specific data of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Dir(DirPayload),
    Archive(ArchivePayload),
    Copy(CopyPayload),
    Replace(ReplacePayload),
    Template(TemplatePayload),
    Custom(serde_json::Value),
}

impl Payload {
    /// Name of the payload variant, used in mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Payload::Dir(_) => "dir",
            Payload::Archive(_) => "archive",
            Payload::Copy(_) => "copy",
            Payload::Replace(_) => "replace",
            Payload::Template(_) => "template",
            Payload::Custom(_) => "custom",
        }
    }

    /// Deserializes the payload fields of a node tagged `tag`.
    ///
    /// Unknown tags keep their fields untouched as [`Payload::Custom`].
    pub fn from_tagged(tag: &str, fields: serde_json::Value) -> serde_json::Result<Self> {
        let payload = match tag {
            TYPE_DIR => Payload::Dir(serde_json::from_value(fields)?),
            TYPE_ARCHIVE => Payload::Archive(serde_json::from_value(fields)?),
            TYPE_COPY => Payload::Copy(serde_json::from_value(fields)?),
            TYPE_REPLACE => Payload::Replace(serde_json::from_value(fields)?),
            TYPE_TEMPLATE => Payload::Template(serde_json::from_value(fields)?),
            _ => Payload::Custom(fields),
        };
        Ok(payload)
    }
}

/// A directory and the nodes rendered inside it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DirPayload {
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_mode")]
    pub mode: Option<FileMode>,
    #[serde(default)]
    pub children: Vec<Node>,
}

/// A `.tar.gz` file holding the output of its children.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArchivePayload {
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_mode")]
    pub mode: Option<FileMode>,
    #[serde(default)]
    pub children: Vec<Node>,
}

/// Verbatim copy of a file or directory.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CopyPayload {
    pub name: String,
    pub src: PathBuf,
}

/// A file produced by literal substring substitution over a template.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReplacePayload {
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_mode")]
    pub mode: Option<FileMode>,
    pub template: PathBuf,
    #[serde(default)]
    pub replaces: IndexMap<String, String>,
}

/// A file rendered by the template engine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplatePayload {
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_mode")]
    pub mode: Option<FileMode>,
    pub template: PathBuf,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl From<DirPayload> for Node {
    fn from(payload: DirPayload) -> Self {
        Node::new(TYPE_DIR, Payload::Dir(payload))
    }
}

impl From<ArchivePayload> for Node {
    fn from(payload: ArchivePayload) -> Self {
        Node::new(TYPE_ARCHIVE, Payload::Archive(payload))
    }
}

impl From<CopyPayload> for Node {
    fn from(payload: CopyPayload) -> Self {
        Node::new(TYPE_COPY, Payload::Copy(payload))
    }
}

impl From<ReplacePayload> for Node {
    fn from(payload: ReplacePayload) -> Self {
        Node::new(TYPE_REPLACE, Payload::Replace(payload))
    }
}

impl From<TemplatePayload> for Node {
    fn from(payload: TemplatePayload) -> Self {
        Node::new(TYPE_TEMPLATE, Payload::Template(payload))
    }
}

// A node is a mapping whose `type` key is the tag; the remaining keys are the
// payload fields.
impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut value = serde_json::Value::deserialize(deserializer)?;
        let fields = value
            .as_object_mut()
            .ok_or_else(|| D::Error::custom("node must be a mapping"))?;
        let tag = match fields.remove("type") {
            Some(serde_json::Value::String(tag)) => tag,
            Some(_) => return Err(D::Error::custom("node `type` must be a string")),
            None => return Err(D::Error::missing_field("type")),
        };
        let payload = Payload::from_tagged(&tag, value)
            .map_err(|e| D::Error::custom(format!("invalid '{tag}' node: {e}")))?;
        Ok(Node { tag, payload })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawMode {
    Number(u32),
    Octal(String),
}

/// Accepts either an integer or an octal string such as `"0755"` or `"0o755"`.
fn deserialize_mode<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<FileMode>, D::Error> {
    match Option::<RawMode>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawMode::Number(mode)) => Ok(Some(mode)),
        Some(RawMode::Octal(s)) => parse_octal_mode(&s).map(Some).map_err(D::Error::custom),
    }
}

pub fn parse_octal_mode(s: &str) -> Result<FileMode, String> {
    let digits = s.trim();
    let digits = digits.strip_prefix("0o").unwrap_or(digits);
    FileMode::from_str_radix(digits, 8).map_err(|e| format!("invalid file mode '{s}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_octal_mode() {
        assert_eq!(parse_octal_mode("0755"), Ok(0o755));
        assert_eq!(parse_octal_mode("0o644"), Ok(0o644));
        assert_eq!(parse_octal_mode("600"), Ok(0o600));
        assert!(parse_octal_mode("0789").is_err());
    }

    #[test]
    fn test_deserialize_nested_nodes() {
        let node: Node = serde_json::from_value(json!({
            "type": "tgz",
            "name": "out.tar.gz",
            "mode": "0644",
            "children": [
                {"type": "dir", "name": "sub", "children": [
                    {"type": "replace", "name": "f.txt", "template": "t.txt", "replaces": {"[X]": "c"}}
                ]}
            ]
        }))
        .unwrap();

        assert_eq!(node.tag(), TYPE_ARCHIVE);
        let Payload::Archive(archive) = node.payload() else {
            panic!("Expected archive payload");
        };
        assert_eq!(archive.mode, Some(0o644));
        assert_eq!(archive.children.len(), 1);
        assert_eq!(archive.children[0].tag(), TYPE_DIR);
    }

    #[test]
    fn test_unknown_tag_is_custom() {
        let node: Node = serde_json::from_value(json!({"type": "symlink", "to": "a"})).unwrap();
        assert_eq!(node.tag(), "symlink");
        assert_eq!(node.payload(), &Payload::Custom(json!({"to": "a"})));
    }

    #[test]
    fn test_missing_type_is_rejected() {
        assert!(serde_json::from_value::<Node>(json!({"name": "a"})).is_err());
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let result = serde_json::from_value::<Node>(json!({"type": "copy", "name": "a", "src": "b", "extra": 1}));
        assert!(result.is_err());
    }

    #[test]
    fn test_rebase_sources() {
        let mut node = Node::from(DirPayload {
            name: "d".to_string(),
            mode: None,
            children: vec![
                Node::from(CopyPayload { name: "a".to_string(), src: PathBuf::from("a.txt") }),
                Node::from(CopyPayload { name: "b".to_string(), src: PathBuf::from("/abs/b.txt") }),
            ],
        });
        node.rebase_sources(Path::new("/base"));

        let Payload::Dir(dir) = node.payload() else {
            panic!("Expected dir payload");
        };
        let srcs: Vec<_> = dir
            .children
            .iter()
            .map(|c| match c.payload() {
                Payload::Copy(p) => p.src.clone(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(srcs, vec![PathBuf::from("/base/a.txt"), PathBuf::from("/abs/b.txt")]);
    }
}
