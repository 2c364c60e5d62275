use std::fmt;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left unescaped by `encodeURIComponent`: ASCII alphanumerics
/// plus `- _ . ! ~ * ' ( )`. Each path segment and query value is encoded
/// with this set so equivalent inputs produce byte-identical URLs.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a single path segment or query value.
pub fn encode_component(raw: &str) -> String {
    utf8_percent_encode(raw, URI_COMPONENT).to_string()
}

/// Canonical location of a node in the remote JSON tree.
///
/// Stored in sanitized form: a single leading slash, no empty segments, each
/// segment percent-encoded independently. The root is `/`. Because the form
/// is canonical, distinct but equivalent inputs (`"a/b"`, `"/a//b/"`) map to
/// the same path and therefore the same request URL.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TreePath(String);

impl TreePath {
    /// The root of the tree.
    pub fn root() -> Self {
        Self("/".into())
    }

    /// Sanitize an arbitrary key into canonical form.
    ///
    /// Splits on `/`, drops empty segments, percent-encodes each remaining
    /// segment, and rejoins with a leading slash. An empty or all-slash key
    /// yields the root.
    pub fn sanitize(key: &str) -> Self {
        let mut path = String::new();
        for segment in key.split('/') {
            if segment.is_empty() {
                continue;
            }
            path.push('/');
            path.push_str(&encode_component(segment));
        }
        if path.is_empty() {
            path.push('/');
        }
        Self(path)
    }

    /// The sanitized path, always beginning with `/`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Last path segment (encoded form), or `None` at the root.
    pub fn key(&self) -> Option<&str> {
        if self.is_root() {
            None
        } else {
            self.0.rsplit('/').next()
        }
    }

    /// The path one level up, or `None` at the root.
    pub fn parent(&self) -> Option<TreePath> {
        if self.is_root() {
            return None;
        }
        match self.0.rfind('/') {
            Some(0) => Some(Self::root()),
            Some(idx) => Some(Self(self.0[..idx].to_string())),
            None => None,
        }
    }

    /// Path of a child node. `name` is sanitized on its own so an
    /// already-encoded parent segment is never encoded twice.
    pub fn child(&self, name: &str) -> TreePath {
        let suffix = Self::sanitize(name);
        if suffix.is_root() {
            return self.clone();
        }
        if self.is_root() {
            suffix
        } else {
            Self(format!("{}{}", self.0, suffix.0))
        }
    }

    /// The request path for this node: the sanitized path with the `.json`
    /// suffix the REST API expects.
    pub fn json_path(&self) -> String {
        format!("{}.json", self.0)
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TreePath({})", self.0)
    }
}
