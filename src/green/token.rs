use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

use crate::{SmolStr, SyntaxKind, TextSize};

#[derive(PartialEq, Eq, Hash)]
pub(super) struct GreenTokenData {
    pub(super) kind: SyntaxKind,
    pub(super) text: SmolStr,
}

/// Leaf node in the immutable "green" tree.
///
/// A token owns its source text. Short texts are stored inline in the
/// [`SmolStr`], so identifiers and punctuation typically do not allocate.
/// Two tokens with equal kind and text are equal and may share storage (the
/// builder's [`NodeCache`](crate::NodeCache) deduplicates them).
#[derive(Clone)]
pub struct GreenToken {
    data: Arc<GreenTokenData>,
}

impl GreenToken {
    /// Creates a new token with the given `kind` and `text`.
    #[inline]
    pub fn new(kind: SyntaxKind, text: SmolStr) -> GreenToken {
        GreenToken {
            data: Arc::new(GreenTokenData { kind, text }),
        }
    }

    /// Raw [`SyntaxKind`] of this token.
    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        self.data.kind
    }

    /// The original source text of this token.
    #[inline]
    pub fn text(&self) -> &str {
        self.data.text.as_str()
    }

    /// Returns the length of text covered by this token.
    #[inline]
    pub fn text_len(&self) -> TextSize {
        TextSize::of(self.text())
    }
}

impl fmt::Debug for GreenToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GreenToken")
            .field("kind", &self.kind())
            .field("text", &self.text())
            .finish()
    }
}

impl PartialEq for GreenToken {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data) || self.data == other.data
    }
}

impl Eq for GreenToken {}

impl Hash for GreenToken {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.data.hash(state);
    }
}
