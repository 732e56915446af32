//! Watermark text transforms.
//!
//! The watermark's coordinate string is never stored verbatim: the encoder
//! passes it through a deterministic [`TextTransform`] and attaches only the
//! result.

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;

/// Deterministic string-to-string transform.
pub trait TextTransform: Send + Sync {
    /// Identifier stored alongside the transformed text.
    fn name(&self) -> &'static str;

    fn apply(&self, plaintext: &str) -> String;
}

/// Base64 (standard alphabet) with the `=` padding stripped.
#[derive(Clone, Copy, Debug, Default)]
pub struct Base64Transform;

impl TextTransform for Base64Transform {
    fn name(&self) -> &'static str {
        "base64-nopad"
    }

    fn apply(&self, plaintext: &str) -> String {
        STANDARD_NO_PAD.encode(plaintext.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64_without_padding() {
        let t = Base64Transform;
        assert_eq!(t.apply("0-1,1000-3"), "MC0xLDEwMDAtMw");
        assert!(!t.apply("a").contains('='));
        assert_eq!(t.apply(""), "");
    }

    #[test]
    fn deterministic() {
        let t = Base64Transform;
        assert_eq!(t.apply("0-4,2000-2"), t.apply("0-4,2000-2"));
        assert_ne!(t.apply("0-4"), t.apply("0-3"));
    }
}
