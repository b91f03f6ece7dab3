use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::math::MathNode;

bitflags! {
    /// Style flags carried by an [`InlineRun`]. Compact bitset, the same
    /// idiom the teacher uses for its own token/syntax flag sets.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct InlineStyle: u8 {
        const BOLD          = 1 << 0;
        const ITALIC        = 1 << 1;
        const CODE          = 1 << 2;
        const STRIKETHROUGH = 1 << 3;
        const LINK          = 1 << 4;
        const MATH          = 1 << 5;
    }
}

/// An image reference attached to an [`InlineRun`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    pub alt: String,
    pub src: String,
}

/// The structured payload attached to an inline (`$...$`, `\(...\)`) or
/// block (`$$...$$`, `\[...\]`) math run, produced by the math sub-parser
/// (`spec.md` §4.3).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MathPayload {
    pub tex: String,
    pub display: bool,
    pub node: MathNode,
}

/// A maximal span of adjacent characters sharing identical style, link
/// target, image, and math payload (`spec.md` glossary).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InlineRun {
    pub text: String,
    pub style: InlineStyle,
    pub link_url: Option<String>,
    pub image: Option<ImageRef>,
    pub math: Option<MathPayload>,
}

impl InlineRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: InlineStyle::empty(),
            link_url: None,
            image: None,
            math: None,
        }
    }

    pub fn styled(text: impl Into<String>, style: InlineStyle) -> Self {
        Self {
            text: text.into(),
            style,
            link_url: None,
            image: None,
            math: None,
        }
    }

    pub fn link(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: InlineStyle::LINK,
            link_url: Some(url.into()),
            image: None,
            math: None,
        }
    }

    pub fn image(alt: impl Into<String>, src: impl Into<String>) -> Self {
        Self {
            text: String::new(),
            style: InlineStyle::empty(),
            link_url: None,
            image: Some(ImageRef {
                alt: alt.into(),
                src: src.into(),
            }),
            math: None,
        }
    }

    pub fn math(tex: impl Into<String>, display: bool, node: MathNode) -> Self {
        let tex = tex.into();
        Self {
            text: tex.clone(),
            style: InlineStyle::MATH,
            link_url: None,
            image: None,
            math: Some(MathPayload { tex, display, node }),
        }
    }

    pub fn byte_len(&self) -> usize {
        self.text.len()
    }
}

/// Two runs are coalescable iff their `style`, `link_url`, and `image` are
/// all equal **and** neither carries a `math` payload (`spec.md` §3,
/// property law 6).
pub fn is_coalescable(a: &InlineRun, b: &InlineRun) -> bool {
    a.math.is_none() && b.math.is_none() && a.style == b.style && a.link_url == b.link_url && a.image == b.image
}

/// Appends `incoming` onto `existing`, merging each incoming run into the
/// preceding one when `coalesce` is enabled and the pair is coalescable.
/// Returns the number of *input* runs accepted, including ones that merged,
/// matching the `runsAppended` accounting in `spec.md` §4.5.
pub(crate) fn append_coalescing(existing: &mut Vec<InlineRun>, incoming: Vec<InlineRun>, coalesce: bool) -> usize {
    let mut accepted = 0;
    for run in incoming {
        accepted += 1;
        if coalesce {
            if let Some(last) = existing.last_mut() {
                if is_coalescable(last, &run) {
                    last.text.push_str(&run.text);
                    continue;
                }
            }
        }
        existing.push(run);
    }
    accepted
}
