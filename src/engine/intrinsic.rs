//! Intrinsic tag registry - the closed set of element tags.

use crate::scene::SceneNode;
use crate::types::NodeKind;

/// An intrinsic element: one tag, one node constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intrinsic {
    Container,
    Graphics,
    Sprite,
    Text,
}

impl Intrinsic {
    /// Every intrinsic, in declaration order.
    pub const ALL: [Intrinsic; 4] = [
        Intrinsic::Container,
        Intrinsic::Graphics,
        Intrinsic::Sprite,
        Intrinsic::Text,
    ];

    /// Look up a tag. Exact, case-sensitive match.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "container" => Some(Intrinsic::Container),
            "graphics" => Some(Intrinsic::Graphics),
            "sprite" => Some(Intrinsic::Sprite),
            "text" => Some(Intrinsic::Text),
            _ => None,
        }
    }

    pub const fn tag(self) -> &'static str {
        match self {
            Intrinsic::Container => "container",
            Intrinsic::Graphics => "graphics",
            Intrinsic::Sprite => "sprite",
            Intrinsic::Text => "text",
        }
    }

    pub const fn kind(self) -> NodeKind {
        match self {
            Intrinsic::Container => NodeKind::Container,
            Intrinsic::Graphics => NodeKind::Graphics,
            Intrinsic::Sprite => NodeKind::Sprite,
            Intrinsic::Text => NodeKind::Text,
        }
    }

    /// Construct a fresh, detached node of this kind.
    pub fn create(self) -> SceneNode {
        SceneNode::new(self.kind())
    }

    /// Whether this element accepts a kind-specific prop.
    pub const fn accepts(self, prop: KindProp) -> bool {
        match prop {
            KindProp::Tint => matches!(self, Intrinsic::Sprite | Intrinsic::Text),
            KindProp::Anchor | KindProp::Width | KindProp::Height | KindProp::Texture => {
                matches!(self, Intrinsic::Sprite)
            }
            KindProp::Text | KindProp::FontSize => matches!(self, Intrinsic::Text),
            KindProp::Draw => matches!(self, Intrinsic::Graphics),
        }
    }
}

/// Props that only some intrinsics accept. Every other prop applies to all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KindProp {
    Tint,
    Anchor,
    Width,
    Height,
    Text,
    FontSize,
    Draw,
    Texture,
}

impl KindProp {
    pub const fn as_str(self) -> &'static str {
        match self {
            KindProp::Tint => "tint",
            KindProp::Anchor => "anchor",
            KindProp::Width => "width",
            KindProp::Height => "height",
            KindProp::Text => "text",
            KindProp::FontSize => "font_size",
            KindProp::Draw => "draw",
            KindProp::Texture => "texture",
        }
    }
}

/// Whether `tag` names an intrinsic element.
pub fn is_intrinsic(tag: &str) -> bool {
    Intrinsic::from_tag(tag).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_intrinsic() {
        for tag in ["container", "graphics", "sprite", "text"] {
            assert!(is_intrinsic(tag), "{tag} should be intrinsic");
        }
        for tag in ["UnknownTag", "", "Sprite", "div", "mesh"] {
            assert!(!is_intrinsic(tag), "{tag} should not be intrinsic");
        }
    }

    #[test]
    fn test_tags_round_trip_and_create_matching_kind() {
        for intrinsic in Intrinsic::ALL {
            assert_eq!(Intrinsic::from_tag(intrinsic.tag()), Some(intrinsic));
            assert_eq!(intrinsic.create().kind(), intrinsic.kind());
        }
    }

    #[test]
    fn test_kind_props() {
        assert!(Intrinsic::Sprite.accepts(KindProp::Texture));
        assert!(Intrinsic::Sprite.accepts(KindProp::Tint));
        assert!(Intrinsic::Text.accepts(KindProp::Tint));
        assert!(Intrinsic::Graphics.accepts(KindProp::Draw));

        assert!(!Intrinsic::Container.accepts(KindProp::Tint));
        assert!(!Intrinsic::Graphics.accepts(KindProp::Texture));
        assert!(!Intrinsic::Sprite.accepts(KindProp::FontSize));
        assert!(!Intrinsic::Text.accepts(KindProp::Draw));
    }
}
