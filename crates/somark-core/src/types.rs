//! Element type tags and tag sets.

use std::fmt;

use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};

/// Semantic type of a marked element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementType {
    Text,
    Code,
    Image,
    Icon,
    Button,
    Href,
    InputBox,
    SelectBox,
    CheckBox,
    ComboBox,
    Video,
    Interactive,
    Clickable,
}

impl ElementType {
    pub const ALL: [ElementType; 13] = [
        ElementType::Text,
        ElementType::Code,
        ElementType::Image,
        ElementType::Icon,
        ElementType::Button,
        ElementType::Href,
        ElementType::InputBox,
        ElementType::SelectBox,
        ElementType::CheckBox,
        ElementType::ComboBox,
        ElementType::Video,
        ElementType::Interactive,
        ElementType::Clickable,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ElementType::Text => "Text",
            ElementType::Code => "Code",
            ElementType::Image => "Image",
            ElementType::Icon => "Icon",
            ElementType::Button => "Button",
            ElementType::Href => "Href",
            ElementType::InputBox => "InputBox",
            ElementType::SelectBox => "SelectBox",
            ElementType::CheckBox => "CheckBox",
            ElementType::ComboBox => "ComboBox",
            ElementType::Video => "Video",
            ElementType::Interactive => "Interactive",
            ElementType::Clickable => "Clickable",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

bitflags::bitflags! {
    /// A set of [`ElementType`]s.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TypeSet: u16 {
        const TEXT = 1 << 0;
        const CODE = 1 << 1;
        const IMAGE = 1 << 2;
        const ICON = 1 << 3;
        const BUTTON = 1 << 4;
        const HREF = 1 << 5;
        const INPUT_BOX = 1 << 6;
        const SELECT_BOX = 1 << 7;
        const CHECK_BOX = 1 << 8;
        const COMBO_BOX = 1 << 9;
        const VIDEO = 1 << 10;
        const INTERACTIVE = 1 << 11;
        const CLICKABLE = 1 << 12;
    }
}

impl From<ElementType> for TypeSet {
    fn from(ty: ElementType) -> Self {
        match ty {
            ElementType::Text => TypeSet::TEXT,
            ElementType::Code => TypeSet::CODE,
            ElementType::Image => TypeSet::IMAGE,
            ElementType::Icon => TypeSet::ICON,
            ElementType::Button => TypeSet::BUTTON,
            ElementType::Href => TypeSet::HREF,
            ElementType::InputBox => TypeSet::INPUT_BOX,
            ElementType::SelectBox => TypeSet::SELECT_BOX,
            ElementType::CheckBox => TypeSet::CHECK_BOX,
            ElementType::ComboBox => TypeSet::COMBO_BOX,
            ElementType::Video => TypeSet::VIDEO,
            ElementType::Interactive => TypeSet::INTERACTIVE,
            ElementType::Clickable => TypeSet::CLICKABLE,
        }
    }
}

impl TypeSet {
    pub fn has(self, ty: ElementType) -> bool {
        self.contains(TypeSet::from(ty))
    }

    pub fn is_subset_of(self, other: TypeSet) -> bool {
        other.contains(self)
    }

    pub fn len(self) -> usize {
        self.bits().count_ones() as usize
    }

    /// Members in declaration order.
    pub fn types(self) -> impl Iterator<Item = ElementType> {
        ElementType::ALL.into_iter().filter(move |ty| self.has(*ty))
    }

    pub fn names(self) -> Vec<String> {
        self.types().map(|ty| ty.name().to_string()).collect()
    }
}

impl FromIterator<ElementType> for TypeSet {
    fn from_iter<I: IntoIterator<Item = ElementType>>(iter: I) -> Self {
        iter.into_iter()
            .fold(TypeSet::empty(), |set, ty| set | TypeSet::from(ty))
    }
}

impl Serialize for TypeSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for ty in self.types() {
            seq.serialize_element(ty.name())?;
        }
        seq.end()
    }
}
