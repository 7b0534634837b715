use atelier_types::{ColorPalette, Design, LayerImage, RecordId, Surface, Tag};

/// A mutation of the local state tree.
///
/// Each variant corresponds to one dispatch message of the application
/// contract; [`Action::name`] returns that message name.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    AddLayerImage(LayerImage),
    AddColorPalette(ColorPalette),
    AddSurface(Surface),
    AddDesign(Design),
    AddManyTags(Vec<Tag>),
    AddManySurfaces(Vec<Surface>),
    AddManyLayerImages(Vec<LayerImage>),
    AddManyColorPalettes(Vec<ColorPalette>),
}

impl Action {
    /// Dispatch message name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddLayerImage(_) => "addLayerImage",
            Self::AddColorPalette(_) => "addColorPalette",
            Self::AddSurface(_) => "addSurface",
            Self::AddDesign(_) => "addDesign",
            Self::AddManyTags(_) => "addManyTags",
            Self::AddManySurfaces(_) => "addManySurfaces",
            Self::AddManyLayerImages(_) => "addManyLayerImages",
            Self::AddManyColorPalettes(_) => "addManyColorPalettes",
        }
    }

    /// Ids of the records this action carries, in order.
    pub fn ids(&self) -> Vec<RecordId> {
        match self {
            Self::AddLayerImage(r) => vec![r.id.clone()],
            Self::AddColorPalette(r) => vec![r.id.clone()],
            Self::AddSurface(r) => vec![r.id.clone()],
            Self::AddDesign(r) => vec![r.id.clone()],
            Self::AddManyTags(rs) => rs.iter().map(|r| r.id.clone()).collect(),
            Self::AddManySurfaces(rs) => rs.iter().map(|r| r.id.clone()).collect(),
            Self::AddManyLayerImages(rs) => rs.iter().map(|r| r.id.clone()).collect(),
            Self::AddManyColorPalettes(rs) => rs.iter().map(|r| r.id.clone()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_match_dispatch_contract() {
        assert_eq!(Action::AddManyTags(vec![]).name(), "addManyTags");
        assert_eq!(Action::AddDesign(Design::default()).name(), "addDesign");
        assert_eq!(
            Action::AddManyColorPalettes(vec![]).name(),
            "addManyColorPalettes"
        );
    }

    #[test]
    fn ids_in_order() {
        let action = Action::AddManyTags(vec![Tag::new("b", "B"), Tag::new("a", "A")]);
        assert_eq!(action.ids(), vec![RecordId::from("b"), RecordId::from("a")]);
    }
}
