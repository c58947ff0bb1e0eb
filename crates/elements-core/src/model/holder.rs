use super::container::Container;
use super::element::Element;
use super::stage::HolderRef;

/// Capability of owning named element relations
///
/// Containers and elements both implement it; the registry is keyed by
/// `owner_type` and the cascade walks children of `holder_ref`.
pub trait HasElementRelations {
    /// Reference children use to point at this owner
    fn holder_ref(&self) -> HolderRef;

    /// Type name used to look up relation configuration
    fn owner_type(&self) -> &str;
}

impl HasElementRelations for Container {
    fn holder_ref(&self) -> HolderRef {
        self.as_holder()
    }

    fn owner_type(&self) -> &str {
        &self.type_name
    }
}

impl HasElementRelations for Element {
    fn holder_ref(&self) -> HolderRef {
        self.as_holder()
    }

    fn owner_type(&self) -> &str {
        &self.type_tag
    }
}

/// A loaded holder: either a root container or another element
#[derive(Debug, Clone, PartialEq)]
pub enum Holder {
    Container(Container),
    Element(Element),
}

impl Holder {
    pub fn id(&self) -> &str {
        match self {
            Holder::Container(c) => &c.id,
            Holder::Element(e) => &e.id,
        }
    }

    /// Whether this is a root (a container, not another element)
    pub fn is_root(&self) -> bool {
        matches!(self, Holder::Container(_))
    }

    /// Parent reference, `None` for containers and unattached elements
    pub fn parent_ref(&self) -> Option<&HolderRef> {
        match self {
            Holder::Container(_) => None,
            Holder::Element(e) => e.holder.as_ref(),
        }
    }
}

impl HasElementRelations for Holder {
    fn holder_ref(&self) -> HolderRef {
        match self {
            Holder::Container(c) => c.holder_ref(),
            Holder::Element(e) => e.holder_ref(),
        }
    }

    fn owner_type(&self) -> &str {
        match self {
            Holder::Container(c) => c.owner_type(),
            Holder::Element(e) => e.owner_type(),
        }
    }
}
