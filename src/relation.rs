//! Relation kinds and the structural sibling matchers. The kinds form a
//! closed enum with a total inverse, a display name and a name parser;
//! sibling matching works on the parsed tree, never on the rendered text.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScriptError};
use crate::script::Script;

/// A named, directed relation between two scripts in a dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationKind {
    /// Terms under the same root whose sequence set strictly contains this one's.
    Contains,
    /// Terms under the same root whose sequence set this one strictly contains.
    Contained,
    /// Substance and attribute swapped, same mode.
    OpposedSibling,
    /// Same substance and attribute, different mode.
    AssociatedSibling,
    /// Substance opposed to the other's attribute and vice versa (layer >= 2).
    CrossedSibling,
    /// Substance equal to attribute; twins of one layer all relate.
    TwinSibling,
    FatherSubstance,
    FatherAttribute,
    FatherMode,
    ChildSubstance,
    ChildAttribute,
    ChildMode,
}

impl RelationKind {
    pub const ALL: [RelationKind; 12] = [
        RelationKind::Contains,
        RelationKind::Contained,
        RelationKind::OpposedSibling,
        RelationKind::AssociatedSibling,
        RelationKind::CrossedSibling,
        RelationKind::TwinSibling,
        RelationKind::FatherSubstance,
        RelationKind::FatherAttribute,
        RelationKind::FatherMode,
        RelationKind::ChildSubstance,
        RelationKind::ChildAttribute,
        RelationKind::ChildMode,
    ];

    /// The inverse kind: `b in R(a)` if and only if `a in inverse(R)(b)`.
    pub fn inverse(self) -> RelationKind {
        match self {
            RelationKind::Contains => RelationKind::Contained,
            RelationKind::Contained => RelationKind::Contains,
            RelationKind::OpposedSibling => RelationKind::OpposedSibling,
            RelationKind::AssociatedSibling => RelationKind::AssociatedSibling,
            RelationKind::CrossedSibling => RelationKind::CrossedSibling,
            RelationKind::TwinSibling => RelationKind::TwinSibling,
            RelationKind::FatherSubstance => RelationKind::ChildSubstance,
            RelationKind::FatherAttribute => RelationKind::ChildAttribute,
            RelationKind::FatherMode => RelationKind::ChildMode,
            RelationKind::ChildSubstance => RelationKind::FatherSubstance,
            RelationKind::ChildAttribute => RelationKind::FatherAttribute,
            RelationKind::ChildMode => RelationKind::FatherMode,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            RelationKind::Contains => "contains",
            RelationKind::Contained => "contained",
            RelationKind::OpposedSibling => "opposed",
            RelationKind::AssociatedSibling => "associated",
            RelationKind::CrossedSibling => "crossed",
            RelationKind::TwinSibling => "twin",
            RelationKind::FatherSubstance => "father-substance",
            RelationKind::FatherAttribute => "father-attribute",
            RelationKind::FatherMode => "father-mode",
            RelationKind::ChildSubstance => "child-substance",
            RelationKind::ChildAttribute => "child-attribute",
            RelationKind::ChildMode => "child-mode",
        }
    }

    pub fn parse_kind(name: &str) -> Result<RelationKind> {
        RelationKind::ALL
            .into_iter()
            .find(|kind| kind.display_name() == name)
            .ok_or_else(|| ScriptError::UnknownRelationKind {
                name: name.to_string(),
            })
    }
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ------------- Structural matchers -------------

/// The opposed form: substance and attribute swapped, mode kept. None when
/// the script does not multiply or its attribute is empty.
pub(crate) fn opposed_form(script: &Script) -> Option<Script> {
    let (substance, attribute, mode) = script.slots()?;
    if attribute.is_null() {
        return None;
    }
    Script::multiplicative(attribute.clone(), Some(substance.clone()), Some(mode.clone()))
}

/// The crossed form: `(a*b)*(c*d)*m` becomes `(d*c)*(b*a)*m`. Defined from
/// layer 2 up, when both substance and attribute have an opposed form.
pub(crate) fn crossed_form(script: &Script) -> Option<Script> {
    if script.layer() < 2 {
        return None;
    }
    let (substance, attribute, mode) = script.slots()?;
    let new_substance = opposed_form(attribute)?;
    let new_attribute = opposed_form(substance)?;
    Script::multiplicative(new_substance, Some(new_attribute), Some(mode.clone()))
}

/// Twins carry the same script in substance and attribute.
pub(crate) fn is_twin(script: &Script) -> bool {
    match script.slots() {
        Some((substance, attribute, _)) => !substance.is_null() && substance == attribute,
        None => false,
    }
}

/// Associated siblings agree on substance and attribute and differ in mode.
pub(crate) fn are_associated(a: &Script, b: &Script) -> bool {
    match (a.slots(), b.slots()) {
        (Some((sa, aa, ma)), Some((sb, ab, mb))) => sa == sb && aa == ab && ma != mb,
        _ => false,
    }
}
