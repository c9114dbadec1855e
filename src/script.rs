use std::cmp::Ordering;
use std::fmt;
use std::hash::{BuildHasherDefault, Hash, Hasher};
use std::sync::Arc;

// used to keep the two-way mapping between remarkable codes and their expansions
use bimap::BiMap;

use itertools::Itertools;
use lazy_static::lazy_static;
use seahash::SeaHasher;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ScriptError;

/// One layer mark per layer, 0 through 6.
pub const LAYER_MARKS: [char; 7] = [':', '.', '-', '\'', ',', '_', ';'];
pub const MAX_LAYER: usize = 6;

/// Fast hasher for script-keyed maps and sets.
pub type ScriptHasher = BuildHasherDefault<SeaHasher>;

// ------------- Primitive -------------
/// The six primitive glyphs. `E` is the empty primitive: constructing a
/// script from it yields the layer-0 null script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    E,
    U,
    A,
    S,
    B,
    T,
}

impl Primitive {
    pub const ALL: [Primitive; 6] = [
        Primitive::E,
        Primitive::U,
        Primitive::A,
        Primitive::S,
        Primitive::B,
        Primitive::T,
    ];

    pub fn character(self) -> char {
        match self {
            Primitive::E => 'E',
            Primitive::U => 'U',
            Primitive::A => 'A',
            Primitive::S => 'S',
            Primitive::B => 'B',
            Primitive::T => 'T',
        }
    }

    pub fn from_char(c: char) -> Option<Primitive> {
        match c {
            'E' => Some(Primitive::E),
            'U' => Some(Primitive::U),
            'A' => Some(Primitive::A),
            'S' => Some(Primitive::S),
            'B' => Some(Primitive::B),
            'T' => Some(Primitive::T),
            _ => None,
        }
    }
}

// ------------- Remarkable code tables -------------
lazy_static! {
    /// Layer-0 addition shorthands, keyed both ways: code glyph <-> the
    /// rank-sorted primitive glyphs it expands to.
    static ref ADDITIVE_CODES: BiMap<char, &'static str> = {
        let mut codes = BiMap::new();
        codes.insert('O', "UA");
        codes.insert('M', "SBT");
        codes.insert('F', "UASBT");
        codes.insert('I', "EUASBT");
        codes
    };

    /// Layer-1 multiplication shorthands: code <-> (substance, attribute)
    /// over the non-empty primitives, mode absent.
    static ref MULTIPLICATIVE_CODES: BiMap<&'static str, (char, char)> = {
        let mut codes = BiMap::new();
        for (code, substance, attribute) in [
            ("wo", 'U', 'U'), ("wa", 'U', 'A'), ("y", 'U', 'S'), ("o", 'U', 'B'), ("e", 'U', 'T'),
            ("wu", 'A', 'U'), ("we", 'A', 'A'), ("u", 'A', 'S'), ("a", 'A', 'B'), ("i", 'A', 'T'),
            ("j", 'S', 'U'), ("g", 'S', 'A'), ("s", 'S', 'S'), ("b", 'S', 'B'), ("t", 'S', 'T'),
            ("h", 'B', 'U'), ("c", 'B', 'A'), ("k", 'B', 'S'), ("m", 'B', 'B'), ("n", 'B', 'T'),
            ("p", 'T', 'U'), ("x", 'T', 'A'), ("d", 'T', 'S'), ("f", 'T', 'B'), ("l", 'T', 'T'),
        ] {
            codes.insert(code, (substance, attribute));
        }
        codes
    };
}

/// Rank of a glyph in the canonical alphabet order. Primitives and addition
/// codes interleave by their additive weight (O between A and S, M between
/// T and F); everything else sorts after, by code point.
fn glyph_rank(c: char) -> u32 {
    match c {
        'E' => 0,
        'U' => 1,
        'A' => 2,
        'O' => 3,
        'S' => 4,
        'B' => 5,
        'T' => 6,
        'M' => 7,
        'F' => 8,
        'I' => 9,
        other => 10 + other as u32,
    }
}

/// Compares two canonical renders under the alphabet rank above.
pub(crate) fn compare_rendered(a: &str, b: &str) -> Ordering {
    a.chars().map(glyph_rank).cmp(b.chars().map(glyph_rank))
}

// ------------- Script -------------
/// An immutable algebraic term: a cheaply clonable handle over a node with
/// memoized layer, cardinal and canonical render. Equality, hashing and the
/// total order all key off the render, so structurally equal trees compare
/// equal no matter how they were built.
#[derive(Clone)]
pub struct Script(Arc<Node>);

struct Node {
    kind: ScriptKind,
    layer: usize,
    cardinal: usize,
    rendered: String,
}

/// The shape of a script node.
pub enum ScriptKind {
    /// The empty term at some layer; `E:` at layer 0.
    Null,
    /// A bare non-empty primitive, layer 0.
    Primitive(Primitive),
    /// `substance * attribute * mode`, all three one layer below the node.
    Multiplicative {
        substance: Script,
        attribute: Script,
        mode: Script,
    },
    /// A sorted, duplicate-free union of same-layer children.
    Additive { children: Vec<Script> },
}

impl Script {
    /// The null script of the given layer.
    ///
    /// # Panics
    /// Panics when `layer` exceeds [`MAX_LAYER`].
    pub fn null(layer: usize) -> Script {
        assert!(
            layer <= MAX_LAYER,
            "layer {layer} exceeds the maximum layer {MAX_LAYER}"
        );
        let mut rendered = String::from("E");
        for mark in &LAYER_MARKS[..=layer] {
            rendered.push(*mark);
        }
        Script(Arc::new(Node {
            kind: ScriptKind::Null,
            layer,
            cardinal: 1,
            rendered,
        }))
    }

    /// A layer-0 primitive term. `E` folds into the layer-0 null script.
    pub fn primitive(primitive: Primitive) -> Script {
        if primitive == Primitive::E {
            return Script::null(0);
        }
        let rendered = format!("{}:", primitive.character());
        Script(Arc::new(Node {
            kind: ScriptKind::Primitive(primitive),
            layer: 0,
            cardinal: 1,
            rendered,
        }))
    }

    /// Builds `substance * attribute * mode`. Absent slots default to the
    /// null script of the substance's layer. Returns `None` when the slots
    /// do not share one layer or the result would exceed the layer range.
    /// Three null slots collapse to the null script one layer up.
    pub fn multiplicative(
        substance: Script,
        attribute: Option<Script>,
        mode: Option<Script>,
    ) -> Option<Script> {
        let child_layer = substance.layer();
        if child_layer + 1 > MAX_LAYER {
            return None;
        }
        let attribute = attribute.unwrap_or_else(|| Script::null(child_layer));
        let mode = mode.unwrap_or_else(|| Script::null(child_layer));
        if attribute.layer() != child_layer || mode.layer() != child_layer {
            return None;
        }
        let layer = child_layer + 1;
        if substance.is_null() && attribute.is_null() && mode.is_null() {
            return Some(Script::null(layer));
        }
        let cardinal = substance.cardinal() * attribute.cardinal() * mode.cardinal();
        let rendered = render_multiplicative(&substance, &attribute, &mode, layer);
        Some(Script(Arc::new(Node {
            kind: ScriptKind::Multiplicative {
                substance,
                attribute,
                mode,
            },
            layer,
            cardinal,
            rendered,
        })))
    }

    /// Builds the union of the given children. Additive children are
    /// flattened in, the result is deduplicated and canonically sorted, and
    /// a single remaining child is returned as-is. Returns `None` on an
    /// empty union or mixed layers.
    pub fn additive(children: Vec<Script>) -> Option<Script> {
        let mut flat: Vec<Script> = Vec::with_capacity(children.len());
        for child in children {
            match child.kind() {
                ScriptKind::Additive { children } => flat.extend(children.iter().cloned()),
                _ => flat.push(child),
            }
        }
        let first = flat.first()?;
        let layer = first.layer();
        if flat.iter().any(|c| c.layer() != layer) {
            return None;
        }
        flat.sort();
        flat.dedup();
        if flat.len() == 1 {
            return flat.pop();
        }
        let cardinal = flat.iter().map(|c| c.cardinal()).sum();
        let rendered = render_additive(&flat);
        Some(Script(Arc::new(Node {
            kind: ScriptKind::Additive { children: flat },
            layer,
            cardinal,
            rendered,
        })))
    }

    /// Expands a layer-0 addition shorthand (`O`, `M`, `F`, `I`).
    pub fn remarkable_addition(code: char) -> Option<Script> {
        let glyphs = ADDITIVE_CODES.get_by_left(&code)?;
        let children = glyphs
            .chars()
            .map(|c| Script::primitive(Primitive::from_char(c).unwrap_or(Primitive::E)))
            .collect();
        Script::additive(children)
    }

    /// Expands a layer-1 multiplication shorthand (`wo`, `wa`, ..., `l`).
    pub fn remarkable_multiplication(code: &str) -> Option<Script> {
        let (substance, attribute) = MULTIPLICATIVE_CODES.get_by_left(code)?;
        let substance = Script::primitive(Primitive::from_char(*substance)?);
        let attribute = Script::primitive(Primitive::from_char(*attribute)?);
        Script::multiplicative(substance, Some(attribute), None)
    }

    pub fn kind(&self) -> &ScriptKind {
        &self.0.kind
    }

    /// Recursive nesting depth; 0 for nulls and bare primitives.
    pub fn layer(&self) -> usize {
        self.0.layer
    }

    /// Number of singular sequences this script expands to.
    pub fn cardinal(&self) -> usize {
        self.0.cardinal
    }

    /// The canonical textual form; this is the wire format external layers
    /// persist and display.
    pub fn rendered(&self) -> &str {
        &self.0.rendered
    }

    pub fn is_null(&self) -> bool {
        matches!(self.0.kind, ScriptKind::Null)
    }

    /// A paradigm is any script with more than one singular sequence.
    pub fn is_paradigm(&self) -> bool {
        self.0.cardinal > 1
    }

    /// The three slots of a multiplicative node.
    pub fn slots(&self) -> Option<(&Script, &Script, &Script)> {
        match self.kind() {
            ScriptKind::Multiplicative {
                substance,
                attribute,
                mode,
            } => Some((substance, attribute, mode)),
            _ => None,
        }
    }

    /// Lazily enumerates every singular sequence: one cardinal-1 script per
    /// way of resolving each additive choice in the tree. The iterator is
    /// finite (length == cardinal) and a fresh one is handed out per call.
    pub fn singular_sequences(&self) -> Box<dyn Iterator<Item = Script> + '_> {
        match self.kind() {
            ScriptKind::Null | ScriptKind::Primitive(_) => Box::new(std::iter::once(self.clone())),
            ScriptKind::Additive { children } => {
                Box::new(children.iter().flat_map(|child| child.singular_sequences()))
            }
            ScriptKind::Multiplicative {
                substance,
                attribute,
                mode,
            } => {
                let slots: Vec<Vec<Script>> = [substance, attribute, mode]
                    .into_iter()
                    .map(|slot| slot.singular_sequences().collect())
                    .collect();
                Box::new(slots.into_iter().multi_cartesian_product().map(|combo| {
                    let [substance, attribute, mode]: [Script; 3] =
                        combo.try_into().expect("three slots per combination");
                    Script::multiplicative(substance, Some(attribute), Some(mode))
                        .expect("singular slots share the source layer")
                }))
            }
        }
    }
}

// ------------- Rendering -------------
fn render_multiplicative(
    substance: &Script,
    attribute: &Script,
    mode: &Script,
    layer: usize,
) -> String {
    // Layer-1 pairs of non-empty primitives contract to their code.
    if layer == 1 && mode.is_null() {
        if let (ScriptKind::Primitive(s), ScriptKind::Primitive(a)) =
            (substance.kind(), attribute.kind())
        {
            if let Some(code) = MULTIPLICATIVE_CODES.get_by_right(&(s.character(), a.character())) {
                return format!("{}{}", code, LAYER_MARKS[1]);
            }
        }
    }
    let mut out = String::new();
    out.push_str(substance.rendered());
    if !attribute.is_null() || !mode.is_null() {
        out.push_str(attribute.rendered());
    }
    if !mode.is_null() {
        out.push_str(mode.rendered());
    }
    out.push(LAYER_MARKS[layer]);
    out
}

fn render_additive(children: &[Script]) -> String {
    // A layer-0 union that is exactly a shorthand expansion contracts.
    if children[0].layer() == 0 {
        let glyphs: String = children
            .iter()
            .map(|child| match child.kind() {
                ScriptKind::Primitive(p) => p.character(),
                _ => 'E',
            })
            .collect();
        if let Some(code) = ADDITIVE_CODES.get_by_right(glyphs.as_str()) {
            return format!("{}:", code);
        }
    }
    children
        .iter()
        .map(|child| child.rendered())
        .collect::<Vec<_>>()
        .join("+")
}

// ------------- Equality, ordering, hashing -------------
impl PartialEq for Script {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.rendered == other.0.rendered
    }
}
impl Eq for Script {}

impl Hash for Script {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.rendered.hash(state);
    }
}

impl Ord for Script {
    /// Total order used for canonical sorting: layer first, then cardinal,
    /// then the render under the alphabet rank. Sorting the six primitives
    /// yields `E U A S B T`.
    fn cmp(&self, other: &Self) -> Ordering {
        self.layer()
            .cmp(&other.layer())
            .then(self.cardinal().cmp(&other.cardinal()))
            .then_with(|| compare_rendered(self.rendered(), other.rendered()))
    }
}
impl PartialOrd for Script {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0.rendered)
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Script({})", self.0.rendered)
    }
}

// ------------- Serde (wire format is the render) -------------
impl Serialize for Script {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.rendered())
    }
}

impl<'de> Deserialize<'de> for Script {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        crate::grammar::parse_script(&text).map_err(serde::de::Error::custom)
    }
}

impl std::str::FromStr for Script {
    type Err = ScriptError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::grammar::parse_script(s)
    }
}
