//! Table building: arranges a paradigm's singular sequences along its
//! plural multiplicative slots. One plural slot gives a 1D row, two give a
//! 2D rows-by-columns table (substance-major), three give a 3D table with
//! one tab per mode sequence. An additive paradigm whose children are all
//! paradigms decomposes into its children's tables instead.

use serde::Serialize;
use tracing::debug;

use crate::error::{Result, ScriptError};
use crate::script::{Script, ScriptKind};

/// One N-dimensional arrangement of part of a paradigm.
#[derive(Debug, Clone, Serialize)]
pub struct Table {
    /// The (sub-)paradigm this table arranges.
    pub paradigm: Script,
    /// 1, 2 or 3.
    pub dimension: usize,
    /// Headers fixing one tab each; empty below 3D.
    pub tab_headers: Vec<Script>,
    /// Headers fixing one row each; empty for 1D.
    pub row_headers: Vec<Script>,
    /// Headers fixing one column each; empty for 1D.
    pub col_headers: Vec<Script>,
    /// Cells indexed `[tab][row][col]`; every cell has cardinal 1.
    cells: Vec<Vec<Vec<Script>>>,
}

impl Table {
    pub fn cell(&self, tab: usize, row: usize, col: usize) -> Option<&Script> {
        self.cells.get(tab)?.get(row)?.get(col)
    }

    /// All cells, flattened in tab/row/column order.
    pub fn cells(&self) -> impl Iterator<Item = &Script> {
        self.cells.iter().flatten().flatten()
    }

    /// Every header script that is itself a paradigm.
    pub fn plural_headers(&self) -> impl Iterator<Item = &Script> {
        self.tab_headers
            .iter()
            .chain(self.row_headers.iter())
            .chain(self.col_headers.iter())
            .filter(|header| header.is_paradigm())
    }
}

/// The complete table decomposition of one paradigm.
#[derive(Debug, Clone, Serialize)]
pub struct TableSet {
    pub paradigm: Script,
    pub tables: Vec<Table>,
}

impl TableSet {
    /// All cells across all tables; flattened, this equals the paradigm's
    /// singular-sequence set exactly.
    pub fn cells(&self) -> impl Iterator<Item = &Script> {
        self.tables.iter().flat_map(|table| table.cells())
    }
}

/// Builds the table views of a paradigm. A cardinal-1 script is rejected
/// with [`ScriptError::NotAParadigm`].
pub fn build_tables(paradigm: &Script) -> Result<TableSet> {
    if !paradigm.is_paradigm() {
        return Err(ScriptError::NotAParadigm {
            script: paradigm.rendered().to_string(),
        });
    }
    let mut tables = Vec::new();
    collect(paradigm, &mut tables);
    debug!(paradigm = %paradigm, tables = tables.len(), "built tables");
    Ok(TableSet {
        paradigm: paradigm.clone(),
        tables,
    })
}

fn collect(paradigm: &Script, out: &mut Vec<Table>) {
    match paradigm.kind() {
        ScriptKind::Additive { children } if children.iter().all(Script::is_paradigm) => {
            for child in children {
                collect(child, out);
            }
        }
        ScriptKind::Multiplicative {
            substance,
            attribute,
            mode,
        } => out.push(multiplicative_table(paradigm, substance, attribute, mode)),
        // A mixed additive paradigm only lists its sequences.
        _ => out.push(listing_table(paradigm)),
    }
}

fn listing_table(paradigm: &Script) -> Table {
    let row: Vec<Script> = paradigm.singular_sequences().collect();
    Table {
        paradigm: paradigm.clone(),
        dimension: 1,
        tab_headers: Vec::new(),
        row_headers: Vec::new(),
        col_headers: Vec::new(),
        cells: vec![vec![row]],
    }
}

fn with_slots(substance: Script, attribute: Script, mode: Script) -> Script {
    Script::multiplicative(substance, Some(attribute), Some(mode))
        .expect("table slots share the paradigm's layer")
}

/// Replaces the slot at `axis` with `value`, keeping the other two.
fn fix_axis(slots: &[&Script; 3], axis: usize, value: &Script) -> Script {
    let mut fixed = [slots[0].clone(), slots[1].clone(), slots[2].clone()];
    fixed[axis] = value.clone();
    let [substance, attribute, mode] = fixed;
    with_slots(substance, attribute, mode)
}

fn multiplicative_table(
    paradigm: &Script,
    substance: &Script,
    attribute: &Script,
    mode: &Script,
) -> Table {
    let slots = [substance, attribute, mode];
    let plural: Vec<usize> = (0..3).filter(|&i| slots[i].is_paradigm()).collect();
    let expansions: Vec<Vec<Script>> = (0..3)
        .map(|i| slots[i].singular_sequences().collect())
        .collect();
    match plural.as_slice() {
        [axis] => {
            let row: Vec<Script> = expansions[*axis]
                .iter()
                .map(|value| fix_axis(&slots, *axis, value))
                .collect();
            Table {
                paradigm: paradigm.clone(),
                dimension: 1,
                tab_headers: Vec::new(),
                row_headers: Vec::new(),
                col_headers: Vec::new(),
                cells: vec![vec![row]],
            }
        }
        [row_axis, col_axis] => {
            let row_headers: Vec<Script> = expansions[*row_axis]
                .iter()
                .map(|value| fix_axis(&slots, *row_axis, value))
                .collect();
            let col_headers: Vec<Script> = expansions[*col_axis]
                .iter()
                .map(|value| fix_axis(&slots, *col_axis, value))
                .collect();
            let grid: Vec<Vec<Script>> = expansions[*row_axis]
                .iter()
                .map(|row_value| {
                    expansions[*col_axis]
                        .iter()
                        .map(|col_value| {
                            let partial = fix_axis(&slots, *row_axis, row_value);
                            let partial_slots = partial.slots().expect("a multiplicative cell");
                            fix_axis(
                                &[partial_slots.0, partial_slots.1, partial_slots.2],
                                *col_axis,
                                col_value,
                            )
                        })
                        .collect()
                })
                .collect();
            Table {
                paradigm: paradigm.clone(),
                dimension: 2,
                tab_headers: Vec::new(),
                row_headers,
                col_headers,
                cells: vec![grid],
            }
        }
        [0, 1, 2] => {
            let tab_headers: Vec<Script> = expansions[2]
                .iter()
                .map(|value| fix_axis(&slots, 2, value))
                .collect();
            let row_headers: Vec<Script> = expansions[0]
                .iter()
                .map(|value| fix_axis(&slots, 0, value))
                .collect();
            let col_headers: Vec<Script> = expansions[1]
                .iter()
                .map(|value| fix_axis(&slots, 1, value))
                .collect();
            let cells: Vec<Vec<Vec<Script>>> = expansions[2]
                .iter()
                .map(|tab_value| {
                    expansions[0]
                        .iter()
                        .map(|row_value| {
                            expansions[1]
                                .iter()
                                .map(|col_value| {
                                    with_slots(
                                        row_value.clone(),
                                        col_value.clone(),
                                        tab_value.clone(),
                                    )
                                })
                                .collect()
                        })
                        .collect()
                })
                .collect();
            Table {
                paradigm: paradigm.clone(),
                dimension: 3,
                tab_headers,
                row_headers,
                col_headers,
                cells,
            }
        }
        _ => unreachable!("a multiplicative paradigm has 1 to 3 plural slots"),
    }
}

/// Breadth-first decomposition of a root paradigm: the root at depth 0, an
/// additive-of-paradigms node's children or a table's plural headers one
/// level deeper, recursively. Rank computations walk these nodes.
pub(crate) fn decomposition_nodes(root: &Script) -> Vec<(Script, usize)> {
    let mut out: Vec<(Script, usize)> = Vec::new();
    let mut queue: std::collections::VecDeque<(Script, usize)> =
        std::collections::VecDeque::new();
    queue.push_back((root.clone(), 0));
    while let Some((node, depth)) = queue.pop_front() {
        if out.iter().any(|(seen, _)| *seen == node) {
            continue;
        }
        out.push((node.clone(), depth));
        if !node.is_paradigm() {
            continue;
        }
        match node.kind() {
            ScriptKind::Additive { children } if children.iter().all(Script::is_paradigm) => {
                for child in children {
                    queue.push_back((child.clone(), depth + 1));
                }
            }
            _ => {
                let Ok(set) = build_tables(&node) else {
                    continue;
                };
                for table in &set.tables {
                    for header in table.plural_headers() {
                        queue.push_back((header.clone(), depth + 1));
                    }
                }
            }
        }
    }
    out
}
