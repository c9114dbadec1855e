//! The dictionary aggregate: an immutable, versioned snapshot of every
//! known script together with its derived table, rank and relation
//! indices. Building is the single batch write step; afterwards every
//! query borrows `&self`, so readers never block each other.

use std::collections::{HashMap, HashSet};

// used to keep the one-to-one mapping between scripts and their dense ids
use bimap::BiMap;
// id sets double as relation result sets and sequence membership sets
use roaring::RoaringBitmap;
use tracing::{debug, info, info_span};

use crate::error::{Result, ScriptError};
use crate::relation::{self, RelationKind};
use crate::script::{Script, ScriptHasher};
use crate::table::{TableSet, build_tables, decomposition_nodes};

pub type ScriptId = u32;

/// One term handed to [`Dictionary::build`]: the script, whether it is a
/// root paradigm, and the relation kinds inhibited for it.
#[derive(Debug, Clone)]
pub struct TermEntry {
    pub script: Script,
    pub root: bool,
    pub inhibitions: Vec<RelationKind>,
}

impl TermEntry {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            root: false,
            inhibitions: Vec::new(),
        }
    }
    pub fn root(mut self) -> Self {
        self.root = true;
        self
    }
    pub fn inhibit(mut self, kind: RelationKind) -> Self {
        self.inhibitions.push(kind);
        self
    }
}

/// An immutable snapshot of a script corpus with its derived indices.
pub struct Dictionary {
    version: String,
    fingerprint: String,
    // canonical order; the position of a script is its id
    scripts: Vec<Script>,
    ids: BiMap<Script, ScriptId>,
    roots: RoaringBitmap,
    root_of: Vec<ScriptId>,
    ranks: Vec<usize>,
    inhibitions: HashMap<ScriptId, HashSet<RelationKind>, ScriptHasher>,
    tables: HashMap<ScriptId, TableSet, ScriptHasher>,
    relations: HashMap<(ScriptId, RelationKind), RoaringBitmap, ScriptHasher>,
}

impl std::fmt::Debug for Dictionary {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "Dictionary({}, {} scripts, {})",
            self.version,
            self.scripts.len(),
            self.fingerprint
        )
    }
}

impl Dictionary {
    /// Builds a snapshot from the given terms. Validates that scripts are
    /// distinct and that every flagged root is a paradigm; assigns each
    /// term to the most specific root whose sequence set covers it (a term
    /// covered by none is its own trivial root); then derives tables,
    /// ranks and the full relation index in one batch.
    pub fn build(version: impl Into<String>, mut entries: Vec<TermEntry>) -> Result<Dictionary> {
        let version = version.into();
        let span = info_span!("dictionary_build", version = %version);
        let _guard = span.enter();

        entries.sort_by(|a, b| a.script.cmp(&b.script));
        for window in entries.windows(2) {
            if window[0].script == window[1].script {
                return Err(ScriptError::Build(format!(
                    "duplicate script {}",
                    window[0].script.rendered()
                )));
            }
        }

        let scripts: Vec<Script> = entries.iter().map(|e| e.script.clone()).collect();
        let mut ids: BiMap<Script, ScriptId> = BiMap::new();
        for (index, script) in scripts.iter().enumerate() {
            ids.insert(script.clone(), index as ScriptId);
        }

        let mut hasher = blake3::Hasher::new();
        for script in &scripts {
            hasher.update(script.rendered().as_bytes());
            hasher.update(b"\n");
        }
        let fingerprint = hasher.finalize().to_hex().to_string();

        let mut roots = RoaringBitmap::new();
        let mut inhibitions: HashMap<ScriptId, HashSet<RelationKind>, ScriptHasher> =
            HashMap::default();
        for (index, entry) in entries.iter().enumerate() {
            if entry.root {
                if !entry.script.is_paradigm() {
                    return Err(ScriptError::NotAParadigm {
                        script: entry.script.rendered().to_string(),
                    });
                }
                roots.insert(index as ScriptId);
            }
            if !entry.inhibitions.is_empty() {
                inhibitions
                    .entry(index as ScriptId)
                    .or_default()
                    .extend(entry.inhibitions.iter().copied());
            }
        }

        // Intern every singular sequence so sequence sets become bitmaps.
        let mut sequence_ids: BiMap<Script, u32> = BiMap::new();
        let mut sequence_sets: Vec<RoaringBitmap> = Vec::with_capacity(scripts.len());
        for script in &scripts {
            let mut set = RoaringBitmap::new();
            for sequence in script.singular_sequences() {
                let id = match sequence_ids.get_by_left(&sequence) {
                    Some(id) => *id,
                    None => {
                        let id = sequence_ids.len() as u32;
                        sequence_ids.insert(sequence, id);
                        id
                    }
                };
                set.insert(id);
            }
            sequence_sets.push(set);
        }
        debug!(
            scripts = scripts.len(),
            sequences = sequence_ids.len(),
            "interned singular sequences"
        );

        // Most specific covering root per term.
        let mut root_of: Vec<ScriptId> = Vec::with_capacity(scripts.len());
        for index in 0..scripts.len() {
            let id = index as ScriptId;
            if roots.contains(id) {
                root_of.push(id);
                continue;
            }
            let covering = roots
                .iter()
                .filter(|&r| sequence_sets[index].is_subset(&sequence_sets[r as usize]))
                .min_by_key(|&r| scripts[r as usize].cardinal());
            root_of.push(covering.unwrap_or(id));
        }

        let mut tables: HashMap<ScriptId, TableSet, ScriptHasher> = HashMap::default();
        for (index, script) in scripts.iter().enumerate() {
            if script.is_paradigm() {
                tables.insert(index as ScriptId, build_tables(script)?);
            }
        }

        // Decompose each flagged root once; rank walks the nodes.
        let mut decompositions: HashMap<ScriptId, Vec<(Script, usize, RoaringBitmap)>, ScriptHasher> =
            HashMap::default();
        for root in roots.iter() {
            let nodes = decomposition_nodes(&scripts[root as usize])
                .into_iter()
                .map(|(node, depth)| {
                    let mut set = RoaringBitmap::new();
                    for sequence in node.singular_sequences() {
                        let id = sequence_ids
                            .get_by_left(&sequence)
                            .expect("decomposition sequences come from the root");
                        set.insert(*id);
                    }
                    (node, depth, set)
                })
                .collect();
            decompositions.insert(root, nodes);
        }

        let mut ranks: Vec<usize> = Vec::with_capacity(scripts.len());
        for index in 0..scripts.len() {
            let id = index as ScriptId;
            let root = root_of[index];
            if root == id {
                ranks.push(0);
                continue;
            }
            let nodes = decompositions
                .get(&root)
                .expect("every non-trivial root is decomposed");
            let rank = match nodes.iter().find(|(node, _, _)| *node == scripts[index]) {
                Some((_, depth, _)) => *depth,
                None => nodes
                    .iter()
                    .filter(|(_, _, set)| {
                        sequence_sets[index].len() < set.len()
                            && sequence_sets[index].is_subset(set)
                    })
                    .map(|(_, depth, _)| *depth)
                    .max()
                    .map_or(0, |deepest| deepest + 1),
            };
            ranks.push(rank);
        }

        let mut relations: HashMap<(ScriptId, RelationKind), RoaringBitmap, ScriptHasher> =
            HashMap::default();
        let relate = |rel: &mut HashMap<(ScriptId, RelationKind), RoaringBitmap, ScriptHasher>,
                          a: ScriptId,
                          kind: RelationKind,
                          b: ScriptId| {
            if a == b {
                return;
            }
            let blocked = |id: ScriptId, k: RelationKind| {
                inhibitions.get(&id).is_some_and(|set| set.contains(&k))
            };
            if blocked(a, kind) || blocked(b, kind.inverse()) {
                return;
            }
            rel.entry((a, kind)).or_default().insert(b);
            rel.entry((b, kind.inverse())).or_default().insert(a);
        };

        // Containment, per shared root.
        let mut members: HashMap<ScriptId, Vec<ScriptId>, ScriptHasher> = HashMap::default();
        for (index, root) in root_of.iter().enumerate() {
            members.entry(*root).or_default().push(index as ScriptId);
        }
        for group in members.values() {
            for (i, &a) in group.iter().enumerate() {
                for &b in &group[i + 1..] {
                    let (sa, sb) = (&sequence_sets[a as usize], &sequence_sets[b as usize]);
                    if sa.len() < sb.len() && sa.is_subset(sb) {
                        relate(&mut relations, a, RelationKind::Contains, b);
                    } else if sb.len() < sa.len() && sb.is_subset(sa) {
                        relate(&mut relations, b, RelationKind::Contains, a);
                    }
                }
            }
        }

        // Opposed and crossed siblings via computed counterparts.
        for (index, script) in scripts.iter().enumerate() {
            if let Some(counterpart) = relation::opposed_form(script) {
                if let Some(&other) = ids.get_by_left(&counterpart) {
                    relate(&mut relations, index as ScriptId, RelationKind::OpposedSibling, other);
                }
            }
            if let Some(counterpart) = relation::crossed_form(script) {
                if let Some(&other) = ids.get_by_left(&counterpart) {
                    relate(&mut relations, index as ScriptId, RelationKind::CrossedSibling, other);
                }
            }
        }

        // Twins pair up within one layer.
        let mut twins: HashMap<usize, Vec<ScriptId>, ScriptHasher> = HashMap::default();
        for (index, script) in scripts.iter().enumerate() {
            if relation::is_twin(script) {
                twins.entry(script.layer()).or_default().push(index as ScriptId);
            }
        }
        for group in twins.values() {
            for (i, &a) in group.iter().enumerate() {
                for &b in &group[i + 1..] {
                    relate(&mut relations, a, RelationKind::TwinSibling, b);
                }
            }
        }

        // Associated siblings share substance and attribute.
        let mut cores: HashMap<(String, String), Vec<ScriptId>, ScriptHasher> = HashMap::default();
        for (index, script) in scripts.iter().enumerate() {
            if let Some((substance, attribute, _)) = script.slots() {
                cores
                    .entry((
                        substance.rendered().to_string(),
                        attribute.rendered().to_string(),
                    ))
                    .or_default()
                    .push(index as ScriptId);
            }
        }
        for group in cores.values() {
            for (i, &a) in group.iter().enumerate() {
                for &b in &group[i + 1..] {
                    if relation::are_associated(&scripts[a as usize], &scripts[b as usize]) {
                        relate(&mut relations, a, RelationKind::AssociatedSibling, b);
                    }
                }
            }
        }

        // One-hop fathers through the multiplicative decomposition.
        for (index, script) in scripts.iter().enumerate() {
            if let Some((substance, attribute, mode)) = script.slots() {
                for (slot, kind) in [
                    (substance, RelationKind::FatherSubstance),
                    (attribute, RelationKind::FatherAttribute),
                    (mode, RelationKind::FatherMode),
                ] {
                    if slot.is_null() {
                        continue;
                    }
                    if let Some(&father) = ids.get_by_left(slot) {
                        relate(&mut relations, index as ScriptId, kind, father);
                    }
                }
            }
        }

        info!(
            scripts = scripts.len(),
            roots = roots.len(),
            relations = relations.len(),
            %fingerprint,
            "dictionary built"
        );
        Ok(Dictionary {
            version,
            fingerprint,
            scripts,
            ids,
            roots,
            root_of,
            ranks,
            inhibitions,
            tables,
            relations,
        })
    }

    /// The caller-supplied snapshot identifier.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Content hash over the canonically ordered renders; two dictionaries
    /// with the same scripts share a fingerprint whatever their versions.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }

    /// Every known script, in canonical order.
    pub fn scripts(&self) -> &[Script] {
        &self.scripts
    }

    pub fn contains_script(&self, script: &Script) -> bool {
        self.ids.contains_left(script)
    }

    fn id_of(&self, script: &Script) -> Result<ScriptId> {
        self.ids
            .get_by_left(script)
            .copied()
            .ok_or_else(|| ScriptError::TermNotFound {
                script: script.rendered().to_string(),
            })
    }

    /// The flagged root paradigms, in canonical order.
    pub fn root_paradigms(&self) -> Vec<&Script> {
        self.roots
            .iter()
            .map(|id| &self.scripts[id as usize])
            .collect()
    }

    /// The root paradigm a term belongs to; a term covered by no flagged
    /// root is its own root.
    pub fn root_of(&self, script: &Script) -> Result<&Script> {
        let id = self.id_of(script)?;
        Ok(&self.scripts[self.root_of[id as usize] as usize])
    }

    /// All terms grouped under the given flagged root, the root excluded.
    pub fn terms_of_root(&self, root: &Script) -> Result<Vec<&Script>> {
        let id = self.id_of(root)?;
        if !self.roots.contains(id) {
            return Err(ScriptError::NotARootParadigm {
                script: root.rendered().to_string(),
            });
        }
        Ok(self
            .root_of
            .iter()
            .enumerate()
            .filter(|(index, r)| **r == id && *index as ScriptId != id)
            .map(|(index, _)| &self.scripts[index])
            .collect())
    }

    /// The paradigm members under the given flagged root.
    pub fn paradigms_of_root(&self, root: &Script) -> Result<Vec<&Script>> {
        Ok(self
            .terms_of_root(root)?
            .into_iter()
            .filter(|s| s.is_paradigm())
            .collect())
    }

    /// The table decomposition of a known paradigm.
    pub fn table_for(&self, script: &Script) -> Result<&TableSet> {
        let id = self.id_of(script)?;
        self.tables.get(&id).ok_or_else(|| ScriptError::NotAParadigm {
            script: script.rendered().to_string(),
        })
    }

    /// Nesting depth of the term in its root's table decomposition; the
    /// root itself is rank 0.
    pub fn rank_of(&self, script: &Script) -> Result<usize> {
        let id = self.id_of(script)?;
        Ok(self.ranks[id as usize])
    }

    /// The relation kinds inhibited for a term.
    pub fn inhibitions_of(&self, script: &Script) -> Result<Vec<RelationKind>> {
        let id = self.id_of(script)?;
        Ok(self
            .inhibitions
            .get(&id)
            .map(|set| {
                let mut kinds: Vec<RelationKind> = set.iter().copied().collect();
                kinds.sort_by_key(|k| k.display_name());
                kinds
            })
            .unwrap_or_default())
    }

    /// All terms related to `script` under `kind`, in canonical order.
    /// Inhibited kinds always report the empty set.
    pub fn relations(&self, script: &Script, kind: RelationKind) -> Result<Vec<Script>> {
        let id = self.id_of(script)?;
        Ok(self
            .relations
            .get(&(id, kind))
            .map(|set| {
                set.iter()
                    .map(|other| self.scripts[other as usize].clone())
                    .collect()
            })
            .unwrap_or_default())
    }
}
