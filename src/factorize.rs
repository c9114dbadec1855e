//! Factorization: rewrites a script into a reduced form with the exact
//! same singular-sequence set, by greedily fusing additive siblings that
//! agree on two multiplicative slots. `a*x + a*y` becomes `a*(x+y)`; the
//! fused varying slot is factorized again. The result is idempotent under
//! re-application but not guaranteed globally minimal.

use std::collections::HashMap;

use tracing::trace;

use crate::script::{Script, ScriptHasher, ScriptKind};

/// Slot that varies inside one merge group; the other two are held fixed.
/// Groups are tried in this order, substance first.
const VARYING_SLOTS: [usize; 3] = [0, 1, 2];

/// Returns the factorized form of `script`. Total and pure: a script with
/// no grouping opportunity comes back unchanged (and equal to the input).
pub fn factorize(script: &Script) -> Script {
    match script.kind() {
        ScriptKind::Null | ScriptKind::Primitive(_) => script.clone(),
        ScriptKind::Multiplicative {
            substance,
            attribute,
            mode,
        } => Script::multiplicative(
            factorize(substance),
            Some(factorize(attribute)),
            Some(factorize(mode)),
        )
        .expect("factorization preserves layers"),
        ScriptKind::Additive { children } => factorize_additive(children),
    }
}

fn factorize_additive(children: &[Script]) -> Script {
    let mut terms: Vec<Script> = children.iter().map(factorize).collect();
    loop {
        let merged = VARYING_SLOTS
            .into_iter()
            .any(|varying| merge_pass(&mut terms, varying));
        if !merged {
            break;
        }
    }
    Script::additive(terms).expect("factorization keeps at least one term")
}

/// Fuses the first group of two or more multiplicative terms that agree on
/// both slots other than `varying`. Returns whether a fusion happened.
fn merge_pass(terms: &mut Vec<Script>, varying: usize) -> bool {
    let mut groups: HashMap<(String, String), Vec<usize>, ScriptHasher> = HashMap::default();
    for (index, term) in terms.iter().enumerate() {
        if let Some((substance, attribute, mode)) = term.slots() {
            let slots = [substance, attribute, mode];
            let fixed: Vec<&Script> = (0..3).filter(|i| *i != varying).map(|i| slots[i]).collect();
            groups
                .entry((
                    fixed[0].rendered().to_string(),
                    fixed[1].rendered().to_string(),
                ))
                .or_default()
                .push(index);
        }
    }
    let Some(group) = groups
        .into_values()
        .filter(|members| members.len() > 1)
        .min_by_key(|members| members[0])
    else {
        return false;
    };
    let varying_union: Vec<Script> = group
        .iter()
        .map(|&i| {
            let (substance, attribute, mode) = terms[i].slots().expect("grouped terms multiply");
            [substance, attribute, mode][varying].clone()
        })
        .collect();
    let union = Script::additive(varying_union).expect("a group has at least two slots");
    let union = factorize(&union);
    let (substance, attribute, mode) = terms[group[0]]
        .slots()
        .expect("grouped terms multiply");
    let mut slots = [substance.clone(), attribute.clone(), mode.clone()];
    slots[varying] = union;
    let [substance, attribute, mode] = slots;
    let merged = Script::multiplicative(substance, Some(attribute), Some(mode))
        .expect("fused slots share the group's layer");
    trace!(fused = %merged, members = group.len(), "fused additive siblings");
    for &index in group.iter().rev() {
        terms.remove(index);
    }
    terms.push(merged);
    true
}
