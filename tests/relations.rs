use seme::error::ScriptError;
use seme::script::Script;
use seme::{Dictionary, RelationKind, TermEntry, parse_script};

fn script(text: &str) -> Script {
    parse_script(text).expect(text)
}

fn small_dictionary() -> Dictionary {
    let entries = vec![
        TermEntry::new(script("O:M:.M:M:.-")).root(),
        TermEntry::new(script("U:S:.M:M:.-")),
        TermEntry::new(script("U:S:.S:S:.-")),
        TermEntry::new(script("S:S:.U:S:.-")),
        TermEntry::new(script("U:S:.U:S:.-")),
        TermEntry::new(script("S:S:.S:S:.-")),
        TermEntry::new(script("U:S:.S:B:.-")),
        TermEntry::new(script("U:S:.")),
        TermEntry::new(script("S:S:.")),
    ];
    Dictionary::build("1.0.0", entries).expect("build ok")
}

#[test]
fn every_relation_kind_is_symmetric_under_its_inverse() {
    let dictionary = small_dictionary();
    for a in dictionary.scripts() {
        for kind in RelationKind::ALL {
            for b in dictionary.relations(a, kind).expect("relations") {
                let back = dictionary.relations(&b, kind.inverse()).expect("relations");
                assert!(
                    back.contains(a),
                    "{b} should carry {} back to {a}",
                    kind.inverse()
                );
            }
        }
    }
}

#[test]
fn no_script_relates_to_itself() {
    let dictionary = small_dictionary();
    for a in dictionary.scripts() {
        for kind in RelationKind::ALL {
            assert!(
                !dictionary.relations(a, kind).expect("relations").contains(a),
                "{a} must not be its own {kind}"
            );
        }
    }
}

#[test]
fn opposed_siblings_swap_substance_and_attribute() {
    let dictionary = small_dictionary();
    let opposed = dictionary
        .relations(&script("U:S:.S:S:.-"), RelationKind::OpposedSibling)
        .expect("relations");
    assert_eq!(opposed, vec![script("S:S:.U:S:.-")]);
}

#[test]
fn a_symmetric_product_has_no_opposed_sibling() {
    let entries = vec![
        TermEntry::new(script("O:O:.O:O:.-")).root(),
        TermEntry::new(script("O:O:.")),
    ];
    let dictionary = Dictionary::build("1.0.0", entries).expect("build ok");
    // Swapping substance and attribute gives the script itself, never a sibling.
    let opposed = dictionary
        .relations(&script("O:O:.O:O:.-"), RelationKind::OpposedSibling)
        .expect("relations");
    assert!(opposed.is_empty());
}

#[test]
fn twin_siblings_share_substance_and_attribute_within_a_layer() {
    let dictionary = small_dictionary();
    let twins = dictionary
        .relations(&script("U:S:.U:S:.-"), RelationKind::TwinSibling)
        .expect("relations");
    assert_eq!(twins, vec![script("S:S:.S:S:.-")]);
    // Twins at different layers never pair up.
    let lower = dictionary
        .relations(&script("S:S:."), RelationKind::TwinSibling)
        .expect("relations");
    assert!(lower.is_empty(), "S:S:. has no layer-1 twin here");
}

#[test]
fn associated_siblings_differ_in_mode_only() {
    let entries = vec![
        TermEntry::new(script("wo.wa.-")),
        TermEntry::new(script("wo.wa.s.-")),
        TermEntry::new(script("wo.wa.b.-")),
        TermEntry::new(script("wa.wo.s.-")),
    ];
    let dictionary = Dictionary::build("1.0.0", entries).expect("build ok");
    let associated = dictionary
        .relations(&script("wo.wa.s.-"), RelationKind::AssociatedSibling)
        .expect("relations");
    assert_eq!(
        associated,
        vec![script("wo.wa.-"), script("wo.wa.b.-")],
        "null mode counts as a differing mode"
    );
}

#[test]
fn crossed_siblings_swap_within_both_halves() {
    let entries = vec![
        TermEntry::new(script("wa.s.-")),
        TermEntry::new(script("s.wu.-")),
    ];
    let dictionary = Dictionary::build("1.0.0", entries).expect("build ok");
    let crossed = dictionary
        .relations(&script("wa.s.-"), RelationKind::CrossedSibling)
        .expect("relations");
    assert_eq!(crossed, vec![script("s.wu.-")]);
}

#[test]
fn fathers_are_one_hop_through_the_slots() {
    let dictionary = small_dictionary();
    let term = script("U:S:.S:B:.-");
    let fathers = dictionary
        .relations(&term, RelationKind::FatherSubstance)
        .expect("relations");
    assert_eq!(fathers, vec![script("U:S:.")]);
    // S:B:. is not in the dictionary, so the attribute hop finds nothing.
    let missing = dictionary
        .relations(&term, RelationKind::FatherAttribute)
        .expect("relations");
    assert!(missing.is_empty());
    // And the child direction points back.
    let children = dictionary
        .relations(&script("U:S:."), RelationKind::ChildSubstance)
        .expect("relations");
    assert!(children.contains(&term));
}

#[test]
fn containment_tracks_sequence_sets_within_a_root() {
    let dictionary = small_dictionary();
    let root = script("O:M:.M:M:.-");
    let row = script("U:S:.M:M:.-");
    let cell = script("U:S:.S:S:.-");
    // contains(t) lists the strict supersets of t, contained(t) the subsets.
    let contains = dictionary
        .relations(&row, RelationKind::Contains)
        .expect("relations");
    assert_eq!(contains, vec![root.clone()], "the root covers the row");
    let contained = dictionary
        .relations(&row, RelationKind::Contained)
        .expect("relations");
    assert_eq!(contained, vec![script("U:S:.S:B:.-"), cell.clone()]);
    // Containment is strict.
    assert!(
        !dictionary
            .relations(&root, RelationKind::Contained)
            .expect("relations")
            .contains(&root)
    );
}

#[test]
fn inhibitions_silence_both_directions() {
    let entries = vec![
        TermEntry::new(script("O:M:.M:M:.-"))
            .root()
            .inhibit(RelationKind::Contained),
        TermEntry::new(script("U:S:.M:M:.-")),
    ];
    let dictionary = Dictionary::build("1.0.0", entries).expect("build ok");
    let root = script("O:M:.M:M:.-");
    let row = script("U:S:.M:M:.-");
    assert!(
        dictionary
            .relations(&root, RelationKind::Contained)
            .expect("relations")
            .is_empty()
    );
    assert!(
        dictionary
            .relations(&row, RelationKind::Contains)
            .expect("relations")
            .is_empty(),
        "the paired direction is silenced too"
    );
    assert_eq!(
        dictionary.inhibitions_of(&root).expect("inhibitions"),
        vec![RelationKind::Contained]
    );
}

#[test]
fn unknown_scripts_are_reported() {
    let dictionary = small_dictionary();
    match dictionary.relations(&script("l."), RelationKind::Contains) {
        Err(ScriptError::TermNotFound { script }) => assert_eq!(script, "l."),
        other => panic!("expected TermNotFound, got {other:?}"),
    }
}

#[test]
fn relation_kind_names_round_trip() {
    for kind in RelationKind::ALL {
        let parsed = RelationKind::parse_kind(kind.display_name()).expect("known name");
        assert_eq!(parsed, kind);
        assert_eq!(kind.inverse().inverse(), kind, "inverse is an involution");
    }
    match RelationKind::parse_kind("cousin") {
        Err(ScriptError::UnknownRelationKind { name }) => assert_eq!(name, "cousin"),
        other => panic!("expected UnknownRelationKind, got {other:?}"),
    }
}

#[test]
fn scripts_serialize_as_their_canonical_render() {
    let script = script("U:+A:");
    let json = serde_json::to_string(&script).expect("serialize");
    assert_eq!(json, "\"O:\"");
    let back: Script = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, script);
    // Deserialization rejects malformed text.
    assert!(serde_json::from_str::<Script>("\"U:A:\"").is_err());
}

#[test]
fn fingerprint_depends_on_content_not_version() {
    let entries = || {
        vec![
            TermEntry::new(script("O:M:.M:M:.-")).root(),
            TermEntry::new(script("U:S:.M:M:.-")),
        ]
    };
    let a = Dictionary::build("1.0.0", entries()).expect("build ok");
    let b = Dictionary::build("2.0.0", entries()).expect("build ok");
    assert_eq!(a.fingerprint(), b.fingerprint());
    assert_ne!(a.version(), b.version());
    let c = Dictionary::build("1.0.0", vec![TermEntry::new(script("U:"))]).expect("build ok");
    assert_ne!(a.fingerprint(), c.fingerprint());
}

#[test]
fn duplicate_scripts_fail_the_build() {
    let entries = vec![
        TermEntry::new(script("U:S:.")),
        TermEntry::new(script("y.")),
    ];
    match Dictionary::build("1.0.0", entries) {
        Err(ScriptError::Build(message)) => assert!(message.contains("y.")),
        other => panic!("expected build error, got {other:?}"),
    }
}

#[test]
fn a_singular_root_fails_the_build() {
    let entries = vec![TermEntry::new(script("wo.wa.-")).root()];
    match Dictionary::build("1.0.0", entries) {
        Err(ScriptError::NotAParadigm { script }) => assert_eq!(script, "wo.wa.-"),
        other => panic!("expected NotAParadigm, got {other:?}"),
    }
}

#[test]
fn roots_group_their_members() {
    let dictionary = small_dictionary();
    let root = script("O:M:.M:M:.-");
    assert_eq!(dictionary.root_paradigms(), vec![&root]);
    assert_eq!(dictionary.root_of(&script("U:S:.S:B:.-")).expect("root"), &root);
    // Layer-1 scripts fall outside the root's sequences and stand alone.
    assert_eq!(dictionary.root_of(&script("U:S:.")).expect("root"), &script("U:S:."));
    // Only the terms whose sequences the root covers; S:S:.U:S:.-,
    // U:S:.U:S:.- and S:S:.S:S:.- reach outside it and stand alone.
    let members = dictionary.terms_of_root(&root).expect("members");
    assert_eq!(members.len(), 3, "covered layer-2 terms, the root excluded");
    // Of those, only the row keeps more than one sequence.
    let paradigms = dictionary.paradigms_of_root(&root).expect("paradigms");
    let row = script("U:S:.M:M:.-");
    assert_eq!(paradigms, vec![&row]);
    match dictionary.terms_of_root(&script("U:S:.")) {
        Err(ScriptError::NotARootParadigm { .. }) => {}
        other => panic!("expected NotARootParadigm, got {other:?}"),
    }
}
