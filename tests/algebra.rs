use seme::parse_script;
use seme::script::{Primitive, Script};

#[test]
fn layer_and_cardinal_laws() {
    let cases = [
        ("U:", 0, 1),
        ("O:", 0, 2),
        ("M:", 0, 3),
        ("I:", 0, 6),
        ("wo.", 1, 1),
        ("O:M:.", 1, 6),
        ("M:M:.", 1, 9),
        ("U:M:.M:M:.-", 2, 27),
        ("O:M:.M:M:.-", 2, 54),
        ("O:M:.M:M:.-+M:M:.O:M:.-", 2, 108),
        ("O:O:.O:O:.O:O:.-", 2, 64),
    ];
    for (input, layer, cardinal) in cases {
        let script = parse_script(input).expect(input);
        assert_eq!(script.layer(), layer, "layer of {input}");
        assert_eq!(script.cardinal(), cardinal, "cardinal of {input}");
        assert_eq!(
            script.singular_sequences().count(),
            cardinal,
            "sequence count matches cardinal for {input}"
        );
    }
}

#[test]
fn singular_sequences_are_singular_and_distinct() {
    let paradigm = parse_script("O:M:.M:M:.-").expect("parse ok");
    assert!(paradigm.is_paradigm());
    let mut seen = std::collections::HashSet::new();
    for sequence in paradigm.singular_sequences() {
        assert_eq!(sequence.cardinal(), 1, "{sequence} is singular");
        assert_eq!(sequence.layer(), paradigm.layer(), "layer is preserved");
        assert!(seen.insert(sequence), "sequences are distinct");
    }
}

#[test]
fn singular_sequences_of_a_singular_script_is_itself() {
    let script = parse_script("wo.wa.-").expect("parse ok");
    assert!(!script.is_paradigm());
    let sequences: Vec<Script> = script.singular_sequences().collect();
    assert_eq!(sequences, vec![script]);
}

#[test]
fn remarkable_addition_expands_to_its_primitives() {
    let full = parse_script("I:").expect("parse ok");
    let renders: Vec<String> = full
        .singular_sequences()
        .map(|s| s.rendered().to_string())
        .collect();
    assert_eq!(renders, vec!["E:", "U:", "A:", "S:", "B:", "T:"]);
}

#[test]
fn canonical_order_puts_primitives_in_genesis_order() {
    let mut scripts: Vec<Script> = ["T:", "A:", "B:", "E:", "S:", "U:"]
        .iter()
        .map(|s| parse_script(s).expect("parse ok"))
        .collect();
    scripts.sort();
    let renders: Vec<&str> = scripts.iter().map(|s| s.rendered()).collect();
    assert_eq!(renders, vec!["E:", "U:", "A:", "S:", "B:", "T:"]);
}

#[test]
fn canonical_order_sorts_by_layer_then_cardinal() {
    let mut scripts: Vec<Script> = ["M:M:.", "wo.", "O:", "U:", "U:U:.U:U:.-"]
        .iter()
        .map(|s| parse_script(s).expect("parse ok"))
        .collect();
    scripts.sort();
    let renders: Vec<&str> = scripts.iter().map(|s| s.rendered()).collect();
    assert_eq!(renders, vec!["U:", "O:", "wo.", "M:M:.", "wo.wo.-"]);
}

#[test]
fn primitive_constructors_agree_with_parsing() {
    for primitive in Primitive::ALL {
        let built = Script::primitive(primitive);
        let parsed =
            parse_script(&format!("{}:", primitive.character())).expect("primitive parses");
        assert_eq!(built, parsed);
    }
    // E is the layer-0 empty script.
    assert!(Script::primitive(Primitive::E).is_null());
}

#[test]
fn additive_of_everything_at_a_layer_is_still_ordered() {
    let a = parse_script("wo.+y.+wa.").expect("parse ok");
    assert_eq!(a.rendered(), "wa.+wo.+y.", "members sort canonically");
}

#[test]
fn null_scripts_cover_every_layer() {
    for layer in 0..=6 {
        let null = Script::null(layer);
        assert!(null.is_null());
        assert_eq!(null.layer(), layer);
        assert_eq!(null, parse_script(null.rendered()).expect("null render parses"));
    }
}

#[test]
#[should_panic(expected = "exceeds the maximum layer")]
fn null_script_beyond_the_top_layer_panics() {
    Script::null(7);
}

#[test]
fn scripts_parse_through_from_str() {
    let script: Script = "U:+A:".parse().expect("parse ok");
    assert_eq!(script.rendered(), "O:");
    assert!("U:A:".parse::<Script>().is_err());
}

#[test]
fn scripts_are_send_and_sync() {
    fn takes_send_sync<T: Send + Sync>() {}
    takes_send_sync::<Script>();
}
