use seme::error::ScriptError;
use seme::parse_script;

#[test]
fn render_then_parse_is_identity() {
    let inputs = [
        "E:",
        "U:",
        "T:",
        "O:",
        "M:",
        "F:",
        "I:",
        "wo.",
        "wa.",
        "y.",
        "s.",
        "l.",
        "U:.",
        "U:U:.",
        "A:S:.B:T:.-",
        "U:+A:",
        "S:+B:+T:",
        "O:M:.",
        "M:M:.",
        "U:M:.M:M:.-",
        "O:M:.M:M:.-",
        "O:M:.M:M:.-+M:M:.O:M:.-",
        "M:M:.-O:M:.+M:O:.-'",
        "s.-'",
        "E:.-',",
        "t.i.-'",
        "M:O:.M:M:.-+O:M:.M:M:.-",
    ];
    for input in inputs {
        let script = parse_script(input).expect(input);
        let render = script.rendered().to_string();
        let reparsed = parse_script(&render).expect("canonical render parses");
        assert_eq!(script, reparsed, "round trip for {input}");
        assert_eq!(
            reparsed.rendered(),
            render,
            "render is a fixed point for {input}"
        );
    }
}

#[test]
fn parse_canonicalizes_additions() {
    // Order and duplicates are normalized away.
    let a = parse_script("B:+S:+T:+S:").expect("parse ok");
    let b = parse_script("S:+B:+T:").expect("parse ok");
    assert_eq!(a, b);
    assert_eq!(a.rendered(), "M:", "full remarkable addition contracts");

    assert_eq!(parse_script("U:+A:").expect("parse ok").rendered(), "O:");
    assert_eq!(
        parse_script("E:+U:+A:+S:+B:+T:").expect("parse ok").rendered(),
        "I:"
    );
}

#[test]
fn parse_canonicalizes_remarkable_multiplications() {
    let spelled = parse_script("U:S:.").expect("parse ok");
    assert_eq!(spelled.rendered(), "y.", "U:S:. contracts to y.");
    assert_eq!(spelled, parse_script("y.").expect("parse ok"));
    assert_eq!(parse_script("A:B:.").expect("parse ok").rendered(), "a.");
    assert_eq!(parse_script("T:T:.").expect("parse ok").rendered(), "l.");
}

#[test]
fn null_marks_carry_the_layer() {
    for (input, layer) in [("E:", 0), ("E:.", 1), ("E:.-", 2), ("E:.-',_;", 6)] {
        let script = parse_script(input).expect(input);
        assert!(script.is_null());
        assert_eq!(script.layer(), layer, "layer of {input}");
        assert_eq!(script.rendered(), input);
    }
}

#[test]
fn foreign_character_is_a_lex_error() {
    match parse_script("U:Z:.") {
        Err(ScriptError::Lex {
            position,
            character,
        }) => {
            assert_eq!(position, 2);
            assert_eq!(character, 'Z');
        }
        other => panic!("expected lex error, got {other:?}"),
    }
}

#[test]
fn malformed_scripts_are_parse_errors() {
    for input in ["", "U:A:", "U:+", "U:A:S:B:.", "wo", "+U:"] {
        match parse_script(input) {
            Err(ScriptError::Parse { .. }) => {}
            other => panic!("expected parse error for {input:?}, got {other:?}"),
        }
    }
}

#[test]
fn mixed_layer_slots_are_rejected() {
    // A layer-1 substance cannot take a layer-0 attribute.
    match parse_script("wo.U:-") {
        Err(ScriptError::Parse { .. }) => {}
        other => panic!("expected parse error, got {other:?}"),
    }
}
