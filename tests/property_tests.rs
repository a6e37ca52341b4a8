//! Property-based tests for the parse/format round trip.
//!
//! Generated trees stay inside what the default options write losslessly:
//! floats are quarters, text avoids comment markers, and a backslash is
//! never followed by a character that would make it a valid escape pair,
//! since such pairs are written through unchanged.

use duct_script::{
    parse_str, to_string, to_string_with_options, Collection, FormatOptions, Identifier, Node,
    Value, ValueVariable, Variable,
};
use proptest::prelude::*;

fn name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_ {}=\"]{0,8}"
}

/// Text with spaces, tabs, raw line breaks, quotes and backslashes.
fn text() -> impl Strategy<Value = String> {
    let piece = prop_oneof![
        6 => "[a-zA-Z {}=\t\n\r\"]",
        1 => "\\\\[a-mo-qsu-z]",
    ];
    (prop::collection::vec(piece, 0..12), any::<bool>()).prop_map(|(pieces, trailing)| {
        let mut text = pieces.concat();
        if trailing {
            text.push('\\');
        }
        text
    })
}

fn value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i32>().prop_map(Value::Int),
        (-40_000i32..40_000).prop_map(|n| Value::Float(n as f32 / 4.0)),
        any::<bool>().prop_map(Value::Bool),
        text().prop_map(Value::Str),
    ]
}

fn statement() -> impl Strategy<Value = Variable> {
    prop_oneof![
        (name(), value()).prop_map(|(n, v)| Variable::Value(ValueVariable::new(n, v))),
        (name(), prop::collection::vec(value(), 0..5))
            .prop_map(|(n, values)| Variable::Identifier(Identifier::with_values(n, values))),
    ]
}

fn tree() -> impl Strategy<Value = Node> {
    let variable = statement().prop_recursive(3, 32, 6, |inner| {
        (name(), prop::collection::vec(inner, 0..6)).prop_map(|(n, children)| {
            let mut node = Node::new(n);
            for child in children {
                node.push(child);
            }
            Variable::Node(node)
        })
    });
    prop::collection::vec(variable, 0..8).prop_map(|children| {
        let mut root = Node::root();
        for child in children {
            root.push(child);
        }
        root
    })
}

fn roundtrip(root: &Node, options: FormatOptions) -> bool {
    match to_string_with_options(root, options) {
        Ok(text) => match parse_str(&text) {
            Ok(parsed) => parsed == *root,
            Err(e) => {
                eprintln!("Parse failed: {}", e);
                eprintln!("Text was: {}", text);
                false
            }
        },
        Err(e) => {
            eprintln!("Format failed: {}", e);
            false
        }
    }
}

proptest! {
    #[test]
    fn prop_roundtrip_default(root in tree()) {
        prop_assert!(roundtrip(&root, FormatOptions::default()));
    }

    #[test]
    fn prop_roundtrip_compact(root in tree()) {
        prop_assert!(roundtrip(&root, FormatOptions::compact()));
    }

    #[test]
    fn prop_format_is_stable(root in tree()) {
        let first = to_string(&root).unwrap();
        let second = to_string(&parse_str(&first).unwrap()).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_parse_never_panics(input in "\\PC{0,64}") {
        let _ = parse_str(&input);
    }

    #[test]
    fn prop_statement_count(values in prop::collection::vec(any::<i32>(), 0..20)) {
        let text: String = values
            .iter()
            .enumerate()
            .map(|(i, v)| format!("v{i} = {v}\n"))
            .collect();
        let root = parse_str(&text).unwrap();
        prop_assert_eq!(root.len(), values.len());
        for (i, v) in values.iter().enumerate() {
            prop_assert_eq!(root.get_int(&format!("v{i}"), true), Some(*v));
        }
    }
}
