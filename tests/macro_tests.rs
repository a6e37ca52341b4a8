use duct_script::{parse_str, script, to_string, Collection, Node, Value, VariableType};

#[test]
fn test_script_macro_empty() {
    let root = script! {};
    assert_eq!(root, Node::root());
    assert!(root.is_empty());
}

#[test]
fn test_script_macro_scalars() {
    let root = script! {
        "int" = 42,
        "negative" = -123,
        "float" = 2.5,
        "bool" = false,
        "text" = "hello world",
    };

    assert_eq!(root.get_int("int", true), Some(42));
    assert_eq!(root.get_int("negative", true), Some(-123));
    assert_eq!(root.get_float("float", true), Some(2.5));
    assert_eq!(root.get_bool("bool", true), Some(false));
    assert_eq!(root.get_str("text", true), Some("hello world"));
}

#[test]
fn test_script_macro_expressions() {
    let port: u16 = 8080;
    let host = String::from("localhost");
    let root = script! {
        "port" = port,
        "host" = host.clone(),
        "both" => [host.as_str(), port],
    };

    assert_eq!(root.get_int("port", true), Some(8080));
    assert_eq!(root.get_str("host", true), Some("localhost"));
    let both: Vec<&Value> = root.get_identifier("both", true).unwrap().values().collect();
    assert_eq!(both, vec![&Value::from("localhost"), &Value::Int(8080)]);
}

#[test]
fn test_script_macro_matches_parsed_tree() {
    let built = script! {
        "title" = "Main window",
        "size" => [800, 600],
        "fullscreen",
        "theme" => {
            "accent" = 0.75,
            "fonts" => ["sans", "mono"],
        },
    };
    let parsed = parse_str(
        "title = \"Main window\"\nsize 800 600\nfullscreen\ntheme {\n\taccent = 0.75\n\tfonts sans mono\n}",
    )
    .unwrap();

    assert_eq!(built, parsed);
    assert_eq!(parse_str(&to_string(&built).unwrap()).unwrap(), built);
}

#[test]
fn test_script_macro_deep_nesting() {
    let root = script! {
        "a" => { "b" => { "c" => { "leaf" } } }
    };

    let leaf = root
        .get_node("a", true)
        .and_then(|a| a.get_node("b", true))
        .and_then(|b| b.get_node("c", true))
        .and_then(|c| c.find("leaf", true, VariableType::IDENTIFIER));
    assert!(leaf.is_some());
}
