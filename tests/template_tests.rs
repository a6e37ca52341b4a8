use duct_script::{
    parse_str, to_string, Collection, Identifier, Node, Template, Variable, VariableType,
};

const INT: VariableType = VariableType::INTEGER;
const STR: VariableType = VariableType::STRING;
const FLOAT: VariableType = VariableType::FLOAT;

#[test]
fn test_compaction_example() {
    let mut container = Node::root();
    container.push(Variable::int("t", 1));
    container.push(Variable::string("t", "x"));
    container.push(Variable::float("t", 2.0));

    let template = Template::new(["t"], [INT, STR, FLOAT]);
    assert_eq!(template.compact(&mut container, "grp", false), 1);

    assert_eq!(container.len(), 1);
    let grp = container.get_at(0).unwrap().as_identifier().unwrap();
    assert_eq!(grp.name(), "grp");
    assert_eq!(
        grp.children(),
        &[
            Variable::int("t", 1),
            Variable::string("t", "x"),
            Variable::float("t", 2.0),
        ]
    );
}

#[test]
fn test_compact_parsed_script_and_write() {
    let mut root = parse_str("x = 1\ny = 2\nlabel = origin\nx = 3\ny = 4\n").unwrap();
    let point = Template::new(["x", "y"], [INT, INT]);

    assert_eq!(point.compact(&mut root, "point", false), 2);
    assert_eq!(
        to_string(&root).unwrap(),
        "point 1 2\nlabel = origin\npoint 3 4\n"
    );
}

#[test]
fn test_compact_inside_nested_node() {
    let mut root = parse_str("shape {\n\tw = 3\n\th = 4\n}").unwrap();
    let shape = root.get_node_mut("shape", true).unwrap();

    let size = Template::new(["w", "h"], [INT, INT]);
    assert_eq!(size.compact(shape, "size", true), 1);
    assert_eq!(shape.get_identifier("size", true).unwrap().len(), 2);
}

#[test]
fn test_validate_parsed_identifiers() {
    let root = parse_str("rgb 255 128 0\nrgb 255 128\nlabel hello 1 2 3\nflag").unwrap();
    let rgb = Template::new(["rgb"], [INT, INT, INT]);
    let label = Template::new(["label"], [STR]).with_tail(INT);
    let flag = Template::new(["flag"], Vec::new());

    let verdicts: Vec<(bool, bool, bool)> = root
        .children()
        .iter()
        .map(|child| {
            (
                rgb.validate_variable(child),
                label.validate_variable(child),
                flag.validate_variable(child),
            )
        })
        .collect();
    assert_eq!(
        verdicts,
        vec![
            (true, false, false),
            (false, false, false),
            (false, true, false),
            (false, false, true),
        ]
    );
}

#[test]
fn test_template_law() {
    let template = Template::from_layout([INT | FLOAT, STR]);
    let cases = [
        (Identifier::with_values("a", [1]), false),
        (Identifier::with_values("a", [duct_script::Value::Int(1), "s".into()]), true),
        (Identifier::with_values("a", [duct_script::Value::Float(1.5), "s".into()]), true),
        (Identifier::with_values("a", ["s", "s"]), false),
        (
            Identifier::with_values("a", [duct_script::Value::Int(1), "s".into(), "t".into()]),
            false,
        ),
    ];
    for (identifier, expected) in cases {
        assert_eq!(template.validate_identifier(&identifier), expected, "{identifier}");
    }

    let variadic = template.with_tail(STR);
    let long = Identifier::with_values("a", [duct_script::Value::Int(1), "s".into(), "t".into()]);
    assert!(variadic.validate_identifier(&long));
}

#[test]
fn test_lookups_and_renames() {
    let mut root = parse_str("pos 1 2\nname = thing\nscale = 2.0\npos 3 4").unwrap();

    let pair = Template::from_layout([INT, INT]);
    assert_eq!(pair.first_matching_identifier(&root).unwrap().name(), "pos");
    assert_eq!(pair.rename_identifiers(&mut root, "pair"), 2);
    assert!(root.get_identifier("pos", true).is_none());

    let float = Template::from_layout([FLOAT]);
    assert_eq!(float.first_matching_value(&root).unwrap().name(), "scale");
    assert_eq!(float.rename_values(&mut root, "zoom"), 1);
    assert_eq!(root.get_float("zoom", true), Some(2.0));
}

#[test]
fn test_case_sensitivity() {
    let root = parse_str("Color 1 2 3").unwrap();
    let loose = Template::new(["color"], [INT, INT, INT]);
    let strict = loose.clone().case_sensitive(true);

    assert!(loose.first_matching_identifier(&root).is_some());
    assert!(strict.first_matching_identifier(&root).is_none());
}
