//! Validating and reshaping statements with templates.
//!
//! Run with: cargo run --example templates

use duct_script::{parse_str, to_string, Collection, Template, VariableType};
use std::error::Error;

const INT: VariableType = VariableType::INTEGER;
const FLOAT: VariableType = VariableType::FLOAT;
const STR: VariableType = VariableType::STRING;

fn main() -> Result<(), Box<dyn Error>> {
    let mut root = parse_str(
        "x = 1\ny = 2\nlabel = origin\nx = 10\ny = 20\ncolor 255 128 0\ncolor 12\nweights 0.5 1.5 2.5\n",
    )?;

    // Group loose x/y values into point identifiers
    let point = Template::new(["x", "y"], [INT, INT]);
    let created = point.compact(&mut root, "point", false);
    println!("Created {} points:", created);
    print!("{}", to_string(&root)?);

    // Check identifiers against a fixed layout
    let rgb = Template::new(["color"], [INT, INT, INT]);
    for child in root.children() {
        if let Some(identifier) = child.as_identifier() {
            println!(
                "{:<20} rgb: {}",
                identifier.to_string(),
                rgb.validate_identifier(identifier)
            );
        }
    }

    // A layout with a variadic tail
    let series = Template::from_layout([FLOAT]).with_tail(FLOAT);
    let renamed = series.rename_identifiers(&mut root, "series");
    println!("\nRenamed {} identifiers to 'series'", renamed);

    // First value matching a shape
    let text = Template::from_layout([STR]);
    if let Some(label) = text.first_matching_value(&root) {
        println!("First string value: {} = {}", label.name(), label.value());
    }

    Ok(())
}
