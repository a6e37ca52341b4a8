//! Parsing a script, editing the tree and writing it back.
//!
//! Run with: cargo run --example roundtrip

use duct_script::{
    parse_str, to_string, to_string_with_options, Collection, FormatOptions, Indent, ValueFormat,
    Variable, VariableType,
};
use std::error::Error;

const SOURCE: &str = r#"// window settings
title = "Main window"
size 800 600
fullscreen

theme {
    accent = 0.75
    fonts sans mono /* fallback order */
}
"#;

fn main() -> Result<(), Box<dyn Error>> {
    let mut root = parse_str(SOURCE)?;
    println!("Parsed {} top-level statements", root.len());

    // Typed lookups
    let size = root
        .get_identifier("size", true)
        .ok_or("missing size")?;
    println!("size has {} values: {}", size.len(), size);

    // Edit in place
    if let Some(theme) = root.get_node_mut("theme", true) {
        theme.push(Variable::bool("dark", true));
        if let Some(accent) = theme
            .find_mut("accent", true, VariableType::FLOAT)
            .and_then(Variable::as_value_variable_mut)
        {
            accent.set_from_str("0.5");
        }
    }
    root.remove_named("fullscreen", true, VariableType::IDENTIFIER);

    println!("\nDefault output:");
    print!("{}", to_string(&root)?);

    println!("\nCompact output:");
    print!("{}", to_string_with_options(&root, FormatOptions::compact())?);

    println!("\nEverything quoted, four-space indent:");
    let quoted = FormatOptions::new()
        .with_indent(Indent::Spaces(4))
        .with_value_format(ValueFormat::ALL_DEFAULT | ValueFormat::VALUE_QUOTE_ALWAYS);
    print!("{}", to_string_with_options(&root, quoted)?);

    // Parse errors carry their position
    match parse_str("broken = \"never closed") {
        Ok(_) => println!("\nunexpectedly parsed"),
        Err(e) => println!("\nError: {}", e),
    }

    Ok(())
}
