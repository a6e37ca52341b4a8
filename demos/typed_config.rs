//! Reading a script into Rust types with serde.
//!
//! Run with: cargo run --example typed_config

use duct_script::{from_node, parse_str};
use serde::Deserialize;
use std::error::Error;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Level {
    Debug,
    Info,
    Warn,
}

#[derive(Debug, Deserialize)]
struct Database<'a> {
    host: &'a str,
    port: u16,
    replicas: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Config<'a> {
    name: String,
    workers: u32,
    timeout: f32,
    verbose: bool,
    level: Level,
    #[serde(borrow)]
    database: Database<'a>,
    motd: Option<String>,
}

const SOURCE: &str = r#"
name = "order service"
workers = 8
timeout = 2.5
verbose
level = info

database {
    host = db.internal
    port = 5432
    replicas r1.internal r2.internal
}
"#;

fn main() -> Result<(), Box<dyn Error>> {
    let root = parse_str(SOURCE)?;
    let config: Config = from_node(&root)?;

    println!("{:#?}", config);
    println!(
        "\n{} runs {} workers against {}:{} ({} replicas)",
        config.name,
        config.workers,
        config.database.host,
        config.database.port,
        config.database.replicas.len()
    );
    println!(
        "timeout {}s, verbose {}, level {:?}, motd {:?}",
        config.timeout, config.verbose, config.level, config.motd
    );

    // Shape mismatches are reported as errors
    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Strict {
        workers: String,
        timeout: u32,
    }
    match from_node::<Strict>(&root) {
        Ok(strict) => println!("unexpectedly parsed {:?}", strict),
        Err(e) => println!("\nError: {}", e),
    }

    Ok(())
}
