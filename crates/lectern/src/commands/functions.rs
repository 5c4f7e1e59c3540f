//! Functions command: query a generated function index.

use std::path::PathBuf;

use anyhow::{Context, Result};

use lectern_site::FunctionCatalog;

#[derive(Debug)]
pub struct FunctionsArgs {
    /// Path to `functions.json`
    pub index: PathBuf,
    /// Show only this function
    pub name: Option<String>,
    pub json: bool,
}

pub fn execute(args: FunctionsArgs) -> Result<()> {
    let catalog = FunctionCatalog::load(&args.index)
        .with_context(|| format!("Failed to load function index {}", args.index.display()))?;

    match &args.name {
        Some(name) => {
            let methods = catalog
                .get(name)
                .with_context(|| format!("Function '{}' is not in the index", name))?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(methods)?);
                return Ok(());
            }
            for method in methods {
                println!("{}", method);
                if let Some(description) = &method.description {
                    println!("    {}", description);
                }
            }
        }
        None if args.json => {
            let names: Vec<&str> = catalog.names().collect();
            println!("{}", serde_json::to_string_pretty(&names)?);
        }
        None => {
            for (_, methods) in catalog.iter() {
                for method in methods {
                    println!("{}", method);
                }
            }
        }
    }

    Ok(())
}
