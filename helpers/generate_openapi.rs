//! # OpenAPI Specification Generator
//!
//! Writes the watchgod OpenAPI document to disk without starting the server.
//!
//! ## Usage
//!
//! ```bash
//! # Defaults to ./openapi.json
//! cargo run --bin generate_openapi -- docs/openapi.json
//! ```
use std::env;
use std::fs;
use std::path::Path;

use utoipa::OpenApi;
use watchgod::openapi::ApiDoc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output_path = env::args().nth(1).unwrap_or_else(|| "openapi.json".to_string());

    if let Some(parent) = Path::new(&output_path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    println!("Generating OpenAPI specification to {}", output_path);
    let json = serde_json::to_string_pretty(&ApiDoc::openapi())?;
    fs::write(&output_path, json)?;
    println!("OpenAPI specification written");

    Ok(())
}
