//! Output → human/json/raw string formatting.
//!
//! Three modes:
//! - **Human** (default): labelled fields, e.g. `(boolean) true`, `(empty list)`
//! - **JSON** (`--json`): `serde_json::to_string_pretty`
//! - **Raw** (`--raw`): one compact JSON record per line, `1`/`0` for booleans

use supplychain_contract::Product;
use supplychain_executor::{Error, Output};

/// Output formatting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
    Raw,
}

/// Format a successful output.
pub fn format_output(output: &Output, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => format_json(output),
        OutputMode::Raw => format_raw(output),
        OutputMode::Human => format_human(output),
    }
}

/// Format an error.
pub fn format_error(err: &Error, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => serde_json::to_string_pretty(&serde_json::json!({
            "error": format!("{}", err)
        }))
        .unwrap_or_else(|_| format!("{{\"error\": \"{}\"}}", err)),
        OutputMode::Raw => format!("{}", err),
        OutputMode::Human => format!("(error) {}", err),
    }
}

// =========================================================================
// JSON mode
// =========================================================================

fn format_json(output: &Output) -> String {
    let value = match output {
        Output::Unit => serde_json::json!({ "ok": true }),
        Output::Bool(b) => serde_json::json!(b),
        Output::Product(p) => serde_json::json!(p),
        Output::Products(ps) => serde_json::json!(ps),
    };
    serde_json::to_string_pretty(&value).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
}

// =========================================================================
// Raw mode
// =========================================================================

fn format_raw(output: &Output) -> String {
    match output {
        Output::Unit => String::new(),
        Output::Bool(b) => {
            if *b {
                "1".to_string()
            } else {
                "0".to_string()
            }
        }
        Output::Product(p) => compact(p),
        Output::Products(ps) => ps.iter().map(compact).collect::<Vec<_>>().join("\n"),
    }
}

fn compact(p: &Product) -> String {
    serde_json::to_string(p).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
}

// =========================================================================
// Human mode
// =========================================================================

fn format_human(output: &Output) -> String {
    match output {
        Output::Unit => "OK".to_string(),
        Output::Bool(b) => format!("(boolean) {}", b),
        Output::Product(p) => format_product_human(p),
        Output::Products(ps) => {
            if ps.is_empty() {
                "(empty list)".to_string()
            } else {
                ps.iter()
                    .enumerate()
                    .map(|(i, p)| {
                        format!(
                            "{}) {} \"{}\" [{}] owner={}",
                            i + 1,
                            p.id,
                            p.name,
                            p.status,
                            p.owner
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        }
    }
}

fn format_product_human(p: &Product) -> String {
    [
        ("id", p.id.clone()),
        ("name", p.name.clone()),
        ("status", p.status.clone()),
        ("owner", p.owner.clone()),
        ("description", p.description.clone()),
        ("category", p.category.clone()),
        ("created_at", p.created_at.to_string()),
        ("updated_at", p.updated_at.to_string()),
    ]
    .iter()
    .map(|(label, value)| format!("{:<12} {}", label, value))
    .collect::<Vec<_>>()
    .join("\n")
}
