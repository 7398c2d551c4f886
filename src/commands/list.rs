//! `gcm-correct list-variables` command.

use serde::Serialize;

use super::Output;
use crate::catalog::VARIABLES;
use crate::error::CorrectionError;

#[derive(Serialize)]
struct Entry {
    id: &'static str,
    name: &'static str,
}

/// Execute the `list-variables` command.
///
/// # Errors
///
/// Returns an error only if JSON rendering fails.
pub fn run(out: Output) -> Result<(), CorrectionError> {
    if out.json {
        let entries: Vec<Entry> =
            VARIABLES.iter().map(|v| Entry { id: v.id, name: v.display_name }).collect();
        return out.print_json(&entries);
    }

    out.console.section("Available Variables for Bias Correction");
    for line in render(out) {
        out.console.plain(&line);
    }
    Ok(())
}

/// Numbered `n. id: name` lines.
fn render(out: Output) -> Vec<String> {
    VARIABLES
        .iter()
        .enumerate()
        .map(|(idx, v)| format!("{}. {}: {}", idx + 1, out.console.format_key(v.id), v.display_name))
        .collect()
}
