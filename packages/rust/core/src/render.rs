//! Renders advisor records as a JavaScript array declaration.

use std::fmt::Write as _;

use advisorboard_shared::{AdvisorRecord, RenderConfig};

/// Render the full declaration block.
///
/// `indent` is placed before the `const` line and the closing `];`, and
/// each entry is indented a further `render.entry_indent`.
///
/// ```text
/// const datosAsesores = [
///     {name: "Ana", count: 5},
/// ];
/// ```
pub fn render_block(records: &[AdvisorRecord], render: &RenderConfig, indent: &str) -> String {
    let mut out = format!("{indent}const {} = [\n", render.constant);

    for record in records {
        let _ = writeln!(
            out,
            "{indent}{}{},",
            render.entry_indent,
            render_entry(record, render)
        );
    }

    let _ = write!(out, "{indent}];");
    out
}

/// Render a single `{name: "...", count: N}` object literal.
pub fn render_entry(record: &AdvisorRecord, render: &RenderConfig) -> String {
    format!(
        "{{{}: {}, {}: {}}}",
        render.name_field,
        name_literal(&record.name, render.escape_names),
        render.count_field,
        record.count
    )
}

/// Quote a name. Without `escape` the text is embedded verbatim, so a
/// name containing `"` produces a broken literal.
fn name_literal(name: &str, escape: bool) -> String {
    if escape {
        serde_json::to_string(name).unwrap_or_else(|_| format!("\"{name}\""))
    } else {
        format!("\"{name}\"")
    }
}
