use sqlpad_core::AppViewModel;

use super::constants::*;

/// Renders the whole screen as plain text.
pub fn render(view: &AppViewModel) -> String {
    let mut out = String::new();
    out.push_str(TITLE);
    out.push('\n');
    out.push_str(&"=".repeat(TITLE.len()));
    out.push_str("\n\n");

    if view.query.is_empty() {
        out.push_str(&format!("  {PLACEHOLDER}\n"));
    } else {
        for line in view.query.split('\n') {
            out.push_str("  ");
            out.push_str(line);
            out.push('\n');
        }
    }

    out.push('\n');
    if view.awaiting_response {
        out.push_str(&format!("[Parse] {WAITING_LABEL}\n"));
    } else {
        out.push_str("[Parse]\n");
    }

    out.push('\n');
    out.push_str(RESULT_HEADING);
    out.push('\n');
    // Verbatim: no trimming, no trailing newline added to the body itself.
    out.push_str(view.result_text());
    out.push('\n');
    out
}

/// Query edits are already echoed by the terminal; only a change in what the
/// backend produced warrants redrawing the screen.
pub fn needs_redraw(previous: Option<&AppViewModel>, next: &AppViewModel) -> bool {
    match previous {
        None => true,
        Some(prev) => {
            prev.result != next.result || prev.awaiting_response != next.awaiting_response
        }
    }
}

pub fn help_text() -> String {
    format!(
        "Type SQL; each line is added to the query.\n  {CMD_PARSE}  send the query\n  {CMD_CLEAR}  empty the query\n  {CMD_SHOW}   redraw\n  {CMD_QUIT}   exit\n"
    )
}
