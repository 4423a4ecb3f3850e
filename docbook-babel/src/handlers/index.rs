//! Index terms
//!
//! An `indexterm` becomes an inline span with class `index` whose text
//! encodes the entry:
//!
//! - `<see: primary; target>` / `<seealso: primary; target>` when the term
//!   points elsewhere (one span per pointer, nothing else);
//! - `single: primary; secondary` with a secondary term;
//! - just `primary` otherwise.
//!
//! `significance="preferred"` prefixes the text with `"! "`.

use super::ignore;
use crate::convert::registry::HandlerRegistry;
use crate::convert::{Converter, HandlerResult};
use crate::ir::nodes::OutputNode;
use crate::source::SourceElement;

pub fn register(registry: &mut HandlerRegistry) {
    registry.register_primary("indexterm", indexterm);
    registry.register_primary("index", ignore);
}

fn indexterm(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    cx.restrict(el, &["primary", "secondary", "see", "seealso"]);
    let primaries = cx.children_named(el, "primary");
    let Some(primary_el) = primaries.first().copied() else {
        cx.warning(el.line, "indexterm has no primary element");
        return Ok(());
    };
    if primaries.len() > 1 {
        cx.warning(el.line, "indexterm has more than one primary element; using the first");
    }

    let mut ids = Vec::new();
    let primary = plain(cx, primary_el, &mut ids);

    let mut pointers = Vec::new();
    for tag in ["see", "seealso"] {
        if let Some(target) = cx.child(el, tag) {
            let target = plain(cx, target, &mut ids);
            pointers.push(format!("<{tag}: {primary}; {target}>"));
        }
    }
    if !pointers.is_empty() {
        for text in pointers {
            let ids = std::mem::take(&mut ids);
            cx.inline_text(&text, parent, "index", ids, el.line);
        }
        return Ok(());
    }

    let mut text = match cx.child(el, "secondary") {
        Some(secondary) => {
            let secondary = plain(cx, secondary, &mut ids);
            format!("single: {primary}; {secondary}")
        }
        None => primary,
    };
    if el
        .attr("significance")
        .is_some_and(|s| s.eq_ignore_ascii_case("preferred"))
    {
        text.insert_str(0, "! ");
    }
    cx.inline_text(&text, parent, "index", ids, el.line);
    Ok(())
}

fn plain(cx: &Converter<'_>, el: &SourceElement, ids: &mut Vec<String>) -> String {
    let (text, _) = cx.no_markup_text(el, ids, false);
    text.trim().to_string()
}
