//! Unknown elements vanish but their content stays.

use docbook_babel::{convert_str, Severity};
use proptest::prelude::*;

const TAGS: &[&str] = &[
    "para",
    "emphasis",
    "literal",
    "section",
    "itemizedlist",
    "listitem",
    "footnote",
    "note",
    "title",
    "blink",
];

fn nested(depth: usize, text: &str) -> String {
    let open: String = (0..depth).map(|i| format!("<w{i}>")).collect();
    let close: String = (0..depth).rev().map(|i| format!("</w{i}>")).collect();
    format!("<article><para>{open}{text}{close}</para></article>")
}

fn fragment() -> impl Strategy<Value = String> {
    let leaf = "[a-z ]{0,8}";
    leaf.prop_recursive(4, 32, 4, |inner| {
        (
            prop::sample::select(TAGS.to_vec()),
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(tag, children)| format!("<{tag}>{}</{tag}>", children.concat()))
    })
}

proptest! {
    #[test]
    fn unknown_wrappers_keep_their_text(depth in 1usize..6, text in "[a-z][a-z ]{0,20}") {
        let (doc, diagnostics) = convert_str("p", &nested(depth, &text)).expect("conversion failed");
        prop_assert_eq!(doc.root.astext(), text);
        let warnings = diagnostics.iter().filter(|d| d.severity == Severity::Warning).count();
        prop_assert_eq!(warnings, depth);
    }

    #[test]
    fn well_formed_documents_always_convert(body in fragment()) {
        let source = format!("<article>{body}</article>");
        prop_assert!(convert_str("p", &source).is_ok());
    }
}
