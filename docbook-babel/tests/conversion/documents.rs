use crate::common::{convert, kinds, pseudoxml};
use docbook_babel::{NodeKind, Severity};

const DOCBOOK_NS: &str = "http://docbook.org/ns/docbook";

#[test]
fn namespaced_article_tree() {
    let source = format!(
        r#"<article xmlns="{DOCBOOK_NS}" xml:id="doc"><title>Guide</title><section xml:id="s1"><title>Start</title><para><emphasis>make</emphasis><footnote><para>GNU make.</para></footnote></para></section></article>"#
    );
    let (doc, diagnostics) = convert(&source);
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert_eq!(doc.title.as_deref(), Some("Guide"));
    insta::assert_snapshot!(pseudoxml(&doc), @r###"
    <document>
        <section level="0" ids="doc">
            <title>
                Guide
            <section level="1" ids="s1">
                <title>
                    Start
                <paragraph>
                    <emphasis>
                        make
                    <footnote_reference refid="footnote-1">
                <footnote ids="footnote-1">
                    <paragraph>
                        GNU make.
    "###);
}

#[test]
fn legacy_document_with_doctype() {
    let source = r#"<?xml version="1.0"?>
<!DOCTYPE article PUBLIC "-//OASIS//DTD DocBook XML V4.5//EN" "http://www.oasis-open.org/docbook/xml/4.5/docbookx.dtd">
<article id="old">
  <title>Old style</title>
  <para>Body</para>
</article>"#;
    let (doc, _) = convert(source);
    assert_eq!(doc.title.as_deref(), Some("Old style"));
    let article = &doc.root.children[0];
    assert_eq!(article.ids, vec!["old".to_string()]);
    assert_eq!(kinds(article), vec!["title", "paragraph"]);
}

#[test]
fn legacy_ids_are_ignored_in_namespaced_documents() {
    let source = format!(r#"<article xmlns="{DOCBOOK_NS}" id="plain"><para>x</para></article>"#);
    let (doc, _) = convert(&source);
    assert_ne!(doc.root.children[0].ids, vec!["plain".to_string()]);
}

#[test]
fn unknown_namespace_content_is_kept() {
    let (doc, diagnostics) = convert(
        r#"<article xmlns:x="urn:other"><para>a <x:term>kept</x:term> <x:term>twice</x:term></para></article>"#,
    );
    assert_eq!(doc.root.astext(), "a kept twice");
    let warnings: Vec<_> = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].message.contains("urn:other"));
}

#[test]
fn footnotes_follow_their_own_block() {
    let (doc, _) = convert(
        "<article><itemizedlist><listitem><para>a<footnote><para>F1</para></footnote></para>\
         </listitem></itemizedlist><para>b<footnote><para>F2</para></footnote></para></article>",
    );
    let article = &doc.root.children[0];
    assert_eq!(kinds(article), vec!["bullet_list", "paragraph", "footnote"]);
    assert_eq!(article.children[2].ids, vec!["footnote-2".to_string()]);

    let item = &article.children[0].children[0];
    assert_eq!(item.kind, NodeKind::ListItem);
    assert_eq!(kinds(item), vec!["paragraph", "footnote"]);
    assert_eq!(item.children[1].astext(), "F1");
}

#[test]
fn malformed_input_is_an_error() {
    let result = docbook_babel::convert_str("broken", "<article><para></article>");
    assert!(result.is_err());
}

#[test]
fn json_dump_is_valid_json() {
    let (doc, _) = convert("<article><title>T</title></article>");
    let json = docbook_babel::FormatRegistry::default()
        .serialize(&doc, "json")
        .expect("json to serialize");
    let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
    assert_eq!(value["id"], "test");
}
