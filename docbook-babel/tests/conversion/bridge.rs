use crate::common::kinds;
use docbook_babel::{
    Build, ConverterSettings, DocId, MacroRegistry, NodeKind, Project, Severity,
};

const BRIDGE: &str = "urn:docbook-babel:bridge";

fn build_one(source: &str, host: Option<MacroRegistry>) -> docbook_babel::BuildOutput {
    let project = Project::new().with_document("doc", source);
    let mut build = Build::new(project, ConverterSettings::default());
    if let Some(host) = host {
        build = build.with_host(host);
    }
    build.read([DocId::from("doc")]);
    build.finish()
}

#[test]
fn directive_output_is_spliced_in_place() {
    let source = format!(
        r#"<article xmlns:b="{BRIDGE}"><para>before</para><b:directive name="code" arg="rust">fn main() {{}}</b:directive><para>after</para></article>"#
    );
    let output = build_one(&source, Some(MacroRegistry::with_builtins()));
    let article = &output.document("doc").expect("converted").root.children[0];
    assert_eq!(kinds(article), vec!["paragraph", "literal_block", "paragraph"]);
    let code = &article.children[1];
    assert_eq!(code.classes, vec!["code".to_string(), "rust".to_string()]);
    assert_eq!(code.astext(), "fn main() {}");
}

#[test]
fn role_runs_inline() {
    let source = format!(r#"<para xmlns:b="{BRIDGE}">sum <b:role name="math">a+b</b:role></para>"#);
    let output = build_one(&source, Some(MacroRegistry::with_builtins()));
    let doc = output.document("doc").expect("converted");
    let math = doc
        .root
        .find(&|n| n.kind == NodeKind::Inline && n.classes.iter().any(|c| c == "math"))
        .expect("math role output");
    assert_eq!(math.astext(), "a+b");
}

#[test]
fn missing_host_is_a_warning() {
    let source = format!(r#"<para xmlns:b="{BRIDGE}">x<b:role name="math">a</b:role></para>"#);
    let output = build_one(&source, None);
    assert!(output.is_ok());
    assert_eq!(output.document("doc").expect("converted").root.astext(), "x");
    assert!(output
        .diagnostics
        .iter()
        .any(|d| d.severity == Severity::Warning && d.message.contains("no macro host")));
}

#[test]
fn unknown_macro_is_a_warning() {
    let source = format!(r#"<para xmlns:b="{BRIDGE}">x<b:directive name="graphviz"/></para>"#);
    let output = build_one(&source, Some(MacroRegistry::with_builtins()));
    assert!(output.is_ok());
    assert!(output
        .diagnostics
        .iter()
        .any(|d| d.severity == Severity::Warning && d.message.contains("graphviz")));
}
