use crate::common::kinds;
use docbook_babel::{Build, ConvertError, ConverterSettings, DocId, NodeKind, Project};

const BOOK: &str = r#"<assembly xmlns="http://docbook.org/ns/docbook" xml:id="book">
  <resources>
    <resource xml:id="guide" fileref="guide.xml"/>
    <resource xml:id="install" fileref="chapters/install.xml">
      <description>Installing</description>
    </resource>
    <resource xml:id="usage" fileref="chapters/usage.xml">
      <description>Using it</description>
    </resource>
  </resources>
  <structure resourceref="guide">
    <module resourceref="install"/>
    <module resourceref="usage"/>
  </structure>
</assembly>"#;

const GUIDE: &str = r#"<article xmlns="http://docbook.org/ns/docbook"><title>User Guide</title><para>Welcome.</para></article>"#;
const INSTALL: &str = r#"<chapter xmlns="http://docbook.org/ns/docbook"><title>Install</title><para>Run make.</para></chapter>"#;
const USAGE: &str = r#"<chapter xmlns="http://docbook.org/ns/docbook"><title>Usage</title><para>Run it.</para></chapter>"#;

pub fn book_sources() -> Vec<(&'static str, &'static str)> {
    vec![
        ("book", BOOK),
        ("guide", GUIDE),
        ("chapters/install", INSTALL),
        ("chapters/usage", USAGE),
    ]
}

fn book_project() -> Project {
    book_sources()
        .into_iter()
        .fold(Project::new(), |project, (id, source)| project.with_document(id, source))
}

#[test]
fn assembly_is_stitched_together() {
    let mut build = Build::new(book_project(), ConverterSettings::default());
    assert_eq!(build.read([DocId::from("book")]), 4);
    let output = build.finish();
    assert!(output.is_ok(), "{:?}", output.failures);

    let book = output.document("book").expect("book resolved");
    assert_eq!(book.title.as_deref(), Some("User Guide"));
    assert_eq!(
        kinds(&book.root),
        vec!["section", "navigation", "compound", "section", "section"]
    );
    assert_eq!(book.root.children[0].ids[0], "guide");
    assert_eq!(book.root.children[2].astext(), "InstallingUsing it");
    assert_eq!(book.root.children[3].astext(), "InstallRun make.");
    assert!(book
        .root
        .find(&|n| matches!(n.kind, NodeKind::Placeholder { .. }))
        .is_none());
}

#[test]
fn hidden_navigation_lists_described_modules() {
    let mut build = Build::new(book_project(), ConverterSettings::default());
    build.read([DocId::from("book")]);
    let output = build.finish();
    let book = output.document("book").expect("book resolved");
    let NodeKind::Navigation { entries, hidden } = &book.root.children[1].kind else {
        panic!("expected navigation, got {:?}", book.root.children[1].kind);
    };
    assert!(*hidden);
    let targets: Vec<&str> = entries.iter().map(|e| e.document.as_str()).collect();
    assert_eq!(targets, vec!["chapters/install", "chapters/usage"]);
}

#[test]
fn top_resource_gets_no_extra_navigation() {
    let mut build = Build::new(book_project(), ConverterSettings::default());
    build.read([DocId::from("book")]);
    let output = build.finish();
    let guide = output.document("guide").expect("guide resolved");
    assert_eq!(kinds(&guide.root), vec!["section"]);
}

#[test]
fn purged_assembly_is_forgotten_until_read_again() {
    let mut build = Build::new(book_project(), ConverterSettings::default());
    build.read_all();
    let book = DocId::from("book");
    assert!(build.graph().read().is_root(&book));

    build.purge(&book);
    assert!(!build.graph().read().is_root(&book));
    assert!(build.graph().read().top_resource(&book).is_none());
    let output = build.finish();
    assert!(output.document("book").is_none());
    assert_eq!(output.document("guide").and_then(|d| d.title.as_deref()), Some("User Guide"));

    build.read([book.clone()]);
    let output = build.finish();
    assert_eq!(output.document("book").and_then(|d| d.title.as_deref()), Some("User Guide"));
}

#[test]
fn rereading_does_not_duplicate_registrations() {
    let mut build = Build::new(book_project(), ConverterSettings::default());
    build.read([DocId::from("book")]);
    build.read([DocId::from("book")]);
    let graph = build.graph().read();
    assert_eq!(graph.children_of(&DocId::from("guide")).len(), 2);
}

#[test]
fn cyclic_assemblies_fail_alone() {
    let a = r#"<assembly><resources><resource id="b" fileref="b.xml"/></resources><structure resourceref="b"/></assembly>"#;
    let b = r#"<assembly><resources><resource id="a" fileref="a.xml"/></resources><structure resourceref="a"/></assembly>"#;
    let project = Project::new()
        .with_document("a", a)
        .with_document("b", b)
        .with_document("other", "<article><para>fine</para></article>");
    let mut build = Build::new(project, ConverterSettings::default());
    build.read_all();
    let output = build.finish();

    let mut failed: Vec<&str> = output.failures.iter().map(|(id, _)| id.as_str()).collect();
    failed.sort_unstable();
    assert_eq!(failed, vec!["a", "b"]);
    assert!(output
        .failures
        .iter()
        .all(|(_, err)| matches!(err, ConvertError::CyclicAssembly { .. })));
    assert!(output.document("other").is_some());
}

#[test]
fn broken_module_leaves_its_assembly_unresolved() {
    let book = r#"<assembly><resources><resource id="x" fileref="bad.xml"/></resources><structure resourceref="x"/></assembly>"#;
    let project = Project::new()
        .with_document("book", book)
        .with_document("bad", "<article><para></article>");
    let mut build = Build::new(project, ConverterSettings::default());
    build.read([DocId::from("book")]);
    let output = build.finish();

    let reason = |id: &str| {
        output
            .failures
            .iter()
            .find(|(doc, _)| doc.as_str() == id)
            .map(|(_, err)| err.clone())
    };
    assert!(matches!(reason("bad"), Some(ConvertError::MalformedInput { .. })));
    assert!(matches!(reason("book"), Some(ConvertError::Unresolved { .. })));
}

#[test]
fn failed_assembly_contributes_no_navigation() {
    let book = r#"<assembly><resources>
        <resource id="a" fileref="a.xml"/>
        <resource id="b" fileref="b.xml"/>
        <resource id="c" fileref="c.xml"><description>C desc</description></resource>
      </resources>
      <structure resourceref="a"><module resourceref="b"><module resourceref="c"/></module></structure>
      <structure resourceref="missing"/>
    </assembly>"#;
    let project = Project::new()
        .with_document("book", book)
        .with_document("a", "<article><title>A</title></article>")
        .with_document("b", "<article><title>B</title></article>")
        .with_document("c", "<article><title>C</title></article>");
    let mut build = Build::new(project, ConverterSettings::default());
    build.read_all();
    assert!(build.graph().read().is_empty());

    let output = build.finish();
    let failed: Vec<&str> = output.failures.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(failed, vec!["book"]);
    let b = output.document("b").expect("b resolved");
    assert_eq!(kinds(&b.root), vec!["section"]);
    assert!(!b.root.astext().contains("C desc"));
}

#[test]
fn updated_assembly_is_converted_again() {
    let mut build = Build::new(book_project(), ConverterSettings::default());
    build.read([DocId::from("book")]);
    let output = build.finish();
    assert_eq!(output.document("book").and_then(|d| d.title.as_deref()), Some("User Guide"));

    let edited = BOOK
        .replace(r#"<structure resourceref="guide">"#, r#"<structure resourceref="usage">"#)
        .replace(r#"<module resourceref="usage"/>"#, "");
    build.update("book", edited);
    assert!(build.converted(&DocId::from("book")).is_none());
    assert!(!build.graph().read().is_root(&DocId::from("book")));

    build.read([DocId::from("book")]);
    let book = DocId::from("book");
    assert_eq!(
        build.graph().read().top_resource(&book),
        Some(&DocId::from("chapters/usage"))
    );
    let output = build.finish();
    assert!(output.is_ok(), "{:?}", output.failures);
    assert_eq!(output.document("book").and_then(|d| d.title.as_deref()), Some("Usage"));
}

#[test]
fn resource_ids_are_local_to_their_assembly() {
    let first = r#"<assembly><resources><resource id="main" fileref="a.xml"/></resources>
        <structure resourceref="main"/></assembly>"#;
    let second = r#"<assembly><resources><resource id="main" fileref="b.xml"/></resources>
        <structure resourceref="main"/></assembly>"#;
    let project = Project::new()
        .with_document("first", first)
        .with_document("second", second)
        .with_document("a", "<article><title>A</title></article>")
        .with_document("b", "<article><title>B</title></article>");
    let mut build = Build::new(project, ConverterSettings::default());
    build.read_all();
    build.purge(&DocId::from("first"));
    build.read([DocId::from("first")]);

    let output = build.finish();
    assert!(output.is_ok(), "{:?}", output.failures);
    assert_eq!(output.document("first").and_then(|d| d.title.as_deref()), Some("A"));
    assert_eq!(output.document("second").and_then(|d| d.title.as_deref()), Some("B"));
}

#[test]
fn project_from_directory() {
    let dir = tempfile::tempdir().expect("temp dir");
    std::fs::create_dir(dir.path().join("chapters")).expect("chapters dir");
    for (id, source) in book_sources() {
        std::fs::write(dir.path().join(format!("{id}.xml")), source).expect("write source");
    }
    std::fs::write(dir.path().join("notes.txt"), "not docbook").expect("write note");

    let project = Project::from_dir(dir.path()).expect("project to load");
    let ids: Vec<&str> = project.ids().map(DocId::as_str).collect();
    assert_eq!(ids, vec!["book", "chapters/install", "chapters/usage", "guide"]);

    let mut build = Build::new(project, ConverterSettings::default());
    build.read([DocId::from("book")]);
    let output = build.finish();
    assert!(output.is_ok());
    assert_eq!(output.document("book").and_then(|d| d.title.as_deref()), Some("User Guide"));
}
