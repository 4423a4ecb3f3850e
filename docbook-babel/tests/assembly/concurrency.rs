//! Phase 1 of several documents on separate threads, one shared graph.

use docbook_babel::assembly::{self, resolve};
use docbook_babel::{
    convert_document, ConvertEnv, ConverterSettings, DocId, Document, HandlerRegistry, Project,
    Reporter,
};
use std::collections::BTreeMap;
use std::thread;

fn assembly_of(chapter: &str) -> String {
    format!(
        r#"<assembly><resources><resource id="r" fileref="{chapter}.xml"><description>{chapter}</description></resource></resources><structure resourceref="r"/></assembly>"#
    )
}

fn project(count: usize) -> Project {
    let mut project = Project::new();
    for i in 0..count {
        project.insert(format!("book{i}"), assembly_of(&format!("ch{i}")));
        project.insert(
            format!("ch{i}"),
            format!("<chapter><title>Chapter {i}</title><para>text {i}</para></chapter>"),
        );
    }
    project
}

#[test]
fn threads_share_one_graph() {
    const COUNT: usize = 8;
    let project = project(COUNT);
    let settings = ConverterSettings::default();
    let registry = HandlerRegistry::with_defaults();
    let graph = assembly::shared();
    let env = ConvertEnv::new(&settings, &registry).with_assembly(&graph, &project);

    let documents: BTreeMap<DocId, Document> = thread::scope(|scope| {
        let handles: Vec<_> = project
            .ids()
            .map(|id| {
                let source = project.source(id).expect("source exists");
                let env = &env;
                scope.spawn(move || {
                    let mut reporter = Reporter::new();
                    convert_document(id.clone(), source, env, &mut reporter)
                        .expect("conversion succeeds")
                        .document
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| {
                let document = handle.join().expect("thread finished");
                (document.id.clone(), document)
            })
            .collect()
    });

    {
        let graph = graph.read();
        for i in 0..COUNT {
            let root = DocId::from(format!("book{i}"));
            assert_eq!(graph.top_resource(&root), Some(&DocId::from(format!("ch{i}"))));
        }
    }

    let resolution = resolve(documents, &graph.read());
    assert!(resolution.failures.is_empty());
    for i in 0..COUNT {
        let book = &resolution.documents[&DocId::from(format!("book{i}"))];
        assert_eq!(book.title.as_deref(), Some(format!("Chapter {i}").as_str()));
        assert!(book.root.astext().contains(&format!("text {i}")));
    }
}
