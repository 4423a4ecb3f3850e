//! Assembly elements (phase 1)

use super::session::Level;
use crate::convert::registry::HandlerRegistry;
use crate::convert::{Converter, HandlerResult};
use crate::error::ConvertError;
use crate::handlers::ignore;
use crate::ir::nodes::{NavEntry, NodeKind, OutputNode};
use crate::source::{SourceElement, XML_NS};

pub fn register(registry: &mut HandlerRegistry) {
    registry.register_primary("assembly", assembly);
    registry.register_primary("resources", resources);
    registry.register_primary("resource", resource);
    registry.register_primary("structure", structure);
    registry.register_primary("module", module);
    registry.register_primary("output", ignore);
}

/// Whether assembly markup can be processed; warns and returns false if not.
fn has_session(cx: &mut Converter<'_>, el: &SourceElement) -> bool {
    if cx.assembly().is_some() {
        return true;
    }
    cx.warning(
        el.line,
        format!("<{}> skipped: assemblies need a build", el.local_name()),
    );
    false
}

fn visit_children(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    for child in el.elements() {
        cx.convert(child, parent)?;
    }
    Ok(())
}

fn assembly(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    if !has_session(cx, el) {
        return Ok(());
    }
    if let Some(id) = cx.element_id(el) {
        if cx.register_id(&id, el.line) {
            parent.ids.push(id);
        }
    }
    visit_children(cx, el, parent)
}

fn resources(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    if !has_session(cx, el) {
        return Ok(());
    }
    let base = el.attr_ns(Some(XML_NS), "base").unwrap_or("");
    if let Some(session) = cx.assembly() {
        session.set_base(base);
    }
    visit_children(cx, el, parent)
}

fn resource(cx: &mut Converter<'_>, el: &SourceElement, _parent: &mut OutputNode) -> HandlerResult {
    if !has_session(cx, el) {
        return Ok(());
    }
    let (Some(id), Some(fileref)) = (cx.element_id(el), el.attr("fileref")) else {
        cx.warning(el.line, "resource needs an id and a fileref");
        return Ok(());
    };
    let description = cx
        .child(el, "description")
        .map(|d| d.text_content().trim().to_string());
    if let Some(session) = cx.assembly() {
        session.declare_resource(&id, fileref, description);
    }
    Ok(())
}

/// Run `f` inside the composition level of `el`'s `resourceref`.
fn in_module<'a>(
    cx: &mut Converter<'a>,
    el: &SourceElement,
    f: impl FnOnce(&mut Converter<'a>) -> HandlerResult,
) -> Result<Option<Level>, ConvertError> {
    let Some(resourceref) = el.attr("resourceref") else {
        cx.warning(el.line, format!("<{}> without resourceref skipped", el.local_name()));
        return Ok(None);
    };
    let Some(session) = cx.assembly() else {
        return Ok(None);
    };
    session.push_module(resourceref, el.line)?;
    let result = f(cx);
    let level = cx.assembly().and_then(|session| session.pop_module());
    result.map(|()| level)
}

/// Insert the placeholder for the current composition level.
fn include_resource(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) {
    let Some((target, resource)) = cx.assembly().and_then(|session| session.include_placeholder()) else {
        return;
    };
    log::debug!("placeholder for {target} ({resource})");
    let kind = NodeKind::Placeholder {
        target,
        resource: resource.clone(),
    };
    let node = cx.create_with_ids(kind, vec![resource], el.line);
    parent.push(node);
}

fn structure(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    if !has_session(cx, el) {
        return Ok(());
    }
    let mut nav_at = None;
    let level = in_module(cx, el, |cx| {
        include_resource(cx, el, parent);
        nav_at = Some(parent.children.len());
        parent.push(OutputNode::new(NodeKind::Navigation {
            entries: Vec::new(),
            hidden: true,
        }));
        let bullet = cx.settings().generic_bullet.clone();
        let wrapper = OutputNode::new(NodeKind::Compound)
            .with_class("toctree-wrapper")
            .with_child(OutputNode::new(NodeKind::BulletList { bullet }));
        parent.push(wrapper);
        visit_children(cx, el, parent)
    })?;
    let (Some(level), Some(nav_at)) = (level, nav_at) else {
        return Ok(());
    };

    let mut items = Vec::new();
    let mut entries = Vec::new();
    for (resource, document) in &level.modules {
        let Some(description) = cx
            .assembly()
            .and_then(|session| session.description(resource))
            .map(str::to_string)
        else {
            continue;
        };
        let reference = OutputNode::new(NodeKind::Reference {
            refid: Some(resource.clone()),
            refuri: None,
        })
        .with_child(OutputNode::text(description.clone()));
        items.push(
            OutputNode::new(NodeKind::ListItem)
                .with_child(OutputNode::new(NodeKind::Paragraph).with_child(reference)),
        );
        entries.push(NavEntry {
            title: description,
            document: document.clone(),
        });
    }

    if let Some(NodeKind::Navigation { entries: nav, .. }) = parent.children.get_mut(nav_at).map(|n| &mut n.kind) {
        nav.extend(entries);
    }
    if let Some(list) = parent
        .children
        .get_mut(nav_at + 1)
        .and_then(|wrapper| wrapper.children.first_mut())
    {
        list.children.extend(items);
    }
    Ok(())
}

fn module(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    if !has_session(cx, el) {
        return Ok(());
    }
    in_module(cx, el, |cx| {
        let (description, depth) = match cx.assembly() {
            Some(session) => {
                let level = session.current().map(|level| level.resource.clone());
                let description = level
                    .as_deref()
                    .and_then(|resource| session.description(resource))
                    .map(str::to_string);
                (description, session.depth())
            }
            None => (None, 0),
        };
        if let (Some(description), Some(session)) = (description, cx.assembly()) {
            session.register_edge(&description);
        }
        if depth <= 2 {
            include_resource(cx, el, parent);
        }
        visit_children(cx, el, parent)
    })?;
    Ok(())
}
