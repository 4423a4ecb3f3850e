//! API reference pages (`refentry` and function synopses)
//!
//! A prototype is rebuilt as `funcdef(paramdef, paramdef)`. Parameter text
//! often carries alignment spaces from the generator; those runs are
//! collapsed.
//!
//! With [`api_descriptions`](crate::settings::ConverterSettings::api_descriptions)
//! set, a `refentry` becomes an API description in the `c` domain instead of
//! a section: one signature per `refname`, the prototype split into return
//! type, name and parameter list, and the purpose as description content.
//! The description carries the id `c.<name>` of the last word of the name.

use super::sections::section_at;
use super::{ignore, plain_block, transparent};
use crate::convert::context::TextTransform;
use crate::convert::registry::HandlerRegistry;
use crate::convert::{Children, Converter, HandlerResult};
use crate::error::ConvertError;
use crate::ir::nodes::{ApiObjType, NodeKind, OutputNode};
use crate::source::SourceElement;

pub fn register(registry: &mut HandlerRegistry) {
    registry.register_primary("refentry", refentry);
    registry.register_primary("funcprototype", funcprototype);
    registry.register_primary("funcparams", parenthesized);
    registry.register_primary("manvolnum", parenthesized);
    registry.register_primary("parameter", parameter);
    registry.register_primary("funcdef", transparent);
    registry.register_primary("paramdef", transparent);
    registry.register_primary("funcsynopsis", plain_block);
    registry.register_primary("refpurpose", plain_block);
    registry.register_primary("refname", refname);
    for tag in ["refentryinfo", "refmeta", "info", "output"] {
        registry.register_primary(tag, ignore);
    }
}

fn refentry(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    if !cx.settings().api_descriptions {
        let level = cx.level();
        return section_at(cx, el, parent, level);
    }
    cx.has_no_text(el);
    if let Some(id) = cx.element_id(el) {
        cx.context_mut().queue_anchor(id);
    }
    // Position of the description in `parent` and the words of its last name.
    let mut entry: Option<(usize, Vec<String>)> = None;
    for child in el.elements() {
        let name = if cx.is_primary(child) { child.local_name() } else { "" };
        let index = entry.as_ref().map(|(index, _)| *index);
        match (name, index) {
            ("refnamediv", _) => {
                let (desc, parts) = cx.enter(child, |cx| refnamediv(cx, child))?;
                entry = Some((parent.children.len(), parts));
                parent.push(desc);
            }
            ("refsynopsisdiv", Some(index)) => {
                cx.enter(child, |cx| refsynopsisdiv(cx, child, parent, index))?;
            }
            _ => cx.convert(child, parent)?,
        }
    }
    if let Some((index, parts)) = entry {
        complete_signature(&mut parent.children[index], &parts);
    }
    Ok(())
}

fn refnamediv(
    cx: &mut Converter<'_>,
    el: &SourceElement,
) -> Result<(OutputNode, Vec<String>), ConvertError> {
    let kind = NodeKind::ApiDescription {
        domain: "c".to_string(),
        objtype: None,
    };
    let mut desc = cx.create(el, kind);
    let mut parts = Vec::new();
    cx.has_no_text(el);
    for child in el.elements() {
        let name = if cx.is_primary(child) { child.local_name() } else { "" };
        match name {
            "refname" => {
                let mut ids = Vec::new();
                let (text, _) = cx.no_markup_text(child, &mut ids, false);
                parts = text.split_whitespace().map(str::to_string).collect();
                let signature = cx.create_with_ids(NodeKind::Signature, ids, child.line);
                desc.push(signature);
                if let Some(last) = parts.last() {
                    let id = format!("c.{last}");
                    if cx.register_id(&id, child.line) {
                        desc.ids.push(id);
                    }
                }
            }
            "refpurpose" => {
                cx.enter(child, |cx| cx.concat(child, &mut desc, Some(NodeKind::ApiContent)))?;
            }
            _ => cx.convert(child, &mut desc)?,
        }
    }
    Ok((desc, parts))
}

fn refsynopsisdiv(
    cx: &mut Converter<'_>,
    el: &SourceElement,
    parent: &mut OutputNode,
    index: usize,
) -> HandlerResult {
    let children = cx.restrict(el, &["title", "funcsynopsis", "programlisting"]);
    let synopsis = children.iter().find(|c| c.local_name() == "funcsynopsis");
    let desc = &mut parent.children[index];
    match synopsis {
        Some(synopsis) => {
            set_objtype(desc, ApiObjType::Function);
            let signature = last_signature(desc);
            cx.enter(synopsis, |cx| funcsynopsis_into(cx, synopsis, signature))
        }
        None => {
            set_objtype(desc, ApiObjType::Type);
            match children.iter().find(|c| c.local_name() == "programlisting") {
                Some(listing) => cx.convert(listing, parent),
                None => Ok(()),
            }
        }
    }
}

fn funcsynopsis_into(
    cx: &mut Converter<'_>,
    el: &SourceElement,
    signature: &mut OutputNode,
) -> HandlerResult {
    for child in el.elements() {
        if cx.is_primary(child) && child.local_name() == "funcprototype" {
            cx.enter(child, |cx| prototype_into(cx, child, signature))?;
        } else {
            cx.convert(child, signature)?;
        }
    }
    Ok(())
}

/// Split a prototype into return type, name and parameter list.
fn prototype_into(
    cx: &mut Converter<'_>,
    el: &SourceElement,
    signature: &mut OutputNode,
) -> HandlerResult {
    let children = cx.restrict(el, &["funcdef", "paramdef"]);
    if let Some(funcdef) = children.iter().find(|c| c.local_name() == "funcdef") {
        cx.enter(funcdef, |cx| cx.restrict(funcdef, &["function"]));
        let mut return_type = OutputNode::new(NodeKind::SignatureType);
        if let Some(leading) = funcdef.text.as_deref().filter(|t| !t.is_empty()) {
            let leaf = cx.text(leading);
            return_type.push(leaf);
        }
        signature.push(return_type);
        if let Some(function) = cx.child(funcdef, "function") {
            let (name, _) = cx.no_markup_text(function, &mut Vec::new(), false);
            signature.push(OutputNode::new(NodeKind::SignatureName).with_child(OutputNode::text(name)));
        }
    }
    let mut list = OutputNode::new(NodeKind::ParameterList);
    for paramdef in children.iter().filter(|c| c.local_name() == "paramdef") {
        cx.enter(paramdef, |cx| {
            cx.concat_as(
                paramdef,
                &mut list,
                Some(NodeKind::Parameter),
                None,
                Children::Only(&["parameter", "funcparams"]),
            )
        })?;
    }
    signature.push(list);
    Ok(())
}

fn set_objtype(desc: &mut OutputNode, objtype: ApiObjType) {
    if let NodeKind::ApiDescription { objtype: slot, .. } = &mut desc.kind {
        *slot = Some(objtype);
    }
}

/// The signature a synopsis is written into; created if the names gave none.
fn last_signature(desc: &mut OutputNode) -> &mut OutputNode {
    let position = desc
        .children
        .iter()
        .rposition(|c| c.kind == NodeKind::Signature);
    let position = match position {
        Some(position) => position,
        None => {
            desc.children.insert(0, OutputNode::new(NodeKind::Signature));
            0
        }
    };
    &mut desc.children[position]
}

/// Fill a signature no prototype was written into from the words of the
/// name: `struct foo` gives type `struct ` and name `foo`.
fn complete_signature(desc: &mut OutputNode, parts: &[String]) {
    let Some(name) = parts.last() else {
        return;
    };
    let signature = desc
        .children
        .iter_mut()
        .rev()
        .find(|c| c.kind == NodeKind::Signature);
    let Some(signature) = signature else {
        return;
    };
    if !signature.children.is_empty() {
        return;
    }
    if parts.len() == 2 {
        let type_text = OutputNode::text(format!("{} ", parts[0]));
        signature.push(OutputNode::new(NodeKind::SignatureType).with_child(type_text));
    }
    signature.push(OutputNode::new(NodeKind::SignatureName).with_child(OutputNode::text(name.clone())));
}

fn funcprototype(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    let children = cx.restrict(el, &["funcdef", "paramdef"]);
    if let Some(funcdef) = children.iter().find(|c| c.local_name() == "funcdef") {
        cx.convert(funcdef, parent)?;
    }
    let open = cx.text("(");
    parent.push(open);
    let params = children.iter().filter(|c| c.local_name() == "paramdef");
    for (i, paramdef) in params.enumerate() {
        if i > 0 {
            let comma = cx.text(", ");
            parent.push(comma);
        }
        cx.convert(paramdef, parent)?;
    }
    let close = cx.text(")");
    parent.push(close);
    Ok(())
}

fn parenthesized(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    let open = cx.text("(");
    parent.push(open);
    cx.set_text_transform(Some(TextTransform::CollapseWhitespace));
    cx.concat(el, parent, None)?;
    cx.set_text_transform(None);
    let close = cx.text(")");
    parent.push(close);
    Ok(())
}

fn parameter(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    cx.set_text_transform(Some(TextTransform::CollapseWhitespace));
    let kind = if cx.parent_tag() == Some("paramdef") {
        NodeKind::Emphasis
    } else {
        NodeKind::Literal
    };
    let result = cx.concat(el, parent, Some(kind));
    cx.set_text_transform(None);
    result
}

fn refname(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    cx.no_markup(el, parent, NodeKind::Title)
}
