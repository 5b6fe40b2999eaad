//! Rendering compiled bodies to HTML.

use pulldown_cmark::{html, CowStr, Event, Parser, Tag};

use folio_mdx::{
    inline_marker, markdown_options, Body, CodeBlock, Element, Markdown, Node, PropValue, Props,
};

use crate::registry::{ComponentRegistry, RegistryError, Role};
use crate::traits::{RenderError, RenderInput, Renderer};

/// Render a compiled body through a registry.
///
/// Fails with [`RenderError::MissingRenderer`] as soon as a node asks for a
/// role the registry does not know.
pub fn render_body(body: &Body, registry: &ComponentRegistry) -> Result<String, RenderError> {
    let mut out = String::new();
    render_nodes(&body.nodes, registry, &mut out)?;
    Ok(out)
}

fn render_nodes(
    nodes: &[Node],
    registry: &ComponentRegistry,
    out: &mut String,
) -> Result<(), RenderError> {
    for node in nodes {
        match node {
            Node::Markdown(md) => {
                let mut html = render_markdown(md);
                for (index, el) in md.inline.iter().enumerate() {
                    let mut rendered = String::new();
                    render_element(el, registry, true, &mut rendered)?;
                    html = html.replacen(&inline_marker(index), &rendered, 1);
                }
                out.push_str(&html);
            }

            Node::Code(block) => {
                let renderer = lookup(registry, &Role::CodeBlock, block.line_number)?;
                if let Some(renderer) = renderer {
                    let props = code_props(block);
                    out.push_str(&renderer.render(&RenderInput {
                        name: "pre",
                        props: &props,
                        children: &block.source,
                    })?);
                }
            }

            Node::Element(el) => render_element(el, registry, false, out)?,
        }
    }

    Ok(())
}

/// Render one element; the parent's role is looked up before its children.
///
/// Inline elements get their children without the wrapping paragraph.
fn render_element(
    el: &Element,
    registry: &ComponentRegistry,
    inline: bool,
    out: &mut String,
) -> Result<(), RenderError> {
    let role = Role::from_element(&el.name);
    let renderer = lookup(registry, &role, el.line_number)?;

    let mut children = String::new();
    render_nodes(&el.children, registry, &mut children)?;
    if inline {
        children = unwrap_paragraph(children);
    }

    if let Some(renderer) = renderer {
        out.push_str(&renderer.render(&RenderInput {
            name: &el.name,
            props: &el.props,
            children: &children,
        })?);
    }

    Ok(())
}

/// Strip the `<p>` around a single rendered paragraph.
fn unwrap_paragraph(html: String) -> String {
    let inner = html
        .trim_end()
        .strip_prefix("<p>")
        .and_then(|rest| rest.strip_suffix("</p>"))
        .filter(|inner| !inner.contains("<p>"))
        .map(str::to_string);
    inner.unwrap_or(html)
}

fn lookup<'r>(
    registry: &'r ComponentRegistry,
    role: &Role,
    line: usize,
) -> Result<Option<&'r dyn Renderer>, RenderError> {
    registry
        .resolve(role)
        .map_err(|RegistryError::MissingRenderer(role)| RenderError::MissingRenderer {
            role: role.to_string(),
            line,
        })
}

/// Props passed to the code block role.
fn code_props(block: &CodeBlock) -> Props {
    let mut props = Props::new();
    props.insert(
        "lang".to_string(),
        PropValue::String(block.language.as_str().to_string()),
    );
    if let Some(title) = &block.title {
        props.insert("title".to_string(), PropValue::String(title.clone()));
    }
    props
}

/// Render a markdown segment, giving headings their precomputed anchor ids.
pub fn render_markdown(md: &Markdown) -> String {
    let mut ids = md.heading_ids.iter();
    let parser = Parser::new_ext(&md.source, markdown_options()).map(|event| match event {
        Event::Start(Tag::Heading {
            level,
            id,
            classes,
            attrs,
        }) => Event::Start(Tag::Heading {
            level,
            id: ids.next().map(|s| CowStr::from(s.as_str())).or(id),
            classes,
            attrs,
        }),
        other => other,
    });

    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    html_output
}

/// Render standalone markdown (descriptions inside components).
pub fn markdown_to_html(source: &str) -> String {
    let parser = Parser::new_ext(source, markdown_options());
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    html_output
}

/// Escape HTML special characters including single quotes.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
