//! Owned XML element tree built from `quick_xml` events.
//!
//! The extractor needs two things from a document: "all elements matching a
//! name/namespace/attribute predicate" and "concatenated descendant text". A
//! streaming reader cannot answer the second for nested markup, so the
//! document is materialized once into this small tree.
//!
//! Parsing is strict: mismatched or unclosed tags, unknown entities, unbound
//! namespace prefixes, a missing root or content after the root all fail
//! with `ScrapeError::Parse`. Internal entities declared in the DOCTYPE are
//! expanded.

use crate::error::{Result, ScrapeError};
use lazy_static::lazy_static;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;
use regex::Regex;
use std::collections::HashMap;

lazy_static! {
    // Internal general entity: <!ENTITY name "value"> or <!ENTITY name 'value'>
    static ref ENTITY_DECL: Regex =
        Regex::new(r#"<!ENTITY\s+([^\s%"']+)\s+(?:"([^"]*)"|'([^']*)')\s*>"#).unwrap();
}

#[derive(Debug)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug)]
pub struct Element {
    /// Local name, without prefix.
    pub name: String,
    /// Resolved namespace URI, if the element is in one.
    pub namespace: Option<String>,
    /// (local name, unescaped value) pairs in document order.
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    /// True when the element has local name `name` in namespace `namespace`
    /// (`None` meaning no namespace).
    pub fn is(&self, name: &str, namespace: Option<&str>) -> bool {
        self.name == name && self.namespace.as_deref() == namespace
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Concatenation of all descendant text nodes, in document order.
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    /// Every descendant element (not `self`) matching `predicate`, in
    /// document order.
    pub fn find_all<F>(&self, predicate: F) -> Vec<&Element>
    where
        F: Fn(&Element) -> bool,
    {
        self.descendants().filter(|e| predicate(*e)).collect()
    }

    /// First descendant element (not `self`) matching `predicate`.
    pub fn find<F>(&self, predicate: F) -> Option<&Element>
    where
        F: Fn(&Element) -> bool,
    {
        self.descendants().find(|e| predicate(*e))
    }

    pub fn child_elements(&self) -> impl DoubleEndedIterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// Descendant elements (not `self`) in document order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            pending: self.child_elements().rev().collect(),
        }
    }
}

// Nesting depth is bounded only by the input, so neither walks nor drops
// may recurse.
impl Drop for Element {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        take_child_elements(&mut self.children, &mut pending);
        while let Some(mut element) = pending.pop() {
            take_child_elements(&mut element.children, &mut pending);
        }
    }
}

fn take_child_elements(children: &mut Vec<Node>, out: &mut Vec<Element>) {
    for node in children.drain(..) {
        if let Node::Element(e) = node {
            out.push(e);
        }
    }
}

/// Pre-order iterator over an element's descendants.
pub struct Descendants<'a> {
    pending: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<&'a Element> {
        let element = self.pending.pop()?;
        self.pending.extend(element.child_elements().rev());
        Some(element)
    }
}

fn collect_text(element: &Element, out: &mut String) {
    let mut pending: Vec<&Node> = element.children.iter().rev().collect();
    while let Some(node) = pending.pop() {
        match node {
            Node::Text(t) => out.push_str(t),
            Node::Element(e) => pending.extend(e.children.iter().rev()),
        }
    }
}

/// A parsed, well-formed XML document.
#[derive(Debug)]
pub struct Document {
    root: Element,
}

impl Document {
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = NsReader::from_str(xml);
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;
        let mut entities = Entities::default();

        loop {
            let (resolved, event) = match reader.read_resolved_event() {
                Ok(pair) => pair,
                Err(e) => return Err(ScrapeError::parse(e)),
            };
            let namespace = resolve_namespace(resolved)?;

            match event {
                Event::Start(ref e) => stack.push(open_element(e, namespace, &entities)?),
                Event::Empty(ref e) => {
                    let element = open_element(e, namespace, &entities)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(ref e) => {
                    let closing = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    let element = match stack.pop() {
                        Some(open) if open.name == closing => open,
                        Some(open) => {
                            return Err(ScrapeError::parse(format!(
                                "expected </{}>, found </{}>",
                                open.name, closing
                            )))
                        }
                        None => {
                            return Err(ScrapeError::parse(format!(
                                "unexpected closing tag </{}>",
                                closing
                            )))
                        }
                    };
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(ref t) => {
                    let text = t
                        .unescape_with(|name| entities.resolve(name))
                        .map_err(ScrapeError::parse)?;
                    push_text(&mut stack, &text)?;
                }
                Event::CData(c) => {
                    let text = String::from_utf8_lossy(&c.into_inner()).into_owned();
                    push_text(&mut stack, &text)?;
                }
                Event::DocType(ref d) => entities.declare(&String::from_utf8_lossy(d)),
                Event::Eof => break,
                // Declarations, comments, processing instructions
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(ScrapeError::parse(format!(
                "unclosed element <{}>",
                open.name
            )));
        }
        root.map(|root| Document { root })
            .ok_or_else(|| ScrapeError::parse("no root element"))
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Every element in the document, root included, matching `predicate`.
    pub fn find_all<F>(&self, predicate: F) -> Vec<&Element>
    where
        F: Fn(&Element) -> bool,
    {
        std::iter::once(&self.root)
            .chain(self.root.descendants())
            .filter(|e| predicate(*e))
            .collect()
    }
}

fn resolve_namespace(resolved: ResolveResult) -> Result<Option<String>> {
    match resolved {
        ResolveResult::Bound(Namespace(uri)) => Ok(Some(String::from_utf8_lossy(uri).into_owned())),
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Unknown(prefix) => Err(ScrapeError::parse(format!(
            "unbound namespace prefix '{}'",
            String::from_utf8_lossy(&prefix)
        ))),
    }
}

/// Predefined XML entities plus those declared in the internal DTD subset.
#[derive(Debug, Default)]
struct Entities {
    declared: HashMap<String, String>,
}

impl Entities {
    fn declare(&mut self, doctype: &str) {
        for caps in ENTITY_DECL.captures_iter(doctype) {
            let value = caps.get(2).or_else(|| caps.get(3)).map_or("", |m| m.as_str());
            // The first declaration of an entity is binding.
            self.declared
                .entry(caps[1].to_string())
                .or_insert_with(|| value.to_string());
        }
    }

    fn resolve(&self, name: &str) -> Option<&str> {
        match name {
            "lt" => Some("<"),
            "gt" => Some(">"),
            "amp" => Some("&"),
            "apos" => Some("'"),
            "quot" => Some("\""),
            _ => self.declared.get(name).map(String::as_str),
        }
    }
}

fn open_element(
    start: &BytesStart,
    namespace: Option<String>,
    entities: &Entities,
) -> Result<Element> {
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(ScrapeError::parse)?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr
            .unescape_value_with(|name| entities.resolve(name))
            .map_err(ScrapeError::parse)?
            .into_owned();
        attributes.push((key, value));
    }
    Ok(Element {
        name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
        namespace,
        attributes,
        children: Vec::new(),
    })
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Node::Element(element));
        return Ok(());
    }
    if root.is_some() {
        return Err(ScrapeError::parse(format!(
            "junk after document element: <{}>",
            element.name
        )));
    }
    *root = Some(element);
    Ok(())
}

fn push_text(stack: &mut [Element], text: &str) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(Node::Text(text.to_string()));
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(ScrapeError::parse("text outside the root element")),
    }
}
