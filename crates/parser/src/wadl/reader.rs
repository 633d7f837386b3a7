//! XML reader producing the WADL parse tree
//!
//! Walks quick-xml events depth-first. Element and attribute names are
//! matched by local name, so `wadl:method` and `method` are the same thing.
//! Elements wadlgen has no use for are skipped whole. Missing or malformed
//! required attributes are collected as structural errors instead of
//! stopping at the first one.

use super::types::{
    Application, Doc, Grammars, Include, Method, MethodBinding, Param, Representation, Request,
    Resource, Resources, Response,
};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use wadlgen_common::{GeneratorError, RequestType, Result};

/// Result of reading a WADL document: the tree plus any structural errors
#[derive(Debug)]
pub struct ReadOutcome {
    pub application: Application,
    pub errors: Vec<String>,
}

/// Read a WADL document
///
/// Malformed XML is returned as an error. Structural problems are reported
/// through [`ReadOutcome::errors`].
pub fn read_application(xml: &str) -> Result<ReadOutcome> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut tree = TreeReader {
        source: xml,
        reader,
        errors: Vec::new(),
    };
    let application = tree.read_root()?;

    Ok(ReadOutcome {
        application,
        errors: tree.errors,
    })
}

enum Node<'a> {
    Open(BytesStart<'a>),
    Empty(BytesStart<'a>),
    Close,
}

struct TreeReader<'a> {
    source: &'a str,
    reader: Reader<&'a [u8]>,
    errors: Vec<String>,
}

impl<'a> TreeReader<'a> {
    fn read_root(&mut self) -> Result<Application> {
        let (start, open) = loop {
            match self.reader.read_event().map_err(xml_error)? {
                Event::Start(start) => break (start, true),
                Event::Empty(start) => break (start, false),
                Event::Eof => {
                    self.errors
                        .push("document has no application element".to_string());
                    return Ok(Application::default());
                }
                _ => {}
            }
        };

        let name = local_name(&start);
        if name != "application" {
            self.errors.push(format!(
                "root element is <{name}>, expected <application>"
            ));
            return Ok(Application::default());
        }

        let mut app = Application::default();
        self.each_child(open, |this, child, child_open| {
            match local_name(child).as_str() {
                "doc" => app.docs.push(this.read_doc(child, child_open)?),
                "grammars" => {
                    let grammars = this.read_grammars(child_open)?;
                    app.grammars.includes.extend(grammars.includes);
                }
                "resources" => app.resources.push(this.read_resources(child, child_open)?),
                "method" => {
                    let attrs = this.attributes(child)?;
                    if !attrs.contains_key("id") {
                        this.errors
                            .push("top-level method is missing an id attribute".to_string());
                    }
                    app.methods.push(this.read_method(attrs, child_open)?);
                }
                _ => return Ok(false),
            }
            Ok(true)
        })?;

        Ok(app)
    }

    fn read_grammars(&mut self, open: bool) -> Result<Grammars> {
        let mut grammars = Grammars::default();
        self.each_child(open, |this, child, child_open| {
            if local_name(child) != "include" {
                return Ok(false);
            }
            let mut attrs = this.attributes(child)?;
            match attrs.remove("href") {
                Some(href) => grammars.includes.push(Include { href }),
                None => this
                    .errors
                    .push("grammar include is missing an href attribute".to_string()),
            }
            this.skip(child, child_open)?;
            Ok(true)
        })?;
        Ok(grammars)
    }

    fn read_resources(&mut self, start: &BytesStart<'a>, open: bool) -> Result<Resources> {
        let mut attrs = self.attributes(start)?;
        let base = attrs.remove("base").unwrap_or_else(|| {
            self.errors
                .push("resources element is missing a base attribute".to_string());
            String::new()
        });

        let mut group = Resources {
            base,
            resources: Vec::new(),
        };
        self.each_child(open, |this, child, child_open| {
            if local_name(child) != "resource" {
                return Ok(false);
            }
            group.resources.push(this.read_resource(child, child_open)?);
            Ok(true)
        })?;
        Ok(group)
    }

    fn read_resource(&mut self, start: &BytesStart<'a>, open: bool) -> Result<Resource> {
        let mut attrs = self.attributes(start)?;
        let mut resource = Resource {
            id: attrs.remove("id"),
            path: attrs.remove("path").unwrap_or_default(),
            ..Resource::default()
        };

        self.each_child(open, |this, child, child_open| {
            match local_name(child).as_str() {
                "doc" => resource.docs.push(this.read_doc(child, child_open)?),
                "param" => resource.params.push(this.read_param(child, child_open)?),
                "method" => resource
                    .methods
                    .push(this.read_method_binding(child, child_open)?),
                "resource" => resource
                    .resources
                    .push(this.read_resource(child, child_open)?),
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        Ok(resource)
    }

    fn read_method_binding(&mut self, start: &BytesStart<'a>, open: bool) -> Result<MethodBinding> {
        let mut attrs = self.attributes(start)?;
        if let Some(href) = attrs.remove("href") {
            self.skip(start, open)?;
            return Ok(MethodBinding::Reference(href));
        }
        if !attrs.contains_key("id") {
            self.errors
                .push("method element has neither an id nor an href attribute".to_string());
        }
        Ok(MethodBinding::Inline(self.read_method(attrs, open)?))
    }

    fn read_method(&mut self, mut attrs: HashMap<String, String>, open: bool) -> Result<Method> {
        let id = attrs.remove("id").unwrap_or_default();
        let name = attrs.remove("name").unwrap_or_else(|| {
            self.errors
                .push(format!("method {id:?} is missing a name attribute"));
            String::new()
        });

        let mut method = Method {
            id,
            name,
            ..Method::default()
        };
        self.each_child(open, |this, child, child_open| {
            match local_name(child).as_str() {
                "doc" => method.docs.push(this.read_doc(child, child_open)?),
                "request" => method.request = Some(this.read_request(child_open)?),
                "response" => method
                    .responses
                    .push(this.read_response(child, child_open)?),
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        Ok(method)
    }

    fn read_request(&mut self, open: bool) -> Result<Request> {
        let mut request = Request::default();
        self.each_child(open, |this, child, child_open| {
            match local_name(child).as_str() {
                "doc" => request.docs.push(this.read_doc(child, child_open)?),
                "param" => request.params.push(this.read_param(child, child_open)?),
                "representation" => request
                    .representations
                    .push(this.read_representation(child, child_open)?),
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        Ok(request)
    }

    fn read_response(&mut self, start: &BytesStart<'a>, open: bool) -> Result<Response> {
        let mut attrs = self.attributes(start)?;
        let mut response = Response {
            status: attrs.remove("status").unwrap_or_default(),
            ..Response::default()
        };
        self.each_child(open, |this, child, child_open| {
            match local_name(child).as_str() {
                "doc" => response.docs.push(this.read_doc(child, child_open)?),
                "param" => response.params.push(this.read_param(child, child_open)?),
                "representation" => response
                    .representations
                    .push(this.read_representation(child, child_open)?),
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        Ok(response)
    }

    fn read_representation(&mut self, start: &BytesStart<'a>, open: bool) -> Result<Representation> {
        let mut attrs = self.attributes(start)?;
        let mut representation = Representation {
            media_type: attrs.remove("mediaType").unwrap_or_default(),
            json_ref: attrs.remove("ref"),
            ..Representation::default()
        };
        self.each_child(open, |this, child, child_open| {
            match local_name(child).as_str() {
                "doc" => representation.docs.push(this.read_doc(child, child_open)?),
                "param" => representation
                    .params
                    .push(this.read_param(child, child_open)?),
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        Ok(representation)
    }

    fn read_param(&mut self, start: &BytesStart<'a>, open: bool) -> Result<Param> {
        let mut attrs = self.attributes(start)?;
        let name = attrs.remove("name").unwrap_or_else(|| {
            self.errors
                .push("param is missing a name attribute".to_string());
            String::new()
        });

        let style = match attrs.remove("style") {
            None => RequestType::Plain,
            Some(style) => style.parse().unwrap_or_else(|e| {
                self.errors.push(format!("param {name:?}: {e}"));
                RequestType::Plain
            }),
        };

        let required = match attrs.remove("required").as_deref() {
            None | Some("false") | Some("0") => false,
            Some("true") | Some("1") => true,
            Some(other) => {
                self.errors.push(format!(
                    "param {name:?}: required must be a boolean, got {other:?}"
                ));
                false
            }
        };

        let mut param = Param {
            name,
            param_type: attrs.remove("type").unwrap_or_default(),
            style,
            required,
            path: attrs.remove("path"),
            docs: Vec::new(),
        };
        self.each_child(open, |this, child, child_open| {
            if local_name(child) != "doc" {
                return Ok(false);
            }
            param.docs.push(this.read_doc(child, child_open)?);
            Ok(true)
        })?;
        Ok(param)
    }

    fn read_doc(&mut self, start: &BytesStart<'a>, open: bool) -> Result<Doc> {
        let mut attrs = self.attributes(start)?;
        let content = if open {
            let span = self.reader.read_to_end(start.name()).map_err(xml_error)?;
            let (from, to) = (usize::try_from(span.start), usize::try_from(span.end));
            from.ok()
                .zip(to.ok())
                .and_then(|(from, to)| self.source.get(from..to))
                .unwrap_or_default()
                .to_string()
        } else {
            String::new()
        };
        Ok(Doc {
            title: attrs.remove("title"),
            content,
        })
    }

    /// Visit the children of an element until its end tag
    ///
    /// `visit` returns whether it consumed the child; children it declines
    /// are skipped whole.
    fn each_child(
        &mut self,
        open: bool,
        mut visit: impl FnMut(&mut Self, &BytesStart<'a>, bool) -> Result<bool>,
    ) -> Result<()> {
        if !open {
            return Ok(());
        }
        loop {
            let (child, child_open) = match self.next_node()? {
                Node::Close => return Ok(()),
                Node::Open(child) => (child, true),
                Node::Empty(child) => (child, false),
            };
            if !visit(self, &child, child_open)? {
                self.skip(&child, child_open)?;
            }
        }
    }

    fn next_node(&mut self) -> Result<Node<'a>> {
        loop {
            match self.reader.read_event().map_err(xml_error)? {
                Event::Start(start) => return Ok(Node::Open(start)),
                Event::Empty(start) => return Ok(Node::Empty(start)),
                Event::End(_) => return Ok(Node::Close),
                Event::Eof => {
                    return Err(GeneratorError::Parse(
                        "unexpected end of WADL document".to_string(),
                    ))
                }
                _ => {}
            }
        }
    }

    fn skip(&mut self, start: &BytesStart<'a>, open: bool) -> Result<()> {
        if open {
            self.reader.read_to_end(start.name()).map_err(xml_error)?;
        }
        Ok(())
    }

    /// Attributes keyed by local name
    fn attributes(&mut self, start: &BytesStart<'a>) -> Result<HashMap<String, String>> {
        let mut attrs = HashMap::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| GeneratorError::Parse(format!("bad attribute: {e}")))?;
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr.unescape_value().map_err(xml_error)?.into_owned();
            attrs.insert(key, value);
        }
        Ok(attrs)
    }
}

fn local_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.local_name().as_ref()).into_owned()
}

fn xml_error(e: quick_xml::Error) -> GeneratorError {
    GeneratorError::Parse(format!("malformed WADL XML: {e}"))
}

/// Find the `href` attribute of the first element in a markup fragment
///
/// Used on `<doc>` contents such as `<xsdxt:code href="samples/pet.json"/>`.
pub fn first_href(fragment: &str) -> Result<Option<String>> {
    let mut reader = Reader::from_str(fragment);
    reader.config_mut().trim_text(true);
    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(start) | Event::Empty(start) => {
                for attr in start.attributes() {
                    let attr =
                        attr.map_err(|e| GeneratorError::Parse(format!("bad attribute: {e}")))?;
                    if attr.key.local_name().as_ref() == b"href" {
                        return Ok(Some(attr.unescape_value().map_err(xml_error)?.into_owned()));
                    }
                }
                return Ok(None);
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}
