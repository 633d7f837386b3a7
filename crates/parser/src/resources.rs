//! Resource tree walker
//!
//! Descends the `<resources>` tree depth-first, accumulating the URL path
//! and the params declared by every enclosing resource, and binds each
//! method reference to its final URL and inherited arguments.

use crate::variables::params_to_variables;
use crate::wadl::{MethodBinding, Resource, Resources};
use std::collections::HashSet;
use url::{ParseError, Position, Url};
use wadlgen_common::{Diagnostics, Document, GeneratorError, Result, Variable};

/// Origin that root-relative bases such as `/v2` are resolved against
const RELATIVE_ORIGIN: &str = "http://relative.invalid/";

/// Bind every method referenced from the resource groups
///
/// Each group's base URL is `base_url_override` when given, otherwise the
/// group's own `base`. A root-relative base (`/v2`) yields root-relative
/// method URLs; any other base that does not parse as a URL is fatal.
///
/// A method is bound once. A second resource referencing an already bound
/// method is skipped with a warning.
pub fn bind_resources(
    document: &mut Document,
    groups: &[Resources],
    base_url_override: Option<&str>,
    diagnostics: &mut Diagnostics,
) -> Result<()> {
    let mut walker = ResourceWalker {
        document,
        diagnostics,
        bound: HashSet::new(),
        relative: false,
    };

    for group in groups {
        let base = base_url_override
            .filter(|url| !url.is_empty())
            .unwrap_or(&group.base);

        let (parsed, relative) = parse_base(base)?;
        tracing::debug!("base: {parsed} (relative: {relative})");

        walker.relative = relative;
        walker.walk(&parsed, &[], &group.resources);
    }
    Ok(())
}

/// Parse a base URL, resolving root-relative paths against a placeholder
/// origin that is stripped again when URLs are rendered
fn parse_base(base: &str) -> Result<(Url, bool)> {
    let invalid = |source: ParseError| GeneratorError::InvalidBaseUrl {
        url: base.to_string(),
        source,
    };

    match Url::parse(base) {
        Ok(url) => Ok((url, false)),
        Err(ParseError::RelativeUrlWithoutBase) if base.starts_with('/') => {
            let url = Url::parse(RELATIVE_ORIGIN)
                .and_then(|origin| origin.join(base))
                .map_err(invalid)?;
            Ok((url, true))
        }
        Err(source) => Err(invalid(source)),
    }
}

struct ResourceWalker<'a> {
    document: &'a mut Document,
    diagnostics: &'a mut Diagnostics,
    /// Names of methods already given a URL
    bound: HashSet<String>,
    /// Whether the current group's base is root-relative
    relative: bool,
}

impl ResourceWalker<'_> {
    /// Walk one level of the tree
    ///
    /// `base` and `inherited` are snapshots: every resource extends its own
    /// copies, so siblings never see each other's path or params.
    fn walk(&mut self, base: &Url, inherited: &[Variable], resources: &[Resource]) {
        for resource in resources {
            let url = join_url(base, &resource.path);
            let mut params = inherited.to_vec();
            params.extend(params_to_variables(&resource.params));

            tracing::debug!(
                "url for {}: {}",
                resource.id.as_deref().unwrap_or(&resource.path),
                url
            );

            self.walk(&url, &params, &resource.resources);

            for binding in &resource.methods {
                self.bind(binding_key(binding), &url, &params);
            }
        }
    }

    fn bind(&mut self, key: &str, url: &Url, params: &[Variable]) {
        let rendered = self.render_url(url);

        let Some(method) = self.document.get_mut(key) else {
            self.diagnostics
                .warn(format!("referenced method {key} was not found"));
            return;
        };

        if !self.bound.insert(key.to_string()) {
            self.diagnostics.warn(format!(
                "method {key} is already bound to {}; ignoring its binding at {rendered}",
                method.url
            ));
            return;
        }

        method.url = rendered;
        method.arguments.extend(params.iter().cloned());
    }

    fn render_url(&self, url: &Url) -> String {
        if self.relative {
            url[Position::BeforePath..].to_string()
        } else {
            url.to_string()
        }
    }
}

/// Document key a method binding points at
///
/// References use the fragment after the last `#` (`#getPet` → `getPet`);
/// a reference without one only has a leading `/` removed.
pub fn binding_key(binding: &MethodBinding) -> &str {
    match binding {
        MethodBinding::Reference(href) => match href.rsplit_once('#') {
            Some((_, fragment)) => fragment,
            None => href.strip_prefix('/').unwrap_or(href),
        },
        MethodBinding::Inline(method) => &method.id,
    }
}

/// Join a path segment onto a URL's path
///
/// Redundant separators and `.`/`..` segments collapse. Characters such as
/// `{` and `}` are percent-encoded by the URL.
pub fn join_url(base: &Url, segment: &str) -> Url {
    let mut url = base.clone();
    url.set_path(&join_path(base.path(), segment));
    url
}

/// Lexical path join: concatenate with `/` then clean
pub fn join_path(base: &str, segment: &str) -> String {
    let joined = match (base.is_empty(), segment.is_empty()) {
        (true, true) => return String::new(),
        (true, false) => segment.to_string(),
        (false, true) => base.to_string(),
        (false, false) => format!("{base}/{segment}"),
    };
    clean_path(&joined)
}

fn clean_path(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if rooted => {}
                _ => parts.push(".."),
            },
            _ => parts.push(part),
        }
    }

    let cleaned = parts.join("/");
    match (rooted, cleaned.is_empty()) {
        (true, _) => format!("/{cleaned}"),
        (false, true) => ".".to_string(),
        (false, false) => cleaned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wadl::{self, Param};
    use wadlgen_common::{Method, RequestType};

    fn resource(path: &str, params: &[&str], methods: &[&str], children: Vec<Resource>) -> Resource {
        Resource {
            id: None,
            path: path.to_string(),
            docs: vec![],
            params: params
                .iter()
                .map(|name| Param {
                    name: name.to_string(),
                    param_type: "xsd:string".to_string(),
                    style: RequestType::Template,
                    required: true,
                    ..Param::default()
                })
                .collect(),
            methods: methods
                .iter()
                .map(|m| MethodBinding::Reference(format!("#{m}")))
                .collect(),
            resources: children,
        }
    }

    fn document(names: &[&str]) -> Document {
        let mut doc = Document::new();
        for name in names {
            doc.insert(Method::new(*name, "GET"));
        }
        doc
    }

    fn arg_names(doc: &Document, method: &str) -> Vec<String> {
        doc.get(method)
            .unwrap()
            .arguments
            .iter()
            .map(|v| v.name.clone())
            .collect()
    }

    #[test]
    fn test_join_path_collapses_separators() {
        assert_eq!(join_path("/v1/", "/pets/"), "/v1/pets");
        assert_eq!(join_path("/", "pets"), "/pets");
        assert_eq!(join_path("/v1", ""), "/v1");
        assert_eq!(join_path("/v1/pets", "../owners"), "/v1/owners");
        assert_eq!(join_path("/", "../x"), "/x");
        assert_eq!(join_path("", ""), "");
        assert_eq!(join_path("a", "./b"), "a/b");
    }

    #[test]
    fn test_join_is_associative() {
        let base = Url::parse("https://api.example.com/v2/").unwrap();
        let stepwise = join_url(&join_url(&base, "a"), "b");
        let at_once = join_url(&base, "a/b");
        assert_eq!(stepwise, at_once);
        assert_eq!(stepwise.as_str(), "https://api.example.com/v2/a/b");
    }

    #[test]
    fn test_template_placeholders_are_percent_encoded() {
        let base = Url::parse("https://api.example.com/v1").unwrap();
        let url = join_url(&join_url(&base, "pets"), "{id}");
        assert_eq!(url.as_str(), "https://api.example.com/v1/pets/%7Bid%7D");
    }

    #[test]
    fn test_binding_key() {
        let by_ref = MethodBinding::Reference("#getPet".to_string());
        assert_eq!(binding_key(&by_ref), "getPet");

        let external = MethodBinding::Reference("pets.wadl#listPets".to_string());
        assert_eq!(binding_key(&external), "listPets");

        let slashed = MethodBinding::Reference("/getPet".to_string());
        assert_eq!(binding_key(&slashed), "getPet");

        let inline = MethodBinding::Inline(wadl::Method {
            id: "getStatus".to_string(),
            ..wadl::Method::default()
        });
        assert_eq!(binding_key(&inline), "getStatus");
    }

    #[test]
    fn test_inherited_params_accumulate_down_one_branch() {
        let tree = vec![resource(
            "tenants/{tenant_id}",
            &["tenant_id"],
            &[],
            vec![resource(
                "servers/{server_id}",
                &["server_id"],
                &["getServer"],
                vec![resource("ips/{network}", &["network"], &["getIps"], vec![])],
            )],
        )];
        let groups = vec![Resources {
            base: "https://compute.example.com/v2".to_string(),
            resources: tree,
        }];

        let mut doc = document(&["getServer", "getIps"]);
        let mut diags = Diagnostics::new();
        bind_resources(&mut doc, &groups, None, &mut diags).unwrap();

        assert!(diags.is_empty());
        assert_eq!(arg_names(&doc, "getServer"), vec!["tenant_id", "server_id"]);
        assert_eq!(
            arg_names(&doc, "getIps"),
            vec!["tenant_id", "server_id", "network"]
        );
        assert_eq!(
            doc.get("getIps").unwrap().url,
            "https://compute.example.com/v2/tenants/%7Btenant_id%7D/servers/%7Bserver_id%7D/ips/%7Bnetwork%7D"
        );
    }

    #[test]
    fn test_siblings_do_not_share_params() {
        let groups = vec![Resources {
            base: "https://api.example.com/".to_string(),
            resources: vec![
                resource("a/{a}", &["a"], &["getA"], vec![]),
                resource("b/{b}", &["b"], &["getB"], vec![]),
            ],
        }];

        let mut doc = document(&["getA", "getB"]);
        let mut diags = Diagnostics::new();
        bind_resources(&mut doc, &groups, None, &mut diags).unwrap();

        assert_eq!(arg_names(&doc, "getA"), vec!["a"]);
        assert_eq!(arg_names(&doc, "getB"), vec!["b"]);
        assert_eq!(doc.get("getB").unwrap().url, "https://api.example.com/b/%7Bb%7D");
    }

    #[test]
    fn test_unknown_method_is_warned_and_skipped() {
        let groups = vec![Resources {
            base: "https://api.example.com/".to_string(),
            resources: vec![resource("pets", &[], &["listPets", "ghost"], vec![])],
        }];

        let mut doc = document(&["listPets"]);
        let mut diags = Diagnostics::new();
        bind_resources(&mut doc, &groups, None, &mut diags).unwrap();

        assert_eq!(doc.len(), 1);
        assert!(doc.get("listPets").unwrap().is_resolved());
        assert_eq!(diags.warnings().count(), 1);
        assert!(diags.iter().next().unwrap().message.contains("ghost"));
    }

    #[test]
    fn test_base_url_override() {
        let groups = vec![Resources {
            base: "https://api.example.com/v1".to_string(),
            resources: vec![resource("pets", &[], &["listPets"], vec![])],
        }];

        let mut doc = document(&["listPets"]);
        let mut diags = Diagnostics::new();
        bind_resources(&mut doc, &groups, Some("http://localhost:8080/test"), &mut diags)
            .unwrap();

        assert_eq!(
            doc.get("listPets").unwrap().url,
            "http://localhost:8080/test/pets"
        );
    }

    #[test]
    fn test_method_bound_twice_keeps_first_binding() {
        let groups = vec![Resources {
            base: "https://api.example.com/".to_string(),
            resources: vec![
                resource("a/{id}", &["id"], &["getX"], vec![]),
                resource("b/{id}", &["id"], &["getX"], vec![]),
            ],
        }];

        let mut doc = document(&["getX"]);
        let mut diags = Diagnostics::new();
        bind_resources(&mut doc, &groups, None, &mut diags).unwrap();

        assert_eq!(arg_names(&doc, "getX"), vec!["id"]);
        assert_eq!(doc.get("getX").unwrap().url, "https://api.example.com/a/%7Bid%7D");
        assert_eq!(diags.warnings().count(), 1);
        let message = &diags.iter().next().unwrap().message;
        assert!(message.contains("getX") && message.contains("/b/%7Bid%7D"), "{message}");
    }

    #[test]
    fn test_root_relative_base() {
        let groups = vec![Resources {
            base: "/v2".to_string(),
            resources: vec![resource("servers/{id}", &["id"], &["getServer"], vec![])],
        }];

        let mut doc = document(&["getServer"]);
        let mut diags = Diagnostics::new();
        bind_resources(&mut doc, &groups, None, &mut diags).unwrap();

        assert_eq!(doc.get("getServer").unwrap().url, "/v2/servers/%7Bid%7D");
        assert!(diags.is_empty());
    }

    #[test]
    fn test_unparseable_base_is_fatal() {
        let groups = vec![Resources {
            base: "not a url".to_string(),
            resources: vec![],
        }];
        let mut doc = Document::new();
        let mut diags = Diagnostics::new();
        let result = bind_resources(&mut doc, &groups, None, &mut diags);
        assert!(matches!(
            result,
            Err(GeneratorError::InvalidBaseUrl { ref url, .. }) if url == "not a url"
        ));
    }
}
