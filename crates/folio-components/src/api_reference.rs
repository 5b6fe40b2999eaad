//! Embedded API reference rendered from OpenAPI documents.
//!
//! `<APIPage document="./openapi.json" operations={[{ path: '/files', method: 'post' }]} />`
//! renders the selected operations inline. Without `operations`, every
//! operation of the document is rendered.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use folio_mdx::slugify;

use crate::html::{escape_html, markdown_to_html};
use crate::traits::{RenderError, RenderInput, Renderer};

/// Component name of the embedded API reference.
pub const API_PAGE: &str = "APIPage";

/// HTTP methods in the order operations are listed.
const METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// A reference to one operation of an OpenAPI document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OperationRef {
    pub path: String,
    pub method: String,
}

/// Errors that can occur loading API documents.
#[derive(Debug, thiserror::Error)]
pub enum ApiDocumentError {
    #[error("Failed to read API document {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse API document {path}: {message}")]
    Parse { path: String, message: String },
}

/// Renderer for the `APIPage` role, holding the loaded OpenAPI documents.
#[derive(Debug, Clone, Default)]
pub struct ApiReference {
    documents: BTreeMap<String, Value>,
}

impl ApiReference {
    /// Create a renderer with no documents.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parsed document under the key content refers to it by.
    pub fn with_document(mut self, key: &str, document: Value) -> Self {
        self.documents.insert(normalize_key(key), document);
        self
    }

    /// Load documents from disk. Paths are resolved against `base_dir` and
    /// registered under the path as written.
    pub fn load(base_dir: &Path, paths: &[String]) -> Result<Self, ApiDocumentError> {
        let mut reference = Self::new();

        for path in paths {
            let full_path = base_dir.join(normalize_key(path));
            let source = fs::read_to_string(&full_path).map_err(|e| ApiDocumentError::Read {
                path: full_path.display().to_string(),
                source: e,
            })?;

            let is_yaml = matches!(
                full_path.extension().and_then(|e| e.to_str()),
                Some("yaml" | "yml")
            );
            let document: Value = if is_yaml {
                serde_yaml::from_str(&source).map_err(|e| ApiDocumentError::Parse {
                    path: full_path.display().to_string(),
                    message: e.to_string(),
                })?
            } else {
                serde_json::from_str(&source).map_err(|e| ApiDocumentError::Parse {
                    path: full_path.display().to_string(),
                    message: e.to_string(),
                })?
            };

            tracing::debug!("Loaded API document {}", full_path.display());
            reference = reference.with_document(path, document);
        }

        Ok(reference)
    }

    /// Number of loaded documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether no documents are loaded.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Pick the document named by the `document` prop. With a single loaded
    /// document the prop may be omitted.
    fn document(&self, input: &RenderInput<'_>) -> Result<&Value, RenderError> {
        let invalid = |message: String| RenderError::InvalidProps {
            component: input.name.to_string(),
            message,
        };

        match input.str_prop("document") {
            Some(key) => self
                .documents
                .get(&normalize_key(key))
                .ok_or_else(|| invalid(format!("unknown API document `{}`", key))),
            None if self.documents.len() == 1 => self
                .documents
                .values()
                .next()
                .ok_or_else(|| invalid("no API documents loaded".to_string())),
            None => Err(invalid("missing required prop `document`".to_string())),
        }
    }
}

impl Renderer for ApiReference {
    fn name(&self) -> &'static str {
        "api-reference"
    }

    fn render(&self, input: &RenderInput<'_>) -> Result<String, RenderError> {
        let document = self.document(input)?;
        let invalid = |message: String| RenderError::InvalidProps {
            component: input.name.to_string(),
            message,
        };

        let selected = match input.props.get("operations").and_then(|p| p.as_expression()) {
            Some(expr) => parse_operations(expr).map_err(invalid)?,
            None => all_operations(document),
        };

        let mut html = String::from("<div class=\"api-page\">\n");
        for op in &selected {
            let operation = document
                .get("paths")
                .and_then(|paths| paths.get(&op.path))
                .and_then(|item| item.get(&op.method))
                .ok_or_else(|| {
                    invalid(format!(
                        "operation {} {} not found in document",
                        op.method.to_uppercase(),
                        op.path
                    ))
                })?;
            html.push_str(&render_operation(document, op, operation));
        }
        html.push_str("</div>\n");

        Ok(html)
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().trim_start_matches("./").to_string()
}

/// Parse the `operations` expression.
///
/// Accepts JSON as well as JavaScript object literals with unquoted keys and
/// single-quoted strings.
pub fn parse_operations(expr: &str) -> Result<Vec<OperationRef>, String> {
    if let Ok(ops) = serde_json::from_str::<Vec<OperationRef>>(expr) {
        return Ok(normalize_ops(ops));
    }

    // Quoted strings may contain braces (`/files/{id}`)
    static OBJECT_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r#"\{((?:[^{}'"`]|'[^']*'|"[^"]*"|`[^`]*`)*)\}"#)
            .expect("Invalid object regex")
    });
    static PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r#"["']?path["']?\s*:\s*["'`]([^"'`]+)["'`]"#).expect("Invalid path regex")
    });
    static METHOD_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r#"["']?method["']?\s*:\s*["'`]([A-Za-z]+)["'`]"#)
            .expect("Invalid method regex")
    });

    let mut ops = Vec::new();
    for object in OBJECT_RE.captures_iter(expr) {
        let body = &object[1];
        let path = PATH_RE
            .captures(body)
            .map(|c| c[1].to_string())
            .ok_or_else(|| format!("operation without a path: {{{}}}", body.trim()))?;
        let method = METHOD_RE
            .captures(body)
            .map(|c| c[1].to_string())
            .ok_or_else(|| format!("operation without a method: {{{}}}", body.trim()))?;
        ops.push(OperationRef { path, method });
    }

    if ops.is_empty() && !expr.trim().trim_matches(|c| c == '[' || c == ']').trim().is_empty() {
        return Err(format!("cannot read operations from `{}`", expr));
    }

    Ok(normalize_ops(ops))
}

fn normalize_ops(ops: Vec<OperationRef>) -> Vec<OperationRef> {
    ops.into_iter()
        .map(|op| OperationRef {
            path: op.path,
            method: op.method.to_lowercase(),
        })
        .collect()
}

/// Every operation in the document, by path then method order.
fn all_operations(document: &Value) -> Vec<OperationRef> {
    let Some(paths) = document.get("paths").and_then(Value::as_object) else {
        return Vec::new();
    };

    let mut ops = Vec::new();
    for (path, item) in paths {
        for method in METHODS {
            if item.get(method).is_some() {
                ops.push(OperationRef {
                    path: path.clone(),
                    method: method.to_string(),
                });
            }
        }
    }
    ops
}

/// Follow local `$ref` pointers (`#/components/...`).
fn resolve_ref<'a>(document: &'a Value, value: &'a Value) -> &'a Value {
    let mut current = value;
    for _ in 0..8 {
        let Some(pointer) = current.get("$ref").and_then(Value::as_str) else {
            break;
        };
        match pointer
            .strip_prefix('#')
            .and_then(|p| document.pointer(p))
        {
            Some(target) => current = target,
            None => break,
        }
    }
    current
}

/// Short type label for a schema.
fn schema_type(document: &Value, schema: &Value) -> String {
    if let Some(pointer) = schema.get("$ref").and_then(Value::as_str) {
        return pointer.rsplit('/').next().unwrap_or(pointer).to_string();
    }
    let schema = resolve_ref(document, schema);
    match schema.get("type").and_then(Value::as_str) {
        Some("array") => {
            let items = schema
                .get("items")
                .map(|items| schema_type(document, items))
                .unwrap_or_else(|| "any".to_string());
            format!("array<{}>", items)
        }
        Some(ty) => match schema.get("format").and_then(Value::as_str) {
            Some(format) => format!("{} ({})", ty, format),
            None => ty.to_string(),
        },
        None => "object".to_string(),
    }
}

fn text<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

fn render_operation(document: &Value, op: &OperationRef, operation: &Value) -> String {
    let mut html = format!(
        "<section class=\"api-operation\" id=\"{}-{}\">\n",
        op.method,
        slugify(&op.path)
    );
    html.push_str(&format!(
        "<div class=\"api-operation-header\"><span class=\"api-method api-method-{}\">{}</span> <code class=\"api-path\">{}</code></div>\n",
        op.method,
        op.method.to_uppercase(),
        escape_html(&op.path)
    ));

    if let Some(summary) = text(operation, "summary") {
        html.push_str(&format!(
            "<p class=\"api-summary\">{}</p>\n",
            escape_html(summary)
        ));
    }
    if let Some(description) = text(operation, "description") {
        html.push_str(&format!(
            "<div class=\"api-description\">{}</div>\n",
            markdown_to_html(description)
        ));
    }

    // Path-level parameters apply to every method of the path
    let path_params = document
        .get("paths")
        .and_then(|paths| paths.get(&op.path))
        .and_then(|item| item.get("parameters"))
        .and_then(Value::as_array);
    let op_params = operation.get("parameters").and_then(Value::as_array);
    let params: Vec<&Value> = path_params
        .into_iter()
        .flatten()
        .chain(op_params.into_iter().flatten())
        .map(|p| resolve_ref(document, p))
        .collect();

    if !params.is_empty() {
        html.push_str("<h4 class=\"api-section\">Parameters</h4>\n<table class=\"api-parameters\">\n<thead><tr><th>Name</th><th>In</th><th>Type</th><th>Required</th><th>Description</th></tr></thead>\n<tbody>\n");
        for param in params {
            let ty = param
                .get("schema")
                .map(|s| schema_type(document, s))
                .unwrap_or_else(|| "string".to_string());
            let required = param
                .get("required")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            html.push_str(&format!(
                "<tr><td><code>{}</code></td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                escape_html(text(param, "name").unwrap_or("")),
                escape_html(text(param, "in").unwrap_or("")),
                escape_html(&ty),
                if required { "yes" } else { "no" },
                escape_html(text(param, "description").unwrap_or(""))
            ));
        }
        html.push_str("</tbody>\n</table>\n");
    }

    if let Some(body) = operation.get("requestBody").map(|b| resolve_ref(document, b)) {
        html.push_str("<h4 class=\"api-section\">Request body</h4>\n<ul class=\"api-request-body\">\n");
        if let Some(content) = body.get("content").and_then(Value::as_object) {
            for (media_type, media) in content {
                let ty = media
                    .get("schema")
                    .map(|s| schema_type(document, s))
                    .unwrap_or_else(|| "binary".to_string());
                html.push_str(&format!(
                    "<li><code>{}</code> {}</li>\n",
                    escape_html(media_type),
                    escape_html(&ty)
                ));
            }
        }
        html.push_str("</ul>\n");
    }

    if let Some(responses) = operation.get("responses").and_then(Value::as_object) {
        html.push_str("<h4 class=\"api-section\">Responses</h4>\n<table class=\"api-responses\">\n<thead><tr><th>Status</th><th>Description</th></tr></thead>\n<tbody>\n");
        for (status, response) in responses {
            let response = resolve_ref(document, response);
            html.push_str(&format!(
                "<tr><td><code>{}</code></td><td>{}</td></tr>\n",
                escape_html(status),
                escape_html(text(response, "description").unwrap_or(""))
            ));
        }
        html.push_str("</tbody>\n</table>\n");
    }

    html.push_str("</section>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::render_body;
    use crate::registry::page_registry;
    use folio_mdx::parse_mdx;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::tempdir;

    fn tus_document() -> Value {
        json!({
            "openapi": "3.1.0",
            "paths": {
                "/files": {
                    "post": {
                        "summary": "Create an upload",
                        "description": "Creates a new upload resource. Send `Upload-Length`.",
                        "parameters": [
                            { "$ref": "#/components/parameters/UploadLength" }
                        ],
                        "responses": {
                            "201": { "description": "Upload created" },
                            "413": { "$ref": "#/components/responses/TooLarge" }
                        }
                    }
                },
                "/files/{id}": {
                    "parameters": [
                        { "name": "id", "in": "path", "required": true, "schema": { "type": "string", "format": "uuid" } }
                    ],
                    "head": { "summary": "Get upload offset", "responses": { "200": { "description": "Offset" } } },
                    "patch": {
                        "summary": "Upload a chunk",
                        "requestBody": {
                            "content": { "application/offset+octet-stream": {} }
                        },
                        "responses": { "204": { "description": "Chunk accepted" } }
                    }
                }
            },
            "components": {
                "parameters": {
                    "UploadLength": { "name": "Upload-Length", "in": "header", "required": true, "schema": { "type": "integer" } }
                },
                "responses": {
                    "TooLarge": { "description": "Upload exceeds the maximum size" }
                }
            }
        })
    }

    fn render(source: &str, api: ApiReference) -> Result<String, RenderError> {
        let doc = parse_mdx(source).unwrap();
        render_body(&doc.body, &page_registry(api))
    }

    #[test]
    fn renders_selected_operation() {
        let api = ApiReference::new().with_document("./openapi.json", tus_document());

        let html = render(
            "<APIPage document=\"./openapi.json\" operations={[{ path: '/files', method: 'POST' }]} />\n",
            api,
        )
        .unwrap();

        assert!(html.contains("<section class=\"api-operation\" id=\"post-files\">"));
        assert!(html.contains("<p class=\"api-summary\">Create an upload</p>"));
        assert!(html.contains("<code>Upload-Length</code>"));
        assert!(html.contains("Upload exceeds the maximum size"));
        assert!(html.contains("<code>Upload-Length</code></td><td>header</td><td>integer</td><td>yes</td>"));
        assert!(!html.contains("Upload a chunk"));
    }

    #[test]
    fn renders_all_operations_without_selection() {
        let api = ApiReference::new().with_document("openapi.json", tus_document());

        let html = render("<APIPage />\n", api).unwrap();

        let order: Vec<_> = ["Create an upload", "Get upload offset", "Upload a chunk"]
            .iter()
            .map(|s| html.find(s).unwrap())
            .collect();
        assert!(order.windows(2).all(|w| w[0] < w[1]));
        assert!(html.contains("string (uuid)"));
        assert!(html.contains("application/offset+octet-stream"));
    }

    #[test]
    fn unknown_operation_is_an_error() {
        let api = ApiReference::new().with_document("openapi.json", tus_document());

        let err = render(
            "<APIPage document=\"openapi.json\" operations={[{\"path\": \"/files\", \"method\": \"delete\"}]} />\n",
            api,
        )
        .unwrap_err();

        assert!(err.to_string().contains("operation DELETE /files not found"));
    }

    #[test]
    fn unknown_document_is_an_error() {
        let err = render("<APIPage document=\"./other.json\" />\n", ApiReference::new()).unwrap_err();

        assert!(err.to_string().contains("unknown API document `./other.json`"));
    }

    #[test]
    fn parses_operation_expressions() {
        assert_eq!(
            parse_operations(r#"[{"path": "/a", "method": "GET"}]"#).unwrap(),
            vec![OperationRef {
                path: "/a".to_string(),
                method: "get".to_string()
            }]
        );
        assert_eq!(
            parse_operations("[{ method: 'patch', path: '/files/{id}' }]").unwrap(),
            vec![OperationRef {
                path: "/files/{id}".to_string(),
                method: "patch".to_string()
            }]
        );
        assert!(parse_operations("[]").unwrap().is_empty());
        assert!(parse_operations("[{ path: '/a' }]").is_err());
        assert!(parse_operations("operations").is_err());
    }

    #[test]
    fn loads_json_and_yaml_documents() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("openapi.json"), tus_document().to_string()).unwrap();
        fs::write(
            temp.path().join("admin.yaml"),
            "openapi: 3.1.0\npaths:\n  /health:\n    get:\n      summary: Health\n",
        )
        .unwrap();

        let api = ApiReference::load(
            temp.path(),
            &["./openapi.json".to_string(), "admin.yaml".to_string()],
        )
        .unwrap();

        assert_eq!(api.len(), 2);
        let html = render("<APIPage document=\"admin.yaml\" />\n", api).unwrap();
        assert!(html.contains("Health"));
    }

    #[test]
    fn load_reports_missing_files() {
        let temp = tempdir().unwrap();

        let err = ApiReference::load(temp.path(), &["missing.json".to_string()]).unwrap_err();

        assert!(matches!(err, ApiDocumentError::Read { .. }));
    }
}
