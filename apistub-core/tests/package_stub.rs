//! End-to-end stub generation over an on-disk package with checker output.

use apistub_core::{
    discover_sources, render_plain, Config, DiagnosticLevel, DiagnosticSet, RenderToken, StubGenerator,
};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const CLIENT: &str = r#"from typing import Any, Optional

from azure.core.tracing.decorator import distributed_trace


class WidgetClient(object):
    """Client for widgets.

    :param str endpoint: Service endpoint.
    :ivar str endpoint: Service endpoint.
    """

    def __init__(self, endpoint, credential, **kwargs):
        self.endpoint = endpoint

    @distributed_trace
    def get_widget(self, name, **kwargs):
        """Get a widget.

        :param str name: Widget name.
        :keyword int timeout: Timeout in seconds. Default value is 30.
        :rtype: ~azure.widget.Widget
        """
        pass

    @classmethod
    def from_connection_string(cls, conn_str, **kwargs):
        # type: (str, Any) -> WidgetClient
        pass

    def _private(self):
        pass
"#;

const ASYNC_CLIENT: &str = r#"class WidgetClient(object):
    async def get_widget(self, name: str) -> Widget:
        pass
"#;

const PYLINT: &str = r#"[
    {
        "type": "error",
        "module": "azure.widget._client",
        "obj": "WidgetClient",
        "line": 6,
        "column": 0,
        "path": "azure-widget/azure/widget/_client.py",
        "symbol": "client-incorrect-naming-convention",
        "message": "Client name is wrong. See details: https://aka.ms/azsdk/python/naming",
        "message-id": "E4702"
    },
    {
        "type": "convention",
        "module": "azure.widget._client",
        "obj": "WidgetClient.get_widget",
        "line": 16,
        "column": 4,
        "path": "azure-widget/azure/widget/_client.py",
        "symbol": "client-method-should-not-use-static-method",
        "message": "Method should not be static.",
        "message-id": "C4721"
    },
    {
        "type": "convention",
        "module": "azure.widget._client",
        "obj": "WidgetClient.get_widget",
        "line": 17,
        "column": 4,
        "path": "azure-widget/azure/widget/_client.py",
        "symbol": "client-method-missing-kwargs",
        "message": "Not anchored on the first line.",
        "message-id": "C4717"
    },
    {
        "type": "warning",
        "module": "azure.widget._client",
        "obj": "WidgetClient.__init__",
        "line": 13,
        "column": 4,
        "path": "azure-widget/azure/widget/_client.py",
        "symbol": "unused-argument",
        "message": "Unused argument 'credential'",
        "message-id": "W0613"
    }
]"#;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

/// `<tmp>/azure-widget` with a sync client, an async client and a test file
fn create_package() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("azure-widget");

    write(&root, "azure/widget/__init__.py", "__version__ = \"1.0.0\"\n");
    write(&root, "azure/widget/_client.py", CLIENT);
    write(&root, "azure/widget/aio/_client_async.py", ASYNC_CLIENT);
    write(&root, "tests/test_client.py", "def test_widget():\n    pass\n");

    (dir, root)
}

fn generate(root: &Path, checker_output: Option<&str>) -> apistub_core::StubFile {
    let config = Config::default();
    let diagnostics = match checker_output {
        Some(output) => DiagnosticSet::load(output, "azure-widget", &config.checker.family).unwrap(),
        None => DiagnosticSet::default(),
    };
    let files = discover_sources(root, &config).unwrap();
    StubGenerator::new(&config, diagnostics)
        .generate("azure-widget", root, &files)
        .unwrap()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn test_discovery_skips_tests_directory() {
    let (_dir, root) = create_package();
    let files = discover_sources(&root, &Config::default()).unwrap();
    assert_eq!(files.len(), 3);
    assert!(files
        .iter()
        .all(|f| f.file_name().unwrap() != "test_client.py"));
}

#[test]
fn test_rendered_surface() {
    let (_dir, root) = create_package();
    let stub = generate(&root, None);
    let text = render_plain(&stub.tokens);

    assert!(text.contains("namespace azure.widget._client\n"));
    assert!(text.contains("class WidgetClient(object):\n"));
    assert!(text.contains("    ivar endpoint: str\n"));

    // Constructor documented by the class docstring
    assert!(text.contains("    def __init__(\n"));
    assert!(text.contains("            endpoint: str, \n"));
    assert!(text.contains("            credential, \n"));

    // Keyword adopted from the docstring, sorted after the separator
    assert!(text.contains("    @distributed_trace\n"));
    assert!(text.contains("            name: str, \n            *, \n            timeout: int = 30, \n            **kwargs\n"));
    assert!(text.contains("        ) -> Widget\n"));

    // Synthetic cls and the type comment return type
    assert!(text.contains("    @classmethod\n"));
    assert!(text.contains("            cls, \n            conn_str, \n"));
    assert!(text.contains("        ) -> WidgetClient\n"));

    assert!(text.contains("    async def get_widget(self, name: str) -> Widget\n"));
    assert!(!text.contains("_private"));
}

#[test]
fn test_module_order_follows_paths() {
    let (_dir, root) = create_package();
    let text = render_plain(&generate(&root, None).tokens);

    let package = text.find("namespace azure.widget\n").unwrap();
    let client = text.find("namespace azure.widget._client\n").unwrap();
    let aio = text.find("namespace azure.widget.aio._client_async\n").unwrap();
    assert!(package < client && client < aio);
}

#[test]
fn test_async_identity_suffix() {
    let (_dir, root) = create_package();
    let stub = generate(&root, None);
    assert!(stub.tokens.iter().any(|t| matches!(
        t,
        RenderToken::LineAnchor { id } if id == "azure.widget.aio._client_async.WidgetClient.get_widget:async"
    )));
}

#[test]
fn test_diagnostics_attach_to_first_lines() {
    let (_dir, root) = create_package();
    let stub = generate(&root, Some(PYLINT));

    let targets: Vec<(&str, DiagnosticLevel)> = stub
        .diagnostics
        .iter()
        .map(|d| (d.target_id.as_str(), d.diagnostic.level))
        .collect();
    assert_eq!(
        targets,
        vec![
            ("azure.widget._client.WidgetClient", DiagnosticLevel::Error),
            ("azure.widget._client.WidgetClient.get_widget", DiagnosticLevel::Warning),
        ]
    );
    assert_eq!(
        stub.diagnostics[0].diagnostic.help_link.as_deref(),
        Some("https://aka.ms/azsdk/python/naming")
    );

    let text = render_plain(&stub.tokens);
    assert!(text.contains("# error: Client name is wrong.\n"));
    assert!(!text.contains("Not anchored on the first line."));
    assert!(!text.contains("Unused argument"));
}

#[test]
fn test_stub_json_shape() {
    let (_dir, root) = create_package();
    let stub = generate(&root, Some(PYLINT));
    let json = serde_json::to_value(&stub).unwrap();

    assert_eq!(json["language"], "Python");
    assert_eq!(json["package_name"], "azure-widget");
    assert_eq!(json["diagnostics"][0]["target_id"], "azure.widget._client.WidgetClient");
    assert_eq!(json["diagnostics"][0]["level"], "error");
    assert!(json["tokens"]
        .as_array()
        .unwrap()
        .iter()
        .any(|t| t["kind"] == "diagnostic"));
}

#[test]
fn test_duplicate_identity_keeps_first() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("pkg");
    write(&root, "pkg/mod.py", "def ping(host):\n    pass\n");
    write(&root, "pkg/mod/__init__.py", "def ping(host, port):\n    pass\n");

    let files = discover_sources(&root, &Config::default()).unwrap();
    let stub = StubGenerator::new(&Config::default(), DiagnosticSet::default())
        .generate("pkg", &root, &files)
        .unwrap();
    let text = render_plain(&stub.tokens);

    assert_eq!(text.matches("def pkg.mod.ping(").count(), 1);
    assert!(text.contains("def pkg.mod.ping(host, port)\n"));
}

#[test]
fn test_malformed_checker_output_halts() {
    let err = DiagnosticSet::load("{ not a list", "azure-widget", "47").unwrap_err();
    assert!(err.is_fatal());
}
