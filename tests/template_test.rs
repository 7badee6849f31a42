use filegen::error::Error;
use filegen::handler::TemplateHandler;
use filegen::node::TemplatePayload;
use filegen::renderer::TemplateRenderer;
use filegen::{Generator, Node};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn template_node(template: &Path, data: serde_json::Value) -> Node {
    Node::from(TemplatePayload {
        name: "classroom.txt".to_string(),
        mode: None,
        template: template.to_path_buf(),
        data,
    })
}

#[test]
fn test_render_with_data() {
    let temp_dir = TempDir::new().unwrap();
    let template = temp_dir.path().join("classroom.j2");
    fs::write(
        &template,
        "{% for s in students %}My name is {{ s.name }}, my age is {{ s.age }}.\n{% endfor %}",
    )
    .unwrap();
    let data = serde_json::json!({"students": [{"name": "Sam", "age": "10"}, {"name": "Amy", "age": "12"}]});

    Generator::with_default_handlers()
        .generate(temp_dir.path(), &template_node(&template, data))
        .unwrap();

    assert_eq!(
        fs::read_to_string(temp_dir.path().join("classroom.txt")).unwrap(),
        "My name is Sam, my age is 10.\nMy name is Amy, my age is 12.\n"
    );
}

#[test]
fn test_syntax_error_is_template_error() {
    let temp_dir = TempDir::new().unwrap();
    let template = temp_dir.path().join("broken.j2");
    fs::write(&template, "{% for %}").unwrap();

    let err = Generator::with_default_handlers()
        .generate(temp_dir.path(), &template_node(&template, serde_json::Value::Null))
        .unwrap_err();

    assert!(matches!(err, Error::Template { ref path, .. } if path == &template));
    assert!(!temp_dir.path().join("classroom.txt").exists());
}

#[test]
fn test_undefined_variable_is_template_error() {
    let temp_dir = TempDir::new().unwrap();
    let template = temp_dir.path().join("t.j2");
    fs::write(&template, "{{ room.name }}").unwrap();

    let err = Generator::with_default_handlers()
        .generate(temp_dir.path(), &template_node(&template, serde_json::json!({})))
        .unwrap_err();

    assert!(matches!(err, Error::Template { .. }));
}

#[test]
fn test_html_template_is_not_escaped() {
    let temp_dir = TempDir::new().unwrap();
    let template = temp_dir.path().join("index.html");
    fs::write(&template, "{{ body }}").unwrap();

    Generator::with_default_handlers()
        .generate(temp_dir.path(), &template_node(&template, serde_json::json!({"body": "<b>A & B</b>"})))
        .unwrap();

    assert_eq!(fs::read_to_string(temp_dir.path().join("classroom.txt")).unwrap(), "<b>A & B</b>");
}

struct Upper;

impl TemplateRenderer for Upper {
    fn render(&self, _: &str, template: &str, _: &serde_json::Value) -> Result<String, String> {
        Ok(template.to_uppercase())
    }
}

#[cfg(unix)]
#[test]
fn test_custom_renderer_and_default_mode() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().unwrap();
    let template = temp_dir.path().join("t");
    fs::write(&template, "shout").unwrap();
    let mut generator = Generator::new();
    generator.register(TemplateHandler::with_renderer(Box::new(Upper)).with_default_mode(0o600));

    generator.generate(temp_dir.path(), &template_node(&template, serde_json::Value::Null)).unwrap();

    let out = temp_dir.path().join("classroom.txt");
    assert_eq!(fs::read_to_string(&out).unwrap(), "SHOUT");
    assert_eq!(fs::metadata(&out).unwrap().permissions().mode() & 0o777, 0o600);
}
