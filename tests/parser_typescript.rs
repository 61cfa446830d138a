use codeflow::parsers::typescript::TypeScriptParser;
use codeflow::parsers::{DependencyKind, FileParser};
use std::fs;

fn parse(code: &str) -> codeflow::parsers::ParsedFileInfo {
    let dir = tempfile::TempDir::new().unwrap();
    fs::write(dir.path().join("sample.ts"), code).unwrap();
    let parser = TypeScriptParser::new().unwrap();
    parser.parse_file(dir.path(), "sample.ts").unwrap()
}

#[test]
fn typescript_parser_overrides_language_and_delegates_base_extraction() {
    let info = parse(
        r#"
import { Component } from './component';

function render(el) { return el; }

class View extends Component {
  draw() {
    return null;
  }
}
"#,
    );

    assert_eq!(info.language, "typescript");

    // base extraction comes from the JavaScript scanner
    assert!(info
        .dependencies
        .iter()
        .any(|d| d.name == "./component" && d.kind == DependencyKind::Relative));
    assert!(info.functions.iter().any(|f| f.name == "render"));
    assert_eq!(info.classes.len(), 1);
    assert_eq!(info.classes[0].bases, vec!["Component"]);
}

#[test]
fn typescript_parser_extracts_interfaces() {
    let info = parse(
        r#"
interface Plain {
  id: number;
}

interface Extended extends Base, Mixin {
  name: string;
}
"#,
    );

    assert_eq!(info.interfaces.len(), 2);
    assert_eq!(info.interfaces[0].name, "Plain");
    assert!(info.interfaces[0].extends.is_empty());
    assert_eq!(info.interfaces[1].name, "Extended");
    assert_eq!(info.interfaces[1].extends, vec!["Base", "Mixin"]);
}

#[test]
fn typescript_parser_extracts_type_aliases_and_enums() {
    let info = parse(
        r#"
type Id = string | number;
type Handler = (event: Event) => void;

enum Color {
  Red,
  Green,
}
"#,
    );

    assert_eq!(info.types.len(), 2);
    assert_eq!(info.types[0].name, "Id");
    assert_eq!(info.types[0].definition, "string | number");

    assert_eq!(info.enums.len(), 1);
    assert_eq!(info.enums[0].name, "Color");
    assert_eq!(info.enums[0].line, 5);
}

#[test]
fn typescript_parser_extracts_decorator_usages() {
    let info = parse(
        r#"
@Injectable()
class Service {
  @Log('verbose')
  run() {}
}
"#,
    );

    let injectable = info.decorators.iter().find(|d| d.name == "Injectable").unwrap();
    assert_eq!(injectable.full, "@Injectable()");

    let log = info.decorators.iter().find(|d| d.name == "Log").unwrap();
    assert_eq!(log.full, "@Log('verbose')");
}
