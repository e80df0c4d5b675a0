use std::fs;
use std::path::Path;
use tree_sitter::{Node, Parser, Tree};

use crate::error::{IoError, ParserError, Result};

const LANGUAGE_NAME: &str = "go";

const PACKAGE_CLAUSE: &str = "package_clause";

/// Go's function declaration covers both plain functions and methods.
pub const FUNCTION_DECLARATION_KINDS: &[&str] = &["function_declaration", "method_declaration"];

/// Syntax-only Go parser. No name resolution, no type information.
pub struct GoSourceParser {
    parser: Parser,
}

impl GoSourceParser {
    pub fn new() -> std::result::Result<Self, ParserError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_go::LANGUAGE.into())
            .map_err(|_| ParserError::language_setup_failed(LANGUAGE_NAME))?;
        Ok(Self { parser })
    }

    pub fn parse_file(&mut self, path: &Path) -> Result<GoSource> {
        let source = fs::read(path).map_err(|e| IoError::read_error(path, e))?;
        Ok(self.parse_source(path, source)?)
    }

    /// Parse `source`, rejecting anything the Go compiler would not accept
    /// as a file: syntax errors, missing nodes, or no package clause.
    pub fn parse_source(
        &mut self,
        path: &Path,
        source: Vec<u8>,
    ) -> std::result::Result<GoSource, ParserError> {
        let tree = self
            .parser
            .parse(&source, None)
            .ok_or_else(|| ParserError::parse_failed(path))?;

        let root = tree.root_node();
        if let Some(error) = first_error(root) {
            let position = error.start_position();
            return Err(ParserError::syntax_error(
                path,
                position.row + 1,
                position.column + 1,
            ));
        }

        let has_package = {
            let mut cursor = root.walk();
            let found = root
                .children(&mut cursor)
                .any(|child| child.kind() == PACKAGE_CLAUSE);
            found
        };
        if !has_package {
            return Err(ParserError::syntax_error(path, 1, 1));
        }

        Ok(GoSource { source, tree })
    }
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = first_error(child) {
            return Some(found);
        }
    }

    Some(node)
}

pub struct GoSource {
    source: Vec<u8>,
    tree: Tree,
}

impl GoSource {
    /// Names of functions and methods declared at file scope, in source order.
    pub fn top_level_functions(&self) -> Vec<&str> {
        let root = self.tree.root_node();
        let mut cursor = root.walk();

        root.children(&mut cursor)
            .filter(|node| FUNCTION_DECLARATION_KINDS.contains(&node.kind()))
            .filter_map(|node| node.child_by_field_name("name"))
            .filter_map(|name| name.utf8_text(&self.source).ok())
            .collect()
    }

    pub fn declares_function(&self, name: &str) -> bool {
        self.top_level_functions().contains(&name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> std::result::Result<GoSource, ParserError> {
        let mut parser = GoSourceParser::new().unwrap();
        parser.parse_source(Path::new("inline_test.go"), source.as_bytes().to_vec())
    }

    #[test]
    fn test_top_level_functions_in_order() {
        let source = parse(
            r#"package pkg

import "testing"

func helper() int { return 1 }

func TestAlpha(t *testing.T) {
    t.Run("nested", func(t *testing.T) {})
}

func BenchmarkBeta(b *testing.B) {}
"#,
        )
        .unwrap();

        assert_eq!(
            source.top_level_functions(),
            vec!["helper", "TestAlpha", "BenchmarkBeta"]
        );
    }

    #[test]
    fn test_methods_are_declarations() {
        let source = parse(
            r#"package pkg

type suite struct{}

func (s *suite) TestMethod() {}
"#,
        )
        .unwrap();

        assert!(source.declares_function("TestMethod"));
    }

    #[test]
    fn test_function_literals_are_not_declarations() {
        let source = parse(
            r#"package pkg

var TestVar = func() {}

func outer() {
    TestInner := func() {}
    TestInner()
}
"#,
        )
        .unwrap();

        assert!(!source.declares_function("TestVar"));
        assert!(!source.declares_function("TestInner"));
        assert!(source.declares_function("outer"));
    }

    #[test]
    fn test_name_match_is_exact() {
        let source = parse("package pkg\n\nfunc TestFooBar() {}\n").unwrap();
        assert!(!source.declares_function("TestFoo"));
        assert!(!source.declares_function("testfoobar"));
        assert!(source.declares_function("TestFooBar"));
    }

    #[test]
    fn test_syntax_error_is_rejected() {
        let err = parse("package pkg\n\nfunc TestBroken( {\n").err().unwrap();
        assert!(matches!(err, ParserError::SyntaxError { .. }));
    }

    #[test]
    fn test_missing_package_clause_is_rejected() {
        let err = parse("func TestOrphan() {}\n").err().unwrap();
        assert!(matches!(err, ParserError::SyntaxError { line: 1, column: 1, .. }));
    }

    #[test]
    fn test_package_clause_alone_parses() {
        let source = parse("package pkg\n").unwrap();
        assert!(source.top_level_functions().is_empty());
    }

    #[test]
    fn test_parse_file_missing() {
        let mut parser = GoSourceParser::new().unwrap();
        let err = parser
            .parse_file(Path::new("/nonexistent/pkg/a_test.go"))
            .err()
            .unwrap();
        assert!(matches!(
            err,
            crate::error::Error::Io(IoError::ReadError { .. })
        ));
    }
}
