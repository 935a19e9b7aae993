pub mod lexer;
pub mod value;

use crate::error::{NavtreeError, Result};
use crate::model::{
    IndexChunk, NAVTREE_INDEX_VAR, NAVTREE_VAR, NavIndex, NavNode, NavTreeData, SYNC_OFF_VAR,
    SYNC_ON_VAR, TreePath,
};
use indexmap::IndexMap;
use lexer::{Lexer, Token, TokenKind};
use value::JsValue;

/// Deepest array/object nesting accepted in a literal.
pub const MAX_NESTING: usize = 256;

/// The `var` declarations of one data script, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    pub preamble: Option<String>,
    pub bindings: IndexMap<String, JsValue>,
}

impl Script {
    pub fn get(&self, name: &str) -> Option<&JsValue> {
        self.bindings.get(name)
    }

    fn require(&self, name: &str) -> Result<&JsValue> {
        self.get(name)
            .ok_or_else(|| NavtreeError::MissingVariable(name.to_string()))
    }
}

/// Parses a sequence of `var NAME = <literal>;` statements.
pub fn parse_script(source: &str) -> Result<Script> {
    let mut lexer = Lexer::new(source);
    let tokens = lexer.tokenize()?;
    let preamble = lexer.into_preamble();

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let bindings = parser.statements()?;
    Ok(Script { preamble, bindings })
}

/// Parses a complete `navtreedata.js`.
pub fn parse_navtree_data(source: &str) -> Result<NavTreeData> {
    let script = parse_script(source)?;

    let tree = nodes_from_value(script.require(NAVTREE_VAR)?, NAVTREE_VAR)?;

    let index = match script.get(NAVTREE_INDEX_VAR) {
        None | Some(JsValue::Null) => NavIndex::default(),
        Some(JsValue::Array(items)) => {
            let mut entries = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                let entry = item.as_str().ok_or_else(|| NavtreeError::Shape {
                    path: format!("{}[{}]", NAVTREE_INDEX_VAR, i),
                    message: format!("expected string, found {}", item.kind_name()),
                })?;
                entries.push(entry.to_string());
            }
            NavIndex::new(entries)
        }
        Some(other) => {
            return Err(NavtreeError::Shape {
                path: NAVTREE_INDEX_VAR.to_string(),
                message: format!("expected array, found {}", other.kind_name()),
            });
        }
    };

    Ok(NavTreeData {
        preamble: script.preamble.clone(),
        tree,
        index,
        sync_on: optional_string(&script, SYNC_ON_VAR)?,
        sync_off: optional_string(&script, SYNC_OFF_VAR)?,
    })
}

/// Parses a deferred child script (`<name>.js`) declaring `var <name> = [ ... ];`.
pub fn parse_children_script(source: &str, name: &str) -> Result<Vec<NavNode>> {
    let script = parse_script(source)?;
    nodes_from_value(script.require(name)?, name)
}

/// Parses `navtreeindex<number>.js`.
pub fn parse_index_chunk(source: &str, number: usize) -> Result<IndexChunk> {
    let script = parse_script(source)?;
    let name = IndexChunk::variable_name(number);
    let value = script.require(&name)?;
    let map = value.as_object().ok_or_else(|| NavtreeError::Shape {
        path: name.clone(),
        message: format!("expected object, found {}", value.kind_name()),
    })?;

    let mut entries = IndexMap::with_capacity(map.len());
    for (url, path_value) in map {
        let bad_path = || NavtreeError::Shape {
            path: format!("{}[\"{}\"]", name, url),
            message: "expected array of non-negative integers".to_string(),
        };
        let items = path_value.as_array().ok_or_else(bad_path)?;
        let mut path: TreePath = Vec::with_capacity(items.len());
        for item in items {
            match item {
                JsValue::Number(n) if *n >= 0 => path.push(*n as usize),
                _ => return Err(bad_path()),
            }
        }
        entries.insert(url.clone(), path);
    }

    Ok(IndexChunk { number, entries })
}

fn nodes_from_value(value: &JsValue, name: &str) -> Result<Vec<NavNode>> {
    let items = value.as_array().ok_or_else(|| NavtreeError::Shape {
        path: name.to_string(),
        message: format!("expected array, found {}", value.kind_name()),
    })?;
    let mut path = Vec::new();
    let mut nodes = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        path.push(i);
        nodes.push(NavNode::from_value(item, &mut path)?);
        path.pop();
    }
    Ok(nodes)
}

fn optional_string(script: &Script, name: &str) -> Result<Option<String>> {
    match script.get(name) {
        None | Some(JsValue::Null) => Ok(None),
        Some(JsValue::Str(s)) => Ok(Some(s.clone())),
        Some(other) => Err(NavtreeError::Shape {
            path: name.to_string(),
            message: format!("expected string, found {}", other.kind_name()),
        }),
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        // tokenize() always ends with Eof
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn next(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn unexpected(token: &Token, expected: &str) -> NavtreeError {
        NavtreeError::Syntax {
            line: token.span.line,
            column: token.span.column,
            message: format!("expected {}, found {}", expected, token.kind.describe()),
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<()> {
        let token = self.next();
        if token.kind == kind {
            Ok(())
        } else {
            Err(Self::unexpected(&token, expected))
        }
    }

    fn statements(&mut self) -> Result<IndexMap<String, JsValue>> {
        let mut bindings = IndexMap::new();
        loop {
            match self.peek().kind {
                TokenKind::Eof => return Ok(bindings),
                TokenKind::Semicolon => {
                    self.next();
                }
                _ => {
                    let (name, value) = self.declaration()?;
                    if bindings.insert(name.clone(), value).is_some() {
                        tracing::warn!("Variable {} declared more than once; keeping the last", name);
                    }
                }
            }
        }
    }

    fn declaration(&mut self) -> Result<(String, JsValue)> {
        self.expect(TokenKind::Var, "'var'")?;
        let token = self.next();
        let TokenKind::Ident(name) = token.kind else {
            return Err(Self::unexpected(&token, "variable name"));
        };
        self.expect(TokenKind::Equals, "'='")?;
        let value = self.value()?;
        if self.peek().kind == TokenKind::Semicolon {
            self.next();
        }
        Ok((name, value))
    }

    fn value(&mut self) -> Result<JsValue> {
        let token = self.next();
        match token.kind {
            TokenKind::Null => Ok(JsValue::Null),
            TokenKind::True => Ok(JsValue::Bool(true)),
            TokenKind::False => Ok(JsValue::Bool(false)),
            TokenKind::Number(n) => Ok(JsValue::Number(n)),
            TokenKind::Str(s) => Ok(JsValue::Str(s)),
            TokenKind::LeftBracket | TokenKind::LeftBrace => {
                if self.depth >= MAX_NESTING {
                    return Err(NavtreeError::Syntax {
                        line: token.span.line,
                        column: token.span.column,
                        message: format!("literal nested deeper than {} levels", MAX_NESTING),
                    });
                }
                self.depth += 1;
                let value = if token.kind == TokenKind::LeftBracket {
                    self.array()
                } else {
                    self.object()
                };
                self.depth -= 1;
                value
            }
            _ => Err(Self::unexpected(&token, "value")),
        }
    }

    fn array(&mut self) -> Result<JsValue> {
        let mut items = Vec::new();
        loop {
            if self.peek().kind == TokenKind::RightBracket {
                self.next();
                return Ok(JsValue::Array(items));
            }
            items.push(self.value()?);
            let token = self.next();
            match token.kind {
                TokenKind::Comma => {}
                TokenKind::RightBracket => return Ok(JsValue::Array(items)),
                _ => return Err(Self::unexpected(&token, "',' or ']'")),
            }
        }
    }

    fn object(&mut self) -> Result<JsValue> {
        let mut map = IndexMap::new();
        loop {
            let token = self.next();
            let key = match token.kind {
                TokenKind::RightBrace => return Ok(JsValue::Object(map)),
                TokenKind::Str(s) | TokenKind::Ident(s) => s,
                TokenKind::Number(n) => n.to_string(),
                _ => return Err(Self::unexpected(&token, "property name or '}'")),
            };
            self.expect(TokenKind::Colon, "':'")?;
            let value = self.value()?;
            map.insert(key, value);
            let token = self.next();
            match token.kind {
                TokenKind::Comma => {}
                TokenKind::RightBrace => return Ok(JsValue::Object(map)),
                _ => return Err(Self::unexpected(&token, "',' or '}'")),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Children, Link};

    const SAMPLE: &str = r#"/*
 @licstart  The following is the entire license notice for the JavaScript code in this file.
 @licend  The above is the entire license notice for the JavaScript code in this file.
*/
var NAVTREE =
[
  [ "PSoC 6 Peripheral Driver Library", "index.html", [
    [ "Overview", "index.html", [
      [ "Quick Start Guide", "index.html#page_getting_started", null ],
      [ "Cypress website", "^https://www.cypress.com", null ]
    ] ],
    [ "API Reference", "modules.html", "modules" ]
  ] ]
];

var NAVTREEINDEX =
[
"group__group__adc.html",
"group__group__sysint.html#ga1"
];

var SYNCONMSG = 'click to disable panel synchronisation';
var SYNCOFFMSG = 'click to enable panel synchronisation';
"#;

    #[test]
    fn test_parse_navtree_data() {
        let data = parse_navtree_data(SAMPLE).unwrap();
        assert!(data.preamble.as_deref().unwrap().contains("@licstart"));
        assert_eq!(data.tree.len(), 1);

        let root = &data.tree[0];
        assert_eq!(root.title, "PSoC 6 Peripheral Driver Library");
        assert_eq!(root.children.nodes().len(), 2);

        let overview = &root.children.nodes()[0];
        let quick = &overview.children.nodes()[0];
        assert_eq!(
            quick.link,
            Some(Link::Page {
                file: "index.html".to_string(),
                anchor: Some("page_getting_started".to_string()),
            })
        );
        assert_eq!(quick.children, Children::Leaf);

        let site = &overview.children.nodes()[1];
        assert_eq!(
            site.link,
            Some(Link::External {
                url: "https://www.cypress.com".to_string()
            })
        );

        let api = &root.children.nodes()[1];
        assert_eq!(
            api.children,
            Children::Deferred {
                script: "modules".to_string(),
                nodes: None
            }
        );

        assert_eq!(data.index.len(), 2);
        assert_eq!(
            data.sync_on.as_deref(),
            Some("click to disable panel synchronisation")
        );
        assert_eq!(
            data.sync_off.as_deref(),
            Some("click to enable panel synchronisation")
        );
    }

    #[test]
    fn test_missing_navtree() {
        let err = parse_navtree_data("var NAVTREEINDEX = [];").unwrap_err();
        assert!(matches!(err, NavtreeError::MissingVariable(name) if name == "NAVTREE"));
    }

    #[test]
    fn test_optional_variables() {
        let data = parse_navtree_data("var NAVTREE = [ [ \"Main\", \"index.html\", null ] ]").unwrap();
        assert!(data.index.is_empty());
        assert!(data.sync_on.is_none());
        assert!(data.preamble.is_none());
    }

    #[test]
    fn test_trailing_commas() {
        let data = parse_navtree_data(
            "var NAVTREE = [ [ \"Main\", \"index.html\", [ [ \"A\", \"a.html\", null ], ] ], ];\nvar NAVTREEINDEX = [ \"a.html\", ];",
        )
        .unwrap();
        assert_eq!(data.tree[0].children.nodes().len(), 1);
        assert_eq!(data.index.entries(), ["a.html".to_string()]);
    }

    #[test]
    fn test_malformed_node_reports_path() {
        let err = parse_navtree_data(
            "var NAVTREE = [ [ \"Main\", \"index.html\", [ [ \"A\", \"a.html\", null ], [ 42, \"b.html\", null ] ] ] ];",
        )
        .unwrap_err();
        match err {
            NavtreeError::Shape { path, .. } => assert_eq!(path, "[0,1]"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_string_index_entry() {
        let err = parse_navtree_data("var NAVTREE = []; var NAVTREEINDEX = [ \"a.html\", 3 ];")
            .unwrap_err();
        assert!(matches!(err, NavtreeError::Shape { path, .. } if path == "NAVTREEINDEX[1]"));
    }

    #[test]
    fn test_parse_children_script() {
        let nodes = parse_children_script(
            "var modules =\n[\n    [ \"ADC\", \"group__adc.html\", \"group__adc\" ],\n    [ \"GPIO\", \"group__gpio.html\", null ]\n];",
            "modules",
        )
        .unwrap();
        assert_eq!(nodes.len(), 2);
        assert!(matches!(&nodes[0].children, Children::Deferred { script, .. } if script == "group__adc"));
    }

    #[test]
    fn test_children_script_wrong_name() {
        let err = parse_children_script("var other = [];", "modules").unwrap_err();
        assert!(matches!(err, NavtreeError::MissingVariable(name) if name == "modules"));
    }

    #[test]
    fn test_parse_index_chunk() {
        let chunk = parse_index_chunk(
            "var NAVTREEINDEX0 =\n{\n\"annotated.html\":[1,0],\n\"group__adc.html#ga12\":[0,1,0,3]\n};",
            0,
        )
        .unwrap();
        assert_eq!(chunk.number, 0);
        assert_eq!(chunk.get("annotated.html"), Some(&vec![1, 0]));
        assert_eq!(chunk.get("group__adc.html#ga12"), Some(&vec![0, 1, 0, 3]));
        assert_eq!(chunk.first_key(), Some("annotated.html"));
    }

    #[test]
    fn test_index_chunk_rejects_negative_path() {
        assert!(parse_index_chunk("var NAVTREEINDEX2 = { \"a.html\": [0,-1] };", 2).is_err());
    }

    #[test]
    fn test_duplicate_variable_keeps_last() {
        let script = parse_script("var A = 1; var A = 2;").unwrap();
        assert_eq!(script.get("A"), Some(&JsValue::Number(2)));
    }

    #[test]
    fn test_deep_nesting_is_an_error() {
        let deep = format!(
            "var NAVTREE = {}{};",
            "[".repeat(100_000),
            "]".repeat(100_000)
        );
        let err = parse_navtree_data(&deep).unwrap_err();
        assert!(matches!(err, NavtreeError::Syntax { line: 1, .. }));

        let ok = format!("var A = {}{};", "[".repeat(MAX_NESTING), "]".repeat(MAX_NESTING));
        assert!(parse_script(&ok).is_ok());
        let too_deep = format!(
            "var A = {}{};",
            "{\"a\":".repeat(MAX_NESTING) + "[",
            "]".to_string() + &"}".repeat(MAX_NESTING)
        );
        assert!(matches!(
            parse_script(&too_deep),
            Err(NavtreeError::Syntax { .. })
        ));
    }

    #[test]
    fn test_missing_separator() {
        let err = parse_script("var A = [ 1 2 ];").unwrap_err();
        assert!(matches!(err, NavtreeError::Syntax { line: 1, column: 13, .. }));
    }
}
