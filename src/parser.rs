use std::sync::Arc;

use anyhow::Result;
use dashmap::DashMap;
use parking_lot::Mutex;
use thiserror::Error;
use tower_lsp::lsp_types::Url;
use tracing::debug;
use tree_sitter::Tree;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("syntax error in source text")]
    Syntax,
    #[error("parser produced no tree")]
    NoTree,
}

/// A successfully parsed syntax tree together with the source text it was
/// parsed from. Byte ranges in the tree index into `text`, which may lag
/// behind the live buffer when the tree is served as a stale fallback.
#[derive(Debug)]
pub struct ParsedTree {
    pub tree: Tree,
    pub text: String,
}

/// A wrapper around the tree-sitter JavaScript parser for tree generation.
pub struct JsParser {
    inner: Mutex<tree_sitter::Parser>,
}

impl std::fmt::Debug for JsParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsParser").finish()
    }
}

impl JsParser {
    /// Creates a new `JsParser` with the JavaScript grammar loaded.
    pub fn new() -> Result<Self> {
        let mut parser = tree_sitter::Parser::new();
        parser.set_language(&tree_sitter_javascript::LANGUAGE.into())?;
        Ok(JsParser {
            inner: Mutex::new(parser),
        })
    }

    /// Parses `text` into a syntax tree. Text that is mid-edit and not
    /// currently valid JavaScript is reported as `ParseError::Syntax` so the
    /// caller can substitute the last known good tree.
    pub fn parse(&self, text: &str) -> Result<ParsedTree, ParseError> {
        let tree = self
            .inner
            .lock()
            .parse(text, None)
            .ok_or(ParseError::NoTree)?;
        if tree.root_node().has_error() {
            return Err(ParseError::Syntax);
        }
        Ok(ParsedTree {
            tree,
            text: text.to_string(),
        })
    }
}

/// Per-document store of the last successfully parsed syntax tree.
///
/// Completion must keep working while the buffer is momentarily unparseable
/// (the user has just typed `this.`), so a failed parse falls back to the
/// previous good tree for the same document instead of propagating the error.
#[derive(Debug)]
pub struct SyntaxTreeCache {
    parser: JsParser,
    trees: DashMap<Url, Arc<ParsedTree>>,
}

impl SyntaxTreeCache {
    pub fn new() -> Result<Self> {
        Ok(SyntaxTreeCache {
            parser: JsParser::new()?,
            trees: DashMap::new(),
        })
    }

    /// Parses `text` and returns the resulting tree, storing it as the last
    /// known good tree for `uri`. On parse failure returns the previously
    /// stored tree; `None` only when no good tree has ever been produced for
    /// this document.
    pub fn resolve(&self, text: &str, uri: &Url) -> Option<Arc<ParsedTree>> {
        match self.parser.parse(text) {
            Ok(parsed) => {
                let parsed = Arc::new(parsed);
                self.trees.insert(uri.clone(), Arc::clone(&parsed));
                Some(parsed)
            }
            Err(err) => {
                debug!("Parse failed for {}, using last good tree: {}", uri, err);
                self.trees.get(uri).map(|entry| Arc::clone(entry.value()))
            }
        }
    }

    /// Drops the stored tree for `uri`, forcing a fresh parse on the next
    /// request. Called when the document is closed.
    pub fn invalidate(&self, uri: &Url) {
        self.trees.remove(uri);
    }
}
