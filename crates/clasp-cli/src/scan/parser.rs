//! Namespace declaration extraction.
//!
//! Sources are parsed with oxc and the AST is walked for
//! `goog.provide` / `goog.module` / `goog.require` calls whose first argument
//! is a string literal. Anything inside comments, strings, template literals
//! or regular expressions is never seen as a call.

use std::path::PathBuf;

use clasp_graph::{SourceUnit, source_unit::BOOTSTRAP_NAMESPACE};
use oxc_allocator::Allocator;
use oxc_ast::ast::{Argument, CallExpression, Expression};
use oxc_ast_visit::{Visit, walk};
use oxc_parser::Parser;
use oxc_span::SourceType;
use thiserror::Error;

/// Marks Closure's base file, which provides `goog` without a `goog.provide`.
const PROVIDE_GOOG_FLAG: &str = "@provideGoog";

/// The source could not be parsed as JavaScript.
#[derive(Debug, Error)]
#[error("{}", .messages.join("; "))]
pub struct SyntaxError {
    messages: Vec<String>,
}

impl SyntaxError {
    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

/// Extracts provides and requires from Closure sources.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceParser;

impl SourceParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse `source` as the contents of `path`.
    ///
    /// Closure files may be classic scripts or ES modules, so the source type
    /// is decided by the parser from the presence of `import` / `export`.
    pub fn parse(&self, path: impl Into<PathBuf>, source: &str) -> Result<SourceUnit, SyntaxError> {
        let allocator = Allocator::default();
        let parsed = Parser::new(&allocator, source, SourceType::unambiguous()).parse();

        if parsed.panicked || !parsed.errors.is_empty() {
            let mut messages: Vec<String> = parsed.errors.iter().map(ToString::to_string).collect();
            if messages.is_empty() {
                messages.push("unrecoverable syntax error".to_string());
            }
            return Err(SyntaxError { messages });
        }

        let mut collector = DeclarationCollector::default();
        walk::walk_program(&mut collector, &parsed.program);

        let provides_goog = parsed.program.comments.iter().any(|comment| {
            comment.is_block() && comment.span.source_text(source).contains(PROVIDE_GOOG_FLAG)
        });

        let mut unit = SourceUnit::builder(path);
        for declaration in collector.declarations {
            unit = match declaration.kind {
                DeclarationKind::Provide => unit.provide(declaration.name),
                DeclarationKind::Module => unit.provide(declaration.name).module(true),
                DeclarationKind::Require => unit.require(declaration.name),
            };
        }
        if provides_goog {
            unit = unit.provide(BOOTSTRAP_NAMESPACE);
        }
        Ok(unit.build())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeclarationKind {
    Provide,
    Module,
    Require,
}

#[derive(Debug)]
struct Declaration {
    kind: DeclarationKind,
    name: String,
}

/// Collects declarations in source order.
#[derive(Debug, Default)]
struct DeclarationCollector {
    declarations: Vec<Declaration>,
}

impl<'a> Visit<'a> for DeclarationCollector {
    fn visit_call_expression(&mut self, call: &CallExpression<'a>) {
        if let Some(declaration) = goog_declaration(call) {
            self.declarations.push(declaration);
        }
        walk::walk_call_expression(self, call);
    }
}

/// `goog.<provide|module|require>('name')`, or `None` for any other call.
fn goog_declaration(call: &CallExpression<'_>) -> Option<Declaration> {
    let Expression::StaticMemberExpression(member) = &call.callee else {
        return None;
    };
    let Expression::Identifier(object) = &member.object else {
        return None;
    };
    if object.name.as_str() != "goog" {
        return None;
    }

    let kind = match member.property.name.as_str() {
        "provide" => DeclarationKind::Provide,
        "module" => DeclarationKind::Module,
        "require" => DeclarationKind::Require,
        _ => return None,
    };
    let Some(Argument::StringLiteral(name)) = call.arguments.first() else {
        return None;
    };
    Some(Declaration {
        kind,
        name: name.value.to_string(),
    })
}
