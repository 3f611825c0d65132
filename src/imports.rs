//! collect the import specifiers of an es module without running it

use std::ops::Range;

use swc_core::common::{BytePos, Span, Spanned};
use swc_core::ecma::ast::{
    CallExpr, Callee, EsVersion, ExportAll, Expr, ImportDecl, Lit, NamedExport, Str,
};
use swc_core::ecma::parser::{error::Error as ParserError, lexer::Lexer, Parser, StringInput, Syntax};
use swc_core::ecma::visit::{Visit, VisitWith};
use url::Url;

use crate::error::ImtError;

/// Source positions start here, offset 0 is reserved for dummy spans.
const START: BytePos = BytePos(1);

/// One string literal naming a module, as written in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSite {
    pub specifier: String,
    /// Byte range of the literal, quotes included.
    pub range: Range<usize>,
}

#[derive(Debug, Default)]
pub struct ModuleImports {
    pub sites: Vec<ImportSite>,
}

impl ModuleImports {
    /// Distinct specifiers in first-occurrence order.
    pub fn specifiers(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for site in self.sites.iter() {
            if !seen.contains(&site.specifier.as_str()) {
                seen.push(site.specifier.as_str());
            }
        }
        seen
    }
}

pub fn extract_imports(url: &Url, source: &str) -> Result<ModuleImports, ImtError> {
    let end = BytePos(START.0 + source.len() as u32);
    let lexer = Lexer::new(
        Syntax::Es(Default::default()),
        EsVersion::latest(),
        StringInput::new(source, START, end),
        None,
    );

    let mut parser = Parser::new_from(lexer);
    let module = parser
        .parse_module()
        .map_err(|e| parse_error(url, source, e))?;

    if let Some(e) = parser.take_errors().into_iter().next() {
        return Err(parse_error(url, source, e));
    }

    let mut collector = ImportCollector::default();
    module.visit_with(&mut collector);

    Ok(collector.imports)
}

fn parse_error(url: &Url, source: &str, error: ParserError) -> ImtError {
    let offset = (error.span().lo.0.saturating_sub(START.0) as usize).min(source.len());
    let before = source.get(..offset).unwrap_or(source);
    let line = before.matches('\n').count() + 1;
    let column = before.len() - before.rfind('\n').map_or(0, |i| i + 1) + 1;

    ImtError::Parse {
        url: url.to_string(),
        line,
        column,
        message: error.kind().msg().into_owned(),
    }
}

#[derive(Default)]
struct ImportCollector {
    imports: ModuleImports,
}

impl ImportCollector {
    fn push(&mut self, src: &Str) {
        self.imports.sites.push(ImportSite {
            specifier: src.value.to_string(),
            range: span_range(src.span),
        });
    }
}

fn span_range(span: Span) -> Range<usize> {
    (span.lo.0 - START.0) as usize..(span.hi.0 - START.0) as usize
}

impl Visit for ImportCollector {
    // import x from "x"; import "x";
    fn visit_import_decl(&mut self, n: &ImportDecl) {
        self.push(&n.src);
    }

    // export { x } from "x"; export * as x from "x";
    fn visit_named_export(&mut self, n: &NamedExport) {
        if let Some(src) = &n.src {
            self.push(src);
        }
    }

    fn visit_export_all(&mut self, n: &ExportAll) {
        self.push(&n.src);
    }

    fn visit_call_expr(&mut self, n: &CallExpr) {
        if let Callee::Import(_) = n.callee {
            if let Some(arg) = n.args.first() {
                if let Expr::Lit(Lit::Str(src)) = &*arg.expr {
                    self.push(src);
                }
            }
        }
        n.visit_children_with(self);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::error::ErrorKind;

    use super::*;

    fn url() -> Url {
        Url::parse("https://cdn.test/mod.js").unwrap()
    }

    fn specifiers(source: &str) -> Vec<String> {
        extract_imports(&url(), source)
            .unwrap()
            .specifiers()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn static_and_dynamic() {
        let source = r#"
import React from "https://cdn.test/react.js";
import "/-/side-effect.js";
export { useState } from '/-/hooks.js';
export * from "/-/all.js";
export * as ns from "/-/ns.js";
const lazy = () => import("/-/lazy.js");
async function later() {
    if (true) {
        await import('/-/nested.js');
    }
}
"#;
        assert_eq!(
            specifiers(source),
            vec![
                "https://cdn.test/react.js",
                "/-/side-effect.js",
                "/-/hooks.js",
                "/-/all.js",
                "/-/ns.js",
                "/-/lazy.js",
                "/-/nested.js",
            ]
        );
    }

    #[test]
    fn duplicates_keep_every_site() {
        let source = r#"import a from "/a.js";
import { b } from "/b.js";
import { c } from "/a.js";
"#;
        let imports = extract_imports(&url(), source).unwrap();
        assert_eq!(imports.sites.len(), 3);
        assert_eq!(imports.specifiers(), vec!["/a.js", "/b.js"]);

        let first = &imports.sites[0];
        assert_eq!(&source[first.range.clone()], "\"/a.js\"");
    }

    #[test]
    fn ignores_plain_strings_and_computed_imports() {
        let source = r#"
const s = "/a.js";
const name = "x";
import(name);
import(`/tpl.js`);
console.log(import.meta.url);
"#;
        assert!(specifiers(source).is_empty());
    }

    #[test]
    fn parse_error_has_position() {
        let error = extract_imports(&url(), "const a = 1;\nimport { from \"/a.js\";").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::ParseError);
        match error {
            ImtError::Parse { url, line, .. } => {
                assert_eq!(url, "https://cdn.test/mod.js");
                assert_eq!(line, 2);
            }
            e => panic!("unexpected error: {e}"),
        }
    }
}
