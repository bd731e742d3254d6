pub(crate) use super::*;

mod cursor;
mod js_lex;
mod parser_expr;
mod parser_stmt;

pub(crate) use js_lex::{Punct, Token, TokenKind};

use std::rc::Rc;

const KEYWORDS: &[&str] = &[
    "break",
    "case",
    "catch",
    "const",
    "continue",
    "default",
    "delete",
    "do",
    "else",
    "false",
    "finally",
    "for",
    "function",
    "if",
    "in",
    "instanceof",
    "let",
    "new",
    "null",
    "return",
    "switch",
    "this",
    "throw",
    "true",
    "try",
    "typeof",
    "var",
    "void",
    "while",
    "with",
];

pub(crate) fn is_reserved_word(name: &str) -> bool {
    KEYWORDS.contains(&name)
}

/// Parse a whole program (or an `eval` body, which is the same grammar).
pub(crate) fn parse_program(src: &str, legacy_octal: bool) -> Result<Program> {
    let mut parser = Parser::new(src, legacy_octal)?;
    let program = parser.parse_scope_body(true)?;
    if !matches!(parser.tok.kind, TokenKind::Eof) {
        return Err(parser.unexpected("end of input"));
    }
    Ok(program)
}

/// Names hoisted to the enclosing function scope, collected while its
/// statements parse.
#[derive(Debug, Default)]
struct ScopeCollector {
    vars: Vec<String>,
    funcs: Vec<Rc<FunctionDef>>,
}

impl ScopeCollector {
    fn note_var(&mut self, name: &str) {
        if !self.vars.iter().any(|v| v == name) {
            self.vars.push(name.to_string());
        }
    }
}

#[derive(Debug)]
pub(crate) struct Parser<'a> {
    lexer: js_lex::JsLexer<'a>,
    tok: Token,
    scopes: Vec<ScopeCollector>,
    function_depth: usize,
    iteration_depth: usize,
    switch_depth: usize,
    labels: Vec<(String, bool)>,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str, legacy_octal: bool) -> Result<Self> {
        let mut lexer = js_lex::JsLexer::new(src, legacy_octal);
        let tok = lexer.next_token(true)?;
        Ok(Self {
            lexer,
            tok,
            scopes: Vec::new(),
            function_depth: 0,
            iteration_depth: 0,
            switch_depth: 0,
            labels: Vec::new(),
        })
    }

    /// Replace the current token. `regex_ok` says whether a `/` at the new
    /// position would start a regex literal rather than a division.
    fn advance(&mut self, regex_ok: bool) -> Result<()> {
        self.tok = self.lexer.next_token(regex_ok)?;
        Ok(())
    }

    fn unexpected(&self, wanted: &str) -> Error {
        Error::ScriptParse(format!(
            "expected {wanted} at offset {}, found {:?}",
            self.tok.pos, self.tok.kind
        ))
    }

    fn is_punct(&self, punct: Punct) -> bool {
        self.tok.kind == TokenKind::Punct(punct)
    }

    fn eat_punct(&mut self, punct: Punct, regex_ok: bool) -> Result<bool> {
        if self.is_punct(punct) {
            self.advance(regex_ok)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect_punct(&mut self, punct: Punct, regex_ok: bool) -> Result<()> {
        if self.eat_punct(punct, regex_ok)? {
            Ok(())
        } else {
            Err(self.unexpected(&format!("{punct:?}")))
        }
    }

    fn is_word(&self, word: &str) -> bool {
        matches!(&self.tok.kind, TokenKind::Ident(name) if name == word)
    }

    fn eat_word(&mut self, word: &str, regex_ok: bool) -> Result<bool> {
        if self.is_word(word) {
            self.advance(regex_ok)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect_word(&mut self, word: &str, regex_ok: bool) -> Result<()> {
        if self.eat_word(word, regex_ok)? {
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{word}'")))
        }
    }

    /// A binding identifier: any identifier that is not a reserved word.
    fn expect_binding_ident(&mut self) -> Result<String> {
        match &self.tok.kind {
            TokenKind::Ident(name) if !is_reserved_word(name) => {
                let name = name.clone();
                self.advance(false)?;
                Ok(name)
            }
            TokenKind::Ident(name) => Err(Error::ScriptParse(format!(
                "reserved word '{name}' cannot be a binding at offset {}",
                self.tok.pos
            ))),
            _ => Err(self.unexpected("identifier")),
        }
    }

    /// A property name position: reserved words are fine here.
    fn expect_property_name(&mut self) -> Result<String> {
        match &self.tok.kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance(false)?;
                Ok(name)
            }
            TokenKind::String(text) => {
                let text = text.clone();
                self.advance(false)?;
                Ok(text)
            }
            TokenKind::Number(value) => {
                let key = crate::format_float(*value);
                self.advance(false)?;
                Ok(key)
            }
            _ => Err(self.unexpected("property name")),
        }
    }

    fn note_var(&mut self, name: &str) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.note_var(name);
        }
    }

    fn note_func(&mut self, func: Rc<FunctionDef>) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.funcs.push(func);
        }
    }

    /// Parse a function-scope body: a statement list plus the hoisted
    /// names seen anywhere in its textual extent.
    fn parse_scope_body(&mut self, top_level: bool) -> Result<Program> {
        self.scopes.push(ScopeCollector::default());
        let mut body = Vec::new();
        let result = (|| -> Result<()> {
            loop {
                if matches!(self.tok.kind, TokenKind::Eof) {
                    if top_level {
                        return Ok(());
                    }
                    return Err(self.unexpected("'}'"));
                }
                if !top_level && self.is_punct(Punct::RBrace) {
                    return Ok(());
                }
                body.push(self.parse_statement()?);
            }
        })();
        let collector = self.scopes.pop().unwrap_or_default();
        result?;
        Ok(Program {
            body,
            vars: collector.vars,
            funcs: collector.funcs,
        })
    }

    /// `function name? ( params ) { body }`, starting after the `function`
    /// word has been recognized but not consumed.
    fn parse_function(&mut self, require_name: bool) -> Result<Rc<FunctionDef>> {
        self.expect_word("function", false)?;
        let name = match &self.tok.kind {
            TokenKind::Ident(name) if !is_reserved_word(name) => {
                let name = name.clone();
                self.advance(false)?;
                Some(name)
            }
            _ if require_name => return Err(self.unexpected("function name")),
            _ => None,
        };

        self.expect_punct(Punct::LParen, false)?;
        let mut params = Vec::new();
        if !self.is_punct(Punct::RParen) {
            loop {
                params.push(self.expect_binding_ident()?);
                if !self.eat_punct(Punct::Comma, false)? {
                    break;
                }
            }
        }
        self.expect_punct(Punct::RParen, false)?;
        self.expect_punct(Punct::LBrace, true)?;

        let outer_iteration = std::mem::take(&mut self.iteration_depth);
        let outer_switch = std::mem::take(&mut self.switch_depth);
        let outer_labels = std::mem::take(&mut self.labels);
        self.function_depth += 1;
        let body = stacker::maybe_grow(64 * 1024, 1024 * 1024, || self.parse_scope_body(false));
        self.function_depth -= 1;
        self.iteration_depth = outer_iteration;
        self.switch_depth = outer_switch;
        self.labels = outer_labels;
        let body = body?;

        self.expect_punct(Punct::RBrace, false)?;
        Ok(Rc::new(FunctionDef { name, params, body }))
    }
}
