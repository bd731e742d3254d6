use super::*;

impl Parser<'_> {
    pub(super) fn parse_statement(&mut self) -> Result<Stmt> {
        match &self.tok.kind {
            TokenKind::Punct(Punct::LBrace) => {
                self.advance(true)?;
                let body = self.parse_statement_list(&[])?;
                self.expect_punct(Punct::RBrace, true)?;
                Ok(Stmt::Block(body))
            }
            TokenKind::Punct(Punct::Semi) => {
                self.advance(true)?;
                Ok(Stmt::Empty)
            }
            TokenKind::Ident(word) => match word.as_str() {
                "var" => self.parse_declaration_statement(DeclKind::Var),
                "let" => self.parse_declaration_statement(DeclKind::Let),
                "const" => self.parse_declaration_statement(DeclKind::Const),
                "function" => {
                    let func = self.parse_function(true)?;
                    let name = func.name.clone().unwrap_or_default();
                    self.note_func(func.clone());
                    Ok(Stmt::FunctionDecl { name, func })
                }
                "if" => self.parse_if(),
                "while" => self.parse_while(),
                "do" => self.parse_do_while(),
                "for" => self.parse_for(),
                "break" => self.parse_break_continue(true),
                "continue" => self.parse_break_continue(false),
                "return" => self.parse_return(),
                "with" => self.parse_with(),
                "switch" => self.parse_switch(),
                "throw" => self.parse_throw(),
                "try" => self.parse_try(),
                _ => self.parse_expression_or_labeled(),
            },
            _ => self.parse_expression_or_labeled(),
        }
    }

    fn parse_statement_list(&mut self, stop_words: &[&str]) -> Result<Vec<Stmt>> {
        let mut body = Vec::new();
        loop {
            if matches!(self.tok.kind, TokenKind::Eof) || self.is_punct(Punct::RBrace) {
                return Ok(body);
            }
            if stop_words.iter().any(|word| self.is_word(word)) {
                return Ok(body);
            }
            body.push(self.parse_statement()?);
        }
    }

    /// Semicolon, or one of the positions the grammar inserts it at.
    fn consume_semicolon(&mut self) -> Result<()> {
        if self.eat_punct(Punct::Semi, true)? {
            return Ok(());
        }
        if self.is_punct(Punct::RBrace)
            || matches!(self.tok.kind, TokenKind::Eof)
            || self.tok.newline_before
        {
            return Ok(());
        }
        Err(self.unexpected("';'"))
    }

    fn parse_declaration_statement(&mut self, kind: DeclKind) -> Result<Stmt> {
        self.advance(false)?;
        let declarations = self.parse_declarator_list(kind, false)?;
        self.consume_semicolon()?;
        Ok(Stmt::VarDecl { kind, declarations })
    }

    fn parse_declarator_list(
        &mut self,
        kind: DeclKind,
        no_in: bool,
    ) -> Result<Vec<(String, Option<Expr>)>> {
        let mut declarations = Vec::new();
        loop {
            let name = self.expect_binding_ident()?;
            if kind == DeclKind::Var {
                self.note_var(&name);
            }
            let init = if self.eat_punct(Punct::Assign, true)? {
                Some(self.parse_assignment(no_in)?)
            } else {
                None
            };
            declarations.push((name, init));
            if !self.eat_punct(Punct::Comma, false)? {
                break;
            }
        }
        Ok(declarations)
    }

    fn parse_if(&mut self) -> Result<Stmt> {
        self.advance(false)?;
        self.expect_punct(Punct::LParen, true)?;
        let cond = self.parse_expression(false)?;
        self.expect_punct(Punct::RParen, true)?;
        let then_stmt = Box::new(self.parse_statement()?);
        // `else` binds to the nearest unmatched `if`, which is exactly what
        // eagerly consuming it here produces.
        let else_stmt = if self.eat_word("else", true)? {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };
        Ok(Stmt::If {
            cond,
            then_stmt,
            else_stmt,
        })
    }

    fn parse_loop_body(&mut self) -> Result<Box<Stmt>> {
        self.iteration_depth += 1;
        let body = self.parse_statement();
        self.iteration_depth -= 1;
        Ok(Box::new(body?))
    }

    fn parse_while(&mut self) -> Result<Stmt> {
        self.advance(false)?;
        self.expect_punct(Punct::LParen, true)?;
        let cond = self.parse_expression(false)?;
        self.expect_punct(Punct::RParen, true)?;
        let body = self.parse_loop_body()?;
        Ok(Stmt::While { cond, body })
    }

    fn parse_do_while(&mut self) -> Result<Stmt> {
        self.advance(true)?;
        let body = self.parse_loop_body()?;
        self.expect_word("while", false)?;
        self.expect_punct(Punct::LParen, true)?;
        let cond = self.parse_expression(false)?;
        self.expect_punct(Punct::RParen, true)?;
        self.eat_punct(Punct::Semi, true)?;
        Ok(Stmt::DoWhile { body, cond })
    }

    fn parse_for(&mut self) -> Result<Stmt> {
        self.advance(false)?;
        self.expect_punct(Punct::LParen, true)?;

        let mut per_iteration_lets = Vec::new();
        let init: Option<Box<ForInit>>;

        if self.is_punct(Punct::Semi) {
            init = None;
        } else if self.is_word("var") || self.is_word("let") || self.is_word("const") {
            let kind = if self.is_word("var") {
                DeclKind::Var
            } else if self.is_word("let") {
                DeclKind::Let
            } else {
                DeclKind::Const
            };
            self.advance(false)?;
            let first_name_pos = self.tok.pos;
            let declarations = self.parse_declarator_list(kind, true)?;
            if self.is_word("in") {
                if declarations.len() != 1 || declarations[0].1.is_some() {
                    return Err(Error::ScriptParse(format!(
                        "invalid for-in declaration at offset {first_name_pos}"
                    )));
                }
                self.advance(true)?;
                let object = self.parse_expression(false)?;
                self.expect_punct(Punct::RParen, true)?;
                let body = self.parse_loop_body()?;
                return Ok(Stmt::ForIn {
                    target: ForInTarget::Decl {
                        kind,
                        name: declarations[0].0.clone(),
                    },
                    object,
                    body,
                });
            }
            if kind != DeclKind::Var {
                per_iteration_lets = declarations.iter().map(|(name, _)| name.clone()).collect();
            }
            init = Some(Box::new(ForInit::Decl(Stmt::VarDecl { kind, declarations })));
        } else {
            let expr = self.parse_expression(true)?;
            if self.is_word("in") {
                if !matches!(expr, Expr::Ident(_) | Expr::Member { .. }) {
                    return Err(Error::ScriptParse(format!(
                        "invalid for-in target at offset {}",
                        self.tok.pos
                    )));
                }
                self.advance(true)?;
                let object = self.parse_expression(false)?;
                self.expect_punct(Punct::RParen, true)?;
                let body = self.parse_loop_body()?;
                return Ok(Stmt::ForIn {
                    target: ForInTarget::Expr(expr),
                    object,
                    body,
                });
            }
            init = Some(Box::new(ForInit::Expr(expr)));
        }

        self.expect_punct(Punct::Semi, true)?;
        let cond = if self.is_punct(Punct::Semi) {
            None
        } else {
            Some(self.parse_expression(false)?)
        };
        self.expect_punct(Punct::Semi, true)?;
        let update = if self.is_punct(Punct::RParen) {
            None
        } else {
            Some(self.parse_expression(false)?)
        };
        self.expect_punct(Punct::RParen, true)?;
        let body = self.parse_loop_body()?;
        Ok(Stmt::For {
            init,
            cond,
            update,
            body,
            per_iteration_lets,
        })
    }

    fn parse_break_continue(&mut self, is_break: bool) -> Result<Stmt> {
        let pos = self.tok.pos;
        self.advance(false)?;
        let label = match &self.tok.kind {
            TokenKind::Ident(name)
                if !self.tok.newline_before && !is_reserved_word(name) =>
            {
                let name = name.clone();
                self.advance(true)?;
                Some(name)
            }
            _ => None,
        };
        self.consume_semicolon()?;

        match &label {
            Some(name) => {
                let known = self.labels.iter().any(|(label, _)| label == name);
                if !known {
                    return Err(Error::ScriptParse(format!(
                        "label '{name}' not found at offset {pos}"
                    )));
                }
            }
            None => {
                let valid = if is_break {
                    self.iteration_depth > 0 || self.switch_depth > 0
                } else {
                    self.iteration_depth > 0
                };
                if !valid {
                    return Err(Error::ScriptParse(format!(
                        "misplaced '{}' at offset {pos}",
                        if is_break { "break" } else { "continue" }
                    )));
                }
            }
        }

        Ok(if is_break {
            Stmt::Break(label)
        } else {
            Stmt::Continue(label)
        })
    }

    fn parse_return(&mut self) -> Result<Stmt> {
        let pos = self.tok.pos;
        if self.function_depth == 0 {
            return Err(Error::ScriptParse(format!(
                "'return' outside function at offset {pos}"
            )));
        }
        self.advance(true)?;
        // Restricted production: a line break ends the statement.
        let value = if self.is_punct(Punct::Semi)
            || self.is_punct(Punct::RBrace)
            || matches!(self.tok.kind, TokenKind::Eof)
            || self.tok.newline_before
        {
            None
        } else {
            Some(self.parse_expression(false)?)
        };
        self.consume_semicolon()?;
        Ok(Stmt::Return(value))
    }

    fn parse_with(&mut self) -> Result<Stmt> {
        self.advance(false)?;
        self.expect_punct(Punct::LParen, true)?;
        let object = self.parse_expression(false)?;
        self.expect_punct(Punct::RParen, true)?;
        let body = Box::new(self.parse_statement()?);
        Ok(Stmt::With { object, body })
    }

    fn parse_switch(&mut self) -> Result<Stmt> {
        self.advance(false)?;
        self.expect_punct(Punct::LParen, true)?;
        let discriminant = self.parse_expression(false)?;
        self.expect_punct(Punct::RParen, false)?;
        self.expect_punct(Punct::LBrace, true)?;

        self.switch_depth += 1;
        let result = (|| -> Result<Vec<SwitchCase>> {
            let mut cases = Vec::new();
            let mut saw_default = false;
            loop {
                if self.eat_punct(Punct::RBrace, true)? {
                    return Ok(cases);
                }
                let test = if self.eat_word("case", true)? {
                    let test = self.parse_expression(false)?;
                    Some(test)
                } else if self.is_word("default") {
                    let pos = self.tok.pos;
                    self.advance(false)?;
                    if saw_default {
                        return Err(Error::ScriptParse(format!(
                            "duplicate 'default' clause at offset {pos}"
                        )));
                    }
                    saw_default = true;
                    None
                } else {
                    return Err(self.unexpected("'case' or 'default'"));
                };
                self.expect_punct(Punct::Colon, true)?;
                let body = self.parse_statement_list(&["case", "default"])?;
                cases.push(SwitchCase { test, body });
            }
        })();
        self.switch_depth -= 1;

        Ok(Stmt::Switch {
            discriminant,
            cases: result?,
        })
    }

    fn parse_throw(&mut self) -> Result<Stmt> {
        let pos = self.tok.pos;
        self.advance(true)?;
        if self.tok.newline_before {
            return Err(Error::ScriptParse(format!(
                "line break after 'throw' at offset {pos}"
            )));
        }
        let value = self.parse_expression(false)?;
        self.consume_semicolon()?;
        Ok(Stmt::Throw(value))
    }

    fn parse_try(&mut self) -> Result<Stmt> {
        let pos = self.tok.pos;
        self.advance(false)?;
        self.expect_punct(Punct::LBrace, true)?;
        let block = self.parse_statement_list(&[])?;
        self.expect_punct(Punct::RBrace, false)?;

        let catch = if self.eat_word("catch", false)? {
            self.expect_punct(Punct::LParen, false)?;
            let binding = self.expect_binding_ident()?;
            self.expect_punct(Punct::RParen, false)?;
            self.expect_punct(Punct::LBrace, true)?;
            let body = self.parse_statement_list(&[])?;
            self.expect_punct(Punct::RBrace, false)?;
            Some(CatchClause { binding, body })
        } else {
            None
        };

        let finally = if self.eat_word("finally", false)? {
            self.expect_punct(Punct::LBrace, true)?;
            let body = self.parse_statement_list(&[])?;
            self.expect_punct(Punct::RBrace, true)?;
            Some(body)
        } else {
            None
        };

        if catch.is_none() && finally.is_none() {
            return Err(Error::ScriptParse(format!(
                "'try' without 'catch' or 'finally' at offset {pos}"
            )));
        }
        Ok(Stmt::Try {
            block,
            catch,
            finally,
        })
    }

    fn parse_expression_or_labeled(&mut self) -> Result<Stmt> {
        let expr = self.parse_expression(false)?;
        if let Expr::Ident(name) = &expr {
            if self.is_punct(Punct::Colon) && !is_reserved_word(name) {
                let label = name.clone();
                self.advance(true)?;
                let is_loop =
                    self.is_word("while") || self.is_word("do") || self.is_word("for");
                self.labels.push((label.clone(), is_loop));
                let body = self.parse_statement();
                self.labels.pop();
                return Ok(Stmt::Labeled {
                    label,
                    body: Box::new(body?),
                });
            }
        }
        self.consume_semicolon()?;
        Ok(Stmt::Expr(expr))
    }
}
