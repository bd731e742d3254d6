use super::*;

use std::rc::Rc;

/// Binding powers for the binary operators, loosest first.
fn binary_power(punct: Punct) -> Option<(BinaryOp, u8)> {
    let entry = match punct {
        Punct::BitOr => (BinaryOp::BitOr, 3),
        Punct::BitXor => (BinaryOp::BitXor, 4),
        Punct::BitAnd => (BinaryOp::BitAnd, 5),
        Punct::Eq => (BinaryOp::Equal, 6),
        Punct::NotEq => (BinaryOp::NotEqual, 6),
        Punct::StrictEq => (BinaryOp::StrictEqual, 6),
        Punct::StrictNotEq => (BinaryOp::StrictNotEqual, 6),
        Punct::Less => (BinaryOp::Less, 7),
        Punct::Greater => (BinaryOp::Greater, 7),
        Punct::LessEq => (BinaryOp::LessEq, 7),
        Punct::GreaterEq => (BinaryOp::GreaterEq, 7),
        Punct::Shl => (BinaryOp::ShiftLeft, 8),
        Punct::Shr => (BinaryOp::ShiftRight, 8),
        Punct::Ushr => (BinaryOp::ShiftRightUnsigned, 8),
        Punct::Plus => (BinaryOp::Add, 9),
        Punct::Minus => (BinaryOp::Sub, 9),
        Punct::Star => (BinaryOp::Mul, 10),
        Punct::Slash => (BinaryOp::Div, 10),
        Punct::Percent => (BinaryOp::Mod, 10),
        _ => return None,
    };
    Some(entry)
}

fn compound_assign(punct: Punct) -> Option<AssignOp> {
    let op = match punct {
        Punct::Assign => AssignOp(None),
        Punct::PlusAssign => AssignOp(Some(BinaryOp::Add)),
        Punct::MinusAssign => AssignOp(Some(BinaryOp::Sub)),
        Punct::StarAssign => AssignOp(Some(BinaryOp::Mul)),
        Punct::SlashAssign => AssignOp(Some(BinaryOp::Div)),
        Punct::PercentAssign => AssignOp(Some(BinaryOp::Mod)),
        Punct::AndAssign => AssignOp(Some(BinaryOp::BitAnd)),
        Punct::OrAssign => AssignOp(Some(BinaryOp::BitOr)),
        Punct::XorAssign => AssignOp(Some(BinaryOp::BitXor)),
        Punct::ShlAssign => AssignOp(Some(BinaryOp::ShiftLeft)),
        Punct::ShrAssign => AssignOp(Some(BinaryOp::ShiftRight)),
        Punct::UshrAssign => AssignOp(Some(BinaryOp::ShiftRightUnsigned)),
        _ => return None,
    };
    Some(op)
}

impl Parser<'_> {
    pub(super) fn parse_expression(&mut self, no_in: bool) -> Result<Expr> {
        let mut expr = self.parse_assignment(no_in)?;
        while self.eat_punct(Punct::Comma, true)? {
            let right = self.parse_assignment(no_in)?;
            expr = Expr::Comma {
                left: Box::new(expr),
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    pub(super) fn parse_assignment(&mut self, no_in: bool) -> Result<Expr> {
        let pos = self.tok.pos;
        let expr = stacker::maybe_grow(64 * 1024, 1024 * 1024, || self.parse_conditional(no_in))?;

        if let TokenKind::Punct(punct) = self.tok.kind {
            if let Some(op) = compound_assign(punct) {
                if !matches!(expr, Expr::Ident(_) | Expr::Member { .. }) {
                    return Err(Error::ScriptParse(format!(
                        "invalid assignment target at offset {pos}"
                    )));
                }
                self.advance(true)?;
                let value = self.parse_assignment(no_in)?;
                return Ok(Expr::Assign {
                    op,
                    target: Box::new(expr),
                    value: Box::new(value),
                });
            }
        }
        Ok(expr)
    }

    fn parse_conditional(&mut self, no_in: bool) -> Result<Expr> {
        let cond = self.parse_binary(no_in, 0)?;
        if !self.eat_punct(Punct::Question, true)? {
            return Ok(cond);
        }
        let consequent = self.parse_assignment(false)?;
        self.expect_punct(Punct::Colon, true)?;
        let alternate = self.parse_assignment(no_in)?;
        Ok(Expr::Conditional {
            cond: Box::new(cond),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
        })
    }

    fn parse_binary(&mut self, no_in: bool, min_power: u8) -> Result<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let (op, power, logical) = match &self.tok.kind {
                TokenKind::Punct(Punct::OrOr) => (BinaryOp::Add, 1, Some(LogicalOp::Or)),
                TokenKind::Punct(Punct::AndAnd) => (BinaryOp::Add, 2, Some(LogicalOp::And)),
                TokenKind::Punct(punct) => match binary_power(*punct) {
                    Some((op, power)) => (op, power, None),
                    None => break,
                },
                TokenKind::Ident(word) if word == "instanceof" => (BinaryOp::InstanceOf, 7, None),
                TokenKind::Ident(word) if word == "in" && !no_in => (BinaryOp::In, 7, None),
                _ => break,
            };
            if power < min_power {
                break;
            }
            self.advance(true)?;
            let right = self.parse_binary(no_in, power + 1)?;
            left = match logical {
                Some(op) => Expr::Logical {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                None => Expr::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
            };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        let op = match &self.tok.kind {
            TokenKind::Punct(Punct::Not) => Some(UnaryOp::Not),
            TokenKind::Punct(Punct::BitNot) => Some(UnaryOp::BitNot),
            TokenKind::Punct(Punct::Plus) => Some(UnaryOp::Plus),
            TokenKind::Punct(Punct::Minus) => Some(UnaryOp::Minus),
            TokenKind::Ident(word) if word == "typeof" => Some(UnaryOp::TypeOf),
            TokenKind::Ident(word) if word == "void" => Some(UnaryOp::Void),
            TokenKind::Ident(word) if word == "delete" => Some(UnaryOp::Delete),
            _ => None,
        };
        if let Some(op) = op {
            self.advance(true)?;
            let operand = self.parse_unary()?;
            return Ok(Expr::Unary {
                op,
                operand: Box::new(operand),
            });
        }

        if self.is_punct(Punct::Inc) || self.is_punct(Punct::Dec) {
            let increment = self.is_punct(Punct::Inc);
            let pos = self.tok.pos;
            self.advance(true)?;
            let target = self.parse_unary()?;
            if !matches!(target, Expr::Ident(_) | Expr::Member { .. }) {
                return Err(Error::ScriptParse(format!(
                    "invalid increment target at offset {pos}"
                )));
            }
            return Ok(Expr::Update {
                prefix: true,
                increment,
                target: Box::new(target),
            });
        }

        let expr = self.parse_lhs_expression()?;

        // Postfix ++/-- must sit on the same line as its operand.
        if (self.is_punct(Punct::Inc) || self.is_punct(Punct::Dec)) && !self.tok.newline_before {
            let increment = self.is_punct(Punct::Inc);
            let pos = self.tok.pos;
            if !matches!(expr, Expr::Ident(_) | Expr::Member { .. }) {
                return Err(Error::ScriptParse(format!(
                    "invalid increment target at offset {pos}"
                )));
            }
            self.advance(false)?;
            return Ok(Expr::Update {
                prefix: false,
                increment,
                target: Box::new(expr),
            });
        }
        Ok(expr)
    }

    fn parse_lhs_expression(&mut self) -> Result<Expr> {
        let expr = if self.is_word("new") {
            self.parse_new_expression()?
        } else {
            self.parse_primary()?
        };
        self.parse_call_tail(expr, true)
    }

    fn parse_new_expression(&mut self) -> Result<Expr> {
        self.expect_word("new", true)?;
        let callee = if self.is_word("new") {
            self.parse_new_expression()?
        } else {
            let primary = self.parse_primary()?;
            self.parse_call_tail(primary, false)?
        };
        let args = if self.is_punct(Punct::LParen) {
            self.parse_arguments()?
        } else {
            Vec::new()
        };
        Ok(Expr::New {
            callee: Box::new(callee),
            args,
        })
    }

    fn parse_call_tail(&mut self, mut expr: Expr, allow_call: bool) -> Result<Expr> {
        loop {
            if self.eat_punct(Punct::Dot, false)? {
                let name = self.expect_property_name()?;
                expr = Expr::Member {
                    object: Box::new(expr),
                    key: Box::new(Expr::String(name)),
                    computed: false,
                };
            } else if self.eat_punct(Punct::LBracket, true)? {
                let key = self.parse_expression(false)?;
                self.expect_punct(Punct::RBracket, false)?;
                expr = Expr::Member {
                    object: Box::new(expr),
                    key: Box::new(key),
                    computed: true,
                };
            } else if allow_call && self.is_punct(Punct::LParen) {
                let args = self.parse_arguments()?;
                expr = Expr::Call {
                    callee: Box::new(expr),
                    args,
                };
            } else {
                return Ok(expr);
            }
        }
    }

    fn parse_arguments(&mut self) -> Result<Vec<Expr>> {
        self.expect_punct(Punct::LParen, true)?;
        let mut args = Vec::new();
        if !self.is_punct(Punct::RParen) {
            loop {
                args.push(self.parse_assignment(false)?);
                if !self.eat_punct(Punct::Comma, true)? {
                    break;
                }
            }
        }
        self.expect_punct(Punct::RParen, false)?;
        Ok(args)
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        match self.tok.kind.clone() {
            TokenKind::Number(value) => {
                self.advance(false)?;
                Ok(Expr::Number(value))
            }
            TokenKind::String(text) => {
                self.advance(false)?;
                Ok(Expr::String(text))
            }
            TokenKind::Regex { pattern, flags } => {
                self.advance(false)?;
                Ok(Expr::Regex { pattern, flags })
            }
            TokenKind::Punct(Punct::LParen) => {
                self.advance(true)?;
                let expr = self.parse_expression(false)?;
                self.expect_punct(Punct::RParen, false)?;
                Ok(expr)
            }
            TokenKind::Punct(Punct::LBracket) => self.parse_array_literal(),
            TokenKind::Punct(Punct::LBrace) => self.parse_object_literal(),
            TokenKind::Ident(word) => match word.as_str() {
                "this" => {
                    self.advance(false)?;
                    Ok(Expr::This)
                }
                "null" => {
                    self.advance(false)?;
                    Ok(Expr::Null)
                }
                "true" => {
                    self.advance(false)?;
                    Ok(Expr::Bool(true))
                }
                "false" => {
                    self.advance(false)?;
                    Ok(Expr::Bool(false))
                }
                "function" => {
                    let func = self.parse_function(false)?;
                    Ok(Expr::Function(func))
                }
                _ if is_reserved_word(&word) => Err(self.unexpected("expression")),
                _ => {
                    self.advance(false)?;
                    Ok(Expr::Ident(word))
                }
            },
            _ => Err(self.unexpected("expression")),
        }
    }

    fn parse_array_literal(&mut self) -> Result<Expr> {
        self.expect_punct(Punct::LBracket, true)?;
        let mut elements = Vec::new();
        loop {
            if self.eat_punct(Punct::RBracket, false)? {
                break;
            }
            if self.eat_punct(Punct::Comma, true)? {
                elements.push(None);
                continue;
            }
            let element = self.parse_assignment(false)?;
            if self.eat_punct(Punct::Comma, true)? {
                elements.push(Some(element));
                continue;
            }
            elements.push(Some(element));
            self.expect_punct(Punct::RBracket, false)?;
            break;
        }
        Ok(Expr::ArrayLit(elements))
    }

    fn parse_object_literal(&mut self) -> Result<Expr> {
        self.expect_punct(Punct::LBrace, false)?;
        let mut properties = Vec::new();
        loop {
            if self.eat_punct(Punct::RBrace, false)? {
                break;
            }

            let accessor = match &self.tok.kind {
                TokenKind::Ident(word) if word == "get" || word == "set" => {
                    let is_getter = word == "get";
                    // Only an accessor when a property name follows; plain
                    // `get: value` stays a data property.
                    Some(is_getter)
                }
                _ => None,
            };

            if let Some(is_getter) = accessor {
                self.advance(false)?;
                if !self.is_punct(Punct::Colon)
                    && !self.is_punct(Punct::Comma)
                    && !self.is_punct(Punct::RBrace)
                    && !self.is_punct(Punct::LParen)
                {
                    let name = self.expect_property_name()?;
                    let func = self.parse_accessor_function(is_getter)?;
                    properties.push(if is_getter {
                        PropertyDef::Getter(name, func)
                    } else {
                        PropertyDef::Setter(name, func)
                    });
                    if self.eat_punct(Punct::Comma, false)? {
                        continue;
                    }
                    self.expect_punct(Punct::RBrace, false)?;
                    break;
                }
                // Fall through: `get`/`set` used as an ordinary key.
                self.expect_punct(Punct::Colon, true)?;
                let value = self.parse_assignment(false)?;
                let key = if is_getter { "get" } else { "set" };
                properties.push(PropertyDef::KeyValue(key.to_string(), value));
            } else {
                let key = self.expect_property_name()?;
                self.expect_punct(Punct::Colon, true)?;
                let value = self.parse_assignment(false)?;
                properties.push(PropertyDef::KeyValue(key, value));
            }

            if self.eat_punct(Punct::Comma, false)? {
                continue;
            }
            self.expect_punct(Punct::RBrace, false)?;
            break;
        }
        Ok(Expr::ObjectLit(properties))
    }

    fn parse_accessor_function(&mut self, is_getter: bool) -> Result<Rc<FunctionDef>> {
        let pos = self.tok.pos;
        self.expect_punct(Punct::LParen, false)?;
        let mut params = Vec::new();
        if !self.is_punct(Punct::RParen) {
            params.push(self.expect_binding_ident()?);
        }
        self.expect_punct(Punct::RParen, false)?;
        if is_getter && !params.is_empty() {
            return Err(Error::ScriptParse(format!(
                "getter cannot take parameters at offset {pos}"
            )));
        }
        if !is_getter && params.len() != 1 {
            return Err(Error::ScriptParse(format!(
                "setter takes exactly one parameter at offset {pos}"
            )));
        }
        self.expect_punct(Punct::LBrace, true)?;
        self.function_depth += 1;
        let body = self.parse_scope_body(false);
        self.function_depth -= 1;
        let body = body?;
        self.expect_punct(Punct::RBrace, false)?;
        Ok(Rc::new(FunctionDef {
            name: None,
            params,
            body,
        }))
    }
}
