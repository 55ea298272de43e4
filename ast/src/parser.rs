//! Recursive-descent parser. Stands in for the grammar-driven parser the
//! specification treats as an external collaborator; emits the flat
//! [`crate::parse_tree`] shapes the builder reshapes.

use crate::errors::SyntaxError;
use crate::lexer::{Lexer, Token, TokenKind};
use crate::location::{FileId, Range};
use crate::ops::BinaryOp;
use crate::parse_tree::{IdentKind, PExpr, PParam, PStmt, Suffix, Walang};

pub fn parse(src: &str, file: FileId) -> Result<Walang, SyntaxError> {
    let tokens = Lexer::new(src, file).tokenize()?;
    Parser { tokens, pos: 0 }.parse_walang()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &TokenKind {
        &self.tokens[self.pos].kind
    }

    fn peek_range(&self) -> Range {
        self.tokens[self.pos].range
    }

    fn bump(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, kind: &TokenKind, what: &str) -> Result<Token, SyntaxError> {
        if std::mem::discriminant(self.peek()) == std::mem::discriminant(kind) {
            Ok(self.bump())
        } else {
            Err(SyntaxError::UnexpectedToken {
                expected: what.into(),
                found: format!("{:?}", self.peek()),
                range: self.peek_range(),
            })
        }
    }

    fn expect_ident(&mut self) -> Result<(String, Range), SyntaxError> {
        let range = self.peek_range();
        match self.peek().clone() {
            TokenKind::Ident(name) => {
                self.bump();
                Ok((name, range))
            }
            other => Err(SyntaxError::UnexpectedToken {
                expected: "identifier".into(),
                found: format!("{other:?}"),
                range,
            }),
        }
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if std::mem::discriminant(self.peek()) == std::mem::discriminant(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    // ---- top level ----

    fn parse_walang(&mut self) -> Result<Walang, SyntaxError> {
        let mut items = Vec::new();
        while *self.peek() != TokenKind::Eof {
            items.push(self.parse_top_level_item()?);
        }
        Ok(Walang { items })
    }

    fn parse_top_level_item(&mut self) -> Result<PStmt, SyntaxError> {
        match self.peek() {
            TokenKind::Function => self.parse_function(),
            TokenKind::Class => self.parse_class(),
            _ => self.parse_statement(),
        }
    }

    // ---- statements ----

    fn parse_statement(&mut self) -> Result<PStmt, SyntaxError> {
        match self.peek() {
            TokenKind::Let => self.parse_declare(),
            TokenKind::LBrace => self.parse_block(),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::Break => {
                let range = self.bump().range;
                self.expect(&TokenKind::Semi, "';'")?;
                Ok(PStmt::Break(range))
            }
            TokenKind::Continue => {
                let range = self.bump().range;
                self.expect(&TokenKind::Semi, "';'")?;
                Ok(PStmt::Continue(range))
            }
            TokenKind::Return => self.parse_return(),
            TokenKind::Function => self.parse_function(),
            TokenKind::Class => self.parse_class(),
            _ => self.parse_assign_or_expr_statement(),
        }
    }

    fn parse_declare(&mut self) -> Result<PStmt, SyntaxError> {
        let start = self.bump().range; // `let`
        let (name, _) = self.expect_ident()?;
        let type_name = if self.eat(&TokenKind::Colon) {
            Some(self.expect_ident()?.0)
        } else {
            None
        };
        self.expect(&TokenKind::Eq, "'='")?;
        let init = self.parse_expression()?;
        let end = self.peek_range();
        self.expect(&TokenKind::Semi, "';'")?;
        Ok(PStmt::Declare { name, type_name, init, range: start.to(end) })
    }

    fn parse_assign_or_expr_statement(&mut self) -> Result<PStmt, SyntaxError> {
        let start = self.peek_range();
        let expr = self.parse_expression()?;
        if self.eat(&TokenKind::Eq) {
            let value = self.parse_expression()?;
            let end = self.peek_range();
            self.expect(&TokenKind::Semi, "';'")?;
            Ok(PStmt::Assign { target: expr, value, range: start.to(end) })
        } else {
            let end = self.peek_range();
            self.expect(&TokenKind::Semi, "';'")?;
            Ok(PStmt::ExpressionStmt(expr, start.to(end)))
        }
    }

    fn parse_block(&mut self) -> Result<PStmt, SyntaxError> {
        let start = self.expect(&TokenKind::LBrace, "'{'")?.range;
        let mut stmts = Vec::new();
        while *self.peek() != TokenKind::RBrace {
            stmts.push(self.parse_statement()?);
        }
        let end = self.bump().range; // `}`
        Ok(PStmt::Block(stmts, start.to(end)))
    }

    fn parse_if(&mut self) -> Result<PStmt, SyntaxError> {
        let start = self.bump().range; // `if`
        self.expect(&TokenKind::LParen, "'('")?;
        let cond = self.parse_expression()?;
        self.expect(&TokenKind::RParen, "')'")?;
        let then_block = Box::new(self.parse_block()?);
        let or_else = if self.eat(&TokenKind::Else) {
            if *self.peek() == TokenKind::If {
                Some(Box::new(self.parse_if()?))
            } else {
                Some(Box::new(self.parse_block()?))
            }
        } else {
            None
        };
        let end = or_else
            .as_ref()
            .map_or_else(|| then_block.range(), |b| b.range());
        Ok(PStmt::If { cond, then_block, or_else, range: start.to(end) })
    }

    fn parse_while(&mut self) -> Result<PStmt, SyntaxError> {
        let start = self.bump().range; // `while`
        self.expect(&TokenKind::LParen, "'('")?;
        let cond = self.parse_expression()?;
        self.expect(&TokenKind::RParen, "')'")?;
        let body = Box::new(self.parse_block()?);
        let end = body.range();
        Ok(PStmt::While { cond, body, range: start.to(end) })
    }

    fn parse_return(&mut self) -> Result<PStmt, SyntaxError> {
        let start = self.bump().range; // `return`
        let expr = if *self.peek() == TokenKind::Semi { None } else { Some(self.parse_expression()?) };
        let end = self.peek_range();
        self.expect(&TokenKind::Semi, "';'")?;
        Ok(PStmt::Return(expr, start.to(end)))
    }

    fn parse_params(&mut self) -> Result<Vec<PParam>, SyntaxError> {
        self.expect(&TokenKind::LParen, "'('")?;
        let mut params = Vec::new();
        while *self.peek() != TokenKind::RParen {
            let (name, _) = self.expect_ident()?;
            self.expect(&TokenKind::Colon, "':'")?;
            let (type_name, _) = self.expect_ident()?;
            params.push(PParam { name, type_name });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen, "')'")?;
        Ok(params)
    }

    fn parse_function(&mut self) -> Result<PStmt, SyntaxError> {
        let start = self.bump().range; // `function`
        let (name, _) = self.expect_ident()?;
        let params = self.parse_params()?;
        let return_type = if self.eat(&TokenKind::Colon) { Some(self.expect_ident()?.0) } else { None };
        let body = Box::new(self.parse_block()?);
        let end = body.range();
        Ok(PStmt::Function { name, params, return_type, body, range: start.to(end) })
    }

    fn parse_class(&mut self) -> Result<PStmt, SyntaxError> {
        let start = self.bump().range; // `class`
        let (name, _) = self.expect_ident()?;
        self.expect(&TokenKind::LBrace, "'{'")?;
        let mut members = Vec::new();
        let mut methods = Vec::new();
        while *self.peek() != TokenKind::RBrace {
            if *self.peek() == TokenKind::Function {
                methods.push(self.parse_function()?);
            } else {
                let (mname, _) = self.expect_ident()?;
                self.expect(&TokenKind::Colon, "':'")?;
                let (type_name, _) = self.expect_ident()?;
                self.expect(&TokenKind::Semi, "';'")?;
                members.push(PParam { name: mname, type_name });
            }
        }
        let end = self.bump().range; // `}`
        Ok(PStmt::Class { name, members, methods, range: start.to(end) })
    }

    // ---- expressions ----

    fn parse_expression(&mut self) -> Result<PExpr, SyntaxError> {
        self.parse_ternary()
    }

    /// Right-associativity for chained ternaries (`a ? b : c ? d : e`) falls
    /// out of this rule recursing into itself for the `else` branch.
    fn parse_ternary(&mut self) -> Result<PExpr, SyntaxError> {
        let cond = self.parse_binary()?;
        if self.eat(&TokenKind::Question) {
            let then = self.parse_ternary()?;
            self.expect(&TokenKind::Colon, "':'")?;
            let or_else = self.parse_ternary()?;
            let range = cond.range().to(or_else.range());
            Ok(PExpr::Ternary {
                cond: Box::new(cond),
                then: Box::new(then),
                or_else: Box::new(or_else),
                range,
            })
        } else {
            Ok(cond)
        }
    }

    fn binary_op(&self) -> Option<BinaryOp> {
        Some(match self.peek() {
            TokenKind::OrOr => BinaryOp::Or,
            TokenKind::AndAnd => BinaryOp::And,
            TokenKind::EqEq => BinaryOp::Eq,
            TokenKind::Ne => BinaryOp::Ne,
            TokenKind::Lt => BinaryOp::Lt,
            TokenKind::Le => BinaryOp::Le,
            TokenKind::Gt => BinaryOp::Gt,
            TokenKind::Ge => BinaryOp::Ge,
            TokenKind::Pipe => BinaryOp::BitOr,
            TokenKind::Caret => BinaryOp::BitXor,
            TokenKind::Amp => BinaryOp::BitAnd,
            TokenKind::Shl => BinaryOp::Shl,
            TokenKind::Shr => BinaryOp::Shr,
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            TokenKind::Percent => BinaryOp::Mod,
            _ => return None,
        })
    }

    /// Grammar-level binary expressions are a flat `unary (op unary)*` list;
    /// precedence is resolved later by the AST builder, not here.
    fn parse_binary(&mut self) -> Result<PExpr, SyntaxError> {
        let start = self.peek_range();
        let first = self.parse_unary()?;
        let mut tail = Vec::new();
        while let Some(op) = self.binary_op() {
            self.bump();
            let rhs = self.parse_unary()?;
            tail.push((op, rhs));
        }
        if tail.is_empty() {
            Ok(first)
        } else {
            let end = tail.last().unwrap().1.range();
            Ok(PExpr::BinaryChain { first: Box::new(first), tail, range: start.to(end) })
        }
    }

    fn parse_unary(&mut self) -> Result<PExpr, SyntaxError> {
        let start = self.peek_range();
        let op = match self.peek() {
            TokenKind::Plus => crate::ops::PrefixOp::Plus,
            TokenKind::Minus => crate::ops::PrefixOp::Minus,
            TokenKind::Not => crate::ops::PrefixOp::Not,
            _ => return self.parse_postfix(),
        };
        self.bump();
        let operand = self.parse_unary()?;
        let end = operand.range();
        Ok(PExpr::Prefix { op, operand: Box::new(operand), range: start.to(end) })
    }

    /// Call/member suffix chains are collected flat; the builder rewraps
    /// them receiver-first into nested `Call`/`Member` nodes.
    fn parse_postfix(&mut self) -> Result<PExpr, SyntaxError> {
        let start = self.peek_range();
        let base = self.parse_primary()?;
        let mut suffixes = Vec::new();
        loop {
            match self.peek() {
                TokenKind::LParen => {
                    self.bump();
                    let mut args = Vec::new();
                    while *self.peek() != TokenKind::RParen {
                        args.push(self.parse_expression()?);
                        if !self.eat(&TokenKind::Comma) {
                            break;
                        }
                    }
                    let end = self.bump().range; // `)`
                    suffixes.push(Suffix::Call { args, range: start.to(end) });
                }
                TokenKind::Dot => {
                    self.bump();
                    let (name, range) = self.expect_ident()?;
                    suffixes.push(Suffix::Member { name, range: start.to(range) });
                }
                _ => break,
            }
        }
        if suffixes.is_empty() {
            Ok(base)
        } else {
            let end = suffixes.last().map_or(base.range(), |s| match s {
                Suffix::Call { range, .. } | Suffix::Member { range, .. } => *range,
            });
            Ok(PExpr::Suffixed { base: Box::new(base), suffixes, range: start.to(end) })
        }
    }

    fn parse_primary(&mut self) -> Result<PExpr, SyntaxError> {
        let range = self.peek_range();
        match self.peek().clone() {
            TokenKind::Int(v) => {
                self.bump();
                Ok(PExpr::Identifier { kind: IdentKind::Int(v), range })
            }
            TokenKind::Float(v) => {
                self.bump();
                Ok(PExpr::Identifier { kind: IdentKind::Float(v), range })
            }
            TokenKind::Ident(name) => {
                self.bump();
                Ok(PExpr::Identifier { kind: IdentKind::Name(name), range })
            }
            TokenKind::LParen => {
                self.bump();
                let inner = self.parse_expression()?;
                let end = self.expect(&TokenKind::RParen, "')'")?.range;
                Ok(PExpr::Parentheses { inner: Box::new(inner), range: range.to(end) })
            }
            other => Err(SyntaxError::UnexpectedToken {
                expected: "expression".into(),
                found: format!("{other:?}"),
                range,
            }),
        }
    }
}
