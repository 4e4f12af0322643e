//! Expressions, parsed by precedence climbing.

use super::Parser;
use crate::mini::syntax_kind::SyntaxKind;

/// Left and right binding power of an infix operator.
fn infix_binding_power(kind: SyntaxKind) -> Option<(u8, u8)> {
    let power = match kind {
        SyntaxKind::EQ => (2, 1),
        SyntaxKind::PIPE_PIPE => (3, 4),
        SyntaxKind::AMP_AMP => (5, 6),
        SyntaxKind::EQ_EQ | SyntaxKind::BANG_EQ => (7, 8),
        SyntaxKind::LT | SyntaxKind::GT | SyntaxKind::LT_EQ | SyntaxKind::GT_EQ => (9, 10),
        SyntaxKind::PLUS | SyntaxKind::MINUS => (11, 12),
        SyntaxKind::STAR | SyntaxKind::SLASH | SyntaxKind::PERCENT => (13, 14),
        _ => return None,
    };
    Some(power)
}

impl Parser<'_> {
    /// Returns false if no expression could be parsed.
    pub(super) fn parse_expr(&mut self) -> bool {
        self.parse_expr_bp(0)
    }

    fn parse_expr_bp(&mut self, min_bp: u8) -> bool {
        let checkpoint = self.checkpoint();
        if !self.parse_unary() {
            return false;
        }

        while let Some((left, right)) = infix_binding_power(self.current_kind()) {
            if left < min_bp {
                break;
            }
            self.start_node_at(checkpoint, SyntaxKind::BIN_EXPR);
            self.bump();
            if !self.parse_expr_bp(right) {
                self.error("expected expression");
            }
            self.finish_node();
        }

        true
    }

    /// Unary = ('!' | '-') Unary | 'await' Unary | Postfix
    fn parse_unary(&mut self) -> bool {
        match self.current_kind() {
            SyntaxKind::BANG | SyntaxKind::MINUS => {
                self.start_node(SyntaxKind::PREFIX_EXPR);
                self.bump();
                let ok = self.parse_unary();
                self.finish_node();
                ok
            }
            SyntaxKind::AWAIT_KW => {
                self.start_node(SyntaxKind::AWAIT_EXPR);
                self.bump();
                let ok = self.parse_unary();
                self.finish_node();
                ok
            }
            _ => self.parse_postfix(),
        }
    }

    /// Postfix = Primary (Args | '.' NameRef)*
    fn parse_postfix(&mut self) -> bool {
        let checkpoint = self.checkpoint();
        if !self.parse_primary() {
            return false;
        }

        loop {
            match self.current_kind() {
                SyntaxKind::L_PAREN => {
                    self.start_node_at(checkpoint, SyntaxKind::CALL_EXPR);
                    self.parse_arg_list();
                    self.finish_node();
                }
                SyntaxKind::DOT => {
                    self.start_node_at(checkpoint, SyntaxKind::MEMBER_EXPR);
                    self.bump();
                    self.start_node(SyntaxKind::NAME_REF);
                    self.expect(SyntaxKind::IDENT);
                    self.finish_node();
                    self.finish_node();
                }
                _ => break,
            }
        }

        true
    }

    fn parse_primary(&mut self) -> bool {
        match self.current_kind() {
            SyntaxKind::INT_NUMBER
            | SyntaxKind::STRING
            | SyntaxKind::TRUE_KW
            | SyntaxKind::FALSE_KW
            | SyntaxKind::NULL_KW => {
                self.start_node(SyntaxKind::LITERAL);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::IDENT => {
                self.start_node(SyntaxKind::NAME_REF);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::THIS_KW | SyntaxKind::BASE_KW => {
                self.start_node(SyntaxKind::THIS_EXPR);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::L_PAREN => {
                self.start_node(SyntaxKind::PAREN_EXPR);
                self.bump();
                if !self.parse_expr() {
                    self.error("expected expression");
                }
                self.expect(SyntaxKind::R_PAREN);
                self.finish_node();
            }
            SyntaxKind::NEW_KW => {
                self.start_node(SyntaxKind::NEW_EXPR);
                self.bump();
                self.parse_type_ref();
                self.parse_arg_list();
                self.finish_node();
            }
            SyntaxKind::FN_KW => self.parse_lambda(),
            SyntaxKind::ASYNC_KW if self.nth(1) == SyntaxKind::FN_KW => self.parse_lambda(),
            _ => {
                self.error(format!("expected expression, found {:?}", self.current_kind()));
                return false;
            }
        }
        true
    }

    /// Lambda = Modifiers 'fn' Params RetType? (ArrowBody | Block)
    fn parse_lambda(&mut self) {
        self.start_node(SyntaxKind::LAMBDA_EXPR);
        self.parse_modifiers();
        self.expect(SyntaxKind::FN_KW);
        self.parse_param_list();
        if self.at(SyntaxKind::ARROW) {
            self.parse_ret_type();
        }
        if self.at(SyntaxKind::FAT_ARROW) {
            self.parse_arrow_body();
        } else {
            self.parse_block();
        }
        self.finish_node();
    }

    /// Args = '(' (Expr (',' Expr)*)? ')'
    pub(super) fn parse_arg_list(&mut self) {
        self.start_node(SyntaxKind::ARG_LIST);
        self.expect(SyntaxKind::L_PAREN);
        while !self.at_eof() && !self.at(SyntaxKind::R_PAREN) {
            if !self.parse_expr() {
                self.error_recover("expected argument", &[SyntaxKind::COMMA, SyntaxKind::R_PAREN, SyntaxKind::SEMICOLON]);
            }
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        self.expect(SyntaxKind::R_PAREN);
        self.finish_node();
    }
}
