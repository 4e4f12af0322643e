//! Statements and blocks.

use super::Parser;
use crate::mini::syntax_kind::SyntaxKind;

const STATEMENT_RECOVERY: &[SyntaxKind] = &[SyntaxKind::SEMICOLON, SyntaxKind::R_BRACE];

impl Parser<'_> {
    /// Statement = Block | Let | Return | Throw | If | While | Try | Yield | LocalFunction | ';' | ExprStmt
    pub(super) fn parse_statement(&mut self) {
        match self.current_kind() {
            SyntaxKind::L_BRACE => self.parse_block(),
            SyntaxKind::LET_KW => self.parse_let(),
            SyntaxKind::RETURN_KW => self.parse_jump(SyntaxKind::RETURN_STMT),
            SyntaxKind::THROW_KW => self.parse_jump(SyntaxKind::THROW_STMT),
            SyntaxKind::IF_KW => self.parse_if(),
            SyntaxKind::WHILE_KW => self.parse_while(),
            SyntaxKind::TRY_KW => self.parse_try(),
            SyntaxKind::YIELD_KW => self.parse_yield(),
            SyntaxKind::SEMICOLON => {
                self.start_node(SyntaxKind::EMPTY_STMT);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::FN_KW if self.nth(1) == SyntaxKind::IDENT => self.parse_local_function(),
            SyntaxKind::ASYNC_KW if self.nth(1) == SyntaxKind::FN_KW && self.nth(2) == SyntaxKind::IDENT => {
                self.parse_local_function()
            }
            SyntaxKind::R_BRACE | SyntaxKind::ELSE_KW | SyntaxKind::CATCH_KW | SyntaxKind::FINALLY_KW => {
                self.error_recover(format!("unexpected {:?}", self.current_kind()), &[]);
            }
            _ => self.parse_expr_statement(),
        }
    }

    /// Block = '{' Statement* '}'
    pub(super) fn parse_block(&mut self) {
        self.start_node(SyntaxKind::BLOCK);
        self.expect(SyntaxKind::L_BRACE);

        while !self.at_eof() && !self.at(SyntaxKind::R_BRACE) {
            let pos_before = self.pos;
            self.parse_statement();
            if self.pos == pos_before {
                self.error(format!("stuck on token: {:?}", self.current_kind()));
                self.bump();
            }
        }

        self.expect(SyntaxKind::R_BRACE);
        self.finish_node();
    }

    /// Let = 'let' LocalDeclarator (',' LocalDeclarator)* ';'
    fn parse_let(&mut self) {
        self.start_node(SyntaxKind::LET_STMT);
        self.expect(SyntaxKind::LET_KW);

        loop {
            self.start_node(SyntaxKind::LOCAL_DECLARATOR);
            self.parse_name();
            if self.eat(SyntaxKind::COLON) {
                self.parse_type_ref();
            }
            if self.at(SyntaxKind::EQ) {
                self.parse_initializer();
            }
            self.finish_node();
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }

        self.expect(SyntaxKind::SEMICOLON);
        self.finish_node();
    }

    /// Return = 'return' Expr? ';'  |  Throw = 'throw' Expr? ';'
    fn parse_jump(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.bump();
        if !self.at(SyntaxKind::SEMICOLON) {
            self.parse_expr();
        }
        self.expect(SyntaxKind::SEMICOLON);
        self.finish_node();
    }

    /// Yield = 'yield' Expr ';'
    fn parse_yield(&mut self) {
        self.start_node(SyntaxKind::YIELD_STMT);
        self.expect(SyntaxKind::YIELD_KW);
        self.parse_expr();
        self.expect(SyntaxKind::SEMICOLON);
        self.finish_node();
    }

    /// If = 'if' '(' Expr ')' Statement ('else' Statement)?
    fn parse_if(&mut self) {
        self.start_node(SyntaxKind::IF_STMT);
        self.expect(SyntaxKind::IF_KW);
        self.parse_condition();
        self.parse_statement();

        if self.at(SyntaxKind::ELSE_KW) {
            self.start_node(SyntaxKind::ELSE_CLAUSE);
            self.bump();
            self.parse_statement();
            self.finish_node();
        }

        self.finish_node();
    }

    /// While = 'while' '(' Expr ')' Statement
    fn parse_while(&mut self) {
        self.start_node(SyntaxKind::WHILE_STMT);
        self.expect(SyntaxKind::WHILE_KW);
        self.parse_condition();
        self.parse_statement();
        self.finish_node();
    }

    fn parse_condition(&mut self) {
        self.expect(SyntaxKind::L_PAREN);
        self.parse_expr();
        self.expect(SyntaxKind::R_PAREN);
    }

    /// Try = 'try' Block Catch* Finally?
    fn parse_try(&mut self) {
        self.start_node(SyntaxKind::TRY_STMT);
        self.expect(SyntaxKind::TRY_KW);
        self.parse_block();

        let mut handlers = 0;
        while self.at(SyntaxKind::CATCH_KW) {
            self.start_node(SyntaxKind::CATCH_CLAUSE);
            self.bump();
            if self.eat(SyntaxKind::L_PAREN) {
                self.parse_name();
                self.expect(SyntaxKind::R_PAREN);
            }
            self.parse_block();
            self.finish_node();
            handlers += 1;
        }
        if self.at(SyntaxKind::FINALLY_KW) {
            self.start_node(SyntaxKind::FINALLY_CLAUSE);
            self.bump();
            self.parse_block();
            self.finish_node();
            handlers += 1;
        }
        if handlers == 0 {
            self.error("expected 'catch' or 'finally'");
        }

        self.finish_node();
    }

    /// LocalFunction = Modifiers 'fn' Name Params RetType? (Block | ArrowBody ';')
    fn parse_local_function(&mut self) {
        self.start_node(SyntaxKind::LOCAL_FUNCTION_STMT);
        self.parse_modifiers();
        self.expect(SyntaxKind::FN_KW);
        self.parse_name();
        self.parse_param_list();
        if self.at(SyntaxKind::ARROW) {
            self.parse_ret_type();
        }
        if self.at(SyntaxKind::FAT_ARROW) {
            self.parse_arrow_body();
            self.expect(SyntaxKind::SEMICOLON);
        } else {
            self.parse_block();
        }
        self.finish_node();
    }

    /// ExprStmt = Expr ';'
    fn parse_expr_statement(&mut self) {
        self.start_node(SyntaxKind::EXPR_STMT);
        if self.parse_expr() {
            self.expect(SyntaxKind::SEMICOLON);
        } else {
            self.error_recover("expected statement", STATEMENT_RECOVERY);
            self.eat(SyntaxKind::SEMICOLON);
        }
        self.finish_node();
    }
}
