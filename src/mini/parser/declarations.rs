//! Namespaces, types and members.

use rowan::Checkpoint;

use super::Parser;
use crate::mini::syntax_kind::SyntaxKind;

const MEMBER_RECOVERY: &[SyntaxKind] = &[
    SyntaxKind::R_BRACE,
    SyntaxKind::SEMICOLON,
    SyntaxKind::VAR_KW,
    SyntaxKind::PROP_KW,
    SyntaxKind::EVENT_KW,
    SyntaxKind::FN_KW,
    SyntaxKind::NEW_KW,
    SyntaxKind::OPERATOR_KW,
];

const OVERLOADABLE_OPERATORS: &[SyntaxKind] = &[
    SyntaxKind::PLUS,
    SyntaxKind::MINUS,
    SyntaxKind::STAR,
    SyntaxKind::SLASH,
    SyntaxKind::PERCENT,
    SyntaxKind::EQ_EQ,
    SyntaxKind::BANG_EQ,
    SyntaxKind::LT,
    SyntaxKind::GT,
    SyntaxKind::LT_EQ,
    SyntaxKind::GT_EQ,
    SyntaxKind::BANG,
];

impl Parser<'_> {
    /// NamespaceMember = Namespace | TypeDecl
    pub(super) fn parse_namespace_member(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_attributes();
        self.parse_modifiers();

        match self.current_kind() {
            SyntaxKind::NAMESPACE_KW => self.parse_namespace(checkpoint),
            SyntaxKind::CLASS_KW => self.parse_type_decl(checkpoint, SyntaxKind::CLASS_DECL),
            SyntaxKind::STRUCT_KW => self.parse_type_decl(checkpoint, SyntaxKind::STRUCT_DECL),
            SyntaxKind::INTERFACE_KW => self.parse_type_decl(checkpoint, SyntaxKind::INTERFACE_DECL),
            SyntaxKind::RECORD_KW => self.parse_type_decl(checkpoint, SyntaxKind::RECORD_DECL),
            SyntaxKind::ENUM_KW => self.parse_type_decl(checkpoint, SyntaxKind::ENUM_DECL),
            _ => self.error_recover(
                format!("expected type declaration, found {:?}", self.current_kind()),
                &[SyntaxKind::R_BRACE, SyntaxKind::NAMESPACE_KW, SyntaxKind::CLASS_KW],
            ),
        }
    }

    /// Namespace = 'namespace' QualifiedName '{' NamespaceMember* '}'
    fn parse_namespace(&mut self, checkpoint: Checkpoint) {
        self.start_node_at(checkpoint, SyntaxKind::NAMESPACE_DECL);
        self.expect(SyntaxKind::NAMESPACE_KW);

        self.start_node(SyntaxKind::NAME);
        self.expect(SyntaxKind::IDENT);
        while self.at(SyntaxKind::DOT) && self.nth(1) == SyntaxKind::IDENT {
            self.bump();
            self.bump();
        }
        self.finish_node();

        self.start_node(SyntaxKind::MEMBER_LIST);
        self.expect(SyntaxKind::L_BRACE);
        while !self.at_eof() && !self.at(SyntaxKind::R_BRACE) {
            let pos_before = self.pos;
            self.parse_namespace_member();
            if self.pos == pos_before {
                self.bump();
            }
        }
        self.expect(SyntaxKind::R_BRACE);
        self.finish_node();

        self.finish_node();
    }

    /// TypeDecl = Attributes Modifiers Keyword Name TypeParams? Params? BaseList? Where* (Members | ';')
    fn parse_type_decl(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.start_node_at(checkpoint, kind);
        self.bump(); // keyword
        self.parse_name();

        if self.at(SyntaxKind::LT) {
            self.parse_type_param_list();
        }
        if self.at(SyntaxKind::L_PAREN) && kind != SyntaxKind::ENUM_DECL && kind != SyntaxKind::INTERFACE_DECL {
            self.parse_param_list();
        }
        if self.at(SyntaxKind::COLON) {
            self.parse_base_list();
        }
        while self.at(SyntaxKind::WHERE_KW) {
            self.parse_where_clause();
        }

        if !self.eat(SyntaxKind::SEMICOLON) {
            if kind == SyntaxKind::ENUM_DECL {
                self.parse_enum_members();
            } else {
                self.parse_member_list();
            }
        }

        self.finish_node();
    }

    /// Members = '{' Member* '}'
    fn parse_member_list(&mut self) {
        self.start_node(SyntaxKind::MEMBER_LIST);
        self.expect(SyntaxKind::L_BRACE);

        while !self.at_eof() && !self.at(SyntaxKind::R_BRACE) {
            let pos_before = self.pos;
            self.parse_member();
            if self.pos == pos_before {
                self.error(format!("stuck on token: {:?}", self.current_kind()));
                self.bump();
            }
        }

        self.expect(SyntaxKind::R_BRACE);
        self.finish_node();
    }

    /// EnumMembers = '{' (EnumMember (',' EnumMember)* ','?)? '}'
    fn parse_enum_members(&mut self) {
        self.start_node(SyntaxKind::MEMBER_LIST);
        self.expect(SyntaxKind::L_BRACE);

        while !self.at_eof() && !self.at(SyntaxKind::R_BRACE) {
            let pos_before = self.pos;
            self.start_node(SyntaxKind::ENUM_MEMBER);
            self.parse_attributes();
            self.parse_name();
            if self.at(SyntaxKind::EQ) {
                self.parse_initializer();
            }
            self.finish_node();
            if !self.eat(SyntaxKind::COMMA) && !self.at(SyntaxKind::R_BRACE) {
                self.error_recover("expected ',' or '}'", &[SyntaxKind::COMMA, SyntaxKind::R_BRACE]);
                self.eat(SyntaxKind::COMMA);
            }
            if self.pos == pos_before {
                self.bump();
            }
        }

        self.expect(SyntaxKind::R_BRACE);
        self.finish_node();
    }

    /// Member = Attributes Modifiers (Field | Property | Event | Method | Ctor | Operator | TypeDecl)
    fn parse_member(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_attributes();
        self.parse_modifiers();

        match self.current_kind() {
            SyntaxKind::VAR_KW => self.parse_field(checkpoint),
            SyntaxKind::PROP_KW => self.parse_property(checkpoint),
            SyntaxKind::EVENT_KW => self.parse_event(checkpoint),
            SyntaxKind::FN_KW => self.parse_method(checkpoint),
            SyntaxKind::NEW_KW => self.parse_constructor(checkpoint),
            SyntaxKind::OPERATOR_KW => self.parse_operator(checkpoint),
            SyntaxKind::CLASS_KW => self.parse_type_decl(checkpoint, SyntaxKind::CLASS_DECL),
            SyntaxKind::STRUCT_KW => self.parse_type_decl(checkpoint, SyntaxKind::STRUCT_DECL),
            SyntaxKind::INTERFACE_KW => self.parse_type_decl(checkpoint, SyntaxKind::INTERFACE_DECL),
            SyntaxKind::RECORD_KW => self.parse_type_decl(checkpoint, SyntaxKind::RECORD_DECL),
            SyntaxKind::ENUM_KW => self.parse_type_decl(checkpoint, SyntaxKind::ENUM_DECL),
            _ => {
                self.error_recover(
                    format!("expected member declaration, found {:?}", self.current_kind()),
                    MEMBER_RECOVERY,
                );
                self.eat(SyntaxKind::SEMICOLON);
            }
        }
    }

    /// Field = 'var' VariableDeclarator (',' VariableDeclarator)* ';'
    fn parse_field(&mut self, checkpoint: Checkpoint) {
        self.start_node_at(checkpoint, SyntaxKind::FIELD_DECL);
        self.expect(SyntaxKind::VAR_KW);

        loop {
            self.start_node(SyntaxKind::VARIABLE_DECLARATOR);
            self.parse_name();
            if self.expect(SyntaxKind::COLON) {
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

    /// Property = 'prop' ExplicitInterface? Name ':' Type (Accessors Initializer? ';'? | ArrowBody ';')
    fn parse_property(&mut self, checkpoint: Checkpoint) {
        self.start_node_at(checkpoint, SyntaxKind::PROPERTY_DECL);
        self.expect(SyntaxKind::PROP_KW);
        self.parse_explicit_interface();
        self.parse_name();
        if self.expect(SyntaxKind::COLON) {
            self.parse_type_ref();
        }

        if self.at(SyntaxKind::FAT_ARROW) {
            self.parse_arrow_body();
            self.expect(SyntaxKind::SEMICOLON);
        } else {
            self.parse_accessor_list();
            if self.at(SyntaxKind::EQ) {
                self.parse_initializer();
                self.expect(SyntaxKind::SEMICOLON);
            }
        }

        self.finish_node();
    }

    /// Accessors = '{' (Modifiers ('get' | 'set') Body)* '}'
    fn parse_accessor_list(&mut self) {
        self.start_node(SyntaxKind::ACCESSOR_LIST);
        self.expect(SyntaxKind::L_BRACE);

        while !self.at_eof() && !self.at(SyntaxKind::R_BRACE) {
            let pos_before = self.pos;
            self.start_node(SyntaxKind::ACCESSOR);
            self.parse_modifiers();
            if self.at_any(&[SyntaxKind::GET_KW, SyntaxKind::SET_KW]) {
                self.bump();
                self.parse_body();
            } else {
                self.error_recover("expected 'get' or 'set'", &[SyntaxKind::R_BRACE, SyntaxKind::GET_KW, SyntaxKind::SET_KW]);
            }
            self.finish_node();
            if self.pos == pos_before {
                self.bump();
            }
        }

        self.expect(SyntaxKind::R_BRACE);
        self.finish_node();
    }

    /// Event = 'event' Name ':' Type ';'
    fn parse_event(&mut self, checkpoint: Checkpoint) {
        self.start_node_at(checkpoint, SyntaxKind::EVENT_DECL);
        self.expect(SyntaxKind::EVENT_KW);
        self.parse_name();
        if self.expect(SyntaxKind::COLON) {
            self.parse_type_ref();
        }
        self.expect(SyntaxKind::SEMICOLON);
        self.finish_node();
    }

    /// Method = 'fn' ExplicitInterface? Name TypeParams? Params RetType? Where* Body
    fn parse_method(&mut self, checkpoint: Checkpoint) {
        self.start_node_at(checkpoint, SyntaxKind::METHOD_DECL);
        self.expect(SyntaxKind::FN_KW);
        self.parse_explicit_interface();
        self.parse_name();
        if self.at(SyntaxKind::LT) {
            self.parse_type_param_list();
        }
        self.parse_param_list();
        if self.at(SyntaxKind::ARROW) {
            self.parse_ret_type();
        }
        while self.at(SyntaxKind::WHERE_KW) {
            self.parse_where_clause();
        }
        self.parse_body();
        self.finish_node();
    }

    /// Ctor = 'new' Params CtorInitializer? Body
    fn parse_constructor(&mut self, checkpoint: Checkpoint) {
        self.start_node_at(checkpoint, SyntaxKind::CTOR_DECL);
        self.expect(SyntaxKind::NEW_KW);
        self.parse_param_list();

        if self.at(SyntaxKind::COLON) {
            self.start_node(SyntaxKind::CTOR_INITIALIZER);
            self.bump();
            if self.at_any(&[SyntaxKind::THIS_KW, SyntaxKind::BASE_KW]) {
                self.bump();
            } else {
                self.error("expected 'this' or 'base'");
            }
            self.parse_arg_list();
            self.finish_node();
        }

        self.parse_body();
        self.finish_node();
    }

    /// Operator = 'operator' OverloadableOperator Params RetType? Body
    fn parse_operator(&mut self, checkpoint: Checkpoint) {
        self.start_node_at(checkpoint, SyntaxKind::OPERATOR_DECL);
        self.expect(SyntaxKind::OPERATOR_KW);
        if self.at_any(OVERLOADABLE_OPERATORS) {
            self.bump();
        } else {
            self.error("expected overloadable operator");
        }
        self.parse_param_list();
        if self.at(SyntaxKind::ARROW) {
            self.parse_ret_type();
        }
        self.parse_body();
        self.finish_node();
    }

    // =========================================================================
    // Declaration parts
    // =========================================================================

    /// Body = Block | ArrowBody ';' | ';'
    pub(super) fn parse_body(&mut self) {
        match self.current_kind() {
            SyntaxKind::L_BRACE => self.parse_block(),
            SyntaxKind::FAT_ARROW => {
                self.parse_arrow_body();
                self.expect(SyntaxKind::SEMICOLON);
            }
            SyntaxKind::SEMICOLON => self.bump(),
            _ => self.error("expected body"),
        }
    }

    /// ArrowBody = '=>' Expr
    pub(super) fn parse_arrow_body(&mut self) {
        self.start_node(SyntaxKind::ARROW_BODY);
        self.expect(SyntaxKind::FAT_ARROW);
        self.parse_expr();
        self.finish_node();
    }

    /// Initializer = '=' Expr
    pub(super) fn parse_initializer(&mut self) {
        self.start_node(SyntaxKind::INITIALIZER);
        self.expect(SyntaxKind::EQ);
        self.parse_expr();
        self.finish_node();
    }

    pub(super) fn parse_name(&mut self) {
        self.start_node(SyntaxKind::NAME);
        self.expect(SyntaxKind::IDENT);
        self.finish_node();
    }

    /// ExplicitInterface = Ident '.'
    fn parse_explicit_interface(&mut self) {
        if self.at(SyntaxKind::IDENT) && self.nth(1) == SyntaxKind::DOT {
            self.start_node(SyntaxKind::EXPLICIT_INTERFACE);
            self.start_node(SyntaxKind::TYPE_REF);
            self.bump();
            self.finish_node();
            self.expect(SyntaxKind::DOT);
            self.finish_node();
        }
    }

    /// Attributes = ('[' Attribute (',' Attribute)* ']')*
    fn parse_attributes(&mut self) {
        while self.at(SyntaxKind::L_BRACKET) {
            self.start_node(SyntaxKind::ATTRIBUTE_LIST);
            self.bump();
            loop {
                self.start_node(SyntaxKind::ATTRIBUTE);
                self.parse_name();
                if self.at(SyntaxKind::L_PAREN) {
                    self.parse_arg_list();
                }
                self.finish_node();
                if !self.eat(SyntaxKind::COMMA) {
                    break;
                }
            }
            self.expect(SyntaxKind::R_BRACKET);
            self.finish_node();
        }
    }

    pub(super) fn parse_modifiers(&mut self) {
        if !self.current_kind().is_modifier() {
            return;
        }
        self.start_node(SyntaxKind::MODIFIER_LIST);
        while self.current_kind().is_modifier() {
            self.bump();
        }
        self.finish_node();
    }

    /// TypeParams = '<' TypeParam (',' TypeParam)* '>'
    fn parse_type_param_list(&mut self) {
        self.start_node(SyntaxKind::TYPE_PARAM_LIST);
        self.expect(SyntaxKind::LT);
        loop {
            self.start_node(SyntaxKind::TYPE_PARAM);
            if self.at_any(&[SyntaxKind::IN_KW, SyntaxKind::OUT_KW]) {
                self.bump();
            }
            self.parse_name();
            self.finish_node();
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        self.expect(SyntaxKind::GT);
        self.finish_node();
    }

    /// Params = '(' (Param (',' Param)*)? ')'
    pub(super) fn parse_param_list(&mut self) {
        self.start_node(SyntaxKind::PARAM_LIST);
        self.expect(SyntaxKind::L_PAREN);
        while !self.at_eof() && !self.at(SyntaxKind::R_PAREN) {
            let pos_before = self.pos;
            self.start_node(SyntaxKind::PARAM);
            self.eat(SyntaxKind::REF_KW);
            self.parse_name();
            if self.eat(SyntaxKind::COLON) {
                self.parse_type_ref();
            }
            self.finish_node();
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
            if self.pos == pos_before {
                self.bump();
            }
        }
        self.expect(SyntaxKind::R_PAREN);
        self.finish_node();
    }

    /// RetType = '->' Type
    pub(super) fn parse_ret_type(&mut self) {
        self.start_node(SyntaxKind::RET_TYPE);
        self.expect(SyntaxKind::ARROW);
        self.parse_type_ref();
        self.finish_node();
    }

    /// BaseList = ':' Type (',' Type)*
    fn parse_base_list(&mut self) {
        self.start_node(SyntaxKind::BASE_LIST);
        self.expect(SyntaxKind::COLON);
        loop {
            self.parse_type_ref();
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        self.finish_node();
    }

    /// Where = 'where' NameRef ':' Type (',' Type)*
    fn parse_where_clause(&mut self) {
        self.start_node(SyntaxKind::WHERE_CLAUSE);
        self.expect(SyntaxKind::WHERE_KW);
        self.start_node(SyntaxKind::NAME_REF);
        self.expect(SyntaxKind::IDENT);
        self.finish_node();
        self.expect(SyntaxKind::COLON);
        loop {
            self.parse_type_ref();
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        self.finish_node();
    }

    /// Type = Ident ('.' Ident)* TypeArgs?
    pub(super) fn parse_type_ref(&mut self) {
        self.start_node(SyntaxKind::TYPE_REF);
        self.expect(SyntaxKind::IDENT);
        while self.at(SyntaxKind::DOT) && self.nth(1) == SyntaxKind::IDENT {
            self.bump();
            self.bump();
        }
        if self.at(SyntaxKind::LT) {
            self.start_node(SyntaxKind::TYPE_ARG_LIST);
            self.bump();
            loop {
                self.parse_type_ref();
                if !self.eat(SyntaxKind::COMMA) {
                    break;
                }
            }
            self.expect(SyntaxKind::GT);
            self.finish_node();
        }
        self.finish_node();
    }
}
