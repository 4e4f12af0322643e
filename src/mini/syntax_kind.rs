//! Syntax kinds for the mini CST
//!
//! Tokens come first, then nodes. The numeric value of a kind is also used as
//! the statement label handed to the analyzer.

/// All syntax kinds (tokens and nodes) of the mini language
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    WHITESPACE = 0,
    LINE_COMMENT,
    BLOCK_COMMENT,

    // =========================================================================
    // LITERALS
    // =========================================================================
    IDENT,  // foo
    INT_NUMBER, // 42
    STRING, // "text"

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    L_BRACE,   // {
    R_BRACE,   // }
    L_BRACKET, // [
    R_BRACKET, // ]
    L_PAREN,   // (
    R_PAREN,   // )
    SEMICOLON, // ;
    COLON,     // :
    COMMA,     // ,
    DOT,       // .
    EQ,        // =
    EQ_EQ,     // ==
    BANG_EQ,   // !=
    BANG,      // !
    LT,        // <
    GT,        // >
    LT_EQ,     // <=
    GT_EQ,     // >=
    PLUS,      // +
    MINUS,     // -
    STAR,      // *
    SLASH,     // /
    PERCENT,   // %
    AMP_AMP,   // &&
    PIPE_PIPE, // ||
    ARROW,     // ->
    FAT_ARROW, // =>

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    NAMESPACE_KW,
    CLASS_KW,
    STRUCT_KW,
    INTERFACE_KW,
    ENUM_KW,
    RECORD_KW,
    PUBLIC_KW,
    PRIVATE_KW,
    PROTECTED_KW,
    INTERNAL_KW,
    STATIC_KW,
    VIRTUAL_KW,
    ABSTRACT_KW,
    OVERRIDE_KW,
    SEALED_KW,
    EXTERN_KW,
    CONST_KW,
    READONLY_KW,
    VOLATILE_KW,
    ASYNC_KW,
    PARTIAL_KW,
    VAR_KW,
    PROP_KW,
    EVENT_KW,
    FN_KW,
    NEW_KW,
    OPERATOR_KW,
    GET_KW,
    SET_KW,
    LET_KW,
    RETURN_KW,
    THROW_KW,
    IF_KW,
    ELSE_KW,
    WHILE_KW,
    TRY_KW,
    CATCH_KW,
    FINALLY_KW,
    YIELD_KW,
    AWAIT_KW,
    THIS_KW,
    BASE_KW,
    TRUE_KW,
    FALSE_KW,
    NULL_KW,
    WHERE_KW,
    IN_KW,
    OUT_KW,
    REF_KW,

    // =========================================================================
    // DECLARATION NODES
    // =========================================================================
    SOURCE_FILE,
    NAMESPACE_DECL,
    CLASS_DECL,
    STRUCT_DECL,
    INTERFACE_DECL,
    ENUM_DECL,
    RECORD_DECL,
    MEMBER_LIST,
    ENUM_MEMBER,
    FIELD_DECL,
    VARIABLE_DECLARATOR,
    PROPERTY_DECL,
    ACCESSOR_LIST,
    ACCESSOR,
    EVENT_DECL,
    METHOD_DECL,
    CTOR_DECL,
    CTOR_INITIALIZER,
    OPERATOR_DECL,
    GLOBAL_STATEMENT,

    // =========================================================================
    // DECLARATION PARTS
    // =========================================================================
    NAME,
    EXPLICIT_INTERFACE,
    ATTRIBUTE_LIST,
    ATTRIBUTE,
    MODIFIER_LIST,
    TYPE_PARAM_LIST,
    TYPE_PARAM,
    BASE_LIST,
    WHERE_CLAUSE,
    PARAM_LIST,
    PARAM,
    RET_TYPE,
    TYPE_REF,
    TYPE_ARG_LIST,
    INITIALIZER,
    ARROW_BODY,

    // =========================================================================
    // STATEMENT NODES
    // =========================================================================
    BLOCK,
    LET_STMT,
    LOCAL_DECLARATOR,
    EXPR_STMT,
    RETURN_STMT,
    THROW_STMT,
    IF_STMT,
    ELSE_CLAUSE,
    WHILE_STMT,
    TRY_STMT,
    CATCH_CLAUSE,
    FINALLY_CLAUSE,
    YIELD_STMT,
    LOCAL_FUNCTION_STMT,
    EMPTY_STMT,

    // =========================================================================
    // EXPRESSION NODES
    // =========================================================================
    LITERAL,
    NAME_REF,
    THIS_EXPR,
    PAREN_EXPR,
    NEW_EXPR,
    LAMBDA_EXPR,
    AWAIT_EXPR,
    PREFIX_EXPR,
    BIN_EXPR,
    CALL_EXPR,
    MEMBER_EXPR,
    ARG_LIST,

    // Special
    ERROR,

    #[doc(hidden)]
    __LAST,
}

impl SyntaxKind {
    /// Check if this is a trivia token (whitespace or comment)
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::LINE_COMMENT | Self::BLOCK_COMMENT)
    }

    /// Check if this is a keyword
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (Self::NAMESPACE_KW as u16) && (self as u16) <= (Self::REF_KW as u16)
    }

    /// Keywords that may precede a declaration.
    pub fn is_modifier(self) -> bool {
        (self as u16) >= (Self::PUBLIC_KW as u16) && (self as u16) <= (Self::PARTIAL_KW as u16)
    }

    pub fn is_type_declaration(self) -> bool {
        matches!(
            self,
            Self::CLASS_DECL | Self::STRUCT_DECL | Self::INTERFACE_DECL | Self::ENUM_DECL | Self::RECORD_DECL
        )
    }

    /// Members of a type that declare a symbol.
    pub fn is_member_declaration(self) -> bool {
        matches!(
            self,
            Self::FIELD_DECL
                | Self::PROPERTY_DECL
                | Self::EVENT_DECL
                | Self::METHOD_DECL
                | Self::CTOR_DECL
                | Self::OPERATOR_DECL
                | Self::ENUM_MEMBER
        )
    }

    pub fn is_statement(self) -> bool {
        matches!(
            self,
            Self::BLOCK
                | Self::LET_STMT
                | Self::EXPR_STMT
                | Self::RETURN_STMT
                | Self::THROW_STMT
                | Self::IF_STMT
                | Self::WHILE_STMT
                | Self::TRY_STMT
                | Self::YIELD_STMT
                | Self::LOCAL_FUNCTION_STMT
                | Self::EMPTY_STMT
        )
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        assert!(raw.0 < SyntaxKind::__LAST as u16);
        // Safety: we control all syntax kinds and check bounds above
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

/// Language definition for Rowan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MiniLanguage {}

impl rowan::Language for MiniLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for convenience
pub type SyntaxNode = rowan::SyntaxNode<MiniLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<MiniLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<MiniLanguage>;
