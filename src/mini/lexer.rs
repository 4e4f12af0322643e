//! Logos-based lexer for the mini language

use super::syntax_kind::SyntaxKind;
use logos::Logos;
use rowan::TextSize;

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: TextSize,
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
    offset: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
            offset: 0,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let offset = TextSize::new(self.offset);
        self.offset += text.len() as u32;

        let kind = match logos_token {
            Ok(t) => t.into(),
            Err(()) => SyntaxKind::ERROR,
        };

        Some(Token { kind, text, offset })
    }
}

/// Logos token enum - maps to SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    BlockComment,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    #[regex(r"[0-9]+")]
    IntNumber,

    #[regex(r#""([^"\\]|\\.)*""#)]
    String,

    // =========================================================================
    // MULTI-CHARACTER PUNCTUATION
    // =========================================================================
    #[token("==")]
    EqEq,

    #[token("!=")]
    BangEq,

    #[token("<=")]
    LtEq,

    #[token(">=")]
    GtEq,

    #[token("&&")]
    AmpAmp,

    #[token("||")]
    PipePipe,

    #[token("->")]
    Arrow,

    #[token("=>")]
    FatArrow,

    // =========================================================================
    // SINGLE-CHARACTER PUNCTUATION
    // =========================================================================
    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token(";")]
    Semicolon,

    #[token(":")]
    Colon,

    #[token(",")]
    Comma,

    #[token(".")]
    Dot,

    #[token("=")]
    Eq,

    #[token("!")]
    Bang,

    #[token("<")]
    Lt,

    #[token(">")]
    Gt,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("%")]
    Percent,

    // =========================================================================
    // DECLARATION KEYWORDS
    // =========================================================================
    #[token("namespace")]
    NamespaceKw,

    #[token("class")]
    ClassKw,

    #[token("struct")]
    StructKw,

    #[token("interface")]
    InterfaceKw,

    #[token("enum")]
    EnumKw,

    #[token("record")]
    RecordKw,

    #[token("var")]
    VarKw,

    #[token("prop")]
    PropKw,

    #[token("event")]
    EventKw,

    #[token("fn")]
    FnKw,

    #[token("new")]
    NewKw,

    #[token("operator")]
    OperatorKw,

    #[token("get")]
    GetKw,

    #[token("set")]
    SetKw,

    #[token("where")]
    WhereKw,

    #[token("in")]
    InKw,

    #[token("out")]
    OutKw,

    #[token("ref")]
    RefKw,

    // =========================================================================
    // MODIFIERS
    // =========================================================================
    #[token("public")]
    PublicKw,

    #[token("private")]
    PrivateKw,

    #[token("protected")]
    ProtectedKw,

    #[token("internal")]
    InternalKw,

    #[token("static")]
    StaticKw,

    #[token("virtual")]
    VirtualKw,

    #[token("abstract")]
    AbstractKw,

    #[token("override")]
    OverrideKw,

    #[token("sealed")]
    SealedKw,

    #[token("extern")]
    ExternKw,

    #[token("const")]
    ConstKw,

    #[token("readonly")]
    ReadonlyKw,

    #[token("volatile")]
    VolatileKw,

    #[token("async")]
    AsyncKw,

    #[token("partial")]
    PartialKw,

    // =========================================================================
    // STATEMENT AND EXPRESSION KEYWORDS
    // =========================================================================
    #[token("let")]
    LetKw,

    #[token("return")]
    ReturnKw,

    #[token("throw")]
    ThrowKw,

    #[token("if")]
    IfKw,

    #[token("else")]
    ElseKw,

    #[token("while")]
    WhileKw,

    #[token("try")]
    TryKw,

    #[token("catch")]
    CatchKw,

    #[token("finally")]
    FinallyKw,

    #[token("yield")]
    YieldKw,

    #[token("await")]
    AwaitKw,

    #[token("this")]
    ThisKw,

    #[token("base")]
    BaseKw,

    #[token("true")]
    TrueKw,

    #[token("false")]
    FalseKw,

    #[token("null")]
    NullKw,
}

impl From<LogosToken> for SyntaxKind {
    fn from(token: LogosToken) -> Self {
        use LogosToken::*;
        match token {
            // Trivia
            Whitespace => SyntaxKind::WHITESPACE,
            LineComment => SyntaxKind::LINE_COMMENT,
            BlockComment => SyntaxKind::BLOCK_COMMENT,

            // Literals
            Ident => SyntaxKind::IDENT,
            IntNumber => SyntaxKind::INT_NUMBER,
            String => SyntaxKind::STRING,

            // Punctuation
            EqEq => SyntaxKind::EQ_EQ,
            BangEq => SyntaxKind::BANG_EQ,
            LtEq => SyntaxKind::LT_EQ,
            GtEq => SyntaxKind::GT_EQ,
            AmpAmp => SyntaxKind::AMP_AMP,
            PipePipe => SyntaxKind::PIPE_PIPE,
            Arrow => SyntaxKind::ARROW,
            FatArrow => SyntaxKind::FAT_ARROW,
            LBrace => SyntaxKind::L_BRACE,
            RBrace => SyntaxKind::R_BRACE,
            LBracket => SyntaxKind::L_BRACKET,
            RBracket => SyntaxKind::R_BRACKET,
            LParen => SyntaxKind::L_PAREN,
            RParen => SyntaxKind::R_PAREN,
            Semicolon => SyntaxKind::SEMICOLON,
            Colon => SyntaxKind::COLON,
            Comma => SyntaxKind::COMMA,
            Dot => SyntaxKind::DOT,
            Eq => SyntaxKind::EQ,
            Bang => SyntaxKind::BANG,
            Lt => SyntaxKind::LT,
            Gt => SyntaxKind::GT,
            Plus => SyntaxKind::PLUS,
            Minus => SyntaxKind::MINUS,
            Star => SyntaxKind::STAR,
            Slash => SyntaxKind::SLASH,
            Percent => SyntaxKind::PERCENT,

            // Declaration keywords
            NamespaceKw => SyntaxKind::NAMESPACE_KW,
            ClassKw => SyntaxKind::CLASS_KW,
            StructKw => SyntaxKind::STRUCT_KW,
            InterfaceKw => SyntaxKind::INTERFACE_KW,
            EnumKw => SyntaxKind::ENUM_KW,
            RecordKw => SyntaxKind::RECORD_KW,
            VarKw => SyntaxKind::VAR_KW,
            PropKw => SyntaxKind::PROP_KW,
            EventKw => SyntaxKind::EVENT_KW,
            FnKw => SyntaxKind::FN_KW,
            NewKw => SyntaxKind::NEW_KW,
            OperatorKw => SyntaxKind::OPERATOR_KW,
            GetKw => SyntaxKind::GET_KW,
            SetKw => SyntaxKind::SET_KW,
            WhereKw => SyntaxKind::WHERE_KW,
            InKw => SyntaxKind::IN_KW,
            OutKw => SyntaxKind::OUT_KW,
            RefKw => SyntaxKind::REF_KW,

            // Modifiers
            PublicKw => SyntaxKind::PUBLIC_KW,
            PrivateKw => SyntaxKind::PRIVATE_KW,
            ProtectedKw => SyntaxKind::PROTECTED_KW,
            InternalKw => SyntaxKind::INTERNAL_KW,
            StaticKw => SyntaxKind::STATIC_KW,
            VirtualKw => SyntaxKind::VIRTUAL_KW,
            AbstractKw => SyntaxKind::ABSTRACT_KW,
            OverrideKw => SyntaxKind::OVERRIDE_KW,
            SealedKw => SyntaxKind::SEALED_KW,
            ExternKw => SyntaxKind::EXTERN_KW,
            ConstKw => SyntaxKind::CONST_KW,
            ReadonlyKw => SyntaxKind::READONLY_KW,
            VolatileKw => SyntaxKind::VOLATILE_KW,
            AsyncKw => SyntaxKind::ASYNC_KW,
            PartialKw => SyntaxKind::PARTIAL_KW,

            // Statements and expressions
            LetKw => SyntaxKind::LET_KW,
            ReturnKw => SyntaxKind::RETURN_KW,
            ThrowKw => SyntaxKind::THROW_KW,
            IfKw => SyntaxKind::IF_KW,
            ElseKw => SyntaxKind::ELSE_KW,
            WhileKw => SyntaxKind::WHILE_KW,
            TryKw => SyntaxKind::TRY_KW,
            CatchKw => SyntaxKind::CATCH_KW,
            FinallyKw => SyntaxKind::FINALLY_KW,
            YieldKw => SyntaxKind::YIELD_KW,
            AwaitKw => SyntaxKind::AWAIT_KW,
            ThisKw => SyntaxKind::THIS_KW,
            BaseKw => SyntaxKind::BASE_KW,
            TrueKw => SyntaxKind::TRUE_KW,
            FalseKw => SyntaxKind::FALSE_KW,
            NullKw => SyntaxKind::NULL_KW,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<SyntaxKind> {
        Lexer::new(input).map(|t| t.kind).collect()
    }

    #[test]
    fn test_lex_field() {
        let tokens: Vec<_> = Lexer::new("var x: int = 1;").collect();
        assert_eq!(tokens.len(), 11);
        assert_eq!(tokens[0].kind, SyntaxKind::VAR_KW);
        assert_eq!(tokens[2].kind, SyntaxKind::IDENT);
        assert_eq!(tokens[2].offset, TextSize::new(4));
        assert_eq!(tokens[3].kind, SyntaxKind::COLON);
        assert_eq!(tokens[10].kind, SyntaxKind::SEMICOLON);
    }

    #[test]
    fn test_lex_keyword_prefix_is_ident() {
        assert_eq!(kinds("newer"), vec![SyntaxKind::IDENT]);
        assert_eq!(kinds("new"), vec![SyntaxKind::NEW_KW]);
    }

    #[test]
    fn test_lex_arrows() {
        assert_eq!(
            kinds("-> => - ="),
            vec![
                SyntaxKind::ARROW,
                SyntaxKind::WHITESPACE,
                SyntaxKind::FAT_ARROW,
                SyntaxKind::WHITESPACE,
                SyntaxKind::MINUS,
                SyntaxKind::WHITESPACE,
                SyntaxKind::EQ,
            ]
        );
    }

    #[test]
    fn test_lex_comments() {
        assert_eq!(
            kinds("// line\n/* block **/x"),
            vec![
                SyntaxKind::LINE_COMMENT,
                SyntaxKind::WHITESPACE,
                SyntaxKind::BLOCK_COMMENT,
                SyntaxKind::IDENT,
            ]
        );
    }

    #[test]
    fn test_lex_unknown_character() {
        assert_eq!(kinds("#"), vec![SyntaxKind::ERROR]);
    }
}
