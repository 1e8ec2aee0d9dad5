use std::{fmt, sync::LazyLock};

use regex::Regex;

/// Every kind of token the lexer can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Layout.
    LineEnd,
    Space,
    Comment,
    Comma,
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    /// Placeholder handed out by the parser after a failed `require`.
    Invalid,

    // Literals and names.
    Variable,
    Bool,
    Float,
    Int,
    String,

    // Control flow.
    If,
    Else,
    While,
    For,
    Break,
    Continue,
    Exit,

    // Commands.
    Print,
    Input,
    Wait,
    Os,
    Do,

    // Files.
    ReadFile,
    WriteFile,
    AppendFile,
    CreateFile,
    RemoveFile,
    CreateDir,
    Exists,
    Copy,
    Rename,

    // Devices.
    Press,
    Hold,
    Release,
    Move,
    DMove,
    Scroll,
    Type,
    State,

    // Unary functions.
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sqrt,
    Abs,
    Ln,
    Round,
    Ceil,
    Floor,
    ToInt,
    ToFloat,
    ToStr,
    Len,

    // Pseudo-variables.
    GetX,
    GetY,
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Millis,
    Random,
    Pi,
    Euler,

    // Operators.
    Plus,
    Minus,
    Multiply,
    Divide,
    FloorDivide,
    Modulo,
    Power,
    Root,
    Log,
    Increment,
    Decrement,
    BitAnd,
    BitOr,
    BitXor,
    BitNot,
    ShiftLeft,
    ShiftRight,
    And,
    Or,
    Not,
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,

    // Assignment.
    Assign,
    PlusAssign,
    MinusAssign,
    MultiplyAssign,
    DivideAssign,
    FloorDivideAssign,
    ModuloAssign,
    PowerAssign,
    RootAssign,
    LogAssign,
    BitAndAssign,
    BitOrAssign,
    BitXorAssign,
    ShiftLeftAssign,
    ShiftRightAssign,
}

/// The ordered lexer rule table.
///
/// Rules are tried top to bottom at each cursor position and the first one
/// that matches wins, so longer operators precede their prefixes and keywords
/// precede identifiers. Keywords are anchored on a word boundary.
pub const RULES: &[(&str, TokenKind)] = &[
    (r"\r\n|\n|\r", TokenKind::LineEnd),
    (r"#[^\r\n]*", TokenKind::Comment),
    (r"[ \t\f\v]+", TokenKind::Space),
    // Compound assignment, longest first.
    (r"\^\^=", TokenKind::LogAssign),
    (r"\*\*=", TokenKind::PowerAssign),
    (r"%%=", TokenKind::RootAssign),
    (r"//=", TokenKind::FloorDivideAssign),
    (r"<<=", TokenKind::ShiftLeftAssign),
    (r">>=", TokenKind::ShiftRightAssign),
    (r"\+=", TokenKind::PlusAssign),
    (r"-=", TokenKind::MinusAssign),
    (r"\*=", TokenKind::MultiplyAssign),
    (r"/=", TokenKind::DivideAssign),
    (r"%=", TokenKind::ModuloAssign),
    (r"&=", TokenKind::BitAndAssign),
    (r"\|=", TokenKind::BitOrAssign),
    (r"\^=", TokenKind::BitXorAssign),
    // Two-character operators.
    (r"\^\^", TokenKind::Log),
    (r"\*\*", TokenKind::Power),
    (r"\+\+", TokenKind::Increment),
    (r"--", TokenKind::Decrement),
    (r"%%", TokenKind::Root),
    (r"//", TokenKind::FloorDivide),
    (r"<<", TokenKind::ShiftLeft),
    (r">>", TokenKind::ShiftRight),
    (r"&&", TokenKind::And),
    (r"\|\|", TokenKind::Or),
    (r"==", TokenKind::Equal),
    (r"!=", TokenKind::NotEqual),
    (r"<=", TokenKind::LessEqual),
    (r">=", TokenKind::GreaterEqual),
    (r",", TokenKind::Comma),
    // Single-character operators.
    (r"\+", TokenKind::Plus),
    (r"-", TokenKind::Minus),
    (r"\*", TokenKind::Multiply),
    (r"/", TokenKind::Divide),
    (r"%", TokenKind::Modulo),
    (r"&", TokenKind::BitAnd),
    (r"\|", TokenKind::BitOr),
    (r"\^", TokenKind::BitXor),
    (r"~", TokenKind::BitNot),
    (r"!", TokenKind::Not),
    (r"<", TokenKind::Less),
    (r">", TokenKind::Greater),
    (r"=", TokenKind::Assign),
    // Keywords.
    (r"if\b", TokenKind::If),
    (r"else\b", TokenKind::Else),
    (r"while\b", TokenKind::While),
    (r"for\b", TokenKind::For),
    (r"break\b", TokenKind::Break),
    (r"continue\b", TokenKind::Continue),
    (r"exit\b", TokenKind::Exit),
    (r"print\b", TokenKind::Print),
    (r"input\b", TokenKind::Input),
    (r"wait\b", TokenKind::Wait),
    (r"os\b", TokenKind::Os),
    (r"do\b", TokenKind::Do),
    (r"readfile\b", TokenKind::ReadFile),
    (r"writefile\b", TokenKind::WriteFile),
    (r"appendfile\b", TokenKind::AppendFile),
    (r"createfile\b", TokenKind::CreateFile),
    (r"removefile\b", TokenKind::RemoveFile),
    (r"createdir\b", TokenKind::CreateDir),
    (r"exists\b", TokenKind::Exists),
    (r"copy\b", TokenKind::Copy),
    (r"rename\b", TokenKind::Rename),
    (r"press\b", TokenKind::Press),
    (r"hold\b", TokenKind::Hold),
    (r"release\b", TokenKind::Release),
    (r"move\b", TokenKind::Move),
    (r"dmove\b", TokenKind::DMove),
    (r"scroll\b", TokenKind::Scroll),
    (r"type\b", TokenKind::Type),
    (r"state\b", TokenKind::State),
    (r"sin\b", TokenKind::Sin),
    (r"cos\b", TokenKind::Cos),
    (r"tan\b", TokenKind::Tan),
    (r"asin\b", TokenKind::Asin),
    (r"acos\b", TokenKind::Acos),
    (r"atan\b", TokenKind::Atan),
    (r"sqrt\b", TokenKind::Sqrt),
    (r"abs\b", TokenKind::Abs),
    (r"ln\b", TokenKind::Ln),
    (r"round\b", TokenKind::Round),
    (r"ceil\b", TokenKind::Ceil),
    (r"floor\b", TokenKind::Floor),
    (r"int\b", TokenKind::ToInt),
    (r"float\b", TokenKind::ToFloat),
    (r"str\b", TokenKind::ToStr),
    (r"len\b", TokenKind::Len),
    (r"getx\b", TokenKind::GetX),
    (r"gety\b", TokenKind::GetY),
    (r"year\b", TokenKind::Year),
    (r"month\b", TokenKind::Month),
    (r"day\b", TokenKind::Day),
    (r"hour\b", TokenKind::Hour),
    (r"minute\b", TokenKind::Minute),
    (r"second\b", TokenKind::Second),
    (r"millis\b", TokenKind::Millis),
    (r"random\b", TokenKind::Random),
    (r"pi\b", TokenKind::Pi),
    (r"euler\b", TokenKind::Euler),
    (r"(?:true|True|TRUE|false|False|FALSE)\b", TokenKind::Bool),
    // Names and literals.
    (r"[A-Za-z_][A-Za-z0-9_]*", TokenKind::Variable),
    (r"[0-9]+\.[0-9]+", TokenKind::Float),
    (r"[0-9]+", TokenKind::Int),
    (r#""[^"]*""#, TokenKind::String),
    (r"\(", TokenKind::LeftParen),
    (r"\)", TokenKind::RightParen),
    (r"\{", TokenKind::LeftBrace),
    (r"\}", TokenKind::RightBrace),
];

/// [`RULES`] compiled once, each pattern anchored at the cursor.
pub static COMPILED_RULES: LazyLock<Vec<(Regex, TokenKind)>> = LazyLock::new(|| {
    RULES.iter()
         .filter_map(|(pattern, kind)| {
             Regex::new(&format!("^(?:{pattern})")).ok().map(|regex| (regex, *kind))
         })
         .collect()
});

impl TokenKind {
    /// Operators of the lower precedence tier: additive, logical and
    /// comparison.
    #[must_use]
    pub const fn is_expression_operator(self) -> bool {
        matches!(self,
                 Self::Plus
                 | Self::Minus
                 | Self::And
                 | Self::Or
                 | Self::Less
                 | Self::Greater
                 | Self::LessEqual
                 | Self::GreaterEqual
                 | Self::Equal
                 | Self::NotEqual)
    }

    /// Operators of the higher precedence tier: multiplicative, power, root,
    /// logarithm and bitwise.
    #[must_use]
    pub const fn is_term_operator(self) -> bool {
        matches!(self,
                 Self::Multiply
                 | Self::Divide
                 | Self::Modulo
                 | Self::Power
                 | Self::FloorDivide
                 | Self::Log
                 | Self::Root
                 | Self::BitAnd
                 | Self::BitOr
                 | Self::BitXor
                 | Self::ShiftLeft
                 | Self::ShiftRight)
    }

    #[must_use]
    pub const fn is_binary_operator(self) -> bool {
        self.is_expression_operator() || self.is_term_operator()
    }

    /// Operators whose result is always a boolean.
    #[must_use]
    pub const fn is_comparison(self) -> bool {
        matches!(self,
                 Self::And
                 | Self::Or
                 | Self::Less
                 | Self::Greater
                 | Self::LessEqual
                 | Self::GreaterEqual
                 | Self::Equal
                 | Self::NotEqual)
    }

    #[must_use]
    pub const fn is_compound_assignment(self) -> bool {
        self.compound_base().is_some()
    }

    /// The operator a compound assignment applies, such as `+` for `+=`.
    #[must_use]
    pub const fn compound_base(self) -> Option<Self> {
        let base = match self {
            Self::PlusAssign => Self::Plus,
            Self::MinusAssign => Self::Minus,
            Self::MultiplyAssign => Self::Multiply,
            Self::DivideAssign => Self::Divide,
            Self::FloorDivideAssign => Self::FloorDivide,
            Self::ModuloAssign => Self::Modulo,
            Self::PowerAssign => Self::Power,
            Self::RootAssign => Self::Root,
            Self::LogAssign => Self::Log,
            Self::BitAndAssign => Self::BitAnd,
            Self::BitOrAssign => Self::BitOr,
            Self::BitXorAssign => Self::BitXor,
            Self::ShiftLeftAssign => Self::ShiftLeft,
            Self::ShiftRightAssign => Self::ShiftRight,
            _ => return None,
        };
        Some(base)
    }

    #[must_use]
    pub const fn is_assignment(self) -> bool {
        matches!(self, Self::Assign) || self.is_compound_assignment()
    }

    /// Prefix operators and functions that may begin a factor.
    #[must_use]
    pub const fn is_unary_prefix(self) -> bool {
        matches!(self, Self::Plus | Self::Minus | Self::Not | Self::BitNot) || self.is_function()
    }

    /// Named functions applied to a single factor, such as `sin x`.
    #[must_use]
    pub const fn is_function(self) -> bool {
        matches!(self,
                 Self::Sin
                 | Self::Cos
                 | Self::Tan
                 | Self::Asin
                 | Self::Acos
                 | Self::Atan
                 | Self::Sqrt
                 | Self::Abs
                 | Self::Ln
                 | Self::Round
                 | Self::Ceil
                 | Self::Floor
                 | Self::ToInt
                 | Self::ToFloat
                 | Self::ToStr
                 | Self::Len
                 | Self::State
                 | Self::ReadFile
                 | Self::Exists)
    }

    /// Reserved names that read a value from the host, such as the cursor
    /// position or the clock.
    #[must_use]
    pub const fn is_builtin_variable(self) -> bool {
        matches!(self,
                 Self::GetX
                 | Self::GetY
                 | Self::Year
                 | Self::Month
                 | Self::Day
                 | Self::Hour
                 | Self::Minute
                 | Self::Second
                 | Self::Millis
                 | Self::Random
                 | Self::Pi
                 | Self::Euler)
    }

    #[must_use]
    pub const fn is_literal(self) -> bool {
        matches!(self, Self::Int | Self::Float | Self::String | Self::Bool)
    }

    /// Prefix commands that form a statement with a single operand.
    #[must_use]
    pub const fn is_unary_command(self) -> bool {
        matches!(self,
                 Self::Print
                 | Self::Input
                 | Self::Wait
                 | Self::Os
                 | Self::Do
                 | Self::CreateFile
                 | Self::RemoveFile
                 | Self::CreateDir)
    }

    /// Commands that take exactly two comma separated operands.
    #[must_use]
    pub const fn is_binary_command(self) -> bool {
        matches!(self,
                 Self::Type | Self::WriteFile | Self::AppendFile | Self::Copy | Self::Rename)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::LineEnd => "line end",
            Self::Space => "whitespace",
            Self::Comment => "comment",
            Self::Comma => "','",
            Self::LeftParen => "'('",
            Self::RightParen => "')'",
            Self::LeftBrace => "'{'",
            Self::RightBrace => "'}'",
            Self::Invalid => "invalid token",
            Self::Variable => "variable",
            Self::Bool => "boolean literal",
            Self::Float => "float literal",
            Self::Int => "integer literal",
            Self::String => "string literal",
            _ => return write!(f, "{self:?}"),
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_rule_compiles() {
        assert_eq!(COMPILED_RULES.len(), RULES.len());
    }

    #[test]
    fn compound_operators_precede_their_prefixes() {
        let position = |kind| RULES.iter().position(|(_, k)| *k == kind);

        assert!(position(TokenKind::LogAssign) < position(TokenKind::Log));
        assert!(position(TokenKind::Log) < position(TokenKind::BitXor));
        assert!(position(TokenKind::FloorDivideAssign) < position(TokenKind::FloorDivide));
        assert!(position(TokenKind::Increment) < position(TokenKind::Plus));
        assert!(position(TokenKind::Bool) < position(TokenKind::Variable));
    }
}
