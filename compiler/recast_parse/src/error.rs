use recast_ir::Span;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected character `{text}` at {span}")]
    UnexpectedChar { text: String, span: Span },

    #[error("expected {expected}, found {found} at {span}")]
    Expected {
        expected: &'static str,
        found: &'static str,
        span: Span,
    },

    #[error("integer literal out of range at {span}")]
    IntOutOfRange { span: Span },
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            ParseError::UnexpectedChar { span, .. }
            | ParseError::Expected { span, .. }
            | ParseError::IntOutOfRange { span } => *span,
        }
    }
}
