use thiserror::Error;

/// Failures of the parser collaborator that are not "the input stopped matching".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("grammar defines no rules")]
    EmptyGrammar,

    #[error("grammar syntax error at token {index}: unexpected '{token}'")]
    GrammarSyntax { index: usize, token: String },

    #[error("rule '{0}' is referenced but never defined")]
    UndefinedRule(String),
}
