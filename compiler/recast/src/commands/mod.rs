//! `list`, `apply` and `print`.

use std::path::Path;

use recast_ir::{SharedInterner, Span, SyntaxTree};
use recast_parse::ParseError;
use recast_refactor::{actions_at, EngineConfig, RefactorContext, RefactorError, RefactoringKind};
use recast_sema::SemanticModel;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read `{path}`: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("invalid span `{0}`: expected <start>..<end> byte offsets")]
    BadSpan(String),

    #[error("unknown refactoring `{0}` (see `recast kinds`)")]
    UnknownKind(String),

    #[error("`{kind}` is not available at {span}")]
    NotOffered { kind: RefactoringKind, span: Span },

    #[error(transparent)]
    Refactor(#[from] RefactorError),
}

/// One line of `recast list` output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Offer {
    pub kind: RefactoringKind,
    pub title: String,
}

pub fn read_source(path: &str) -> Result<String, CliError> {
    std::fs::read_to_string(Path::new(path)).map_err(|source| CliError::Read {
        path: path.to_owned(),
        source,
    })
}

/// Parse `start..end` byte offsets.
pub fn parse_span(text: &str) -> Result<Span, CliError> {
    let bad = || CliError::BadSpan(text.to_owned());
    let (start, end) = text.split_once("..").ok_or_else(bad)?;
    let start: usize = start.trim().parse().map_err(|_| bad())?;
    let end: usize = end.trim().parse().map_err(|_| bad())?;
    if end < start {
        return Err(bad());
    }
    Ok(Span::from_range(start..end))
}

pub fn parse_kind(name: &str) -> Result<RefactoringKind, CliError> {
    RefactoringKind::from_name(name).ok_or_else(|| CliError::UnknownKind(name.to_owned()))
}

fn parse(source: &str) -> Result<SyntaxTree, CliError> {
    Ok(recast_parse::parse(source, SharedInterner::new())?)
}

/// Refactorings offered at `span`.
pub fn list(source: &str, span: Span) -> Result<Vec<Offer>, CliError> {
    let tree = parse(source)?;
    let model = SemanticModel::build(&tree);
    let config = EngineConfig::default();
    let ctx = RefactorContext::new(&tree, &model, &config);
    let offers = actions_at(&ctx, span)?
        .into_iter()
        .map(|action| Offer {
            kind: action.kind(),
            title: action.title().to_owned(),
        })
        .collect();
    Ok(offers)
}

/// The whole file, rewritten by `kind` at `span`.
pub fn apply(source: &str, span: Span, kind: RefactoringKind) -> Result<String, CliError> {
    let tree = parse(source)?;
    let model = SemanticModel::build(&tree);
    let config = EngineConfig::default();
    let ctx = RefactorContext::new(&tree, &model, &config);
    let node = tree
        .covering_node(span)
        .ok_or(CliError::NotOffered { kind, span })?;
    let action = kind
        .refactoring()
        .try_get_action(&ctx, node)?
        .ok_or(CliError::NotOffered { kind, span })?;
    tracing::debug!(title = action.title(), "applying");
    let rewritten = action.apply(&tree)?;
    Ok(recast_fmt::print_tree(&rewritten))
}

/// Parse and print, normalizing layout.
pub fn print(source: &str) -> Result<String, CliError> {
    Ok(recast_fmt::print_tree(&parse(source)?))
}

#[cfg(test)]
mod tests;
