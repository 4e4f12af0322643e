//! Captured variables of closures.

use smol_str::SmolStr;

use super::SymbolKey;
use crate::syntax::{Language, SyntaxNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapturedVariableKind {
    Local,
    Parameter { ordinal: usize },
    PrimaryConstructorParameter { ordinal: usize },
}

/// A local or parameter lifted into a closure.
///
/// Two captured variables are the same iff they have the same declaring node.
#[derive(Debug, Clone)]
pub struct CapturedVariable<L: Language> {
    pub name: SmolStr,
    pub ty: SmolStr,
    pub kind: CapturedVariableKind,
    /// Parameter, catch variable or local declarator that introduces the variable.
    pub declaration: SyntaxNode<L>,
    /// Lambda or local function owning a captured parameter; `None` for
    /// locals and for parameters of the member itself.
    pub owner: Option<SyntaxNode<L>>,
}

impl<L: Language> PartialEq for CapturedVariable<L> {
    fn eq(&self, other: &Self) -> bool {
        self.declaration == other.declaration
    }
}

impl<L: Language> Eq for CapturedVariable<L> {}

impl<L: Language> CapturedVariable<L> {
    pub fn is_parameter(&self) -> bool {
        !matches!(self.kind, CapturedVariableKind::Local)
    }

    pub fn parameter_ordinal(&self) -> Option<usize> {
        match self.kind {
            CapturedVariableKind::Parameter { ordinal }
            | CapturedVariableKind::PrimaryConstructorParameter { ordinal } => Some(ordinal),
            CapturedVariableKind::Local => None,
        }
    }
}

/// Identity of a captured variable.
///
/// All receiver captures compare equal regardless of `member`.
#[derive(Debug, Clone)]
pub enum VariableCapture<L: Language> {
    This { member: Option<SymbolKey> },
    Variable(CapturedVariable<L>),
}

impl<L: Language> PartialEq for VariableCapture<L> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (VariableCapture::This { .. }, VariableCapture::This { .. }) => true,
            (VariableCapture::Variable(a), VariableCapture::Variable(b)) => a == b,
            _ => false,
        }
    }
}

impl<L: Language> Eq for VariableCapture<L> {}

impl<L: Language> VariableCapture<L> {
    pub fn name(&self) -> SmolStr {
        match self {
            VariableCapture::This { .. } => SmolStr::new_static("this"),
            VariableCapture::Variable(v) => v.name.clone(),
        }
    }

    pub fn is_this(&self) -> bool {
        matches!(self, VariableCapture::This { .. })
    }

    pub fn variable(&self) -> Option<&CapturedVariable<L>> {
        match self {
            VariableCapture::This { .. } => None,
            VariableCapture::Variable(v) => Some(v),
        }
    }
}

/// Parameter and return types of a lambda or local function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LambdaSignature {
    pub parameter_types: Vec<SmolStr>,
    pub return_type: Option<SmolStr>,
    pub is_async: bool,
}
