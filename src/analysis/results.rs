//! Results of a document analysis.

use std::time::Duration;

use bitflags::bitflags;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::base::{DocumentId, LinePositionSpan};
use crate::capabilities::EditCapabilities;
use crate::rude::RudeEditDiagnostic;
use crate::semantic::SymbolKey;
use crate::syntax::{BidirectionalMap, Language, SyntaxNode};

bitflags! {
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct ActiveStatementFlags: u8 {
        /// The statement is a call site in a caller frame.
        const NON_LEAF_FRAME = 1 << 0;
        /// Execution stopped in the middle of the statement.
        const PARTIALLY_EXECUTED = 1 << 1;
        /// The method has not been changed since it was last compiled.
        const METHOD_UP_TO_DATE = 1 << 2;
        /// The reported position is from an older version of the method.
        const STALE = 1 << 3;
    }
}

/// Instruction an active statement is executing; opaque to the analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct InstructionId {
    pub method_token: u32,
    pub method_version: u32,
    pub il_offset: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveStatement {
    pub ordinal: usize,
    pub instruction: InstructionId,
    pub span: LinePositionSpan,
    pub flags: ActiveStatementFlags,
    pub documents: Vec<DocumentId>,
}

impl ActiveStatement {
    pub fn new(ordinal: usize, span: LinePositionSpan, flags: ActiveStatementFlags) -> Self {
        Self {
            ordinal,
            instruction: InstructionId::default(),
            span,
            flags,
            documents: Vec::new(),
        }
    }

    pub fn is_non_leaf(&self) -> bool {
        self.flags.contains(ActiveStatementFlags::NON_LEAF_FRAME)
    }

    pub fn is_leaf(&self) -> bool {
        !self.is_non_leaf()
    }

    pub fn is_partially_executed(&self) -> bool {
        self.flags.contains(ActiveStatementFlags::PARTIALLY_EXECUTED)
    }

    pub fn is_stale(&self) -> bool {
        self.flags.contains(ActiveStatementFlags::STALE)
    }

    pub fn with_span(&self, span: LinePositionSpan) -> Self {
        Self {
            span,
            ..self.clone()
        }
    }
}

/// Exception handling regions enclosing an active statement, innermost first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExceptionRegions {
    pub spans: Vec<LinePositionSpan>,
    /// The last region already covers every statement nested in it.
    pub is_active_statement_covered: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticEditKind {
    Insert,
    Update,
    Delete,
    /// The whole type is replaced by a new version.
    Replace,
    Move,
}

/// New node → old node lookup handed to the emitter to preserve local state.
#[derive(Debug, Clone)]
pub struct SyntaxMap<L: Language> {
    reverse: FxHashMap<SyntaxNode<L>, SyntaxNode<L>>,
}

impl<L: Language> Default for SyntaxMap<L> {
    fn default() -> Self {
        Self {
            reverse: FxHashMap::default(),
        }
    }
}

impl<L: Language> SyntaxMap<L> {
    pub fn from_match(map: &BidirectionalMap<L>) -> Self {
        Self {
            reverse: map.reverse().clone(),
        }
    }

    /// Pair the nodes of two equivalent trees positionally.
    pub fn for_equivalent_nodes(old_roots: &[SyntaxNode<L>], new_roots: &[SyntaxNode<L>]) -> Self {
        let mut map = Self::default();
        map.add_equivalent_nodes(old_roots, new_roots);
        map
    }

    pub fn add_equivalent_nodes(&mut self, old_roots: &[SyntaxNode<L>], new_roots: &[SyntaxNode<L>]) {
        for (old_root, new_root) in old_roots.iter().zip(new_roots) {
            for (old, new) in old_root.descendants().zip(new_root.descendants()) {
                self.reverse.insert(new, old);
            }
        }
    }

    pub fn extend(&mut self, other: &SyntaxMap<L>) {
        for (new, old) in &other.reverse {
            self.reverse.insert(new.clone(), old.clone());
        }
    }

    /// Old node corresponding to `new`, if it existed before the edit.
    pub fn map(&self, new: &SyntaxNode<L>) -> Option<SyntaxNode<L>> {
        self.reverse.get(new).cloned()
    }

    pub fn len(&self) -> usize {
        self.reverse.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reverse.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct SemanticEditInfo<L: Language> {
    pub kind: SemanticEditKind,
    pub symbol: SymbolKey,
    pub syntax_map: Option<SyntaxMap<L>>,
    /// Set when an `Update` stands for the deletion of a member.
    pub deleted_symbol_container: Option<SymbolKey>,
    /// Containing partial type, for merging edits across documents.
    pub partial_type: Option<SymbolKey>,
}

impl<L: Language> SemanticEditInfo<L> {
    pub fn new(kind: SemanticEditKind, symbol: SymbolKey) -> Self {
        Self {
            kind,
            symbol,
            syntax_map: None,
            deleted_symbol_container: None,
            partial_type: None,
        }
    }

    pub fn with_syntax_map(mut self, syntax_map: Option<SyntaxMap<L>>) -> Self {
        self.syntax_map = syntax_map;
        self
    }

    pub fn with_deleted_container(mut self, container: Option<SymbolKey>) -> Self {
        self.deleted_symbol_container = container;
        self
    }

    pub fn with_partial_type(mut self, partial_type: Option<SymbolKey>) -> Self {
        self.partial_type = partial_type;
        self
    }

    pub fn is_deletion(&self) -> bool {
        self.deleted_symbol_container.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisStatus {
    Unchanged,
    Changed,
    /// The new document has syntax errors; nothing was analyzed.
    SyntaxErrors,
    /// Rude edits were found; no semantic edits are produced.
    Blocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceLineUpdate {
    pub old_line: u32,
    pub new_line: u32,
}

impl SourceLineUpdate {
    pub fn new(old_line: u32, new_line: u32) -> Self {
        Self { old_line, new_line }
    }
}

/// Line remapping of the sequence points of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencePointUpdates {
    pub file: SmolStr,
    pub line_updates: Vec<SourceLineUpdate>,
}

#[derive(Debug, Clone)]
pub struct DocumentAnalysisResults<L: Language> {
    pub document: DocumentId,
    pub status: AnalysisStatus,
    pub rude_edits: Vec<RudeEditDiagnostic>,
    /// Old active statements of the document relocated into the new
    /// version, in input order.
    pub active_statements: Vec<ActiveStatement>,
    /// Exception regions of each relocated active statement.
    pub exception_regions: Vec<ExceptionRegions>,
    pub semantic_edits: Vec<SemanticEditInfo<L>>,
    pub line_edits: Vec<SequencePointUpdates>,
    pub has_semantic_errors: bool,
    pub elapsed: Duration,
    pub required_capabilities: EditCapabilities,
}

impl<L: Language> DocumentAnalysisResults<L> {
    pub(crate) fn empty(document: DocumentId, status: AnalysisStatus) -> Self {
        Self {
            document,
            status,
            rude_edits: Vec::new(),
            active_statements: Vec::new(),
            exception_regions: Vec::new(),
            semantic_edits: Vec::new(),
            line_edits: Vec::new(),
            has_semantic_errors: false,
            elapsed: Duration::ZERO,
            required_capabilities: EditCapabilities::empty(),
        }
    }

    pub fn unchanged(
        document: DocumentId,
        active_statements: Vec<ActiveStatement>,
        exception_regions: Vec<ExceptionRegions>,
    ) -> Self {
        Self {
            active_statements,
            exception_regions,
            ..Self::empty(document, AnalysisStatus::Unchanged)
        }
    }

    pub fn syntax_errors(document: DocumentId) -> Self {
        Self::empty(document, AnalysisStatus::SyntaxErrors)
    }

    /// Rude edits found: everything but the input active statements is dropped.
    pub fn blocked(
        document: DocumentId,
        rude_edits: Vec<RudeEditDiagnostic>,
        active_statements: Vec<ActiveStatement>,
    ) -> Self {
        Self {
            rude_edits,
            active_statements,
            ..Self::empty(document, AnalysisStatus::Blocked)
        }
    }

    pub fn has_changes(&self) -> bool {
        self.status != AnalysisStatus::Unchanged
    }

    pub fn has_changes_and_errors(&self) -> bool {
        self.has_changes()
            && (self.status == AnalysisStatus::SyntaxErrors
                || self.has_semantic_errors
                || !self.rude_edits.is_empty())
    }

    pub fn has_significant_valid_changes(&self) -> bool {
        self.has_changes()
            && !self.has_changes_and_errors()
            && (!self.semantic_edits.is_empty() || !self.line_edits.is_empty())
    }
}
