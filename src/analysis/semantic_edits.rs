//! Resolution of member edits into symbol-level semantic edits.

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use super::active::{ActiveStatementSlots, UpdatedMemberInfo};
use super::body_match::deleted_node_diagnostic_span;
use super::classifier::{
    compare_symbol_shapes, containing_namespace_changed, report_body_update_rude_edits,
    report_constructor_visibility, report_delete_rude_edits, report_insert_rude_edits,
    report_replaced_member_rude_edits,
};
use super::closures::report_lambda_and_closure_rude_edits;
use super::context::{AnalysisContext, Node};
use super::error::AnalysisResult;
use super::initializers::{InitializerUpdates, add_constructor_edits, defer_constructor_edit};
use super::layout::{affects_layout, has_explicit_or_sequential_layout};
use super::{SemanticEditInfo, SemanticEditKind, SyntaxMap};
use crate::base::TextRange;
use crate::capabilities::EditCapabilities;
use crate::language::LanguageAdapter;
use crate::rude::{RudeEditDiagnostic, RudeEditKind};
use crate::semantic::{CREATE_NEW_ON_METADATA_UPDATE, Modifiers, SemanticModel, Symbol, SymbolKey};
use crate::syntax::{Edit, EditKind, EditMap, Language, Match, SyntaxNode};

/// Syntax-level results the resolver works from.
pub(crate) struct SemanticInput<'x, L: Language> {
    pub top_match: &'x Match<L>,
    pub edit_map: &'x EditMap<L>,
    pub member_edits: &'x [Edit<L>],
    /// Members whose body changed, keyed by new declaration.
    pub updated_members: &'x IndexMap<SyntaxNode<L>, UpdatedMemberInfo<L>>,
    /// Unedited members that need recompilation because of trivia changes.
    pub trivia_updates: &'x [(SyntaxNode<L>, SyntaxNode<L>)],
    pub slots: &'x ActiveStatementSlots<'x>,
}

#[derive(Debug)]
pub(crate) struct SemanticAnalysis<L: Language> {
    pub edits: Vec<SemanticEditInfo<L>>,
    pub diagnostics: Vec<RudeEditDiagnostic>,
}

/// Compute the semantic edits of a document.
pub(crate) fn analyze_semantics<A: LanguageAdapter>(
    ctx: &AnalysisContext<'_, A>,
    input: &SemanticInput<'_, A::Language>,
) -> AnalysisResult<SemanticAnalysis<A::Language>> {
    let mut resolver = Resolver {
        ctx,
        input,
        edits: Vec::new(),
        diagnostics: Vec::new(),
        initializer_updates: IndexMap::new(),
        replaced_types: FxHashSet::default(),
        touched_types: IndexSet::new(),
    };

    for edit in input.member_edits {
        ctx.check_cancelled()?;
        match (edit.kind, &edit.old_node, &edit.new_node) {
            (EditKind::Update, Some(old), Some(new)) => resolver.update(old, new)?,
            (EditKind::Insert, _, Some(new)) => resolver.insert(new),
            (EditKind::Delete, Some(old), _) => resolver.delete(old),
            (EditKind::Move, Some(old), Some(new)) => resolver.moved(old, new),
            (EditKind::Reorder, Some(old), Some(new)) => resolver.reorder(old, new),
            _ => {}
        }
    }

    for (old, new) in input.trivia_updates {
        ctx.check_cancelled()?;
        resolver.trivia_update(old, new);
    }

    resolver.report_primary_constructor_captures()?;

    let Resolver {
        mut edits,
        mut diagnostics,
        initializer_updates,
        ..
    } = resolver;

    let constructor_edits =
        add_constructor_edits(ctx, input.top_match, &initializer_updates, &edits, &mut diagnostics)?;
    edits.extend(constructor_edits.into_iter().map(|edit| {
        let partial_type = partial_type_of(ctx, &edit.symbol);
        edit.with_partial_type(partial_type)
    }));

    let edits = dedup_edits(edits);
    debug!(
        "[ANALYZE] {} semantic edits, {} semantic rude edits",
        edits.len(),
        diagnostics.len()
    );

    Ok(SemanticAnalysis { edits, diagnostics })
}

/// Keep the first edit per (kind, symbol, deletion).
fn dedup_edits<L: Language>(edits: Vec<SemanticEditInfo<L>>) -> Vec<SemanticEditInfo<L>> {
    let mut seen = FxHashSet::default();
    edits
        .into_iter()
        .filter(|e| seen.insert((e.kind, e.symbol.clone(), e.is_deletion())))
        .collect()
}

/// Containing type of the edited symbol when that type is also declared in
/// other documents.
fn partial_type_of<A: LanguageAdapter>(ctx: &AnalysisContext<'_, A>, key: &SymbolKey) -> Option<SymbolKey> {
    let symbol = ctx.new_model.resolve(key).or_else(|| ctx.old_model.resolve(key))?;
    let owner = if symbol.is_type() {
        symbol
    } else {
        let type_key = symbol.containing_type.as_ref()?;
        ctx.new_model.resolve(type_key)?
    };
    owner
        .declaring_documents
        .iter()
        .any(|d| *d != ctx.document)
        .then_some(owner.key)
}

fn containing_type<L: Language>(model: &dyn SemanticModel<L>, symbol: &Symbol) -> Option<Symbol> {
    model.resolve(symbol.containing_type.as_ref()?)
}

/// The type marked for whole replacement that contains `symbol`, if any.
fn reloadable_type<L: Language>(model: &dyn SemanticModel<L>, symbol: &Symbol) -> Option<Symbol> {
    let mut current = if symbol.is_type() {
        Some(symbol.clone())
    } else {
        containing_type(model, symbol)
    };
    while let Some(ty) = current {
        if ty.has_attribute(CREATE_NEW_ON_METADATA_UPDATE) {
            return Some(ty);
        }
        current = containing_type(model, &ty);
    }
    None
}

struct Resolver<'c, 'a, 'x, A: LanguageAdapter> {
    ctx: &'c AnalysisContext<'a, A>,
    input: &'c SemanticInput<'x, A::Language>,
    edits: Vec<SemanticEditInfo<A::Language>>,
    diagnostics: Vec<RudeEditDiagnostic>,
    initializer_updates: InitializerUpdates<A::Language>,
    replaced_types: FxHashSet<SymbolKey>,
    /// Types with an updated member, checked for primary constructor captures.
    touched_types: IndexSet<SymbolKey>,
}

impl<A: LanguageAdapter> Resolver<'_, '_, '_, A> {
    fn push(&mut self, kind: SemanticEditKind, symbol: &SymbolKey, syntax_map: Option<SyntaxMap<A::Language>>) {
        trace!("[ANALYZE] semantic edit {:?} {}", kind, symbol);
        let partial_type = partial_type_of(self.ctx, symbol);
        self.edits.push(
            SemanticEditInfo::new(kind, symbol.clone())
                .with_syntax_map(syntax_map)
                .with_partial_type(partial_type),
        );
    }

    fn push_deletion(&mut self, old: &Symbol) {
        let partial_type = partial_type_of(self.ctx, &old.key);
        self.edits.push(
            SemanticEditInfo::new(SemanticEditKind::Update, old.key.clone())
                .with_deleted_container(old.containing_type.clone())
                .with_partial_type(partial_type),
        );
    }

    fn touch(&mut self, symbol: &Symbol) {
        let key = if symbol.is_type() {
            Some(symbol.key.clone())
        } else {
            symbol.containing_type.clone()
        };
        if let Some(key) = key {
            self.touched_types.insert(key);
        }
    }

    /// Replace the reloadable type containing `symbol`. Returns false if the
    /// symbol is not in such a type.
    fn try_replace(&mut self, symbol: &Symbol, span: TextRange) -> bool {
        let Some(ty) = reloadable_type(self.ctx.new_model, symbol) else {
            return false;
        };
        if self.replaced_types.insert(ty.key.clone()) {
            if self.ctx.grant(EditCapabilities::NEW_TYPE_DEFINITION) {
                self.push(SemanticEditKind::Replace, &ty.key, None);
            } else {
                self.diagnostics.push(RudeEditDiagnostic::with_arguments(
                    RudeEditKind::ChangingReloadableTypeNotSupportedByRuntime,
                    span,
                    [ty.name.to_string()],
                ));
            }
        }
        true
    }

    fn has_active_statement(&self, old_declaration: &Node<A>) -> bool {
        !self.input.slots.indices_within(old_declaration.text_range()).is_empty()
    }

    fn symbols(&self, model: &dyn SemanticModel<A::Language>, node: &Node<A>, kind: EditKind) -> Vec<Symbol> {
        let mut symbols = model.symbols_for_edit(node, kind);
        symbols.truncate(self.ctx.options.max_co_declared_symbols);
        symbols
    }

    /// Initializers and constructors running them are emitted together.
    fn is_deferred_initializer(&self, node: &Node<A>, symbol: &Symbol) -> bool {
        self.ctx.adapter.is_declaration_with_initializer(node) && !symbol.modifiers.contains(Modifiers::CONST)
    }

    fn defer(
        &mut self,
        symbol: &Symbol,
        declaration: Option<Node<A>>,
        syntax_map: Option<SyntaxMap<A::Language>>,
        is_initializer: bool,
    ) {
        let Some(type_key) = symbol.containing_type.clone() else {
            return;
        };
        trace!("[ANALYZE] deferring {} into constructors of {}", symbol.key, type_key);
        defer_constructor_edit(
            &mut self.initializer_updates,
            type_key,
            symbol.is_static(),
            declaration,
            syntax_map,
            is_initializer,
        );
    }

    // ========================================================================
    // Update
    // ========================================================================

    fn update(&mut self, old_node: &Node<A>, new_node: &Node<A>) -> AnalysisResult<()> {
        let ctx = self.ctx;
        let mut old_symbols = self.symbols(ctx.old_model, old_node, EditKind::Update);
        let mut new_symbols = self.symbols(ctx.new_model, new_node, EditKind::Update);

        // Same keys pair up first, the rest positionally.
        let mut pairs = Vec::new();
        new_symbols.retain(|new| match old_symbols.iter().position(|old| old.key == new.key) {
            Some(index) => {
                pairs.push((old_symbols.remove(index), new.clone()));
                false
            }
            None => true,
        });
        let leftover_old = old_symbols.split_off(old_symbols.len().min(new_symbols.len()));
        let leftover_new = new_symbols.split_off(old_symbols.len());
        pairs.extend(old_symbols.into_iter().zip(new_symbols));

        for (old, new) in pairs {
            ctx.check_cancelled()?;
            self.update_symbol(&old, &new, old_node, new_node)?;
        }
        for old in leftover_old {
            self.delete_symbol(&old, old_node);
        }
        for new in leftover_new {
            self.insert_symbol(&new, new_node);
        }
        Ok(())
    }

    fn update_symbol(
        &mut self,
        old: &Symbol,
        new: &Symbol,
        old_node: &Node<A>,
        new_node: &Node<A>,
    ) -> AnalysisResult<()> {
        let ctx = self.ctx;
        let adapter = ctx.adapter;
        let span = adapter.diagnostic_span(new_node, EditKind::Update);

        if self.try_replace(new, span) {
            return Ok(());
        }

        if old.key != new.key {
            self.replace_symbol(old, new, span);
            return Ok(());
        }

        let shape = compare_symbol_shapes(ctx, old, new, span);
        self.diagnostics.extend(shape.diagnostics);
        self.touch(new);

        if new.is_type() {
            if shape.has_metadata_change {
                self.push(SemanticEditKind::Update, &new.key, None);
            }
            return Ok(());
        }

        let input = self.input;
        let member = input.updated_members.get(new_node);

        if adapter.is_constructor_with_member_initializers(new_node) {
            let map = member.map(|m| SyntaxMap::from_match(&m.map));
            self.defer(new, Some(new_node.clone()), map, false);
            return Ok(());
        }

        let Some(member) = member else {
            if self.is_deferred_initializer(old_node, old) || self.is_deferred_initializer(new_node, new) {
                self.defer(new, Some(new_node.clone()), None, true);
                if !shape.has_metadata_change {
                    return Ok(());
                }
            }
            self.push(SemanticEditKind::Update, &new.key, None);
            return Ok(());
        };

        let state_machine = &member.new_body.state_machine;
        self.diagnostics.extend(report_body_update_rude_edits(
            ctx,
            new,
            state_machine.is_async,
            state_machine.is_iterator,
            span,
        ));

        let (closure_diagnostics, has_lambdas) = report_lambda_and_closure_rude_edits(ctx, member, span)?;
        self.diagnostics.extend(closure_diagnostics);

        if self.is_deferred_initializer(new_node, new) {
            let map = SyntaxMap::from_match(&member.map);
            self.defer(new, Some(new_node.clone()), Some(map), true);
            if shape.has_metadata_change {
                self.push(SemanticEditKind::Update, &new.key, None);
            }
            return Ok(());
        }

        let needs_map = member.has_active_statement
            || member.has_state_machine_suspension_point
            || state_machine.is_state_machine()
            || has_lambdas;
        let map = needs_map.then(|| SyntaxMap::from_match(&member.map));
        self.push(SemanticEditKind::Update, &new.key, map);
        Ok(())
    }

    /// An update whose key changed: a rename or signature change.
    fn replace_symbol(&mut self, old: &Symbol, new: &Symbol, span: TextRange) {
        let ctx = self.ctx;

        if new.is_type() {
            if containing_namespace_changed(old, new).is_some() {
                self.diagnostics.push(RudeEditDiagnostic::with_arguments(
                    RudeEditKind::ChangingNamespace,
                    span,
                    [new.display()],
                ));
                return;
            }
            let diagnostics = report_insert_rude_edits(ctx, new, None, span);
            if diagnostics.is_empty() {
                self.push(SemanticEditKind::Insert, &new.key, None);
            }
            self.diagnostics.extend(diagnostics);
            return;
        }

        let old_type = containing_type(ctx.old_model, old);
        let diagnostics = report_replaced_member_rude_edits(ctx, old, new, old_type.as_ref(), span);
        if !diagnostics.is_empty() {
            self.diagnostics.extend(diagnostics);
            return;
        }

        self.touch(new);
        let partial_type = partial_type_of(ctx, &old.key);
        self.edits.push(
            SemanticEditInfo::new(SemanticEditKind::Delete, old.key.clone())
                .with_deleted_container(old.containing_type.clone())
                .with_partial_type(partial_type),
        );
        self.push(SemanticEditKind::Insert, &new.key, None);
    }

    // ========================================================================
    // Insert
    // ========================================================================

    fn insert(&mut self, new_node: &Node<A>) {
        for new in self.symbols(self.ctx.new_model, new_node, EditKind::Insert) {
            self.insert_symbol(&new, new_node);
        }
    }

    fn insert_symbol(&mut self, new: &Symbol, new_node: &Node<A>) {
        let ctx = self.ctx;
        let adapter = ctx.adapter;
        let span = adapter.diagnostic_span(new_node, EditKind::Insert);

        // Members of an inserted type come with it.
        if let Some(type_key) = &new.containing_type {
            if ctx.old_model.resolve(type_key).is_none() {
                return;
            }
        }

        if let Some(old) = ctx.old_model.resolve(&new.key) {
            // Declared before: moved from another declaration or previously
            // implicit.
            if self.try_replace(new, span) {
                return;
            }
            if let Some(diagnostic) = report_constructor_visibility(&old, new, span) {
                self.diagnostics.push(diagnostic);
                return;
            }
            let shape = compare_symbol_shapes(ctx, &old, new, span);
            self.diagnostics.extend(shape.diagnostics);
            self.touch(new);
            if adapter.is_constructor_with_member_initializers(new_node) {
                self.defer(new, Some(new_node.clone()), None, false);
            } else if self.is_deferred_initializer(new_node, new) {
                self.defer(new, Some(new_node.clone()), None, true);
            } else if !new.is_type() || shape.has_metadata_change {
                self.push(SemanticEditKind::Update, &new.key, None);
            }
            return;
        }

        if !new.is_type() && self.try_replace(new, span) {
            return;
        }

        let new_type = containing_type(ctx.new_model, new);

        if new.is_constructor() && adapter.is_constructor_with_member_initializers(new_node) {
            self.defer(new, Some(new_node.clone()), None, false);
            return;
        }

        let diagnostics = report_insert_rude_edits(ctx, new, new_type.as_ref(), span);
        if !diagnostics.is_empty() {
            self.diagnostics.extend(diagnostics);
            return;
        }

        self.touch(new);
        self.push(SemanticEditKind::Insert, &new.key, None);
        if self.is_deferred_initializer(new_node, new) {
            self.defer(new, Some(new_node.clone()), None, true);
        }
    }

    // ========================================================================
    // Delete
    // ========================================================================

    fn delete(&mut self, old_node: &Node<A>) {
        for old in self.symbols(self.ctx.old_model, old_node, EditKind::Delete) {
            self.delete_symbol(&old, old_node);
        }
    }

    fn delete_symbol(&mut self, old: &Symbol, old_node: &Node<A>) {
        let ctx = self.ctx;
        let adapter = ctx.adapter;
        let span = deleted_node_diagnostic_span(adapter, self.input.top_match, old_node);

        // Members of a deleted type go with it.
        if let Some(type_key) = &old.containing_type {
            if ctx.new_model.resolve(type_key).is_none() {
                return;
            }
        }

        if let Some(new) = ctx.new_model.resolve(&old.key) {
            if self.try_replace(&new, span) {
                return;
            }
            let inserted_here = ctx
                .new_model
                .declaration_syntax(&new.key)
                .iter()
                .any(|n| self.input.edit_map.has_new_edit(n, EditKind::Insert));
            if inserted_here {
                return;
            }
            if let Some(diagnostic) = report_constructor_visibility(old, &new, span) {
                self.diagnostics.push(diagnostic);
                return;
            }
            self.touch(&new);
            if !new.is_type() {
                self.push(SemanticEditKind::Update, &new.key, None);
            }
            return;
        }

        if !old.is_type() {
            if let Some(new_type) = old.containing_type.as_ref().and_then(|k| ctx.new_model.resolve(k)) {
                if self.try_replace(&new_type, span) {
                    return;
                }
            }
        }

        let old_type = containing_type(ctx.old_model, old);
        let diagnostics = report_delete_rude_edits(old, old_type.as_ref(), span);
        if !diagnostics.is_empty() {
            self.diagnostics.extend(diagnostics);
            return;
        }

        if self.is_deferred_initializer(old_node, old) {
            self.defer(old, None, None, true);
        }
        self.push_deletion(old);
    }

    // ========================================================================
    // Move and reorder
    // ========================================================================

    fn moved(&mut self, old_node: &Node<A>, new_node: &Node<A>) {
        let ctx = self.ctx;
        let (Some(old), Some(new)) = (
            ctx.old_model.declared_symbol(old_node),
            ctx.new_model.declared_symbol(new_node),
        ) else {
            return;
        };
        if old.key == new.key {
            return;
        }

        let span = ctx.adapter.diagnostic_span(new_node, EditKind::Move);
        let kind = if containing_namespace_changed(&old, &new).is_some() {
            RudeEditKind::ChangingNamespace
        } else {
            RudeEditKind::Move
        };
        self.diagnostics
            .push(RudeEditDiagnostic::with_arguments(kind, span, [new.display()]));
    }

    fn reorder(&mut self, _old_node: &Node<A>, new_node: &Node<A>) {
        let ctx = self.ctx;
        let Some(new) = ctx.new_model.declared_symbol(new_node) else {
            return;
        };
        let Some(ty) = containing_type(ctx.new_model, &new) else {
            return;
        };
        if affects_layout(&new, &ty) {
            self.diagnostics.push(RudeEditDiagnostic::with_arguments(
                RudeEditKind::Reorder,
                ctx.adapter.diagnostic_span(new_node, EditKind::Reorder),
                [new.display()],
            ));
        }
    }

    // ========================================================================
    // Trivia and captures
    // ========================================================================

    fn trivia_update(&mut self, old_node: &Node<A>, new_node: &Node<A>) {
        let ctx = self.ctx;
        let adapter = ctx.adapter;
        let span = adapter.diagnostic_span(new_node, EditKind::Update);
        let map = || SyntaxMap::for_equivalent_nodes(&[old_node.clone()], &[new_node.clone()]);

        for new in self.symbols(ctx.new_model, new_node, EditKind::Update) {
            if self.try_replace(&new, span) {
                continue;
            }
            if adapter.is_constructor_with_member_initializers(new_node) {
                self.defer(&new, Some(new_node.clone()), Some(map()), false);
                continue;
            }
            if self.is_deferred_initializer(new_node, &new) {
                self.defer(&new, Some(new_node.clone()), Some(map()), true);
                continue;
            }

            let state_machine = adapter
                .declaration_body(new_node)
                .map(|b| b.state_machine)
                .unwrap_or_default();
            self.diagnostics.extend(report_body_update_rude_edits(
                ctx,
                &new,
                state_machine.is_async,
                state_machine.is_iterator,
                span,
            ));

            let needs_map = self.has_active_statement(old_node)
                || state_machine.is_state_machine()
                || adapter.contains_lambda(new_node);
            self.push(SemanticEditKind::Update, &new.key, needs_map.then(map));
        }
    }

    /// Primary constructor parameters are stored in fields once captured, so
    /// starting or stopping a capture changes the type's shape.
    fn report_primary_constructor_captures(&mut self) -> AnalysisResult<()> {
        let ctx = self.ctx;
        for type_key in self.touched_types.clone() {
            ctx.check_cancelled()?;
            let old_captures = ctx.old_model.primary_constructor_captures(&type_key);
            let new_captures = ctx.new_model.primary_constructor_captures(&type_key);
            if old_captures == new_captures {
                continue;
            }
            let Some(new_type) = ctx.new_model.resolve(&type_key) else {
                continue;
            };
            let span = new_type.name_span.unwrap_or_default();

            for name in new_captures.iter().filter(|n| !old_captures.contains(n)) {
                if has_explicit_or_sequential_layout(&new_type)
                    || !ctx.grant(EditCapabilities::ADD_INSTANCE_FIELD_TO_EXISTING_TYPE)
                {
                    self.diagnostics.push(RudeEditDiagnostic::with_arguments(
                        RudeEditKind::CapturingPrimaryConstructorParameter,
                        span,
                        [name.to_string()],
                    ));
                }
            }
            for name in old_captures.iter().filter(|n| !new_captures.contains(n)) {
                self.diagnostics.push(RudeEditDiagnostic::with_arguments(
                    RudeEditKind::NotCapturingPrimaryConstructorParameter,
                    span,
                    [name.to_string()],
                ));
            }
        }
        Ok(())
    }
}
