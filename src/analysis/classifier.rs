//! Symbol-level classification of edits.
//!
//! Compares the shape of two versions of a symbol and decides, for inserts
//! and deletes, whether the runtime can represent the change. Decisions that
//! depend on the attached runtime go through [`AnalysisContext::grant`].

use smol_str::SmolStr;

use super::context::AnalysisContext;
use super::layout::{affects_layout, report_insert_layout_rude_edit};
use crate::base::TextRange;
use crate::capabilities::EditCapabilities;
use crate::language::LanguageAdapter;
use crate::rude::{RudeEditDiagnostic, RudeEditKind};
use crate::semantic::{
    ASYNC_STATE_MACHINE_ATTRIBUTE, ITERATOR_STATE_MACHINE_ATTRIBUTE, MethodKind, Modifiers, Symbol,
    SymbolKind, TypeKind,
};

/// Outcome of comparing two versions of a symbol with the same key.
#[derive(Debug, Default)]
pub(crate) struct ShapeComparison {
    pub diagnostics: Vec<RudeEditDiagnostic>,
    /// Metadata of the symbol changed even though no rude edit was found.
    pub has_metadata_change: bool,
}

fn diagnostic(kind: RudeEditKind, span: TextRange, symbol: &Symbol) -> RudeEditDiagnostic {
    RudeEditDiagnostic::with_arguments(kind, span, [symbol.display()])
}

// ============================================================================
// Update
// ============================================================================

/// Compare the declarations of `old` and `new`, which share a key.
pub(crate) fn compare_symbol_shapes<A: LanguageAdapter>(
    ctx: &AnalysisContext<'_, A>,
    old: &Symbol,
    new: &Symbol,
    span: TextRange,
) -> ShapeComparison {
    let mut result = ShapeComparison::default();
    let report = |kind| diagnostic(kind, span, new);

    if old.kind != new.kind {
        let kind = if old.is_type() && new.is_type() {
            RudeEditKind::TypeKindUpdate
        } else {
            RudeEditKind::Update
        };
        result.diagnostics.push(report(kind));
        return result;
    }

    if old.accessibility != new.accessibility {
        result.diagnostics.push(report(RudeEditKind::ChangingAccessibility));
    }

    if (old.modifiers & Modifiers::DECLARATION) != (new.modifiers & Modifiers::DECLARATION) {
        result.diagnostics.push(report(RudeEditKind::ModifiersUpdate));
    }

    if old.ty != new.ty || old.parameter_types() != new.parameter_types() {
        result.diagnostics.push(report(RudeEditKind::TypeUpdate));
    }

    if old.base_type != new.base_type || old.interfaces != new.interfaces {
        result.diagnostics.push(report(RudeEditKind::BaseTypeOrInterfaceUpdate));
    }

    if old.enum_underlying_type != new.enum_underlying_type {
        result.diagnostics.push(report(RudeEditKind::EnumUnderlyingTypeUpdate));
    }

    if old.explicit_interface_implementations != new.explicit_interface_implementations {
        result.diagnostics.push(report(RudeEditKind::Update));
    }

    compare_type_parameters(old, new, span, &mut result.diagnostics);

    if old.import_data != new.import_data {
        result.diagnostics.push(report(RudeEditKind::DeclareLibraryUpdate));
    }

    if old.layout != new.layout {
        result.diagnostics.push(report(RudeEditKind::LayoutUpdate));
    }

    if new.modifiers.contains(Modifiers::CONST) && old.constant_value != new.constant_value {
        result.diagnostics.push(report(RudeEditKind::InitializerUpdate));
    }

    if !old.source_attributes().eq(new.source_attributes()) {
        result.has_metadata_change = true;
        if !ctx.grant(EditCapabilities::CHANGE_CUSTOM_ATTRIBUTES) {
            result.diagnostics.push(report(RudeEditKind::ChangingAttributesNotSupportedByRuntime));
        }
    }

    if !old.synthesized_attributes().eq(new.synthesized_attributes()) {
        result.has_metadata_change = true;
    }

    let old_names = old.parameters.iter().map(|p| &p.name);
    if !old_names.eq(new.parameters.iter().map(|p| &p.name)) {
        result.has_metadata_change = true;
        if !ctx.grant(EditCapabilities::UPDATE_PARAMETERS) {
            result.diagnostics.push(report(RudeEditKind::RenamingNotSupportedByRuntime));
        }
    }

    result
}

fn compare_type_parameters(
    old: &Symbol,
    new: &Symbol,
    span: TextRange,
    diagnostics: &mut Vec<RudeEditDiagnostic>,
) {
    if old.type_parameters.len() != new.type_parameters.len() {
        diagnostics.push(diagnostic(RudeEditKind::ChangingConstraints, span, new));
        return;
    }

    for (old_param, new_param) in old.type_parameters.iter().zip(&new.type_parameters) {
        let argument = [new_param.name.to_string()];
        if old_param.name != new_param.name {
            diagnostics.push(RudeEditDiagnostic::with_arguments(RudeEditKind::Renamed, span, argument.clone()));
        }
        if old_param.variance != new_param.variance {
            diagnostics.push(RudeEditDiagnostic::with_arguments(RudeEditKind::VarianceUpdate, span, argument.clone()));
        }
        if old_param.constraints != new_param.constraints {
            diagnostics.push(RudeEditDiagnostic::with_arguments(RudeEditKind::ChangingConstraints, span, argument));
        }
    }
}

/// Capability checks for recompiling the body of `new`.
///
/// `is_async` and `is_iterator` describe the new body.
pub(crate) fn report_body_update_rude_edits<A: LanguageAdapter>(
    ctx: &AnalysisContext<'_, A>,
    new: &Symbol,
    is_async: bool,
    is_iterator: bool,
    span: TextRange,
) -> Vec<RudeEditDiagnostic> {
    let mut diagnostics = Vec::new();

    if new.is_generic() && !ctx.grant(EditCapabilities::GENERIC_UPDATE_METHOD) {
        diagnostics.push(diagnostic(RudeEditKind::UpdatingGenericNotSupportedByRuntime, span, new));
    }

    if is_async || is_iterator {
        let mut required = EditCapabilities::ADD_INSTANCE_FIELD_TO_EXISTING_TYPE;
        if new.is_generic() {
            required |= EditCapabilities::GENERIC_ADD_FIELD_TO_EXISTING_TYPE;
        }
        if !ctx.grant(required) {
            diagnostics.push(diagnostic(
                RudeEditKind::UpdatingStateMachineMethodNotSupportedByRuntime,
                span,
                new,
            ));
        }

        let attribute = if is_async {
            ASYNC_STATE_MACHINE_ATTRIBUTE
        } else {
            ITERATOR_STATE_MACHINE_ATTRIBUTE
        };
        if !ctx.old_model.has_type(attribute) {
            diagnostics.push(RudeEditDiagnostic::with_arguments(
                RudeEditKind::UpdatingStateMachineMethodMissingAttribute,
                span,
                [new.display(), attribute.to_string()],
            ));
        }
    }

    diagnostics
}

/// Checks for an update whose symbol key changed: a rename or a signature
/// change, emitted as a delete of `old` plus an insert of `new`.
pub(crate) fn report_replaced_member_rude_edits<A: LanguageAdapter>(
    ctx: &AnalysisContext<'_, A>,
    old: &Symbol,
    new: &Symbol,
    containing_type: Option<&Symbol>,
    span: TextRange,
) -> Vec<RudeEditDiagnostic> {
    let is_rename = old.name != new.name;

    if !can_delete(old, containing_type) {
        let kind = if is_rename {
            RudeEditKind::Renamed
        } else {
            RudeEditKind::TypeUpdate
        };
        return vec![diagnostic(kind, span, old)];
    }

    let Some(required) = insert_capabilities(new) else {
        return vec![diagnostic(RudeEditKind::Update, span, new)];
    };

    if ctx.grant(required) {
        return Vec::new();
    }

    let kind = if is_rename {
        RudeEditKind::RenamingNotSupportedByRuntime
    } else {
        RudeEditKind::ChangingSignatureNotSupportedByRuntime
    };
    vec![diagnostic(kind, span, old)]
}

// ============================================================================
// Insert
// ============================================================================

/// Capabilities needed to add `symbol` to an existing type.
pub(crate) fn insert_capabilities(symbol: &Symbol) -> Option<EditCapabilities> {
    match symbol.kind {
        SymbolKind::Type(_) => Some(EditCapabilities::NEW_TYPE_DEFINITION),
        SymbolKind::Method(_) => {
            let mut required = EditCapabilities::ADD_METHOD_TO_EXISTING_TYPE;
            if symbol.is_generic() {
                required |= EditCapabilities::GENERIC_ADD_METHOD_TO_EXISTING_TYPE;
            }
            Some(required)
        }
        SymbolKind::Field => Some(field_capabilities(symbol)),
        SymbolKind::Property | SymbolKind::Event => {
            let mut required = EditCapabilities::ADD_METHOD_TO_EXISTING_TYPE;
            if symbol.has_backing_field() {
                required |= field_capabilities(symbol);
            }
            if symbol.is_generic() {
                required |= EditCapabilities::GENERIC_ADD_METHOD_TO_EXISTING_TYPE;
            }
            Some(required)
        }
        SymbolKind::Namespace
        | SymbolKind::Parameter
        | SymbolKind::TypeParameter
        | SymbolKind::Local => None,
    }
}

fn field_capabilities(symbol: &Symbol) -> EditCapabilities {
    let mut required = if symbol.is_static() {
        EditCapabilities::ADD_STATIC_FIELD_TO_EXISTING_TYPE
    } else {
        EditCapabilities::ADD_INSTANCE_FIELD_TO_EXISTING_TYPE
    };
    if symbol.is_generic() {
        required |= EditCapabilities::GENERIC_ADD_FIELD_TO_EXISTING_TYPE;
    }
    required
}

/// Checks for inserting `new` into `containing_type`, which existed before.
pub(crate) fn report_insert_rude_edits<A: LanguageAdapter>(
    ctx: &AnalysisContext<'_, A>,
    new: &Symbol,
    containing_type: Option<&Symbol>,
    span: TextRange,
) -> Vec<RudeEditDiagnostic> {
    let report = |kind| vec![diagnostic(kind, span, new)];

    if new.is_type() {
        if !ctx.grant(EditCapabilities::NEW_TYPE_DEFINITION) {
            return report(RudeEditKind::InsertNotSupportedByRuntime);
        }
        return Vec::new();
    }

    if new.is_extern() {
        return report(RudeEditKind::InsertExtern);
    }

    if new.is_virtual_like() {
        return report(RudeEditKind::InsertVirtual);
    }

    if let Some(ty) = containing_type {
        if ty.type_kind() == Some(TypeKind::Interface) && !new.is_static() {
            return report(RudeEditKind::InsertIntoInterface);
        }
        if let Some(layout) = report_insert_layout_rude_edit(new, ty, span, new.display()) {
            return vec![layout];
        }
    }

    if new.method_kind() == Some(MethodKind::Operator) {
        return report(RudeEditKind::InsertOperator);
    }

    if new.is_method_like()
        && new.is_explicit_interface_implementation()
        && !ctx.grant(EditCapabilities::ADD_EXPLICIT_INTERFACE_IMPLEMENTATION)
    {
        return report(RudeEditKind::InsertMethodWithExplicitInterfaceSpecifier);
    }

    let Some(required) = insert_capabilities(new) else {
        return report(RudeEditKind::Insert);
    };

    if ctx.grant(required) {
        return Vec::new();
    }

    let generic = EditCapabilities::GENERIC_ADD_METHOD_TO_EXISTING_TYPE
        | EditCapabilities::GENERIC_ADD_FIELD_TO_EXISTING_TYPE;
    if new.is_generic() && ctx.grant(required - generic) {
        report(RudeEditKind::InsertGenericMethod)
    } else {
        report(RudeEditKind::InsertNotSupportedByRuntime)
    }
}

// ============================================================================
// Delete
// ============================================================================

/// True if `old` may be removed; its body is then replaced by a throwing stub.
pub(crate) fn can_delete(old: &Symbol, containing_type: Option<&Symbol>) -> bool {
    if old.is_type() || old.is_virtual_like() || old.is_extern() {
        return false;
    }

    if let Some(ty) = containing_type {
        if ty.type_kind() == Some(TypeKind::Interface) {
            return false;
        }
        if affects_layout(old, ty) {
            return false;
        }
    }

    true
}

/// Checks for deleting `old` from `containing_type`.
pub(crate) fn report_delete_rude_edits(
    old: &Symbol,
    containing_type: Option<&Symbol>,
    span: TextRange,
) -> Vec<RudeEditDiagnostic> {
    if can_delete(old, containing_type) {
        Vec::new()
    } else {
        vec![diagnostic(RudeEditKind::Delete, span, old)]
    }
}

/// `ChangingConstructorVisibility` when an explicit parameterless constructor
/// replaces an implicit one, or the reverse, with different accessibility.
pub(crate) fn report_constructor_visibility(
    old: &Symbol,
    new: &Symbol,
    span: TextRange,
) -> Option<RudeEditDiagnostic> {
    (old.is_parameterless_constructor()
        && new.is_parameterless_constructor()
        && old.is_implicitly_declared() != new.is_implicitly_declared()
        && old.accessibility != new.accessibility)
        .then(|| diagnostic(RudeEditKind::ChangingConstructorVisibility, span, new))
}

/// New namespace of a symbol that moved between namespaces.
pub(crate) fn containing_namespace_changed(old: &Symbol, new: &Symbol) -> Option<SmolStr> {
    (old.containing_namespace != new.containing_namespace).then(|| new.containing_namespace.clone())
}

#[cfg(test)]
mod tests;
