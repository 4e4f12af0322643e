//! Type layout rules.
//!
//! Value types and classes with explicit or sequential layout have their
//! field offsets fixed at load time; nothing that occupies storage may be
//! added to them or reordered within them.

use crate::base::TextRange;
use crate::rude::{RudeEditDiagnostic, RudeEditKind};
use crate::semantic::{Symbol, SymbolKind, TypeKind, TypeLayout};

pub(crate) fn has_explicit_or_sequential_layout(ty: &Symbol) -> bool {
    match ty.type_kind() {
        Some(TypeKind::Struct) => true,
        Some(TypeKind::Class | TypeKind::Record) => ty.layout != TypeLayout::Auto,
        _ => false,
    }
}

/// True if `member` takes storage in its containing type.
pub(crate) fn occupies_storage(member: &Symbol) -> bool {
    match member.kind {
        SymbolKind::Field => !member.is_static(),
        SymbolKind::Property | SymbolKind::Event => member.has_backing_field() && !member.is_static(),
        _ => false,
    }
}

/// True if adding, removing or moving `member` would change the layout of `ty`.
pub(crate) fn affects_layout(member: &Symbol, ty: &Symbol) -> bool {
    occupies_storage(member) && has_explicit_or_sequential_layout(ty)
}

/// Rude edit for inserting `member` into `ty`, if the insert changes its layout.
pub(crate) fn report_insert_layout_rude_edit(
    member: &Symbol,
    ty: &Symbol,
    span: TextRange,
    member_display: String,
) -> Option<RudeEditDiagnostic> {
    if !affects_layout(member, ty) {
        return None;
    }

    let kind = if ty.type_kind() == Some(TypeKind::Struct) {
        RudeEditKind::InsertIntoStruct
    } else {
        RudeEditKind::InsertIntoClassWithLayout
    };
    Some(RudeEditDiagnostic::with_arguments(kind, span, [member_display, ty.display()]))
}
