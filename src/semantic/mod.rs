//! # Semantic Data Model
//!
//! Language-neutral symbols and the [`SemanticModel`] trait through which the
//! analyzer queries a compilation.
//!
//! ## Key Types
//!
//! - [`Symbol`] - Declared symbol with the shape the classifier compares
//! - [`SymbolKey`] - Identity of a symbol across two compilations
//! - [`VariableCapture`] - A variable (or the receiver) lifted into a closure
//! - [`SemanticModel`] - Queries answered by the language front end

mod capture;
mod model;
mod symbol;

pub use capture::{CapturedVariable, CapturedVariableKind, LambdaSignature, VariableCapture};
pub use model::SemanticModel;
pub use symbol::{
    Accessibility, AttributeData, ImportData, MethodKind, Modifiers, ParameterData, RefKind,
    Symbol, SymbolKey, SymbolKind, TypeKind, TypeLayout, TypeParameterData, Variance,
};

/// Attribute that makes the runtime replace a type as a whole on update.
pub const CREATE_NEW_ON_METADATA_UPDATE: &str = "CreateNewOnMetadataUpdate";

/// Attribute controlling field layout of a type.
pub const LAYOUT_ATTRIBUTE: &str = "Layout";

/// Attribute carrying platform invoke import data.
pub const IMPORT_ATTRIBUTE: &str = "Import";

/// Types the compiler needs to mark state machine methods.
pub const ASYNC_STATE_MACHINE_ATTRIBUTE: &str = "AsyncStateMachineAttribute";
pub const ITERATOR_STATE_MACHINE_ATTRIBUTE: &str = "IteratorStateMachineAttribute";
