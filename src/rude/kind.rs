//! Rude edit taxonomy.

/// Broad class of a rude edit, used for ordering and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RudeEditCategory {
    /// Edits around an active statement; they threaten a running frame.
    ActiveStatement,
    Structural,
    Capture,
    /// Allowed by the language but not by the attached runtime.
    Capability,
    /// Analysis of the document failed.
    Fatal,
}

/// An edit that cannot be applied to a running process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RudeEditKind {
    // ------------------------------------------------------------------
    // Structural
    // ------------------------------------------------------------------
    Insert,
    Delete,
    Update,
    Move,
    Reorder,
    Renamed,
    ModifiersUpdate,
    ChangingAccessibility,
    TypeUpdate,
    TypeKindUpdate,
    BaseTypeOrInterfaceUpdate,
    EnumUnderlyingTypeUpdate,
    ChangingConstraints,
    VarianceUpdate,
    DeclareLibraryUpdate,
    LayoutUpdate,
    InsertExtern,
    InsertVirtual,
    InsertIntoInterface,
    InsertOperator,
    InsertIntoStruct,
    InsertIntoClassWithLayout,
    InsertConstructorToTypeWithInitializersWithLambdas,
    InitializerUpdate,
    ChangingConstructorVisibility,
    ChangingNamespace,
    MethodBodyAdd,
    MethodBodyDelete,
    SwitchBetweenLambdaAndLocalFunction,

    // ------------------------------------------------------------------
    // Active statements
    // ------------------------------------------------------------------
    ActiveStatementUpdate,
    ActiveStatementLambdaRemoved,
    PartiallyExecutedActiveStatementUpdate,
    PartiallyExecutedActiveStatementDelete,
    DeleteActiveStatement,
    InsertAroundActiveStatement,
    DeleteAroundActiveStatement,
    UpdateAroundActiveStatement,
    AwaitStatementUpdate,
    ChangingStateMachineShape,
    UpdatingStateMachineMethodAroundActiveStatement,

    // ------------------------------------------------------------------
    // Captures
    // ------------------------------------------------------------------
    CapturingVariable,
    NotCapturingVariable,
    DeletingCapturedVariable,
    ChangingCapturedVariableType,
    ChangingCapturedVariableScope,
    RenamingCapturedVariable,
    AccessingCapturedVariableInLambda,
    NotAccessingCapturedVariableInLambda,
    InsertLambdaWithMultiScopeCapture,
    DeleteLambdaWithMultiScopeCapture,
    ChangingLambdaParameters,
    ChangingLambdaReturnType,
    CapturingPrimaryConstructorParameter,
    NotCapturingPrimaryConstructorParameter,

    // ------------------------------------------------------------------
    // Runtime capabilities
    // ------------------------------------------------------------------
    InsertNotSupportedByRuntime,
    RenamingNotSupportedByRuntime,
    ChangingSignatureNotSupportedByRuntime,
    ChangingAttributesNotSupportedByRuntime,
    UpdatingGenericNotSupportedByRuntime,
    ChangingReloadableTypeNotSupportedByRuntime,
    UpdatingStateMachineMethodNotSupportedByRuntime,
    UpdatingStateMachineMethodMissingAttribute,
    InsertMethodWithExplicitInterfaceSpecifier,
    InsertGenericMethod,

    // ------------------------------------------------------------------
    // Fatal
    // ------------------------------------------------------------------
    InternalError,
    SourceFileTooBig,
    MemberBodyTooBig,
}

impl RudeEditKind {
    pub fn category(self) -> RudeEditCategory {
        use RudeEditKind::*;
        match self {
            ActiveStatementUpdate
            | ActiveStatementLambdaRemoved
            | PartiallyExecutedActiveStatementUpdate
            | PartiallyExecutedActiveStatementDelete
            | DeleteActiveStatement
            | InsertAroundActiveStatement
            | DeleteAroundActiveStatement
            | UpdateAroundActiveStatement
            | AwaitStatementUpdate
            | ChangingStateMachineShape
            | UpdatingStateMachineMethodAroundActiveStatement => RudeEditCategory::ActiveStatement,

            CapturingVariable
            | NotCapturingVariable
            | DeletingCapturedVariable
            | ChangingCapturedVariableType
            | ChangingCapturedVariableScope
            | RenamingCapturedVariable
            | AccessingCapturedVariableInLambda
            | NotAccessingCapturedVariableInLambda
            | InsertLambdaWithMultiScopeCapture
            | DeleteLambdaWithMultiScopeCapture
            | ChangingLambdaParameters
            | ChangingLambdaReturnType
            | CapturingPrimaryConstructorParameter
            | NotCapturingPrimaryConstructorParameter => RudeEditCategory::Capture,

            InsertNotSupportedByRuntime
            | RenamingNotSupportedByRuntime
            | ChangingSignatureNotSupportedByRuntime
            | ChangingAttributesNotSupportedByRuntime
            | UpdatingGenericNotSupportedByRuntime
            | ChangingReloadableTypeNotSupportedByRuntime
            | UpdatingStateMachineMethodNotSupportedByRuntime
            | UpdatingStateMachineMethodMissingAttribute
            | InsertMethodWithExplicitInterfaceSpecifier
            | InsertGenericMethod => RudeEditCategory::Capability,

            InternalError | SourceFileTooBig | MemberBodyTooBig => RudeEditCategory::Fatal,

            _ => RudeEditCategory::Structural,
        }
    }

    /// Message template; `{N}` is replaced by the N-th argument.
    pub fn message_template(self) -> &'static str {
        use RudeEditKind::*;
        match self {
            Insert => "Adding {0} requires restarting the application.",
            Delete => "Deleting {0} requires restarting the application.",
            Update => "Updating {0} requires restarting the application.",
            Move => "Moving {0} requires restarting the application.",
            Reorder => "Reordering {0} requires restarting the application.",
            Renamed => "Renaming {0} requires restarting the application.",
            ModifiersUpdate => "Updating the modifiers of {0} requires restarting the application.",
            ChangingAccessibility => {
                "Changing the accessibility of {0} requires restarting the application."
            }
            TypeUpdate => "Changing the type of {0} requires restarting the application.",
            TypeKindUpdate => "Changing the kind of a type requires restarting the application.",
            BaseTypeOrInterfaceUpdate => {
                "Changing the base type or interfaces of {0} requires restarting the application."
            }
            EnumUnderlyingTypeUpdate => {
                "Changing the underlying type of {0} requires restarting the application."
            }
            ChangingConstraints => {
                "Changing the constraints of {0} requires restarting the application."
            }
            VarianceUpdate => "Changing the variance of {0} requires restarting the application.",
            DeclareLibraryUpdate => {
                "Changing the import library of {0} requires restarting the application."
            }
            LayoutUpdate => "Changing the layout of {0} requires restarting the application.",
            InsertExtern => "Adding extern {0} requires restarting the application.",
            InsertVirtual => "Adding abstract or virtual {0} requires restarting the application.",
            InsertIntoInterface => {
                "Adding {0} into an interface requires restarting the application."
            }
            InsertOperator => "Adding a user-defined operator requires restarting the application.",
            InsertIntoStruct => "Adding {0} into {1} requires restarting the application.",
            InsertIntoClassWithLayout => {
                "Adding {0} into a class with explicit or sequential layout requires restarting the application."
            }
            InsertConstructorToTypeWithInitializersWithLambdas => {
                "Adding a constructor to a type with a field or property initializer that contains a lambda requires restarting the application."
            }
            InitializerUpdate => {
                "Changing the initializer of {0} requires restarting the application."
            }
            ChangingConstructorVisibility => {
                "Changing the visibility of {0} requires restarting the application."
            }
            ChangingNamespace => {
                "Changing the containing namespace of {0} requires restarting the application."
            }
            MethodBodyAdd => "Adding a body to {0} requires restarting the application.",
            MethodBodyDelete => "Removing the body of {0} requires restarting the application.",
            SwitchBetweenLambdaAndLocalFunction => {
                "Switching between a lambda and a local function requires restarting the application."
            }

            ActiveStatementUpdate => "Updating an active statement requires restarting the application.",
            ActiveStatementLambdaRemoved => {
                "Removing {0} that contains an active statement requires restarting the application."
            }
            PartiallyExecutedActiveStatementUpdate => {
                "Updating a partially executed active statement requires restarting the application."
            }
            PartiallyExecutedActiveStatementDelete => {
                "Deleting a partially executed active statement requires restarting the application."
            }
            DeleteActiveStatement => {
                "Deleting {0} that contains an active statement requires restarting the application."
            }
            InsertAroundActiveStatement => {
                "Adding {0} around an active statement requires restarting the application."
            }
            DeleteAroundActiveStatement => {
                "Deleting {0} around an active statement requires restarting the application."
            }
            UpdateAroundActiveStatement => {
                "Updating {0} around an active statement requires restarting the application."
            }
            AwaitStatementUpdate => {
                "Updating a complex statement containing an await expression requires restarting the application."
            }
            ChangingStateMachineShape => {
                "Changing the suspension points of {0} requires restarting the application."
            }
            UpdatingStateMachineMethodAroundActiveStatement => {
                "Turning a method into a state machine while it contains an active statement requires restarting the application."
            }

            CapturingVariable => "Capturing variable '{0}' requires restarting the application.",
            NotCapturingVariable => {
                "Ceasing to capture variable '{0}' requires restarting the application."
            }
            DeletingCapturedVariable => {
                "Deleting captured variable '{0}' requires restarting the application."
            }
            ChangingCapturedVariableType => {
                "Changing the type of captured variable '{0}' previously of type '{1}' requires restarting the application."
            }
            ChangingCapturedVariableScope => {
                "Changing the declaration scope of captured variable '{0}' requires restarting the application."
            }
            RenamingCapturedVariable => {
                "Renaming captured variable '{0}' to '{1}' requires restarting the application."
            }
            AccessingCapturedVariableInLambda => {
                "Accessing captured variable '{0}' that has not been accessed before in {1} requires restarting the application."
            }
            NotAccessingCapturedVariableInLambda => {
                "Ceasing to access captured variable '{0}' in {1} requires restarting the application."
            }
            InsertLambdaWithMultiScopeCapture => {
                "Adding {0} that accesses captured variables '{1}' and '{2}' declared in different scopes requires restarting the application."
            }
            DeleteLambdaWithMultiScopeCapture => {
                "Removing {0} that accessed captured variables '{1}' and '{2}' declared in different scopes requires restarting the application."
            }
            ChangingLambdaParameters => {
                "Changing the parameters of {0} requires restarting the application."
            }
            ChangingLambdaReturnType => {
                "Changing the return type of {0} requires restarting the application."
            }
            CapturingPrimaryConstructorParameter => {
                "Capturing primary constructor parameter '{0}' requires restarting the application."
            }
            NotCapturingPrimaryConstructorParameter => {
                "Ceasing to capture primary constructor parameter '{0}' requires restarting the application."
            }

            InsertNotSupportedByRuntime => {
                "Adding {0} requires restarting the application because it is not supported by the runtime."
            }
            RenamingNotSupportedByRuntime => {
                "Renaming {0} requires restarting the application because it is not supported by the runtime."
            }
            ChangingSignatureNotSupportedByRuntime => {
                "Changing the signature of {0} requires restarting the application because it is not supported by the runtime."
            }
            ChangingAttributesNotSupportedByRuntime => {
                "Changing attributes of {0} requires restarting the application because it is not supported by the runtime."
            }
            UpdatingGenericNotSupportedByRuntime => {
                "Updating {0} within generic type or method requires restarting the application because it is not supported by the runtime."
            }
            ChangingReloadableTypeNotSupportedByRuntime => {
                "Modifying the reloadable type '{0}' requires restarting the application because it is not supported by the runtime."
            }
            UpdatingStateMachineMethodNotSupportedByRuntime => {
                "Updating async or iterator {0} requires restarting the application because it is not supported by the runtime."
            }
            UpdatingStateMachineMethodMissingAttribute => {
                "Updating {0} requires restarting the application because attribute '{1}' is missing."
            }
            InsertMethodWithExplicitInterfaceSpecifier => {
                "Adding a method with an explicit interface specifier requires restarting the application because it is not supported by the runtime."
            }
            InsertGenericMethod => {
                "Adding {0} to a generic type or method requires restarting the application because it is not supported by the runtime."
            }

            InternalError => "Modifying source file '{0}' failed: {1}",
            SourceFileTooBig => {
                "Modifying source file '{0}' requires restarting the application because the file is too big."
            }
            MemberBodyTooBig => {
                "Modifying the body of {0} requires restarting the application because the body has too many statements."
            }
        }
    }

    pub fn is_active_statement_edit(self) -> bool {
        self.category() == RudeEditCategory::ActiveStatement
    }
}
