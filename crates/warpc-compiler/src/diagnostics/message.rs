use rowan::TextRange;

/// Diagnostic kinds ordered by priority (highest priority first).
///
/// When two diagnostics overlap, the higher-priority one suppresses the
/// lower-priority one, so a single mistake is reported once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    // Cascades through the rest of the expression
    UnclosedParen,

    // User omitted something required
    ExpectedExpression,
    ExpectedComma,
    ExpectedFunctionName,
    ExpectedArguments,

    // User wrote something that doesn't belong
    InvalidToken,
    TrailingInput,
    UnknownType,
    SelectArity,
    NestingTooDeep,

    // Valid syntax, illegal types
    UnsupportedOperator,
    SignednessMismatch,
    SelectBranchMismatch,
    NonMaskCondition,

    // Extern calls
    UnresolvedOverload,
    MissingExternalSymbol,

    // Not an error by itself
    WidenedArgument,
}

impl DiagnosticKind {
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::WidenedArgument => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Whether this kind suppresses `other` when spans overlap.
    pub fn suppresses(&self, other: &DiagnosticKind) -> bool {
        self < other
    }

    pub fn is_structural_error(&self) -> bool {
        matches!(self, Self::UnclosedParen)
    }

    pub fn is_root_cause_error(&self) -> bool {
        matches!(
            self,
            Self::ExpectedExpression
                | Self::ExpectedComma
                | Self::ExpectedFunctionName
                | Self::ExpectedArguments
        )
    }

    /// Errors raised by the type checker rather than the parser.
    pub fn is_type_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedOperator
                | Self::SignednessMismatch
                | Self::SelectBranchMismatch
                | Self::NonMaskCondition
                | Self::UnresolvedOverload
                | Self::MissingExternalSymbol
        )
    }

    /// Hint attached to every diagnostic of this kind.
    pub fn default_hint(&self) -> Option<&'static str> {
        match self {
            Self::UnknownType => Some("operands are dtype names such as `int32` or `bf16`, or `mask`"),
            Self::SignednessMismatch => {
                Some("division truncates differently for signed and unsigned operands")
            }
            Self::SelectBranchMismatch => Some("select never promotes; unify the branches first"),
            Self::SelectArity => Some("e.g., `select(int32 < int32, float32, float32)`"),
            _ => None,
        }
    }

    /// Message used when the reporter gives no detail.
    pub fn description(&self) -> &'static str {
        match self {
            Self::UnclosedParen => "missing closing `)`",

            Self::ExpectedExpression => "expected an expression",
            Self::ExpectedComma => "expected `,` between arguments",
            Self::ExpectedFunctionName => "expected function name",
            Self::ExpectedArguments => "expected `(` to start the argument list",

            Self::InvalidToken => "invalid characters",
            Self::TrailingInput => "unexpected input after expression",
            Self::UnknownType => "unknown type",
            Self::SelectArity => "`select` takes exactly three arguments",
            Self::NestingTooDeep => "expression nested too deeply",

            Self::UnsupportedOperator => "operator not supported for these operand types",
            Self::SignednessMismatch => "operands have different signedness",
            Self::SelectBranchMismatch => "select branches have different types",
            Self::NonMaskCondition => "select condition must be a mask",

            Self::UnresolvedOverload => "no matching overload",
            Self::MissingExternalSymbol => "external symbol not found",

            Self::WidenedArgument => "argument widened to match overload",
        }
    }

    /// Message carrying caller-provided `detail`.
    ///
    /// Type errors arrive fully worded and are used as is.
    pub fn with_detail(&self, detail: &str) -> String {
        if self.is_type_error() {
            return detail.to_owned();
        }
        match self {
            Self::UnclosedParen => format!("{}; {detail}", self.description()),
            Self::UnknownType => format!("`{detail}` is not a known type"),
            Self::ExpectedFunctionName => format!("expected function name after `{detail}.`"),
            _ => format!("{}: {detail}", self.description()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub(crate) range: TextRange,
    pub(crate) message: String,
}

impl RelatedInfo {
    pub fn new(range: TextRange, message: impl Into<String>) -> Self {
        Self {
            range,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub(crate) kind: DiagnosticKind,
    /// The range shown to the user (underlined in output).
    pub(crate) range: TextRange,
    pub(crate) message: String,
    pub(crate) related: Vec<RelatedInfo>,
    pub(crate) hints: Vec<String>,
}

impl DiagnosticMessage {
    /// A diagnostic with the kind's description and default hint.
    pub(crate) fn new(kind: DiagnosticKind, range: TextRange) -> Self {
        Self {
            kind,
            range,
            message: kind.description().to_owned(),
            related: Vec::new(),
            hints: kind.default_hint().map(String::from).into_iter().collect(),
        }
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    pub fn severity(&self) -> Severity {
        self.kind.default_severity()
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity() == Severity::Warning
    }
}

impl std::fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let offsets = |r: TextRange| (u32::from(r.start()), u32::from(r.end()));

        let (start, end) = offsets(self.range);
        write!(f, "{} at {start}..{end}: {}", self.severity(), self.message)?;
        for related in &self.related {
            let (start, end) = offsets(related.range);
            write!(f, " (related: {} at {start}..{end})", related.message)?;
        }
        self.hints
            .iter()
            .try_for_each(|hint| write!(f, " (hint: {hint})"))
    }
}
