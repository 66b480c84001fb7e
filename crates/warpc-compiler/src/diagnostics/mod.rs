//! Diagnostics for probe expressions.
//!
//! Parse errors and type errors share one collection: a diagnostic has a
//! kind, the range it underlines, optional related ranges and hints.

mod message;
mod printer;


use rowan::{TextRange, TextSize};

pub use message::{DiagnosticKind, DiagnosticMessage, RelatedInfo, Severity};
pub use printer::DiagnosticsPrinter;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    messages: Vec<DiagnosticMessage>,
}

/// A diagnostic under construction. Nothing is recorded until `emit`.
#[must_use = "diagnostic not emitted, call .emit()"]
pub struct DiagnosticBuilder<'a> {
    diagnostics: &'a mut Diagnostics,
    message: DiagnosticMessage,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a diagnostic of `kind` underlining `range`.
    pub fn report(&mut self, kind: DiagnosticKind, range: TextRange) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            diagnostics: self,
            message: DiagnosticMessage::new(kind, range),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticMessage> {
        self.messages.iter()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.iter().filter(|d| d.severity() == severity).count()
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.iter().any(DiagnosticMessage::is_error)
    }

    pub fn has_warnings(&self) -> bool {
        self.iter().any(DiagnosticMessage::is_warning)
    }

    /// Tally line such as `2 errors, 1 warning`. Empty when there is
    /// nothing to report.
    pub fn summary(&self) -> String {
        [Severity::Error, Severity::Warning]
            .into_iter()
            .filter_map(|severity| match self.count(severity) {
                0 => None,
                1 => Some(format!("1 {severity}")),
                n => Some(format!("{n} {severity}s")),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// The diagnostics left after dropping those caused by another one.
    ///
    /// A diagnostic is dropped when a surviving diagnostic of higher
    /// priority strictly encloses it, or starts at the same offset. At the
    /// same offset a missing operand also outranks the unclosed paren it
    /// leaves behind.
    pub fn filtered(&self) -> Diagnostics {
        let mut alive = vec![true; self.messages.len()];
        for (i, cause) in self.messages.iter().enumerate() {
            if !alive[i] {
                continue;
            }
            for (j, effect) in self.messages.iter().enumerate() {
                if i != j && alive[j] && cascades(cause, effect) {
                    alive[j] = false;
                }
            }
        }

        self.messages
            .iter()
            .zip(alive)
            .filter_map(|(msg, alive)| alive.then(|| msg.clone()))
            .collect()
    }

    /// Move every range `by` bytes to the right, for text embedded in a
    /// larger source.
    pub fn shifted(mut self, by: usize) -> Self {
        let by = TextSize::from(by as u32);
        for msg in &mut self.messages {
            msg.range = msg.range + by;
            for related in &mut msg.related {
                related.range = related.range + by;
            }
        }
        self
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.messages.extend(other.messages);
    }

    pub fn printer(&self) -> DiagnosticsPrinter<'_, '_> {
        DiagnosticsPrinter::new(self)
    }
}

/// Whether `effect` is a follow-on of `cause` and should not be shown.
fn cascades(cause: &DiagnosticMessage, effect: &DiagnosticMessage) -> bool {
    let (outer, inner) = (cause.range, effect.range);
    if outer.start() < inner.start() && inner.end() <= outer.end() {
        return cause.kind.suppresses(&effect.kind);
    }
    if outer.start() != inner.start() {
        return false;
    }
    (cause.kind.is_root_cause_error() && effect.kind.is_structural_error())
        || cause.kind.suppresses(&effect.kind)
}

impl FromIterator<DiagnosticMessage> for Diagnostics {
    fn from_iter<T: IntoIterator<Item = DiagnosticMessage>>(iter: T) -> Self {
        Self {
            messages: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a DiagnosticMessage;
    type IntoIter = std::slice::Iter<'a, DiagnosticMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

impl std::fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.printer().format(f)
    }
}

impl DiagnosticBuilder<'_> {
    /// Replace the kind's description with one carrying `detail`.
    pub fn message(mut self, detail: impl Into<String>) -> Self {
        self.message.message = self.message.kind.with_detail(&detail.into());
        self
    }

    /// Point at a second range, e.g. the operand that caused the error.
    pub fn related_to(mut self, msg: impl Into<String>, range: TextRange) -> Self {
        self.message.related.push(RelatedInfo::new(range, msg));
        self
    }

    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.message.hints.push(hint.into());
        self
    }

    pub fn emit(self) {
        self.diagnostics.messages.push(self.message);
    }
}
