//! Rendering diagnostics as plain lines or annotated source snippets.

use std::fmt::Write;
use std::ops::Range;

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};
use rowan::TextRange;

use super::Diagnostics;
use super::message::{DiagnosticMessage, Severity};

/// Configures how a [`Diagnostics`] collection is written out.
///
/// Without a source every diagnostic prints as one line with byte offsets.
/// With a source each one becomes an annotated snippet, hints attached
/// below it.
pub struct DiagnosticsPrinter<'d, 's> {
    diagnostics: &'d Diagnostics,
    source: Option<&'s str>,
    path: Option<&'s str>,
    colored: bool,
}

impl<'d, 's> DiagnosticsPrinter<'d, 's> {
    pub fn new(diagnostics: &'d Diagnostics) -> Self {
        Self {
            diagnostics,
            source: None,
            path: None,
            colored: false,
        }
    }

    pub fn source(self, source: &'s str) -> Self {
        Self {
            source: Some(source),
            ..self
        }
    }

    /// Name shown for the source, e.g. the probe file.
    pub fn path(self, path: &'s str) -> Self {
        Self {
            path: Some(path),
            ..self
        }
    }

    pub fn colored(self, colored: bool) -> Self {
        Self { colored, ..self }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("writing to a String cannot fail");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        for (i, diag) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                w.write_char('\n')?;
            }
            match self.source {
                Some(source) => write!(w, "{}", renderer.render(&self.report(diag, source)))?,
                None => self.line(w, diag)?,
            }
        }
        Ok(())
    }

    fn line(&self, w: &mut impl Write, diag: &DiagnosticMessage) -> std::fmt::Result {
        if let Some(path) = self.path {
            write!(w, "{path}: ")?;
        }
        write!(w, "{diag}")
    }

    /// The title group for `diag`, then one help group per hint.
    fn report<'a>(&self, diag: &'a DiagnosticMessage, source: &'a str) -> Vec<Group<'a>>
    where
        's: 'a,
    {
        let primary = span(diag.range, source);

        let mut snippet = Snippet::source(source)
            .line_start(1)
            .annotation(AnnotationKind::Primary.span(primary.clone()).label(&diag.message));
        if let Some(path) = self.path {
            snippet = snippet.path(path);
        }
        let snippet = diag.related.iter().fold(snippet, |snippet, related| {
            snippet.annotation(
                AnnotationKind::Context
                    .span(span(related.range, source))
                    .label(&related.message),
            )
        });

        let title = level(diag.severity()).primary_title(&diag.message);
        let hints = diag.hints.iter().map(|hint| {
            Level::HELP.secondary_title(hint).element(
                Snippet::source(source)
                    .line_start(1)
                    .annotation(AnnotationKind::Context.span(primary.clone())),
            )
        });

        std::iter::once(title.element(snippet)).chain(hints).collect()
    }
}

fn level(severity: Severity) -> Level<'static> {
    match severity {
        Severity::Error => Level::ERROR,
        Severity::Warning => Level::WARNING,
    }
}

/// Byte span to underline. An empty range (a missing operand at end of
/// input) still gets one column, clamped to the source.
fn span(range: TextRange, source: &str) -> Range<usize> {
    let start = usize::from(range.start());
    let end = usize::from(range.end());
    if start < end {
        return start..end;
    }
    start..(start + 1).min(source.len())
}
