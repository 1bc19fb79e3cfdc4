//! Diagnostic reporting for resolution failures
//!
//! Resolution errors carry no source positions of their own; they are
//! reported against the docblock they were raised for.

use codespan_reporting::diagnostic::{Diagnostic as CsDiagnostic, Label, LabelStyle, Severity};
use codespan_reporting::files::{Files, SimpleFiles};
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::path::PathBuf;

use crate::error::{ResolveError, TagError};

/// `E40xx` for resolution errors, `E41xx` for tag lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorCode(pub &'static str);

impl ErrorCode {
    /// The code, e.g. `E4001`.
    pub fn as_str(&self) -> &str {
        self.0
    }
}

/// A resolution failure, labelled on the docblock it was raised for.
pub struct Diagnostic {
    inner: CsDiagnostic<usize>,
    code: Option<ErrorCode>,
}

impl Diagnostic {
    /// Diagnostic of `severity` with no labels yet.
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Diagnostic {
            inner: CsDiagnostic::new(severity).with_message(message),
            code: None,
        }
    }

    /// Error-level diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Warning-level diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Attach an error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code.clone());
        self.inner = self.inner.with_code(code.0);
        self
    }

    /// Label `range` of file `file_id`, normally the whole docblock.
    pub fn with_primary_label(mut self, file_id: usize, range: Range<usize>, message: impl Into<String>) -> Self {
        self.inner.labels.push(Label::primary(file_id, range).with_message(message));
        self
    }

    /// Add a free-form note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.inner.notes.push(note.into());
        self
    }

    /// Appended to the notes with a `help: ` prefix.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.inner.notes.push(format!("help: {}", help.into()));
        self
    }

    /// Create diagnostic from a ResolveError raised for the docblock at
    /// `range` of file `file_id`
    pub fn from_resolve_error(error: &ResolveError, file_id: usize, range: Range<usize>) -> Self {
        use ResolveError::*;

        let diag = Diagnostic::error(error.to_string()).with_code(error_code(error));
        match error {
            UnsupportedNode { .. } => diag.with_primary_label(file_id, range, "unsupported type"),

            UnresolvableRelativeType { symbol } => diag
                .with_primary_label(file_id, range, format!("`{}` used here", symbol))
                .with_help("Relative types need the docblock to belong to a class-like"),

            NoParentType { .. } => diag.with_primary_label(file_id, range, "`parent` used here"),

            MissingAliasTarget { alias, .. } => diag
                .with_primary_label(file_id, range, format!("`{}` imported here", alias))
                .with_help("Declare the alias with @phpstan-type on the source class"),

            UnknownAliasSource { .. } | InvalidImportSource { .. } => {
                diag.with_primary_label(file_id, range, "invalid import source")
            }

            AliasRequiresDeclaringType { .. } => diag
                .with_primary_label(file_id, range, "alias declared here")
                .with_help("Move the alias to the docblock of a class-like"),

            GenericArityMismatch { .. } => {
                diag.with_primary_label(file_id, range, "incorrect number of type arguments")
            }

            CyclicTypeAlias { chain } => {
                let diag = diag.with_primary_label(file_id, range, "import cycle starts here");
                match chain.first() {
                    Some(first) => diag.with_note(format!("`{}` imports from itself through the chain", first)),
                    None => diag,
                }
            }

            UnknownDeclaration { .. } => diag.with_primary_label(file_id, range, "declaration not found"),
        }
    }

    /// Like [`Diagnostic::from_resolve_error`], with codes of its own for tag lookups.
    pub fn from_tag_error(error: &TagError, file_id: usize, range: Range<usize>) -> Self {
        match error {
            TagError::Resolve(inner) => Self::from_resolve_error(inner, file_id, range),
            TagError::TagNotFound { .. } => Diagnostic::error(error.to_string())
                .with_code(ErrorCode("E4101"))
                .with_primary_label(file_id, range, "in this docblock"),
            TagError::MultipleTagsFound { .. } => Diagnostic::error(error.to_string())
                .with_code(ErrorCode("E4102"))
                .with_primary_label(file_id, range, "in this docblock")
                .with_help("Keep a single tag of this kind"),
        }
    }

    /// Render to stderr.
    pub fn emit(&self, files: &SimpleFiles<String, String>) -> Result<(), codespan_reporting::files::Error> {
        let mut writer = StandardStream::stderr(ColorChoice::Auto);
        let config = term::Config::default();
        term::emit(&mut writer, &config, files, &self.inner)
    }

    /// The underlying codespan diagnostic.
    pub fn inner(&self) -> &CsDiagnostic<usize> {
        &self.inner
    }

    /// Error code, if one was attached.
    pub fn code(&self) -> Option<&ErrorCode> {
        self.code.as_ref()
    }

    /// Serialize as a [`JsonDiagnostic`].
    pub fn to_json(&self, files: &SimpleFiles<String, String>) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&JsonDiagnostic::from_diagnostic(self, files))
    }
}

/// Machine-readable form of a docblock [`Diagnostic`].
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonDiagnostic {
    /// `E4001` and up
    pub code: Option<String>,
    /// `error` or `warning`
    pub severity: String,
    /// Rendered error message
    pub message: String,
    /// The docblock the error was raised for, if it could be located
    pub docblock: Option<DocblockSpan>,
    /// Notes, without help suggestions
    pub notes: Vec<String>,
    /// Help suggestions
    pub help: Vec<String>,
}

/// Lines of the labelled docblock, 1-indexed and inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocblockSpan {
    /// File name as registered in the file table
    pub file: String,
    /// First line of the docblock
    pub start_line: usize,
    /// Last line of the docblock
    pub end_line: usize,
    /// Label text
    pub label: String,
}

impl JsonDiagnostic {
    /// Flatten `diag`; the primary label becomes the docblock span.
    pub fn from_diagnostic(diag: &Diagnostic, files: &SimpleFiles<String, String>) -> Self {
        let severity = match diag.inner.severity {
            Severity::Bug | Severity::Error => "error",
            Severity::Warning | Severity::Note | Severity::Help => "warning",
        };

        let docblock = diag
            .inner
            .labels
            .iter()
            .find(|label| label.style == LabelStyle::Primary)
            .and_then(|label| {
                let file = files.get(label.file_id).ok()?;
                Some(DocblockSpan {
                    file: file.name().to_string(),
                    start_line: file.location((), label.range.start).ok()?.line_number,
                    end_line: file.location((), label.range.end).ok()?.line_number,
                    label: label.message.clone(),
                })
            });

        let (help, notes): (Vec<String>, Vec<String>) =
            diag.inner.notes.iter().cloned().partition(|note| note.starts_with("help: "));

        JsonDiagnostic {
            code: diag.code.as_ref().map(|code| code.0.to_string()),
            severity: severity.to_string(),
            message: diag.inner.message.clone(),
            docblock,
            notes,
            help: help
                .into_iter()
                .map(|note| note.trim_start_matches("help: ").to_string())
                .collect(),
        }
    }
}

/// Stable code of each resolution failure.
pub fn error_code(error: &ResolveError) -> ErrorCode {
    use ResolveError::*;

    match error {
        UnsupportedNode { .. } => ErrorCode("E4001"),
        UnresolvableRelativeType { .. } => ErrorCode("E4002"),
        NoParentType { .. } => ErrorCode("E4003"),
        MissingAliasTarget { .. } => ErrorCode("E4004"),
        UnknownAliasSource { .. } => ErrorCode("E4005"),
        InvalidImportSource { .. } => ErrorCode("E4006"),
        AliasRequiresDeclaringType { .. } => ErrorCode("E4007"),
        GenericArityMismatch { .. } => ErrorCode("E4008"),
        CyclicTypeAlias { .. } => ErrorCode("E4009"),
        UnknownDeclaration { .. } => ErrorCode("E4010"),
    }
}

/// Byte range of `comment` inside `source`, for labelling a docblock.
///
/// Falls back to the start of the file when the comment is not found.
pub fn docblock_range(source: &str, comment: &str) -> Range<usize> {
    match source.find(comment) {
        Some(start) if !comment.is_empty() => start..start + comment.len(),
        _ => 0..0,
    }
}

/// File table holding the one source file a docblock came from.
pub fn create_files(path: impl Into<PathBuf>, source: impl Into<String>) -> SimpleFiles<String, String> {
    let mut files = SimpleFiles::new();
    files.add(path.into().display().to_string(), source.into());
    files
}
