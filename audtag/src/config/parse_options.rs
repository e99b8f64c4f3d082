/// The parsing strictness mode
///
/// This can be set with [`ParseOptions::parsing_mode`].
///
/// # Examples
///
/// ```rust
/// use audtag::config::{ParseOptions, ParsingMode};
///
/// // I only want to read standard-compliant tags!
/// let parsing_options = ParseOptions::new().parsing_mode(ParsingMode::Strict);
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
#[non_exhaustive]
pub enum ParsingMode {
	/// Will eagerly error on invalid input
	///
	/// This mode will eagerly error on any non-standard input.
	///
	/// ## Examples of behavior
	///
	/// * Invalid frame ID - The parser will error and the entire tag is discarded
	/// * Compressed or encrypted frame - The parser will error and the entire tag is discarded
	Strict,
	/// Default mode, less eager to error on recoverably malformed input
	///
	/// This mode will skip any frame it can't make sense of, and keep going.
	///
	/// ## Examples of behavior
	///
	/// * Invalid frame ID - The frame is skipped and the parser moves on
	/// * Unable to decode text - The field is left unset
	#[default]
	BestAttempt,
	/// Least eager to error, may produce invalid/partial output
	///
	/// Same as [`ParsingMode::BestAttempt`], but will also accept headers that are only
	/// nearly valid, such as an ID3v2 header with a non-zero revision.
	Relaxed,
}

/// Options for reading tags
///
/// Passed to [`TagModule::read`](crate::module::TagModule::read), or set once on a
/// [`Probe`](crate::probe::Probe).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct ParseOptions {
	pub(crate) parsing_mode: ParsingMode,
	pub(crate) read_cover_art: bool,
}

impl Default for ParseOptions {
	/// [`ParsingMode::BestAttempt`], with cover art
	fn default() -> Self {
		Self::new()
	}
}

impl ParseOptions {
	/// Default parsing mode
	pub const DEFAULT_PARSING_MODE: ParsingMode = ParsingMode::BestAttempt;

	/// Same as [`ParseOptions::default`], usable in `const` contexts
	#[must_use]
	pub const fn new() -> Self {
		Self {
			parsing_mode: Self::DEFAULT_PARSING_MODE,
			read_cover_art: true,
		}
	}

	/// The parsing mode to use, see [`ParsingMode`] for details
	///
	/// # Examples
	///
	/// ```rust
	/// use audtag::config::{ParseOptions, ParsingMode};
	///
	/// // A tag editor would rather refuse a broken tag than silently drop frames on save
	/// let parsing_options = ParseOptions::new().parsing_mode(ParsingMode::Strict);
	/// ```
	pub fn parsing_mode(&mut self, parsing_mode: ParsingMode) -> Self {
		self.parsing_mode = parsing_mode;
		*self
	}

	/// Whether to decode the front cover (ID3v2 `APIC`/`PIC` frames)
	///
	/// When disabled, reads always return `None` for the picture. The frames are still carried on
	/// rewrite.
	///
	/// # Examples
	///
	/// ```rust
	/// use audtag::config::ParseOptions;
	///
	/// // A playlist scan only needs the text fields
	/// let parsing_options = ParseOptions::new().read_cover_art(false);
	/// ```
	pub fn read_cover_art(&mut self, read_cover_art: bool) -> Self {
		self.read_cover_art = read_cover_art;
		*self
	}
}
