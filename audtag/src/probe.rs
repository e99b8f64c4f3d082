//! Module-agnostic tag reading and writing

use crate::config::{ParseOptions, WriteOptions};
use crate::error::{AudTagError, Result};
use crate::macros::err;
use crate::picture::Picture;
use crate::tag_type::TagType;
use crate::tuple::Tuple;
use crate::util::io::{FileLike, Length, Truncate};

use std::fs::{File, OpenOptions};
use std::io::{BufReader, Read, Seek};
use std::path::Path;

/// A tag-agnostic reader
///
/// This provides a way to find the [`TagType`] of a reader, for when it isn't known ahead of time.
///
/// ## Usage
///
/// The modules in [`TagType::PROBE_ORDER`] are tried in turn, and the first to accept the file is
/// bound to the `Probe`. All reads and writes then go through that module.
///
/// ```rust
/// use audtag::config::WriteOptions;
/// use audtag::probe::Probe;
/// use audtag::tag_type::TagType;
/// use audtag::tuple::{StrField, Tuple};
/// use std::io::Cursor;
///
/// # fn main() -> audtag::error::Result<()> {
/// let mut tuple = Tuple::new();
/// tuple.set_str(StrField::Title, "Foo title");
///
/// // Nothing to find, so the file gets a new APE tag
/// let file = Cursor::new(b"MAC \x96\x0f\x00\x00".to_vec());
/// let mut probe = Probe::new(file).bind(TagType::Ape).guess_tag_type()?;
/// probe.write(&tuple, WriteOptions::new())?;
///
/// let mut probe = Probe::new(probe.into_inner()).guess_tag_type()?;
/// assert_eq!(probe.tag_type(), Some(TagType::Ape));
///
/// let mut read_back = Tuple::new();
/// probe.read(&mut read_back)?;
/// assert_eq!(read_back.get_str(StrField::Title), Some("Foo title"));
/// # Ok(()) }
/// ```
pub struct Probe<R: Read> {
	inner: R,
	options: Option<ParseOptions>,
	tag_type: Option<TagType>,
	new_tag_type: Option<TagType>,
}

impl<R: Read> Probe<R> {
	/// Create a new `Probe`
	///
	/// Before creating a `Probe`, consider wrapping it in a [`BufReader`] for better
	/// performance.
	#[must_use]
	pub const fn new(reader: R) -> Self {
		Self {
			inner: reader,
			options: None,
			tag_type: None,
			new_tag_type: None,
		}
	}

	/// Create a new `Probe` that is already bound to a [`TagType`]
	///
	/// No detection takes place, reads will fail if the file doesn't hold that type of tag.
	pub fn with_tag_type(reader: R, tag_type: TagType) -> Self {
		Self {
			inner: reader,
			options: None,
			tag_type: Some(tag_type),
			new_tag_type: None,
		}
	}

	/// Returns the bound [`TagType`]
	pub fn tag_type(&self) -> Option<TagType> {
		self.tag_type
	}

	/// Select the [`TagType`] to write when no module accepts the file
	///
	/// This only matters for writes. A tag found by [`Probe::guess_tag_type`] always takes
	/// precedence.
	///
	/// # Examples
	///
	/// ```rust
	/// use audtag::probe::Probe;
	/// use audtag::tag_type::TagType;
	///
	/// # fn main() -> audtag::error::Result<()> {
	/// # let reader = std::io::Cursor::new(vec![0; 64]);
	/// let probe = Probe::new(reader).bind(TagType::Id3v2).guess_tag_type()?;
	///
	/// // Nothing found, there is nothing to read yet
	/// assert_eq!(probe.tag_type(), None);
	/// # Ok(()) }
	/// ```
	pub fn bind(mut self, tag_type: TagType) -> Self {
		self.new_tag_type = Some(tag_type);
		self
	}

	/// Set the [`ParseOptions`] for the Probe
	#[must_use]
	pub fn options(mut self, options: ParseOptions) -> Self {
		self.options = Some(options);
		self
	}

	/// Extract the reader
	pub fn into_inner(self) -> R {
		self.inner
	}
}

impl Probe<BufReader<File>> {
	/// Opens a file for reading
	///
	/// # Errors
	///
	/// * `path` does not exist
	pub fn open<P>(path: P) -> Result<Self>
	where
		P: AsRef<Path>,
	{
		let path = path.as_ref();
		log::debug!("Probe: Opening `{}` for reading", path.display());

		Ok(Self::new(BufReader::new(File::open(path)?)))
	}
}

impl<R: Read + Seek> Probe<R> {
	/// Find the first module in [`TagType::PROBE_ORDER`] that accepts the file
	///
	/// The reader is rewound before every attempt. On success, the bound [`TagType`] is replaced.
	///
	/// # Errors
	///
	/// Only I/O errors are returned, a module rejecting the file is not an error.
	pub fn guess_tag_type(mut self) -> Result<Self> {
		for tag_type in TagType::PROBE_ORDER {
			self.inner.rewind()?;

			if tag_type.can_handle(&mut self.inner)? {
				log::debug!("Probe: Found a tag of type {tag_type:?}");
				self.tag_type = Some(tag_type);
				return Ok(self);
			}

			log::trace!("Probe: {tag_type:?} rejected the file");
		}

		log::debug!("Probe: No module accepted the file");
		Ok(self)
	}

	/// Read the tag into `tuple`
	///
	/// # Errors
	///
	/// * No [`TagType`] is bound ([`ErrorKind::UnknownFormat`](crate::error::ErrorKind::UnknownFormat))
	/// * See [`TagType::read`]
	pub fn read(&mut self, tuple: &mut Tuple) -> Result<Option<Picture>> {
		let Some(tag_type) = self.tag_type else {
			err!(UnknownFormat);
		};

		self.inner.rewind()?;
		tag_type.read(&mut self.inner, tuple, self.options.unwrap_or_default())
	}
}

impl<F: FileLike> Probe<F>
where
	AudTagError: From<<F as Truncate>::Error>,
	AudTagError: From<<F as Length>::Error>,
{
	/// Write `tuple` to the file
	///
	/// The bound [`TagType`] is used, or the one selected through [`Probe::bind`] if nothing was
	/// found.
	///
	/// # Errors
	///
	/// * No [`TagType`] is available ([`ErrorKind::UnknownFormat`](crate::error::ErrorKind::UnknownFormat))
	/// * See [`TagType::write`]
	pub fn write(&mut self, tuple: &Tuple, write_options: WriteOptions) -> Result<()> {
		let Some(tag_type) = self.tag_type.or(self.new_tag_type) else {
			err!(UnknownFormat);
		};

		log::debug!("Probe: Writing a tag of type {tag_type:?}");
		tag_type.write(&mut self.inner, tuple, write_options)
	}
}

/// Read the tag of a [`File`] into `tuple`
///
/// # Errors
///
/// See:
///
/// * [`Probe::guess_tag_type`]
/// * [`Probe::read`]
pub fn read_from(file: &mut File, tuple: &mut Tuple) -> Result<Option<Picture>> {
	Probe::new(BufReader::new(file))
		.guess_tag_type()?
		.read(tuple)
}

/// Read the tag of the file at `path` into `tuple`
///
/// # Errors
///
/// See:
///
/// * [`Probe::open`]
/// * [`Probe::read`]
pub fn read_from_path<P>(path: P, tuple: &mut Tuple) -> Result<Option<Picture>>
where
	P: AsRef<Path>,
{
	Probe::open(path)?.guess_tag_type()?.read(tuple)
}

/// Write `tuple` to a [`FileLike`]
///
/// The existing tag is updated, or a tag of `new_tag_type` is created if there is none.
///
/// # Errors
///
/// See [`Probe::write`]
pub fn write_to<F>(
	file: &mut F,
	tuple: &Tuple,
	new_tag_type: TagType,
	write_options: WriteOptions,
) -> Result<()>
where
	F: FileLike,
	AudTagError: From<<F as Truncate>::Error>,
	AudTagError: From<<F as Length>::Error>,
{
	Probe::new(file)
		.bind(new_tag_type)
		.guess_tag_type()?
		.write(tuple, write_options)
}

/// Write `tuple` to the file at `path`
///
/// Unlike [`write_to`], the new file replaces the original with a rename.
///
/// # Errors
///
/// * `path` doesn't exist
/// * See [`TagType::write_to_path`]
pub fn write_to_path<P>(
	path: P,
	tuple: &Tuple,
	new_tag_type: TagType,
	write_options: WriteOptions,
) -> Result<()>
where
	P: AsRef<Path>,
{
	let path = path.as_ref();

	let file = OpenOptions::new().read(true).open(path)?;
	let probe = Probe::new(BufReader::new(file)).guess_tag_type()?;
	let tag_type = probe.tag_type().unwrap_or(new_tag_type);
	drop(probe);

	tag_type.write_to_path(path, tuple, write_options)
}
