//! The interface shared by all tag modules

use crate::config::{ParseOptions, WriteOptions};
use crate::error::{AudTagError, Result};
use crate::picture::Picture;
use crate::tag_type::TagType;
use crate::tuple::Tuple;
use crate::util::io::{FileLike, Length, Truncate};

use std::fs::File;
use std::io::{Read, Seek, Write};
use std::path::Path;

/// A tag format that can be detected, read, and written
///
/// Modules are stateless, everything they need is passed in. See [`TagType`] for a way to pick
/// a module at runtime.
pub trait TagModule {
	/// The [`TagType`] this module handles
	const TAG_TYPE: TagType;

	/// Whether `reader` holds a tag this module understands
	///
	/// The reader is expected to be positioned at the start of the file. Its position afterwards is
	/// unspecified.
	///
	/// # Errors
	///
	/// * `reader` fails to seek or read, for reasons other than being too short
	fn can_handle<R>(reader: &mut R) -> Result<bool>
	where
		R: Read + Seek;

	/// Read the tag in `reader` into `tuple`
	///
	/// Fields missing from the tag are left as they are in `tuple`. The front cover is returned, if
	/// one exists and [`ParseOptions::read_cover_art`] is set.
	///
	/// # Errors
	///
	/// * There is no tag ([`ErrorKind::FormatMismatch`](crate::error::ErrorKind::FormatMismatch))
	/// * The tag is malformed, and the parsing mode doesn't allow skipping over it
	/// * `reader` fails to seek or read
	fn read<R>(reader: &mut R, tuple: &mut Tuple, parse_options: ParseOptions) -> Result<Option<Picture>>
	where
		R: Read + Seek;

	/// Write a complete copy of `source` to `dest`, with the tag updated from `tuple`
	///
	/// `source` is never modified.
	///
	/// # Errors
	///
	/// * The module is read-only ([`ErrorKind::UnsupportedTag`](crate::error::ErrorKind::UnsupportedTag))
	/// * The new tag is too large
	/// * `source` or `dest` fail to seek, read, or write
	fn render<R, W>(
		source: &mut R,
		dest: &mut W,
		tuple: &Tuple,
		write_options: WriteOptions,
	) -> Result<()>
	where
		R: Read + Seek,
		W: Write + Seek;

	/// Update the tag in `file`
	///
	/// The new file is first rendered into a temporary file, which is synced to disk before `file`
	/// is overwritten. If rendering fails, `file` is untouched.
	///
	/// # Errors
	///
	/// * See [`TagModule::render`]
	/// * `file` fails to truncate or write
	fn write<F>(file: &mut F, tuple: &Tuple, write_options: WriteOptions) -> Result<()>
	where
		F: FileLike,
		AudTagError: From<<F as Truncate>::Error>,
		AudTagError: From<<F as Length>::Error>,
	{
		file.rewind()?;

		let mut temp_file = tempfile::tempfile()?;
		Self::render(file, &mut temp_file, tuple, write_options)?;
		temp_file.sync_all()?;

		log::debug!("Replacing the contents of the original file");

		temp_file.rewind()?;
		file.rewind()?;
		file.truncate(0)?;
		std::io::copy(&mut temp_file, file)?;
		file.flush()?;

		file.rewind()?;
		Ok(())
	}

	/// Update the tag in the file at `path`
	///
	/// The new file is rendered next to the original, given its permissions, and renamed over it.
	///
	/// # Errors
	///
	/// * `path` doesn't exist, or its directory isn't writable
	/// * See [`TagModule::render`]
	fn write_to_path<P>(path: P, tuple: &Tuple, write_options: WriteOptions) -> Result<()>
	where
		P: AsRef<Path>,
	{
		let path = path.as_ref();
		let mut source = File::open(path)?;

		let dir = match path.parent() {
			Some(parent) if !parent.as_os_str().is_empty() => parent,
			_ => Path::new("."),
		};

		let mut temp_file = tempfile::NamedTempFile::new_in(dir)?;
		Self::render(&mut source, temp_file.as_file_mut(), tuple, write_options)?;

		temp_file
			.as_file()
			.set_permissions(source.metadata()?.permissions())?;
		temp_file.as_file().sync_all()?;
		drop(source);

		log::debug!("Moving the new file to {}", path.display());
		temp_file.persist(path)?;

		Ok(())
	}
}
