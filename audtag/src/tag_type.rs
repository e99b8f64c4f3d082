//! Runtime selection of a [`TagModule`]

use crate::ape::ApeModule;
use crate::config::{ParseOptions, WriteOptions};
use crate::error::{AudTagError, Result};
use crate::id3::v1::Id3v1Module;
use crate::id3::v2::{Id3v2Module, Id3v22Module};
use crate::module::TagModule;
use crate::picture::Picture;
use crate::tuple::Tuple;
use crate::util::io::{FileLike, Length, Truncate};

use std::io::{Read, Seek};
use std::path::Path;

// Run `$body` with `$module` bound to the module type of `$tag_type`
macro_rules! dispatch {
	($tag_type:expr, |$module:ident| $body:expr) => {
		match $tag_type {
			TagType::Id3v2 => {
				type $module = Id3v2Module;
				$body
			},
			TagType::Id3v22 => {
				type $module = Id3v22Module;
				$body
			},
			TagType::Ape => {
				type $module = ApeModule;
				$body
			},
			TagType::Id3v1 => {
				type $module = Id3v1Module;
				$body
			},
		}
	};
}

/// The tag formats audtag understands
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TagType {
	/// ID3v2.3 and ID3v2.4, see [`Id3v2Module`]
	Id3v2,
	/// ID3v2.2, see [`Id3v22Module`]
	Id3v22,
	/// APEv2, see [`ApeModule`]
	Ape,
	/// ID3v1 and ID3v1.1, see [`Id3v1Module`]
	Id3v1,
}

impl TagType {
	/// The order in which modules are tried when probing a file
	///
	/// Files often carry more than one tag, the richer formats come first.
	pub const PROBE_ORDER: [TagType; 4] = [
		TagType::Id3v2,
		TagType::Id3v22,
		TagType::Ape,
		TagType::Id3v1,
	];

	/// Whether the module can write tags
	///
	/// # Examples
	///
	/// ```rust
	/// use audtag::tag_type::TagType;
	///
	/// assert!(TagType::Id3v2.is_writable());
	/// assert!(!TagType::Id3v22.is_writable());
	/// ```
	pub fn is_writable(self) -> bool {
		self != TagType::Id3v22
	}

	/// See [`TagModule::can_handle`]
	///
	/// # Errors
	///
	/// See [`TagModule::can_handle`]
	pub fn can_handle<R>(self, reader: &mut R) -> Result<bool>
	where
		R: Read + Seek,
	{
		dispatch!(self, |M| M::can_handle(reader))
	}

	/// See [`TagModule::read`]
	///
	/// # Errors
	///
	/// See [`TagModule::read`]
	pub fn read<R>(
		self,
		reader: &mut R,
		tuple: &mut Tuple,
		parse_options: ParseOptions,
	) -> Result<Option<Picture>>
	where
		R: Read + Seek,
	{
		dispatch!(self, |M| M::read(reader, tuple, parse_options))
	}

	/// See [`TagModule::write`]
	///
	/// # Errors
	///
	/// See [`TagModule::write`]
	pub fn write<F>(self, file: &mut F, tuple: &Tuple, write_options: WriteOptions) -> Result<()>
	where
		F: FileLike,
		AudTagError: From<<F as Truncate>::Error>,
		AudTagError: From<<F as Length>::Error>,
	{
		dispatch!(self, |M| M::write(file, tuple, write_options))
	}

	/// See [`TagModule::write_to_path`]
	///
	/// # Errors
	///
	/// See [`TagModule::write_to_path`]
	pub fn write_to_path(
		self,
		path: impl AsRef<Path>,
		tuple: &Tuple,
		write_options: WriteOptions,
	) -> Result<()> {
		dispatch!(self, |M| M::write_to_path(path, tuple, write_options))
	}
}
