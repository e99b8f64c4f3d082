//! Read and write the tags of audio files: ID3v2, APE, and ID3v1.
//!
//! # Supported tags
//!
//! | Tag              | Read | Write |
//! |------------------|------|-------|
//! | ID3v2.3, ID3v2.4 | Yes  | Yes   |
//! | ID3v2.2          | Yes  | No    |
//! | APEv2            | Yes  | Yes   |
//! | ID3v1, ID3v1.1   | Yes  | Yes   |
//!
//! Every tag is read into, and written from, a [`Tuple`](tuple::Tuple). Frames and items that
//! don't map onto a [`Tuple`](tuple::Tuple) field survive a rewrite untouched.
//!
//! # Examples
//!
//! ## Reading a file
//!
//! ```rust,no_run
//! # fn main() -> audtag::error::Result<()> {
//! use audtag::read_from_path;
//! use audtag::tuple::{StrField, Tuple};
//!
//! let mut tuple = Tuple::new();
//! let cover = read_from_path("test.mp3", &mut tuple)?;
//!
//! println!("Title: {:?}", tuple.get_str(StrField::Title));
//! println!("Has a cover: {}", cover.is_some());
//! # Ok(())
//! # }
//! ```
//!
//! ## Using a specific module
//!
//! ```rust,no_run
//! # fn main() -> audtag::error::Result<()> {
//! use audtag::config::ParseOptions;
//! use audtag::id3::v2::Id3v2Module;
//! use audtag::module::TagModule;
//! use audtag::tuple::Tuple;
//! use std::fs::File;
//!
//! let mut file = File::open("test.mp3")?;
//!
//! let mut tuple = Tuple::new();
//! if Id3v2Module::can_handle(&mut file)? {
//! 	Id3v2Module::read(&mut file, &mut tuple, ParseOptions::new())?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Writing a file
//!
//! ```rust,no_run
//! # fn main() -> audtag::error::Result<()> {
//! use audtag::config::WriteOptions;
//! use audtag::tag_type::TagType;
//! use audtag::tuple::{IntField, StrField, Tuple};
//! use audtag::write_to_path;
//!
//! let mut tuple = Tuple::new();
//! tuple.set_str(StrField::Artist, "Foo artist");
//! tuple.set_int(IntField::Track, 7);
//!
//! // Updates the existing tag, or adds an ID3v2.3 tag if there is none
//! write_to_path("test.mp3", &tuple, TagType::Id3v2, WriteOptions::new())?;
//! # Ok(())
//! # }
//! ```
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod config;
pub mod error;
pub mod genre;
pub(crate) mod macros;
pub mod module;
pub mod picture;
pub mod probe;
pub mod tag_type;
pub mod tuple;
mod util;

pub mod ape;
pub mod id3;

pub use crate::probe::{read_from, read_from_path, write_to, write_to_path};

pub use util::text::TextEncoding;

pub use util::io;
