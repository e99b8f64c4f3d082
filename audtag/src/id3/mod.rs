//! ID3 specific items
//!
//! ID3v2.3/ID3v2.4 ([`v2::Id3v2Module`]), ID3v2.2 ([`v2::Id3v22Module`]), and ID3v1
//! ([`v1::Id3v1Module`]) are separate modules, each with their own rules for finding a tag.

pub mod v1;
pub mod v2;
