//! The numeric genre table shared by ID3v1 and the ID3v2 `TCON` frame

/// The ID3v1 genre list, indexed by genre number
pub const GENRES: [&str; 125] = [
	"Blues",
	"Classic Rock",
	"Country",
	"Dance",
	"Disco",
	"Funk",
	"Grunge",
	"Hip-Hop",
	"Jazz",
	"Metal",
	"New Age",
	"Oldies",
	"Other",
	"Pop",
	"R&B",
	"Rap",
	"Reggae",
	"Rock",
	"Techno",
	"Industrial",
	"Alternative",
	"Ska",
	"Death Metal",
	"Pranks",
	"Soundtrack",
	"Euro-Techno",
	"Ambient",
	"Trip-Hop",
	"Vocal",
	"Jazz+Funk",
	"Fusion",
	"Trance",
	"Classical",
	"Instrumental",
	"Acid",
	"House",
	"Game",
	"Sound Clip",
	"Gospel",
	"Noise",
	"AlternRock",
	"Bass",
	"Soul",
	"Punk",
	"Space",
	"Meditative",
	"Instrumental Pop",
	"Instrumental Rock",
	"Ethnic",
	"Gothic",
	"Darkwave",
	"Techno-Industrial",
	"Electronic",
	"Pop-Folk",
	"Eurodance",
	"Dream",
	"Southern Rock",
	"Comedy",
	"Cult",
	"Gangsta",
	"Top 40",
	"Christian Rap",
	"Pop/Funk",
	"Jungle",
	"Native American",
	"Cabaret",
	"New Wave",
	"Psychedelic",
	"Rave",
	"Showtunes",
	"Trailer",
	"Lo-Fi",
	"Tribal",
	"Acid Punk",
	"Acid Jazz",
	"Polka",
	"Retro",
	"Musical",
	"Rock & Roll",
	"Hard Rock",
	"Folk",
	"Folk-Rock",
	"National Folk",
	"Swing",
	"Fast Fusion",
	"Bebob",
	"Latin",
	"Revival",
	"Celtic",
	"Bluegrass",
	"Avantgarde",
	"Gothic Rock",
	"Progressive Rock",
	"Psychedelic Rock",
	"Symphonic Rock",
	"Slow Rock",
	"Big Band",
	"Chorus",
	"Easy Listening",
	"Acoustic",
	"Humour",
	"Speech",
	"Chanson",
	"Opera",
	"Chamber Music",
	"Sonata",
	"Symphony",
	"Booty Bass",
	"Primus",
	"Porn Groove",
	"Satire",
	"Slow Jam",
	"Club",
	"Tango",
	"Samba",
	"Folklore",
	"Ballad",
	"Power Ballad",
	"Rhythmic Soul",
	"Freestyle",
	"Duet",
	"Punk Rock",
	"Drum Solo",
	"A capella",
	"Euro-House",
];

/// Get the name of a numeric genre
///
/// # Examples
///
/// ```rust
/// use audtag::genre::genre_name;
///
/// assert_eq!(genre_name(17), Some("Rock"));
/// assert_eq!(genre_name(200), None);
/// ```
pub fn genre_name(index: i32) -> Option<&'static str> {
	usize::try_from(index)
		.ok()
		.and_then(|index| GENRES.get(index))
		.copied()
}

/// Find the number of a genre by name, ignoring case
pub fn genre_index(name: &str) -> Option<u8> {
	GENRES
		.iter()
		.position(|genre| genre.eq_ignore_ascii_case(name))
		.map(|pos| pos as u8)
}

#[cfg(test)]
mod tests {
	use super::{GENRES, genre_index, genre_name};

	#[test_log::test]
	fn genre_lookup() {
		assert_eq!(genre_name(0), Some("Blues"));
		assert_eq!(genre_name(13), Some("Pop"));
		assert_eq!(genre_name(124), Some("Euro-House"));
		assert_eq!(genre_name(125), None);
		assert_eq!(genre_name(-1), None);

		assert_eq!(genre_index("hip-hop"), Some(7));
		assert_eq!(genre_index("Not a genre"), None);

		for (i, genre) in GENRES.iter().enumerate() {
			assert_eq!(genre_index(genre), Some(i as u8));
		}
	}
}
