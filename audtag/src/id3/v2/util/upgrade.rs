//! Utilities for upgrading old ID3v2 frame IDs

/// Upgrade an ID3v2.2 key to its ID3v2.3/ID3v2.4 equivalent
///
/// # Examples
///
/// ```rust
/// use audtag::id3::v2::util::upgrade::upgrade_v2;
///
/// let old_title = "TT2";
/// let new_title = upgrade_v2(old_title);
///
/// assert_eq!(new_title, Some("TIT2"));
/// assert_eq!(upgrade_v2("XYZ"), None);
/// ```
pub fn upgrade_v2(key: &str) -> Option<&'static str> {
	let new_key = match key {
		// Standard frames
		"BUF" => "RBUF",
		"CNT" => "PCNT",
		"COM" => "COMM",
		"CRA" => "AENC",
		"ETC" => "ETCO",
		"GEO" => "GEOB",
		"IPL" => "TIPL",
		"MCI" => "MCDI",
		"MLL" => "MLLT",
		"PIC" => "APIC",
		"POP" => "POPM",
		"REV" => "RVRB",
		"SLT" => "SYLT",
		"STC" => "SYTC",
		"TAL" => "TALB",
		"TBP" => "TBPM",
		"TCM" => "TCOM",
		"TCO" => "TCON",
		"TCP" => "TCMP",
		"TCR" => "TCOP",
		"TDA" => "TDAT",
		"TDY" => "TDLY",
		"TEN" => "TENC",
		"TFT" => "TFLT",
		"TIM" => "TIME",
		"TKE" => "TKEY",
		"TLA" => "TLAN",
		"TLE" => "TLEN",
		"TMT" => "TMED",
		"TOA" => "TOPE",
		"TOF" => "TOFN",
		"TOL" => "TOLY",
		"TOR" => "TORY",
		"TOT" => "TOAL",
		"TP1" => "TPE1",
		"TP2" => "TPE2",
		"TP3" => "TPE3",
		"TP4" => "TPE4",
		"TPA" => "TPOS",
		"TPB" => "TPUB",
		"TRC" => "TSRC",
		"TRD" => "TRDA",
		"TRK" => "TRCK",
		"TSI" => "TSIZ",
		"TSS" => "TSSE",
		"TT1" => "TIT1",
		"TT2" => "TIT2",
		"TT3" => "TIT3",
		"TXT" => "TEXT",
		"TXX" => "TXXX",
		"TYE" => "TYER",
		"UFI" => "UFID",
		"ULT" => "USLT",
		"WAF" => "WOAF",
		"WAR" => "WOAR",
		"WAS" => "WOAS",
		"WCM" => "WCOM",
		"WCP" => "WCOP",
		"WPB" => "WPUB",
		"WXX" => "WXXX",

		// iTunes non-standard frames
		"TS2" => "TSO2",
		"TSA" => "TSOA",
		"TSC" => "TSOC",
		"TSP" => "TSOP",
		"TST" => "TSOT",
		"GP1" => "GRP1",
		"MVI" => "MVIN",
		"MVN" => "MVNM",

		// Podcast
		"PCS" => "PCST",
		"TCT" => "TCAT",
		"TDS" => "TDES",
		"TID" => "TGID",
		"WFD" => "WFED",
		_ => return None,
	};

	Some(new_key)
}
