use std::path::{Path, PathBuf};

mod list_server;
pub use list_server::{Config, ConfigBuilder, ListServer, LIST_PATH};

/// A short list in the published format, distinguishable from the bundled one
/// (its first entry is SLOVAKIA).
pub const SAMPLE_LIST: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<ISO_4217 Pblshd="2024-06-25">
	<CcyTbl>
		<CcyNtry>
			<CtryNm>SLOVAKIA</CtryNm>
			<CcyNm>Euro</CcyNm>
			<Ccy>EUR</Ccy>
			<CcyNbr>978</CcyNbr>
			<CcyMnrUnts>2</CcyMnrUnts>
		</CcyNtry>
		<CcyNtry>
			<CtryNm>ANTARCTICA</CtryNm>
			<CcyNm>No universal currency</CcyNm>
		</CcyNtry>
		<CcyNtry>
			<CtryNm>ZZ08_Gold</CtryNm>
			<CcyNm>Gold</CcyNm>
			<Ccy>XAU</Ccy>
			<CcyNbr>959</CcyNbr>
			<CcyMnrUnts>N.A.</CcyMnrUnts>
		</CcyNtry>
	</CcyTbl>
</ISO_4217>
"#;

/// Number of entries in [`SAMPLE_LIST`]
pub const SAMPLE_LIST_LEN: usize = 3;

/// A list whose second entry is broken
pub const MALFORMED_LIST: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<ISO_4217 Pblshd="2024-06-25">
	<CcyTbl>
		<CcyNtry>
			<CtryNm>SLOVAKIA</CtryNm>
			<CcyNm>Euro</CcyNm>
			<Ccy>EUR</Ccy>
			<CcyNbr>978</CcyNbr>
			<CcyMnrUnts>2</CcyMnrUnts>
		</CcyNtry>
		<CcyNtry>
			<CtryNm>BROKEN</Ctry>
"#;

pub fn init_logging() {
    let _ = env_logger::try_init();
}

/// Write `content` as the list at `path`, eg. the cache file of a source
pub fn write_list(path: &Path, content: &str) -> PathBuf {
    std::fs::write(path, content).unwrap();
    path.to_path_buf()
}

/// A fresh directory for the cache, removed when dropped
pub fn cache_dir() -> tempfile::TempDir {
    tempfile::tempdir().unwrap()
}
