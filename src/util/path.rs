use std::ffi::OsStr;
use std::path::Path;

pub trait PathExt {
    /// `.sgf` extension, case-insensitive.
    fn is_sgf_file(&self) -> bool;
}

impl PathExt for Path {
    fn is_sgf_file(&self) -> bool {
        self.extension()
            .and_then(OsStr::to_str)
            .is_some_and(|ext| ext.eq_ignore_ascii_case("sgf"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_sgf_file() {
        assert!(Path::new("games/kifu.sgf").is_sgf_file());
        assert!(Path::new("KIFU.SGF").is_sgf_file());
        assert!(!Path::new("notes.txt").is_sgf_file());
        assert!(!Path::new("sgf").is_sgf_file());
    }
}
