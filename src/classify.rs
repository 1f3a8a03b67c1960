//! Source-file eligibility

/// Extensions of files worth sending to the summarizer
pub const CODE_EXTENSIONS: &[&str] = &[".go", ".py", ".c", ".js", ".ts", ".php", ".cpp"];

/// Whether a file name ends with one of [`CODE_EXTENSIONS`].
///
/// The match is a case-sensitive suffix check on the name alone.
pub fn is_eligible(file_name: &str) -> bool {
    CODE_EXTENSIONS.iter().any(|ext| file_name.ends_with(ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions_are_eligible() {
        for name in ["main.go", "app.py", "lib.c", "index.js", "types.ts", "page.php", "vm.cpp"] {
            assert!(is_eligible(name), "{name} should be eligible");
        }
    }

    #[test]
    fn test_suffix_match_is_exact_and_case_sensitive() {
        assert!(is_eligible("a.go"));
        assert!(!is_eligible("a.GO"));
        assert!(!is_eligible("archive.go.bak"));
        assert!(!is_eligible("README.md"));
        assert!(!is_eligible("Makefile"));
    }

    #[test]
    fn test_no_dotfile_special_case() {
        assert!(is_eligible(".go"));
        assert!(is_eligible("bundle.min.js"));
    }
}
