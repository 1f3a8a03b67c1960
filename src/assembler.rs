//! Combined summary document

/// Output of one summary run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryResult {
    /// README body as fetched
    pub readme: String,

    /// Structure outline, beautified when possible
    pub structure: String,

    /// Structure outline annotated with file summaries
    pub structure_detail: String,

    /// All of the above under section headers
    pub combined: String,
}

impl SummaryResult {
    /// Assemble a result, composing the combined document from its parts
    pub fn assemble(
        readme: impl Into<String>,
        structure: impl Into<String>,
        structure_detail: impl Into<String>,
    ) -> Self {
        let readme = readme.into();
        let structure = structure.into();
        let structure_detail = structure_detail.into();
        let combined = compose(&readme, &structure, &structure_detail);
        Self {
            readme,
            structure,
            structure_detail,
            combined,
        }
    }
}

/// Join the parts under the fixed section headers. Bodies are inserted as-is.
pub fn compose(readme: &str, structure: &str, structure_detail: &str) -> String {
    let mut summary = String::with_capacity(
        readme.len() + structure.len() + structure_detail.len() + 96,
    );
    summary.push_str("### Repository Summary\n\n");
    summary.push_str("#### Purpose\n");
    summary.push_str(readme);
    summary.push_str("\n\n");
    summary.push_str("#### Structure\n");
    summary.push_str(structure);
    summary.push_str("\n\n");
    summary.push_str("#### Structure Detail\n");
    summary.push_str(structure_detail);
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_layout() {
        let combined = compose("# Widget", "- main.go\n", "- main.go\n  Summarized code for main.go\n");
        assert_eq!(
            combined,
            "### Repository Summary\n\n\
             #### Purpose\n# Widget\n\n\
             #### Structure\n- main.go\n\n\n\
             #### Structure Detail\n- main.go\n  Summarized code for main.go\n"
        );
    }

    #[test]
    fn test_assemble_keeps_parts() {
        let result = SummaryResult::assemble("readme", "tree", "detail");
        assert_eq!(result.readme, "readme");
        assert_eq!(result.structure, "tree");
        assert_eq!(result.structure_detail, "detail");
        assert_eq!(result.combined, compose("readme", "tree", "detail"));
    }

    #[test]
    fn test_readme_is_not_escaped() {
        let result = SummaryResult::assemble("#### Structure\n<b>raw</b>", "", "");
        assert!(result.combined.contains("#### Purpose\n#### Structure\n<b>raw</b>\n\n"));
    }
}
