//! File summaries and structure beautification
//!
//! Both calls go through the [`Summarizer`] capability with a fixed system
//! instruction. Prompts are written in Chinese so output stays compatible with
//! previously generated artifacts.

use tracing::{debug, instrument, warn};

use crate::model::{GenerationError, Summarizer};

/// System instruction sent with every generation request
pub const SYSTEM_INSTRUCTION: &str = "You are a helpful assistant.Use Chinese to answer questions.";

const FILE_PROMPT: &str =
    "总结以下代码文件内容，尽可能详细讲解功能和实现细节，便于读者学习阅读该代码: ";

const STRUCTURE_PROMPT: &str = "将以下代码仓库目录结构整理为美观的树状图，使用 ├──、└──、│ 等 ASCII 字符表示层级，\
保持条目顺序和名称不变，只输出树状图本身:\n\n";

/// Describe a single source file.
///
/// On success the text is prefixed with a `Summarized code for <file_name>`
/// header. Failures are returned to the caller, which decides whether to embed
/// them in the output or abort.
#[instrument(skip(summarizer, code), fields(code_len = code.len()))]
pub async fn summarize_file<M: Summarizer>(
    summarizer: &M,
    file_name: &str,
    code: &str,
) -> Result<String, GenerationError> {
    let prompt = format!("{}{}", FILE_PROMPT, code);
    let text = summarizer.generate(SYSTEM_INSTRUCTION, &prompt).await?;
    debug!("Summarized {} into {} bytes", file_name, text.len());
    Ok(format!("Summarized code for {}\n\n{}", file_name, text))
}

/// Ask the summarizer to redraw the plain structure as an ASCII tree.
///
/// An empty answer counts as a failure.
#[instrument(skip_all, fields(structure_len = structure.len()))]
pub async fn beautify_structure<M: Summarizer>(
    summarizer: &M,
    structure: &str,
) -> Result<String, GenerationError> {
    let prompt = format!("{}{}", STRUCTURE_PROMPT, structure);
    let tree = summarizer.generate(SYSTEM_INSTRUCTION, &prompt).await?;
    if tree.trim().is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    Ok(tree)
}

/// [`beautify_structure`], falling back to the unmodified structure on failure
pub async fn beautify_or_original<M: Summarizer>(summarizer: &M, structure: &str) -> String {
    match beautify_structure(summarizer, structure).await {
        Ok(tree) => tree,
        Err(e) => {
            warn!("Structure beautification failed, keeping plain structure: {}", e);
            structure.to_string()
        }
    }
}
