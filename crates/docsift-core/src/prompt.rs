/// Hard cap on corpus characters embedded into the prompt.
pub const MAX_PROMPT_CHARS: usize = 50_000;

const TEMPLATE_HEAD: &str = "\
Analyze the following document content comprehensively.
The content may include multiple documents, each separated by \"--- DOCUMENT: [filename] ---\".
Focus on extracting the most important information and presenting it in a structured format.

Provide the following:
1. SUMMARY: A concise 2-3 paragraph summary of the main content across all documents
2. KEY POINTS: A bullet list of 5-10 most important points/takeaways
3. DETAILED ANALYSIS: A thorough analysis organized by main topics in the documents
4. DOCUMENT COMPARISON: If multiple documents are provided, compare and contrast their key information
5. RECOMMENDATIONS: Any actionable insights or recommendations based on the content

Document content:
";

/// Render the analysis prompt for `text`, keeping at most
/// [`MAX_PROMPT_CHARS`] characters of it.
#[must_use]
pub fn build_prompt(text: &str) -> String {
    let body = truncate_chars(text, MAX_PROMPT_CHARS);
    let mut prompt = String::with_capacity(TEMPLATE_HEAD.len() + body.len() + 1);
    prompt.push_str(TEMPLATE_HEAD);
    prompt.push_str(body);
    prompt.push('\n');
    prompt
}

/// Longest prefix of `text` holding at most `max` characters.
#[must_use]
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
