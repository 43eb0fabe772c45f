//! Prompt construction and response cleanup for every generation kind.

use super::generator::{GenerationKind, GenerationOptions};

/// Maximum length for sanitized diff text.
const MAX_CONTEXT_LENGTH: usize = 30_000;

/// Build the full prompt for one generation call.
///
/// `instructions` carries the per-call guidance typed during the approval
/// loop; project-wide guidance and the output language come from `options`.
pub fn build_prompt(
    kind: GenerationKind,
    context: &str,
    options: &GenerationOptions,
    instructions: Option<&str>,
) -> String {
    let cleaned = sanitize_diff(context, usize::MAX);
    let truncated = cleaned.len() > MAX_CONTEXT_LENGTH;
    let sanitized = sanitize_diff(&cleaned, MAX_CONTEXT_LENGTH);
    let truncation_note = if truncated {
        "\n\nNote: The diff was truncated due to size. Focus on the visible changes."
    } else {
        ""
    };

    let mut prompt = format!(
        "{task}\n\n## Diff\n```\n{sanitized}\n```{truncation_note}\n\n## Rules\n{rules}",
        task = task_for(kind),
        rules = rules_for(kind),
    );

    if let Some(language) = options.language.as_deref().filter(|l| !l.trim().is_empty()) {
        prompt.push_str(&format!("\n\n## Language\nWrite the response in {}.", language.trim()));
    }

    if let Some(custom) = options
        .custom_instructions
        .as_deref()
        .filter(|c| !c.trim().is_empty())
    {
        prompt.push_str(&format!("\n\n## Project Instructions\n{}", custom.trim()));
    }

    if let Some(extra) = instructions.filter(|i| !i.trim().is_empty()) {
        prompt.push_str(&format!(
            "\n\n## Additional Instructions\nThe previous suggestion was rejected. Follow this guidance:\n{}",
            extra.trim()
        ));
    }

    prompt.push_str("\n\n");
    prompt.push_str(output_format_for(kind));
    prompt
}

fn task_for(kind: GenerationKind) -> &'static str {
    match kind {
        GenerationKind::Commit => {
            "You are generating a Git commit message following the Conventional Commits specification."
        }
        GenerationKind::Branch => "You are naming a new Git branch for the changes below.",
        GenerationKind::Pr => {
            "You are writing the title and description of a pull request for the changes below."
        }
        GenerationKind::Review => {
            "You are reviewing the changes below as an experienced engineer."
        }
    }
}

fn rules_for(kind: GenerationKind) -> &'static str {
    match kind {
        GenerationKind::Commit => {
            "- Subject format: `type(scope): description`
- Type: one of feat, fix, build, chore, ci, docs, style, refactor, perf, test
- Description: imperative mood, lowercase after the colon, no period at the end
- Keep the subject line under 72 characters
- Add a body only when the change needs explanation; the body explains WHY, wrapped at 72 characters"
        }
        GenerationKind::Branch => {
            "- Format: `type/short-description`, e.g. `feat/login-rate-limit`
- Type: one of feat, fix, chore, docs, refactor, perf, test
- Lowercase letters, digits and hyphens only after the slash
- At most 50 characters"
        }
        GenerationKind::Pr => {
            "- First line: a concise title under 72 characters, no prefix
- Then a blank line and a Markdown description with a short summary and a bullet list of notable changes
- Mention anything reviewers should test or watch out for"
        }
        GenerationKind::Review => {
            "- Point out bugs, risky edge cases and missing tests first
- Then readability or naming issues worth fixing
- Reference file paths when relevant
- If the change looks good, say so briefly"
        }
    }
}

fn output_format_for(kind: GenerationKind) -> &'static str {
    match kind {
        GenerationKind::Commit => {
            "Respond with ONLY the commit message (no markdown fences, no explanation)."
        }
        GenerationKind::Branch => "Respond with ONLY the branch name on a single line.",
        GenerationKind::Pr => "Respond with ONLY the title line followed by the description.",
        GenerationKind::Review => "Respond with the review as Markdown.",
    }
}

/// Sanitize diff text for inclusion in a prompt.
///
/// Removes control characters (except newlines and tabs) and ANSI escape
/// sequences, then truncates to `max_len` on a char boundary.
pub fn sanitize_diff(text: &str, max_len: usize) -> String {
    let mut result = remove_ansi_escapes(text);
    result = remove_control_chars(&result);

    if result.len() > max_len {
        let mut end = max_len;
        while end > 0 && !result.is_char_boundary(end) {
            end -= 1;
        }
        result.truncate(end);
    }

    result
}

fn remove_control_chars(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}

/// Strip CSI sequences such as `\x1b[31m`.
fn remove_ansi_escapes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            for next in chars.by_ref() {
                if ('@'..='~').contains(&next) {
                    break;
                }
            }
            continue;
        }
        out.push(ch);
    }

    out
}

/// Clean a raw model response for the given kind.
///
/// Removes a wrapping Markdown fence and surrounding whitespace. Commit
/// messages and branch names additionally lose wrapping quotes/backticks;
/// branch names are reduced to a single slug.
pub fn clean_response(kind: GenerationKind, raw: &str) -> String {
    let text = strip_fence(raw.trim());

    match kind {
        GenerationKind::Commit => strip_wrapping_quotes(text).trim().to_string(),
        GenerationKind::Branch => {
            let first_line = text.lines().map(str::trim).find(|l| !l.is_empty());
            first_line
                .map(|l| slugify_branch(strip_wrapping_quotes(l)))
                .unwrap_or_default()
        }
        GenerationKind::Pr | GenerationKind::Review => text.trim().to_string(),
    }
}

fn strip_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return text;
    };
    // Drop an info string like ```text
    match body.split_once('\n') {
        Some((info, inner)) if !info.contains(' ') => inner.trim(),
        _ => body.trim(),
    }
}

fn strip_wrapping_quotes(text: &str) -> &str {
    for quote in ['"', '\'', '`'] {
        if let Some(inner) = text
            .strip_prefix(quote)
            .and_then(|t| t.strip_suffix(quote))
        {
            return inner;
        }
    }
    text
}

/// Reduce free text to a valid branch name like `feat/add-login`.
pub fn slugify_branch(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for ch in text.trim().chars().flat_map(char::to_lowercase) {
        let mapped = if ch.is_ascii_alphanumeric() || matches!(ch, '/' | '.' | '_') {
            ch
        } else {
            '-'
        };
        if mapped == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(mapped);
    }

    slug.split('/')
        .map(|segment| segment.trim_matches(|c| c == '-' || c == '.'))
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}
