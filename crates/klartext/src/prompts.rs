//! Prompt template loading and rendering.
//!
//! Templates live as plain text files, one system and one user prompt per
//! language. The user prompt carries a `{{text}}` placeholder that is
//! replaced with the input verbatim.

use std::path::Path;

use crate::prelude::*;

pub const DEFAULT_TEMPLATES_DIR: &str = "prompts/templates";

/// The loaded prompt pair for one language.
#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub system: String,
    pub user: String,
    /// Template identifier recorded in the run log.
    pub name: String,
}

fn template_files(language: &str) -> Option<(&'static str, &'static str)> {
    match language {
        "de" => Some(("system_prompt_de.txt", "user_prompt_de.txt")),
        "en" => Some(("system_prompt_en.txt", "user_prompt_en.txt")),
        _ => None,
    }
}

/// Load the system and user templates for a language from `dir`.
pub fn load_templates(dir: &Path, language: &str) -> Result<PromptTemplates> {
    let (system_file, user_file) =
        template_files(language).ok_or_else(|| Error::UnsupportedLanguage(language.to_string()))?;

    let system = read_template(&dir.join(system_file))?;
    let user = read_template(&dir.join(user_file))?;

    Ok(PromptTemplates {
        system,
        user,
        name: system_file.trim_end_matches(".txt").to_string(),
    })
}

fn read_template(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(Error::TemplateNotFound(path.display().to_string()).into());
    }
    let contents = std::fs::read_to_string(path)
        .wrap_err_with(|| f!("failed to read template {}", path.display()))?;
    Ok(contents.trim().to_string())
}

/// Substitute the input text into a user prompt template.
pub fn render_user_prompt(template: &str, text: &str) -> String {
    template.replace("{{text}}", text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_templates(dir: &Path) {
        std::fs::write(
            dir.join("system_prompt_de.txt"),
            "Du schreibst in Leichter Sprache.\n",
        )
        .unwrap();
        std::fs::write(
            dir.join("user_prompt_de.txt"),
            "Vereinfache diesen Text:\n\n{{text}}\n",
        )
        .unwrap();
    }

    #[test]
    fn test_load_templates_de() {
        let dir = tempfile::tempdir().unwrap();
        write_templates(dir.path());

        let templates = load_templates(dir.path(), "de").unwrap();
        assert_eq!(templates.system, "Du schreibst in Leichter Sprache.");
        assert!(templates.user.contains("{{text}}"));
        assert_eq!(templates.name, "system_prompt_de");
    }

    #[test]
    fn test_unsupported_language() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_templates(dir.path(), "fr").unwrap_err();
        assert!(err.to_string().contains("Unsupported language"));
    }

    #[test]
    fn test_missing_template_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_templates(dir.path(), "de").unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_render_user_prompt() {
        let rendered = render_user_prompt("Simplify:\n\n{{text}}", "Der lange Satz.");
        assert_eq!(rendered, "Simplify:\n\nDer lange Satz.");
    }

    #[test]
    fn test_render_without_placeholder_is_identity() {
        assert_eq!(render_user_prompt("no placeholder", "x"), "no placeholder");
    }
}
