//! Skills: `SKILL.md` rendering for exports and repository scanning.

mod scanner;

pub use scanner::{GITHUB_API_BASE, RepoEntry, SkillScanner, readme_description, scan_repo};

use crate::model::Skill;

/// Render the `SKILL.md` bundled for an installed skill.
pub fn render_skill_md(skill: &Skill) -> String {
    let description = skill.description_or_empty();
    format!(
        "---\nname: {name}\ndescription: {description}\nversion: \"1.0\"\ntags: []\n---\n\n# {name}\n\n{description}\n",
        name = skill.name,
    )
}

/// Directory name used for a skill inside an export.
///
/// Path separators are replaced so a name can never escape `skills/`.
pub fn skill_dir_name(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    match sanitized.as_str() {
        "" | "." | ".." => "_".to_string(),
        _ => sanitized,
    }
}
