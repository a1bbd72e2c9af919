use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::app::models::{Difficulty, RepositorySummary, UnlockMethod};

const UNLOCK_KEYWORDS: &[&str] = &["unlock", "bootloader", "fastboot", "oem"];
const EASY_KEYWORDS: &[&str] = &["automatic", "one-click", "easy"];
const HARD_KEYWORDS: &[&str] = &["manual", "advanced", "exploit"];

const OFFICIAL_ACCOUNTS: &[(&str, &[&str])] = &[
    ("xiaomi", &["miui", "xiaomi", "mi-global"]),
    ("huawei", &["huawei", "huaweicloud"]),
    ("oppo", &["oppo", "oppomobile"]),
    ("vivo", &["vivo", "vivoglobal"]),
    ("oneplus", &["oneplus", "oneplusbbs"]),
    ("samsung", &["samsung", "samsunginternet"]),
];

pub fn search_queries(brand: &str) -> Vec<String> {
    let brand = brand.trim();
    vec![
        format!("{brand} bootloader unlock"),
        format!("{brand} unlock tool"),
        format!("{brand} fastboot unlock"),
        format!("unlock {brand}"),
    ]
}

fn searchable_text(repo: &RepositorySummary) -> String {
    format!("{} {}", repo.name, repo.description.as_deref().unwrap_or_default()).to_lowercase()
}

pub fn is_relevant(repo: &RepositorySummary, brand: &str) -> bool {
    let text = searchable_text(repo);
    let brand_lower = brand.trim().to_lowercase();
    if brand_lower.is_empty() {
        return false;
    }
    let brand_compact: String = brand_lower.split_whitespace().collect();
    let has_unlock = UNLOCK_KEYWORDS.iter().any(|keyword| text.contains(keyword));
    let has_brand = text.contains(&brand_lower) || text.contains(&brand_compact);
    has_unlock && has_brand
}

pub fn assess_difficulty(repo: &RepositorySummary) -> Difficulty {
    let text = searchable_text(repo);
    if EASY_KEYWORDS.iter().any(|keyword| text.contains(keyword)) {
        return Difficulty::Easy;
    }
    if HARD_KEYWORDS.iter().any(|keyword| text.contains(keyword)) {
        return Difficulty::Hard;
    }
    Difficulty::Medium
}

/// Owner segment of `https://host/<owner>/<repo>`, lowercased.
pub fn repository_owner(html_url: &str) -> Option<String> {
    let url = reqwest::Url::parse(html_url).ok()?;
    let owner = url.path_segments()?.find(|segment| !segment.is_empty())?;
    Some(owner.to_lowercase())
}

pub fn is_official(repo: &RepositorySummary, brand: &str) -> bool {
    let brand = brand.trim().to_lowercase();
    let Some(owner) = repository_owner(&repo.html_url) else {
        return false;
    };
    OFFICIAL_ACCOUNTS
        .iter()
        .find(|(name, _)| *name == brand)
        .map(|(_, accounts)| accounts.contains(&owner.as_str()))
        .unwrap_or(false)
}

fn non_alphanumeric() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z0-9]").unwrap())
}

pub fn method_id(name: &str) -> String {
    non_alphanumeric()
        .replace_all(&name.to_lowercase(), "-")
        .into_owned()
}

pub fn to_method(repo: &RepositorySummary, brand: &str) -> UnlockMethod {
    UnlockMethod {
        id: method_id(&repo.name),
        name: repo.name.clone(),
        description: repo
            .description
            .clone()
            .filter(|description| !description.trim().is_empty())
            .unwrap_or_else(|| "No description available".to_string()),
        repository: repo.html_url.clone(),
        brand: brand.trim().to_lowercase(),
        last_updated: repo.updated_at.clone(),
        stars: repo.stargazers_count,
        difficulty: assess_difficulty(repo),
        is_official: is_official(repo, brand),
    }
}

pub fn methods_from(repos: &[RepositorySummary], brand: &str) -> Vec<UnlockMethod> {
    repos
        .iter()
        .filter(|repo| is_relevant(repo, brand))
        .map(|repo| to_method(repo, brand))
        .collect()
}

/// Drops repeats of the same (name, repository) pair keeping the first, then sorts by
/// stars descending. The sort is stable so equal-star methods keep query order.
pub fn dedup_and_rank(methods: Vec<UnlockMethod>) -> Vec<UnlockMethod> {
    let mut seen = HashSet::new();
    let mut unique: Vec<UnlockMethod> = methods
        .into_iter()
        .filter(|method| seen.insert((method.name.clone(), method.repository.clone())))
        .collect();
    unique.sort_by(|a, b| b.stars.cmp(&a.stars));
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo(name: &str, description: Option<&str>, url: &str, stars: u64) -> RepositorySummary {
        RepositorySummary {
            name: name.to_string(),
            description: description.map(str::to_string),
            html_url: url.to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
            stargazers_count: stars,
            topics: Vec::new(),
        }
    }

    #[test]
    fn relevance_needs_unlock_and_brand_keywords() {
        let good = repo("MiUnlockTool", Some("Xiaomi bootloader unlock for Linux"), "https://github.com/a/b", 1);
        let no_brand = repo("unlocker", Some("Generic bootloader unlock"), "https://github.com/a/b", 1);
        let no_unlock = repo("xiaomi-themes", Some("Themes for Xiaomi"), "https://github.com/a/b", 1);
        assert!(is_relevant(&good, "Xiaomi"));
        assert!(!is_relevant(&no_brand, "Xiaomi"));
        assert!(!is_relevant(&no_unlock, "Xiaomi"));
    }

    #[test]
    fn brand_with_spaces_matches_compact_form() {
        let r = repo("oneplusunlock", None, "https://github.com/a/b", 1);
        assert!(is_relevant(&r, "One Plus"));
    }

    #[test]
    fn difficulty_prefers_easy_keywords() {
        let easy = repo("x", Some("One-click unlock, advanced mode available"), "https://github.com/a/b", 1);
        let hard = repo("x", Some("Manual exploit"), "https://github.com/a/b", 1);
        let medium = repo("x", None, "https://github.com/a/b", 1);
        assert_eq!(assess_difficulty(&easy), Difficulty::Easy);
        assert_eq!(assess_difficulty(&hard), Difficulty::Hard);
        assert_eq!(assess_difficulty(&medium), Difficulty::Medium);
    }

    #[test]
    fn official_owner_allow_list() {
        let official = repo("tool", None, "https://github.com/MIUI/unlock", 1);
        let community = repo("tool", None, "https://github.com/someone/unlock", 1);
        assert!(is_official(&official, "Xiaomi"));
        assert!(!is_official(&community, "xiaomi"));
        assert!(!is_official(&official, "nokia"));
        assert!(!is_official(&repo("tool", None, "not a url", 1), "xiaomi"));
    }

    #[test]
    fn method_id_slugs_name() {
        assert_eq!(method_id("Mi_Unlock.Tool v2"), "mi-unlock-tool-v2");
    }

    #[test]
    fn dedup_and_rank_sorts_by_stars() {
        let a = to_method(&repo("a", Some("xiaomi unlock"), "https://github.com/x/a", 5), "xiaomi");
        let b = to_method(&repo("b", Some("xiaomi unlock"), "https://github.com/x/b", 50), "xiaomi");
        let ranked = dedup_and_rank(vec![a.clone(), b.clone(), a.clone()]);
        assert_eq!(ranked, vec![b, a]);
    }

    #[test]
    fn missing_description_gets_placeholder() {
        let method = to_method(&repo("a", None, "https://github.com/x/a", 1), " Xiaomi ");
        assert_eq!(method.description, "No description available");
        assert_eq!(method.brand, "xiaomi");
    }
}
