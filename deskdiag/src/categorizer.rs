// ABOUTME: classifies free-text problem descriptions into a diagnostic category.
// ABOUTME: the rule table is ordered; the first category with any keyword hit wins.

use deskdiag_common::Category;

/// Ordered rule table. Order is part of the contract: when keywords from two
/// categories appear in the same text, the earlier row wins.
const CATEGORY_RULES: &[(Category, &[&str])] = &[
    (
        Category::Network,
        &["internet", "wifi", "network", "connection", "ping", "dns", "ip"],
    ),
    (
        Category::Hardware,
        &["printer", "scanner", "keyboard", "mouse", "monitor", "disk", "memory"],
    ),
    (
        Category::Software,
        &["program", "application", "software", "update", "install", "uninstall"],
    ),
    (
        Category::System,
        &["slow", "freeze", "crash", "error", "blue screen", "kernel"],
    ),
    (
        Category::Security,
        &["virus", "malware", "firewall", "antivirus", "password", "login"],
    ),
];

/// Total function: always yields a category, `General` when nothing matches.
pub fn categorize(text: &str) -> Category {
    let normalized = text.to_lowercase();

    for (category, keywords) in CATEGORY_RULES {
        if keywords.iter().any(|keyword| normalized.contains(keyword)) {
            return *category;
        }
    }

    Category::General
}
