//! Plain-terminal rendering of the popup view.

use colored::{ColoredString, Colorize};

use cursor_prompts_core::ViewState;
use cursor_prompts_store::{Prompt, Theme};

const PREVIEW_CHARS: usize = 60;

fn accent(theme: Theme, text: &str) -> ColoredString {
    match theme {
        Theme::Light => text.blue(),
        Theme::Dark => text.bright_cyan(),
    }
}

/// First line of `content`, cut to `max` characters.
pub fn preview(content: &str, max: usize) -> String {
    let first_line = content.lines().next().unwrap_or_default();
    if first_line.chars().count() > max {
        let cut: String = first_line.chars().take(max).collect();
        format!("{}...", cut)
    } else if content.lines().nth(1).is_some() {
        format!("{}...", first_line)
    } else {
        first_line.to_string()
    }
}

pub fn print_prompt(prompt: &Prompt, theme: Theme) {
    let category = if prompt.category.is_empty() {
        String::new()
    } else {
        format!(" [{}]", accent(theme, &prompt.category))
    };
    println!("{}{}  {}", prompt.title.bold(), category, prompt.id.dimmed());
    println!("    {}", preview(&prompt.content, PREVIEW_CHARS).dimmed());
}

pub fn print_prompts(view: &ViewState) {
    if view.prompts.is_empty() {
        eprintln!("{}", "No prompts found.".dimmed());
        return;
    }
    for prompt in &view.prompts {
        print_prompt(prompt, view.theme);
    }
}

pub fn print_categories(view: &ViewState) {
    for option in view.category_options.iter().filter(|o| !o.value.is_empty()) {
        println!("{}", accent(view.theme, &option.label));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_short() {
        assert_eq!(preview("Hello {{name}}", 60), "Hello {{name}}");
    }

    #[test]
    fn test_preview_truncates_long_line() {
        assert_eq!(preview("abcdefghij", 4), "abcd...");
    }

    #[test]
    fn test_preview_marks_more_lines() {
        assert_eq!(preview("first\nsecond", 60), "first...");
    }

    #[test]
    fn test_preview_empty() {
        assert_eq!(preview("", 10), "");
    }
}
